//! JSONL record of analysis calls, one file per UTC day.
//!
//! Each CLI invocation appends at most one line, so the day file is chosen
//! from the entry's own timestamp at append time.

use std::fs::{create_dir_all, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use recommendation_engine::{AnalysisMode, AnalysisResponse};
use serde_json::json;
use uuid::Uuid;

pub const JOURNAL_DIR_NAME: &str = "ANALYSES";

/// Configured directory if set, else `ANALYSES/` at the nearest git checkout
/// above the working directory, else under the working directory.
pub fn resolve_journal_dir(configured: &str) -> PathBuf {
    let trimmed = configured.trim();
    if !trimmed.is_empty() {
        return PathBuf::from(trimmed);
    }
    let cwd = std::env::current_dir().unwrap_or_default();
    cwd.ancestors()
        .find(|dir| dir.join(".git").is_dir())
        .unwrap_or(cwd.as_path())
        .join(JOURNAL_DIR_NAME)
}

pub fn journal_file(dir: &Path, at: DateTime<Utc>) -> PathBuf {
    dir.join(format!("analyses-{}.jsonl", at.format("%Y-%m-%d")))
}

pub struct AnalysisEntry<'a> {
    pub at: DateTime<Utc>,
    pub request_id: Uuid,
    pub mode: AnalysisMode,
    pub game_name: &'a str,
    pub user_bankroll: f64,
    pub response: &'a AnalysisResponse,
}

impl<'a> AnalysisEntry<'a> {
    pub fn new(
        game_name: &'a str,
        user_bankroll: f64,
        mode: AnalysisMode,
        response: &'a AnalysisResponse,
    ) -> Self {
        Self {
            at: Utc::now(),
            request_id: Uuid::new_v4(),
            mode,
            game_name,
            user_bankroll,
            response,
        }
    }

    fn to_json(&self) -> serde_json::Value {
        json!({
            "ts": self.at.to_rfc3339_opts(SecondsFormat::Millis, true),
            "event": "analysis",
            "request_id": self.request_id,
            "mode": self.mode,
            "game_name": self.game_name,
            "user_bankroll": self.user_bankroll,
            "ok": !self.response.is_failure(),
            "response": self.response,
        })
    }
}

/// Append `entry` to its day file under `dir`, returning the file path.
pub fn append(dir: &Path, entry: &AnalysisEntry<'_>) -> std::io::Result<PathBuf> {
    create_dir_all(dir)?;
    let path = journal_file(dir, entry.at);
    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    writeln!(file, "{}", entry.to_json())?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("vireo-journal-{}", Uuid::new_v4()))
    }

    fn read_lines(path: &Path) -> Vec<serde_json::Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    fn not_loaded() -> AnalysisResponse {
        AnalysisResponse::Failure {
            error: "AI model is not loaded. Cannot perform analysis.".into(),
        }
    }

    #[test]
    fn test_configured_dir_wins() {
        assert_eq!(resolve_journal_dir(" /tmp/x "), PathBuf::from("/tmp/x"));
        assert!(resolve_journal_dir("").ends_with(JOURNAL_DIR_NAME));
    }

    #[test]
    fn test_appends_one_line_per_call() {
        let dir = temp_dir();
        let response = not_loaded();

        let first = AnalysisEntry::new("Golden Treasures", 500.0, AnalysisMode::Model, &response);
        let second = AnalysisEntry::new("Golden Treasures", 750.0, AnalysisMode::Expert, &response);
        assert_ne!(first.request_id, second.request_id);
        let first_path = append(&dir, &first).unwrap();
        let second_path = append(&dir, &second).unwrap();

        let lines = read_lines(&first_path);
        std::fs::remove_dir_all(&dir).ok();

        assert_eq!(first_path, second_path, "same UTC day, same file");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["event"], "analysis");
        assert_eq!(lines[0]["mode"], "model");
        assert_eq!(lines[0]["ok"], false);
        assert_eq!(lines[0]["request_id"], first.request_id.to_string());
        assert_eq!(lines[1]["user_bankroll"], 750.0);
        assert_eq!(
            lines[1]["response"]["error"],
            "AI model is not loaded. Cannot perform analysis."
        );
        assert!(lines[1]["ts"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn test_day_file_follows_entry_timestamp() {
        let dir = temp_dir();
        let response = not_loaded();
        let mut late = AnalysisEntry::new("A", 1.0, AnalysisMode::Expert, &response);
        late.at = Utc.with_ymd_and_hms(2026, 3, 1, 23, 59, 59).unwrap();
        let mut early = AnalysisEntry::new("B", 1.0, AnalysisMode::Expert, &response);
        early.at = Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 1).unwrap();

        let late_path = append(&dir, &late).unwrap();
        let early_path = append(&dir, &early).unwrap();
        let late_lines = read_lines(&late_path);
        let early_lines = read_lines(&early_path);
        std::fs::remove_dir_all(&dir).ok();

        assert!(late_path.ends_with("analyses-2026-03-01.jsonl"));
        assert!(early_path.ends_with("analyses-2026-03-02.jsonl"));
        assert_eq!(late_lines.len(), 1);
        assert_eq!(early_lines[0]["game_name"], "B");
        assert_eq!(late_lines[0]["ts"], "2026-03-01T23:59:59.000Z");
    }
}
