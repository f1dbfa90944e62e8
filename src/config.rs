//! Configuration loader: merges env vars, .env file, and vireo.toml.

use common::config::AppConfig;
use common::Error;
use std::path::Path;
use std::str::FromStr;

pub const DEFAULT_CONFIG_PATH: &str = "vireo.toml";

fn parse_env<T: FromStr>(raw: &str, env_name: &str, expected: &str) -> Result<T, Error> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| Error::Config(format!("{env_name} must be {expected} (got '{raw}')")))
}

fn parse_switch(raw: &str, env_name: &str) -> Result<bool, Error> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::Config(format!(
            "{env_name} must be one of 1/0, true/false, yes/no, on/off (got '{raw}')"
        ))),
    }
}

fn validate_config(config: &AppConfig) -> Result<(), Error> {
    let mut issues: Vec<String> = Vec::new();

    if config.model.path.trim().is_empty() {
        issues.push("model.path must not be empty".into());
    }

    let gen = &config.generation;
    if gen.output_path.trim().is_empty() {
        issues.push("generation.output_path must not be empty".into());
    }
    if gen.bankroll_min > gen.bankroll_max {
        issues.push("generation.bankroll_min must be <= generation.bankroll_max".into());
    }
    if gen.min_total_tickets == 0 {
        issues.push("generation.min_total_tickets must be > 0".into());
    }
    if gen.min_total_tickets > gen.max_total_tickets {
        issues.push("generation.min_total_tickets must be <= generation.max_total_tickets".into());
    }
    if gen.ticket_prices.is_empty() {
        issues.push("generation.ticket_prices must contain at least one price".into());
    }
    if gen.ticket_prices.iter().any(|p| !p.is_finite() || *p <= 0.0) {
        issues.push("generation.ticket_prices must all be > 0".into());
    }
    if gen.value_multipliers.is_empty() {
        issues.push("generation.value_multipliers must contain at least one multiplier".into());
    }
    if gen.value_multipliers.iter().any(|m| !m.is_finite() || *m <= 0.0) {
        issues.push("generation.value_multipliers must all be > 0".into());
    }
    if gen.min_tiers == 0 {
        issues.push("generation.min_tiers must be > 0".into());
    }
    if gen.min_tiers > gen.max_tiers {
        issues.push("generation.min_tiers must be <= generation.max_tiers".into());
    }
    if !(0.0..1.0).contains(&gen.max_sold_fraction) {
        issues.push("generation.max_sold_fraction must be in [0,1)".into());
    }

    let factor = config.estimation.correction_factor;
    if !factor.is_finite() || factor <= 0.0 {
        issues.push("estimation.correction_factor must be > 0".into());
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "Invalid config:\n - {}",
            issues.join("\n - ")
        )))
    }
}

/// Apply `VIREO_*` overrides read through `lookup`.
fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F) -> Result<(), Error>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = lookup("VIREO_MODEL_PATH") {
        config.model.path = path;
    }
    if let Some(dir) = lookup("VIREO_JOURNAL_DIR") {
        config.journal.dir = dir;
    }
    if let Some(raw) = lookup("VIREO_JOURNAL_ENABLED") {
        config.journal.enabled = parse_switch(&raw, "VIREO_JOURNAL_ENABLED")?;
    }
    if let Some(raw) = lookup("VIREO_SAMPLES") {
        config.generation.samples = parse_env(&raw, "VIREO_SAMPLES", "an integer >= 0")?;
    }
    if let Some(raw) = lookup("VIREO_SEED") {
        config.generation.seed = Some(parse_env(&raw, "VIREO_SEED", "an integer >= 0")?);
    }
    if let Some(path) = lookup("VIREO_DATASET_PATH") {
        config.generation.output_path = path;
    }
    if let Some(raw) = lookup("VIREO_CORRECTION_FACTOR") {
        // Range is checked with the rest of the file in validate_config.
        config.estimation.correction_factor =
            parse_env(&raw, "VIREO_CORRECTION_FACTOR", "a number")?;
    }
    Ok(())
}

fn load_from<F>(config_path: &Path, lookup: F) -> Result<AppConfig, Error>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = AppConfig::default();

    if config_path.exists() {
        let contents = std::fs::read_to_string(config_path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", config_path.display(), e))
        })?;
        config = toml::from_str(&contents).map_err(|e| {
            Error::Config(format!("Failed to parse {}: {}", config_path.display(), e))
        })?;
    } else {
        tracing::debug!("No config file at {}; using defaults", config_path.display());
    }

    apply_env_overrides(&mut config, lookup)?;
    validate_config(&config)?;
    Ok(config)
}

/// Load configuration: defaults, then the TOML file, then environment.
pub fn load_config(config_path: &Path) -> Result<AppConfig, Error> {
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {}", e);
    }
    load_from(config_path, |key| std::env::var(key).ok())
}
