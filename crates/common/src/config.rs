//! Application configuration types.

use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Trained-model artifact settings.
    #[serde(default)]
    pub model: ModelConfig,

    /// Synthetic training-data generation parameters.
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Ticket-count estimation parameters.
    #[serde(default)]
    pub estimation: EstimationConfig,

    /// Analysis journal settings.
    #[serde(default)]
    pub journal: JournalConfig,
}

/// Where the trained classifier lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Path to the serialized classifier artifact.
    #[serde(default = "default_model_path")]
    pub path: String,
}

/// Synthetic dataset generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Number of samples to draw (skipped samples are not replaced).
    #[serde(default = "default_samples")]
    pub samples: usize,

    /// RNG seed. `None` seeds from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,

    /// CSV output path.
    #[serde(default = "default_dataset_path")]
    pub output_path: String,

    /// Log a progress line every N samples.
    #[serde(default = "default_progress_every")]
    pub progress_every: usize,

    /// Lowest bankroll drawn for a sample (whole dollars).
    #[serde(default = "default_bankroll_min")]
    pub bankroll_min: u64,

    /// Highest bankroll drawn for a sample (whole dollars).
    #[serde(default = "default_bankroll_max")]
    pub bankroll_max: u64,

    /// Lowest total print run of a synthetic game.
    #[serde(default = "default_min_total_tickets")]
    pub min_total_tickets: u64,

    /// Highest total print run of a synthetic game.
    #[serde(default = "default_max_total_tickets")]
    pub max_total_tickets: u64,

    /// Ticket prices to choose from.
    #[serde(default = "default_ticket_prices")]
    pub ticket_prices: Vec<f64>,

    /// Top-prize multiples of the ticket price to choose from.
    #[serde(default = "default_value_multipliers")]
    pub value_multipliers: Vec<f64>,

    /// Fewest prize tiers per game.
    #[serde(default = "default_min_tiers")]
    pub min_tiers: usize,

    /// Most prize tiers per game.
    #[serde(default = "default_max_tiers")]
    pub max_tiers: usize,

    /// Upper bound on the fraction of the print run already sold.
    #[serde(default = "default_max_sold_fraction")]
    pub max_sold_fraction: f64,
}

/// Fill-ratio based ticket estimation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimationConfig {
    /// Multiplier applied to `fill_ratio * total_tickets` for packing density.
    #[serde(default = "default_correction_factor")]
    pub correction_factor: f64,
}

/// JSONL analysis journal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Journal directory. Empty means `<repo root>/ANALYSES`.
    #[serde(default)]
    pub dir: String,
}

// ── Defaults ──────────────────────────────────────────────────────────

fn default_true() -> bool {
    true
}

fn default_model_path() -> String {
    "vireo_core_model.json".into()
}

fn default_samples() -> usize {
    5000
}
fn default_dataset_path() -> String {
    "synthetic_training_data.csv".into()
}
fn default_progress_every() -> usize {
    500
}
fn default_bankroll_min() -> u64 {
    100
}
fn default_bankroll_max() -> u64 {
    5000
}
fn default_min_total_tickets() -> u64 {
    500
}
fn default_max_total_tickets() -> u64 {
    5000
}
fn default_ticket_prices() -> Vec<f64> {
    vec![1.0, 2.0, 5.0]
}
fn default_value_multipliers() -> Vec<f64> {
    vec![5.0, 10.0, 25.0, 50.0, 100.0, 250.0]
}
fn default_min_tiers() -> usize {
    3
}
fn default_max_tiers() -> usize {
    6
}
fn default_max_sold_fraction() -> f64 {
    0.95
}

fn default_correction_factor() -> f64 {
    0.98
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            samples: default_samples(),
            seed: None,
            output_path: default_dataset_path(),
            progress_every: default_progress_every(),
            bankroll_min: default_bankroll_min(),
            bankroll_max: default_bankroll_max(),
            min_total_tickets: default_min_total_tickets(),
            max_total_tickets: default_max_total_tickets(),
            ticket_prices: default_ticket_prices(),
            value_multipliers: default_value_multipliers(),
            min_tiers: default_min_tiers(),
            max_tiers: default_max_tiers(),
            max_sold_fraction: default_max_sold_fraction(),
        }
    }
}

impl Default for EstimationConfig {
    fn default() -> Self {
        Self {
            correction_factor: default_correction_factor(),
        }
    }
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            dir: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.model.path, "vireo_core_model.json");
        assert_eq!(config.generation.samples, 5000);
        assert_eq!(config.generation.ticket_prices, vec![1.0, 2.0, 5.0]);
        assert!((config.estimation.correction_factor - 0.98).abs() < 1e-12);
        assert!(config.journal.enabled);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"generation": {"samples": 10, "seed": 7}}"#).unwrap();
        assert_eq!(config.generation.samples, 10);
        assert_eq!(config.generation.seed, Some(7));
        assert_eq!(config.generation.max_tiers, 6);
        assert_eq!(config.generation.output_path, "synthetic_training_data.csv");
    }
}
