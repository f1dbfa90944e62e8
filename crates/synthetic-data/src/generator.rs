//! Random game-state sampler and corpus writer.
//!
//! Mimics a scratch game part-way through its run: a print run is drawn, a
//! tiered prize table is built with values falling off by tier index, a share
//! of the run is sold, and each prize is independently claimed with the sold
//! fraction as probability. Every sample is labeled through the engine's
//! expert mode so the corpus matches production scoring exactly.

use std::collections::BTreeMap;
use std::io::Write;

use common::config::GenerationConfig;
use common::{FeatureRow, GameState, PrizeTier, Recommendation};
use rand::seq::SliceRandom;
use rand::Rng;
use recommendation_engine::{AnalysisError, AnalysisMode, RecommendationEngine};
use serde::Serialize;
use tracing::{debug, info};

use crate::dataset::{CorpusWriter, TrainingRecord};

/// Print-run slice that backs one guaranteed prize slot in the top tier.
const TICKETS_PER_PRIZE_SLOT: u64 = 500;

const SYNTHETIC_GAME_NAME: &str = "Synthetic Game";

#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    #[error("generation config has no {0} to choose from")]
    EmptyChoice(&'static str),
    #[error("generated game state is invalid: {0}")]
    InvalidGameState(#[from] common::Error),
    #[error("expert analysis failed: {0}")]
    Analysis(#[from] AnalysisError),
    #[error("metric {name} is not finite: {value}")]
    NonFiniteMetric { name: &'static str, value: f64 },
    #[error("generation config is unusable: {0}")]
    InvalidConfig(&'static str),
}

fn check_ranges(config: &GenerationConfig) -> Result<(), SampleError> {
    if config.min_total_tickets == 0 || config.min_total_tickets > config.max_total_tickets {
        return Err(SampleError::InvalidConfig("total ticket range"));
    }
    if config.min_tiers > config.max_tiers {
        return Err(SampleError::InvalidConfig("tier range"));
    }
    if config.bankroll_min > config.bankroll_max {
        return Err(SampleError::InvalidConfig("bankroll range"));
    }
    if !(0.0..1.0).contains(&config.max_sold_fraction) {
        return Err(SampleError::InvalidConfig("max_sold_fraction"));
    }
    Ok(())
}

/// Outcome of a corpus run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationReport {
    pub requested: usize,
    pub written: usize,
    pub skipped: usize,
    pub label_counts: BTreeMap<Recommendation, usize>,
}

/// Draw one random mid-run game.
pub fn random_game_state<R: Rng + ?Sized>(
    rng: &mut R,
    config: &GenerationConfig,
) -> Result<GameState, SampleError> {
    check_ranges(config)?;
    let total_tickets = rng.gen_range(config.min_total_tickets..=config.max_total_tickets);
    let ticket_price = *config
        .ticket_prices
        .choose(rng)
        .ok_or(SampleError::EmptyChoice("ticket_prices"))?;

    let num_tiers = rng.gen_range(config.min_tiers..=config.max_tiers);
    let mut prizes = Vec::with_capacity(num_tiers);
    for i in 0..num_tiers {
        let step = (i + 1) as u64;
        let multiplier = *config
            .value_multipliers
            .choose(rng)
            .ok_or(SampleError::EmptyChoice("value_multipliers"))?;
        let value = ticket_price * multiplier * (1.0 / step as f64);
        let max_count = (total_tickets / (TICKETS_PER_PRIZE_SLOT * step)).max(2);
        let count = rng.gen_range(1..=max_count);
        prizes.push(PrizeTier { count, value });
    }

    let max_sold = (total_tickets as f64 * config.max_sold_fraction) as u64;
    let tickets_sold = rng.gen_range(0..=max_sold);
    let tickets_remaining = total_tickets - tickets_sold;

    let claim_probability = tickets_sold as f64 / total_tickets as f64;
    for prize in &mut prizes {
        let claimed = (0..prize.count)
            .filter(|_| rng.gen_bool(claim_probability))
            .count() as u64;
        prize.count -= claimed;
    }

    Ok(GameState {
        game_name: SYNTHETIC_GAME_NAME.into(),
        ticket_price,
        tickets_remaining,
        prizes,
    })
}

/// Draw and label one sample.
pub fn generate_sample<R: Rng + ?Sized>(
    rng: &mut R,
    config: &GenerationConfig,
    engine: &RecommendationEngine,
) -> Result<TrainingRecord, SampleError> {
    let game = random_game_state(rng, config)?;
    game.validate()?;
    let user_bankroll = rng.gen_range(config.bankroll_min..=config.bankroll_max) as f64;

    let report = engine.analyze(&game, user_bankroll, AnalysisMode::Expert)?;
    let features = FeatureRow::new(&report.metrics, user_bankroll);
    for (name, value) in common::FEATURE_ORDER.iter().zip(features.to_array()) {
        if !value.is_finite() {
            return Err(SampleError::NonFiniteMetric { name: *name, value });
        }
    }

    Ok(TrainingRecord {
        features,
        recommendation: report.recommendation,
    })
}

/// Generate `config.samples` labeled rows into `out` as CSV.
///
/// Samples that fail are skipped and counted; only I/O errors abort the run.
pub fn generate_dataset<R: Rng + ?Sized, W: Write>(
    rng: &mut R,
    config: &GenerationConfig,
    out: W,
) -> common::Result<GenerationReport> {
    let engine = RecommendationEngine::expert_only();
    let mut report = GenerationReport {
        requested: config.samples,
        ..Default::default()
    };

    let mut writer = CorpusWriter::new(out)?;
    for i in 0..config.samples {
        match generate_sample(rng, config, &engine) {
            Ok(record) => {
                writer.write(&record)?;
                *report.label_counts.entry(record.recommendation).or_insert(0) += 1;
                report.written += 1;
            }
            Err(e) => {
                debug!("Skipping sample {}: {}", i, e);
                report.skipped += 1;
            }
        }

        if config.progress_every > 0 && (i + 1) % config.progress_every == 0 {
            info!("Generated {}/{} samples...", i + 1, config.samples);
        }
    }
    writer.flush()?;

    info!(
        "Synthetic data generation complete: {} written, {} skipped",
        report.written, report.skipped
    );
    Ok(report)
}
