//! Scoring core: prize-table metrics and the expert recommendation heuristic.
//!
//! Everything here is pure and total over well-formed input. Nothing logs.

pub mod expert;
pub mod metrics;

pub use expert::{expert_recommendation, score, ExpertScore};
pub use metrics::compute_metrics;
