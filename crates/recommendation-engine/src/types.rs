use std::fmt;
use std::str::FromStr;

use common::{Metrics, Recommendation};
use serde::{Deserialize, Serialize};

use crate::model::PredictionError;

/// Which scoring path produces the recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    Expert,
    #[default]
    Model,
}

impl AnalysisMode {
    /// `"expert"` selects the heuristic; every other selector means the model.
    pub fn from_selector(selector: &str) -> Self {
        if selector.trim().eq_ignore_ascii_case("expert") {
            Self::Expert
        } else {
            Self::Model
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expert => "expert",
            Self::Model => "model",
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisMode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_selector(s))
    }
}

/// Successful analysis of one game state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub recommendation: Recommendation,
    pub summary: String,
    pub metrics: Metrics,
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("AI model is not loaded. Cannot perform analysis.")]
    ModelUnavailable,
    #[error("Model prediction failed: {0}")]
    Prediction(#[from] PredictionError),
}

/// Boundary shape of an analysis: the report, or `{"error": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisResponse {
    Report(AnalysisReport),
    Failure { error: String },
}

impl AnalysisResponse {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }
}

impl From<Result<AnalysisReport, AnalysisError>> for AnalysisResponse {
    fn from(result: Result<AnalysisReport, AnalysisError>) -> Self {
        match result {
            Ok(report) => Self::Report(report),
            Err(e) => Self::Failure {
                error: e.to_string(),
            },
        }
    }
}
