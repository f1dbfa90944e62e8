//! Trained-model holder and the classifier capability it exposes.
//!
//! The artifact is resolved once at startup and handed to the engine as an
//! optional shared handle. A missing or broken artifact is a degraded state,
//! not a startup failure.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use common::{Recommendation, FEATURE_COUNT};
use tracing::{error, info, warn};

use crate::tree::TreeEnsemble;

/// Anything that maps one feature row (in `FEATURE_ORDER`) to one label.
pub trait Classifier: Send + Sync {
    fn predict(&self, features: &[f64; FEATURE_COUNT]) -> Result<Recommendation, PredictionError>;
}

/// Shared read-only classifier handle.
pub type ModelHandle = Arc<dyn Classifier>;

#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    #[error("feature {name} is not finite: {value}")]
    NonFiniteFeature { name: &'static str, value: f64 },
    #[error("{0}")]
    Backend(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ModelLoadError {
    #[error("failed to read artifact: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse artifact: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("artifact rejected: {0}")]
    Invalid(String),
}

/// Terminal outcome of the one-time artifact load.
pub enum ModelState {
    Loaded(ModelHandle),
    NotFound(PathBuf),
    LoadError { path: PathBuf, reason: String },
}

impl ModelState {
    /// Try to load a tree-ensemble artifact. Never fails; inspect the variant.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            warn!(
                "Model artifact '{}' not found; model-mode analysis is unavailable",
                path.display()
            );
            return Self::NotFound(path.to_path_buf());
        }

        match TreeEnsemble::from_path(path) {
            Ok(model) => {
                info!(
                    "Loaded model artifact '{}' ({} trees, {} classes)",
                    path.display(),
                    model.tree_count(),
                    model.class_count()
                );
                Self::Loaded(Arc::new(model))
            }
            Err(e) => {
                error!("Could not load model artifact '{}': {}", path.display(), e);
                Self::LoadError {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                }
            }
        }
    }

    pub fn handle(&self) -> Option<ModelHandle> {
        match self {
            Self::Loaded(model) => Some(Arc::clone(model)),
            _ => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    pub fn status_label(&self) -> &'static str {
        match self {
            Self::Loaded(_) => "loaded",
            Self::NotFound(_) => "not_found",
            Self::LoadError { .. } => "load_error",
        }
    }
}

impl fmt::Debug for ModelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loaded(_) => f.write_str("Loaded(..)"),
            Self::NotFound(path) => f.debug_tuple("NotFound").field(path).finish(),
            Self::LoadError { path, reason } => f
                .debug_struct("LoadError")
                .field("path", path)
                .field("reason", reason)
                .finish(),
        }
    }
}
