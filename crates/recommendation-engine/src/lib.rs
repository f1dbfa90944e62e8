pub mod engine;
pub mod model;
pub mod tree;
pub mod types;

pub use engine::RecommendationEngine;
pub use model::{Classifier, ModelHandle, ModelLoadError, ModelState, PredictionError};
pub use tree::TreeEnsemble;
pub use types::*;
