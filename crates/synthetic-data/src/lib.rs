//! Synthetic training corpus: random game states labeled by the expert scorer.

pub mod dataset;
pub mod evaluation;
pub mod generator;

pub use dataset::{read_records, CorpusWriter, TrainingRecord, CSV_COLUMNS};
pub use evaluation::{evaluate, EvaluationReport, LabelStats};
pub use generator::{generate_dataset, generate_sample, random_game_state, GenerationReport, SampleError};
