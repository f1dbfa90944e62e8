//! Agreement of a classifier with the expert labels in a corpus.

use std::collections::BTreeMap;

use common::Recommendation;
use recommendation_engine::Classifier;
use serde::Serialize;
use tracing::warn;

use crate::dataset::TrainingRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LabelStats {
    /// Rows whose expert label is this class.
    pub support: usize,
    /// Of those, rows the classifier also assigned to this class.
    pub hits: usize,
    /// Rows the classifier assigned to this class.
    pub predicted: usize,
}

impl LabelStats {
    pub fn recall(&self) -> Option<f64> {
        (self.support > 0).then(|| self.hits as f64 / self.support as f64)
    }

    pub fn precision(&self) -> Option<f64> {
        (self.predicted > 0).then(|| self.hits as f64 / self.predicted as f64)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EvaluationReport {
    pub total: usize,
    pub agreed: usize,
    /// Rows the classifier refused to predict.
    pub failures: usize,
    pub per_label: BTreeMap<Recommendation, LabelStats>,
}

impl EvaluationReport {
    pub fn agreement(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.agreed as f64 / self.total as f64
    }
}

pub fn evaluate(model: &dyn Classifier, records: &[TrainingRecord]) -> EvaluationReport {
    let mut report = EvaluationReport {
        total: records.len(),
        ..Default::default()
    };

    for record in records {
        let expected = record.recommendation;
        report.per_label.entry(expected).or_default().support += 1;

        match model.predict(&record.features.to_array()) {
            Ok(predicted) => {
                report.per_label.entry(predicted).or_default().predicted += 1;
                if predicted == expected {
                    report.agreed += 1;
                    report.per_label.entry(expected).or_default().hits += 1;
                }
            }
            Err(e) => {
                warn!("Prediction failed during evaluation: {}", e);
                report.failures += 1;
            }
        }
    }
    report
}
