use common::{FeatureRow, GameState};
use scoring_engine::{compute_metrics, expert_recommendation};

use crate::model::{ModelHandle, ModelState};
use crate::types::{AnalysisError, AnalysisMode, AnalysisReport};

/// Mode-dispatching front door of the scoring core.
///
/// Holds an optional classifier handle fixed at construction. The engine is
/// `Send + Sync` and carries no mutable state, so one instance can serve
/// concurrent callers.
#[derive(Clone, Default)]
pub struct RecommendationEngine {
    model: Option<ModelHandle>,
}

impl RecommendationEngine {
    pub fn new(model: Option<ModelHandle>) -> Self {
        Self { model }
    }

    /// Expert mode only; model-mode calls report `ModelUnavailable`.
    pub fn expert_only() -> Self {
        Self { model: None }
    }

    pub fn from_state(state: &ModelState) -> Self {
        Self::new(state.handle())
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    pub fn analyze(
        &self,
        game: &GameState,
        bankroll: f64,
        mode: AnalysisMode,
    ) -> Result<AnalysisReport, AnalysisError> {
        let metrics = compute_metrics(game);

        match mode {
            AnalysisMode::Expert => {
                let recommendation = expert_recommendation(&metrics, bankroll);
                Ok(AnalysisReport {
                    recommendation,
                    summary: format!(
                        "Expert analysis determined this is a '{}' opportunity.",
                        recommendation
                    ),
                    metrics,
                })
            }
            AnalysisMode::Model => {
                let model = self.model.as_ref().ok_or(AnalysisError::ModelUnavailable)?;
                let features = FeatureRow::new(&metrics, bankroll);
                let recommendation = model.predict(&features.to_array())?;
                Ok(AnalysisReport {
                    recommendation,
                    summary: format!(
                        "Vireo AI Core analysis for '{}': The model classifies this as a '{}' opportunity.",
                        game.game_name, recommendation
                    ),
                    metrics,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Classifier, PredictionError};
    use crate::types::AnalysisResponse;
    use common::{PrizeTier, Recommendation, FEATURE_COUNT};
    use std::sync::{Arc, Mutex};

    /// Always answers with a fixed label and remembers the last row it saw.
    struct FixedClassifier {
        label: Recommendation,
        last_row: Mutex<Option<[f64; FEATURE_COUNT]>>,
    }

    impl FixedClassifier {
        fn new(label: Recommendation) -> Arc<Self> {
            Arc::new(Self {
                label,
                last_row: Mutex::new(None),
            })
        }
    }

    impl Classifier for FixedClassifier {
        fn predict(
            &self,
            features: &[f64; FEATURE_COUNT],
        ) -> Result<Recommendation, PredictionError> {
            *self.last_row.lock().unwrap() = Some(*features);
            Ok(self.label)
        }
    }

    struct FailingClassifier;

    impl Classifier for FailingClassifier {
        fn predict(&self, _: &[f64; FEATURE_COUNT]) -> Result<Recommendation, PredictionError> {
            Err(PredictionError::Backend("boom".into()))
        }
    }

    fn make_game() -> GameState {
        GameState {
            game_name: "Golden Treasures".into(),
            ticket_price: 2.0,
            tickets_remaining: 2500,
            prizes: vec![
                PrizeTier { count: 4, value: 500.0 },
                PrizeTier { count: 10, value: 100.0 },
                PrizeTier { count: 0, value: 10_000.0 },
                PrizeTier { count: 50, value: 20.0 },
                PrizeTier { count: 200, value: 5.0 },
            ],
        }
    }

    #[test]
    fn test_expert_mode_golden_treasures() {
        let engine = RecommendationEngine::expert_only();
        let report = engine
            .analyze(&make_game(), 5_000.0, AnalysisMode::Expert)
            .unwrap();
        assert_eq!(report.recommendation, Recommendation::Avoid);
        assert_eq!(
            report.summary,
            "Expert analysis determined this is a 'AVOID' opportunity."
        );
    }

    #[test]
    fn test_model_mode_without_artifact_is_structured_error() {
        let engine = RecommendationEngine::expert_only();
        let result = engine.analyze(&make_game(), 5_000.0, AnalysisMode::Model);
        assert!(matches!(result, Err(AnalysisError::ModelUnavailable)));

        let response = AnalysisResponse::from(result);
        assert!(response.is_failure());
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"error": "AI model is not loaded. Cannot perform analysis."})
        );
    }

    #[test]
    fn test_model_mode_from_missing_state_degrades() {
        let state = ModelState::NotFound("nowhere.json".into());
        let engine = RecommendationEngine::from_state(&state);
        assert!(!engine.has_model());
        assert!(engine
            .analyze(&make_game(), 100.0, AnalysisMode::default())
            .is_err());
    }

    #[test]
    fn test_model_mode_uses_classifier_label_and_feature_order() {
        let classifier = FixedClassifier::new(Recommendation::LottoPlay);
        let engine = RecommendationEngine::new(Some(classifier.clone() as ModelHandle));
        let report = engine
            .analyze(&make_game(), 750.0, AnalysisMode::Model)
            .unwrap();

        assert_eq!(report.recommendation, Recommendation::LottoPlay);
        assert_eq!(
            report.summary,
            "Vireo AI Core analysis for 'Golden Treasures': The model classifies this as a 'LOTTO_PLAY' opportunity."
        );

        let row = classifier
            .last_row
            .lock()
            .unwrap()
            .take()
            .expect("classifier called");
        let m = report.metrics;
        assert_eq!(
            row,
            [m.net_ev, m.volatility, m.efficiency, m.capital_required, 750.0]
        );
    }

    #[test]
    fn test_both_modes_report_calculator_metrics() {
        let game = make_game();
        let direct = compute_metrics(&game);
        let classifier: ModelHandle = FixedClassifier::new(Recommendation::Monitor);
        let engine = RecommendationEngine::new(Some(classifier));

        let expert = engine.analyze(&game, 1_000.0, AnalysisMode::Expert).unwrap();
        let model = engine.analyze(&game, 1_000.0, AnalysisMode::Model).unwrap();
        assert_eq!(expert.metrics, direct);
        assert_eq!(model.metrics, direct);
    }

    #[test]
    fn test_prediction_failure_is_reported_not_panicked() {
        let engine = RecommendationEngine::new(Some(Arc::new(FailingClassifier) as ModelHandle));
        let result = engine.analyze(&make_game(), 1_000.0, AnalysisMode::Model);
        assert!(matches!(result, Err(AnalysisError::Prediction(_))));
        let response = AnalysisResponse::from(result);
        assert!(response.is_failure());
    }

    #[test]
    fn test_report_serializes_boundary_shape() {
        let engine = RecommendationEngine::expert_only();
        let response: AnalysisResponse = engine
            .analyze(&make_game(), 5_000.0, AnalysisMode::Expert)
            .into();
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["recommendation"], "AVOID");
        assert_eq!(json["metrics"]["net_ev"], 0.0);
        assert_eq!(json["metrics"]["capital_required"], 5000.0);
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_mode_selector() {
        assert_eq!(AnalysisMode::from_selector("expert"), AnalysisMode::Expert);
        assert_eq!(AnalysisMode::from_selector(" EXPERT "), AnalysisMode::Expert);
        assert_eq!(AnalysisMode::from_selector("ai"), AnalysisMode::Model);
        assert_eq!(AnalysisMode::from_selector(""), AnalysisMode::Model);
        assert_eq!(AnalysisMode::default(), AnalysisMode::Model);
    }

    #[test]
    fn test_engine_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RecommendationEngine>();
    }
}
