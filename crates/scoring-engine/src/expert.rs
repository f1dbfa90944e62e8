//! Expert recommendation heuristic.
//!
//! Used directly in expert mode and as the labeling function for the
//! synthetic training corpus. The learned model is trained to reproduce these
//! exact constants, so they must not drift.

use common::{Metrics, Recommendation};
use serde::Serialize;

const SUB_SCORE_MAX: f64 = 10.0;
const EV_LOG_BASE: f64 = 1.5;

const EV_WEIGHT: f64 = 0.5;
const EFFICIENCY_WEIGHT: f64 = 0.3;
const BANKROLL_WEIGHT: f64 = 0.2;

const PRIME_THRESHOLD: f64 = 80.0;
const STRATEGIC_THRESHOLD: f64 = 60.0;
const PLAYABLE_THRESHOLD: f64 = 40.0;
const MONITOR_THRESHOLD: f64 = 20.0;

/// Full breakdown of an expert evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExpertScore {
    pub ev_score: f64,
    pub efficiency_score: f64,
    pub bankroll_score: f64,
    /// Weighted composite in `[0, 100]`.
    pub vi_score: f64,
    pub recommendation: Recommendation,
}

/// Logarithmic reward for positive EV, saturating at 10.
pub fn ev_score(net_ev: f64) -> f64 {
    if net_ev <= 0.0 {
        return 0.0;
    }
    ((1.0 + net_ev * 10.0).ln() / EV_LOG_BASE.ln()).min(SUB_SCORE_MAX)
}

/// Linear reward for EV per dollar, saturating at efficiency 0.5.
pub fn efficiency_score(efficiency: f64) -> f64 {
    if efficiency <= 0.0 {
        return 0.0;
    }
    (efficiency * 20.0).min(SUB_SCORE_MAX)
}

/// Reward for needing a small share of the bankroll to buy out the game.
///
/// Zero when the bankroll is empty or cannot cover the full buyout.
pub fn bankroll_score(capital_required: f64, bankroll: f64) -> f64 {
    if bankroll <= 0.0 {
        return 0.0;
    }
    let ratio = capital_required / bankroll;
    if ratio > 1.0 {
        return 0.0;
    }
    (1.0 - ratio) * SUB_SCORE_MAX
}

/// Evaluate metrics against a bankroll, returning every intermediate score.
pub fn score(metrics: &Metrics, bankroll: f64) -> ExpertScore {
    let ev_score = ev_score(metrics.net_ev);
    let efficiency_score = efficiency_score(metrics.efficiency);
    let bankroll_score = bankroll_score(metrics.capital_required, bankroll);

    let vi_score = (ev_score * EV_WEIGHT
        + efficiency_score * EFFICIENCY_WEIGHT
        + bankroll_score * BANKROLL_WEIGHT)
        * 10.0;

    ExpertScore {
        ev_score,
        efficiency_score,
        bankroll_score,
        vi_score,
        recommendation: classify(vi_score, metrics),
    }
}

/// The expert label alone.
pub fn expert_recommendation(metrics: &Metrics, bankroll: f64) -> Recommendation {
    score(metrics, bankroll).recommendation
}

// First matching threshold wins.
fn classify(vi_score: f64, metrics: &Metrics) -> Recommendation {
    if vi_score >= PRIME_THRESHOLD {
        Recommendation::PrimeOpportunity
    } else if vi_score >= STRATEGIC_THRESHOLD {
        Recommendation::StrategicBuy
    } else if vi_score >= PLAYABLE_THRESHOLD {
        if metrics.volatility > (metrics.net_ev + 1.0) * 20.0 && metrics.net_ev > 0.0 {
            Recommendation::LottoPlay
        } else {
            Recommendation::LowRiskGrind
        }
    } else if vi_score > MONITOR_THRESHOLD {
        Recommendation::Monitor
    } else {
        Recommendation::Avoid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::compute_metrics;
    use common::{GameState, PrizeTier};

    fn make_metrics(net_ev: f64, volatility: f64, efficiency: f64, capital_required: f64) -> Metrics {
        Metrics {
            net_ev,
            volatility,
            efficiency,
            capital_required,
        }
    }

    #[test]
    fn test_sub_scores_clamp_to_ten() {
        assert_eq!(ev_score(1_000.0), 10.0);
        assert_eq!(efficiency_score(0.5), 10.0);
        assert_eq!(efficiency_score(3.0), 10.0);
        assert_eq!(bankroll_score(0.0, 100.0), 10.0);
    }

    #[test]
    fn test_sub_scores_zero_floor() {
        assert_eq!(ev_score(0.0), 0.0);
        assert_eq!(ev_score(-3.0), 0.0);
        assert_eq!(efficiency_score(0.0), 0.0);
        assert_eq!(efficiency_score(-0.2), 0.0);
        assert_eq!(bankroll_score(100.0, 0.0), 0.0);
        assert_eq!(bankroll_score(100.0, -50.0), 0.0);
    }

    #[test]
    fn test_ev_score_is_log_base_one_point_five() {
        // log_1.5(1 + 0.5 * 10) = log_1.5(6)
        let expected = 6f64.ln() / 1.5f64.ln();
        assert!((ev_score(0.5) - expected).abs() < 1e-12);
        // 1 + 0.05 * 10 = 1.5 → exactly one.
        assert!((ev_score(0.05) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_bankroll_score_zero_when_unaffordable() {
        for bankroll in [1.0, 99.0, 500.0, 4_999.99] {
            assert_eq!(
                bankroll_score(5_000.0, bankroll),
                0.0,
                "bankroll={} cannot cover 5000",
                bankroll
            );
        }
        assert_eq!(bankroll_score(5_000.0, 5_000.0), 0.0);
        assert!((bankroll_score(1_000.0, 10_000.0) - 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_score_is_deterministic() {
        let metrics = make_metrics(0.7, 55.0, 0.35, 1_200.0);
        let a = score(&metrics, 3_000.0);
        let b = score(&metrics, 3_000.0);
        assert_eq!(a, b);
        assert_eq!(expert_recommendation(&metrics, 3_000.0), a.recommendation);
    }

    #[test]
    fn test_vi_score_exactly_80_is_prime() {
        // ev_score = 10, efficiency_score = 10, bankroll_score = 0 → (5 + 3) * 10
        let metrics = make_metrics(100.0, 0.0, 0.5, 10_000.0);
        let result = score(&metrics, 100.0);
        assert_eq!(result.vi_score, 80.0);
        assert_eq!(result.recommendation, Recommendation::PrimeOpportunity);
    }

    #[test]
    fn test_vi_score_just_below_80_is_strategic() {
        let metrics = make_metrics(100.0, 0.0, 0.49999, 10_000.0);
        let result = score(&metrics, 100.0);
        assert!(
            result.vi_score < 80.0 && result.vi_score > 79.99,
            "vi_score={}",
            result.vi_score
        );
        assert_eq!(result.recommendation, Recommendation::StrategicBuy);
    }

    #[test]
    fn test_high_volatility_mid_score_is_lotto_play() {
        // ev_score ≈ 5.914, efficiency_score = 2, bankroll_score = 9 → vi ≈ 53.6
        let metrics = make_metrics(1.0, 100.0, 0.1, 1_000.0);
        let result = score(&metrics, 10_000.0);
        assert!(
            (40.0..60.0).contains(&result.vi_score),
            "vi_score={}",
            result.vi_score
        );
        assert_eq!(result.recommendation, Recommendation::LottoPlay);
    }

    #[test]
    fn test_low_volatility_mid_score_is_low_risk_grind() {
        // Volatility 10 is not above (1 + 1) * 20 = 40.
        let metrics = make_metrics(1.0, 10.0, 0.1, 1_000.0);
        assert_eq!(
            expert_recommendation(&metrics, 10_000.0),
            Recommendation::LowRiskGrind
        );
    }

    #[test]
    fn test_mid_low_score_is_monitor() {
        // ev ≈ 2.21, efficiency 0.3, bankroll 1.0 → vi ≈ 35.1
        let metrics = make_metrics(0.5, 0.0, 0.05, 5_000.0);
        let result = score(&metrics, 10_000.0);
        assert!(
            result.vi_score > 20.0 && result.vi_score < 40.0,
            "vi_score={}",
            result.vi_score
        );
        assert_eq!(result.recommendation, Recommendation::Monitor);
    }

    #[test]
    fn test_bankroll_alone_caps_at_avoid() {
        // No EV, no efficiency: the best bankroll score contributes exactly 20.
        let metrics = make_metrics(0.0, 0.0, 0.0, 0.0);
        let result = score(&metrics, 1_000.0);
        assert_eq!(result.vi_score, 20.0);
        assert_eq!(result.recommendation, Recommendation::Avoid);
    }

    #[test]
    fn test_golden_treasures_is_avoid() {
        let game = GameState {
            game_name: "Golden Treasures".into(),
            ticket_price: 2.0,
            tickets_remaining: 2500,
            prizes: vec![
                PrizeTier { count: 4, value: 500.0 },
                PrizeTier { count: 10, value: 100.0 },
                PrizeTier { count: 50, value: 20.0 },
                PrizeTier { count: 200, value: 5.0 },
            ],
        };
        let metrics = compute_metrics(&game);
        let result = score(&metrics, 5_000.0);
        assert_eq!(result.ev_score, 0.0);
        assert_eq!(result.efficiency_score, 0.0);
        assert_eq!(result.bankroll_score, 0.0);
        assert_eq!(result.vi_score, 0.0);
        assert_eq!(result.recommendation, Recommendation::Avoid);
    }
}
