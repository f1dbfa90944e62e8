//! Domain types shared across the scoring, recommendation and dataset crates.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::Error;

// ── Game state ────────────────────────────────────────────────────────

/// Remaining unclaimed prizes of a single payout amount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PrizeTier {
    /// Prizes still unclaimed at this value.
    pub count: u64,
    /// Payout per prize, in dollars.
    pub value: f64,
}

/// Snapshot of a game's current economics.
///
/// Supplied by a caller (board scan or direct input) and consumed once per
/// analysis. The scoring core never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GameState {
    pub game_name: String,
    pub ticket_price: f64,
    pub tickets_remaining: u64,
    pub prizes: Vec<PrizeTier>,
}

impl GameState {
    /// Tiers that still hold at least one prize, in table order.
    pub fn active_prizes(&self) -> Vec<PrizeTier> {
        self.prizes.iter().copied().filter(|p| p.count > 0).collect()
    }

    /// Boundary check for externally supplied game states.
    ///
    /// The scoring functions assume these preconditions hold; callers that
    /// accept untrusted input should run this first.
    pub fn validate(&self) -> Result<(), Error> {
        let mut issues: Vec<String> = Vec::new();

        if self.game_name.trim().is_empty() {
            issues.push("game_name must not be empty".into());
        }
        if !self.ticket_price.is_finite() || self.ticket_price <= 0.0 {
            issues.push(format!(
                "ticket_price must be a finite number > 0 (got {})",
                self.ticket_price
            ));
        }
        for (i, tier) in self.prizes.iter().enumerate() {
            if !tier.value.is_finite() || tier.value < 0.0 {
                issues.push(format!(
                    "prizes[{}].value must be a finite number >= 0 (got {})",
                    i, tier.value
                ));
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(Error::InvalidGameState(issues.join("; ")))
        }
    }
}

// ── Derived metrics ───────────────────────────────────────────────────

/// The four scalar metrics derived from a game state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Expected payout per ticket minus the ticket price.
    pub net_ev: f64,
    /// Population standard deviation of the remaining prize values.
    pub volatility: f64,
    /// Net EV per dollar of ticket price.
    pub efficiency: f64,
    /// Cost of buying every remaining ticket.
    pub capital_required: f64,
}

/// Column names of the classifier feature row, in training order.
pub const FEATURE_ORDER: [&str; 5] = [
    "net_ev",
    "volatility",
    "efficiency",
    "capital_required",
    "user_bankroll",
];

/// Number of classifier input features.
pub const FEATURE_COUNT: usize = FEATURE_ORDER.len();

/// One classifier input row: the metrics plus the caller's bankroll.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub net_ev: f64,
    pub volatility: f64,
    pub efficiency: f64,
    pub capital_required: f64,
    pub user_bankroll: f64,
}

impl FeatureRow {
    pub fn new(metrics: &Metrics, user_bankroll: f64) -> Self {
        Self {
            net_ev: metrics.net_ev,
            volatility: metrics.volatility,
            efficiency: metrics.efficiency,
            capital_required: metrics.capital_required,
            user_bankroll,
        }
    }

    /// Values laid out in [`FEATURE_ORDER`].
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.net_ev,
            self.volatility,
            self.efficiency,
            self.capital_required,
            self.user_bankroll,
        ]
    }

    pub fn metrics(&self) -> Metrics {
        Metrics {
            net_ev: self.net_ev,
            volatility: self.volatility,
            efficiency: self.efficiency,
            capital_required: self.capital_required,
        }
    }
}

// ── Recommendation labels ─────────────────────────────────────────────

/// Ordinal recommendation tier, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    PrimeOpportunity,
    StrategicBuy,
    LottoPlay,
    LowRiskGrind,
    Monitor,
    Avoid,
}

impl Recommendation {
    pub const ALL: [Recommendation; 6] = [
        Recommendation::PrimeOpportunity,
        Recommendation::StrategicBuy,
        Recommendation::LottoPlay,
        Recommendation::LowRiskGrind,
        Recommendation::Monitor,
        Recommendation::Avoid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PrimeOpportunity => "PRIME_OPPORTUNITY",
            Self::StrategicBuy => "STRATEGIC_BUY",
            Self::LottoPlay => "LOTTO_PLAY",
            Self::LowRiskGrind => "LOW_RISK_GRIND",
            Self::Monitor => "MONITOR",
            Self::Avoid => "AVOID",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Recommendation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|r| r.as_str() == s.trim())
            .ok_or_else(|| Error::UnknownLabel(s.to_string()))
    }
}
