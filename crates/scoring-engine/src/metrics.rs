//! Prize-table metrics.
//!
//! Each metric has a defined floor for its degenerate input (no tickets left,
//! no prizes left, free tickets) so none of these functions can fail.

use common::{GameState, Metrics, PrizeTier};

/// Expected payout per ticket minus the ticket price.
///
/// With no tickets left the game holds no value for a buyer, so the result
/// is `-ticket_price`.
pub fn net_ev(prizes: &[PrizeTier], tickets_remaining: u64, ticket_price: f64) -> f64 {
    if tickets_remaining == 0 {
        return -ticket_price;
    }
    let total_prize_value: f64 = prizes.iter().map(|p| p.count as f64 * p.value).sum();
    total_prize_value / tickets_remaining as f64 - ticket_price
}

/// Population standard deviation of the individual remaining prize values.
///
/// Each tier contributes its value `count` times. Empty tables and tables
/// holding a single distinct value are exactly `0.0`.
pub fn volatility(prizes: &[PrizeTier]) -> f64 {
    let mut live = prizes.iter().filter(|p| p.count > 0);
    let Some(first) = live.next() else {
        return 0.0;
    };
    if live.all(|p| p.value == first.value) {
        return 0.0;
    }

    let n: f64 = prizes.iter().map(|p| p.count as f64).sum();
    let mean = prizes.iter().map(|p| p.count as f64 * p.value).sum::<f64>() / n;
    let variance = prizes
        .iter()
        .map(|p| {
            let d = p.value - mean;
            p.count as f64 * d * d
        })
        .sum::<f64>()
        / n;
    variance.sqrt()
}

/// Net EV per dollar of ticket price; `0.0` for free or negatively priced tickets.
pub fn efficiency(net_ev: f64, ticket_price: f64) -> f64 {
    if ticket_price <= 0.0 {
        return 0.0;
    }
    net_ev / ticket_price
}

/// Cost of buying out every remaining ticket.
pub fn capital_required(tickets_remaining: u64, ticket_price: f64) -> f64 {
    tickets_remaining as f64 * ticket_price
}

/// Derive all four metrics for a game, ignoring exhausted tiers.
pub fn compute_metrics(game: &GameState) -> Metrics {
    let prizes = game.active_prizes();
    let net_ev = net_ev(&prizes, game.tickets_remaining, game.ticket_price);
    Metrics {
        net_ev,
        volatility: volatility(&prizes),
        efficiency: efficiency(net_ev, game.ticket_price),
        capital_required: capital_required(game.tickets_remaining, game.ticket_price),
    }
}
