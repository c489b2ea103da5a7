//! Win-probability estimation from historical feature win-rates.

use rust_decimal::Decimal;
use tracing::debug;

use super::closed_in_order;
use super::constants::{
    NEUTRAL_WIN_PROBABILITY, PROBABILITY_CEILING, PROBABILITY_FLOOR, RR_SIMILARITY, TWO,
};
use super::precision::{percentage, round2, safe_divide};
use crate::trade::TradeRecord;

/// Closed history required before the predictor trusts itself.
const MIN_HISTORY: usize = 10;
/// Matching trades required before a feature contributes at full weight.
const MIN_FEATURE_MATCHES: usize = 3;

/// One conditioning feature: a matcher over (candidate, historical trade)
/// and its weight in the blended estimate.
struct Feature {
    name: &'static str,
    weight: Decimal,
    matches: fn(&TradeRecord, &TradeRecord) -> bool,
}

const FEATURES: [Feature; 6] = [
    Feature {
        name: "asset",
        weight: Decimal::from_parts(25, 0, 0, false, 2),
        matches: same_asset,
    },
    Feature {
        name: "trade_type",
        weight: Decimal::from_parts(20, 0, 0, false, 2),
        matches: same_trade_type,
    },
    Feature {
        name: "market_condition",
        weight: Decimal::from_parts(15, 0, 0, false, 2),
        matches: same_market_condition,
    },
    Feature {
        name: "direction",
        weight: Decimal::from_parts(15, 0, 0, false, 2),
        matches: same_direction,
    },
    Feature {
        name: "planned_rr",
        weight: Decimal::from_parts(15, 0, 0, false, 2),
        matches: similar_planned_rr,
    },
    Feature {
        name: "entry_hour",
        weight: Decimal::from_parts(10, 0, 0, false, 2),
        matches: similar_entry_hour,
    },
];

fn same_asset(candidate: &TradeRecord, past: &TradeRecord) -> bool {
    !candidate.asset.is_empty() && candidate.asset == past.asset
}

fn same_trade_type(candidate: &TradeRecord, past: &TradeRecord) -> bool {
    candidate
        .trade_type
        .zip(past.trade_type)
        .is_some_and(|(a, b)| a == b)
}

fn same_market_condition(candidate: &TradeRecord, past: &TradeRecord) -> bool {
    candidate
        .market_condition
        .zip(past.market_condition)
        .is_some_and(|(a, b)| a == b)
}

fn same_direction(candidate: &TradeRecord, past: &TradeRecord) -> bool {
    candidate.direction == past.direction
}

fn similar_planned_rr(candidate: &TradeRecord, past: &TradeRecord) -> bool {
    candidate
        .entry_risk_reward
        .zip(past.entry_risk_reward)
        .is_some_and(|(a, b)| (a - b).abs() <= RR_SIMILARITY)
}

fn similar_entry_hour(candidate: &TradeRecord, past: &TradeRecord) -> bool {
    candidate
        .entry_time
        .zip(past.entry_time)
        .is_some_and(|(a, b)| {
            use chrono::Timelike;
            let diff = a.hour().abs_diff(b.hour());
            diff.min(24 - diff) <= 1
        })
}

fn win_rate_of(trades: &[&TradeRecord]) -> Decimal {
    let wins = trades.iter().filter(|t| t.is_winner()).count();
    percentage(Decimal::from(wins as u64), Decimal::from(trades.len() as u64))
}

/// Estimate the candidate's win probability (0-100) from the closed history.
///
/// Each feature's conditional win rate contributes at its fixed weight when
/// at least [`MIN_FEATURE_MATCHES`] historical trades share the feature;
/// thinner features fall back to the overall win rate at half weight. The
/// blend is clamped to [15, 85]. Fewer than [`MIN_HISTORY`] closed trades
/// yields the neutral prior of 50.
#[must_use]
pub fn predict_win_probability(history: &[TradeRecord], candidate: &TradeRecord) -> Decimal {
    let closed = closed_in_order(history);
    if closed.len() < MIN_HISTORY {
        return NEUTRAL_WIN_PROBABILITY;
    }

    let overall = win_rate_of(&closed);
    let mut weighted_sum = Decimal::ZERO;
    let mut total_weight = Decimal::ZERO;

    for feature in &FEATURES {
        let matching: Vec<&TradeRecord> = closed
            .iter()
            .filter(|past| (feature.matches)(candidate, past))
            .copied()
            .collect();

        let (rate, weight) = if matching.len() >= MIN_FEATURE_MATCHES {
            (win_rate_of(&matching), feature.weight)
        } else {
            debug!(
                feature = feature.name,
                matches = matching.len(),
                "thin feature sample; substituting overall win rate at half weight"
            );
            (overall, feature.weight / TWO)
        };

        weighted_sum += rate * weight;
        total_weight += weight;
    }

    round2(
        safe_divide(weighted_sum, total_weight).clamp(PROBABILITY_FLOOR, PROBABILITY_CEILING),
    )
}
