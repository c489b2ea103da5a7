//! Generic grouped aggregation over closed trades.
//!
//! One group/aggregate/rank/describe engine serves every categorical
//! dimension (conviction, emotion, weekday, duration, trade type, market
//! condition, entry hour); the dimension modules only supply a
//! key-extraction closure.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::closed_in_order;
use super::format::{format_currency, format_pct};
use super::precision::{percentage, round2, safe_divide};
use crate::trade::TradeRecord;

/// Buckets below this sample size are still reported but carry no weight in
/// insight text.
pub(crate) const MIN_SAMPLE: u64 = 3;

/// Sort position and display label for one bucket of a dimension.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct BucketKey {
    /// Position in the dimension's natural order.
    pub order: u32,
    /// Display label.
    pub label: String,
}

impl BucketKey {
    /// Build a key.
    pub fn new(order: u32, label: impl Into<String>) -> Self {
        Self {
            order,
            label: label.into(),
        }
    }
}

/// Aggregates for one bucket of a dimension.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryStats {
    /// Bucket label.
    pub label: String,
    /// Closed trades in the bucket.
    pub count: u64,
    /// Win rate within the bucket (0-100).
    pub win_rate: Decimal,
    /// Mean P&L within the bucket.
    pub average_pnl: Decimal,
    /// Total P&L within the bucket.
    pub total_pnl: Decimal,
}

/// One dimension's buckets plus generated insight text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakdownReport {
    /// Dimension name ("conviction", "weekday", ...).
    pub dimension: String,
    /// Non-empty buckets in the dimension's natural order.
    pub buckets: Vec<CategoryStats>,
    /// Natural-language summary of the strongest buckets.
    pub insight: String,
}

/// Group closed trades by `key_fn`, aggregate each bucket, and describe the
/// best performers. Trades for which `key_fn` returns `None` are excluded
/// from this dimension only.
pub fn breakdown_by<F>(dimension: &str, trades: &[TradeRecord], key_fn: F) -> BreakdownReport
where
    F: Fn(&TradeRecord) -> Option<BucketKey>,
{
    #[derive(Default)]
    struct Acc {
        count: u64,
        wins: u64,
        total: Decimal,
    }

    let mut groups: BTreeMap<BucketKey, Acc> = BTreeMap::new();
    for trade in closed_in_order(trades) {
        let Some(pnl) = trade.pnl else { continue };
        let Some(key) = key_fn(trade) else { continue };
        let acc = groups.entry(key).or_default();
        acc.count += 1;
        acc.total += pnl;
        if pnl > Decimal::ZERO {
            acc.wins += 1;
        }
    }

    let buckets: Vec<CategoryStats> = groups
        .into_iter()
        .map(|(key, acc)| CategoryStats {
            label: key.label,
            count: acc.count,
            win_rate: percentage(Decimal::from(acc.wins), Decimal::from(acc.count)),
            average_pnl: round2(safe_divide(acc.total, Decimal::from(acc.count))),
            total_pnl: round2(acc.total),
        })
        .collect();

    let insight = describe(dimension, &buckets);
    BreakdownReport {
        dimension: dimension.to_string(),
        buckets,
        insight,
    }
}

/// Name the best bucket by win rate and by average P&L; they may differ.
fn describe(dimension: &str, buckets: &[CategoryStats]) -> String {
    let significant: Vec<&CategoryStats> =
        buckets.iter().filter(|b| b.count >= MIN_SAMPLE).collect();
    if significant.is_empty() {
        return format!("Not enough trades per {dimension} bucket to draw conclusions.");
    }

    // First bucket in natural order wins ties
    let mut best_win_rate = significant[0];
    let mut best_average = significant[0];
    for bucket in &significant[1..] {
        if bucket.win_rate > best_win_rate.win_rate {
            best_win_rate = bucket;
        }
        if bucket.average_pnl > best_average.average_pnl {
            best_average = bucket;
        }
    }

    if best_win_rate.label == best_average.label {
        format!(
            "Best {dimension} bucket: {} ({} win rate, {} average PnL over {} trades).",
            best_win_rate.label,
            format_pct(best_win_rate.win_rate),
            format_currency(best_win_rate.average_pnl),
            best_win_rate.count,
        )
    } else {
        format!(
            "Best {dimension} win rate: {} at {}. Best average PnL: {} at {}.",
            best_win_rate.label,
            format_pct(best_win_rate.win_rate),
            best_average.label,
            format_currency(best_average.average_pnl),
        )
    }
}
