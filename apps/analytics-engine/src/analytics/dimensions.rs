//! The journal's categorical dimensions, built on the generic breakdown
//! engine, plus emotion-transition analysis.

use std::collections::BTreeMap;

use chrono::{Datelike, Timelike};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::breakdown::{BreakdownReport, BucketKey, MIN_SAMPLE, breakdown_by};
use super::closed_in_order;
use super::format::format_currency;
use super::precision::{percentage, round2, safe_divide};
use crate::trade::{EmotionLevel, TradeRecord};

/// Performance by conviction level (1-5).
#[must_use]
pub fn by_conviction(trades: &[TradeRecord]) -> BreakdownReport {
    breakdown_by("conviction", trades, |t| {
        t.conviction
            .map(|c| BucketKey::new(c.level().into(), c.label()))
    })
}

/// Performance by emotional state before entry.
#[must_use]
pub fn by_pre_trade_emotion(trades: &[TradeRecord]) -> BreakdownReport {
    breakdown_by("pre-trade emotion", trades, |t| {
        t.pre_trade_emotion
            .map(|e| BucketKey::new(e.level().into(), e.label()))
    })
}

/// Performance by emotional state after exit.
#[must_use]
pub fn by_post_trade_emotion(trades: &[TradeRecord]) -> BreakdownReport {
    breakdown_by("post-trade emotion", trades, |t| {
        t.post_trade_emotion
            .map(|e| BucketKey::new(e.level().into(), e.label()))
    })
}

/// Performance by weekday of entry.
#[must_use]
pub fn by_weekday(trades: &[TradeRecord]) -> BreakdownReport {
    breakdown_by("weekday", trades, |t| {
        t.entry_date.map(|d| {
            let weekday = d.weekday();
            BucketKey::new(weekday.num_days_from_monday(), weekday_name(weekday))
        })
    })
}

const fn weekday_name(weekday: chrono::Weekday) -> &'static str {
    match weekday {
        chrono::Weekday::Mon => "Monday",
        chrono::Weekday::Tue => "Tuesday",
        chrono::Weekday::Wed => "Wednesday",
        chrono::Weekday::Thu => "Thursday",
        chrono::Weekday::Fri => "Friday",
        chrono::Weekday::Sat => "Saturday",
        chrono::Weekday::Sun => "Sunday",
    }
}

/// Performance by holding-period bucket.
#[must_use]
pub fn by_duration(trades: &[TradeRecord]) -> BreakdownReport {
    breakdown_by("duration", trades, |t| {
        t.realized_duration_days().map(|days| {
            let (order, label) = duration_bucket(days);
            BucketKey::new(order, label)
        })
    })
}

fn duration_bucket(days: Decimal) -> (u32, &'static str) {
    if days < Decimal::ONE {
        (0, "Intraday")
    } else if days <= Decimal::TWO {
        (1, "1-2 days")
    } else if days <= Decimal::from(7) {
        (2, "3-7 days")
    } else if days <= Decimal::from(30) {
        (3, "1-4 weeks")
    } else {
        (4, "Over a month")
    }
}

/// Performance by trade type.
#[must_use]
pub fn by_trade_type(trades: &[TradeRecord]) -> BreakdownReport {
    breakdown_by("trade type", trades, |t| {
        t.trade_type
            .map(|tt| BucketKey::new(tt.order(), tt.label()))
    })
}

/// Performance by market condition at entry.
#[must_use]
pub fn by_market_condition(trades: &[TradeRecord]) -> BreakdownReport {
    breakdown_by("market condition", trades, |t| {
        t.market_condition
            .map(|mc| BucketKey::new(mc.order(), mc.label()))
    })
}

/// Performance by entry hour (0-23).
#[must_use]
pub fn by_entry_hour(trades: &[TradeRecord]) -> BreakdownReport {
    breakdown_by("entry hour", trades, |t| {
        t.entry_time
            .map(|time| BucketKey::new(time.hour(), format!("{:02}:00", time.hour())))
    })
}

/// Direction of an emotion change across a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmotionShift {
    /// Post-trade emotion above pre-trade.
    Improved,
    /// Post-trade emotion below pre-trade.
    Worsened,
    /// No change.
    Unchanged,
}

impl EmotionShift {
    fn from_levels(pre: EmotionLevel, post: EmotionLevel) -> Self {
        match post.level().cmp(&pre.level()) {
            std::cmp::Ordering::Greater => Self::Improved,
            std::cmp::Ordering::Less => Self::Worsened,
            std::cmp::Ordering::Equal => Self::Unchanged,
        }
    }
}

/// Aggregates for one (pre, post) emotion pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionStats {
    /// Emotion before entry.
    pub pre: String,
    /// Emotion after exit.
    pub post: String,
    /// Direction of the change.
    pub shift: EmotionShift,
    /// Closed trades with this pair.
    pub count: u64,
    /// Win rate within the pair (0-100).
    pub win_rate: Decimal,
    /// Mean P&L within the pair.
    pub average_pnl: Decimal,
    /// Total P&L within the pair.
    pub total_pnl: Decimal,
}

/// Emotion transitions across trades with both readings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmotionTransitionReport {
    /// All observed (pre, post) pairs in scale order.
    pub transitions: Vec<TransitionStats>,
    /// Most profitable pair by average P&L, among sufficiently sampled pairs.
    pub best_pair: Option<String>,
    /// Least profitable pair by average P&L, among sufficiently sampled pairs.
    pub worst_pair: Option<String>,
    /// Human-readable summary.
    pub insight: String,
}

/// Analyze (pre, post) emotion pairs over closed trades carrying both tags.
#[must_use]
pub fn emotion_transitions(trades: &[TradeRecord]) -> EmotionTransitionReport {
    #[derive(Default)]
    struct Acc {
        count: u64,
        wins: u64,
        total: Decimal,
    }

    let mut pairs: BTreeMap<(EmotionLevel, EmotionLevel), Acc> = BTreeMap::new();
    for trade in closed_in_order(trades) {
        let (Some(pre), Some(post)) = (trade.pre_trade_emotion, trade.post_trade_emotion) else {
            continue;
        };
        let Some(pnl) = trade.pnl else { continue };
        let acc = pairs.entry((pre, post)).or_default();
        acc.count += 1;
        acc.total += pnl;
        if pnl > Decimal::ZERO {
            acc.wins += 1;
        }
    }

    let transitions: Vec<TransitionStats> = pairs
        .into_iter()
        .map(|((pre, post), acc)| TransitionStats {
            pre: pre.label().to_string(),
            post: post.label().to_string(),
            shift: EmotionShift::from_levels(pre, post),
            count: acc.count,
            win_rate: percentage(Decimal::from(acc.wins), Decimal::from(acc.count)),
            average_pnl: round2(safe_divide(acc.total, Decimal::from(acc.count))),
            total_pnl: round2(acc.total),
        })
        .collect();

    let significant: Vec<&TransitionStats> = transitions
        .iter()
        .filter(|t| t.count >= MIN_SAMPLE)
        .collect();

    if significant.is_empty() {
        return EmotionTransitionReport {
            transitions,
            insight: "Not enough trades with both emotion readings to rank transitions."
                .to_string(),
            ..EmotionTransitionReport::default()
        };
    }

    let mut best = significant[0];
    let mut worst = significant[0];
    for stats in &significant[1..] {
        if stats.average_pnl > best.average_pnl {
            best = stats;
        }
        if stats.average_pnl < worst.average_pnl {
            worst = stats;
        }
    }

    let pair_label = |t: &TransitionStats| format!("{} -> {}", t.pre, t.post);
    let insight = format!(
        "Most profitable emotion shift: {} ({} average). Costliest: {} ({} average).",
        pair_label(best),
        format_currency(best.average_pnl),
        pair_label(worst),
        format_currency(worst.average_pnl),
    );

    EmotionTransitionReport {
        best_pair: Some(pair_label(best)),
        worst_pair: Some(pair_label(worst)),
        transitions,
        insight,
    }
}
