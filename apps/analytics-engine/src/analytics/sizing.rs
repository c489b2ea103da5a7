//! Position-size bucket performance and emotion/size correlation.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::closed_in_order;
use super::format::format_currency;
use super::math::{mean, pearson, std_dev};
use super::precision::{percentage, round2, safe_divide};
use crate::trade::{EmotionLevel, TradeRecord};

/// Trades with emotion data required before correlating.
const MIN_CORRELATION_SAMPLE: usize = 5;
/// Sized trades required before bucketing means anything.
const MIN_SIZED_TRADES: usize = 4;
/// |r| at which the correlation is called out in the description.
const STRONG_CORRELATION: Decimal = Decimal::from_parts(5, 0, 0, false, 1); // 0.5

/// One equal-width position-size range with its performance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizeBucket {
    /// Range label ("$500.00 - $1000.00").
    pub label: String,
    /// Inclusive lower bound.
    pub lower: Decimal,
    /// Upper bound (inclusive for the last bucket).
    pub upper: Decimal,
    /// Closed trades in the range.
    pub count: u64,
    /// Win rate within the range (0-100).
    pub win_rate: Decimal,
    /// Mean P&L within the range.
    pub average_pnl: Decimal,
    /// Sample standard deviation of P&L; 0 below two trades.
    pub pnl_std_dev: Decimal,
    /// Mean P&L over its standard deviation; 0 when the deviation is 0.
    pub risk_adjusted: Decimal,
}

/// Performance bucketed by position size.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PositionSizeReport {
    /// Equal-width ranges spanning the observed sizes, smallest first.
    pub buckets: Vec<SizeBucket>,
    /// Label of the range with the best risk-adjusted return.
    pub optimal: Option<String>,
    /// Human-readable summary.
    pub description: String,
}

/// 4-7 ranges, scaling with how much data there is to spread across them.
const fn bucket_count(sized_trades: usize) -> usize {
    if sized_trades < 20 {
        4
    } else if sized_trades < 40 {
        5
    } else if sized_trades < 60 {
        6
    } else {
        7
    }
}

/// Bucket closed trades by position size and rank ranges by risk-adjusted
/// return.
#[must_use]
pub fn position_size_report(trades: &[TradeRecord]) -> PositionSizeReport {
    let rows: Vec<(Decimal, Decimal)> = closed_in_order(trades)
        .iter()
        .filter_map(|t| Some((t.position_size?, t.pnl?)))
        .collect();

    if rows.len() < MIN_SIZED_TRADES {
        return PositionSizeReport {
            description: "Not enough sized trades to compare position-size ranges.".to_string(),
            ..PositionSizeReport::default()
        };
    }

    let min = rows
        .iter()
        .map(|(size, _)| *size)
        .min()
        .unwrap_or_default();
    let max = rows
        .iter()
        .map(|(size, _)| *size)
        .max()
        .unwrap_or_default();

    // All trades sized identically collapse to a single range.
    let count = if min == max { 1 } else { bucket_count(rows.len()) };
    let width = safe_divide(max - min, Decimal::from(count as u64));

    let mut grouped: Vec<Vec<Decimal>> = vec![Vec::new(); count];
    for (size, pnl) in &rows {
        let index = if width.is_zero() {
            0
        } else {
            ((*size - min) / width)
                .floor()
                .to_usize()
                .unwrap_or(0)
                .min(count - 1)
        };
        grouped[index].push(*pnl);
    }

    let buckets: Vec<SizeBucket> = grouped
        .iter()
        .enumerate()
        .map(|(index, pnls)| {
            let lower = min + width * Decimal::from(index as u64);
            let upper = if index + 1 == count {
                max
            } else {
                min + width * Decimal::from(index as u64 + 1)
            };
            let wins = pnls.iter().filter(|p| **p > Decimal::ZERO).count();
            let average_pnl = mean(pnls).map_or(Decimal::ZERO, round2);
            let pnl_std_dev = std_dev(pnls).map_or(Decimal::ZERO, round2);
            SizeBucket {
                label: format!("{} - {}", format_currency(lower), format_currency(upper)),
                lower: round2(lower),
                upper: round2(upper),
                count: pnls.len() as u64,
                win_rate: percentage(Decimal::from(wins as u64), Decimal::from(pnls.len() as u64)),
                average_pnl,
                pnl_std_dev,
                risk_adjusted: round2(safe_divide(average_pnl, pnl_std_dev)),
            }
        })
        .collect();

    let optimal = buckets
        .iter()
        .filter(|b| b.count > 0)
        .fold(None::<&SizeBucket>, |best, bucket| match best {
            Some(current) if current.risk_adjusted >= bucket.risk_adjusted => Some(current),
            _ => Some(bucket),
        })
        .map(|b| b.label.clone());

    let description = optimal.as_ref().map_or_else(
        || "No populated position-size ranges.".to_string(),
        |label| format!("Best risk-adjusted results in the {label} range."),
    );

    PositionSizeReport {
        buckets,
        optimal,
        description,
    }
}

/// Average position size for one pre-trade emotion level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionSizePoint {
    /// Emotion label.
    pub emotion: String,
    /// Scale value (1-5).
    pub level: u8,
    /// Mean position size at this level.
    pub average_size: Decimal,
    /// Trades at this level.
    pub count: u64,
}

/// Pearson correlation between pre-trade emotion and average position size.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmotionSizeCorrelation {
    /// Correlation coefficient in [-1, 1]; 0 when undefined.
    pub coefficient: Decimal,
    /// Trades carrying both an emotion tag and a size.
    pub sample_size: u64,
    /// Per-level averages backing the coefficient.
    pub groups: Vec<EmotionSizePoint>,
    /// Human-readable summary.
    pub description: String,
}

/// Correlate pre-trade emotional state with position size.
///
/// Open trades participate: sizing happens at entry, so no P&L is needed.
#[must_use]
pub fn emotion_size_correlation(trades: &[TradeRecord]) -> EmotionSizeCorrelation {
    let rows: Vec<(EmotionLevel, Decimal)> = trades
        .iter()
        .filter_map(|t| Some((t.pre_trade_emotion?, t.position_size?)))
        .collect();

    if rows.len() < MIN_CORRELATION_SAMPLE {
        return EmotionSizeCorrelation {
            sample_size: rows.len() as u64,
            description: "Not enough emotion-tagged trades to correlate with position size."
                .to_string(),
            ..EmotionSizeCorrelation::default()
        };
    }

    let mut by_level: BTreeMap<EmotionLevel, (Decimal, u64)> = BTreeMap::new();
    for (emotion, size) in &rows {
        let entry = by_level.entry(*emotion).or_insert((Decimal::ZERO, 0));
        entry.0 += *size;
        entry.1 += 1;
    }

    let groups: Vec<EmotionSizePoint> = by_level
        .into_iter()
        .map(|(emotion, (total, count))| EmotionSizePoint {
            emotion: emotion.label().to_string(),
            level: emotion.level(),
            average_size: round2(safe_divide(total, Decimal::from(count))),
            count,
        })
        .collect();

    let points: Vec<(Decimal, Decimal)> = groups
        .iter()
        .map(|g| (Decimal::from(g.level), g.average_size))
        .collect();
    let coefficient = pearson(&points).map_or_else(
        || {
            debug!("emotion/size correlation undefined; reporting 0");
            Decimal::ZERO
        },
        round2,
    );

    let description = if coefficient >= STRONG_CORRELATION {
        "Position size rises with pre-trade confidence; watch for overconfident oversizing."
            .to_string()
    } else if coefficient <= -STRONG_CORRELATION {
        "Position size shrinks as confidence rises; anxious trades are the largest.".to_string()
    } else {
        "No strong link between emotional state and position size.".to_string()
    };

    EmotionSizeCorrelation {
        coefficient,
        sample_size: rows.len() as u64,
        groups,
        description,
    }
}
