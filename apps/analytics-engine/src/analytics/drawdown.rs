//! Equity curve construction and drawdown episode detection.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::closed_in_order;
use super::constants::HUNDRED;
use super::format::format_pct;
use super::math::mean;
use super::precision::{round2, safe_divide};
use crate::trade::TradeRecord;

/// One point on the cumulative P&L curve, one per closed trade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquityPoint {
    /// Entry date of the trade behind this point.
    pub date: Option<NaiveDate>,
    /// Cumulative P&L after this trade.
    pub value: Decimal,
    /// This trade's P&L.
    pub pnl: Decimal,
}

/// A contiguous interval where cumulative equity sat below its prior peak.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawdownEpisode {
    /// Date of the peak the curve fell from.
    pub start_date: Option<NaiveDate>,
    /// Date of the lowest point reached.
    pub trough_date: Option<NaiveDate>,
    /// Date the curve recovered to the peak; `None` while still underwater.
    pub end_date: Option<NaiveDate>,
    /// Peak minus trough, in account currency.
    pub depth: Decimal,
    /// Depth relative to the peak (0-100).
    pub depth_percentage: Decimal,
    /// Calendar days from peak to recovery (or to the last trade while open).
    pub duration_days: i64,
    /// Calendar days from trough to recovery; 0 while open.
    pub recovery_days: i64,
}

/// Aggregated drawdown statistics plus a one-line summary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DrawdownInsights {
    /// Deepest episode (0-100).
    pub max_drawdown_percentage: Decimal,
    /// Longest episode in calendar days.
    pub max_drawdown_duration_days: i64,
    /// Slowest trough-to-recovery in calendar days.
    pub max_drawdown_recovery_days: i64,
    /// Mean episode depth (0-100).
    pub avg_drawdown_percentage: Decimal,
    /// Mean episode length in calendar days.
    pub avg_drawdown_duration_days: Decimal,
    /// Mean trough-to-recovery in calendar days, over recovered episodes.
    pub avg_recovery_days: Decimal,
    /// Human-readable summary for the dashboard.
    pub summary: String,
}

/// Equity curve, detected episodes, and aggregate insights.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DrawdownReport {
    /// Cumulative P&L per closed trade, in canonical order.
    pub equity_curve: Vec<EquityPoint>,
    /// Detected drawdown episodes, oldest first.
    pub drawdowns: Vec<DrawdownEpisode>,
    /// Aggregate statistics.
    pub insights: DrawdownInsights,
}

/// Tracker state while walking the equity curve.
#[derive(Clone, Copy)]
enum CurveState {
    /// Running total is at (or above) the all-time peak.
    AtPeak,
    /// Running total sits below the peak set at `start_date`.
    InDrawdown {
        start_date: Option<NaiveDate>,
        trough: Decimal,
        trough_date: Option<NaiveDate>,
    },
}

/// Build the equity curve and detect drawdown episodes over closed trades.
#[must_use]
pub fn drawdown_report(trades: &[TradeRecord]) -> DrawdownReport {
    let closed = closed_in_order(trades);
    if closed.is_empty() {
        return DrawdownReport {
            insights: DrawdownInsights {
                summary: "Not enough closed trades to analyze drawdowns.".to_string(),
                ..DrawdownInsights::default()
            },
            ..DrawdownReport::default()
        };
    }

    let mut equity_curve = Vec::with_capacity(closed.len());
    let mut running = Decimal::ZERO;
    for trade in &closed {
        let pnl = trade.pnl.unwrap_or_default();
        running += pnl;
        equity_curve.push(EquityPoint {
            date: trade.entry_date,
            value: running,
            pnl,
        });
    }

    // Reference magnitude for episodes that start before equity ever peaked
    // above zero, where depth relative to the peak is undefined.
    let baseline = equity_curve
        .iter()
        .map(|p| p.value.abs())
        .find(|v| !v.is_zero());

    let mut drawdowns = Vec::new();
    let mut peak = Decimal::ZERO;
    let mut peak_date: Option<NaiveDate> = None;
    let mut state = CurveState::AtPeak;

    for point in &equity_curve {
        match state {
            CurveState::AtPeak => {
                if point.value >= peak {
                    peak = point.value;
                    peak_date = point.date;
                } else {
                    state = CurveState::InDrawdown {
                        start_date: peak_date.or(point.date),
                        trough: point.value,
                        trough_date: point.date,
                    };
                }
            }
            CurveState::InDrawdown {
                start_date,
                trough,
                trough_date,
            } => {
                if point.value >= peak {
                    drawdowns.push(close_episode(
                        start_date, trough, trough_date, point.date, peak, baseline,
                    ));
                    peak = point.value;
                    peak_date = point.date;
                    state = CurveState::AtPeak;
                } else if point.value < trough {
                    state = CurveState::InDrawdown {
                        start_date,
                        trough: point.value,
                        trough_date: point.date,
                    };
                }
            }
        }
    }

    // An episode still open at the last trade reports its duration to the
    // final trade's date and no recovery.
    if let CurveState::InDrawdown {
        start_date,
        trough,
        trough_date,
    } = state
    {
        let last_date = equity_curve.last().and_then(|p| p.date);
        let depth = peak - trough;
        drawdowns.push(DrawdownEpisode {
            start_date,
            trough_date,
            end_date: None,
            depth: round2(depth),
            depth_percentage: depth_percentage(depth, peak, baseline),
            duration_days: days_between(start_date, last_date),
            recovery_days: 0,
        });
    }

    let insights = build_insights(&drawdowns);
    DrawdownReport {
        equity_curve,
        drawdowns,
        insights,
    }
}

fn close_episode(
    start_date: Option<NaiveDate>,
    trough: Decimal,
    trough_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    peak: Decimal,
    baseline: Option<Decimal>,
) -> DrawdownEpisode {
    let depth = peak - trough;
    DrawdownEpisode {
        start_date,
        trough_date,
        end_date,
        depth: round2(depth),
        depth_percentage: depth_percentage(depth, peak, baseline),
        duration_days: days_between(start_date, end_date),
        recovery_days: days_between(trough_date, end_date),
    }
}

/// Depth relative to the peak. A zero peak falls back to the curve's first
/// nonzero magnitude so the ratio stays meaningful when equity dips before
/// it ever rises.
fn depth_percentage(depth: Decimal, peak: Decimal, baseline: Option<Decimal>) -> Decimal {
    let reference = if peak.is_zero() {
        debug!("zero peak; using first nonzero equity magnitude as drawdown reference");
        baseline.unwrap_or_default()
    } else {
        peak
    };
    round2(safe_divide(depth, reference) * HUNDRED)
}

fn days_between(from: Option<NaiveDate>, to: Option<NaiveDate>) -> i64 {
    match (from, to) {
        (Some(from), Some(to)) => (to - from).num_days().max(0),
        _ => 0,
    }
}

fn build_insights(drawdowns: &[DrawdownEpisode]) -> DrawdownInsights {
    if drawdowns.is_empty() {
        return DrawdownInsights {
            summary: "No drawdowns: equity made a new high on every trade.".to_string(),
            ..DrawdownInsights::default()
        };
    }

    let depths: Vec<Decimal> = drawdowns.iter().map(|d| d.depth_percentage).collect();
    let durations: Vec<Decimal> = drawdowns
        .iter()
        .map(|d| Decimal::from(d.duration_days))
        .collect();
    let recoveries: Vec<Decimal> = drawdowns
        .iter()
        .filter(|d| d.end_date.is_some())
        .map(|d| Decimal::from(d.recovery_days))
        .collect();

    let max_drawdown_percentage = depths.iter().copied().max().unwrap_or_default();
    let max_drawdown_duration_days = drawdowns.iter().map(|d| d.duration_days).max().unwrap_or(0);
    let max_drawdown_recovery_days = drawdowns
        .iter()
        .filter(|d| d.end_date.is_some())
        .map(|d| d.recovery_days)
        .max()
        .unwrap_or(0);
    let avg_recovery_days = mean(&recoveries).map_or(Decimal::ZERO, round2);

    let open_note = if drawdowns.iter().any(|d| d.end_date.is_none()) {
        "; the latest is still open"
    } else {
        ""
    };
    let summary = format!(
        "{} drawdown episode(s); worst {} deep over {} day(s){}.",
        drawdowns.len(),
        format_pct(max_drawdown_percentage),
        max_drawdown_duration_days,
        open_note,
    );

    DrawdownInsights {
        max_drawdown_percentage,
        max_drawdown_duration_days,
        max_drawdown_recovery_days,
        avg_drawdown_percentage: mean(&depths).map_or(Decimal::ZERO, round2),
        avg_drawdown_duration_days: mean(&durations).map_or(Decimal::ZERO, round2),
        avg_recovery_days,
        summary,
    }
}
