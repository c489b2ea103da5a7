//! Pure-computation analytics over journal trade records.
//!
//! Every function here is a synchronous, side-effect-free transform from a
//! slice of [`TradeRecord`]s to a fresh serializable result structure. Bad
//! data never raises: unparseable fields exclude a trade from the affected
//! computation, degenerate denominators produce documented sentinels, and
//! thin samples produce "not enough data" descriptions instead of errors.

mod constants;

pub mod breakdown;
pub mod dimensions;
pub mod drawdown;
pub mod ev_accuracy;
pub mod format;
pub mod kelly;
pub mod math;
pub mod precision;
pub mod predictor;
pub mod report;
pub mod risk_reward;
pub mod sizing;
pub mod summary;

pub use breakdown::{BreakdownReport, CategoryStats};
pub use dimensions::{EmotionShift, EmotionTransitionReport, TransitionStats};
pub use drawdown::{DrawdownEpisode, DrawdownInsights, DrawdownReport, EquityPoint};
pub use ev_accuracy::{Calibration, EvAccuracyReport, EvBand};
pub use kelly::KellyRecommendation;
pub use predictor::predict_win_probability;
pub use report::{JournalReport, journal_report};
pub use risk_reward::{
    PlanOutcome, RiskRewardReport, StopAdherence, StopLossReport,
};
pub use sizing::{EmotionSizeCorrelation, PositionSizeReport, SizeBucket};
pub use summary::{AssetPerformance, PerformanceSummary, StreakSummary};

use crate::trade::TradeRecord;

/// Closed trades in canonical order: entry timestamp, then id.
///
/// All sequential scans (streaks, equity curve) and all summations run over
/// this ordering so repeated invocations produce bit-identical results.
pub(crate) fn closed_in_order(trades: &[TradeRecord]) -> Vec<&TradeRecord> {
    let mut closed: Vec<&TradeRecord> = trades.iter().filter(|t| t.is_closed()).collect();
    closed.sort_by(|a, b| {
        a.entry_timestamp()
            .cmp(&b.entry_timestamp())
            .then_with(|| a.id.cmp(&b.id))
    });
    closed
}
