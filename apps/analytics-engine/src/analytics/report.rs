//! One-call assembly of every analytics product for the dashboard.

use serde::{Deserialize, Serialize};

use super::breakdown::BreakdownReport;
use super::dimensions::{
    EmotionTransitionReport, by_conviction, by_duration, by_entry_hour, by_market_condition,
    by_post_trade_emotion, by_pre_trade_emotion, by_trade_type, by_weekday, emotion_transitions,
};
use super::drawdown::{DrawdownReport, drawdown_report};
use super::ev_accuracy::{EvAccuracyReport, ev_accuracy_report};
use super::risk_reward::{
    RiskRewardReport, StopLossReport, risk_reward_report, stop_loss_report,
};
use super::sizing::{
    EmotionSizeCorrelation, PositionSizeReport, emotion_size_correlation, position_size_report,
};
use super::summary::{PerformanceSummary, performance_summary};
use crate::trade::TradeRecord;

/// Every analytics product over one journal, computed in a single pass for
/// the dashboard to render side by side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalReport {
    /// Headline statistics.
    pub summary: PerformanceSummary,
    /// Equity curve and drawdown episodes.
    pub drawdown: DrawdownReport,
    /// Planned-vs-realized risk/reward comparison.
    pub risk_reward: RiskRewardReport,
    /// Stop-loss discipline over losing trades.
    pub stop_loss: StopLossReport,
    /// Performance by conviction level.
    pub conviction: BreakdownReport,
    /// Performance by pre-trade emotion.
    pub pre_trade_emotion: BreakdownReport,
    /// Performance by post-trade emotion.
    pub post_trade_emotion: BreakdownReport,
    /// Performance by weekday of entry.
    pub weekday: BreakdownReport,
    /// Performance by holding-period bucket.
    pub duration: BreakdownReport,
    /// Performance by trade type.
    pub trade_type: BreakdownReport,
    /// Performance by market condition.
    pub market_condition: BreakdownReport,
    /// Performance by entry hour.
    pub entry_hour: BreakdownReport,
    /// (pre, post) emotion pair analysis.
    pub emotion_transitions: EmotionTransitionReport,
    /// Expected-value calibration.
    pub ev_accuracy: EvAccuracyReport,
    /// Performance by position-size range.
    pub position_size: PositionSizeReport,
    /// Emotion/size correlation.
    pub emotion_size: EmotionSizeCorrelation,
}

impl JournalReport {
    /// Serialize for the dashboard; an empty string on the (unreachable)
    /// serialization failure rather than a panic.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Compute the full report over one journal.
#[must_use]
pub fn journal_report(trades: &[TradeRecord]) -> JournalReport {
    JournalReport {
        summary: performance_summary(trades),
        drawdown: drawdown_report(trades),
        risk_reward: risk_reward_report(trades),
        stop_loss: stop_loss_report(trades),
        conviction: by_conviction(trades),
        pre_trade_emotion: by_pre_trade_emotion(trades),
        post_trade_emotion: by_post_trade_emotion(trades),
        weekday: by_weekday(trades),
        duration: by_duration(trades),
        trade_type: by_trade_type(trades),
        market_condition: by_market_condition(trades),
        entry_hour: by_entry_hour(trades),
        emotion_transitions: emotion_transitions(trades),
        ev_accuracy: ev_accuracy_report(trades),
        position_size: position_size_report(trades),
        emotion_size: emotion_size_correlation(trades),
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_empty_journal_produces_a_complete_report() {
        let report = journal_report(&[]);
        assert_eq!(report.summary.trade_count, 0);
        assert!(report.drawdown.equity_curve.is_empty());
        assert_eq!(report.ev_accuracy.bands.len(), 6);
        assert!(!report.to_json().is_empty());
    }

    #[test]
    fn test_report_serializes_and_round_trips() {
        let trades = vec![
            TradeRecord {
                id: "1".to_string(),
                asset: "AAPL".to_string(),
                pnl: Some(dec!(120)),
                ..TradeRecord::default()
            },
            TradeRecord {
                id: "2".to_string(),
                asset: "AAPL".to_string(),
                pnl: Some(dec!(-60)),
                ..TradeRecord::default()
            },
        ];
        let report = journal_report(&trades);
        let parsed: JournalReport = serde_json::from_str(&report.to_json()).unwrap();
        assert_eq!(parsed.summary.trade_count, 2);
        assert_eq!(parsed.summary.win_rate, dec!(50.00));
    }
}
