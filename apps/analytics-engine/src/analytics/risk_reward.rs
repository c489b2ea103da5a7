//! Planned-vs-realized risk/reward classification and stop-loss discipline.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::closed_in_order;
use super::constants::{RR_TOLERANCE, STOP_OUT_R, STOP_PARTIAL_MAX, STOP_RESPECTED_MAX};
use super::math::mean;
use super::precision::{percentage, round2};
use crate::trade::TradeRecord;

/// How a trade's realized risk/reward compared to the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanOutcome {
    /// Lost at least 80% of the planned risk.
    StoppedOut,
    /// Realized within the tolerance band of the plan.
    AsExpected,
    /// Beat the planned ratio by more than the tolerance.
    BetterThanExpected,
    /// Fell short of the planned ratio by more than the tolerance.
    WorseThanExpected,
}

impl PlanOutcome {
    /// All outcomes in display order.
    pub const ALL: [Self; 4] = [
        Self::StoppedOut,
        Self::AsExpected,
        Self::BetterThanExpected,
        Self::WorseThanExpected,
    ];

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::StoppedOut => "Stopped out",
            Self::AsExpected => "As expected",
            Self::BetterThanExpected => "Better than expected",
            Self::WorseThanExpected => "Worse than expected",
        }
    }
}

/// Classify one trade's realized ratio against its plan.
#[must_use]
pub fn classify_plan_outcome(
    pnl: Decimal,
    expected_rr: Decimal,
    actual_rr: Decimal,
) -> PlanOutcome {
    if pnl < Decimal::ZERO && actual_rr <= STOP_OUT_R {
        PlanOutcome::StoppedOut
    } else if (actual_rr - expected_rr).abs() <= RR_TOLERANCE {
        PlanOutcome::AsExpected
    } else if actual_rr > expected_rr {
        PlanOutcome::BetterThanExpected
    } else {
        PlanOutcome::WorseThanExpected
    }
}

/// Count and share of one plan outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanBucket {
    /// The outcome.
    pub outcome: PlanOutcome,
    /// Trades in this bucket.
    pub count: u64,
    /// Share of the compared sample (0-100).
    pub percentage: Decimal,
}

/// Planned-vs-realized comparison over trades carrying both ratios.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskRewardReport {
    /// Trades with both a planned and a realized ratio.
    pub sample_size: u64,
    /// One bucket per outcome, fixed order.
    pub buckets: Vec<PlanBucket>,
    /// Mean planned ratio.
    pub average_expected: Decimal,
    /// Mean realized ratio.
    pub average_actual: Decimal,
    /// Mean (realized - planned).
    pub average_difference: Decimal,
    /// Human-readable summary.
    pub description: String,
}

/// Compare planned and realized risk/reward across the journal.
#[must_use]
pub fn risk_reward_report(trades: &[TradeRecord]) -> RiskRewardReport {
    let rows: Vec<(Decimal, Decimal, Decimal)> = closed_in_order(trades)
        .iter()
        .filter_map(|t| Some((t.pnl?, t.entry_risk_reward?, t.actual_risk_reward?)))
        .collect();

    let sample_size = rows.len() as u64;
    let mut counts = [0u64; 4];
    for (pnl, expected, actual) in &rows {
        let outcome = classify_plan_outcome(*pnl, *expected, *actual);
        let index = PlanOutcome::ALL
            .iter()
            .position(|o| *o == outcome)
            .unwrap_or_default();
        counts[index] += 1;
    }

    let buckets = PlanOutcome::ALL
        .iter()
        .zip(counts)
        .map(|(outcome, count)| PlanBucket {
            outcome: *outcome,
            count,
            percentage: percentage(Decimal::from(count), Decimal::from(sample_size)),
        })
        .collect();

    let expected: Vec<Decimal> = rows.iter().map(|(_, e, _)| *e).collect();
    let actual: Vec<Decimal> = rows.iter().map(|(_, _, a)| *a).collect();
    let differences: Vec<Decimal> = rows.iter().map(|(_, e, a)| *a - *e).collect();

    let description = if rows.is_empty() {
        "Not enough trades with planned and realized risk/reward to compare.".to_string()
    } else {
        format!(
            "Across {} trades: {} as planned, {} better, {} worse, {} stopped out.",
            sample_size, counts[1], counts[2], counts[3], counts[0],
        )
    };

    RiskRewardReport {
        sample_size,
        buckets,
        average_expected: mean(&expected).map_or(Decimal::ZERO, round2),
        average_actual: mean(&actual).map_or(Decimal::ZERO, round2),
        average_difference: mean(&differences).map_or(Decimal::ZERO, round2),
        description,
    }
}

/// How strictly a losing trade honored its stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StopAdherence {
    /// Exited at or near the planned stop.
    Respected,
    /// Let the loss run moderately past the stop.
    PartiallyRespected,
    /// Let the loss run far past the stop.
    Ignored,
}

impl StopAdherence {
    /// All variants in display order.
    pub const ALL: [Self; 3] = [Self::Respected, Self::PartiallyRespected, Self::Ignored];

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Respected => "Respected",
            Self::PartiallyRespected => "Partially respected",
            Self::Ignored => "Ignored",
        }
    }
}

/// Classify a loss by how far the exit overshot the stop distance.
#[must_use]
pub fn classify_stop_adherence(ratio: Decimal) -> StopAdherence {
    if ratio <= STOP_RESPECTED_MAX {
        StopAdherence::Respected
    } else if ratio <= STOP_PARTIAL_MAX {
        StopAdherence::PartiallyRespected
    } else {
        StopAdherence::Ignored
    }
}

/// Count and share of one adherence class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopAdherenceBucket {
    /// The adherence class.
    pub adherence: StopAdherence,
    /// Losing trades in this class.
    pub count: u64,
    /// Share of the measured sample (0-100).
    pub percentage: Decimal,
}

/// Stop-loss discipline over losing trades with usable stop and exit prices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopLossReport {
    /// Losing trades with a measurable exit/stop ratio.
    pub sample_size: u64,
    /// One bucket per adherence class, fixed order.
    pub buckets: Vec<StopAdherenceBucket>,
    /// Mean exit-distance/stop-distance ratio.
    pub average_ratio: Decimal,
    /// Human-readable summary.
    pub description: String,
}

/// Measure stop-loss discipline across the journal's losing trades.
///
/// Trades lacking a usable stop (absent, or on the profitable side of the
/// entry) or whose exit was not on the losing side are excluded rather than
/// zero-filled.
#[must_use]
pub fn stop_loss_report(trades: &[TradeRecord]) -> StopLossReport {
    let ratios: Vec<Decimal> = closed_in_order(trades)
        .iter()
        .filter(|t| t.is_loser())
        .filter_map(|t| {
            let stop_distance = t.stop_distance()?;
            let exit_distance = t.exit_adverse_distance()?;
            (exit_distance > Decimal::ZERO).then(|| exit_distance / stop_distance)
        })
        .collect();

    let sample_size = ratios.len() as u64;
    let mut counts = [0u64; 3];
    for ratio in &ratios {
        let adherence = classify_stop_adherence(*ratio);
        let index = StopAdherence::ALL
            .iter()
            .position(|a| *a == adherence)
            .unwrap_or_default();
        counts[index] += 1;
    }

    let buckets = StopAdherence::ALL
        .iter()
        .zip(counts)
        .map(|(adherence, count)| StopAdherenceBucket {
            adherence: *adherence,
            count,
            percentage: percentage(Decimal::from(count), Decimal::from(sample_size)),
        })
        .collect();

    let description = if ratios.is_empty() {
        "No losing trades with a usable stop to measure.".to_string()
    } else {
        format!(
            "Of {} measured losses: {} respected the stop, {} partially, {} ignored it.",
            sample_size, counts[0], counts[1], counts[2],
        )
    };

    StopLossReport {
        sample_size,
        buckets,
        average_ratio: mean(&ratios).map_or(Decimal::ZERO, round2),
        description,
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use test_case::test_case;

    use super::*;
    use crate::trade::Direction;

    #[test_case(dec!(-100), dec!(2.0), dec!(-0.9) => PlanOutcome::StoppedOut; "deep loss is a stop out")]
    #[test_case(dec!(-100), dec!(2.0), dec!(-0.8) => PlanOutcome::StoppedOut; "exactly -0.8 is a stop out")]
    #[test_case(dec!(50), dec!(2.0), dec!(2.1) => PlanOutcome::AsExpected; "within tolerance matches plan")]
    #[test_case(dec!(50), dec!(2.0), dec!(2.2) => PlanOutcome::AsExpected; "tolerance boundary matches plan")]
    #[test_case(dec!(90), dec!(2.0), dec!(3.0) => PlanOutcome::BetterThanExpected; "beat the plan")]
    #[test_case(dec!(-20), dec!(2.0), dec!(-0.5) => PlanOutcome::WorseThanExpected; "small loss fell short")]
    #[test_case(dec!(10), dec!(2.0), dec!(0.5) => PlanOutcome::WorseThanExpected; "win can still fall short")]
    fn test_classify_plan_outcome(pnl: Decimal, expected: Decimal, actual: Decimal) -> PlanOutcome {
        classify_plan_outcome(pnl, expected, actual)
    }

    #[test_case(dec!(1.0) => StopAdherence::Respected; "at the stop")]
    #[test_case(dec!(1.1) => StopAdherence::Respected; "respected boundary")]
    #[test_case(dec!(1.3) => StopAdherence::PartiallyRespected; "moderate overshoot")]
    #[test_case(dec!(1.5) => StopAdherence::PartiallyRespected; "partial boundary")]
    #[test_case(dec!(2.0) => StopAdherence::Ignored; "double the planned risk")]
    fn test_classify_stop_adherence(ratio: Decimal) -> StopAdherence {
        classify_stop_adherence(ratio)
    }

    fn losing_trade(id: &str, direction: Direction, entry: Decimal, stop: Decimal, exit: Decimal) -> TradeRecord {
        TradeRecord {
            id: id.to_string(),
            asset: "EURUSD".to_string(),
            direction,
            entry_price: Some(entry),
            stop_loss: Some(stop),
            exit_price: Some(exit),
            pnl: Some(dec!(-100)),
            ..TradeRecord::default()
        }
    }

    #[test]
    fn test_long_stop_ignored() {
        // entry 100, stop 90, exit 80: exit distance 20 vs stop distance 10
        let trades = vec![losing_trade("1", Direction::Long, dec!(100), dec!(90), dec!(80))];
        let report = stop_loss_report(&trades);
        assert_eq!(report.sample_size, 1);
        assert_eq!(report.average_ratio, dec!(2.00));
        let ignored = &report.buckets[2];
        assert_eq!(ignored.adherence, StopAdherence::Ignored);
        assert_eq!(ignored.count, 1);
    }

    #[test]
    fn test_short_mirror_classifies_identically() {
        // The short mirror of entry 100 / stop 90 / exit 80
        let long = losing_trade("1", Direction::Long, dec!(100), dec!(90), dec!(80));
        let short = losing_trade("2", Direction::Short, dec!(100), dec!(110), dec!(120));
        let long_report = stop_loss_report(std::slice::from_ref(&long));
        let short_report = stop_loss_report(std::slice::from_ref(&short));
        assert_eq!(long_report.average_ratio, short_report.average_ratio);
    }

    #[test]
    fn test_unusable_stops_are_excluded() {
        let mut no_stop = losing_trade("1", Direction::Long, dec!(100), dec!(90), dec!(95));
        no_stop.stop_loss = None;
        // Stop on the wrong side of a long entry
        let bad_stop = losing_trade("2", Direction::Long, dec!(100), dec!(110), dec!(95));
        let report = stop_loss_report(&[no_stop, bad_stop]);
        assert_eq!(report.sample_size, 0);
        assert!(report.description.contains("No losing trades"));
    }

    #[test]
    fn test_risk_reward_report_buckets() {
        let mut trades = Vec::new();
        for (id, pnl, expected, actual) in [
            ("1", dec!(100), dec!(2.0), dec!(2.1)),  // as expected
            ("2", dec!(150), dec!(2.0), dec!(3.5)),  // better
            ("3", dec!(-80), dec!(2.0), dec!(-1.0)), // stopped out
            ("4", dec!(20), dec!(2.0), dec!(0.8)),   // worse
        ] {
            trades.push(TradeRecord {
                id: id.to_string(),
                asset: "NQ".to_string(),
                pnl: Some(pnl),
                entry_risk_reward: Some(expected),
                actual_risk_reward: Some(actual),
                ..TradeRecord::default()
            });
        }

        let report = risk_reward_report(&trades);
        assert_eq!(report.sample_size, 4);
        for bucket in &report.buckets {
            assert_eq!(bucket.count, 1);
            assert_eq!(bucket.percentage, dec!(25.00));
        }
        assert_eq!(report.average_expected, dec!(2.00));
        assert_eq!(report.average_difference, dec!(-0.65));
    }

    #[test]
    fn test_risk_reward_report_requires_both_ratios() {
        let trades = vec![TradeRecord {
            id: "1".to_string(),
            pnl: Some(dec!(50)),
            actual_risk_reward: Some(dec!(1.5)),
            ..TradeRecord::default()
        }];
        let report = risk_reward_report(&trades);
        assert_eq!(report.sample_size, 0);
        assert!(report.description.contains("Not enough"));
    }
}
