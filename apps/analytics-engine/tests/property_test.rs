//! Property tests for the engine's documented invariants.

#![allow(clippy::unwrap_used)]

use analytics_engine::analytics::{drawdown, risk_reward, summary};
use analytics_engine::{Direction, TradeRecord, kelly_fraction, predict_win_probability};
use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

fn closed_trade(id: usize, day: u32, pnl_cents: i64) -> TradeRecord {
    TradeRecord {
        id: format!("t-{id}"),
        asset: "ES".to_string(),
        entry_date: NaiveDate::from_ymd_opt(2024, 1, day),
        pnl: Some(Decimal::new(pnl_cents, 2)),
        ..TradeRecord::default()
    }
}

fn journal_strategy() -> impl Strategy<Value = Vec<TradeRecord>> {
    prop::collection::vec((1u32..=28, -100_000i64..100_000), 0..40).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (day, cents))| closed_trade(i, day, cents))
            .collect()
    })
}

proptest! {
    #[test]
    fn summary_is_idempotent(trades in journal_strategy()) {
        let first = summary::performance_summary(&trades);
        let second = summary::performance_summary(&trades);
        prop_assert_eq!(first.to_json(), second.to_json());
    }

    #[test]
    fn profit_factor_is_capped_without_losses(
        rows in prop::collection::vec((1u32..=28, 1i64..100_000), 1..20)
    ) {
        let trades: Vec<TradeRecord> = rows
            .into_iter()
            .enumerate()
            .map(|(i, (day, cents))| closed_trade(i, day, cents))
            .collect();
        prop_assert_eq!(
            summary::performance_summary(&trades).profit_factor,
            Decimal::new(99_999, 2)
        );
    }

    #[test]
    fn profit_factor_is_zero_without_profits(
        rows in prop::collection::vec((1u32..=28, -100_000i64..-1), 1..20)
    ) {
        let trades: Vec<TradeRecord> = rows
            .into_iter()
            .enumerate()
            .map(|(i, (day, cents))| closed_trade(i, day, cents))
            .collect();
        prop_assert_eq!(
            summary::performance_summary(&trades).profit_factor,
            Decimal::ZERO
        );
    }

    #[test]
    fn max_drawdown_bounds_every_episode(trades in journal_strategy()) {
        let report = drawdown::drawdown_report(&trades);
        let max = report.insights.max_drawdown_percentage;
        for episode in &report.drawdowns {
            prop_assert!(episode.depth_percentage <= max);
        }
        if let Some(deepest) = report.drawdowns.iter().map(|d| d.depth_percentage).max() {
            prop_assert_eq!(deepest, max);
        }
    }

    #[test]
    fn win_probability_is_clamped(trades in journal_strategy()) {
        let candidate = TradeRecord {
            id: "candidate".to_string(),
            asset: "ES".to_string(),
            ..TradeRecord::default()
        };
        let estimate = predict_win_probability(&trades, &candidate);
        if trades.len() < 10 {
            prop_assert_eq!(estimate, Decimal::from(50));
        } else {
            prop_assert!(estimate >= Decimal::from(15));
            prop_assert!(estimate <= Decimal::from(85));
        }
    }

    #[test]
    fn kelly_fraction_stays_within_bounds(
        probability in 0i64..=10_000,
        payoff in 1i64..=500
    ) {
        let fraction = kelly_fraction(Decimal::new(probability, 2), Decimal::new(payoff, 2));
        prop_assert!(fraction >= Decimal::ZERO);
        prop_assert!(fraction <= Decimal::new(25, 2));
    }

    #[test]
    fn mirrored_long_and_short_stops_classify_identically(
        stop_cents in 100i64..5_000,
        exit_cents in 100i64..5_000
    ) {
        let entry = Decimal::new(100_000, 2); // 1000.00
        let stop_offset = Decimal::new(stop_cents, 2);
        let exit_offset = Decimal::new(exit_cents, 2);

        let long = TradeRecord {
            id: "long".to_string(),
            asset: "ES".to_string(),
            direction: Direction::Long,
            entry_price: Some(entry),
            stop_loss: Some(entry - stop_offset),
            exit_price: Some(entry - exit_offset),
            pnl: Some(Decimal::new(-100, 2)),
            ..TradeRecord::default()
        };
        let short = TradeRecord {
            id: "short".to_string(),
            asset: "ES".to_string(),
            direction: Direction::Short,
            entry_price: Some(entry),
            stop_loss: Some(entry + stop_offset),
            exit_price: Some(entry + exit_offset),
            pnl: Some(Decimal::new(-100, 2)),
            ..TradeRecord::default()
        };

        let long_report = risk_reward::stop_loss_report(std::slice::from_ref(&long));
        let short_report = risk_reward::stop_loss_report(std::slice::from_ref(&short));
        prop_assert_eq!(long_report.average_ratio, short_report.average_ratio);
        prop_assert_eq!(long_report.sample_size, 1);
    }
}
