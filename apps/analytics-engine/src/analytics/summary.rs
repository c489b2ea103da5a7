//! Aggregate performance statistics over closed trades.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::closed_in_order;
use super::constants::PROFIT_FACTOR_CAP;
use super::drawdown;
use super::math::{downside_deviation, mean, median, std_dev};
use super::precision::{percentage, round2, safe_divide};
use crate::trade::TradeRecord;

/// Longest winning and losing runs, scanned in chronological order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakSummary {
    /// Longest consecutive run of winning trades.
    pub max_win_streak: u64,
    /// Longest consecutive run of losing trades.
    pub max_loss_streak: u64,
}

/// Per-asset P&L totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetPerformance {
    /// Traded symbol.
    pub asset: String,
    /// Sum of realized P&L.
    pub total_pnl: Decimal,
    /// Win rate (0-100).
    pub win_rate: Decimal,
    /// Closed trades on this asset.
    pub trade_count: u64,
}

/// Headline statistics for the dashboard.
///
/// All currency and percentage values are rounded to 2 decimal places;
/// `average_loss` and `max_loss` keep their negative sign.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerformanceSummary {
    /// Number of closed trades.
    pub trade_count: u64,
    /// Win rate (0-100).
    pub win_rate: Decimal,
    /// Sum of realized P&L.
    pub total_pnl: Decimal,
    /// Mean realized P&L per trade.
    pub average_pnl: Decimal,
    /// Expected amount won or lost per trade, weighted by win rate.
    pub expectancy: Decimal,
    /// Mean P&L of winning trades.
    pub average_win: Decimal,
    /// Mean P&L of losing trades (negative).
    pub average_loss: Decimal,
    /// Largest single win.
    pub max_win: Decimal,
    /// Largest single loss (negative).
    pub max_loss: Decimal,
    /// Median realized risk/reward ratio.
    pub median_risk_reward: Decimal,
    /// Mean realized risk/reward ratio.
    pub average_risk_reward: Decimal,
    /// Gross profit / gross loss; 999.99 with no losses, 0 with no profits.
    pub profit_factor: Decimal,
    /// Mean over sample-standard-deviation of per-trade P&L; 0 without
    /// variance.
    pub sharpe: Decimal,
    /// Mean over downside deviation of per-trade P&L; 0 without losses or
    /// variance.
    pub sortino: Decimal,
    /// Deepest drawdown episode (0-100).
    pub max_drawdown_pct: Decimal,
    /// Win/loss streak lengths.
    pub streaks: StreakSummary,
    /// Per-asset totals, best first.
    pub asset_pnl: Vec<AssetPerformance>,
}

impl PerformanceSummary {
    /// Serialize for the dashboard; an empty string on the (unreachable)
    /// serialization failure rather than a panic.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Compute the headline statistics over the closed trades in `trades`.
///
/// Open and unparseable-P&L trades are ignored; an empty journal produces a
/// zeroed summary rather than an error.
#[must_use]
pub fn performance_summary(trades: &[TradeRecord]) -> PerformanceSummary {
    let closed = closed_in_order(trades);
    if closed.is_empty() {
        return PerformanceSummary::default();
    }

    let pnls: Vec<Decimal> = closed.iter().filter_map(|t| t.pnl).collect();
    let wins: Vec<Decimal> = pnls.iter().filter(|p| **p > Decimal::ZERO).copied().collect();
    let losses: Vec<Decimal> = pnls.iter().filter(|p| **p < Decimal::ZERO).copied().collect();

    let trade_count = pnls.len() as u64;
    let count = Decimal::from(trade_count);
    let total_pnl: Decimal = pnls.iter().sum();
    let gross_profit: Decimal = wins.iter().sum();
    let gross_loss: Decimal = losses.iter().map(|l| l.abs()).sum();

    let win_rate = percentage(Decimal::from(wins.len() as u64), count);
    let average_win = safe_divide(gross_profit, Decimal::from(wins.len() as u64));
    let average_loss = -safe_divide(gross_loss, Decimal::from(losses.len() as u64));

    // Expectancy = (WinRate * AvgWin) - (LossRate * |AvgLoss|), fractional rates
    let win_fraction = safe_divide(Decimal::from(wins.len() as u64), count);
    let loss_fraction = Decimal::ONE - win_fraction;
    let expectancy = (win_fraction * average_win) - (loss_fraction * average_loss.abs());

    let profit_factor = if gross_loss.is_zero() {
        if gross_profit > Decimal::ZERO {
            PROFIT_FACTOR_CAP
        } else {
            Decimal::ZERO
        }
    } else {
        round2(gross_profit / gross_loss)
    };

    let pnl_mean = mean(&pnls).unwrap_or_default();
    let sharpe = std_dev(&pnls)
        .filter(|s| !s.is_zero())
        .map_or(Decimal::ZERO, |s| round2(pnl_mean / s));
    let sortino = downside_deviation(&pnls)
        .filter(|s| !s.is_zero())
        .map_or(Decimal::ZERO, |s| round2(pnl_mean / s));

    let rr_values: Vec<Decimal> = closed.iter().filter_map(|t| t.actual_risk_reward).collect();
    let median_risk_reward = median(&rr_values).map_or(Decimal::ZERO, round2);
    let average_risk_reward = mean(&rr_values).map_or(Decimal::ZERO, round2);

    let max_drawdown_pct = drawdown::drawdown_report(trades)
        .insights
        .max_drawdown_percentage;

    PerformanceSummary {
        trade_count,
        win_rate,
        total_pnl: round2(total_pnl),
        average_pnl: round2(safe_divide(total_pnl, count)),
        expectancy: round2(expectancy),
        average_win: round2(average_win),
        average_loss: round2(average_loss),
        max_win: wins.iter().copied().max().unwrap_or_default(),
        max_loss: losses.iter().copied().min().unwrap_or_default(),
        median_risk_reward,
        average_risk_reward,
        profit_factor,
        sharpe,
        sortino,
        max_drawdown_pct,
        streaks: streaks(&closed),
        asset_pnl: asset_performance(&closed),
    }
}

fn streaks(closed: &[&TradeRecord]) -> StreakSummary {
    let mut max_wins = 0u64;
    let mut max_losses = 0u64;
    let mut current_wins = 0u64;
    let mut current_losses = 0u64;

    for trade in closed {
        if trade.is_winner() {
            current_wins += 1;
            current_losses = 0;
            max_wins = max_wins.max(current_wins);
        } else if trade.is_loser() {
            current_losses += 1;
            current_wins = 0;
            max_losses = max_losses.max(current_losses);
        }
    }

    StreakSummary {
        max_win_streak: max_wins,
        max_loss_streak: max_losses,
    }
}

fn asset_performance(closed: &[&TradeRecord]) -> Vec<AssetPerformance> {
    struct Acc {
        total: Decimal,
        wins: u64,
        count: u64,
    }

    let mut by_asset: BTreeMap<&str, Acc> = BTreeMap::new();
    for trade in closed {
        let Some(pnl) = trade.pnl else { continue };
        let acc = by_asset.entry(trade.asset.as_str()).or_insert(Acc {
            total: Decimal::ZERO,
            wins: 0,
            count: 0,
        });
        acc.total += pnl;
        acc.count += 1;
        if pnl > Decimal::ZERO {
            acc.wins += 1;
        }
    }

    let mut rows: Vec<AssetPerformance> = by_asset
        .into_iter()
        .map(|(asset, acc)| AssetPerformance {
            asset: asset.to_string(),
            total_pnl: round2(acc.total),
            win_rate: percentage(Decimal::from(acc.wins), Decimal::from(acc.count)),
            trade_count: acc.count,
        })
        .collect();
    rows.sort_by(|a, b| b.total_pnl.cmp(&a.total_pnl).then_with(|| a.asset.cmp(&b.asset)));
    rows
}
