//! The journal entry record the analytics engine reads.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::labels::{ConvictionLevel, EmotionLevel, MarketCondition, TradeType};
use super::parse;

/// A direction string that is neither long nor short.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized position direction: {0:?}")]
pub struct ParseDirectionError(pub String);

/// Position direction.
///
/// Every price-difference formula in the engine routes through
/// [`Direction::favorable_move`] / [`Direction::adverse_move`] so the
/// long/short sign convention lives in exactly one place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    /// Profits when price rises.
    #[default]
    Long,
    /// Profits when price falls.
    Short,
}

impl Direction {
    /// Movement from `entry` to `price` measured in the profitable
    /// direction: positive when the move favors the position.
    #[must_use]
    pub fn favorable_move(self, entry: Decimal, price: Decimal) -> Decimal {
        match self {
            Self::Long => price - entry,
            Self::Short => entry - price,
        }
    }

    /// Movement from `entry` to `price` measured in the losing direction:
    /// positive when the move goes against the position.
    #[must_use]
    pub fn adverse_move(self, entry: Decimal, price: Decimal) -> Decimal {
        -self.favorable_move(entry, price)
    }

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Long => "Long",
            Self::Short => "Short",
        }
    }
}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "long" | "buy" => Ok(Self::Long),
            "short" | "sell" => Ok(Self::Short),
            _ => Err(ParseDirectionError(s.to_string())),
        }
    }
}

/// One journal entry as stored by the frontend.
///
/// The engine never mutates records; every field that carries a number may
/// arrive as a string, blank, or garbage and is coerced to `None` by the
/// lenient deserializers in [`super::parse`]. A trade is *closed*, and
/// participates in result-producing computations, only when its `pnl`
/// parsed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TradeRecord {
    /// Unique identifier assigned by the journal.
    pub id: String,
    /// Calendar date the position was opened.
    #[serde(deserialize_with = "parse::lenient_date")]
    pub entry_date: Option<NaiveDate>,
    /// Clock time the position was opened.
    #[serde(deserialize_with = "parse::lenient_time")]
    pub entry_time: Option<NaiveTime>,
    /// Calendar date the position was closed.
    #[serde(deserialize_with = "parse::lenient_date")]
    pub exit_date: Option<NaiveDate>,
    /// Clock time the position was closed.
    #[serde(deserialize_with = "parse::lenient_time")]
    pub exit_time: Option<NaiveTime>,
    /// Traded symbol.
    pub asset: String,
    /// Asset class tag (equity, crypto, futures, ...).
    pub asset_class: Option<String>,
    /// Long or short. Unrecognized values fall back to long.
    #[serde(rename = "position", deserialize_with = "parse::lenient_direction")]
    pub direction: Direction,
    /// Leverage multiple (1 = unlevered).
    #[serde(deserialize_with = "parse::lenient_decimal")]
    pub leverage: Option<Decimal>,
    /// Position size in account currency.
    #[serde(deserialize_with = "parse::lenient_decimal")]
    pub position_size: Option<Decimal>,
    /// Currency symbol for display.
    pub currency: Option<String>,
    /// Entry price.
    #[serde(deserialize_with = "parse::lenient_decimal")]
    pub entry_price: Option<Decimal>,
    /// Exit price.
    #[serde(deserialize_with = "parse::lenient_decimal")]
    pub exit_price: Option<Decimal>,
    /// Stop-loss price.
    #[serde(deserialize_with = "parse::lenient_decimal")]
    pub stop_loss: Option<Decimal>,
    /// Take-profit price.
    #[serde(deserialize_with = "parse::lenient_decimal")]
    pub take_profit: Option<Decimal>,
    /// Fees and commissions paid.
    #[serde(deserialize_with = "parse::lenient_decimal")]
    pub fees: Option<Decimal>,
    /// Planned risk/reward ratio at entry.
    #[serde(deserialize_with = "parse::lenient_decimal")]
    pub entry_risk_reward: Option<Decimal>,
    /// P&L expected if the plan plays out.
    #[serde(deserialize_with = "parse::lenient_decimal")]
    pub expected_pnl: Option<Decimal>,
    /// Realized P&L. Present iff the trade is closed.
    #[serde(deserialize_with = "parse::lenient_decimal")]
    pub pnl: Option<Decimal>,
    /// Realized risk/reward ratio.
    #[serde(deserialize_with = "parse::lenient_decimal")]
    pub actual_risk_reward: Option<Decimal>,
    /// Holding period in days as recorded upstream.
    #[serde(rename = "duration", deserialize_with = "parse::lenient_decimal")]
    pub duration_days: Option<Decimal>,
    /// Trader's own win-probability estimate (0-100).
    #[serde(deserialize_with = "parse::lenient_decimal")]
    pub win_probability: Option<Decimal>,
    /// Expected value assigned at entry, in account currency.
    #[serde(deserialize_with = "parse::lenient_decimal")]
    pub expected_value: Option<Decimal>,
    /// Realized R-multiple.
    #[serde(deserialize_with = "parse::lenient_decimal")]
    pub r_multiple: Option<Decimal>,
    /// Conviction in the setup (1-5).
    #[serde(deserialize_with = "parse::lenient_conviction")]
    pub conviction: Option<ConvictionLevel>,
    /// Emotional state before entering (1-5).
    #[serde(deserialize_with = "parse::lenient_emotion")]
    pub pre_trade_emotion: Option<EmotionLevel>,
    /// Emotional state after exiting (1-5).
    #[serde(deserialize_with = "parse::lenient_emotion")]
    pub post_trade_emotion: Option<EmotionLevel>,
    /// Style of trade.
    #[serde(deserialize_with = "parse::lenient_trade_type")]
    pub trade_type: Option<TradeType>,
    /// Market regime at entry.
    #[serde(deserialize_with = "parse::lenient_market_condition")]
    pub market_condition: Option<MarketCondition>,
    /// Whether the trader followed the written plan.
    #[serde(deserialize_with = "parse::lenient_bool")]
    pub followed_plan: Option<bool>,
    /// Whether the trader would take the setup again.
    #[serde(deserialize_with = "parse::lenient_bool")]
    pub would_take_again: Option<bool>,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Free-text lessons learned.
    pub lessons: Option<String>,
}

impl TradeRecord {
    /// A trade is closed iff its P&L parsed. Only closed trades participate
    /// in win-rate, drawdown, and risk/reward statistics.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.pnl.is_some()
    }

    /// Check if this trade was profitable.
    #[must_use]
    pub fn is_winner(&self) -> bool {
        self.pnl.is_some_and(|p| p > Decimal::ZERO)
    }

    /// Check if this trade lost money.
    #[must_use]
    pub fn is_loser(&self) -> bool {
        self.pnl.is_some_and(|p| p < Decimal::ZERO)
    }

    /// Entry date and time combined; midnight when no time was logged.
    #[must_use]
    pub fn entry_timestamp(&self) -> Option<NaiveDateTime> {
        self.entry_date
            .map(|d| d.and_time(self.entry_time.unwrap_or(NaiveTime::MIN)))
    }

    /// Holding period in days: the recorded value when present, otherwise
    /// derived from the entry and exit dates.
    #[must_use]
    pub fn realized_duration_days(&self) -> Option<Decimal> {
        if let Some(days) = self.duration_days {
            return Some(days);
        }
        match (self.entry_date, self.exit_date) {
            (Some(entry), Some(exit)) => Some(Decimal::from((exit - entry).num_days())),
            _ => None,
        }
    }

    /// Direction-adjusted distance from entry to the stop. `None` when
    /// either price is absent or the stop sits on the profitable side.
    #[must_use]
    pub fn stop_distance(&self) -> Option<Decimal> {
        let entry = self.entry_price?;
        let stop = self.stop_loss?;
        let distance = self.direction.adverse_move(entry, stop);
        (distance > Decimal::ZERO).then_some(distance)
    }

    /// Direction-adjusted distance from entry to exit, measured on the
    /// losing side (positive when the exit went against the position).
    #[must_use]
    pub fn exit_adverse_distance(&self) -> Option<Decimal> {
        let entry = self.entry_price?;
        let exit = self.exit_price?;
        Some(self.direction.adverse_move(entry, exit))
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_deserialize_messy_record() {
        let record: TradeRecord = serde_json::from_value(json!({
            "id": "t-1",
            "entryDate": "2024-03-15",
            "entryTime": "09:30",
            "exitDate": "2024-03-18T16:00:00",
            "asset": "AAPL",
            "position": "short",
            "positionSize": "$2,500.00",
            "entryPrice": "180.25",
            "exitPrice": 175.0,
            "stopLoss": "bad data",
            "pnl": "131.25",
            "entryRiskReward": 2,
            "conviction": 4,
            "preTradeEmotion": "Confident",
            "tradeType": "day_trade",
            "marketCondition": "ranging",
            "followedPlan": "yes",
            "winProbability": null
        }))
        .unwrap();

        assert_eq!(record.direction, Direction::Short);
        assert_eq!(record.position_size, Some(dec!(2500.00)));
        assert_eq!(record.entry_price, Some(dec!(180.25)));
        assert_eq!(record.stop_loss, None);
        assert_eq!(record.pnl, Some(dec!(131.25)));
        assert_eq!(record.conviction.map(ConvictionLevel::level), Some(4));
        assert_eq!(record.pre_trade_emotion, Some(EmotionLevel::Confident));
        assert_eq!(record.trade_type, Some(TradeType::DayTrade));
        assert_eq!(record.market_condition, Some(MarketCondition::Sideways));
        assert_eq!(record.followed_plan, Some(true));
        assert_eq!(record.win_probability, None);
        assert_eq!(
            record.exit_date,
            NaiveDate::from_ymd_opt(2024, 3, 18)
        );
        assert!(record.is_closed());
        assert!(record.is_winner());
    }

    #[test]
    fn test_minimal_record_is_open() {
        let record: TradeRecord =
            serde_json::from_value(json!({ "id": "t-2", "asset": "BTC" })).unwrap();
        assert!(!record.is_closed());
        assert_eq!(record.direction, Direction::Long);
        assert_eq!(record.entry_timestamp(), None);
    }

    #[test]
    fn test_direction_sign_symmetry() {
        let entry = dec!(100);
        let price = dec!(90);
        assert_eq!(Direction::Long.favorable_move(entry, price), dec!(-10));
        assert_eq!(Direction::Short.favorable_move(entry, price), dec!(10));
        assert_eq!(
            Direction::Long.adverse_move(entry, price),
            Direction::Short.favorable_move(entry, price)
        );
    }

    #[test]
    fn test_stop_distance_requires_losing_side_stop() {
        let mut record = TradeRecord {
            entry_price: Some(dec!(100)),
            stop_loss: Some(dec!(90)),
            ..TradeRecord::default()
        };
        assert_eq!(record.stop_distance(), Some(dec!(10)));

        // A "stop" above a long entry is not a protective stop
        record.stop_loss = Some(dec!(110));
        assert_eq!(record.stop_distance(), None);

        record.direction = Direction::Short;
        assert_eq!(record.stop_distance(), Some(dec!(10)));
    }

    #[test]
    fn test_realized_duration_prefers_recorded_value() {
        let record = TradeRecord {
            entry_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            exit_date: NaiveDate::from_ymd_opt(2024, 1, 6),
            duration_days: Some(dec!(4.5)),
            ..TradeRecord::default()
        };
        assert_eq!(record.realized_duration_days(), Some(dec!(4.5)));

        let derived = TradeRecord {
            entry_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            exit_date: NaiveDate::from_ymd_opt(2024, 1, 6),
            ..TradeRecord::default()
        };
        assert_eq!(derived.realized_duration_days(), Some(dec!(5)));
    }
}
