//! Label sets for the behavioral fields of a journal entry.
//!
//! The journal UI presents these as fixed pick-lists, so they are modeled as
//! enums with lookup tables rather than free-form strings. Strict parsing
//! lives in the `FromStr`/`TryFrom` impls; the lenient deserializers in
//! [`crate::trade::parse`] map anything unrecognized to an absent value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A label string that does not match any known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized {kind} label: {value:?}")]
pub struct ParseLabelError {
    /// Which label set was being parsed.
    pub kind: &'static str,
    /// The offending input.
    pub value: String,
}

impl ParseLabelError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// A 1-5 scale value outside its range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("level out of range: {0} (expected 1-5)")]
pub struct LevelOutOfRange(pub u8);

/// Emotional state on the journal's 1-5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmotionLevel {
    /// 1 - fearful, hesitant.
    VeryAnxious,
    /// 2 - uneasy.
    Anxious,
    /// 3 - calm, no strong pull either way.
    Neutral,
    /// 4 - composed and decisive.
    Confident,
    /// 5 - overexcited, prone to oversizing.
    Euphoric,
}

impl EmotionLevel {
    /// All levels in scale order.
    pub const ALL: [Self; 5] = [
        Self::VeryAnxious,
        Self::Anxious,
        Self::Neutral,
        Self::Confident,
        Self::Euphoric,
    ];

    /// Numeric scale value (1-5).
    #[must_use]
    pub const fn level(self) -> u8 {
        match self {
            Self::VeryAnxious => 1,
            Self::Anxious => 2,
            Self::Neutral => 3,
            Self::Confident => 4,
            Self::Euphoric => 5,
        }
    }

    /// Display label used in dashboards and insight text.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::VeryAnxious => "Very anxious",
            Self::Anxious => "Anxious",
            Self::Neutral => "Neutral",
            Self::Confident => "Confident",
            Self::Euphoric => "Euphoric",
        }
    }
}

impl TryFrom<u8> for EmotionLevel {
    type Error = LevelOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::VeryAnxious),
            2 => Ok(Self::Anxious),
            3 => Ok(Self::Neutral),
            4 => Ok(Self::Confident),
            5 => Ok(Self::Euphoric),
            other => Err(LevelOutOfRange(other)),
        }
    }
}

impl FromStr for EmotionLevel {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(level) = trimmed.parse::<u8>() {
            return Self::try_from(level).map_err(|_| ParseLabelError::new("emotion", s));
        }
        Self::ALL
            .into_iter()
            .find(|e| e.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseLabelError::new("emotion", s))
    }
}

impl fmt::Display for EmotionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Conviction in the setup on the journal's 1-5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConvictionLevel {
    /// 1
    VeryLow,
    /// 2
    Low,
    /// 3
    Moderate,
    /// 4
    High,
    /// 5
    VeryHigh,
}

impl ConvictionLevel {
    /// All levels in scale order.
    pub const ALL: [Self; 5] = [
        Self::VeryLow,
        Self::Low,
        Self::Moderate,
        Self::High,
        Self::VeryHigh,
    ];

    /// Numeric scale value (1-5).
    #[must_use]
    pub const fn level(self) -> u8 {
        match self {
            Self::VeryLow => 1,
            Self::Low => 2,
            Self::Moderate => 3,
            Self::High => 4,
            Self::VeryHigh => 5,
        }
    }

    /// Display label used in dashboards and insight text.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::VeryLow => "Very low",
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::VeryHigh => "Very high",
        }
    }
}

impl TryFrom<u8> for ConvictionLevel {
    type Error = LevelOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::VeryLow),
            2 => Ok(Self::Low),
            3 => Ok(Self::Moderate),
            4 => Ok(Self::High),
            5 => Ok(Self::VeryHigh),
            other => Err(LevelOutOfRange(other)),
        }
    }
}

impl FromStr for ConvictionLevel {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(level) = trimmed.parse::<u8>() {
            return Self::try_from(level).map_err(|_| ParseLabelError::new("conviction", s));
        }
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseLabelError::new("conviction", s))
    }
}

impl fmt::Display for ConvictionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Style of trade as tagged by the trader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeType {
    /// Seconds-to-minutes holds.
    Scalp,
    /// Opened and closed within a session.
    DayTrade,
    /// Multi-day holds.
    Swing,
    /// Weeks-to-months holds.
    Position,
    /// Anything the fixed list does not cover.
    Other,
}

impl TradeType {
    /// All variants in display order.
    pub const ALL: [Self; 5] = [
        Self::Scalp,
        Self::DayTrade,
        Self::Swing,
        Self::Position,
        Self::Other,
    ];

    /// Display label used in dashboards and insight text.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Scalp => "Scalp",
            Self::DayTrade => "Day trade",
            Self::Swing => "Swing",
            Self::Position => "Position",
            Self::Other => "Other",
        }
    }

    /// Stable ordering index for bucket sorting.
    #[must_use]
    pub const fn order(self) -> u32 {
        match self {
            Self::Scalp => 0,
            Self::DayTrade => 1,
            Self::Swing => 2,
            Self::Position => 3,
            Self::Other => 4,
        }
    }
}

impl FromStr for TradeType {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        // "daytrade"/"day_trade" spellings show up in older exports
        let normalized: String = trimmed
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "scalp" => Ok(Self::Scalp),
            "daytrade" => Ok(Self::DayTrade),
            "swing" => Ok(Self::Swing),
            "position" => Ok(Self::Position),
            "other" => Ok(Self::Other),
            _ => Err(ParseLabelError::new("trade type", s)),
        }
    }
}

impl fmt::Display for TradeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Market regime as tagged by the trader at entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketCondition {
    /// Broad uptrend.
    Bullish,
    /// Broad downtrend.
    Bearish,
    /// Range-bound, directionless.
    Sideways,
    /// Elevated volatility either way.
    Volatile,
    /// Anything the fixed list does not cover.
    Other,
}

impl MarketCondition {
    /// All variants in display order.
    pub const ALL: [Self; 5] = [
        Self::Bullish,
        Self::Bearish,
        Self::Sideways,
        Self::Volatile,
        Self::Other,
    ];

    /// Display label used in dashboards and insight text.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bullish => "Bullish",
            Self::Bearish => "Bearish",
            Self::Sideways => "Sideways",
            Self::Volatile => "Volatile",
            Self::Other => "Other",
        }
    }

    /// Stable ordering index for bucket sorting.
    #[must_use]
    pub const fn order(self) -> u32 {
        match self {
            Self::Bullish => 0,
            Self::Bearish => 1,
            Self::Sideways => 2,
            Self::Volatile => 3,
            Self::Other => 4,
        }
    }
}

impl FromStr for MarketCondition {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "bullish" | "bull" | "uptrend" => Ok(Self::Bullish),
            "bearish" | "bear" | "downtrend" => Ok(Self::Bearish),
            "sideways" | "ranging" | "range" | "choppy" => Ok(Self::Sideways),
            "volatile" | "volatility" => Ok(Self::Volatile),
            "other" => Ok(Self::Other),
            _ => Err(ParseLabelError::new("market condition", s)),
        }
    }
}

impl fmt::Display for MarketCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emotion_level_roundtrip() {
        for emotion in EmotionLevel::ALL {
            assert_eq!(EmotionLevel::try_from(emotion.level()), Ok(emotion));
            assert_eq!(emotion.label().parse::<EmotionLevel>(), Ok(emotion));
        }
    }

    #[test]
    fn test_emotion_level_from_digit_string() {
        assert_eq!("4".parse::<EmotionLevel>(), Ok(EmotionLevel::Confident));
        assert!("6".parse::<EmotionLevel>().is_err());
        assert!("0".parse::<EmotionLevel>().is_err());
    }

    #[test]
    fn test_conviction_out_of_range() {
        assert_eq!(ConvictionLevel::try_from(0), Err(LevelOutOfRange(0)));
        assert_eq!(ConvictionLevel::try_from(6), Err(LevelOutOfRange(6)));
    }

    #[test]
    fn test_trade_type_spellings() {
        assert_eq!("Day trade".parse::<TradeType>(), Ok(TradeType::DayTrade));
        assert_eq!("day_trade".parse::<TradeType>(), Ok(TradeType::DayTrade));
        assert_eq!("SCALP".parse::<TradeType>(), Ok(TradeType::Scalp));
        assert!("martingale".parse::<TradeType>().is_err());
    }

    #[test]
    fn test_market_condition_aliases() {
        assert_eq!(
            "ranging".parse::<MarketCondition>(),
            Ok(MarketCondition::Sideways)
        );
        assert_eq!(
            "Bull".parse::<MarketCondition>(),
            Ok(MarketCondition::Bullish)
        );
        assert!("lunar".parse::<MarketCondition>().is_err());
    }

    #[test]
    fn test_labels_are_stable() {
        assert_eq!(EmotionLevel::Euphoric.label(), "Euphoric");
        assert_eq!(ConvictionLevel::Moderate.label(), "Moderate");
        assert_eq!(TradeType::DayTrade.label(), "Day trade");
        assert_eq!(MarketCondition::Sideways.label(), "Sideways");
    }
}
