//! Lenient field parsing for journal exports.
//!
//! Journal data is loose about types: numbers arrive as strings, blanks stand
//! in for nulls, and hand-edited rows carry currency symbols or thousands
//! separators. Every deserializer here maps anything unparseable to an absent
//! value so one bad field never rejects the whole record.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

use super::labels::{ConvictionLevel, EmotionLevel, MarketCondition, TradeType};
use super::record::Direction;

/// Raw journal field before coercion. `Other` swallows arrays, objects and
/// nulls so a malformed cell degrades to `None` instead of a deserialize
/// error.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawField {
    Number(f64),
    Text(String),
    Flag(bool),
    Other(IgnoredAny),
}

fn clean_numeric(text: &str) -> String {
    text.trim()
        .trim_start_matches('$')
        .trim_end_matches('%')
        .replace(',', "")
}

fn decimal_from_raw(raw: &RawField) -> Option<Decimal> {
    match raw {
        RawField::Number(n) => Decimal::try_from(*n).ok(),
        RawField::Text(s) => {
            let cleaned = clean_numeric(s);
            if cleaned.is_empty() {
                None
            } else {
                cleaned.parse().ok()
            }
        }
        RawField::Flag(_) | RawField::Other(_) => None,
    }
}

/// Parse a calendar date from the formats seen in journal exports.
pub(crate) fn parse_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        // ISO datetime strings: keep the date prefix
        .or_else(|| {
            trimmed
                .get(..10)
                .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        })
        .or_else(|| NaiveDate::parse_from_str(trimmed, "%m/%d/%Y").ok())
}

/// Parse a clock time, with or without seconds.
pub(crate) fn parse_time(text: &str) -> Option<NaiveTime> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
        .ok()
        .or_else(|| NaiveTime::parse_from_str(trimmed, "%H:%M").ok())
}

pub(crate) fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(decimal_from_raw(&RawField::deserialize(deserializer)?))
}

pub(crate) fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawField::deserialize(deserializer)? {
        RawField::Text(s) => parse_date(&s),
        _ => None,
    })
}

pub(crate) fn lenient_time<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawField::deserialize(deserializer)? {
        RawField::Text(s) => parse_time(&s),
        _ => None,
    })
}

pub(crate) fn lenient_direction<'de, D>(deserializer: D) -> Result<Direction, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawField::deserialize(deserializer)? {
        RawField::Text(s) => s.parse().unwrap_or_default(),
        _ => Direction::default(),
    })
}

fn level_from_raw<T>(raw: &RawField) -> Option<T>
where
    T: TryFrom<u8> + std::str::FromStr,
{
    match raw {
        RawField::Number(n) if n.fract() == 0.0 && (1.0..=5.0).contains(n) => {
            T::try_from(*n as u8).ok()
        }
        RawField::Text(s) => s.parse().ok(),
        _ => None,
    }
}

pub(crate) fn lenient_emotion<'de, D>(deserializer: D) -> Result<Option<EmotionLevel>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(level_from_raw(&RawField::deserialize(deserializer)?))
}

pub(crate) fn lenient_conviction<'de, D>(
    deserializer: D,
) -> Result<Option<ConvictionLevel>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(level_from_raw(&RawField::deserialize(deserializer)?))
}

pub(crate) fn lenient_trade_type<'de, D>(deserializer: D) -> Result<Option<TradeType>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawField::deserialize(deserializer)? {
        RawField::Text(s) if !s.trim().is_empty() => {
            // Unknown labels still count as tagged trades
            Some(s.parse().unwrap_or(TradeType::Other))
        }
        _ => None,
    })
}

pub(crate) fn lenient_market_condition<'de, D>(
    deserializer: D,
) -> Result<Option<MarketCondition>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawField::deserialize(deserializer)? {
        RawField::Text(s) if !s.trim().is_empty() => {
            Some(s.parse().unwrap_or(MarketCondition::Other))
        }
        _ => None,
    })
}

pub(crate) fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawField::deserialize(deserializer)? {
        RawField::Flag(b) => Some(b),
        RawField::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" | "1" => Some(true),
            "false" | "no" | "n" | "0" => Some(false),
            _ => None,
        },
        RawField::Number(n) if n == 1.0 => Some(true),
        RawField::Number(n) if n == 0.0 => Some(false),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct DecimalProbe {
        #[serde(default, deserialize_with = "lenient_decimal")]
        value: Option<Decimal>,
    }

    fn probe(value: serde_json::Value) -> Option<Decimal> {
        serde_json::from_value::<DecimalProbe>(json!({ "value": value }))
            .expect("probe record should always deserialize")
            .value
    }

    #[test]
    fn test_decimal_accepts_numbers_and_strings() {
        assert_eq!(probe(json!(125.5)), Some(dec!(125.5)));
        assert_eq!(probe(json!("125.50")), Some(dec!(125.50)));
        assert_eq!(probe(json!("-42")), Some(dec!(-42)));
    }

    #[test]
    fn test_decimal_cleans_formatting() {
        assert_eq!(probe(json!("$1,250.75")), Some(dec!(1250.75)));
        assert_eq!(probe(json!("55%")), Some(dec!(55)));
        assert_eq!(probe(json!("  12.5  ")), Some(dec!(12.5)));
    }

    #[test]
    fn test_decimal_rejects_garbage() {
        assert_eq!(probe(json!("")), None);
        assert_eq!(probe(json!("n/a")), None);
        assert_eq!(probe(json!(null)), None);
        assert_eq!(probe(json!(true)), None);
        assert_eq!(probe(json!([1, 2])), None);
        assert_eq!(probe(json!({"nested": 1})), None);
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(parse_date("2024-03-15"), Some(expected));
        assert_eq!(parse_date("2024-03-15T09:30:00"), Some(expected));
        assert_eq!(parse_date("03/15/2024"), Some(expected));
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_parse_time_formats() {
        let expected = NaiveTime::from_hms_opt(9, 30, 0).unwrap();
        assert_eq!(parse_time("09:30"), Some(expected));
        assert_eq!(parse_time("09:30:00"), Some(expected));
        assert_eq!(parse_time("9:30am"), None);
    }
}
