//! Kelly-criterion position sizing guidance.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use super::constants::{DEFAULT_PAYOFF_RATIO, HUNDRED, KELLY_CAP, TWO};
use super::precision::round;

/// Kelly fraction `f* = (p*b - q) / b` for a win probability (0-100) and a
/// win/loss payoff ratio, floored at zero and capped at 25% of capital.
#[must_use]
pub fn kelly_fraction(win_probability: Decimal, payoff_ratio: Decimal) -> Decimal {
    if payoff_ratio <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let p = (win_probability / HUNDRED).clamp(Decimal::ZERO, Decimal::ONE);
    let q = Decimal::ONE - p;
    (((p * payoff_ratio) - q) / payoff_ratio).clamp(Decimal::ZERO, KELLY_CAP)
}

/// Sizing guidance derived from the Kelly fraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KellyRecommendation {
    /// Win probability the sizing is based on (0-100).
    pub win_probability: Decimal,
    /// Payoff ratio assumed.
    pub payoff_ratio: Decimal,
    /// Full Kelly as an integer percentage of capital.
    pub kelly_pct: u32,
    /// Half Kelly as an integer percentage of capital.
    pub half_kelly_pct: u32,
    /// Suggested sizing range ("8-17% of capital").
    pub range: String,
    /// Human-readable guidance.
    pub guidance: String,
}

/// Build sizing guidance for a win probability (0-100); the payoff ratio
/// defaults to 1.5 when the caller has no realized figure.
#[must_use]
pub fn kelly_recommendation(
    win_probability: Decimal,
    payoff_ratio: Option<Decimal>,
) -> KellyRecommendation {
    let ratio = payoff_ratio.unwrap_or(DEFAULT_PAYOFF_RATIO);
    let fraction = kelly_fraction(win_probability, ratio);
    let kelly_pct = round(fraction * HUNDRED, 0).to_u32().unwrap_or(0);
    let half_kelly_pct = round(fraction * HUNDRED / TWO, 0).to_u32().unwrap_or(0);

    let (range, guidance) = if kelly_pct == 0 {
        (
            "0%".to_string(),
            "No edge at the assumed payoff; stand aside or size minimal.".to_string(),
        )
    } else {
        (
            format!("{half_kelly_pct}-{kelly_pct}% of capital"),
            format!(
                "Risk between half Kelly ({half_kelly_pct}%) and full Kelly ({kelly_pct}%); half Kelly trades growth for smoother equity."
            ),
        )
    };

    KellyRecommendation {
        win_probability,
        payoff_ratio: ratio,
        kelly_pct,
        half_kelly_pct,
        range,
        guidance,
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use test_case::test_case;

    use super::*;

    #[test_case(dec!(50), dec!(1.5) => dec!(16.67); "modest edge")]
    #[test_case(dec!(60), dec!(1.5) => dec!(25.00); "strong edge hits the cap")]
    #[test_case(dec!(30), dec!(1.5) => Decimal::ZERO; "negative edge floors at zero")]
    #[test_case(dec!(55), dec!(0) => Decimal::ZERO; "degenerate payoff")]
    fn test_kelly_fraction_pct(win_probability: Decimal, payoff: Decimal) -> Decimal {
        round(kelly_fraction(win_probability, payoff) * dec!(100), 2)
    }

    #[test]
    fn test_recommendation_range() {
        let rec = kelly_recommendation(dec!(50), None);
        assert_eq!(rec.payoff_ratio, dec!(1.5));
        assert_eq!(rec.kelly_pct, 17);
        assert_eq!(rec.half_kelly_pct, 8);
        assert_eq!(rec.range, "8-17% of capital");
    }

    #[test]
    fn test_recommendation_without_edge() {
        let rec = kelly_recommendation(dec!(20), None);
        assert_eq!(rec.kelly_pct, 0);
        assert_eq!(rec.range, "0%");
        assert!(rec.guidance.contains("No edge"));
    }

    #[test]
    fn test_cap_applies() {
        let rec = kelly_recommendation(dec!(90), Some(dec!(3)));
        assert_eq!(rec.kelly_pct, 25);
    }
}
