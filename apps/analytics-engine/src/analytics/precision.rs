//! Deterministic rounding, formatting, and division primitives.
//!
//! Every division and every final currency or percentage value in the engine
//! routes through these helpers so results are reproducible to the digit
//! across runs and machines.

use rust_decimal::{Decimal, RoundingStrategy};

use super::constants::HUNDRED;

/// Round half-away-from-zero to `dp` decimal places.
#[must_use]
pub fn round(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Round to the 2 decimal places used for currency and percentages.
#[must_use]
pub fn round2(value: Decimal) -> Decimal {
    round(value, 2)
}

/// Fixed-point decimal string with trailing zeros (`12.5` -> `"12.50"`).
#[must_use]
pub fn format_fixed(value: Decimal, dp: u32) -> String {
    format!("{:.prec$}", round(value, dp), prec = dp as usize)
}

/// Division that treats a zero denominator as zero instead of producing an
/// error or an unbounded value.
#[must_use]
pub fn safe_divide(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        Decimal::ZERO
    } else {
        numerator / denominator
    }
}

/// `part / whole` expressed as a 0-100 percentage, rounded to 2 places.
#[must_use]
pub fn percentage(part: Decimal, whole: Decimal) -> Decimal {
    round2(safe_divide(part, whole) * HUNDRED)
}
