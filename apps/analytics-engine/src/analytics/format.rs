//! Formatting helpers for insight text.

use rust_decimal::Decimal;

use super::precision::format_fixed;

/// Format a 0-100 percentage value ("54.3%").
#[must_use]
pub fn format_pct(value: Decimal) -> String {
    format!("{}%", format_fixed(value, 1))
}

/// Format a currency amount ("$12.50", "-$12.50").
#[must_use]
pub fn format_currency(value: Decimal) -> String {
    if value < Decimal::ZERO {
        format!("-${}", format_fixed(-value, 2))
    } else {
        format!("${}", format_fixed(value, 2))
    }
}

/// Format a ratio with 2 decimal places.
#[must_use]
pub fn format_ratio(value: Decimal) -> String {
    format_fixed(value, 2)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_format_helpers() {
        assert_eq!(format_pct(dec!(54.35)), "54.4%");
        assert_eq!(format_currency(dec!(12.5)), "$12.50");
        assert_eq!(format_currency(dec!(-12.5)), "-$12.50");
        assert_eq!(format_ratio(dec!(2.345)), "2.35");
    }
}
