//! Statistical math utilities for analytics calculations.

use rust_decimal::Decimal;

use super::constants::{TOLERANCE, TWO};

/// Calculate mean of a slice of decimals.
pub fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let sum: Decimal = values.iter().sum();
    Some(sum / Decimal::from(values.len() as u64))
}

/// Sample standard deviation (n-1 denominator).
pub fn std_dev(values: &[Decimal]) -> Option<Decimal> {
    if values.len() < 2 {
        return None;
    }

    let avg = mean(values)?;
    let variance_sum: Decimal = values.iter().map(|v| (*v - avg) * (*v - avg)).sum();
    let variance = variance_sum / Decimal::from((values.len() - 1) as u64);

    sqrt_decimal(variance)
}

/// Downside deviation: root mean square of the negative values, over the
/// total observation count.
pub fn downside_deviation(values: &[Decimal]) -> Option<Decimal> {
    if values.len() < 2 {
        return None;
    }

    let negative: Vec<Decimal> = values
        .iter()
        .filter(|v| **v < Decimal::ZERO)
        .copied()
        .collect();

    if negative.is_empty() {
        return Some(Decimal::ZERO);
    }

    let variance_sum: Decimal = negative.iter().map(|v| *v * *v).sum();
    let variance = variance_sum / Decimal::from(values.len() as u64); // Use total count

    sqrt_decimal(variance)
}

/// Median of a slice; the mean of the middle pair for even counts.
pub fn median(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / TWO)
    }
}

/// Pearson correlation coefficient over (x, y) points.
///
/// `None` when there are fewer than two points or either coordinate has zero
/// variance.
pub fn pearson(points: &[(Decimal, Decimal)]) -> Option<Decimal> {
    if points.len() < 2 {
        return None;
    }

    let xs: Vec<Decimal> = points.iter().map(|(x, _)| *x).collect();
    let ys: Vec<Decimal> = points.iter().map(|(_, y)| *y).collect();
    let mean_x = mean(&xs)?;
    let mean_y = mean(&ys)?;

    let mut covariance = Decimal::ZERO;
    let mut variance_x = Decimal::ZERO;
    let mut variance_y = Decimal::ZERO;
    for (x, y) in points {
        let dx = *x - mean_x;
        let dy = *y - mean_y;
        covariance += dx * dy;
        variance_x += dx * dx;
        variance_y += dy * dy;
    }

    let denominator = sqrt_decimal(variance_x)? * sqrt_decimal(variance_y)?;
    if denominator == Decimal::ZERO {
        return None;
    }
    Some(covariance / denominator)
}

/// Approximate square root using Newton's method.
pub fn sqrt_decimal(value: Decimal) -> Option<Decimal> {
    if value < Decimal::ZERO {
        return None;
    }
    if value == Decimal::ZERO {
        return Some(Decimal::ZERO);
    }

    let mut guess = value / TWO;

    for _ in 0..50 {
        let next = (guess + value / guess) / TWO;
        if (next - guess).abs() < TOLERANCE {
            return Some(next);
        }
        guess = next;
    }

    Some(guess)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_mean() {
        let values = vec![dec!(10), dec!(20), dec!(30), dec!(40)];
        assert_eq!(mean(&values), Some(dec!(25)));
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_std_dev() {
        let values = vec![dec!(10), dec!(20), dec!(30), dec!(40)];
        let Some(std) = std_dev(&values) else {
            panic!("std_dev should succeed for non-empty values");
        };
        // Expected sample std dev ~ 12.9
        assert!(std > dec!(12) && std < dec!(14));
        assert_eq!(std_dev(&[dec!(5)]), None);
    }

    #[test]
    fn test_downside_deviation_all_positive() {
        let values = vec![dec!(10), dec!(20)];
        assert_eq!(downside_deviation(&values), Some(Decimal::ZERO));
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[dec!(3), dec!(1), dec!(2)]), Some(dec!(2)));
        assert_eq!(
            median(&[dec!(4), dec!(1), dec!(2), dec!(3)]),
            Some(dec!(2.5))
        );
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_pearson_perfect_correlation() {
        let points = vec![
            (dec!(1), dec!(2)),
            (dec!(2), dec!(4)),
            (dec!(3), dec!(6)),
        ];
        let Some(r) = pearson(&points) else {
            panic!("pearson should succeed");
        };
        assert!((r - Decimal::ONE).abs() < dec!(0.0001));

        let inverse = vec![
            (dec!(1), dec!(6)),
            (dec!(2), dec!(4)),
            (dec!(3), dec!(2)),
        ];
        let Some(r) = pearson(&inverse) else {
            panic!("pearson should succeed");
        };
        assert!((r + Decimal::ONE).abs() < dec!(0.0001));
    }

    #[test]
    fn test_pearson_zero_variance() {
        let flat = vec![(dec!(1), dec!(5)), (dec!(2), dec!(5))];
        assert_eq!(pearson(&flat), None);
    }

    #[test]
    fn test_sqrt() {
        let Some(sqrt4) = sqrt_decimal(dec!(4)) else {
            panic!("sqrt of 4 should succeed");
        };
        assert!((sqrt4 - dec!(2)).abs() < dec!(0.001));

        let Some(sqrt9) = sqrt_decimal(dec!(9)) else {
            panic!("sqrt of 9 should succeed");
        };
        assert!((sqrt9 - dec!(3)).abs() < dec!(0.001));

        assert_eq!(sqrt_decimal(dec!(-1)), None);
    }
}
