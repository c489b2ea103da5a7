//! Calibration of predicted expected value against realized outcomes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::closed_in_order;
use super::constants::CALIBRATION_BIAS_LIMIT;
use super::math::mean;
use super::precision::{percentage, round2};
use crate::trade::TradeRecord;

/// One fixed expected-value band: `[lower, upper)` in account currency.
struct Band {
    label: &'static str,
    lower: Option<Decimal>,
    upper: Option<Decimal>,
}

const NEG_100: Decimal = Decimal::from_parts(100, 0, 0, true, 0);
const NEG_20: Decimal = Decimal::from_parts(20, 0, 0, true, 0);
const POS_20: Decimal = Decimal::from_parts(20, 0, 0, false, 0);
const POS_100: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

const BANDS: [Band; 6] = [
    Band {
        label: "Strongly negative",
        lower: None,
        upper: Some(NEG_100),
    },
    Band {
        label: "Negative",
        lower: Some(NEG_100),
        upper: Some(NEG_20),
    },
    Band {
        label: "Slightly negative",
        lower: Some(NEG_20),
        upper: Some(Decimal::ZERO),
    },
    Band {
        label: "Slightly positive",
        lower: Some(Decimal::ZERO),
        upper: Some(POS_20),
    },
    Band {
        label: "Positive",
        lower: Some(POS_20),
        upper: Some(POS_100),
    },
    Band {
        label: "Strongly positive",
        lower: Some(POS_100),
        upper: None,
    },
];

impl Band {
    fn contains(&self, value: Decimal) -> bool {
        self.lower.is_none_or(|lower| value >= lower) && self.upper.is_none_or(|upper| value < upper)
    }
}

/// Overall direction of the prediction error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Calibration {
    /// Predicted win probabilities run more than the limit above reality.
    Optimistic,
    /// Predicted win probabilities run more than the limit below reality.
    Pessimistic,
    /// Predictions within the limit of reality.
    Calibrated,
}

impl Calibration {
    fn from_bias(bias: Decimal) -> Self {
        if bias < -CALIBRATION_BIAS_LIMIT {
            Self::Optimistic
        } else if bias > CALIBRATION_BIAS_LIMIT {
            Self::Pessimistic
        } else {
            Self::Calibrated
        }
    }
}

/// Predicted-vs-realized stats for one expected-value band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvBand {
    /// Band label.
    pub label: String,
    /// Closed trades whose expected value fell in the band.
    pub count: u64,
    /// Mean predicted win probability (0-100) in the band.
    pub average_predicted: Decimal,
    /// Realized win rate (0-100) in the band.
    pub realized_win_rate: Decimal,
    /// Realized minus predicted, in percentage points.
    pub bias: Decimal,
}

/// Expected-value calibration across the six fixed bands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvAccuracyReport {
    /// All six bands, most negative first; empty bands carry zero counts.
    pub bands: Vec<EvBand>,
    /// Trades with both an expected value and a predicted win probability.
    pub sample_size: u64,
    /// Realized minus predicted over the whole sample.
    pub overall_bias: Decimal,
    /// Flag raised when the overall bias exceeds the limit either way.
    pub calibration: Calibration,
    /// Human-readable summary.
    pub description: String,
}

/// Score how well predicted expected value and win probability matched
/// realized outcomes.
#[must_use]
pub fn ev_accuracy_report(trades: &[TradeRecord]) -> EvAccuracyReport {
    let rows: Vec<(Decimal, Decimal, bool)> = closed_in_order(trades)
        .iter()
        .filter_map(|t| Some((t.expected_value?, t.win_probability?, t.is_winner())))
        .collect();

    let bands: Vec<EvBand> = BANDS
        .iter()
        .map(|band| {
            let in_band: Vec<&(Decimal, Decimal, bool)> =
                rows.iter().filter(|(ev, _, _)| band.contains(*ev)).collect();
            let predicted: Vec<Decimal> = in_band.iter().map(|(_, p, _)| *p).collect();
            let winners = in_band.iter().filter(|(_, _, won)| *won).count();
            let average_predicted = mean(&predicted).map_or(Decimal::ZERO, round2);
            let realized_win_rate = percentage(
                Decimal::from(winners as u64),
                Decimal::from(in_band.len() as u64),
            );
            EvBand {
                label: band.label.to_string(),
                count: in_band.len() as u64,
                average_predicted,
                realized_win_rate,
                bias: if in_band.is_empty() {
                    Decimal::ZERO
                } else {
                    round2(realized_win_rate - average_predicted)
                },
            }
        })
        .collect();

    let sample_size = rows.len() as u64;
    let predicted_all: Vec<Decimal> = rows.iter().map(|(_, p, _)| *p).collect();
    let winners_all = rows.iter().filter(|(_, _, won)| *won).count();
    let overall_bias = if rows.is_empty() {
        Decimal::ZERO
    } else {
        let realized = percentage(
            Decimal::from(winners_all as u64),
            Decimal::from(sample_size),
        );
        round2(realized - mean(&predicted_all).unwrap_or_default())
    };
    let calibration = Calibration::from_bias(overall_bias);

    let magnitude = overall_bias.abs();
    let description = if rows.is_empty() {
        "Not enough trades with expected value and win probability to score.".to_string()
    } else {
        match calibration {
            Calibration::Optimistic => format!(
                "Win probabilities run optimistic: realized outcomes average {magnitude} points below prediction."
            ),
            Calibration::Pessimistic => format!(
                "Win probabilities run pessimistic: realized outcomes average {magnitude} points above prediction."
            ),
            Calibration::Calibrated => {
                format!("Predictions are well calibrated (bias {overall_bias} points).")
            }
        }
    };

    EvAccuracyReport {
        bands,
        sample_size,
        overall_bias,
        calibration,
        description,
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn scored_trade(id: u32, ev: Decimal, predicted: Decimal, pnl: Decimal) -> TradeRecord {
        TradeRecord {
            id: format!("t-{id}"),
            asset: "CL".to_string(),
            expected_value: Some(ev),
            win_probability: Some(predicted),
            pnl: Some(pnl),
            ..TradeRecord::default()
        }
    }

    #[test]
    fn test_band_assignment() {
        let trades = vec![
            scored_trade(1, dec!(-150), dec!(30), dec!(-10)),
            scored_trade(2, dec!(-50), dec!(40), dec!(-10)),
            scored_trade(3, dec!(-5), dec!(45), dec!(10)),
            scored_trade(4, dec!(5), dec!(55), dec!(10)),
            scored_trade(5, dec!(50), dec!(60), dec!(10)),
            scored_trade(6, dec!(150), dec!(70), dec!(10)),
        ];
        let report = ev_accuracy_report(&trades);

        assert_eq!(report.bands.len(), 6);
        for band in &report.bands {
            assert_eq!(band.count, 1, "band {} miscounted", band.label);
        }
        assert_eq!(report.bands[0].label, "Strongly negative");
        assert_eq!(report.bands[0].realized_win_rate, Decimal::ZERO);
        assert_eq!(report.bands[5].realized_win_rate, dec!(100.00));
    }

    #[test]
    fn test_optimistic_trader_is_flagged() {
        // Predicted 80% everywhere, realized 25%
        let trades: Vec<TradeRecord> = (0..8)
            .map(|i| {
                let pnl = if i < 2 { dec!(10) } else { dec!(-10) };
                scored_trade(i, dec!(50), dec!(80), pnl)
            })
            .collect();
        let report = ev_accuracy_report(&trades);
        assert_eq!(report.overall_bias, dec!(-55.00));
        assert_eq!(report.calibration, Calibration::Optimistic);
        assert!(report.description.contains("optimistic"));
    }

    #[test]
    fn test_calibrated_within_limit() {
        // Predicted 50%, realized 50%
        let trades: Vec<TradeRecord> = (0..8)
            .map(|i| {
                let pnl = if i % 2 == 0 { dec!(10) } else { dec!(-10) };
                scored_trade(i, dec!(10), dec!(50), pnl)
            })
            .collect();
        let report = ev_accuracy_report(&trades);
        assert_eq!(report.overall_bias, Decimal::ZERO);
        assert_eq!(report.calibration, Calibration::Calibrated);
    }

    #[test]
    fn test_empty_sample() {
        let report = ev_accuracy_report(&[]);
        assert_eq!(report.sample_size, 0);
        assert_eq!(report.calibration, Calibration::Calibrated);
        assert!(report.description.contains("Not enough"));
        assert_eq!(report.bands.len(), 6);
    }
}
