//! Decimal constants shared across analytics calculations.

use rust_decimal::Decimal;

pub const TWO: Decimal = Decimal::TWO;
pub const HUNDRED: Decimal = Decimal::ONE_HUNDRED;
pub const TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 7); // 0.0000001

/// Reported in place of an unbounded profit factor when there are no losses.
pub const PROFIT_FACTOR_CAP: Decimal = Decimal::from_parts(99_999, 0, 0, false, 2); // 999.99

/// |actual - planned| R:R band treated as matching the plan.
pub const RR_TOLERANCE: Decimal = Decimal::from_parts(2, 0, 0, false, 1); // 0.2
/// Realized R at or below this, on a losing trade, counts as a full stop-out.
pub const STOP_OUT_R: Decimal = Decimal::from_parts(8, 0, 0, true, 1); // -0.8
/// Exit/stop distance ratio up to which the stop counts as respected.
pub const STOP_RESPECTED_MAX: Decimal = Decimal::from_parts(11, 0, 0, false, 1); // 1.1
/// Exit/stop distance ratio up to which the stop counts as partially respected.
pub const STOP_PARTIAL_MAX: Decimal = Decimal::from_parts(15, 0, 0, false, 1); // 1.5

/// Prior returned when the history is too thin to predict from.
pub const NEUTRAL_WIN_PROBABILITY: Decimal = Decimal::from_parts(50, 0, 0, false, 0);
/// Lower clamp on predicted win probability.
pub const PROBABILITY_FLOOR: Decimal = Decimal::from_parts(15, 0, 0, false, 0);
/// Upper clamp on predicted win probability.
pub const PROBABILITY_CEILING: Decimal = Decimal::from_parts(85, 0, 0, false, 0);
/// Planned R:R values within this distance count as similar setups.
pub const RR_SIMILARITY: Decimal = Decimal::from_parts(5, 0, 0, false, 1); // 0.5

/// Hard cap on the Kelly fraction.
pub const KELLY_CAP: Decimal = Decimal::from_parts(25, 0, 0, false, 2); // 0.25
/// Win/loss payoff ratio assumed when the caller supplies none.
pub const DEFAULT_PAYOFF_RATIO: Decimal = Decimal::from_parts(15, 0, 0, false, 1); // 1.5

/// Calibration bias (percentage points) beyond which predictions are flagged.
pub const CALIBRATION_BIAS_LIMIT: Decimal = Decimal::from_parts(5, 0, 0, false, 0);
