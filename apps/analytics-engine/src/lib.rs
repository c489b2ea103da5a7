// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! Analytics Engine - Trade Journal Core Library
//!
//! Deterministic, side-effect-free analytics over journal trade records.
//! The journal frontend owns forms, charts, CSV import, and persistence;
//! this crate owns the numbers behind them.
//!
//! # Layers
//!
//! - `trade`: the journal entry record, its label sets, and the lenient
//!   parsing that turns loose journal JSON into typed fields
//! - `analytics`: the computations - aggregate statistics, drawdown
//!   episodes, risk/reward adherence, categorical breakdowns, win
//!   probability, EV calibration, Kelly sizing, position-size analysis
//!
//! Every function is a pure transform from `&[TradeRecord]` to a fresh
//! serializable result. Malformed financial data never raises: bad fields
//! exclude a trade from the affected computation, degenerate denominators
//! map to documented sentinels, and thin samples come back as "not enough
//! data" descriptions.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// Input data model - the journal entry record and its label sets.
pub mod trade;

/// Pure-computation analytics over journal records.
pub mod analytics;

// Data model re-exports
pub use trade::{
    ConvictionLevel, Direction, EmotionLevel, MarketCondition, TradeRecord, TradeType,
};

// Analytics re-exports
pub use analytics::{
    DrawdownReport, EvAccuracyReport, JournalReport, KellyRecommendation, PerformanceSummary,
    PositionSizeReport, RiskRewardReport, StopLossReport, journal_report, predict_win_probability,
};
pub use analytics::drawdown::drawdown_report;
pub use analytics::kelly::{kelly_fraction, kelly_recommendation};
pub use analytics::summary::performance_summary;
