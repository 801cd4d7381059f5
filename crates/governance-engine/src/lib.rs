//! # governance-engine
//!
//! Deterministic reliability governance for cognitive work modes.
//!
//! Given a user's chronotype-derived baseline windows and the time they are
//! unavailable, the engine decides for each of five modes (problem-framing,
//! evaluation, synthesis, execution, reflection) whether the day's conditions
//! are reliable enough to recommend it: PERMIT, FRAGMENTED, or SILENCE.
//! Everything is a pure function of its inputs; no I/O, no shared state.
//!
//! ## Modules
//!
//! - [`time`] — `HH:MM` conversions, durations, windows, and strict intersection
//! - [`interval`] — Subtract merged unavailable intervals from a window
//! - [`breaks`] — Classify breaks as restorative or fragmenting and assess a window
//! - [`mode`] — Modes, their legal window states, and minimum segment lengths
//! - [`governor`] — Per-mode decisions for a whole day
//! - [`resolve`] — Pin wall-clock inputs to a calendar day and timezone
//! - [`error`] — Error types

pub mod breaks;
pub mod error;
pub mod governor;
pub mod interval;
pub mod mode;
pub mod resolve;
pub mod time;

pub use breaks::{
    apply_cumulative_cost, assess_clock_window, assess_window, classify_breaks, BreakAssessment,
    BreakRule, BreakType, Classification, ClassifiedBreak, UnavailableBlock,
};
pub use error::GovernanceError;
pub use governor::{
    evaluate_day, evaluate_day_at, report_day, select_window, BaselineWindow, BusyBlock,
    ChronotypeProfile, Confidence, DayInput, DayReport, Decision, EvaluationOptions,
    EvaluationStrategy, ModeGovernanceDecision, Reliability,
};
pub use interval::{available_segments, merge_intervals, subtract_intervals, AvailableSegment};
pub use mode::{is_valid_state_for_mode, DiscoveryWindow, Mode, ModeState, WindowStatus};
pub use resolve::{parse_day, parse_rfc3339, parse_timezone, resolve_local_blocks};
pub use time::{
    duration_minutes, intersect, minutes_to_time, time_to_minutes, ClockTime, TimePoint, TimeWindow,
};
