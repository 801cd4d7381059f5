//! The day evaluator: one governance decision per mode per day.
//!
//! [`evaluate_day_at`] is a pure function of its inputs and the supplied
//! `computed_at` instant. For each mode it applies, in order:
//!
//! 1. the confidence gate (missing or LOW-confidence profile silences every mode),
//! 2. the no-window gate (no RELIABLE window for the mode on the day),
//! 3. earliest-start window selection,
//! 4. subtraction of overlapping busy blocks and the mode's minimum segment
//!    length, yielding PERMIT, FRAGMENTED or SILENCE.
//!
//! Reason strings are consumed verbatim downstream and must stay stable.
//! Degraded inputs never produce an error, only a SILENCE decision.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::breaks::{assess_window, UnavailableBlock};
use crate::interval::subtract_intervals;
use crate::mode::{Mode, WindowStatus};
use crate::resolve::local_date;
use crate::time::TimeWindow;

pub const REASON_CONFIDENCE_INSUFFICIENT: &str = "Confidence insufficient.";
pub const REASON_NO_RELIABLE_WINDOW: &str = "No reliable window available.";
pub const REASON_UNCONFLICTED: &str = "Window is structurally reliable and unconflicted.";
pub const REASON_SPLIT: &str = "Window is split by an unavailable time.";
pub const REASON_SHORTENED: &str = "Window is shortened by an unavailable time.";
pub const REASON_NO_VIABLE_SEGMENT: &str = "Window has no segment long enough for this mode.";
pub const REASON_WITHHELD: &str = "Window is withheld: the mode needs an unbroken block.";
pub const REASON_DISRUPTED: &str = "Window is disrupted by a fragmenting break.";
pub const REASON_RESTORATIVE_ONLY: &str = "Window is reliable; breaks are restorative.";

/// A busy block pinned to absolute instants.
pub type BusyBlock = UnavailableBlock<DateTime<Utc>>;

pub type AbsoluteWindow = TimeWindow<DateTime<Utc>>;

// ── Inputs ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Confidence {
    High,
    Med,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChronotypeProfile {
    pub chronotype: String,
    pub confidence: Confidence,
    pub computed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Reliability {
    Reliable,
    Fragile,
    Unavailable,
}

/// A candidate window for one mode on one day. Only RELIABLE windows are eligible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineWindow {
    pub mode: Mode,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub reliability: Reliability,
    pub source: String,
}

impl BaselineWindow {
    pub fn window(&self) -> AbsoluteWindow {
        TimeWindow::new(self.start, self.end)
    }
}

/// Everything the evaluator needs for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayInput {
    #[serde(alias = "date", alias = "dayISODate")]
    pub day: NaiveDate,
    #[serde(default)]
    pub profile: Option<ChronotypeProfile>,
    #[serde(default)]
    pub baseline_windows: Vec<BaselineWindow>,
    #[serde(default)]
    pub busy_blocks: Vec<BusyBlock>,
}

/// Which path turns a conflicted window into a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EvaluationStrategy {
    /// Every overlapping busy block cuts the window.
    #[default]
    SubtractionOnly,
    /// Blocks go through the break classifier first; restorative breaks do
    /// not cut the window and mode sensitivity can silence it outright.
    BreakAware,
}

/// Options for [`evaluate_day_at`].
#[derive(Debug, Clone)]
pub struct EvaluationOptions {
    /// Zone in which the evaluated day is interpreted.
    pub timezone: Tz,
    pub strategy: EvaluationStrategy,
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        Self {
            timezone: Tz::UTC,
            strategy: EvaluationStrategy::default(),
        }
    }
}

// ── Outputs ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Permit,
    Fragmented,
    Silence,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeGovernanceDecision {
    pub mode: Mode,
    pub decision: Decision,
    pub reason: String,
    /// The effective window for PERMIT, the baseline window for FRAGMENTED.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<AbsoluteWindow>,
    /// Surviving segments, FRAGMENTED only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segments: Option<Vec<AbsoluteWindow>>,
    pub computed_at: DateTime<Utc>,
}

impl ModeGovernanceDecision {
    fn permit(mode: Mode, window: AbsoluteWindow, reason: &str, computed_at: DateTime<Utc>) -> Self {
        Self {
            mode,
            decision: Decision::Permit,
            reason: reason.to_string(),
            window: Some(window),
            segments: None,
            computed_at,
        }
    }

    fn fragmented(
        mode: Mode,
        window: AbsoluteWindow,
        segments: Vec<AbsoluteWindow>,
        computed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            mode,
            decision: Decision::Fragmented,
            reason: REASON_SPLIT.to_string(),
            window: Some(window),
            segments: Some(segments),
            computed_at,
        }
    }

    fn silence(mode: Mode, reason: &str, computed_at: DateTime<Utc>) -> Self {
        Self {
            mode,
            decision: Decision::Silence,
            reason: reason.to_string(),
            window: None,
            segments: None,
            computed_at,
        }
    }
}

/// The per-day export shape: one decision per mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayReport {
    pub date: NaiveDate,
    pub decisions: [ModeGovernanceDecision; 5],
}

// ── Evaluation ──────────────────────────────────────────────────────────────

/// [`evaluate_day_at`] stamped with the current time.
pub fn evaluate_day(input: &DayInput, options: &EvaluationOptions) -> [ModeGovernanceDecision; 5] {
    evaluate_day_at(input, options, Utc::now())
}

/// Evaluate every mode for one day.
///
/// Always returns exactly five decisions, in [`Mode::ALL`] order, all
/// carrying the same `computed_at`. Input order does not matter.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use governance_engine::governor::{
///     evaluate_day_at, DayInput, Decision, EvaluationOptions, REASON_CONFIDENCE_INSUFFICIENT,
/// };
///
/// let input = DayInput {
///     day: "2026-03-16".parse().unwrap(),
///     profile: None,
///     baseline_windows: vec![],
///     busy_blocks: vec![],
/// };
/// let now = Utc.with_ymd_and_hms(2026, 3, 16, 6, 0, 0).unwrap();
/// let decisions = evaluate_day_at(&input, &EvaluationOptions::default(), now);
/// assert!(decisions.iter().all(|d| d.decision == Decision::Silence));
/// assert_eq!(decisions[0].reason, REASON_CONFIDENCE_INSUFFICIENT);
/// ```
pub fn evaluate_day_at(
    input: &DayInput,
    options: &EvaluationOptions,
    computed_at: DateTime<Utc>,
) -> [ModeGovernanceDecision; 5] {
    let confident = input
        .profile
        .as_ref()
        .is_some_and(|p| p.confidence != Confidence::Low);
    if !confident {
        debug!(day = %input.day, "confidence gate silenced every mode");
        return Mode::ALL.map(|mode| {
            ModeGovernanceDecision::silence(mode, REASON_CONFIDENCE_INSUFFICIENT, computed_at)
        });
    }

    Mode::ALL.map(|mode| {
        let decision = evaluate_mode(mode, input, options, computed_at);
        debug!(
            day = %input.day,
            mode = %mode,
            decision = ?decision.decision,
            reason = %decision.reason,
            "mode evaluated"
        );
        decision
    })
}

/// [`evaluate_day_at`] wrapped in the per-day export shape.
pub fn report_day(input: &DayInput, options: &EvaluationOptions, computed_at: DateTime<Utc>) -> DayReport {
    DayReport {
        date: input.day,
        decisions: evaluate_day_at(input, options, computed_at),
    }
}

fn evaluate_mode(
    mode: Mode,
    input: &DayInput,
    options: &EvaluationOptions,
    computed_at: DateTime<Utc>,
) -> ModeGovernanceDecision {
    let Some(window) = select_window(mode, &input.baseline_windows, input.day, &options.timezone) else {
        return ModeGovernanceDecision::silence(mode, REASON_NO_RELIABLE_WINDOW, computed_at);
    };

    let conflicts: Vec<AbsoluteWindow> = input
        .busy_blocks
        .iter()
        .map(UnavailableBlock::window)
        .filter(|b| b.overlaps(&window))
        .collect();
    if conflicts.is_empty() {
        return ModeGovernanceDecision::permit(mode, window, REASON_UNCONFLICTED, computed_at);
    }

    match options.strategy {
        EvaluationStrategy::SubtractionOnly => {
            decide_from_segments(mode, window, subtract_intervals(&window, &conflicts), computed_at)
        }
        EvaluationStrategy::BreakAware => {
            let assessment = assess_window(mode, &window, &input.busy_blocks);
            match assessment.overall_status {
                WindowStatus::Withheld => {
                    ModeGovernanceDecision::silence(mode, REASON_WITHHELD, computed_at)
                }
                WindowStatus::Disrupted => {
                    ModeGovernanceDecision::silence(mode, REASON_DISRUPTED, computed_at)
                }
                WindowStatus::Clear if assessment.fragmenting_break_count == 0 => {
                    ModeGovernanceDecision::permit(mode, window, REASON_RESTORATIVE_ONLY, computed_at)
                }
                WindowStatus::Clear | WindowStatus::Fragmented => {
                    let segments = assessment.segments.iter().map(|s| s.window()).collect();
                    decide_from_segments(mode, window, segments, computed_at)
                }
            }
        }
    }
}

/// The earliest RELIABLE window for `mode` that starts on `day` in `tz`.
/// Ties on start break on end, then source.
pub fn select_window(
    mode: Mode,
    windows: &[BaselineWindow],
    day: NaiveDate,
    tz: &Tz,
) -> Option<AbsoluteWindow> {
    windows
        .iter()
        .filter(|w| w.mode == mode && w.reliability == Reliability::Reliable)
        .filter(|w| local_date(w.start, tz) == day)
        .min_by(|a, b| (a.start, a.end, &a.source).cmp(&(b.start, b.end, &b.source)))
        .map(BaselineWindow::window)
}

/// Drop segments shorter than the mode's minimum and decide from what is left.
fn decide_from_segments(
    mode: Mode,
    window: AbsoluteWindow,
    segments: Vec<AbsoluteWindow>,
    computed_at: DateTime<Utc>,
) -> ModeGovernanceDecision {
    let min_minutes = mode.min_segment_minutes();
    let surviving: Vec<AbsoluteWindow> = segments
        .into_iter()
        .filter(|s| s.duration_minutes() >= min_minutes)
        .collect();

    match surviving.len() {
        0 => ModeGovernanceDecision::silence(mode, REASON_NO_VIABLE_SEGMENT, computed_at),
        1 => ModeGovernanceDecision::permit(mode, surviving[0], REASON_SHORTENED, computed_at),
        _ => ModeGovernanceDecision::fragmented(mode, window, surviving, computed_at),
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
