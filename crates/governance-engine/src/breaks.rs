//! Break classification: restorative or fragmenting.
//!
//! Every unavailable block that overlaps a baseline window is judged by a
//! fixed, ordered rule list (first match wins):
//!
//! | Rule | Condition | Verdict |
//! |---|---|---|
//! | 0 | commitment | fragmenting |
//! | 1 | rest longer than 30 minutes | fragmenting |
//! | 2 | an adjacent free segment is shorter than 30 minutes | fragmenting |
//! | 3 | unclassified longer than 20 minutes | fragmenting |
//! | — | otherwise | restorative |
//!
//! A window-level check then charges 20 minutes of ramp-up per
//! non-commitment block. If that exceeds 30% of the window while any block is
//! still restorative, every restorative block becomes fragmenting.
//!
//! Rule 3 is a heuristic nudge, not a correctness requirement.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::interval::{available_segments, covered_minutes, subtract_intervals, AvailableSegment};
use crate::mode::{Mode, ModeState, WindowStatus};
use crate::time::{ClockTime, TimePoint, TimeWindow};

/// Free segments at least this long are viable at classification time.
pub const VIABLE_SEGMENT_MINUTES: i64 = 30;
/// Rest breaks longer than this lose momentum.
pub const REST_BREAK_LIMIT_MINUTES: i64 = 30;
/// Unclassified breaks longer than this are assumed fragmenting.
pub const UNCLASSIFIED_BREAK_LIMIT_MINUTES: i64 = 20;
/// Re-entry cost charged per non-commitment break.
pub const RAMP_UP_MINUTES_PER_BREAK: i64 = 20;
/// Share of the window that total ramp-up may consume.
pub const RAMP_UP_WINDOW_FRACTION: f64 = 0.30;

pub const REASON_COMMITMENT: &str = "Commitment requires leaving the working context.";
pub const REASON_LONG_REST: &str = "Rest break longer than 30 minutes loses momentum.";
pub const REASON_SHORT_ADJACENT_SEGMENT: &str = "Leaves an adjacent segment shorter than 30 minutes.";
pub const REASON_LONG_UNCLASSIFIED: &str = "Unclassified break longer than 20 minutes.";
pub const REASON_CUMULATIVE_RAMP_UP: &str = "Cumulative ramp-up cost exceeds 30% of the window.";
pub const REASON_RESTORATIVE: &str = "Short break; treated as restorative.";

// ── Inputs ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakType {
    /// A fixed obligation elsewhere (meeting, class, appointment).
    Commitment,
    /// A deliberate pause.
    Rest,
    #[default]
    Unclassified,
}

/// A busy interval supplied by the caller. Identity is `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnavailableBlock<T> {
    pub id: String,
    pub start: T,
    pub end: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_type: Option<BreakType>,
}

impl<T: TimePoint> UnavailableBlock<T> {
    pub fn new(id: impl Into<String>, start: T, end: T) -> Self {
        Self {
            id: id.into(),
            start,
            end,
            label: None,
            break_type: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_break_type(mut self, break_type: BreakType) -> Self {
        self.break_type = Some(break_type);
        self
    }

    /// The declared break type; absent means unclassified.
    pub fn break_type(&self) -> BreakType {
        self.break_type.unwrap_or_default()
    }

    pub fn window(&self) -> TimeWindow<T> {
        TimeWindow::new(self.start, self.end)
    }

    pub fn duration_minutes(&self) -> i64 {
        self.window().duration_minutes()
    }
}

// ── Outputs ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Restorative,
    Fragmenting,
}

/// Which rule produced a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BreakRule {
    Commitment,
    LongRest,
    ShortAdjacentSegment,
    LongUnclassified,
    CumulativeRampUp,
    Restorative,
}

impl BreakRule {
    pub fn classification(self) -> Classification {
        match self {
            BreakRule::Restorative => Classification::Restorative,
            _ => Classification::Fragmenting,
        }
    }

    pub fn reason(self) -> &'static str {
        match self {
            BreakRule::Commitment => REASON_COMMITMENT,
            BreakRule::LongRest => REASON_LONG_REST,
            BreakRule::ShortAdjacentSegment => REASON_SHORT_ADJACENT_SEGMENT,
            BreakRule::LongUnclassified => REASON_LONG_UNCLASSIFIED,
            BreakRule::CumulativeRampUp => REASON_CUMULATIVE_RAMP_UP,
            BreakRule::Restorative => REASON_RESTORATIVE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedBreak<T> {
    pub id: String,
    pub start: T,
    pub end: T,
    pub break_type: BreakType,
    pub duration_minutes: i64,
    pub classification: Classification,
    pub rule: BreakRule,
    pub reason: String,
}

impl<T: TimePoint> ClassifiedBreak<T> {
    fn new(block: &UnavailableBlock<T>, rule: BreakRule) -> Self {
        Self {
            id: block.id.clone(),
            start: block.start,
            end: block.end,
            break_type: block.break_type(),
            duration_minutes: block.duration_minutes(),
            classification: rule.classification(),
            rule,
            reason: rule.reason().to_string(),
        }
    }

    fn reclassified(self, rule: BreakRule) -> Self {
        Self {
            classification: rule.classification(),
            rule,
            reason: rule.reason().to_string(),
            ..self
        }
    }

    pub fn window(&self) -> TimeWindow<T> {
        TimeWindow::new(self.start, self.end)
    }

    pub fn is_fragmenting(&self) -> bool {
        self.classification == Classification::Fragmenting
    }
}

/// The classifier's full verdict for one mode and window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakAssessment<T> {
    pub breaks: Vec<ClassifiedBreak<T>>,
    /// Free segments cut by fragmenting breaks only.
    pub segments: Vec<AvailableSegment<T>>,
    pub mode_state: ModeState,
    pub overall_status: WindowStatus,
    /// Window minutes not covered by any break, restorative ones included.
    pub total_available_minutes: i64,
    pub availability_percent: f64,
    pub fragmenting_break_count: usize,
    pub restorative_break_count: usize,
}

// ── Classification ──────────────────────────────────────────────────────────

/// Classify every block that overlaps `window`, then apply the cumulative
/// ramp-up check. Blocks that only touch the window are ignored.
pub fn classify_breaks<T: TimePoint>(
    window: &TimeWindow<T>,
    blocks: &[UnavailableBlock<T>],
) -> Vec<ClassifiedBreak<T>> {
    let overlapping: Vec<&UnavailableBlock<T>> =
        blocks.iter().filter(|b| b.window().overlaps(window)).collect();
    let busy: Vec<TimeWindow<T>> = overlapping.iter().map(|b| b.window()).collect();
    let free = subtract_intervals(window, &busy);

    let classified = overlapping
        .into_iter()
        .map(|block| {
            let rule = classify_block(block, &free);
            trace!(id = %block.id, ?rule, "break classified");
            ClassifiedBreak::new(block, rule)
        })
        .collect();

    apply_cumulative_cost(window, classified)
}

/// Rules 0 through 3 for a single block. `free` is the window minus every
/// overlapping block.
fn classify_block<T: TimePoint>(block: &UnavailableBlock<T>, free: &[TimeWindow<T>]) -> BreakRule {
    let duration = block.duration_minutes();
    let break_type = block.break_type();

    if break_type == BreakType::Commitment {
        return BreakRule::Commitment;
    }
    if break_type == BreakType::Rest && duration > REST_BREAK_LIMIT_MINUTES {
        return BreakRule::LongRest;
    }
    if shortest_adjacent_segment(&block.window(), free).is_some_and(|m| m < VIABLE_SEGMENT_MINUTES) {
        return BreakRule::ShortAdjacentSegment;
    }
    if break_type == BreakType::Unclassified && duration > UNCLASSIFIED_BREAK_LIMIT_MINUTES {
        return BreakRule::LongUnclassified;
    }
    BreakRule::Restorative
}

/// Duration of the shorter of the free segments immediately before and after
/// `block`, if either exists.
fn shortest_adjacent_segment<T: TimePoint>(block: &TimeWindow<T>, free: &[TimeWindow<T>]) -> Option<i64> {
    let before = free.iter().rev().find(|s| s.end <= block.start);
    let after = free.iter().find(|s| s.start >= block.end);
    before
        .into_iter()
        .chain(after)
        .map(TimeWindow::duration_minutes)
        .min()
}

/// Rule 4: charge ramp-up per non-commitment break and, when it exceeds the
/// allowed share of the window, turn every restorative break fragmenting.
///
/// Returns a new list; commitments are never touched.
pub fn apply_cumulative_cost<T: TimePoint>(
    window: &TimeWindow<T>,
    breaks: Vec<ClassifiedBreak<T>>,
) -> Vec<ClassifiedBreak<T>> {
    let non_commitment = breaks
        .iter()
        .filter(|b| b.break_type != BreakType::Commitment)
        .count() as i64;
    let ramp_up = RAMP_UP_MINUTES_PER_BREAK * non_commitment;
    let allowance = window.duration_minutes() as f64 * RAMP_UP_WINDOW_FRACTION;
    let any_restorative = breaks.iter().any(|b| !b.is_fragmenting());

    if (ramp_up as f64) <= allowance || !any_restorative {
        return breaks;
    }

    trace!(ramp_up, allowance, "cumulative ramp-up reclassifies restorative breaks");
    breaks
        .into_iter()
        .map(|b| {
            if b.is_fragmenting() {
                b
            } else {
                b.reclassified(BreakRule::CumulativeRampUp)
            }
        })
        .collect()
}

// ── Assessment ──────────────────────────────────────────────────────────────

/// Classify the breaks in `window` and derive the mode's window status.
///
/// # Examples
///
/// ```
/// use governance_engine::breaks::{assess_window, BreakType, UnavailableBlock};
/// use governance_engine::mode::{Mode, WindowStatus};
/// use governance_engine::time::{ClockTime, TimeWindow};
///
/// let window = TimeWindow::<ClockTime>::parse_range("08:00-12:00").unwrap();
/// let start: ClockTime = "10:00".parse().unwrap();
/// let end: ClockTime = "10:05".parse().unwrap();
/// let meeting = UnavailableBlock::new("standup", start, end)
///     .with_break_type(BreakType::Commitment);
///
/// let assessment = assess_window(Mode::Evaluation, &window, &[meeting]);
/// assert_eq!(assessment.overall_status, WindowStatus::Withheld);
/// ```
pub fn assess_window<T: TimePoint>(
    mode: Mode,
    window: &TimeWindow<T>,
    blocks: &[UnavailableBlock<T>],
) -> BreakAssessment<T> {
    let breaks = classify_breaks(window, blocks);

    let fragmenting: Vec<TimeWindow<T>> = breaks
        .iter()
        .filter(|b| b.is_fragmenting())
        .map(ClassifiedBreak::window)
        .collect();
    let all: Vec<TimeWindow<T>> = breaks.iter().map(ClassifiedBreak::window).collect();

    let segments = available_segments(window, &fragmenting, VIABLE_SEGMENT_MINUTES);
    let window_minutes = window.duration_minutes();
    let total_available_minutes = window_minutes - covered_minutes(window, &all);
    let availability_percent = if window_minutes > 0 {
        total_available_minutes as f64 * 100.0 / window_minutes as f64
    } else {
        0.0
    };

    let fragmenting_break_count = fragmenting.len();
    let restorative_break_count = breaks.len() - fragmenting_break_count;
    let mode_state = ModeState::from_fragmentation(mode, fragmenting_break_count, availability_percent);

    BreakAssessment {
        breaks,
        segments,
        overall_status: mode_state.status(),
        mode_state,
        total_available_minutes,
        availability_percent,
        fragmenting_break_count,
        restorative_break_count,
    }
}

/// [`assess_window`] for wall-clock inputs, normalizing a window that
/// crosses midnight and aligning blocks into it first.
pub fn assess_clock_window(
    mode: Mode,
    window: TimeWindow<ClockTime>,
    blocks: &[UnavailableBlock<ClockTime>],
) -> BreakAssessment<ClockTime> {
    let window = window.normalize_overnight();
    let aligned: Vec<UnavailableBlock<ClockTime>> = blocks
        .iter()
        .map(|b| {
            let w = b.window().align_to(&window);
            UnavailableBlock {
                start: w.start,
                end: w.end,
                ..b.clone()
            }
        })
        .collect();
    assess_window(mode, &window, &aligned)
}

// ── Tests ───────────────────────────────────────────────────────────────────
