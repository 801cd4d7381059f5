//! Cognitive modes and the window states each one can legally take.
//!
//! Modes fail differently under interruption, so each has its own state
//! enum: EVALUATION is binary (clear or withheld), FRAMING degrades to
//! disrupted, and SYNTHESIS, EXECUTION and REFLECTION degrade to fragmented.
//! [`ModeState`] ties a mode to one of its own states, so an illegal pairing
//! such as "EVALUATION is fragmented" cannot be constructed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GovernanceError;

/// Minimum usable segment for modes without a specific threshold.
pub const DEFAULT_MIN_SEGMENT_MINUTES: i64 = 30;
/// REFLECTION is opportunistic and low-stakes.
pub const REFLECTION_MIN_SEGMENT_MINUTES: i64 = 20;
/// EXECUTION needs sustained throughput.
pub const EXECUTION_MIN_SEGMENT_MINUTES: i64 = 45;

/// EXECUTION stays clear at or above this availability.
pub const EXECUTION_MIN_AVAILABILITY_PERCENT: f64 = 60.0;
/// REFLECTION stays clear at or above this availability.
pub const REFLECTION_MIN_AVAILABILITY_PERCENT: f64 = 50.0;

// ── Mode ────────────────────────────────────────────────────────────────────

/// Serialized as `SCREAMING_SNAKE_CASE`. Deserialization also accepts the
/// lowercase names and `problem-framing`; [`FromStr`] is case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mode {
    #[serde(alias = "framing", alias = "problem-framing")]
    Framing,
    #[serde(alias = "evaluation")]
    Evaluation,
    #[serde(alias = "synthesis")]
    Synthesis,
    #[serde(alias = "execution")]
    Execution,
    #[serde(alias = "reflection")]
    Reflection,
}

impl Mode {
    /// Every mode, in decision output order.
    pub const ALL: [Mode; 5] = [
        Mode::Framing,
        Mode::Evaluation,
        Mode::Synthesis,
        Mode::Execution,
        Mode::Reflection,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Framing => "FRAMING",
            Mode::Evaluation => "EVALUATION",
            Mode::Synthesis => "SYNTHESIS",
            Mode::Execution => "EXECUTION",
            Mode::Reflection => "REFLECTION",
        }
    }

    /// Shortest segment the day evaluator will still recommend for this mode.
    pub fn min_segment_minutes(self) -> i64 {
        match self {
            Mode::Reflection => REFLECTION_MIN_SEGMENT_MINUTES,
            Mode::Execution => EXECUTION_MIN_SEGMENT_MINUTES,
            Mode::Framing | Mode::Evaluation | Mode::Synthesis => DEFAULT_MIN_SEGMENT_MINUTES,
        }
    }

    /// How soon a wrong call made in degraded conditions would surface.
    pub fn discovery_window(self) -> DiscoveryWindow {
        match self {
            Mode::Execution => DiscoveryWindow::Immediate,
            Mode::Synthesis | Mode::Reflection => DiscoveryWindow::Tomorrow,
            Mode::Framing | Mode::Evaluation => DiscoveryWindow::TooLate,
        }
    }

    /// The window statuses this mode can be in.
    pub fn legal_statuses(self) -> &'static [WindowStatus] {
        match self {
            Mode::Evaluation => &[WindowStatus::Clear, WindowStatus::Withheld],
            Mode::Framing => &[WindowStatus::Clear, WindowStatus::Disrupted, WindowStatus::Withheld],
            Mode::Synthesis | Mode::Execution | Mode::Reflection => {
                &[WindowStatus::Clear, WindowStatus::Fragmented, WindowStatus::Withheld]
            }
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = GovernanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "framing" | "problem-framing" => Ok(Mode::Framing),
            "evaluation" => Ok(Mode::Evaluation),
            "synthesis" => Ok(Mode::Synthesis),
            "execution" => Ok(Mode::Execution),
            "reflection" => Ok(Mode::Reflection),
            _ => Err(GovernanceError::UnknownMode(format!("'{s}'"))),
        }
    }
}

/// How soon a user would notice a decision made under degraded conditions
/// was wrong. Drives UI severity only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscoveryWindow {
    Immediate,
    Tomorrow,
    TooLate,
}

// ── Window status ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowStatus {
    Clear,
    Fragmented,
    Disrupted,
    Withheld,
}

impl fmt::Display for WindowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WindowStatus::Clear => "clear",
            WindowStatus::Fragmented => "fragmented",
            WindowStatus::Disrupted => "disrupted",
            WindowStatus::Withheld => "withheld",
        })
    }
}

// ── Per-mode states ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FramingState {
    Clear,
    Disrupted,
    Withheld,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationState {
    Clear,
    Withheld,
}

/// Shared by the gradated modes (SYNTHESIS, EXECUTION, REFLECTION).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradedState {
    Clear,
    Fragmented,
    Withheld,
}

impl From<FramingState> for WindowStatus {
    fn from(state: FramingState) -> Self {
        match state {
            FramingState::Clear => WindowStatus::Clear,
            FramingState::Disrupted => WindowStatus::Disrupted,
            FramingState::Withheld => WindowStatus::Withheld,
        }
    }
}

impl From<EvaluationState> for WindowStatus {
    fn from(state: EvaluationState) -> Self {
        match state {
            EvaluationState::Clear => WindowStatus::Clear,
            EvaluationState::Withheld => WindowStatus::Withheld,
        }
    }
}

impl From<GradedState> for WindowStatus {
    fn from(state: GradedState) -> Self {
        match state {
            GradedState::Clear => WindowStatus::Clear,
            GradedState::Fragmented => WindowStatus::Fragmented,
            GradedState::Withheld => WindowStatus::Withheld,
        }
    }
}

/// A mode paired with one of its legal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModeState {
    Framing(FramingState),
    Evaluation(EvaluationState),
    Synthesis(GradedState),
    Execution(GradedState),
    Reflection(GradedState),
}

impl ModeState {
    pub fn mode(&self) -> Mode {
        match self {
            ModeState::Framing(_) => Mode::Framing,
            ModeState::Evaluation(_) => Mode::Evaluation,
            ModeState::Synthesis(_) => Mode::Synthesis,
            ModeState::Execution(_) => Mode::Execution,
            ModeState::Reflection(_) => Mode::Reflection,
        }
    }

    pub fn status(&self) -> WindowStatus {
        match *self {
            ModeState::Framing(s) => s.into(),
            ModeState::Evaluation(s) => s.into(),
            ModeState::Synthesis(s) | ModeState::Execution(s) | ModeState::Reflection(s) => s.into(),
        }
    }

    /// Pair `mode` with `status`, or `None` if the mode cannot be in that status.
    pub fn from_status(mode: Mode, status: WindowStatus) -> Option<Self> {
        let graded = |s: WindowStatus| match s {
            WindowStatus::Clear => Some(GradedState::Clear),
            WindowStatus::Fragmented => Some(GradedState::Fragmented),
            WindowStatus::Withheld => Some(GradedState::Withheld),
            WindowStatus::Disrupted => None,
        };
        match mode {
            Mode::Framing => match status {
                WindowStatus::Clear => Some(ModeState::Framing(FramingState::Clear)),
                WindowStatus::Disrupted => Some(ModeState::Framing(FramingState::Disrupted)),
                WindowStatus::Withheld => Some(ModeState::Framing(FramingState::Withheld)),
                WindowStatus::Fragmented => None,
            },
            Mode::Evaluation => match status {
                WindowStatus::Clear => Some(ModeState::Evaluation(EvaluationState::Clear)),
                WindowStatus::Withheld => Some(ModeState::Evaluation(EvaluationState::Withheld)),
                WindowStatus::Fragmented | WindowStatus::Disrupted => None,
            },
            Mode::Synthesis => graded(status).map(ModeState::Synthesis),
            Mode::Execution => graded(status).map(ModeState::Execution),
            Mode::Reflection => graded(status).map(ModeState::Reflection),
        }
    }

    pub fn clear(mode: Mode) -> Self {
        match mode {
            Mode::Framing => ModeState::Framing(FramingState::Clear),
            Mode::Evaluation => ModeState::Evaluation(EvaluationState::Clear),
            Mode::Synthesis => ModeState::Synthesis(GradedState::Clear),
            Mode::Execution => ModeState::Execution(GradedState::Clear),
            Mode::Reflection => ModeState::Reflection(GradedState::Clear),
        }
    }

    /// Apply mode sensitivity to a classified window.
    ///
    /// Without fragmenting breaks every mode is clear. With them, EVALUATION
    /// is withheld, FRAMING disrupted and SYNTHESIS fragmented outright, while
    /// EXECUTION and REFLECTION only fragment once availability falls below
    /// their percentage floor.
    pub fn from_fragmentation(mode: Mode, fragmenting_breaks: usize, availability_percent: f64) -> Self {
        if fragmenting_breaks == 0 {
            return ModeState::clear(mode);
        }
        match mode {
            Mode::Evaluation => ModeState::Evaluation(EvaluationState::Withheld),
            Mode::Framing => ModeState::Framing(FramingState::Disrupted),
            Mode::Synthesis => ModeState::Synthesis(GradedState::Fragmented),
            Mode::Execution => ModeState::Execution(graded_by_availability(
                availability_percent,
                EXECUTION_MIN_AVAILABILITY_PERCENT,
            )),
            Mode::Reflection => ModeState::Reflection(graded_by_availability(
                availability_percent,
                REFLECTION_MIN_AVAILABILITY_PERCENT,
            )),
        }
    }
}

fn graded_by_availability(availability_percent: f64, floor: f64) -> GradedState {
    if availability_percent < floor {
        GradedState::Fragmented
    } else {
        GradedState::Clear
    }
}

/// Whether `mode` can ever be reported in `status`.
pub fn is_valid_state_for_mode(mode: Mode, status: WindowStatus) -> bool {
    ModeState::from_status(mode, status).is_some()
}
