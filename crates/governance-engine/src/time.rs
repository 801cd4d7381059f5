//! Time primitives shared by every layer of the engine.
//!
//! Two point representations occur: wall-clock [`ClockTime`] values (minutes
//! after local midnight, used by the break classifier) and absolute
//! `DateTime<Utc>` instants (used by the day evaluator). Both implement
//! [`TimePoint`], so the interval algebra is written once over [`TimeWindow<T>`].
//!
//! # Functions
//!
//! - [`time_to_minutes`] / [`minutes_to_time`] — `HH:MM` conversions
//! - [`duration_minutes`] — signed minutes between two points
//! - [`intersect`] — overlap of two windows; touching endpoints do not overlap
//!
//! Windows are half-open `[start, end)`. A wall-clock window that crosses
//! midnight must be normalized ([`TimeWindow::normalize_overnight`]) before it
//! is compared with anything.

use std::cmp::{max, min};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::GovernanceError;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

// ── TimePoint ───────────────────────────────────────────────────────────────

/// A totally ordered point on a timeline, measurable in whole minutes.
pub trait TimePoint: Copy + Ord + fmt::Debug {
    /// Signed whole minutes from `self` to `later` (negative if `later` is earlier).
    fn minutes_until(self, later: Self) -> i64;
}

impl TimePoint for DateTime<Utc> {
    fn minutes_until(self, later: Self) -> i64 {
        (later - self).num_minutes()
    }
}

// ── ClockTime ───────────────────────────────────────────────────────────────

/// Minutes after local midnight.
///
/// Values of `24:00` and beyond are legal: they express the next-day end of a
/// window that crosses midnight once normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ClockTime(u32);

impl ClockTime {
    pub const MIDNIGHT: ClockTime = ClockTime(0);

    pub const fn from_minutes(minutes: u32) -> Self {
        ClockTime(minutes)
    }

    /// Build from an hour and minute. Returns `None` when `minute >= 60` or
    /// the total does not fit.
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        if minute >= 60 {
            return None;
        }
        hour.checked_mul(60)
            .and_then(|m| m.checked_add(minute))
            .map(ClockTime)
    }

    pub const fn minutes(self) -> u32 {
        self.0
    }

    pub const fn hour(self) -> u32 {
        self.0 / 60
    }

    pub const fn minute(self) -> u32 {
        self.0 % 60
    }

    /// The same wall-clock time one day later, saturating at the largest
    /// representable value.
    pub const fn next_day(self) -> Self {
        ClockTime(self.0.saturating_add(MINUTES_PER_DAY))
    }

    /// Whether this value lies past the end of its calendar day.
    pub const fn is_next_day(self) -> bool {
        self.0 >= MINUTES_PER_DAY
    }

    /// The time with any whole days removed (`25:30` → `01:30`).
    pub const fn wrapped(self) -> Self {
        ClockTime(self.0 % MINUTES_PER_DAY)
    }
}

impl TimePoint for ClockTime {
    fn minutes_until(self, later: Self) -> i64 {
        i64::from(later.0) - i64::from(self.0)
    }
}

impl FromStr for ClockTime {
    type Err = GovernanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        time_to_minutes(s).map(ClockTime)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ── HH:MM conversions ───────────────────────────────────────────────────────

/// Convert an `HH:MM` string to minutes after midnight.
///
/// Hours above 23 are accepted (`"25:30"` → 1530) so that normalized
/// post-midnight ends round-trip.
///
/// # Errors
///
/// Returns [`GovernanceError::InvalidTime`] if either part is not numeric,
/// the minute part is 60 or more, or the total overflows.
///
/// # Examples
///
/// ```
/// use governance_engine::time::time_to_minutes;
///
/// assert_eq!(time_to_minutes("09:30").unwrap(), 570);
/// assert!(time_to_minutes("9h30").is_err());
/// ```
pub fn time_to_minutes(hhmm: &str) -> Result<u32, GovernanceError> {
    let invalid = || GovernanceError::InvalidTime(format!("'{hhmm}'"));
    let (h, m) = hhmm.trim().split_once(':').ok_or_else(invalid)?;
    if h.is_empty() || m.len() != 2 {
        return Err(invalid());
    }
    let hours: u32 = h.parse().map_err(|_| invalid())?;
    let minutes: u32 = m.parse().map_err(|_| invalid())?;
    ClockTime::from_hm(hours, minutes)
        .map(ClockTime::minutes)
        .ok_or_else(invalid)
}

/// Format minutes after midnight as `HH:MM` (hours are not wrapped at 24).
pub fn minutes_to_time(minutes: u32) -> String {
    ClockTime(minutes).to_string()
}

/// Signed minutes from `start` to `end`.
///
/// Negative when a midnight-crossing window was not normalized; no correction
/// happens here.
pub fn duration_minutes<T: TimePoint>(start: T, end: T) -> i64 {
    start.minutes_until(end)
}

// ── TimeWindow ──────────────────────────────────────────────────────────────

/// A half-open interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeWindow<T> {
    pub start: T,
    pub end: T,
}

impl<T: TimePoint> TimeWindow<T> {
    pub fn new(start: T, end: T) -> Self {
        Self { start, end }
    }

    pub fn duration_minutes(&self) -> i64 {
        duration_minutes(self.start, self.end)
    }

    /// True when the window holds no time at all.
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Strict overlap: windows that only touch at an endpoint do not overlap.
    pub fn overlaps(&self, other: &TimeWindow<T>) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// True when `other` lies entirely inside `self`.
    pub fn contains(&self, other: &TimeWindow<T>) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn intersect(&self, other: &TimeWindow<T>) -> Option<TimeWindow<T>> {
        intersect(self, other)
    }
}

impl TimeWindow<ClockTime> {
    /// Parse `"HH:MM-HH:MM"`.
    ///
    /// # Errors
    ///
    /// Returns [`GovernanceError::InvalidWindow`] if the separator is missing,
    /// or [`GovernanceError::InvalidTime`] for a malformed endpoint.
    pub fn parse_range(s: &str) -> Result<Self, GovernanceError> {
        let (start, end) = s
            .split_once('-')
            .ok_or_else(|| GovernanceError::InvalidWindow(format!("expected HH:MM-HH:MM, got '{s}'")))?;
        Ok(Self::new(start.parse()?, end.parse()?))
    }

    /// Push the end past midnight when the window wraps (`22:00–02:00` → `22:00–26:00`).
    pub fn normalize_overnight(self) -> Self {
        if self.end <= self.start {
            Self::new(self.start, self.end.next_day())
        } else {
            self
        }
    }

    /// Normalize this window and move it into the frame of `frame`.
    ///
    /// When `frame` crosses midnight, early-morning windows that fall inside
    /// its post-midnight tail are shifted forward one day.
    pub fn align_to(self, frame: &TimeWindow<ClockTime>) -> Self {
        let window = self.normalize_overnight();
        let shifted_start = window.start.next_day();
        if frame.end.is_next_day() && window.start < frame.start && shifted_start < frame.end {
            Self::new(shifted_start, window.end.next_day())
        } else {
            window
        }
    }
}

/// The overlap of two windows, or `None` if they are disjoint.
///
/// Touching endpoints (`a.end == b.start`) count as no overlap.
///
/// # Examples
///
/// ```
/// use governance_engine::time::{intersect, ClockTime, TimeWindow};
///
/// let a = TimeWindow::<ClockTime>::parse_range("08:00-10:00").unwrap();
/// let b = TimeWindow::<ClockTime>::parse_range("10:00-11:00").unwrap();
/// assert!(intersect(&a, &b).is_none());
/// ```
pub fn intersect<T: TimePoint>(a: &TimeWindow<T>, b: &TimeWindow<T>) -> Option<TimeWindow<T>> {
    let start = max(a.start, b.start);
    let end = min(a.end, b.end);
    if start < end {
        Some(TimeWindow::new(start, end))
    } else {
        None
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
