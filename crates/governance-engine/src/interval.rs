//! Window subtraction: baseline window minus unavailable time.
//!
//! Unavailable intervals are clipped to the window, sorted, and merged
//! (touching intervals merge) before the gaps between them are emitted as
//! ordered, disjoint available segments.

use std::cmp::max;

use serde::{Deserialize, Serialize};

use crate::time::{intersect, TimePoint, TimeWindow};

/// A maximal sub-interval of a window that is free of unavailable time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableSegment<T> {
    pub start: T,
    pub end: T,
    pub duration_minutes: i64,
    /// `duration_minutes` reaches the threshold the segment was built with.
    pub viable: bool,
}

impl<T: TimePoint> AvailableSegment<T> {
    pub fn from_window(window: TimeWindow<T>, viable_minutes: i64) -> Self {
        let duration_minutes = window.duration_minutes();
        Self {
            start: window.start,
            end: window.end,
            duration_minutes,
            viable: duration_minutes >= viable_minutes,
        }
    }

    pub fn window(&self) -> TimeWindow<T> {
        TimeWindow::new(self.start, self.end)
    }
}

/// Sort and merge intervals. Overlapping and exactly-touching intervals
/// collapse into one; empty intervals are dropped.
pub fn merge_intervals<T: TimePoint>(intervals: &[TimeWindow<T>]) -> Vec<TimeWindow<T>> {
    let mut sorted: Vec<TimeWindow<T>> = intervals.iter().copied().filter(|w| !w.is_empty()).collect();
    sorted.sort_by_key(|w| (w.start, w.end));

    let mut merged: Vec<TimeWindow<T>> = Vec::with_capacity(sorted.len());
    for interval in sorted {
        if let Some(last) = merged.last_mut() {
            if interval.start <= last.end {
                last.end = max(last.end, interval.end);
                continue;
            }
        }
        merged.push(interval);
    }
    merged
}

/// Clip `unavailable` to `window` and merge the result.
pub fn clip_and_merge<T: TimePoint>(
    window: &TimeWindow<T>,
    unavailable: &[TimeWindow<T>],
) -> Vec<TimeWindow<T>> {
    let clipped: Vec<TimeWindow<T>> = unavailable
        .iter()
        .filter_map(|u| intersect(u, window))
        .collect();
    merge_intervals(&clipped)
}

/// Subtract unavailable intervals from `window`.
///
/// Returns the disjoint free sub-intervals in ascending order. No unavailable
/// time yields the whole window; an interval covering the window yields
/// nothing.
///
/// # Examples
///
/// ```
/// use governance_engine::interval::subtract_intervals;
/// use governance_engine::time::{ClockTime, TimeWindow};
///
/// let window = TimeWindow::<ClockTime>::parse_range("08:00-12:00").unwrap();
/// let busy = TimeWindow::<ClockTime>::parse_range("09:30-10:30").unwrap();
/// let free = subtract_intervals(&window, &[busy]);
/// assert_eq!(free.len(), 2);
/// assert_eq!(free[0].end.to_string(), "09:30");
/// assert_eq!(free[1].start.to_string(), "10:30");
/// ```
pub fn subtract_intervals<T: TimePoint>(
    window: &TimeWindow<T>,
    unavailable: &[TimeWindow<T>],
) -> Vec<TimeWindow<T>> {
    let merged = clip_and_merge(window, unavailable);

    let mut free = Vec::with_capacity(merged.len() + 1);
    let mut cursor = window.start;
    for busy in &merged {
        if busy.start > cursor {
            free.push(TimeWindow::new(cursor, busy.start));
        }
        if busy.end > cursor {
            cursor = busy.end;
        }
    }
    if window.end > cursor {
        free.push(TimeWindow::new(cursor, window.end));
    }
    free
}

/// [`subtract_intervals`], with each free interval tagged for viability.
pub fn available_segments<T: TimePoint>(
    window: &TimeWindow<T>,
    unavailable: &[TimeWindow<T>],
    viable_minutes: i64,
) -> Vec<AvailableSegment<T>> {
    subtract_intervals(window, unavailable)
        .into_iter()
        .map(|w| AvailableSegment::from_window(w, viable_minutes))
        .collect()
}

/// Minutes of `window` covered by at least one unavailable interval.
pub fn covered_minutes<T: TimePoint>(window: &TimeWindow<T>, unavailable: &[TimeWindow<T>]) -> i64 {
    clip_and_merge(window, unavailable)
        .iter()
        .map(TimeWindow::duration_minutes)
        .sum()
}
