//! Resolution of raw day inputs into absolute instants.
//!
//! Busy blocks may arrive as wall-clock `HH:MM` intervals. These helpers pin
//! them to a calendar day in an IANA timezone so the day evaluator only ever
//! sees `DateTime<Utc>`. Nothing here reads the system clock.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::breaks::UnavailableBlock;
use crate::error::{GovernanceError, Result};
use crate::governor::BusyBlock;
use crate::time::{ClockTime, MINUTES_PER_DAY};

/// Parse a `YYYY-MM-DD` day.
pub fn parse_day(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| GovernanceError::InvalidDate(format!("'{}': {}", s, e)))
}

/// Parse an IANA timezone name.
pub fn parse_timezone(s: &str) -> Result<Tz> {
    s.parse::<Tz>()
        .map_err(|_| GovernanceError::InvalidTimezone(format!("'{}'", s)))
}

/// Parse an RFC 3339 datetime string into `DateTime<Utc>`.
pub fn parse_rfc3339(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| GovernanceError::InvalidDatetime(format!("'{}': {}", s, e)))
}

/// The instant at wall-clock `time` on `day` in `tz`.
///
/// Times of `24:00` and later fall on the following day(s).
///
/// # Errors
///
/// Returns [`GovernanceError::AmbiguousLocalTime`] when the local time is
/// skipped or repeated by a DST transition.
pub fn local_instant(day: NaiveDate, time: ClockTime, tz: &Tz) -> Result<DateTime<Utc>> {
    let extra_days = u64::from(time.minutes() / MINUTES_PER_DAY);
    let date = day
        .checked_add_days(Days::new(extra_days))
        .ok_or_else(|| GovernanceError::InvalidDate(format!("{day} + {extra_days} days")))?;
    let wrapped = time.wrapped();
    let naive_time = NaiveTime::from_hms_opt(wrapped.hour(), wrapped.minute(), 0)
        .ok_or_else(|| GovernanceError::InvalidTime(format!("'{time}'")))?;

    tz.from_local_datetime(&date.and_time(naive_time))
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| {
            GovernanceError::AmbiguousLocalTime(format!("{date} {wrapped} in {}", tz.name()))
        })
}

/// Pin a wall-clock block to `day` in `tz`. A block whose end is not after
/// its start crosses midnight.
pub fn resolve_local_block(
    block: &UnavailableBlock<ClockTime>,
    day: NaiveDate,
    tz: &Tz,
) -> Result<BusyBlock> {
    let window = block.window().normalize_overnight();
    Ok(UnavailableBlock {
        id: block.id.clone(),
        start: local_instant(day, window.start, tz)?,
        end: local_instant(day, window.end, tz)?,
        label: block.label.clone(),
        break_type: block.break_type,
    })
}

pub fn resolve_local_blocks(
    blocks: &[UnavailableBlock<ClockTime>],
    day: NaiveDate,
    tz: &Tz,
) -> Result<Vec<BusyBlock>> {
    blocks
        .iter()
        .map(|b| resolve_local_block(b, day, tz))
        .collect()
}

/// The calendar day `instant` falls on in `tz`.
pub fn local_date(instant: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breaks::BreakType;
    use crate::time::TimeWindow;

    fn day(s: &str) -> NaiveDate {
        parse_day(s).unwrap()
    }

    fn clock(range: &str) -> TimeWindow<ClockTime> {
        TimeWindow::parse_range(range).unwrap()
    }

    #[test]
    fn test_parse_day() {
        assert_eq!(day("2026-03-16"), NaiveDate::from_ymd_opt(2026, 3, 16).unwrap());
        let err = parse_day("16/03/2026").unwrap_err().to_string();
        assert!(err.contains("Invalid date"), "got: {err}");
    }

    #[test]
    fn test_parse_timezone() {
        assert_eq!(parse_timezone("Europe/Berlin").unwrap(), chrono_tz::Europe::Berlin);
        let err = parse_timezone("Mars/Olympus").unwrap_err().to_string();
        assert!(err.contains("Invalid timezone"), "got: {err}");
    }

    #[test]
    fn test_parse_rfc3339_normalizes_to_utc() {
        let dt = parse_rfc3339("2026-03-16T09:30:00-04:00").unwrap();
        assert_eq!(dt.to_rfc3339(), "2026-03-16T13:30:00+00:00");
        assert!(parse_rfc3339("2026-03-16 09:30").is_err());
    }

    #[test]
    fn test_local_instant_in_new_york() {
        let tz = parse_timezone("America/New_York").unwrap();
        let t = local_instant(day("2026-03-16"), "09:30".parse().unwrap(), &tz).unwrap();
        assert_eq!(t.to_rfc3339(), "2026-03-16T13:30:00+00:00");
    }

    #[test]
    fn test_local_instant_past_midnight() {
        let t = local_instant(day("2026-03-16"), "25:15".parse().unwrap(), &Tz::UTC).unwrap();
        assert_eq!(t.to_rfc3339(), "2026-03-17T01:15:00+00:00");
    }

    #[test]
    fn test_local_instant_in_dst_gap_is_error() {
        // 2026-03-08 02:30 does not exist in New York
        let tz = parse_timezone("America/New_York").unwrap();
        let err = local_instant(day("2026-03-08"), "02:30".parse().unwrap(), &tz).unwrap_err();
        assert!(matches!(err, GovernanceError::AmbiguousLocalTime(_)));
    }

    #[test]
    fn test_resolve_local_block_overnight() {
        let w = clock("23:30-00:30");
        let block = UnavailableBlock::new("late", w.start, w.end)
            .with_label("call")
            .with_break_type(BreakType::Commitment);
        let busy = resolve_local_block(&block, day("2026-03-16"), &Tz::UTC).unwrap();
        assert_eq!(busy.start.to_rfc3339(), "2026-03-16T23:30:00+00:00");
        assert_eq!(busy.end.to_rfc3339(), "2026-03-17T00:30:00+00:00");
        assert_eq!(busy.duration_minutes(), 60);
        assert_eq!(busy.label.as_deref(), Some("call"));
        assert_eq!(busy.break_type(), BreakType::Commitment);
    }

    #[test]
    fn test_resolve_local_blocks_fails_on_first_error() {
        let tz = parse_timezone("America/New_York").unwrap();
        let ok = clock("09:00-10:00");
        let gap = clock("02:15-02:45");
        let blocks = vec![
            UnavailableBlock::new("ok", ok.start, ok.end),
            UnavailableBlock::new("gap", gap.start, gap.end),
        ];
        assert!(resolve_local_blocks(&blocks, day("2026-03-08"), &tz).is_err());
        assert_eq!(resolve_local_blocks(&blocks[..1], day("2026-03-08"), &tz).unwrap().len(), 1);
    }

    #[test]
    fn test_local_date() {
        let tz = parse_timezone("Asia/Tokyo").unwrap();
        let instant = parse_rfc3339("2026-03-16T20:00:00Z").unwrap();
        assert_eq!(local_date(instant, &tz), day("2026-03-17"));
    }
}
