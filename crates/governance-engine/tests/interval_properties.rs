use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;

use governance_engine::interval::{covered_minutes, merge_intervals, subtract_intervals};
use governance_engine::{
    evaluate_day_at, BaselineWindow, ChronotypeProfile, ClockTime, Confidence, DayInput,
    EvaluationOptions, EvaluationStrategy, Mode, Reliability, TimeWindow, UnavailableBlock,
};

fn clock_window() -> impl Strategy<Value = TimeWindow<ClockTime>> {
    (0u32..1200, 1u32..600).prop_map(|(start, len)| {
        TimeWindow::new(ClockTime::from_minutes(start), ClockTime::from_minutes(start + len))
    })
}

fn clock_blocks() -> impl Strategy<Value = Vec<TimeWindow<ClockTime>>> {
    prop::collection::vec(
        (0u32..1800, 1u32..240).prop_map(|(start, len)| {
            TimeWindow::new(ClockTime::from_minutes(start), ClockTime::from_minutes(start + len))
        }),
        0..8,
    )
}

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 16, 0, 0, 0).unwrap()
}

fn minutes(m: u32) -> DateTime<Utc> {
    base() + Duration::minutes(i64::from(m))
}

proptest! {
    #[test]
    fn segments_are_sorted_disjoint_and_inside(window in clock_window(), blocks in clock_blocks()) {
        let free = subtract_intervals(&window, &blocks);
        for seg in &free {
            prop_assert!(!seg.is_empty());
            prop_assert!(window.contains(seg));
            for busy in &blocks {
                prop_assert!(!seg.overlaps(busy), "{seg:?} overlaps {busy:?}");
            }
        }
        for pair in free.windows(2) {
            prop_assert!(pair[0].end < pair[1].start);
        }
    }

    #[test]
    fn segments_and_busy_time_reconstitute_window(window in clock_window(), blocks in clock_blocks()) {
        let free = subtract_intervals(&window, &blocks);
        let free_minutes: i64 = free.iter().map(TimeWindow::duration_minutes).sum();
        prop_assert_eq!(free_minutes + covered_minutes(&window, &blocks), window.duration_minutes());

        let clipped: Vec<_> = blocks.iter().filter_map(|b| b.intersect(&window)).collect();
        let mut union = free.clone();
        union.extend(clipped);
        prop_assert_eq!(merge_intervals(&union), vec![window]);
    }

    #[test]
    fn touching_blocks_have_no_effect(window in clock_window(), before in 1u32..120, after in 1u32..120) {
        let start = window.start.minutes();
        let end = window.end.minutes();
        let mut blocks = vec![TimeWindow::new(ClockTime::from_minutes(end), ClockTime::from_minutes(end + after))];
        if start >= before {
            blocks.push(TimeWindow::new(ClockTime::from_minutes(start - before), window.start));
        }
        prop_assert_eq!(subtract_intervals(&window, &blocks), vec![window]);
    }

    #[test]
    fn evaluation_is_order_independent(
        blocks in prop::collection::vec((360u32..1320, 5u32..150), 0..6),
        break_aware in any::<bool>(),
    ) {
        let busy: Vec<_> = blocks
            .iter()
            .enumerate()
            .map(|(i, &(start, len))| UnavailableBlock::new(format!("b{i}"), minutes(start), minutes(start + len)))
            .collect();
        let windows: Vec<_> = Mode::ALL
            .iter()
            .enumerate()
            .map(|(i, &mode)| BaselineWindow {
                mode,
                start: minutes(420 + 150 * i as u32),
                end: minutes(540 + 150 * i as u32),
                reliability: Reliability::Reliable,
                source: "template".to_string(),
            })
            .collect();
        let profile = Some(ChronotypeProfile {
            chronotype: "lark".to_string(),
            confidence: Confidence::High,
            computed_at: base(),
        });

        let forward = DayInput {
            day: base().date_naive(),
            profile: profile.clone(),
            baseline_windows: windows.clone(),
            busy_blocks: busy.clone(),
        };
        let reversed = DayInput {
            day: base().date_naive(),
            profile,
            baseline_windows: windows.into_iter().rev().collect(),
            busy_blocks: busy.into_iter().rev().collect(),
        };
        let options = EvaluationOptions {
            strategy: if break_aware { EvaluationStrategy::BreakAware } else { EvaluationStrategy::SubtractionOnly },
            ..Default::default()
        };

        let a = evaluate_day_at(&forward, &options, base());
        let b = evaluate_day_at(&reversed, &options, base());
        prop_assert_eq!(a, b);
    }
}
