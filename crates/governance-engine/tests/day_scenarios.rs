//! Whole-day scenarios driven from wall-clock inputs, the way the CLI feeds the engine.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use governance_engine::governor::{REASON_NO_VIABLE_SEGMENT, REASON_SHORTENED, REASON_SPLIT};
use governance_engine::resolve::local_instant;
use governance_engine::{
    evaluate_day_at, parse_day, parse_timezone, resolve_local_blocks, BaselineWindow,
    ChronotypeProfile, ClockTime, Confidence, DayInput, Decision, EvaluationOptions, Mode,
    ModeGovernanceDecision, Reliability, UnavailableBlock,
};

struct Day {
    date: NaiveDate,
    tz: Tz,
}

impl Day {
    fn new(date: &str, tz: &str) -> Self {
        Self {
            date: parse_day(date).unwrap(),
            tz: parse_timezone(tz).unwrap(),
        }
    }

    fn at(&self, hhmm: &str) -> DateTime<Utc> {
        local_instant(self.date, hhmm.parse().unwrap(), &self.tz).unwrap()
    }

    fn window(&self, mode: Mode, start: &str, end: &str) -> BaselineWindow {
        BaselineWindow {
            mode,
            start: self.at(start),
            end: self.at(end),
            reliability: Reliability::Reliable,
            source: "chronotype-template".to_string(),
        }
    }

    fn evaluate(
        &self,
        windows: Vec<BaselineWindow>,
        local_blocks: &[(&str, &str, &str)],
    ) -> [ModeGovernanceDecision; 5] {
        let blocks: Vec<UnavailableBlock<ClockTime>> = local_blocks
            .iter()
            .map(|(id, s, e)| UnavailableBlock::new(*id, s.parse().unwrap(), e.parse().unwrap()))
            .collect();
        let input = DayInput {
            day: self.date,
            profile: Some(ChronotypeProfile {
                chronotype: "third-bird".to_string(),
                confidence: Confidence::High,
                computed_at: self.at("06:00"),
            }),
            baseline_windows: windows,
            busy_blocks: resolve_local_blocks(&blocks, self.date, &self.tz).unwrap(),
        };
        let options = EvaluationOptions {
            timezone: self.tz,
            ..Default::default()
        };
        evaluate_day_at(&input, &options, self.at("07:00"))
    }
}

#[test]
fn test_full_day_in_new_york() {
    let day = Day::new("2026-03-16", "America/New_York");
    let decisions = day.evaluate(
        vec![
            day.window(Mode::Framing, "08:00", "12:00"),
            day.window(Mode::Execution, "14:00", "16:00"),
            day.window(Mode::Reflection, "20:00", "21:00"),
            day.window(Mode::Synthesis, "16:30", "18:00"),
        ],
        &[
            ("standup", "09:30", "10:30"),
            ("review", "14:00", "15:20"),
            ("dinner", "20:00", "20:35"),
        ],
    );

    let [framing, evaluation, synthesis, execution, reflection] = decisions;

    assert_eq!(framing.decision, Decision::Fragmented);
    assert_eq!(framing.reason, REASON_SPLIT);
    let segments = framing.segments.unwrap();
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].duration_minutes(), 90);
    assert_eq!(segments[1].duration_minutes(), 90);
    assert_eq!(segments[0].end, day.at("09:30"));

    assert_eq!(evaluation.decision, Decision::Silence);

    assert_eq!(synthesis.decision, Decision::Permit);
    assert_eq!(synthesis.window.unwrap().start, day.at("16:30"));

    assert_eq!(execution.decision, Decision::Silence);
    assert_eq!(execution.reason, REASON_NO_VIABLE_SEGMENT);

    assert_eq!(reflection.decision, Decision::Permit);
    assert_eq!(reflection.reason, REASON_SHORTENED);
    assert_eq!(reflection.window.unwrap().start, day.at("20:35"));
}

#[test]
fn test_overnight_block_reaches_next_morning() {
    let day = Day::new("2026-03-16", "Europe/Berlin");
    let decisions = day.evaluate(
        vec![day.window(Mode::Reflection, "22:00", "23:30")],
        &[("late-call", "22:30", "00:15")],
    );
    // 22:00–22:30 survives the 20-minute reflection minimum
    let reflection = &decisions[4];
    assert_eq!(reflection.decision, Decision::Permit);
    assert_eq!(reflection.window.unwrap().end, day.at("22:30"));
}

#[test]
fn test_identical_inputs_yield_identical_decisions() {
    let day = Day::new("2026-03-16", "UTC");
    let windows = vec![day.window(Mode::Framing, "08:00", "12:00")];
    let first = day.evaluate(windows.clone(), &[("a", "09:00", "09:40")]);
    let second = day.evaluate(windows, &[("a", "09:00", "09:40")]);
    assert_eq!(first, second);
}
