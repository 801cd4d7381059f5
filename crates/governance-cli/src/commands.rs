use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use governance_engine::{
    assess_clock_window, parse_rfc3339, parse_timezone, report_day, resolve_local_blocks,
    BreakAssessment, ClockTime, DayInput, DiscoveryWindow, EvaluationOptions, EvaluationStrategy,
    Mode, TimeWindow, UnavailableBlock, WindowStatus,
};

use crate::io::{parse_json, print_json, read_input};

/// A day input whose busy time may also be given as wall-clock blocks.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EvaluateRequest {
    #[serde(flatten)]
    day: DayInput,
    #[serde(default)]
    local_busy_blocks: Vec<UnavailableBlock<ClockTime>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssessRequest {
    mode: Option<Mode>,
    window: TimeWindow<ClockTime>,
    #[serde(default)]
    blocks: Vec<UnavailableBlock<ClockTime>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ModeInfo {
    mode: Mode,
    min_segment_minutes: i64,
    discovery_window: DiscoveryWindow,
    legal_statuses: &'static [WindowStatus],
}

pub struct EvaluateArgs {
    pub input: Option<PathBuf>,
    pub timezone: String,
    pub strategy: EvaluationStrategy,
    pub now: Option<String>,
    pub pretty: bool,
}

pub fn evaluate(args: EvaluateArgs) -> Result<()> {
    let raw = read_input(args.input.as_deref())?;
    let request: EvaluateRequest = parse_json(&raw, "day input")?;
    let timezone = parse_timezone(&args.timezone)?;
    let computed_at = match args.now.as_deref() {
        Some(now) => parse_rfc3339(now)?,
        None => Utc::now(),
    };

    let mut day = request.day;
    let local = resolve_local_blocks(&request.local_busy_blocks, day.day, &timezone)
        .context("failed to resolve local busy blocks")?;
    debug!(count = local.len(), "resolved local busy blocks");
    day.busy_blocks.extend(local);

    let options = EvaluationOptions {
        timezone,
        strategy: args.strategy,
    };
    print_json(&report_day(&day, &options, computed_at), args.pretty)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AssessOutput {
    mode: Mode,
    window: TimeWindow<ClockTime>,
    #[serde(flatten)]
    assessment: BreakAssessment<ClockTime>,
}

pub fn assess(input: Option<PathBuf>, mode: Option<Mode>, pretty: bool) -> Result<()> {
    let raw = read_input(input.as_deref())?;
    let request: AssessRequest = parse_json(&raw, "assessment input")?;
    let mode = mode
        .or(request.mode)
        .context("no mode given: pass --mode or set \"mode\" in the input")?;

    let window = request.window.normalize_overnight();
    let assessment = assess_clock_window(mode, window, &request.blocks);
    print_json(
        &AssessOutput {
            mode,
            window,
            assessment,
        },
        pretty,
    )
}

pub fn modes(pretty: bool) -> Result<()> {
    let infos: Vec<ModeInfo> = Mode::ALL
        .iter()
        .map(|&mode| ModeInfo {
            mode,
            min_segment_minutes: mode.min_segment_minutes(),
            discovery_window: mode.discovery_window(),
            legal_statuses: mode.legal_statuses(),
        })
        .collect();
    print_json(&infos, pretty)
}
