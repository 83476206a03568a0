//! Parsers for the two raw file kinds a configuration directory holds:
//! per-task latency traces and per-run timer breakdowns.

use crate::Result;
use crate::log::record::{LatencySample, Phase, PhaseTotals};
use anyhow::Context;
use regex::Regex;
use std::fs;
use std::io;
use std::path::Path;

/// Parse one task's trace file into its latency samples, in file order.
///
/// A line is a latency record only if it carries both the `ts: ` marker
/// (followed by a 13-digit millisecond epoch) and the `endToEnd latency: `
/// marker (followed by an integer). Trace files interleave unrelated
/// diagnostics, so every other line is skipped without comment.
///
/// A task that produced no trace file contributes zero samples; under some
/// configurations that is normal, not an error.
pub fn read_task_trace(path: &Path, task: u32) -> Result<Vec<LatencySample>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(e).with_context(|| format!("read trace file {}", path.display()));
        }
    };

    // The epoch is exactly the 13 digits after the marker; any further
    // digits belong to the rest of the line.
    let ts_re = Regex::new(r"ts: (\d{13})")?;
    let latency_re = Regex::new(r"endToEnd latency: (\d+)")?;

    let mut samples = Vec::new();
    for line in text.lines() {
        let (Some(ts), Some(lat)) = (ts_re.captures(line), latency_re.captures(line)) else {
            continue;
        };
        let Ok(epoch_ms) = ts[1].parse::<i64>() else {
            continue;
        };
        let Ok(latency_ms) = lat[1].parse::<u64>() else {
            continue;
        };
        samples.push(LatencySample {
            task,
            // Coarsened to 1-second resolution; the timeline bins at this
            // granularity and historical numbers depend on the floor.
            epoch_s: epoch_ms / 1000,
            latency_ms,
        });
    }

    Ok(samples)
}

/// Parse a run's timer breakdown into summed per-phase durations.
///
/// Expected shape, one entry per line:
///
/// ```text
/// sync: 1042
/// replication: 311.5
/// update: 87
/// ```
///
/// A phase may occur on several lines; occurrences sum. Tokens outside the
/// recognized phase set, and lines that do not match the shape at all, are
/// dropped silently. A run whose timer file is missing yields empty totals
/// but still counts toward the repeat average.
pub fn read_timer_breakdown(path: &Path) -> Result<PhaseTotals> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(PhaseTotals::default()),
        Err(e) => {
            return Err(e).with_context(|| format!("read timer file {}", path.display()));
        }
    };

    // token: duration (ms, possibly fractional)
    let line_re = Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_]*)\s*:\s*([0-9]+(?:\.[0-9]+)?)\s*$")?;

    let mut totals = PhaseTotals::default();
    for line in text.lines() {
        let Some(caps) = line_re.captures(line) else {
            continue;
        };
        let Some(phase) = Phase::from_token(&caps[1]) else {
            continue;
        };
        let Ok(duration) = caps[2].parse::<f64>() else {
            continue;
        };
        totals.add(phase, duration);
    }

    Ok(totals)
}
