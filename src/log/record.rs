//! Record types shared by the trace and timer parsers.

use serde::Serialize;
use std::collections::BTreeMap;

/// A single end-to-end latency record from one task's trace file.
///
/// `epoch_s` is already coarsened to 1-second resolution (millisecond epoch
/// floor-divided by 1000). That is the binning granularity for the whole
/// timeline; historical results depend on it, so the coarsening happens at
/// parse time and nowhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LatencySample {
    pub task: u32,
    pub epoch_s: i64,
    pub latency_ms: u64,
}

/// Timer phases recognized in a run's breakdown file.
///
/// Everything else a timer file mentions is dropped at parse time, so a
/// `Phase` value always names a real series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Phase {
    Sync,
    Replication,
    Update,
}

impl Phase {
    /// Summation order for completion time; also the order series appear in.
    pub const ALL: [Phase; 3] = [Phase::Sync, Phase::Replication, Phase::Update];

    pub fn from_token(token: &str) -> Option<Phase> {
        match token {
            "sync" => Some(Phase::Sync),
            "replication" => Some(Phase::Replication),
            "update" => Some(Phase::Update),
            _ => None,
        }
    }
}

/// Summed phase durations for one run.
///
/// A phase that never occurred reads back as zero; callers never need to
/// distinguish "absent" from "zero ms" (the averaging contract treats them
/// the same).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PhaseTotals {
    totals: BTreeMap<Phase, f64>,
}

impl PhaseTotals {
    pub fn add(&mut self, phase: Phase, duration_ms: f64) {
        *self.totals.entry(phase).or_insert(0.0) += duration_ms;
    }

    pub fn get(&self, phase: Phase) -> f64 {
        self.totals.get(&phase).copied().unwrap_or(0.0)
    }
}
