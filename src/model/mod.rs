//! Aggregation model: merged latency timelines, the spike tail-latency
//! metric, and phase averages across repeated runs.

use crate::log::{LatencySample, Phase, PhaseTotals};
use crate::sweep::Configuration;
use serde::Serialize;
use std::collections::BTreeMap;

/// Latency values of one configuration's tasks, binned at 1-second
/// resolution on a shared relative axis.
///
/// Tasks run under separate clocks, so their absolute epochs line up only
/// approximately. The minimum timestamp over the union of every task's
/// samples is second zero; each sample lands in bin `epoch_s - start`.
/// Bins exist only where a sample landed, and with the start taken over the
/// union no bin can come out negative.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    bins: BTreeMap<i64, Vec<u64>>,
}

impl Timeline {
    pub fn from_samples(samples: &[LatencySample]) -> Timeline {
        let Some(start) = samples.iter().map(|s| s.epoch_s).min() else {
            return Timeline::default();
        };
        let mut bins: BTreeMap<i64, Vec<u64>> = BTreeMap::new();
        for sample in samples {
            bins.entry(sample.epoch_s - start)
                .or_default()
                .push(sample.latency_ms);
        }
        Timeline { bins }
    }

    /// The spike metric: the nearest-rank `quantile` inside each bin, then
    /// the maximum of those per-bin values. This is not a global percentile
    /// over all samples; the two are not equivalent, and the reported
    /// numbers track the per-bin form.
    ///
    /// `None` when the timeline holds no samples at all.
    pub fn spike(&self, quantile: f64) -> Option<u64> {
        self.bins
            .values()
            .map(|values| tail_of_bin(values, quantile))
            .max()
    }
}

/// `sorted[floor(len * quantile)]`, clamped so quantile 1.0 selects the
/// last element. Bins are nonempty by construction.
fn tail_of_bin(values: &[u64], quantile: f64) -> u64 {
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let index = (sorted.len() as f64 * quantile).floor() as usize;
    sorted[index.min(sorted.len() - 1)]
}

/// Per-phase durations averaged over a configuration's repeated runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PhaseAverages {
    averages: BTreeMap<Phase, f64>,
}

impl PhaseAverages {
    /// Phase-wise mean over `runs`, one entry per declared run. A run whose
    /// timer file was missing appears here as empty totals, so the divisor
    /// stays the declared repeat count.
    pub fn over_runs(runs: &[PhaseTotals]) -> PhaseAverages {
        if runs.is_empty() {
            return PhaseAverages::default();
        }
        let mut averages = BTreeMap::new();
        for phase in Phase::ALL {
            let total: f64 = runs.iter().map(|run| run.get(phase)).sum();
            averages.insert(phase, total / runs.len() as f64);
        }
        PhaseAverages { averages }
    }

    pub fn get(&self, phase: Phase) -> f64 {
        self.averages.get(&phase).copied().unwrap_or(0.0)
    }

    /// Completion time: the recognized phases' averages summed in
    /// `Phase::ALL` order. Any curve that reports a total reports this sum.
    pub fn completion_time(&self) -> f64 {
        Phase::ALL.iter().map(|&phase| self.get(phase)).sum()
    }
}

/// One configuration's aggregated scalars, ready for curve assembly.
#[derive(Debug, Clone, Serialize)]
pub struct AggregatedPoint {
    pub config: Configuration,
    /// `None` when no task produced a single latency record. Curve assembly
    /// turns that into a 0.0 slot rather than a fault.
    pub tail_latency: Option<u64>,
    pub phases: PhaseAverages,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample(task: u32, epoch_s: i64, latency_ms: u64) -> LatencySample {
        LatencySample {
            task,
            epoch_s,
            latency_ms,
        }
    }

    fn run(entries: &[(Phase, f64)]) -> PhaseTotals {
        let mut totals = PhaseTotals::default();
        for &(phase, ms) in entries {
            totals.add(phase, ms);
        }
        totals
    }

    #[test]
    fn bins_are_relative_to_the_earliest_task() {
        // task 1 starts a second before task 0, so it defines second zero
        let samples = vec![
            sample(0, 1_680_000_001, 30),
            sample(0, 1_680_000_002, 40),
            sample(1, 1_680_000_000, 20),
        ];
        let timeline = Timeline::from_samples(&samples);
        assert_eq!(
            timeline.bins.keys().copied().collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert_eq!(timeline.bins[&0], vec![20]);
        assert_eq!(timeline.bins[&1], vec![30]);
        assert_eq!(timeline.bins[&2], vec![40]);
    }

    #[test]
    fn single_value_bins_report_themselves() {
        let samples = vec![
            sample(0, 1_680_000_000, 42),
            sample(0, 1_680_000_001, 58),
        ];
        let timeline = Timeline::from_samples(&samples);
        assert_eq!(
            timeline.bins.keys().copied().collect::<Vec<_>>(),
            vec![0, 1]
        );
        assert_eq!(timeline.spike(0.99), Some(58));
    }

    #[test]
    fn spike_takes_the_worst_bin_tail() {
        // bin 0 has a hundred values topping out at 100; bin 1 a lone 70
        let mut samples: Vec<LatencySample> = (1..=100).map(|v| sample(0, 500, v)).collect();
        samples.push(sample(0, 501, 70));
        let timeline = Timeline::from_samples(&samples);
        assert_eq!(timeline.spike(0.99), Some(100));
    }

    #[test]
    fn bin_tail_is_nearest_rank_not_max() {
        // 101 values: rank floor(101 * 0.99) = 99 selects 100, not 101
        let samples: Vec<LatencySample> = (1..=101).map(|v| sample(0, 9, v)).collect();
        let timeline = Timeline::from_samples(&samples);
        assert_eq!(timeline.spike(0.99), Some(100));
    }

    #[test]
    fn quantile_one_clamps_to_the_bin_maximum() {
        let samples: Vec<LatencySample> = [5, 9, 3].iter().map(|&v| sample(0, 80, v)).collect();
        let timeline = Timeline::from_samples(&samples);
        assert_eq!(timeline.spike(1.0), Some(9));
    }

    #[test]
    fn empty_timeline_has_no_spike() {
        let timeline = Timeline::from_samples(&[]);
        assert_eq!(timeline.spike(0.99), None);
    }

    #[test]
    fn identical_runs_average_to_themselves() {
        let runs = vec![
            run(&[
                (Phase::Sync, 10.0),
                (Phase::Replication, 5.0),
                (Phase::Update, 3.0),
            ]);
            3
        ];
        let averages = PhaseAverages::over_runs(&runs);
        assert_eq!(averages.get(Phase::Sync), 10.0);
        assert_eq!(averages.get(Phase::Replication), 5.0);
        assert_eq!(averages.get(Phase::Update), 3.0);
        assert_eq!(averages.completion_time(), 18.0);
    }

    #[test]
    fn absent_phases_still_count_toward_the_divisor() {
        let runs = vec![
            run(&[(Phase::Sync, 10.0)]),
            run(&[(Phase::Sync, 20.0)]),
            PhaseTotals::default(),
        ];
        let averages = PhaseAverages::over_runs(&runs);
        assert_eq!(averages.get(Phase::Sync), 10.0);
        assert_eq!(averages.get(Phase::Update), 0.0);
    }

    #[test]
    fn no_runs_average_to_empty() {
        let averages = PhaseAverages::over_runs(&[]);
        assert_eq!(averages, PhaseAverages::default());
        assert_eq!(averages.completion_time(), 0.0);
    }
}
