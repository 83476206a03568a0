//! Pipeline glue: aggregate one configuration's raw files into scalars,
//! then sweep configurations into curves.

use crate::Result;
use crate::curve::{Curve, CurveBuilder};
use crate::log::{Phase, read_task_trace, read_timer_breakdown};
use crate::model::{AggregatedPoint, PhaseAverages, Timeline};
use crate::sweep::{Configuration, Params};
use anyhow::bail;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Where a sweep's raw output lives and how much of it to read.
#[derive(Debug, Clone)]
pub struct Layout {
    /// Directory holding one subdirectory per configuration.
    pub data_root: PathBuf,
    /// Leading component of every configuration directory name.
    pub prefix: String,
    /// Operator whose tasks wrote the latency traces; trace files are named
    /// `{operator}-{task}.output`.
    pub operator: String,
    /// Task ids run from 0 to `tasks - 1`.
    pub tasks: u32,
    /// Declared repeat count. Phase averages divide by this even when some
    /// runs left no timer file behind.
    pub repeats: u32,
    /// Per-bin tail quantile for the spike metric.
    pub quantile: f64,
}

/// First run's timer file carries no index; repeats append theirs.
fn timer_file_name(run: u32) -> String {
    if run == 1 {
        "timer.output".to_string()
    } else {
        format!("timer-{}.output", run)
    }
}

/// Aggregate one configuration: all tasks' traces merge into a timeline
/// whose spike becomes the tail scalar, and each run's timer breakdown
/// joins the phase average.
///
/// A configuration directory that does not exist is a sweep-definition
/// mistake and aborts with the configuration's name. Missing files inside
/// an existing directory stay silent.
fn aggregate_config(layout: &Layout, config: &Configuration) -> Result<AggregatedPoint> {
    let dir = layout.data_root.join(config.dir_name(&layout.prefix));
    if !dir.is_dir() {
        bail!(
            "configuration {} has no directory under {}",
            config.dir_name(&layout.prefix),
            layout.data_root.display()
        );
    }

    let mut samples = Vec::new();
    for task in 0..layout.tasks {
        let path = dir.join(format!("{}-{}.output", layout.operator, task));
        samples.extend(read_task_trace(&path, task)?);
    }
    let timeline = Timeline::from_samples(&samples);

    let mut runs = Vec::new();
    for run in 1..=layout.repeats {
        runs.push(read_timer_breakdown(&dir.join(timer_file_name(run)))?);
    }

    Ok(AggregatedPoint {
        config: config.clone(),
        tail_latency: timeline.spike(layout.quantile),
        phases: PhaseAverages::over_runs(&runs),
    })
}

/// The batching pareto: averaged sync and update phase durations plus the
/// latency spike, swept over chunk sizes.
pub fn pareto_curve(layout: &Layout, params: &Params, chunks: &[u64]) -> Result<Curve> {
    let mut points = BTreeMap::new();
    for &chunk in chunks {
        points.insert(chunk, aggregate_config(layout, &params.pareto_config(chunk))?);
    }

    Ok(CurveBuilder::new(chunks)
        .series("Sync Time", &points, |p| p.phases.get(Phase::Sync))
        .series("Update Time", &points, |p| p.phases.get(Phase::Update))
        .series("Latency Spike", &points, |p| {
            p.tail_latency.map_or(0.0, |v| v as f64)
        })
        .build())
}

/// Completion time of each batching granularity, swept over input rates.
pub fn breakdown_curve(layout: &Layout, params: &Params, rates: &[u64]) -> Result<Curve> {
    let mut builder = CurveBuilder::new(rates);
    for granularity in params.granularities() {
        let mut points = BTreeMap::new();
        for &rate in rates {
            let config = params.breakdown_config(rate, granularity.chunk);
            points.insert(rate, aggregate_config(layout, &config)?);
        }
        builder = builder.series(granularity.name, &points, |p| p.phases.completion_time());
    }
    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn layout(root: &Path) -> Layout {
        Layout {
            data_root: root.to_path_buf(),
            prefix: "bench".to_string(),
            operator: "Splitter FlatMap".to_string(),
            tasks: 2,
            repeats: 2,
            quantile: 0.99,
        }
    }

    fn params() -> Params {
        Params {
            state_size: 32768,
            replication: 0,
            access_ratio: 2,
            parallelism: 2,
            max_parallelism: 512,
        }
    }

    fn config_dir(root: &Path, name: &str) -> PathBuf {
        let dir = root.join(name);
        fs::create_dir(&dir).unwrap();
        dir
    }

    #[test]
    fn aggregates_traces_and_timers_of_one_configuration() {
        let root = tempdir().unwrap();
        let dir = config_dir(root.path(), "bench-32768-1-0");
        fs::write(
            dir.join("Splitter FlatMap-0.output"),
            "ts: 1680000000000 endToEnd latency: 42\n\
             ts: 1680000001000 endToEnd latency: 58\n",
        )
        .unwrap();
        // task 1 wrote no trace file; that is fine
        fs::write(
            dir.join("timer.output"),
            "sync: 10\nreplication: 4\nupdate: 6\n",
        )
        .unwrap();
        fs::write(dir.join("timer-2.output"), "sync: 30\nupdate: 2\n").unwrap();

        let point = aggregate_config(&layout(root.path()), &params().pareto_config(1)).unwrap();

        assert_eq!(point.config, params().pareto_config(1));
        assert_eq!(point.tail_latency, Some(58));
        assert_eq!(point.phases.get(Phase::Sync), 20.0);
        assert_eq!(point.phases.get(Phase::Replication), 2.0);
        assert_eq!(point.phases.get(Phase::Update), 4.0);
        assert_eq!(point.phases.completion_time(), 26.0);
    }

    #[test]
    fn pareto_curve_fills_configurations_without_traces() {
        let root = tempdir().unwrap();
        let dir1 = config_dir(root.path(), "bench-32768-1-0");
        fs::write(
            dir1.join("Splitter FlatMap-0.output"),
            "ts: 1680000000000 endToEnd latency: 42\n\
             ts: 1680000001000 endToEnd latency: 58\n",
        )
        .unwrap();
        fs::write(dir1.join("timer.output"), "sync: 10\nupdate: 6\n").unwrap();
        fs::write(dir1.join("timer-2.output"), "sync: 30\nupdate: 2\n").unwrap();

        // no traces at all here, and only the first run's timer
        let dir2 = config_dir(root.path(), "bench-32768-2-0");
        fs::write(dir2.join("timer.output"), "sync: 100\nupdate: 2\n").unwrap();

        let curve = pareto_curve(&layout(root.path()), &params(), &[1, 2]).unwrap();

        assert_eq!(curve.x_values, vec![1, 2]);
        let names: Vec<&str> = curve.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Sync Time", "Update Time", "Latency Spike"]);
        assert_eq!(curve.series[0].values, vec![20.0, 50.0]);
        assert_eq!(curve.series[1].values, vec![4.0, 1.0]);
        assert_eq!(curve.series[2].values, vec![58.0, 0.0]);
    }

    #[test]
    fn missing_configuration_directory_is_fatal_and_named() {
        let root = tempdir().unwrap();
        let err = pareto_curve(&layout(root.path()), &params(), &[1]).unwrap_err();
        assert!(err.to_string().contains("bench-32768-1-0"));
    }

    #[test]
    fn breakdown_compares_granularities_across_rates() {
        let root = tempdir().unwrap();
        for (rate, chunk, sync) in [
            (1000, 1, 5),
            (1000, 8, 8),
            (1000, 128, 40),
            (2000, 1, 10),
            (2000, 8, 16),
            (2000, 128, 80),
        ] {
            let dir = config_dir(
                root.path(),
                &format!("bench-{}-2-512-32768-{}-0-2", rate, chunk),
            );
            fs::write(dir.join("timer.output"), format!("sync: {}\n", sync)).unwrap();
        }

        let mut layout = layout(root.path());
        layout.repeats = 1;
        let curve = breakdown_curve(&layout, &params(), &[1000, 2000]).unwrap();

        assert_eq!(curve.x_values, vec![1000, 2000]);
        let names: Vec<&str> = curve.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Fluid", "Batched", "All-At-Once"]);
        assert_eq!(curve.series[0].values, vec![5.0, 10.0]);
        assert_eq!(curve.series[1].values, vec![8.0, 16.0]);
        assert_eq!(curve.series[2].values, vec![40.0, 80.0]);
    }
}
