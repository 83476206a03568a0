//! Sweep definitions: the fixed harness knobs, how a configuration names
//! its directory of raw output, and the batching-granularity presets.

use serde::Serialize;

/// Fixed harness knobs shared by every configuration of a sweep.
///
/// The harness bakes these into directory names, so the values here must
/// match the ones the runs were launched with. They travel as an explicit
/// value into whichever stage needs them; nothing reads ambient state.
#[derive(Debug, Clone)]
pub struct Params {
    /// Per-key managed state footprint in bytes.
    pub state_size: u64,
    /// Key-replication filter applied during the run.
    pub replication: u64,
    /// State accesses per input record.
    pub access_ratio: u64,
    /// Operator parallelism during the run.
    pub parallelism: u64,
    /// Upper parallelism bound (key-group count).
    pub max_parallelism: u64,
}

impl Params {
    /// Configuration of one pareto point: `(state_size, chunk, replication)`.
    pub fn pareto_config(&self, chunk: u64) -> Configuration {
        Configuration::new(vec![self.state_size, chunk, self.replication])
    }

    /// Configuration of one breakdown point: `(rate, parallelism,
    /// max_parallelism, state_size, chunk, replication, access_ratio)`.
    pub fn breakdown_config(&self, rate: u64, chunk: u64) -> Configuration {
        Configuration::new(vec![
            rate,
            self.parallelism,
            self.max_parallelism,
            self.state_size,
            chunk,
            self.replication,
            self.access_ratio,
        ])
    }

    /// The three batching granularities the breakdown compares. The
    /// coarsest migrates every key group an operator instance owns in one
    /// chunk, hence the division by parallelism and by the two migration
    /// halves.
    pub fn granularities(&self) -> [Granularity; 3] {
        [
            Granularity {
                name: "Fluid",
                chunk: 1,
            },
            Granularity {
                name: "Batched",
                chunk: 8,
            },
            Granularity {
                name: "All-At-Once",
                chunk: self.max_parallelism / self.parallelism / 2,
            },
        ]
    }
}

/// A named batching granularity preset.
#[derive(Debug, Clone, Copy)]
pub struct Granularity {
    pub name: &'static str,
    pub chunk: u64,
}

/// One point of a sweep: the ordered parameter values that name its
/// directory of raw output. Two configurations compare only within one
/// sweep, where everything but the swept axis is fixed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Configuration {
    values: Vec<u64>,
}

impl Configuration {
    pub fn new(values: Vec<u64>) -> Configuration {
        Configuration { values }
    }

    /// Directory name under the data root: the prefix, then every parameter
    /// value in tuple order, joined by `-`.
    pub fn dir_name(&self, prefix: &str) -> String {
        let mut name = String::from(prefix);
        for value in &self.values {
            name.push('-');
            name.push_str(&value.to_string());
        }
        name
    }
}
