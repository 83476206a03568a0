use clap::{Args, Parser, Subcommand};

mod analyze;
mod curve;
mod log;
mod model;
mod render;
mod sweep;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "streambench-analyzer")]
#[command(about = "Latency and completion-time curves from benchmark run logs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

/// Flags shared by every sweep: where the raw output lives, how much of it
/// to read, and the fixed harness knobs baked into directory names.
#[derive(Args)]
struct CommonArgs {
    /// Directory holding one subdirectory per configuration.
    #[arg(long)]
    data_root: String,

    /// Leading component of configuration directory names.
    #[arg(long, default_value = "bench")]
    prefix: String,

    /// Operator whose tasks wrote the latency traces.
    #[arg(long, default_value = "Splitter FlatMap")]
    operator: String,

    /// Number of parallel tasks that may have written traces.
    #[arg(long, default_value_t = 8)]
    tasks: u32,

    /// Declared repeat count; phase averages always divide by this.
    #[arg(long, default_value_t = 1)]
    repeats: u32,

    /// Per-bin tail quantile for the spike metric.
    #[arg(long, default_value_t = 0.99)]
    quantile: f64,

    /// Per-key managed state size in bytes.
    #[arg(long, default_value_t = 32768)]
    state_size: u64,

    /// Key-replication filter the runs used.
    #[arg(long, default_value_t = 0)]
    replication: u64,

    /// State accesses per input record.
    #[arg(long, default_value_t = 2)]
    access_ratio: u64,

    /// Operator parallelism during the runs.
    #[arg(long, default_value_t = 2)]
    parallelism: u64,

    /// Upper parallelism bound (key-group count).
    #[arg(long, default_value_t = 512)]
    max_parallelism: u64,

    /// Directory the chart artifacts land in.
    #[arg(short = 'o', long, default_value = ".")]
    out: String,

    /// Also write `<stem>.json` with the raw curve.
    #[arg(long)]
    json: bool,
}

impl CommonArgs {
    fn layout(&self) -> analyze::Layout {
        analyze::Layout {
            data_root: self.data_root.clone().into(),
            prefix: self.prefix.clone(),
            operator: self.operator.clone(),
            tasks: self.tasks,
            repeats: self.repeats,
            quantile: self.quantile,
        }
    }

    fn params(&self) -> sweep::Params {
        sweep::Params {
            state_size: self.state_size,
            replication: self.replication,
            access_ratio: self.access_ratio,
            parallelism: self.parallelism,
            max_parallelism: self.max_parallelism,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Sync/update cost against latency spike across batching chunk sizes.
    Pareto {
        #[command(flatten)]
        common: CommonArgs,

        /// Chunk sizes to sweep, in plot order.
        #[arg(long, value_delimiter = ',', default_value = "1,2,4,8,16,32,64")]
        chunks: Vec<u64>,
    },

    /// Completion-time breakdown across input rates, one series per
    /// batching granularity.
    Breakdown {
        #[command(flatten)]
        common: CommonArgs,

        /// Per-task input rates to sweep, in plot order.
        #[arg(long, value_delimiter = ',', default_value = "1000,2000,4000,8000")]
        rates: Vec<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Pareto { common, chunks } => {
            // 1) Aggregate the sweep.
            let curve = analyze::pareto_curve(&common.layout(), &common.params(), &chunks)?;

            // 2) Render + write artifacts.
            let spec = render::ChartSpec {
                x_label: "Chunk Size".to_string(),
                y_label: "Time (ms)".to_string(),
                legend: false,
                file_stem: "pareto_curve_batching".to_string(),
            };
            write_chart(&common, &curve, &spec)?;
        }
        Commands::Breakdown { common, rates } => {
            let curve = analyze::breakdown_curve(&common.layout(), &common.params(), &rates)?;

            let spec = render::ChartSpec {
                x_label: "Input Rate (e/s)".to_string(),
                y_label: "Completion Time (ms)".to_string(),
                legend: true,
                file_stem: "breakdown_batching_input_rate".to_string(),
            };
            write_chart(&common, &curve, &spec)?;
        }
    }

    Ok(())
}

fn write_chart(common: &CommonArgs, curve: &curve::Curve, spec: &render::ChartSpec) -> Result<()> {
    let out_dir = std::path::Path::new(&common.out);

    let html = render::render_chart_html(curve, spec)?;
    let path = out_dir.join(format!("{}.html", spec.file_stem));
    std::fs::write(&path, html)?;
    println!("Wrote {}", path.display());

    if common.json {
        let path = out_dir.join(format!("{}.json", spec.file_stem));
        std::fs::write(&path, serde_json::to_string_pretty(curve)?)?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}
