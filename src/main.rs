use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use gstconv::{ConvergenceRun, EventKind, PlottersRenderer, RunOptions, RunOutcome};

#[derive(Parser)]
#[command(name = "gstconv")]
#[command(version)]
#[command(about = "Plot force convergence from a solver .gst iteration log")]
struct Cli {
    /// Directory containing the solver log; outputs are written here too
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// JSON file with run options; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// File name of the chart image
    #[arg(short, long)]
    output: Option<String>,

    /// File name of the cleaned log
    #[arg(long)]
    cleaned: Option<String>,

    /// Extension of solver logs
    #[arg(long)]
    extension: Option<String>,

    /// Column to coerce to a number (repeatable; replaces the default list)
    #[arg(long)]
    numeric: Vec<String>,

    /// Print event counts after rendering
    #[arg(long)]
    summary: bool,
}

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stdout)
        .format(|buf, record| {
            writeln!(
                buf,
                "\n[{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.args()
            )
        })
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let mut options = match &cli.config {
        Some(path) => RunOptions::from_json_file(path)
            .with_context(|| format!("Failed to load config from '{}'", path.display()))?,
        None => RunOptions::default(),
    };
    if let Some(dir) = cli.dir {
        options = options.with_working_dir(dir);
    }
    if let Some(output) = cli.output {
        options = options.with_chart_file(output);
    }
    if let Some(cleaned) = cli.cleaned {
        options = options.with_cleaned_file(cleaned);
    }
    if let Some(extension) = cli.extension {
        options = options.with_extension(extension);
    }
    if !cli.numeric.is_empty() {
        options = options.with_numeric_columns(cli.numeric);
    }

    let renderer = PlottersRenderer::new(options.chart.clone());
    let run = ConvergenceRun::new(options).context("Invalid column configuration")?;

    match run.run(&renderer).context("Convergence plot failed")? {
        RunOutcome::NoLogYet { .. } | RunOutcome::NoRecordsYet { .. } => {}
        RunOutcome::Rendered(summary) => {
            if cli.summary {
                println!("log:      {}", summary.source.display());
                println!("records:  {}", summary.records);
                println!("headers:  {}", summary.dropped_lines);
                for kind in EventKind::ALL {
                    println!("{:<18}{}", kind.label(), summary.events.indices(kind).len());
                }
                println!("chart:    {}", summary.chart.display());
            }
        }
    }

    Ok(())
}
