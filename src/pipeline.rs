//! One end-to-end pass: locate, clean, parse, detect, render.

use std::path::PathBuf;

use log::{debug, info};

use crate::cleaning::clean_file;
use crate::data::RecordTable;
use crate::detection::{detect, ConvergenceEvents};
use crate::error::Result;
use crate::locator::locate_log;
use crate::options::RunOptions;
use crate::rendering::{ChartData, Renderer};
use crate::schema::ColumnSchema;

/// What a run produced.
#[derive(Clone, Debug, PartialEq)]
pub enum RunOutcome {
    /// No solver log exists yet in `dir`; nothing was written.
    NoLogYet { dir: PathBuf },
    /// The log at `source` holds no data rows yet, only headers. The cleaned
    /// artifact was written; no chart was drawn.
    NoRecordsYet { source: PathBuf },
    /// The chart was rendered.
    Rendered(RunSummary),
}

/// Diagnostics of a completed run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    pub source: PathBuf,
    pub cleaned: PathBuf,
    pub chart: PathBuf,
    /// Header lines removed by the cleaner.
    pub dropped_lines: usize,
    /// Rows in the record table.
    pub records: usize,
    pub events: ConvergenceEvents,
}

/// A configured run over one working directory.
#[derive(Clone, Debug)]
pub struct ConvergenceRun {
    options: RunOptions,
    schema: ColumnSchema,
}

impl ConvergenceRun {
    /// Validates the configured schema once up front.
    pub fn new(options: RunOptions) -> Result<Self> {
        let schema = options.schema()?;
        Ok(Self { options, schema })
    }

    /// Accessor for the run configuration.
    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Accessor for the validated schema.
    pub fn schema(&self) -> &ColumnSchema {
        &self.schema
    }

    /// Executes the run, handing the chart to `renderer`.
    ///
    /// Any parsing failure aborts before the renderer is called, so a chart is
    /// never produced from a partially valid log. A log with headers but no
    /// data rows ends the run with [`RunOutcome::NoRecordsYet`] instead of an
    /// empty chart.
    pub fn run<R: Renderer + ?Sized>(&self, renderer: &R) -> Result<RunOutcome> {
        let options = &self.options;
        let dir = &options.working_dir;

        let Some(source) = locate_log(dir, &options.extension, &options.excluded_names())? else {
            info!("No suitable .{} file found yet....", options.extension);
            return Ok(RunOutcome::NoLogYet { dir: dir.clone() });
        };
        debug!("using solver log `{}`", source.display());

        let cleaned = clean_file(&source, options.header_marker)?;
        let cleaned_path = options.cleaned_path();
        cleaned.write_to(&cleaned_path)?;
        debug!(
            "kept {} lines, dropped {} header lines",
            cleaned.retained(),
            cleaned.dropped()
        );

        let table = RecordTable::parse(cleaned.lines(), &self.schema)?;
        debug!("parsed {} records", table.len());
        if table.is_empty() {
            info!("No iterations in {} yet....", source.display());
            return Ok(RunOutcome::NoRecordsYet { source });
        }

        let events = detect(&table)?;
        let chart = ChartData::from_table(&table, &events, options.chart.max_ticks)?;

        info!("Creating Force Convergence Plot");
        let chart_path = options.chart_path();
        renderer.render(&chart, &chart_path)?;

        Ok(RunOutcome::Rendered(RunSummary {
            source,
            cleaned: cleaned_path,
            chart: chart_path,
            dropped_lines: cleaned.dropped(),
            records: table.len(),
            events,
        }))
    }
}
