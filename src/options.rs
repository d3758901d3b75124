//! Run configuration: file names, column typing, and chart layout.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::cleaning::HEADER_MARKER;
use crate::error::{ConvError, Result};
use crate::schema::{ColumnSchema, DEFAULT_NUMERIC_COLUMNS};

/// Layout of the rendered chart.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChartOptions {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Upper panel height relative to the lower panel (4 means 4:1).
    pub height_ratio: u32,
    /// Upper bound on the number of x-axis ticks.
    pub max_ticks: usize,
}

impl Default for ChartOptions {
    fn default() -> Self {
        // 12x7 inches at 300 dpi.
        Self {
            width: 3600,
            height: 2100,
            height_ratio: 4,
            max_ticks: 10,
        }
    }
}

/// Everything one invocation needs to know.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RunOptions {
    /// Directory scanned for the solver log; outputs are written here too.
    pub working_dir: PathBuf,
    /// Extension of solver logs, without the dot.
    pub extension: String,
    /// Name of the cleaned intermediate log.
    pub cleaned_file: String,
    /// Name of the chart image.
    pub chart_file: String,
    /// Additional names never treated as solver logs.
    pub excluded: Vec<String>,
    /// First character of header lines.
    pub header_marker: char,
    /// Columns coerced to floating point while parsing.
    pub numeric_columns: Vec<String>,
    pub chart: ChartOptions,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            working_dir: PathBuf::from("."),
            extension: "gst".to_string(),
            cleaned_file: "clean_file.gst".to_string(),
            chart_file: "convergence.png".to_string(),
            excluded: Vec::new(),
            header_marker: HEADER_MARKER,
            numeric_columns: DEFAULT_NUMERIC_COLUMNS
                .iter()
                .map(|name| (*name).to_string())
                .collect(),
            chart: ChartOptions::default(),
        }
    }
}

impl RunOptions {
    /// Loads options from a JSON file; absent fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|err| ConvError::io(path, err))?;
        serde_json::from_str(&raw).map_err(|err| ConvError::Config {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })
    }

    /// Override the directory that is scanned and written to.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = dir.into();
        self
    }

    /// Override the solver log extension.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Override the cleaned artifact name.
    pub fn with_cleaned_file(mut self, name: impl Into<String>) -> Self {
        self.cleaned_file = name.into();
        self
    }

    /// Override the chart image name.
    pub fn with_chart_file(mut self, name: impl Into<String>) -> Self {
        self.chart_file = name.into();
        self
    }

    /// Replace the list of columns coerced to numbers.
    pub fn with_numeric_columns<S: Into<String>>(mut self, columns: Vec<S>) -> Self {
        self.numeric_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Override the chart layout.
    pub fn with_chart(mut self, chart: ChartOptions) -> Self {
        self.chart = chart;
        self
    }

    /// Names the locator must skip: both outputs plus any configured extras.
    pub fn excluded_names(&self) -> Vec<String> {
        let mut names = vec![self.cleaned_file.clone(), self.chart_file.clone()];
        for name in &self.excluded {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
        names
    }

    /// Standard 20-column schema with the configured numeric columns.
    pub fn schema(&self) -> Result<ColumnSchema> {
        ColumnSchema::standard().with_numeric(&self.numeric_columns)
    }

    /// Full path of the cleaned artifact.
    pub fn cleaned_path(&self) -> PathBuf {
        self.working_dir.join(&self.cleaned_file)
    }

    /// Full path of the chart image.
    pub fn chart_path(&self) -> PathBuf {
        self.working_dir.join(&self.chart_file)
    }
}
