//! Two-panel force convergence chart.

use std::error::Error;
use std::path::Path;

use plotters::prelude::*;

use crate::data::RecordTable;
use crate::detection::{ConvergenceEvents, EventKind};
use crate::error::{ConvError, Result};
use crate::options::ChartOptions;

/// Column used as the shared x axis.
pub const ITERATION_COLUMN: &str = "CumIter";
/// Force criterion column.
pub const FORCE_CRITERIA_COLUMN: &str = "FCrit";
/// Force residual (L2 norm) column.
pub const FORCE_CONVERGENCE_COLUMN: &str = "FL2";
/// Solver time column.
pub const TIME_COLUMN: &str = "Time";

const FORCE_CRITERIA_COLOR: RGBColor = RGBColor(0, 255, 255);
const FORCE_CONVERGENCE_COLOR: RGBColor = RGBColor(128, 0, 128);
const TIME_COLOR: RGBColor = RGBColor(255, 0, 0);
const MARKER_ALPHA: f64 = 0.7;
const MARKER_DASHES: usize = 40;

/// X-axis ticks: `1, 1 + interval, ...` up to the row count.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickPlan {
    pub interval: usize,
    pub ticks: Vec<usize>,
    /// Right end of the x axis.
    pub upper: usize,
}

impl TickPlan {
    /// Spaces ticks so that roughly `max_ticks` are shown for `num_points` rows.
    pub fn new(num_points: usize, max_ticks: usize) -> Self {
        let interval = (num_points / max_ticks.max(1)).max(1);
        let ticks = (1..=num_points).step_by(interval).collect();
        Self {
            interval,
            ticks,
            upper: num_points,
        }
    }
}

/// Vertical markers of one event kind, at x positions on the iteration axis.
#[derive(Clone, Debug, PartialEq)]
pub struct MarkerSet {
    pub kind: EventKind,
    pub positions: Vec<f64>,
}

/// Everything the chart shows, detached from the record table.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartData {
    pub iterations: Vec<f64>,
    pub force_criteria: Vec<f64>,
    pub force_convergence: Vec<f64>,
    pub time: Vec<f64>,
    pub markers: Vec<MarkerSet>,
    pub ticks: TickPlan,
}

impl ChartData {
    /// Extracts the plotted series and maps event rows to iteration positions.
    pub fn from_table(
        table: &RecordTable,
        events: &ConvergenceEvents,
        max_ticks: usize,
    ) -> Result<Self> {
        let iterations = table.numeric_column(ITERATION_COLUMN)?;
        let markers = EventKind::ALL
            .iter()
            .map(|&kind| MarkerSet {
                kind,
                positions: events
                    .indices(kind)
                    .iter()
                    .filter_map(|&row| iterations.get(row).copied())
                    .collect(),
            })
            .collect();

        Ok(Self {
            force_criteria: table.numeric_column(FORCE_CRITERIA_COLUMN)?,
            force_convergence: table.numeric_column(FORCE_CONVERGENCE_COLUMN)?,
            time: table.numeric_column(TIME_COLUMN)?,
            ticks: TickPlan::new(table.len(), max_ticks),
            iterations,
            markers,
        })
    }
}

/// Turns [`ChartData`] into an image file.
pub trait Renderer {
    fn render(&self, chart: &ChartData, path: &Path) -> Result<()>;
}

/// Bitmap renderer backed by `plotters`.
#[derive(Clone, Debug, Default)]
pub struct PlottersRenderer {
    options: ChartOptions,
}

impl PlottersRenderer {
    pub fn new(options: ChartOptions) -> Self {
        Self { options }
    }
}

impl Renderer for PlottersRenderer {
    fn render(&self, chart: &ChartData, path: &Path) -> Result<()> {
        draw(chart, path, &self.options).map_err(ConvError::render)
    }
}

fn marker_color(kind: EventKind) -> RGBColor {
    match kind {
        EventKind::SubstepAdvance => RGBColor(0, 128, 0),
        EventKind::LoadStepAdvance => RGBColor(0, 0, 255),
        EventKind::Bisection => RGBColor(255, 0, 0),
    }
}

/// Smallest and largest strictly positive values, padded for a log axis.
fn log_bounds(series: &[&[f64]]) -> (f64, f64) {
    let positive = series
        .iter()
        .flat_map(|values| values.iter().copied())
        .filter(|v| v.is_finite() && *v > 0.0);
    let (min, max) = positive.fold((f64::INFINITY, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if min.is_finite() {
        (min / 2.0, max * 2.0)
    } else {
        (1e-6, 1.0)
    }
}

fn linear_bounds(values: &[f64]) -> (f64, f64) {
    let finite = values.iter().copied().filter(|v| v.is_finite());
    let (min, max) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() {
        return (0.0, 1.0);
    }
    let pad = ((max - min) * 0.05).max(1e-9);
    (min - pad, max + pad)
}

/// Splits `[lo, hi]` into `dashes` segments of equal length on a log axis,
/// separated by gaps of the same length.
fn dash_segments(lo: f64, hi: f64, dashes: usize) -> Vec<(f64, f64)> {
    if dashes == 0 || lo <= 0.0 || hi <= lo {
        return Vec::new();
    }
    let (start, end) = (lo.ln(), hi.ln());
    let step = (end - start) / (2 * dashes - 1) as f64;
    (0..dashes)
        .map(|k| {
            let from = start + (2 * k) as f64 * step;
            (from.exp(), (from + step).exp())
        })
        .collect()
}

fn positive_points<'a>(xs: &'a [f64], ys: &'a [f64]) -> impl Iterator<Item = (f64, f64)> + 'a {
    xs.iter()
        .copied()
        .zip(ys.iter().copied())
        .filter(|(_, y)| y.is_finite() && *y > 0.0)
}

fn draw(
    chart: &ChartData,
    path: &Path,
    options: &ChartOptions,
) -> std::result::Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, (options.width, options.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let ratio = options.height_ratio.max(1);
    let upper_height = options.height * ratio / (ratio + 1);
    let (upper, lower) = root.split_vertically(upper_height);

    let x_range = 1.0..(chart.ticks.upper.max(2) as f64);
    let tick_count = chart.ticks.ticks.len().max(2);
    let label_font = ("sans-serif", 28);

    let (y_min, y_max) = log_bounds(&[
        chart.force_criteria.as_slice(),
        chart.force_convergence.as_slice(),
    ]);
    let mut force = ChartBuilder::on(&upper)
        .caption("Force Convergence Plot", ("sans-serif", 48))
        .margin(25)
        .set_label_area_size(LabelAreaPosition::Left, 140)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(x_range.clone(), (y_min..y_max).log_scale())?;

    force
        .configure_mesh()
        .y_desc("Force")
        .x_labels(tick_count)
        .x_label_formatter(&|v| format!("{:.0}", v))
        .y_label_formatter(&|v| format!("{:.0e}", v))
        .label_style(label_font)
        .draw()?;

    force
        .draw_series(LineSeries::new(
            positive_points(&chart.iterations, &chart.force_criteria),
            FORCE_CRITERIA_COLOR.stroke_width(3),
        ))?
        .label("Force Criteria")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 30, y)], &FORCE_CRITERIA_COLOR));

    force
        .draw_series(LineSeries::new(
            positive_points(&chart.iterations, &chart.force_convergence),
            FORCE_CONVERGENCE_COLOR.stroke_width(3),
        ))?
        .label("Force Convergence")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 30, y)], &FORCE_CONVERGENCE_COLOR));

    for set in &chart.markers {
        let style = marker_color(set.kind).mix(MARKER_ALPHA).stroke_width(2);
        // Legend entry even when the kind never occurs.
        force
            .draw_series(LineSeries::new(std::iter::empty::<(f64, f64)>(), style))?
            .label(set.kind.label())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 30, y)], style));
        let dashes = dash_segments(y_min, y_max, MARKER_DASHES);
        for &x in &set.positions {
            force.draw_series(
                dashes
                    .iter()
                    .map(|&(lo, hi)| PathElement::new(vec![(x, lo), (x, hi)], style)),
            )?;
        }
    }

    force
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK.mix(0.3))
        .label_font(label_font)
        .position(SeriesLabelPosition::UpperRight)
        .draw()?;

    let (t_min, t_max) = linear_bounds(&chart.time);
    let mut time = ChartBuilder::on(&lower)
        .margin(25)
        .set_label_area_size(LabelAreaPosition::Left, 140)
        .set_label_area_size(LabelAreaPosition::Bottom, 70)
        .build_cartesian_2d(x_range, t_min..t_max)?;

    time.configure_mesh()
        .x_desc("Iterations")
        .y_desc("Time")
        .x_labels(tick_count)
        .x_label_formatter(&|v| format!("{:.0}", v))
        .label_style(label_font)
        .draw()?;

    time.draw_series(LineSeries::new(
        chart
            .iterations
            .iter()
            .copied()
            .zip(chart.time.iter().copied()),
        TIME_COLOR.stroke_width(3),
    ))?;

    root.present()?;
    Ok(())
}
