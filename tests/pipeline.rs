use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use approx::assert_relative_eq;
use gstconv::cleaning::{clean, HEADER_MARKER};
use gstconv::data::RecordTable;
use gstconv::detection::detect;
use gstconv::schema::{ColumnSchema, DEFAULT_NUMERIC_COLUMNS};
use gstconv::{ChartData, ConvError, ConvergenceRun, Renderer, RunOptions, RunOutcome};

/// Captures what the pipeline hands to the chart collaborator.
#[derive(Default)]
struct RecordingRenderer {
    calls: RefCell<Vec<(ChartData, PathBuf)>>,
}

impl Renderer for RecordingRenderer {
    fn render(&self, chart: &ChartData, path: &Path) -> gstconv::Result<()> {
        self.calls.borrow_mut().push((chart.clone(), path.to_path_buf()));
        Ok(())
    }
}

struct FailingRenderer;

impl Renderer for FailingRenderer {
    fn render(&self, _chart: &ChartData, _path: &Path) -> gstconv::Result<()> {
        Err(ConvError::render("backend unavailable"))
    }
}

/// Builds one 20-field data row.
fn row(time: f64, load_step: u32, sub_step: u32, cum_iter: u32, bisection: i32) -> String {
    let mut fields = vec![
        format!("{time:.4}"),
        load_step.to_string(),
        sub_step.to_string(),
        cum_iter.to_string(),
        "0.1".to_string(),
        "1.2e-3".to_string(),
        "1.0".to_string(),
        bisection.to_string(),
        format!("{:.3e}", 10.0 / f64::from(cum_iter)),
        format!("{:.3e}", 100.0 / f64::from(cum_iter * cum_iter)),
    ];
    fields.extend((0..10).map(|i| i.to_string()));
    format!("   {}\n", fields.join("   "))
}

fn run_in(dir: &Path) -> (gstconv::Result<RunOutcome>, RecordingRenderer) {
    let renderer = RecordingRenderer::default();
    let run = ConvergenceRun::new(RunOptions::default().with_working_dir(dir)).unwrap();
    let outcome = run.run(&renderer);
    (outcome, renderer)
}

#[test]
fn header_is_stripped_and_substep_advance_detected() {
    let dir = tempfile::tempdir().unwrap();
    let log = format!(
        "< header\n{}{}",
        row(1.0, 1, 1, 1, 0),
        row(2.0, 1, 2, 2, 0)
    );
    fs::write(dir.path().join("file.gst"), &log).unwrap();

    let (outcome, renderer) = run_in(dir.path());
    let summary = match outcome.unwrap() {
        RunOutcome::Rendered(summary) => summary,
        other => panic!("expected a rendered chart, got {other:?}"),
    };

    assert_eq!(summary.source, dir.path().join("file.gst"));
    assert_eq!(summary.dropped_lines, 1);
    assert_eq!(summary.records, 2);
    assert_eq!(summary.events.substep_advance, vec![1]);
    assert!(summary.events.load_step_advance.is_empty());
    assert!(summary.events.bisection.is_empty());

    let cleaned = fs::read_to_string(dir.path().join("clean_file.gst")).unwrap();
    assert_eq!(cleaned.lines().count(), 2);
    assert!(!cleaned.contains('<'));

    let calls = renderer.calls.borrow();
    assert_eq!(calls.len(), 1);
    let (chart, path) = &calls[0];
    assert_eq!(path, &dir.path().join("convergence.png"));
    assert_eq!(chart.iterations, vec![1.0, 2.0]);
    assert_relative_eq!(chart.force_criteria[1], 5.0, epsilon = 1e-9);
    assert_relative_eq!(chart.force_convergence[1], 25.0, epsilon = 1e-9);
    assert_eq!(chart.markers[0].positions, vec![2.0]);
}

#[test]
fn short_row_aborts_before_rendering() {
    let dir = tempfile::tempdir().unwrap();
    let short: Vec<String> = (0..19).map(|i| i.to_string()).collect();
    let log = format!("{}{}\n", row(1.0, 1, 1, 1, 0), short.join(" "));
    fs::write(dir.path().join("run.gst"), log).unwrap();

    let (outcome, renderer) = run_in(dir.path());
    assert!(matches!(
        outcome,
        Err(ConvError::SchemaMismatch {
            line_number: 2,
            expected: 20,
            found: 19,
            ..
        })
    ));
    assert!(renderer.calls.borrow().is_empty());
}

#[test]
fn nonzero_bisection_rows_are_flagged() {
    let dir = tempfile::tempdir().unwrap();
    let log: String = [0, 0, 3, 0]
        .iter()
        .enumerate()
        .map(|(i, &b)| row(1.0, 1, 1, i as u32 + 1, b))
        .collect();
    fs::write(dir.path().join("run.gst"), log).unwrap();

    let (outcome, _) = run_in(dir.path());
    match outcome.unwrap() {
        RunOutcome::Rendered(summary) => assert_eq!(summary.events.bisection, vec![2]),
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[test]
fn reserved_file_alone_means_no_log_yet() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("clean_file.gst"), row(1.0, 1, 1, 1, 0)).unwrap();

    let (outcome, renderer) = run_in(dir.path());
    assert_eq!(
        outcome.unwrap(),
        RunOutcome::NoLogYet {
            dir: dir.path().to_path_buf()
        }
    );
    assert!(renderer.calls.borrow().is_empty());
    assert!(!dir.path().join("convergence.png").exists());
}

#[test]
fn load_step_advance_skips_first_row() {
    let lines: Vec<String> = [1, 1, 1, 2, 2]
        .iter()
        .enumerate()
        .map(|(i, &step)| row(1.0, step, 1, i as u32 + 1, 0))
        .collect();
    let schema = ColumnSchema::standard()
        .with_numeric(&DEFAULT_NUMERIC_COLUMNS)
        .unwrap();
    let table = RecordTable::parse(&lines, &schema).unwrap();

    let events = detect(&table).unwrap();
    assert_eq!(events.load_step_advance, vec![3]);
}

#[test]
fn substep_jumps_and_resets_are_not_advances() {
    let lines: Vec<String> = [1, 2, 4, 1, 2]
        .iter()
        .enumerate()
        .map(|(i, &sub)| row(1.0, 1, sub, i as u32 + 1, 0))
        .collect();
    let schema = ColumnSchema::standard();
    let table = RecordTable::parse(&lines, &schema).unwrap();

    assert_eq!(detect(&table).unwrap().substep_advance, vec![1, 4]);
}

#[test]
fn non_numeric_force_value_is_reported_with_column() {
    let dir = tempfile::tempdir().unwrap();
    let bad = row(1.0, 1, 1, 1, 0).replacen("1.000e1", "n/a", 1);
    fs::write(dir.path().join("run.gst"), bad).unwrap();

    let (outcome, renderer) = run_in(dir.path());
    match outcome {
        Err(ConvError::TypeCoercion { column, token, .. }) => {
            assert_eq!(column, "FCrit");
            assert_eq!(token, "n/a");
        }
        other => panic!("expected coercion failure, got {other:?}"),
    }
    assert!(renderer.calls.borrow().is_empty());
}

#[test]
fn cleaned_artifact_is_stable_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let log = format!("<a\n{}< b\n{}", row(1.0, 1, 1, 1, 0), row(1.5, 1, 2, 2, 1));
    fs::write(dir.path().join("run.gst"), &log).unwrap();

    run_in(dir.path()).0.unwrap();
    let first = fs::read(dir.path().join("clean_file.gst")).unwrap();
    run_in(dir.path()).0.unwrap();
    let second = fs::read(dir.path().join("clean_file.gst")).unwrap();

    assert_eq!(first, second);
    assert_eq!(first, clean(&log, HEADER_MARKER).contents().into_bytes());
}

#[test]
fn header_only_log_draws_no_chart() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("run.gst"), "<h\n  < solver banner\n").unwrap();

    let (outcome, renderer) = run_in(dir.path());
    assert_eq!(
        outcome.unwrap(),
        RunOutcome::NoRecordsYet {
            source: dir.path().join("run.gst")
        }
    );
    assert!(renderer.calls.borrow().is_empty());
    assert_eq!(fs::read(dir.path().join("clean_file.gst")).unwrap(), b"");
}

#[test]
fn renderer_failure_is_surfaced() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("run.gst"), row(1.0, 1, 1, 1, 0)).unwrap();

    let run = ConvergenceRun::new(RunOptions::default().with_working_dir(dir.path())).unwrap();
    assert!(matches!(
        run.run(&FailingRenderer),
        Err(ConvError::Render { .. })
    ));
}

#[test]
fn chart_file_is_never_picked_as_input() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("force.gst"), row(1.0, 1, 1, 1, 0)).unwrap();

    let renderer = RecordingRenderer::default();
    let options = RunOptions::default()
        .with_working_dir(dir.path())
        .with_chart_file("force.gst");
    let run = ConvergenceRun::new(options).unwrap();
    assert!(matches!(
        run.run(&renderer).unwrap(),
        RunOutcome::NoLogYet { .. }
    ));
}
