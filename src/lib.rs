//! Convergence diagnostics for nonlinear solver iteration logs.
//!
//! A solver appends one whitespace-delimited row per equilibrium iteration to a
//! `.gst` log while it runs. This crate turns the current state of that log into
//! a force convergence chart. It offers tools to
//!
//! - find the active log in a working directory (`locator` module),
//! - strip `<`-prefixed header lines into a cleaned artifact (`cleaning` module),
//! - parse rows against a named, typed column layout (`schema` and `data` modules),
//! - derive substep, load-step, and bisection events (`detection` module), and
//! - draw the two-panel chart (`rendering` module).
//!
//! Each run re-derives everything from the log, so it is safe to invoke on a
//! timer while the solver is still writing. A missing log is reported as
//! [`RunOutcome::NoLogYet`] rather than as an error.
//!
//! # Quick start
//!
//! ```no_run
//! use gstconv::{ConvergenceRun, PlottersRenderer, RunOptions, RunOutcome};
//!
//! let options = RunOptions::default().with_working_dir("solver_run");
//! let renderer = PlottersRenderer::new(options.chart.clone());
//! let run = ConvergenceRun::new(options).expect("valid schema");
//!
//! match run.run(&renderer).expect("readable log") {
//!     RunOutcome::NoLogYet { .. } => println!("solver has not started"),
//!     RunOutcome::NoRecordsYet { .. } => println!("log has no data rows yet"),
//!     RunOutcome::Rendered(summary) => {
//!         println!("{} bisections", summary.events.bisection.len())
//!     }
//! }
//! ```

pub mod cleaning;
pub mod data;
pub mod detection;
pub mod error;
pub mod locator;
pub mod options;
pub mod pipeline;
pub mod rendering;
pub mod schema;

pub use detection::{ConvergenceEvents, EventKind};
pub use error::{ConvError, Result};
pub use options::{ChartOptions, RunOptions};
pub use pipeline::{ConvergenceRun, RunOutcome, RunSummary};
pub use rendering::{ChartData, PlottersRenderer, Renderer};
