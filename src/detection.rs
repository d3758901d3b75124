//! Convergence events derived from counter and flag columns.

use log::debug;

use crate::data::RecordTable;
use crate::error::Result;

/// Column holding the substep counter.
pub const SUBSTEP_COLUMN: &str = "SubStep";
/// Column holding the load-step counter.
pub const LOAD_STEP_COLUMN: &str = "LoadStep";
/// Column flagging bisections.
pub const BISECTION_COLUMN: &str = "Bisection";

/// Kind of a convergence event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    SubstepAdvance,
    LoadStepAdvance,
    Bisection,
}

impl EventKind {
    /// Every kind, in legend order.
    pub const ALL: [EventKind; 3] = [
        EventKind::SubstepAdvance,
        EventKind::LoadStepAdvance,
        EventKind::Bisection,
    ];

    /// Legend label used on the chart.
    pub fn label(self) -> &'static str {
        match self {
            EventKind::SubstepAdvance => "Substep Converged",
            EventKind::LoadStepAdvance => "Step Converged",
            EventKind::Bisection => "Bisection",
        }
    }
}

/// Row indices of each event kind, ascending. A row may appear in several sets.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConvergenceEvents {
    pub substep_advance: Vec<usize>,
    pub load_step_advance: Vec<usize>,
    pub bisection: Vec<usize>,
}

impl ConvergenceEvents {
    /// Indices belonging to `kind`.
    pub fn indices(&self, kind: EventKind) -> &[usize] {
        match kind {
            EventKind::SubstepAdvance => &self.substep_advance,
            EventKind::LoadStepAdvance => &self.load_step_advance,
            EventKind::Bisection => &self.bisection,
        }
    }
}

/// Computes all three event sets over `table`.
///
/// The scans are independent and run on the rayon pool.
pub fn detect(table: &RecordTable) -> Result<ConvergenceEvents> {
    let ((substep, load_step), bisection) = rayon::join(
        || {
            rayon::join(
                || table.numeric_column(SUBSTEP_COLUMN).map(|c| unit_increments(&c)),
                || {
                    table
                        .numeric_column(LOAD_STEP_COLUMN)
                        .map(|c| unit_increments(&c))
                },
            )
        },
        || table.numeric_column(BISECTION_COLUMN).map(|c| nonzero(&c)),
    );

    let events = ConvergenceEvents {
        substep_advance: substep?,
        load_step_advance: load_step?,
        bisection: bisection?,
    };
    debug!(
        "detected {} substep advances, {} load-step advances, {} bisections",
        events.substep_advance.len(),
        events.load_step_advance.len(),
        events.bisection.len()
    );
    Ok(events)
}

/// Indices `i >= 1` where `values[i] - values[i - 1]` is exactly one.
pub fn unit_increments(values: &[f64]) -> Vec<usize> {
    values
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| pair[1] - pair[0] == 1.0)
        .map(|(offset, _)| offset + 1)
        .collect()
}

/// Indices whose value is nonzero, regardless of sign.
pub fn nonzero(values: &[f64]) -> Vec<usize> {
    values
        .iter()
        .enumerate()
        .filter(|(_, value)| **value != 0.0)
        .map(|(index, _)| index)
        .collect()
}
