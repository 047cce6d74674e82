//! Exit code logic for the imgpull process.
//!
//! Single responsibility: map run totals to the process exit outcome.

use crate::ProcessExit;
use crate::app::summary::RunSummary;

/// Determines the process exit outcome for a finished or interrupted run.
pub(crate) fn determine_exit_outcome(summary: &RunSummary) -> ProcessExit {
    if summary.interrupted {
        return ProcessExit::Failure;
    }
    let totals = summary.totals();
    outcome_from_counts(
        totals.succeeded + totals.skipped,
        totals.failed,
        summary.missing_inputs.len(),
    )
}

fn outcome_from_counts(ok: usize, failed: usize, missing_inputs: usize) -> ProcessExit {
    if failed == 0 {
        if missing_inputs == 0 {
            ProcessExit::Success
        } else {
            ProcessExit::Partial
        }
    } else if ok > 0 {
        ProcessExit::Partial
    } else {
        ProcessExit::Failure
    }
}
