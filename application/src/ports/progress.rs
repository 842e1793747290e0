//! Progress notification port
//!
//! Defines the interface for reporting progress during a mixture run.

use mos_domain::Phase;

/// Callback for progress updates during a mixture run
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (progress bars, plain lines, nothing).
pub trait ProgressNotifier: Send + Sync {
    /// Called when a phase starts
    fn on_phase_start(&self, phase: &Phase, total_tasks: usize);

    /// Called when one source call within a phase finishes
    fn on_task_complete(&self, phase: &Phase, source: &str, success: bool);

    /// Called when a phase completes
    fn on_phase_complete(&self, phase: &Phase);

    /// Called at the start of each discussion round (1-indexed)
    fn on_round_start(&self, _round: usize, _total_rounds: usize) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_phase_start(&self, _phase: &Phase, _total_tasks: usize) {}
    fn on_task_complete(&self, _phase: &Phase, _source: &str, _success: bool) {}
    fn on_phase_complete(&self, _phase: &Phase) {}
}
