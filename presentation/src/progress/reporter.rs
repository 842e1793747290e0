//! Progress reporting for mixture runs

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use mos_application::ports::progress::ProgressNotifier;
use mos_domain::Phase;
use std::sync::Mutex;

/// Reports progress during a mixture run with progress bars
pub struct ProgressReporter {
    multi: MultiProgress,
    phase_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            phase_bar: Mutex::new(None),
        }
    }

    fn phase_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn with_bar(&self, f: impl FnOnce(&mut Option<ProgressBar>)) {
        if let Ok(mut bar) = self.phase_bar.lock() {
            f(&mut *bar);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_phase_start(&self, phase: &Phase, total_tasks: usize) {
        let pb = self.multi.add(ProgressBar::new(total_tasks as u64));
        pb.set_style(Self::phase_style());
        pb.set_prefix(phase.display_name().to_string());
        pb.set_message("Starting...");

        self.with_bar(|bar| *bar = Some(pb));
    }

    fn on_task_complete(&self, _phase: &Phase, source: &str, success: bool) {
        self.with_bar(|bar| {
            if let Some(pb) = bar.as_ref() {
                let status = if success {
                    format!("{} {}", "v".green(), source)
                } else {
                    format!("{} {}", "x".red(), source)
                };
                pb.set_message(status);
                pb.inc(1);
            }
        });
    }

    fn on_phase_complete(&self, phase: &Phase) {
        self.with_bar(|bar| {
            if let Some(pb) = bar.take() {
                pb.finish_with_message(format!("{} complete!", phase.display_name().green()));
            }
        });
    }

    fn on_round_start(&self, round: usize, total_rounds: usize) {
        self.with_bar(|bar| {
            if let Some(pb) = bar.as_ref() {
                pb.set_message(format!("round {}/{}", round, total_rounds));
            }
        });
    }
}

/// Simple text-based progress (no fancy UI)
///
/// Writes to stderr so that stdout carries only the result.
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_phase_start(&self, phase: &Phase, total_tasks: usize) {
        eprintln!(
            "{} {} ({} tasks)",
            "->".cyan(),
            phase.display_name().bold(),
            total_tasks
        );
    }

    fn on_task_complete(&self, _phase: &Phase, source: &str, success: bool) {
        if success {
            eprintln!("  {} {}", "v".green(), source);
        } else {
            eprintln!("  {} {} (failed)", "x".red(), source);
        }
    }

    fn on_phase_complete(&self, _phase: &Phase) {
        eprintln!();
    }

    fn on_round_start(&self, round: usize, total_rounds: usize) {
        eprintln!("  {} round {}/{}", "~".cyan(), round, total_rounds);
    }
}
