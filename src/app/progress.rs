//! Progress bar for per-file batch runs.

use std::path::Path;
use std::time::Duration;

use imgpull_core::TaskReport;
use indicatif::{ProgressBar, ProgressStyle};

/// Progress display for one input file.
///
/// When disabled the bar is hidden and every call is a no-op.
pub(crate) struct BatchProgress {
    bar: ProgressBar,
}

impl BatchProgress {
    pub(crate) fn start(enabled: bool, total: usize, input: &Path) -> Self {
        if !enabled {
            return Self {
                bar: ProgressBar::hidden(),
            };
        }

        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::with_template(
                "{prefix} [{bar:30.cyan/blue}] {pos}/{len} ({eta}) {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
        );
        bar.set_prefix(
            input
                .file_name()
                .map_or_else(|| input.display().to_string(), |n| n.to_string_lossy().into_owned()),
        );
        bar.enable_steady_tick(Duration::from_millis(120));
        Self { bar }
    }

    /// Returns a callback suitable for `DownloadEngine::run_with_observer`.
    pub(crate) fn observer(&self) -> impl Fn(&TaskReport) + Send + Sync + 'static {
        let bar = self.bar.clone();
        move |report: &TaskReport| {
            bar.inc(1);
            bar.set_message(report.task.identifier().to_string());
        }
    }

    pub(crate) fn position(&self) -> u64 {
        self.bar.position()
    }

    pub(crate) fn finish(&self) {
        self.bar.finish_and_clear();
    }

    pub(crate) fn abandon(&self) {
        self.bar.abandon_with_message("interrupted");
    }
}
