//! Progress reporting utilities using indicatif.
//!
//! Progress is for observability only, never a correctness mechanism: the
//! pipeline behaves identically with the [`SilentProgress`] no-op callback.

use std::sync::Mutex;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Progress callback for long-running passes.
///
/// Implement this trait to receive progress updates during scanning,
/// timestamp extraction and duplicate refinement.
pub trait ProgressCallback: Send + Sync {
    /// Called when a phase starts. `total` is `None` for phases whose item
    /// count is not known up front (lazy directory walks).
    fn on_phase_start(&self, phase: &str, total: Option<usize>);

    /// Called for each item processed.
    fn on_progress(&self, item: &str);

    /// Called when a phase completes.
    fn on_phase_end(&self, phase: &str);
}

/// No-op callback for tests and library consumers.
pub struct SilentProgress;

impl ProgressCallback for SilentProgress {
    fn on_phase_start(&self, _phase: &str, _total: Option<usize>) {}
    fn on_progress(&self, _item: &str) {}
    fn on_phase_end(&self, _phase: &str) {}
}

/// Terminal progress reporter backed by indicatif.
pub struct Progress {
    multi: MultiProgress,
    current: Mutex<Option<ProgressBar>>,
    quiet: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// With `quiet` no bars are displayed at all.
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            multi: MultiProgress::new(),
            current: Mutex::new(None),
            quiet,
        }
    }

    /// Spinner style for phases with an unknown item count.
    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed_precise}] {pos} files")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
    }

    /// Bar style for phases with a known item count.
    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓▒░")
    }
}

impl ProgressCallback for Progress {
    fn on_phase_start(&self, phase: &str, total: Option<usize>) {
        if self.quiet {
            return;
        }

        let bar = match total {
            Some(total) => {
                let bar = self.multi.add(ProgressBar::new(total as u64));
                bar.set_style(Self::bar_style());
                bar
            }
            None => {
                let bar = self.multi.add(ProgressBar::new_spinner());
                bar.set_style(Self::spinner_style());
                bar.enable_steady_tick(Duration::from_millis(100));
                bar
            }
        };
        bar.set_message(phase.to_string());

        if let Ok(mut current) = self.current.lock() {
            *current = Some(bar);
        }
    }

    fn on_progress(&self, item: &str) {
        if let Ok(current) = self.current.lock() {
            if let Some(bar) = current.as_ref() {
                bar.inc(1);
                // Keep the tail of long paths visible
                let display: String = if item.chars().count() > 60 {
                    let tail: String = item
                        .chars()
                        .rev()
                        .take(59)
                        .collect::<Vec<_>>()
                        .into_iter()
                        .rev()
                        .collect();
                    format!("…{tail}")
                } else {
                    item.to_string()
                };
                bar.set_message(display);
            }
        }
    }

    fn on_phase_end(&self, phase: &str) {
        if let Ok(mut current) = self.current.lock() {
            if let Some(bar) = current.take() {
                bar.finish_with_message(format!("{phase} done"));
            }
        }
    }
}
