//! Progress display for refinement passes

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::LazyLock;

use crate::algorithm::refinement::PassReport;

static PASS_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] Passes: [{bar:30.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Single progress bar advanced once per refinement pass
pub struct PassProgress {
    bar: ProgressBar,
}

impl PassProgress {
    /// Create a bar for `passes` passes
    pub fn new(passes: usize) -> Self {
        let bar = ProgressBar::new(passes as u64);
        bar.set_style(PASS_STYLE.clone());
        Self { bar }
    }

    /// Create a bar that draws nothing
    pub fn hidden(passes: usize) -> Self {
        let bar = ProgressBar::hidden();
        bar.set_length(passes as u64);
        Self { bar }
    }

    /// Record a finished pass
    pub fn record(&self, report: &PassReport) {
        self.bar.set_message(format!(
            "{}x{} · {} nodes · {} failed",
            report.size,
            report.size,
            report.nodes,
            report.populate.failed()
        ));
        self.bar.inc(1);
    }

    /// Passes recorded so far
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Close the bar
    pub fn finish(&self) {
        self.bar.finish_with_message("done");
    }
}
