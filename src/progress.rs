//! Spinner shown while network batches run

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Spinner for a single network batch
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    /// Start spinning with `message`; hidden when stderr is not a terminal
    pub fn start(message: &str) -> Self {
        let style = ProgressStyle::default_spinner()
            .template(&format!("{{spinner}} {message}..."))
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);

        let bar = ProgressBar::new_spinner();
        bar.set_style(style);
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }

    pub fn finish(self) {
        self.bar.finish_and_clear();
    }
}
