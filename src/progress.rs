//! Progress display for builds

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Spinner showing the current build stage
pub struct ProgressDisplay {
    spinner: ProgressBar,
}

impl ProgressDisplay {
    /// Create a spinner; a hidden one when `visible` is false
    pub fn new(visible: bool) -> Self {
        if !visible {
            return Self {
                spinner: ProgressBar::hidden(),
            };
        }

        let style = ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(style);
        spinner.enable_steady_tick(Duration::from_millis(80));

        Self { spinner }
    }

    /// Show the stage now running
    pub fn stage(&self, message: &'static str) {
        self.spinner.set_message(message);
    }

    /// Clear the spinner after success
    pub fn finish(&self) {
        self.spinner.finish_and_clear();
    }

    /// Leave the spinner on the failed stage
    pub fn abandon(&self) {
        self.spinner.abandon();
    }
}
