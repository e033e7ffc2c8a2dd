//! Progress indicators for CREX operations.
//!
//! Thin wrappers around `indicatif` with a consistent look. Spinners show the
//! current pipeline stage; the download bar tracks bytes for `crex download`.
//!
//! # Environment Variables
//!
//! - `CREX_NO_PROGRESS`: Set to any value to hide all progress indicators
//!
//! Hidden indicators still accept every call, so callers never branch on
//! whether progress is enabled.
//!
//! # Examples
//!
//! ```rust
//! use crex_cli::utils::progress::ProgressBar;
//!
//! let spinner = ProgressBar::new_spinner();
//! spinner.set_message("Uploading package");
//! spinner.println("✔ Package uploaded");
//! spinner.finish_and_clear();
//! ```

use crate::constants::NO_PROGRESS_ENV;
use indicatif::{ProgressBar as IndicatifBar, ProgressStyle as IndicatifStyle};
use std::time::Duration;

/// Checks if progress indicators should be hidden.
fn is_progress_disabled() -> bool {
    std::env::var(NO_PROGRESS_ENV).is_ok()
}

/// A spinner or byte bar with CREX styling.
///
/// Cloning shares the underlying indicator.
#[derive(Clone, Debug)]
pub struct ProgressBar {
    inner: IndicatifBar,
}

impl ProgressBar {
    /// Creates a spinner for work of unknown length.
    #[must_use]
    pub fn new_spinner() -> Self {
        let bar = if is_progress_disabled() {
            IndicatifBar::hidden()
        } else {
            let bar = IndicatifBar::new_spinner();
            bar.set_style(spinner_style());
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        };
        Self { inner: bar }
    }

    /// Creates a byte-counting bar for a transfer of `len` bytes.
    #[must_use]
    pub fn new_download(len: u64) -> Self {
        let bar = if is_progress_disabled() {
            IndicatifBar::hidden()
        } else {
            let bar = IndicatifBar::new(len);
            bar.set_style(download_style());
            bar
        };
        Self { inner: bar }
    }

    /// Creates an indicator that never draws.
    #[must_use]
    pub fn hidden() -> Self {
        Self {
            inner: IndicatifBar::hidden(),
        }
    }

    /// Sets the message shown next to the spinner.
    pub fn set_message(&self, msg: impl Into<String>) {
        self.inner.set_message(msg.into());
    }

    /// Sets the position of a byte bar.
    pub fn set_position(&self, pos: u64) {
        self.inner.set_position(pos);
    }

    /// Prints a line above the indicator without corrupting it.
    ///
    /// Writes straight to stdout when the indicator is hidden.
    pub fn println(&self, line: impl AsRef<str>) {
        if self.inner.is_hidden() {
            println!("{}", line.as_ref());
        } else {
            self.inner.suspend(|| println!("{}", line.as_ref()));
        }
    }

    /// Stops the indicator and removes it from the terminal.
    pub fn finish_and_clear(&self) {
        self.inner.finish_and_clear();
    }

    /// Whether the indicator is still running.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }
}

fn spinner_style() -> IndicatifStyle {
    IndicatifStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| IndicatifStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✔"])
}

fn download_style() -> IndicatifStyle {
    IndicatifStyle::default_bar()
        .template("{msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
        .unwrap_or_else(|_| IndicatifStyle::default_bar())
        .progress_chars("━╸━")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_lifecycle() {
        let spinner = ProgressBar::new_spinner();
        spinner.set_message("Loading...");
        spinner.finish_and_clear();
        assert!(spinner.is_finished());
    }

    #[test]
    fn test_download_bar() {
        let bar = ProgressBar::new_download(100);
        bar.set_message("pkg1.zip");
        bar.set_position(50);
        bar.finish_and_clear();
    }

    #[test]
    fn test_hidden_bar_prints() {
        let bar = ProgressBar::hidden();
        bar.println("line");
        bar.finish_and_clear();
    }
}
