//! Console feedback for the CREX workflows.
//!
//! Workflows talk to a [`Reporter`] instead of the terminal so the same sequencing
//! drives the colored console output in the CLI and plain recordings in tests.

use crate::deploy::report::{ChangeCategory, ReportLine};
use crate::utils::ProgressBar;
use colored::{ColoredString, Colorize};

/// Receiver of workflow progress and results.
pub trait Reporter {
    /// Begin progress indication with `message`.
    fn start(&self, message: &str);

    /// Update the progress message for the current stage.
    fn progress(&self, message: &str);

    /// Report a successful step.
    fn succeed(&self, message: &str);

    /// Report a failed step.
    fn fail(&self, message: &str);

    /// Print one line of the install change report.
    fn line(&self, line: &ReportLine);

    /// End progress indication.
    fn stop(&self);
}

impl<T: Reporter + ?Sized> Reporter for &T {
    fn start(&self, message: &str) {
        (**self).start(message);
    }

    fn progress(&self, message: &str) {
        (**self).progress(message);
    }

    fn succeed(&self, message: &str) {
        (**self).succeed(message);
    }

    fn fail(&self, message: &str) {
        (**self).fail(message);
    }

    fn line(&self, line: &ReportLine) {
        (**self).line(line);
    }

    fn stop(&self) {
        (**self).stop();
    }
}

/// Terminal reporter: a spinner plus colored result lines.
#[derive(Debug, Clone)]
pub struct ConsoleReporter {
    spinner: ProgressBar,
}

impl ConsoleReporter {
    /// Create a reporter with a fresh spinner.
    #[must_use]
    pub fn new() -> Self {
        Self {
            spinner: ProgressBar::new_spinner(),
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

fn paint(category: ChangeCategory, text: String) -> ColoredString {
    match category {
        ChangeCategory::Removed => text.red(),
        ChangeCategory::Ignored => text.bright_black(),
        ChangeCategory::Modified => text.yellow(),
        ChangeCategory::Added => text.green(),
    }
}

impl Reporter for ConsoleReporter {
    fn start(&self, message: &str) {
        self.spinner.set_message(message.to_string());
    }

    fn progress(&self, message: &str) {
        self.spinner.set_message(message.to_string());
    }

    fn succeed(&self, message: &str) {
        self.spinner.println(format!("{} {}", "✔".green(), message));
    }

    fn fail(&self, message: &str) {
        self.spinner.println(format!("{} {}", "✖".red(), message.red()));
    }

    fn line(&self, line: &ReportLine) {
        match line.category() {
            Some(category) => self.spinner.println(paint(category, line.to_string()).to_string()),
            None => self.spinner.println(""),
        }
    }

    fn stop(&self) {
        self.spinner.finish_and_clear();
    }
}
