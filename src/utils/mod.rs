//! Terminal utilities.
//!
//! - [`progress`] - Spinners and byte bars for long-running operations

pub mod progress;

pub use progress::ProgressBar;
