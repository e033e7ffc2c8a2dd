//! Error handling for CREX
//!
//! This module provides the error taxonomy for the Creative Exchange client and the
//! user-friendly rendering used by the CLI. The system follows two principles:
//! 1. **Strongly-typed errors** for precise handling in the client, archive and deploy code
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Error Categories
//!
//! - **Transport**: [`CrexError::Transport`] wraps every network or HTTP failure
//!   (connection refused, timeout, non-2xx status, undecodable body). Never retried.
//! - **Archive**: [`CrexError::Archive`] and [`CrexError::InvalidPattern`] cover
//!   compression failures. They abort before any network call.
//! - **Configuration**: [`CrexError::Configuration`] covers unreadable config files
//!   and malformed options.
//!
//! # Examples
//!
//! ```rust,no_run
//! use crex_cli::core::{CrexError, user_friendly_error};
//!
//! let error = CrexError::Configuration {
//!     message: "target address is missing a port".to_string(),
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display(); // Shows colored error with suggestions
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for CREX operations.
#[derive(Error, Debug)]
pub enum CrexError {
    /// A request to the remote API failed.
    ///
    /// Carries the underlying [`reqwest::Error`], which covers connection errors,
    /// timeouts, non-2xx statuses and JSON decoding failures alike.
    #[error("Request failed during {operation}: {source}")]
    Transport {
        /// The client operation that issued the request (e.g., "upload", "install")
        operation: String,
        /// The transport-level error
        #[source]
        source: reqwest::Error,
    },

    /// Building the package archive failed.
    #[error("Failed to build archive {path}: {reason}")]
    Archive {
        /// Output path of the archive being written
        path: String,
        /// What went wrong
        reason: String,
    },

    /// An ignore pattern could not be compiled.
    #[error("Invalid ignore pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The offending pattern
        pattern: String,
        /// Parser message
        reason: String,
    },

    /// Configuration could not be loaded or is unusable.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the problem
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Generic error
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}

impl CrexError {
    /// Wrap a transport error with the operation that produced it.
    pub fn transport(operation: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Transport {
            operation: operation.into(),
            source,
        }
    }

    /// Build an archive error for `path`.
    pub fn archive(path: impl fmt::Display, reason: impl fmt::Display) -> Self {
        Self::Archive {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }

    /// HTTP status of a failed request, when the server answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result alias for operations returning [`CrexError`].
pub type Result<T> = std::result::Result<T, CrexError>;

/// Error wrapper with a user-facing message, details and a suggestion.
///
/// Built by [`user_friendly_error`] and printed by `main` before exiting.
#[derive(Debug)]
pub struct ErrorContext {
    /// The rendered error message
    pub message: String,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
    /// The message was already shown by a reporter; only details and
    /// suggestion are printed
    pub reported: bool,
}

/// Context for a failure that a [`Reporter`](crate::reporter::Reporter) has
/// already printed.
///
/// [`user_friendly_error`] keeps the suggestion for the wrapped error but
/// marks the result so the failure text is not printed a second time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reported(pub String);

impl fmt::Display for Reported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl ErrorContext {
    /// Create a new error context with just a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: None,
            details: None,
            reported: false,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors.
    ///
    /// - Error message: Red and bold
    /// - Details: Yellow
    /// - Suggestion: Green
    ///
    /// A context marked as reported skips the error message.
    pub fn display(&self) {
        if !self.reported {
            eprintln!("{}: {}", "error".red().bold(), self.message);
        }

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions.
///
/// [`CrexError`] variants get tailored suggestions, [`std::io::Error`] gets
/// filesystem guidance, everything else is shown with its full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(reported) = error.downcast_ref::<Reported>() {
        let mut ctx = match error.downcast_ref::<CrexError>() {
            Some(crex_error) => create_error_context(crex_error, reported.to_string()),
            None => ErrorContext::new(reported.to_string()),
        };
        ctx.reported = true;
        return ctx;
    }

    let message = chain_message(&error);

    if let Some(crex_error) = error.downcast_ref::<CrexError>() {
        // Keep any context added on top of the typed error
        let message = if error.to_string() == crex_error.to_string() {
            crex_error.to_string()
        } else {
            message
        };
        return create_error_context(crex_error, message);
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(message)
                    .with_suggestion("Check file ownership and permissions of the package and source folders");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(message)
                    .with_suggestion("Check that the file or directory exists and the path is correct");
            }
            _ => {}
        }
    }

    ErrorContext::new(message)
}

fn chain_message(error: &anyhow::Error) -> String {
    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    message
}

fn create_error_context(error: &CrexError, message: String) -> ErrorContext {
    let ctx = ErrorContext::new(message);

    match error {
        CrexError::Transport { source, .. } => match error.status() {
            Some(401 | 403) => ctx
                .with_suggestion("Check the user and password in the target address (user:password@host:port)")
                .with_details("The remote repository rejected the basic authentication credentials"),
            Some(404) => ctx
                .with_suggestion("Verify the Creative Exchange API is installed on the target instance")
                .with_details("The endpoint was not found on the remote repository"),
            Some(_) => ctx.with_details("The remote repository answered with an error status"),
            None if source.is_builder() => ctx
                .with_suggestion("Pass a complete target address including the port, e.g. admin:admin@localhost:4502")
                .with_details("The request URL could not be built. A target without a port resolves to an empty base address"),
            None => ctx
                .with_suggestion("Check that the instance is running and reachable, and verify https_proxy/http_proxy")
                .with_details("No response was received from the remote repository"),
        },
        CrexError::Archive { .. } => ctx
            .with_suggestion("Check the folders passed to --compress and that the archive location is writable"),
        CrexError::InvalidPattern { .. } => ctx
            .with_suggestion("Use glob syntax for --omit patterns, e.g. '**/*.tmp' or '**/node_modules/**'"),
        CrexError::TomlError(_) => ctx
            .with_suggestion("Check the TOML syntax in your crex config file. Verify quotes and brackets"),
        _ => ctx,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = CrexError::Archive {
            path: "site.zip".to_string(),
            reason: "disk full".to_string(),
        };
        assert_eq!(error.to_string(), "Failed to build archive site.zip: disk full");

        let error = CrexError::Configuration {
            message: "bad target".to_string(),
        };
        assert_eq!(error.to_string(), "Configuration error: bad target");
    }

    #[test]
    fn test_error_context_display() {
        let ctx = ErrorContext::new("boom").with_suggestion("try again").with_details("because");

        let display = format!("{ctx}");
        assert!(display.contains("boom"));
        assert!(display.contains("Details: because"));
        assert!(display.contains("Suggestion: try again"));
    }

    #[test]
    fn test_user_friendly_error_for_archive() {
        let error = CrexError::archive("out.zip", "permission denied");
        let ctx = user_friendly_error(anyhow::Error::from(error));

        assert!(ctx.message.contains("out.zip"));
        assert!(ctx.suggestion.is_some());
    }

    #[test]
    fn test_user_friendly_error_for_io_not_found() {
        let error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.zip");
        let ctx = user_friendly_error(anyhow::Error::from(error));

        assert!(ctx.suggestion.unwrap().contains("exists"));
    }

    #[test]
    fn test_user_friendly_error_includes_chain() {
        let error = anyhow::anyhow!("root cause").context("outer context");
        let ctx = user_friendly_error(error);

        assert!(ctx.message.contains("outer context"));
        assert!(ctx.message.contains("Caused by:"));
        assert!(ctx.message.contains("root cause"));
    }

    #[test]
    fn test_user_friendly_error_keeps_context_over_typed_error() {
        let error = anyhow::Error::from(CrexError::Configuration {
            message: "bad proxy".to_string(),
        })
        .context("Failed to load configuration");
        let ctx = user_friendly_error(error);

        assert!(ctx.message.starts_with("Failed to load configuration"));
        assert!(ctx.message.contains("bad proxy"));
    }

    #[test]
    fn test_reported_failure_keeps_suggestion_only() {
        let error = anyhow::Error::from(CrexError::archive("out.zip", "disk full"))
            .context(Reported("Compression failed: disk full".to_string()));
        let ctx = user_friendly_error(error);

        assert!(ctx.reported);
        assert_eq!(ctx.message, "Compression failed: disk full");
        assert!(ctx.suggestion.unwrap().contains("--compress"));
    }

    #[test]
    fn test_unreported_error_is_not_marked() {
        let ctx = user_friendly_error(anyhow::anyhow!("plain failure"));
        assert!(!ctx.reported);
    }

    #[test]
    fn test_status_is_none_for_non_transport_errors() {
        let error = CrexError::Other {
            message: "x".to_string(),
        };
        assert_eq!(error.status(), None);
    }
}
