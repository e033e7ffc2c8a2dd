//! Core types for CREX
//!
//! This module holds the error system shared by the client, the archive builder and
//! the workflows:
//! - [`CrexError`] - Enumerated error types covering every CREX failure mode
//! - [`ErrorContext`] - User-friendly error wrapper with suggestions and details
//! - [`user_friendly_error`] - Convert any error to user-friendly format
//! - [`Reported`] - Context for failures the console reporter already printed
//!
//! Library code returns [`Result`] with a typed [`CrexError`]; CLI commands work in
//! `anyhow::Result` and add context, and `main` renders the final error through
//! [`user_friendly_error`].

pub mod error;

pub use error::{CrexError, ErrorContext, Reported, Result, user_friendly_error};
