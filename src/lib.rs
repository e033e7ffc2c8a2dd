//! CREX - Creative Exchange command-line client
//!
//! Packages local folders into a zip archive, uploads it to a Creative Exchange
//! endpoint (`/apps/creative-exchange/api`), installs it synchronously and reports
//! the files the install removed, ignored, modified and added.
//!
//! # Architecture Overview
//!
//! ```text
//! CLI flags / config file
//!         |
//!         v
//!   Target resolver  ->  CrexClient (one session per command)
//!                            ^
//!   Archive builder  ->  Deployment pipeline  ->  Reporter (console / recording)
//! ```
//!
//! # Core Modules
//!
//! - [`client`] - Target resolution, typed remote operations, transport modes
//! - [`archive`] - Zip archive builder with ignore patterns
//! - [`deploy`] - Compress, upload, install, report and cleanup state machine
//! - [`create`] - One-shot package creation
//! - [`reporter`] - Console output seam shared by the workflows
//!
//! ## Supporting Modules
//! - [`cli`] - clap commands
//! - [`config`] - Config file and resolved deployment inputs
//! - [`core`] - Error types and user-facing error rendering
//! - [`pattern`] - Glob ignore sets
//! - [`constants`] - API paths, defaults and environment variable names
//! - [`utils`] - Progress indicators
//!
//! # Example
//!
//! ```bash
//! crex --target admin:admin@localhost:4502 upload site.zip --compress jcr_root,META-INF
//! ```

pub mod archive;
pub mod cli;
pub mod client;
pub mod config;
pub mod constants;
pub mod core;
pub mod create;
pub mod deploy;
pub mod pattern;
pub mod reporter;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
