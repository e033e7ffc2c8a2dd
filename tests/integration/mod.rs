//! Integration test suite for crex
//!
//! End-to-end tests that run the `crex` binary against local mock servers.
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **cli**: Help, version and argument errors
//! - **commands**: Single-request commands (create, status, list, download, delete, install)
//! - **upload**: The compress, upload, install and report pipeline

mod common;

mod cli;
mod commands;
mod upload;
