//! Structured logging facility for zkcli
//!
//! This module provides:
//! - Single initialization point via `init(profile, verbosity)`
//! - Structured logging macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Test capture mode for deterministic assertions
//!
//! Log output always goes to stderr so it never mixes with command output.
//!
//! # Usage
//!
//! ```rust
//! use zkcli_core::logging_facility::{init, Profile, Verbosity};
//!
//! // Initialize once at application startup
//! init(Profile::Development, Verbosity::Verbose);
//! ```
//!
//! # Logging Macros
//!
//! - `log_op_start!(op, ...)` - Log operation start
//! - `log_op_end!(op, duration_ms = ...)` - Log operation end
//! - `log_op_error!(op, err, duration_ms = ...)` - Log operation error

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile, Verbosity};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
