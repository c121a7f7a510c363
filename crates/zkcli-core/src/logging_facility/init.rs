//! Logging initialization module
//!
//! Provides a single initialization point for the logging facility.

use std::io::IsTerminal;
use std::sync::Once;

use tracing_subscriber::EnvFilter;

/// Crate targets that the default filter applies to
const TARGETS: [&str; 3] = ["zkcli_core", "zkcli_store", "zkcli"];

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable output
    Development,
    /// JSON structured output
    Production,
    /// Test capture mode for deterministic testing
    Test,
}

/// How much the CLI reports about its own progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Errors only
    #[default]
    Quiet,
    /// Informational messages
    Verbose,
    /// Everything, including operation boundaries and retry attempts
    Debug,
}

impl Verbosity {
    /// Level name understood by `EnvFilter`
    pub fn level(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Verbose => "info",
            Verbosity::Debug => "debug",
        }
    }

    /// Default filter directives covering every zkcli crate
    pub fn directives(&self) -> String {
        TARGETS
            .iter()
            .map(|target| format!("{}={}", target, self.level()))
            .collect::<Vec<_>>()
            .join(",")
    }
}

static INIT_ONCE: Once = Once::new();

/// Initialize the logging facility
///
/// This function should be called once at application startup. Later calls
/// are ignored. `RUST_LOG` takes precedence over the verbosity default.
///
/// # Example
///
/// ```
/// use zkcli_core::logging_facility::{init, Profile, Verbosity};
///
/// init(Profile::Development, Verbosity::Quiet);
/// ```
pub fn init(profile: Profile, verbosity: Verbosity) {
    INIT_ONCE.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(verbosity.directives()));
        match profile {
            Profile::Development => {
                tracing_subscriber::fmt()
                    .with_writer(std::io::stderr)
                    .with_ansi(std::io::stderr().is_terminal())
                    .with_env_filter(filter)
                    .init();
            }
            Profile::Production => {
                tracing_subscriber::fmt()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_ansi(false)
                    .with_env_filter(filter)
                    .init();
            }
            Profile::Test => {
                // init_test_capture() installs the only subscriber in tests
            }
        }
    });
}
