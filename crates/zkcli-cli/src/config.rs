//! Settings resolution
//!
//! An optional TOML file supplies defaults; command-line flags override it.
//! There is no built-in store address: a backend must come from `--servers`,
//! `--store`, or the file.
//!
//! ```toml
//! format = "json"
//! log_format = "json"
//!
//! [backend]
//! kind = "zookeeper"
//! servers = ["zk1:2181", "zk2:2181"]
//!
//! [retry]
//! max_attempts = 10
//! initial_backoff_ms = 5
//! max_backoff_ms = 200
//! ```

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::Deserialize;
use zkcli_core::logging_facility::{Profile, Verbosity};
use zkcli_core::{ExError, ExErrorKind, RetryPolicy};
use zkcli_store::BackendConfig;

use crate::output::OutputFormat;

/// Shape of the diagnostic log written to stderr
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Human,
    Json,
}

impl LogFormat {
    pub fn profile(self) -> Profile {
        match self {
            LogFormat::Human => Profile::Development,
            LogFormat::Json => Profile::Production,
        }
    }
}

/// Contents of a `--config` file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub backend: Option<BackendConfig>,
    pub format: Option<OutputFormat>,
    pub log_format: Option<LogFormat>,
    pub retry: Option<RetryPolicy>,
}

impl FileConfig {
    /// Load and parse a TOML config file
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be read, `Serialization` if it is not valid
    /// config TOML.
    pub fn load(path: &Path) -> Result<Self, ExError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ExError::new(ExErrorKind::Io)
                .with_op("load_config")
                .with_message(format!("{}: {}", path.display(), e))
        })?;
        toml::from_str(&text).map_err(|e| {
            ExError::new(ExErrorKind::Serialization)
                .with_op("load_config")
                .with_message(format!("{}: {}", path.display(), e))
        })
    }
}

/// Global flags that feed settings resolution
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub servers: Option<String>,
    pub store: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub log_format: Option<LogFormat>,
    pub max_retries: Option<u32>,
    pub verbose: bool,
    pub debug: bool,
}

/// Effective settings for one invocation
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub backend: BackendConfig,
    pub format: OutputFormat,
    pub retry: RetryPolicy,
    pub verbosity: Verbosity,
    pub log_profile: Profile,
}

impl Settings {
    /// Merge flag overrides over file defaults
    ///
    /// # Errors
    ///
    /// `InvalidInput` when neither flags nor file name a backend, or when
    /// `--servers` lists no server.
    pub fn resolve(file: FileConfig, flags: &Overrides) -> Result<Self, ExError> {
        let backend = if let Some(servers) = &flags.servers {
            let backend = BackendConfig::zookeeper_from_list(servers);
            if matches!(&backend, BackendConfig::Zookeeper { servers, .. } if servers.is_empty()) {
                return Err(ExError::new(ExErrorKind::InvalidInput)
                    .with_op("resolve_settings")
                    .with_message("Expected comma delimited list of servers via --servers"));
            }
            backend
        } else if let Some(store) = &flags.store {
            BackendConfig::Sqlite {
                path: store.clone(),
            }
        } else {
            file.backend.ok_or_else(|| {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_op("resolve_settings")
                    .with_message("Expected a store via --servers, --store, or --config")
            })?
        };

        let mut retry = file.retry.unwrap_or_default();
        if let Some(retries) = flags.max_retries {
            retry = retry.with_max_attempts(retries.saturating_add(1));
        }

        let verbosity = if flags.debug {
            Verbosity::Debug
        } else if flags.verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Quiet
        };

        Ok(Self {
            backend,
            format: flags.format.or(file.format).unwrap_or_default(),
            retry,
            verbosity,
            log_profile: flags
                .log_format
                .or(file.log_format)
                .unwrap_or_default()
                .profile(),
        })
    }
}
