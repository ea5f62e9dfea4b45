use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

/// Startup faults. These are fatal; nothing mid-conversation produces them.
#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Configuration(#[from] ConfigError),
    #[error("could not open event log `{path}`: {source}")]
    EventLog { path: PathBuf, source: std::io::Error },
}

impl ApplicationError {
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "config_validation",
            Self::EventLog { .. } => "event_log",
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Configuration(_) => 2,
            Self::EventLog { .. } => 3,
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "Configuration is invalid. Check the environment and supportbot.toml.",
            Self::EventLog { .. } => "The event log could not be opened. Check the log directory.",
        }
    }
}
