//! Errors surfaced while resolving or loading an auth config.

use std::path::PathBuf;

use thiserror::Error;

use crate::alias::TsconfigError;
use crate::constants::{CONFIG_FLAG, DEFAULT_CONFIG_FILENAME, LOG_PREFIX};
use crate::runtime::LoadError;

/// Coarse classification of a [`ConfigError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum ErrorKind {
    ConfigNotFound,
    ConfigUnreadable,
    ServerOnlyRestricted,
    SettingsParseError,
    UnknownLoadError,
}

/// Every way `get_config` can fail.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An explicit `--config` path that does not exist.
    #[error(
        "Couldn't read your auth config in {}. Make sure to default export your auth instance or to export as a variable named auth.",
        .0.display()
    )]
    MissingExplicitPath(PathBuf),

    /// Nothing in the candidate table exists.
    #[error(
        "Couldn't find a configuration file. Add a `{}` file to your project or pass the path to the configuration file using the `{}` flag.",
        DEFAULT_CONFIG_FILENAME,
        CONFIG_FLAG
    )]
    NotFound,

    /// The module loaded but exports neither `default` nor `auth`.
    #[error(
        "Couldn't read your auth config in {}. Make sure to default export your auth instance or to export as a variable named auth.",
        .path.display()
    )]
    Unreadable { path: PathBuf },

    #[error(
        "Please remove import 'server-only' from your auth config file temporarily. The CLI cannot resolve the configuration with it included. You can re-add it after running the CLI."
    )]
    ServerOnly {
        path: PathBuf,
        #[source]
        source: LoadError,
    },

    #[error("Error parsing tsconfig.json: {0}")]
    Tsconfig(#[from] TsconfigError),

    #[error(transparent)]
    Load(#[from] LoadError),
}

impl ConfigError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConfigError::MissingExplicitPath(_) | ConfigError::NotFound => ErrorKind::ConfigNotFound,
            ConfigError::Unreadable { .. } => ErrorKind::ConfigUnreadable,
            ConfigError::ServerOnly { .. } => ErrorKind::ServerOnlyRestricted,
            ConfigError::Tsconfig(_) => ErrorKind::SettingsParseError,
            ConfigError::Load(_) => ErrorKind::UnknownLoadError,
        }
    }

    /// A broken `tsconfig.json` is raised even when the caller asked to exit.
    pub fn always_raised(&self) -> bool {
        self.kind() == ErrorKind::SettingsParseError
    }

    /// Line written to the logging sink when the process is about to exit.
    pub fn log_line(&self) -> String {
        match self {
            ConfigError::NotFound | ConfigError::ServerOnly { .. } => self.to_string(),
            ConfigError::Load(_) => format!("{LOG_PREFIX} Couldn't read your auth config."),
            _ => format!("{LOG_PREFIX} {self}"),
        }
    }

    /// Extra context logged next to [`log_line`](Self::log_line), if any.
    pub fn detail(&self) -> Option<String> {
        match self {
            ConfigError::Load(err) => Some(err.detail()),
            _ => None,
        }
    }
}
