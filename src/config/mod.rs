//! Auth config discovery and loading.
//!
//! [`get_config`] is the entry point: resolve which file to load, evaluate
//! it with the project's tooling, and return the exported options. Failures
//! are raised or reported-and-exited according to the caller's mode.

pub mod candidates;
pub mod loader;
pub mod resolve;

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::ConfigError;
use crate::exit::ErrorMode;
use crate::runtime::Toolchain;

pub use candidates::{CANDIDATE_PATHS, CandidatePaths};
pub use loader::{
    AuthExport, ConfigModuleLoader, LoadedConfig, Strategy, load_config, select_loader,
};
pub use resolve::resolve_config_path;

/// Inputs of a single `get_config` call.
#[derive(Debug, Clone, Default)]
pub struct GetConfigOptions {
    /// Project directory discovery and loading are relative to.
    pub cwd: PathBuf,
    /// Skip discovery and load this file.
    pub config_path: Option<PathBuf>,
    /// Return errors instead of logging them and exiting the process.
    pub should_throw_on_error: bool,
}

impl GetConfigOptions {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            ..Self::default()
        }
    }

    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn throw_on_error(mut self, throw: bool) -> Self {
        self.should_throw_on_error = throw;
        self
    }

    pub fn mode(&self) -> ErrorMode {
        ErrorMode::from_strict(self.should_throw_on_error)
    }
}

/// Resolve and load the auth config, returning its options.
///
/// Without `should_throw_on_error` any failure other than a malformed
/// `tsconfig.json` is logged and the process exits with status 1.
pub async fn get_config(
    options: &GetConfigOptions,
    toolchain: &Toolchain,
) -> Result<Option<Value>, ConfigError> {
    options.mode().settle(try_get_config(options, toolchain).await)
}

/// [`get_config`] without the exit policy applied.
pub async fn try_get_config(
    options: &GetConfigOptions,
    toolchain: &Toolchain,
) -> Result<Option<Value>, ConfigError> {
    let resolved = locate(&options.cwd, options.config_path.as_deref()).await?;
    tracing::debug!(path = %resolved.display(), "resolved auth config");
    load_config(&options.cwd, &resolved, toolchain).await
}

/// Resolve the config path against the built-in candidate table.
pub async fn locate(cwd: &Path, explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    resolve_config_path(cwd, explicit, &CANDIDATE_PATHS).await
}
