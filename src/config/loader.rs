//! Evaluates a resolved config file and extracts its options.
//!
//! Two strategies, chosen per call:
//! 1. Bundler: when the project has a Vite config, import through Vite so
//!    its plugins, conditions and aliases apply.
//! 2. Transpile: otherwise evaluate with jiti using the tsconfig aliases.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::alias::resolve_aliases;
use crate::error::ConfigError;
use crate::runtime::{
    BundlerConfig, BundlerImport, LoadError, Toolchain, TranspileLoader, TranspileOptions,
};

/// The two export shapes a config module may use.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadedConfig {
    #[serde(default)]
    pub auth: Option<AuthExport>,
    #[serde(default)]
    pub default: Option<AuthExport>,
}

/// An exported auth instance; only its options are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthExport {
    #[serde(default)]
    pub options: Option<Value>,
}

impl LoadedConfig {
    /// `true` when either `auth` or `default` is exported.
    pub fn has_export(&self) -> bool {
        self.auth.is_some() || self.default.is_some()
    }

    /// `auth.options`, then `default.options`.
    pub fn into_options(self) -> Option<Value> {
        let from_auth = self.auth.and_then(|a| a.options);
        from_auth.or_else(|| self.default.and_then(|d| d.options))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Strategy {
    Bundler,
    Transpile,
}

/// Loads one config module with a fixed strategy.
#[async_trait]
pub trait ConfigModuleLoader: Send + Sync {
    fn strategy(&self) -> Strategy;

    async fn load(&self, path: &Path) -> Result<LoadedConfig, LoadError>;
}

pub struct BundlerStrategy {
    importer: Arc<dyn BundlerImport>,
    config: BundlerConfig,
}

#[async_trait]
impl ConfigModuleLoader for BundlerStrategy {
    fn strategy(&self) -> Strategy {
        Strategy::Bundler
    }

    async fn load(&self, path: &Path) -> Result<LoadedConfig, LoadError> {
        self.importer.import(path, &self.config).await
    }
}

pub struct TranspileStrategy {
    loader: Arc<dyn TranspileLoader>,
    options: TranspileOptions,
}

#[async_trait]
impl ConfigModuleLoader for TranspileStrategy {
    fn strategy(&self) -> Strategy {
        Strategy::Transpile
    }

    async fn load(&self, path: &Path) -> Result<LoadedConfig, LoadError> {
        self.loader.load(path, &self.options).await
    }
}

/// Pick the strategy for `cwd`.
///
/// Aliases are only resolved for the transpile strategy; the bundler
/// brings its own.
pub async fn select_loader(
    cwd: &Path,
    toolchain: &Toolchain,
) -> Result<Box<dyn ConfigModuleLoader>, ConfigError> {
    let probed = toolchain
        .probe
        .probe(cwd)
        .await
        .map_err(|e| translate(e, cwd))?;

    if let Some(config) = probed {
        tracing::info!("Vite config detected. Using Vite config to load config.");
        return Ok(Box::new(BundlerStrategy {
            importer: toolchain.bundler.clone(),
            config,
        }));
    }

    let alias = resolve_aliases(cwd, &toolchain.injectors).await?;
    Ok(Box::new(TranspileStrategy {
        loader: toolchain.transpiler.clone(),
        options: TranspileOptions::new(cwd, alias),
    }))
}

/// Load the module at `resolved` and return its normalized options.
///
/// A module without an `auth` or `default` export is unreadable. A module
/// that exports one of them without options yields `None`.
pub async fn load_config(
    cwd: &Path,
    resolved: &Path,
    toolchain: &Toolchain,
) -> Result<Option<Value>, ConfigError> {
    let loader = select_loader(cwd, toolchain).await?;
    let path = cwd.join(resolved);
    tracing::debug!(strategy = %loader.strategy(), path = %path.display(), "loading config module");

    let loaded = loader
        .load(&path)
        .await
        .map_err(|e| translate(e, resolved))?;

    if !loaded.has_export() {
        return Err(ConfigError::Unreadable {
            path: resolved.to_path_buf(),
        });
    }
    Ok(loaded.into_options())
}

/// Turn the `server-only` runtime error into actionable guidance.
fn translate(err: LoadError, path: &Path) -> ConfigError {
    if err.is_server_only() {
        ConfigError::ServerOnly {
            path: PathBuf::from(path),
            source: err,
        }
    } else {
        ConfigError::Load(err)
    }
}
