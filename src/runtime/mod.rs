//! JavaScript runtime collaborators used to evaluate a config module.
//!
//! The loader never executes JavaScript itself. It talks to three
//! capabilities behind traits: a bundler config probe, a bundler-aware
//! import, and a general transpiling loader. [`Toolchain::node`] wires the
//! Node.js-backed implementations; tests substitute fakes.

pub mod jiti;
pub mod node;
pub mod vite;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::alias::{AliasInjector, AliasMap, SvelteKitEnvModules};
use crate::config::LoadedConfig;
use crate::constants::{SERVER_ONLY_MARKER, SUPPORTED_EXTENSIONS};
use crate::env::Env;
use crate::settings::Settings;

pub use jiti::JitiLoader;
pub use node::NodeRunner;
pub use vite::ViteLoader;

/// A failure raised while probing for or evaluating a module.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct LoadError {
    pub message: String,
    pub stack: Option<String>,
}

impl LoadError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stack: None,
        }
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    /// Whether the module refused to load outside a server context.
    pub fn is_server_only(&self) -> bool {
        self.message.contains(SERVER_ONLY_MARKER)
    }

    /// The stack when the runtime provided one, otherwise the message.
    pub fn detail(&self) -> String {
        self.stack.clone().unwrap_or_else(|| self.message.clone())
    }
}

/// Handle to a bundler configuration found for a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundlerConfig {
    pub root: PathBuf,
    pub config_file: Option<PathBuf>,
}

/// A transpiler preset and its options.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preset {
    pub name: String,
    pub options: serde_json::Value,
}

/// Everything the transpiling loader needs besides the module path.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranspileOptions {
    pub root: PathBuf,
    pub alias: AliasMap,
    pub presets: Vec<Preset>,
    pub extensions: Vec<String>,
}

impl TranspileOptions {
    /// TypeScript + JSX presets over every supported extension.
    pub fn new(root: &Path, alias: AliasMap) -> Self {
        Self {
            root: root.to_path_buf(),
            alias,
            presets: vec![
                Preset {
                    name: "@babel/preset-typescript".to_string(),
                    options: json!({ "isTSX": true, "allExtensions": true }),
                },
                Preset {
                    name: "@babel/preset-react".to_string(),
                    options: json!({ "runtime": "automatic" }),
                },
            ],
            extensions: SUPPORTED_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

/// Detects a bundler configuration for a project directory.
#[async_trait]
pub trait BundlerProbe: Send + Sync {
    async fn probe(&self, cwd: &Path) -> Result<Option<BundlerConfig>, LoadError>;
}

/// Imports a module through the project's own bundler pipeline.
#[async_trait]
pub trait BundlerImport: Send + Sync {
    async fn import(&self, path: &Path, config: &BundlerConfig) -> Result<LoadedConfig, LoadError>;
}

/// Transpiles and evaluates a module on the fly.
#[async_trait]
pub trait TranspileLoader: Send + Sync {
    async fn load(&self, path: &Path, options: &TranspileOptions) -> Result<LoadedConfig, LoadError>;
}

/// Probe that never finds a bundler, forcing the transpiling loader.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBundler;

#[async_trait]
impl BundlerProbe for NoBundler {
    async fn probe(&self, _cwd: &Path) -> Result<Option<BundlerConfig>, LoadError> {
        Ok(None)
    }
}

/// The set of collaborators a `get_config` call runs against.
#[derive(Clone)]
pub struct Toolchain {
    pub probe: Arc<dyn BundlerProbe>,
    pub bundler: Arc<dyn BundlerImport>,
    pub transpiler: Arc<dyn TranspileLoader>,
    pub injectors: Vec<Arc<dyn AliasInjector>>,
}

impl Toolchain {
    /// Node.js-backed collaborators configured from `settings`.
    pub fn node(settings: &Settings, env: &Env) -> Self {
        let runner = NodeRunner::new(&settings.runtime.node, settings.runtime.timeout());
        let vite = Arc::new(ViteLoader::new(runner.clone()));

        let probe: Arc<dyn BundlerProbe> = if settings.runtime.bundler {
            vite.clone()
        } else {
            Arc::new(NoBundler)
        };

        let mut injectors: Vec<Arc<dyn AliasInjector>> = Vec::new();
        if settings.sveltekit.enabled {
            injectors.push(Arc::new(SvelteKitEnvModules::new(
                env.clone(),
                &settings.sveltekit.public_prefix,
                &settings.sveltekit.private_prefix,
            )));
        }

        Self {
            probe,
            bundler: vite,
            transpiler: Arc::new(JitiLoader::new(runner)),
            injectors,
        }
    }
}

impl std::fmt::Debug for Toolchain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Toolchain")
            .field("injectors", &self.injectors.len())
            .finish_non_exhaustive()
    }
}
