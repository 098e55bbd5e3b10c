//! Vite-backed bundler probe and import.

use std::path::Path;

use async_trait::async_trait;
use serde::Serialize;

use super::{BundlerConfig, BundlerImport, BundlerProbe, LoadError, NodeRunner};
use crate::config::LoadedConfig;

const SCRIPT: &str = include_str!("scripts/vite.mjs");

#[derive(Debug, Serialize)]
#[serde(tag = "op", rename_all = "lowercase")]
enum ViteRequest<'a> {
    Probe {
        root: &'a Path,
    },
    Import {
        root: &'a Path,
        #[serde(rename = "configFile")]
        config_file: Option<&'a Path>,
        path: &'a Path,
    },
}

/// Resolves `vite` from the project and uses its own config loader.
#[derive(Debug, Clone)]
pub struct ViteLoader {
    runner: NodeRunner,
}

impl ViteLoader {
    pub fn new(runner: NodeRunner) -> Self {
        Self { runner }
    }
}

#[async_trait]
impl BundlerProbe for ViteLoader {
    async fn probe(&self, cwd: &Path) -> Result<Option<BundlerConfig>, LoadError> {
        self.runner
            .run(SCRIPT, cwd, &ViteRequest::Probe { root: cwd })
            .await
    }
}

#[async_trait]
impl BundlerImport for ViteLoader {
    async fn import(&self, path: &Path, config: &BundlerConfig) -> Result<LoadedConfig, LoadError> {
        let request = ViteRequest::Import {
            root: &config.root,
            config_file: config.config_file.as_deref(),
            path,
        };
        self.runner.run(SCRIPT, &config.root, &request).await
    }
}
