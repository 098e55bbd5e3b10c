//! jiti-backed transpiling loader.
//!
//! jiti is resolved from the project, configured with the alias map, the
//! supported extensions and whichever Babel presets the project has installed.

use std::path::Path;

use async_trait::async_trait;
use serde::Serialize;

use super::{LoadError, NodeRunner, TranspileLoader, TranspileOptions};
use crate::config::LoadedConfig;

const SCRIPT: &str = include_str!("scripts/jiti.mjs");

#[derive(Debug, Serialize)]
struct JitiRequest<'a> {
    path: &'a Path,
    #[serde(flatten)]
    options: &'a TranspileOptions,
}

#[derive(Debug, Clone)]
pub struct JitiLoader {
    runner: NodeRunner,
}

impl JitiLoader {
    pub fn new(runner: NodeRunner) -> Self {
        Self { runner }
    }
}

#[async_trait]
impl TranspileLoader for JitiLoader {
    async fn load(&self, path: &Path, options: &TranspileOptions) -> Result<LoadedConfig, LoadError> {
        let request = JitiRequest { path, options };
        self.runner.run(SCRIPT, &options.root, &request).await
    }
}
