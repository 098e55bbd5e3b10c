//! Tool settings and their layering.
//!
//! Priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables
//! 3. `.authconf.toml` in the project root
//! 4. `~/.config/authconf/config.toml` (global defaults)
//! 5. Built-in defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::constants::{
    ENV_BUNDLER, ENV_LOG, ENV_NODE, ENV_SVELTEKIT, ENV_TIMEOUT, SETTINGS_DIR, SETTINGS_FILENAME,
};
use crate::env::Env;

/// Errors during settings loading.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse settings file {path}: {source}")]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Top-level settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub runtime: RuntimeSettings,
    pub sveltekit: SvelteKitSettings,
    pub log: LogSettings,
}

/// How JavaScript modules get evaluated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeSettings {
    /// Node.js binary name or path.
    pub node: String,
    /// Per-load timeout; unset waits forever.
    pub timeout_secs: Option<u64>,
    /// Probe for a Vite config before falling back to jiti.
    pub bundler: bool,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            node: "node".to_string(),
            timeout_secs: None,
            bundler: true,
        }
    }
}

impl RuntimeSettings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Synthetic `$env/*` modules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SvelteKitSettings {
    pub enabled: bool,
    pub public_prefix: String,
    pub private_prefix: String,
}

impl Default for SvelteKitSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            public_prefix: "PUBLIC_".to_string(),
            private_prefix: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// `tracing` filter directive.
    pub level: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Load settings with proper layering.
    ///
    /// Reads the global file, then the project file, then applies
    /// environment variable overrides.
    pub fn load(project_root: Option<&Path>, env: &Env) -> Result<Self, SettingsError> {
        let mut settings = Settings::default();

        if let Some(global_path) = Self::global_settings_path() {
            if global_path.exists() {
                let global = Self::load_file(&global_path)?;
                settings.merge(global);
            }
        }

        if let Some(root) = project_root {
            let local_path = root.join(SETTINGS_FILENAME);
            if local_path.exists() {
                let local = Self::load_file(&local_path)?;
                settings.merge(local);
            }
        }

        settings.apply_env_vars(env);

        Ok(settings)
    }

    /// Load settings from a specific file.
    fn load_file(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|e| SettingsError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| SettingsError::ParseFile {
            path: path.to_path_buf(),
            source: e,
        })
    }

    fn global_settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(SETTINGS_DIR).join("config.toml"))
    }

    /// Merge another layer into this one (non-default values in `other` win).
    fn merge(&mut self, other: Settings) {
        let runtime = RuntimeSettings::default();
        if other.runtime.node != runtime.node {
            self.runtime.node = other.runtime.node;
        }
        if other.runtime.timeout_secs.is_some() {
            self.runtime.timeout_secs = other.runtime.timeout_secs;
        }
        // disabled overrides enabled
        if !other.runtime.bundler {
            self.runtime.bundler = false;
        }

        let sveltekit = SvelteKitSettings::default();
        if !other.sveltekit.enabled {
            self.sveltekit.enabled = false;
        }
        if other.sveltekit.public_prefix != sveltekit.public_prefix {
            self.sveltekit.public_prefix = other.sveltekit.public_prefix;
        }
        if other.sveltekit.private_prefix != sveltekit.private_prefix {
            self.sveltekit.private_prefix = other.sveltekit.private_prefix;
        }

        if other.log.level != LogSettings::default().level {
            self.log.level = other.log.level;
        }
    }

    /// Apply environment variable overrides.
    fn apply_env_vars(&mut self, env: &Env) {
        if let Ok(val) = env.var(ENV_NODE) {
            self.runtime.node = val;
        }
        if let Ok(val) = env.var(ENV_TIMEOUT) {
            match val.parse::<u64>() {
                Ok(secs) => self.runtime.timeout_secs = Some(secs),
                Err(_) => eprintln!("Warning: ignoring invalid {ENV_TIMEOUT} value: {val}"),
            }
        }
        if let Ok(val) = env.var(ENV_BUNDLER) {
            match parse_bool(&val) {
                Some(enabled) => self.runtime.bundler = enabled,
                None => eprintln!("Warning: ignoring invalid {ENV_BUNDLER} value: {val}"),
            }
        }
        if let Ok(val) = env.var(ENV_SVELTEKIT) {
            match parse_bool(&val) {
                Some(enabled) => self.sveltekit.enabled = enabled,
                None => eprintln!("Warning: ignoring invalid {ENV_SVELTEKIT} value: {val}"),
            }
        }
        if let Ok(val) = env.var(ENV_LOG) {
            self.log.level = val;
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "false" | "0" | "no" | "off" => Some(false),
        "true" | "1" | "yes" | "on" => Some(true),
        _ => None,
    }
}
