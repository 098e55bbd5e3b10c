//! App-wide constants.
//!
//! Centralises the tool name, file names, environment variable names,
//! and user-facing messages so a rename only requires changing this file.

/// Display name of the tool (lowercase).
pub const APP_NAME: &str = "authconf";

/// Prefix attached to messages reported through the logging sink.
pub const LOG_PREFIX: &str = "[#authconf]:";

/// Tool settings filename looked up in the project root.
pub const SETTINGS_FILENAME: &str = ".authconf.toml";

/// Directory name under `~/.config/` for global settings.
pub const SETTINGS_DIR: &str = "authconf";

/// Compiler settings file read for path aliases.
pub const TSCONFIG_FILENAME: &str = "tsconfig.json";

/// Filename suggested to users when nothing was found.
pub const DEFAULT_CONFIG_FILENAME: &str = "auth.ts";

/// CLI flag that overrides discovery.
pub const CONFIG_FLAG: &str = "--config";

/// Substring of the runtime error raised when a `server-only` module is imported.
pub const SERVER_ONLY_MARKER: &str = "This module cannot be imported from a Client Component module";

/// Extensions the transpiling loader resolves, in order.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[".ts", ".tsx", ".js", ".jsx"];

// ── Environment variable names ──────────────────────────────────────

pub const ENV_NODE: &str = "AUTHCONF_NODE";
pub const ENV_TIMEOUT: &str = "AUTHCONF_TIMEOUT";
pub const ENV_BUNDLER: &str = "AUTHCONF_BUNDLER";
pub const ENV_SVELTEKIT: &str = "AUTHCONF_SVELTEKIT";
pub const ENV_LOG: &str = "AUTHCONF_LOG";

/// Carries the JSON request from Rust into the embedded Node scripts.
pub const ENV_LOADER_REQUEST: &str = "AUTHCONF_LOADER_REQUEST";
