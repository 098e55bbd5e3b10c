//! authconf: locate and load auth configuration modules (library crate).
//!
//! Re-exports public modules for integration tests and external use.

pub mod alias;
pub mod config;
pub mod constants;
pub mod env;
pub mod error;
pub mod exit;
pub mod runtime;
pub mod settings;

pub use config::{GetConfigOptions, get_config, try_get_config};
pub use error::{ConfigError, ErrorKind};
pub use exit::ErrorMode;
pub use runtime::Toolchain;
