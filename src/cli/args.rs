//! Clap argument types and the CLI settings layer.

use clap::Parser;
use std::path::PathBuf;

use authconf::constants::APP_NAME;
use authconf::settings::Settings;

/// Locate and load auth configuration modules.
#[derive(Parser, Debug)]
#[command(name = APP_NAME, version, about)]
pub struct Cli {
    /// Project directory (default: current directory).
    #[arg(long, global = true, default_value = ".")]
    pub cwd: PathBuf,

    /// Path to the auth config file; skips discovery.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Return errors instead of logging them and exiting.
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    /// Node.js binary used to evaluate the config.
    #[arg(long, global = true)]
    pub node: Option<String>,

    /// Give up on a module load after this many seconds.
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Never use the project's Vite config; always transpile with jiti.
    #[arg(long, global = true, default_value_t = false)]
    pub no_bundler: bool,

    /// Enable debug logging.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(clap::Subcommand, Debug, Clone)]
pub enum Command {
    /// Load the config and print its options as JSON (default).
    Show(ShowArgs),

    /// Print the path of the config file that would be loaded.
    Locate,

    /// Print the module path aliases used by the transpiling loader.
    Aliases,

    /// List the conventional config locations in discovery order.
    Candidates,
}

/// Arguments for the `show` subcommand.
#[derive(Parser, Debug, Clone, Default)]
pub struct ShowArgs {
    /// Print JSON on a single line.
    #[arg(long, default_value_t = false)]
    pub compact: bool,
}

impl Cli {
    /// The command to run, defaulting to `show`.
    pub fn command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or_else(|| Command::Show(ShowArgs::default()))
    }

    /// Apply flag overrides, the highest-priority settings layer.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(node) = &self.node {
            settings.runtime.node = node.clone();
        }
        if let Some(secs) = self.timeout {
            settings.runtime.timeout_secs = Some(secs);
        }
        if self.no_bundler {
            settings.runtime.bundler = false;
        }
        if self.verbose {
            settings.log.level = "debug".to_string();
        }
    }
}
