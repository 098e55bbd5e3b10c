//! authconf: locate and load auth configuration modules.
//!
//! Entry point and error handling boundary. Uses `anyhow` for
//! ergonomic error propagation and user-facing messages.

mod cli;

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::Value;

use authconf::alias::resolve_aliases;
use authconf::config::{self, CANDIDATE_PATHS, GetConfigOptions};
use authconf::env::Env;
use authconf::error::ConfigError;
use authconf::exit::{ErrorMode, EXIT_FAILURE};
use authconf::runtime::Toolchain;
use authconf::settings::Settings;

use cli::args::{Cli, Command, ShowArgs};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {err:#}");
        process::exit(EXIT_FAILURE);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let env = Env::real();
    let cwd = project_dir(&cli.cwd)?;

    let mut settings = Settings::load(Some(&cwd), &env).context("failed to load settings")?;
    cli.apply(&mut settings);
    init_logging(&settings);

    let toolchain = Toolchain::node(&settings, &env);
    let mode = ErrorMode::from_strict(cli.strict);

    match cli.command() {
        Command::Show(args) => run_show(&cli, cwd, &toolchain, args).await,
        Command::Locate => run_locate(&cli, &cwd, mode).await,
        Command::Aliases => run_aliases(&cwd, &toolchain, mode).await,
        Command::Candidates => run_candidates(&cwd),
    }
}

/// Load the config and print its options.
async fn run_show(cli: &Cli, cwd: PathBuf, toolchain: &Toolchain, args: ShowArgs) -> Result<()> {
    let options = GetConfigOptions {
        cwd,
        config_path: cli.config.clone(),
        should_throw_on_error: cli.strict,
    };
    let value = config::get_config(&options, toolchain)
        .await?
        .unwrap_or(Value::Null);

    let rendered = if args.compact {
        serde_json::to_string(&value)?
    } else {
        serde_json::to_string_pretty(&value)?
    };
    println!("{rendered}");
    Ok(())
}

/// Print the config path discovery settles on.
async fn run_locate(cli: &Cli, cwd: &Path, mode: ErrorMode) -> Result<()> {
    let path = mode.settle(config::locate(cwd, cli.config.as_deref()).await)?;
    println!("{}", path.display());
    Ok(())
}

/// Print the alias map the transpiling loader would use.
async fn run_aliases(cwd: &Path, toolchain: &Toolchain, mode: ErrorMode) -> Result<()> {
    let aliases = mode.settle(
        resolve_aliases(cwd, &toolchain.injectors)
            .await
            .map_err(ConfigError::from),
    )?;
    for line in cli::render_aliases(&aliases) {
        println!("{line}");
    }
    Ok(())
}

/// List candidate locations in priority order.
fn run_candidates(cwd: &Path) -> Result<()> {
    for line in cli::render_candidates(&CANDIDATE_PATHS, cwd) {
        println!("{line}");
    }
    Ok(())
}

/// Absolute, lexically clean project directory.
fn project_dir(cwd: &Path) -> Result<PathBuf> {
    let current = std::env::current_dir().context("could not determine current directory")?;
    Ok(path_clean::clean(current.join(cwd)))
}

fn init_logging(settings: &Settings) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(&settings.log.level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}
