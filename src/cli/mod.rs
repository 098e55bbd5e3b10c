//! CLI command definitions and terminal rendering.
//!
//! Uses clap derive macros for ergonomic argument definitions.

pub mod args;

use std::path::Path;

use colored::Colorize;

use authconf::alias::AliasMap;
use authconf::config::CandidatePaths;

/// Longest target shown before truncation (inline `data:` modules get long).
const MAX_TARGET_WIDTH: usize = 72;

/// Render the alias map, one `alias  target` pair per line.
pub fn render_aliases(aliases: &AliasMap) -> Vec<String> {
    if aliases.is_empty() {
        return vec!["No path aliases found.".to_string()];
    }
    let width = aliases.iter().map(|(alias, _)| alias.len()).max().unwrap_or(0);
    aliases
        .iter()
        .map(|(alias, target)| {
            let shown = if alias.is_empty() { "*" } else { alias };
            format!(
                "  {}  {}",
                format!("{shown:<width$}").bold(),
                truncate(target).dimmed()
            )
        })
        .collect()
}

/// Render the candidate table, marking entries that exist under `cwd`.
pub fn render_candidates(candidates: &CandidatePaths, cwd: &Path) -> Vec<String> {
    candidates
        .iter()
        .enumerate()
        .map(|(i, candidate)| {
            let index = format!("{:>3}", i + 1);
            if cwd.join(candidate).exists() {
                format!("  {} {} {}", index.dimmed(), "✔".green().bold(), candidate.bold())
            } else {
                format!("  {}   {}", index.dimmed(), candidate)
            }
        })
        .collect()
}

fn truncate(target: &str) -> String {
    if target.chars().count() <= MAX_TARGET_WIDTH {
        return target.to_string();
    }
    let head: String = target.chars().take(MAX_TARGET_WIDTH - 1).collect();
    format!("{head}…")
}
