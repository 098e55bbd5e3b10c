//! Module path aliases read from the project's `tsconfig.json`.
//!
//! `compilerOptions.paths` patterns are flattened into a prefix map:
//! trailing `*` wildcards are dropped from both sides and each target is
//! made absolute against `<cwd>/<baseUrl>`. Framework-specific aliases are
//! merged in afterwards by [`AliasInjector`]s.

pub mod sveltekit;
pub mod tsconfig;

use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;

use crate::constants::TSCONFIG_FILENAME;

pub use sveltekit::SvelteKitEnvModules;
pub use tsconfig::{Tsconfig, TsconfigError};

/// Alias prefix → absolute target (or inline module URI), in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AliasMap(IndexMap<String, String>);

impl AliasMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an alias. A replaced alias keeps its original position.
    pub fn insert(&mut self, alias: impl Into<String>, target: impl Into<String>) {
        self.0.insert(alias.into(), target.into());
    }

    pub fn get(&self, alias: &str) -> Option<&str> {
        self.0.get(alias).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Expand `specifier` through the longest matching alias prefix.
    ///
    /// `@app/foo` with `@app/ → /p/src/app` yields `/p/src/app/foo`.
    pub fn resolve(&self, specifier: &str) -> Option<String> {
        let (alias, target) = self
            .0
            .iter()
            .filter(|(alias, _)| specifier.starts_with(alias.as_str()))
            .max_by_key(|(alias, _)| alias.len())?;

        let rest = specifier[alias.len()..].trim_start_matches('/');
        if rest.is_empty() {
            return Some(target.clone());
        }
        Some(Path::new(target).join(rest).display().to_string())
    }
}

/// Adds synthetic aliases after the tsconfig-derived map is built.
pub trait AliasInjector: Send + Sync {
    fn inject(&self, aliases: &mut AliasMap);
}

/// Build the alias map for `cwd`.
///
/// A missing `tsconfig.json` yields an empty map and skips the injectors.
/// A file that exists but cannot be read or parsed is an error.
pub async fn resolve_aliases(
    cwd: &Path,
    injectors: &[Arc<dyn AliasInjector>],
) -> Result<AliasMap, TsconfigError> {
    let path = cwd.join(TSCONFIG_FILENAME);
    if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
        tracing::debug!(path = %path.display(), "no tsconfig, skipping path aliases");
        return Ok(AliasMap::new());
    }

    let tsconfig = Tsconfig::read(&path).await?;
    let mut aliases = tsconfig.aliases(cwd);
    for injector in injectors {
        injector.inject(&mut aliases);
    }
    tracing::debug!(count = aliases.len(), "resolved path aliases");
    Ok(aliases)
}

/// Drop a single trailing `*` wildcard.
pub(crate) fn strip_wildcard(pattern: &str) -> &str {
    pattern.strip_suffix('*').unwrap_or(pattern)
}
