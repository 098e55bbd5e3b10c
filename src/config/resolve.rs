//! Picks the config file to load.

use std::path::{Path, PathBuf};

use super::candidates::CandidatePaths;
use crate::error::ConfigError;

/// Resolve the config path for `cwd`.
///
/// An explicit path must exist (relative paths are checked against `cwd`).
/// It is returned unchanged when relative and made relative to `cwd` when
/// absolute. Without one, the first existing candidate is returned joined
/// with `cwd`.
pub async fn resolve_config_path(
    cwd: &Path,
    explicit: Option<&Path>,
    candidates: &CandidatePaths,
) -> Result<PathBuf, ConfigError> {
    if let Some(explicit) = explicit {
        if !exists(&cwd.join(explicit)).await {
            return Err(ConfigError::MissingExplicitPath(explicit.to_path_buf()));
        }
        if explicit.is_absolute() {
            return Ok(pathdiff::diff_paths(explicit, cwd).unwrap_or_else(|| explicit.to_path_buf()));
        }
        return Ok(explicit.to_path_buf());
    }

    for candidate in candidates.iter() {
        let path = cwd.join(candidate);
        tracing::debug!(path = %path.display(), "checking candidate");
        if exists(&path).await {
            return Ok(path);
        }
    }

    Err(ConfigError::NotFound)
}

async fn exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}
