//! Conventional locations of the auth config, in discovery order.

use std::sync::LazyLock;

const FILE_NAMES: &[&str] = &[
    "auth.ts",
    "auth.tsx",
    "auth.js",
    "auth.jsx",
    "auth.server.js",
    "auth.server.ts",
];

const DIRECTORIES: &[&str] = &["", "lib/server/", "server/", "lib/", "utils/"];

const ROOTS: &[&str] = &["", "src/", "app/"];

/// The table every discovery call reads from.
pub static CANDIDATE_PATHS: LazyLock<CandidatePaths> = LazyLock::new(CandidatePaths::build);

/// Relative paths probed for a config file; the first one on disk wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePaths(Vec<String>);

impl CandidatePaths {
    /// File names × directories, then that whole list × roots.
    fn build() -> Self {
        let in_directories: Vec<String> = DIRECTORIES
            .iter()
            .flat_map(|dir| FILE_NAMES.iter().map(move |name| format!("{dir}{name}")))
            .collect();

        let paths = ROOTS
            .iter()
            .flat_map(|root| in_directories.iter().map(move |path| format!("{root}{path}")))
            .collect();

        Self(paths)
    }

    /// A table with explicit entries, mostly for tests and embedding.
    pub fn from_paths(paths: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self(paths.into_iter().map(Into::into).collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
