//! `tsconfig.json` reading.
//!
//! The file is JSONC: comments and trailing commas are stripped before it
//! is handed to `serde_json`. Only `compilerOptions.baseUrl` and
//! `compilerOptions.paths` are read; `extends` is not followed.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;

use super::{AliasMap, strip_wildcard};

/// Errors reading a project's `tsconfig.json`.
#[derive(Error, Debug)]
pub enum TsconfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tsconfig {
    #[serde(default)]
    pub compiler_options: Option<CompilerOptions>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerOptions {
    pub base_url: Option<String>,
    #[serde(default)]
    pub paths: Option<IndexMap<String, Vec<String>>>,
}

impl Tsconfig {
    pub async fn read(path: &Path) -> Result<Self, TsconfigError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| TsconfigError::Read {
                path: path.to_path_buf(),
                source: e,
            })?;
        Self::parse(&content).map_err(|e| TsconfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn parse(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(&strip_trailing_commas(&strip_comments(content)))
    }

    /// Flatten `paths` into an [`AliasMap`] rooted at `cwd`.
    ///
    /// When one alias lists several targets the last one is kept.
    pub fn aliases(&self, cwd: &Path) -> AliasMap {
        let mut map = AliasMap::new();
        let Some(options) = &self.compiler_options else {
            return map;
        };
        let base_url = options.base_url.as_deref().unwrap_or(".");
        let root = cwd.join(base_url.trim_start_matches('/'));

        for (alias, targets) in options.paths.iter().flatten() {
            for target in targets {
                let target = strip_wildcard(target).trim_start_matches('/');
                let resolved = path_clean::clean(root.join(target));
                map.insert(strip_wildcard(alias), resolved.display().to_string());
            }
        }
        map
    }
}

/// Remove `//` and `/* */` comments outside of string literals.
fn strip_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                out.push(c);
                copy_string(&mut chars, &mut out);
            }
            '/' if chars.peek() == Some(&'/') => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for c in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
            }
            _ => out.push(c),
        }
    }
    out
}

/// Remove commas that directly precede `}` or `]` (ignoring whitespace).
fn strip_trailing_commas(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                out.push(c);
                copy_string(&mut chars, &mut out);
            }
            ',' => {
                let rest: String = chars.clone().take_while(|c| c.is_whitespace()).collect();
                let next = chars.clone().find(|c| !c.is_whitespace());
                if !matches!(next, Some('}') | Some(']')) {
                    out.push(',');
                }
                out.push_str(&rest);
                for _ in 0..rest.chars().count() {
                    chars.next();
                }
            }
            _ => out.push(c),
        }
    }
    out
}

/// Copy the rest of a string literal (the opening quote is already written).
fn copy_string(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, out: &mut String) {
    while let Some(c) = chars.next() {
        out.push(c);
        match c {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            }
            '"' => break,
            _ => {}
        }
    }
}
