//! Runs embedded ES module scripts with Node.js.
//!
//! The request is passed as JSON in [`ENV_LOADER_REQUEST`]. The script
//! answers with a single line prefixed by [`RESPONSE_MARKER`] so anything the
//! user's config prints to stdout is ignored.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::LoadError;
use crate::constants::ENV_LOADER_REQUEST;

/// Prefix of the response line written by the scripts.
pub const RESPONSE_MARKER: &str = "__AUTHCONF__";

/// Helpers shared by every script (request parsing, module resolution, serialization).
const PRELUDE: &str = include_str!("scripts/prelude.mjs");

/// Spawns `node` for a single request.
#[derive(Debug, Clone)]
pub struct NodeRunner {
    binary: String,
    timeout: Option<Duration>,
}

#[derive(Debug, serde::Deserialize)]
struct Response {
    ok: bool,
    #[serde(default)]
    value: Value,
    message: Option<String>,
    stack: Option<String>,
}

impl NodeRunner {
    pub fn new(binary: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }

    /// Execute `script` in `cwd` and decode its response value.
    pub async fn run<T: DeserializeOwned>(
        &self,
        script: &str,
        cwd: &Path,
        request: &impl Serialize,
    ) -> Result<T, LoadError> {
        let request = serde_json::to_string(request)
            .map_err(|e| LoadError::new(format!("failed to encode loader request: {e}")))?;
        let source = format!("{PRELUDE}\n{script}");

        let mut command = tokio::process::Command::new(&self.binary);
        command
            .arg("--input-type=module")
            .arg("-e")
            .arg(&source)
            .env(ENV_LOADER_REQUEST, &request)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        tracing::debug!(node = %self.binary, cwd = %cwd.display(), "spawning node");

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, command.output())
                .await
                .map_err(|_| {
                    LoadError::new(format!("node timed out after {}s", limit.as_secs()))
                })?,
            None => command.output().await,
        }
        .map_err(|e| LoadError::new(format!("failed to execute {}: {e}", self.binary)))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            tracing::debug!(stderr = %stderr.trim(), "node stderr");
        }

        let Some(response) = parse_response(&stdout)? else {
            return Err(LoadError::new(format!(
                "node exited with status {} without a response: {}",
                output.status.code().unwrap_or(-1),
                stderr.trim()
            )));
        };

        if !response.ok {
            let mut err = LoadError::new(
                response
                    .message
                    .unwrap_or_else(|| "unknown error while loading module".to_string()),
            );
            err.stack = response.stack;
            return Err(err);
        }

        serde_json::from_value(response.value)
            .map_err(|e| LoadError::new(format!("unexpected loader response: {e}")))
    }
}

/// Find the last marked line in `stdout` and decode it.
fn parse_response(stdout: &str) -> Result<Option<Response>, LoadError> {
    let Some(line) = stdout
        .lines()
        .rev()
        .find_map(|line| line.strip_prefix(RESPONSE_MARKER))
    else {
        return Ok(None);
    };
    serde_json::from_str(line)
        .map(Some)
        .map_err(|e| LoadError::new(format!("malformed loader response: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_last_marked_line() {
        let stdout = format!(
            "user log\n{RESPONSE_MARKER}{{\"ok\":false,\"message\":\"old\"}}\nmore\n{RESPONSE_MARKER}{{\"ok\":true,\"value\":42}}\n"
        );
        let response = parse_response(&stdout).unwrap().unwrap();
        assert!(response.ok);
        assert_eq!(response.value, 42);
    }

    #[test]
    fn missing_marker_is_none() {
        assert!(parse_response("hello\nworld\n").unwrap().is_none());
    }

    #[test]
    fn malformed_marker_is_error() {
        let stdout = format!("{RESPONSE_MARKER}{{not json");
        let err = parse_response(&stdout).unwrap_err();
        assert!(err.message.contains("malformed"));
    }

    #[test]
    fn prelude_defines_marker() {
        assert!(PRELUDE.contains(RESPONSE_MARKER));
        assert!(PRELUDE.contains(ENV_LOADER_REQUEST));
    }

    fn node_available() -> bool {
        std::process::Command::new("node")
            .arg("--version")
            .output()
            .map(|out| out.status.success())
            .unwrap_or(false)
    }

    #[tokio::test]
    async fn returns_once_response_is_written() {
        if !node_available() {
            return;
        }
        let runner = NodeRunner::new("node", Some(Duration::from_secs(10)));
        let dir = tempfile::tempdir().unwrap();
        let script = "setInterval(() => {}, 1000);\nawait run(async () => request.answer);";
        let value: Value = runner
            .run(script, dir.path(), &serde_json::json!({ "answer": 42 }))
            .await
            .unwrap();
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn failed_task_with_open_handles_reports_error() {
        if !node_available() {
            return;
        }
        let runner = NodeRunner::new("node", Some(Duration::from_secs(10)));
        let dir = tempfile::tempdir().unwrap();
        let script = "setInterval(() => {}, 1000);\nawait run(async () => { throw new Error(\"nope\"); });";
        let err = runner
            .run::<Value>(script, dir.path(), &serde_json::json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.message, "nope");
    }

    #[tokio::test]
    async fn missing_binary_is_load_error() {
        let runner = NodeRunner::new("authconf-no-such-node-binary", None);
        let dir = tempfile::tempdir().unwrap();
        let err = runner
            .run::<Value>("", dir.path(), &serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(err.message.contains("failed to execute"));
    }
}
