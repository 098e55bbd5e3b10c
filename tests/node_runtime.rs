//! Integration tests for the Node-backed loaders.
//!
//! Each test builds a throwaway project with small stand-ins for the `jiti`
//! and `vite` packages under `node_modules/`, then runs the embedded scripts
//! with the real `node` binary. Tests are skipped when `node` is not on PATH.

use std::path::Path;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;

use authconf::alias::AliasMap;
use authconf::config::{AuthExport, LoadedConfig};
use authconf::runtime::{
    BundlerConfig, BundlerImport, BundlerProbe, JitiLoader, NodeRunner, TranspileLoader,
    TranspileOptions, ViteLoader,
};

const JITI_V2: &str = r#"
import { pathToFileURL } from "node:url";
export function createJiti(parent, options) {
	globalThis.__jitiCall = { parent, alias: options.alias, extensions: options.extensions };
	return { import: (id) => import(pathToFileURL(id).href) };
}
"#;

const JITI_V1: &str = r#"
module.exports = function (parent, options) {
	return (id) => require(id);
};
"#;

const VITE: &str = r#"
import path from "node:path";
import { pathToFileURL } from "node:url";
export async function loadConfigFromFile(env, configFile, root) {
	const file = configFile ?? path.join(root, "vite.config.mjs");
	return { path: file, config: { root, env } };
}
export async function runnerImport(id, config) {
	if (config.env.command !== "serve" || !config.env.isSsrBuild) {
		throw new Error("unexpected vite env");
	}
	return { module: await import(pathToFileURL(id).href) };
}
"#;

// ---------------------------------------------------------------------------
// helpers
// ---------------------------------------------------------------------------

fn runner() -> Option<NodeRunner> {
    let available = std::process::Command::new("node")
        .arg("--version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false);
    if !available {
        eprintln!("node not found on PATH, skipping");
        return None;
    }
    Some(NodeRunner::new("node", Some(Duration::from_secs(30))))
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn esm_package(root: &Path, name: &str, source: &str) {
    write(
        root,
        &format!("node_modules/{name}/package.json"),
        &format!(r#"{{ "name": "{name}", "type": "module", "main": "index.js" }}"#),
    );
    write(root, &format!("node_modules/{name}/index.js"), source);
}

fn cjs_package(root: &Path, name: &str, source: &str) {
    write(
        root,
        &format!("node_modules/{name}/package.json"),
        &format!(r#"{{ "name": "{name}", "main": "index.js" }}"#),
    );
    write(root, &format!("node_modules/{name}/index.js"), source);
}

async fn load_with_jiti(
    runner: NodeRunner,
    root: &Path,
    file: &str,
) -> Result<LoadedConfig, authconf::runtime::LoadError> {
    let options = TranspileOptions::new(root, AliasMap::new());
    JitiLoader::new(runner).load(&root.join(file), &options).await
}

fn auth(options: serde_json::Value) -> LoadedConfig {
    LoadedConfig {
        auth: Some(AuthExport {
            options: Some(options),
        }),
        default: None,
    }
}

// ---------------------------------------------------------------------------
// jiti
// ---------------------------------------------------------------------------

#[tokio::test]
async fn config_with_open_handles_still_returns() {
    let Some(runner) = runner() else { return };
    let dir = tempfile::tempdir().unwrap();
    esm_package(dir.path(), "jiti", JITI_V2);
    write(
        dir.path(),
        "auth.mjs",
        "setInterval(() => {}, 1000);\nexport const auth = { options: { x: 1 } };\n",
    );

    let loaded = load_with_jiti(runner, dir.path(), "auth.mjs").await.unwrap();
    assert_eq!(loaded, auth(json!({ "x": 1 })));
}

#[tokio::test]
async fn jiti_gets_parent_file_aliases_and_extensions() {
    let Some(runner) = runner() else { return };
    let dir = tempfile::tempdir().unwrap();
    esm_package(dir.path(), "jiti", JITI_V2);
    write(
        dir.path(),
        "auth.mjs",
        "export const auth = { options: globalThis.__jitiCall };\n",
    );

    let mut alias = AliasMap::new();
    alias.insert("@/", "/project/src");
    let options = TranspileOptions::new(dir.path(), alias);
    let loaded = JitiLoader::new(runner)
        .load(&dir.path().join("auth.mjs"), &options)
        .await
        .unwrap();

    let parent = dir.path().join("package.json").display().to_string();
    assert_eq!(
        loaded,
        auth(json!({
            "parent": parent,
            "alias": { "@/": "/project/src" },
            "extensions": [".ts", ".tsx", ".js", ".jsx"],
        }))
    );
}

#[tokio::test]
async fn jiti_v1_callable_is_supported() {
    let Some(runner) = runner() else { return };
    let dir = tempfile::tempdir().unwrap();
    cjs_package(dir.path(), "jiti", JITI_V1);
    write(
        dir.path(),
        "auth.cjs",
        "module.exports = { auth: { options: { legacy: true } } };\n",
    );

    let loaded = load_with_jiti(runner, dir.path(), "auth.cjs").await.unwrap();
    assert_eq!(loaded, auth(json!({ "legacy": true })));
}

#[tokio::test]
async fn exported_options_become_plain_json() {
    let Some(runner) = runner() else { return };
    let dir = tempfile::tempdir().unwrap();
    esm_package(dir.path(), "jiti", JITI_V2);
    write(
        dir.path(),
        "auth.mjs",
        r#"
const session = { name: "sid" };
session.self = session;
export default {
	options: {
		session,
		hook() {},
		big: 10n,
		trusted: new Set(["a", "b"]),
		providers: new Map([["github", { id: 1, sign: () => 1 }]]),
	},
};
"#,
    );

    let loaded = load_with_jiti(runner, dir.path(), "auth.mjs").await.unwrap();
    assert_eq!(loaded.auth, None);
    assert_eq!(
        loaded.into_options(),
        Some(json!({
            "session": { "name": "sid", "self": "[Circular]" },
            "big": "10",
            "trusted": ["a", "b"],
            "providers": { "github": { "id": 1 } },
        }))
    );
}

#[tokio::test]
async fn null_and_unrelated_exports_are_absent() {
    let Some(runner) = runner() else { return };
    let dir = tempfile::tempdir().unwrap();
    esm_package(dir.path(), "jiti", JITI_V2);
    write(
        dir.path(),
        "auth.mjs",
        "export const auth = null;\nexport const config = { options: {} };\n",
    );

    let loaded = load_with_jiti(runner, dir.path(), "auth.mjs").await.unwrap();
    assert_eq!(loaded, LoadedConfig::default());
    assert!(!loaded.has_export());
}

#[tokio::test]
async fn missing_jiti_is_a_load_error() {
    let Some(runner) = runner() else { return };
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "auth.mjs", "export const auth = {};\n");

    let err = load_with_jiti(runner, dir.path(), "auth.mjs").await.unwrap_err();
    assert!(err.message.contains("jiti is not installed"), "{}", err.message);
}

#[tokio::test]
async fn thrown_errors_keep_message_and_stack() {
    let Some(runner) = runner() else { return };
    let dir = tempfile::tempdir().unwrap();
    esm_package(dir.path(), "jiti", JITI_V2);
    write(dir.path(), "auth.mjs", "throw new Error(\"database url missing\");\n");

    let err = load_with_jiti(runner, dir.path(), "auth.mjs").await.unwrap_err();
    assert_eq!(err.message, "database url missing");
    assert!(err.stack.unwrap_or_default().contains("database url missing"));
}

// ---------------------------------------------------------------------------
// vite
// ---------------------------------------------------------------------------

#[tokio::test]
async fn probe_without_vite_finds_nothing() {
    let Some(runner) = runner() else { return };
    let dir = tempfile::tempdir().unwrap();

    let found = ViteLoader::new(runner).probe(dir.path()).await.unwrap();
    assert_eq!(found, None);
}

#[tokio::test]
async fn probe_then_import_through_vite() {
    let Some(runner) = runner() else { return };
    let dir = tempfile::tempdir().unwrap();
    esm_package(dir.path(), "vite", VITE);
    write(dir.path(), "vite.config.mjs", "export default {};\n");
    write(
        dir.path(),
        "src/auth.mjs",
        "setTimeout(() => {}, 60_000);\nexport const auth = { options: { via: \"vite\" } };\n",
    );

    let vite = ViteLoader::new(runner);
    let config = vite.probe(dir.path()).await.unwrap().unwrap();
    assert_eq!(
        config,
        BundlerConfig {
            root: dir.path().to_path_buf(),
            config_file: Some(dir.path().join("vite.config.mjs")),
        }
    );

    let loaded = vite
        .import(&dir.path().join("src/auth.mjs"), &config)
        .await
        .unwrap();
    assert_eq!(loaded, auth(json!({ "via": "vite" })));
}
