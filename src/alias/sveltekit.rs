//! Synthetic `$env/*` modules for SvelteKit projects.
//!
//! SvelteKit exposes environment variables through virtual modules that
//! only exist inside its Vite plugin. When a config is loaded outside of
//! Vite those imports are aliased to inline `data:` modules built from the
//! current environment.

use std::sync::LazyLock;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use regex::Regex;

use super::{AliasInjector, AliasMap};
use crate::env::Env;

static VALID_IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z_$][a-zA-Z0-9_$]*$").unwrap());

const RESERVED: &[&str] = &[
    "do", "if", "in", "for", "let", "new", "try", "var", "case", "else", "enum", "eval", "null",
    "this", "true", "void", "with", "await", "break", "catch", "class", "const", "false", "super",
    "throw", "while", "yield", "delete", "export", "import", "public", "return", "static",
    "switch", "typeof", "default", "extends", "finally", "package", "private", "continue",
    "debugger", "function", "arguments", "interface", "protected", "implements", "instanceof",
];

/// Injects `$env/{dynamic,static}/{private,public}`.
#[derive(Debug, Clone)]
pub struct SvelteKitEnvModules {
    env: Env,
    public_prefix: String,
    private_prefix: String,
}

impl SvelteKitEnvModules {
    pub fn new(env: Env, public_prefix: impl Into<String>, private_prefix: impl Into<String>) -> Self {
        Self {
            env,
            public_prefix: public_prefix.into(),
            private_prefix: private_prefix.into(),
        }
    }

    fn private_vars(&self) -> Vec<(String, String)> {
        self.env
            .vars()
            .into_iter()
            .filter(|(k, _)| {
                k.starts_with(&self.private_prefix)
                    && (self.public_prefix.is_empty() || !k.starts_with(&self.public_prefix))
            })
            .collect()
    }

    fn public_vars(&self) -> Vec<(String, String)> {
        self.env
            .vars()
            .into_iter()
            .filter(|(k, _)| {
                k.starts_with(&self.public_prefix)
                    && (self.private_prefix.is_empty() || !k.starts_with(&self.private_prefix))
            })
            .collect()
    }
}

impl AliasInjector for SvelteKitEnvModules {
    fn inject(&self, aliases: &mut AliasMap) {
        let dynamic = data_uri(&dynamic_module());
        aliases.insert("$env/dynamic/private", dynamic.clone());
        aliases.insert("$env/dynamic/public", dynamic);
        aliases.insert("$env/static/private", data_uri(&static_module(&self.private_vars())));
        aliases.insert("$env/static/public", data_uri(&static_module(&self.public_vars())));
    }
}

fn dynamic_module() -> String {
    "export const env = process.env;\n".to_string()
}

fn static_module(vars: &[(String, String)]) -> String {
    let mut module = String::new();
    for (name, value) in vars {
        if !VALID_IDENTIFIER.is_match(name) || RESERVED.contains(&name.as_str()) {
            continue;
        }
        // serde_json string escaping matches JSON.stringify for strings
        let literal = serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string());
        module.push_str(&format!("export const {name} = {literal};\n"));
    }
    module
}

fn data_uri(source: &str) -> String {
    format!("data:text/javascript;base64,{}", STANDARD.encode(source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn decode(uri: &str) -> String {
        let payload = uri.strip_prefix("data:text/javascript;base64,").unwrap();
        String::from_utf8(STANDARD.decode(payload).unwrap()).unwrap()
    }

    fn injected(env: Env) -> AliasMap {
        let mut map = AliasMap::new();
        SvelteKitEnvModules::new(env, "PUBLIC_", "").inject(&mut map);
        map
    }

    #[test]
    fn injects_all_four_modules() {
        let map = injected(Env::mock(Vec::<(&str, &str)>::new()));
        let keys: Vec<_> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec![
                "$env/dynamic/private",
                "$env/dynamic/public",
                "$env/static/private",
                "$env/static/public",
            ]
        );
        assert_eq!(
            decode(map.get("$env/dynamic/public").unwrap()),
            "export const env = process.env;\n"
        );
    }

    #[test]
    fn static_modules_split_on_public_prefix() {
        let map = injected(Env::mock([
            ("PUBLIC_URL", "https://example.com"),
            ("DATABASE_URL", "postgres://db"),
        ]));
        let private = decode(map.get("$env/static/private").unwrap());
        let public = decode(map.get("$env/static/public").unwrap());
        assert_eq!(private, "export const DATABASE_URL = \"postgres://db\";\n");
        assert_eq!(public, "export const PUBLIC_URL = \"https://example.com\";\n");
    }

    #[test]
    fn skips_invalid_and_reserved_names() {
        let map = injected(Env::mock([
            ("class", "x"),
            ("MY-VAR", "y"),
            ("1ABC", "z"),
            ("OK_NAME", "w"),
        ]));
        let private = decode(map.get("$env/static/private").unwrap());
        assert_eq!(private, "export const OK_NAME = \"w\";\n");
    }

    #[test]
    fn values_are_escaped() {
        let map = injected(Env::mock([("SECRET", "a\"b\\c\n")]));
        let private = decode(map.get("$env/static/private").unwrap());
        assert_eq!(private, "export const SECRET = \"a\\\"b\\\\c\\n\";\n");
    }

    #[test]
    fn private_prefix_excludes_from_public() {
        let mut map = AliasMap::new();
        SvelteKitEnvModules::new(
            Env::mock([("PUBLIC_A", "1"), ("PUBLIC_PRIVATE_B", "2")]),
            "PUBLIC_",
            "PUBLIC_PRIVATE_",
        )
        .inject(&mut map);
        let public = decode(map.get("$env/static/public").unwrap());
        assert_eq!(public, "export const PUBLIC_A = \"1\";\n");
    }
}
