// ghman: GitHub Repository Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for configuration loading.
//!
//! Tests the Config module with realistic deployment files.

use std::io::Write;

use ghman::auth::{AccessGate, Capability, Operation};
use ghman::config::Config;
use ghman::store::RepoRef;

const DEPLOYMENT: &str = r#"
[global]
output_log_level = 3
json_logs = true

[server]
bind = "0.0.0.0:8787"
public_url = "https://files.example.com"

[github]
token = "ghp_deploy"

[auth]
admin_token = "rt-91c2"
editor_token = "ed-7f3a"

[auth.tokens]
ci-bot = "write"
viewer = "read"

[share]
secret = "prod-secret"

[[fallback_repos]]
owner = "octo"
repo = "docs"

[[fallback_repos]]
owner = "octo"
repo = "site"
branch = "gh-pages"
"#;

fn temp_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("temp file");
    file.write_all(content.as_bytes()).expect("write config");
    file
}

// =============================================================================
// Loading from TOML strings
// =============================================================================

#[test]
fn config_parse_deployment() {
    let config = Config::parse(DEPLOYMENT).unwrap();

    assert!(config.global.json_logs);
    assert_eq!(config.bind_addr().unwrap().port(), 8787);
    assert_eq!(
        config.server.public_url.as_deref(),
        Some("https://files.example.com")
    );
    assert_eq!(config.auth.tokens["ci-bot"], Capability::Write);
    assert_eq!(
        config.fallback_repos,
        [
            RepoRef::new("octo", "docs", "main"),
            RepoRef::new("octo", "site", "gh-pages"),
        ]
    );
}

#[test]
fn config_tokens_drive_the_gate() {
    let config = Config::parse(DEPLOYMENT).unwrap();
    let gate = AccessGate::from_config(&config.auth);

    assert_eq!(gate.authorize("rt-91c2"), Some(Capability::Admin));
    assert_eq!(gate.authorize("viewer"), Some(Capability::Read));
    assert!(gate.require(Some("ci-bot"), Operation::Save).is_ok());
    assert!(gate.require(Some("ci-bot"), Operation::DeleteRepository).is_err());
    // demo tokens stay off unless asked for
    assert_eq!(gate.authorize("your-admin-uuid-here"), None);
}

#[test]
fn config_unknown_capability_rejected() {
    let result = Config::parse(
        r#"
[auth.tokens]
bot = "owner"
"#,
    );
    assert!(result.is_err());
}

#[test]
fn config_unknown_section_rejected() {
    assert!(Config::parse("[paths]\nprefix = \"/build\"\n").is_err());
}

#[test]
fn config_options_never_print_secrets() {
    let config = Config::parse(DEPLOYMENT).unwrap();
    let rendered = config.format_options().join("\n");

    for secret in ["ghp_deploy", "rt-91c2", "ed-7f3a", "prod-secret", "ci-bot"] {
        assert!(!rendered.contains(secret), "{secret} leaked:\n{rendered}");
    }
    assert!(rendered.contains("https://files.example.com"));
}

// =============================================================================
// Builder / layering
// =============================================================================

#[test]
fn config_builder_file_then_override() {
    let base = temp_config(DEPLOYMENT);
    let local = temp_config("[server]\nbind = \"127.0.0.1:9000\"\n");

    let loader = Config::builder()
        .add_toml_file(base.path())
        .add_toml_file(local.path());
    assert_eq!(loader.loaded_files().len(), 2);

    let config = loader
        .set_option("share.secret=rotated")
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(config.server.bind, "127.0.0.1:9000");
    // untouched keys survive from the first file
    assert_eq!(config.github.token.as_deref(), Some("ghp_deploy"));
    assert_eq!(config.share.secret, "rotated");
}

#[test]
fn config_builder_invalid_public_url() {
    let result = Config::builder()
        .add_toml_str(DEPLOYMENT)
        .set("server.public_url", "mailto:someone@example.com")
        .unwrap()
        .build();
    assert!(result.is_err());
}
