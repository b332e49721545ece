// ghman: GitHub Repository Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::io::Write;

use tempfile::NamedTempFile;

use super::{Config, ConfigLoader};
use crate::auth::Capability;
use crate::logging::LogLevel;
use crate::store::RepoRef;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.server.bind, "127.0.0.1:8787");
    assert_eq!(config.github.api_url, "https://api.github.com");
    assert_eq!(config.share.secret, crate::share::DEFAULT_SECRET);
    assert!(!config.auth.allow_demo_tokens);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_parse_sections() {
    let config = Config::parse(
        r#"
[global]
output_log_level = 4
json_logs = true

[server]
bind = "0.0.0.0:9000"
public_url = "https://files.example.com"

[github]
token = "ghp_x"

[auth]
admin_token = "a"
tokens = { "t-1" = "write", "t-2" = "read" }

[share]
secret = "s3cret"

[[fallback_repos]]
owner = "octo"
repo = "docs"
"#,
    )
    .expect("parse should succeed");

    assert_eq!(config.global.output_log_level, LogLevel::DEBUG);
    assert!(config.global.json_logs);
    assert_eq!(config.bind_addr().unwrap().port(), 9000);
    assert_eq!(config.github.token.as_deref(), Some("ghp_x"));
    assert_eq!(config.auth.tokens.get("t-1"), Some(&Capability::Write));
    assert_eq!(config.share.secret, "s3cret");
    assert_eq!(config.fallback_repos, [RepoRef::new("octo", "docs", "main")]);
}

#[test]
fn test_deny_unknown_fields() {
    assert!(Config::parse("[server]\nport = 80").is_err());
    assert!(Config::parse("[nonsense]\nx = 1").is_err());
}

#[test]
fn test_validation_failures() {
    assert!(Config::parse("[server]\nbind = \"not-an-address\"").is_err());
    assert!(Config::parse("[server]\npublic_url = \"relative/path\"").is_err());
    assert!(Config::parse("[share]\nsecret = \"\"").is_err());
    assert!(Config::parse("[auth]\ntokens = { x = \"owner\" }").is_err());
    assert!(Config::parse("[global]\noutput_log_level = 9").is_err());
}

#[test]
fn test_format_options_hides_sensitive() {
    let config = Config::parse(
        r#"
[github]
token = "ghp_supersecret"

[auth]
admin_token = "admin-secret"
tokens = { "table-secret" = "write" }

[share]
secret = "share-secret"
"#,
    )
    .unwrap();

    let rendered = config.format_options().join("\n");
    for secret in ["ghp_supersecret", "admin-secret", "table-secret", "share-secret"] {
        assert!(!rendered.contains(secret), "{secret} leaked:\n{rendered}");
    }
    assert!(rendered.contains("github.token"));
    assert!(rendered.contains("[hidden]"));
}

#[test]
fn test_format_options_default() {
    let lines = Config::default().format_options();
    let keys: Vec<&str> = lines
        .iter()
        .filter_map(|line| line.split_once(" = "))
        .map(|(key, _)| key.trim_end())
        .collect();

    assert_eq!(
        keys,
        [
            "auth.allow_demo_tokens",
            "github.api_url",
            "github.raw_url",
            "github.uploads_url",
            "github.user_agent",
            "global.file_log_level",
            "global.json_logs",
            "global.log_file",
            "global.output_log_level",
            "server.bind",
            "server.public_url",
            "share.secret",
        ]
    );

    // values line up in one column
    let column = lines[0].find(" = ");
    assert!(lines.iter().all(|line| line.find(" = ") == column));
    assert!(lines.iter().any(|line| line.ends_with("= [default]")));
}

#[test]
fn test_debug_hides_secrets() {
    let config = Config::parse("[github]\ntoken = \"ghp_x\"\n[auth]\nread_token = \"rd\"").unwrap();
    let rendered = format!("{config:?}");
    assert!(!rendered.contains("ghp_x"));
    assert!(!rendered.contains("\"rd\""));
}

#[test]
fn test_config_loader_add_toml_file() {
    let mut file = NamedTempFile::new().expect("failed to create temp file");
    writeln!(file, "[server]\nbind = \"127.0.0.1:1\"").expect("failed to write temp file");

    let loader = ConfigLoader::new().add_toml_file(file.path());
    assert_eq!(loader.loaded_files().len(), 1);

    let config = loader.build().expect("build should succeed");
    assert_eq!(config.server.bind, "127.0.0.1:1");
}

#[test]
fn test_config_loader_missing_required_file() {
    let result = ConfigLoader::new()
        .add_toml_file("/nonexistent/path/ghman.toml")
        .build();
    assert!(result.is_err());
}

#[test]
fn test_config_loader_optional_only_tracks_existing() {
    let loader = ConfigLoader::new().add_toml_file_optional("/nonexistent/ghman.toml");
    assert!(loader.loaded_files().is_empty());
    assert!(loader.build().is_ok());
}

#[test]
fn test_config_loader_format_loaded_files() {
    let loader = ConfigLoader::new().add_toml_str("[server]");
    insta::assert_snapshot!(loader.format_loaded_files().join("\n"), @"1. [string] <string>");
}

#[test]
fn test_config_loader_with_env_prefix() {
    // SAFETY: the variable name is unique to this test
    unsafe {
        std::env::set_var("GHMANTEST_SERVER__BIND", "127.0.0.1:4242");
        std::env::set_var("GHMANTEST_AUTH__ALLOW_DEMO_TOKENS", "true");
    }

    let config = ConfigLoader::new()
        .add_toml_str("[server]\nbind = \"127.0.0.1:1\"")
        .with_env_prefix("GHMANTEST")
        .build()
        .expect("build should succeed");

    assert_eq!(config.server.bind, "127.0.0.1:4242");
    assert!(config.auth.allow_demo_tokens);

    // SAFETY: same as above
    unsafe {
        std::env::remove_var("GHMANTEST_SERVER__BIND");
        std::env::remove_var("GHMANTEST_AUTH__ALLOW_DEMO_TOKENS");
    }
}

#[test]
fn test_env_secrets_keep_their_exact_text() {
    // SAFETY: the variable names are unique to this test
    unsafe {
        std::env::set_var("GHMANSECRET_AUTH__ADMIN_TOKEN", "00123");
        std::env::set_var("GHMANSECRET_SHARE__SECRET", "12345678901234567890123");
        std::env::set_var("GHMANSECRET_GLOBAL__OUTPUT_LOG_LEVEL", "5");
    }

    let config = ConfigLoader::new()
        .with_env_prefix("GHMANSECRET")
        .build()
        .expect("build should succeed");

    assert_eq!(config.auth.admin_token.as_deref(), Some("00123"));
    assert_eq!(config.share.secret, "12345678901234567890123");
    assert_eq!(config.global.output_log_level, LogLevel::TRACE);

    // SAFETY: same as above
    unsafe {
        std::env::remove_var("GHMANSECRET_AUTH__ADMIN_TOKEN");
        std::env::remove_var("GHMANSECRET_SHARE__SECRET");
        std::env::remove_var("GHMANSECRET_GLOBAL__OUTPUT_LOG_LEVEL");
    }
}

#[test]
fn test_config_loader_set_option() {
    let config = ConfigLoader::new()
        .add_toml_str("[share]\nsecret = \"file\"")
        .set_option("share.secret=cli")
        .expect("set should succeed")
        .set_maybe("github.token", Some("ghp_cli"))
        .expect("set should succeed")
        .set_maybe("auth.admin_token", None)
        .expect("set should succeed")
        .build()
        .expect("build should succeed");

    assert_eq!(config.share.secret, "cli");
    assert_eq!(config.github.token.as_deref(), Some("ghp_cli"));
    assert!(config.auth.admin_token.is_none());
}

#[test]
fn test_config_loader_set_option_rejects_garbage() {
    assert!(ConfigLoader::new().set_option("no-equals-sign").is_err());
    assert!(ConfigLoader::new().set_option("=value").is_err());
}

#[test]
fn test_layered_sources() {
    let mut file = NamedTempFile::new().expect("failed to create temp file");
    writeln!(
        file,
        "[server]\nbind = \"127.0.0.1:1\"\npublic_url = \"https://a.example\""
    )
    .expect("failed to write");

    let config = ConfigLoader::new()
        .add_toml_file(file.path())
        .add_toml_str("[server]\nbind = \"127.0.0.1:2\"")
        .build()
        .expect("build should succeed");

    assert_eq!(config.server.bind, "127.0.0.1:2", "later source wins");
    assert_eq!(
        config.server.public_url.as_deref(),
        Some("https://a.example"),
        "earlier value persists"
    );
}
