// ghman: GitHub Repository Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration section types.
//!
//! ```text
//! [global]   log levels, log file, json output
//! [server]   bind address, public base URL
//! [github]   server token, API/raw/uploads hosts, user agent
//! [auth]     admin/editor/read secrets, token table, demo toggle
//! [share]    signing secret
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::auth::Capability;
use crate::logging::LogLevel;
use crate::share::DEFAULT_SECRET;

/// Global configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Log level for console output (0-6).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-6).
    pub file_log_level: LogLevel,
    /// Path to log file; no file logging when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
    /// Emit console logs as JSON lines.
    pub json_logs: bool,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::DEBUG,
            log_file: None,
            json_logs: false,
        }
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Socket address to listen on.
    pub bind: String,
    /// Externally visible base URL used in share links.
    ///
    /// When unset, links are built from the request's `Host` header.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8787".to_string(),
            public_url: None,
        }
    }
}

/// Remote content API configuration.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitHubConfig {
    /// Server-held bearer token used for every remote call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub api_url: String,
    pub raw_url: String,
    pub uploads_url: String,
    pub user_agent: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: "https://api.github.com".to_string(),
            raw_url: "https://raw.githubusercontent.com".to_string(),
            uploads_url: "https://uploads.github.com".to_string(),
            user_agent: concat!("ghman/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl std::fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("token", &self.token.as_ref().map(|_| "[hidden]"))
            .field("api_url", &self.api_url)
            .field("raw_url", &self.raw_url)
            .field("uploads_url", &self.uploads_url)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Caller credentials.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editor_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_token: Option<String>,
    /// Additional token → capability mappings.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub tokens: BTreeMap<String, Capability>,
    /// Honour the well-known placeholder tokens. Never enable in production.
    pub allow_demo_tokens: bool,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let hidden = |s: &Option<String>| s.as_ref().map(|_| "[hidden]");
        f.debug_struct("AuthConfig")
            .field("admin_token", &hidden(&self.admin_token))
            .field("editor_token", &hidden(&self.editor_token))
            .field("read_token", &hidden(&self.read_token))
            .field("tokens", &self.tokens.len())
            .field("allow_demo_tokens", &self.allow_demo_tokens)
            .finish()
    }
}

/// Share-link signing configuration.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShareConfig {
    pub secret: String,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_string(),
        }
    }
}

impl std::fmt::Debug for ShareConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShareConfig")
            .field("secret", &"[hidden]")
            .finish()
    }
}
