// ghman: GitHub Repository Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for ghman.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. ghman.toml (cwd, optional)
//! 3. --config FILE (repeatable)
//! 4. GHMAN_* env vars
//! 5. CLI overrides (--set, dedicated flags)
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! GHMAN_SERVER__BIND=0.0.0.0:80      → server.bind
//! GHMAN_GITHUB__TOKEN=ghp_...        → github.token
//! GHMAN_AUTH__ALLOW_DEMO_TOKENS=true → auth.allow_demo_tokens
//! ```
//!
//! Sections are separated by a double underscore because keys themselves
//! contain single underscores.

pub mod loader;
pub mod types;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::SocketAddr;

use crate::error::{ConfigError, Result};
use crate::store::RepoRef;

use loader::ConfigLoader;
use types::{AuthConfig, GitHubConfig, GlobalConfig, ServerConfig, ShareConfig};

/// Default local configuration file name.
pub const DEFAULT_FILE: &str = "ghman.toml";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "GHMAN";

const HIDDEN: &str = "[hidden]";

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub global: GlobalConfig,
    pub server: ServerConfig,
    pub github: GitHubConfig,
    pub auth: AuthConfig,
    pub share: ShareConfig,
    /// Repositories listed when the upstream listing fails.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fallback_repos: Vec<RepoRef>,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use ghman::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("ghman.toml")
    ///     .with_env_prefix("GHMAN")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML, does not match the
    /// `Config` structure, or fails validation.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Check values that serde cannot.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::InvalidValue` for an unparseable bind address
    /// or public URL, or an empty share secret.
    pub fn validate(&self) -> Result<()> {
        self.bind_addr()?;

        if let Some(url) = &self.server.public_url
            && !reqwest::Url::parse(url).is_ok_and(|u| !u.cannot_be_a_base())
        {
            return Err(invalid("server", "public_url", format!("'{url}' is not a base URL")).into());
        }

        if self.share.secret.is_empty() {
            return Err(invalid("share", "secret", "must not be empty".to_string()).into());
        }

        Ok(())
    }

    /// Parsed `server.bind`.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::InvalidValue` if the address does not parse.
    pub fn bind_addr(&self) -> std::result::Result<SocketAddr, ConfigError> {
        self.server
            .bind
            .parse()
            .map_err(|e| invalid("server", "bind", format!("'{}': {e}", self.server.bind)))
    }

    /// Format configuration options for display.
    ///
    /// Secrets are replaced by `[hidden]`. Output is sorted by key.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        self.format_global_options(&mut options);
        self.format_server_options(&mut options);
        self.format_github_options(&mut options);
        self.format_auth_options(&mut options);

        options.insert(
            "share.secret".into(),
            if self.share.secret == crate::share::DEFAULT_SECRET {
                "[default]".into()
            } else {
                HIDDEN.into()
            },
        );

        if !self.fallback_repos.is_empty() {
            let repos: Vec<String> = self.fallback_repos.iter().map(ToString::to_string).collect();
            options.insert("fallback_repos".into(), repos.join(", "));
        }

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }

    fn format_global_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "global.output_log_level".into(),
            self.global.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level".into(),
            self.global.file_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.log_file".into(),
            self.global
                .log_file
                .as_ref()
                .map_or_else(String::new, |p| p.display().to_string()),
        );
        options.insert("global.json_logs".into(), self.global.json_logs.to_string());
    }

    fn format_server_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("server.bind".into(), self.server.bind.clone());
        options.insert(
            "server.public_url".into(),
            self.server.public_url.clone().unwrap_or_default(),
        );
    }

    fn format_github_options(&self, options: &mut BTreeMap<String, String>) {
        if self.github.token.is_some() {
            options.insert("github.token".into(), HIDDEN.into());
        }
        options.insert("github.api_url".into(), self.github.api_url.clone());
        options.insert("github.raw_url".into(), self.github.raw_url.clone());
        options.insert("github.uploads_url".into(), self.github.uploads_url.clone());
        options.insert("github.user_agent".into(), self.github.user_agent.clone());
    }

    fn format_auth_options(&self, options: &mut BTreeMap<String, String>) {
        for (key, value) in [
            ("auth.admin_token", &self.auth.admin_token),
            ("auth.editor_token", &self.auth.editor_token),
            ("auth.read_token", &self.auth.read_token),
        ] {
            if value.is_some() {
                options.insert(key.into(), HIDDEN.into());
            }
        }
        if !self.auth.tokens.is_empty() {
            options.insert(
                "auth.tokens".into(),
                format!("{} entries {HIDDEN}", self.auth.tokens.len()),
            );
        }
        options.insert(
            "auth.allow_demo_tokens".into(),
            self.auth.allow_demo_tokens.to_string(),
        );
    }
}

fn invalid(section: &str, key: &str, message: String) -> ConfigError {
    ConfigError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        message,
    }
}
