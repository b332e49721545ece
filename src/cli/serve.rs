// ghman: GitHub Repository Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `serve` command arguments.
//!
//! The token flags also read the environment variable names used by
//! existing deployments (`GITHUB_TOKEN`, `TOKEN_ADMIN`, ...).

use clap::Args;

#[derive(Debug, Clone, Default, Args)]
pub struct ServeArgs {
    /// Socket address to listen on.
    #[arg(short = 'b', long, value_name = "ADDR")]
    pub bind: Option<String>,

    /// Externally visible base URL for share links.
    #[arg(long = "public-url", value_name = "URL")]
    pub public_url: Option<String>,

    /// Token used for every GitHub API call.
    #[arg(long = "github-token", env = "GITHUB_TOKEN", value_name = "TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Caller secret granting admin.
    #[arg(long = "admin-token", env = "TOKEN_ADMIN", value_name = "TOKEN", hide_env_values = true)]
    pub admin_token: Option<String>,

    /// Caller secret granting write.
    #[arg(long = "editor-token", env = "TOKEN_EDITOR", value_name = "TOKEN", hide_env_values = true)]
    pub editor_token: Option<String>,

    /// Caller secret granting read.
    #[arg(long = "read-token", env = "TOKEN_READ", value_name = "TOKEN", hide_env_values = true)]
    pub read_token: Option<String>,
}

impl ServeArgs {
    #[must_use]
    pub fn config_overrides(&self) -> Vec<(&'static str, String)> {
        [
            ("server.bind", &self.bind),
            ("server.public_url", &self.public_url),
            ("github.token", &self.github_token),
            ("auth.admin_token", &self.admin_token),
            ("auth.editor_token", &self.editor_token),
            ("auth.read_token", &self.read_token),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.clone().map(|v| (key, v)))
        .collect()
    }
}
