// ghman: GitHub Repository Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Serve command implementation for ghman.

use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::error::Result;
use crate::server;

/// Deployment problems worth a warning at startup.
#[must_use]
pub fn startup_warnings(config: &Config) -> Vec<&'static str> {
    let mut warnings = Vec::new();
    if config.share.secret == crate::share::DEFAULT_SECRET {
        warnings.push("share.secret is the built-in default; share links can be forged");
    }
    if config.github.token.as_deref().is_none_or(str::is_empty) {
        warnings.push("github.token is not set; upstream calls are anonymous and writes will fail");
    }
    let auth = &config.auth;
    let has_secret = [&auth.admin_token, &auth.editor_token, &auth.read_token]
        .into_iter()
        .any(|t| t.as_deref().is_some_and(|t| !t.is_empty()));
    if !has_secret && auth.tokens.is_empty() && !auth.allow_demo_tokens {
        warnings.push("no caller tokens configured; every gated route will answer 401");
    }
    if auth.allow_demo_tokens {
        warnings.push("demo tokens are enabled");
    }
    warnings
}

/// Main handler for serve command.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound or the server fails.
pub async fn run_serve_command(config: &Config) -> Result<()> {
    for warning in startup_warnings(config) {
        tracing::warn!("{warning}");
    }

    let shutdown = CancellationToken::new();
    let token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Received Ctrl+C, shutting down...");
            token.cancel();
        }
    });

    server::run(config, shutdown).await
}
