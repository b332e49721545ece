// ghman: GitHub Repository Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Global CLI options available for all commands.
//!
//! # Option Precedence
//!
//! ```text
//! --config FILE       <- Additional config files (can repeat)
//! --log-level N       <- Console verbosity (0-6)
//! --file-log-level N  <- File verbosity (defaults to --log-level)
//! --log-file FILE     <- Enables file logging
//! --json-logs         <- JSON lines on the console
//! --set KEY=VAL       <- Direct config override
//! --share-secret S    <- share.secret (env SHARE_SECRET)
//!
//! Precedence: flags > --set > GHMAN_* env > --config > ghman.toml > defaults
//! ```

use clap::Args;
use std::path::PathBuf;

/// Global options available for all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalOptions {
    /// Path to additional TOML configuration file(s).
    /// Can be specified multiple times.
    #[arg(short = 'c', long = "config", value_name = "FILE", action = clap::ArgAction::Append)]
    pub configs: Vec<PathBuf>,

    /// Console log level (0=silent, 1=errors, 2=warnings, 3=info, 4=debug, 5=trace, 6=dump).
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=6)
    )]
    pub log_level: Option<u8>,

    /// File log level, overrides --log-level for the log file.
    #[arg(long = "file-log-level", value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=6)
    )]
    pub file_log_level: Option<u8>,

    /// Path to log file.
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Writes console logs as JSON lines.
    #[arg(long = "json-logs")]
    pub json_logs: bool,

    /// Sets an option, such as 'server.bind=0.0.0.0:8787'.
    /// Can be specified multiple times.
    #[arg(short = 's', long = "set", value_name = "OPTION", action = clap::ArgAction::Append)]
    pub options: Vec<String>,

    /// Secret used to sign share links.
    #[arg(long = "share-secret", env = "SHARE_SECRET", value_name = "SECRET", hide_env_values = true)]
    pub share_secret: Option<String>,
}

impl GlobalOptions {
    /// Converts dedicated flags to configuration overrides.
    #[must_use]
    pub fn config_overrides(&self) -> Vec<(&'static str, String)> {
        let mut overrides = Vec::new();

        if let Some(level) = self.log_level {
            overrides.push(("global.output_log_level", level.to_string()));
        }

        // file_log_level falls back to log_level if not specified
        if let Some(level) = self.file_log_level.or(self.log_level) {
            overrides.push(("global.file_log_level", level.to_string()));
        }

        if let Some(ref path) = self.log_file {
            overrides.push(("global.log_file", path.display().to_string()));
        }

        if self.json_logs {
            overrides.push(("global.json_logs", "true".to_string()));
        }

        if let Some(ref secret) = self.share_secret {
            overrides.push(("share.secret", secret.clone()));
        }

        overrides
    }
}
