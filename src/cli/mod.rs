// ghman: GitHub Repository Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for ghman using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! ghman [global options] <command>
//! serve [--bind ADDR] [--public-url URL] [--github-token T] [--*-token T]
//! share <PATH> [--encode base64] [--base-url URL]
//! verify-share <PATH> <SIGN>
//! options
//! inis
//! version
//! ```

pub mod global;
pub mod serve;
pub mod share;


use crate::cli::global::GlobalOptions;
use crate::cli::serve::ServeArgs;
use crate::cli::share::{ShareArgs, VerifyShareArgs};
use clap::{Parser, Subcommand};

/// GitHub Repository Manager
///
/// A stateless HTTP service for editing repository trees with per-token
/// access control and signed share links.
#[derive(Debug, Parser)]
#[command(
    name = "ghman",
    author,
    version,
    about = "GitHub Repository Manager",
    long_about = "ghman Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  A stateless HTTP service that edits GitHub repository trees\n\
                  on behalf of token holders and serves signed share links.\n\n\
                  Run `ghman serve` to start the service. See\n\
                  `ghman <command> --help` for more information about a command.",
    after_help = "CONFIG FILES:\n\n\
                  ghman reads `ghman.toml` from the current directory if present.\n\
                  Additional files can be given with --config; later files override\n\
                  earlier ones. GHMAN_* environment variables come next (use `__`\n\
                  between section and key, e.g. GHMAN_GITHUB__TOKEN), then --set\n\
                  and the dedicated flags."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,

    /// Lists all options and their values.
    Options,

    /// Lists the configuration files in use.
    Inis,

    /// Runs the HTTP service until interrupted.
    Serve(ServeArgs),

    /// Prints a signed share link for a file.
    Share(ShareArgs),

    /// Checks a share signature; exits non-zero if it does not match.
    #[command(name = "verify-share")]
    VerifyShare(VerifyShareArgs),
}

impl Cli {
    /// Configuration overrides implied by flags, as `(key, value)` pairs.
    ///
    /// Applied after `--set`, so dedicated flags win.
    #[must_use]
    pub fn config_overrides(&self) -> Vec<(&'static str, String)> {
        let mut overrides = self.global.config_overrides();
        if let Some(Command::Serve(args)) = &self.command {
            overrides.extend(args.config_overrides());
        }
        overrides
    }

    /// True for commands that only need built-in information.
    #[must_use]
    pub const fn skips_config(&self) -> bool {
        matches!(self.command, None | Some(Command::Version | Command::Inis))
    }
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
