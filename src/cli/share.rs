// ghman: GitHub Repository Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Offline share-link commands.

use clap::{Args, ValueEnum};

use crate::share::ShareEncoding;

/// Content transformation requested for a share link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EncodeArg {
    Base64,
}

impl From<EncodeArg> for ShareEncoding {
    fn from(arg: EncodeArg) -> Self {
        match arg {
            EncodeArg::Base64 => Self::Base64,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct ShareArgs {
    /// Share path: owner/repo/branch/file...
    #[arg(value_name = "PATH")]
    pub path: String,

    /// Serve the file base64-encoded.
    #[arg(short = 'e', long, value_enum)]
    pub encode: Option<EncodeArg>,

    /// Base URL of the service; defaults to server.public_url, then the bind address.
    #[arg(long = "base-url", value_name = "URL")]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct VerifyShareArgs {
    /// Share path: owner/repo/branch/file...
    #[arg(value_name = "PATH")]
    pub path: String,

    /// Signature to check.
    #[arg(value_name = "SIGN")]
    pub sign: String,
}
