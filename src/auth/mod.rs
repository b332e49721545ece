// ghman: GitHub Repository Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Access control gate.
//!
//! ```text
//! X-Token ──> AccessGate::authorize
//!               1. admin secret   -> Admin
//!               2. editor secret  -> Write
//!               3. read secret    -> Read
//!               4. token table    -> per entry
//!               otherwise         -> None
//!
//! AccessGate::require(token, op)
//!   None              -> Unauthorized
//!   cap < op.required -> Forbidden
//!   else              -> Ok(cap)
//!
//! Capability:  Read < Write < Admin
//! ```
//!
//! The gate runs before any remote call so that a rejected caller learns
//! nothing about which paths exist.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::config::types::AuthConfig;
use crate::error::{AuthError, GhResult};

/// Header carrying the caller token.
pub const TOKEN_HEADER: &str = "X-Token";

/// Caller capability, totally ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Read,
    Write,
    Admin,
}

impl Capability {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "read" => Ok(Self::Read),
            "write" => Ok(Self::Write),
            "admin" => Ok(Self::Admin),
            other => Err(format!("unknown capability '{other}'")),
        }
    }
}

/// A gated operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Save,
    Upload,
    RenameFile,
    RenameDirectory,
    DeleteFiles,
    DeleteDirectory,
    Star,
    Unstar,
    Fork,
    CreateRelease,
    DeleteRelease,
    UploadAsset,
    DeleteRepository,
}

impl Operation {
    pub const ALL: [Self; 13] = [
        Self::Save,
        Self::Upload,
        Self::RenameFile,
        Self::RenameDirectory,
        Self::DeleteFiles,
        Self::DeleteDirectory,
        Self::Star,
        Self::Unstar,
        Self::Fork,
        Self::CreateRelease,
        Self::DeleteRelease,
        Self::UploadAsset,
        Self::DeleteRepository,
    ];

    /// Minimum capability needed.
    #[must_use]
    pub const fn required(self) -> Capability {
        match self {
            Self::DeleteRepository => Capability::Admin,
            _ => Capability::Write,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Save => "save",
            Self::Upload => "upload",
            Self::RenameFile => "rename-file",
            Self::RenameDirectory => "rename-dir",
            Self::DeleteFiles => "delete-files",
            Self::DeleteDirectory => "delete-dir",
            Self::Star => "star",
            Self::Unstar => "unstar",
            Self::Fork => "fork",
            Self::CreateRelease => "create-release",
            Self::DeleteRelease => "delete-release",
            Self::UploadAsset => "upload-asset",
            Self::DeleteRepository => "delete-repo",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Well-known placeholder tokens from the sample deployment file.
///
/// Only honoured when `auth.allow_demo_tokens` is set.
#[must_use]
pub fn demo_tokens() -> BTreeMap<String, Capability> {
    BTreeMap::from([
        ("your-read-uuid-here".to_string(), Capability::Read),
        ("your-editor-uuid-here".to_string(), Capability::Write),
        ("your-admin-uuid-here".to_string(), Capability::Admin),
    ])
}

/// Resolves caller tokens to capabilities.
///
/// Immutable after construction; shared by every request.
#[derive(Clone, Default, Builder)]
pub struct AccessGate {
    #[builder(into)]
    admin: Option<String>,
    #[builder(into)]
    editor: Option<String>,
    #[builder(into)]
    read: Option<String>,
    #[builder(default)]
    tokens: BTreeMap<String, Capability>,
}

impl AccessGate {
    /// Build a gate from the `[auth]` section.
    #[must_use]
    pub fn from_config(config: &AuthConfig) -> Self {
        let mut tokens = if config.allow_demo_tokens {
            demo_tokens()
        } else {
            BTreeMap::new()
        };
        tokens.extend(config.tokens.iter().map(|(k, v)| (k.clone(), *v)));

        Self {
            admin: config.admin_token.clone(),
            editor: config.editor_token.clone(),
            read: config.read_token.clone(),
            tokens,
        }
    }

    /// Resolve a token, or `None` if it is empty or unknown.
    #[must_use]
    pub fn authorize(&self, token: &str) -> Option<Capability> {
        if token.is_empty() {
            return None;
        }

        let secrets = [
            (&self.admin, Capability::Admin),
            (&self.editor, Capability::Write),
            (&self.read, Capability::Read),
        ];
        secrets
            .into_iter()
            .find(|(secret, _)| secret.as_deref().is_some_and(|s| !s.is_empty() && s == token))
            .map(|(_, cap)| cap)
            .or_else(|| self.tokens.get(token).copied())
    }

    /// Require enough capability for `operation`.
    ///
    /// # Errors
    ///
    /// `AuthError::Unauthorized` if the token is absent or unknown,
    /// `AuthError::Forbidden` if it resolves below the required capability.
    pub fn require(&self, token: Option<&str>, operation: Operation) -> GhResult<Capability> {
        let actual = token
            .and_then(|t| self.authorize(t))
            .ok_or(AuthError::Unauthorized)?;

        let required = operation.required();
        if actual < required {
            return Err(AuthError::Forbidden {
                operation,
                required,
                actual,
            }
            .into());
        }
        Ok(actual)
    }

    /// Whether any credential at all is configured.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        [&self.admin, &self.editor, &self.read]
            .iter()
            .any(|s| s.as_deref().is_some_and(|s| !s.is_empty()))
            || !self.tokens.is_empty()
    }
}

impl fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessGate")
            .field("admin", &self.admin.as_ref().map(|_| "[hidden]"))
            .field("editor", &self.editor.as_ref().map(|_| "[hidden]"))
            .field("read", &self.read.as_ref().map(|_| "[hidden]"))
            .field("tokens", &self.tokens.len())
            .finish()
    }
}

#[cfg(test)]
mod tests;
