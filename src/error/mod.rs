// ghman: GitHub Repository Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!                GhError (16 bytes)
//!                      |
//!   +--------+-------+-------+--------+--------+------+
//!   v        v       v       v        v        v      v
//! Store    Auth    Share  Request  Config     Io   (all boxed)
//!
//! Sub-errors:
//!   Store    NotFound, Conflict, Remote
//!   Auth     Unauthorized, Forbidden
//!   Share    InvalidSignature, MalformedPath
//!   Request  MissingParam, InvalidPath, SamePath, InvalidBody, ...
//!   Config   ParseError, MissingKey, InvalidValue
//!
//! ErrorKind collapses the tree into the caller-visible taxonomy:
//!   NotFound Conflict Unauthorized Forbidden Remote
//!   InvalidSignature InvalidRequest Internal
//! ```

use thiserror::Error;

use crate::auth::{Capability, Operation};

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`GhError`].
pub type GhResult<T> = std::result::Result<T, GhError>;

/// Result type for remote content store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Top-level library error type.
///
/// All sub-errors are boxed to keep this enum at 16 bytes on the stack.
#[derive(Debug, Error)]
pub enum GhError {
    /// Remote content store operation failed.
    #[error("store error: {0}")]
    Store(#[from] Box<StoreError>),

    /// Caller is not allowed to perform the operation.
    #[error("auth error: {0}")]
    Auth(#[from] Box<AuthError>),

    /// Share link could not be verified.
    #[error("share error: {0}")]
    Share(#[from] Box<ShareError>),

    /// Request was malformed.
    #[error("invalid request: {0}")]
    Request(#[from] Box<RequestError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),
}

/// Caller-visible error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    Unauthorized,
    Forbidden,
    Remote,
    InvalidSignature,
    InvalidRequest,
    Internal,
}

impl GhError {
    /// Classify this error into the caller-visible taxonomy.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Store(err) => match **err {
                StoreError::NotFound { .. } | StoreError::EmptyDirectory { .. } => {
                    ErrorKind::NotFound
                }
                StoreError::Conflict { .. } => ErrorKind::Conflict,
                StoreError::Remote { .. } => ErrorKind::Remote,
            },
            Self::Auth(err) => match **err {
                AuthError::Unauthorized => ErrorKind::Unauthorized,
                AuthError::Forbidden { .. } => ErrorKind::Forbidden,
            },
            Self::Share(err) => match **err {
                ShareError::InvalidSignature => ErrorKind::InvalidSignature,
                ShareError::MalformedPath { .. } => ErrorKind::InvalidRequest,
            },
            Self::Request(_) => ErrorKind::InvalidRequest,
            Self::Config(_) | Self::Io(_) => ErrorKind::Internal,
        }
    }

    /// Message that is safe to hand back to an untrusted caller.
    ///
    /// Remote and internal failures collapse to a generic message; their
    /// details belong in the log, not in a response.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Store(err) => match **err {
                StoreError::Remote { .. } => "upstream request failed".to_string(),
                _ => err.to_string(),
            },
            Self::Auth(err) => err.to_string(),
            Self::Share(err) => err.to_string(),
            Self::Request(err) => err.to_string(),
            Self::Config(_) | Self::Io(_) => "internal error".to_string(),
        }
    }
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for GhError {
                fn from(err: $error) -> Self {
                    GhError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    StoreError => Store,
    AuthError => Auth,
    ShareError => Share,
    RequestError => Request,
    ConfigError => Config,
    std::io::Error => Io,
}

// --- Store Errors ---

/// Remote content store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Path or repository does not exist upstream.
    #[error("not found: {path}")]
    NotFound { path: String },

    /// A directory-scoped operation matched no files.
    #[error("directory not found or empty: {path}")]
    EmptyDirectory { path: String },

    /// Stale or missing concurrency token on write/delete.
    #[error("conflict: {path} was modified or already exists")]
    Conflict { path: String },

    /// Opaque upstream failure (network, malformed response, unclassified status).
    #[error("remote error: {detail}")]
    Remote { status: Option<u16>, detail: String },
}

impl StoreError {
    pub(crate) fn remote(status: Option<u16>, detail: impl Into<String>) -> Self {
        Self::Remote {
            status,
            detail: detail.into(),
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        // reqwest errors carry the URL but never request headers
        Self::remote(err.status().map(|s| s.as_u16()), err.to_string())
    }
}

// --- Auth Errors ---

/// Access control errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Missing or unrecognised caller token.
    #[error("unauthorized")]
    Unauthorized,

    /// Valid token, but its capability is too low for the operation.
    #[error("{operation} requires {required} permission, caller has {actual}")]
    Forbidden {
        operation: Operation,
        required: Capability,
        actual: Capability,
    },
}

// --- Share Errors ---

/// Share-link errors.
#[derive(Debug, Error)]
pub enum ShareError {
    /// Signature missing or does not match the path.
    #[error("invalid share link")]
    InvalidSignature,

    /// Shared path is not of the form `owner/repo/branch/file`.
    #[error("malformed share path: {path}")]
    MalformedPath { path: String },
}

// --- Request Errors ---

/// Malformed caller input.
#[derive(Debug, Error)]
pub enum RequestError {
    /// A required parameter was not supplied.
    #[error("missing parameter '{0}'")]
    MissingParam(&'static str),

    /// A repository path could not be parsed.
    #[error("invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: &'static str },

    /// Source and destination of a rename are identical.
    #[error("source and destination are the same: {path}")]
    SamePath { path: String },

    /// A bulk operation was given nothing to do.
    #[error("no files given")]
    NoFiles,

    /// Request body could not be decoded.
    #[error("invalid body: {0}")]
    InvalidBody(String),

    /// Uploaded content was not valid base64.
    #[error("content is not valid base64")]
    InvalidBase64,

    /// Release asset upload URL does not point at the uploads host.
    #[error("upload url is not allowed: {0}")]
    UploadUrlRejected(String),

    /// A share base URL could not be used.
    #[error("invalid base url '{0}'")]
    InvalidBaseUrl(String),
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration.
    #[error("failed to parse config '{path}': {message}")]
    ParseError { path: String, message: String },

    /// Missing required configuration key.
    #[error("missing required config key '{key}' in section '[{section}]'")]
    MissingKey { section: String, key: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}
