// ghman: GitHub Repository Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Signed share links.
//!
//! ```text
//! issue("octo/docs/main/a.md")
//!   sign = base36(|h(path ":" secret)|)
//!   url  = {base}/share/octo%2Fdocs%2Fmain%2Fa.md?sign=..[&encode=base64]&t=<ms>
//!
//! GET /share/{path}?sign=..
//!   verify(path, sign)  --no-->  InvalidSignature (403)
//!        | yes
//!   SharedFile::parse   --<4 segments-->  MalformedPath (400)
//!        |
//!   owner / repo / branch / file...
//! ```
//!
//! The hash is a 32-bit rolling hash over UTF-16 code units. It is not a MAC:
//! it only keeps casual guessing out and exists so that links issued by older
//! deployments keep verifying. A grant never expires; rotating the secret
//! revokes every link at once.

pub mod content_type;

use serde::Serialize;

use crate::error::{GhResult, RequestError, ShareError};
use crate::store::{RepoPath, RepoRef};

/// Secret used when none is configured.
pub const DEFAULT_SECRET: &str = "default-share-secret-change-me";

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Compute the share signature of `path` under `secret`.
#[must_use]
pub fn signature(path: &str, secret: &str) -> String {
    let hash = path
        .encode_utf16()
        .chain(":".encode_utf16())
        .chain(secret.encode_utf16())
        .fold(0_i32, |h, unit| {
            (h << 5).wrapping_sub(h).wrapping_add(i32::from(unit))
        });

    // widen first: |i32::MIN| does not fit in i32
    to_base36(i64::from(hash).unsigned_abs())
}

fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(BASE36[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

/// Optional transformation of shared content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareEncoding {
    /// Serve the file as base64 text.
    Base64,
}

impl ShareEncoding {
    /// Parse the `encode` query parameter. Unknown values mean raw content.
    #[must_use]
    pub fn from_param(value: &str) -> Option<Self> {
        value.eq_ignore_ascii_case("base64").then_some(Self::Base64)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Base64 => "base64",
        }
    }
}

/// An issued share link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareLink {
    pub url: String,
    pub sign: String,
}

/// Issues and verifies share signatures with one secret.
#[derive(Clone)]
pub struct ShareSigner {
    secret: String,
}

impl ShareSigner {
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// True if the built-in default secret is in use.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.secret == DEFAULT_SECRET
    }

    #[must_use]
    pub fn sign(&self, path: &str) -> String {
        signature(path, &self.secret)
    }

    /// Exact-match check of a presented signature.
    #[must_use]
    pub fn verify(&self, path: &str, sign: &str) -> bool {
        !sign.is_empty() && self.sign(path) == sign
    }

    /// Like [`ShareSigner::verify`], as a `Result`.
    ///
    /// # Errors
    ///
    /// Returns `ShareError::InvalidSignature` if `sign` is absent or wrong.
    pub fn check(&self, path: &str, sign: Option<&str>) -> Result<(), ShareError> {
        match sign {
            Some(sign) if self.verify(path, sign) => Ok(()),
            _ => Err(ShareError::InvalidSignature),
        }
    }

    /// Build a share link under `base`.
    ///
    /// `t` is a cache-buster only; it plays no part in verification.
    ///
    /// # Errors
    ///
    /// Returns `RequestError::InvalidBaseUrl` if `base` is not an absolute
    /// hierarchical URL.
    pub fn issue(
        &self,
        base: &str,
        path: &str,
        encoding: Option<ShareEncoding>,
        t: u128,
    ) -> GhResult<ShareLink> {
        let invalid = || RequestError::InvalidBaseUrl(base.to_string());
        let mut url = reqwest::Url::parse(base).map_err(|_| invalid())?;
        url.set_query(None);
        url.set_fragment(None);

        url.path_segments_mut()
            .map_err(|()| invalid())?
            .pop_if_empty()
            .push("share")
            .push(path);

        let sign = self.sign(path);
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("sign", &sign);
            if let Some(encoding) = encoding {
                query.append_pair("encode", encoding.as_str());
            }
            query.append_pair("t", &t.to_string());
        }

        Ok(ShareLink {
            url: url.into(),
            sign,
        })
    }
}

impl std::fmt::Debug for ShareSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShareSigner")
            .field("secret", &"[hidden]")
            .finish()
    }
}

/// Target of a share link: `owner/repo/branch/file...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedFile {
    pub repo: RepoRef,
    pub path: RepoPath,
}

impl SharedFile {
    /// Split a verified share path.
    ///
    /// # Errors
    ///
    /// Returns `ShareError::MalformedPath` unless the path has at least four
    /// valid segments.
    pub fn parse(raw: &str) -> Result<Self, ShareError> {
        let malformed = || ShareError::MalformedPath {
            path: raw.to_string(),
        };

        let full = RepoPath::parse(raw).map_err(|_| malformed())?;
        let (head, path) = full.split_head(3).ok_or_else(malformed)?;
        let [owner, repo, branch] = head else {
            return Err(malformed());
        };

        Ok(Self {
            repo: RepoRef::new(owner.as_str(), repo.as_str(), branch.as_str()),
            path,
        })
    }
}
