// ghman: GitHub Repository Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Structured repository paths.
//!
//! ```text
//! "docs/sub/b.md"  -->  [docs, sub, b.md]
//!
//! is_within("docs")      docs/a.md   yes
//!                        docs        yes
//!                        docsite/x   no   (segment-wise, not textual)
//!
//! rebase(docs -> documentation)
//!   docs/sub/b.md  -->  documentation/sub/b.md
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RequestError;

/// A non-empty, normalised path inside a repository tree.
///
/// Segments are never empty, `.` or `..`. Leading and trailing slashes in the
/// textual form are ignored, so `/docs/` and `docs` are the same path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepoPath {
    segments: Vec<String>,
}

impl RepoPath {
    /// Parse a slash-separated path.
    ///
    /// # Errors
    ///
    /// Returns `RequestError::InvalidPath` if the path is empty or contains an
    /// empty, `.` or `..` segment.
    pub fn parse(raw: &str) -> Result<Self, RequestError> {
        let trimmed = raw.trim_matches('/');
        if trimmed.is_empty() {
            return Err(invalid(raw, "path is empty"));
        }

        let mut segments = Vec::new();
        for segment in trimmed.split('/') {
            match segment {
                "" => return Err(invalid(raw, "empty path segment")),
                "." | ".." => return Err(invalid(raw, "relative path segment")),
                s => segments.push(s.to_string()),
            }
        }

        Ok(Self { segments })
    }

    /// Build a path from already-split segments.
    ///
    /// # Errors
    ///
    /// Same rules as [`RepoPath::parse`]; a segment may not contain `/`.
    pub fn from_segments<I, S>(segments: I) -> Result<Self, RequestError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        let joined = segments.join("/");
        if segments.is_empty() || segments.iter().any(|s| s.contains('/')) {
            return Err(invalid(&joined, "bad segment list"));
        }
        Self::parse(&joined)
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Last segment.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.segments.last().map_or("", String::as_str)
    }

    /// Lowercased extension of the last segment, if any.
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        let name = self.file_name();
        let (stem, ext) = name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }

    /// True if `self` equals `dir` or lies underneath it.
    #[must_use]
    pub fn is_within(&self, dir: &Self) -> bool {
        self.segments.starts_with(&dir.segments)
    }

    /// Replace the `from` prefix with `to`.
    ///
    /// Returns `None` if `self` is not within `from`.
    #[must_use]
    pub fn rebase(&self, from: &Self, to: &Self) -> Option<Self> {
        let rest = self.segments.strip_prefix(from.segments.as_slice())?;
        let mut segments = to.segments.clone();
        segments.extend_from_slice(rest);
        Some(Self { segments })
    }

    /// Split off the first `n` segments.
    ///
    /// Returns `None` unless at least one segment remains after the split.
    #[must_use]
    pub fn split_head(&self, n: usize) -> Option<(&[String], Self)> {
        if self.segments.len() <= n {
            return None;
        }
        let (head, tail) = self.segments.split_at(n);
        Some((
            head,
            Self {
                segments: tail.to_vec(),
            },
        ))
    }
}

fn invalid(raw: &str, reason: &'static str) -> RequestError {
    RequestError::InvalidPath {
        path: raw.to_string(),
        reason,
    }
}

impl fmt::Display for RepoPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

impl FromStr for RepoPath {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RepoPath {
    type Error = RequestError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RepoPath> for String {
    fn from(path: RepoPath) -> Self {
        path.to_string()
    }
}
