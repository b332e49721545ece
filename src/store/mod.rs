// ghman: GitHub Repository Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Remote content store adapter.
//!
//! ```text
//!            ContentStore (trait)
//!   read  stat  write  delete  list_tree
//!        |                     |
//!        v                     v
//!   GitHubStore            MemoryStore (tests)
//!   contents API           in-process map,
//!   raw host               same sha rules
//!   git trees API
//!        |
//!        +-- catalog passthroughs (repos, branches,
//!            search, stars, forks, releases)
//! ```
//!
//! # Key Types
//!
//! | Type            | Purpose                                   |
//! |-----------------|-------------------------------------------|
//! | `RepoRef`       | owner/repo/branch a request operates on   |
//! | `RepoPath`      | normalised path inside the tree           |
//! | `TreeEntry`     | one blob from the recursive listing       |
//! | `FileMeta`      | concurrency token (`sha`) and size        |
//! | `ContentObject` | file bytes plus their `sha`               |

pub mod catalog;
pub mod github;
#[cfg(test)]
pub(crate) mod memory;
mod path;

use std::fmt;
use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::StoreResult;

pub use path::RepoPath;

/// Branch used when a caller does not name one.
pub const DEFAULT_BRANCH: &str = "main";

/// Identifies the remote tree an operation targets.
///
/// The branch is chosen per request and never remembered server-side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
    #[serde(default = "default_branch")]
    pub branch: String,
}

fn default_branch() -> String {
    DEFAULT_BRANCH.to_string()
}

impl RepoRef {
    #[must_use]
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            branch: branch.into(),
        }
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.owner, self.repo, self.branch)
    }
}

/// A non-directory entry from a recursive tree listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeEntry {
    pub path: RepoPath,
    pub size: u64,
}

/// Metadata half of a file read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMeta {
    pub sha: String,
    pub size: u64,
}

/// A single file's payload plus its remote concurrency token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentObject {
    pub path: RepoPath,
    pub content: Vec<u8>,
    pub sha: String,
    pub size: u64,
}

/// Uniform single-file operations against a remote content store.
///
/// The store is the only source of truth. Implementations must enforce the
/// optimistic-concurrency rule: writing an existing path requires its current
/// `sha`, and writing without a `sha` fails with `Conflict` if the path exists.
pub trait ContentStore: Send + Sync {
    /// Read a file's bytes and metadata.
    ///
    /// Bytes and metadata may come from separate remote calls and are not
    /// guaranteed to be mutually consistent under a concurrent write.
    fn read(
        &self,
        repo: &RepoRef,
        path: &RepoPath,
    ) -> impl Future<Output = StoreResult<ContentObject>> + Send;

    /// Fetch the current `sha` and size of a file without its content.
    fn stat(
        &self,
        repo: &RepoRef,
        path: &RepoPath,
    ) -> impl Future<Output = StoreResult<FileMeta>> + Send;

    /// Create or update a file.
    ///
    /// `expected_sha` must be `None` only when the caller asserts the path does
    /// not exist yet.
    fn write(
        &self,
        repo: &RepoRef,
        path: &RepoPath,
        content: &[u8],
        expected_sha: Option<&str>,
        message: &str,
    ) -> impl Future<Output = StoreResult<ContentObject>> + Send;

    /// Delete a file at a known `sha`.
    fn delete(
        &self,
        repo: &RepoRef,
        path: &RepoPath,
        sha: &str,
        message: &str,
    ) -> impl Future<Output = StoreResult<()>> + Send;

    /// List every blob on the branch.
    ///
    /// This is the only directory index the store offers.
    fn list_tree(&self, repo: &RepoRef) -> impl Future<Output = StoreResult<Vec<TreeEntry>>> + Send;
}

/// Commit messages attached to remote writes.
pub mod message {
    use super::RepoPath;

    #[must_use]
    pub fn update(path: &RepoPath) -> String {
        format!("Update {path} via ghman")
    }

    #[must_use]
    pub fn upload(path: &RepoPath) -> String {
        format!("Upload {path} via ghman")
    }

    #[must_use]
    pub fn delete(path: &RepoPath) -> String {
        format!("Delete {path} via ghman")
    }

    #[must_use]
    pub fn rename(old: &RepoPath, new: &RepoPath) -> String {
        format!("Rename {old} to {new} via ghman")
    }
}

#[cfg(test)]
mod tests;
