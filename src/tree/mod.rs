// ghman: GitHub Repository Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Directory-wide operations over a single-file store.
//!
//! ```text
//! delete_directory(dir)
//!   list_tree ──> select path == dir or under dir (segment-wise)
//!     empty  -> EmptyDirectory
//!     each   -> stat (fresh sha) -> delete      failures: warn + continue
//!
//! rename_directory(old, new)
//!   list_tree ──> select under old
//!     each   -> rename_file(p, p.rebase(old, new))
//!
//! rename_file(old, new)
//!   read old ──> write new (no sha) ──> delete old (original sha)
//!                 fail: abort,          fail: both copies remain
//!                 old untouched
//! ```
//!
//! Bulk operations take one snapshot of the tree and never re-list. Files are
//! processed strictly one at a time; a failed file is neither retried nor
//! rolled back.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{GhResult, RequestError, StoreError};
use crate::store::{ContentStore, RepoPath, RepoRef, message};

/// Result of a bulk operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkOutcome {
    /// Files processed successfully.
    pub count: usize,
    /// Files whose operation failed.
    pub failed: Vec<RepoPath>,
}

impl BulkOutcome {
    fn record(&mut self, path: &RepoPath, result: GhResult<()>, action: &str) {
        match result {
            Ok(()) => self.count += 1,
            Err(e) => {
                warn!(path = %path, error = %e, "{action} failed, continuing");
                self.failed.push(path.clone());
            }
        }
    }
}

/// Files under `dir` in one snapshot of the tree.
async fn select<S: ContentStore>(
    store: &S,
    repo: &RepoRef,
    dir: &RepoPath,
) -> GhResult<Vec<RepoPath>> {
    let selected: Vec<RepoPath> = store
        .list_tree(repo)
        .await?
        .into_iter()
        .map(|entry| entry.path)
        .filter(|path| path.is_within(dir))
        .collect();

    if selected.is_empty() {
        return Err(StoreError::EmptyDirectory {
            path: dir.to_string(),
        }
        .into());
    }
    debug!(%repo, dir = %dir, count = selected.len(), "selected files");
    Ok(selected)
}

async fn delete_one<S: ContentStore>(store: &S, repo: &RepoRef, path: &RepoPath) -> GhResult<()> {
    let meta = store.stat(repo, path).await?;
    store
        .delete(repo, path, &meta.sha, &message::delete(path))
        .await?;
    Ok(())
}

/// Delete every file at or under `dir`.
///
/// # Errors
///
/// Returns `EmptyDirectory` if nothing matched, or the listing error. Per-file
/// failures are reported in the outcome instead.
pub async fn delete_directory<S: ContentStore>(
    store: &S,
    repo: &RepoRef,
    dir: &RepoPath,
) -> GhResult<BulkOutcome> {
    let mut outcome = BulkOutcome::default();
    for path in select(store, repo, dir).await? {
        let result = delete_one(store, repo, &path).await;
        outcome.record(&path, result, "delete");
    }

    info!(%repo, dir = %dir, count = outcome.count, failed = outcome.failed.len(), "deleted directory");
    Ok(outcome)
}

/// Delete an explicit list of files.
///
/// # Errors
///
/// Returns `NoFiles` if `paths` is empty. Per-file failures are reported in
/// the outcome.
pub async fn delete_files<S: ContentStore>(
    store: &S,
    repo: &RepoRef,
    paths: &[RepoPath],
) -> GhResult<BulkOutcome> {
    if paths.is_empty() {
        return Err(RequestError::NoFiles.into());
    }

    let mut outcome = BulkOutcome::default();
    for path in paths {
        let result = delete_one(store, repo, path).await;
        outcome.record(path, result, "delete");
    }

    info!(%repo, count = outcome.count, failed = outcome.failed.len(), "deleted files");
    Ok(outcome)
}

/// Move one file by copy-then-delete. Not atomic.
///
/// # Errors
///
/// - `SamePath` if `old == new`, before any remote call.
/// - `NotFound` if `old` does not exist.
/// - The create error (usually `Conflict`) if `new` cannot be written; `old`
///   is left untouched.
/// - The delete error if `old` cannot be removed; both copies then exist.
pub async fn rename_file<S: ContentStore>(
    store: &S,
    repo: &RepoRef,
    old: &RepoPath,
    new: &RepoPath,
) -> GhResult<()> {
    if old == new {
        return Err(RequestError::SamePath {
            path: old.to_string(),
        }
        .into());
    }

    let original = store.read(repo, old).await?;
    let msg = message::rename(old, new);

    store.write(repo, new, &original.content, None, &msg).await?;

    if let Err(e) = store.delete(repo, old, &original.sha, &msg).await {
        warn!(%repo, old = %old, new = %new, error = %e, "copy written but original not removed");
        return Err(e.into());
    }

    debug!(%repo, old = %old, new = %new, "renamed file");
    Ok(())
}

/// Move every file at or under `old` to the same relative place under `new`.
///
/// # Errors
///
/// `SamePath` if `old == new`; `EmptyDirectory` if nothing matched; the
/// listing error. Per-file failures are reported in the outcome.
pub async fn rename_directory<S: ContentStore>(
    store: &S,
    repo: &RepoRef,
    old: &RepoPath,
    new: &RepoPath,
) -> GhResult<BulkOutcome> {
    if old == new {
        return Err(RequestError::SamePath {
            path: old.to_string(),
        }
        .into());
    }

    let mut outcome = BulkOutcome::default();
    for path in select(store, repo, old).await? {
        let result = match path.rebase(old, new) {
            Some(target) => rename_file(store, repo, &path, &target).await,
            None => Err(RequestError::InvalidPath {
                path: path.to_string(),
                reason: "not under source directory",
            }
            .into()),
        };
        outcome.record(&path, result, "rename");
    }

    info!(%repo, old = %old, new = %new, count = outcome.count, failed = outcome.failed.len(), "renamed directory");
    Ok(outcome)
}
