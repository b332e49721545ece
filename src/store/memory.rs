// ghman: GitHub Repository Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! In-process [`ContentStore`] used as a test double; only built for tests.
//!
//! Enforces the same concurrency-token rules as the remote store and can be
//! told to fail individual operations to exercise partial-failure paths.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use super::{ContentObject, ContentStore, FileMeta, RepoPath, RepoRef, TreeEntry};
use crate::error::{StoreError, StoreResult};

/// Operation kinds that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Fault {
    Read,
    Stat,
    Write,
    Delete,
}

#[derive(Debug, Clone)]
struct Blob {
    content: Vec<u8>,
    sha: String,
}

type Tree = BTreeMap<RepoPath, Blob>;

/// An in-memory store holding any number of repository branches.
#[derive(Debug, Default)]
pub(crate) struct MemoryStore {
    trees: RwLock<BTreeMap<RepoRef, Tree>>,
    faults: RwLock<BTreeSet<(Fault, RepoPath)>>,
    next_sha: AtomicU64,
}

impl MemoryStore {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Seed a file directly, bypassing concurrency checks. Returns its `sha`.
    pub(crate) fn insert(&self, repo: &RepoRef, path: &RepoPath, content: impl Into<Vec<u8>>) -> String {
        let sha = self.fresh_sha();
        let mut trees = self.trees.write().unwrap_or_else(PoisonError::into_inner);
        trees.entry(repo.clone()).or_default().insert(
            path.clone(),
            Blob {
                content: content.into(),
                sha: sha.clone(),
            },
        );
        sha
    }

    /// Make every future `fault` operation on `path` fail with a remote error.
    pub(crate) fn fail(&self, fault: Fault, path: &RepoPath) {
        self.faults
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((fault, path.clone()));
    }

    /// Paths currently stored on a branch, sorted.
    #[must_use]
    pub(crate) fn paths(&self, repo: &RepoRef) -> Vec<String> {
        let trees = self.trees.read().unwrap_or_else(PoisonError::into_inner);
        trees
            .get(repo)
            .map(|tree| tree.keys().map(ToString::to_string).collect())
            .unwrap_or_default()
    }

    /// Raw bytes stored at a path, if any.
    #[must_use]
    pub(crate) fn content(&self, repo: &RepoRef, path: &RepoPath) -> Option<Vec<u8>> {
        let trees = self.trees.read().unwrap_or_else(PoisonError::into_inner);
        trees
            .get(repo)
            .and_then(|tree| tree.get(path))
            .map(|blob| blob.content.clone())
    }

    fn fresh_sha(&self) -> String {
        let n = self.next_sha.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{n:040x}")
    }

    fn check_fault(&self, fault: Fault, path: &RepoPath) -> StoreResult<()> {
        let faults = self.faults.read().unwrap_or_else(PoisonError::into_inner);
        if faults.contains(&(fault, path.clone())) {
            return Err(StoreError::remote(
                Some(500),
                format!("injected {fault:?} failure on {path}"),
            ));
        }
        Ok(())
    }

    fn lookup(&self, repo: &RepoRef, path: &RepoPath) -> StoreResult<Blob> {
        let trees = self.trees.read().unwrap_or_else(PoisonError::into_inner);
        trees
            .get(repo)
            .and_then(|tree| tree.get(path))
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                path: path.to_string(),
            })
    }
}

impl ContentStore for MemoryStore {
    async fn read(&self, repo: &RepoRef, path: &RepoPath) -> StoreResult<ContentObject> {
        self.check_fault(Fault::Read, path)?;
        let blob = self.lookup(repo, path)?;
        Ok(ContentObject {
            path: path.clone(),
            size: blob.content.len() as u64,
            content: blob.content,
            sha: blob.sha,
        })
    }

    async fn stat(&self, repo: &RepoRef, path: &RepoPath) -> StoreResult<FileMeta> {
        self.check_fault(Fault::Stat, path)?;
        let blob = self.lookup(repo, path)?;
        Ok(FileMeta {
            sha: blob.sha,
            size: blob.content.len() as u64,
        })
    }

    async fn write(
        &self,
        repo: &RepoRef,
        path: &RepoPath,
        content: &[u8],
        expected_sha: Option<&str>,
        _message: &str,
    ) -> StoreResult<ContentObject> {
        self.check_fault(Fault::Write, path)?;

        let sha = self.fresh_sha();
        let mut trees = self.trees.write().unwrap_or_else(PoisonError::into_inner);
        let tree = trees.entry(repo.clone()).or_default();

        let conflict = match (tree.get(path), expected_sha) {
            (None, None) => false,
            (Some(current), Some(expected)) => current.sha != expected,
            // create over an existing path, or update of a missing one
            (Some(_), None) | (None, Some(_)) => true,
        };
        if conflict {
            return Err(StoreError::Conflict {
                path: path.to_string(),
            });
        }

        tree.insert(
            path.clone(),
            Blob {
                content: content.to_vec(),
                sha: sha.clone(),
            },
        );

        Ok(ContentObject {
            path: path.clone(),
            content: content.to_vec(),
            sha,
            size: content.len() as u64,
        })
    }

    async fn delete(
        &self,
        repo: &RepoRef,
        path: &RepoPath,
        sha: &str,
        _message: &str,
    ) -> StoreResult<()> {
        self.check_fault(Fault::Delete, path)?;

        let mut trees = self.trees.write().unwrap_or_else(PoisonError::into_inner);
        let tree = trees
            .get_mut(repo)
            .ok_or_else(|| StoreError::NotFound {
                path: path.to_string(),
            })?;

        match tree.get(path) {
            None => Err(StoreError::NotFound {
                path: path.to_string(),
            }),
            Some(current) if current.sha != sha => Err(StoreError::Conflict {
                path: path.to_string(),
            }),
            Some(_) => {
                tree.remove(path);
                Ok(())
            }
        }
    }

    async fn list_tree(&self, repo: &RepoRef) -> StoreResult<Vec<TreeEntry>> {
        let trees = self.trees.read().unwrap_or_else(PoisonError::into_inner);
        let tree = trees.get(repo).ok_or_else(|| StoreError::NotFound {
            path: repo.to_string(),
        })?;
        Ok(tree
            .iter()
            .map(|(path, blob)| TreeEntry {
                path: path.clone(),
                size: blob.content.len() as u64,
            })
            .collect())
    }
}
