// ghman: GitHub Repository Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use reqwest::StatusCode;

use super::github::classify_status;
use super::memory::{Fault, MemoryStore};
use super::{ContentStore, RepoPath, RepoRef};
use crate::error::StoreError;

fn p(raw: &str) -> RepoPath {
    RepoPath::parse(raw).expect("valid path")
}

fn repo() -> RepoRef {
    RepoRef::new("octo", "docs", "main")
}

// =============================================================================
// RepoPath
// =============================================================================

#[test]
fn test_path_parse_normalises_slashes() {
    assert_eq!(p("/docs/a.md/").to_string(), "docs/a.md");
    assert_eq!(p("docs/a.md").segments(), ["docs", "a.md"]);
}

#[test]
fn test_path_parse_rejects_bad_input() {
    for raw in ["", "/", "a//b", "a/./b", "../etc/passwd", "a/.."] {
        assert!(RepoPath::parse(raw).is_err(), "{raw:?} should be rejected");
    }
}

#[test]
fn test_is_within_is_segment_wise() {
    let docs = p("docs");
    assert!(p("docs").is_within(&docs));
    assert!(p("docs/a.md").is_within(&docs));
    assert!(p("docs/sub/b.md").is_within(&docs));
    assert!(!p("docsite/x.md").is_within(&docs));
    assert!(!p("ab/z.txt").is_within(&p("a")));
}

#[test]
fn test_rebase() {
    let old = p("docs");
    let new = p("documentation");
    assert_eq!(
        p("docs/sub/b.md").rebase(&old, &new).map(|x| x.to_string()),
        Some("documentation/sub/b.md".to_string())
    );
    // Only the prefix is replaced, not later occurrences
    assert_eq!(
        p("docs/docs/c.md").rebase(&old, &new).map(|x| x.to_string()),
        Some("documentation/docs/c.md".to_string())
    );
    assert_eq!(p("other/docs/a.md").rebase(&old, &new), None);
}

#[test]
fn test_extension() {
    assert_eq!(p("a/b/README.MD").extension().as_deref(), Some("md"));
    assert_eq!(p("a/.gitignore").extension(), None);
    assert_eq!(p("Makefile").extension(), None);
}

#[test]
fn test_split_head() {
    let full = p("octo/docs/main/sub/a.md");
    let (head, rest) = full.split_head(3).expect("enough segments");
    assert_eq!(head, ["octo", "docs", "main"]);
    assert_eq!(rest.to_string(), "sub/a.md");
    assert!(p("octo/docs/main").split_head(3).is_none());
}

#[test]
fn test_path_serde_as_string() {
    let json = serde_json::to_string(&p("a/b.txt")).unwrap();
    assert_eq!(json, "\"a/b.txt\"");
    let back: RepoPath = serde_json::from_str("\"/a/b.txt\"").unwrap();
    assert_eq!(back, p("a/b.txt"));
    assert!(serde_json::from_str::<RepoPath>("\"a/../b\"").is_err());
}

// =============================================================================
// MemoryStore concurrency tokens
// =============================================================================

#[tokio::test]
async fn test_stale_sha_is_conflict() {
    let store = MemoryStore::new();
    let repo = repo();
    let path = p("a.txt");

    let s1 = store.write(&repo, &path, b"x", None, "create").await.unwrap().sha;
    let s2 = store
        .write(&repo, &path, b"z", Some(&s1), "advance")
        .await
        .unwrap()
        .sha;
    assert_ne!(s1, s2);

    let result = store.write(&repo, &path, b"y", Some(&s1), "stale").await;
    assert!(matches!(result, Err(StoreError::Conflict { .. })));
    assert_eq!(store.content(&repo, &path).as_deref(), Some(&b"z"[..]));
}

#[tokio::test]
async fn test_omitted_sha_on_existing_path_is_conflict() {
    let store = MemoryStore::new();
    let repo = repo();
    let path = p("a.txt");
    store.insert(&repo, &path, "x");

    let result = store.write(&repo, &path, b"y", None, "blind").await;
    assert!(matches!(result, Err(StoreError::Conflict { .. })));
    assert_eq!(store.content(&repo, &path).as_deref(), Some(&b"x"[..]));
}

#[tokio::test]
async fn test_delete_requires_current_sha() {
    let store = MemoryStore::new();
    let repo = repo();
    let path = p("a.txt");
    let sha = store.insert(&repo, &path, "x");

    let stale = store.delete(&repo, &path, "0000", "stale").await;
    assert!(matches!(stale, Err(StoreError::Conflict { .. })));

    store.delete(&repo, &path, &sha, "ok").await.unwrap();
    let missing = store.read(&repo, &path).await;
    assert!(matches!(missing, Err(StoreError::NotFound { .. })));
}

#[tokio::test]
async fn test_injected_fault() {
    let store = MemoryStore::new();
    let repo = repo();
    let path = p("a.txt");
    store.insert(&repo, &path, "x");
    store.fail(Fault::Stat, &path);

    assert!(matches!(
        store.stat(&repo, &path).await,
        Err(StoreError::Remote { .. })
    ));
    // other operations are unaffected
    assert_eq!(store.read(&repo, &path).await.unwrap().content, b"x");
}

#[tokio::test]
async fn test_list_tree_is_per_branch() {
    let store = MemoryStore::new();
    let main = repo();
    let dev = RepoRef::new("octo", "docs", "dev");
    store.insert(&main, &p("a.txt"), "1");
    store.insert(&dev, &p("b.txt"), "22");

    let entries = store.list_tree(&dev).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].path, p("b.txt"));
    assert_eq!(entries[0].size, 2);

    let unknown = store.list_tree(&RepoRef::new("x", "y", "z")).await;
    assert!(matches!(unknown, Err(StoreError::NotFound { .. })));
}

// =============================================================================
// Upstream status classification
// =============================================================================

#[test]
fn test_classify_not_found() {
    let err = classify_status(StatusCode::NOT_FOUND, "docs/a.md", "", false);
    assert!(matches!(err, StoreError::NotFound { ref path } if path == "docs/a.md"));
}

#[test]
fn test_classify_conflict_only_for_mutations() {
    for status in [StatusCode::CONFLICT, StatusCode::UNPROCESSABLE_ENTITY] {
        assert!(matches!(
            classify_status(status, "a.txt", "", true),
            StoreError::Conflict { .. }
        ));
        assert!(matches!(
            classify_status(status, "a.txt", "", false),
            StoreError::Remote { .. }
        ));
    }
}

#[test]
fn test_classify_remote_keeps_upstream_message() {
    let err = classify_status(
        StatusCode::FORBIDDEN,
        "octo/docs",
        r#"{"message":"Resource not accessible by integration"}"#,
        false,
    );
    insta::assert_snapshot!(err.to_string(), @"remote error: octo/docs: Resource not accessible by integration");
    assert!(matches!(err, StoreError::Remote { status: Some(403), .. }));
}

#[test]
fn test_classify_remote_truncates_plain_body() {
    let body = "x".repeat(500);
    let StoreError::Remote { detail, .. } =
        classify_status(StatusCode::BAD_GATEWAY, "t", &body, false)
    else {
        panic!("expected remote error");
    };
    assert_eq!(detail.len(), "t: ".len() + 200);
}
