// ghman: GitHub Repository Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! GitHub-backed [`ContentStore`].
//!
//! ```text
//! read(ref, path)
//!   GET {raw}/{owner}/{repo}/{branch}/{path}?t=<ms>   bytes (no-cache)
//!   GET {api}/repos/{o}/{r}/contents/{path}?ref=..    sha + size
//!
//! write  PUT    {api}/repos/{o}/{r}/contents/{path}  {message, content(b64), branch, sha?}
//! delete DELETE {api}/repos/{o}/{r}/contents/{path}  {message, sha, branch}
//! tree   GET    {api}/repos/{o}/{r}/git/trees/{branch}?recursive=1  -> blobs
//!
//! status 404          -> NotFound
//! status 409/422      -> Conflict (write/delete only)
//! anything else / io  -> Remote
//! ```

use std::time::{SystemTime, UNIX_EPOCH};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::header::{ACCEPT, CACHE_CONTROL, PRAGMA};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{ContentObject, ContentStore, FileMeta, RepoPath, RepoRef, TreeEntry};
use crate::config::types::GitHubConfig;
use crate::error::{ConfigError, GhResult, StoreError, StoreResult};

const API_VERSION: &str = "2022-11-28";
const MEDIA_TYPE: &str = "application/vnd.github+json";
const NO_CACHE: &str = "no-cache, no-store, must-revalidate";

/// Remote content store backed by the GitHub REST API.
///
/// All callers share the single server-held bearer token; callers never hold
/// GitHub credentials themselves.
#[derive(Clone)]
pub struct GitHubStore {
    client: Client,
    api_base: Url,
    raw_base: Url,
    uploads_base: Url,
    token: Option<String>,
}

impl GitHubStore {
    /// Create a store from configuration.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::InvalidValue` if a base URL cannot be parsed or
    /// the HTTP client cannot be constructed.
    pub fn new(config: &GitHubConfig) -> GhResult<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| invalid_config("user_agent", e.to_string()))?;

        Ok(Self {
            client,
            api_base: parse_base("api_url", &config.api_url)?,
            raw_base: parse_base("raw_url", &config.raw_url)?,
            uploads_base: parse_base("uploads_url", &config.uploads_url)?,
            token: config.token.clone().filter(|t| !t.is_empty()),
        })
    }

    /// Whether a server credential is configured.
    #[must_use]
    pub const fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub(crate) const fn uploads_base(&self) -> &Url {
        &self.uploads_base
    }

    /// Build an API URL from path segments.
    pub(crate) fn api_url<I, S>(&self, segments: I) -> Url
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        endpoint(&self.api_base, segments)
    }

    fn contents_url(&self, repo: &RepoRef, path: &RepoPath) -> Url {
        let head = ["repos", repo.owner.as_str(), repo.repo.as_str(), "contents"];
        self.api_url(
            head.into_iter()
                .chain(path.segments().iter().map(String::as_str)),
        )
    }

    fn raw_url(&self, repo: &RepoRef, path: &RepoPath) -> Url {
        let mut url = endpoint(
            &self.raw_base,
            [repo.owner.as_str(), repo.repo.as_str()]
                .into_iter()
                .chain(repo.branch.split('/'))
                .chain(path.segments().iter().map(String::as_str)),
        );
        url.query_pairs_mut()
            .append_pair("t", &cache_buster().to_string());
        url
    }

    /// Start an authenticated request.
    pub(crate) fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self
            .client
            .request(method, url)
            .header(ACCEPT, MEDIA_TYPE)
            .header("X-GitHub-Api-Version", API_VERSION);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and classify any non-success status.
    ///
    /// `target` names the thing being operated on for error messages;
    /// `mutation` enables the 409/422 → Conflict mapping.
    pub(crate) async fn send(
        &self,
        builder: RequestBuilder,
        target: &str,
        mutation: bool,
    ) -> StoreResult<Response> {
        let response = builder.send().await.map_err(|e| {
            warn!(resource = target, error = %e, "remote request failed to complete");
            StoreError::from(e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        debug!(resource = target, status = status.as_u16(), body = %body, "remote returned error status");
        Err(classify_status(status, target, &body, mutation))
    }
}

impl std::fmt::Debug for GitHubStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubStore")
            .field("api_base", &self.api_base.as_str())
            .field("raw_base", &self.raw_base.as_str())
            .field("uploads_base", &self.uploads_base.as_str())
            .field("token", &self.token.as_ref().map(|_| "[hidden]"))
            .finish_non_exhaustive()
    }
}

/// Map a non-success upstream status to a store error.
pub(crate) fn classify_status(
    status: StatusCode,
    target: &str,
    body: &str,
    mutation: bool,
) -> StoreError {
    match status {
        StatusCode::NOT_FOUND => StoreError::NotFound {
            path: target.to_string(),
        },
        StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY if mutation => {
            StoreError::Conflict {
                path: target.to_string(),
            }
        }
        _ => StoreError::remote(
            Some(status.as_u16()),
            format!("{target}: {}", upstream_message(body)),
        ),
    }
}

/// Extract GitHub's `message` field from an error body, if present.
fn upstream_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        message: String,
    }

    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| body.chars().take(200).collect())
}

fn endpoint<I, S>(base: &Url, segments: I) -> Url
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut url = base.clone();
    // parse_base guarantees the base can carry path segments
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

fn parse_base(key: &str, raw: &str) -> GhResult<Url> {
    let url = Url::parse(raw).map_err(|e| invalid_config(key, format!("'{raw}': {e}")))?;
    if url.cannot_be_a_base() {
        return Err(invalid_config(key, format!("'{raw}' cannot be a base url")));
    }
    Ok(url)
}

fn invalid_config(key: &str, message: String) -> crate::error::GhError {
    ConfigError::InvalidValue {
        section: "github".to_string(),
        key: key.to_string(),
        message,
    }
    .into()
}

/// Milliseconds since the epoch, used to defeat intermediate caches.
pub(crate) fn cache_buster() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

// --- Wire types ---

#[derive(Deserialize)]
struct ContentsMeta {
    sha: String,
    size: Option<u64>,
}

#[derive(Serialize)]
struct WriteBody<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

#[derive(Deserialize)]
struct WriteResponse {
    content: ContentsMeta,
}

#[derive(Serialize)]
struct DeleteBody<'a> {
    message: &'a str,
    sha: &'a str,
    branch: &'a str,
}

#[derive(Deserialize)]
struct TreeResponse {
    #[serde(default)]
    tree: Vec<TreeItem>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Deserialize)]
struct TreeItem {
    path: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    size: u64,
}

impl ContentStore for GitHubStore {
    async fn read(&self, repo: &RepoRef, path: &RepoPath) -> StoreResult<ContentObject> {
        let target = path.to_string();
        debug!(%repo, path = %target, "reading raw content");

        let response = self
            .send(
                self.request(Method::GET, self.raw_url(repo, path))
                    .header(CACHE_CONTROL, NO_CACHE)
                    .header(PRAGMA, "no-cache"),
                &target,
                false,
            )
            .await?;
        let content = response.bytes().await?.to_vec();

        // Separate call: bytes and sha may disagree if a write lands in between
        let meta = self.stat(repo, path).await?;

        Ok(ContentObject {
            path: path.clone(),
            size: if meta.size == 0 {
                content.len() as u64
            } else {
                meta.size
            },
            content,
            sha: meta.sha,
        })
    }

    async fn stat(&self, repo: &RepoRef, path: &RepoPath) -> StoreResult<FileMeta> {
        let mut url = self.contents_url(repo, path);
        url.query_pairs_mut().append_pair("ref", &repo.branch);

        let response = self
            .send(self.request(Method::GET, url), &path.to_string(), false)
            .await?;
        let meta: ContentsMeta = response.json().await?;

        Ok(FileMeta {
            sha: meta.sha,
            size: meta.size.unwrap_or_default(),
        })
    }

    async fn write(
        &self,
        repo: &RepoRef,
        path: &RepoPath,
        content: &[u8],
        expected_sha: Option<&str>,
        message: &str,
    ) -> StoreResult<ContentObject> {
        let target = path.to_string();
        debug!(%repo, path = %target, update = expected_sha.is_some(), "writing file");

        let body = WriteBody {
            message,
            content: BASE64.encode(content),
            branch: &repo.branch,
            sha: expected_sha,
        };
        let response = self
            .send(
                self.request(Method::PUT, self.contents_url(repo, path))
                    .json(&body),
                &target,
                true,
            )
            .await?;
        let written: WriteResponse = response.json().await?;

        Ok(ContentObject {
            path: path.clone(),
            content: content.to_vec(),
            sha: written.content.sha,
            size: written
                .content
                .size
                .unwrap_or(content.len() as u64),
        })
    }

    async fn delete(
        &self,
        repo: &RepoRef,
        path: &RepoPath,
        sha: &str,
        message: &str,
    ) -> StoreResult<()> {
        let target = path.to_string();
        debug!(%repo, path = %target, "deleting file");

        let body = DeleteBody {
            message,
            sha,
            branch: &repo.branch,
        };
        self.send(
            self.request(Method::DELETE, self.contents_url(repo, path))
                .json(&body),
            &target,
            true,
        )
        .await?;
        Ok(())
    }

    async fn list_tree(&self, repo: &RepoRef) -> StoreResult<Vec<TreeEntry>> {
        let mut url = self.api_url(
            ["repos", repo.owner.as_str(), repo.repo.as_str(), "git", "trees"]
                .into_iter()
                .chain(repo.branch.split('/')),
        );
        url.query_pairs_mut().append_pair("recursive", "1");

        let response = self
            .send(self.request(Method::GET, url), &repo.to_string(), false)
            .await?;
        let listing: TreeResponse = response.json().await?;

        if listing.truncated {
            warn!(%repo, "tree listing was truncated by the remote; some files are missing");
        }

        let entries = listing
            .tree
            .into_iter()
            .filter(|item| item.kind == "blob")
            .filter_map(|item| match RepoPath::parse(&item.path) {
                Ok(path) => Some(TreeEntry {
                    path,
                    size: item.size,
                }),
                Err(e) => {
                    warn!(%repo, path = %item.path, error = %e, "skipping unparseable tree entry");
                    None
                }
            })
            .collect::<Vec<_>>();

        debug!(%repo, count = entries.len(), "listed tree");
        Ok(entries)
    }
}
