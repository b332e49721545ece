// ghman: GitHub Repository Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Repository catalog passthroughs.
//!
//! Thin wrappers over the GitHub REST API that do not touch file content:
//! repository listings, branches, search, stars, forks, releases and
//! repository deletion. Listings are mapped to typed summaries; release
//! payloads are passed through as JSON.

use reqwest::Method;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::github::GitHubStore;
use super::{DEFAULT_BRANCH, RepoRef};
use crate::error::{GhResult, RequestError, StoreResult};

/// Where a repository in a listing came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepoSource {
    Owned,
    Fork,
    Starred,
    Search,
    Fallback,
}

/// Summary of one repository as shown to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoSummary {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub source: RepoSource,
    pub private: bool,
    pub description: Option<String>,
    pub stars: u64,
    pub forks: u64,
    pub language: Option<String>,
}

impl RepoSummary {
    /// Summary for a configured fallback repository.
    #[must_use]
    pub fn fallback(repo: &RepoRef) -> Self {
        Self {
            owner: repo.owner.clone(),
            repo: repo.repo.clone(),
            branch: repo.branch.clone(),
            source: RepoSource::Fallback,
            private: false,
            description: None,
            stars: 0,
            forks: 0,
            language: None,
        }
    }
}

/// Grouped repository listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Repositories {
    pub owned: Vec<RepoSummary>,
    pub forked: Vec<RepoSummary>,
    pub starred: Vec<RepoSummary>,
}

/// One branch of a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchInfo {
    pub name: String,
    #[serde(default)]
    pub protected: bool,
}

/// Fields accepted when creating a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRelease {
    pub tag_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub prerelease: bool,
}

#[derive(Deserialize)]
struct ApiOwner {
    login: String,
}

#[derive(Deserialize)]
struct ApiRepo {
    name: String,
    owner: ApiOwner,
    default_branch: Option<String>,
    #[serde(default)]
    fork: bool,
    #[serde(default)]
    private: bool,
    description: Option<String>,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
    language: Option<String>,
}

impl ApiRepo {
    fn into_summary(self, source: RepoSource) -> RepoSummary {
        RepoSummary {
            owner: self.owner.login,
            repo: self.name,
            branch: self
                .default_branch
                .unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
            source,
            private: self.private,
            description: self.description,
            stars: self.stargazers_count,
            forks: self.forks_count,
            language: self.language,
        }
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<ApiRepo>,
}

impl GitHubStore {
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: reqwest::Url,
        target: &str,
    ) -> StoreResult<T> {
        let response = self
            .send(self.request(Method::GET, url), target, false)
            .await?;
        Ok(response.json().await?)
    }

    /// Repositories the token's user owns or collaborates on, split into
    /// owned and forked.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the listing cannot be fetched.
    pub async fn list_user_repos(&self) -> StoreResult<(Vec<RepoSummary>, Vec<RepoSummary>)> {
        let mut url = self.api_url(["user", "repos"]);
        url.query_pairs_mut()
            .append_pair("per_page", "100")
            .append_pair("sort", "updated")
            .append_pair("affiliation", "owner,collaborator");

        let repos: Vec<ApiRepo> = self.get_json(url, "user/repos").await?;
        let (forked, owned): (Vec<_>, Vec<_>) = repos.into_iter().partition(|r| r.fork);

        Ok((
            owned
                .into_iter()
                .map(|r| r.into_summary(RepoSource::Owned))
                .collect(),
            forked
                .into_iter()
                .map(|r| r.into_summary(RepoSource::Fork))
                .collect(),
        ))
    }

    /// Repositories starred by the token's user.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the listing cannot be fetched.
    pub async fn list_starred(&self) -> StoreResult<Vec<RepoSummary>> {
        let mut url = self.api_url(["user", "starred"]);
        url.query_pairs_mut()
            .append_pair("per_page", "100")
            .append_pair("sort", "updated");

        let repos: Vec<ApiRepo> = self.get_json(url, "user/starred").await?;
        Ok(repos
            .into_iter()
            .map(|r| r.into_summary(RepoSource::Starred))
            .collect())
    }

    /// Combined listing for the repository picker.
    ///
    /// Starred repositories already present in owned or forked are dropped.
    /// If the owned listing fails, `fallback` is reported as owned instead;
    /// a failed starred listing yields an empty list.
    pub async fn repositories(&self, fallback: &[RepoRef]) -> Repositories {
        let (user, starred) = tokio::join!(self.list_user_repos(), self.list_starred());

        let (owned, forked) = user.unwrap_or_else(|e| {
            warn!(error = %e, "listing user repositories failed, using fallback list");
            (fallback.iter().map(RepoSummary::fallback).collect(), Vec::new())
        });
        let starred = starred.unwrap_or_else(|e| {
            warn!(error = %e, "listing starred repositories failed");
            Vec::new()
        });

        let starred = starred
            .into_iter()
            .filter(|s| {
                !owned
                    .iter()
                    .chain(&forked)
                    .any(|o| o.owner == s.owner && o.repo == s.repo)
            })
            .collect();

        Repositories {
            owned,
            forked,
            starred,
        }
    }

    /// Branches of a repository.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the repository does not exist or the call fails.
    pub async fn list_branches(&self, owner: &str, repo: &str) -> StoreResult<Vec<BranchInfo>> {
        let mut url = self.api_url(["repos", owner, repo, "branches"]);
        url.query_pairs_mut().append_pair("per_page", "100");
        self.get_json(url, &format!("{owner}/{repo}")).await
    }

    /// Public repository search, sorted by stars.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the search call fails.
    pub async fn search_repos(&self, query: &str) -> StoreResult<Vec<RepoSummary>> {
        let mut url = self.api_url(["search", "repositories"]);
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("per_page", "20")
            .append_pair("sort", "stars");

        let found: SearchResponse = self.get_json(url, "search").await?;
        debug!(query, count = found.items.len(), "repository search");
        Ok(found
            .items
            .into_iter()
            .map(|r| r.into_summary(RepoSource::Search))
            .collect())
    }

    /// Star a repository.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the call fails.
    pub async fn star(&self, owner: &str, repo: &str) -> StoreResult<()> {
        let url = self.api_url(["user", "starred", owner, repo]);
        self.send(
            self.request(Method::PUT, url).body(Vec::<u8>::new()),
            &format!("{owner}/{repo}"),
            false,
        )
        .await?;
        Ok(())
    }

    /// Remove a star from a repository.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the call fails.
    pub async fn unstar(&self, owner: &str, repo: &str) -> StoreResult<()> {
        let url = self.api_url(["user", "starred", owner, repo]);
        self.send(
            self.request(Method::DELETE, url),
            &format!("{owner}/{repo}"),
            false,
        )
        .await?;
        Ok(())
    }

    /// Fork a repository into the token's account.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the call fails.
    pub async fn fork(&self, owner: &str, repo: &str) -> StoreResult<Value> {
        let url = self.api_url(["repos", owner, repo, "forks"]);
        let response = self
            .send(
                self.request(Method::POST, url).json(&serde_json::json!({})),
                &format!("{owner}/{repo}"),
                false,
            )
            .await?;
        Ok(response.json().await?)
    }

    /// Delete a repository. Irreversible.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the call fails.
    pub async fn delete_repository(&self, owner: &str, repo: &str) -> StoreResult<()> {
        let url = self.api_url(["repos", owner, repo]);
        warn!(owner, repo, "deleting repository");
        self.send(
            self.request(Method::DELETE, url),
            &format!("{owner}/{repo}"),
            false,
        )
        .await?;
        Ok(())
    }

    /// Releases of a repository, newest first.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the call fails.
    pub async fn list_releases(&self, owner: &str, repo: &str) -> StoreResult<Value> {
        let mut url = self.api_url(["repos", owner, repo, "releases"]);
        url.query_pairs_mut().append_pair("per_page", "30");
        self.get_json(url, &format!("{owner}/{repo}")).await
    }

    /// Create a release.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the call fails; an existing tag surfaces as
    /// `Conflict`.
    pub async fn create_release(
        &self,
        owner: &str,
        repo: &str,
        release: &NewRelease,
    ) -> StoreResult<Value> {
        let url = self.api_url(["repos", owner, repo, "releases"]);
        let response = self
            .send(
                self.request(Method::POST, url).json(release),
                &format!("{owner}/{repo}"),
                true,
            )
            .await?;
        Ok(response.json().await?)
    }

    /// Delete a release by id.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the call fails.
    pub async fn delete_release(&self, owner: &str, repo: &str, id: u64) -> StoreResult<()> {
        let url = self.api_url(["repos", owner, repo, "releases", &id.to_string()]);
        self.send(
            self.request(Method::DELETE, url),
            &format!("{owner}/{repo}"),
            false,
        )
        .await?;
        Ok(())
    }

    /// Upload a release asset to the `upload_url` returned by the releases API.
    ///
    /// The URI template suffix (`{?name,label}`) is stripped. URLs that do not
    /// share the configured uploads origin are rejected so the server token is
    /// never sent to another host.
    ///
    /// # Errors
    ///
    /// Returns `RequestError::UploadUrlRejected` for a foreign or unparseable
    /// URL, or a `StoreError` if the upload fails.
    pub async fn upload_release_asset(
        &self,
        upload_url: &str,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> GhResult<Value> {
        let mut url = self.asset_upload_url(upload_url)?;
        url.query_pairs_mut().append_pair("name", file_name);

        debug!(%url, file_name, size = bytes.len(), "uploading release asset");
        let response = self
            .send(
                self.request(Method::POST, url)
                    .header(CONTENT_TYPE, content_type)
                    .body(bytes),
                file_name,
                true,
            )
            .await?;
        Ok(response.json().await.map_err(crate::error::StoreError::from)?)
    }

    /// Validate an upload URL against the configured uploads origin.
    pub(crate) fn asset_upload_url(&self, upload_url: &str) -> GhResult<reqwest::Url> {
        let rejected = || RequestError::UploadUrlRejected(upload_url.to_string());

        let trimmed = upload_url
            .split_once('{')
            .map_or(upload_url, |(head, _)| head);
        let url = reqwest::Url::parse(trimmed).map_err(|_| rejected())?;

        let base = self.uploads_base();
        if url.origin() != base.origin() || !url.path().starts_with(base.path()) {
            return Err(rejected().into());
        }

        let mut url = url;
        url.set_query(None);
        Ok(url)
    }
}
