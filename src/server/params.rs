// ghman: GitHub Repository Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Request parameter shapes and their validation.
//!
//! Every field is optional on the wire so that a missing value becomes a
//! `MissingParam` error with a JSON body instead of an extractor rejection.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::HeaderMap;
use serde::Deserialize;

use crate::auth::TOKEN_HEADER;
use crate::error::RequestError;
use crate::store::{DEFAULT_BRANCH, RepoPath, RepoRef};

/// Caller token from the request headers.
pub(crate) fn caller_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Unwrap a JSON body, turning axum's rejection into a request error.
pub(crate) fn body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, RequestError> {
    body.map(|Json(value)| value)
        .map_err(|e| RequestError::InvalidBody(e.body_text()))
}

pub(crate) fn required(value: Option<String>, name: &'static str) -> Result<String, RequestError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(RequestError::MissingParam(name))
}

pub(crate) fn required_path(
    value: Option<String>,
    name: &'static str,
) -> Result<RepoPath, RequestError> {
    RepoPath::parse(&required(value, name)?)
}

/// `owner` / `repo` / optional `branch`, from a query string or JSON body.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RepoParams {
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub branch: Option<String>,
}

impl RepoParams {
    /// Resolve to a [`RepoRef`]; a missing branch means `main`.
    pub(crate) fn repo_ref(self) -> Result<RepoRef, RequestError> {
        let owner = required(self.owner, "owner")?;
        let repo = required(self.repo, "repo")?;
        let branch = self
            .branch
            .filter(|b| !b.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BRANCH.to_string());
        Ok(RepoRef::new(owner, repo, branch))
    }

    /// Owner and repository name only.
    pub(crate) fn owner_repo(self) -> Result<(String, String), RequestError> {
        Ok((required(self.owner, "owner")?, required(self.repo, "repo")?))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct FileQuery {
    #[serde(flatten)]
    pub repo: RepoParams,
    pub path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ShareUrlQuery {
    pub path: Option<String>,
    pub encode: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ShareQuery {
    pub sign: Option<String>,
    pub encode: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SaveBody {
    #[serde(flatten)]
    pub repo: RepoParams,
    pub path: Option<String>,
    pub content: Option<String>,
    pub sha: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RenameFileBody {
    #[serde(flatten)]
    pub repo: RepoParams,
    pub old_path: Option<String>,
    pub new_path: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RenameDirBody {
    #[serde(flatten)]
    pub repo: RepoParams,
    pub old_dir: Option<String>,
    pub new_dir: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeleteFilesBody {
    #[serde(flatten)]
    pub repo: RepoParams,
    #[serde(default)]
    pub files: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeleteDirBody {
    #[serde(flatten)]
    pub repo: RepoParams,
    pub path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateReleaseBody {
    pub owner: Option<String>,
    pub repo: Option<String>,
    #[serde(flatten)]
    pub release: crate::store::catalog::NewRelease,
}
