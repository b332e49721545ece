// ghman: GitHub Repository Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Repository-level routes: listings, stars, forks, releases.

use std::sync::Arc;

use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::HeaderMap;
use serde_json::{Value, json};
use tracing::{info, warn};

use super::params::{self, CreateReleaseBody, RepoParams, SearchQuery};
use super::{ApiResult, AppState};
use crate::auth::Operation;
use crate::error::{AuthError, RequestError};
use crate::store::catalog::{BranchInfo, RepoSummary, Repositories};

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

fn success() -> Json<Value> {
    Json(json!({ "success": true }))
}

/// Resolve the caller's role without requiring any operation.
pub(crate) async fn verify(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<Value>> {
    let role = params::caller_token(&headers)
        .and_then(|token| state.gate.authorize(token))
        .ok_or(AuthError::Unauthorized)?;
    Ok(Json(json!({ "success": true, "role": role })))
}

/// Owned, forked and starred repositories; never fails.
pub(crate) async fn repositories(State(state): State<Arc<AppState>>) -> Json<Repositories> {
    Json(state.store.repositories(&state.fallback_repos).await)
}

pub(crate) async fn branches(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RepoParams>,
) -> ApiResult<Json<Vec<BranchInfo>>> {
    let (owner, repo) = query.owner_repo()?;
    Ok(Json(state.store.list_branches(&owner, &repo).await?))
}

/// Repository search. An empty query yields an empty list.
pub(crate) async fn search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<Vec<RepoSummary>>> {
    let Some(q) = query.q.filter(|q| !q.trim().is_empty()) else {
        return Ok(Json(Vec::new()));
    };
    Ok(Json(state.store.search_repos(q.trim()).await?))
}

pub(crate) async fn releases(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RepoParams>,
) -> ApiResult<Json<Value>> {
    let (owner, repo) = query.owner_repo()?;
    Ok(Json(state.store.list_releases(&owner, &repo).await?))
}

pub(crate) async fn star(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<RepoParams>,
) -> ApiResult<Json<Value>> {
    state.require(&headers, Operation::Star)?;
    let (owner, repo) = query.owner_repo()?;
    state.store.star(&owner, &repo).await?;
    info!(%owner, %repo, "starred repository");
    Ok(success())
}

pub(crate) async fn unstar(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<RepoParams>,
) -> ApiResult<Json<Value>> {
    state.require(&headers, Operation::Unstar)?;
    let (owner, repo) = query.owner_repo()?;
    state.store.unstar(&owner, &repo).await?;
    info!(%owner, %repo, "unstarred repository");
    Ok(success())
}

pub(crate) async fn fork(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<RepoParams>,
) -> ApiResult<Json<Value>> {
    state.require(&headers, Operation::Fork)?;
    let (owner, repo) = query.owner_repo()?;
    let forked = state.store.fork(&owner, &repo).await?;
    info!(%owner, %repo, "forked repository");
    Ok(Json(forked))
}

pub(crate) async fn create_release(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Json<CreateReleaseBody>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    state.require(&headers, Operation::CreateRelease)?;
    let body = params::body(body)?;

    let owner = params::required(body.owner, "owner")?;
    let repo = params::required(body.repo, "repo")?;
    if body.release.tag_name.trim().is_empty() {
        return Err(RequestError::MissingParam("tag_name").into());
    }

    let created = state
        .store
        .create_release(&owner, &repo, &body.release)
        .await?;
    info!(%owner, %repo, tag = %body.release.tag_name, "created release");
    Ok(Json(created))
}

pub(crate) async fn delete_release(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(query): Query<RepoParams>,
) -> ApiResult<Json<Value>> {
    state.require(&headers, Operation::DeleteRelease)?;
    let (owner, repo) = query.owner_repo()?;
    let id: u64 = id
        .parse()
        .map_err(|_| RequestError::InvalidBody(format!("release id '{id}' is not a number")))?;

    state.store.delete_release(&owner, &repo, id).await?;
    info!(%owner, %repo, id, "deleted release");
    Ok(success())
}

/// Multipart upload of a release asset: fields `file` and `upload_url`.
pub(crate) async fn upload_asset(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<Value>> {
    state.require(&headers, Operation::UploadAsset)?;
    let mut multipart = multipart.map_err(|e| RequestError::InvalidBody(e.body_text()))?;

    let mut upload_url = None;
    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| RequestError::InvalidBody(e.body_text()))?
    {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("upload_url") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| RequestError::InvalidBody(e.body_text()))?;
                upload_url = Some(text);
            }
            Some("file") => {
                let name = field.file_name().unwrap_or("asset").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or(FALLBACK_CONTENT_TYPE)
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| RequestError::InvalidBody(e.body_text()))?;
                file = Some((name, content_type, bytes));
            }
            other => warn!(field = ?other, "ignoring unexpected multipart field"),
        }
    }

    let upload_url = params::required(upload_url, "upload_url")?;
    let (name, content_type, bytes) = file.ok_or(RequestError::MissingParam("file"))?;

    let size = bytes.len();
    let asset = state
        .store
        .upload_release_asset(&upload_url, &name, &content_type, bytes.to_vec())
        .await?;
    info!(%name, size, "uploaded release asset");
    Ok(Json(asset))
}

/// Delete a whole repository. Requires admin.
pub(crate) async fn delete_repo(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Json<RepoParams>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    state.require(&headers, Operation::DeleteRepository)?;
    let (owner, repo) = params::body(body)?.owner_repo()?;

    state.store.delete_repository(&owner, &repo).await?;
    warn!(%owner, %repo, "deleted repository");
    Ok(success())
}
