// ghman: GitHub Repository Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! File and directory routes.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::info;

use super::params::{
    self, DeleteDirBody, DeleteFilesBody, FileQuery, RenameDirBody, RenameFileBody, RepoParams,
    SaveBody,
};
use super::{ApiResult, AppState};
use crate::auth::Operation;
use crate::error::RequestError;
use crate::store::{ContentObject, ContentStore, RepoPath, TreeEntry, message};
use crate::tree::{self, BulkOutcome};

/// File payload as shown to the editor.
#[derive(Debug, Serialize)]
pub(crate) struct FileView {
    content: String,
    /// Present as `"base64"` when the file is not valid UTF-8.
    #[serde(skip_serializing_if = "Option::is_none")]
    encoding: Option<&'static str>,
    sha: String,
    size: u64,
    name: String,
}

impl From<ContentObject> for FileView {
    fn from(object: ContentObject) -> Self {
        let name = object.path.file_name().to_string();
        let (content, encoding) = match String::from_utf8(object.content) {
            Ok(text) => (text, None),
            Err(e) => (BASE64.encode(e.as_bytes()), Some("base64")),
        };
        Self {
            content,
            encoding,
            sha: object.sha,
            size: object.size,
            name,
        }
    }
}

fn written(object: &ContentObject) -> Value {
    json!({
        "success": true,
        "path": object.path,
        "sha": object.sha,
        "size": object.size,
    })
}

pub(crate) async fn tree(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RepoParams>,
) -> ApiResult<Json<Vec<TreeEntry>>> {
    let repo = query.repo_ref()?;
    Ok(Json(state.store.list_tree(&repo).await?))
}

pub(crate) async fn file(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FileQuery>,
) -> ApiResult<Json<FileView>> {
    let repo = query.repo.repo_ref()?;
    let path = params::required_path(query.path, "path")?;
    let object = state.store.read(&repo, &path).await?;
    Ok(Json(object.into()))
}

/// Create or update a text file. A `sha` makes it an update.
pub(crate) async fn save(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Json<SaveBody>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    state.require(&headers, Operation::Save)?;
    let body = params::body(body)?;

    let repo = body.repo.repo_ref()?;
    let path = params::required_path(body.path, "path")?;
    let content = body.content.ok_or(RequestError::MissingParam("content"))?;
    let sha = body.sha.filter(|s| !s.is_empty());

    let object = state
        .store
        .write(&repo, &path, content.as_bytes(), sha.as_deref(), &message::update(&path))
        .await?;

    info!(%repo, path = %path, sha = %object.sha, "saved file");
    Ok(Json(written(&object)))
}

/// Upload base64 content as a new file, or over an existing one at `sha`.
pub(crate) async fn upload(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Json<SaveBody>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    state.require(&headers, Operation::Upload)?;
    let body = params::body(body)?;

    let repo = body.repo.repo_ref()?;
    let path = params::required_path(body.path, "path")?;
    let encoded = params::required(body.content, "content")?;
    let bytes = decode_base64(&encoded)?;
    let sha = body.sha.filter(|s| !s.is_empty());

    let object = state
        .store
        .write(&repo, &path, &bytes, sha.as_deref(), &message::upload(&path))
        .await?;

    info!(%repo, path = %path, size = object.size, "uploaded file");
    Ok(Json(written(&object)))
}

fn decode_base64(encoded: &str) -> Result<Vec<u8>, RequestError> {
    // data: URLs from browsers carry a prefix; line breaks come from some encoders
    let payload = encoded
        .split_once(";base64,")
        .map_or(encoded, |(_, data)| data);
    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    BASE64
        .decode(compact.as_bytes())
        .map_err(|_| RequestError::InvalidBase64)
}

pub(crate) async fn rename_file(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Json<RenameFileBody>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    state.require(&headers, Operation::RenameFile)?;
    let body = params::body(body)?;

    let repo = body.repo.repo_ref()?;
    let old = params::required_path(body.old_path, "oldPath")?;
    let new = params::required_path(body.new_path, "newPath")?;

    tree::rename_file(&state.store, &repo, &old, &new).await?;

    info!(%repo, old = %old, new = %new, "renamed file");
    Ok(Json(json!({ "success": true, "oldPath": old, "newPath": new })))
}

pub(crate) async fn rename_dir(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Json<RenameDirBody>, JsonRejection>,
) -> ApiResult<Json<BulkOutcome>> {
    state.require(&headers, Operation::RenameDirectory)?;
    let body = params::body(body)?;

    let repo = body.repo.repo_ref()?;
    let old = params::required_path(body.old_dir, "oldDir")?;
    let new = params::required_path(body.new_dir, "newDir")?;

    Ok(Json(tree::rename_directory(&state.store, &repo, &old, &new).await?))
}

pub(crate) async fn delete_files(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Json<DeleteFilesBody>, JsonRejection>,
) -> ApiResult<Json<BulkOutcome>> {
    state.require(&headers, Operation::DeleteFiles)?;
    let body = params::body(body)?;

    if body.files.is_empty() {
        return Err(RequestError::NoFiles.into());
    }
    let repo = body.repo.repo_ref()?;
    let paths = body
        .files
        .iter()
        .map(|raw| RepoPath::parse(raw))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(tree::delete_files(&state.store, &repo, &paths).await?))
}

pub(crate) async fn delete_dir(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Json<DeleteDirBody>, JsonRejection>,
) -> ApiResult<Json<BulkOutcome>> {
    state.require(&headers, Operation::DeleteDirectory)?;
    let body = params::body(body)?;

    let repo = body.repo.repo_ref()?;
    let dir = params::required_path(body.path, "path")?;

    Ok(Json(tree::delete_directory(&state.store, &repo, &dir).await?))
}
