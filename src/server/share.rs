// ghman: GitHub Repository Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Share-link issue and the public `/share/*` download route.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, Query, State};
use axum::http::header::{
    CACHE_CONTROL, CONTENT_SECURITY_POLICY, CONTENT_TYPE, EXPIRES, HOST, PRAGMA,
    X_CONTENT_TYPE_OPTIONS,
};
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use tracing::{debug, info};

use super::params::{self, ShareQuery, ShareUrlQuery};
use super::{ApiResult, AppState};
use crate::error::{RequestError, ShareError};
use crate::share::{ShareEncoding, ShareLink, SharedFile, content_type};
use crate::store::ContentStore;
use crate::store::github::cache_buster;

const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Base URL that issued links point at.
///
/// The configured public URL wins; otherwise the request's own host is used.
fn share_base(state: &AppState, headers: &HeaderMap) -> Result<String, RequestError> {
    if let Some(url) = &state.public_url {
        return Ok(url.clone());
    }
    let host = headers
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .filter(|h| !h.is_empty())
        .ok_or(RequestError::MissingParam("host"))?;
    let scheme = headers
        .get(FORWARDED_PROTO)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|p| matches!(*p, "http" | "https"))
        .unwrap_or("http");
    Ok(format!("{scheme}://{host}"))
}

pub(crate) async fn share_url(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<ShareUrlQuery>,
) -> ApiResult<Json<ShareLink>> {
    let path = params::required(query.path, "path")?;
    let encoding = query.encode.as_deref().and_then(ShareEncoding::from_param);
    let base = share_base(&state, &headers)?;

    let link = state.signer.issue(&base, &path, encoding, cache_buster())?;
    debug!(%path, "issued share link");
    Ok(Json(link))
}

/// Serve a shared file to anyone holding a valid signature.
pub(crate) async fn shared_file(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
    Query(query): Query<ShareQuery>,
) -> ApiResult<Response> {
    // an undecodable path cannot carry a valid signature
    let Path(raw) = path.map_err(|_| ShareError::InvalidSignature)?;
    state.signer.check(&raw, query.sign.as_deref())?;

    let shared = SharedFile::parse(&raw)?;
    let object = state.store.read(&shared.repo, &shared.path).await?;
    info!(repo = %shared.repo, path = %shared.path, size = object.size, "served shared file");

    let encoding = query.encode.as_deref().and_then(ShareEncoding::from_param);
    let (body, ty) = match encoding {
        Some(ShareEncoding::Base64) => (
            BASE64.encode(&object.content).into_bytes(),
            "text/plain; charset=utf-8",
        ),
        None => {
            let ty = content_type::for_path(&shared.path, &object.content);
            (object.content, ty)
        }
    };

    let mut response = body.into_response();
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(ty));
    headers.insert(
        CACHE_CONTROL,
        HeaderValue::from_static("no-cache, no-store, must-revalidate"),
    );
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(EXPIRES, HeaderValue::from_static("0"));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    if content_type::is_active_document(ty) {
        headers.insert(CONTENT_SECURITY_POLICY, HeaderValue::from_static("sandbox"));
    }
    Ok(response)
}
