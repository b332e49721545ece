// ghman: GitHub Repository Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! HTTP request handler.
//!
//! ```text
//! request ──> cors ──> route
//!                        |
//!        read routes ----+----> GitHubStore
//!        gated routes --> AccessGate::require --> tree / GitHubStore
//!        /share/*    --> ShareSigner::check   --> GitHubStore::read
//!                        |
//!              ApiError (status + {"error": ..})
//! ```
//!
//! # Status Mapping
//!
//! | Error kind         | Status |
//! |--------------------|--------|
//! | `NotFound`         | 404    |
//! | `Conflict`         | 409    |
//! | `Unauthorized`     | 401    |
//! | `Forbidden`        | 403    |
//! | `InvalidSignature` | 403    |
//! | `InvalidRequest`   | 400    |
//! | `Remote`           | 502    |
//! | `Internal`         | 500    |
//!
//! Application state is immutable; the branch and every other target
//! parameter come from the request.

mod catalog;
mod content;
mod params;
mod share;

use std::sync::Arc;

use anyhow::Context;
use axum::extract::{DefaultBodyLimit, Request};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::json;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::auth::{AccessGate, Capability, Operation};
use crate::config::Config;
use crate::error::{ErrorKind, GhError, GhResult, Result, StoreError};
use crate::share::ShareSigner;
use crate::store::RepoRef;
use crate::store::github::GitHubStore;

/// Largest accepted request body (uploads are base64 or multipart).
const MAX_BODY: usize = 64 * 1024 * 1024;

/// Immutable state shared by every request.
#[derive(Debug)]
pub struct AppState {
    pub store: GitHubStore,
    pub gate: AccessGate,
    pub signer: ShareSigner,
    pub public_url: Option<String>,
    pub fallback_repos: Vec<RepoRef>,
}

impl AppState {
    /// Build state from configuration.
    ///
    /// # Errors
    ///
    /// Returns a config error if the GitHub client cannot be constructed.
    pub fn from_config(config: &Config) -> GhResult<Self> {
        Ok(Self {
            store: GitHubStore::new(&config.github)?,
            gate: AccessGate::from_config(&config.auth),
            signer: ShareSigner::new(config.share.secret.as_str()),
            public_url: config.server.public_url.clone(),
            fallback_repos: config.fallback_repos.clone(),
        })
    }

    /// Gate a mutating operation on the caller's token.
    pub(crate) fn require(&self, headers: &HeaderMap, operation: Operation) -> GhResult<Capability> {
        let result = self.gate.require(params::caller_token(headers), operation);
        if let Err(e) = &result {
            debug!(%operation, error = %e, "request rejected by access gate");
        }
        result
    }
}

/// Error returned from handlers.
#[derive(Debug)]
pub struct ApiError(GhError);

impl<E: Into<GhError>> From<E> for ApiError {
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

pub(crate) type ApiResult<T> = std::result::Result<T, ApiError>;

/// HTTP status for an error kind.
#[must_use]
pub const fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorKind::Forbidden | ErrorKind::InvalidSignature => StatusCode::FORBIDDEN,
        ErrorKind::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorKind::Remote => StatusCode::BAD_GATEWAY,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        let status = status_for(kind);

        match kind {
            ErrorKind::Remote => warn!(error = %self.0, "upstream failure"),
            ErrorKind::Internal => error!(error = %self.0, "internal failure"),
            _ => debug!(status = status.as_u16(), error = %self.0, "request failed"),
        }

        let body = match &self.0 {
            GhError::Store(err) if matches!(**err, StoreError::EmptyDirectory { .. }) => {
                json!({ "error": self.0.public_message(), "count": 0 })
            }
            _ => json!({ "error": self.0.public_message() }),
        };
        (status, Json(body)).into_response()
    }
}

/// Attach permissive CORS headers; answer preflight requests directly.
async fn cors(request: Request, next: Next) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        next.run(request).await
    };

    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type, X-Token"),
    );
    response
}

async fn not_found() -> ApiError {
    ApiError(
        StoreError::NotFound {
            path: "route".to_string(),
        }
        .into(),
    )
}

/// Build the full route table.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // read-only
        .route("/api/verify", get(catalog::verify))
        .route("/api/repos", get(catalog::repositories))
        .route("/api/branches", get(catalog::branches))
        .route("/api/search-repos", get(catalog::search))
        .route("/api/tree", get(content::tree))
        .route("/api/file", get(content::file))
        .route(
            "/api/releases",
            get(catalog::releases).post(catalog::create_release),
        )
        .route("/api/share-url", get(share::share_url))
        .route("/share/{*path}", get(share::shared_file))
        // gated
        .route("/api/save", post(content::save))
        .route("/api/upload", post(content::upload))
        .route("/api/rename-file", post(content::rename_file))
        .route("/api/rename-dir", post(content::rename_dir))
        .route("/api/delete-files", post(content::delete_files))
        .route("/api/delete-dir", post(content::delete_dir))
        .route("/api/star", post(catalog::star))
        .route("/api/unstar", post(catalog::unstar))
        .route("/api/fork", post(catalog::fork))
        .route("/api/releases/{id}", delete(catalog::delete_release))
        .route("/api/upload-asset", post(catalog::upload_asset))
        .route(
            "/api/delete-repo",
            post(catalog::delete_repo).delete(catalog::delete_repo),
        )
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(MAX_BODY))
        .layer(middleware::from_fn(cors))
        .with_state(state)
}

/// Serve on an already-bound listener until `shutdown` is cancelled.
///
/// # Errors
///
/// Returns an error if the server fails while accepting connections.
pub async fn serve_on(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: CancellationToken,
) -> Result<()> {
    let addr = listener.local_addr().context("failed to read listener address")?;
    info!(%addr, "listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .context("server error")?;

    info!("server stopped");
    Ok(())
}

/// Bind the configured address and serve until `shutdown` is cancelled.
///
/// # Errors
///
/// Returns an error if the state cannot be built, the address cannot be
/// bound, or the server fails.
pub async fn run(config: &Config, shutdown: CancellationToken) -> Result<()> {
    let state = Arc::new(AppState::from_config(config)?);
    let addr = config.bind_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    serve_on(listener, state, shutdown).await
}
