// ghman: GitHub Repository Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Content type of shared files, by extension.

use crate::store::RepoPath;

const TEXT_FALLBACK: &str = "text/plain; charset=utf-8";
const BINARY_FALLBACK: &str = "application/octet-stream";

/// Pick a `Content-Type` for a shared file.
///
/// Known extensions map directly. Anything else is served as plain text when
/// it decodes as UTF-8, and as an opaque byte stream otherwise.
#[must_use]
pub fn for_path(path: &RepoPath, content: &[u8]) -> &'static str {
    path.extension()
        .and_then(|ext| by_extension(&ext))
        .unwrap_or_else(|| {
            if std::str::from_utf8(content).is_ok() {
                TEXT_FALLBACK
            } else {
                BINARY_FALLBACK
            }
        })
}

/// True for types a browser would render as an active document.
#[must_use]
pub fn is_active_document(content_type: &str) -> bool {
    content_type.starts_with("text/html") || content_type.starts_with("image/svg+xml")
}

fn by_extension(ext: &str) -> Option<&'static str> {
    let ty = match ext {
        "txt" | "log" | "conf" | "ini" | "cfg" | "env" => TEXT_FALLBACK,
        "md" | "markdown" => "text/markdown; charset=utf-8",
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "csv" => "text/csv; charset=utf-8",
        "js" | "mjs" => "text/javascript; charset=utf-8",
        "json" => "application/json",
        "xml" => "application/xml",
        "yaml" | "yml" => "application/yaml",
        "toml" => "application/toml",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "bmp" => "image/bmp",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "gz" | "tgz" => "application/gzip",
        "tar" => "application/x-tar",
        "wasm" => "application/wasm",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "rs" | "py" | "sh" | "c" | "h" | "cpp" | "go" | "java" | "ts" | "rb" => TEXT_FALLBACK,
        _ => return None,
    };
    Some(ty)
}
