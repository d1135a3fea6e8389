//! Static file serving module
//!
//! Maps a request path onto the serving root, then answers with the file,
//! a directory index/listing, a redirect, or an error status.

use crate::config::AppState;
use crate::handler::listing::{self, LINK_SEGMENT};
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime, FileHeaders, ResponseBody};
use crate::logger;
use hyper::{Response, StatusCode};
use percent_encoding::{percent_decode_str, utf8_percent_encode};
use std::fmt::Write;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};

/// Turn a raw request path into a path relative to the serving root.
///
/// The path is percent-decoded and split on `/`. Empty and `.` segments are
/// dropped, `..` removes the previous segment but never climbs above the root.
/// Returns `None` for paths that can never name a file under the root
/// (invalid UTF-8, NUL bytes, backslashes).
pub fn sanitize_path(raw: &str) -> Option<PathBuf> {
    let decoded = percent_decode_str(raw).decode_utf8().ok()?;

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s if s.contains('\0') || s.contains('\\') => return None,
            s => segments.push(s),
        }
    }

    Some(segments.iter().collect())
}

/// Serve a GET/HEAD request from the serving root
pub async fn serve_path(ctx: &RequestContext, state: &AppState) -> Response<ResponseBody> {
    let Some(relative) = sanitize_path(&ctx.path) else {
        logger::log_warning(&format!("Rejected request path: {}", ctx.path));
        return http::build_404_response(ctx.is_head);
    };

    let resolved = match resolve_within_root(&state.root.join(&relative), &state.root).await {
        Ok(Some(path)) => path,
        Ok(None) => {
            logger::log_warning(&format!(
                "Path traversal attempt blocked: {}",
                ctx.path
            ));
            return http::build_404_response(ctx.is_head);
        }
        Err(e) => return error_response(&e, &relative, ctx.is_head),
    };

    let metadata = match fs::metadata(&resolved).await {
        Ok(m) => m,
        Err(e) => return error_response(&e, &resolved, ctx.is_head),
    };

    if metadata.is_dir() {
        serve_directory(ctx, state, &relative, &resolved).await
    } else if ctx.path.ends_with('/') {
        // only directories have a slash form
        http::build_404_response(ctx.is_head)
    } else {
        serve_file(ctx, state, &resolved).await
    }
}

/// Canonicalize `candidate` and make sure it is still inside `root`.
///
/// `Ok(None)` means the path exists but escapes the root (e.g. via a symlink).
async fn resolve_within_root(candidate: &Path, root: &Path) -> io::Result<Option<PathBuf>> {
    let canonical = fs::canonicalize(candidate).await?;
    Ok(canonical.starts_with(root).then_some(canonical))
}

/// Directory: redirect to the slash form, then index file, then listing
async fn serve_directory(
    ctx: &RequestContext,
    state: &AppState,
    relative: &Path,
    dir: &Path,
) -> Response<ResponseBody> {
    if !ctx.path.ends_with('/') {
        return http::build_redirect_response(&slash_location(relative, ctx.query.as_deref()));
    }

    for index_file in &state.config.http.index_files {
        let Ok(Some(index_path)) = resolve_within_root(&dir.join(index_file), &state.root).await
        else {
            continue;
        };
        if fs::metadata(&index_path).await.is_ok_and(|m| m.is_file()) {
            return serve_file(ctx, state, &index_path).await;
        }
    }

    if !state.config.http.directory_listing {
        return http::build_404_response(ctx.is_head);
    }

    match listing::render(&ctx.path, dir).await {
        Ok(html) => http::build_html_response(html, ctx.is_head),
        Err(e) => error_response(&e, dir, ctx.is_head),
    }
}

/// Redirect target for a directory requested without its trailing slash.
///
/// Built from the cleaned path, never the raw one: `//host` in a `Location`
/// header would send the client to another host.
fn slash_location(relative: &Path, query: Option<&str>) -> String {
    let mut location = String::from("/");
    for segment in relative {
        let _ = write!(
            location,
            "{}/",
            utf8_percent_encode(&segment.to_string_lossy(), LINK_SEGMENT)
        );
    }
    if let Some(query) = query {
        location.push('?');
        location.push_str(query);
    }
    location
}

async fn serve_file(ctx: &RequestContext, state: &AppState, path: &Path) -> Response<ResponseBody> {
    let file = match File::open(path).await {
        Ok(f) => f,
        Err(e) => return error_response(&e, path, ctx.is_head),
    };
    // validators and length describe the opened file, even if the path is replaced later
    let metadata = match file.metadata().await {
        Ok(m) => m,
        Err(e) => return error_response(&e, path, ctx.is_head),
    };

    let modified = metadata.modified().ok();
    let etag = cache::generate_etag(metadata.len(), modified);
    let last_modified = modified.map(cache::format_http_date);
    let headers = FileHeaders {
        content_type: mime::get_content_type(path.extension().and_then(|e| e.to_str())),
        content_length: metadata.len(),
        etag: &etag,
        last_modified: last_modified.as_deref(),
        cache_control: &state.config.http.cache_control,
    };

    if cache::is_not_modified(
        ctx.if_none_match.as_deref(),
        ctx.if_modified_since.as_deref(),
        &etag,
        modified,
    ) {
        return http::build_304_response(&headers);
    }

    let body = if ctx.is_head {
        http::empty()
    } else {
        http::stream_file(file)
    };
    http::build_file_response(body, &headers)
}

/// Map a filesystem error onto the status code the client sees
pub fn status_for_io_error(err: &io::Error) -> StatusCode {
    match err.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(err: &io::Error, path: &Path, is_head: bool) -> Response<ResponseBody> {
    if status_for_io_error(err) == StatusCode::NOT_FOUND {
        // File not found is common (404), no need to log
        return http::build_404_response(is_head);
    }
    logger::log_error(&format!("Failed to read '{}': {err}", path.display()));
    http::build_500_response(is_head)
}
