//! Request dispatch module
//!
//! Entry point for HTTP request processing: method dispatch, then response
//! decoration with the CORS headers.

use crate::config::AppState;
use crate::handler::static_files;
use crate::http::{self, cors, ResponseBody};
use crate::logger;
use hyper::header::{IF_MODIFIED_SINCE, IF_NONE_MATCH};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

/// Request context encapsulating information needed for request processing
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Raw (still percent-encoded) request path
    pub path: String,
    pub query: Option<String>,
    pub is_head: bool,
    pub if_none_match: Option<String>,
    pub if_modified_since: Option<String>,
}

impl RequestContext {
    pub fn from_request<B>(req: &Request<B>) -> Self {
        let header = |name| {
            req.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string)
        };

        Self {
            path: req.uri().path().to_string(),
            query: req.uri().query().map(ToString::to_string),
            is_head: req.method() == Method::HEAD,
            if_none_match: header(IF_NONE_MATCH),
            if_modified_since: header(IF_MODIFIED_SINCE),
        }
    }
}

/// Main entry point for HTTP request handling
///
/// - `OPTIONS` on any path: 200 with an empty body
/// - `GET`/`HEAD`: static file from the serving root
/// - anything else: 501
///
/// Every response carries the CORS headers.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<ResponseBody>, Infallible> {
    let method = req.method().clone();

    let mut response = match method {
        Method::OPTIONS => http::build_options_response(),
        Method::GET | Method::HEAD => {
            let ctx = RequestContext::from_request(&req);
            static_files::serve_path(&ctx, &state).await
        }
        _ => {
            logger::log_warning(&format!("Method not implemented: {method}"));
            http::build_501_response()
        }
    };

    cors::apply_headers(&mut response, &state.cors, &state.server_name);
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Overrides};
    use http_body_util::BodyExt;
    use hyper::body::Bytes;
    use hyper::header::{
        ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
        CONTENT_TYPE, LOCATION,
    };
    use hyper::StatusCode;
    use tempfile::TempDir;

    fn state_for(dir: &TempDir) -> Arc<AppState> {
        let overrides = Overrides {
            directory: Some(dir.path().to_path_buf()),
            ..Overrides::default()
        };
        let config = Config::load_from("no-such-config-file", &overrides).unwrap();
        Arc::new(AppState::new(config).unwrap())
    }

    async fn send(state: &Arc<AppState>, method: &str, uri: &str) -> Response<ResponseBody> {
        let req = Request::builder().method(method).uri(uri).body(()).unwrap();
        handle_request(req, Arc::clone(state)).await.unwrap()
    }

    async fn body_of(resp: Response<ResponseBody>) -> Bytes {
        resp.into_body().collect().await.unwrap().to_bytes()
    }

    fn assert_cors(resp: &Response<ResponseBody>) {
        assert_eq!(resp.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(resp.headers()[ACCESS_CONTROL_ALLOW_METHODS], "GET, OPTIONS");
        assert_eq!(resp.headers()[ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type");
    }

    #[tokio::test]
    async fn test_get_version_descriptor() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("version.json"), r#"{"version":"1.0.1"}"#).unwrap();
        let state = state_for(&dir);

        let resp = send(&state, "GET", "/version.json").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], "application/json");
        assert_cors(&resp);
        assert_eq!(body_of(resp).await, r#"{"version":"1.0.1"}"#);
    }

    #[tokio::test]
    async fn test_missing_file_is_404_with_cors() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_for(&dir);

        let resp = send(&state, "GET", "/does-not-exist.apk").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_cors(&resp);
    }

    #[tokio::test]
    async fn test_options_on_any_path() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_for(&dir);

        let resp = send(&state, "OPTIONS", "/anything").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_cors(&resp);
        assert!(body_of(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_unsupported_method_is_501() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_for(&dir);

        let resp = send(&state, "POST", "/version.json").await;
        assert_eq!(resp.status(), StatusCode::NOT_IMPLEMENTED);
        assert_cors(&resp);
    }

    #[tokio::test]
    async fn test_directory_redirects_then_lists() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("builds")).unwrap();
        std::fs::write(dir.path().join("builds/app-release.apk"), b"PK\x03\x04").unwrap();
        let state = state_for(&dir);

        let resp = send(&state, "GET", "/builds?channel=beta").await;
        assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(resp.headers()[LOCATION], "/builds/?channel=beta");

        let resp = send(&state, "GET", "/builds/").await;
        assert_eq!(resp.status(), StatusCode::OK);
        let html = String::from_utf8(body_of(resp).await.to_vec()).unwrap();
        assert!(html.contains("app-release.apk"));
    }

    #[tokio::test]
    async fn test_directory_redirect_stays_on_this_host() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("evil.com")).unwrap();
        let state = state_for(&dir);

        let resp = send(&state, "GET", "//evil.com").await;
        assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(resp.headers()[LOCATION], "/evil.com/");
        assert_cors(&resp);

        let resp = send(&state, "GET", "/./evil.com?x=1").await;
        assert_eq!(resp.headers()[LOCATION], "/evil.com/?x=1");
    }

    #[tokio::test]
    async fn test_file_with_trailing_slash_is_404() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("version.json"), "{}").unwrap();
        let state = state_for(&dir);

        let resp = send(&state, "GET", "/version.json/").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_cors(&resp);
        assert_ne!(body_of(resp).await, "{}");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_unreadable_file_is_500_with_cors() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app-release.apk");
        std::fs::write(&path, b"PK\x03\x04").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o000)).unwrap();
        if std::fs::File::open(&path).is_ok() {
            // running as root: permission bits are not enforced
            return;
        }
        let state = state_for(&dir);

        let resp = send(&state, "GET", "/app-release.apk").await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_cors(&resp);
        assert_eq!(body_of(resp).await, "500 Internal Server Error");
    }

    #[tokio::test]
    async fn test_index_file_preferred_over_listing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>updates</h1>").unwrap();
        let state = state_for(&dir);

        let resp = send(&state, "GET", "/").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], "text/html; charset=utf-8");
        assert_eq!(body_of(resp).await, "<h1>updates</h1>");
    }

    #[tokio::test]
    async fn test_conditional_get_returns_304() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("version.json"), "{}").unwrap();
        let state = state_for(&dir);

        let first = send(&state, "GET", "/version.json").await;
        let etag = first.headers()["etag"].to_str().unwrap().to_string();

        let req = Request::builder()
            .uri("/version.json")
            .header(IF_NONE_MATCH, &etag)
            .body(())
            .unwrap();
        let resp = handle_request(req, Arc::clone(&state)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);
        assert_cors(&resp);
    }
}
