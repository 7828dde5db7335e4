use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use common::http::{empty, full, ResponseBody};
use hyper::header::{self, HeaderValue};
use hyper::{Method, Response, StatusCode};
use tracing::{debug, warn};

use crate::handlers::response_handler::ResponseHandler;

const INDEX_FILE: &str = "index.html";

/// Serves `GET`/`HEAD` requests from the document root.
pub async fn serve_static(method: &Method, request_path: &str, root: &Path) -> Response<ResponseBody> {
    let Some(mut path) = resolve_path(root, request_path) else {
        debug!(path = %request_path, "rejected static path");
        return ResponseHandler::not_found();
    };

    if tokio::fs::metadata(&path)
        .await
        .map(|meta| meta.is_dir())
        .unwrap_or(false)
    {
        path.push(INDEX_FILE);
    }

    let contents = match tokio::fs::read(&path).await {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "static file not found");
            return ResponseHandler::not_found();
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to read static file");
            return ResponseHandler::create_internal_error("Internal Server Error");
        }
    };

    let content_length = contents.len();
    let body = if *method == Method::HEAD {
        empty()
    } else {
        full(Bytes::from(contents))
    };

    let mut response = Response::new(body);
    *response.status_mut() = StatusCode::OK;
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(content_type_for(&path)),
    );
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(content_length));
    response
}

/// Maps a URL path onto the document root. Returns `None` for paths that are
/// not valid UTF-8 after percent-decoding or that would leave the root.
pub fn resolve_path(root: &Path, request_path: &str) -> Option<PathBuf> {
    let decoded = urlencoding::decode(request_path).ok()?;
    let mut resolved = root.to_path_buf();

    for segment in decoded.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return None,
            _ if segment.contains('\\') || segment.contains('\0') => return None,
            _ if Path::new(segment).has_root() || segment.contains(':') => return None,
            _ => resolved.push(segment),
        }
    }

    Some(resolved)
}

pub fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") | Some("mjs") => "text/javascript; charset=utf-8",
        Some("json") => "application/json",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("ico") => "image/x-icon",
        Some("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use pretty_assertions::assert_eq;

    fn temp_root() -> PathBuf {
        let root = std::env::temp_dir().join(format!("newsreview-static-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(root.join("assets")).unwrap();
        std::fs::write(root.join("index.html"), "<h1>新闻稿智能评审</h1>").unwrap();
        std::fs::write(root.join("assets").join("app.js"), "console.log(1);").unwrap();
        root
    }

    #[test]
    fn test_resolve_path() {
        let root = Path::new("/srv/public");
        assert_eq!(resolve_path(root, "/"), Some(PathBuf::from("/srv/public")));
        assert_eq!(
            resolve_path(root, "/assets/app.js"),
            Some(PathBuf::from("/srv/public/assets/app.js"))
        );
        assert_eq!(
            resolve_path(root, "/my%20page.html"),
            Some(PathBuf::from("/srv/public/my page.html"))
        );
        assert_eq!(
            resolve_path(root, "/./assets//app.js"),
            Some(PathBuf::from("/srv/public/assets/app.js"))
        );
    }

    #[test]
    fn test_resolve_path_rejects_traversal() {
        let root = Path::new("/srv/public");
        assert_eq!(resolve_path(root, "/../etc/passwd"), None);
        assert_eq!(resolve_path(root, "/assets/%2e%2e/%2e%2e/etc/passwd"), None);
        assert_eq!(resolve_path(root, "/..%2fetc%2fpasswd"), None);
        assert_eq!(resolve_path(root, "/assets%5c..%5csecret"), None);
        assert_eq!(resolve_path(root, "/%ff"), None);
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for(Path::new("index.html")), "text/html; charset=utf-8");
        assert_eq!(content_type_for(Path::new("logo.PNG")), "image/png");
        assert_eq!(content_type_for(Path::new("archive.tar")), "application/octet-stream");
        assert_eq!(content_type_for(Path::new("README")), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_serve_index_for_root() {
        let root = temp_root();
        let response = serve_static(&Method::GET, "/", &root).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/html; charset=utf-8"
        );
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], "<h1>新闻稿智能评审</h1>".as_bytes());
        std::fs::remove_dir_all(root).unwrap();
    }

    #[tokio::test]
    async fn test_bundled_front_end_is_served() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../public");
        let response = serve_static(&Method::GET, "/", &root).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/html; charset=utf-8"
        );
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let page = String::from_utf8_lossy(&body);
        assert!(page.contains("/api/analyze"));
    }

    #[tokio::test]
    async fn test_head_has_length_but_no_body() {
        let root = temp_root();
        let response = serve_static(&Method::HEAD, "/assets/app.js", &root).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(header::CONTENT_LENGTH).unwrap(), "15");
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
        std::fs::remove_dir_all(root).unwrap();
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let root = temp_root();
        let response = serve_static(&Method::GET, "/missing.css", &root).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let response = serve_static(&Method::GET, "/../secret", &root).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        std::fs::remove_dir_all(root).unwrap();
    }
}
