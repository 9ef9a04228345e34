use axum::body::Body as AxumBody;
use http_body_util::BodyExt;
use hyper::{Request, Response};
use tower::ServiceExt;
use tower_http::services::ServeDir;

use crate::ports::file_system::{FileSystem, FileSystemError, FileSystemResult};

/// A file system implementation that uses tower-http's ServeDir.
///
/// Directory requests fall through to their `index.html`, which is how the
/// landing page (`/`) and the login page (`/login`) are served.
#[derive(Debug, Default, Clone)]
pub struct TowerFileSystem;

impl TowerFileSystem {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FileSystem for TowerFileSystem {
    async fn serve_file(
        &self,
        root: &str,
        path: &str,
        req: Request<AxumBody>,
    ) -> FileSystemResult<Response<AxumBody>> {
        // ServeDir resolves relative to its root, so the request path is
        // re-rooted before dispatch.
        let uri_string = format!("/{}", path.trim_start_matches('/'));
        let uri = hyper::Uri::try_from(uri_string)
            .map_err(|e| FileSystemError::InvalidPath(e.to_string()))?;

        let (parts, body) = req.into_parts();
        let mut new_req = Request::from_parts(parts, body);
        *new_req.uri_mut() = uri;

        let serve_dir = ServeDir::new(root);
        let response = serve_dir.oneshot(new_req).await.map_err(|e| {
            FileSystemError::IoError(std::io::Error::other(format!("ServeDir error: {e}")))
        })?;

        let (parts, tower_body) = response.into_parts();
        let axum_body = AxumBody::new(tower_body.map_err(|e| {
            tracing::error!("Error reading static file body: {}", e);
            axum::Error::new(e)
        }));

        Ok(Response::from_parts(parts, axum_body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::StatusCode;

    #[tokio::test]
    async fn serves_index_html_for_directory_requests() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>landing</h1>").unwrap();

        let fs = TowerFileSystem::new();
        let req = Request::builder().uri("/").body(AxumBody::empty()).unwrap();
        let response = fs
            .serve_file(dir.path().to_str().unwrap(), "/", req)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"<h1>landing</h1>");
    }

    #[tokio::test]
    async fn unknown_paths_get_not_found() {
        let dir = tempfile::tempdir().unwrap();

        let fs = TowerFileSystem::new();
        let req = Request::builder()
            .uri("/missing")
            .body(AxumBody::empty())
            .unwrap();
        let response = fs
            .serve_file(dir.path().to_str().unwrap(), "/missing", req)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
