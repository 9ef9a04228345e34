use std::sync::Arc;

use axum::body::Body as AxumBody;
use axum::response::{IntoResponse, Response as AxumResponse};
use hyper::{Request, Response, StatusCode, Uri};

use crate::adapters::file_system::TowerFileSystem;
use crate::adapters::http_client::HyperHttpClient;
use crate::core::rewrite::RewriteTable;
use crate::ports::file_system::FileSystem;
use crate::ports::http_client::{HttpClient, HttpClientError};
use crate::ports::http_server::{HandlerError, HttpHandler};

/// Per-request entry point: consult the rewrite table first, fall back to
/// page routing.
///
/// Holds only `Arc`s to state that is immutable after startup, so any number
/// of in-flight requests may share one handler without synchronization.
#[derive(Clone)]
pub struct HyperHandler {
    rewrites: Arc<RewriteTable>,
    http_client: Arc<HyperHttpClient>,
    file_system: Arc<TowerFileSystem>,
    site_root: String,
}

impl HyperHandler {
    pub fn new(
        rewrites: Arc<RewriteTable>,
        http_client: Arc<HyperHttpClient>,
        file_system: Arc<TowerFileSystem>,
        site_root: impl Into<String>,
    ) -> Self {
        Self {
            rewrites,
            http_client,
            file_system,
            site_root: site_root.into(),
        }
    }

    /// Forward a rewritten request to its synthesized destination.
    ///
    /// Method, headers and body go upstream untouched; the upstream response
    /// is relayed back verbatim, whatever its status. Only transport-level
    /// failure is translated, into 502.
    async fn forward(&self, destination: String, mut req: Request<AxumBody>) -> AxumResponse {
        let uri: Uri = match destination.parse() {
            Ok(uri) => uri,
            Err(err) => {
                // A misconfigured origin is not caught at load time; it
                // surfaces here, on the first forwarded request.
                tracing::error!(
                    "Failed to parse destination URI: {}, error: {}",
                    destination,
                    err
                );
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to parse destination URI",
                )
                    .into_response();
            }
        };

        *req.uri_mut() = uri;

        match self.http_client.send_request(req).await {
            Ok(response) => response.into_response(),
            Err(e) => {
                tracing::error!("Forwarding to {} failed: {}", destination, e);
                let status_code = match e {
                    HttpClientError::ConnectionError(_) => StatusCode::BAD_GATEWAY,
                    HttpClientError::RequestError(_) => StatusCode::BAD_GATEWAY,
                };
                (status_code, format!("Forwarding request failed: {e}")).into_response()
            }
        }
    }

    async fn serve_page(&self, req: Request<AxumBody>) -> AxumResponse {
        let path = req.uri().path().to_string();

        match self
            .file_system
            .serve_file(&self.site_root, &path, req)
            .await
        {
            Ok(response) => response.into_response(),
            Err(err) => {
                tracing::error!("Static file error: {:?}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}

impl HttpHandler for HyperHandler {
    async fn handle_request(
        &self,
        req: Request<AxumBody>,
    ) -> Result<Response<AxumBody>, HandlerError> {
        // Rewrites are evaluated before page routing; a match short-circuits it.
        let destination = self.rewrites.resolve(req.uri().path(), req.uri().query());

        let response = match destination {
            Some(destination) => {
                tracing::debug!(
                    path = %req.uri().path(),
                    destination = %destination,
                    "Rewrite rule matched, forwarding"
                );
                self.forward(destination, req).await
            }
            None => self.serve_page(req).await,
        };

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::models::RewriteRuleConfig;
    use axum::Router;
    use http_body_util::BodyExt;
    use tokio::net::TcpListener;

    fn handler_for(table: RewriteTable, site_root: &str) -> HyperHandler {
        HyperHandler::new(
            Arc::new(table),
            Arc::new(HyperHttpClient::new().unwrap()),
            Arc::new(TowerFileSystem::new()),
            site_root,
        )
    }

    fn api_rules() -> Vec<RewriteRuleConfig> {
        vec![RewriteRuleConfig {
            source: "/api/:path*".to_string(),
            destination: "${upstream}/:path*".to_string(),
        }]
    }

    /// Loopback upstream that answers every request with the URI it saw.
    async fn spawn_echo_upstream() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new()
            .fallback(|req: Request<AxumBody>| async move { req.uri().to_string() });
        tokio::spawn(async move {
            axum::serve(listener, app.into_make_service()).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn forwards_api_requests_with_path_and_query_preserved() {
        let upstream = spawn_echo_upstream().await;
        let table = RewriteTable::compile(&api_rules(), &upstream).unwrap();
        let handler = handler_for(table, "site");

        let req = Request::builder()
            .uri("/api/customers/42?active=true")
            .header(hyper::header::HOST, "front.example")
            .body(AxumBody::empty())
            .unwrap();
        let response = handler.handle_request(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"/customers/42?active=true");
    }

    #[tokio::test]
    async fn unreachable_upstream_yields_bad_gateway() {
        // Grab an ephemeral port and release it so nothing listens there.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let table = RewriteTable::compile(&api_rules(), &format!("http://{addr}")).unwrap();
        let handler = handler_for(table, "site");

        let req = Request::builder()
            .uri("/api/reports")
            .body(AxumBody::empty())
            .unwrap();
        let response = handler.handle_request(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn malformed_origin_surfaces_at_request_time() {
        let table = RewriteTable::compile(&api_rules(), "not a url").unwrap();
        let handler = handler_for(table, "site");

        let req = Request::builder()
            .uri("/api/reports")
            .body(AxumBody::empty())
            .unwrap();
        let response = handler.handle_request(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn non_matching_paths_are_served_from_the_site() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("login")).unwrap();
        std::fs::write(dir.path().join("login/index.html"), "login page").unwrap();

        // A dead upstream: if /login were (wrongly) forwarded, the response
        // would be 502 rather than the page.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let table = RewriteTable::compile(&api_rules(), &format!("http://{addr}")).unwrap();
        let handler = handler_for(table, dir.path().to_str().unwrap());

        let req = Request::builder()
            .uri("/login/")
            .body(AxumBody::empty())
            .unwrap();
        let response = handler.handle_request(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"login page");

        // Without the trailing slash the file server may redirect, but the
        // request still stays inside the application's own routing.
        let req = Request::builder()
            .uri("/login")
            .body(AxumBody::empty())
            .unwrap();
        let response = handler.handle_request(req).await.unwrap();
        assert_ne!(response.status(), StatusCode::BAD_GATEWAY);
        assert!(response.status() == StatusCode::OK || response.status().is_redirection());
    }
}
