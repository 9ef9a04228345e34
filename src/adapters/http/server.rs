use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use axum::body::Body as AxumBody;
use axum::{
    Router,
    http::Request,
    response::{IntoResponse, Response as AxumResponse},
};
use hyper::StatusCode;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::adapters::http_handler::HyperHandler;
use crate::config::models::ServerConfig;
use crate::ports::http_server::{HandlerError, HttpHandler, HttpServer};
use crate::utils::graceful_shutdown::GracefulShutdown;

/// The edge server: one fallback route into the handler, so rewrite matching
/// always runs before any page resolution.
pub struct HyperServer {
    config: Arc<ServerConfig>,
    handler: HyperHandler,
    shutdown: Arc<GracefulShutdown>,
}

impl HyperServer {
    pub fn with_dependencies(
        config: Arc<ServerConfig>,
        handler: HyperHandler,
        shutdown: Arc<GracefulShutdown>,
    ) -> Self {
        Self {
            config,
            handler,
            shutdown,
        }
    }

    fn build_app(&self) -> Router {
        let handler = self.handler.clone();

        Router::new()
            .fallback(move |req: Request<AxumBody>| handle_request(handler.clone(), req))
            .layer(TraceLayer::new_for_http())
    }
}

impl HttpServer for HyperServer {
    async fn run(&self) -> Result<()> {
        let app = self.build_app();

        let addr: SocketAddr = self
            .config
            .listen_addr
            .parse()
            .with_context(|| format!("Invalid listen address: {}", self.config.listen_addr))?;

        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind to address: {addr}"))?;

        tracing::info!("Server listening on {}", addr);

        let mut token = self.shutdown.shutdown_token();
        axum::serve(listener, app.into_make_service())
            .with_graceful_shutdown(async move {
                token.cancelled().await;
                tracing::info!("Draining in-flight requests before exit");
            })
            .await
            .map_err(|e| anyhow!("HTTP server error: {e}"))?;

        Ok(())
    }
}

async fn handle_request(
    handler: HyperHandler,
    req: Request<AxumBody>,
) -> Result<AxumResponse, Infallible> {
    match handler.handle_request(req).await {
        Ok(response) => Ok(response),
        Err(e) => {
            let response = match e {
                HandlerError::RequestError(err) => {
                    tracing::error!("Request error: {}", err);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Request error: {err}"),
                    )
                        .into_response()
                }
            };
            Ok(response)
        }
    }
}
