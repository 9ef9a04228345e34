use anyhow::{Context, Result};
use axum::body::Body as AxumBody;
use hyper::{Request, Response};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;

use crate::ports::http_client::{HttpClient, HttpClientError, HttpClientResult};

/// Forwarding client backed by hyper with rustls for `https://` origins.
///
/// Requests are relayed as-is: no timeout, retry, or health logic lives at
/// this layer. The connection pool is shared across all in-flight requests.
pub struct HyperHttpClient {
    client: Client<HttpsConnector<HttpConnector>, AxumBody>,
}

impl HyperHttpClient {
    pub fn new() -> Result<Self> {
        let https = HttpsConnectorBuilder::new()
            .with_native_roots()
            .context("Failed to load native root certificates")?
            .https_or_http()
            .enable_http1()
            .enable_http2()
            .build();

        let client = Client::builder(TokioExecutor::new()).build(https);

        tracing::info!("Created new HTTPS-capable forwarding client");
        Ok(Self { client })
    }
}

impl HttpClient for HyperHttpClient {
    async fn send_request(&self, req: Request<AxumBody>) -> HttpClientResult<Response<AxumBody>> {
        let method = req.method().clone();
        let uri = req.uri().clone();

        tracing::debug!("Forwarding request: {} {}", method, uri);

        match self.client.request(req).await {
            Ok(response) => {
                tracing::debug!(
                    "Received response from {} {}: status={}",
                    method,
                    uri,
                    response.status()
                );
                Ok(response.map(AxumBody::new))
            }
            Err(err) if err.is_connect() => {
                tracing::error!("Error connecting to {} {}: {}", method, uri, err);
                Err(HttpClientError::ConnectionError(err.to_string()))
            }
            Err(err) => {
                tracing::error!("Error forwarding {} {}: {}", method, uri, err);
                Err(HttpClientError::RequestError(err.to_string()))
            }
        }
    }
}
