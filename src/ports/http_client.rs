use axum::body::Body as AxumBody;
use http::{Request, Response};
use std::future::Future;
use thiserror::Error;

/// Custom error type for HTTP client operations
#[derive(Error, Debug)]
#[non_exhaustive] // Signal that more variants may be added in the future
pub enum HttpClientError {
    /// Error when connection to the upstream fails
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error while exchanging the request with the upstream
    #[error("Upstream request failed: {0}")]
    RequestError(String),
}

/// Result type alias for HTTP client operations
pub type HttpClientResult<T> = Result<T, HttpClientError>;

/// HttpClient defines the port (interface) for forwarding requests upstream
pub trait HttpClient: Send + Sync + 'static {
    /// Send an HTTP request to the upstream origin
    ///
    /// # Arguments
    /// * `req` - The request to forward, URI already rewritten to the destination
    ///
    /// # Returns
    /// A future that resolves to the upstream's response or an error
    fn send_request(
        &self,
        req: Request<AxumBody>,
    ) -> impl Future<Output = HttpClientResult<Response<AxumBody>>> + Send;
}
