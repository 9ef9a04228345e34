/// nippo-front - the web front server of the sales visit reporting system
///
/// This crate provides the browser-facing edge server with:
/// - Declarative rewrite rules forwarding `/api/*` calls to the backend API
/// - Environment-driven upstream origin resolution
/// - Static page serving (landing page, login page)
// Re-export public modules with explicit visibility controls
pub mod config;
pub mod ports;
pub mod tracing_setup;

// These modules are implementation details and should not be directly used by users
pub(crate) mod adapters;
pub(crate) mod core;
pub(crate) mod utils;

// Re-export the specific types needed by the binary crate
pub use crate::adapters::file_system::TowerFileSystem;
pub use crate::adapters::http::server::HyperServer;
pub use crate::adapters::http_client::HyperHttpClient;
pub use crate::adapters::http_handler::HyperHandler;
pub use crate::core::rewrite::RewriteTable;
pub use crate::utils::graceful_shutdown::{GracefulShutdown, ShutdownReason};
