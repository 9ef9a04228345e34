use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use clap::Parser;

use nippo_front::config::{self, ConfigValidator, UPSTREAM_ENV_VAR};
use nippo_front::ports::http_server::HttpServer;
use nippo_front::{
    GracefulShutdown, HyperHandler, HyperHttpClient, HyperServer, RewriteTable, TowerFileSystem,
    tracing_setup,
};

#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    #[clap(short, long, default_value = "config.yaml")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_setup::init_tracing().map_err(|e| anyhow!("Failed to initialize tracing: {e}"))?;

    let args = Args::parse();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting nippo-front web server"
    );

    tracing::info!("Loading configuration from {}", args.config);
    let config = config::load_config(&args.config)
        .await
        .with_context(|| format!("Failed to load config file: {}", args.config))?;

    ConfigValidator::validate(&config).context("Configuration validation failed")?;

    // Resolved exactly once; immutable for the process lifetime.
    let env_upstream = std::env::var(UPSTREAM_ENV_VAR).ok();
    let upstream = config::resolve_upstream(env_upstream.as_deref(), config.upstream.as_deref());
    tracing::info!("Upstream API origin: {}", upstream);

    let rewrites = RewriteTable::compile(&config.rewrites, &upstream)
        .context("Failed to compile rewrite rules")?;
    for rule in &config.rewrites {
        tracing::info!("Configured rewrite: {} -> {}", rule.source, rule.destination);
    }
    tracing::info!(
        "Compiled {} rewrite rule(s); serving pages from '{}'",
        rewrites.len(),
        config.site_root
    );

    let http_client = Arc::new(HyperHttpClient::new()?);
    let file_system = Arc::new(TowerFileSystem::new());
    let handler = HyperHandler::new(
        Arc::new(rewrites),
        http_client,
        file_system,
        config.site_root.clone(),
    );

    let shutdown = Arc::new(GracefulShutdown::new());
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if let Err(e) = shutdown.run_signal_handler().await {
                tracing::error!("Signal handler failed: {}", e);
            }
        });
    }

    let server = HyperServer::with_dependencies(Arc::new(config), handler, shutdown);
    server.run().await?;

    tracing::info!("Server stopped");
    tracing_setup::shutdown_tracing();
    Ok(())
}
