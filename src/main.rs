//! Plate Server - serves microscopy plate images as PNG tiles.
//!
//! This binary starts the HTTP server and configures all components.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use plate_server::{
    config::Config,
    io::{FileSource, LocalFileSource},
    server::{create_router, RouterConfig},
    tile::{TileCache, TileService},
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Plate Server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");

    match config.cache_limit() {
        Some(limit) => info!("  Tile cache: LRU, {} entries", limit),
        None => {
            warn!("  Tile cache: UNBOUNDED - rendered tiles are kept until the process exits");
            warn!("        Bound it with --cache-max-entries=<n>");
        }
    }
    info!("  Tile max-age: {}s", config.cache_max_age);

    let source = LocalFileSource::new(config.root.clone());
    info!("  Source: {}", source.identifier());

    let tile_service = TileService::with_cache(source, TileCache::with_limit(config.cache_limit()));

    let router = create_router(tile_service, build_router_config(&config));

    let addr = config.bind_address();

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    info!("Server listening on: http://{}", addr);
    info!("  Try: curl http://{}/health", addr);

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "plate_server=debug,tower_http=debug"
    } else {
        "plate_server=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build RouterConfig from the application Config.
fn build_router_config(config: &Config) -> RouterConfig {
    let mut router_config = RouterConfig::new()
        .with_cache_max_age(config.cache_max_age)
        .with_tracing(!config.no_tracing);

    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    router_config
}
