use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use ecfr_analyzer::utils::{resolve_workers, setup_logging, validate_args};
use ecfr_analyzer::{build_router, init_default_agencies, load_agency_names};
use ecfr_analyzer::{Analyzer, AppState, Args, EcfrClient};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.init {
        return init_default_agencies();
    }

    setup_logging(args.verbose);
    validate_args(&args)?;

    if let Err(e) = serve(args).await {
        error!(action = "exit", component = "server", error = %e, "Server failed");
        std::process::exit(1);
    }
    Ok(())
}

async fn serve(args: Args) -> Result<()> {
    let startup_start = Instant::now();

    let workers = resolve_workers(args.workers);
    rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build_global()
        .context("Failed to configure counting worker pool")?;
    info!(action = "configure", component = "worker_pool", worker_count = workers, "Using workers for word counting");

    let agencies = load_agency_names(args.agencies.as_deref())?;
    let analyzer = Analyzer::new(agencies, args.top);
    info!(
        action = "configure",
        component = "analyzer",
        agency_count = analyzer.agencies().len(),
        top_words = analyzer.top_words(),
        "Analyzer ready"
    );
    let client = EcfrClient::new(&args.base_url, Duration::from_secs(args.timeout_secs))?;

    let state = AppState::new(Arc::new(client), analyzer);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let listener = tokio::net::TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("Failed to bind {}", args.bind))?;

    info!(
        action = "start",
        component = "server",
        address = %args.bind,
        upstream = %args.base_url,
        duration_ms = startup_start.elapsed().as_millis(),
        "ecfr-analyzer v{} listening",
        env!("CARGO_PKG_VERSION")
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!(action = "stop", component = "server", "Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(action = "signal", component = "server", error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
