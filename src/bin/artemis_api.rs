//! Artemis Quiz API Server
//!
//! REST API for the family cancer-history quiz funnel
//!
//! Usage:
//!   cargo run --bin artemis_api
//!
//! Environment:
//!   ARTEMIS_HOST     - Server host (default: 0.0.0.0)
//!   PORT             - Server port (default: 8080)
//!   BACKEND_URL      - Hosted backend base URL (persistence off when unset)
//!   BACKEND_API_KEY  - Hosted backend service key
//!   RUST_LOG         - Log level (default: info)

use artemis_quiz::api::{create_router, handlers::AppState, start_cleanup_task};
use artemis_quiz::utils::constants::{APP_NAME, APP_VERSION};
use artemis_quiz::AppConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .compact()
        .init();

    print_banner();

    // Load configuration and build shared state
    let config = AppConfig::from_env();
    let state = Arc::new(AppState::new(&config));
    let analytics_for_shutdown = state.analytics.clone();

    // Start background cleanup task for the rate limiter
    start_cleanup_task();
    info!("Background cleanup task started");

    // Create router
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    info!("{} v{} starting on http://{}", APP_NAME, APP_VERSION, addr);
    info!("");
    info!("Endpoints:");
    info!("  POST /v1/quiz/start        - Create a quiz session");
    info!("  GET  /v1/quiz/:id          - Current question & progress");
    info!("  POST /v1/quiz/:id/answer   - Record an answer");
    info!("  POST /v1/quiz/:id/advance  - Next question / completion");
    info!("  POST /v1/quiz/:id/retreat  - Previous question");
    info!("  POST /v1/classify          - Classification preview");
    info!("  POST /v1/waitlist/signup   - Waitlist / email capture");
    info!("  POST /v1/survey            - Feedback survey");
    info!("  GET  /v1/stats             - Funnel statistics");
    info!("  GET  /v1/health            - Health check");
    info!("");
    info!("Press Ctrl+C for graceful shutdown");
    info!("");

    // Start server with graceful shutdown
    let listener = TcpListener::bind(addr).await?;

    let shutdown_signal = async {
        if tokio::signal::ctrl_c().await.is_err() {
            warn!("Failed to install Ctrl+C handler");
        }
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    // Graceful shutdown sequence
    info!("");
    info!("Shutdown signal received, cleaning up...");

    // Flush buffered events and export final funnel stats
    analytics_for_shutdown.flush();
    info!("{}", analytics_for_shutdown.funnel_report());
    match analytics_for_shutdown.export_stats_json() {
        Ok(path) => info!("Funnel stats exported to: {}", path.display()),
        Err(e) => warn!("Failed to export funnel stats: {}", e),
    }

    info!("Artemis Quiz API shutdown complete");

    Ok(())
}

fn print_banner() {
    println!(
        r#"
    ============================================================
                A R T E M I S   Q U I Z   A P I
         Family history risk assessment & lead funnel
                          v0.1.0
    ============================================================
    "#
    );
}
