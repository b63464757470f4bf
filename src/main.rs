use std::sync::Arc;

use foreman::api::api_routes;
use foreman::config::ServerConfig;
use foreman::coordinator::Coordinator;
use foreman::telemetry::LogSink;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = ServerConfig::from_env();

    eprintln!("Foreman v{}", env!("CARGO_PKG_VERSION"));
    eprintln!(
        "   Workload: {} items in chunks of {}",
        config.total_items, config.chunk_size
    );
    eprintln!("   Reward policy: {:?}", config.reward_policy);
    eprintln!("   API: http://0.0.0.0:{}\n", config.port);

    let coordinator = Coordinator::new(
        config.total_items,
        config.chunk_size,
        config.reward_policy,
        Arc::new(LogSink),
    );

    let app = api_routes(coordinator);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!(port = config.port, "Foreman coordinator started");
    axum::serve(listener, app).await?;

    Ok(())
}
