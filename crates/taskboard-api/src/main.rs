use anyhow::Result;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taskboard_api::{
    config::{LogFormat, Settings},
    routes, server,
    state::ApiState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Get configuration
    let settings = Settings::from_env()?;

    // Initialize tracing
    init_tracing(settings.log_format);

    tracing::info!("Starting Taskboard API");

    // Connect to MongoDB; failing here is fatal
    let db = taskboard_db::Database::new(&settings.database_config()).await?;

    let state = ApiState {
        store: Arc::new(db),
    };

    // Build router
    let app = routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", settings.api_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Serving API on http://{}", addr);

    server::serve(listener, app, settings.shutdown_grace()).await?;

    tracing::info!("Server stopped");

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "taskboard_api=debug,taskboard_db=debug,tower_http=debug,axum::rejection=trace".into()
    });
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}
