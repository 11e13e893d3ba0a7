use std::sync::Arc;

use anyhow::Context;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use insights_chat::{
    config::Config, routes, services::flow_client::FlowClient, state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "insights_chat=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("loading configuration")?;
    let flow = FlowClient::new(&config.flow).context("building flow client")?;

    tracing::info!(
        run_url = %flow.run_url(),
        timeout_secs = config.flow.timeout.as_secs(),
        session_ttl_secs = config.session_ttl.as_secs(),
        "flow client ready"
    );
    if config.database.keyspace.is_some() || config.database.secure_bundle_path.is_some() {
        tracing::info!(
            keyspace = ?config.database.keyspace,
            bundle = ?config.database.secure_bundle_path,
            "database settings present but unused"
        );
    }

    let state = Arc::new(AppState::new(flow, config.session_ttl));

    let app = routes::create_router()
        .with_state(state)
        .layer(CorsLayer::very_permissive());

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;

    tracing::info!(addr = %config.bind_addr, "insights chat listening");
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
