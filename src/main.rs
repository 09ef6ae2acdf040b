use std::sync::Arc;

use anyhow::Context;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use trading_agent::agent::{DecisionAgent, DecisionModel};
use trading_agent::api::{self, AppState};
use trading_agent::config::Settings;
use trading_agent::exchange::{Exchange, UpbitExchange};
use trading_agent::service::{AnalysisService, TradingExecutor};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv_missing = dotenv::dotenv().is_err();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("trading_agent=info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    if dotenv_missing {
        warn!("⚠️  No .env file found, using environment variables");
    }

    let settings = Settings::new().context("failed to load configuration")?;
    info!("📋 Configuration loaded successfully");
    info!("📈 Trading market: {}", settings.trading.ticker);
    info!("🤖 Decision model: {}", settings.agent.model);
    if settings.trading.dry_run {
        info!("🧪 Dry run enabled, orders will be logged but not submitted");
    }

    let exchange: Arc<dyn Exchange> = Arc::new(
        UpbitExchange::new(&settings.trading, &settings.credentials)
            .context("failed to create exchange client")?,
    );
    let agent: Arc<dyn DecisionModel> = Arc::new(DecisionAgent::new(
        &settings.agent,
        settings.credentials.openai_api_key.clone(),
    ));

    let state = AppState {
        analysis: Arc::new(AnalysisService::new(exchange.clone())),
        agent,
        executor: Arc::new(TradingExecutor::new(
            exchange.clone(),
            settings.trading.clone(),
        )),
    };

    let app = api::create_router(state).layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    );

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;

    info!("🚀 HTTP server listening on http://{}", addr);
    info!("📡 Available endpoints:");
    info!("   GET /        - health check");
    info!("   GET /v1/test - run one analysis and trading cycle");

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
