//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.
//!
//! The durable store backend is chosen exactly once, here: REDIS_URL set
//! selects the remote store, otherwise the in-process map. Everything
//! downstream is generic over the capability; no call site branches on
//! the backend.

use axum::{
    Router, http,
    http::{Method, header},
    routing::get,
};
use gate::{GateConfig, GateState, ProbeFilter};
use platform::store::{DurableStore, MemoryStore, RedisStore};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use suggest::domain::entities::SuggestionBuckets;
use suggest::presentation::handlers::SuggestAppState;
use suggest::{
    InsightsUseCase, PgHistoryRepository, SuggestConfig, SuggestionsUseCase, TtlCache,
    suggest_router,
};
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod insights;

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

/// Interval between background sweeps of the suggestion cache
const SWEEP_INTERVAL: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,gate=info,suggest=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let gate_config = load_gate_config();
    let suggest_config = if cfg!(debug_assertions) {
        SuggestConfig::development()
    } else {
        SuggestConfig::default()
    };

    // Durable store backend, selected once at construction
    let app = match env::var("REDIS_URL") {
        Ok(redis_url) => {
            let store = RedisStore::connect(&redis_url).await?;
            tracing::info!("Using Redis durable store");
            build_app(Arc::new(store), pool, gate_config, suggest_config)
        }
        Err(_) => {
            tracing::warn!("REDIS_URL not set, falling back to in-process store");
            build_app(Arc::new(MemoryStore::new()), pool, gate_config, suggest_config)
        }
    };

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:40922,http://127.0.0.1:40922".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    let app = app.layer(TraceLayer::new_for_http()).layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], 31180));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Build the full router over one concrete store backend
fn build_app<S>(
    store: Arc<S>,
    pool: PgPool,
    gate_config: GateConfig,
    suggest_config: SuggestConfig,
) -> Router
where
    S: DurableStore + Clone + Send + Sync + 'static,
{
    let history = Arc::new(PgHistoryRepository::new(pool));
    let suggestion_cache = Arc::new(TtlCache::new());
    let suggest_config = Arc::new(suggest_config);

    let suggestions = Arc::new(SuggestionsUseCase::new(
        history.clone(),
        suggestion_cache.clone(),
        suggest_config.clone(),
    ));

    let insight_source = Arc::new(insights::HistorySummarySource::new(history.clone()));
    let insights = Arc::new(InsightsUseCase::new(
        store.clone(),
        insight_source,
        suggest_config,
    ));

    spawn_cache_sweeper(suggestion_cache);

    let suggest_state = SuggestAppState {
        suggestions,
        insights,
        history,
    };

    let gate_state = GateState {
        probe: Arc::new(ProbeFilter::new(store, gate_config)),
    };

    let api = suggest_router(suggest_state)
        .layer(axum::middleware::from_fn_with_state(gate_state, gate::guard::<S>));

    Router::new()
        .nest("/api", api)
        .route("/healthz", get(healthz))
}

/// Background task running the cache's explicit sweep operation
fn spawn_cache_sweeper(cache: Arc<TtlCache<SuggestionBuckets>>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SWEEP_INTERVAL);
        interval.tick().await;
        loop {
            interval.tick().await;
            let swept = cache.sweep_expired().await;
            if swept > 0 {
                tracing::debug!(swept, "Swept expired suggestion cache entries");
            }
        }
    });
}

/// Gate configuration: static defaults plus deployment overrides
fn load_gate_config() -> GateConfig {
    let mut config = if cfg!(debug_assertions) {
        GateConfig::development()
    } else {
        GateConfig::default()
    };

    config.probe = config.probe.with_overrides(
        csv_env("GATE_ALLOW_LIST"),
        csv_env("GATE_BLOCKED_PATHS"),
        csv_env("GATE_BLOCKED_AGENTS"),
    );

    if let Some(max) = parse_env("GATE_API_LIMIT") {
        config.api_rule.max_count = max;
    }
    if let Some(max) = parse_env("GATE_MUTATION_LIMIT") {
        config.mutation_rule.max_count = max;
    }

    config
}

fn csv_env(name: &str) -> Vec<String> {
    env::var(name)
        .map(|value| {
            value
                .split(',')
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

fn parse_env(name: &str) -> Option<u32> {
    env::var(name).ok().and_then(|value| value.parse().ok())
}

async fn healthz() -> &'static str {
    "ok"
}
