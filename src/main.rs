//! Application entry point.

use std::env;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use secrecy::{ExposeSecret, SecretString};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use banking_outcome_api::api::{RouterConfig, create_router_with_config};
use banking_outcome_api::app::AppState;
use banking_outcome_api::domain::{AppError, ConfigError, DatabaseClient};
use banking_outcome_api::infra::{InMemoryClient, PostgresClient, PostgresConfig};

/// Application configuration
struct Config {
    /// Absent means the in-memory account store
    database_url: Option<SecretString>,
    host: String,
    port: u16,
    request_timeout_secs: u64,
    max_concurrent_requests: usize,
    json_logs: bool,
}

impl Config {
    fn from_env() -> Result<Self, AppError> {
        let database_url = env::var("DATABASE_URL")
            .ok()
            .filter(|u| !u.is_empty())
            .map(SecretString::from);
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        Ok(Self {
            database_url,
            host,
            port: parse_env("PORT", 8080)?,
            request_timeout_secs: parse_env("REQUEST_TIMEOUT_SECS", 30)?,
            max_concurrent_requests: parse_env("MAX_CONCURRENT_REQUESTS", 256)?,
            json_logs: env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")),
        })
    }

    fn router_config(&self) -> RouterConfig {
        RouterConfig {
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_concurrent_requests: self.max_concurrent_requests,
        }
    }
}

fn parse_env<T: FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => value.parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value,
        }),
        _ => Ok(default),
    }
}

fn init_tracing(json: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug,sqlx=warn"));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn connect_store(database_url: Option<&SecretString>) -> Result<Arc<dyn DatabaseClient>> {
    match database_url {
        Some(url) => {
            let client = PostgresClient::new(url.expose_secret(), PostgresConfig::default())
                .await
                .context("Failed to connect to PostgreSQL")?;
            client
                .run_migrations()
                .await
                .context("Failed to apply migrations")?;
            info!("   ✓ Database connected and migrations applied");
            Ok(Arc::new(client))
        }
        None => {
            warn!("   ⚠ DATABASE_URL not set, using in-memory account store");
            Ok(Arc::new(InMemoryClient::new()))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let config = Config::from_env().context("Invalid configuration")?;
    init_tracing(config.json_logs);

    info!("🏦 Banking Outcome API v{}", env!("CARGO_PKG_VERSION"));
    info!("📦 Initializing infrastructure...");

    let db_client = connect_store(config.database_url.as_ref()).await?;
    let app_state = Arc::new(AppState::new(db_client));

    let router_config = config.router_config();
    info!(
        timeout_secs = config.request_timeout_secs,
        max_concurrent = router_config.max_concurrent_requests,
        "   ✓ Request limits configured"
    );
    let router = create_router_with_config(app_state, router_config);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("🚀 Server starting on http://{}", addr);
    info!("📖 Swagger UI available at http://{}/swagger-ui", addr);
    info!("📄 OpenAPI spec at http://{}/api-docs/openapi.json", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
