use std::sync::Arc;
use std::time::Duration;

use barter_api::config::ServerConfig;
use barter_api::notifications::ExchangeMailer;
use barter_api::router::build_app_router;
use barter_api::state::AppState;
use barter_events::{EmailConfig, EmailDelivery, EventBus};
use tokio::task::JoinHandle;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "barter_api=debug,barter_db=info,tower_http=debug";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = config.port, "Loaded server configuration");

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = barter_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    barter_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    barter_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database ready, migrations applied");

    let event_bus = Arc::new(EventBus::new(config.event_bus_capacity));
    let mailer = spawn_exchange_mailer(&event_bus);

    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        event_bus: Arc::clone(&event_bus),
    };
    let app = build_app_router(state, &config);

    let addr = config.bind_addr().expect("HOST must be an IP address");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");
    tracing::info!(%addr, "Barter API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Server stopped accepting connections, draining");

    // The router's bus handle is gone once `serve` returns; dropping ours
    // closes the channel so the mailer finishes its backlog and exits.
    drop(event_bus);
    if let Some(handle) = mailer {
        let drain = Duration::from_secs(config.shutdown_timeout_secs);
        if tokio::time::timeout(drain, handle).await.is_err() {
            tracing::warn!(
                timeout_secs = config.shutdown_timeout_secs,
                "Exchange mailer did not stop in time"
            );
        }
    }

    pool.close().await;
    tracing::info!("Graceful shutdown complete");
}

/// Install the global subscriber. `LOG_FORMAT=json` switches to one JSON
/// object per line; `RUST_LOG` overrides the default filter.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

/// Start the confirmation mailer when SMTP is configured.
fn spawn_exchange_mailer(event_bus: &EventBus) -> Option<JoinHandle<()>> {
    let Some(email_config) = EmailConfig::from_env() else {
        tracing::info!("SMTP_HOST not set, exchange confirmation emails disabled");
        return None;
    };

    let delivery = EmailDelivery::new(&email_config).expect("Invalid SMTP configuration");
    tracing::info!(
        smtp_host = %email_config.smtp_host,
        smtp_port = email_config.smtp_port,
        "Exchange confirmation emails enabled"
    );

    let mailer = ExchangeMailer::new(Arc::new(delivery));
    Some(tokio::spawn(mailer.run(event_bus.subscribe())))
}

/// Resolve on SIGINT, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received SIGINT, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
