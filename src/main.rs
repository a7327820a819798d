use std::path::PathBuf;
use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use order_events::config::{AppConfig, EventLogBackend};
use order_events::lifecycle::{OrderIdGenerator, OrderLifecycleManager};
use order_events::messaging::{EventLog, EventPublisher, InMemoryEventLog, RedpandaClient};
use order_events::metrics::Metrics;
use order_events::store::InMemoryOrderStore;
use order_events::utils::RetryConfig;

fn init_tracing(json: bool) {
    // Default to INFO, overridable with RUST_LOG
    // Example: RUST_LOG=debug cargo run
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,order_events=debug"));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(true).with_thread_ids(true))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_thread_ids(true))
            .init();
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::var_os("ORDER_EVENTS_CONFIG").map(PathBuf::from);
    let config = AppConfig::load(config_path)?;

    init_tracing(config.logging.json);

    tracing::info!("🚀 Starting order events service");

    // === 1. Metrics ===
    let metrics = Arc::new(Metrics::new().context("failed to create metrics registry")?);

    // === 2. Event log client ===
    let event_log: Arc<dyn EventLog> = match config.event_log.backend {
        EventLogBackend::Redpanda => {
            tracing::info!(brokers = %config.event_log.brokers, "Connecting to Redpanda");
            Arc::new(
                RedpandaClient::new(
                    &config.event_log.brokers,
                    &config.event_log.acks,
                    config.event_log.message_timeout(),
                )
                .context("failed to create Redpanda producer")?,
            )
        }
        EventLogBackend::Memory => {
            tracing::warn!("Using in-memory event log; events are not durable");
            Arc::new(InMemoryEventLog::new())
        }
    };

    // === 3. Lifecycle manager (owns the one process-wide store) ===
    let publisher = EventPublisher::new(
        event_log.clone(),
        config.event_log.topic.clone(),
        RetryConfig::from(&config.retry),
        metrics.clone(),
    );
    let manager = OrderLifecycleManager::new(
        Arc::new(InMemoryOrderStore::new()),
        publisher,
        OrderIdGenerator::new(config.orders.id_strategy, config.orders.id_prefix.clone()),
        metrics.clone(),
    );

    // === 4. HTTP server ===
    let bind = (config.server.host.clone(), config.server.port);
    tracing::info!(host = %bind.0, port = bind.1, topic = %config.event_log.topic, "🌐 HTTP server starting");

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(manager.clone()))
            .app_data(web::Data::new(metrics.clone()))
            .configure(order_events::api::configure)
    })
    .bind(bind)
    .context("failed to bind HTTP server")?
    .run()
    .await?;

    // === 5. Shutdown: drain anything the producer still buffers ===
    tracing::info!("Shutting down, flushing event log");
    if let Err(e) = event_log.flush().await {
        tracing::error!(error = %e, "Event log flush failed");
    }

    tracing::info!("👋 Order events service stopped");
    Ok(())
}
