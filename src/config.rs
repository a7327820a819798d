//! Layered configuration for the order events service.
//!
//! Loaded in layers with increasing priority:
//! 1. Compiled-in defaults
//! 2. TOML file, if a path is given (`ORDER_EVENTS_CONFIG` in `main`)
//! 3. Environment overrides, prefix `ORDER_EVENTS_`, nested with `__`
//!    (e.g. `ORDER_EVENTS_RETRY__MAX_ATTEMPTS=5`)

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::lifecycle::IdStrategy;
use crate::utils::RetryConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub event_log: EventLogConfig,
    pub retry: RetrySettings,
    pub orders: OrdersConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventLogBackend {
    Redpanda,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventLogConfig {
    pub backend: EventLogBackend,
    pub brokers: String,
    pub topic: String,
    pub message_timeout_ms: u64,
    pub acks: String,
}

impl EventLogConfig {
    pub fn message_timeout(&self) -> Duration {
        Duration::from_millis(self.message_timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub multiplier: f64,
}

impl From<&RetrySettings> for RetryConfig {
    fn from(settings: &RetrySettings) -> Self {
        RetryConfig {
            max_attempts: settings.max_attempts,
            initial_delay: Duration::from_millis(settings.initial_delay_ms),
            max_delay: Duration::from_millis(settings.max_delay_ms),
            multiplier: settings.multiplier,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrdersConfig {
    pub id_strategy: IdStrategy,
    pub id_prefix: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl AppConfig {
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder()
            // ── Layer 1: compiled-in defaults ───────────────────────
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080i64)?
            .set_default("event_log.backend", "redpanda")?
            .set_default("event_log.brokers", "localhost:9092")?
            .set_default("event_log.topic", "orders")?
            .set_default("event_log.message_timeout_ms", 5000i64)?
            .set_default("event_log.acks", "1")?
            .set_default("retry.max_attempts", 3i64)?
            .set_default("retry.initial_delay_ms", 100i64)?
            .set_default("retry.max_delay_ms", 2000i64)?
            .set_default("retry.multiplier", 2.0)?
            .set_default("orders.id_strategy", "uuid")?
            .set_default("orders.id_prefix", "o-")?
            .set_default("logging.json", false)?;

        // ── Layer 2: TOML file ─────────────────────────────────────
        if let Some(path) = config_path {
            let path_str = path.to_str().context("config path is not valid UTF-8")?;
            builder = builder.add_source(File::with_name(path_str).required(true));
        }

        // ── Layer 3: env var overrides ─────────────────────────────
        builder = builder.add_source(
            Environment::with_prefix("ORDER_EVENTS")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let cfg: AppConfig = builder
            .build()
            .context("failed to build configuration")?
            .try_deserialize()
            .context("failed to deserialize configuration")?;

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.retry.max_attempts == 0 {
            bail!("retry.max_attempts must be at least 1");
        }
        if self.retry.multiplier < 1.0 {
            bail!("retry.multiplier must be >= 1.0, got {}", self.retry.multiplier);
        }
        if self.retry.initial_delay_ms > self.retry.max_delay_ms {
            bail!("retry.initial_delay_ms must not exceed retry.max_delay_ms");
        }
        if self.event_log.topic.trim().is_empty() {
            bail!("event_log.topic must not be empty");
        }
        if self.event_log.backend == EventLogBackend::Redpanda
            && self.event_log.brokers.trim().is_empty()
        {
            bail!("event_log.brokers is required for the redpanda backend");
        }
        Ok(())
    }
}
