use std::sync::atomic::{AtomicU64, Ordering};

use serde::Deserialize;
use uuid::Uuid;

use crate::domain::order::OrderId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    /// Time-ordered UUIDv7, unique across restarts
    Uuid,
    /// `<prefix><n>` counting from 1, unique for the process lifetime
    Sequential,
}

/// Source of fresh order identities. An identity is never handed out twice.
#[derive(Debug)]
pub struct OrderIdGenerator {
    strategy: IdStrategy,
    prefix: String,
    issued: AtomicU64,
}

impl OrderIdGenerator {
    pub fn new(strategy: IdStrategy, prefix: impl Into<String>) -> Self {
        Self {
            strategy,
            prefix: prefix.into(),
            issued: AtomicU64::new(0),
        }
    }

    pub fn uuid() -> Self {
        Self::new(IdStrategy::Uuid, "")
    }

    pub fn sequential(prefix: impl Into<String>) -> Self {
        Self::new(IdStrategy::Sequential, prefix)
    }

    pub fn next_id(&self) -> OrderId {
        let n = self.issued.fetch_add(1, Ordering::Relaxed) + 1;
        match self.strategy {
            IdStrategy::Uuid => format!("{}{}", self.prefix, Uuid::now_v7()),
            IdStrategy::Sequential => format!("{}{}", self.prefix, n),
        }
    }
}
