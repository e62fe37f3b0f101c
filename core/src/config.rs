// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Service configuration.
//!
//! Loaded from a YAML file when one is given, with environment variables
//! (`DATABASE_URL`, `PAYMENTS_SERVICE_URL`, `TRAININGS_SERVICE_URL`,
//! `LISTEN_ADDR`) overriding file values. Without a file everything falls
//! back to development defaults: in-memory storage and localhost gateways.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::domain::repository::{PostgresConfig, StorageBackend};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub listen_addr: String,
    pub storage: StorageConfig,
    pub payments_service: GatewayConfig,
    pub trainings_service: GatewayConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// "memory" or "postgres".
    pub backend: String,
    pub database_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            storage: StorageConfig::default(),
            payments_service: GatewayConfig {
                base_url: "http://localhost:7001".to_string(),
                timeout_secs: 30,
            },
            trainings_service: GatewayConfig {
                base_url: "http://localhost:7002".to_string(),
                timeout_secs: 30,
            },
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            database_url: None,
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:7001".to_string(),
            timeout_secs: 30,
        }
    }
}

impl GatewayConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ServiceConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => {
                let raw = std::fs::read_to_string(p)
                    .with_context(|| format!("reading config file {}", p.display()))?;
                serde_yaml::from_str(&raw)
                    .with_context(|| format!("parsing config file {}", p.display()))?
            }
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("DATABASE_URL") {
            self.storage.backend = "postgres".to_string();
            self.storage.database_url = Some(url);
        }
        if let Ok(url) = std::env::var("PAYMENTS_SERVICE_URL") {
            self.payments_service.base_url = url;
        }
        if let Ok(url) = std::env::var("TRAININGS_SERVICE_URL") {
            self.trainings_service.base_url = url;
        }
        if let Ok(addr) = std::env::var("LISTEN_ADDR") {
            self.listen_addr = addr;
        }
    }

    pub fn storage_backend(&self) -> Result<StorageBackend> {
        match self.storage.backend.as_str() {
            "memory" => Ok(StorageBackend::InMemory),
            "postgres" => {
                let connection_string = self
                    .storage
                    .database_url
                    .clone()
                    .context("storage.backend is postgres but no database_url is set")?;
                Ok(StorageBackend::Postgres(PostgresConfig { connection_string }))
            }
            other => anyhow::bail!("unknown storage backend: {other}"),
        }
    }
}
