// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! HTTP client for the trainings service. Same fail-open posture as the
//! payments client: misses and failures both resolve to `None` / empty.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::error;

use crate::application::gateways::{Training, TrainingsGateway};

pub struct HttpTrainingsGateway {
    base_url: String,
    client: Client,
}

impl HttpTrainingsGateway {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[async_trait]
impl TrainingsGateway for HttpTrainingsGateway {
    async fn training(&self, training_id: i64) -> Option<Training> {
        let url = format!("{}/api/trainings/{}", self.base_url, training_id);
        match self.client.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                response.json::<Training>().await.ok()
            }
            Ok(_) => None,
            Err(e) => {
                error!(%url, error = %e, "trainings service unreachable");
                None
            }
        }
    }

    async fn active_trainings(&self) -> Vec<Training> {
        let url = format!("{}/api/trainings/active", self.base_url);
        match self.client.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                response.json::<Vec<Training>>().await.unwrap_or_default()
            }
            Ok(_) => Vec::new(),
            Err(e) => {
                error!(%url, error = %e, "trainings service unreachable");
                Vec::new()
            }
        }
    }
}
