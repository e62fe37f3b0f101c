// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! HTTP client for the payments service.
//!
//! Every call is bounded by the client-level timeout and fails open: a
//! transport error or 5xx degrades to `Liability::Unknown` / empty rather
//! than propagating. Policy for `Unknown` lives in the domain service.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::error;

use crate::application::gateways::{Liability, Payment, PaymentsGateway, TrainingAccess};
use crate::domain::student::StudentId;

pub struct HttpPaymentsGateway {
    base_url: String,
    client: Client,
}

impl HttpPaymentsGateway {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn fetch_list<T: serde::de::DeserializeOwned>(&self, url: String) -> Vec<T> {
        match self.client.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                response.json::<Vec<T>>().await.unwrap_or_else(|e| {
                    error!(%url, error = %e, "payments service returned malformed body");
                    Vec::new()
                })
            }
            Ok(_) => Vec::new(),
            Err(e) => {
                error!(%url, error = %e, "payments service unreachable");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl PaymentsGateway for HttpPaymentsGateway {
    async fn has_payments(&self, student_id: StudentId) -> Liability {
        let url = format!(
            "{}/api/payments/student/{}/exists",
            self.base_url, student_id
        );
        match self.client.get(&url).send().await {
            Ok(response) if response.status().is_success() => Liability::Found,
            Ok(response) if response.status() == StatusCode::NOT_FOUND => Liability::NotFound,
            Ok(response) => {
                error!(%url, status = %response.status(), "payments existence check failed");
                Liability::Unknown
            }
            Err(e) => {
                error!(%url, error = %e, "payments service unreachable");
                Liability::Unknown
            }
        }
    }

    async fn payments_for(&self, student_id: StudentId) -> Vec<Payment> {
        self.fetch_list(format!("{}/api/payments/student/{}", self.base_url, student_id))
            .await
    }

    async fn active_accesses(&self, student_id: StudentId) -> Vec<TrainingAccess> {
        self.fetch_list(format!(
            "{}/api/access/student/{}/active",
            self.base_url, student_id
        ))
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway(url: &str) -> HttpPaymentsGateway {
        HttpPaymentsGateway::new(url, Duration::from_secs(2)).unwrap()
    }

    #[tokio::test]
    async fn existence_check_maps_status_to_liability() {
        let mut server = mockito::Server::new_async().await;
        let gw = gateway(&server.url());

        let found = server
            .mock("GET", "/api/payments/student/1/exists")
            .with_status(200)
            .create_async()
            .await;
        assert_eq!(gw.has_payments(StudentId(1)).await, Liability::Found);
        found.assert_async().await;

        server
            .mock("GET", "/api/payments/student/2/exists")
            .with_status(404)
            .create_async()
            .await;
        assert_eq!(gw.has_payments(StudentId(2)).await, Liability::NotFound);

        server
            .mock("GET", "/api/payments/student/3/exists")
            .with_status(500)
            .create_async()
            .await;
        assert_eq!(gw.has_payments(StudentId(3)).await, Liability::Unknown);
    }

    #[tokio::test]
    async fn unreachable_service_is_unknown() {
        // Port from a server that is immediately dropped.
        let url = {
            let server = mockito::Server::new_async().await;
            server.url()
        };
        let gw = gateway(&url);
        assert_eq!(gw.has_payments(StudentId(1)).await, Liability::Unknown);
        assert!(gw.payments_for(StudentId(1)).await.is_empty());
    }

    #[tokio::test]
    async fn payments_list_parses_and_fails_open() {
        let mut server = mockito::Server::new_async().await;
        let gw = gateway(&server.url());

        server
            .mock("GET", "/api/payments/student/7")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{
                    "id": 10,
                    "trainingId": 3,
                    "amount": 99.9,
                    "dueDate": "2025-07-01T00:00:00Z",
                    "status": "paid",
                    "paymentMethod": "pix",
                    "trainingName": "Crossfit",
                    "createdAt": "2025-06-01T12:00:00Z"
                }]"#,
            )
            .create_async()
            .await;

        let payments = gw.payments_for(StudentId(7)).await;
        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].training_name, "Crossfit");

        server
            .mock("GET", "/api/access/student/7/active")
            .with_status(503)
            .create_async()
            .await;
        assert!(gw.active_accesses(StudentId(7)).await.is_empty());
    }
}
