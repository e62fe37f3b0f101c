// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Outbound capability contracts for the sibling payments and trainings
//! services. Implementations live in `crate::infrastructure::gateways`.
//!
//! All operations are fail-open by contract: a transport failure degrades to
//! `Unknown` / empty rather than propagating. Policy for `Unknown` (treat as
//! no liability) is decided by the domain service, not here, so the
//! availability trade-off stays visible at the call site.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::student::StudentId;

/// Outcome of a cross-service liability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liability {
    /// The sibling service confirmed matching records exist.
    Found,
    /// The sibling service confirmed no matching records exist.
    NotFound,
    /// The check could not be completed (transport error, timeout, 5xx).
    Unknown,
}

/// Payment record as exposed by the payments service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: i64,
    pub training_id: i64,
    pub amount: f64,
    pub due_date: DateTime<Utc>,
    pub status: String,
    pub payment_method: String,
    pub training_name: String,
    pub created_at: DateTime<Utc>,
}

/// Active training access as exposed by the payments service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingAccess {
    pub id: i64,
    pub training_id: i64,
    pub training_name: String,
    pub granted_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub active: bool,
}

/// Training as exposed by the trainings service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Training {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub active: bool,
}

#[async_trait]
pub trait PaymentsGateway: Send + Sync {
    /// Whether any payment records exist for the student.
    async fn has_payments(&self, student_id: StudentId) -> Liability;

    /// All payments for the student; empty on any failure.
    async fn payments_for(&self, student_id: StudentId) -> Vec<Payment>;

    /// Active training accesses for the student; empty on any failure.
    async fn active_accesses(&self, student_id: StudentId) -> Vec<TrainingAccess>;
}

#[async_trait]
pub trait TrainingsGateway: Send + Sync {
    /// Single training lookup; `None` on miss or failure.
    async fn training(&self, training_id: i64) -> Option<Training>;

    /// All currently active trainings; empty on any failure.
    async fn active_trainings(&self) -> Vec<Training>;
}
