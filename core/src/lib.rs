// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # students-core
//!
//! Domain, application and infrastructure layers of the students service:
//! the `Student` aggregate and its repository contract, the `StudentService`
//! orchestration logic (uniqueness invariants, partial updates, the
//! payments-liability deletion guard), Postgres and in-memory repository
//! implementations, fail-open HTTP gateways to the payments and trainings
//! services, and the axum boundary.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
