// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # StudentService — CRUD orchestration over the student record store
//!
//! Application service in front of [`StudentRepository`]: enforces the
//! email/CPF uniqueness invariants, applies partial updates, guards deletion
//! behind the payments liability check, and maps persisted records to the
//! outward [`StudentResponse`] projection.
//!
//! ## Refusal vs failure
//!
//! Uniqueness refusals are recovered locally and returned as absence
//! (`Ok(None)`), and a blocked deletion is reported as
//! [`DeleteOutcome::Blocked`]; unexpected storage errors propagate to the
//! boundary layer uncaught. A storage-level `ConstraintViolation` raced past
//! the pre-check is folded into the same refusal signal, so callers see one
//! "creation refused" outcome either way.
//!
//! ## Fail-open deletion guard
//!
//! The payments gateway returns a tri-state [`Liability`]; this service maps
//! `Unknown` to "no liability" (fail open), logging the degradation, so an
//! unreachable payments service never blocks deletion indefinitely.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::application::gateways::{
    Liability, Payment, PaymentsGateway, Training, TrainingAccess, TrainingsGateway,
};
use crate::domain::repository::{RepositoryError, StudentRepository};
use crate::domain::student::{NewStudent, Student, StudentId, StudentPatch, StudentStatus};

// ============================================================================
// Projections
// ============================================================================

/// Outward-facing read shape of a student record. Field-for-field copy of
/// the persisted record plus `age`, computed from the birth date at mapping
/// time.
#[derive(Debug, Clone, Serialize)]
pub struct StudentResponse {
    pub id: StudentId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub cpf: Option<String>,
    pub birth_date: NaiveDate,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub status: StudentStatus,
    pub registered_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub age: u32,
}

impl From<Student> for StudentResponse {
    fn from(s: Student) -> Self {
        let age = Utc::now()
            .date_naive()
            .years_since(s.birth_date)
            .unwrap_or(0);
        Self {
            id: s.id,
            name: s.name,
            email: s.email,
            phone: s.phone,
            cpf: s.cpf,
            birth_date: s.birth_date,
            address: s.address,
            city: s.city,
            state: s.state,
            postal_code: s.postal_code,
            status: s.status,
            registered_at: s.registered_at,
            updated_at: s.updated_at,
            notes: s.notes,
            age,
        }
    }
}

/// Outcome of a deletion attempt. `Blocked` and `NotFound` are distinct so
/// the boundary can report them differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The payments service reported liabilities for the student.
    Blocked,
    NotFound,
}

/// Composite projection: a student together with their payment history and
/// active training accesses, gathered from the payments service (fail-open
/// to empty lists).
#[derive(Debug, Clone, Serialize)]
pub struct StudentPayments {
    pub id: StudentId,
    pub name: String,
    pub email: String,
    pub payments: Vec<Payment>,
    pub active_accesses: Vec<TrainingAccess>,
}

// ============================================================================
// Service Contract
// ============================================================================

#[async_trait]
pub trait StudentService: Send + Sync {
    /// Create a record after uniqueness pre-checks; `None` when the email or
    /// CPF is already claimed by another record.
    async fn create_student(&self, input: NewStudent) -> Result<Option<StudentResponse>>;

    /// Apply a partial update; `None` when the id is unknown or a changed
    /// email/CPF collides with another record.
    async fn update_student(
        &self,
        id: StudentId,
        patch: StudentPatch,
    ) -> Result<Option<StudentResponse>>;

    /// Delete unless the payments service reports liabilities.
    async fn delete_student(&self, id: StudentId) -> Result<DeleteOutcome>;

    async fn get_student(&self, id: StudentId) -> Result<Option<StudentResponse>>;
    async fn get_student_by_email(&self, email: &str) -> Result<Option<StudentResponse>>;
    async fn get_student_by_cpf(&self, cpf: &str) -> Result<Option<StudentResponse>>;
    async fn list_students(&self) -> Result<Vec<StudentResponse>>;
    async fn students_by_status(&self, status: StudentStatus) -> Result<Vec<StudentResponse>>;
    async fn search_students(&self, term: &str) -> Result<Vec<StudentResponse>>;
    async fn student_exists(&self, id: StudentId) -> Result<bool>;
    async fn student_count(&self) -> Result<i64>;

    /// Student plus payment history and active accesses; `None` when the id
    /// is unknown.
    async fn student_payments(&self, id: StudentId) -> Result<Option<StudentPayments>>;

    /// Training lookup proxied to the trainings service.
    async fn training(&self, training_id: i64) -> Result<Option<Training>>;
    async fn active_trainings(&self) -> Result<Vec<Training>>;

    /// True when no record owns `email`, or the only owner is `exclude`.
    async fn validate_email_unique(
        &self,
        email: &str,
        exclude: Option<StudentId>,
    ) -> Result<bool>;

    /// True when no record owns `cpf`, or the only owner is `exclude`.
    async fn validate_cpf_unique(&self, cpf: &str, exclude: Option<StudentId>) -> Result<bool>;
}

// ============================================================================
// Standard Implementation
// ============================================================================

pub struct StandardStudentService {
    repository: Arc<dyn StudentRepository>,
    payments: Arc<dyn PaymentsGateway>,
    trainings: Arc<dyn TrainingsGateway>,
}

impl StandardStudentService {
    pub fn new(
        repository: Arc<dyn StudentRepository>,
        payments: Arc<dyn PaymentsGateway>,
        trainings: Arc<dyn TrainingsGateway>,
    ) -> Self {
        Self {
            repository,
            payments,
            trainings,
        }
    }
}

#[async_trait]
impl StudentService for StandardStudentService {
    async fn create_student(&self, input: NewStudent) -> Result<Option<StudentResponse>> {
        info!(name = %input.name, "creating student");

        if !self.validate_email_unique(&input.email, None).await? {
            warn!(email = %input.email, "create refused: email already registered");
            return Ok(None);
        }
        if let Some(cpf) = input.cpf.as_deref().filter(|c| !c.is_empty()) {
            if !self.validate_cpf_unique(cpf, None).await? {
                warn!(cpf = %cpf, "create refused: cpf already registered");
                return Ok(None);
            }
        }

        let student = Student::new(input);
        match self.repository.create(student).await {
            Ok(created) => {
                info!(id = %created.id, "student created");
                Ok(Some(created.into()))
            }
            // Two concurrent creations can both pass the pre-check; the
            // store's unique index rejects the loser, which surfaces here as
            // the same refusal signal as a failed pre-check.
            Err(RepositoryError::ConstraintViolation(msg)) => {
                warn!(%msg, "create refused by storage constraint");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update_student(
        &self,
        id: StudentId,
        patch: StudentPatch,
    ) -> Result<Option<StudentResponse>> {
        info!(%id, "updating student");

        let Some(mut existing) = self.repository.get_by_id(id).await? else {
            warn!(%id, "update refused: student not found");
            return Ok(None);
        };

        if let Some(email) = patch.email.as_deref() {
            if !self.validate_email_unique(email, Some(id)).await? {
                warn!(%id, email = %email, "update refused: email already registered");
                return Ok(None);
            }
        }
        if let Some(cpf) = patch.cpf.value().filter(|c| !c.is_empty()) {
            if !self.validate_cpf_unique(cpf, Some(id)).await? {
                warn!(%id, cpf = %cpf, "update refused: cpf already registered");
                return Ok(None);
            }
        }

        existing.apply_patch(&patch);

        match self.repository.update(id, &existing).await {
            Ok(Some(updated)) => {
                info!(%id, "student updated");
                Ok(Some(updated.into()))
            }
            // Record vanished between load and update; same signal as a miss.
            Ok(None) => Ok(None),
            Err(RepositoryError::ConstraintViolation(msg)) => {
                warn!(%id, %msg, "update refused by storage constraint");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete_student(&self, id: StudentId) -> Result<DeleteOutcome> {
        info!(%id, "deleting student");

        match self.payments.has_payments(id).await {
            Liability::Found => {
                warn!(%id, "delete refused: student has payment history");
                return Ok(DeleteOutcome::Blocked);
            }
            Liability::Unknown => {
                // Fail open: an unreachable payments service must not block
                // deletion indefinitely.
                warn!(%id, "payments check degraded; proceeding without liability evidence");
            }
            Liability::NotFound => {}
        }

        if self.repository.delete(id).await? {
            info!(%id, "student deleted");
            Ok(DeleteOutcome::Deleted)
        } else {
            warn!(%id, "delete found no matching student");
            Ok(DeleteOutcome::NotFound)
        }
    }

    async fn get_student(&self, id: StudentId) -> Result<Option<StudentResponse>> {
        Ok(self.repository.get_by_id(id).await?.map(Into::into))
    }

    async fn get_student_by_email(&self, email: &str) -> Result<Option<StudentResponse>> {
        Ok(self.repository.get_by_email(email).await?.map(Into::into))
    }

    async fn get_student_by_cpf(&self, cpf: &str) -> Result<Option<StudentResponse>> {
        Ok(self.repository.get_by_cpf(cpf).await?.map(Into::into))
    }

    async fn list_students(&self) -> Result<Vec<StudentResponse>> {
        let students = self.repository.list_all().await?;
        Ok(students.into_iter().map(Into::into).collect())
    }

    async fn students_by_status(&self, status: StudentStatus) -> Result<Vec<StudentResponse>> {
        let students = self.repository.get_by_status(status).await?;
        Ok(students.into_iter().map(Into::into).collect())
    }

    async fn search_students(&self, term: &str) -> Result<Vec<StudentResponse>> {
        let students = self.repository.search(term).await?;
        Ok(students.into_iter().map(Into::into).collect())
    }

    async fn student_exists(&self, id: StudentId) -> Result<bool> {
        Ok(self.repository.exists(id).await?)
    }

    async fn student_count(&self) -> Result<i64> {
        Ok(self.repository.count().await?)
    }

    async fn student_payments(&self, id: StudentId) -> Result<Option<StudentPayments>> {
        let Some(student) = self.repository.get_by_id(id).await? else {
            return Ok(None);
        };
        let payments = self.payments.payments_for(id).await;
        let active_accesses = self.payments.active_accesses(id).await;
        Ok(Some(StudentPayments {
            id: student.id,
            name: student.name,
            email: student.email,
            payments,
            active_accesses,
        }))
    }

    async fn training(&self, training_id: i64) -> Result<Option<Training>> {
        Ok(self.trainings.training(training_id).await)
    }

    async fn active_trainings(&self) -> Result<Vec<Training>> {
        Ok(self.trainings.active_trainings().await)
    }

    async fn validate_email_unique(
        &self,
        email: &str,
        exclude: Option<StudentId>,
    ) -> Result<bool> {
        match self.repository.get_by_email(email).await? {
            None => Ok(true),
            Some(owner) => Ok(exclude == Some(owner.id)),
        }
    }

    async fn validate_cpf_unique(&self, cpf: &str, exclude: Option<StudentId>) -> Result<bool> {
        match self.repository.get_by_cpf(cpf).await? {
            None => Ok(true),
            Some(owner) => Ok(exclude == Some(owner.id)),
        }
    }
}
