// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Persistence contract for the `Student` aggregate.
//!
//! The interface lives in the domain layer and is implemented in
//! `crate::infrastructure::repositories`: `PostgresStudentRepository` for
//! production, `InMemoryStudentRepository` for development and testing.
//! "Not found" is always absence (`None` / `false`), never an error; only
//! genuine storage failures surface as [`RepositoryError`].

use async_trait::async_trait;

use crate::domain::student::{Student, StudentId, StudentStatus};

/// Storage backend selected at startup from configuration.
#[derive(Debug, Clone)]
pub enum StorageBackend {
    InMemory,
    Postgres(PostgresConfig),
}

#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub connection_string: String,
}

/// Record store for student records. All listing operations return records
/// ordered by name ascending.
#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// List every record, ordered by name.
    async fn list_all(&self) -> Result<Vec<Student>, RepositoryError>;

    /// Keyed lookup; `None` when the id is unknown.
    async fn get_by_id(&self, id: StudentId) -> Result<Option<Student>, RepositoryError>;

    /// Case-insensitive exact match on email.
    async fn get_by_email(&self, email: &str) -> Result<Option<Student>, RepositoryError>;

    /// Exact match on the stored (possibly formatted) CPF value.
    async fn get_by_cpf(&self, cpf: &str) -> Result<Option<Student>, RepositoryError>;

    /// Persist a new record, assigning its identity. The store's unique
    /// indexes on email and CPF back up the service-level pre-checks;
    /// a violation surfaces as [`RepositoryError::ConstraintViolation`].
    async fn create(&self, student: Student) -> Result<Student, RepositoryError>;

    /// Replace all mutable fields of the record matching `id` and stamp
    /// `updated_at`. `None` when the id is unknown.
    async fn update(&self, id: StudentId, student: &Student)
        -> Result<Option<Student>, RepositoryError>;

    /// Physically remove the record. `false` when the id is unknown.
    async fn delete(&self, id: StudentId) -> Result<bool, RepositoryError>;

    /// Records with the given status, ordered by name.
    async fn get_by_status(&self, status: StudentStatus)
        -> Result<Vec<Student>, RepositoryError>;

    /// Records whose name or email contains `term` (case-insensitive) or
    /// whose CPF contains it (case-sensitive), ordered by name.
    async fn search(&self, term: &str) -> Result<Vec<Student>, RepositoryError>;

    async fn exists(&self, id: StudentId) -> Result<bool, RepositoryError>;
    async fn email_exists(&self, email: &str) -> Result<bool, RepositoryError>;
    async fn cpf_exists(&self, cpf: &str) -> Result<bool, RepositoryError>;
    async fn count(&self) -> Result<i64, RepositoryError>;
}

/// Storage-layer failures. Callers treat `ConstraintViolation` as a
/// client-visible refusal and everything else as an internal failure.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("unique constraint violated: {0}")]
    ConstraintViolation(String),

    #[error("database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db) = err {
            if db.is_unique_violation() {
                return RepositoryError::ConstraintViolation(db.message().to_string());
            }
        }
        RepositoryError::Database(err.to_string())
    }
}
