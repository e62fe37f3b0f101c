// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! In-memory [`StudentRepository`] for development and testing.
//!
//! Mirrors the Postgres implementation's observable semantics: sequential
//! identity assignment, name-ascending ordering, case-insensitive email
//! matching, case-sensitive CPF matching, uniqueness refusals as
//! `ConstraintViolation`, and `updated_at` stamping on update.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::repository::{RepositoryError, StudentRepository};
use crate::domain::student::{Student, StudentId, StudentStatus};

#[derive(Default)]
struct Inner {
    students: HashMap<i64, Student>,
    next_id: i64,
}

#[derive(Clone, Default)]
pub struct InMemoryStudentRepository {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryStudentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>, RepositoryError> {
        self.inner
            .lock()
            .map_err(|_| RepositoryError::Database("mutex poisoned".to_string()))
    }
}

fn sorted_by_name(mut students: Vec<Student>) -> Vec<Student> {
    students.sort_by(|a, b| a.name.cmp(&b.name));
    students
}

#[async_trait]
impl StudentRepository for InMemoryStudentRepository {
    async fn list_all(&self) -> Result<Vec<Student>, RepositoryError> {
        let inner = self.lock()?;
        Ok(sorted_by_name(inner.students.values().cloned().collect()))
    }

    async fn get_by_id(&self, id: StudentId) -> Result<Option<Student>, RepositoryError> {
        let inner = self.lock()?;
        Ok(inner.students.get(&id.0).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Student>, RepositoryError> {
        let inner = self.lock()?;
        Ok(inner
            .students
            .values()
            .find(|s| s.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn get_by_cpf(&self, cpf: &str) -> Result<Option<Student>, RepositoryError> {
        let inner = self.lock()?;
        Ok(inner
            .students
            .values()
            .find(|s| s.cpf.as_deref() == Some(cpf))
            .cloned())
    }

    async fn create(&self, student: Student) -> Result<Student, RepositoryError> {
        let mut inner = self.lock()?;

        if inner
            .students
            .values()
            .any(|s| s.email.eq_ignore_ascii_case(&student.email))
        {
            return Err(RepositoryError::ConstraintViolation(format!(
                "email already registered: {}",
                student.email
            )));
        }
        if let Some(cpf) = student.cpf.as_deref() {
            if inner.students.values().any(|s| s.cpf.as_deref() == Some(cpf)) {
                return Err(RepositoryError::ConstraintViolation(format!(
                    "cpf already registered: {cpf}"
                )));
            }
        }

        inner.next_id += 1;
        let created = Student {
            id: StudentId(inner.next_id),
            ..student
        };
        inner.students.insert(created.id.0, created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        id: StudentId,
        student: &Student,
    ) -> Result<Option<Student>, RepositoryError> {
        let mut inner = self.lock()?;

        if inner
            .students
            .values()
            .any(|s| s.id != id && s.email.eq_ignore_ascii_case(&student.email))
        {
            return Err(RepositoryError::ConstraintViolation(format!(
                "email already registered: {}",
                student.email
            )));
        }
        if let Some(cpf) = student.cpf.as_deref() {
            if inner
                .students
                .values()
                .any(|s| s.id != id && s.cpf.as_deref() == Some(cpf))
            {
                return Err(RepositoryError::ConstraintViolation(format!(
                    "cpf already registered: {cpf}"
                )));
            }
        }

        let Some(existing) = inner.students.get_mut(&id.0) else {
            return Ok(None);
        };

        existing.name = student.name.clone();
        existing.email = student.email.clone();
        existing.phone = student.phone.clone();
        existing.cpf = student.cpf.clone();
        existing.birth_date = student.birth_date;
        existing.address = student.address.clone();
        existing.city = student.city.clone();
        existing.state = student.state.clone();
        existing.postal_code = student.postal_code.clone();
        existing.status = student.status;
        existing.notes = student.notes.clone();
        existing.updated_at = Some(Utc::now());

        Ok(Some(existing.clone()))
    }

    async fn delete(&self, id: StudentId) -> Result<bool, RepositoryError> {
        let mut inner = self.lock()?;
        Ok(inner.students.remove(&id.0).is_some())
    }

    async fn get_by_status(
        &self,
        status: StudentStatus,
    ) -> Result<Vec<Student>, RepositoryError> {
        let inner = self.lock()?;
        Ok(sorted_by_name(
            inner
                .students
                .values()
                .filter(|s| s.status == status)
                .cloned()
                .collect(),
        ))
    }

    async fn search(&self, term: &str) -> Result<Vec<Student>, RepositoryError> {
        let inner = self.lock()?;
        let needle = term.to_lowercase();
        Ok(sorted_by_name(
            inner
                .students
                .values()
                .filter(|s| {
                    s.name.to_lowercase().contains(&needle)
                        || s.email.to_lowercase().contains(&needle)
                        || s.cpf.as_deref().is_some_and(|c| c.contains(term))
                })
                .cloned()
                .collect(),
        ))
    }

    async fn exists(&self, id: StudentId) -> Result<bool, RepositoryError> {
        let inner = self.lock()?;
        Ok(inner.students.contains_key(&id.0))
    }

    async fn email_exists(&self, email: &str) -> Result<bool, RepositoryError> {
        let inner = self.lock()?;
        Ok(inner
            .students
            .values()
            .any(|s| s.email.eq_ignore_ascii_case(email)))
    }

    async fn cpf_exists(&self, cpf: &str) -> Result<bool, RepositoryError> {
        let inner = self.lock()?;
        Ok(inner.students.values().any(|s| s.cpf.as_deref() == Some(cpf)))
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        let inner = self.lock()?;
        Ok(inner.students.len() as i64)
    }
}
