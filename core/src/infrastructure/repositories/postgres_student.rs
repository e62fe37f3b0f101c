// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # PostgreSQL Student Repository
//!
//! Production [`StudentRepository`] implementation backed by the `students`
//! table via `sqlx`. Uniqueness of email (case-insensitive) and CPF is
//! enforced by unique indexes; violations surface as
//! `RepositoryError::ConstraintViolation` through the `From<sqlx::Error>`
//! mapping. Name/email search matching is pinned to `ILIKE` and CPF to
//! `LIKE`, rather than left to store collation.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

use crate::domain::repository::{RepositoryError, StudentRepository};
use crate::domain::student::{Student, StudentId, StudentStatus};

const STUDENT_COLUMNS: &str = "id, name, email, phone, cpf, birth_date, address, city, \
     state, postal_code, status, registered_at, updated_at, notes";

pub struct PostgresStudentRepository {
    pool: PgPool,
}

impl PostgresStudentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Escape LIKE metacharacters so a search term is matched literally. The
/// queries pair this with `ESCAPE '\'`; without it a term containing `%` or
/// `_` would act as a wildcard and diverge from the in-memory backend's
/// plain substring matching.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn student_from_row(row: &PgRow) -> Student {
    let status: String = row.get("status");
    Student {
        id: StudentId(row.get("id")),
        name: row.get("name"),
        email: row.get("email"),
        phone: row.get("phone"),
        cpf: row.get("cpf"),
        birth_date: row.get("birth_date"),
        address: row.get("address"),
        city: row.get("city"),
        state: row.get("state"),
        postal_code: row.get("postal_code"),
        status: status.parse().unwrap_or(StudentStatus::Active),
        registered_at: row.get("registered_at"),
        updated_at: row.get("updated_at"),
        notes: row.get("notes"),
    }
}

#[async_trait]
impl StudentRepository for PostgresStudentRepository {
    async fn list_all(&self) -> Result<Vec<Student>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students ORDER BY name ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(student_from_row).collect())
    }

    async fn get_by_id(&self, id: StudentId) -> Result<Option<Student>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE id = $1"
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(student_from_row))
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Student>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE lower(email) = lower($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(student_from_row))
    }

    async fn get_by_cpf(&self, cpf: &str) -> Result<Option<Student>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE cpf = $1"
        ))
        .bind(cpf)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(student_from_row))
    }

    async fn create(&self, student: Student) -> Result<Student, RepositoryError> {
        let row = sqlx::query(
            r#"
            INSERT INTO students (
                name, email, phone, cpf, birth_date, address, city, state,
                postal_code, status, registered_at, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id
            "#,
        )
        .bind(&student.name)
        .bind(&student.email)
        .bind(&student.phone)
        .bind(&student.cpf)
        .bind(student.birth_date)
        .bind(&student.address)
        .bind(&student.city)
        .bind(&student.state)
        .bind(&student.postal_code)
        .bind(student.status.as_str())
        .bind(student.registered_at)
        .bind(&student.notes)
        .fetch_one(&self.pool)
        .await?;

        Ok(Student {
            id: StudentId(row.get("id")),
            ..student
        })
    }

    async fn update(
        &self,
        id: StudentId,
        student: &Student,
    ) -> Result<Option<Student>, RepositoryError> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE students SET
                name = $2, email = $3, phone = $4, cpf = $5, birth_date = $6,
                address = $7, city = $8, state = $9, postal_code = $10,
                status = $11, notes = $12, updated_at = now()
            WHERE id = $1
            RETURNING {STUDENT_COLUMNS}
            "#
        ))
        .bind(id.0)
        .bind(&student.name)
        .bind(&student.email)
        .bind(&student.phone)
        .bind(&student.cpf)
        .bind(student.birth_date)
        .bind(&student.address)
        .bind(&student.city)
        .bind(&student.state)
        .bind(&student.postal_code)
        .bind(student.status.as_str())
        .bind(&student.notes)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(student_from_row))
    }

    async fn delete(&self, id: StudentId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn get_by_status(
        &self,
        status: StudentStatus,
    ) -> Result<Vec<Student>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE status = $1 ORDER BY name ASC"
        ))
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(student_from_row).collect())
    }

    async fn search(&self, term: &str) -> Result<Vec<Student>, RepositoryError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {STUDENT_COLUMNS} FROM students
            WHERE name ILIKE '%' || $1 || '%' ESCAPE '\'
               OR email ILIKE '%' || $1 || '%' ESCAPE '\'
               OR (cpf IS NOT NULL AND cpf LIKE '%' || $1 || '%' ESCAPE '\')
            ORDER BY name ASC
            "#
        ))
        .bind(escape_like(term))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(student_from_row).collect())
    }

    async fn exists(&self, id: StudentId) -> Result<bool, RepositoryError> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM students WHERE id = $1) AS found")
            .bind(id.0)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get("found"))
    }

    async fn email_exists(&self, email: &str) -> Result<bool, RepositoryError> {
        let row = sqlx::query(
            "SELECT EXISTS(SELECT 1 FROM students WHERE lower(email) = lower($1)) AS found",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get("found"))
    }

    async fn cpf_exists(&self, cpf: &str) -> Result<bool, RepositoryError> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM students WHERE cpf = $1) AS found")
            .bind(cpf)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get("found"))
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM students")
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get("total"))
    }
}
