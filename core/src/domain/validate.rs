// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Field-shape validation shared by the boundary layer.
//!
//! Uniqueness is a domain-service concern; everything here is pure and
//! checks a single value against the length and format limits of the
//! `students` table.

use thiserror::Error;

use crate::domain::student::{NewStudent, StudentPatch};

pub const NAME_MAX: usize = 100;
pub const EMAIL_MAX: usize = 150;
pub const PHONE_MAX: usize = 20;
pub const CPF_MAX: usize = 14;
pub const CPF_DIGITS: usize = 11;
pub const ADDRESS_MAX: usize = 200;
pub const CITY_MAX: usize = 50;
pub const STATE_MAX: usize = 2;
pub const POSTAL_CODE_MAX: usize = 10;
pub const NOTES_MAX: usize = 500;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("email must contain '@' and '.'")]
    InvalidEmail,
    #[error("cpf must contain exactly {CPF_DIGITS} digits")]
    InvalidCpf,
}

/// Emails are only shape-checked here; case-insensitive uniqueness is
/// enforced by the domain service and the store's unique index.
pub fn email_shape_ok(email: &str) -> bool {
    !email.is_empty() && email.contains('@') && email.contains('.')
}

/// Strip formatting (dots, dashes, spaces) down to the bare digits.
pub fn normalize_cpf(cpf: &str) -> String {
    cpf.chars().filter(|c| c.is_ascii_digit()).collect()
}

pub fn cpf_shape_ok(cpf: &str) -> bool {
    cpf.chars().count() <= CPF_MAX && normalize_cpf(cpf).len() == CPF_DIGITS
}

fn check_len(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

fn check_opt(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<(), ValidationError> {
    match value {
        Some(v) => check_len(field, v, max),
        None => Ok(()),
    }
}

pub fn validate_new_student(input: &NewStudent) -> Result<(), ValidationError> {
    if input.name.trim().is_empty() {
        return Err(ValidationError::Missing("name"));
    }
    check_len("name", &input.name, NAME_MAX)?;
    if !email_shape_ok(&input.email) {
        return Err(ValidationError::InvalidEmail);
    }
    check_len("email", &input.email, EMAIL_MAX)?;
    check_opt("phone", input.phone.as_deref(), PHONE_MAX)?;
    if let Some(cpf) = input.cpf.as_deref() {
        if !cpf_shape_ok(cpf) {
            return Err(ValidationError::InvalidCpf);
        }
    }
    check_opt("address", input.address.as_deref(), ADDRESS_MAX)?;
    check_opt("city", input.city.as_deref(), CITY_MAX)?;
    check_opt("state", input.state.as_deref(), STATE_MAX)?;
    check_opt("postal_code", input.postal_code.as_deref(), POSTAL_CODE_MAX)?;
    check_opt("notes", input.notes.as_deref(), NOTES_MAX)?;
    Ok(())
}

pub fn validate_patch(patch: &StudentPatch) -> Result<(), ValidationError> {
    if let Some(name) = patch.name.as_deref() {
        if name.trim().is_empty() {
            return Err(ValidationError::Missing("name"));
        }
        check_len("name", name, NAME_MAX)?;
    }
    if let Some(email) = patch.email.as_deref() {
        if !email_shape_ok(email) {
            return Err(ValidationError::InvalidEmail);
        }
        check_len("email", email, EMAIL_MAX)?;
    }
    check_opt("phone", patch.phone.value().map(String::as_str), PHONE_MAX)?;
    if let Some(cpf) = patch.cpf.value() {
        if !cpf_shape_ok(cpf) {
            return Err(ValidationError::InvalidCpf);
        }
    }
    check_opt("address", patch.address.value().map(String::as_str), ADDRESS_MAX)?;
    check_opt("city", patch.city.value().map(String::as_str), CITY_MAX)?;
    check_opt("state", patch.state.value().map(String::as_str), STATE_MAX)?;
    check_opt(
        "postal_code",
        patch.postal_code.value().map(String::as_str),
        POSTAL_CODE_MAX,
    )?;
    check_opt("notes", patch.notes.value().map(String::as_str), NOTES_MAX)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn input() -> NewStudent {
        NewStudent {
            name: "Ana Silva".to_string(),
            email: "ana@x.com".to_string(),
            phone: None,
            cpf: None,
            birth_date: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            address: None,
            city: None,
            state: None,
            postal_code: None,
            notes: None,
        }
    }

    #[test]
    fn accepts_minimal_valid_input() {
        assert_eq!(validate_new_student(&input()), Ok(()));
    }

    #[test]
    fn rejects_blank_name_and_bad_email() {
        let mut i = input();
        i.name = "   ".to_string();
        assert_eq!(validate_new_student(&i), Err(ValidationError::Missing("name")));

        let mut i = input();
        i.email = "not-an-email".to_string();
        assert_eq!(validate_new_student(&i), Err(ValidationError::InvalidEmail));
    }

    #[test]
    fn cpf_normalization_strips_formatting() {
        assert_eq!(normalize_cpf("123.456.789-01"), "12345678901");
        assert!(cpf_shape_ok("123.456.789-01"));
        assert!(cpf_shape_ok("12345678901"));
        assert!(!cpf_shape_ok("1234567890"));
        // 15 formatted characters exceeds the column width
        assert!(!cpf_shape_ok("123..456.789-01"));
    }

    #[test]
    fn rejects_overlong_fields() {
        let mut i = input();
        i.name = "x".repeat(NAME_MAX + 1);
        assert_eq!(
            validate_new_student(&i),
            Err(ValidationError::TooLong { field: "name", max: NAME_MAX })
        );

        let mut i = input();
        i.state = Some("SPX".to_string());
        assert_eq!(
            validate_new_student(&i),
            Err(ValidationError::TooLong { field: "state", max: STATE_MAX })
        );
    }

    #[test]
    fn patch_validation_skips_absent_fields() {
        let patch = StudentPatch::default();
        assert_eq!(validate_patch(&patch), Ok(()));

        let patch: StudentPatch =
            serde_json::from_str(r#"{"email": "broken"}"#).unwrap();
        assert_eq!(validate_patch(&patch), Err(ValidationError::InvalidEmail));
    }
}
