// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

// ============================================================================
// Value Objects
// ============================================================================

/// Unique identifier for a student, assigned by the record store on creation
/// and never reused or mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StudentId(pub i64);

impl StudentId {
    /// Placeholder identity for records that have not been persisted yet.
    /// The store replaces it on insert.
    pub const UNASSIGNED: StudentId = StudentId(0);
}

impl std::fmt::Display for StudentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a student record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudentStatus {
    Active,
    Inactive,
    Suspended,
    Blocked,
}

impl StudentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StudentStatus::Active => "active",
            StudentStatus::Inactive => "inactive",
            StudentStatus::Suspended => "suspended",
            StudentStatus::Blocked => "blocked",
        }
    }
}

impl FromStr for StudentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "active" => Ok(StudentStatus::Active),
            "inactive" => Ok(StudentStatus::Inactive),
            "suspended" => Ok(StudentStatus::Suspended),
            "blocked" => Ok(StudentStatus::Blocked),
            other => Err(format!("unknown student status: {other}")),
        }
    }
}

impl std::fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Entity
// ============================================================================

/// A persisted student record. Owned exclusively by the record store; the
/// domain service holds no copy across calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
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
    /// None until the first successful update.
    pub updated_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl Student {
    /// Build an unpersisted record from creation input: status defaults to
    /// Active and the registration timestamp is stamped now.
    pub fn new(input: NewStudent) -> Self {
        Self {
            id: StudentId::UNASSIGNED,
            name: input.name,
            email: input.email,
            phone: input.phone,
            cpf: input.cpf,
            birth_date: input.birth_date,
            address: input.address,
            city: input.city,
            state: input.state,
            postal_code: input.postal_code,
            status: StudentStatus::Active,
            registered_at: Utc::now(),
            updated_at: None,
            notes: input.notes,
        }
    }

    /// Apply a patch to the mutable fields, leaving identity and the
    /// registration timestamp untouched. The store stamps `updated_at`.
    pub fn apply_patch(&mut self, patch: &StudentPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(email) = &patch.email {
            self.email = email.clone();
        }
        if let Some(birth_date) = patch.birth_date {
            self.birth_date = birth_date;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        patch.phone.apply(&mut self.phone);
        patch.cpf.apply(&mut self.cpf);
        patch.address.apply(&mut self.address);
        patch.city.apply(&mut self.city);
        patch.state.apply(&mut self.state);
        patch.postal_code.apply(&mut self.postal_code);
        patch.notes.apply(&mut self.notes);
    }
}

/// Creation input: everything the caller provides; identity, status and
/// timestamps are assigned by the service/store.
#[derive(Debug, Clone, Deserialize)]
pub struct NewStudent {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub cpf: Option<String>,
    pub birth_date: NaiveDate,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

// ============================================================================
// Partial Update
// ============================================================================

/// Tri-state wrapper for patchable optional fields, distinguishing a field
/// that was omitted from one explicitly set to null.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Field<T> {
    /// Field not present in the patch: leave the stored value unchanged.
    #[default]
    Absent,
    /// Field present as null: clear the stored value.
    Null,
    /// Field present with a value: overwrite the stored value.
    Value(T),
}

impl<T: Clone> Field<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Field::Absent)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Field::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn apply(&self, slot: &mut Option<T>) {
        match self {
            Field::Absent => {}
            Field::Null => *slot = None,
            Field::Value(v) => *slot = Some(v.clone()),
        }
    }
}

// `#[serde(default)]` on the containing struct yields Absent for omitted
// fields; an explicit null deserializes to Null here.
impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(v) => Field::Value(v),
            None => Field::Null,
        })
    }
}

/// Partial update of a student record. Required fields use `Option` (None =
/// unchanged); clearable optional fields use the tri-state [`Field`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StudentPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Field<String>,
    pub cpf: Field<String>,
    pub birth_date: Option<NaiveDate>,
    pub address: Field<String>,
    pub city: Field<String>,
    pub state: Field<String>,
    pub postal_code: Field<String>,
    pub status: Option<StudentStatus>,
    pub notes: Field<String>,
}
