// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod repository;
pub mod student;
pub mod validate;

pub use repository::{PostgresConfig, RepositoryError, StorageBackend, StudentRepository};
pub use student::{Field, NewStudent, Student, StudentId, StudentPatch, StudentStatus};
