// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod memory;
pub mod postgres_student;

pub use memory::InMemoryStudentRepository;
pub use postgres_student::PostgresStudentRepository;
