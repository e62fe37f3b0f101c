// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod gateways;
pub mod student_service;

pub use gateways::{Liability, Payment, PaymentsGateway, Training, TrainingAccess, TrainingsGateway};
pub use student_service::{
    DeleteOutcome, StandardStudentService, StudentPayments, StudentResponse, StudentService,
};
