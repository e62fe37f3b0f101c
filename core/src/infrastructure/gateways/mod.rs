// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod payments;
pub mod trainings;

pub use payments::HttpPaymentsGateway;
pub use trainings::HttpTrainingsGateway;
