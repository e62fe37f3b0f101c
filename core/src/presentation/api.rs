// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! HTTP boundary for the students service.
//!
//! Thin translation layer: request shapes are validated here (the domain
//! service assumes well-formed input), service outcomes map to status codes.
//! Uniqueness refusals and misses both arrive as absence from the service,
//! so the mapping is necessarily coarse: create → 409, update → 404.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::error;

use crate::application::student_service::{DeleteOutcome, StudentService};
use crate::domain::student::{NewStudent, StudentId, StudentPatch, StudentStatus};
use crate::domain::validate::{validate_new_student, validate_patch};

pub struct AppState {
    pub students: Arc<dyn StudentService>,
}

pub fn app(students: Arc<dyn StudentService>) -> Router {
    let state = Arc::new(AppState { students });

    Router::new()
        .route("/health", get(health))
        .route("/api/students", post(create_student).get(list_students))
        .route("/api/students/count", get(count_students))
        .route("/api/students/search", get(search_students))
        .route("/api/students/status/{status}", get(students_by_status))
        .route("/api/students/email/{email}", get(student_by_email))
        .route("/api/students/cpf/{cpf}", get(student_by_cpf))
        .route(
            "/api/students/{id}",
            put(update_student).get(student_by_id).delete(delete_student),
        )
        .route("/api/students/{id}/exists", get(student_exists))
        .route("/api/students/{id}/payments", get(student_payments))
        .route("/api/trainings/active", get(active_trainings))
        .route("/api/trainings/{id}", get(training_by_id))
        .with_state(state)
}

fn internal_error(err: anyhow::Error) -> Response {
    error!(error = ?err, "request failed with internal error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": "internal error"})),
    )
        .into_response()
}

fn bad_request(message: impl ToString) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"error": message.to_string()})),
    )
        .into_response()
}

fn not_found(message: &str) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({"error": message}))).into_response()
}

/// Identities are positive; reject non-positive ids before touching the
/// service.
fn checked_id(id: i64) -> Result<StudentId, Response> {
    if id > 0 {
        Ok(StudentId(id))
    } else {
        Err(bad_request("id must be greater than zero"))
    }
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

async fn create_student(
    State(state): State<Arc<AppState>>,
    Json(input): Json<NewStudent>,
) -> Response {
    if let Err(e) = validate_new_student(&input) {
        return bad_request(e);
    }
    match state.students.create_student(input).await {
        Ok(Some(student)) => (StatusCode::CREATED, Json(student)).into_response(),
        Ok(None) => (
            StatusCode::CONFLICT,
            Json(json!({"error": "email or cpf already registered"})),
        )
            .into_response(),
        Err(e) => internal_error(e),
    }
}

async fn list_students(State(state): State<Arc<AppState>>) -> Response {
    match state.students.list_students().await {
        Ok(students) => Json(students).into_response(),
        Err(e) => internal_error(e),
    }
}

async fn student_by_id(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> Response {
    let id = match checked_id(id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match state.students.get_student(id).await {
        Ok(Some(student)) => Json(student).into_response(),
        Ok(None) => not_found("student not found"),
        Err(e) => internal_error(e),
    }
}

async fn update_student(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(patch): Json<StudentPatch>,
) -> Response {
    let id = match checked_id(id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    if let Err(e) = validate_patch(&patch) {
        return bad_request(e);
    }
    match state.students.update_student(id, patch).await {
        Ok(Some(student)) => Json(student).into_response(),
        Ok(None) => not_found("student not found or email/cpf conflict"),
        Err(e) => internal_error(e),
    }
}

async fn delete_student(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> Response {
    let id = match checked_id(id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match state.students.delete_student(id).await {
        Ok(DeleteOutcome::Deleted) => StatusCode::NO_CONTENT.into_response(),
        Ok(DeleteOutcome::Blocked) => (
            StatusCode::CONFLICT,
            Json(json!({"error": "student has payment history"})),
        )
            .into_response(),
        Ok(DeleteOutcome::NotFound) => not_found("student not found"),
        Err(e) => internal_error(e),
    }
}

#[derive(Deserialize)]
struct SearchParams {
    term: String,
}

async fn search_students(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Response {
    match state.students.search_students(&params.term).await {
        Ok(students) => Json(students).into_response(),
        Err(e) => internal_error(e),
    }
}

async fn students_by_status(
    State(state): State<Arc<AppState>>,
    Path(status): Path<String>,
) -> Response {
    let status: StudentStatus = match status.parse() {
        Ok(s) => s,
        Err(e) => return bad_request(e),
    };
    match state.students.students_by_status(status).await {
        Ok(students) => Json(students).into_response(),
        Err(e) => internal_error(e),
    }
}

async fn student_by_email(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Response {
    match state.students.get_student_by_email(&email).await {
        Ok(Some(student)) => Json(student).into_response(),
        Ok(None) => not_found("student not found"),
        Err(e) => internal_error(e),
    }
}

async fn student_by_cpf(State(state): State<Arc<AppState>>, Path(cpf): Path<String>) -> Response {
    match state.students.get_student_by_cpf(&cpf).await {
        Ok(Some(student)) => Json(student).into_response(),
        Ok(None) => not_found("student not found"),
        Err(e) => internal_error(e),
    }
}

async fn student_exists(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> Response {
    let id = match checked_id(id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match state.students.student_exists(id).await {
        Ok(exists) => Json(json!({"exists": exists})).into_response(),
        Err(e) => internal_error(e),
    }
}

async fn count_students(State(state): State<Arc<AppState>>) -> Response {
    match state.students.student_count().await {
        Ok(count) => Json(json!({"count": count})).into_response(),
        Err(e) => internal_error(e),
    }
}

async fn student_payments(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> Response {
    let id = match checked_id(id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match state.students.student_payments(id).await {
        Ok(Some(payments)) => Json(payments).into_response(),
        Ok(None) => not_found("student not found"),
        Err(e) => internal_error(e),
    }
}

async fn training_by_id(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> Response {
    match state.students.training(id).await {
        Ok(Some(training)) => Json(training).into_response(),
        Ok(None) => not_found("training not found"),
        Err(e) => internal_error(e),
    }
}

async fn active_trainings(State(state): State<Arc<AppState>>) -> Response {
    match state.students.active_trainings().await {
        Ok(trainings) => Json(trainings).into_response(),
        Err(e) => internal_error(e),
    }
}
