//! HTTP handlers for the students resource.
//!
//! Each handler validates its input, delegates to the service layer and wraps
//! the result in an [`Envelope`]. Validation failures return before any
//! repository call is made.

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, QueryRejection},
        Query, State,
    },
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, info};

use super::dto::{
    CreateStudentResponse, Envelope, HealthResponse, MessageResponse, StudentListResponse,
    StudentQuery, StudentResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::db::services as db_services;
use crate::services::{lookup_key, InputError, StudentPayload};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<Envelope<T>>, AppError>;

fn ok<T: serde::Serialize>(payload: T) -> HandlerResult<T> {
    Ok(Json(Envelope::ok(payload)))
}

fn query_params(
    query: Result<Query<StudentQuery>, QueryRejection>,
) -> Result<StudentQuery, AppError> {
    query
        .map(|Query(q)| q)
        .map_err(|e| AppError::Rejected {
            status: e.status(),
            message: format!("Invalid query string: {}", e.body_text()),
        })
}

fn body_bytes(body: Result<Bytes, BytesRejection>) -> Result<Bytes, AppError> {
    body.map_err(|e| AppError::Rejected {
        status: e.status(),
        message: e.body_text(),
    })
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Verify the service is running and the repository is reachable.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
    })
}

// =============================================================================
// Students resource
// =============================================================================

/// GET /api/students[?action=list][&id=...]
///
/// Lists every student unless an `id` is given (and `action` is not
/// `list`), in which case the single matching student is returned.
pub async fn list_or_get_students(
    State(state): State<AppState>,
    query: Result<Query<StudentQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    let query = query_params(query)?;
    let key = if query.wants_list() {
        None
    } else {
        lookup_key(query.id.as_deref())
    };

    match key {
        Some(key) => {
            let student = db_services::get_student(state.repository.as_ref(), &key).await?;
            Ok(Json(Envelope::ok(StudentResponse { student })).into_response())
        }
        None => {
            let students = db_services::list_students(state.repository.as_ref()).await?;
            Ok(Json(Envelope::ok(StudentListResponse::from(students))).into_response())
        }
    }
}

/// POST /api/students
pub async fn create_student(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> HandlerResult<CreateStudentResponse> {
    let body = body_bytes(body)?;
    let student = StudentPayload::parse(&body)?.into_new_student()?;

    let created = db_services::create_student(state.repository.as_ref(), &student).await?;
    info!("Created student {} (id={})", created.student_id, created.id);

    ok(CreateStudentResponse::from(created))
}

/// PUT /api/students
///
/// The target row is named in the body by `id` or `student_id`.
pub async fn update_student(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> HandlerResult<MessageResponse> {
    let body = body_bytes(body)?;
    let (key, fields) = StudentPayload::parse(&body)?.into_update()?;

    db_services::update_student(state.repository.as_ref(), &key, &fields).await?;
    info!("Updated student {}", key);

    ok(MessageResponse::new("Student updated successfully"))
}

/// DELETE /api/students?id=...
pub async fn delete_student(
    State(state): State<AppState>,
    query: Result<Query<StudentQuery>, QueryRejection>,
) -> HandlerResult<MessageResponse> {
    let query = query_params(query)?;
    let key = lookup_key(query.id.as_deref()).ok_or(InputError::MissingDeleteKey)?;

    db_services::delete_student(state.repository.as_ref(), &key).await?;
    info!("Deleted student {}", key);

    ok(MessageResponse::new("Student deleted successfully"))
}

/// OPTIONS /api/students
///
/// CORS preflight; headers are attached by the router layers.
pub async fn options() {
    debug!("Answered OPTIONS preflight");
}

/// Any verb the resource does not serve.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
