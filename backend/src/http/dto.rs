//! Data Transfer Objects for the HTTP API.
//!
//! Every body the API emits is an [`Envelope`]: a `success` flag with the
//! payload's fields flattened next to it.

use serde::{Deserialize, Serialize};

use crate::api::{CreatedStudent, StudentRecord, StudentRowId};

/// `{"success": ..., ...payload}`.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(flatten)]
    pub payload: T,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(payload: T) -> Self {
        Self {
            success: true,
            payload,
        }
    }
}

impl Envelope<ErrorBody> {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            payload: ErrorBody {
                error: message.into(),
            },
        }
    }
}

/// Failure payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Query string of the students resource.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentQuery {
    /// `list` forces a listing even when `id` is present.
    #[serde(default)]
    pub action: Option<String>,
    /// Surrogate key or external student id.
    #[serde(default)]
    pub id: Option<String>,
}

impl StudentQuery {
    pub fn wants_list(&self) -> bool {
        self.action.as_deref() == Some("list")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentListResponse {
    pub students: Vec<StudentRecord>,
    pub count: usize,
}

impl From<Vec<StudentRecord>> for StudentListResponse {
    fn from(students: Vec<StudentRecord>) -> Self {
        let count = students.len();
        Self { students, count }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentResponse {
    pub student: StudentRecord,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateStudentResponse {
    pub message: String,
    pub student_id: String,
    pub id: StudentRowId,
}

impl From<CreatedStudent> for CreateStudentResponse {
    fn from(created: CreatedStudent) -> Self {
        Self {
            message: "Student created successfully".to_string(),
            student_id: created.student_id,
            id: created.id,
        }
    }
}

/// Payload carrying only a confirmation message.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Database connection status
    pub database: String,
}
