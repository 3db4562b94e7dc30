//! High-level database operations.
//!
//! These functions work with any [`StudentRepository`] implementation and are
//! what the HTTP layer calls. Errors that reach them without an operation
//! name get tagged with the service call that surfaced them.

use crate::api::{CreatedStudent, NewStudent, StudentFields, StudentKey, StudentRecord};
use crate::db::repository::{RepositoryResult, StudentRepository};

/// Check that the repository answers queries.
pub async fn health_check<R: StudentRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

/// All students, newest first.
pub async fn list_students<R: StudentRepository + ?Sized>(
    repo: &R,
) -> RepositoryResult<Vec<StudentRecord>> {
    repo.list_students()
        .await
        .map_err(|e| e.or_operation("list_students"))
}

/// A single student by surrogate key or external identifier.
pub async fn get_student<R: StudentRepository + ?Sized>(
    repo: &R,
    key: &StudentKey,
) -> RepositoryResult<StudentRecord> {
    repo.find_student(key)
        .await
        .map_err(|e| e.or_operation("get_student"))
}

/// Persist a validated student.
pub async fn create_student<R: StudentRepository + ?Sized>(
    repo: &R,
    student: &NewStudent,
) -> RepositoryResult<CreatedStudent> {
    repo.insert_student(student)
        .await
        .map_err(|e| e.or_operation("create_student"))
}

/// Overwrite every mutable column of an existing student.
pub async fn update_student<R: StudentRepository + ?Sized>(
    repo: &R,
    key: &StudentKey,
    fields: &StudentFields,
) -> RepositoryResult<()> {
    repo.update_student(key, fields)
        .await
        .map_err(|e| e.or_operation("update_student"))
}

/// Remove a student by surrogate key or external identifier.
pub async fn delete_student<R: StudentRepository + ?Sized>(
    repo: &R,
    key: &StudentKey,
) -> RepositoryResult<()> {
    repo.delete_student(key)
        .await
        .map_err(|e| e.or_operation("delete_student"))
}
