//! Repository trait for student record storage.
//!
//! Implementations translate each CRUD intent into a single parameterized
//! statement (or a short transaction for inserts) against their backing store.

mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult, UniqueField};
#[cfg(all(test, feature = "postgres-repo"))]
pub(crate) use error::test_support;

use async_trait::async_trait;

use crate::api::{CreatedStudent, NewStudent, StudentFields, StudentKey, StudentRecord};

/// Storage operations for the `students` table.
#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// Check that the backing store answers queries.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// All students, newest `created_at` first.
    async fn list_students(&self) -> RepositoryResult<Vec<StudentRecord>>;

    /// Fetch the single student addressed by `key`.
    ///
    /// # Errors
    /// `RepositoryError::NotFound` when no row matches.
    async fn find_student(&self, key: &StudentKey) -> RepositoryResult<StudentRecord>;

    /// Insert a new student after checking `student_id` and `email` are unused.
    ///
    /// # Errors
    /// `RepositoryError::DuplicateKey` when either unique column is taken.
    async fn insert_student(&self, student: &NewStudent) -> RepositoryResult<CreatedStudent>;

    /// Overwrite every mutable column of the addressed student and refresh
    /// `updated_at`.
    ///
    /// # Errors
    /// `RepositoryError::NotFound` when no row matches, and
    /// `RepositoryError::DuplicateKey` when the new email belongs to another row.
    async fn update_student(&self, key: &StudentKey, fields: &StudentFields)
        -> RepositoryResult<()>;

    /// Delete the addressed student.
    ///
    /// # Errors
    /// `RepositoryError::NotFound` when no row was removed.
    async fn delete_student(&self, key: &StudentKey) -> RepositoryResult<()>;
}
