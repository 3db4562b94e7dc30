//! In-memory repository for development and tests.
//!
//! Rows live in a `BTreeMap` keyed by surrogate id behind a single
//! `parking_lot::RwLock`. Inserts hold the write lock across the duplicate
//! checks and the insert itself, so two concurrent inserts of the same
//! `student_id` cannot both succeed.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use log::debug;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::api::{
    CreatedStudent, NewStudent, StudentFields, StudentKey, StudentRecord, StudentRowId,
};
use crate::db::repository::{
    ErrorContext, RepositoryError, RepositoryResult, StudentRepository, UniqueField,
};

#[derive(Debug, Default)]
struct StudentTable {
    last_id: i64,
    rows: BTreeMap<i64, StudentRecord>,
}

impl StudentTable {
    fn find(&self, key: &StudentKey) -> Option<&StudentRecord> {
        self.rows.values().find(|record| key.matches(record))
    }

    fn find_id(&self, key: &StudentKey) -> Option<i64> {
        self.find(key).map(|record| record.id.value())
    }

    fn email_owner(&self, email: &str) -> Option<i64> {
        self.rows
            .values()
            .find(|record| record.email == email)
            .map(|record| record.id.value())
    }
}

/// In-memory implementation of [`StudentRepository`].
#[derive(Debug, Clone, Default)]
pub struct LocalRepository {
    table: Arc<RwLock<StudentTable>>,
}

impl LocalRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored students.
    pub fn len(&self) -> usize {
        self.table.read().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn not_found(operation: &str, key: &StudentKey) -> RepositoryError {
    RepositoryError::not_found_with_context(
        "Student not found",
        ErrorContext::student(operation).with_entity_id(key),
    )
}

#[async_trait]
impl StudentRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }

    async fn list_students(&self) -> RepositoryResult<Vec<StudentRecord>> {
        let table = self.table.read();
        let mut students: Vec<StudentRecord> = table.rows.values().cloned().collect();
        students.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(students)
    }

    async fn find_student(&self, key: &StudentKey) -> RepositoryResult<StudentRecord> {
        self.table
            .read()
            .find(key)
            .cloned()
            .ok_or_else(|| not_found("find_student", key))
    }

    async fn insert_student(&self, student: &NewStudent) -> RepositoryResult<CreatedStudent> {
        let mut table = self.table.write();

        let context = || ErrorContext::student("insert_student").with_entity_id(&student.student_id);
        if table
            .find(&StudentKey::External(student.student_id.clone()))
            .is_some()
        {
            return Err(RepositoryError::duplicate(UniqueField::StudentId, context()));
        }
        if table.email_owner(&student.fields.email).is_some() {
            return Err(RepositoryError::duplicate(UniqueField::Email, context()));
        }

        table.last_id += 1;
        let id = StudentRowId::new(table.last_id);
        let record = StudentRecord::from_new(id, student, Utc::now());
        table.rows.insert(id.value(), record);

        debug!("Inserted student {} with id={}", student.student_id, id);
        Ok(CreatedStudent {
            id,
            student_id: student.student_id.clone(),
        })
    }

    async fn update_student(
        &self,
        key: &StudentKey,
        fields: &StudentFields,
    ) -> RepositoryResult<()> {
        let mut table = self.table.write();

        let row_id = table
            .find_id(key)
            .ok_or_else(|| not_found("update_student", key))?;
        if matches!(table.email_owner(&fields.email), Some(owner) if owner != row_id) {
            return Err(RepositoryError::duplicate(
                UniqueField::Email,
                ErrorContext::student("update_student").with_entity_id(key),
            ));
        }

        let record = table
            .rows
            .get_mut(&row_id)
            .ok_or_else(|| not_found("update_student", key))?;
        record.apply(fields);
        // updated_at must move forward even when the clock has not ticked.
        record.updated_at = Utc::now().max(record.updated_at + Duration::microseconds(1));

        debug!("Updated student id={}", row_id);
        Ok(())
    }

    async fn delete_student(&self, key: &StudentKey) -> RepositoryResult<()> {
        let mut table = self.table.write();
        let before = table.rows.len();
        table.rows.retain(|_, record| !key.matches(record));

        if table.rows.len() == before {
            return Err(not_found("delete_student", key));
        }
        debug!("Deleted {} student(s) matching {}", before - table.rows.len(), key);
        Ok(())
    }
}
