//! Postgres repository implementation using Diesel.
//!
//! ## Features
//!
//! - Connection pooling with r2d2; every repository call checks out one
//!   connection and returns it to the pool when the call finishes, on both the
//!   success and the error path
//! - Embedded migrations executed when the pool is created
//! - Duplicate checks and insert run inside one transaction, with the
//!   `students_student_id_key` / `students_email_key` unique constraints as the
//!   final guard
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel::sql_types::Bool;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use log::debug;
use std::time::Duration;
use tokio::task;

use crate::api::{
    CreatedStudent, NewStudent, StudentFields, StudentKey, StudentRecord, StudentRowId,
};
use crate::db::repository::{
    ErrorContext, RepositoryError, RepositoryResult, StudentRepository, UniqueField,
};

mod models;
mod schema;

use models::{NewStudentRow, StudentChangeset, StudentRow};
use schema::students;

type PgPool = Pool<ConnectionManager<PgConnection>>;

type KeyFilter = Box<dyn BoxableExpression<students::table, Pg, SqlType = Bool>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of idle connections kept in the pool
    pub min_pool_size: u32,
    /// Connection checkout timeout in seconds
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
        }
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl PostgresConfig {
    /// Create configuration from environment variables.
    ///
    /// # Errors
    /// Returns an error when neither `DATABASE_URL` nor `PG_DATABASE_URL` is set.
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let defaults = Self::default();
        Ok(Self {
            database_url,
            max_pool_size: env_or("PG_POOL_MAX", defaults.max_pool_size),
            min_pool_size: env_or("PG_POOL_MIN", defaults.min_pool_size),
            connection_timeout_sec: env_or("PG_CONN_TIMEOUT_SEC", defaults.connection_timeout_sec),
            idle_timeout_sec: env_or("PG_IDLE_TIMEOUT_SEC", defaults.idle_timeout_sec),
        })
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

/// Diesel-backed student repository for Postgres.
#[derive(Clone, Debug)]
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    ///
    /// # Errors
    /// Returns `RepositoryError::ConnectionError` if the pool cannot be built and
    /// `RepositoryError::InternalError` if a migration fails.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        {
            let mut conn = pool.get()?;
            Self::run_migrations(&mut conn)?;
        }

        Ok(Self { pool })
    }

    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("run_migrations"),
            )
        })?;

        Ok(())
    }

    /// Run `f` on a pooled connection inside the blocking thread pool.
    ///
    /// The connection goes back to the pool when `f` returns, whatever the
    /// outcome. Failures are not retried.
    async fn with_conn<T, F>(&self, operation: &'static str, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();

        task::spawn_blocking(move || {
            let mut conn = pool
                .get()
                .map_err(|e| RepositoryError::from(e).with_operation(operation))?;
            f(&mut conn)
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }
}

/// `WHERE` clause addressing the row(s) matched by `key`.
fn key_filter(key: &StudentKey) -> KeyFilter {
    match (key.row_id(), key.external()) {
        (Some(id), Some(external)) => Box::new(
            students::id
                .eq(id.value())
                .or(students::student_id.eq(external.to_string())),
        ),
        (Some(id), None) => Box::new(students::id.eq(id.value())),
        (None, Some(external)) => Box::new(students::student_id.eq(external.to_string())),
        (None, None) => Box::new(false.into_sql::<Bool>()),
    }
}

/// `updated_at` assignment taken from the database clock.
fn touch_updated_at() -> diesel::dsl::Eq<students::updated_at, diesel::dsl::now> {
    students::updated_at.eq(diesel::dsl::now)
}

fn not_found(operation: &str, key: &StudentKey) -> RepositoryError {
    RepositoryError::not_found_with_context(
        "Student not found",
        ErrorContext::student(operation).with_entity_id(key),
    )
}

#[async_trait]
impl StudentRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn("health_check", |conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(RepositoryError::from)
        })
        .await
    }

    async fn list_students(&self) -> RepositoryResult<Vec<StudentRecord>> {
        self.with_conn("list_students", |conn| {
            let rows = students::table
                .select(StudentRow::as_select())
                .order((students::created_at.desc(), students::id.desc()))
                .load::<StudentRow>(conn)?;

            Ok(rows.into_iter().map(StudentRecord::from).collect())
        })
        .await
    }

    async fn find_student(&self, key: &StudentKey) -> RepositoryResult<StudentRecord> {
        let key = key.clone();
        self.with_conn("find_student", move |conn| {
            let row = students::table
                .filter(key_filter(&key))
                .select(StudentRow::as_select())
                .order(students::id.asc())
                .first::<StudentRow>(conn)
                .optional()?;

            row.map(StudentRecord::from)
                .ok_or_else(|| not_found("find_student", &key))
        })
        .await
    }

    async fn insert_student(&self, student: &NewStudent) -> RepositoryResult<CreatedStudent> {
        let row = NewStudentRow::from(student);
        self.with_conn("insert_student", move |conn| {
            conn.transaction::<_, RepositoryError, _>(|tx| {
                let context =
                    || ErrorContext::student("insert_student").with_entity_id(&row.student_id);

                let id_taken: bool = diesel::select(exists(
                    students::table.filter(students::student_id.eq(&row.student_id)),
                ))
                .get_result(tx)?;
                if id_taken {
                    return Err(RepositoryError::duplicate(UniqueField::StudentId, context()));
                }

                let email_taken: bool = diesel::select(exists(
                    students::table.filter(students::email.eq(&row.email)),
                ))
                .get_result(tx)?;
                if email_taken {
                    return Err(RepositoryError::duplicate(UniqueField::Email, context()));
                }

                let (id, student_id): (i64, String) = diesel::insert_into(students::table)
                    .values(&row)
                    .returning((students::id, students::student_id))
                    .get_result(tx)?;

                debug!("Inserted student {} with id={}", student_id, id);
                Ok(CreatedStudent {
                    id: StudentRowId(id),
                    student_id,
                })
            })
        })
        .await
    }

    async fn update_student(
        &self,
        key: &StudentKey,
        fields: &StudentFields,
    ) -> RepositoryResult<()> {
        let key = key.clone();
        let changeset = StudentChangeset::new(fields);
        self.with_conn("update_student", move |conn| {
            let affected = diesel::update(students::table)
                .filter(key_filter(&key))
                .set((&changeset, touch_updated_at()))
                .execute(conn)
                .map_err(|e| RepositoryError::from(e).with_entity_id(&key))?;

            if affected == 0 {
                return Err(not_found("update_student", &key));
            }
            debug!("Updated {} student row(s) matching {}", affected, key);
            Ok(())
        })
        .await
    }

    async fn delete_student(&self, key: &StudentKey) -> RepositoryResult<()> {
        let key = key.clone();
        self.with_conn("delete_student", move |conn| {
            let affected = diesel::delete(students::table)
                .filter(key_filter(&key))
                .execute(conn)?;

            if affected == 0 {
                return Err(not_found("delete_student", &key));
            }
            debug!("Deleted {} student row(s) matching {}", affected, key);
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = PostgresConfig::with_url("postgres://localhost/students");
        assert_eq!(config.database_url, "postgres://localhost/students");
        assert_eq!(config.max_pool_size, 10);
        assert_eq!(config.min_pool_size, 1);
        assert_eq!(config.connection_timeout_sec, 30);
        assert_eq!(config.idle_timeout_sec, 600);
    }

    #[test]
    fn test_key_filter_sql_for_any_numeric() {
        let filter = key_filter(&StudentKey::Any("42".to_string()));
        let sql = diesel::debug_query::<Pg, _>(&students::table.filter(filter)).to_string();
        assert!(sql.contains("\"students\".\"id\" = $1"));
        assert!(sql.contains("\"students\".\"student_id\" = $2"));
    }

    #[test]
    fn test_key_filter_sql_for_external_only() {
        let filter = key_filter(&StudentKey::Any("STU001".to_string()));
        let sql = diesel::debug_query::<Pg, _>(&students::table.filter(filter)).to_string();
        assert!(!sql.contains("\"students\".\"id\" ="));
        assert!(sql.contains("\"students\".\"student_id\" = $1"));
    }

    #[test]
    fn test_update_sets_updated_at_from_database_clock() {
        let fields = StudentFields {
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            date_of_birth: chrono::NaiveDate::from_ymd_opt(2000, 5, 15).unwrap(),
            gender: "Male".to_string(),
            email: "john@example.com".to_string(),
            phone: None,
            address: None,
            emergency_contact_name: None,
            emergency_contact_phone: None,
            medical_conditions: None,
            allergies: None,
            medications: None,
            blood_type: None,
        };
        let changeset = StudentChangeset::new(&fields);
        let key = StudentKey::External("STU001".to_string());
        let query = diesel::update(students::table)
            .filter(key_filter(&key))
            .set((&changeset, touch_updated_at()));
        let sql = diesel::debug_query::<Pg, _>(&query).to_string();

        assert!(sql.contains("\"updated_at\" = CURRENT_TIMESTAMP"));
        assert!(sql.contains("\"phone\" = $"));
        assert!(!sql.contains("\"created_at\""));
    }
}
