//! Repository factory for dependency injection.
//!
//! This module provides utilities for creating and configuring repository instances
//! based on runtime configuration.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use log::info;

use super::repo_config::RepositoryConfig;
use super::repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
use super::repositories::PostgresRepository;
use super::repository::{RepositoryError, RepositoryResult, StudentRepository};
use super::PostgresConfig;

/// Repository type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// Postgres + Diesel implementation
    Postgres,
    /// In-memory local repository
    Local,
}

impl FromStr for RepositoryType {
    type Err = String;

    /// Parse repository type from string ("postgres", "pg", "local").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "pg" => Ok(Self::Postgres),
            "local" => Ok(Self::Local),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

impl RepositoryType {
    /// Get repository type from environment variable.
    ///
    /// Reads `REPOSITORY_TYPE`, which must name a known backend when set.
    /// Unset, it defaults to Postgres if a database URL is present,
    /// otherwise Local.
    pub fn from_env() -> RepositoryResult<Self> {
        if let Ok(val) = std::env::var("REPOSITORY_TYPE") {
            return val.parse().map_err(|e| {
                RepositoryError::configuration(format!("Invalid REPOSITORY_TYPE: {}", e))
            });
        }

        if std::env::var("DATABASE_URL").is_ok() || std::env::var("PG_DATABASE_URL").is_ok() {
            Ok(Self::Postgres)
        } else {
            Ok(Self::Local)
        }
    }
}

/// Repository factory for creating repository instances.
///
/// # Example
/// ```ignore
/// use student_records::db::{RepositoryFactory, RepositoryType};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let local_repo = RepositoryFactory::create(RepositoryType::Local, None).await?;
///     Ok(())
/// }
/// ```
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create a repository instance based on type.
    ///
    /// `postgres_config` is required for [`RepositoryType::Postgres`].
    pub async fn create(
        repo_type: RepositoryType,
        postgres_config: Option<&PostgresConfig>,
    ) -> RepositoryResult<Arc<dyn StudentRepository>> {
        match repo_type {
            RepositoryType::Postgres => {
                #[cfg(feature = "postgres-repo")]
                {
                    let config = postgres_config.ok_or_else(|| {
                        RepositoryError::configuration(
                            "Postgres repository requires PostgresConfig",
                        )
                    })?;
                    let pg = Self::create_postgres(config).await?;
                    Ok(pg as Arc<dyn StudentRepository>)
                }
                #[cfg(not(feature = "postgres-repo"))]
                {
                    let _ = postgres_config;
                    Err(RepositoryError::configuration(
                        "Postgres repository feature not enabled",
                    ))
                }
            }
            RepositoryType::Local => Ok(Self::create_local()),
        }
    }

    /// Create a Postgres repository, running migrations on a blocking thread.
    #[cfg(feature = "postgres-repo")]
    pub async fn create_postgres(
        config: &PostgresConfig,
    ) -> RepositoryResult<Arc<PostgresRepository>> {
        let config = config.clone();
        let repo = tokio::task::spawn_blocking(move || PostgresRepository::new(config))
            .await
            .map_err(|e| RepositoryError::internal(format!("Task join error: {}", e)))??;
        Ok(Arc::new(repo))
    }

    /// Create an in-memory local repository.
    pub fn create_local() -> Arc<dyn StudentRepository> {
        Arc::new(LocalRepository::new())
    }

    /// Create repository from environment configuration.
    ///
    /// Reads `REPOSITORY_TYPE` to determine which repository to create.
    pub async fn from_env() -> RepositoryResult<Arc<dyn StudentRepository>> {
        let repo_type = RepositoryType::from_env()?;
        info!("Using {:?} repository", repo_type);

        match repo_type {
            RepositoryType::Postgres => {
                #[cfg(feature = "postgres-repo")]
                {
                    let config =
                        PostgresConfig::from_env().map_err(RepositoryError::configuration)?;
                    Self::create(RepositoryType::Postgres, Some(&config)).await
                }
                #[cfg(not(feature = "postgres-repo"))]
                {
                    Self::create(RepositoryType::Postgres, None).await
                }
            }
            RepositoryType::Local => Ok(Self::create_local()),
        }
    }

    /// Create repository from a TOML configuration file.
    pub async fn from_config_file<P: AsRef<Path>>(
        config_path: P,
    ) -> RepositoryResult<Arc<dyn StudentRepository>> {
        let config = RepositoryConfig::from_file(config_path)?;
        Self::from_repository_config(&config).await
    }

    /// Create repository from an already-loaded configuration.
    pub async fn from_repository_config(
        config: &RepositoryConfig,
    ) -> RepositoryResult<Arc<dyn StudentRepository>> {
        let repo_type = config
            .repository_type()
            .map_err(RepositoryError::configuration)?;
        let postgres_config = config.to_postgres_config()?;
        Self::create(repo_type, postgres_config.as_ref()).await
    }

    /// Pick the backend for this process.
    ///
    /// Order of precedence:
    /// 1. `REPOSITORY_TYPE` environment variable
    /// 2. `repository.toml` in one of the standard locations
    /// 3. Postgres when `DATABASE_URL`/`PG_DATABASE_URL` is set, local otherwise
    pub async fn resolve() -> RepositoryResult<Arc<dyn StudentRepository>> {
        if std::env::var("REPOSITORY_TYPE").is_err() {
            if let Some(path) = RepositoryConfig::find_default() {
                info!("Loading repository configuration from {}", path.display());
                return Self::from_config_file(path).await;
            }
        }

        Self::from_env().await
    }
}
