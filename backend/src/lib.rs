//! # Student Records Backend
//!
//! A JSON REST service that stores student records in a single `students`
//! table and exposes create, read, update and delete operations over HTTP.
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: Domain types shared by every layer (`StudentRecord`, `StudentKey`, ...)
//! - [`db`]: Repository trait, Postgres and in-memory backends, and the factory
//!   that picks one from configuration
//! - [`services`]: Request body validation
//! - [`http`]: Axum-based HTTP server, handlers and response envelopes

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod api;

pub mod db;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
