//! Service layer for request-level business logic.
//!
//! Validation of inbound bodies lives here so the HTTP handlers stay thin and
//! every rule can be exercised without a running server.

pub mod validation;

pub use validation::{lookup_key, InputError, StudentPayload, REQUIRED_FIELDS};
