//! Shared helpers for integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use std::collections::HashSet;
use std::sync::Mutex;

use student_records::api::{NewStudent, StudentFields};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().expect("ENV_LOCK poisoned");
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// Mutable columns of a valid student; optional columns left empty.
pub fn student_fields(first_name: &str, email: &str) -> StudentFields {
    StudentFields {
        first_name: first_name.to_string(),
        last_name: "Doe".to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(2000, 5, 15).unwrap(),
        gender: "Male".to_string(),
        email: email.to_string(),
        phone: None,
        address: None,
        emergency_contact_name: None,
        emergency_contact_phone: None,
        medical_conditions: None,
        allergies: None,
        medications: None,
        blood_type: None,
    }
}

/// A valid insert request for `student_id`, with an email derived from it.
pub fn new_student(student_id: &str) -> NewStudent {
    NewStudent {
        student_id: student_id.to_string(),
        fields: student_fields("John", &format!("{}@example.com", student_id.to_lowercase())),
    }
}
