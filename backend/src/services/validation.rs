//! Request body validation for student writes.
//!
//! Bodies are parsed into a loose JSON object first so that a missing field,
//! a `null`, and an empty string are all reported the same way, and so that
//! numbers supplied for string columns are accepted.

use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::api::{NewStudent, StudentFields, StudentKey, StudentRowId};

/// Fields an insert must carry, in the order they are checked.
pub const REQUIRED_FIELDS: [&str; 6] = [
    "student_id",
    "first_name",
    "last_name",
    "date_of_birth",
    "gender",
    "email",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Input rejected before any repository call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("Invalid JSON input")]
    InvalidJson,
    #[error("Field '{0}' is required")]
    MissingField(&'static str),
    #[error("Student ID or ID is required for update")]
    MissingUpdateKey,
    #[error("Student ID required for deletion")]
    MissingDeleteKey,
    #[error("Field 'date_of_birth' must be a date in YYYY-MM-DD format")]
    InvalidDate,
    #[error("Field 'id' must be an integer")]
    InvalidId,
}

/// A request body that parsed as a JSON object.
#[derive(Debug, Clone, Default)]
pub struct StudentPayload {
    values: Map<String, Value>,
}

impl StudentPayload {
    /// Parse a raw request body.
    ///
    /// # Errors
    /// `InputError::InvalidJson` when the body is not a JSON object.
    pub fn parse(body: &[u8]) -> Result<Self, InputError> {
        match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(values)) => Ok(Self { values }),
            _ => Err(InputError::InvalidJson),
        }
    }

    /// Non-empty scalar value of `name`, rendered as text.
    pub fn text(&self, name: &str) -> Option<String> {
        match self.values.get(name)? {
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    fn require(&self, name: &'static str) -> Result<String, InputError> {
        self.text(name).ok_or(InputError::MissingField(name))
    }

    fn date_of_birth(&self) -> Result<NaiveDate, InputError> {
        let raw = self.require("date_of_birth")?;
        NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| InputError::InvalidDate)
    }

    /// Every mutable column; required ones must be present, optional ones
    /// default to `None`.
    fn fields(&self) -> Result<StudentFields, InputError> {
        let first_name = self.require("first_name")?;
        let last_name = self.require("last_name")?;
        let date_of_birth = self.date_of_birth()?;
        let gender = self.require("gender")?;
        let email = self.require("email")?;

        Ok(StudentFields {
            first_name,
            last_name,
            date_of_birth,
            gender,
            email,
            phone: self.text("phone"),
            address: self.text("address"),
            emergency_contact_name: self.text("emergency_contact_name"),
            emergency_contact_phone: self.text("emergency_contact_phone"),
            medical_conditions: self.text("medical_conditions"),
            allergies: self.text("allergies"),
            medications: self.text("medications"),
            blood_type: self.text("blood_type"),
        })
    }

    /// Validate an insert body.
    ///
    /// # Errors
    /// Names the first missing field of [`REQUIRED_FIELDS`], then checks the
    /// date format.
    pub fn into_new_student(self) -> Result<NewStudent, InputError> {
        if let Some(missing) = REQUIRED_FIELDS
            .iter()
            .find(|field| self.text(field).is_none())
        {
            return Err(InputError::MissingField(*missing));
        }

        Ok(NewStudent {
            student_id: self.require("student_id")?,
            fields: self.fields()?,
        })
    }

    /// Validate an update body, returning the target row and its new columns.
    ///
    /// The surrogate `id` wins over `student_id` when both are supplied.
    pub fn into_update(self) -> Result<(StudentKey, StudentFields), InputError> {
        let key = match (self.text("id"), self.text("student_id")) {
            (Some(id), _) => id
                .trim()
                .parse::<i64>()
                .map(|id| StudentKey::Id(StudentRowId::new(id)))
                .map_err(|_| InputError::InvalidId)?,
            (None, Some(student_id)) => StudentKey::External(student_id),
            (None, None) => return Err(InputError::MissingUpdateKey),
        };

        Ok((key, self.fields()?))
    }
}

/// Key for `?id=` lookups. A present but empty `id` is still a key; it
/// matches no row.
pub fn lookup_key(id: Option<&str>) -> Option<StudentKey> {
    id.map(|raw| StudentKey::Any(raw.to_string()))
}
