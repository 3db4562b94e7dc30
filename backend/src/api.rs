//! Public API surface for the Rust backend.
//!
//! This file consolidates the record types shared by the repository layer and
//! the HTTP API. All types derive Serialize/Deserialize for JSON serialization.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Student surrogate key (database primary key).
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct StudentRowId(pub i64);

impl StudentRowId {
    pub fn new(value: i64) -> Self {
        StudentRowId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for StudentRowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for StudentRowId {
    fn from(value: i64) -> Self {
        StudentRowId(value)
    }
}

impl From<StudentRowId> for i64 {
    fn from(id: StudentRowId) -> Self {
        id.0
    }
}

/// Every column of a student row that the update operation overwrites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentFields {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub medical_conditions: Option<String>,
    pub allergies: Option<String>,
    pub medications: Option<String>,
    pub blood_type: Option<String>,
}

/// A validated student ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStudent {
    /// Caller-assigned identifier, unique across the table
    pub student_id: String,
    #[serde(flatten)]
    pub fields: StudentFields,
}

/// A stored student row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    /// Server-assigned surrogate key
    pub id: StudentRowId,
    pub student_id: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub medical_conditions: Option<String>,
    pub allergies: Option<String>,
    pub medications: Option<String>,
    pub blood_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StudentRecord {
    /// Build a fresh record from an insert request.
    pub fn from_new(id: StudentRowId, new: &NewStudent, now: DateTime<Utc>) -> Self {
        let StudentFields {
            first_name,
            last_name,
            date_of_birth,
            gender,
            email,
            phone,
            address,
            emergency_contact_name,
            emergency_contact_phone,
            medical_conditions,
            allergies,
            medications,
            blood_type,
        } = new.fields.clone();

        Self {
            id,
            student_id: new.student_id.clone(),
            first_name,
            last_name,
            date_of_birth,
            gender,
            email,
            phone,
            address,
            emergency_contact_name,
            emergency_contact_phone,
            medical_conditions,
            allergies,
            medications,
            blood_type,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite every mutable column with `fields`.
    pub fn apply(&mut self, fields: &StudentFields) {
        let StudentFields {
            first_name,
            last_name,
            date_of_birth,
            gender,
            email,
            phone,
            address,
            emergency_contact_name,
            emergency_contact_phone,
            medical_conditions,
            allergies,
            medications,
            blood_type,
        } = fields.clone();

        self.first_name = first_name;
        self.last_name = last_name;
        self.date_of_birth = date_of_birth;
        self.gender = gender;
        self.email = email;
        self.phone = phone;
        self.address = address;
        self.emergency_contact_name = emergency_contact_name;
        self.emergency_contact_phone = emergency_contact_phone;
        self.medical_conditions = medical_conditions;
        self.allergies = allergies;
        self.medications = medications;
        self.blood_type = blood_type;
    }

    /// The mutable columns of this record.
    pub fn fields(&self) -> StudentFields {
        StudentFields {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            date_of_birth: self.date_of_birth,
            gender: self.gender.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
            emergency_contact_name: self.emergency_contact_name.clone(),
            emergency_contact_phone: self.emergency_contact_phone.clone(),
            medical_conditions: self.medical_conditions.clone(),
            allergies: self.allergies.clone(),
            medications: self.medications.clone(),
            blood_type: self.blood_type.clone(),
        }
    }
}

/// Result of a successful insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedStudent {
    pub id: StudentRowId,
    pub student_id: String,
}

/// How a request addresses an existing student row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudentKey {
    /// Matches either the surrogate key or the external `student_id`.
    Any(String),
    /// Matches the surrogate key only.
    Id(StudentRowId),
    /// Matches the external `student_id` only.
    External(String),
}

impl StudentKey {
    /// Surrogate key candidate carried by this key, if any.
    pub fn row_id(&self) -> Option<StudentRowId> {
        match self {
            StudentKey::Any(raw) => raw.trim().parse::<i64>().ok().map(StudentRowId),
            StudentKey::Id(id) => Some(*id),
            StudentKey::External(_) => None,
        }
    }

    /// External identifier candidate carried by this key, if any.
    pub fn external(&self) -> Option<&str> {
        match self {
            StudentKey::Any(raw) | StudentKey::External(raw) => Some(raw.as_str()),
            StudentKey::Id(_) => None,
        }
    }

    /// Whether `record` is addressed by this key.
    pub fn matches(&self, record: &StudentRecord) -> bool {
        self.row_id() == Some(record.id) || self.external() == Some(record.student_id.as_str())
    }
}

impl std::fmt::Display for StudentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StudentKey::Any(raw) => write!(f, "{}", raw),
            StudentKey::Id(id) => write!(f, "id={}", id),
            StudentKey::External(raw) => write!(f, "student_id={}", raw),
        }
    }
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod api_tests;
