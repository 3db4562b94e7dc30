use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

use super::schema::students;
use crate::api::{NewStudent, StudentFields, StudentRecord, StudentRowId};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = students)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StudentRow {
    pub id: i64,
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

impl From<StudentRow> for StudentRecord {
    fn from(row: StudentRow) -> Self {
        StudentRecord {
            id: StudentRowId(row.id),
            student_id: row.student_id,
            first_name: row.first_name,
            last_name: row.last_name,
            date_of_birth: row.date_of_birth,
            gender: row.gender,
            email: row.email,
            phone: row.phone,
            address: row.address,
            emergency_contact_name: row.emergency_contact_name,
            emergency_contact_phone: row.emergency_contact_phone,
            medical_conditions: row.medical_conditions,
            allergies: row.allergies,
            medications: row.medications,
            blood_type: row.blood_type,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = students)]
pub struct NewStudentRow {
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
}

impl From<&NewStudent> for NewStudentRow {
    fn from(student: &NewStudent) -> Self {
        let f = student.fields.clone();
        NewStudentRow {
            student_id: student.student_id.clone(),
            first_name: f.first_name,
            last_name: f.last_name,
            date_of_birth: f.date_of_birth,
            gender: f.gender,
            email: f.email,
            phone: f.phone,
            address: f.address,
            emergency_contact_name: f.emergency_contact_name,
            emergency_contact_phone: f.emergency_contact_phone,
            medical_conditions: f.medical_conditions,
            allergies: f.allergies,
            medications: f.medications,
            blood_type: f.blood_type,
        }
    }
}

/// Full-record update. `None` optionals are written as NULL rather than skipped.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = students)]
#[diesel(treat_none_as_null = true)]
pub struct StudentChangeset {
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

impl StudentChangeset {
    pub fn new(fields: &StudentFields) -> Self {
        let f = fields.clone();
        StudentChangeset {
            first_name: f.first_name,
            last_name: f.last_name,
            date_of_birth: f.date_of_birth,
            gender: f.gender,
            email: f.email,
            phone: f.phone,
            address: f.address,
            emergency_contact_name: f.emergency_contact_name,
            emergency_contact_phone: f.emergency_contact_phone,
            medical_conditions: f.medical_conditions,
            allergies: f.allergies,
            medications: f.medications,
            blood_type: f.blood_type,
        }
    }
}
