#[cfg(test)]
mod tests {
    use crate::api::{NewStudent, StudentFields, StudentKey, StudentRecord, StudentRowId};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn sample_fields() -> StudentFields {
        StudentFields {
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(2000, 5, 15).unwrap(),
            gender: "Male".to_string(),
            email: "john@example.com".to_string(),
            phone: None,
            address: None,
            emergency_contact_name: None,
            emergency_contact_phone: None,
            medical_conditions: None,
            allergies: Some("Peanuts".to_string()),
            medications: None,
            blood_type: Some("O+".to_string()),
        }
    }

    fn sample_record() -> StudentRecord {
        let new = NewStudent {
            student_id: "STU001".to_string(),
            fields: sample_fields(),
        };
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        StudentRecord::from_new(StudentRowId::new(7), &new, now)
    }

    #[test]
    fn test_student_row_id_new() {
        let id = StudentRowId::new(42);
        assert_eq!(id.value(), 42);
        assert_eq!(i64::from(id), 42);
    }

    #[test]
    fn test_student_row_id_serializes_as_number() {
        let json = serde_json::to_value(StudentRowId::new(5)).unwrap();
        assert_eq!(json, serde_json::json!(5));
    }

    #[test]
    fn test_record_from_new_copies_fields() {
        let record = sample_record();
        assert_eq!(record.id, StudentRowId::new(7));
        assert_eq!(record.student_id, "STU001");
        assert_eq!(record.fields(), sample_fields());
        assert_eq!(record.created_at, record.updated_at);
    }

    #[test]
    fn test_apply_clears_absent_optionals() {
        let mut record = sample_record();
        let mut fields = sample_fields();
        fields.allergies = None;
        fields.phone = Some("555-0100".to_string());
        record.apply(&fields);

        assert_eq!(record.allergies, None);
        assert_eq!(record.phone.as_deref(), Some("555-0100"));
        assert_eq!(record.blood_type.as_deref(), Some("O+"));
    }

    #[test]
    fn test_record_json_shape() {
        let json = serde_json::to_value(sample_record()).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["date_of_birth"], "2000-05-15");
        assert!(json["phone"].is_null());
        assert!(json.get("created_at").is_some());
    }

    #[test]
    fn test_key_any_matches_numeric_and_external() {
        let record = sample_record();
        assert!(StudentKey::Any("7".to_string()).matches(&record));
        assert!(StudentKey::Any("STU001".to_string()).matches(&record));
        assert!(!StudentKey::Any("8".to_string()).matches(&record));
    }

    #[test]
    fn test_key_variants_are_exclusive() {
        let record = sample_record();
        assert!(StudentKey::Id(StudentRowId::new(7)).matches(&record));
        assert!(!StudentKey::External("7".to_string()).matches(&record));
        assert!(StudentKey::External("STU001".to_string()).matches(&record));
        assert_eq!(StudentKey::External("STU001".to_string()).row_id(), None);
    }

    #[test]
    fn test_key_any_non_numeric_has_no_row_id() {
        assert_eq!(StudentKey::Any("STU001".to_string()).row_id(), None);
        assert_eq!(
            StudentKey::Any(" 12 ".to_string()).row_id(),
            Some(StudentRowId::new(12))
        );
    }
}
