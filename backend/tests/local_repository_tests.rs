//! Behavioural tests for LocalRepository through the StudentRepository trait.
//!
//! These cover the insert/find/update/delete contract, duplicate handling,
//! ordering of listings, and concurrent inserts.

mod support;

use std::sync::Arc;

use student_records::api::{StudentKey, StudentRowId};
use student_records::db::repositories::LocalRepository;
use student_records::db::repository::{RepositoryError, StudentRepository, UniqueField};
use student_records::db::services;

#[tokio::test]
async fn test_insert_then_find_returns_same_fields() {
    let repo = LocalRepository::new();
    let mut student = support::new_student("STU001");
    student.fields.phone = Some("555-0100".to_string());
    student.fields.blood_type = Some("O+".to_string());

    let created = repo.insert_student(&student).await.unwrap();
    assert_eq!(created.student_id, "STU001");

    let by_external = repo
        .find_student(&StudentKey::Any("STU001".to_string()))
        .await
        .unwrap();
    assert_eq!(by_external.id, created.id);
    assert_eq!(by_external.fields(), student.fields);
    assert_eq!(by_external.created_at, by_external.updated_at);

    let by_surrogate = repo
        .find_student(&StudentKey::Any(created.id.to_string()))
        .await
        .unwrap();
    assert_eq!(by_surrogate, by_external);
}

#[tokio::test]
async fn test_duplicate_student_id_rejected_without_write() {
    let repo = LocalRepository::new();
    repo.insert_student(&support::new_student("STU001"))
        .await
        .unwrap();

    let mut again = support::new_student("STU001");
    again.fields.email = "other@example.com".to_string();
    let err = repo.insert_student(&again).await.unwrap_err();

    assert!(matches!(
        err,
        RepositoryError::DuplicateKey {
            field: UniqueField::StudentId,
            ..
        }
    ));
    assert_eq!(repo.len(), 1);
}

#[tokio::test]
async fn test_duplicate_email_rejected_without_write() {
    let repo = LocalRepository::new();
    repo.insert_student(&support::new_student("STU001"))
        .await
        .unwrap();

    let mut other = support::new_student("STU002");
    other.fields.email = "stu001@example.com".to_string();
    let err = repo.insert_student(&other).await.unwrap_err();

    assert!(matches!(
        err,
        RepositoryError::DuplicateKey {
            field: UniqueField::Email,
            ..
        }
    ));
    assert_eq!(err.to_string().trim(), "Email already exists [operation=insert_student, entity=student, id=STU002]");
    assert_eq!(repo.len(), 1);
}

#[tokio::test]
async fn test_empty_list() {
    let repo = LocalRepository::new();
    assert!(repo.list_students().await.unwrap().is_empty());
    assert!(repo.is_empty());
}

#[tokio::test]
async fn test_list_is_newest_first() {
    let repo = LocalRepository::new();
    for id in ["STU001", "STU002", "STU003"] {
        repo.insert_student(&support::new_student(id)).await.unwrap();
    }

    let students = repo.list_students().await.unwrap();
    let ids: Vec<&str> = students.iter().map(|s| s.student_id.as_str()).collect();
    assert_eq!(ids, vec!["STU003", "STU002", "STU001"]);
    assert!(students
        .windows(2)
        .all(|pair| pair[0].created_at >= pair[1].created_at));
}

#[tokio::test]
async fn test_update_overwrites_all_mutable_columns() {
    let repo = LocalRepository::new();
    let mut student = support::new_student("STU001");
    student.fields.allergies = Some("Peanuts".to_string());
    repo.insert_student(&student).await.unwrap();
    let before = repo
        .find_student(&StudentKey::External("STU001".to_string()))
        .await
        .unwrap();

    let fields = support::student_fields("Jane", "jane@example.com");
    repo.update_student(&StudentKey::External("STU001".to_string()), &fields)
        .await
        .unwrap();

    let after = repo
        .find_student(&StudentKey::External("STU001".to_string()))
        .await
        .unwrap();
    assert_eq!(after.fields(), fields);
    assert_eq!(after.allergies, None);
    assert_eq!(after.student_id, "STU001");
    assert_eq!(after.created_at, before.created_at);
    assert!(after.updated_at > before.updated_at);
}

#[tokio::test]
async fn test_update_with_identical_fields_still_succeeds() {
    let repo = LocalRepository::new();
    let student = support::new_student("STU001");
    let created = repo.insert_student(&student).await.unwrap();

    let key = StudentKey::Id(created.id);
    repo.update_student(&key, &student.fields).await.unwrap();
    repo.update_student(&key, &student.fields).await.unwrap();
}

#[tokio::test]
async fn test_update_missing_is_not_found() {
    let repo = LocalRepository::new();
    let err = repo
        .update_student(
            &StudentKey::Id(StudentRowId::new(99)),
            &support::student_fields("Jane", "jane@example.com"),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound { .. }));
}

#[tokio::test]
async fn test_delete_then_find_is_not_found() {
    let repo = LocalRepository::new();
    repo.insert_student(&support::new_student("STU001"))
        .await
        .unwrap();

    let key = StudentKey::Any("STU001".to_string());
    repo.delete_student(&key).await.unwrap();

    assert!(matches!(
        repo.find_student(&key).await.unwrap_err(),
        RepositoryError::NotFound { .. }
    ));
    assert!(matches!(
        repo.delete_student(&key).await.unwrap_err(),
        RepositoryError::NotFound { .. }
    ));
}

#[tokio::test]
async fn test_any_key_deletes_surrogate_and_external_matches() {
    let repo = LocalRepository::new();
    // Row 1 has surrogate id 1; row 2 uses "1" as its external id.
    repo.insert_student(&support::new_student("A-100"))
        .await
        .unwrap();
    repo.insert_student(&support::new_student("1")).await.unwrap();

    repo.delete_student(&StudentKey::Any("1".to_string()))
        .await
        .unwrap();
    assert!(repo.is_empty());
}

#[tokio::test]
async fn test_service_layer_tags_operation() {
    let repo = LocalRepository::new();
    let err = services::get_student(&repo, &StudentKey::Any("missing".to_string()))
        .await
        .unwrap_err();
    assert_eq!(err.context().operation.as_deref(), Some("find_student"));
    assert_eq!(err.context().entity_id.as_deref(), Some("missing"));
}

#[tokio::test]
async fn test_concurrent_inserts_of_same_id_admit_one() {
    let repo = Arc::new(LocalRepository::new());

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let repo = Arc::clone(&repo);
            tokio::spawn(async move { repo.insert_student(&support::new_student("STU001")).await })
        })
        .collect();

    let mut successes = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            successes += 1;
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(repo.len(), 1);
}

#[tokio::test]
async fn test_concurrent_distinct_inserts_get_unique_ids() {
    let repo = Arc::new(LocalRepository::new());

    let handles: Vec<_> = (0..20)
        .map(|i| {
            let repo = Arc::clone(&repo);
            tokio::spawn(async move {
                repo.insert_student(&support::new_student(&format!("STU{:03}", i)))
                    .await
            })
        })
        .collect();

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap().unwrap().id);
    }
    ids.sort();
    ids.dedup();

    assert_eq!(ids.len(), 20);
    assert_eq!(repo.list_students().await.unwrap().len(), 20);
}
