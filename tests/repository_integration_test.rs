// ==========================================
// Repository integration tests
// ==========================================
// Coverage:
// 1. Document store CRUD round trip
// 2. Name uniqueness at insert
// 3. Whole-document replace and delete
// ==========================================


use production_followup::domain::document::FollowupDocument;
use production_followup::domain::types::ShiftConfig;
use production_followup::repository::RepositoryError;
use test_helpers::*;

fn make_doc(name: &str) -> FollowupDocument {
    FollowupDocument::new(
        name,
        "PLAN-R",
        day(2024, 2, 5),
        day(2024, 2, 16),
        ShiftConfig::default(),
        0.04,
    )
}

#[test]
fn test_insert_and_find_round_trip() {
    let (_tmp, conn) = create_test_db();
    let repo = make_repo(&conn);

    let doc = make_doc("RT-1");
    repo.insert(&doc).expect("insert");

    let loaded = repo.find_by_name("RT-1").expect("query").expect("found");
    assert_eq!(loaded.id, doc.id);
    assert_eq!(loaded.plan_name, "PLAN-R");
    assert_eq!(loaded.start_date, day(2024, 2, 5));

    assert!(repo.find_by_name("missing").expect("query").is_none());
}

#[test]
fn test_insert_duplicate_name_fails() {
    let (_tmp, conn) = create_test_db();
    let repo = make_repo(&conn);

    repo.insert(&make_doc("RT-2")).expect("insert");
    let err = repo.insert(&make_doc("RT-2")).unwrap_err();
    assert!(matches!(err, RepositoryError::UniqueConstraintViolation(_)));
}

#[test]
fn test_find_all_lists_every_document() {
    let (_tmp, conn) = create_test_db();
    let repo = make_repo(&conn);

    repo.insert(&make_doc("RT-3a")).expect("insert");
    repo.insert(&make_doc("RT-3b")).expect("insert");

    let all = repo.find_all().expect("query");
    assert_eq!(all.len(), 2);
}

#[test]
fn test_replace_updates_whole_document() {
    let (_tmp, conn) = create_test_db();
    let repo = make_repo(&conn);

    let mut doc = make_doc("RT-4");
    repo.insert(&doc).expect("insert");

    doc.absence_ratio = 0.08;
    repo.replace(&doc).expect("replace");

    let loaded = repo.find_by_name("RT-4").expect("query").expect("found");
    assert_eq!(loaded.absence_ratio, 0.08);
}

#[test]
fn test_replace_unknown_document_is_not_found() {
    let (_tmp, conn) = create_test_db();
    let repo = make_repo(&conn);

    let err = repo.replace(&make_doc("RT-5")).unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound { .. }));
}

#[test]
fn test_delete_by_name() {
    let (_tmp, conn) = create_test_db();
    let repo = make_repo(&conn);

    repo.insert(&make_doc("RT-6")).expect("insert");
    repo.delete_by_name("RT-6").expect("delete");
    assert!(repo.find_by_name("RT-6").expect("query").is_none());

    let err = repo.delete_by_name("RT-6").unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound { .. }));
}
