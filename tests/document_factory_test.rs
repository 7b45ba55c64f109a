// ==========================================
// Document factory integration tests
// ==========================================
// Coverage:
// 1. Workday sequence and seeding of a new document
// 2. Validation failures (range, empty selection)
// 3. Duplicate-name rejection without touching the existing document
// 4. Extra calendar days
// ==========================================


use production_followup::api::ApiError;
use production_followup::api::FollowupApi;
use production_followup::engine::document_factory::FactoryError;
use std::collections::BTreeSet;
use test_helpers::*;

#[test]
fn test_create_seeds_records_per_workday_and_center() {
    let (_tmp, conn) = create_test_db();
    let repo = make_repo(&conn);
    let factory = make_factory(repo.clone());

    let doc = factory.create(base_request("RUN-A")).expect("create");

    // 2024-01-08..19 spans two full weeks: 10 workdays
    assert_eq!(doc.workday_count, 10);
    assert_eq!(doc.headcount.len(), 10);

    let machine = &doc.machine_centers["M-301"];
    assert_eq!(machine.len(), 10);
    assert!(machine.iter().all(|r| r.daily_plan == 100));
    // Constant plan rolled up: 100, 200, ..., 1000
    assert_eq!(machine[0].cumulative_plan, 100);
    assert_eq!(machine[9].cumulative_plan, 1000);
    // No weekend days in the series
    assert!(!machine.iter().any(|r| r.workday == day(2024, 1, 13)));

    assert_eq!(doc.manual_centers["A-12"][9].cumulative_plan, 800);

    // Persisted as a whole
    let loaded = repo.find_by_name("RUN-A").expect("query").expect("stored");
    assert_eq!(loaded.machine_centers["M-301"].len(), 10);
}

#[test]
fn test_invalid_range_rejected() {
    let (_tmp, conn) = create_test_db();
    let factory = make_factory(make_repo(&conn));

    let mut request = base_request("RUN-B");
    request.start_date = day(2024, 1, 10);
    request.finish_date = day(2024, 1, 9);

    let err = factory.create(request).unwrap_err();
    assert!(matches!(err, FactoryError::InvalidRange { .. }));
}

#[test]
fn test_empty_selection_rejected() {
    let (_tmp, conn) = create_test_db();
    let factory = make_factory(make_repo(&conn));

    let mut request = base_request("RUN-C");
    request.selected_work_centers.clear();

    let err = factory.create(request).unwrap_err();
    assert!(matches!(err, FactoryError::NoWorkCentersSelected));
}

#[test]
fn test_duplicate_name_rejected_and_existing_untouched() {
    let (_tmp, conn) = create_test_db();
    let repo = make_repo(&conn);
    let factory = make_factory(repo.clone());

    factory.create(base_request("RUN-D")).expect("first create");

    // Second request under the same name, different plan
    let mut request = base_request("RUN-D");
    request.plan_name = "PLAN-OTHER".to_string();
    let err = factory.create(request).unwrap_err();
    assert!(matches!(err, FactoryError::DuplicateName(_)));

    let stored = repo.find_by_name("RUN-D").expect("query").expect("stored");
    assert_eq!(stored.plan_name, "PLAN-2024-01");
}

#[test]
fn test_extra_calendar_days_included() {
    let (_tmp, conn) = create_test_db();
    let factory = make_factory(make_repo(&conn));

    let mut request = base_request("RUN-E");
    // The middle Saturday is worked on this run
    request.extra_calendar_days = BTreeSet::from([day(2024, 1, 13)]);

    let doc = factory.create(request).expect("create");
    assert_eq!(doc.workday_count, 11);
    assert!(doc.machine_centers["M-301"]
        .iter()
        .any(|r| r.workday == day(2024, 1, 13)));
}

#[test]
fn test_api_translates_validation_errors() {
    let (_tmp, conn) = create_test_db();
    let repo = make_repo(&conn);
    let api = FollowupApi::new(repo.clone(), make_factory(repo));

    let mut request = base_request("RUN-F");
    request.finish_date = request.start_date;

    let err = api.create_followup_document(request).unwrap_err();
    assert!(matches!(err, ApiError::InvalidRange));
}
