//! End-to-end checks of the review and inspection workflow against the
//! seeded store.

use sitecontrol_models::{
    DayDate, EntryStatus, InspectionStatus, Project, ReviewDecision, WorkItem, WorkStatus,
};
use sitecontrol_persistence::SnapshotStore;
use sitecontrol_workflow::{
    is_overdue, Action, Dashboard, Session, SiteStore, WorkflowError, REJECT_PLACEHOLDER_COMMENT,
};

fn date(s: &str) -> DayDate {
    DayDate::parse(s).unwrap()
}

/// A minimal store with project P1 and work item W1.
fn p1_w1_store() -> SiteStore {
    let mut store = SiteStore::new();
    store.add_project(Project::new(
        "P1",
        "Школа №12",
        "г. Сургут",
        date("01.08.2024"),
        date("15.11.2024"),
    ));
    store.add_work_item(WorkItem::new("W1", "P1", "Монтаж вентиляции", date("25.09.2024")));
    store
}

#[test]
fn test_blank_submission_leaves_journal_unchanged() {
    let mut store = p1_w1_store();
    let today = date("20.08.2024");

    for text in ["", "   ", "\n\t"] {
        let result = store.submit_entry(text, &"P1".into(), &"W1".into(), "Иван Петров", today);
        assert!(matches!(result, Err(WorkflowError::EmptyText)));
    }

    assert!(store.journal().is_empty());
}

#[test]
fn test_valid_submission_inserts_one_pending_entry_at_front() {
    let mut store = SiteStore::seeded();
    store.add_project(Project::new(
        "P1",
        "Объект",
        "г. Тюмень",
        date("01.08.2024"),
        date("15.11.2024"),
    ));
    store.add_work_item(WorkItem::new("W1", "P1", "Работа", date("25.09.2024")));
    let before = store.journal().len();

    let id = store
        .submit_entry("Done", &"P1".into(), &"W1".into(), "Иван Петров", date("20.08.2024"))
        .unwrap();

    assert_eq!(store.journal().len(), before + 1);
    let front = &store.journal()[0];
    assert_eq!(front.id, id);
    assert_eq!(front.description, "Done");
    assert_eq!(front.status, EntryStatus::Pending);
    assert_eq!(front.project_id.as_str(), "P1");
    assert_eq!(front.work_item_id.as_str(), "W1");
}

#[test]
fn test_accept_then_reject_flow() {
    let mut store = p1_w1_store();
    let today = date("20.08.2024");
    let a = store
        .submit_entry("Первый этаж", &"P1".into(), &"W1".into(), "Иван Петров", today)
        .unwrap();
    let b = store
        .submit_entry("Второй этаж", &"P1".into(), &"W1".into(), "Иван Петров", today)
        .unwrap();

    store.review_entry(&a, ReviewDecision::Accept, None).unwrap();
    store.review_entry(&b, ReviewDecision::Reject, None).unwrap();

    let a = store.entry(&a).unwrap();
    assert_eq!(a.status, EntryStatus::Accepted);
    assert!(a.comment.is_none());

    let b = store.entry(&b).unwrap();
    assert_eq!(b.status, EntryStatus::Rejected);
    assert_eq!(b.comment.as_deref(), Some(REJECT_PLACEHOLDER_COMMENT));
}

#[test]
fn test_reviewed_entries_are_never_reversed() {
    let mut store = SiteStore::seeded();
    let before = store.clone();

    let err = store
        .review_entry(&"e2".into(), ReviewDecision::Reject, Some("Нет".to_string()))
        .unwrap_err();

    assert!(err.is_ignored_action());
    assert_eq!(store, before);
}

#[test]
fn test_is_overdue_literal_deadline() {
    let mut item = WorkItem::new("W1", "P1", "Монтаж вентиляции", date("01.01.2020"));

    for today in ["02.01.2020", "01.06.2023", "19.10.2026"] {
        assert!(is_overdue(&item, date(today)));
    }

    item.status = WorkStatus::Accepted;
    assert!(!is_overdue(&item, date("19.10.2026")));
}

#[test]
fn test_inspection_on_missing_work_item_is_not_created() {
    let mut store = p1_w1_store();
    let before = store.clone();

    let err = store
        .start_inspection(&"P1".into(), &"W404".into(), "Технический заказчик", date("20.08.2024"))
        .unwrap_err();

    assert!(matches!(err, WorkflowError::WorkItemNotFound(_)));
    assert!(store.active_inspection().is_none());
    assert!(store.inspections().is_empty());
    assert_eq!(store, before);
}

#[test]
fn test_inspection_needs_completed_work() {
    let mut store = SiteStore::seeded();
    let before = store.clone();

    // w1 is still in progress.
    let err = store
        .start_inspection(&"p1".into(), &"w1".into(), "Технический заказчик", date("20.08.2024"))
        .unwrap_err();

    assert!(matches!(err, WorkflowError::WorkItemNotCompleted { .. }));
    assert!(err.is_ignored_action());
    assert!(store.active_inspection().is_none());
    assert_eq!(store, before);

    let mut p1_w1 = p1_w1_store();
    assert!(p1_w1
        .start_inspection(&"P1".into(), &"W1".into(), "Технический заказчик", date("20.08.2024"))
        .is_err());
}

#[test]
fn test_full_inspection_cycle() {
    let mut store = SiteStore::seeded();
    let today = date("20.08.2024");

    let id = store
        .start_inspection(&"p1".into(), &"w3".into(), "Технический заказчик", today)
        .unwrap();
    for index in 0..4 {
        store.toggle_checklist_item(index).unwrap();
    }
    store.toggle_checklist_item(3).unwrap();
    store.add_defect().unwrap();

    let completed = store.complete_inspection().unwrap();

    assert_eq!(completed, id);
    assert!(store.active_inspection().is_none());
    assert_eq!(store.inspections().len(), 1);

    let inspection = &store.inspections()[0];
    assert_eq!(inspection.status, InspectionStatus::Completed);
    assert_eq!(inspection.checklist.len(), 4);
    assert_eq!(inspection.checked_count(), 3);
    assert_eq!(inspection.open_defect_count(), 1);

    // The slot is free again.
    assert!(store
        .start_inspection(&"p1".into(), &"w2".into(), "Технический заказчик", today)
        .is_ok());
}

#[test]
fn test_session_gates_actions_by_role() {
    let contractor = Session::for_role(sitecontrol_models::Role::Contractor);
    let supervisor = Session::for_role(sitecontrol_models::Role::Supervisor);

    assert!(contractor.authorize(Action::SubmitEntry).is_ok());
    assert!(matches!(
        contractor.authorize(Action::ReviewEntry),
        Err(WorkflowError::NotPermitted { .. })
    ));
    assert!(supervisor.authorize(Action::AddDefect).is_ok());
    assert!(supervisor.authorize(Action::SubmitEntry).is_err());
}

#[test]
fn test_snapshot_preserves_workflow_state() {
    let dir = tempfile::tempdir().unwrap();
    let snapshots = SnapshotStore::new(dir.path().join("site.json"));
    let today = date("20.08.2024");

    let mut store = SiteStore::load_or_seed(&snapshots).unwrap();
    store
        .review_entry(&"e1".into(), ReviewDecision::Reject, None)
        .unwrap();
    store
        .start_inspection(&"p1".into(), &"w3".into(), "Технический заказчик", today)
        .unwrap();
    store.add_defect().unwrap();
    store.save_to(&snapshots).unwrap();

    let reloaded = SiteStore::load_or_seed(&snapshots).unwrap();
    assert_eq!(reloaded, store);
    assert_eq!(Dashboard::compute(&reloaded, today).open_defects, 1);
    assert_eq!(
        reloaded.entry(&"e1".into()).unwrap().status,
        EntryStatus::Rejected
    );
}

#[test]
fn test_failed_save_is_a_persistence_error() {
    // The snapshot's parent is a regular file, so the directory can't be made.
    let blocker = tempfile::NamedTempFile::new().unwrap();
    let snapshots = SnapshotStore::new(blocker.path().join("site.json"));
    let mut store = SiteStore::seeded();
    store
        .review_entry(&"e1".into(), ReviewDecision::Accept, None)
        .unwrap();

    let err = store.save_to(&snapshots).unwrap_err();

    assert!(matches!(err, WorkflowError::Persistence(_)));
    assert!(!err.is_ignored_action());
    assert!(!snapshots.exists());
}
