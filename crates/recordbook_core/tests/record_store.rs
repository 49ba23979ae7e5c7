use recordbook_core::{RecordStore, RecordValidationError, StoreError};
use std::collections::HashSet;

fn seeded_store() -> RecordStore {
    let mut store = RecordStore::new();
    store.create("Alice", "alice@example.com", 20).unwrap();
    store.create("Bob", "bob@example.com", 30).unwrap();
    store.create("Carol", "carol@example.com", 40).unwrap();
    store
}

fn ids(records: &[recordbook_core::Record]) -> HashSet<u64> {
    records.iter().map(|record| record.id()).collect()
}

#[test]
fn successive_creates_return_strictly_increasing_ids() {
    let mut store = RecordStore::new();
    let mut previous = 0;
    for n in 0..20 {
        let record = store
            .create(&format!("user{n}"), "user@example.com", n)
            .unwrap();
        assert!(record.id() > previous);
        previous = record.id();
    }
}

#[test]
fn create_sets_defaults() {
    let mut store = RecordStore::new();
    let record = store.create("  Alice  ", "alice@example.com", 20).unwrap();

    assert_eq!(record.id(), 1);
    assert_eq!(record.name(), "Alice");
    assert_eq!(record.email(), "alice@example.com");
    assert_eq!(record.age(), 20);
    assert!(record.is_active());
    assert_eq!(store.get(1).unwrap(), record);
}

#[test]
fn create_with_empty_name_leaves_state_unchanged() {
    let mut store = RecordStore::new();
    let err = store.create("", "a@b.com", 20).unwrap_err();

    assert!(matches!(
        err,
        StoreError::Validation(RecordValidationError::EmptyName)
    ));
    assert_eq!(store.count(), 0);
    assert_eq!(store.next_id(), 1);
}

#[test]
fn create_rejects_invalid_email() {
    let mut store = RecordStore::new();
    let err = store.create("A", "not-an-email", 20).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(RecordValidationError::InvalidEmail { ref email }) if email == "not-an-email"
    ));
}

#[test]
fn create_age_bounds_are_inclusive() {
    let mut store = RecordStore::new();

    for age in [200, -1] {
        let err = store.create("A", "a@b.com", age).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(RecordValidationError::InvalidAge { age: rejected }) if rejected == age
        ));
    }

    assert_eq!(store.create("A", "a@b.com", 0).unwrap().age(), 0);
    assert_eq!(store.create("A", "a@b.com", 150).unwrap().age(), 150);
    assert_eq!(store.next_id(), 3);
}

#[test]
fn activate_on_fresh_record_fails_already_active() {
    let mut store = RecordStore::new();
    let record = store.create("A", "a@b.com", 1).unwrap();

    let err = store.activate(record.id()).unwrap_err();
    assert!(matches!(err, StoreError::AlreadyActive(id) if id == record.id()));
}

#[test]
fn deactivate_twice_fails_already_inactive() {
    let mut store = RecordStore::new();
    let record = store.create("A", "a@b.com", 1).unwrap();

    store.deactivate(record.id()).unwrap();
    assert!(!store.get(record.id()).unwrap().is_active());

    let err = store.deactivate(record.id()).unwrap_err();
    assert!(matches!(err, StoreError::AlreadyInactive(id) if id == record.id()));

    store.activate(record.id()).unwrap();
    assert!(store.get(record.id()).unwrap().is_active());
}

#[test]
fn activate_and_deactivate_report_missing_records() {
    let mut store = RecordStore::new();
    assert!(matches!(store.activate(7), Err(StoreError::NotFound(7))));
    assert!(matches!(store.deactivate(7), Err(StoreError::NotFound(7))));
}

#[test]
fn delete_retires_identifier_forever() {
    let mut store = seeded_store();
    assert_eq!(store.count(), 3);

    store.delete(2).unwrap();
    assert_eq!(store.count(), 2);
    assert!(matches!(store.get(2), Err(StoreError::NotFound(2))));
    assert!(matches!(store.delete(2), Err(StoreError::NotFound(2))));

    let next = store.create("Dave", "dave@example.com", 50).unwrap();
    assert_eq!(next.id(), 4);
}

#[test]
fn update_applies_only_requested_fields() {
    let mut store = seeded_store();

    let updated = store.update(1, "  ", "", 0).unwrap();
    assert_eq!(updated.name(), "Alice");
    assert_eq!(updated.email(), "alice@example.com");
    assert_eq!(updated.age(), 20);

    let updated = store.update(1, "Alicia", "", -3).unwrap();
    assert_eq!(updated.name(), "Alicia");
    assert_eq!(updated.age(), 20);

    let updated = store.update(1, "", "alicia@example.org", 100).unwrap();
    assert_eq!(updated.name(), "Alicia");
    assert_eq!(updated.email(), "alicia@example.org");
    assert_eq!(updated.age(), 100);
    assert_eq!(store.get(1).unwrap(), updated);
}

#[test]
fn update_preserves_identity_timestamp_and_status() {
    let mut store = seeded_store();
    store.deactivate(2).unwrap();
    let before = store.get(2).unwrap();

    let after = store.update(2, "Robert", "rob@example.com", 31).unwrap();
    assert_eq!(after.id(), before.id());
    assert_eq!(after.created(), before.created());
    assert!(!after.is_active());
}

#[test]
fn update_is_all_or_nothing() {
    let mut store = seeded_store();
    let before = store.get(1).unwrap();

    let err = store.update(1, "Changed", "changed@example.com", 151).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(RecordValidationError::InvalidAge { age: 151 })
    ));
    assert_eq!(store.get(1).unwrap(), before);

    let err = store.update(1, "Changed", "nope", 30).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(RecordValidationError::InvalidEmail { .. })
    ));
    assert_eq!(store.get(1).unwrap(), before);
}

#[test]
fn update_missing_record_fails_not_found() {
    let mut store = RecordStore::new();
    assert!(matches!(
        store.update(3, "A", "a@b.com", 1),
        Err(StoreError::NotFound(3))
    ));
}

#[test]
fn search_is_case_insensitive_substring() {
    let mut store = RecordStore::new();
    store.create("Zhang San", "zs@example.com", 25).unwrap();
    store.create("zhangsanfeng", "zsf@example.com", 99).unwrap();
    store.create("Li Si", "ls@example.com", 30).unwrap();
    store.create("张三", "zhangsan@example.com", 25).unwrap();

    let hits = store.search_by_name("ZHANG");
    assert_eq!(ids(&hits), HashSet::from([1, 2]));

    let hits = store.search_by_name("张");
    assert_eq!(ids(&hits), HashSet::from([4]));

    assert!(store.search_by_name("wang").is_empty());
}

#[test]
fn list_and_active_records_are_compared_as_sets() {
    let mut store = seeded_store();
    store.deactivate(3).unwrap();

    assert_eq!(ids(&store.list()), HashSet::from([1, 2, 3]));
    assert_eq!(ids(&store.active_records()), HashSet::from([1, 2]));
}
