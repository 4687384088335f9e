use rusqlite::Connection;
use std::collections::HashSet;
use userstore_core::{ArgumentError, StoreConfig, StoreError, StoreErrorKind, User, UserStore};

fn open_store() -> UserStore {
    UserStore::open(&StoreConfig::in_memory()).unwrap()
}

#[test]
fn create_and_get_roundtrip() {
    let store = open_store();

    let created = store.create_user(&User::new("alice")).unwrap();
    assert!(created.is_persisted());

    let loaded = store.get_user(created.id).unwrap();
    assert_eq!(loaded, created);
    assert_eq!(loaded.name, "alice");
}

#[test]
fn create_ignores_caller_supplied_id() {
    let store = open_store();

    let created = store.create_user(&User::with_id(99, "alice")).unwrap();
    assert_eq!(created.id, 1);
    assert_eq!(store.get_user(99).unwrap_err().kind(), StoreErrorKind::NotFound);
}

#[test]
fn list_on_empty_store_is_empty() {
    let store = open_store();
    assert!(store.list_users().unwrap().is_empty());
}

#[test]
fn list_returns_every_created_user() {
    let store = open_store();

    let created: HashSet<User> = (0..5)
        .map(|index| store.create_user(&User::new(format!("user-{index}"))).unwrap())
        .collect();

    let listed = store.list_users().unwrap();
    assert_eq!(listed.len(), created.len());
    assert_eq!(listed.into_iter().collect::<HashSet<_>>(), created);
}

#[test]
fn same_name_twice_without_unique_constraint_gets_distinct_ids() {
    let store = open_store();

    let first = store.create_user(&User::new("alice")).unwrap();
    let second = store.create_user(&User::new("alice")).unwrap();
    assert_ne!(first.id, second.id);
}

#[test]
fn same_name_twice_with_unique_constraint_is_duplicate() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("unique.db");
    let config = StoreConfig::file(&path);
    drop(UserStore::open(&config).unwrap());

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("CREATE UNIQUE INDEX users_name_unique ON users (name);")
        .unwrap();
    drop(conn);

    let store = UserStore::open(&config).unwrap();
    store.create_user(&User::new("alice")).unwrap();
    let err = store.create_user(&User::new("alice")).unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::Duplicate);
    assert_eq!(store.list_users().unwrap().len(), 1);
}

#[test]
fn get_unknown_id_is_not_found() {
    let store = open_store();

    let err = store.get_user(12).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(12)));
}

#[test]
fn update_rejects_zero_id() {
    let store = open_store();

    let err = store.update_user(0, &User::new("anyone")).unwrap_err();
    assert!(matches!(
        err,
        StoreError::InvalidArgument(ArgumentError::InvalidId)
    ));
}

#[test]
fn update_rejects_mismatched_ids() {
    let store = open_store();

    let err = store.update_user(5, &User::with_id(7, "seven")).unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::InvalidArgument);
    assert!(matches!(
        err,
        StoreError::InvalidArgument(ArgumentError::IdMismatch {
            id: 5,
            payload_id: 7
        })
    ));
}

#[test]
fn update_unknown_id_is_not_found() {
    let store = open_store();

    let err = store.update_user(3, &User::with_id(3, "ghost")).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(3)));
}

#[test]
fn update_changes_stored_name_and_returns_payload() {
    let store = open_store();
    let created = store.create_user(&User::new("alice")).unwrap();

    let payload = User::with_id(created.id, "alicia");
    let updated = store.update_user(created.id, &payload).unwrap();
    assert_eq!(updated, payload);
    assert_eq!(store.get_user(created.id).unwrap().name, "alicia");
}

#[test]
fn failed_update_keeps_previous_name() {
    let store = open_store();
    let created = store.create_user(&User::new("alice")).unwrap();

    let too_long = "x".repeat(101);
    let err = store
        .update_user(created.id, &User::with_id(created.id, too_long))
        .unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::Storage);
    assert_eq!(store.get_user(created.id).unwrap().name, "alice");

    // The rolled back transaction must not block later writes.
    store
        .update_user(created.id, &User::with_id(created.id, "alicia"))
        .unwrap();
}

#[test]
fn delete_removes_row() {
    let store = open_store();
    let created = store.create_user(&User::new("alice")).unwrap();

    store.delete_user(created.id).unwrap();
    let err = store.get_user(created.id).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(id) if id == created.id));
}

#[test]
fn delete_unknown_id_is_delete_failed() {
    let store = open_store();

    let err = store.delete_user(8).unwrap_err();
    assert!(matches!(err, StoreError::DeleteFailed(8)));
    assert_eq!(err.kind(), StoreErrorKind::DeleteFailed);
}

#[test]
fn end_to_end_scenario() {
    let store = open_store();

    let alice = store.create_user(&User::new("alice")).unwrap();
    assert_eq!(alice, User::with_id(1, "alice"));
    let bob = store.create_user(&User::new("bob")).unwrap();
    assert_eq!(bob, User::with_id(2, "bob"));

    let listed: HashSet<User> = store.list_users().unwrap().into_iter().collect();
    assert_eq!(listed, HashSet::from([alice, bob]));

    let updated = store.update_user(1, &User::with_id(1, "alicia")).unwrap();
    assert_eq!(updated, User::with_id(1, "alicia"));
    assert_eq!(store.get_user(1).unwrap(), User::with_id(1, "alicia"));

    store.delete_user(2).unwrap();
    assert!(matches!(store.get_user(2).unwrap_err(), StoreError::NotFound(2)));
}
