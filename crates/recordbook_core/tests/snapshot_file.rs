use recordbook_core::{LoadOutcome, RecordStore, SnapshotFile, StorageError, StoreError};
use tempfile::TempDir;

#[test]
fn missing_file_is_not_an_error() {
    let dir = TempDir::new().unwrap();
    let file = SnapshotFile::new(dir.path().join("users.json"));

    let mut store = RecordStore::new();
    store.create("Alice", "alice@example.com", 20).unwrap();

    assert_eq!(file.load_into(&mut store).unwrap(), LoadOutcome::Missing);
    assert_eq!(store.count(), 1);
    assert_eq!(store.next_id(), 2);
}

#[test]
fn save_then_load_through_file() {
    let dir = TempDir::new().unwrap();
    let file = SnapshotFile::new(dir.path().join("nested").join("users.json"));

    let mut store = RecordStore::new();
    store.create("Alice", "alice@example.com", 20).unwrap();
    store.create("Bob", "bob@example.com", 30).unwrap();
    store.delete(1).unwrap();

    assert_eq!(file.save_from(&store).unwrap(), 1);
    assert!(file.path().exists());
    assert!(!dir.path().join("nested").join("users.json.tmp").exists());

    let mut restored = RecordStore::new();
    assert_eq!(
        file.load_into(&mut restored).unwrap(),
        LoadOutcome::Loaded { records: 1 }
    );
    assert_eq!(restored.get(2).unwrap(), store.get(2).unwrap());
    assert_eq!(restored.next_id(), 3);
}

#[test]
fn save_overwrites_previous_contents() {
    let dir = TempDir::new().unwrap();
    let file = SnapshotFile::new(dir.path().join("users.json"));

    let mut store = RecordStore::new();
    store.create("Alice", "alice@example.com", 20).unwrap();
    store.create("Bob", "bob@example.com", 30).unwrap();
    file.save_from(&store).unwrap();

    store.delete(1).unwrap();
    store.delete(2).unwrap();
    file.save_from(&store).unwrap();

    let text = std::fs::read_to_string(file.path()).unwrap();
    assert_eq!(text.trim(), "{}");
}

#[test]
fn corrupt_file_is_reported_and_store_kept() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("users.json");
    std::fs::write(&path, "not json").unwrap();
    let file = SnapshotFile::new(&path);

    let mut store = RecordStore::new();
    store.create("Alice", "alice@example.com", 20).unwrap();

    let err = file.load_into(&mut store).unwrap_err();
    assert!(matches!(
        err,
        StorageError::Store(StoreError::Deserialization(_))
    ));
    assert_eq!(store.count(), 1);
}

#[test]
fn unreadable_path_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    // A directory cannot be read as a file.
    let file = SnapshotFile::new(dir.path());

    let err = file.load_into(&mut RecordStore::new()).unwrap_err();
    assert!(matches!(err, StorageError::Io { .. }));
}

#[test]
fn failed_rename_leaves_no_staging_file() {
    let dir = TempDir::new().unwrap();
    // A non-empty directory at the target path makes the final rename fail.
    let target = dir.path().join("users.json");
    std::fs::create_dir(&target).unwrap();
    std::fs::write(target.join("keep"), "x").unwrap();
    let file = SnapshotFile::new(&target);

    let mut store = RecordStore::new();
    store.create("Alice", "alice@example.com", 20).unwrap();

    let err = file.save_from(&store).unwrap_err();
    assert!(matches!(err, StorageError::Io { path, .. } if path == target));
    assert!(!dir.path().join("users.json.tmp").exists());
    assert!(target.join("keep").exists());
}
