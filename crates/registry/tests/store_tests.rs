//! Integration tests for snapshot persistence

use alloy_primitives::Address;
use preconf_registry::{
    InMemoryCustody, PreconfRegistry, ProposerStatus, RegistryParams, Snapshot, StateStore,
    StoreError, SNAPSHOT_VERSION,
};
use tempfile::TempDir;

fn addr(n: u8) -> Address {
    Address::with_last_byte(n)
}

#[test]
fn test_missing_file_loads_empty() {
    let dir = TempDir::new().unwrap();
    let store = StateStore::new(dir.path().join("state.json"));
    assert!(!store.exists());

    let snapshot = store.load().unwrap();
    assert_eq!(snapshot, Snapshot::default());
    assert_eq!(snapshot.version, SNAPSHOT_VERSION);
}

#[test]
fn test_resume_from_disk() {
    let dir = TempDir::new().unwrap();
    let store = StateStore::new(dir.path().join("nested").join("state.json"));
    let params = RegistryParams::new(1);

    let mut registry = PreconfRegistry::new(params.clone());
    let mut custody = InMemoryCustody::new();
    registry.advance_to(50).unwrap();
    custody.fund(8).unwrap();
    registry.deposit(addr(1), 8).unwrap();
    registry.delegate(addr(1), &[addr(10)]).unwrap();
    registry.advance_to(82).unwrap();
    registry.update_status(&[addr(10)]);
    registry.initiate_exit(addr(1), 3).unwrap();

    store
        .save(&Snapshot {
            version: SNAPSHOT_VERSION,
            registry: registry.state().clone(),
            custody: custody.clone(),
        })
        .unwrap();
    assert!(store.exists());

    let snapshot = store.load().unwrap();
    assert_eq!(&snapshot.registry, registry.state());
    assert_eq!(snapshot.custody, custody);

    let mut resumed = PreconfRegistry::from_state(params, snapshot.registry);
    let mut custody = snapshot.custody;
    assert_eq!(resumed.current_height(), 82);
    assert_eq!(resumed.get_proposer_status(&addr(10)), ProposerStatus::Preconfer);

    resumed.advance_to(114).unwrap();
    assert_eq!(resumed.withdraw(addr(1), addr(2), &mut custody).unwrap(), 3);
    assert_eq!(custody.balance_of(&addr(2)), 3);
}

#[test]
fn test_corrupt_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, b"{ not json").unwrap();

    let store = StateStore::new(&path);
    assert!(matches!(store.load(), Err(StoreError::Serialization(_))));
}

#[test]
fn test_unsupported_version() {
    let dir = TempDir::new().unwrap();
    let store = StateStore::new(dir.path().join("state.json"));
    let snapshot = Snapshot {
        version: SNAPSHOT_VERSION + 1,
        ..Default::default()
    };
    store.save(&snapshot).unwrap();

    assert!(matches!(
        store.load(),
        Err(StoreError::UnsupportedVersion { found, .. }) if found == SNAPSHOT_VERSION + 1
    ));
}
