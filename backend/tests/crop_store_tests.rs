//! File-backed crop store tests

use crop_advisor::services::JsonFileCropStore;
use shared::store::CropRecordStore;
use shared::{CoreError, CropRecord, CropRecordPatch};

#[test]
fn test_records_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("crops.json");

    {
        let mut store = JsonFileCropStore::open(&path).unwrap();
        assert!(store.list().unwrap().is_empty());
        store.put("Maize", CropRecord::new("Maize")).unwrap();
        store
            .update(
                "maize",
                CropRecordPatch {
                    growing_season: Some("rabi".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
    }

    let reopened = JsonFileCropStore::open(&path).unwrap();
    let maize = reopened.get("MAIZE").unwrap().unwrap();
    assert_eq!(maize.name, "Maize");
    assert_eq!(maize.growing_season.as_deref(), Some("rabi"));
    assert_eq!(reopened.list().unwrap(), vec!["maize".to_string()]);
}

#[test]
fn test_failed_mutation_leaves_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("crops.json");
    let mut store = JsonFileCropStore::open(&path).unwrap();
    store.put("rice", CropRecord::new("rice")).unwrap();
    let before = std::fs::read_to_string(&path).unwrap();

    assert!(matches!(
        store.put("rice", CropRecord::new("rice")),
        Err(CoreError::AlreadyExists(_))
    ));
    assert!(matches!(
        store.update("wheat", CropRecordPatch::default()),
        Err(CoreError::NotFound(_))
    ));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    assert!(!dir.path().join("crops.json.tmp").exists());
}

#[test]
fn test_opens_legacy_file_keyed_by_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("crops.json");
    std::fs::write(
        &path,
        r#"{"Cotton": {"name": "", "soil_type": "clay", "water_needs": "medium"}}"#,
    )
    .unwrap();

    let store = JsonFileCropStore::open(&path).unwrap();
    let cotton = store.get("cotton").unwrap().unwrap();
    assert_eq!(cotton.name, "Cotton");
    assert_eq!(cotton.soil_affinity.as_deref(), Some("clay"));
}

#[test]
fn test_corrupt_file_is_a_storage_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("crops.json");
    std::fs::write(&path, "{not json").unwrap();
    assert!(matches!(JsonFileCropStore::open(&path), Err(CoreError::Storage(_))));
}
