use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use core_types::{ItemSet, QuizKind};
use data_loader::{DirSource, LoadError, load_items, load_type_catalog, load_weights};

fn data_root() -> PathBuf {
    let root = std::env::temp_dir().join(format!(
        "data_root_it_{}",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    fs::create_dir_all(root.join("weights")).expect("mkdir weights");
    fs::create_dir_all(root.join("mapping")).expect("mkdir mapping");
    fs::write(
        root.join("items_public_adv_B.json"),
        r#"{"data": [{"id": "T1", "text": "Logic first", "options": ["Yes", "No"]},
                     {"id": "F1", "text": "Harmony first"}]}"#,
    )
    .expect("items");
    fs::write(
        root.join("weights").join("weights_adv_B.json"),
        r#"{"scale": 5, "T1": {"T": 1}, "F1": {"A": {"Fi": 1}, "B": {"Fe": 1}}}"#,
    )
    .expect("weights");
    fs::write(
        root.join("mapping").join("types.json"),
        r#"{"ISTJ": {"desc": "Inspector"}}"#,
    )
    .expect("types");
    root
}

#[test]
fn advanced_set_loads_from_single_root() {
    let root = data_root();
    let source = DirSource::new(&root);

    let items = load_items(&source, QuizKind::Advanced, Some(ItemSet::B)).expect("items");
    assert_eq!(items.len(), 2);
    assert!(items[1].options.is_none());

    let table = load_weights(&source, QuizKind::Advanced, Some(ItemSet::B)).expect("weights");
    assert_eq!(table.len(), 2);

    let catalog = load_type_catalog(&source).expect("catalog");
    assert_eq!(catalog.describe("ISTJ"), Some("Inspector"));

    let _ = fs::remove_dir_all(root);
}

#[test]
fn other_sets_are_not_guessed() {
    let root = data_root();
    let source = DirSource::new(&root);
    let err = load_items(&source, QuizKind::Advanced, Some(ItemSet::A)).expect_err("missing");
    assert!(matches!(err, LoadError::NotFound { .. }));
    let err = load_items(&source, QuizKind::Basic, None).expect_err("missing");
    assert!(err.is_not_found());
    let _ = fs::remove_dir_all(root);
}
