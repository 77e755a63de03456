use std::fs;

use tessera_bytecode::FileKind;

use crate::test_utils::Fixture;
use crate::{Artifacts, SerializationOptions, write_outputs};

#[test]
fn writes_module_and_doc() {
    let dir = tempfile::tempdir().unwrap();
    let module_path = dir.path().join("M.tsm");
    let doc_path = dir.path().join("M.tsmdoc");
    let mut fx = Fixture::new();
    fx.public_struct(fx.file, "S");
    let opts = SerializationOptions::new(&module_path).doc_output(&doc_path);
    let artifacts = fx.serialize(&opts);

    let report = write_outputs(&artifacts, &opts);

    assert!(report.is_ok());
    assert_eq!(report.module.unwrap(), module_path);
    let module = fs::read(&module_path).unwrap();
    assert_eq!(module, artifacts.module);
    assert_eq!(FileKind::detect(&module), Some(FileKind::Module));
    let doc = fs::read(&doc_path).unwrap();
    assert_eq!(FileKind::detect(&doc), Some(FileKind::Doc));
    // only the two outputs, no temporaries
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
}

#[test]
fn replaces_existing_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("M.tsm");
    fs::write(&path, b"stale").unwrap();
    let fx = Fixture::new();
    let opts = SerializationOptions::new(&path);
    let artifacts = fx.serialize(&opts);

    let report = write_outputs(&artifacts, &opts);

    assert!(report.is_ok());
    assert_eq!(fs::read(&path).unwrap(), artifacts.module);
}

#[test]
fn missing_directory_fails_without_leaving_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("M.tsm");
    let opts = SerializationOptions::new(&path);
    let artifacts = Artifacts {
        module: vec![1, 2, 3],
        doc: None,
    };

    let report = write_outputs(&artifacts, &opts);

    assert!(!report.is_ok());
    let err = report.module.unwrap_err();
    assert_eq!(err.path, path);
    assert!(!path.exists());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn doc_failure_is_reported_separately() {
    let dir = tempfile::tempdir().unwrap();
    let module_path = dir.path().join("M.tsm");
    let doc_path = dir.path().join("missing").join("M.tsmdoc");
    let opts = SerializationOptions::new(&module_path).doc_output(&doc_path);
    let artifacts = Artifacts {
        module: vec![1, 2, 3],
        doc: Some(vec![4, 5, 6]),
    };

    let report = write_outputs(&artifacts, &opts);

    assert!(!report.is_ok());
    assert!(report.module.is_ok());
    assert!(matches!(report.doc, Some(Err(_))));
    assert_eq!(fs::read(&module_path).unwrap(), vec![1, 2, 3]);
}

#[test]
fn doc_without_path_is_not_written() {
    let dir = tempfile::tempdir().unwrap();
    let opts = SerializationOptions::new(dir.path().join("M.tsm"));
    let artifacts = Artifacts {
        module: Vec::new(),
        doc: Some(vec![1]),
    };

    let report = write_outputs(&artifacts, &opts);

    assert!(report.doc.is_none());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}
