use std::fs;
use std::path::Path;

use indoc::indoc;

use super::CliError;
use super::serialize::{SerializeArgs, execute};

const GRAPH: &str = indoc! {r#"
    {
      "names": ["Builtin", "M", "S", "Int", "x"],
      "modules": [
        { "name": 0, "kind": "builtin" },
        { "name": 1, "files": [0] }
      ],
      "files": [{ "module": 1, "name": "main.src", "top_level_decls": [0] }],
      "decls": [
        {
          "name": { "identifier": 2 },
          "context": { "file": 0 },
          "access": "public",
          "kind": "struct",
          "members": [1]
        },
        {
          "name": { "identifier": 4 },
          "context": { "decl": 0 },
          "access": "public",
          "kind": "var",
          "interface_type": 0,
          "is_let": true
        }
      ],
      "types": [{ "kind": "builtin", "name": 3 }]
    }
"#};

fn args(dir: &Path) -> SerializeArgs {
    let ast_path = dir.join("graph.json");
    fs::write(&ast_path, GRAPH).unwrap();
    SerializeArgs {
        ast_path,
        output: Some(dir.join("M.tsm")),
        doc: None,
        config: None,
        module: None,
        serialize_all_bodies: false,
    }
}

#[test]
fn writes_first_source_module() {
    let dir = tempfile::tempdir().unwrap();
    let args = args(dir.path());

    let written = execute(&args).unwrap();

    assert_eq!(written, vec![dir.path().join("M.tsm")]);
    let bytes = fs::read(dir.path().join("M.tsm")).unwrap();
    let text = tessera_bytecode::dump(&bytes, tessera_core::Colors::OFF).unwrap();
    assert!(text.contains("MODULE_NAME"));
    assert!(text.contains("\"M\""));
}

#[test]
fn writes_doc_when_requested() {
    let dir = tempfile::tempdir().unwrap();
    let mut args = args(dir.path());
    args.doc = Some(dir.path().join("M.tsmdoc"));

    let written = execute(&args).unwrap();

    assert_eq!(written.len(), 2);
    let doc = fs::read(dir.path().join("M.tsmdoc")).unwrap();
    assert_eq!(
        tessera_bytecode::FileKind::detect(&doc),
        Some(tessera_bytecode::FileKind::Doc)
    );
}

#[test]
fn config_supplies_output_path() {
    let dir = tempfile::tempdir().unwrap();
    let mut args = args(dir.path());
    let output = dir.path().join("from_config.tsm");
    let config = dir.path().join("opts.json");
    fs::write(
        &config,
        format!(r#"{{ "output_path": {:?} }}"#, output.to_str().unwrap()),
    )
    .unwrap();
    args.output = None;
    args.config = Some(config);

    execute(&args).unwrap();

    assert!(output.exists());
}

#[test]
fn unknown_module_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut args = args(dir.path());
    args.module = Some("Nope".to_string());

    let err = execute(&args).unwrap_err();

    assert!(matches!(err, CliError::UnknownModule(ref name) if name == "Nope"));
    assert!(!dir.path().join("M.tsm").exists());
}

#[test]
fn missing_output_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut args = args(dir.path());
    args.output = None;

    let err = execute(&args).unwrap_err();

    assert!(matches!(err, CliError::MissingOutput));
}

#[test]
fn bad_config_names_its_path() {
    let dir = tempfile::tempdir().unwrap();
    let mut args = args(dir.path());
    let config = dir.path().join("opts.json");
    fs::write(&config, r#"{ "no_such_option": true }"#).unwrap();
    args.config = Some(config.clone());

    let err = execute(&args).unwrap_err();

    assert!(matches!(err, CliError::Config { ref path, .. } if *path == config));
}

#[test]
fn unreadable_graph_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut args = args(dir.path());
    args.ast_path = dir.path().join("missing.json");

    let err = execute(&args).unwrap_err();

    assert!(matches!(err, CliError::Read { .. }));
}
