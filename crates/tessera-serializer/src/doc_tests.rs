use tessera_bytecode::FileKind;
use tessera_bytecode::format::BlockId;
use tessera_bytecode::format::records::{comment, control};
use tessera_core::ast::{AccessLevel, Decl, DeclContext, DeclId, DeclKind, NominalBody};

use crate::SerializationOptions;
use crate::test_utils::{Fixture, parse, u32_at};

fn doc_options() -> SerializationOptions {
    SerializationOptions::new("M.tsm").doc_output("M.tsmdoc")
}

fn documented_struct(fx: &mut Fixture, name: &str, access: AccessLevel, text: &str) -> DeclId {
    let decl = Decl::new(
        fx.name(name),
        DeclContext::File(fx.file),
        DeclKind::Struct(NominalBody::default()),
    )
    .with_access(access)
    .with_doc_comment(text);
    fx.ast.add_top_level_decl(fx.file, decl)
}

/// `(group, text)` of a doc comment entry.
fn decode(entry: &[u8]) -> (u32, &str) {
    let group = u32_at(entry, 0);
    let len = u32_at(entry, 4) as usize;
    let text = std::str::from_utf8(&entry[8..8 + len]).unwrap();
    (group, text)
}

#[test]
fn doc_file_layout() {
    let fx = Fixture::new();

    let artifacts = fx.serialize(&doc_options());
    let doc = artifacts.doc.unwrap();
    let file = parse(&doc);

    assert_eq!(FileKind::detect(&doc), Some(FileKind::Doc));
    assert!(file.has_block(BlockId::ModuleDoc));
    assert!(file.has_block(BlockId::Control));
    assert!(!file.has_block(BlockId::Options));
    assert_eq!(
        file.record(BlockId::Control, control::MODULE_NAME).blob_str(),
        Some("M")
    );
    assert!(file.records(BlockId::Comment, comment::DECL_COMMENTS).is_empty());
    let groups = file.record(BlockId::Comment, comment::GROUP_NAMES);
    assert_eq!(groups.blob.unwrap(), b"\0");
}

#[test]
fn comments_are_keyed_by_qualified_name() {
    let mut fx = Fixture::new();
    let s = documented_struct(&mut fx, "S", AccessLevel::Public, "A point.");
    let x = Decl::new(
        fx.name("x"),
        DeclContext::Decl(s),
        DeclKind::Var {
            interface_type: fx.int,
            is_let: true,
            ownership: Default::default(),
            storage: Default::default(),
        },
    )
    .with_access(AccessLevel::Public)
    .with_doc_comment("The x coordinate.");
    fx.ast.add_member(s, x);

    let artifacts = fx.serialize(&doc_options());
    let doc = artifacts.doc.unwrap();
    let file = parse(&doc);

    let entry = file
        .lookup(BlockId::Comment, comment::DECL_COMMENTS, b"M.S")
        .unwrap();
    assert_eq!(decode(&entry), (0, "A point."));
    let member = file
        .lookup(BlockId::Comment, comment::DECL_COMMENTS, b"M.S.x")
        .unwrap();
    assert_eq!(decode(&member), (0, "The x coordinate."));
}

#[test]
fn private_declarations_are_skipped() {
    let mut fx = Fixture::new();
    documented_struct(&mut fx, "Shown", AccessLevel::Internal, "Visible.");
    documented_struct(&mut fx, "Hidden", AccessLevel::FilePrivate, "Not visible.");

    let artifacts = fx.serialize(&doc_options());
    let doc = artifacts.doc.unwrap();
    let file = parse(&doc);

    assert!(
        file.lookup(BlockId::Comment, comment::DECL_COMMENTS, b"M.Shown")
            .is_some()
    );
    assert_eq!(
        file.lookup(BlockId::Comment, comment::DECL_COMMENTS, b"M.Hidden"),
        None
    );
}

#[test]
fn files_map_to_sorted_groups() {
    let mut fx = Fixture::new();
    documented_struct(&mut fx, "S", AccessLevel::Public, "In core.");
    let opts = doc_options()
        .doc_group("main.src", "Core")
        .doc_group("extra.src", "Alpha");

    let artifacts = fx.serialize(&opts);
    let doc = artifacts.doc.unwrap();
    let file = parse(&doc);

    let groups = file.record(BlockId::Comment, comment::GROUP_NAMES);
    assert_eq!(groups.blob.unwrap(), b"\0Alpha\0Core\0");
    let entry = file
        .lookup(BlockId::Comment, comment::DECL_COMMENTS, b"M.S")
        .unwrap();
    assert_eq!(decode(&entry), (2, "In core."));
}

#[test]
fn no_doc_without_doc_path() {
    let mut fx = Fixture::new();
    documented_struct(&mut fx, "S", AccessLevel::Public, "Docs.");

    let artifacts = fx.serialize(&SerializationOptions::new("M.tsm"));

    assert!(artifacts.doc.is_none());
}
