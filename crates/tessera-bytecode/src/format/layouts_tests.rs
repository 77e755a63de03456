use std::collections::HashSet;

use super::BlockId;
use super::layouts;
use crate::bitstream::{Abbrev, FIRST_APPLICATION_ABBREV};

fn assert_layouts_named(block: BlockId, layouts: &[Abbrev]) {
    let mut seen = HashSet::new();
    for abbrev in layouts {
        let code = abbrev.code().expect("layout starts with a literal code");
        assert!(seen.insert(code), "{}: duplicate layout {code}", block.name());
        assert!(
            block.record_name(code).is_some(),
            "{}: layout for unnamed code {code}",
            block.name()
        );
    }
}

#[test]
fn every_layout_has_a_named_code() {
    assert_layouts_named(BlockId::Control, &layouts::control_layouts());
    assert_layouts_named(BlockId::Options, &layouts::options_layouts());
    assert_layouts_named(BlockId::Input, &layouts::input_layouts());
    assert_layouts_named(BlockId::IdentifierData, &layouts::identifier_layouts());
    assert_layouts_named(BlockId::DeclsAndTypes, &layouts::decls_layouts());
    assert_layouts_named(BlockId::Index, &layouts::index_layouts());
    assert_layouts_named(BlockId::DeclMemberTables, &layouts::member_table_layouts());
    assert_layouts_named(BlockId::Body, &layouts::body_layouts());
    assert_layouts_named(BlockId::BodyIndex, &layouts::body_index_layouts());
    assert_layouts_named(BlockId::Comment, &layouts::comment_layouts());
}

#[test]
fn every_decls_record_has_a_layout() {
    let codes: HashSet<u32> = layouts::decls_layouts().iter().filter_map(Abbrev::code).collect();
    for (code, name) in BlockId::DeclsAndTypes.records() {
        assert!(codes.contains(code), "no layout for {name}");
    }
}

#[test]
fn every_index_record_has_a_layout() {
    let codes: HashSet<u32> = layouts::index_layouts().iter().filter_map(Abbrev::code).collect();
    for (code, name) in BlockId::Index.records() {
        assert!(codes.contains(code), "no layout for {name}");
    }
}

#[test]
fn trailing_payloads_are_last() {
    for abbrev in layouts::decls_layouts()
        .iter()
        .chain(layouts::body_layouts().iter())
    {
        assert!(!(abbrev.has_array() && abbrev.has_blob()));
    }
}

#[test]
fn abbrev_ids_fit_block_width() {
    for (block, layouts) in [
        (BlockId::Control, layouts::control_layouts()),
        (BlockId::Options, layouts::options_layouts()),
        (BlockId::Input, layouts::input_layouts()),
        (BlockId::IdentifierData, layouts::identifier_layouts()),
        (BlockId::DeclsAndTypes, layouts::decls_layouts()),
        (BlockId::Index, layouts::index_layouts()),
        (BlockId::DeclMemberTables, layouts::member_table_layouts()),
        (BlockId::Body, layouts::body_layouts()),
        (BlockId::BodyIndex, layouts::body_index_layouts()),
        (BlockId::Comment, layouts::comment_layouts()),
    ] {
        let highest = FIRST_APPLICATION_ABBREV as usize + layouts.len() - 1;
        assert!(
            highest < 1 << block.abbrev_width(),
            "{}: abbreviation {highest} needs more than {} bits",
            block.name(),
            block.abbrev_width()
        );
    }
}
