use super::BlockId;
use super::records::{body, decls, index};

#[test]
fn ids_round_trip_through_from_u32() {
    for id in BlockId::ALL {
        assert_eq!(BlockId::from_u32(id.as_u32()), Some(id));
    }
    assert_eq!(BlockId::from_u32(1), None);
    assert_eq!(BlockId::from_u32(300), None);
}

#[test]
fn abbrev_widths() {
    assert_eq!(BlockId::BlockInfo.abbrev_width(), 2);
    assert_eq!(BlockId::Index.abbrev_width(), 5);
    assert_eq!(BlockId::Body.abbrev_width(), 6);
    assert_eq!(BlockId::DeclsAndTypes.abbrev_width(), 7);
    assert_eq!(BlockId::Control.abbrev_width(), 4);
}

#[test]
fn record_names_resolve_per_block() {
    assert_eq!(
        BlockId::DeclsAndTypes.record_name(decls::STRUCT_DECL),
        Some("STRUCT_DECL")
    );
    assert_eq!(
        BlockId::Index.record_name(index::DECLS_CHECKSUM),
        Some("DECLS_CHECKSUM")
    );
    assert_eq!(BlockId::Module.record_name(1), None);
}

#[test]
fn body_block_borrows_support_names() {
    assert_eq!(BlockId::Body.record_name(body::APPLY), Some("APPLY"));
    assert_eq!(
        BlockId::Body.record_name(decls::SUBSTITUTION),
        Some("SUBSTITUTION")
    );
}

#[test]
fn record_codes_are_unique_per_block() {
    for id in BlockId::ALL {
        let mut codes: Vec<u32> = id.records().iter().map(|(c, _)| *c).collect();
        let len = codes.len();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), len, "{}", id.name());
    }
}
