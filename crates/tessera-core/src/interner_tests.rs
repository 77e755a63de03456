use crate::{Interner, Symbol};

#[test]
fn intern_deduplicates() {
    let mut interner = Interner::new();

    let a = interner.intern("foo");
    let b = interner.intern("foo");
    let c = interner.intern("bar");

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(interner.len(), 2);
}

#[test]
fn intern_owned_hits_existing_symbol() {
    let mut interner = Interner::new();

    let a = interner.intern("Proto");
    let b = interner.intern_owned("Proto".to_string());

    assert_eq!(a, b);
    assert_eq!(interner.len(), 1);
}

#[test]
fn get_does_not_intern() {
    let mut interner = Interner::new();
    interner.intern("S");

    assert!(interner.get("S").is_some());
    assert_eq!(interner.get("P"), None);
    assert_eq!(interner.len(), 1);
}

#[test]
fn symbol_ordering_is_insertion_order() {
    let mut interner = Interner::new();

    let z = interner.intern("z");
    let a = interner.intern("a");

    assert!(z < a);
    assert_eq!(interner.resolve(a), "a");
}

#[test]
fn nul_blob_reserves_offset_zero() {
    let mut interner = Interner::new();
    interner.intern("S");
    interner.intern("foo");

    let (blob, offsets) = interner.to_nul_blob();

    assert_eq!(blob, b"\0S\0foo\0");
    assert_eq!(offsets, vec![1, 3]);
}

#[test]
fn nul_blob_empty() {
    let interner = Interner::new();
    let (blob, offsets) = interner.to_nul_blob();

    assert_eq!(blob, b"\0");
    assert!(offsets.is_empty());
}

#[test]
fn serializes_as_string_list() {
    let mut interner = Interner::new();
    interner.intern("M");
    interner.intern("S");

    let json = serde_json::to_string(&interner).unwrap();
    assert_eq!(json, r#"["M","S"]"#);

    let back: Interner = serde_json::from_str(&json).unwrap();
    assert_eq!(back.get("S"), Some(Symbol::from_raw(1)));
}

#[test]
fn try_resolve_out_of_range() {
    let interner = Interner::new();
    assert_eq!(interner.try_resolve(Symbol::from_raw(3)), None);
}
