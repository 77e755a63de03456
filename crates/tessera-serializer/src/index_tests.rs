use tessera_bytecode::format::BlockId;
use tessera_bytecode::format::records::{decl_member_tables, decls, index};
use tessera_core::ast::{
    AccessLevel, Decl, DeclAttrs, DeclContext, DeclKind, DeclName, OperatorFixity,
};

use crate::test_utils::{Fixture, parse, table_get, u32_at};
use crate::wire;

fn operator(fx: &mut Fixture, name: &str, group: Option<tessera_core::ast::DeclId>) -> Decl {
    Decl::new(
        fx.name(name),
        DeclContext::File(fx.file),
        DeclKind::Operator {
            fixity: OperatorFixity::Infix,
            precedence_group: group,
        },
    )
}

#[test]
fn extensions_are_keyed_by_extended_name() {
    let mut fx = Fixture::new();
    let s = fx.public_struct(fx.file, "S");
    let s_ty = fx.nominal_type(s);
    let ext = Decl::new(
        DeclName::Anonymous,
        DeclContext::File(fx.file),
        DeclKind::Extension {
            extended_type: s_ty,
            members: Vec::new(),
            inherited: Vec::new(),
            conformances: Vec::new(),
        },
    );
    fx.ast.add_top_level_decl(fx.file, ext);

    let bytes = fx.module_bytes();
    let file = parse(&bytes);

    let entry = file.lookup(BlockId::Index, index::EXTENSIONS, b"S").unwrap();
    assert_eq!(entry.len(), 8);
    assert_eq!(u32_at(&entry, 0), 1);
    assert_eq!(u32_at(&entry, 4), 2);
    assert_eq!(
        file.records(BlockId::DeclsAndTypes, decls::EXTENSION_DECL).len(),
        1
    );
}

#[test]
fn operators_and_precedence_groups() {
    let mut fx = Fixture::new();
    let group = Decl::new(
        fx.name("AdditionPrecedence"),
        DeclContext::File(fx.file),
        DeclKind::PrecedenceGroup {
            associativity: Default::default(),
            assignment: false,
            higher_than: Vec::new(),
            lower_than: Vec::new(),
        },
    );
    let group = fx.ast.add_top_level_decl(fx.file, group);
    let op = operator(&mut fx, "+++", Some(group));
    fx.ast.add_top_level_decl(fx.file, op);

    let bytes = fx.module_bytes();
    let file = parse(&bytes);

    let group_entry = file
        .lookup(BlockId::Index, index::PRECEDENCE_GROUPS, b"AdditionPrecedence")
        .unwrap();
    assert_eq!(group_entry[0] as u32, decls::PRECEDENCE_GROUP_DECL);
    assert_eq!(u32_at(&group_entry, 1), 1);

    let op_entry = file.lookup(BlockId::Index, index::OPERATORS, b"+++").unwrap();
    assert_eq!(op_entry[0] as u64, wire::operator_fixity(OperatorFixity::Infix));
    assert_eq!(u32_at(&op_entry, 1), 2);

    let infix = file.record(BlockId::DeclsAndTypes, decls::INFIX_OPERATOR_DECL);
    assert_eq!(infix.fields[2], 1);
}

#[test]
fn nested_types_and_operator_methods() {
    let mut fx = Fixture::new();
    let op = operator(&mut fx, "==", None);
    let op = fx.ast.add_top_level_decl(fx.file, op);
    let outer = fx.public_struct(fx.file, "Outer");
    let inner = Decl::new(
        fx.name("Inner"),
        DeclContext::Decl(outer),
        DeclKind::Struct(Default::default()),
    )
    .with_access(AccessLevel::Public);
    fx.ast.add_member(outer, inner);
    let mut eq = fx.func(DeclContext::Decl(outer), "==");
    if let DeclKind::Func { operator, .. } = &mut eq.kind {
        *operator = Some(op);
    }
    eq.attrs.is_static = true;
    fx.ast.add_member(outer, eq);

    let bytes = fx.module_bytes();
    let file = parse(&bytes);

    let nested = file
        .lookup(BlockId::Index, index::NESTED_TYPE_DECLS, b"Inner")
        .unwrap();
    assert_eq!((u32_at(&nested, 0), u32_at(&nested, 4)), (2, 3));

    let method = file
        .lookup(BlockId::Index, index::OPERATOR_METHODS, b"==")
        .unwrap();
    assert_eq!(method[0] as u32, decls::FUNC_DECL);
    assert_eq!(u32_at(&method, 1), 4);

    assert!(file.lookup(BlockId::Index, index::TOP_LEVEL_DECLS, b"Inner").is_none());
}

#[test]
fn private_members_are_not_indexed_as_nested() {
    let mut fx = Fixture::new();
    let outer = fx.public_struct(fx.file, "Outer");
    let hidden = Decl::new(
        fx.name("Hidden"),
        DeclContext::Decl(outer),
        DeclKind::Struct(Default::default()),
    )
    .with_access(AccessLevel::Private);
    fx.ast.add_member(outer, hidden);

    let bytes = fx.module_bytes();
    let file = parse(&bytes);

    assert!(file.records(BlockId::Index, index::NESTED_TYPE_DECLS).is_empty());
    // still a member of its parent
    assert_eq!(
        file.records(BlockId::DeclsAndTypes, decls::STRUCT_DECL).len(),
        2
    );
}

#[test]
fn foreign_methods_and_dynamic_lookup() {
    let mut fx = Fixture::new();
    let class = fx.public_class(fx.file, "C");
    let mut run = fx.func(DeclContext::Decl(class), "run");
    run.attrs = DeclAttrs {
        objc: true,
        dynamic_lookup: true,
        ..DeclAttrs::default()
    };
    run.objc_selector = Some("runWithOptions:".to_string());
    fx.ast.add_member(class, run);

    let bytes = fx.module_bytes();
    let file = parse(&bytes);

    let objc = file
        .lookup(BlockId::Index, index::OBJC_METHODS, b"runWithOptions:")
        .unwrap();
    assert_eq!(objc[0], 1, "instance method");
    assert_eq!(u32_at(&objc, 1), 2);

    let dynamic = file
        .lookup(BlockId::Index, index::CLASS_MEMBERS_FOR_DYNAMIC_LOOKUP, b"run")
        .unwrap();
    assert_eq!(dynamic[0] as u32, decls::FUNC_DECL);
    assert_eq!(u32_at(&dynamic, 1), 2);

    let selector = file.record(BlockId::DeclsAndTypes, decls::OBJC_NAME);
    assert_eq!(selector.blob_str(), Some("runWithOptions:"));
}

#[test]
fn member_names_point_at_member_tables() {
    let mut fx = Fixture::new();
    let a = fx.public_struct(fx.file, "A");
    let b = fx.public_struct(fx.file, "B");
    fx.member_var(a, "x", fx.int);
    fx.member_var(b, "x", fx.int);

    let bytes = fx.module_bytes();
    let file = parse(&bytes);

    let position = file
        .lookup(BlockId::Index, index::DECL_MEMBER_NAMES, b"x")
        .unwrap();
    let position = u64::from_le_bytes(position.try_into().unwrap());
    let table = file
        .records(BlockId::DeclMemberTables, decl_member_tables::DECL_MEMBERS)
        .into_iter()
        .find(|record| record.start_bit == position)
        .unwrap();

    // A = 1, B = 2; their members follow in drain order
    assert_eq!(table_get(table, &1u32.to_le_bytes()).unwrap(), 3u32.to_le_bytes());
    assert_eq!(table_get(table, &2u32.to_le_bytes()).unwrap(), 4u32.to_le_bytes());
    assert_eq!(table_get(table, &9u32.to_le_bytes()), None);
}

#[test]
fn local_types_and_entry_point() {
    let mut fx = Fixture::new();
    let main = fx.top_level_func(fx.file, "main");
    let mut local = Decl::new(
        fx.name("L"),
        DeclContext::Decl(main),
        DeclKind::Struct(Default::default()),
    );
    local.local_discriminator = Some(3);
    let local = fx.ast.add_decl(local);
    let file_unit = fx.ast.file_mut(fx.file);
    file_unit.local_types.push(local);
    file_unit.entry_point = Some(main);

    let bytes = fx.module_bytes();
    let file = parse(&bytes);

    let entry = file
        .lookup(BlockId::Index, index::LOCAL_TYPE_DECLS, b"M.main.L")
        .unwrap();
    assert_eq!((u32_at(&entry, 0), u32_at(&entry, 4)), (2, 3));
    assert_eq!(file.record(BlockId::Index, index::ENTRY_POINT).fields, vec![1]);

    let codes = file.codes(BlockId::DeclsAndTypes);
    let struct_at = codes.iter().position(|&c| c == decls::STRUCT_DECL).unwrap();
    assert_eq!(codes[struct_at - 1], decls::LOCAL_DISCRIMINATOR);
    assert!(codes.contains(&decls::DECL_CONTEXT));
}

#[test]
fn empty_tables_are_omitted() {
    let mut fx = Fixture::new();
    fx.public_struct(fx.file, "S");

    let bytes = fx.module_bytes();
    let file = parse(&bytes);

    let codes = file.codes(BlockId::Index);
    assert!(codes.contains(&index::TOP_LEVEL_DECLS));
    assert!(codes.contains(&index::DECLS_CHECKSUM));
    for absent in [
        index::OPERATORS,
        index::EXTENSIONS,
        index::CLASS_MEMBERS_FOR_DYNAMIC_LOOKUP,
        index::OPERATOR_METHODS,
        index::OBJC_METHODS,
        index::LOCAL_TYPE_DECLS,
        index::PRECEDENCE_GROUPS,
        index::NESTED_TYPE_DECLS,
        index::DECL_MEMBER_NAMES,
        index::ENTRY_POINT,
    ] {
        assert!(!codes.contains(&absent), "unexpected record {absent}");
    }
    assert!(!file.has_block(BlockId::DeclMemberTables));
}

#[test]
fn offset_arrays_are_written_even_when_empty() {
    let fx = Fixture::new();

    let bytes = fx.module_bytes();
    let file = parse(&bytes);

    let codes = file.codes(BlockId::Index);
    assert_eq!(
        codes[..9],
        [
            index::TYPE_OFFSETS,
            index::DECL_OFFSETS,
            index::IDENTIFIER_OFFSETS,
            index::LOCAL_DECL_CONTEXT_OFFSETS,
            index::DECL_CONTEXT_OFFSETS,
            index::NORMAL_CONFORMANCE_OFFSETS,
            index::BODY_LAYOUT_OFFSETS,
            index::GENERIC_ENVIRONMENT_OFFSETS,
            index::GENERIC_SIGNATURE_OFFSETS,
        ]
    );
    assert!(file.record(BlockId::Index, index::DECL_OFFSETS).fields.is_empty());
}
