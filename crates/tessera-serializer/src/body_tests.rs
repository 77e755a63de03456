use tessera_bytecode::format::BlockId;
use tessera_bytecode::format::records::{body, body_index, decls};
use tessera_core::NativeBridge;
use tessera_core::ast::{
    BasicBlock, Conformance, DeclContext, DeclKind, FunctionId, GlobalVariable, Instruction,
    Linkage, LoweredFunction, LoweredModule, NormalConformance, VTable, VTableEntry, ValueRef,
    WitnessEntry, WitnessTable,
};

use crate::test_utils::{Fixture, parse, u32_at};
use crate::{SerializationOptions, SerializeError, wire};

fn function(fx: &Fixture, name: &str, blocks: Vec<BasicBlock>) -> LoweredFunction {
    LoweredFunction {
        name: name.to_string(),
        linkage: Linkage::Public,
        lowered_type: fx.int,
        generic_env: None,
        transparent: false,
        serialized: true,
        blocks,
    }
}

/// `return -2`
fn returns_literal(fx: &Fixture) -> Vec<BasicBlock> {
    vec![BasicBlock {
        args: Vec::new(),
        instructions: vec![
            Instruction::IntegerLiteral {
                ty: fx.int,
                value: -2,
            },
            Instruction::Return {
                operand: ValueRef::Result { block: 0, inst: 0 },
            },
        ],
    }]
}

fn set_body(fx: &mut Fixture, lowered: LoweredModule) {
    fx.ast.module_mut(fx.module).body = Some(lowered);
}

fn listed(functions: Vec<FunctionId>) -> LoweredModule {
    LoweredModule {
        functions,
        ..LoweredModule::default()
    }
}

#[test]
fn serialized_function_is_defined() {
    let mut fx = Fixture::new();
    let blocks = returns_literal(&fx);
    let f = function(&fx, "main_fn", blocks);
    let f = fx.ast.add_function(f);
    set_body(&mut fx, listed(vec![f]));

    let bytes = fx.module_bytes();
    let file = parse(&bytes);

    assert_eq!(
        file.codes(BlockId::Body),
        vec![
            body::SIL_FUNCTION,
            body::BASIC_BLOCK,
            body::INTEGER_LITERAL,
            body::RETURN
        ]
    );
    let header = file.record(BlockId::Body, body::SIL_FUNCTION);
    assert_eq!(header.field(1), wire::linkage(Linkage::Public));
    assert_eq!(header.field(3), 1, "serialized");
    assert_eq!(header.field(4), 0, "definition");
    assert_eq!(header.field(7), 1, "one block");
    // zigzag(-2)
    assert_eq!(file.record(BlockId::Body, body::INTEGER_LITERAL).field(1), 3);
    assert_eq!(file.record(BlockId::Body, body::RETURN).fields, vec![0]);

    let id = file
        .lookup(BlockId::BodyIndex, body_index::FUNC_NAMES, b"main_fn")
        .unwrap();
    assert_eq!(u32_at(&id, 0), 1);
    let offsets = file.record(BlockId::BodyIndex, body_index::FUNC_OFFSETS);
    assert_eq!(offsets.fields.len(), 1);
}

#[test]
fn unserialized_body_becomes_declaration() {
    let mut fx = Fixture::new();
    let blocks = returns_literal(&fx);
    let mut f = function(&fx, "hidden_fn", blocks);
    f.serialized = false;
    f.linkage = Linkage::Hidden;
    let f = fx.ast.add_function(f);
    set_body(&mut fx, listed(vec![f]));

    let bytes = fx.module_bytes();
    let file = parse(&bytes);

    assert_eq!(file.codes(BlockId::Body), vec![body::SIL_FUNCTION]);
    let header = file.record(BlockId::Body, body::SIL_FUNCTION);
    assert_eq!(header.field(1), wire::linkage(Linkage::HiddenExternal));
    assert_eq!(header.field(4), 1, "declaration only");
    assert_eq!(header.field(7), 0);
}

#[test]
fn serialize_all_bodies_overrides_flag() {
    let mut fx = Fixture::new();
    let blocks = returns_literal(&fx);
    let mut f = function(&fx, "plain_fn", blocks);
    f.serialized = false;
    let f = fx.ast.add_function(f);
    set_body(&mut fx, listed(vec![f]));
    let opts = SerializationOptions::new("M.tsm").serialize_all_bodies(true);

    let artifacts = fx.serialize(&opts);
    let file = parse(&artifacts.module);

    let header = file.record(BlockId::Body, body::SIL_FUNCTION);
    assert_eq!(header.field(4), 0);
    assert_eq!(file.records(BlockId::Body, body::BASIC_BLOCK).len(), 1);
}

#[test]
fn referenced_functions_are_declared_external() {
    let mut fx = Fixture::new();
    let callee = function(&fx, "callee", returns_literal(&fx));
    let callee = fx.ast.add_function(callee);
    let caller_blocks = vec![BasicBlock {
        args: vec![fx.int],
        instructions: vec![
            Instruction::FunctionRef { function: callee },
            Instruction::Apply {
                callee: ValueRef::Result { block: 0, inst: 0 },
                args: vec![ValueRef::Arg { block: 0, index: 0 }],
                substitutions: Vec::new(),
            },
            Instruction::Return {
                operand: ValueRef::Result { block: 0, inst: 1 },
            },
        ],
    }];
    let caller = function(&fx, "caller", caller_blocks);
    let caller = fx.ast.add_function(caller);
    set_body(&mut fx, listed(vec![caller]));

    let bytes = fx.module_bytes();
    let file = parse(&bytes);

    let headers = file.records(BlockId::Body, body::SIL_FUNCTION);
    assert_eq!(headers.len(), 2);
    assert_eq!(headers[0].field(4), 0);
    // not listed by the module, so never defined here
    assert_eq!(headers[1].field(4), 1);
    assert_eq!(headers[1].field(1), wire::linkage(Linkage::PublicExternal));

    // the block argument is value 0, the function_ref result value 1
    let apply = file.record(BlockId::Body, body::APPLY);
    assert_eq!(apply.fields, vec![1, 0, 0]);
    assert_eq!(file.record(BlockId::Body, body::FUNCTION_REF).field(0), 2);
    assert!(
        file.lookup(BlockId::BodyIndex, body_index::FUNC_NAMES, b"callee")
            .is_some()
    );
}

#[test]
fn tables_and_globals_are_indexed_by_name() {
    let mut fx = Fixture::new();
    let class = fx.public_class(fx.file, "C");
    let method = fx.func(DeclContext::Decl(class), "m");
    let method = fx.ast.add_member(class, method);
    let protocol = tessera_core::ast::Decl::new(
        fx.name("P"),
        DeclContext::File(fx.file),
        DeclKind::Protocol {
            members: Vec::new(),
            inherited: Vec::new(),
            requirement_signature: None,
            class_bound: false,
        },
    );
    let protocol = fx.ast.add_top_level_decl(fx.file, protocol);
    let class_ty = fx.nominal_type(class);
    let conformance = fx.ast.add_conformance(Conformance::Normal(NormalConformance {
        conforming_type: class_ty,
        protocol,
        context: DeclContext::Decl(class),
        type_witnesses: Vec::new(),
        value_witnesses: Vec::new(),
        signature_conformances: Vec::new(),
    }));
    let implementation = function(&fx, "C.m", returns_literal(&fx));
    let implementation = fx.ast.add_function(implementation);
    let int = fx.int;
    set_body(
        &mut fx,
        LoweredModule {
            functions: vec![implementation],
            vtables: vec![VTable {
                class,
                entries: vec![VTableEntry {
                    method,
                    implementation,
                }],
            }],
            witness_tables: vec![WitnessTable {
                conformance,
                linkage: Linkage::Public,
                entries: vec![WitnessEntry {
                    requirement: method,
                    witness: None,
                }],
            }],
            globals: vec![GlobalVariable {
                name: "counter".to_string(),
                linkage: Linkage::Hidden,
                ty: int,
                decl: None,
            }],
        },
    );

    let bytes = fx.module_bytes();
    let file = parse(&bytes);

    let vtable = file
        .lookup(BlockId::BodyIndex, body_index::VTABLE_NAMES, b"M.C")
        .unwrap();
    assert_eq!(u32_at(&vtable, 0), 1);
    let witness = file
        .lookup(BlockId::BodyIndex, body_index::WITNESS_TABLE_NAMES, b"M.C: M.P")
        .unwrap();
    assert_eq!(u32_at(&witness, 0), 1);
    let global = file
        .lookup(BlockId::BodyIndex, body_index::GLOBAL_VAR_NAMES, b"counter")
        .unwrap();
    assert_eq!(u32_at(&global, 0), 1);

    let entry = file.record(BlockId::Body, body::VTABLE_ENTRY);
    assert_eq!(entry.field(1), 1, "implementation function ID");
    let witness_entry = file.record(BlockId::Body, body::WITNESS_METHOD_ENTRY);
    assert_eq!(witness_entry.field(1), 0, "no witness");
    assert_eq!(
        file.records(BlockId::Body, decls::NORMAL_PROTOCOL_CONFORMANCE_ID)
            .len(),
        1
    );

    // offsets point past the function records, in file order
    let vtable_at = file.record(BlockId::BodyIndex, body_index::VTABLE_OFFSETS).field(0);
    let global_at = file
        .record(BlockId::BodyIndex, body_index::GLOBAL_VAR_OFFSETS)
        .field(0);
    let function_at = file.record(BlockId::BodyIndex, body_index::FUNC_OFFSETS).field(0);
    assert!(function_at < vtable_at && vtable_at < global_at);
}

#[test]
fn body_offsets_point_at_function_records() {
    let mut fx = Fixture::new();
    let blocks = returns_literal(&fx);
    let f = function(&fx, "main_fn", blocks);
    let f = fx.ast.add_function(f);
    set_body(&mut fx, listed(vec![f]));

    let bytes = fx.module_bytes();
    let file = parse(&bytes);

    let offset = file.record(BlockId::BodyIndex, body_index::FUNC_OFFSETS).field(0);
    let header = file.record(BlockId::Body, body::SIL_FUNCTION);
    assert_eq!(header.start_bit, offset);
}

#[test]
fn module_without_body_has_no_body_blocks() {
    let fx = Fixture::new();

    let bytes = fx.module_bytes();
    let file = parse(&bytes);

    assert!(!file.has_block(BlockId::Body));
    assert!(!file.has_block(BlockId::BodyIndex));
}

#[test]
fn undefined_value_is_an_error() {
    let mut fx = Fixture::new();
    let blocks = vec![BasicBlock {
        args: Vec::new(),
        instructions: vec![Instruction::Return {
            operand: ValueRef::Arg { block: 0, index: 5 },
        }],
    }];
    let f = function(&fx, "broken", blocks);
    let f = fx.ast.add_function(f);
    set_body(&mut fx, listed(vec![f]));

    let opts = SerializationOptions::new("M.tsm");
    let err = crate::serialize(&fx.ast, fx.module, &NativeBridge, &opts).unwrap_err();

    assert!(matches!(
        err,
        SerializeError::UndefinedValue { ref function, .. } if function == "broken"
    ));
}
