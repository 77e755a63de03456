//! Record layouts, registered as abbreviations at the start of each block.
//!
//! Field order here is the field order writers must pass. IDs and counts are
//! VBR6; flags are one bit; wire enums use their `BITS` width. A trailing
//! array is listed as `+ [..]` in the comments.

use crate::bitstream::{Abbrev, AbbrevOp};

use super::records::{
    body, body_index, comment, control, decl_member_tables, decls, identifier_data, index, input,
    options,
};
use super::wire::{
    AccessLevel, AccessorKind, Associativity, CtorInitializerKind, DefaultArgumentKind,
    FunctionRepresentation, GenericRequirementKind, LayoutRequirementKind, LibraryKind, Linkage,
    MetatypeRepresentation, OperatorKind, OptionalTypeKind, Ownership, ResilienceStrategy,
    StaticSpelling, StorageKind,
};

const ID: AbbrevOp = AbbrevOp::Vbr(6);
const FLAG: AbbrevOp = AbbrevOp::Fixed(1);

const fn wire(bits: u8) -> AbbrevOp {
    AbbrevOp::Fixed(bits)
}

const ACCESS: AbbrevOp = wire(AccessLevel::BITS);

fn record(code: u32, fields: &[AbbrevOp]) -> Abbrev {
    Abbrev::new(code, fields)
}

fn with_ids(code: u32, fields: &[AbbrevOp]) -> Abbrev {
    Abbrev::new(code, fields).with_array(ID)
}

fn with_blob(code: u32, fields: &[AbbrevOp]) -> Abbrev {
    Abbrev::new(code, fields).with_blob()
}

pub fn control_layouts() -> Vec<Abbrev> {
    vec![
        // major, minor + version string
        with_blob(control::METADATA, &[AbbrevOp::Fixed(16), AbbrevOp::Fixed(16)]),
        with_blob(control::MODULE_NAME, &[]),
        with_blob(control::TARGET, &[]),
    ]
}

pub fn options_layouts() -> Vec<Abbrev> {
    vec![
        with_blob(options::SDK_PATH, &[]),
        with_blob(options::XCC, &[]),
        record(options::IS_SIB, &[FLAG]),
        record(options::IS_TESTABLE, &[]),
        record(options::RESILIENCE_STRATEGY, &[wire(ResilienceStrategy::BITS)]),
    ]
}

pub fn input_layouts() -> Vec<Abbrev> {
    vec![
        // exported, scoped + "name\0access.path"
        with_blob(input::IMPORTED_MODULE, &[FLAG, FLAG]),
        with_blob(input::LINK_LIBRARY, &[wire(LibraryKind::BITS), FLAG]),
        // is_framework, is_system + path
        with_blob(input::SEARCH_PATH, &[FLAG, FLAG]),
        with_blob(input::MODULE_LINK_NAME, &[]),
    ]
}

pub fn identifier_layouts() -> Vec<Abbrev> {
    vec![with_blob(identifier_data::IDENTIFIER_DATA, &[])]
}

/// Type records.
fn type_layouts() -> Vec<Abbrev> {
    let repr = wire(FunctionRepresentation::BITS);
    let metatype = wire(MetatypeRepresentation::BITS);
    vec![
        record(decls::NAME_ALIAS_TYPE, &[ID]),
        // decl, depth, index
        record(decls::GENERIC_TYPE_PARAM_TYPE, &[ID, ID, ID]),
        // base, associated type decl
        record(decls::DEPENDENT_MEMBER_TYPE, &[ID, ID]),
        // decl, parent
        record(decls::NOMINAL_TYPE, &[ID, ID]),
        record(decls::PAREN_TYPE, &[ID]),
        record(decls::TUPLE_TYPE, &[]),
        // name, type, variadic
        record(decls::TUPLE_TYPE_ELT, &[ID, ID, FLAG]),
        // input, result, representation, autoclosure, noescape, throws
        record(decls::FUNCTION_TYPE, &[ID, ID, repr, FLAG, FLAG, FLAG]),
        record(decls::METATYPE_TYPE, &[ID, metatype]),
        record(decls::EXISTENTIAL_METATYPE_TYPE, &[ID, metatype]),
        // interface type, generic environment
        record(decls::ARCHETYPE_TYPE, &[ID, ID]),
        // has AnyObject + [protocols]
        with_ids(decls::PROTOCOL_COMPOSITION_TYPE, &[FLAG]),
        // decl, parent + [arguments]
        with_ids(decls::BOUND_GENERIC_TYPE, &[ID, ID]),
        // input, result, representation, throws, signature
        record(decls::GENERIC_FUNCTION_TYPE, &[ID, ID, repr, FLAG, ID]),
        record(decls::ARRAY_SLICE_TYPE, &[ID]),
        record(decls::DICTIONARY_TYPE, &[ID, ID]),
        record(decls::REFERENCE_STORAGE_TYPE, &[wire(Ownership::BITS), ID]),
        record(decls::OPTIONAL_TYPE, &[ID, wire(OptionalTypeKind::BITS)]),
        record(decls::INOUT_TYPE, &[ID]),
        record(decls::DYNAMIC_SELF_TYPE, &[ID]),
        record(decls::BUILTIN_TYPE, &[ID]),
        // layout, substitution count
        record(decls::LAYOUT_BOX_TYPE, &[ID, ID]),
    ]
}

/// Declaration records.
fn decl_layouts() -> Vec<Abbrev> {
    let spelling = wire(StaticSpelling::BITS);
    let storage = wire(StorageKind::BITS);
    vec![
        // name, context, underlying, interface, environment, implicit, access
        record(decls::TYPE_ALIAS_DECL, &[ID, ID, ID, ID, ID, FLAG, ACCESS]),
        // name, context, implicit, depth, index
        record(decls::GENERIC_TYPE_PARAM_DECL, &[ID, ID, FLAG, ID, ID]),
        // name, context, default, implicit + [inherited]
        with_ids(decls::ASSOCIATED_TYPE_DECL, &[ID, ID, ID, FLAG]),
        // name, context, implicit, environment, access, conformance count + [inherited]
        with_ids(decls::STRUCT_DECL, &[ID, ID, FLAG, ID, ACCESS, ID]),
        // name, context, implicit, environment, raw type, access, conformance count + [inherited]
        with_ids(decls::ENUM_DECL, &[ID, ID, FLAG, ID, ID, ACCESS, ID]),
        // name, context, implicit, objc, requires stored inits, foreign, environment,
        // superclass, access, conformance count + [inherited]
        with_ids(
            decls::CLASS_DECL,
            &[ID, ID, FLAG, FLAG, FLAG, FLAG, ID, ID, ACCESS, ID],
        ),
        // name, context, implicit, class bound, objc, environment, requirement signature,
        // access + [inherited]
        with_ids(
            decls::PROTOCOL_DECL,
            &[ID, ID, FLAG, FLAG, FLAG, ID, ID, ACCESS],
        ),
        // extended type, context, implicit, environment, conformance count + [inherited]
        with_ids(decls::EXTENSION_DECL, &[ID, ID, FLAG, ID, ID]),
        // name, context, implicit, static, spelling, objc, mutating, throws, final, dynamic,
        // environment, interface, operator, overridden, access + [params]
        with_ids(
            decls::FUNC_DECL,
            &[
                ID, ID, FLAG, FLAG, spelling, FLAG, FLAG, FLAG, FLAG, FLAG, ID, ID, ID, ID, ACCESS,
            ],
        ),
        // context, implicit, static, objc, mutating, throws, final, dynamic, environment,
        // interface, overridden, access, accessor kind, storage + [params]
        with_ids(
            decls::ACCESSOR_DECL,
            &[
                ID,
                FLAG,
                FLAG,
                FLAG,
                FLAG,
                FLAG,
                FLAG,
                FLAG,
                ID,
                ID,
                ID,
                ACCESS,
                wire(AccessorKind::BITS),
                ID,
            ],
        ),
        // context, failability, implicit, objc, throws, init kind, environment, interface,
        // overridden, required, access + [params]
        with_ids(
            decls::CONSTRUCTOR_DECL,
            &[
                ID,
                wire(OptionalTypeKind::BITS),
                FLAG,
                FLAG,
                FLAG,
                wire(CtorInitializerKind::BITS),
                ID,
                ID,
                ID,
                FLAG,
                ACCESS,
            ],
        ),
        // context, implicit, objc, environment, interface
        record(decls::DESTRUCTOR_DECL, &[ID, FLAG, FLAG, ID, ID]),
        // name, context, implicit, objc, static, let, storage, ownership, interface,
        // overridden, access + [accessors]
        with_ids(
            decls::VAR_DECL,
            &[
                ID,
                ID,
                FLAG,
                FLAG,
                FLAG,
                FLAG,
                storage,
                wire(Ownership::BITS),
                ID,
                ID,
                ACCESS,
            ],
        ),
        // argument name, name, context, interface, default argument
        record(
            decls::PARAM_DECL,
            &[ID, ID, ID, ID, wire(DefaultArgumentKind::BITS)],
        ),
        // context, implicit, objc, storage, environment, interface, element, overridden,
        // access, index count + [indices, accessors]
        with_ids(
            decls::SUBSCRIPT_DECL,
            &[ID, FLAG, FLAG, storage, ID, ID, ID, ID, ACCESS, ID],
        ),
        // name, context, interface, has payload, implicit
        record(decls::ENUM_ELEMENT_DECL, &[ID, ID, ID, FLAG, FLAG]),
        record(decls::PREFIX_OPERATOR_DECL, &[ID, ID]),
        record(decls::POSTFIX_OPERATOR_DECL, &[ID, ID]),
        // name, context, precedence group
        record(decls::INFIX_OPERATOR_DECL, &[ID, ID, ID]),
        // name, context, associativity, assignment, higher count + [higher, lower]
        with_ids(
            decls::PRECEDENCE_GROUP_DECL,
            &[ID, ID, wire(Associativity::BITS), FLAG, ID],
        ),
        // context, implicit, static, spelling, entry count + [(var, initializer context)]
        with_ids(decls::PATTERN_BINDING_DECL, &[ID, FLAG, FLAG, spelling, ID]),
    ]
}

/// Conformance and substitution records, valid in both the decls and body blocks.
pub fn conformance_layouts() -> Vec<Abbrev> {
    vec![
        record(decls::INHERITED_PROTOCOL_CONFORMANCE, &[ID]),
        record(decls::ABSTRACT_PROTOCOL_CONFORMANCE, &[ID]),
        // protocol, context, value witness count, type witness count,
        // signature conformance count + [witness data]
        with_ids(decls::NORMAL_PROTOCOL_CONFORMANCE, &[ID, ID, ID, ID, ID]),
        // conforming type, substitution count
        record(decls::SPECIALIZED_PROTOCOL_CONFORMANCE, &[ID, ID]),
        record(decls::NORMAL_PROTOCOL_CONFORMANCE_ID, &[ID]),
        // protocol, nominal, module
        record(decls::PROTOCOL_CONFORMANCE_XREF, &[ID, ID, ID]),
        // replacement, conformance count
        record(decls::SUBSTITUTION, &[ID, ID]),
    ]
}

/// Generic, context, cross-reference and trailing records.
fn support_layouts() -> Vec<Abbrev> {
    vec![
        record(decls::GENERIC_PARAM_LIST, &[]),
        record(decls::GENERIC_PARAM, &[ID]),
        // kind, first, second
        record(
            decls::GENERIC_REQUIREMENT,
            &[wire(GenericRequirementKind::BITS), ID, ID],
        ),
        // kind, subject, size, alignment
        record(
            decls::LAYOUT_REQUIREMENT,
            &[wire(LayoutRequirementKind::BITS), ID, ID, ID],
        ),
        with_ids(decls::GENERIC_SIGNATURE, &[]),
        // + [(name, interface type)]
        with_ids(decls::SIL_GENERIC_ENVIRONMENT, &[]),
        record(decls::LOCAL_DISCRIMINATOR, &[ID]),
        record(decls::PRIVATE_DISCRIMINATOR, &[ID]),
        with_ids(decls::MEMBERS, &[]),
        // module, path length
        record(decls::XREF, &[ID, ID]),
        // decl or local context, is decl
        record(decls::DECL_CONTEXT, &[ID, FLAG]),
        // type, implicit, discriminator, parent
        record(decls::ABSTRACT_CLOSURE_EXPR_CONTEXT, &[ID, FLAG, ID, ID]),
        // binding, entry index
        record(decls::PATTERN_BINDING_INITIALIZER_CONTEXT, &[ID, ID]),
        // parent, parameter index
        record(decls::DEFAULT_ARGUMENT_INITIALIZER_CONTEXT, &[ID, ID]),
        record(decls::TOP_LEVEL_CODE_DECL_CONTEXT, &[ID]),
        // signature + [field type | MUTABLE_FIELD_FLAG]
        with_ids(decls::SIL_LAYOUT, &[ID]),
        // name, private discriminator, in protocol extension
        record(decls::XREF_TYPE_PATH_PIECE, &[ID, ID, FLAG]),
        // type, name, in protocol extension, static
        record(decls::XREF_VALUE_PATH_PIECE, &[ID, ID, FLAG, FLAG]),
        // module, constraint signature
        record(decls::XREF_EXTENSION_PATH_PIECE, &[ID, ID]),
        // name, operator or accessor kind
        record(
            decls::XREF_OPERATOR_OR_ACCESSOR_PATH_PIECE,
            &[ID, wire(operator_or_accessor_bits())],
        ),
        record(decls::XREF_GENERIC_PARAM_PATH_PIECE, &[ID]),
        // type, in protocol extension, failable, init kind
        record(
            decls::XREF_INITIALIZER_PATH_PIECE,
            &[ID, FLAG, FLAG, wire(CtorInitializerKind::BITS)],
        ),
        with_blob(decls::OBJC_NAME, &[]),
    ]
}

const fn operator_or_accessor_bits() -> u8 {
    if OperatorKind::BITS > AccessorKind::BITS {
        OperatorKind::BITS
    } else {
        AccessorKind::BITS
    }
}

/// Set on a `SIL_LAYOUT` field type ID when the field is mutable.
pub const MUTABLE_FIELD_FLAG: u64 = 0x8000_0000;

pub fn decls_layouts() -> Vec<Abbrev> {
    let mut layouts = type_layouts();
    layouts.extend(decl_layouts());
    layouts.extend(support_layouts());
    layouts.extend(conformance_layouts());
    layouts
}

pub fn index_layouts() -> Vec<Abbrev> {
    let offsets = [
        index::TYPE_OFFSETS,
        index::DECL_OFFSETS,
        index::IDENTIFIER_OFFSETS,
        index::LOCAL_DECL_CONTEXT_OFFSETS,
        index::DECL_CONTEXT_OFFSETS,
        index::NORMAL_CONFORMANCE_OFFSETS,
        index::BODY_LAYOUT_OFFSETS,
        index::GENERIC_ENVIRONMENT_OFFSETS,
        index::GENERIC_SIGNATURE_OFFSETS,
    ];
    let tables = [
        index::TOP_LEVEL_DECLS,
        index::OPERATORS,
        index::EXTENSIONS,
        index::CLASS_MEMBERS_FOR_DYNAMIC_LOOKUP,
        index::OPERATOR_METHODS,
        index::OBJC_METHODS,
        index::LOCAL_TYPE_DECLS,
        index::PRECEDENCE_GROUPS,
        index::NESTED_TYPE_DECLS,
        index::DECL_MEMBER_NAMES,
    ];
    let mut layouts: Vec<Abbrev> = offsets.iter().map(|&code| with_ids(code, &[])).collect();
    // table offset + table bytes
    layouts.extend(tables.iter().map(|&code| with_blob(code, &[ID])));
    layouts.push(record(index::ENTRY_POINT, &[ID]));
    layouts.push(record(index::DECLS_CHECKSUM, &[AbbrevOp::Fixed(32)]));
    layouts
}

pub fn member_table_layouts() -> Vec<Abbrev> {
    vec![with_blob(decl_member_tables::DECL_MEMBERS, &[ID])]
}

pub fn body_layouts() -> Vec<Abbrev> {
    let linkage = wire(Linkage::BITS);
    let mut layouts = vec![
        // name, linkage, transparent, serialized, declaration only, type, environment,
        // block count
        record(
            body::SIL_FUNCTION,
            &[ID, linkage, FLAG, FLAG, FLAG, ID, ID, ID],
        ),
        // + [argument types]
        with_ids(body::BASIC_BLOCK, &[]),
        record(body::ALLOC_BOX, &[ID]),
        // function, type
        record(body::FUNCTION_REF, &[ID, ID]),
        // callee, substitution count + [arguments]
        with_ids(body::APPLY, &[ID, ID]),
        // type, zigzag value
        record(body::INTEGER_LITERAL, &[ID, AbbrevOp::Vbr(8)]),
        with_blob(body::STRING_LITERAL, &[]),
        // operand, field
        record(body::STRUCT_EXTRACT, &[ID, ID]),
        // lookup type, member, type
        record(body::WITNESS_METHOD, &[ID, ID, ID]),
        record(body::RETURN, &[ID]),
        // destination + [arguments]
        with_ids(body::BRANCH, &[ID]),
        // condition, true destination, false destination, true argument count
        // + [true arguments, false arguments]
        with_ids(body::COND_BRANCH, &[ID, ID, ID, ID]),
        record(body::UNREACHABLE, &[]),
        record(body::VTABLE, &[ID]),
        // method, implementation
        record(body::VTABLE_ENTRY, &[ID, ID]),
        record(body::WITNESS_TABLE, &[linkage]),
        // requirement, witness function
        record(body::WITNESS_METHOD_ENTRY, &[ID, ID]),
        // name, linkage, type, decl
        record(body::GLOBAL_VAR, &[ID, linkage, ID, ID]),
    ];
    layouts.extend(conformance_layouts());
    layouts
}

pub fn body_index_layouts() -> Vec<Abbrev> {
    let mut layouts = Vec::new();
    for (names, offsets) in [
        (body_index::FUNC_NAMES, body_index::FUNC_OFFSETS),
        (body_index::VTABLE_NAMES, body_index::VTABLE_OFFSETS),
        (body_index::WITNESS_TABLE_NAMES, body_index::WITNESS_TABLE_OFFSETS),
        (body_index::GLOBAL_VAR_NAMES, body_index::GLOBAL_VAR_OFFSETS),
    ] {
        layouts.push(with_blob(names, &[ID]));
        layouts.push(with_ids(offsets, &[]));
    }
    layouts
}

pub fn comment_layouts() -> Vec<Abbrev> {
    vec![
        with_blob(comment::DECL_COMMENTS, &[ID]),
        with_blob(comment::GROUP_NAMES, &[]),
    ]
}
