//! Record codes, grouped by the block they appear in.
//!
//! Each group also exposes `NAMES`, the `(code, name)` table used for the
//! block-info name directory and by the dump tool.

macro_rules! record_codes {
    ($($(#[$meta:meta])* $group:ident { $($name:ident = $code:literal,)* })*) => {
        $(
            $(#[$meta])*
            pub mod $group {
                $(pub const $name: u32 = $code;)*

                pub const NAMES: &[(u32, &str)] = &[$(($code, stringify!($name)),)*];
            }
        )*
    };
}

record_codes! {
    /// Standard block-info records.
    block_info {
        SETBID = 1,
        BLOCKNAME = 2,
        SETRECORDNAME = 3,
    }

    control {
        METADATA = 1,
        MODULE_NAME = 2,
        TARGET = 3,
    }

    options {
        SDK_PATH = 1,
        XCC = 2,
        IS_SIB = 3,
        IS_TESTABLE = 4,
        RESILIENCE_STRATEGY = 5,
    }

    input {
        IMPORTED_MODULE = 1,
        LINK_LIBRARY = 2,
        SEARCH_PATH = 3,
        MODULE_LINK_NAME = 4,
    }

    identifier_data {
        IDENTIFIER_DATA = 1,
    }

    /// Types (1..), declarations (40..) and supporting records (100..).
    decls {
        NAME_ALIAS_TYPE = 1,
        GENERIC_TYPE_PARAM_TYPE = 2,
        DEPENDENT_MEMBER_TYPE = 3,
        NOMINAL_TYPE = 4,
        PAREN_TYPE = 5,
        TUPLE_TYPE = 6,
        TUPLE_TYPE_ELT = 7,
        FUNCTION_TYPE = 8,
        METATYPE_TYPE = 9,
        EXISTENTIAL_METATYPE_TYPE = 10,
        ARCHETYPE_TYPE = 11,
        PROTOCOL_COMPOSITION_TYPE = 12,
        BOUND_GENERIC_TYPE = 13,
        GENERIC_FUNCTION_TYPE = 14,
        ARRAY_SLICE_TYPE = 15,
        DICTIONARY_TYPE = 16,
        REFERENCE_STORAGE_TYPE = 17,
        OPTIONAL_TYPE = 18,
        INOUT_TYPE = 19,
        DYNAMIC_SELF_TYPE = 20,
        BUILTIN_TYPE = 21,
        LAYOUT_BOX_TYPE = 22,

        TYPE_ALIAS_DECL = 40,
        GENERIC_TYPE_PARAM_DECL = 41,
        ASSOCIATED_TYPE_DECL = 42,
        STRUCT_DECL = 43,
        CONSTRUCTOR_DECL = 44,
        VAR_DECL = 45,
        PARAM_DECL = 46,
        FUNC_DECL = 47,
        ACCESSOR_DECL = 48,
        PATTERN_BINDING_DECL = 49,
        PROTOCOL_DECL = 50,
        PREFIX_OPERATOR_DECL = 51,
        POSTFIX_OPERATOR_DECL = 52,
        INFIX_OPERATOR_DECL = 53,
        PRECEDENCE_GROUP_DECL = 54,
        CLASS_DECL = 55,
        ENUM_DECL = 56,
        ENUM_ELEMENT_DECL = 57,
        SUBSCRIPT_DECL = 58,
        EXTENSION_DECL = 59,
        DESTRUCTOR_DECL = 60,

        GENERIC_PARAM_LIST = 100,
        GENERIC_PARAM = 101,
        GENERIC_REQUIREMENT = 102,
        LAYOUT_REQUIREMENT = 103,
        GENERIC_SIGNATURE = 104,
        SIL_GENERIC_ENVIRONMENT = 105,
        LOCAL_DISCRIMINATOR = 106,
        PRIVATE_DISCRIMINATOR = 107,
        MEMBERS = 108,
        XREF = 109,
        INHERITED_PROTOCOL_CONFORMANCE = 110,
        ABSTRACT_PROTOCOL_CONFORMANCE = 111,
        NORMAL_PROTOCOL_CONFORMANCE = 112,
        SPECIALIZED_PROTOCOL_CONFORMANCE = 113,
        NORMAL_PROTOCOL_CONFORMANCE_ID = 114,
        PROTOCOL_CONFORMANCE_XREF = 115,
        DECL_CONTEXT = 116,
        ABSTRACT_CLOSURE_EXPR_CONTEXT = 117,
        PATTERN_BINDING_INITIALIZER_CONTEXT = 118,
        DEFAULT_ARGUMENT_INITIALIZER_CONTEXT = 119,
        TOP_LEVEL_CODE_DECL_CONTEXT = 120,
        SIL_LAYOUT = 121,
        XREF_TYPE_PATH_PIECE = 122,
        XREF_VALUE_PATH_PIECE = 123,
        XREF_EXTENSION_PATH_PIECE = 124,
        XREF_OPERATOR_OR_ACCESSOR_PATH_PIECE = 125,
        XREF_GENERIC_PARAM_PATH_PIECE = 126,
        XREF_INITIALIZER_PATH_PIECE = 127,
        OBJC_NAME = 128,
        SUBSTITUTION = 129,
    }

    index {
        TYPE_OFFSETS = 1,
        DECL_OFFSETS = 2,
        IDENTIFIER_OFFSETS = 3,
        TOP_LEVEL_DECLS = 4,
        OPERATORS = 5,
        EXTENSIONS = 6,
        CLASS_MEMBERS_FOR_DYNAMIC_LOOKUP = 7,
        OPERATOR_METHODS = 8,
        OBJC_METHODS = 9,
        ENTRY_POINT = 10,
        LOCAL_DECL_CONTEXT_OFFSETS = 11,
        DECL_CONTEXT_OFFSETS = 12,
        LOCAL_TYPE_DECLS = 13,
        NORMAL_CONFORMANCE_OFFSETS = 14,
        BODY_LAYOUT_OFFSETS = 15,
        PRECEDENCE_GROUPS = 16,
        NESTED_TYPE_DECLS = 17,
        DECL_MEMBER_NAMES = 18,
        GENERIC_ENVIRONMENT_OFFSETS = 19,
        GENERIC_SIGNATURE_OFFSETS = 20,
        DECLS_CHECKSUM = 21,
    }

    decl_member_tables {
        DECL_MEMBERS = 1,
    }

    /// Lowered bodies. Conformance and substitution records inside the body
    /// block use their `decls` codes.
    body {
        SIL_FUNCTION = 1,
        BASIC_BLOCK = 2,
        ALLOC_BOX = 3,
        FUNCTION_REF = 4,
        APPLY = 5,
        INTEGER_LITERAL = 6,
        STRING_LITERAL = 7,
        STRUCT_EXTRACT = 8,
        WITNESS_METHOD = 9,
        RETURN = 10,
        BRANCH = 11,
        COND_BRANCH = 12,
        UNREACHABLE = 13,
        VTABLE = 14,
        VTABLE_ENTRY = 15,
        WITNESS_TABLE = 16,
        WITNESS_METHOD_ENTRY = 17,
        GLOBAL_VAR = 18,
    }

    body_index {
        FUNC_NAMES = 1,
        FUNC_OFFSETS = 2,
        VTABLE_NAMES = 3,
        VTABLE_OFFSETS = 4,
        WITNESS_TABLE_NAMES = 5,
        WITNESS_TABLE_OFFSETS = 6,
        GLOBAL_VAR_NAMES = 7,
        GLOBAL_VAR_OFFSETS = 8,
    }

    comment {
        DECL_COMMENTS = 1,
        GROUP_NAMES = 2,
    }
}

/// Decls-block codes at or above this value are supporting records, some of
/// which are also written inside the body block.
pub const DECLS_SUPPORT_BASE: u32 = 100;

/// Whether a decls-block code is a type record.
pub fn is_type_record(code: u32) -> bool {
    (decls::NAME_ALIAS_TYPE..=decls::LAYOUT_BOX_TYPE).contains(&code)
}

/// Whether a decls-block code is a declaration record.
pub fn is_decl_record(code: u32) -> bool {
    (decls::TYPE_ALIAS_DECL..=decls::DESTRUCTOR_DECL).contains(&code)
}
