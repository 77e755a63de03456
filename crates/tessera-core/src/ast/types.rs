//! Structural types.
//!
//! Types are hash-consed by [`AstContext::intern_type`](super::AstContext::intern_type):
//! a `TypeKind` value is its own identity.

use serde::{Deserialize, Serialize};

use crate::Symbol;

use super::attrs::{FunctionRepresentation, MetatypeRepresentation, Ownership};
use super::conformance::Substitution;
use super::ids::{BodyLayoutId, DeclId, GenericEnvironmentId, GenericSignatureId, TypeId};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TupleElement {
    #[serde(default)]
    pub name: Option<Symbol>,
    pub ty: TypeId,
    #[serde(default)]
    pub variadic: bool,
}

/// Extra bits of a function type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct FunctionFlags {
    pub representation: FunctionRepresentation,
    pub throws: bool,
    pub autoclosure: bool,
    pub noescape: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum TypeKind {
    Builtin {
        name: Symbol,
    },
    Nominal {
        decl: DeclId,
        #[serde(default)]
        parent: Option<TypeId>,
    },
    BoundGeneric {
        decl: DeclId,
        #[serde(default)]
        parent: Option<TypeId>,
        args: Vec<TypeId>,
    },
    NameAlias {
        decl: DeclId,
    },
    Paren {
        underlying: TypeId,
    },
    Tuple {
        elements: Vec<TupleElement>,
    },
    Function {
        input: TypeId,
        result: TypeId,
        #[serde(default)]
        flags: FunctionFlags,
    },
    GenericFunction {
        input: TypeId,
        result: TypeId,
        #[serde(default)]
        flags: FunctionFlags,
        signature: GenericSignatureId,
    },
    GenericParam {
        depth: u32,
        index: u32,
        #[serde(default)]
        decl: Option<DeclId>,
    },
    DependentMember {
        base: TypeId,
        assoc: DeclId,
    },
    Archetype {
        interface: TypeId,
        env: GenericEnvironmentId,
    },
    Metatype {
        instance: TypeId,
        #[serde(default)]
        representation: Option<MetatypeRepresentation>,
    },
    ExistentialMetatype {
        instance: TypeId,
        #[serde(default)]
        representation: Option<MetatypeRepresentation>,
    },
    ProtocolComposition {
        members: Vec<TypeId>,
        #[serde(default)]
        has_any_object: bool,
    },
    ReferenceStorage {
        ownership: Ownership,
        referent: TypeId,
    },
    InOut {
        object: TypeId,
    },
    Optional {
        base: TypeId,
        #[serde(default)]
        implicitly_unwrapped: bool,
    },
    ArraySlice {
        base: TypeId,
    },
    Dictionary {
        key: TypeId,
        value: TypeId,
    },
    DynamicSelf {
        self_type: TypeId,
    },
    /// Lowered box whose contents follow a body layout.
    LayoutBox {
        layout: BodyLayoutId,
        #[serde(default)]
        substitutions: Vec<Substitution>,
    },
    /// Produced by the type checker for invalid code. Never serializable.
    Error,
}

impl TypeKind {
    /// Declaration of a nominal or bound generic type.
    pub fn nominal_decl(&self) -> Option<DeclId> {
        match self {
            TypeKind::Nominal { decl, .. } | TypeKind::BoundGeneric { decl, .. } => Some(*decl),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TypeKind::Builtin { .. } => "builtin",
            TypeKind::Nominal { .. } => "nominal",
            TypeKind::BoundGeneric { .. } => "bound generic",
            TypeKind::NameAlias { .. } => "name alias",
            TypeKind::Paren { .. } => "paren",
            TypeKind::Tuple { .. } => "tuple",
            TypeKind::Function { .. } => "function",
            TypeKind::GenericFunction { .. } => "generic function",
            TypeKind::GenericParam { .. } => "generic parameter",
            TypeKind::DependentMember { .. } => "dependent member",
            TypeKind::Archetype { .. } => "archetype",
            TypeKind::Metatype { .. } => "metatype",
            TypeKind::ExistentialMetatype { .. } => "existential metatype",
            TypeKind::ProtocolComposition { .. } => "protocol composition",
            TypeKind::ReferenceStorage { .. } => "reference storage",
            TypeKind::InOut { .. } => "inout",
            TypeKind::Optional { .. } => "optional",
            TypeKind::ArraySlice { .. } => "array slice",
            TypeKind::Dictionary { .. } => "dictionary",
            TypeKind::DynamicSelf { .. } => "dynamic self",
            TypeKind::LayoutBox { .. } => "layout box",
            TypeKind::Error => "error",
        }
    }
}
