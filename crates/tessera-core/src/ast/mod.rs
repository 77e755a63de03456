//! Entity model of a type-checked program.
//!
//! Everything the serializer reads lives in one [`AstContext`] arena:
//! declarations, hash-consed types, lexical contexts, generic signatures and
//! environments, conformances, and the optional lowered bodies.

mod arena;
mod attrs;
mod body;
mod conformance;
mod context;
mod decl;
mod generics;
mod ids;
mod module;
mod types;

#[cfg(test)]
mod arena_tests;

pub use arena::AstContext;
pub use attrs::{
    AccessLevel, AccessorKind, Associativity, CtorInitializerKind, DefaultArgumentKind,
    FunctionRepresentation, LayoutConstraintKind, LibraryKind, Linkage, MetatypeRepresentation,
    OperatorFixity, OptionalTypeKind, Ownership, ResilienceStrategy, StaticSpelling, StorageKind,
};
pub use body::{
    BasicBlock, BodyLayout, GlobalVariable, Instruction, LayoutField, LoweredFunction,
    LoweredModule, VTable, VTableEntry, ValueRef, WitnessEntry, WitnessTable,
};
pub use conformance::{
    Conformance, ConformanceRef, NormalConformance, Substitution, TypeWitness, ValueWitness,
};
pub use context::{DeclContext, LocalContext};
pub use decl::{
    Decl, DeclAttrs, DeclKind, DeclName, FuncSignature, NominalBody, PatternEntry, StorageBody,
};
pub use generics::{
    EnvironmentParam, GenericEnvironment, GenericParamList, GenericSignature, LayoutConstraint,
    Requirement,
};
pub use ids::{
    BodyLayoutId, ConformanceId, DeclId, FileId, FunctionId, GenericEnvironmentId,
    GenericParamListId, GenericSignatureId, LocalContextId, ModuleId, TypeId,
};
pub use module::{FileUnit, Import, LinkLibrary, Module, ModuleKind};
pub use types::{FunctionFlags, TupleElement, TypeKind};
