//! In-memory enums → on-disk wire values.
//!
//! Every mapping is an exhaustive `match`: adding a variant on either side
//! fails to compile until the translation is updated.

use tessera_bytecode::format::wire;
use tessera_core::ast::{
    AccessLevel, AccessorKind, Associativity, CtorInitializerKind, DefaultArgumentKind,
    FunctionRepresentation, LayoutConstraintKind, LibraryKind, Linkage, MetatypeRepresentation,
    OperatorFixity, OptionalTypeKind, Ownership, Requirement, ResilienceStrategy, StaticSpelling,
    StorageKind,
};

pub(crate) fn access_level(access: AccessLevel) -> u64 {
    match access {
        AccessLevel::Private => wire::AccessLevel::Private,
        AccessLevel::FilePrivate => wire::AccessLevel::FilePrivate,
        AccessLevel::Internal => wire::AccessLevel::Internal,
        AccessLevel::Public => wire::AccessLevel::Public,
        AccessLevel::Open => wire::AccessLevel::Open,
    }
    .as_u64()
}

pub(crate) fn associativity(assoc: Associativity) -> u64 {
    match assoc {
        Associativity::None => wire::Associativity::None,
        Associativity::Left => wire::Associativity::Left,
        Associativity::Right => wire::Associativity::Right,
    }
    .as_u64()
}

pub(crate) fn static_spelling(spelling: StaticSpelling) -> u64 {
    match spelling {
        StaticSpelling::None => wire::StaticSpelling::None,
        StaticSpelling::Static => wire::StaticSpelling::KeywordStatic,
        StaticSpelling::Class => wire::StaticSpelling::KeywordClass,
    }
    .as_u64()
}

pub(crate) fn function_representation(repr: FunctionRepresentation) -> u64 {
    match repr {
        FunctionRepresentation::Native => wire::FunctionRepresentation::Swift,
        FunctionRepresentation::Block => wire::FunctionRepresentation::Block,
        FunctionRepresentation::Thin => wire::FunctionRepresentation::Thin,
        FunctionRepresentation::CFunctionPointer => wire::FunctionRepresentation::CFunctionPointer,
    }
    .as_u64()
}

pub(crate) fn operator_fixity(fixity: OperatorFixity) -> u64 {
    match fixity {
        OperatorFixity::Infix => wire::OperatorKind::Infix,
        OperatorFixity::Prefix => wire::OperatorKind::Prefix,
        OperatorFixity::Postfix => wire::OperatorKind::Postfix,
    }
    .as_u64()
}

/// Operator kind used for precedence-group lookups and xrefs.
pub(crate) fn precedence_group_kind() -> u64 {
    wire::OperatorKind::PrecedenceGroup.as_u64()
}

pub(crate) fn accessor_kind(kind: AccessorKind) -> u64 {
    match kind {
        AccessorKind::Get => wire::AccessorKind::Getter,
        AccessorKind::Set => wire::AccessorKind::Setter,
        AccessorKind::WillSet => wire::AccessorKind::WillSet,
        AccessorKind::DidSet => wire::AccessorKind::DidSet,
        AccessorKind::MaterializeForSet => wire::AccessorKind::MaterializeForSet,
        AccessorKind::Address => wire::AccessorKind::Addressor,
        AccessorKind::MutableAddress => wire::AccessorKind::MutableAddressor,
    }
    .as_u64()
}

pub(crate) fn ctor_initializer_kind(kind: CtorInitializerKind) -> u64 {
    match kind {
        CtorInitializerKind::Designated => wire::CtorInitializerKind::Designated,
        CtorInitializerKind::Convenience => wire::CtorInitializerKind::Convenience,
        CtorInitializerKind::ConvenienceFactory => wire::CtorInitializerKind::ConvenienceFactory,
        CtorInitializerKind::Factory => wire::CtorInitializerKind::Factory,
    }
    .as_u64()
}

pub(crate) fn metatype_representation(repr: Option<MetatypeRepresentation>) -> u64 {
    match repr {
        None => wire::MetatypeRepresentation::None,
        Some(MetatypeRepresentation::Thin) => wire::MetatypeRepresentation::Thin,
        Some(MetatypeRepresentation::Thick) => wire::MetatypeRepresentation::Thick,
        Some(MetatypeRepresentation::ObjC) => wire::MetatypeRepresentation::ObjC,
    }
    .as_u64()
}

pub(crate) fn ownership(ownership: Ownership) -> u64 {
    match ownership {
        Ownership::Strong => wire::Ownership::Strong,
        Ownership::Weak => wire::Ownership::Weak,
        Ownership::Unowned => wire::Ownership::Unowned,
        Ownership::Unmanaged => wire::Ownership::Unmanaged,
    }
    .as_u64()
}

pub(crate) fn default_argument_kind(kind: DefaultArgumentKind) -> u64 {
    match kind {
        DefaultArgumentKind::None => wire::DefaultArgumentKind::None,
        DefaultArgumentKind::Normal => wire::DefaultArgumentKind::Normal,
        DefaultArgumentKind::Inherited => wire::DefaultArgumentKind::Inherited,
        DefaultArgumentKind::Column => wire::DefaultArgumentKind::Column,
        DefaultArgumentKind::File => wire::DefaultArgumentKind::File,
        DefaultArgumentKind::Line => wire::DefaultArgumentKind::Line,
        DefaultArgumentKind::Function => wire::DefaultArgumentKind::Function,
        DefaultArgumentKind::DsoHandle => wire::DefaultArgumentKind::DsoHandle,
        DefaultArgumentKind::Nil => wire::DefaultArgumentKind::Nil,
        DefaultArgumentKind::EmptyArray => wire::DefaultArgumentKind::EmptyArray,
        DefaultArgumentKind::EmptyDictionary => wire::DefaultArgumentKind::EmptyDictionary,
    }
    .as_u64()
}

pub(crate) fn optional_type_kind(kind: OptionalTypeKind) -> u64 {
    match kind {
        OptionalTypeKind::None => wire::OptionalTypeKind::None,
        OptionalTypeKind::Optional => wire::OptionalTypeKind::Optional,
        OptionalTypeKind::ImplicitlyUnwrapped => wire::OptionalTypeKind::ImplicitlyUnwrapped,
    }
    .as_u64()
}

pub(crate) fn library_kind(kind: LibraryKind) -> u64 {
    match kind {
        LibraryKind::Library => wire::LibraryKind::Library,
        LibraryKind::Framework => wire::LibraryKind::Framework,
    }
    .as_u64()
}

pub(crate) fn storage_kind(kind: StorageKind) -> u64 {
    match kind {
        StorageKind::Stored => wire::StorageKind::Stored,
        StorageKind::StoredWithTrivialAccessors => wire::StorageKind::StoredWithTrivialAccessors,
        StorageKind::StoredWithObservers => wire::StorageKind::StoredWithObservers,
        StorageKind::InheritedWithObservers => wire::StorageKind::InheritedWithObservers,
        StorageKind::Computed => wire::StorageKind::Computed,
        StorageKind::ComputedWithMutableAddress => wire::StorageKind::ComputedWithMutableAddress,
        StorageKind::Addressed => wire::StorageKind::Addressed,
        StorageKind::AddressedWithTrivialAccessors => {
            wire::StorageKind::AddressedWithTrivialAccessors
        }
        StorageKind::AddressedWithObservers => wire::StorageKind::AddressedWithObservers,
    }
    .as_u64()
}

pub(crate) fn requirement_kind(req: &Requirement) -> u64 {
    match req {
        Requirement::Conformance { .. } => wire::GenericRequirementKind::Conformance,
        Requirement::SameType { .. } => wire::GenericRequirementKind::SameType,
        Requirement::Superclass { .. } => wire::GenericRequirementKind::Superclass,
        Requirement::Layout { .. } => wire::GenericRequirementKind::Layout,
    }
    .as_u64()
}

pub(crate) fn layout_constraint_kind(kind: LayoutConstraintKind) -> u64 {
    match kind {
        LayoutConstraintKind::UnknownLayout => wire::LayoutRequirementKind::UnknownLayout,
        LayoutConstraintKind::TrivialOfExactSize => wire::LayoutRequirementKind::TrivialOfExactSize,
        LayoutConstraintKind::TrivialOfAtMostSize => {
            wire::LayoutRequirementKind::TrivialOfAtMostSize
        }
        LayoutConstraintKind::Trivial => wire::LayoutRequirementKind::Trivial,
        LayoutConstraintKind::Class => wire::LayoutRequirementKind::Class,
        LayoutConstraintKind::NativeClass => wire::LayoutRequirementKind::NativeClass,
        LayoutConstraintKind::RefCountedObject => wire::LayoutRequirementKind::RefCountedObject,
        LayoutConstraintKind::NativeRefCountedObject => {
            wire::LayoutRequirementKind::NativeRefCountedObject
        }
    }
    .as_u64()
}

pub(crate) fn linkage(linkage: Linkage) -> u64 {
    match linkage {
        Linkage::Public => wire::Linkage::Public,
        Linkage::Hidden => wire::Linkage::Hidden,
        Linkage::Shared => wire::Linkage::Shared,
        Linkage::Private => wire::Linkage::Private,
        Linkage::PublicExternal => wire::Linkage::PublicExternal,
        Linkage::HiddenExternal => wire::Linkage::HiddenExternal,
    }
    .as_u64()
}

pub(crate) fn resilience_strategy(strategy: ResilienceStrategy) -> u64 {
    match strategy {
        ResilienceStrategy::Default => wire::ResilienceStrategy::Default,
        ResilienceStrategy::Resilient => wire::ResilienceStrategy::Resilient,
        ResilienceStrategy::Fragile => wire::ResilienceStrategy::Fragile,
    }
    .as_u64()
}
