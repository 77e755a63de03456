//! In-memory enumerations attached to declarations and types.
//!
//! None of these are written to disk by ordinal. The serializer maps each one
//! to its wire counterpart through an exhaustive translation.

use serde::{Deserialize, Serialize};

/// Formal access level. Ordered from most to least restrictive.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    Private,
    FilePrivate,
    #[default]
    Internal,
    Public,
    Open,
}

impl AccessLevel {
    /// Visible outside the declaring file.
    pub fn is_above_file_private(self) -> bool {
        self > AccessLevel::FilePrivate
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Associativity {
    #[default]
    None,
    Left,
    Right,
}

/// How a `static`/`class` member was spelled.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaticSpelling {
    #[default]
    None,
    Static,
    Class,
}

/// Calling convention of a function type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionRepresentation {
    #[default]
    Native,
    Block,
    Thin,
    CFunctionPointer,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorFixity {
    Infix,
    Prefix,
    Postfix,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessorKind {
    Get,
    Set,
    WillSet,
    DidSet,
    MaterializeForSet,
    Address,
    MutableAddress,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CtorInitializerKind {
    #[default]
    Designated,
    Convenience,
    ConvenienceFactory,
    Factory,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetatypeRepresentation {
    Thin,
    Thick,
    ObjC,
}

/// Reference ownership of a storage type or variable.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ownership {
    #[default]
    Strong,
    Weak,
    Unowned,
    Unmanaged,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultArgumentKind {
    #[default]
    None,
    Normal,
    Inherited,
    Column,
    File,
    Line,
    Function,
    DsoHandle,
    Nil,
    EmptyArray,
    EmptyDictionary,
}

/// Failability of an initializer, or sugar of an optional type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionalTypeKind {
    #[default]
    None,
    Optional,
    ImplicitlyUnwrapped,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LibraryKind {
    #[default]
    Library,
    Framework,
}

/// How a variable or subscript stores its value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    #[default]
    Stored,
    StoredWithTrivialAccessors,
    StoredWithObservers,
    InheritedWithObservers,
    Computed,
    ComputedWithMutableAddress,
    Addressed,
    AddressedWithTrivialAccessors,
    AddressedWithObservers,
}

/// Layout constraint kinds usable in a layout requirement.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutConstraintKind {
    UnknownLayout,
    TrivialOfExactSize,
    TrivialOfAtMostSize,
    Trivial,
    Class,
    NativeClass,
    RefCountedObject,
    NativeRefCountedObject,
}

/// Linkage of a lowered function, witness table or global.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Linkage {
    #[default]
    Public,
    Hidden,
    Shared,
    Private,
    PublicExternal,
    HiddenExternal,
}

impl Linkage {
    /// Linkage a declaration-only copy of a definition gets in another module.
    pub fn as_external(self) -> Self {
        match self {
            Linkage::Public | Linkage::PublicExternal => Linkage::PublicExternal,
            Linkage::Hidden | Linkage::HiddenExternal => Linkage::HiddenExternal,
            Linkage::Shared => Linkage::Shared,
            Linkage::Private => Linkage::Private,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResilienceStrategy {
    #[default]
    Default,
    Resilient,
    Fragile,
}
