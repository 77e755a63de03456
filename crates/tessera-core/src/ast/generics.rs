//! Generic parameter lists, signatures and environments.

use serde::{Deserialize, Serialize};

use crate::Symbol;

use super::attrs::LayoutConstraintKind;
use super::ids::{DeclId, GenericSignatureId, TypeId};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GenericParamList {
    /// `GenericTypeParam` declarations, in order.
    pub params: Vec<DeclId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayoutConstraint {
    pub kind: LayoutConstraintKind,
    /// Size in bits, for the trivial-of-size kinds.
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub alignment: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Requirement {
    Conformance { subject: TypeId, protocol: TypeId },
    Superclass { subject: TypeId, constraint: TypeId },
    SameType { first: TypeId, second: TypeId },
    Layout { subject: TypeId, layout: LayoutConstraint },
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GenericSignature {
    /// `GenericParam` types, outermost depth first.
    pub params: Vec<TypeId>,
    #[serde(default)]
    pub requirements: Vec<Requirement>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentParam {
    pub name: Symbol,
    /// `GenericParam` interface type.
    pub ty: TypeId,
    /// Declaration that introduces the parameter, when there is one.
    #[serde(default)]
    pub decl: Option<DeclId>,
}

/// A generic signature with its parameters bound to declarations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenericEnvironment {
    pub signature: GenericSignatureId,
    pub params: Vec<EnvironmentParam>,
}
