//! Protocol conformances and substitutions.

use serde::{Deserialize, Serialize};

use super::context::DeclContext;
use super::ids::{ConformanceId, DeclId, TypeId};

/// How a use site refers to a conformance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConformanceRef {
    /// Conformance known only by its protocol (a generic parameter's).
    Abstract(DeclId),
    Concrete(ConformanceId),
}

/// Replacement for one generic parameter, with the conformances it satisfies.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Substitution {
    pub replacement: TypeId,
    #[serde(default)]
    pub conformances: Vec<ConformanceRef>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypeWitness {
    pub assoc: DeclId,
    pub ty: TypeId,
    #[serde(default)]
    pub type_decl: Option<DeclId>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValueWitness {
    pub requirement: DeclId,
    #[serde(default)]
    pub witness: Option<DeclId>,
    #[serde(default)]
    pub substitutions: Vec<Substitution>,
}

/// Conformance declared directly on a type or extension.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NormalConformance {
    pub conforming_type: TypeId,
    pub protocol: DeclId,
    /// Nominal type or extension that declares the conformance.
    pub context: DeclContext,
    #[serde(default)]
    pub type_witnesses: Vec<TypeWitness>,
    #[serde(default)]
    pub value_witnesses: Vec<ValueWitness>,
    /// Conformances to the protocols the protocol inherits from.
    #[serde(default)]
    pub signature_conformances: Vec<ConformanceRef>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Conformance {
    Normal(NormalConformance),
    /// A generic conformance applied to concrete arguments.
    Specialized {
        conforming_type: TypeId,
        generic: ConformanceId,
        substitutions: Vec<Substitution>,
    },
    /// A superclass conformance seen from a subclass.
    Inherited {
        conforming_type: TypeId,
        inherited: ConformanceId,
    },
}

impl Conformance {
    pub fn conforming_type(&self) -> TypeId {
        match self {
            Conformance::Normal(normal) => normal.conforming_type,
            Conformance::Specialized {
                conforming_type, ..
            }
            | Conformance::Inherited {
                conforming_type, ..
            } => *conforming_type,
        }
    }
}
