//! Declarations.

use serde::{Deserialize, Serialize};

use crate::Symbol;

use super::attrs::{
    AccessLevel, AccessorKind, Associativity, CtorInitializerKind, DefaultArgumentKind,
    OperatorFixity, OptionalTypeKind, Ownership, StaticSpelling, StorageKind,
};
use super::context::DeclContext;
use super::ids::{
    ConformanceId, DeclId, GenericEnvironmentId, GenericParamListId, GenericSignatureId,
    LocalContextId, TypeId,
};

/// Base name of a declaration.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclName {
    Identifier(Symbol),
    Subscript,
    Constructor,
    Destructor,
    /// Extensions, pattern bindings and other unnamed declarations.
    #[default]
    Anonymous,
}

impl DeclName {
    pub fn identifier(self) -> Option<Symbol> {
        match self {
            DeclName::Identifier(sym) => Some(sym),
            _ => None,
        }
    }

    pub fn is_anonymous(self) -> bool {
        matches!(self, DeclName::Anonymous)
    }
}

/// Attribute flags shared by all declaration kinds.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeclAttrs {
    pub implicit: bool,
    pub is_static: bool,
    pub objc: bool,
    pub is_final: bool,
    pub dynamic: bool,
    /// Reachable through dynamic (`AnyObject`-style) member lookup.
    pub dynamic_lookup: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Decl {
    #[serde(default)]
    pub name: DeclName,
    pub context: DeclContext,
    #[serde(default)]
    pub access: AccessLevel,
    #[serde(default)]
    pub attrs: DeclAttrs,
    /// Parameter list this declaration introduces.
    #[serde(default)]
    pub generic_params: Option<GenericParamListId>,
    #[serde(default)]
    pub generic_env: Option<GenericEnvironmentId>,
    /// Disambiguates private declarations of the same name across files.
    #[serde(default)]
    pub private_discriminator: Option<Symbol>,
    /// Position among same-named declarations of a local context.
    #[serde(default)]
    pub local_discriminator: Option<u32>,
    /// Foreign-method selector for `objc` functions.
    #[serde(default)]
    pub objc_selector: Option<String>,
    #[serde(default)]
    pub doc_comment: Option<String>,
    /// Originates from the foreign-declaration importer.
    #[serde(default)]
    pub foreign: bool,
    #[serde(flatten)]
    pub kind: DeclKind,
}

impl Decl {
    pub fn new(name: DeclName, context: DeclContext, kind: DeclKind) -> Self {
        Self {
            name,
            context,
            access: AccessLevel::default(),
            attrs: DeclAttrs::default(),
            generic_params: None,
            generic_env: None,
            private_discriminator: None,
            local_discriminator: None,
            objc_selector: None,
            doc_comment: None,
            foreign: false,
            kind,
        }
    }

    pub fn with_access(mut self, access: AccessLevel) -> Self {
        self.access = access;
        self
    }

    pub fn with_attrs(mut self, attrs: DeclAttrs) -> Self {
        self.attrs = attrs;
        self
    }

    pub fn with_generic_params(mut self, list: GenericParamListId) -> Self {
        self.generic_params = Some(list);
        self
    }

    pub fn with_generic_env(mut self, env: GenericEnvironmentId) -> Self {
        self.generic_env = Some(env);
        self
    }

    pub fn with_doc_comment(mut self, text: impl Into<String>) -> Self {
        self.doc_comment = Some(text.into());
        self
    }
}

/// Nominal type body shared by structs, enums and classes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NominalBody {
    pub members: Vec<DeclId>,
    pub inherited: Vec<TypeId>,
    pub conformances: Vec<ConformanceId>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuncSignature {
    pub interface_type: Option<TypeId>,
    pub params: Vec<DeclId>,
    pub throws: bool,
    pub overridden: Option<DeclId>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageBody {
    pub storage: StorageKind,
    pub accessors: Vec<DeclId>,
    pub overridden: Option<DeclId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatternEntry {
    pub var: DeclId,
    #[serde(default)]
    pub init_context: Option<LocalContextId>,
}

/// Closed set of declaration kinds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum DeclKind {
    Struct(NominalBody),
    Enum {
        #[serde(flatten)]
        body: NominalBody,
        #[serde(default)]
        raw_type: Option<TypeId>,
    },
    Class {
        #[serde(flatten)]
        body: NominalBody,
        #[serde(default)]
        superclass: Option<TypeId>,
        #[serde(default)]
        requires_stored_property_inits: bool,
        #[serde(default)]
        foreign_class: bool,
    },
    Protocol {
        #[serde(default)]
        members: Vec<DeclId>,
        #[serde(default)]
        inherited: Vec<TypeId>,
        #[serde(default)]
        requirement_signature: Option<GenericSignatureId>,
        #[serde(default)]
        class_bound: bool,
    },
    Extension {
        extended_type: TypeId,
        #[serde(default)]
        members: Vec<DeclId>,
        #[serde(default)]
        inherited: Vec<TypeId>,
        #[serde(default)]
        conformances: Vec<ConformanceId>,
    },
    TypeAlias {
        underlying: TypeId,
        #[serde(default)]
        interface_type: Option<TypeId>,
    },
    GenericTypeParam {
        depth: u32,
        index: u32,
        /// List that introduces this parameter.
        #[serde(default)]
        list: Option<GenericParamListId>,
    },
    AssociatedType {
        #[serde(default)]
        default: Option<TypeId>,
        #[serde(default)]
        inherited: Vec<TypeId>,
    },
    Func {
        #[serde(flatten)]
        signature: FuncSignature,
        #[serde(default)]
        static_spelling: StaticSpelling,
        #[serde(default)]
        mutating: bool,
        /// Operator this function implements.
        #[serde(default)]
        operator: Option<DeclId>,
    },
    Accessor {
        #[serde(flatten)]
        signature: FuncSignature,
        accessor_kind: AccessorKind,
        storage: DeclId,
        #[serde(default)]
        mutating: bool,
    },
    Constructor {
        #[serde(flatten)]
        signature: FuncSignature,
        #[serde(default)]
        failability: OptionalTypeKind,
        #[serde(default)]
        init_kind: CtorInitializerKind,
        #[serde(default)]
        required: bool,
    },
    Destructor {
        #[serde(default)]
        interface_type: Option<TypeId>,
    },
    Var {
        interface_type: TypeId,
        #[serde(default)]
        is_let: bool,
        #[serde(default)]
        ownership: Ownership,
        #[serde(flatten)]
        storage: StorageBody,
    },
    Param {
        interface_type: TypeId,
        #[serde(default)]
        argument_name: Option<Symbol>,
        #[serde(default)]
        default_argument: DefaultArgumentKind,
    },
    Subscript {
        #[serde(default)]
        interface_type: Option<TypeId>,
        element_type: TypeId,
        #[serde(default)]
        indices: Vec<DeclId>,
        #[serde(flatten)]
        storage: StorageBody,
    },
    EnumElement {
        #[serde(default)]
        interface_type: Option<TypeId>,
        #[serde(default)]
        has_payload: bool,
    },
    Operator {
        fixity: OperatorFixity,
        #[serde(default)]
        precedence_group: Option<DeclId>,
    },
    PrecedenceGroup {
        #[serde(default)]
        associativity: Associativity,
        #[serde(default)]
        assignment: bool,
        #[serde(default)]
        higher_than: Vec<DeclId>,
        #[serde(default)]
        lower_than: Vec<DeclId>,
    },
    PatternBinding {
        entries: Vec<PatternEntry>,
        #[serde(default)]
        static_spelling: StaticSpelling,
    },
    Import,
    TopLevelCode,
    IfConfig,
    EnumCase,
    Module,
}

impl DeclKind {
    /// Members of a declaration that owns them.
    pub fn members(&self) -> Option<&[DeclId]> {
        match self {
            DeclKind::Struct(body)
            | DeclKind::Enum { body, .. }
            | DeclKind::Class { body, .. } => Some(&body.members),
            DeclKind::Protocol { members, .. } | DeclKind::Extension { members, .. } => {
                Some(members)
            }
            _ => None,
        }
    }

    pub fn members_mut(&mut self) -> Option<&mut Vec<DeclId>> {
        match self {
            DeclKind::Struct(body)
            | DeclKind::Enum { body, .. }
            | DeclKind::Class { body, .. } => Some(&mut body.members),
            DeclKind::Protocol { members, .. } | DeclKind::Extension { members, .. } => {
                Some(members)
            }
            _ => None,
        }
    }

    /// Local conformances declared on a nominal type or extension.
    pub fn conformances(&self) -> &[ConformanceId] {
        match self {
            DeclKind::Struct(body)
            | DeclKind::Enum { body, .. }
            | DeclKind::Class { body, .. } => &body.conformances,
            DeclKind::Extension { conformances, .. } => conformances,
            _ => &[],
        }
    }

    pub fn is_nominal_type(&self) -> bool {
        matches!(
            self,
            DeclKind::Struct(_)
                | DeclKind::Enum { .. }
                | DeclKind::Class { .. }
                | DeclKind::Protocol { .. }
        )
    }

    /// Kinds that declare a named value or type.
    pub fn is_value(&self) -> bool {
        !matches!(
            self,
            DeclKind::Extension { .. }
                | DeclKind::Operator { .. }
                | DeclKind::PrecedenceGroup { .. }
                | DeclKind::PatternBinding { .. }
                | DeclKind::Import
                | DeclKind::TopLevelCode
                | DeclKind::IfConfig
                | DeclKind::EnumCase
                | DeclKind::Module
        )
    }

    /// Requirements a conformance must witness with a value.
    pub fn is_value_requirement(&self) -> bool {
        matches!(
            self,
            DeclKind::Func { .. }
                | DeclKind::Var { .. }
                | DeclKind::Subscript { .. }
                | DeclKind::Constructor { .. }
        )
    }

    /// Interface type of a value declaration, if it has one.
    pub fn interface_type(&self) -> Option<TypeId> {
        match self {
            DeclKind::Func { signature, .. }
            | DeclKind::Accessor { signature, .. }
            | DeclKind::Constructor { signature, .. } => signature.interface_type,
            DeclKind::Var { interface_type, .. } | DeclKind::Param { interface_type, .. } => {
                Some(*interface_type)
            }
            DeclKind::Subscript { interface_type, .. }
            | DeclKind::Destructor { interface_type }
            | DeclKind::EnumElement { interface_type, .. }
            | DeclKind::TypeAlias { interface_type, .. } => *interface_type,
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DeclKind::Struct(_) => "struct",
            DeclKind::Enum { .. } => "enum",
            DeclKind::Class { .. } => "class",
            DeclKind::Protocol { .. } => "protocol",
            DeclKind::Extension { .. } => "extension",
            DeclKind::TypeAlias { .. } => "typealias",
            DeclKind::GenericTypeParam { .. } => "generic type parameter",
            DeclKind::AssociatedType { .. } => "associated type",
            DeclKind::Func { .. } => "func",
            DeclKind::Accessor { .. } => "accessor",
            DeclKind::Constructor { .. } => "init",
            DeclKind::Destructor { .. } => "deinit",
            DeclKind::Var { .. } => "var",
            DeclKind::Param { .. } => "param",
            DeclKind::Subscript { .. } => "subscript",
            DeclKind::EnumElement { .. } => "enum element",
            DeclKind::Operator { .. } => "operator",
            DeclKind::PrecedenceGroup { .. } => "precedence group",
            DeclKind::PatternBinding { .. } => "pattern binding",
            DeclKind::Import => "import",
            DeclKind::TopLevelCode => "top-level code",
            DeclKind::IfConfig => "#if",
            DeclKind::EnumCase => "enum case",
            DeclKind::Module => "module",
        }
    }
}
