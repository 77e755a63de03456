//! Lowered bodies: the optional instruction graph below the declarations.

use serde::{Deserialize, Serialize};

use super::attrs::Linkage;
use super::conformance::{ConformanceRef, Substitution};
use super::ids::{ConformanceId, DeclId, FunctionId, GenericEnvironmentId, GenericSignatureId, TypeId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayoutField {
    pub ty: TypeId,
    #[serde(default)]
    pub mutable: bool,
}

/// Captured-variable layout of a lowered box.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BodyLayout {
    #[serde(default)]
    pub signature: Option<GenericSignatureId>,
    pub fields: Vec<LayoutField>,
}

/// A value produced inside one function.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueRef {
    Arg { block: u32, index: u32 },
    Result { block: u32, inst: u32 },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "op")]
pub enum Instruction {
    AllocBox {
        box_type: TypeId,
    },
    FunctionRef {
        function: FunctionId,
    },
    Apply {
        callee: ValueRef,
        #[serde(default)]
        args: Vec<ValueRef>,
        #[serde(default)]
        substitutions: Vec<Substitution>,
    },
    IntegerLiteral {
        ty: TypeId,
        value: i64,
    },
    StringLiteral {
        value: String,
    },
    StructExtract {
        operand: ValueRef,
        field: DeclId,
    },
    WitnessMethod {
        lookup_type: TypeId,
        member: DeclId,
        conformance: ConformanceRef,
        ty: TypeId,
    },
    Return {
        operand: ValueRef,
    },
    Branch {
        dest: u32,
        #[serde(default)]
        args: Vec<ValueRef>,
    },
    CondBranch {
        condition: ValueRef,
        true_dest: u32,
        #[serde(default)]
        true_args: Vec<ValueRef>,
        false_dest: u32,
        #[serde(default)]
        false_args: Vec<ValueRef>,
    },
    Unreachable,
}

impl Instruction {
    /// Whether the instruction defines a value.
    pub fn has_result(&self) -> bool {
        matches!(
            self,
            Instruction::AllocBox { .. }
                | Instruction::FunctionRef { .. }
                | Instruction::Apply { .. }
                | Instruction::IntegerLiteral { .. }
                | Instruction::StringLiteral { .. }
                | Instruction::StructExtract { .. }
                | Instruction::WitnessMethod { .. }
        )
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BasicBlock {
    #[serde(default)]
    pub args: Vec<TypeId>,
    pub instructions: Vec<Instruction>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoweredFunction {
    pub name: String,
    #[serde(default)]
    pub linkage: Linkage,
    pub lowered_type: TypeId,
    #[serde(default)]
    pub generic_env: Option<GenericEnvironmentId>,
    #[serde(default)]
    pub transparent: bool,
    /// Body may be inlined into other modules.
    #[serde(default)]
    pub serialized: bool,
    /// Empty for external declarations.
    #[serde(default)]
    pub blocks: Vec<BasicBlock>,
}

impl LoweredFunction {
    pub fn is_external_declaration(&self) -> bool {
        self.blocks.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VTableEntry {
    pub method: DeclId,
    pub implementation: FunctionId,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VTable {
    pub class: DeclId,
    pub entries: Vec<VTableEntry>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WitnessEntry {
    pub requirement: DeclId,
    #[serde(default)]
    pub witness: Option<FunctionId>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WitnessTable {
    /// Must be a normal conformance.
    pub conformance: ConformanceId,
    #[serde(default)]
    pub linkage: Linkage,
    pub entries: Vec<WitnessEntry>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GlobalVariable {
    pub name: String,
    #[serde(default)]
    pub linkage: Linkage,
    pub ty: TypeId,
    #[serde(default)]
    pub decl: Option<DeclId>,
}

/// Lowered contents of one module.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoweredModule {
    pub functions: Vec<FunctionId>,
    pub vtables: Vec<VTable>,
    pub witness_tables: Vec<WitnessTable>,
    pub globals: Vec<GlobalVariable>,
}
