//! The `BODY` block of lowered functions and its `BODY_INDEX`.
//!
//! Bodies are written into a detached sink before the declarations block,
//! so everything they reference is queued in time for the drain. The sink
//! is spliced into the module block after the index, and the body index
//! rebases its offsets onto the splice position.

use std::collections::HashMap;

use tessera_bytecode::HashTableBuilder;
use tessera_bytecode::format::BlockId;
use tessera_bytecode::format::layouts::{body_index_layouts, body_layouts};
use tessera_bytecode::format::records::{body, body_index};
use tessera_core::ast::{
    Conformance, ConformanceRef, FunctionId, GlobalVariable, Instruction, LoweredFunction, VTable,
    ValueRef, WitnessTable,
};
use tracing::debug;

use crate::Serializer;
use crate::error::{Result, SerializeError};
use crate::invariants::missing;
use crate::sink::RecordSink;
use crate::wire;

/// Name table plus offsets of one kind of body entity.
#[derive(Debug, Default)]
struct NamedOffsets {
    names: HashTableBuilder,
    /// Relative to the start of the body sink.
    offsets: Vec<u64>,
}

impl NamedOffsets {
    fn add(&mut self, name: &str, offset: u64) {
        self.offsets.push(offset);
        let id = self.offsets.len() as u32;
        self.names.insert(name, id.to_le_bytes().to_vec());
    }
}

/// A finished body block waiting to be spliced into the module.
#[derive(Debug)]
pub(crate) struct PendingBody {
    sink: RecordSink,
    functions: HashTableBuilder,
    vtables: NamedOffsets,
    witness_tables: NamedOffsets,
    globals: NamedOffsets,
}

fn zigzag(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

/// Per-function value numbering: each block's arguments, then the results
/// of its instructions, in block order.
fn number_values(function: &LoweredFunction) -> HashMap<ValueRef, u64> {
    let mut numbers = HashMap::new();
    let mut next = 0u64;
    for (block, bb) in function.blocks.iter().enumerate() {
        let block = block as u32;
        for index in 0..bb.args.len() as u32 {
            numbers.insert(ValueRef::Arg { block, index }, next);
            next += 1;
        }
        for (inst, instruction) in bb.instructions.iter().enumerate() {
            if instruction.has_result() {
                let inst = inst as u32;
                numbers.insert(ValueRef::Result { block, inst }, next);
                next += 1;
            }
        }
    }
    numbers
}

impl Serializer<'_> {
    /// Write the module's lowered contents, if it has any.
    pub(crate) fn write_body(&mut self) -> Result<Option<PendingBody>> {
        let ast = self.ast;
        let Some(lowered) = ast.module(self.module).body.as_ref() else {
            return Ok(None);
        };

        let outer = std::mem::replace(&mut self.out, RecordSink::detached(BlockId::Module));
        self.out.enter(BlockId::Body, body_layouts());

        for &function in &lowered.functions {
            self.module_functions.insert(function);
            self.add_function_ref(function);
        }
        self.drain_functions()?;

        let mut vtables = NamedOffsets::default();
        for vtable in &lowered.vtables {
            let offset = self.out.position();
            self.write_vtable(vtable)?;
            vtables.add(&ast.qualified_name(vtable.class), offset);
        }

        let mut witness_tables = NamedOffsets::default();
        for table in &lowered.witness_tables {
            let offset = self.out.position();
            let name = self.write_witness_table(table)?;
            witness_tables.add(&name, offset);
        }

        let mut globals = NamedOffsets::default();
        for global in &lowered.globals {
            let offset = self.out.position();
            self.write_global(global)?;
            globals.add(&global.name, offset);
        }

        // Tables can name functions the module does not list.
        self.drain_functions()?;
        self.out.exit();

        let mut functions = HashTableBuilder::new();
        for (index, function) in self.ids.functions.keys().enumerate() {
            let id = index as u32 + 1;
            functions.insert(ast.function(function).name.as_str(), id.to_le_bytes().to_vec());
        }

        debug!(
            functions = self.ids.functions.len(),
            vtables = vtables.offsets.len(),
            witness_tables = witness_tables.offsets.len(),
            globals = globals.offsets.len(),
            "body written"
        );
        let sink = std::mem::replace(&mut self.out, outer);
        Ok(Some(PendingBody {
            sink,
            functions,
            vtables,
            witness_tables,
            globals,
        }))
    }

    /// Splice the body block and write `BODY_INDEX` after it.
    pub(crate) fn append_body(&mut self, pending: PendingBody) -> Result<()> {
        let base = self.out.append(pending.sink);
        let rebase = |offsets: &[u64]| -> Vec<u64> { offsets.iter().map(|&o| base + o).collect() };

        let function_offsets = rebase(self.offsets.functions.as_slice());
        self.out.enter(BlockId::BodyIndex, body_index_layouts());
        for (names_code, offsets_code, names, offsets) in [
            (
                body_index::FUNC_NAMES,
                body_index::FUNC_OFFSETS,
                pending.functions,
                function_offsets,
            ),
            (
                body_index::VTABLE_NAMES,
                body_index::VTABLE_OFFSETS,
                pending.vtables.names,
                rebase(&pending.vtables.offsets),
            ),
            (
                body_index::WITNESS_TABLE_NAMES,
                body_index::WITNESS_TABLE_OFFSETS,
                pending.witness_tables.names,
                rebase(&pending.witness_tables.offsets),
            ),
            (
                body_index::GLOBAL_VAR_NAMES,
                body_index::GLOBAL_VAR_OFFSETS,
                pending.globals.names,
                rebase(&pending.globals.offsets),
            ),
        ] {
            if names.is_empty() {
                continue;
            }
            let (offset, bytes) = names.finish();
            self.out.record_blob(names_code, &[offset as u64], &bytes)?;
            self.out.record(offsets_code, &offsets)?;
        }
        self.out.exit();
        Ok(())
    }

    fn drain_functions(&mut self) -> Result<()> {
        while let Some(function) = self.queues.functions.pop_front() {
            self.write_function(function)?;
        }
        Ok(())
    }

    fn write_function(&mut self, id: FunctionId) -> Result<()> {
        let function_id = self
            .ids
            .functions
            .get(id)
            .ok_or_else(|| missing(format!("ID for function {}", id.as_u32())))?;
        self.offsets
            .functions
            .record(function_id, self.out.position())?;
        self.trace_record("function", function_id);

        let ast = self.ast;
        let function = ast.function(id);
        let define = !function.is_external_declaration()
            && self.module_functions.contains(&id)
            && (self.options.serialize_all_bodies || function.serialized);
        let linkage = if define {
            function.linkage
        } else {
            function.linkage.as_external()
        };
        let block_count = if define { function.blocks.len() } else { 0 };

        let fields = [
            self.add_identifier_ref(&function.name),
            wire::linkage(linkage),
            function.transparent as u64,
            function.serialized as u64,
            !define as u64,
            self.add_type_ref(Some(function.lowered_type)),
            self.add_generic_environment_ref(function.generic_env),
            block_count as u64,
        ];
        self.out.record(body::SIL_FUNCTION, &fields)?;
        if !define {
            return Ok(());
        }

        let values = number_values(function);
        let value = |v: &ValueRef| -> Result<u64> {
            values
                .get(v)
                .copied()
                .ok_or_else(|| SerializeError::UndefinedValue {
                    function: function.name.clone(),
                    value: format!("{v:?}"),
                })
        };

        for bb in &function.blocks {
            let args: Vec<u64> = bb.args.iter().map(|&ty| self.add_type_ref(Some(ty))).collect();
            self.out.record(body::BASIC_BLOCK, &args)?;

            for instruction in &bb.instructions {
                match instruction {
                    Instruction::AllocBox { box_type } => {
                        let ty = self.add_type_ref(Some(*box_type));
                        self.out.record(body::ALLOC_BOX, &[ty])?;
                    }
                    Instruction::FunctionRef { function: callee } => {
                        let fields = [
                            self.add_function_ref(*callee),
                            self.add_type_ref(Some(ast.function(*callee).lowered_type)),
                        ];
                        self.out.record(body::FUNCTION_REF, &fields)?;
                    }
                    Instruction::Apply {
                        callee,
                        args,
                        substitutions,
                    } => {
                        let mut fields = vec![value(callee)?, substitutions.len() as u64];
                        for arg in args {
                            fields.push(value(arg)?);
                        }
                        self.out.record(body::APPLY, &fields)?;
                        self.write_substitutions(substitutions)?;
                    }
                    Instruction::IntegerLiteral { ty, value: literal } => {
                        let fields = [self.add_type_ref(Some(*ty)), zigzag(*literal)];
                        self.out.record(body::INTEGER_LITERAL, &fields)?;
                    }
                    Instruction::StringLiteral { value: literal } => {
                        self.out
                            .record_blob(body::STRING_LITERAL, &[], literal.as_bytes())?;
                    }
                    Instruction::StructExtract { operand, field } => {
                        let fields = [value(operand)?, self.add_decl_ref(Some(*field), false)];
                        self.out.record(body::STRUCT_EXTRACT, &fields)?;
                    }
                    Instruction::WitnessMethod {
                        lookup_type,
                        member,
                        conformance,
                        ty,
                    } => {
                        let fields = [
                            self.add_type_ref(Some(*lookup_type)),
                            self.add_decl_ref(Some(*member), false),
                            self.add_type_ref(Some(*ty)),
                        ];
                        self.out.record(body::WITNESS_METHOD, &fields)?;
                        self.write_conformance_ref(*conformance)?;
                    }
                    Instruction::Return { operand } => {
                        self.out.record(body::RETURN, &[value(operand)?])?;
                    }
                    Instruction::Branch { dest, args } => {
                        let mut fields = vec![*dest as u64];
                        for arg in args {
                            fields.push(value(arg)?);
                        }
                        self.out.record(body::BRANCH, &fields)?;
                    }
                    Instruction::CondBranch {
                        condition,
                        true_dest,
                        true_args,
                        false_dest,
                        false_args,
                    } => {
                        let mut fields = vec![
                            value(condition)?,
                            *true_dest as u64,
                            *false_dest as u64,
                            true_args.len() as u64,
                        ];
                        for arg in true_args.iter().chain(false_args) {
                            fields.push(value(arg)?);
                        }
                        self.out.record(body::COND_BRANCH, &fields)?;
                    }
                    Instruction::Unreachable => {
                        self.out.record(body::UNREACHABLE, &[])?;
                    }
                }
            }
        }
        Ok(())
    }

    fn write_vtable(&mut self, vtable: &VTable) -> Result<()> {
        let class = self.add_decl_ref(Some(vtable.class), false);
        self.out.record(body::VTABLE, &[class])?;
        for entry in &vtable.entries {
            let fields = [
                self.add_decl_ref(Some(entry.method), false),
                self.add_function_ref(entry.implementation),
            ];
            self.out.record(body::VTABLE_ENTRY, &fields)?;
        }
        Ok(())
    }

    /// Returns the table's lookup name, `Module.Type: Module.Protocol`.
    fn write_witness_table(&mut self, table: &WitnessTable) -> Result<String> {
        let ast = self.ast;
        let Conformance::Normal(normal) = ast.conformance(table.conformance) else {
            return Err(missing(format!(
                "normal conformance {} for witness table",
                table.conformance.as_u32()
            )));
        };
        let type_name = ast
            .nominal_of_type(normal.conforming_type)
            .map(|nominal| ast.qualified_name(nominal))
            .unwrap_or_default();
        let name = format!("{type_name}: {}", ast.qualified_name(normal.protocol));

        self.out
            .record(body::WITNESS_TABLE, &[wire::linkage(table.linkage)])?;
        self.write_conformance_ref(ConformanceRef::Concrete(table.conformance))?;
        for entry in &table.entries {
            let witness = match entry.witness {
                Some(function) => self.add_function_ref(function),
                None => 0,
            };
            let fields = [self.add_decl_ref(Some(entry.requirement), false), witness];
            self.out.record(body::WITNESS_METHOD_ENTRY, &fields)?;
        }
        Ok(name)
    }

    fn write_global(&mut self, global: &GlobalVariable) -> Result<()> {
        let fields = [
            self.add_identifier_ref(&global.name),
            wire::linkage(global.linkage),
            self.add_type_ref(Some(global.ty)),
            self.add_decl_ref(global.decl, false),
        ];
        self.out.record(body::GLOBAL_VAR, &fields)
    }
}
