//! The serialization session.
//!
//! A [`Serializer`] owns every table of one run: entity IDs, offsets, work
//! queues and the index accumulators. Referencing an entity interns it and
//! queues its content; [`Serializer::drain`] writes queued content until no
//! queue has work left. Writing content can reference further entities, so
//! the drain repeats until a fixpoint.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::{debug, trace};

use tessera_bytecode::format::{
    CONSTRUCTOR_ID, CURRENT_MODULE_ID, DESTRUCTOR_ID, EMPTY_OR_BUILTIN_ID,
    FOREIGN_HEADER_MODULE_ID, SUBSCRIPT_ID,
};
use tessera_core::ast::{
    AstContext, BodyLayoutId, ConformanceId, DeclContext, DeclId, DeclName, FunctionId,
    GenericEnvironmentId, GenericParamListId, GenericSignatureId, LocalContextId, ModuleId,
    ModuleKind, TypeId,
};
use tessera_core::{ForeignBridge, Symbol};

use crate::error::Result;
use crate::options::SerializationOptions;
use crate::queues::{DeclOrType, WorkQueues};
use crate::sink::RecordSink;
use crate::tables::{DeclIdTable, IdTable, IdentifierTable, OffsetTable};

/// Where each kind of entity was written.
#[derive(Debug)]
pub(crate) struct Offsets {
    pub decls: OffsetTable,
    pub types: OffsetTable,
    pub local_contexts: OffsetTable,
    pub decl_contexts: OffsetTable,
    pub generic_signatures: OffsetTable,
    /// Tagged: `bit << 1` for written environments, `(signature << 1) | 1`
    /// for environments recoverable from their signature.
    pub generic_environments: OffsetTable,
    pub conformances: OffsetTable,
    pub body_layouts: OffsetTable,
    /// Relative to the start of the detached body writer.
    pub functions: OffsetTable,
}

impl Default for Offsets {
    fn default() -> Self {
        Self {
            decls: OffsetTable::new("declaration"),
            types: OffsetTable::new("type"),
            local_contexts: OffsetTable::new("local context"),
            decl_contexts: OffsetTable::new("decl context"),
            generic_signatures: OffsetTable::new("generic signature"),
            generic_environments: OffsetTable::new("generic environment"),
            conformances: OffsetTable::new("conformance"),
            body_layouts: OffsetTable::new("body layout"),
            functions: OffsetTable::new("function"),
        }
    }
}

/// ID tables, one per entity kind.
#[derive(Debug, Default)]
pub(crate) struct Ids {
    pub decls: DeclIdTable,
    pub types: IdTable<TypeId>,
    pub local_contexts: IdTable<LocalContextId>,
    pub decl_contexts: IdTable<DeclContext>,
    pub generic_signatures: IdTable<GenericSignatureId>,
    pub generic_environments: IdTable<GenericEnvironmentId>,
    pub conformances: IdTable<ConformanceId>,
    pub body_layouts: IdTable<BodyLayoutId>,
    pub functions: IdTable<FunctionId>,
    pub identifiers: IdentifierTable,
}

/// One serialization run over one module.
pub struct Serializer<'a> {
    pub(crate) ast: &'a AstContext,
    pub(crate) module: ModuleId,
    pub(crate) bridge: &'a dyn ForeignBridge,
    pub(crate) options: &'a SerializationOptions,
    pub(crate) out: RecordSink,
    pub(crate) ids: Ids,
    pub(crate) offsets: Offsets,
    pub(crate) queues: WorkQueues,
    /// Declaration that introduces each interned generic parameter list.
    pub(crate) generic_param_owners: HashMap<GenericParamListId, DeclId>,
    /// base name → parent ID → member IDs
    pub(crate) decl_member_names: BTreeMap<String, BTreeMap<u32, Vec<u32>>>,
    /// base name → (record kind, ID)
    pub(crate) dynamic_lookup_members: BTreeMap<String, Vec<(u8, u32)>>,
    /// Functions listed by the module itself, as opposed to referenced ones.
    pub(crate) module_functions: HashSet<FunctionId>,
}

impl<'a> Serializer<'a> {
    pub fn new(
        ast: &'a AstContext,
        module: ModuleId,
        bridge: &'a dyn ForeignBridge,
        options: &'a SerializationOptions,
    ) -> Self {
        Self {
            ast,
            module,
            bridge,
            options,
            out: RecordSink::new(),
            ids: Ids::default(),
            offsets: Offsets::default(),
            queues: WorkQueues::default(),
            generic_param_owners: HashMap::new(),
            decl_member_names: BTreeMap::new(),
            dynamic_lookup_members: BTreeMap::new(),
            module_functions: HashSet::new(),
        }
    }

    pub fn module_name(&self) -> &'a str {
        self.ast.resolve(self.ast.module(self.module).name)
    }

    pub fn decl_count(&self) -> usize {
        self.ids.decls.len()
    }

    pub fn type_count(&self) -> usize {
        self.ids.types.len()
    }

    pub fn identifier_count(&self) -> usize {
        self.ids.identifiers.len()
    }

    /// Declaration ID, interning and queueing the declaration on first use.
    ///
    /// `force` requests full serialization even where a cross-reference
    /// would otherwise do; once requested it stays requested.
    pub fn add_decl_ref(&mut self, decl: Option<DeclId>, force: bool) -> u64 {
        let Some(decl) = decl else { return 0 };
        let interned = self.ids.decls.intern(decl, force);
        if interned.is_new {
            if let Some(list) = self.ast.decl(decl).generic_params {
                self.generic_param_owners.insert(list, decl);
            }
            self.queues.decls_and_types.push_back(DeclOrType::Decl(decl));
        }
        interned.id as u64
    }

    /// Declaration whose generic parameter list is `list`, once referenced.
    pub(crate) fn generic_param_owner(&self, list: GenericParamListId) -> Option<DeclId> {
        self.generic_param_owners.get(&list).copied()
    }

    pub fn add_type_ref(&mut self, ty: Option<TypeId>) -> u64 {
        let Some(ty) = ty else { return 0 };
        let interned = self.ids.types.intern(ty);
        if interned.is_new {
            self.queues.decls_and_types.push_back(DeclOrType::Type(ty));
        }
        interned.id as u64
    }

    pub fn add_identifier_ref(&mut self, text: &str) -> u64 {
        self.ids.identifiers.intern(text)
    }

    pub fn add_symbol_ref(&mut self, sym: Option<Symbol>) -> u64 {
        match sym {
            Some(sym) => {
                let text = self.ast.resolve(sym);
                self.ids.identifiers.intern(text)
            }
            None => EMPTY_OR_BUILTIN_ID,
        }
    }

    /// Identifier ID of a base name; special names use reserved IDs.
    pub fn add_decl_base_name_ref(&mut self, name: DeclName) -> u64 {
        match name {
            DeclName::Identifier(sym) => self.add_symbol_ref(Some(sym)),
            DeclName::Subscript => SUBSCRIPT_ID,
            DeclName::Constructor => CONSTRUCTOR_ID,
            DeclName::Destructor => DESTRUCTOR_ID,
            DeclName::Anonymous => EMPTY_OR_BUILTIN_ID,
        }
    }

    pub fn add_module_ref(&mut self, module: ModuleId) -> u64 {
        if module == self.module {
            return CURRENT_MODULE_ID;
        }
        let m = self.ast.module(module);
        match m.kind {
            ModuleKind::Builtin => EMPTY_OR_BUILTIN_ID,
            ModuleKind::ForeignHeader => FOREIGN_HEADER_MODULE_ID,
            ModuleKind::Foreign => self.add_symbol_ref(Some(m.exported_name.unwrap_or(m.name))),
            ModuleKind::Source => self.add_symbol_ref(Some(m.name)),
        }
    }

    pub fn add_local_context_ref(&mut self, local: Option<LocalContextId>) -> u64 {
        let Some(local) = local else { return 0 };
        let interned = self.ids.local_contexts.intern(local);
        if interned.is_new {
            self.queues.local_contexts.push_back(local);
        }
        interned.id as u64
    }

    /// Module and file contexts are implicit and map to 0.
    pub fn add_decl_context_ref(&mut self, ctx: DeclContext) -> u64 {
        if ctx.is_module_scope() {
            return 0;
        }
        let interned = self.ids.decl_contexts.intern(ctx);
        if interned.is_new {
            self.queues.decl_contexts.push_back(ctx);
        }
        interned.id as u64
    }

    pub fn add_generic_signature_ref(&mut self, sig: Option<GenericSignatureId>) -> u64 {
        let Some(sig) = sig else { return 0 };
        let interned = self.ids.generic_signatures.intern(sig);
        if interned.is_new {
            self.queues.generic_signatures.push_back(sig);
        }
        interned.id as u64
    }

    pub fn add_generic_environment_ref(&mut self, env: Option<GenericEnvironmentId>) -> u64 {
        let Some(env) = env else { return 0 };
        let interned = self.ids.generic_environments.intern(env);
        if interned.is_new {
            self.queues.generic_environments.push_back(env);
        }
        interned.id as u64
    }

    /// ID of a normal conformance declared in this module. Other
    /// conformances are written inline where they are used.
    pub fn add_conformance_ref(&mut self, conformance: ConformanceId) -> u64 {
        let interned = self.ids.conformances.intern(conformance);
        if interned.is_new {
            self.queues.conformances.push_back(conformance);
        }
        interned.id as u64
    }

    pub fn add_body_layout_ref(&mut self, layout: BodyLayoutId) -> u64 {
        let interned = self.ids.body_layouts.intern(layout);
        if interned.is_new {
            self.queues.body_layouts.push_back(layout);
        }
        interned.id as u64
    }

    pub fn add_function_ref(&mut self, function: FunctionId) -> u64 {
        let interned = self.ids.functions.intern(function);
        if interned.is_new {
            self.queues.functions.push_back(function);
        }
        interned.id as u64
    }

    /// Write queued content until every queue is empty.
    pub fn drain(&mut self) -> Result<()> {
        let mut round = 0u32;
        while !self.queues.is_drained() {
            round += 1;
            debug!(round, pending = self.queues.pending(), "drain round");

            while let Some(next) = self.queues.decls_and_types.pop_front() {
                match next {
                    DeclOrType::Decl(decl) => self.write_decl(decl)?,
                    DeclOrType::Type(ty) => self.write_type(ty)?,
                }
            }
            while let Some(local) = self.queues.local_contexts.pop_front() {
                self.write_local_context(local)?;
            }
            while let Some(ctx) = self.queues.decl_contexts.pop_front() {
                self.write_decl_context(ctx)?;
            }
            while let Some(sig) = self.queues.generic_signatures.pop_front() {
                self.write_generic_signature(sig)?;
            }
            while let Some(env) = self.queues.generic_environments.pop_front() {
                self.write_generic_environment(env)?;
            }
            while let Some(conformance) = self.queues.conformances.pop_front() {
                self.write_normal_conformance(conformance)?;
            }
            while let Some(layout) = self.queues.body_layouts.pop_front() {
                self.write_body_layout(layout)?;
            }
        }
        debug!(
            rounds = round,
            decls = self.offsets.decls.len(),
            types = self.offsets.types.len(),
            "declarations drained"
        );
        Ok(())
    }

    pub(crate) fn trace_record(&self, what: &'static str, id: u32) {
        trace!(what, id, bit = self.out.position(), "write");
    }
}
