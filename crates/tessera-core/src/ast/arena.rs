//! The entity arena handed to the serializer.
//!
//! `AstContext` owns every entity of every module known to one compilation,
//! the current module and the modules it references alike. Entities refer to
//! each other only through typed handles, so cycles (a type naming a
//! declaration whose members mention the type) are plain data.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{Interner, Symbol};

use super::body::{BodyLayout, LoweredFunction};
use super::conformance::Conformance;
use super::context::{DeclContext, LocalContext};
use super::decl::{Decl, DeclKind, DeclName};
use super::generics::{GenericEnvironment, GenericParamList, GenericSignature};
use super::ids::{
    BodyLayoutId, ConformanceId, DeclId, FileId, FunctionId, GenericEnvironmentId,
    GenericParamListId, GenericSignatureId, LocalContextId, ModuleId, TypeId,
};
use super::module::{FileUnit, Module};
use super::types::TypeKind;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AstContext {
    pub(crate) names: Interner,
    pub(crate) modules: Vec<Module>,
    pub(crate) files: Vec<FileUnit>,
    pub(crate) decls: Vec<Decl>,
    pub(crate) types: Vec<TypeKind>,
    #[serde(skip)]
    pub(crate) type_index: HashMap<TypeKind, TypeId>,
    pub(crate) local_contexts: Vec<LocalContext>,
    pub(crate) generic_param_lists: Vec<GenericParamList>,
    pub(crate) generic_signatures: Vec<GenericSignature>,
    pub(crate) generic_environments: Vec<GenericEnvironment>,
    pub(crate) conformances: Vec<Conformance>,
    pub(crate) body_layouts: Vec<BodyLayout>,
    pub(crate) functions: Vec<LoweredFunction>,
}

impl AstContext {
    pub fn new() -> Self {
        Self::default()
    }

    // Names

    pub fn intern(&mut self, name: &str) -> Symbol {
        self.names.intern(name)
    }

    pub fn resolve(&self, sym: Symbol) -> &str {
        self.names.resolve(sym)
    }

    pub fn names(&self) -> &Interner {
        &self.names
    }

    /// Text of an identifier name. Special and anonymous names have none.
    pub fn decl_name_str(&self, name: DeclName) -> Option<&str> {
        name.identifier().map(|sym| self.resolve(sym))
    }

    // Construction

    pub fn add_module(&mut self, module: Module) -> ModuleId {
        self.modules.push(module);
        ModuleId::new(self.modules.len() as u32 - 1)
    }

    /// Add a file unit and register it with its module.
    pub fn add_file(&mut self, file: FileUnit) -> FileId {
        let module = file.module;
        self.files.push(file);
        let id = FileId::new(self.files.len() as u32 - 1);
        self.module_mut(module).files.push(id);
        id
    }

    pub fn add_decl(&mut self, decl: Decl) -> DeclId {
        self.decls.push(decl);
        DeclId::new(self.decls.len() as u32 - 1)
    }

    /// Add a declaration at the top level of a file.
    pub fn add_top_level_decl(&mut self, file: FileId, decl: Decl) -> DeclId {
        let id = self.add_decl(decl);
        self.file_mut(file).top_level_decls.push(id);
        id
    }

    /// Add a declaration and append it to `parent`'s member list.
    ///
    /// # Panics
    /// Panics if `parent` cannot own members.
    pub fn add_member(&mut self, parent: DeclId, decl: Decl) -> DeclId {
        let id = self.add_decl(decl);
        self.ensure_members_mut(parent).push(id);
        id
    }

    /// Intern a structural type, returning the existing handle for an equal one.
    pub fn intern_type(&mut self, kind: TypeKind) -> TypeId {
        if let Some(&id) = self.type_index.get(&kind) {
            return id;
        }
        let id = TypeId::new(self.types.len() as u32);
        self.types.push(kind.clone());
        self.type_index.insert(kind, id);
        id
    }

    /// Declared type of a non-generic nominal declaration.
    pub fn nominal_type(&mut self, decl: DeclId) -> TypeId {
        self.intern_type(TypeKind::Nominal { decl, parent: None })
    }

    pub fn add_local_context(&mut self, local: LocalContext) -> LocalContextId {
        self.local_contexts.push(local);
        LocalContextId::new(self.local_contexts.len() as u32 - 1)
    }

    pub fn add_generic_param_list(&mut self, list: GenericParamList) -> GenericParamListId {
        self.generic_param_lists.push(list);
        GenericParamListId::new(self.generic_param_lists.len() as u32 - 1)
    }

    pub fn add_generic_signature(&mut self, sig: GenericSignature) -> GenericSignatureId {
        self.generic_signatures.push(sig);
        GenericSignatureId::new(self.generic_signatures.len() as u32 - 1)
    }

    pub fn add_generic_environment(&mut self, env: GenericEnvironment) -> GenericEnvironmentId {
        self.generic_environments.push(env);
        GenericEnvironmentId::new(self.generic_environments.len() as u32 - 1)
    }

    pub fn add_conformance(&mut self, conformance: Conformance) -> ConformanceId {
        self.conformances.push(conformance);
        ConformanceId::new(self.conformances.len() as u32 - 1)
    }

    pub fn add_body_layout(&mut self, layout: BodyLayout) -> BodyLayoutId {
        self.body_layouts.push(layout);
        BodyLayoutId::new(self.body_layouts.len() as u32 - 1)
    }

    pub fn add_function(&mut self, function: LoweredFunction) -> FunctionId {
        self.functions.push(function);
        FunctionId::new(self.functions.len() as u32 - 1)
    }

    // Access

    pub fn module(&self, id: ModuleId) -> &Module {
        self.ensure_module(id)
    }

    pub fn module_mut(&mut self, id: ModuleId) -> &mut Module {
        self.ensure_module_mut(id)
    }

    pub fn file(&self, id: FileId) -> &FileUnit {
        self.ensure_file(id)
    }

    pub fn file_mut(&mut self, id: FileId) -> &mut FileUnit {
        self.ensure_file_mut(id)
    }

    pub fn decl(&self, id: DeclId) -> &Decl {
        self.ensure_decl(id)
    }

    pub fn decl_mut(&mut self, id: DeclId) -> &mut Decl {
        self.ensure_decl_mut(id)
    }

    pub fn ty(&self, id: TypeId) -> &TypeKind {
        self.ensure_type(id)
    }

    pub fn local_context(&self, id: LocalContextId) -> &LocalContext {
        self.ensure_local_context(id)
    }

    pub fn generic_param_list(&self, id: GenericParamListId) -> &GenericParamList {
        self.ensure_generic_param_list(id)
    }

    pub fn generic_signature(&self, id: GenericSignatureId) -> &GenericSignature {
        self.ensure_generic_signature(id)
    }

    pub fn generic_environment(&self, id: GenericEnvironmentId) -> &GenericEnvironment {
        self.ensure_generic_environment(id)
    }

    pub fn conformance(&self, id: ConformanceId) -> &Conformance {
        self.ensure_conformance(id)
    }

    pub fn body_layout(&self, id: BodyLayoutId) -> &BodyLayout {
        self.ensure_body_layout(id)
    }

    pub fn function(&self, id: FunctionId) -> &LoweredFunction {
        self.ensure_function(id)
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    pub fn decl_count(&self) -> usize {
        self.decls.len()
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    pub fn find_module(&self, name: &str) -> Option<ModuleId> {
        let sym = self.names.get(name)?;
        self.modules
            .iter()
            .position(|m| m.name == sym)
            .map(|index| ModuleId::new(index as u32))
    }

    // Context queries

    /// Immediately enclosing context, `None` for a module.
    pub fn parent_context(&self, ctx: DeclContext) -> Option<DeclContext> {
        match ctx {
            DeclContext::Module(_) => None,
            DeclContext::File(file) => Some(DeclContext::Module(self.file(file).module)),
            DeclContext::Decl(decl) => Some(self.decl(decl).context),
            DeclContext::Local(local) => Some(match *self.local_context(local) {
                LocalContext::Closure { parent, .. }
                | LocalContext::DefaultArgumentInitializer { parent, .. }
                | LocalContext::TopLevelCode { parent } => parent,
                LocalContext::PatternBindingInitializer { binding, .. } => {
                    self.decl(binding).context
                }
            }),
        }
    }

    /// The module or file context that encloses `ctx`.
    pub fn module_scope_context(&self, mut ctx: DeclContext) -> DeclContext {
        while !ctx.is_module_scope() {
            match self.parent_context(ctx) {
                Some(parent) => ctx = parent,
                None => break,
            }
        }
        ctx
    }

    /// Module that owns `ctx`.
    pub fn module_of_context(&self, ctx: DeclContext) -> ModuleId {
        match self.module_scope_context(ctx) {
            DeclContext::Module(module) => module,
            DeclContext::File(file) => self.file(file).module,
            DeclContext::Decl(_) | DeclContext::Local(_) => {
                unreachable!("module_scope_context stops at module scope")
            }
        }
    }

    pub fn module_of_decl(&self, decl: DeclId) -> ModuleId {
        self.module_of_context(self.decl(decl).context)
    }

    /// File containing `decl`, if it is declared inside one.
    pub fn file_of_decl(&self, decl: DeclId) -> Option<FileId> {
        match self.module_scope_context(self.decl(decl).context) {
            DeclContext::File(file) => Some(file),
            _ => None,
        }
    }

    /// Whether `ctx` is, or is nested in, a body.
    pub fn is_local_context(&self, ctx: DeclContext) -> bool {
        let mut current = Some(ctx);
        while let Some(ctx) = current {
            match ctx {
                DeclContext::Module(_) | DeclContext::File(_) => return false,
                DeclContext::Local(_) => return true,
                DeclContext::Decl(decl) => {
                    if matches!(
                        self.decl(decl).kind,
                        DeclKind::Func { .. }
                            | DeclKind::Accessor { .. }
                            | DeclKind::Constructor { .. }
                            | DeclKind::Destructor { .. }
                    ) {
                        return true;
                    }
                }
            }
            current = self.parent_context(ctx);
        }
        false
    }

    /// Nominal declaration a type names, looking through aliases and parens.
    pub fn nominal_of_type(&self, ty: TypeId) -> Option<DeclId> {
        match self.ty(ty) {
            TypeKind::Nominal { decl, .. } | TypeKind::BoundGeneric { decl, .. } => Some(*decl),
            TypeKind::NameAlias { decl } => match &self.decl(*decl).kind {
                DeclKind::TypeAlias { underlying, .. } => self.nominal_of_type(*underlying),
                _ => None,
            },
            TypeKind::Paren { underlying } => self.nominal_of_type(*underlying),
            _ => None,
        }
    }

    /// Dotted path of a declaration from its module, e.g. `M.S.P`.
    ///
    /// Unnamed contexts (extensions, local contexts) contribute nothing.
    pub fn qualified_name(&self, decl: DeclId) -> String {
        let mut parts = Vec::new();
        let mut current = Some(DeclContext::Decl(decl));
        while let Some(ctx) = current {
            match ctx {
                DeclContext::Module(module) => {
                    parts.push(self.resolve(self.module(module).name).to_string());
                }
                DeclContext::Decl(d) => {
                    let decl = self.decl(d);
                    match decl.name {
                        DeclName::Identifier(sym) => parts.push(self.resolve(sym).to_string()),
                        DeclName::Subscript => parts.push("subscript".to_string()),
                        DeclName::Constructor => parts.push("init".to_string()),
                        DeclName::Destructor => parts.push("deinit".to_string()),
                        DeclName::Anonymous => {
                            if let DeclKind::Extension { extended_type, .. } = decl.kind
                                && let Some(nominal) = self.nominal_of_type(extended_type)
                            {
                                parts.push(self.qualified_name(nominal));
                                break;
                            }
                        }
                    }
                }
                DeclContext::File(_) | DeclContext::Local(_) => {}
            }
            current = self.parent_context(ctx);
        }
        parts.reverse();
        parts.join(".")
    }

    /// Rebuild the type hash-consing index after deserialization.
    pub(crate) fn reindex_types(&mut self) {
        self.type_index = self
            .types
            .iter()
            .enumerate()
            .map(|(index, kind)| (kind.clone(), TypeId::new(index as u32)))
            .collect();
    }
}
