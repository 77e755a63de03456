//! Loading an entity graph from its JSON description.
//!
//! The JSON form is the serde representation of [`AstContext`]: one array per
//! arena, handles as plain indices. After parsing, every handle is checked
//! against the arena it points into, so later stages can index freely.

use crate::ast::{
    AstContext, Conformance, ConformanceRef, DeclContext, DeclKind, Instruction, LocalContext,
    Requirement, TypeKind,
};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("invalid AST JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{owner} refers to {kind} {index}, but only {len} exist")]
    DanglingHandle {
        owner: String,
        kind: &'static str,
        index: u32,
        len: usize,
    },

    #[error("symbol {0} is not in the name table")]
    UnknownSymbol(u32),
}

impl AstContext {
    /// Parse and validate a JSON entity graph.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let mut ctx: AstContext = serde_json::from_str(json)?;
        ctx.reindex_types();
        ctx.validate()?;
        Ok(ctx)
    }

    #[cfg(test)]
    pub(crate) fn to_json(&self) -> Result<String, LoadError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that every handle stored in the arena points at an existing entity.
    pub fn validate(&self) -> Result<(), LoadError> {
        let check = Checker { ctx: self };

        for (index, module) in self.modules.iter().enumerate() {
            let owner = || format!("module {index}");
            check.symbol(module.name)?;
            for &file in &module.files {
                check.handle(owner, "file", file.as_u32(), self.files.len())?;
            }
            for import in &module.imports {
                check.handle(owner, "module", import.module.as_u32(), self.modules.len())?;
            }
        }

        for (index, file) in self.files.iter().enumerate() {
            let owner = || format!("file {index}");
            check.handle(owner, "module", file.module.as_u32(), self.modules.len())?;
            for &decl in file.top_level_decls.iter().chain(&file.local_types) {
                check.decl(owner, decl.as_u32())?;
            }
            if let Some(entry) = file.entry_point {
                check.decl(owner, entry.as_u32())?;
            }
        }

        for (index, decl) in self.decls.iter().enumerate() {
            let owner = || format!("{} decl {index}", decl.kind.name());
            check.context(owner, decl.context)?;
            if let Some(sym) = decl.name.identifier() {
                check.symbol(sym)?;
            }
            if let Some(list) = decl.generic_params {
                check.handle(
                    owner,
                    "generic parameter list",
                    list.as_u32(),
                    self.generic_param_lists.len(),
                )?;
            }
            if let Some(env) = decl.generic_env {
                check.handle(
                    owner,
                    "generic environment",
                    env.as_u32(),
                    self.generic_environments.len(),
                )?;
            }
            if let Some(members) = decl.kind.members() {
                for &member in members {
                    check.decl(owner, member.as_u32())?;
                }
            }
            for &conformance in decl.kind.conformances() {
                check.handle(
                    owner,
                    "conformance",
                    conformance.as_u32(),
                    self.conformances.len(),
                )?;
            }
            if let Some(ty) = decl.kind.interface_type() {
                check.ty(owner, ty.as_u32())?;
            }
            match &decl.kind {
                DeclKind::Accessor { storage, .. } => check.decl(owner, storage.as_u32())?,
                DeclKind::Extension { extended_type, .. } => {
                    check.ty(owner, extended_type.as_u32())?
                }
                DeclKind::TypeAlias { underlying, .. } => check.ty(owner, underlying.as_u32())?,
                DeclKind::Var { storage, .. } | DeclKind::Subscript { storage, .. } => {
                    for &accessor in &storage.accessors {
                        check.decl(owner, accessor.as_u32())?;
                    }
                }
                DeclKind::PatternBinding { entries, .. } => {
                    for entry in entries {
                        check.decl(owner, entry.var.as_u32())?;
                    }
                }
                _ => {}
            }
        }

        for (index, ty) in self.types.iter().enumerate() {
            let owner = || format!("{} type {index}", ty.name());
            match ty {
                TypeKind::Nominal { decl, .. }
                | TypeKind::BoundGeneric { decl, .. }
                | TypeKind::NameAlias { decl } => check.decl(owner, decl.as_u32())?,
                TypeKind::Builtin { name } => check.symbol(*name)?,
                _ => {}
            }
        }

        for (index, local) in self.local_contexts.iter().enumerate() {
            let owner = || format!("local context {index}");
            match *local {
                LocalContext::Closure { parent, .. }
                | LocalContext::DefaultArgumentInitializer { parent, .. }
                | LocalContext::TopLevelCode { parent } => check.context(owner, parent)?,
                LocalContext::PatternBindingInitializer { binding, .. } => {
                    check.decl(owner, binding.as_u32())?
                }
            }
        }

        for (index, sig) in self.generic_signatures.iter().enumerate() {
            let owner = || format!("generic signature {index}");
            for &param in &sig.params {
                check.ty(owner, param.as_u32())?;
            }
            for requirement in &sig.requirements {
                let (first, second) = match *requirement {
                    Requirement::Conformance { subject, protocol } => (subject, Some(protocol)),
                    Requirement::Superclass {
                        subject,
                        constraint,
                    } => (subject, Some(constraint)),
                    Requirement::SameType { first, second } => (first, Some(second)),
                    Requirement::Layout { subject, .. } => (subject, None),
                };
                check.ty(owner, first.as_u32())?;
                if let Some(second) = second {
                    check.ty(owner, second.as_u32())?;
                }
            }
        }

        for (index, env) in self.generic_environments.iter().enumerate() {
            let owner = || format!("generic environment {index}");
            check.handle(
                owner,
                "generic signature",
                env.signature.as_u32(),
                self.generic_signatures.len(),
            )?;
            for param in &env.params {
                check.ty(owner, param.ty.as_u32())?;
            }
        }

        for (index, conformance) in self.conformances.iter().enumerate() {
            let owner = || format!("conformance {index}");
            check.ty(owner, conformance.conforming_type().as_u32())?;
            match conformance {
                Conformance::Normal(normal) => {
                    check.decl(owner, normal.protocol.as_u32())?;
                    check.context(owner, normal.context)?;
                    for conformance in &normal.signature_conformances {
                        check.conformance_ref(owner, *conformance)?;
                    }
                }
                Conformance::Specialized { generic, .. } => {
                    check.handle(owner, "conformance", generic.as_u32(), self.conformances.len())?
                }
                Conformance::Inherited { inherited, .. } => check.handle(
                    owner,
                    "conformance",
                    inherited.as_u32(),
                    self.conformances.len(),
                )?,
            }
        }

        for (index, function) in self.functions.iter().enumerate() {
            let owner = || format!("function {index} ({})", function.name);
            check.ty(owner, function.lowered_type.as_u32())?;
            for inst in function.blocks.iter().flat_map(|b| &b.instructions) {
                if let Instruction::FunctionRef { function } = inst {
                    check.handle(owner, "function", function.as_u32(), self.functions.len())?;
                }
            }
        }

        for (index, module) in self.modules.iter().enumerate() {
            let Some(body) = &module.body else { continue };
            let owner = || format!("body of module {index}");
            for &function in &body.functions {
                check.handle(owner, "function", function.as_u32(), self.functions.len())?;
            }
            for vtable in &body.vtables {
                check.decl(owner, vtable.class.as_u32())?;
            }
            for table in &body.witness_tables {
                check.handle(
                    owner,
                    "conformance",
                    table.conformance.as_u32(),
                    self.conformances.len(),
                )?;
            }
        }

        Ok(())
    }
}

struct Checker<'a> {
    ctx: &'a AstContext,
}

impl Checker<'_> {
    fn handle(
        &self,
        owner: impl Fn() -> String,
        kind: &'static str,
        index: u32,
        len: usize,
    ) -> Result<(), LoadError> {
        if (index as usize) < len {
            return Ok(());
        }
        Err(LoadError::DanglingHandle {
            owner: owner(),
            kind,
            index,
            len,
        })
    }

    fn decl(&self, owner: impl Fn() -> String, index: u32) -> Result<(), LoadError> {
        self.handle(owner, "decl", index, self.ctx.decls.len())
    }

    fn ty(&self, owner: impl Fn() -> String, index: u32) -> Result<(), LoadError> {
        self.handle(owner, "type", index, self.ctx.types.len())
    }

    fn symbol(&self, sym: crate::Symbol) -> Result<(), LoadError> {
        match self.ctx.names.try_resolve(sym) {
            Some(_) => Ok(()),
            None => Err(LoadError::UnknownSymbol(sym.as_u32())),
        }
    }

    fn context(&self, owner: impl Fn() -> String, ctx: DeclContext) -> Result<(), LoadError> {
        match ctx {
            DeclContext::Module(m) => self.handle(owner, "module", m.as_u32(), self.ctx.modules.len()),
            DeclContext::File(f) => self.handle(owner, "file", f.as_u32(), self.ctx.files.len()),
            DeclContext::Decl(d) => self.decl(owner, d.as_u32()),
            DeclContext::Local(l) => self.handle(
                owner,
                "local context",
                l.as_u32(),
                self.ctx.local_contexts.len(),
            ),
        }
    }

    fn conformance_ref(
        &self,
        owner: impl Fn() -> String,
        conformance: ConformanceRef,
    ) -> Result<(), LoadError> {
        match conformance {
            ConformanceRef::Abstract(protocol) => self.decl(owner, protocol.as_u32()),
            ConformanceRef::Concrete(id) => {
                self.handle(owner, "conformance", id.as_u32(), self.ctx.conformances.len())
            }
        }
    }
}
