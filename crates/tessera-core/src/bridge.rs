//! Attribution of declarations that came from the foreign-declaration importer.
//!
//! The serializer never inspects foreign declarations itself. It asks a
//! [`ForeignBridge`] which module a foreign declaration belongs to and under
//! which name it should be addressed, then cross-references it like any
//! native declaration.

use std::collections::HashMap;

use crate::ast::{AstContext, DeclId, ModuleId};

pub trait ForeignBridge {
    /// Module that cross-references to `decl` are addressed through.
    fn attributed_module(&self, ctx: &AstContext, decl: DeclId) -> ModuleId;

    /// Name used in cross-reference paths, if it differs from the declared one.
    fn stable_name(&self, ctx: &AstContext, decl: DeclId) -> Option<String>;
}

/// Treats foreign declarations exactly like native ones.
#[derive(Clone, Copy, Debug, Default)]
pub struct NativeBridge;

impl ForeignBridge for NativeBridge {
    fn attributed_module(&self, ctx: &AstContext, decl: DeclId) -> ModuleId {
        ctx.module_of_decl(decl)
    }

    fn stable_name(&self, _ctx: &AstContext, _decl: DeclId) -> Option<String> {
        None
    }
}

/// Re-attributes foreign declarations to the native module that overlays
/// their importer module, and optionally renames them.
#[derive(Clone, Debug, Default)]
pub struct OverlayBridge {
    overlays: HashMap<ModuleId, ModuleId>,
    renames: HashMap<DeclId, String>,
}

impl OverlayBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attribute declarations owned by `foreign` to `overlay`.
    pub fn overlay(mut self, foreign: ModuleId, overlay: ModuleId) -> Self {
        self.overlays.insert(foreign, overlay);
        self
    }

    pub fn rename(mut self, decl: DeclId, name: impl Into<String>) -> Self {
        self.renames.insert(decl, name.into());
        self
    }
}

impl ForeignBridge for OverlayBridge {
    fn attributed_module(&self, ctx: &AstContext, decl: DeclId) -> ModuleId {
        let owner = ctx.module_of_decl(decl);
        self.overlays.get(&owner).copied().unwrap_or(owner)
    }

    fn stable_name(&self, _ctx: &AstContext, decl: DeclId) -> Option<String> {
        self.renames.get(&decl).cloned()
    }
}
