//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use crate::ast::{
    AstContext, BodyLayout, BodyLayoutId, Conformance, ConformanceId, Decl, DeclId, FileId,
    FileUnit, FunctionId, GenericEnvironment, GenericEnvironmentId, GenericParamList,
    GenericParamListId, GenericSignature, GenericSignatureId, LocalContext, LocalContextId,
    LoweredFunction, Module, ModuleId, TypeId, TypeKind,
};

macro_rules! ensure_handle {
    ($fn_name:ident, $field:ident, $id:ty, $out:ty, $what:literal) => {
        pub(crate) fn $fn_name(&self, id: $id) -> &$out {
            self.$field.get(id.index()).unwrap_or_else(|| {
                panic!(
                    concat!("AstContext: ", $what, " {} out of range (len {})"),
                    id.as_u32(),
                    self.$field.len()
                )
            })
        }
    };
}

impl AstContext {
    ensure_handle!(ensure_module, modules, ModuleId, Module, "module");
    ensure_handle!(ensure_file, files, FileId, FileUnit, "file");
    ensure_handle!(ensure_decl, decls, DeclId, Decl, "decl");
    ensure_handle!(ensure_type, types, TypeId, TypeKind, "type");
    ensure_handle!(ensure_local_context, local_contexts, LocalContextId, LocalContext, "local context");
    ensure_handle!(ensure_generic_param_list, generic_param_lists, GenericParamListId, GenericParamList, "generic parameter list");
    ensure_handle!(ensure_generic_signature, generic_signatures, GenericSignatureId, GenericSignature, "generic signature");
    ensure_handle!(ensure_generic_environment, generic_environments, GenericEnvironmentId, GenericEnvironment, "generic environment");
    ensure_handle!(ensure_conformance, conformances, ConformanceId, Conformance, "conformance");
    ensure_handle!(ensure_body_layout, body_layouts, BodyLayoutId, BodyLayout, "body layout");
    ensure_handle!(ensure_function, functions, FunctionId, LoweredFunction, "function");

    pub(crate) fn ensure_module_mut(&mut self, id: ModuleId) -> &mut Module {
        let len = self.modules.len();
        self.modules
            .get_mut(id.index())
            .unwrap_or_else(|| panic!("AstContext: module {} out of range (len {len})", id.as_u32()))
    }

    pub(crate) fn ensure_file_mut(&mut self, id: FileId) -> &mut FileUnit {
        let len = self.files.len();
        self.files
            .get_mut(id.index())
            .unwrap_or_else(|| panic!("AstContext: file {} out of range (len {len})", id.as_u32()))
    }

    pub(crate) fn ensure_decl_mut(&mut self, id: DeclId) -> &mut Decl {
        let len = self.decls.len();
        self.decls
            .get_mut(id.index())
            .unwrap_or_else(|| panic!("AstContext: decl {} out of range (len {len})", id.as_u32()))
    }

    pub(crate) fn ensure_members_mut(&mut self, parent: DeclId) -> &mut Vec<DeclId> {
        let decl = self.ensure_decl_mut(parent);
        let kind = decl.kind.name();
        decl.kind
            .members_mut()
            .unwrap_or_else(|| panic!("AstContext: {kind} {} cannot own members", parent.as_u32()))
    }
}
