//! Cross-references to declarations owned by other modules or files.
//!
//! A cross-reference is an `XREF` header naming the owning module and the
//! number of path pieces, followed by the pieces from outermost to
//! innermost. The reader resolves the path by lookup in that module.

use tessera_bytecode::format::records::decls;
use tessera_core::ast::{Decl, DeclContext, DeclId, DeclKind, OptionalTypeKind};

use crate::Serializer;
use crate::error::{Result, SerializeError};
use crate::invariants::unaddressable;
use crate::wire;

fn is_failable(decl: &Decl) -> bool {
    matches!(
        decl.kind,
        DeclKind::Constructor { failability, .. } if failability != OptionalTypeKind::None
    )
}

impl Serializer<'_> {
    /// Whether `decl` is written as a cross-reference instead of in full.
    ///
    /// Declarations attributed to another module always are. With a primary
    /// file set, declarations from sibling files are too unless something
    /// forced them in.
    pub(crate) fn is_decl_xref(&self, decl: DeclId) -> bool {
        let ast = self.ast;
        let d = ast.decl(decl);
        if matches!(d.kind, DeclKind::GenericTypeParam { .. }) && d.context.is_module_scope() {
            return false;
        }
        if self.bridge.attributed_module(ast, decl) != self.module {
            return true;
        }
        let Some(primary) = self.options.primary_file.as_deref() else {
            return false;
        };
        let in_primary = ast
            .file_of_decl(decl)
            .is_some_and(|file| ast.file(file).name == primary);
        !in_primary && !self.ids.decls.is_forced(decl)
    }

    pub(crate) fn write_xref(&mut self, id: DeclId) -> Result<()> {
        let ast = self.ast;
        let decl = ast.decl(id);
        match decl.kind {
            DeclKind::Operator { fixity, .. } => {
                let module = self.add_module_ref(self.bridge.attributed_module(ast, id));
                self.out.record(decls::XREF, &[module, 1])?;
                let fields = [
                    self.add_decl_base_name_ref(decl.name),
                    wire::operator_fixity(fixity),
                ];
                self.out
                    .record(decls::XREF_OPERATOR_OR_ACCESSOR_PATH_PIECE, &fields)
            }
            DeclKind::PrecedenceGroup { .. } => {
                let module = self.add_module_ref(self.bridge.attributed_module(ast, id));
                self.out.record(decls::XREF, &[module, 1])?;
                let fields = [
                    self.add_decl_base_name_ref(decl.name),
                    wire::precedence_group_kind(),
                ];
                self.out
                    .record(decls::XREF_OPERATOR_OR_ACCESSOR_PATH_PIECE, &fields)
            }
            DeclKind::Extension { .. } => self.write_xref_context(DeclContext::Decl(id), 0, id),
            _ => self.write_xref_path(id, 0),
        }
    }

    /// Write the header and outer pieces, then `decl`'s own pieces.
    /// `after` counts the pieces that follow.
    fn write_xref_path(&mut self, id: DeclId, after: u64) -> Result<()> {
        let ast = self.ast;
        let decl = ast.decl(id);
        if !matches!(decl.kind, DeclKind::GenericTypeParam { .. })
            && ast.is_local_context(decl.context)
        {
            return Err(SerializeError::XrefOfLocalDecl { decl: id.as_u32() });
        }
        let own = match decl.kind {
            DeclKind::Accessor { .. } | DeclKind::Func { operator: Some(_), .. } => 2,
            _ => 1,
        };
        // A generic parameter is addressed through the declaration that owns its list.
        let context = match decl.kind {
            DeclKind::GenericTypeParam {
                list: Some(list), ..
            } => self
                .generic_param_owner(list)
                .map_or(decl.context, DeclContext::Decl),
            _ => decl.context,
        };
        self.write_xref_context(context, after + own, id)?;

        match &decl.kind {
            DeclKind::GenericTypeParam { index, .. } => self
                .out
                .record(decls::XREF_GENERIC_PARAM_PATH_PIECE, &[*index as u64]),
            DeclKind::Struct(_)
            | DeclKind::Enum { .. }
            | DeclKind::Class { .. }
            | DeclKind::Protocol { .. }
            | DeclKind::TypeAlias { .. }
            | DeclKind::AssociatedType { .. } => {
                let name = self.xref_name(id);
                let discriminator = if decl.access.is_above_file_private() {
                    0
                } else {
                    self.add_symbol_ref(decl.private_discriminator)
                };
                let fields = [name, discriminator, self.in_protocol_extension(decl) as u64];
                self.out.record(decls::XREF_TYPE_PATH_PIECE, &fields)
            }
            DeclKind::Constructor { init_kind, .. } => {
                let fields = [
                    self.add_type_ref(decl.kind.interface_type()),
                    self.in_protocol_extension(decl) as u64,
                    is_failable(decl) as u64,
                    wire::ctor_initializer_kind(*init_kind),
                ];
                self.out.record(decls::XREF_INITIALIZER_PATH_PIECE, &fields)
            }
            DeclKind::Accessor {
                accessor_kind,
                storage,
                ..
            } => {
                self.write_value_piece(*storage)?;
                let fields = [0, wire::accessor_kind(*accessor_kind)];
                self.out
                    .record(decls::XREF_OPERATOR_OR_ACCESSOR_PATH_PIECE, &fields)
            }
            DeclKind::Func {
                operator: Some(op), ..
            } => {
                self.write_value_piece(id)?;
                let DeclKind::Operator { fixity, .. } = ast.decl(*op).kind else {
                    return Err(unaddressable(id, decl.kind.name(), "operator is not an operator"));
                };
                let fields = [
                    self.add_decl_base_name_ref(decl.name),
                    wire::operator_fixity(fixity),
                ];
                self.out
                    .record(decls::XREF_OPERATOR_OR_ACCESSOR_PATH_PIECE, &fields)
            }
            DeclKind::Func { .. }
            | DeclKind::Var { .. }
            | DeclKind::Subscript { .. }
            | DeclKind::EnumElement { .. }
            | DeclKind::Destructor { .. } => self.write_value_piece(id),
            _ => Err(unaddressable(
                id,
                decl.kind.name(),
                "only named types and values have paths",
            )),
        }
    }

    /// Header plus the pieces of `ctx`, for a path with `after` more pieces.
    /// `owner` is the declaration directly inside `ctx`.
    fn write_xref_context(&mut self, ctx: DeclContext, after: u64, owner: DeclId) -> Result<()> {
        let ast = self.ast;
        match ctx {
            DeclContext::Module(_) | DeclContext::File(_) => {
                let module = self.add_module_ref(self.bridge.attributed_module(ast, owner));
                self.out.record(decls::XREF, &[module, after])
            }
            DeclContext::Local(_) => Err(SerializeError::XrefOfLocalDecl {
                decl: owner.as_u32(),
            }),
            DeclContext::Decl(parent) => {
                let DeclKind::Extension { extended_type, .. } = ast.decl(parent).kind else {
                    return self.write_xref_path(parent, after);
                };
                let nominal = ast.nominal_of_type(extended_type).ok_or_else(|| {
                    unaddressable(parent, "extension", "extended type is not nominal")
                })?;
                self.write_xref_path(nominal, after + 1)?;

                let ext_sig = ast
                    .decl(parent)
                    .generic_env
                    .map(|env| ast.generic_environment(env).signature);
                let nominal_sig = ast
                    .decl(nominal)
                    .generic_env
                    .map(|env| ast.generic_environment(env).signature);
                let constraint = if ext_sig != nominal_sig { ext_sig } else { None };
                let fields = [
                    self.add_module_ref(ast.module_of_decl(parent)),
                    self.add_generic_signature_ref(constraint),
                ];
                self.out.record(decls::XREF_EXTENSION_PATH_PIECE, &fields)
            }
        }
    }

    fn write_value_piece(&mut self, id: DeclId) -> Result<()> {
        let ast = self.ast;
        let decl = ast.decl(id);
        let fields = [
            self.add_type_ref(decl.kind.interface_type()),
            self.xref_name(id),
            self.in_protocol_extension(decl) as u64,
            decl.attrs.is_static as u64,
        ];
        self.out.record(decls::XREF_VALUE_PATH_PIECE, &fields)
    }

    /// Bridged stable name if there is one, else the declared base name.
    fn xref_name(&mut self, id: DeclId) -> u64 {
        let ast = self.ast;
        match self.bridge.stable_name(ast, id) {
            Some(name) => self.add_identifier_ref(&name),
            None => self.add_decl_base_name_ref(ast.decl(id).name),
        }
    }

    fn in_protocol_extension(&self, decl: &Decl) -> bool {
        let ast = self.ast;
        let DeclContext::Decl(parent) = decl.context else {
            return false;
        };
        let DeclKind::Extension { extended_type, .. } = ast.decl(parent).kind else {
            return false;
        };
        ast.nominal_of_type(extended_type)
            .is_some_and(|n| matches!(ast.decl(n).kind, DeclKind::Protocol { .. }))
    }
}
