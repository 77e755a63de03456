use tessera_bytecode::format::records::decls;
use tessera_core::ast::{DeclContext, LocalContext, LocalContextId};

use crate::Serializer;
use crate::error::Result;
use crate::invariants::missing;

impl Serializer<'_> {
    pub(crate) fn write_local_context(&mut self, id: LocalContextId) -> Result<()> {
        let local_id = self
            .ids
            .local_contexts
            .get(id)
            .ok_or_else(|| missing(format!("ID for local context {}", id.as_u32())))?;
        self.offsets
            .local_contexts
            .record(local_id, self.out.position())?;
        self.trace_record("local context", local_id);

        match *self.ast.local_context(id) {
            LocalContext::Closure {
                ty,
                implicit,
                discriminator,
                parent,
            } => {
                let fields = [
                    self.add_type_ref(Some(ty)),
                    implicit as u64,
                    discriminator as u64,
                    self.add_decl_context_ref(parent),
                ];
                self.out
                    .record(decls::ABSTRACT_CLOSURE_EXPR_CONTEXT, &fields)
            }
            LocalContext::PatternBindingInitializer { binding, index } => {
                let fields = [self.add_decl_ref(Some(binding), false), index as u64];
                self.out
                    .record(decls::PATTERN_BINDING_INITIALIZER_CONTEXT, &fields)
            }
            LocalContext::DefaultArgumentInitializer { parent, index } => {
                let fields = [self.add_decl_context_ref(parent), index as u64];
                self.out
                    .record(decls::DEFAULT_ARGUMENT_INITIALIZER_CONTEXT, &fields)
            }
            LocalContext::TopLevelCode { parent } => {
                let parent = self.add_decl_context_ref(parent);
                self.out
                    .record(decls::TOP_LEVEL_CODE_DECL_CONTEXT, &[parent])
            }
        }
    }

    /// A decl context record points either at a declaration or at a local
    /// context, never at module scope.
    pub(crate) fn write_decl_context(&mut self, ctx: DeclContext) -> Result<()> {
        let ctx_id = self
            .ids
            .decl_contexts
            .get(ctx)
            .ok_or_else(|| missing(format!("ID for decl context {ctx:?}")))?;
        self.offsets
            .decl_contexts
            .record(ctx_id, self.out.position())?;
        self.trace_record("decl context", ctx_id);

        let fields = match ctx {
            DeclContext::Decl(decl) => [self.add_decl_ref(Some(decl), false), 1],
            DeclContext::Local(local) => [self.add_local_context_ref(Some(local)), 0],
            DeclContext::Module(_) | DeclContext::File(_) => {
                return Err(missing(format!("record for module-scope context {ctx:?}")));
            }
        };
        self.out.record(decls::DECL_CONTEXT, &fields)
    }
}
