use tessera_bytecode::format::layouts::MUTABLE_FIELD_FLAG;
use tessera_bytecode::format::records::decls;
use tessera_core::ast::{BodyLayoutId, GenericEnvironmentId, GenericSignatureId, Requirement};

use crate::Serializer;
use crate::error::Result;
use crate::invariants::missing;
use crate::wire;

impl Serializer<'_> {
    pub(crate) fn write_generic_signature(&mut self, id: GenericSignatureId) -> Result<()> {
        let sig_id = self
            .ids
            .generic_signatures
            .get(id)
            .ok_or_else(|| missing(format!("ID for generic signature {}", id.as_u32())))?;
        self.offsets
            .generic_signatures
            .record(sig_id, self.out.position())?;
        self.trace_record("generic signature", sig_id);

        let ast = self.ast;
        let sig = ast.generic_signature(id);
        let params: Vec<u64> = sig
            .params
            .iter()
            .map(|&ty| self.add_type_ref(Some(ty)))
            .collect();
        self.out.record(decls::GENERIC_SIGNATURE, &params)?;
        self.write_requirements(&sig.requirements)
    }

    /// Environments whose parameters all have declarations are rebuilt from
    /// their signature by the reader and cost no record. The rest spell out
    /// each parameter's name and type.
    pub(crate) fn write_generic_environment(&mut self, id: GenericEnvironmentId) -> Result<()> {
        let env_id = self
            .ids
            .generic_environments
            .get(id)
            .ok_or_else(|| missing(format!("ID for generic environment {}", id.as_u32())))?;

        let ast = self.ast;
        let env = ast.generic_environment(id);
        if env.params.iter().all(|param| param.decl.is_some()) {
            let sig_id = self.add_generic_signature_ref(Some(env.signature));
            return self
                .offsets
                .generic_environments
                .record(env_id, (sig_id << 1) | 1);
        }

        let position = self.out.position();
        self.offsets
            .generic_environments
            .record(env_id, position << 1)?;
        self.trace_record("generic environment", env_id);

        let mut pairs = Vec::with_capacity(env.params.len() * 2);
        for param in &env.params {
            pairs.push(self.add_symbol_ref(Some(param.name)));
            pairs.push(self.add_type_ref(Some(param.ty)));
        }
        self.out.record(decls::SIL_GENERIC_ENVIRONMENT, &pairs)?;
        let requirements = &ast.generic_signature(env.signature).requirements;
        self.write_requirements(requirements)
    }

    pub(crate) fn write_requirements(&mut self, requirements: &[Requirement]) -> Result<()> {
        for req in requirements {
            let kind = wire::requirement_kind(req);
            match *req {
                Requirement::Conformance { subject, protocol } => {
                    let fields = [
                        kind,
                        self.add_type_ref(Some(subject)),
                        self.add_type_ref(Some(protocol)),
                    ];
                    self.out.record(decls::GENERIC_REQUIREMENT, &fields)?;
                }
                Requirement::Superclass {
                    subject,
                    constraint,
                } => {
                    let fields = [
                        kind,
                        self.add_type_ref(Some(subject)),
                        self.add_type_ref(Some(constraint)),
                    ];
                    self.out.record(decls::GENERIC_REQUIREMENT, &fields)?;
                }
                Requirement::SameType { first, second } => {
                    let fields = [
                        kind,
                        self.add_type_ref(Some(first)),
                        self.add_type_ref(Some(second)),
                    ];
                    self.out.record(decls::GENERIC_REQUIREMENT, &fields)?;
                }
                Requirement::Layout { subject, layout } => {
                    let fields = [
                        wire::layout_constraint_kind(layout.kind),
                        self.add_type_ref(Some(subject)),
                        layout.size as u64,
                        layout.alignment as u64,
                    ];
                    self.out.record(decls::LAYOUT_REQUIREMENT, &fields)?;
                }
            }
        }
        Ok(())
    }

    pub(crate) fn write_body_layout(&mut self, id: BodyLayoutId) -> Result<()> {
        let layout_id = self
            .ids
            .body_layouts
            .get(id)
            .ok_or_else(|| missing(format!("ID for body layout {}", id.as_u32())))?;
        self.offsets
            .body_layouts
            .record(layout_id, self.out.position())?;
        self.trace_record("body layout", layout_id);

        let ast = self.ast;
        let layout = ast.body_layout(id);
        let mut fields = vec![self.add_generic_signature_ref(layout.signature)];
        for field in &layout.fields {
            let mut ty = self.add_type_ref(Some(field.ty));
            if field.mutable {
                ty |= MUTABLE_FIELD_FLAG;
            }
            fields.push(ty);
        }
        self.out.record(decls::SIL_LAYOUT, &fields)
    }
}
