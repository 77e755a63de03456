use tessera_bytecode::format::records::decls;
use tessera_core::ast::{
    Conformance, ConformanceId, ConformanceRef, DeclContext, NormalConformance, Substitution,
};

use crate::Serializer;
use crate::error::Result;
use crate::invariants::missing;

impl Serializer<'_> {
    /// Conformances declared on a nominal type or extension, inline.
    pub(crate) fn write_local_conformances(&mut self, conformances: &[ConformanceId]) -> Result<()> {
        for &conformance in conformances {
            self.write_conformance_ref(ConformanceRef::Concrete(conformance))?;
        }
        Ok(())
    }

    /// Inline reference to a conformance.
    ///
    /// Only normal conformances owned by this module are written once and
    /// referenced by ID; all others are spelled out at each use.
    pub(crate) fn write_conformance_ref(&mut self, conformance: ConformanceRef) -> Result<()> {
        let id = match conformance {
            ConformanceRef::Abstract(protocol) => {
                let protocol = self.add_decl_ref(Some(protocol), false);
                return self
                    .out
                    .record(decls::ABSTRACT_PROTOCOL_CONFORMANCE, &[protocol]);
            }
            ConformanceRef::Concrete(id) => id,
        };

        let ast = self.ast;
        match ast.conformance(id) {
            Conformance::Normal(normal) => {
                if self.is_conformance_local(normal) {
                    let conformance_id = self.add_conformance_ref(id);
                    return self
                        .out
                        .record(decls::NORMAL_PROTOCOL_CONFORMANCE_ID, &[conformance_id]);
                }
                let nominal = ast.nominal_of_type(normal.conforming_type);
                let fields = [
                    self.add_decl_ref(Some(normal.protocol), false),
                    self.add_decl_ref(nominal, false),
                    self.add_module_ref(ast.module_of_context(normal.context)),
                ];
                self.out.record(decls::PROTOCOL_CONFORMANCE_XREF, &fields)
            }
            Conformance::Specialized {
                conforming_type,
                generic,
                substitutions,
            } => {
                let fields = [
                    self.add_type_ref(Some(*conforming_type)),
                    substitutions.len() as u64,
                ];
                self.out
                    .record(decls::SPECIALIZED_PROTOCOL_CONFORMANCE, &fields)?;
                self.write_substitutions(substitutions)?;
                self.write_conformance_ref(ConformanceRef::Concrete(*generic))
            }
            Conformance::Inherited {
                conforming_type,
                inherited,
            } => {
                let ty = self.add_type_ref(Some(*conforming_type));
                self.out
                    .record(decls::INHERITED_PROTOCOL_CONFORMANCE, &[ty])?;
                self.write_conformance_ref(ConformanceRef::Concrete(*inherited))
            }
        }
    }

    /// Each substitution is followed by its conformances.
    pub(crate) fn write_substitutions(&mut self, substitutions: &[Substitution]) -> Result<()> {
        for sub in substitutions {
            let fields = [
                self.add_type_ref(Some(sub.replacement)),
                sub.conformances.len() as u64,
            ];
            self.out.record(decls::SUBSTITUTION, &fields)?;
            for &conformance in &sub.conformances {
                self.write_conformance_ref(conformance)?;
            }
        }
        Ok(())
    }

    /// A normal conformance is local when its declaring context is serialized
    /// here rather than cross-referenced.
    pub(crate) fn is_conformance_local(&self, normal: &NormalConformance) -> bool {
        match normal.context {
            DeclContext::Decl(decl) => !self.is_decl_xref(decl),
            ctx => self.ast.module_of_context(ctx) == self.module,
        }
    }

    pub(crate) fn write_normal_conformance(&mut self, id: ConformanceId) -> Result<()> {
        let conformance_id = self
            .ids
            .conformances
            .get(id)
            .ok_or_else(|| missing(format!("ID for conformance {}", id.as_u32())))?;
        self.offsets
            .conformances
            .record(conformance_id, self.out.position())?;
        self.trace_record("conformance", conformance_id);

        let ast = self.ast;
        let Conformance::Normal(normal) = ast.conformance(id) else {
            return Err(missing(format!(
                "normal conformance {} (queued conformance is not normal)",
                id.as_u32()
            )));
        };

        let mut fields = vec![
            self.add_decl_ref(Some(normal.protocol), false),
            self.add_decl_context_ref(normal.context),
            normal.value_witnesses.len() as u64,
            normal.type_witnesses.len() as u64,
            normal.signature_conformances.len() as u64,
        ];
        for witness in &normal.value_witnesses {
            fields.push(self.add_decl_ref(Some(witness.requirement), false));
            fields.push(self.add_decl_ref(witness.witness, false));
            fields.push(witness.substitutions.len() as u64);
        }
        for witness in &normal.type_witnesses {
            fields.push(self.add_decl_ref(Some(witness.assoc), false));
            fields.push(self.add_type_ref(Some(witness.ty)));
            fields.push(self.add_decl_ref(witness.type_decl, false));
        }
        self.out
            .record(decls::NORMAL_PROTOCOL_CONFORMANCE, &fields)?;

        for &conformance in &normal.signature_conformances {
            self.write_conformance_ref(conformance)?;
        }
        for witness in &normal.value_witnesses {
            self.write_substitutions(&witness.substitutions)?;
        }
        Ok(())
    }
}
