use tessera_bytecode::format::records::decls;
use tessera_core::ast::{OptionalTypeKind, TypeId, TypeKind};

use crate::Serializer;
use crate::error::{Result, SerializeError};
use crate::invariants::missing;
use crate::wire;

impl Serializer<'_> {
    pub(crate) fn write_type(&mut self, id: TypeId) -> Result<()> {
        let type_id = self
            .ids
            .types
            .get(id)
            .ok_or_else(|| missing(format!("ID for type {}", id.as_u32())))?;
        self.offsets.types.record(type_id, self.out.position())?;
        self.trace_record("type", type_id);

        let ast = self.ast;
        let kind = ast.ty(id);
        match kind {
            TypeKind::Builtin { name } => {
                let name = self.add_symbol_ref(Some(*name));
                self.out.record(decls::BUILTIN_TYPE, &[name])
            }
            TypeKind::Nominal { decl, parent } => {
                let fields = [self.add_decl_ref(Some(*decl), false), self.add_type_ref(*parent)];
                self.out.record(decls::NOMINAL_TYPE, &fields)
            }
            TypeKind::BoundGeneric { decl, parent, args } => {
                let mut fields = vec![
                    self.add_decl_ref(Some(*decl), false),
                    self.add_type_ref(*parent),
                ];
                for &arg in args {
                    fields.push(self.add_type_ref(Some(arg)));
                }
                self.out.record(decls::BOUND_GENERIC_TYPE, &fields)
            }
            TypeKind::NameAlias { decl } => {
                let decl = self.add_decl_ref(Some(*decl), false);
                self.out.record(decls::NAME_ALIAS_TYPE, &[decl])
            }
            TypeKind::Paren { underlying } => {
                let ty = self.add_type_ref(Some(*underlying));
                self.out.record(decls::PAREN_TYPE, &[ty])
            }
            TypeKind::Tuple { elements } => {
                self.out.record(decls::TUPLE_TYPE, &[])?;
                for elt in elements {
                    let fields = [
                        self.add_symbol_ref(elt.name),
                        self.add_type_ref(Some(elt.ty)),
                        elt.variadic as u64,
                    ];
                    self.out.record(decls::TUPLE_TYPE_ELT, &fields)?;
                }
                Ok(())
            }
            TypeKind::Function {
                input,
                result,
                flags,
            } => {
                let fields = [
                    self.add_type_ref(Some(*input)),
                    self.add_type_ref(Some(*result)),
                    wire::function_representation(flags.representation),
                    flags.autoclosure as u64,
                    flags.noescape as u64,
                    flags.throws as u64,
                ];
                self.out.record(decls::FUNCTION_TYPE, &fields)
            }
            TypeKind::GenericFunction {
                input,
                result,
                flags,
                signature,
            } => {
                let fields = [
                    self.add_type_ref(Some(*input)),
                    self.add_type_ref(Some(*result)),
                    wire::function_representation(flags.representation),
                    flags.throws as u64,
                    self.add_generic_signature_ref(Some(*signature)),
                ];
                self.out.record(decls::GENERIC_FUNCTION_TYPE, &fields)
            }
            TypeKind::GenericParam { depth, index, decl } => {
                let fields = [
                    self.add_decl_ref(*decl, false),
                    *depth as u64,
                    *index as u64,
                ];
                self.out.record(decls::GENERIC_TYPE_PARAM_TYPE, &fields)
            }
            TypeKind::DependentMember { base, assoc } => {
                let fields = [
                    self.add_type_ref(Some(*base)),
                    self.add_decl_ref(Some(*assoc), false),
                ];
                self.out.record(decls::DEPENDENT_MEMBER_TYPE, &fields)
            }
            TypeKind::Archetype { interface, env } => {
                let fields = [
                    self.add_type_ref(Some(*interface)),
                    self.add_generic_environment_ref(Some(*env)),
                ];
                self.out.record(decls::ARCHETYPE_TYPE, &fields)
            }
            TypeKind::Metatype {
                instance,
                representation,
            } => {
                let fields = [
                    self.add_type_ref(Some(*instance)),
                    wire::metatype_representation(*representation),
                ];
                self.out.record(decls::METATYPE_TYPE, &fields)
            }
            TypeKind::ExistentialMetatype {
                instance,
                representation,
            } => {
                let fields = [
                    self.add_type_ref(Some(*instance)),
                    wire::metatype_representation(*representation),
                ];
                self.out.record(decls::EXISTENTIAL_METATYPE_TYPE, &fields)
            }
            TypeKind::ProtocolComposition {
                members,
                has_any_object,
            } => {
                let mut fields = vec![*has_any_object as u64];
                for &member in members {
                    fields.push(self.add_type_ref(Some(member)));
                }
                self.out.record(decls::PROTOCOL_COMPOSITION_TYPE, &fields)
            }
            TypeKind::ReferenceStorage { ownership, referent } => {
                let fields = [
                    wire::ownership(*ownership),
                    self.add_type_ref(Some(*referent)),
                ];
                self.out.record(decls::REFERENCE_STORAGE_TYPE, &fields)
            }
            TypeKind::InOut { object } => {
                let ty = self.add_type_ref(Some(*object));
                self.out.record(decls::INOUT_TYPE, &[ty])
            }
            TypeKind::Optional {
                base,
                implicitly_unwrapped,
            } => {
                let sugar = if *implicitly_unwrapped {
                    OptionalTypeKind::ImplicitlyUnwrapped
                } else {
                    OptionalTypeKind::Optional
                };
                let fields = [
                    self.add_type_ref(Some(*base)),
                    wire::optional_type_kind(sugar),
                ];
                self.out.record(decls::OPTIONAL_TYPE, &fields)
            }
            TypeKind::ArraySlice { base } => {
                let ty = self.add_type_ref(Some(*base));
                self.out.record(decls::ARRAY_SLICE_TYPE, &[ty])
            }
            TypeKind::Dictionary { key, value } => {
                let fields = [
                    self.add_type_ref(Some(*key)),
                    self.add_type_ref(Some(*value)),
                ];
                self.out.record(decls::DICTIONARY_TYPE, &fields)
            }
            TypeKind::DynamicSelf { self_type } => {
                let ty = self.add_type_ref(Some(*self_type));
                self.out.record(decls::DYNAMIC_SELF_TYPE, &[ty])
            }
            TypeKind::LayoutBox {
                layout,
                substitutions,
            } => {
                let fields = [
                    self.add_body_layout_ref(*layout),
                    substitutions.len() as u64,
                ];
                self.out.record(decls::LAYOUT_BOX_TYPE, &fields)?;
                self.write_substitutions(substitutions)
            }
            TypeKind::Error => Err(SerializeError::UnserializableType {
                kind: kind.name(),
                ty: id.as_u32(),
            }),
        }
    }
}
