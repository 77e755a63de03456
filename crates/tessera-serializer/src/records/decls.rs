use tessera_bytecode::format::records::decls;
use tessera_bytecode::format::{CONSTRUCTOR_KEY, DESTRUCTOR_KEY, SUBSCRIPT_KEY};
use tessera_core::ast::{
    AccessLevel, AstContext, Decl, DeclId, DeclKind, DeclName, FuncSignature, GenericParamListId,
    OperatorFixity,
};

use crate::Serializer;
use crate::error::{Result, SerializeError};
use crate::invariants::{ensure_member_serializable, missing};
use crate::wire;

fn flag(value: bool) -> u64 {
    value as u64
}

/// Record code that identifies a declaration's kind in lookup tables.
pub(crate) fn decl_record_code(kind: &DeclKind) -> Option<u32> {
    let code = match kind {
        DeclKind::TypeAlias { .. } => decls::TYPE_ALIAS_DECL,
        DeclKind::GenericTypeParam { .. } => decls::GENERIC_TYPE_PARAM_DECL,
        DeclKind::AssociatedType { .. } => decls::ASSOCIATED_TYPE_DECL,
        DeclKind::Struct(_) => decls::STRUCT_DECL,
        DeclKind::Enum { .. } => decls::ENUM_DECL,
        DeclKind::Class { .. } => decls::CLASS_DECL,
        DeclKind::Protocol { .. } => decls::PROTOCOL_DECL,
        DeclKind::Extension { .. } => decls::EXTENSION_DECL,
        DeclKind::Func { .. } => decls::FUNC_DECL,
        DeclKind::Accessor { .. } => decls::ACCESSOR_DECL,
        DeclKind::Constructor { .. } => decls::CONSTRUCTOR_DECL,
        DeclKind::Destructor { .. } => decls::DESTRUCTOR_DECL,
        DeclKind::Var { .. } => decls::VAR_DECL,
        DeclKind::Param { .. } => decls::PARAM_DECL,
        DeclKind::Subscript { .. } => decls::SUBSCRIPT_DECL,
        DeclKind::EnumElement { .. } => decls::ENUM_ELEMENT_DECL,
        DeclKind::Operator { fixity, .. } => match fixity {
            OperatorFixity::Infix => decls::INFIX_OPERATOR_DECL,
            OperatorFixity::Prefix => decls::PREFIX_OPERATOR_DECL,
            OperatorFixity::Postfix => decls::POSTFIX_OPERATOR_DECL,
        },
        DeclKind::PrecedenceGroup { .. } => decls::PRECEDENCE_GROUP_DECL,
        DeclKind::PatternBinding { .. } => decls::PATTERN_BINDING_DECL,
        DeclKind::Import
        | DeclKind::TopLevelCode
        | DeclKind::IfConfig
        | DeclKind::EnumCase
        | DeclKind::Module => return None,
    };
    Some(code)
}

/// Key of a member in the per-name member tables.
pub(crate) fn member_table_key(ast: &AstContext, name: DeclName) -> Option<String> {
    match name {
        DeclName::Identifier(sym) => Some(ast.resolve(sym).to_string()),
        DeclName::Subscript => Some(SUBSCRIPT_KEY.to_string()),
        DeclName::Constructor => Some(CONSTRUCTOR_KEY.to_string()),
        DeclName::Destructor => Some(DESTRUCTOR_KEY.to_string()),
        DeclName::Anonymous => None,
    }
}

impl Serializer<'_> {
    pub(crate) fn write_decl(&mut self, id: DeclId) -> Result<()> {
        let decl_id = self
            .ids
            .decls
            .get(id)
            .ok_or_else(|| missing(format!("ID for declaration {}", id.as_u32())))?;
        self.offsets.decls.record(decl_id, self.out.position())?;
        self.trace_record("decl", decl_id);

        if self.is_decl_xref(id) {
            return self.write_xref(id);
        }

        let ast = self.ast;
        let decl = ast.decl(id);
        self.write_discriminators(decl)?;

        match &decl.kind {
            DeclKind::TypeAlias {
                underlying,
                interface_type,
            } => {
                let fields = [
                    self.add_decl_base_name_ref(decl.name),
                    self.add_decl_context_ref(decl.context),
                    self.add_type_ref(Some(*underlying)),
                    self.add_type_ref(*interface_type),
                    self.add_generic_environment_ref(decl.generic_env),
                    flag(decl.attrs.implicit),
                    wire::access_level(decl.access),
                ];
                self.out.record(decls::TYPE_ALIAS_DECL, &fields)?;
                self.write_generic_params(decl.generic_params)?;
            }
            DeclKind::GenericTypeParam { depth, index, .. } => {
                let fields = [
                    self.add_decl_base_name_ref(decl.name),
                    self.add_decl_context_ref(decl.context),
                    flag(decl.attrs.implicit),
                    *depth as u64,
                    *index as u64,
                ];
                self.out.record(decls::GENERIC_TYPE_PARAM_DECL, &fields)?;
            }
            DeclKind::AssociatedType { default, inherited } => {
                let mut fields = vec![
                    self.add_decl_base_name_ref(decl.name),
                    self.add_decl_context_ref(decl.context),
                    self.add_type_ref(*default),
                    flag(decl.attrs.implicit),
                ];
                for &ty in inherited {
                    fields.push(self.add_type_ref(Some(ty)));
                }
                self.out.record(decls::ASSOCIATED_TYPE_DECL, &fields)?;
            }
            DeclKind::Struct(body) => {
                let mut fields = vec![
                    self.add_decl_base_name_ref(decl.name),
                    self.add_decl_context_ref(decl.context),
                    flag(decl.attrs.implicit),
                    self.add_generic_environment_ref(decl.generic_env),
                    wire::access_level(decl.access),
                    body.conformances.len() as u64,
                ];
                for &ty in &body.inherited {
                    fields.push(self.add_type_ref(Some(ty)));
                }
                self.out.record(decls::STRUCT_DECL, &fields)?;
                self.write_nominal_tail(decl_id, decl, false)?;
            }
            DeclKind::Enum { body, raw_type } => {
                let mut fields = vec![
                    self.add_decl_base_name_ref(decl.name),
                    self.add_decl_context_ref(decl.context),
                    flag(decl.attrs.implicit),
                    self.add_generic_environment_ref(decl.generic_env),
                    self.add_type_ref(*raw_type),
                    wire::access_level(decl.access),
                    body.conformances.len() as u64,
                ];
                for &ty in &body.inherited {
                    fields.push(self.add_type_ref(Some(ty)));
                }
                self.out.record(decls::ENUM_DECL, &fields)?;
                self.write_nominal_tail(decl_id, decl, false)?;
            }
            DeclKind::Class {
                body,
                superclass,
                requires_stored_property_inits,
                foreign_class,
            } => {
                let mut fields = vec![
                    self.add_decl_base_name_ref(decl.name),
                    self.add_decl_context_ref(decl.context),
                    flag(decl.attrs.implicit),
                    flag(decl.attrs.objc),
                    flag(*requires_stored_property_inits),
                    flag(*foreign_class),
                    self.add_generic_environment_ref(decl.generic_env),
                    self.add_type_ref(*superclass),
                    wire::access_level(decl.access),
                    body.conformances.len() as u64,
                ];
                for &ty in &body.inherited {
                    fields.push(self.add_type_ref(Some(ty)));
                }
                self.out.record(decls::CLASS_DECL, &fields)?;
                self.write_objc_name(decl)?;
                self.write_nominal_tail(decl_id, decl, true)?;
            }
            DeclKind::Protocol {
                members,
                inherited,
                requirement_signature,
                class_bound,
            } => {
                let mut fields = vec![
                    self.add_decl_base_name_ref(decl.name),
                    self.add_decl_context_ref(decl.context),
                    flag(decl.attrs.implicit),
                    flag(*class_bound),
                    flag(decl.attrs.objc),
                    self.add_generic_environment_ref(decl.generic_env),
                    self.add_generic_signature_ref(*requirement_signature),
                    wire::access_level(decl.access),
                ];
                for &ty in inherited {
                    fields.push(self.add_type_ref(Some(ty)));
                }
                self.out.record(decls::PROTOCOL_DECL, &fields)?;
                self.write_objc_name(decl)?;
                self.write_generic_params(decl.generic_params)?;
                self.write_members(decl_id, members, false)?;
            }
            DeclKind::Extension {
                extended_type,
                members,
                inherited,
                conformances,
            } => {
                let mut fields = vec![
                    self.add_type_ref(Some(*extended_type)),
                    self.add_decl_context_ref(decl.context),
                    flag(decl.attrs.implicit),
                    self.add_generic_environment_ref(decl.generic_env),
                    conformances.len() as u64,
                ];
                for &ty in inherited {
                    fields.push(self.add_type_ref(Some(ty)));
                }
                self.out.record(decls::EXTENSION_DECL, &fields)?;
                self.write_generic_params(decl.generic_params)?;
                let extends_class = ast
                    .nominal_of_type(*extended_type)
                    .is_some_and(|n| matches!(ast.decl(n).kind, DeclKind::Class { .. }));
                self.write_members(decl_id, members, extends_class)?;
                self.write_local_conformances(conformances)?;
            }
            DeclKind::Func {
                signature,
                static_spelling,
                mutating,
                operator,
            } => {
                let mut fields = vec![
                    self.add_decl_base_name_ref(decl.name),
                    self.add_decl_context_ref(decl.context),
                    flag(decl.attrs.implicit),
                    flag(decl.attrs.is_static),
                    wire::static_spelling(*static_spelling),
                    flag(decl.attrs.objc),
                    flag(*mutating),
                    flag(signature.throws),
                    flag(decl.attrs.is_final),
                    flag(decl.attrs.dynamic),
                    self.add_generic_environment_ref(decl.generic_env),
                    self.add_type_ref(signature.interface_type),
                    self.add_decl_ref(*operator, false),
                    self.add_decl_ref(signature.overridden, false),
                    wire::access_level(decl.access),
                ];
                self.push_params(&mut fields, signature);
                self.out.record(decls::FUNC_DECL, &fields)?;
                self.write_objc_name(decl)?;
                self.write_generic_params(decl.generic_params)?;
            }
            DeclKind::Accessor {
                signature,
                accessor_kind,
                storage,
                mutating,
            } => {
                let mut fields = vec![
                    self.add_decl_context_ref(decl.context),
                    flag(decl.attrs.implicit),
                    flag(decl.attrs.is_static),
                    flag(decl.attrs.objc),
                    flag(*mutating),
                    flag(signature.throws),
                    flag(decl.attrs.is_final),
                    flag(decl.attrs.dynamic),
                    self.add_generic_environment_ref(decl.generic_env),
                    self.add_type_ref(signature.interface_type),
                    self.add_decl_ref(signature.overridden, false),
                    wire::access_level(decl.access),
                    wire::accessor_kind(*accessor_kind),
                    self.add_decl_ref(Some(*storage), false),
                ];
                self.push_params(&mut fields, signature);
                self.out.record(decls::ACCESSOR_DECL, &fields)?;
                self.write_objc_name(decl)?;
            }
            DeclKind::Constructor {
                signature,
                failability,
                init_kind,
                required,
            } => {
                let mut fields = vec![
                    self.add_decl_context_ref(decl.context),
                    wire::optional_type_kind(*failability),
                    flag(decl.attrs.implicit),
                    flag(decl.attrs.objc),
                    flag(signature.throws),
                    wire::ctor_initializer_kind(*init_kind),
                    self.add_generic_environment_ref(decl.generic_env),
                    self.add_type_ref(signature.interface_type),
                    self.add_decl_ref(signature.overridden, false),
                    flag(*required),
                    wire::access_level(decl.access),
                ];
                self.push_params(&mut fields, signature);
                self.out.record(decls::CONSTRUCTOR_DECL, &fields)?;
                self.write_objc_name(decl)?;
                self.write_generic_params(decl.generic_params)?;
            }
            DeclKind::Destructor { interface_type } => {
                let fields = [
                    self.add_decl_context_ref(decl.context),
                    flag(decl.attrs.implicit),
                    flag(decl.attrs.objc),
                    self.add_generic_environment_ref(decl.generic_env),
                    self.add_type_ref(*interface_type),
                ];
                self.out.record(decls::DESTRUCTOR_DECL, &fields)?;
            }
            DeclKind::Var {
                interface_type,
                is_let,
                ownership,
                storage,
            } => {
                let mut fields = vec![
                    self.add_decl_base_name_ref(decl.name),
                    self.add_decl_context_ref(decl.context),
                    flag(decl.attrs.implicit),
                    flag(decl.attrs.objc),
                    flag(decl.attrs.is_static),
                    flag(*is_let),
                    wire::storage_kind(storage.storage),
                    wire::ownership(*ownership),
                    self.add_type_ref(Some(*interface_type)),
                    self.add_decl_ref(storage.overridden, false),
                    wire::access_level(decl.access),
                ];
                for &accessor in &storage.accessors {
                    fields.push(self.add_decl_ref(Some(accessor), false));
                }
                self.out.record(decls::VAR_DECL, &fields)?;
                self.write_objc_name(decl)?;
            }
            DeclKind::Param {
                interface_type,
                argument_name,
                default_argument,
            } => {
                let fields = [
                    self.add_symbol_ref(*argument_name),
                    self.add_decl_base_name_ref(decl.name),
                    self.add_decl_context_ref(decl.context),
                    self.add_type_ref(Some(*interface_type)),
                    wire::default_argument_kind(*default_argument),
                ];
                self.out.record(decls::PARAM_DECL, &fields)?;
            }
            DeclKind::Subscript {
                interface_type,
                element_type,
                indices,
                storage,
            } => {
                let mut fields = vec![
                    self.add_decl_context_ref(decl.context),
                    flag(decl.attrs.implicit),
                    flag(decl.attrs.objc),
                    wire::storage_kind(storage.storage),
                    self.add_generic_environment_ref(decl.generic_env),
                    self.add_type_ref(*interface_type),
                    self.add_type_ref(Some(*element_type)),
                    self.add_decl_ref(storage.overridden, false),
                    wire::access_level(decl.access),
                    indices.len() as u64,
                ];
                for &index in indices {
                    fields.push(self.add_decl_ref(Some(index), false));
                }
                for &accessor in &storage.accessors {
                    fields.push(self.add_decl_ref(Some(accessor), false));
                }
                self.out.record(decls::SUBSCRIPT_DECL, &fields)?;
                self.write_generic_params(decl.generic_params)?;
            }
            DeclKind::EnumElement {
                interface_type,
                has_payload,
            } => {
                let fields = [
                    self.add_decl_base_name_ref(decl.name),
                    self.add_decl_context_ref(decl.context),
                    self.add_type_ref(*interface_type),
                    flag(*has_payload),
                    flag(decl.attrs.implicit),
                ];
                self.out.record(decls::ENUM_ELEMENT_DECL, &fields)?;
            }
            DeclKind::Operator {
                fixity,
                precedence_group,
            } => {
                let name = self.add_decl_base_name_ref(decl.name);
                let ctx = self.add_decl_context_ref(decl.context);
                match fixity {
                    OperatorFixity::Infix => {
                        let group = self.add_decl_ref(*precedence_group, false);
                        self.out
                            .record(decls::INFIX_OPERATOR_DECL, &[name, ctx, group])?;
                    }
                    OperatorFixity::Prefix => {
                        self.out.record(decls::PREFIX_OPERATOR_DECL, &[name, ctx])?;
                    }
                    OperatorFixity::Postfix => {
                        self.out.record(decls::POSTFIX_OPERATOR_DECL, &[name, ctx])?;
                    }
                }
            }
            DeclKind::PrecedenceGroup {
                associativity,
                assignment,
                higher_than,
                lower_than,
            } => {
                let mut fields = vec![
                    self.add_decl_base_name_ref(decl.name),
                    self.add_decl_context_ref(decl.context),
                    wire::associativity(*associativity),
                    flag(*assignment),
                    higher_than.len() as u64,
                ];
                for &group in higher_than.iter().chain(lower_than) {
                    fields.push(self.add_decl_ref(Some(group), false));
                }
                self.out.record(decls::PRECEDENCE_GROUP_DECL, &fields)?;
            }
            DeclKind::PatternBinding {
                entries,
                static_spelling,
            } => {
                let mut fields = vec![
                    self.add_decl_context_ref(decl.context),
                    flag(decl.attrs.implicit),
                    flag(decl.attrs.is_static),
                    wire::static_spelling(*static_spelling),
                    entries.len() as u64,
                ];
                for entry in entries {
                    fields.push(self.add_decl_ref(Some(entry.var), false));
                    fields.push(self.add_local_context_ref(entry.init_context));
                }
                self.out.record(decls::PATTERN_BINDING_DECL, &fields)?;
            }
            DeclKind::Import
            | DeclKind::TopLevelCode
            | DeclKind::IfConfig
            | DeclKind::EnumCase
            | DeclKind::Module => {
                return Err(SerializeError::UnserializableDecl {
                    kind: decl.kind.name(),
                    decl: id.as_u32(),
                });
            }
        }
        Ok(())
    }

    /// Private and local discriminators precede the declaration record.
    fn write_discriminators(&mut self, decl: &Decl) -> Result<()> {
        let local = self.ast.is_local_context(decl.context);
        if !local
            && decl.access <= AccessLevel::FilePrivate
            && let Some(disc) = decl.private_discriminator
        {
            let disc = self.add_symbol_ref(Some(disc));
            self.out.record(decls::PRIVATE_DISCRIMINATOR, &[disc])?;
        }
        if local && let Some(disc) = decl.local_discriminator {
            self.out
                .record(decls::LOCAL_DISCRIMINATOR, &[disc as u64])?;
        }
        Ok(())
    }

    fn push_params(&mut self, fields: &mut Vec<u64>, signature: &FuncSignature) {
        for &param in &signature.params {
            fields.push(self.add_decl_ref(Some(param), false));
        }
    }

    fn write_objc_name(&mut self, decl: &Decl) -> Result<()> {
        if decl.attrs.objc
            && let Some(selector) = &decl.objc_selector
        {
            self.out
                .record_blob(decls::OBJC_NAME, &[], selector.as_bytes())?;
        }
        Ok(())
    }

    /// Generic parameters, members and conformances of a struct, enum or class.
    fn write_nominal_tail(&mut self, decl_id: u32, decl: &Decl, is_class: bool) -> Result<()> {
        self.write_generic_params(decl.generic_params)?;
        let members = decl.kind.members().unwrap_or_default();
        self.write_members(decl_id, members, is_class)?;
        self.write_local_conformances(decl.kind.conformances())
    }

    pub(crate) fn write_generic_params(&mut self, list: Option<GenericParamListId>) -> Result<()> {
        let Some(list) = list else { return Ok(()) };
        let ast = self.ast;
        let params = &ast.generic_param_list(list).params;
        self.out.record(decls::GENERIC_PARAM_LIST, &[])?;
        for &param in params {
            let param_id = self.add_decl_ref(Some(param), false);
            self.out.record(decls::GENERIC_PARAM, &[param_id])?;
        }
        Ok(())
    }

    /// `MEMBERS` record; also feeds the member and dynamic-lookup tables.
    fn write_members(&mut self, parent_id: u32, members: &[DeclId], is_class: bool) -> Result<()> {
        let ast = self.ast;
        let mut ids = Vec::with_capacity(members.len());
        for &member in members {
            let decl = ast.decl(member);
            if !ensure_member_serializable(member, decl)? {
                continue;
            }
            let member_id = self.add_decl_ref(Some(member), false);
            ids.push(member_id);

            if !decl.kind.is_value() {
                continue;
            }
            let Some(key) = member_table_key(ast, decl.name) else {
                continue;
            };
            if is_class
                && decl.attrs.dynamic_lookup
                && let Some(code) = decl_record_code(&decl.kind)
            {
                self.dynamic_lookup_members
                    .entry(key.clone())
                    .or_default()
                    .push((code as u8, member_id as u32));
            }
            self.decl_member_names
                .entry(key)
                .or_default()
                .entry(parent_id)
                .or_default()
                .push(member_id as u32);
        }
        self.out.record(decls::MEMBERS, &ids)
    }
}
