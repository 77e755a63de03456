//! Lookup tables and offset arrays of the `INDEX` block.
//!
//! Top-level declarations are collected before the declarations block is
//! drained, so that collecting them interns and queues everything they need.
//! The tables are written after the drain, when every ID is final.

use tessera_bytecode::HashTableBuilder;
use tessera_bytecode::format::BlockId;
use tessera_bytecode::format::layouts::{identifier_layouts, index_layouts, member_table_layouts};
use tessera_bytecode::format::records::{decl_member_tables, decls, identifier_data, index};
use tessera_core::ast::{DeclId, DeclKind, FileId};
use tracing::debug;

use crate::Serializer;
use crate::error::Result;
use crate::records::decl_record_code;
use crate::wire;

/// Top-level lookup tables gathered from the module's files.
#[derive(Debug, Default)]
pub(crate) struct TopLevelTables {
    pub top_level_decls: HashTableBuilder,
    pub operators: HashTableBuilder,
    pub precedence_groups: HashTableBuilder,
    pub extensions: HashTableBuilder,
    pub operator_methods: HashTableBuilder,
    pub objc_methods: HashTableBuilder,
    pub nested_types: HashTableBuilder,
    pub local_types: HashTableBuilder,
    pub entry_point: Option<u64>,
}

fn push_kind_id(data: &mut Vec<u8>, kind: u8, id: u64) {
    data.push(kind);
    data.extend_from_slice(&(id as u32).to_le_bytes());
}

fn push_pair(data: &mut Vec<u8>, first: u64, second: u64) {
    data.extend_from_slice(&(first as u32).to_le_bytes());
    data.extend_from_slice(&(second as u32).to_le_bytes());
}

impl Serializer<'_> {
    /// Files written by this session: the primary file if one is set,
    /// otherwise every file of the module.
    pub(crate) fn files_in_scope(&self) -> Vec<FileId> {
        let ast = self.ast;
        let files = &ast.module(self.module).files;
        match self.options.primary_file.as_deref() {
            Some(primary) => files
                .iter()
                .copied()
                .filter(|&file| ast.file(file).name == primary)
                .collect(),
            None => files.clone(),
        }
    }

    /// Intern every top-level declaration and build the lookup tables.
    pub(crate) fn collect_top_level(&mut self) -> Result<TopLevelTables> {
        let ast = self.ast;
        let mut tables = TopLevelTables::default();

        for file_id in self.files_in_scope() {
            let file = ast.file(file_id);
            for &decl_id in &file.top_level_decls {
                self.collect_top_level_decl(decl_id, &mut tables);
            }
            for &local in &file.local_types {
                let id = self.add_decl_ref(Some(local), false);
                let discriminator = ast.decl(local).local_discriminator.unwrap_or(0);
                push_pair(
                    tables.local_types.entry(ast.qualified_name(local)),
                    id,
                    discriminator as u64,
                );
            }
            if let Some(entry) = file.entry_point {
                tables.entry_point = Some(self.add_decl_ref(Some(entry), false));
            }
        }

        debug!(
            top_level = tables.top_level_decls.len(),
            extensions = tables.extensions.len(),
            operators = tables.operators.len(),
            "collected top-level declarations"
        );
        Ok(tables)
    }

    fn collect_top_level_decl(&mut self, decl_id: DeclId, tables: &mut TopLevelTables) {
        let ast = self.ast;
        let decl = ast.decl(decl_id);
        match &decl.kind {
            DeclKind::Import
            | DeclKind::TopLevelCode
            | DeclKind::IfConfig
            | DeclKind::EnumCase
            | DeclKind::Module => {}
            DeclKind::Extension {
                extended_type,
                members,
                ..
            } => {
                let ext = self.add_decl_ref(Some(decl_id), false);
                if let Some(nominal) = ast.nominal_of_type(*extended_type)
                    && let Some(name) = ast.decl_name_str(ast.decl(nominal).name)
                {
                    let nominal_id = self.add_decl_ref(Some(nominal), false);
                    push_pair(tables.extensions.entry(name), nominal_id, ext);
                }
                self.collect_nested(ext, members, tables);
            }
            DeclKind::Operator { fixity, .. } => {
                let id = self.add_decl_ref(Some(decl_id), false);
                if let Some(name) = ast.decl_name_str(decl.name) {
                    let fixity = wire::operator_fixity(*fixity) as u8;
                    push_kind_id(tables.operators.entry(name), fixity, id);
                }
            }
            DeclKind::PrecedenceGroup { .. } => {
                let id = self.add_decl_ref(Some(decl_id), false);
                if let Some(name) = ast.decl_name_str(decl.name) {
                    let kind = decls::PRECEDENCE_GROUP_DECL as u8;
                    push_kind_id(tables.precedence_groups.entry(name), kind, id);
                }
            }
            DeclKind::PatternBinding { .. } => {
                self.add_decl_ref(Some(decl_id), false);
            }
            kind => {
                let id = self.add_decl_ref(Some(decl_id), false);
                if let DeclKind::Var { storage, .. } = kind {
                    for &accessor in &storage.accessors {
                        self.add_decl_ref(Some(accessor), true);
                    }
                }
                if let Some(name) = ast.decl_name_str(decl.name)
                    && let Some(code) = decl_record_code(kind)
                {
                    push_kind_id(tables.top_level_decls.entry(name), code as u8, id);
                }
                if let Some(members) = kind.members() {
                    self.collect_nested(id, members, tables);
                }
            }
        }
    }

    /// Operator methods, foreign selectors and nested types of a type body.
    fn collect_nested(&mut self, parent_id: u64, members: &[DeclId], tables: &mut TopLevelTables) {
        let ast = self.ast;
        for &member in members {
            let decl = ast.decl(member);
            if !decl.access.is_above_file_private() {
                continue;
            }
            match &decl.kind {
                DeclKind::Func { operator, .. } => {
                    if operator.is_some()
                        && let Some(name) = ast.decl_name_str(decl.name)
                    {
                        let id = self.add_decl_ref(Some(member), false);
                        let kind = decls::FUNC_DECL as u8;
                        push_kind_id(tables.operator_methods.entry(name), kind, id);
                    }
                    if decl.attrs.objc
                        && let Some(selector) = &decl.objc_selector
                        && !ast.is_local_context(decl.context)
                    {
                        let id = self.add_decl_ref(Some(member), false);
                        let is_instance = !decl.attrs.is_static as u8;
                        push_kind_id(tables.objc_methods.entry(selector.as_str()), is_instance, id);
                    }
                }
                kind if kind.is_nominal_type() => {
                    let id = self.add_decl_ref(Some(member), false);
                    if let Some(name) = ast.decl_name_str(decl.name) {
                        push_pair(tables.nested_types.entry(name), parent_id, id);
                    }
                    if let Some(nested) = kind.members() {
                        self.collect_nested(id, nested, tables);
                    }
                }
                _ => {}
            }
        }
    }

    /// Write the identifier strings, returning each one's byte offset.
    pub(crate) fn write_identifier_block(&mut self) -> Result<Vec<u32>> {
        let (blob, offsets) = self.ids.identifiers.to_blob();
        self.out.enter(BlockId::IdentifierData, identifier_layouts());
        self.out
            .record_blob(identifier_data::IDENTIFIER_DATA, &[], &blob)?;
        self.out.exit();
        debug!(identifiers = offsets.len(), bytes = blob.len(), "identifiers written");
        Ok(offsets)
    }

    pub(crate) fn write_index_block(
        &mut self,
        tables: TopLevelTables,
        identifier_offsets: &[u32],
        checksum: u32,
    ) -> Result<()> {
        self.out.enter(BlockId::Index, index_layouts());

        let identifier_offsets: Vec<u64> = identifier_offsets.iter().map(|&o| o as u64).collect();
        let arrays: [(u32, &[u64]); 9] = [
            (index::TYPE_OFFSETS, self.offsets.types.as_slice()),
            (index::DECL_OFFSETS, self.offsets.decls.as_slice()),
            (index::IDENTIFIER_OFFSETS, &identifier_offsets),
            (
                index::LOCAL_DECL_CONTEXT_OFFSETS,
                self.offsets.local_contexts.as_slice(),
            ),
            (index::DECL_CONTEXT_OFFSETS, self.offsets.decl_contexts.as_slice()),
            (
                index::NORMAL_CONFORMANCE_OFFSETS,
                self.offsets.conformances.as_slice(),
            ),
            (index::BODY_LAYOUT_OFFSETS, self.offsets.body_layouts.as_slice()),
            (
                index::GENERIC_ENVIRONMENT_OFFSETS,
                self.offsets.generic_environments.as_slice(),
            ),
            (
                index::GENERIC_SIGNATURE_OFFSETS,
                self.offsets.generic_signatures.as_slice(),
            ),
        ];
        for (code, offsets) in arrays {
            self.out.record(code, offsets)?;
        }

        let mut dynamic_lookup = HashTableBuilder::new();
        for (name, entries) in &self.dynamic_lookup_members {
            let data = dynamic_lookup.entry(name.as_str());
            for &(kind, id) in entries {
                push_kind_id(data, kind, id as u64);
            }
        }

        for (code, table) in [
            (index::TOP_LEVEL_DECLS, tables.top_level_decls),
            (index::OPERATORS, tables.operators),
            (index::EXTENSIONS, tables.extensions),
            (index::CLASS_MEMBERS_FOR_DYNAMIC_LOOKUP, dynamic_lookup),
            (index::OPERATOR_METHODS, tables.operator_methods),
            (index::OBJC_METHODS, tables.objc_methods),
            (index::LOCAL_TYPE_DECLS, tables.local_types),
            (index::PRECEDENCE_GROUPS, tables.precedence_groups),
            (index::NESTED_TYPE_DECLS, tables.nested_types),
        ] {
            self.write_table(code, table)?;
        }

        if let Some(entry) = tables.entry_point {
            self.out.record(index::ENTRY_POINT, &[entry])?;
        }
        self.out
            .record(index::DECLS_CHECKSUM, &[checksum as u64])?;

        let member_names = self.write_member_tables()?;
        self.write_table(index::DECL_MEMBER_NAMES, member_names)?;

        self.out.exit();
        Ok(())
    }

    /// One member sub-table per base name, keyed by parent ID. Returns the
    /// name table that maps each base name to its sub-table's bit offset.
    fn write_member_tables(&mut self) -> Result<HashTableBuilder> {
        let mut names = HashTableBuilder::new();
        if self.decl_member_names.is_empty() {
            return Ok(names);
        }

        self.out
            .enter(BlockId::DeclMemberTables, member_table_layouts());
        let member_names = std::mem::take(&mut self.decl_member_names);
        for (name, parents) in &member_names {
            let mut table = HashTableBuilder::new();
            for (parent, members) in parents {
                let data = table.entry(parent.to_le_bytes().to_vec());
                for member in members {
                    data.extend_from_slice(&member.to_le_bytes());
                }
            }
            let position = self.out.position();
            let (offset, bytes) = table.finish();
            self.out
                .record_blob(decl_member_tables::DECL_MEMBERS, &[offset as u64], &bytes)?;
            names.insert(name.as_str(), position.to_le_bytes().to_vec());
        }
        self.decl_member_names = member_names;
        self.out.exit();
        Ok(names)
    }

    /// Empty tables are omitted.
    fn write_table(&mut self, code: u32, table: HashTableBuilder) -> Result<()> {
        if table.is_empty() {
            return Ok(());
        }
        let entries = table.len();
        let (offset, bytes) = table.finish();
        self.out.record_blob(code, &[offset as u64], &bytes)?;
        debug!(
            table = index::NAMES
                .iter()
                .find(|(c, _)| *c == code)
                .map_or("?", |(_, name)| *name),
            entries,
            bytes = bytes.len(),
            "index table written"
        );
        Ok(())
    }
}
