//! The documentation companion file.
//!
//! Doc comments of externally visible declarations, keyed by the
//! declaration's dotted path, plus the names of the documentation groups
//! their files belong to.

use std::collections::BTreeSet;

use tessera_bytecode::HashTableBuilder;
use tessera_bytecode::format::layouts::comment_layouts;
use tessera_bytecode::format::records::comment;
use tessera_bytecode::format::{BlockId, DOC_SIGNATURE};
use tessera_core::ast::DeclId;
use tracing::debug;

use crate::Serializer;
use crate::block_info::write_block_info;
use crate::control::write_control_block;
use crate::error::Result;
use crate::sink::RecordSink;

/// Group names, index 0 being the unnamed group.
struct Groups {
    names: Vec<String>,
}

impl Groups {
    fn new<'a>(names: impl Iterator<Item = &'a String>) -> Self {
        let sorted: BTreeSet<&String> = names.collect();
        let mut all = vec![String::new()];
        all.extend(sorted.into_iter().cloned());
        Self { names: all }
    }

    fn id(&self, name: Option<&String>) -> u32 {
        name.and_then(|name| self.names.iter().position(|n| n == name))
            .unwrap_or(0) as u32
    }

    /// Every name NUL-terminated, in ID order.
    fn to_blob(&self) -> Vec<u8> {
        let mut blob = Vec::new();
        for name in &self.names {
            blob.extend_from_slice(name.as_bytes());
            blob.push(0);
        }
        blob
    }
}

impl Serializer<'_> {
    pub(crate) fn write_doc(&self) -> Result<Vec<u8>> {
        let ast = self.ast;
        let groups = Groups::new(self.options.doc_groups.values());

        let mut comments = HashTableBuilder::new();
        for file_id in self.files_in_scope() {
            let file = ast.file(file_id);
            let group = groups.id(self.options.doc_groups.get(&file.name));
            for &decl in &file.top_level_decls {
                self.collect_comments(decl, group, &mut comments);
            }
        }
        debug!(
            comments = comments.len(),
            groups = groups.names.len() - 1,
            "doc comments collected"
        );

        let mut out = RecordSink::new();
        out.writer().emit_bytes(&DOC_SIGNATURE);
        write_block_info(out.writer());
        out.enter(BlockId::ModuleDoc, Vec::new());
        write_control_block(&mut out, self.module_name(), self.options, false)?;

        out.enter(BlockId::Comment, comment_layouts());
        if !comments.is_empty() {
            let (offset, bytes) = comments.finish();
            out.record_blob(comment::DECL_COMMENTS, &[offset as u64], &bytes)?;
        }
        out.record_blob(comment::GROUP_NAMES, &[], &groups.to_blob())?;
        out.exit();

        out.exit();
        Ok(out.finish())
    }

    /// Entry data: `u32 group`, `u32 length`, text. Overloads sharing a
    /// path append to the same entry.
    fn collect_comments(&self, decl_id: DeclId, group: u32, comments: &mut HashTableBuilder) {
        let ast = self.ast;
        let decl = ast.decl(decl_id);
        if !decl.access.is_above_file_private() {
            return;
        }
        if let Some(text) = &decl.doc_comment {
            let data = comments.entry(ast.qualified_name(decl_id));
            data.extend_from_slice(&group.to_le_bytes());
            data.extend_from_slice(&(text.len() as u32).to_le_bytes());
            data.extend_from_slice(text.as_bytes());
        }
        if let Some(members) = decl.kind.members() {
            for &member in members {
                self.collect_comments(member, group, comments);
            }
        }
    }
}
