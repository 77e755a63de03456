//! Fixtures, file readers and snapshot macros shared by the serializer tests.

/// Snapshot of the record names of one block of `$fx`'s module file.
macro_rules! shot_block {
    ($fx:expr, $block:expr, @$snapshot:literal) => {{
        let bytes = $fx.module_bytes();
        let file = $crate::test_utils::parse(&bytes);
        insta::with_settings!({ omit_expression => true }, {
            insta::assert_snapshot!(file.outline($block), @$snapshot);
        });
    }};
}

pub(crate) use shot_block;

use tessera_bytecode::format::layouts::decls_layouts;
use tessera_bytecode::format::{BlockId, DOC_SIGNATURE, MODULE_SIGNATURE};
use tessera_bytecode::{BlockCursor, Entry, FileKind, HashTableView, Record};
use tessera_core::ast::{
    AccessLevel, AstContext, Decl, DeclContext, DeclId, DeclKind, DeclName, FileId, FileUnit,
    FuncSignature, Module, ModuleId, NominalBody, StorageBody, TypeId, TypeKind,
};
use tessera_core::{NativeBridge, Symbol};

use crate::error::Result;
use crate::sink::RecordSink;
use crate::{Artifacts, SerializationOptions, Serializer, serialize};

/// A module `M` with one file `main.src` and a builtin `Int`.
pub(crate) struct Fixture {
    pub ast: AstContext,
    pub module: ModuleId,
    pub file: FileId,
    pub int: TypeId,
}

impl Fixture {
    pub fn new() -> Self {
        let mut ast = AstContext::new();
        let name = ast.intern("M");
        let module = ast.add_module(Module::new(name));
        let file = ast.add_file(FileUnit::new(module, "main.src"));
        let int_name = ast.intern("Int");
        let int = ast.intern_type(TypeKind::Builtin { name: int_name });
        Self {
            ast,
            module,
            file,
            int,
        }
    }

    pub fn sym(&mut self, text: &str) -> Symbol {
        self.ast.intern(text)
    }

    pub fn name(&mut self, text: &str) -> DeclName {
        DeclName::Identifier(self.sym(text))
    }

    /// Add a second module with one file.
    pub fn other_module(&mut self, name: &str) -> (ModuleId, FileId) {
        let sym = self.sym(name);
        let module = self.ast.add_module(Module::new(sym));
        let file = self
            .ast
            .add_file(FileUnit::new(module, format!("{name}.src")));
        (module, file)
    }

    pub fn add_file(&mut self, name: &str) -> FileId {
        self.ast.add_file(FileUnit::new(self.module, name))
    }

    pub fn public_struct(&mut self, file: FileId, name: &str) -> DeclId {
        let decl = Decl::new(
            self.name(name),
            DeclContext::File(file),
            DeclKind::Struct(NominalBody::default()),
        )
        .with_access(AccessLevel::Public);
        self.ast.add_top_level_decl(file, decl)
    }

    pub fn public_class(&mut self, file: FileId, name: &str) -> DeclId {
        let kind = DeclKind::Class {
            body: NominalBody::default(),
            superclass: None,
            requires_stored_property_inits: false,
            foreign_class: false,
        };
        let decl = Decl::new(self.name(name), DeclContext::File(file), kind)
            .with_access(AccessLevel::Public);
        self.ast.add_top_level_decl(file, decl)
    }

    pub fn member_var(&mut self, parent: DeclId, name: &str, ty: TypeId) -> DeclId {
        let kind = DeclKind::Var {
            interface_type: ty,
            is_let: true,
            ownership: Default::default(),
            storage: StorageBody::default(),
        };
        let decl = Decl::new(self.name(name), DeclContext::Decl(parent), kind)
            .with_access(AccessLevel::Public);
        self.ast.add_member(parent, decl)
    }

    pub fn func(&mut self, ctx: DeclContext, name: &str) -> Decl {
        let unit = self.ast.intern_type(TypeKind::Tuple {
            elements: Vec::new(),
        });
        let ty = self.ast.intern_type(TypeKind::Function {
            input: unit,
            result: self.int,
            flags: Default::default(),
        });
        let kind = DeclKind::Func {
            signature: FuncSignature {
                interface_type: Some(ty),
                ..FuncSignature::default()
            },
            static_spelling: Default::default(),
            mutating: false,
            operator: None,
        };
        Decl::new(self.name(name), ctx, kind).with_access(AccessLevel::Public)
    }

    pub fn top_level_func(&mut self, file: FileId, name: &str) -> DeclId {
        let decl = self.func(DeclContext::File(file), name);
        self.ast.add_top_level_decl(file, decl)
    }

    pub fn nominal_type(&mut self, decl: DeclId) -> TypeId {
        self.ast.nominal_type(decl)
    }

    pub fn serializer<'a>(&'a self, options: &'a SerializationOptions) -> Serializer<'a> {
        Serializer::new(&self.ast, self.module, &NativeBridge, options)
    }

    pub fn serialize(&self, options: &SerializationOptions) -> Artifacts {
        serialize(&self.ast, self.module, &NativeBridge, options).unwrap()
    }

    pub fn module_bytes(&self) -> Vec<u8> {
        self.serialize(&SerializationOptions::new("M.tsm")).module
    }
}

/// Reference `roots`, drain them into a standalone declarations block and
/// read that block back as `(code, fields)` pairs.
pub(crate) fn write_decls(s: &mut Serializer<'_>, roots: &[DeclId]) -> Result<Vec<(u32, Vec<u64>)>> {
    s.out.enter(BlockId::DeclsAndTypes, decls_layouts());
    for &root in roots {
        s.add_decl_ref(Some(root), false);
    }
    s.drain()?;
    s.out.exit();
    let bytes = std::mem::replace(&mut s.out, RecordSink::new()).finish();

    let mut cursor = BlockCursor::new(&bytes);
    let mut records = Vec::new();
    while let Some(entry) = cursor.next_entry().unwrap() {
        if let Entry::Record(record) = entry {
            records.push((record.code, record.fields));
        }
    }
    Ok(records)
}

/// Records of every block in a file, in the order the blocks close.
pub(crate) struct ParsedFile<'a> {
    pub blocks: Vec<(BlockId, Vec<Record<'a>>)>,
}

pub(crate) fn parse(bytes: &[u8]) -> ParsedFile<'_> {
    let signature = match FileKind::detect(bytes) {
        Some(FileKind::Module) => MODULE_SIGNATURE,
        Some(FileKind::Doc) => DOC_SIGNATURE,
        None => panic!("unknown signature {:02X?}", &bytes[..4.min(bytes.len())]),
    };
    let mut cursor = BlockCursor::after_signature(bytes, signature).unwrap();
    let mut open: Vec<(BlockId, Vec<Record<'_>>)> = Vec::new();
    let mut blocks = Vec::new();
    while let Some(entry) = cursor.next_entry().unwrap() {
        match entry {
            Entry::SubBlock { block_id, .. } => {
                let id = BlockId::from_u32(block_id)
                    .unwrap_or_else(|| panic!("unknown block {block_id}"));
                open.push((id, Vec::new()));
            }
            Entry::EndBlock => blocks.push(open.pop().unwrap()),
            Entry::Record(record) => open.last_mut().unwrap().1.push(record),
        }
    }
    assert!(open.is_empty(), "unterminated blocks");
    ParsedFile { blocks }
}

impl<'a> ParsedFile<'a> {
    pub fn has_block(&self, id: BlockId) -> bool {
        self.blocks.iter().any(|(block, _)| *block == id)
    }

    /// Records of the first block with `id`.
    pub fn block(&self, id: BlockId) -> &[Record<'a>] {
        self.blocks
            .iter()
            .find(|(block, _)| *block == id)
            .map(|(_, records)| records.as_slice())
            .unwrap_or_else(|| panic!("no {} block", id.name()))
    }

    pub fn records(&self, id: BlockId, code: u32) -> Vec<&Record<'a>> {
        self.block(id).iter().filter(|r| r.code == code).collect()
    }

    pub fn record(&self, id: BlockId, code: u32) -> &Record<'a> {
        let found = self.records(id, code);
        assert_eq!(found.len(), 1, "expected one record {code} in {}", id.name());
        found[0]
    }

    /// Record codes of a block, in order.
    pub fn codes(&self, id: BlockId) -> Vec<u32> {
        self.block(id).iter().map(|r| r.code).collect()
    }

    /// Record names of a block, one per line.
    pub fn outline(&self, id: BlockId) -> String {
        self.block(id)
            .iter()
            .map(|r| match id.record_name(r.code) {
                Some(name) => name.to_string(),
                None => format!("CODE_{}", r.code),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Lookup in the hash table a table record carries.
    pub fn lookup(&self, id: BlockId, code: u32, key: &[u8]) -> Option<Vec<u8>> {
        let record = self.record(id, code);
        table_get(record, key)
    }
}

pub(crate) fn table_get(record: &Record<'_>, key: &[u8]) -> Option<Vec<u8>> {
    let view = HashTableView::new(record.blob.unwrap(), record.field(0) as u32).unwrap();
    view.get(key).unwrap().map(<[u8]>::to_vec)
}

pub(crate) fn u32_at(data: &[u8], at: usize) -> u32 {
    u32::from_le_bytes(data[at..at + 4].try_into().unwrap())
}
