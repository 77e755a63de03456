//! Whole-module serialization and artifact output.

use std::io::Write as _;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tessera_bytecode::format::layouts::decls_layouts;
use tessera_bytecode::format::{BlockId, MODULE_SIGNATURE};
use tessera_core::ForeignBridge;
use tessera_core::ast::{AstContext, ModuleId};
use tracing::{debug, error, info, info_span};

use crate::Serializer;
use crate::block_info::write_block_info;
use crate::error::{OutputError, Result};
use crate::invariants::missing;
use crate::options::SerializationOptions;
use crate::sink::RecordSink;

/// Encoded files of one session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifacts {
    pub module: Vec<u8>,
    /// Present when a doc output path was configured.
    pub doc: Option<Vec<u8>>,
}

/// Outcome of writing each artifact. The two are attempted independently.
#[derive(Debug)]
pub struct OutputReport {
    pub module: std::result::Result<PathBuf, OutputError>,
    pub doc: Option<std::result::Result<PathBuf, OutputError>>,
}

impl OutputReport {
    pub fn is_ok(&self) -> bool {
        self.module.is_ok() && self.doc.as_ref().is_none_or(|doc| doc.is_ok())
    }
}

/// Serialize `module` into its module file and, if configured, its doc file.
pub fn serialize(
    ast: &AstContext,
    module: ModuleId,
    bridge: &dyn ForeignBridge,
    options: &SerializationOptions,
) -> Result<Artifacts> {
    let mut serializer = Serializer::new(ast, module, bridge, options);
    let span = info_span!("serialize_module", module = serializer.module_name());
    let _guard = span.enter();

    let module_bytes = serializer.write_module()?;
    let doc = match options.doc_output_path {
        Some(_) => Some(serializer.write_doc()?),
        None => None,
    };
    info!(
        bytes = module_bytes.len(),
        decls = serializer.decl_count(),
        types = serializer.type_count(),
        identifiers = serializer.identifier_count(),
        "module serialized"
    );
    Ok(Artifacts {
        module: module_bytes,
        doc,
    })
}

impl Serializer<'_> {
    /// Encode the complete module file.
    pub fn write_module(&mut self) -> Result<Vec<u8>> {
        self.out.writer().emit_bytes(&MODULE_SIGNATURE);
        write_block_info(self.out.writer());
        self.out.enter(BlockId::Module, Vec::new());

        self.write_control()?;
        self.write_input()?;

        let body = self.write_body()?;
        let tables = self.collect_top_level()?;

        let start = self.out.enter(BlockId::DeclsAndTypes, decls_layouts());
        self.drain()?;
        self.out.exit();
        let end = self.out.position();
        let checksum = self
            .out
            .bytes()
            .get((start / 8) as usize..(end / 8) as usize)
            .map(crc32fast::hash)
            .ok_or_else(|| missing("declarations block bytes"))?;
        debug!(checksum, bytes = (end - start) / 8, "declarations block closed");

        let identifier_offsets = self.write_identifier_block()?;
        self.write_index_block(tables, &identifier_offsets, checksum)?;
        if let Some(body) = body {
            self.append_body(body)?;
        }

        self.out.exit();
        Ok(std::mem::replace(&mut self.out, RecordSink::new()).finish())
    }
}

/// Write every artifact to its configured path.
pub fn write_outputs(artifacts: &Artifacts, options: &SerializationOptions) -> OutputReport {
    let module = write_atomically(options.output_path(), &artifacts.module);
    let doc = match (&artifacts.doc, options.doc_output_path()) {
        (Some(bytes), Some(path)) => Some(write_atomically(path, bytes)),
        _ => None,
    };
    OutputReport { module, doc }
}

/// Write through a temporary file in the destination directory, renamed
/// into place on success. A failed write leaves no file behind.
fn write_atomically(path: &Path, bytes: &[u8]) -> std::result::Result<PathBuf, OutputError> {
    let result = persist(path, bytes);
    match &result {
        Ok(_) => info!(path = %path.display(), bytes = bytes.len(), "wrote output"),
        Err(err) => error!(path = %path.display(), error = %err.source, "failed to write output"),
    }
    result
}

fn persist(path: &Path, bytes: &[u8]) -> std::result::Result<PathBuf, OutputError> {
    let fail = |source| OutputError {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(fail)?;
    tmp.write_all(bytes).map_err(fail)?;
    tmp.as_file().sync_all().map_err(fail)?;
    tmp.persist(path).map_err(|err| fail(err.error))?;
    Ok(path.to_path_buf())
}
