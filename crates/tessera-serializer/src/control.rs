//! `CONTROL`, `OPTIONS` and `INPUT` blocks.

use std::collections::BTreeMap;

use tessera_bytecode::format::layouts::{control_layouts, input_layouts, options_layouts};
use tessera_bytecode::format::records::{control, input, options};
use tessera_bytecode::format::{BlockId, VERSION_MAJOR, VERSION_MINOR};
use tessera_core::ast::ResilienceStrategy;

use crate::Serializer;
use crate::error::Result;
use crate::options::SerializationOptions;
use crate::sink::RecordSink;
use crate::wire;

/// Version string recorded next to the format version.
const VERSION_STRING: &str = concat!("tessera ", env!("CARGO_PKG_VERSION"));

/// Write a `CONTROL` block. Module files nest their `OPTIONS` inside it;
/// doc files omit them.
pub(crate) fn write_control_block(
    out: &mut RecordSink,
    module_name: &str,
    opts: &SerializationOptions,
    with_options: bool,
) -> Result<()> {
    out.enter(BlockId::Control, control_layouts());
    out.record_blob(control::MODULE_NAME, &[], module_name.as_bytes())?;
    out.record_blob(
        control::METADATA,
        &[VERSION_MAJOR as u64, VERSION_MINOR as u64],
        VERSION_STRING.as_bytes(),
    )?;
    out.record_blob(control::TARGET, &[], opts.target.as_bytes())?;
    if with_options {
        write_options_block(out, opts)?;
    }
    out.exit();
    Ok(())
}

fn write_options_block(out: &mut RecordSink, opts: &SerializationOptions) -> Result<()> {
    out.enter(BlockId::Options, options_layouts());
    if let Some(sdk) = &opts.sdk_path {
        out.record_blob(options::SDK_PATH, &[], sdk.as_bytes())?;
    }
    for arg in &opts.extra_foreign_args {
        out.record_blob(options::XCC, &[], arg.as_bytes())?;
    }
    out.record(options::IS_SIB, &[opts.is_sib as u64])?;
    if opts.testable {
        out.record(options::IS_TESTABLE, &[])?;
    }
    if opts.resilience != ResilienceStrategy::Default {
        out.record(
            options::RESILIENCE_STRATEGY,
            &[wire::resilience_strategy(opts.resilience)],
        )?;
    }
    out.exit();
    Ok(())
}

impl Serializer<'_> {
    pub(crate) fn write_control(&mut self) -> Result<()> {
        let name = self.module_name();
        write_control_block(&mut self.out, name, self.options, true)
    }

    /// Imports are sorted and deduplicated by name and access path. A
    /// duplicate that is exported makes the merged import exported.
    pub(crate) fn write_input(&mut self) -> Result<()> {
        let ast = self.ast;
        let module = ast.module(self.module);

        let mut imports: BTreeMap<(String, String), bool> = BTreeMap::new();
        for import in &module.imports {
            let name = ast.resolve(ast.module(import.module).name).to_string();
            let path = import
                .access_path
                .iter()
                .map(|&sym| ast.resolve(sym))
                .collect::<Vec<_>>()
                .join(".");
            *imports.entry((name, path)).or_default() |= import.exported;
        }

        self.out.enter(BlockId::Input, input_layouts());
        for ((name, path), exported) in &imports {
            let scoped = !path.is_empty();
            let blob = if scoped {
                format!("{name}\0{path}")
            } else {
                name.clone()
            };
            self.out.record_blob(
                input::IMPORTED_MODULE,
                &[*exported as u64, scoped as u64],
                blob.as_bytes(),
            )?;
        }
        for lib in &module.link_libraries {
            self.out.record_blob(
                input::LINK_LIBRARY,
                &[wire::library_kind(lib.kind), lib.force_load as u64],
                lib.name.as_bytes(),
            )?;
        }
        for search in &self.options.search_paths {
            self.out.record_blob(
                input::SEARCH_PATH,
                &[search.framework as u64, search.system as u64],
                search.path.as_bytes(),
            )?;
        }
        if let Some(link_name) = &self.options.module_link_name {
            self.out
                .record_blob(input::MODULE_LINK_NAME, &[], link_name.as_bytes())?;
        }
        self.out.exit();
        Ok(())
    }
}
