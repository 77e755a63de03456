use std::path::{Path, PathBuf};

use tessera_core::ast::{AstContext, ModuleId, ModuleKind};
use tessera_core::NativeBridge;
use tessera_serializer::{SerializationOptions, serialize, write_outputs};
use tracing::debug;

use super::{CliError, read};

pub struct SerializeArgs {
    pub ast_path: PathBuf,
    pub output: Option<PathBuf>,
    pub doc: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub module: Option<String>,
    pub serialize_all_bodies: bool,
}

pub fn run(args: SerializeArgs) {
    if let Err(err) = execute(&args) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

/// Serialize and write the artifacts, returning the paths written.
pub fn execute(args: &SerializeArgs) -> Result<Vec<PathBuf>, CliError> {
    let options = options(args)?;

    let text = read(&args.ast_path)?;
    let text = String::from_utf8_lossy(&text);
    let ast = AstContext::from_json(&text).map_err(|source| CliError::Load {
        path: args.ast_path.clone(),
        source,
    })?;
    let module = select_module(&ast, args.module.as_deref())?;
    debug!(
        module = ast.resolve(ast.module(module).name),
        decls = ast.decl_count(),
        types = ast.type_count(),
        "entity graph loaded"
    );

    let artifacts = serialize(&ast, module, &NativeBridge, &options)?;
    let report = write_outputs(&artifacts, &options);

    let mut written = vec![report.module?];
    if let Some(doc) = report.doc {
        written.push(doc?);
    }
    Ok(written)
}

/// Config file first, then command-line overrides.
fn options(args: &SerializeArgs) -> Result<SerializationOptions, CliError> {
    let mut options = match &args.config {
        Some(path) => load_config(path)?,
        None => SerializationOptions::default(),
    };
    if let Some(output) = &args.output {
        options = options.with_output_path(output);
    }
    if let Some(doc) = &args.doc {
        options = options.doc_output(doc);
    }
    if args.serialize_all_bodies {
        options = options.serialize_all_bodies(true);
    }
    if options.output_path().as_os_str().is_empty() {
        return Err(CliError::MissingOutput);
    }
    Ok(options)
}

fn load_config(path: &Path) -> Result<SerializationOptions, CliError> {
    let text = read(path)?;
    let text = String::from_utf8_lossy(&text);
    SerializationOptions::from_json(&text).map_err(|source| CliError::Config {
        path: path.to_path_buf(),
        source,
    })
}

fn select_module(ast: &AstContext, name: Option<&str>) -> Result<ModuleId, CliError> {
    match name {
        Some(name) => ast
            .find_module(name)
            .ok_or_else(|| CliError::UnknownModule(name.to_string())),
        None => (0..ast.module_count() as u32)
            .map(ModuleId::new)
            .find(|&id| ast.module(id).kind == ModuleKind::Source)
            .ok_or(CliError::NoSourceModule),
    }
}
