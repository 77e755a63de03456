use std::path::PathBuf;

use tessera_bytecode::dump;
use tessera_core::Colors;

use super::{CliError, read};

pub struct DumpArgs {
    pub file: PathBuf,
    pub color: bool,
}

pub fn run(args: DumpArgs) {
    match execute(&args) {
        Ok(text) => print!("{text}"),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

pub fn execute(args: &DumpArgs) -> Result<String, CliError> {
    let bytes = read(&args.file)?;
    dump(&bytes, Colors::new(args.color)).map_err(|source| CliError::Dump {
        path: args.file.clone(),
        source,
    })
}
