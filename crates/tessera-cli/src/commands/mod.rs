pub mod dump;
pub mod serialize;

#[cfg(test)]
mod serialize_tests;

use std::path::PathBuf;

use tessera_bytecode::DumpError;
use tessera_core::LoadError;
use tessera_serializer::{OutputError, SerializeError};

/// Everything a command can fail with; printed as `error: ...`.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{}: {source}", path.display())]
    Load { path: PathBuf, source: LoadError },

    #[error("invalid options in {}: {source}", path.display())]
    Config {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("no output path; pass -o or set output_path in the config")]
    MissingOutput,

    #[error("no module named '{0}'")]
    UnknownModule(String),

    #[error("the entity graph has no source module")]
    NoSourceModule,

    #[error(transparent)]
    Serialize(#[from] SerializeError),

    #[error(transparent)]
    Output(#[from] OutputError),

    #[error("{}: {source}", path.display())]
    Dump { path: PathBuf, source: DumpError },
}

fn read(path: &std::path::Path) -> Result<Vec<u8>, CliError> {
    std::fs::read(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}
