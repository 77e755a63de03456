//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` that can be composed into commands.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Entity graph in JSON form (positional).
pub fn ast_path_arg() -> Arg {
    Arg::new("ast_path")
        .value_name("AST")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Entity graph JSON file")
}

/// Module or doc file to inspect (positional).
pub fn file_arg() -> Arg {
    Arg::new("file")
        .value_name("FILE")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Module or doc file")
}

/// Module file destination (-o/--output).
pub fn output_arg() -> Arg {
    Arg::new("output")
        .short('o')
        .long("output")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("Write the module file here (overrides the config)")
}

/// Doc file destination (--doc).
pub fn doc_arg() -> Arg {
    Arg::new("doc")
        .long("doc")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("Also write the documentation file")
}

/// Serialization options in JSON form (--config).
pub fn config_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .value_name("JSON")
        .value_parser(value_parser!(PathBuf))
        .help("Serialization options file")
}

/// Module to serialize (--module).
pub fn module_arg() -> Arg {
    Arg::new("module")
        .long("module")
        .value_name("NAME")
        .help("Module to serialize (default: the first source module)")
}

/// Serialize every lowered body (--body).
pub fn body_arg() -> Arg {
    Arg::new("body")
        .long("body")
        .action(ArgAction::SetTrue)
        .help("Write every lowered body, not only serialized ones")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .num_args(0..=1)
        .default_value("auto")
        .default_missing_value("always")
        .value_parser(["auto", "always", "never"])
        .help("Colorize output")
}
