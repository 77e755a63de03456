//! Command builders for the CLI.

use clap::Command;

use super::args::*;

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("tessera")
        .about("Serialize Tessera modules and inspect module files")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(serialize_command())
        .subcommand(dump_command())
}

/// Serialize one module of an entity graph.
pub fn serialize_command() -> Command {
    Command::new("serialize")
        .about("Serialize a module from its entity graph")
        .override_usage("  tessera serialize <AST> -o <FILE> [--doc <FILE>] [--config <JSON>]")
        .after_help(
            r#"EXAMPLES:
  tessera serialize geometry.json -o Geometry.tsm
  tessera serialize geometry.json -o Geometry.tsm --doc Geometry.tsmdoc
  tessera serialize app.json --module App --config options.json --body

Set TESSERA_LOG=debug for a trace of the serialization session."#,
        )
        .arg(ast_path_arg())
        .arg(output_arg())
        .arg(doc_arg())
        .arg(config_arg())
        .arg(module_arg())
        .arg(body_arg())
}

/// Print the block and record tree of a module or doc file.
pub fn dump_command() -> Command {
    Command::new("dump")
        .about("Print the block and record structure of a module or doc file")
        .after_help(
            r#"EXAMPLES:
  tessera dump Geometry.tsm
  tessera dump Geometry.tsmdoc --color never"#,
        )
        .arg(file_arg())
        .arg(color_arg())
}
