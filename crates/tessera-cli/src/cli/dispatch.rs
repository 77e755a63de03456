//! Dispatch logic: extract params from ArgMatches and convert to command args.

use std::path::PathBuf;

use clap::ArgMatches;

use super::ColorChoice;
use crate::commands::dump::DumpArgs;
use crate::commands::serialize::SerializeArgs;

pub struct SerializeParams {
    pub ast_path: PathBuf,
    pub output: Option<PathBuf>,
    pub doc: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub module: Option<String>,
    pub body: bool,
}

impl SerializeParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            ast_path: m
                .get_one::<PathBuf>("ast_path")
                .cloned()
                .unwrap_or_default(),
            output: m.get_one::<PathBuf>("output").cloned(),
            doc: m.get_one::<PathBuf>("doc").cloned(),
            config: m.get_one::<PathBuf>("config").cloned(),
            module: m.get_one::<String>("module").cloned(),
            body: m.get_flag("body"),
        }
    }
}

impl From<SerializeParams> for SerializeArgs {
    fn from(p: SerializeParams) -> Self {
        Self {
            ast_path: p.ast_path,
            output: p.output,
            doc: p.doc,
            config: p.config,
            module: p.module,
            serialize_all_bodies: p.body,
        }
    }
}

pub struct DumpParams {
    pub file: PathBuf,
    pub color: ColorChoice,
}

impl DumpParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            file: m.get_one::<PathBuf>("file").cloned().unwrap_or_default(),
            color: parse_color(m),
        }
    }
}

impl From<DumpParams> for DumpArgs {
    fn from(p: DumpParams) -> Self {
        Self {
            file: p.file,
            color: p.color.should_colorize(),
        }
    }
}

fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.get_one::<String>("color").map(|s| s.as_str()) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}
