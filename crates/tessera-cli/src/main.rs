#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod cli;
mod commands;

use cli::{DumpParams, SerializeParams, build_cli};
use tracing_subscriber::EnvFilter;

/// Diagnostics go to stderr so `dump` output stays pipeable.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env("TESSERA_LOG").unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("serialize", m)) => {
            let params = SerializeParams::from_matches(m);
            commands::serialize::run(params.into());
        }
        Some(("dump", m)) => {
            let params = DumpParams::from_matches(m);
            commands::dump::run(params.into());
        }
        _ => unreachable!("clap should have caught this"),
    }
}
