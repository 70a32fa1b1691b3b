//! `normapi check`: load, link and validate a document.

use clap::Args;
use std::path::PathBuf;

use normapi_core::openapi::Document;

use crate::common::load;

/// Arguments of `normapi check`.
#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// OpenAPI document to check (.json, .yaml or .yml)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,
}

/// Prints `ok` and a summary, or the first error. Returns the exit code.
pub fn run(args: &CheckArgs) -> i32 {
    match load(&args.input) {
        Ok(doc) => {
            println!("{}: ok", args.input.display());
            print!("{}", summary(&doc));
            0
        }
        Err(err) => {
            eprintln!("{err}");
            1
        }
    }
}

/// One `name: count` line per path collection and registry.
fn summary(doc: &Document) -> String {
    let operations: usize = doc
        .paths
        .values()
        .map(|item| item.operations().count())
        .sum();
    let components = &doc.components;

    [
        ("paths", doc.paths.len()),
        ("operations", operations),
        ("webhooks", doc.webhooks.len()),
        ("schemas", components.schemas.len()),
        ("responses", components.responses.len()),
        ("parameters", components.parameters.len()),
        ("requestBodies", components.request_bodies.len()),
    ]
    .iter()
    .map(|(name, count)| format!("  {name}: {count}\n"))
    .collect()
}
