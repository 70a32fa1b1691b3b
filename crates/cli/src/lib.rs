//! Command-line front end for normapi.

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

pub mod check;
pub mod common;
pub mod flatten;

#[derive(Parser)]
#[command(
    name = "normapi",
    version,
    about = "Rewrites OpenAPI documents into normal form"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Promote inline definitions into components
    Flatten(flatten::FlattenArgs),
    /// Load, link and validate a document
    Check(check::CheckArgs),
}

/// Parses `args` (program name first) and runs the selected command.
///
/// Returns the process exit code.
pub fn run_cli<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => match cli.command {
            Some(Commands::Flatten(args)) => flatten::run(&args),
            Some(Commands::Check(args)) => check::run(&args),
            None => {
                let mut cmd = Cli::command();
                let _ = cmd.print_help();
                println!();
                0
            }
        },
        Err(e) => {
            let code = e.exit_code();
            let _ = e.print();
            code
        }
    }
}

/// Installs the stderr log subscriber.
///
/// `NORMAPI_LOG` controls the level: "trace", "debug", "info", "warn", "error",
/// or a full filter spec like "normapi_core=debug".
pub fn init_tracing() {
    let filter = filter_spec(std::env::var("NORMAPI_LOG").ok().as_deref());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

/// Turns the `NORMAPI_LOG` value into an `EnvFilter` directive.
fn filter_spec(value: Option<&str>) -> String {
    match value {
        Some(level) if is_plain_level(level) => format!("normapi={level}"),
        Some(spec) => spec.to_string(),
        None => "normapi=warn".to_string(),
    }
}

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}
