//! `normapi flatten`: rewrite a document into normal form.

use clap::Args;
use std::path::PathBuf;

use normapi_core::openapi::{FlattenOptions, Format, flatten_with, to_string};
use tracing::info;

use crate::common::{OutputFormat, load, write_output};

/// Arguments of `normapi flatten`.
#[derive(Args, Debug, Clone)]
pub struct FlattenArgs {
    /// OpenAPI document to flatten (.json, .yaml or .yml)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,
    /// Write the result to this file instead of stdout
    #[arg(short, long, value_name = "OUTPUT")]
    pub output: Option<PathBuf>,
    /// Output format [default: from the output extension, else the input format]
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
    /// Also flatten entries already registered under components
    #[arg(long)]
    pub components: bool,
    /// Also flatten webhooks
    #[arg(long)]
    pub webhooks: bool,
}

/// Flattens the input and writes it out. Returns the exit code.
pub fn run(args: &FlattenArgs) -> i32 {
    match flatten(args) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{err}");
            1
        }
    }
}

fn flatten(args: &FlattenArgs) -> Result<(), String> {
    let mut doc = load(&args.input)?;

    let options = FlattenOptions {
        components: args.components,
        webhooks: args.webhooks,
    };
    let stats = flatten_with(&mut doc, options)
        .map_err(|err| format!("{}: {err}", args.input.display()))?;
    info!(
        input = %args.input.display(),
        promoted = stats.total(),
        schemas = stats.schemas,
        responses = stats.responses,
        parameters = stats.parameters,
        request_bodies = stats.request_bodies,
        "Flattened document."
    );

    let format = output_format(args)?;
    let text = to_string(&doc, format).map_err(|err| err.to_string())?;
    write_output(args.output.as_deref(), &text)
}

/// The explicit `--format`, else the output file's extension, else the input's.
fn output_format(args: &FlattenArgs) -> Result<Format, String> {
    if let Some(format) = args.format {
        return Ok(format.into());
    }
    if let Some(format) = args
        .output
        .as_deref()
        .and_then(|output| Format::from_path(output).ok())
    {
        return Ok(format);
    }
    Format::from_path(&args.input).map_err(|err| err.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn args(input: &str, output: Option<&str>, format: Option<OutputFormat>) -> FlattenArgs {
        FlattenArgs {
            input: input.into(),
            output: output.map(PathBuf::from),
            format,
            components: false,
            webhooks: false,
        }
    }

    #[test]
    fn test_output_format_precedence() {
        assert_eq!(
            output_format(&args("api.yaml", Some("out.json"), Some(OutputFormat::Yaml))).unwrap(),
            Format::Yaml
        );
        assert_eq!(
            output_format(&args("api.yaml", Some("out.json"), None)).unwrap(),
            Format::Json
        );
        assert_eq!(
            output_format(&args("api.yaml", Some("out.txt"), None)).unwrap(),
            Format::Yaml
        );
        assert_eq!(output_format(&args("api.json", None, None)).unwrap(), Format::Json);
    }
}
