use anyhow::{Context, Result};
use std::{fmt::Display, path::PathBuf};

use cbind::{generate_file, Config, Formatter, Output, PrettyPlease, Verbatim};

use clap::{Parser, ValueEnum};
use log::info;

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum Verbosity {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Parser)]
struct Args {
    /// JSON declaration list written by the header parser
    #[clap(value_parser)]
    input: PathBuf,

    /// Where to write the generated module, "-" for stdout
    #[clap(value_parser)]
    output: String,

    /// Verbosity of the output
    #[clap(short, long, arg_enum, value_parser)]
    verbosity: Option<Verbosity>,

    /// JSON file replacing parts of the built-in cairo tables
    #[clap(short, long, value_parser)]
    config: Option<PathBuf>,

    /// Write the generated source without pretty-printing it
    #[clap(long)]
    no_format: bool,
}

impl Display for Verbosity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verbosity::Trace => {
                write!(f, "trace")
            }
            Verbosity::Debug => {
                write!(f, "debug")
            }
            Verbosity::Info => {
                write!(f, "info")
            }
            Verbosity::Warn => {
                write!(f, "warn")
            }
            Verbosity::Error => {
                write!(f, "error")
            }
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // the summary is logged at info, so show it unless asked to be quieter
    let filter = args
        .verbosity
        .map(|v| v.to_string())
        .unwrap_or_else(|| "info".to_string());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&filter))
        .format_timestamp(None)
        .init();

    let config = match &args.config {
        Some(path) => Config::from_json_file(path)
            .with_context(|| format!("could not load configuration from {}", path.display()))?,
        None => Config::default(),
    };

    let formatter: &dyn Formatter = if args.no_format { &Verbatim } else { &PrettyPlease };
    let output = Output::parse(&args.output);

    let summary = generate_file(&args.input, &output, &config, formatter)
        .with_context(|| format!("could not generate bindings from {}", args.input.display()))?;

    if let Output::File(path) = &output {
        info!("wrote {} items to {}", summary.generated, path.display());
    }

    Ok(())
}
