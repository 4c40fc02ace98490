//! `gredit`: compile an editor graph description into C construction code.

use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::Parser;

use gredit_cli::{compile, logging, GreditConfig};

#[derive(Parser)]
#[command(
    name = "gredit",
    version,
    about = "Compile a graph description into C code that builds the graph"
)]
struct Cli {
    /// Graph description to compile (.json)
    input: PathBuf,
    /// C source file to write; its stem names the generated graph
    output: PathBuf,
    /// Name of the context variable in the generated code
    #[arg(long)]
    context: Option<String>,
    /// Extra kernel table (TOML), may be repeated
    #[arg(long = "kernels", value_name = "FILE")]
    kernels: Vec<PathBuf>,
    /// Configuration file (default: ./gredit.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("reading current directory")?;
    let mut config = GreditConfig::resolve(cli.config.as_deref(), &cwd)?;
    config.apply_overrides(cli.context, cli.kernels);
    logging::init(&config.log_level);
    config.validate()?;

    let registry = config.build_registry()?;
    compile(&registry, &config.context, &cli.input, &cli.output)
}
