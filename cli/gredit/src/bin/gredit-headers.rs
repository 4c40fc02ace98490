//! `gredit-headers`: write the node and kernel declaration headers.

use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::Parser;

use gredit_cli::{logging, write_headers, GreditConfig};

#[derive(Parser)]
#[command(
    name = "gredit-headers",
    version,
    about = "Write C headers declaring every registered kernel"
)]
struct Cli {
    /// Node constructor header to write (e.g. vx_nodes.h)
    nodes: PathBuf,
    /// Kernel enumeration header to write (e.g. vx_kernels.h)
    kernels_header: PathBuf,
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
    config.apply_overrides(None, cli.kernels);
    logging::init(&config.log_level);

    let registry = config.build_registry()?;
    write_headers(&registry, &cli.nodes, &cli.kernels_header)?;
    println!("Node header file written to {}", cli.nodes.display());
    println!("Kernel header file written to {}", cli.kernels_header.display());
    Ok(())
}
