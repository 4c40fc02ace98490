//! Shared driver logic for the `gredit` and `gredit-headers` binaries.

pub mod config;
pub mod logging;

use std::path::Path;

use anyhow::{Context, Result};

use gredit_codegen::{write_kernel_header_file, write_node_header_file, GraphCodeWriter};
use gredit_core::KernelRegistry;
use gredit_doc::GraphDocument;

pub use config::GreditConfig;

/// Compile the graph description at `input` into C source at `output`.
///
/// Nothing is written unless the document loads, the graph validates and
/// the function nodes can be scheduled.
pub fn compile(
    registry: &KernelRegistry,
    context: &str,
    input: &Path,
    output: &Path,
) -> Result<()> {
    let document = GraphDocument::load(input).context("loading graph description")?;
    let graph = document
        .to_graph(registry)
        .with_context(|| format!("building graph from {}", input.display()))?;
    GraphCodeWriter::new(&graph, context)
        .write_file(output)
        .with_context(|| format!("generating {}", output.display()))
}

/// Write the node and kernel declaration headers for `registry`.
pub fn write_headers(registry: &KernelRegistry, nodes: &Path, kernels: &Path) -> Result<()> {
    write_node_header_file(registry, nodes)
        .with_context(|| format!("writing node header {}", nodes.display()))?;
    write_kernel_header_file(registry, kernels)
        .with_context(|| format!("writing kernel header {}", kernels.display()))
}
