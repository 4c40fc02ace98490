//! Code generation errors.

use std::io;

use gredit_core::NodeId;
use thiserror::Error;

/// Errors that can occur while scheduling or writing generated code.
#[derive(Debug, Error)]
pub enum CodegenError {
    #[error("graph contains a cycle: cannot schedule {}", nodes.join(", "))]
    CyclicGraph { nodes: Vec<NodeId> },

    #[error("identifier {id} cannot be declared in generated code: {reason}")]
    ReservedName { id: String, reason: &'static str },

    #[error("cannot open {path} for writing: {source}")]
    WriteTargetUnavailable {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
