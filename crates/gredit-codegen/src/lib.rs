//! Code generation for the gredit graph compiler.
//!
//! Lowers a validated [`gredit_core::Graph`] into a block of C statements
//! that rebuild the same graph through the vision runtime API:
//!
//! 1. [`schedule`] orders the function nodes so every producer precedes its
//!    consumers.
//! 2. [`GraphCodeWriter`] renders data nodes, links and functions in a fixed
//!    category order through an indenting [`CodeWriter`].
//! 3. [`headers`] derives the node and kernel declaration headers from the
//!    kernel registry.

pub mod emit;
pub mod error;
pub mod headers;
pub mod schedule;
pub mod writer;

#[cfg(test)]
mod testing;

pub use emit::{graph_name_for, GraphCodeWriter, RenderConstructor, Scope};
pub use error::CodegenError;
pub use headers::{
    write_kernel_header, write_kernel_header_file, write_node_header, write_node_header_file,
};
pub use schedule::{function_order, schedule};
pub use writer::{CodeWriter, Indent};
