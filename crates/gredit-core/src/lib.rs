//! Core data structures for the gredit graph compiler.
//!
//! A pipeline drawn in the graph editor is a set of data nodes, function nodes
//! and directed links. Function nodes invoke kernels whose fixed input/output
//! signatures live in an immutable [`KernelRegistry`]; the [`Graph`] keeps
//! nodes and links in an arena keyed by their identifiers.
//!
//! ## Modules
//!
//! - [`kernel`]: kernel signatures, descriptor tables and the registry
//! - [`graph`]: nodes, ports, links and the graph container
//! - [`builder`]: validated graph construction for ingest

pub mod builder;
pub mod graph;
pub mod kernel;

pub use builder::GraphBuilder;
pub use graph::link::{Link, LinkId};
pub use graph::node::{DataRole, Node, NodeId, NodeKind};
pub use graph::port::{Port, PortDirection, PortRef};
pub use graph::{is_identifier, Graph, GraphError};
pub use kernel::descriptor::{KernelDescriptor, KernelTable, ParamDescriptor};
pub use kernel::{Kernel, KernelRegistry, RegistryBuilder, RegistryError, Tag};
