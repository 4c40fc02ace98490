//! Validated graph construction.
//!
//! The ingest step (the editor's document loader) builds graphs through
//! [`GraphBuilder`], which resolves kernel names against a registry as nodes
//! are added, so an unknown kernel is reported at construction time rather
//! than during code generation.
//!
//! # Example
//!
//! ```rust
//! use gredit_core::builder::GraphBuilder;
//! use gredit_core::kernel::{Kernel, KernelRegistry};
//!
//! let mut registry = KernelRegistry::builder();
//! registry.register_builtins();
//! registry
//!     .register_kernel(Kernel::from_signature("FOO", "I", "I").unwrap())
//!     .unwrap();
//! let registry = registry.build();
//!
//! let mut builder = GraphBuilder::new(&registry);
//! builder.add_node("in1", "IMAGE").unwrap();
//! builder.add_node("n1", "FOO").unwrap();
//! builder.add_node("out1", "IMAGE").unwrap();
//! builder.connect("l1", ("in1", 0), ("n1", 0)).unwrap();
//! builder.connect("l2", ("n1", 0), ("out1", 0)).unwrap();
//!
//! let graph = builder.build().unwrap();
//! assert_eq!(graph.node_count(), 3);
//! ```

use crate::graph::link::Link;
use crate::graph::node::Node;
use crate::graph::port::PortRef;
use crate::graph::{Graph, GraphError};
use crate::kernel::{KernelRegistry, Tag};

/// A builder for graphs whose function nodes reference registry kernels.
pub struct GraphBuilder<'r> {
    registry: &'r KernelRegistry,
    graph: Graph,
}

impl<'r> GraphBuilder<'r> {
    pub fn new(registry: &'r KernelRegistry) -> Self {
        Self {
            registry,
            graph: Graph::new(),
        }
    }

    /// Add a node invoking the named kernel. The builtin `IMAGE`, `BUFFER`
    /// and `SCALAR` kernels produce data nodes.
    pub fn add_node(&mut self, id: &str, kernel: &str) -> Result<&Node, GraphError> {
        let registry = self.registry;
        let kernel = registry
            .lookup(kernel)
            .map_err(|source| GraphError::UnknownKernel {
                node: id.to_string(),
                source,
            })?;
        self.graph.insert_node(Node::for_kernel(id, kernel))
    }

    /// Add a data node of the given tag.
    pub fn add_data(&mut self, id: &str, tag: Tag) -> Result<&Node, GraphError> {
        self.add_node(id, tag.kernel_name())
    }

    /// Connect an output port to an input port.
    pub fn connect(
        &mut self,
        id: &str,
        source: impl Into<PortRef>,
        target: impl Into<PortRef>,
    ) -> Result<&Link, GraphError> {
        self.graph.connect(id, source.into(), target.into())
    }

    /// The graph built so far.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Validate and return the finished graph.
    pub fn build(self) -> Result<Graph, GraphError> {
        self.graph.validate()?;
        Ok(self.graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{Kernel, RegistryError};

    fn registry() -> KernelRegistry {
        let mut builder = KernelRegistry::builder();
        builder
            .register_builtins()
            .register_kernel(Kernel::from_signature("BLEND", "IIS", "I").unwrap())
            .unwrap();
        builder.build()
    }

    #[test]
    fn builds_function_and_data_nodes() {
        let registry = registry();
        let mut b = GraphBuilder::new(&registry);
        b.add_data("a", Tag::Image).unwrap();
        b.add_node("b", "IMAGE").unwrap();
        b.add_data("alpha", Tag::Scalar).unwrap();
        let blend = b.add_node("mix", "BLEND").unwrap();
        assert!(blend.is_function());
        assert_eq!(blend.inputs.len(), 3);

        b.connect("l1", ("a", 0), ("mix", 0)).unwrap();
        b.connect("l2", ("b", 0), ("mix", 1)).unwrap();
        b.connect("l3", ("alpha", 0), ("mix", 2)).unwrap();
        assert_eq!(b.graph().link_count(), 3);

        let graph = b.build().unwrap();
        assert!(graph.node("alpha").unwrap().is_data());
    }

    #[test]
    fn unknown_kernel_reported_at_construction() {
        let registry = registry();
        let mut b = GraphBuilder::new(&registry);
        let err = b.add_node("n7", "SHARPEN").unwrap_err();
        assert!(matches!(
            err,
            GraphError::UnknownKernel { ref node, source: RegistryError::UnknownKernel { ref name } }
                if node == "n7" && name == "SHARPEN"
        ));
        assert_eq!(err.to_string(), "node n7: unknown kernel: SHARPEN");
        assert!(b.graph().is_empty());
    }
}
