//! Nodes: data values and kernel invocations.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use super::port::{Port, PortDirection};
use super::Graph;
use crate::kernel::{Kernel, Tag};

/// Unique node identifier.
pub type NodeId = String;

/// What a node represents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// A value with no behaviour of its own.
    Data { tag: Tag },
    /// An invocation of a kernel.
    Function { kernel: Arc<Kernel> },
}

/// Position of a data node in the pipeline, decided by which of its ports
/// carry links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataRole {
    /// Nothing produces it: supplied from outside.
    Head,
    /// Produced and consumed inside the graph.
    Intermediate,
    /// Produced but consumed by nothing: a final result.
    Tail,
}

impl fmt::Display for DataRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataRole::Head => f.write_str("head"),
            DataRole::Intermediate => f.write_str("intermediate"),
            DataRole::Tail => f.write_str("tail"),
        }
    }
}

/// A node in the dataflow graph.
///
/// Data nodes carry one input and one output port of their tag. Function
/// nodes carry one port per kernel parameter, in the kernel's declared order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    pub inputs: Vec<Port>,
    pub outputs: Vec<Port>,
}

impl Node {
    /// Create a data node of the given tag.
    pub fn data(id: impl Into<NodeId>, tag: Tag) -> Self {
        let id = id.into();
        Self {
            inputs: vec![Port::input(id.clone(), 0, tag)],
            outputs: vec![Port::output(id.clone(), 0, tag)],
            kind: NodeKind::Data { tag },
            id,
        }
    }

    /// Create a function node invoking `kernel`.
    pub fn function(id: impl Into<NodeId>, kernel: Arc<Kernel>) -> Self {
        let id = id.into();
        let inputs = kernel
            .inputs
            .iter()
            .enumerate()
            .map(|(i, &tag)| Port::input(id.clone(), i, tag))
            .collect();
        let outputs = kernel
            .outputs
            .iter()
            .enumerate()
            .map(|(i, &tag)| Port::output(id.clone(), i, tag))
            .collect();
        Self {
            id,
            kind: NodeKind::Function { kernel },
            inputs,
            outputs,
        }
    }

    /// Create a node for a registry kernel: builtin data kernels give data
    /// nodes, everything else a function node.
    pub fn for_kernel(id: impl Into<NodeId>, kernel: &Arc<Kernel>) -> Self {
        match kernel.data_tag() {
            Some(tag) => Node::data(id, tag),
            None => Node::function(id, Arc::clone(kernel)),
        }
    }

    pub fn is_data(&self) -> bool {
        matches!(self.kind, NodeKind::Data { .. })
    }

    pub fn is_function(&self) -> bool {
        matches!(self.kind, NodeKind::Function { .. })
    }

    /// The invoked kernel, for function nodes.
    pub fn kernel(&self) -> Option<&Kernel> {
        match &self.kind {
            NodeKind::Function { kernel } => Some(kernel.as_ref()),
            NodeKind::Data { .. } => None,
        }
    }

    /// The value tag, for data nodes.
    pub fn data_tag(&self) -> Option<Tag> {
        match self.kind {
            NodeKind::Data { tag } => Some(tag),
            NodeKind::Function { .. } => None,
        }
    }

    pub fn port(&self, direction: PortDirection, index: usize) -> Option<&Port> {
        match direction {
            PortDirection::Input => self.inputs.get(index),
            PortDirection::Output => self.outputs.get(index),
        }
    }

    pub(crate) fn port_mut(&mut self, direction: PortDirection, index: usize) -> Option<&mut Port> {
        match direction {
            PortDirection::Input => self.inputs.get_mut(index),
            PortDirection::Output => self.outputs.get_mut(index),
        }
    }

    /// All ports, inputs first.
    pub fn ports(&self) -> impl Iterator<Item = &Port> {
        self.inputs.iter().chain(&self.outputs)
    }

    /// Classify a data node as head, intermediate or tail. `None` for
    /// function nodes.
    pub fn role(&self) -> Option<DataRole> {
        if !self.is_data() {
            return None;
        }
        let produced = self.inputs.first().is_some_and(Port::is_connected);
        let consumed = self.outputs.first().is_some_and(Port::is_connected);
        Some(if !produced {
            DataRole::Head
        } else if !consumed {
            DataRole::Tail
        } else {
            DataRole::Intermediate
        })
    }

    /// True when every link arriving at an input port comes from a node in
    /// `printed`. Data nodes are always ready.
    pub fn is_ready(&self, graph: &Graph, printed: &HashSet<NodeId>) -> bool {
        if self.is_data() {
            return true;
        }
        self.inputs
            .iter()
            .flat_map(|port| &port.links)
            .all(|link_id| {
                graph
                    .link(link_id)
                    .is_some_and(|link| printed.contains(&link.source.node))
            })
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            NodeKind::Data { tag } => write!(f, "{} ({tag})", self.id),
            NodeKind::Function { kernel } => write!(f, "{} ({})", self.id, kernel.name),
        }
    }
}
