//! Ports: typed attachment points on a node.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::link::LinkId;
use super::node::NodeId;
use crate::kernel::Tag;

/// Direction of a port relative to its node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortDirection {
    /// Values flow into the node.
    Input,
    /// Values flow out of the node.
    Output,
}

impl fmt::Display for PortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortDirection::Input => f.write_str("input"),
            PortDirection::Output => f.write_str("output"),
        }
    }
}

/// A port reference: node identifier and positional index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortRef {
    pub node: NodeId,
    #[serde(default)]
    pub port: usize,
}

impl PortRef {
    pub fn new(node: impl Into<NodeId>, port: usize) -> Self {
        Self {
            node: node.into(),
            port,
        }
    }
}

impl fmt::Display for PortRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.node, self.port)
    }
}

impl<S: Into<NodeId>> From<(S, usize)> for PortRef {
    fn from((node, port): (S, usize)) -> Self {
        PortRef::new(node, port)
    }
}

/// A typed port owned by a node.
///
/// `links` holds identifiers of the links attached here, in connection
/// order. The links themselves are owned by the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Port {
    /// Owning node.
    pub node: NodeId,
    pub direction: PortDirection,
    /// Positional index among ports of the same direction.
    pub index: usize,
    pub tag: Tag,
    pub links: Vec<LinkId>,
}

impl Port {
    pub fn input(node: impl Into<NodeId>, index: usize, tag: Tag) -> Self {
        Self {
            node: node.into(),
            direction: PortDirection::Input,
            index,
            tag,
            links: Vec::new(),
        }
    }

    pub fn output(node: impl Into<NodeId>, index: usize, tag: Tag) -> Self {
        Self {
            node: node.into(),
            direction: PortDirection::Output,
            index,
            tag,
            links: Vec::new(),
        }
    }

    pub fn is_connected(&self) -> bool {
        !self.links.is_empty()
    }

    /// The first link attached to this port, if any.
    pub fn first_link(&self) -> Option<&LinkId> {
        self.links.first()
    }

    pub fn port_ref(&self) -> PortRef {
        PortRef::new(self.node.clone(), self.index)
    }
}
