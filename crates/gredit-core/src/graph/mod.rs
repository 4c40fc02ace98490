//! The dataflow graph container: nodes, ports and links.
//!
//! The graph is an arena. It owns every node and link, keyed by identifier
//! and iterated in insertion order; ports refer to links by identifier only,
//! so cycles in the reference graph never turn into cycles of ownership.

pub mod link;
pub mod node;
pub mod port;

use std::collections::HashMap;

use indexmap::IndexMap;
use thiserror::Error;

use self::link::{Link, LinkId};
use self::node::{Node, NodeId};
use self::port::{PortDirection, PortRef};
use crate::kernel::{RegistryError, Tag};

/// Errors that can occur during graph construction or validation.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("node {node}: {source}")]
    UnknownKernel {
        node: NodeId,
        #[source]
        source: RegistryError,
    },

    #[error("duplicate identifier: {0}")]
    DuplicateId(String),

    #[error("invalid identifier: \"{0}\"")]
    InvalidIdentifier(String),

    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("{direction} port {index} out of range for node {node}")]
    PortOutOfRange {
        node: NodeId,
        direction: PortDirection,
        index: usize,
    },

    #[error("input port {port} already fed by link {existing}")]
    PortOccupied { port: PortRef, existing: LinkId },

    #[error("tag mismatch on link {link}: {produced} output feeds {expected} input")]
    TagMismatch {
        link: LinkId,
        produced: Tag,
        expected: Tag,
    },

    #[error("dangling link {link}: {detail}")]
    DanglingLink { link: LinkId, detail: String },
}

/// True for host-language identifiers: `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// A dataflow graph.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: IndexMap<NodeId, Node>,
    links: IndexMap<LinkId, Link>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Links in insertion order.
    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.links.values()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn link(&self, id: &str) -> Option<&Link> {
        self.links.get(id)
    }

    /// The node producing the value carried by `link`.
    pub fn source_node(&self, link: &Link) -> Option<&Node> {
        self.nodes.get(&link.source.node)
    }

    fn check_new_id(&self, id: &str) -> Result<(), GraphError> {
        if !is_identifier(id) {
            return Err(GraphError::InvalidIdentifier(id.to_string()));
        }
        if self.nodes.contains_key(id) || self.links.contains_key(id) {
            return Err(GraphError::DuplicateId(id.to_string()));
        }
        Ok(())
    }

    /// Add a node. Its ports must not carry links yet.
    pub fn insert_node(&mut self, mut node: Node) -> Result<&Node, GraphError> {
        self.check_new_id(&node.id)?;
        for port in node.inputs.iter_mut().chain(node.outputs.iter_mut()) {
            port.links.clear();
        }
        let id = node.id.clone();
        Ok(self.nodes.entry(id).or_insert(node))
    }

    /// Link the output port `source` to the input port `target`.
    ///
    /// Both ports must exist and share a tag, and the input port must not
    /// already have a producer. Output ports fan out freely.
    pub fn connect(
        &mut self,
        id: impl Into<LinkId>,
        source: PortRef,
        target: PortRef,
    ) -> Result<&Link, GraphError> {
        let id = id.into();
        self.check_new_id(&id)?;

        let produced = self.port_tag(&source, PortDirection::Output)?;
        let expected = self.port_tag(&target, PortDirection::Input)?;
        if produced != expected {
            return Err(GraphError::TagMismatch {
                link: id,
                produced,
                expected,
            });
        }
        if let Some(existing) = self
            .nodes
            .get(&target.node)
            .and_then(|n| n.port(PortDirection::Input, target.port))
            .and_then(|p| p.first_link())
        {
            return Err(GraphError::PortOccupied {
                port: target,
                existing: existing.clone(),
            });
        }

        self.attach(&source, PortDirection::Output, &id)?;
        self.attach(&target, PortDirection::Input, &id)?;
        let link = Link::new(id.clone(), source, target, produced);
        Ok(self.links.entry(id).or_insert(link))
    }

    fn port_tag(&self, port: &PortRef, direction: PortDirection) -> Result<Tag, GraphError> {
        let node = self
            .nodes
            .get(&port.node)
            .ok_or_else(|| GraphError::NodeNotFound(port.node.clone()))?;
        node.port(direction, port.port)
            .map(|p| p.tag)
            .ok_or_else(|| GraphError::PortOutOfRange {
                node: port.node.clone(),
                direction,
                index: port.port,
            })
    }

    fn attach(
        &mut self,
        port: &PortRef,
        direction: PortDirection,
        link: &LinkId,
    ) -> Result<(), GraphError> {
        let slot = self
            .nodes
            .get_mut(&port.node)
            .and_then(|n| n.port_mut(direction, port.port))
            .ok_or_else(|| GraphError::PortOutOfRange {
                node: port.node.clone(),
                direction,
                index: port.port,
            })?;
        slot.links.push(link.clone());
        Ok(())
    }

    /// Check the cross-reference invariants: every link named by a port
    /// exists and ends at that port, and every link is attached to exactly
    /// one output port and one input port.
    pub fn validate(&self) -> Result<(), GraphError> {
        let mut attachments: HashMap<&str, (usize, usize)> = HashMap::new();

        for node in self.nodes.values() {
            for port in node.ports() {
                for link_id in &port.links {
                    let link =
                        self.links
                            .get(link_id)
                            .ok_or_else(|| GraphError::DanglingLink {
                                link: link_id.clone(),
                                detail: format!(
                                    "referenced by {} port {} but not in graph",
                                    port.direction,
                                    port.port_ref()
                                ),
                            })?;
                    let end = match port.direction {
                        PortDirection::Output => &link.source,
                        PortDirection::Input => &link.target,
                    };
                    if *end != port.port_ref() {
                        return Err(GraphError::DanglingLink {
                            link: link_id.clone(),
                            detail: format!("attached to {} but ends at {end}", port.port_ref()),
                        });
                    }
                    let counts = attachments.entry(link_id.as_str()).or_default();
                    match port.direction {
                        PortDirection::Output => counts.0 += 1,
                        PortDirection::Input => counts.1 += 1,
                    }
                }
            }
        }

        for id in self.links.keys() {
            let (outs, ins) = attachments.get(id.as_str()).copied().unwrap_or_default();
            if outs != 1 || ins != 1 {
                return Err(GraphError::DanglingLink {
                    link: id.clone(),
                    detail: format!("attached to {outs} output and {ins} input ports"),
                });
            }
        }
        Ok(())
    }
}
