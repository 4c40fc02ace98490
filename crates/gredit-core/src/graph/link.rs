//! Links: directed edges from an output port to an input port.

use std::fmt;

use super::port::PortRef;
use crate::kernel::Tag;

/// Unique link identifier, shared namespace with node identifiers.
pub type LinkId = String;

/// A directed edge in the dataflow graph.
///
/// The value produced at `source` (an output port) is consumed at `target`
/// (an input port).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id: LinkId,
    pub source: PortRef,
    pub target: PortRef,
    /// Tag of the value carried; both endpoints share it.
    pub tag: Tag,
}

impl Link {
    pub fn new(id: impl Into<LinkId>, source: PortRef, target: PortRef, tag: Tag) -> Self {
        Self {
            id: id.into(),
            source,
            target,
            tag,
        }
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Link({}: {} -> {})", self.id, self.source, self.target)
    }
}
