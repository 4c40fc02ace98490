//! JSON graph document model and conversion to and from [`Graph`].

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use gredit_core::{Graph, GraphBuilder, GraphError, KernelRegistry, PortRef};

/// Errors that can occur while loading, converting or saving a document.
#[derive(Debug, Error)]
pub enum DocError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid graph: {0}")]
    Graph(#[from] GraphError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// One node entry: identifier and kernel name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeEntry {
    pub id: String,
    pub kernel: String,
}

/// One link entry: identifier and the two port endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkEntry {
    pub id: String,
    pub from: PortRef,
    pub to: PortRef,
}

/// A serialized graph description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub nodes: Vec<NodeEntry>,
    #[serde(default)]
    pub links: Vec<LinkEntry>,
}

impl GraphDocument {
    /// Parse a document from a JSON string.
    pub fn parse(input: &str) -> Result<Self, DocError> {
        Self::parse_named(input, "<inline>")
    }

    /// Load a document from a JSON file.
    pub fn load(path: &Path) -> Result<Self, DocError> {
        let content = fs::read_to_string(path).map_err(|source| DocError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let doc = Self::parse_named(&content, &path.display().to_string())?;
        tracing::debug!(
            path = %path.display(),
            nodes = doc.nodes.len(),
            links = doc.links.len(),
            "loaded graph document"
        );
        Ok(doc)
    }

    fn parse_named(input: &str, origin: &str) -> Result<Self, DocError> {
        serde_json::from_str(input).map_err(|source| DocError::Parse {
            path: origin.to_string(),
            source,
        })
    }

    /// Build a validated graph, resolving kernels against `registry`.
    ///
    /// Nodes are inserted before links, each in document order, so the
    /// graph iterates in the order the editor saved.
    pub fn to_graph(&self, registry: &KernelRegistry) -> Result<Graph, DocError> {
        let mut builder = GraphBuilder::new(registry);
        for node in &self.nodes {
            builder.add_node(&node.id, &node.kernel)?;
        }
        for link in &self.links {
            builder.connect(&link.id, link.from.clone(), link.to.clone())?;
        }
        Ok(builder.build()?)
    }

    /// Describe an existing graph.
    pub fn from_graph(graph: &Graph) -> Self {
        let nodes = graph
            .nodes()
            .map(|node| NodeEntry {
                id: node.id.clone(),
                kernel: match (node.data_tag(), node.kernel()) {
                    (Some(tag), _) => tag.kernel_name().to_string(),
                    (None, Some(kernel)) => kernel.name.clone(),
                    (None, None) => String::new(),
                },
            })
            .collect();
        let links = graph
            .links()
            .map(|link| LinkEntry {
                id: link.id.clone(),
                from: link.source.clone(),
                to: link.target.clone(),
            })
            .collect();
        Self { nodes, links }
    }

    pub fn to_json(&self) -> Result<String, DocError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the document as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), DocError> {
        let json = self.to_json()?;
        fs::write(path, json).map_err(|source| DocError::Write {
            path: path.display().to_string(),
            source,
        })
    }
}
