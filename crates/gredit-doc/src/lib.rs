//! Graph description documents for the gredit graph compiler.
//!
//! The editor saves a pipeline as a list of nodes (each naming its kernel)
//! and a list of links between numbered ports:
//!
//! ```text
//! {
//!   "nodes": [
//!     { "id": "in1",  "kernel": "IMAGE" },
//!     { "id": "blur", "kernel": "GAUSSIAN_3x3" },
//!     { "id": "out1", "kernel": "IMAGE" }
//!   ],
//!   "links": [
//!     { "id": "l1", "from": { "node": "in1",  "port": 0 }, "to": { "node": "blur", "port": 0 } },
//!     { "id": "l2", "from": { "node": "blur", "port": 0 }, "to": { "node": "out1", "port": 0 } }
//!   ]
//! }
//! ```
//!
//! Nodes using a builtin data kernel (`IMAGE`, `BUFFER`, `SCALAR`) become
//! data nodes; every other kernel must exist in the registry.

mod format;

pub use format::{DocError, GraphDocument, LinkEntry, NodeEntry};
