//! Function-node scheduling: repeated-pass topological ordering.

use std::collections::HashSet;

use gredit_core::graph::node::{Node, NodeId};
use gredit_core::graph::Graph;

use crate::error::CodegenError;

/// Order `pending` so that every node comes after the nodes feeding it.
///
/// Each pass walks the remaining nodes in their current order and moves every
/// ready node (see [`Node::is_ready`]) to the output, marking it in `printed`
/// as it goes. Ties keep their original order. A pass that moves nothing while
/// nodes remain means the remaining nodes depend on each other, which is
/// reported as [`CodegenError::CyclicGraph`].
pub fn schedule<'g>(
    graph: &'g Graph,
    mut pending: Vec<&'g Node>,
    printed: &mut HashSet<NodeId>,
) -> Result<Vec<&'g Node>, CodegenError> {
    let mut order = Vec::with_capacity(pending.len());
    let mut pass = 0usize;

    while !pending.is_empty() {
        pass += 1;
        let before = order.len();
        pending.retain(|&node| {
            if node.is_ready(graph, printed) {
                printed.insert(node.id.clone());
                order.push(node);
                false
            } else {
                true
            }
        });

        let moved = order.len() - before;
        tracing::debug!(pass, moved, remaining = pending.len(), "scheduling pass");
        if moved == 0 {
            return Err(CodegenError::CyclicGraph {
                nodes: pending.iter().map(|n| n.id.clone()).collect(),
            });
        }
    }
    Ok(order)
}

/// Schedule every function node of `graph`, treating all data nodes as
/// already printed.
pub fn function_order(graph: &Graph) -> Result<Vec<&Node>, CodegenError> {
    let mut printed: HashSet<NodeId> = graph
        .nodes()
        .filter(|n| n.is_data())
        .map(|n| n.id.clone())
        .collect();
    let functions = graph.nodes().filter(|n| n.is_function()).collect();
    schedule(graph, functions, &mut printed)
}
