//! Graph validation logic.

use std::collections::{BTreeMap, HashSet};

use wmg_core::NodeId;

use crate::backend::GraphBackend;
use crate::error::GraphError;

/// Validate the graph structure: finite positions, edge endpoints exist.
pub fn validate_graph<G: GraphBackend>(graph: &G) -> Result<(), GraphError> {
    // Every node carries a usable position
    for (id, attrs) in graph.nodes() {
        if !attrs.pos.is_finite() {
            return Err(GraphError::NonFinitePosition { node: id });
        }
    }

    // Every edge endpoint must be a node
    for (source, target, _) in graph.edges() {
        for node in [source, target] {
            if !graph.contains_node(node) {
                return Err(GraphError::MissingEndpoint {
                    source,
                    target,
                    missing: node,
                });
            }
        }
    }

    Ok(())
}

/// Check that `parts` partitions the edges of `graph` exactly.
///
/// Every edge of every part must exist in `graph` with identical attributes,
/// no edge may appear in two parts, and together the parts must cover all
/// edges.
pub fn validate_partition<G: GraphBackend>(
    graph: &G,
    parts: &BTreeMap<String, G>,
) -> Result<(), GraphError> {
    let mut seen: HashSet<(NodeId, NodeId)> = HashSet::with_capacity(graph.edge_count());

    for part in parts.values() {
        for (source, target, attrs) in part.edges() {
            if graph.edge(source, target) != Some(attrs) || !seen.insert((source, target)) {
                return Err(GraphError::PartitionMismatch {
                    expected: graph.edge_count(),
                    actual: parts.values().map(|p| p.edge_count()).sum(),
                });
            }
        }
    }

    if seen.len() != graph.edge_count() {
        return Err(GraphError::PartitionMismatch {
            expected: graph.edge_count(),
            actual: seen.len(),
        });
    }

    Ok(())
}
