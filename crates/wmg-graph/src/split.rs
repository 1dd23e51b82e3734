//! Partitioning a graph by an edge attribute.

use std::collections::{BTreeMap, HashSet};

use wmg_core::NodeId;

use crate::attrs::{Component, EdgeAttrs};
use crate::backend::GraphBackend;
use crate::error::GraphError;

type EdgeList = Vec<(NodeId, NodeId, EdgeAttrs)>;

/// Split a graph into sub-graphs keyed by the value of an edge attribute.
///
/// Each sub-graph holds the edges carrying that value plus the nodes they
/// touch, with the parent's node attributes. Edges without the attribute are
/// left out. Fails when no edge carries the attribute at all.
pub fn split_graph_by_edge_attribute<G: GraphBackend>(
    graph: &G,
    attribute: &str,
) -> Result<BTreeMap<String, G>, GraphError> {
    let mut groups: BTreeMap<String, EdgeList> = BTreeMap::new();
    for (source, target, attrs) in graph.edges() {
        if let Some(value) = attrs.get(attribute) {
            groups
                .entry(value.to_string())
                .or_default()
                .push((source, target, *attrs));
        }
    }

    if groups.is_empty() {
        return Err(GraphError::MissingEdgeAttribute {
            attribute: attribute.to_string(),
        });
    }

    let mut parts = BTreeMap::new();
    for (value, edges) in groups {
        parts.insert(value, subgraph_from_edges(graph, edges)?);
    }
    Ok(parts)
}

/// Typed variant of [`split_graph_by_edge_attribute`] for the `component` tag.
pub fn split_by_component<G: GraphBackend>(
    graph: &G,
) -> Result<BTreeMap<Component, G>, GraphError> {
    let mut groups: BTreeMap<Component, EdgeList> = BTreeMap::new();
    for (source, target, attrs) in graph.edges() {
        groups
            .entry(attrs.component)
            .or_default()
            .push((source, target, *attrs));
    }

    let mut parts = BTreeMap::new();
    for (component, edges) in groups {
        parts.insert(component, subgraph_from_edges(graph, edges)?);
    }
    Ok(parts)
}

fn subgraph_from_edges<G: GraphBackend>(parent: &G, edges: EdgeList) -> Result<G, GraphError> {
    let touched: HashSet<NodeId> = edges.iter().flat_map(|(s, t, _)| [*s, *t]).collect();

    let mut out = parent.empty_like();
    for (id, attrs) in parent.nodes() {
        if touched.contains(&id) {
            out.add_node(id, *attrs);
        }
    }
    for (source, target, attrs) in edges {
        out.add_edge(source, target, attrs)?;
    }
    Ok(out)
}
