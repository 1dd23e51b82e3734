//! Stable, contiguous indexing for downstream consumers.
//!
//! Provides bidirectional mappings between node IDs and contiguous indices
//! (0..N), edge-index arrays, and the relabel/sort helpers built on them.

use std::cmp::Ordering;
use std::collections::HashMap;

use wmg_core::{Id, NodeId};

use crate::attrs::AttrValue;
use crate::backend::GraphBackend;
use crate::error::GraphError;

/// Index map providing stable, contiguous indices for graph nodes.
///
/// Indices follow the graph's node iteration order. Provides O(1)
/// bidirectional lookup between IDs and indices.
#[derive(Debug, Clone)]
pub struct IndexMap {
    /// Contiguous list of node IDs (index -> NodeId).
    node_ids: Vec<NodeId>,

    /// Reverse lookup: NodeId -> index.
    node_to_idx: HashMap<NodeId, usize>,
}

impl IndexMap {
    /// Build an index map from a graph.
    pub fn from_graph<G: GraphBackend>(graph: &G) -> Self {
        let node_ids: Vec<NodeId> = graph.nodes().map(|(id, _)| id).collect();
        let node_to_idx = node_ids.iter().enumerate().map(|(i, &id)| (id, i)).collect();
        Self {
            node_ids,
            node_to_idx,
        }
    }

    /// Number of nodes in the index.
    pub fn node_count(&self) -> usize {
        self.node_ids.len()
    }

    /// Get the contiguous index for a node ID.
    pub fn node_idx(&self, id: NodeId) -> Result<usize, GraphError> {
        self.node_to_idx
            .get(&id)
            .copied()
            .ok_or(GraphError::IdNotFound { what: "NodeId" })
    }

    /// Get the node ID for a contiguous index (panics if out of bounds).
    pub fn node_id(&self, i: usize) -> NodeId {
        self.node_ids[i]
    }

    /// All node IDs in index order.
    pub fn node_ids(&self) -> &[NodeId] {
        &self.node_ids
    }

    /// `[sources, targets]` in contiguous indices, in the graph's edge order.
    pub fn edge_index<G: GraphBackend>(&self, graph: &G) -> Result<[Vec<usize>; 2], GraphError> {
        let mut sources = Vec::with_capacity(graph.edge_count());
        let mut targets = Vec::with_capacity(graph.edge_count());
        for (source, target, _) in graph.edges() {
            sources.push(self.node_idx(source)?);
            targets.push(self.node_idx(target)?);
        }
        Ok([sources, targets])
    }
}

/// Relabel nodes with contiguous ids `0..N` in node iteration order.
pub fn replace_node_labels_with_unique_ids<G: GraphBackend>(graph: &G) -> Result<G, GraphError> {
    let index = IndexMap::from_graph(graph);
    let mapping: HashMap<NodeId, NodeId> = index
        .node_ids()
        .iter()
        .enumerate()
        .map(|(i, &id)| (id, Id::from_index(i as u32)))
        .collect();
    graph.relabel_with(&mapping)
}

/// Rebuild the graph with nodes (and optionally edges) inserted in sorted
/// order, so that iteration order matches the sort.
///
/// Nodes are ordered by `node_attribute` when given, by id otherwise; edges
/// are ordered by `edge_attribute` when given and keep their order otherwise.
/// Ties keep the original relative order.
pub fn sort_nodes_internally<G: GraphBackend>(
    graph: &G,
    node_attribute: Option<&str>,
    edge_attribute: Option<&str>,
) -> Result<G, GraphError> {
    let mut nodes: Vec<_> = graph.nodes().map(|(id, attrs)| (id, *attrs)).collect();
    match node_attribute {
        Some(name) => {
            let mut keyed = Vec::with_capacity(nodes.len());
            for (id, attrs) in nodes {
                let key = attrs.get(name).ok_or_else(|| GraphError::MissingNodeAttribute {
                    node: id,
                    attribute: name.to_string(),
                })?;
                keyed.push((key, id, attrs));
            }
            keyed.sort_by(|a, b| compare_values(&a.0, &b.0));
            nodes = keyed.into_iter().map(|(_, id, attrs)| (id, attrs)).collect();
        }
        None => nodes.sort_by_key(|(id, _)| *id),
    }

    let mut edges: Vec<_> = graph.edges().map(|(s, t, a)| (s, t, *a)).collect();
    if let Some(name) = edge_attribute {
        if !edges.iter().all(|(_, _, a)| a.get(name).is_some()) {
            return Err(GraphError::MissingEdgeAttribute {
                attribute: name.to_string(),
            });
        }
        edges.sort_by(|a, b| match (a.2.get(name), b.2.get(name)) {
            (Some(x), Some(y)) => compare_values(&x, &y),
            _ => Ordering::Equal,
        });
    }

    let mut out = graph.empty_like();
    for (id, attrs) in nodes {
        out.add_node(id, attrs);
    }
    for (source, target, attrs) in edges {
        out.add_edge(source, target, attrs)?;
    }
    Ok(out)
}

/// Numbers compare numerically, everything else by its rendered text.
fn compare_values(a: &AttrValue, b: &AttrValue) -> Ordering {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        _ => a.to_string().cmp(&b.to_string()),
    }
}
