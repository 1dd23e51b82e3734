//! The graph capability every construction step is written against.

use core::fmt;
use std::collections::{HashMap, HashSet};

use wmg_core::NodeId;

use crate::attrs::{Edge, EdgeAttrs, NodeAttrs};
use crate::error::GraphError;

/// Minimal directed-graph capability.
///
/// At most one edge exists per ordered node pair; adding `u -> v` again
/// replaces its attributes. Nodes and edges iterate in insertion order, edges
/// grouped by source node.
pub trait GraphBackend: Default + Clone + fmt::Debug {
    /// Insert a node, or replace the attributes of an existing one.
    fn add_node(&mut self, id: NodeId, attrs: NodeAttrs);

    /// Insert a directed edge between two existing nodes.
    fn add_edge(&mut self, source: NodeId, target: NodeId, attrs: EdgeAttrs)
    -> Result<(), GraphError>;

    fn node(&self, id: NodeId) -> Option<&NodeAttrs>;

    fn edge(&self, source: NodeId, target: NodeId) -> Option<&EdgeAttrs>;

    fn nodes(&self) -> impl Iterator<Item = (NodeId, &NodeAttrs)> + '_;

    fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId, &EdgeAttrs)> + '_;

    fn node_count(&self) -> usize;

    /// An empty graph on the same engine as `self`.
    fn empty_like(&self) -> Self {
        Self::default()
    }

    fn edge_count(&self) -> usize;

    fn contains_node(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    fn has_edges(&self) -> bool {
        self.edge_count() > 0
    }

    fn insert(&mut self, edge: Edge) -> Result<(), GraphError> {
        self.add_edge(edge.source, edge.target, edge.attrs)
    }

    fn in_degrees(&self) -> HashMap<NodeId, usize> {
        let mut degrees: HashMap<NodeId, usize> = self.nodes().map(|(id, _)| (id, 0)).collect();
        for (_, target, _) in self.edges() {
            *degrees.entry(target).or_default() += 1;
        }
        degrees
    }

    /// Copy of the graph with every node id passed through `mapping`.
    ///
    /// Nodes mapped onto the same id are merged; later attributes win.
    fn relabel_nodes<F>(&self, mapping: F) -> Result<Self, GraphError>
    where
        F: Fn(NodeId) -> NodeId,
    {
        let mut out = self.empty_like();
        for (id, attrs) in self.nodes() {
            out.add_node(mapping(id), *attrs);
        }
        for (source, target, attrs) in self.edges() {
            out.add_edge(mapping(source), mapping(target), *attrs)?;
        }
        Ok(out)
    }

    /// Relabel with an explicit table; ids absent from the table keep their label.
    fn relabel_with(&self, mapping: &HashMap<NodeId, NodeId>) -> Result<Self, GraphError> {
        self.relabel_nodes(|id| mapping.get(&id).copied().unwrap_or(id))
    }

    /// Union of two graphs; attributes from `other` win on collisions.
    fn compose(&self, other: &Self) -> Result<Self, GraphError> {
        compose_all([self, other])
    }

    /// Sub-graph of the edges accepted by `keep` and the nodes they touch.
    fn edge_subgraph<F>(&self, keep: F) -> Result<Self, GraphError>
    where
        F: Fn(NodeId, NodeId, &EdgeAttrs) -> bool,
    {
        let kept: Vec<(NodeId, NodeId, EdgeAttrs)> = self
            .edges()
            .filter(|(s, t, a)| keep(*s, *t, *a))
            .map(|(s, t, a)| (s, t, *a))
            .collect();

        let touched: HashSet<NodeId> = kept.iter().flat_map(|(s, t, _)| [*s, *t]).collect();

        let mut out = self.empty_like();
        // keep the parent's node order
        for (id, attrs) in self.nodes() {
            if touched.contains(&id) {
                out.add_node(id, *attrs);
            }
        }
        for (source, target, attrs) in kept {
            out.add_edge(source, target, attrs)?;
        }
        Ok(out)
    }
}

/// Union of any number of graphs; later graphs win on attribute collisions.
pub fn compose_all<'a, G, I>(graphs: I) -> Result<G, GraphError>
where
    G: GraphBackend + 'a,
    I: IntoIterator<Item = &'a G>,
{
    let graphs: Vec<&G> = graphs.into_iter().collect();
    let mut out = graphs.first().map_or_else(G::default, |g| g.empty_like());
    for graph in &graphs {
        for (id, attrs) in graph.nodes() {
            out.add_node(id, *attrs);
        }
    }
    for graph in &graphs {
        for (source, target, attrs) in graph.edges() {
            out.add_edge(source, target, *attrs)?;
        }
    }
    Ok(out)
}
