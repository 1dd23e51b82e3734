//! Default in-memory graph: insertion-ordered node table plus per-node
//! outgoing adjacency lists.

use std::collections::HashMap;

use wmg_core::NodeId;

use crate::attrs::{EdgeAttrs, NodeAttrs};
use crate::backend::GraphBackend;
use crate::error::GraphError;

/// Directed graph stored as adjacency lists.
///
/// The graph stores:
/// - All nodes in a vector, in insertion order, with a reverse lookup table.
/// - For each node, its outgoing edges in insertion order.
#[derive(Debug, Clone, Default)]
pub struct AdjacencyGraph {
    nodes: Vec<(NodeId, NodeAttrs)>,
    slots: HashMap<NodeId, usize>,
    /// Outgoing edges, parallel to `nodes`.
    succ: Vec<Vec<(NodeId, EdgeAttrs)>>,
    edge_count: usize,
}

impl AdjacencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outgoing edges of a node (empty for unknown ids).
    pub fn successors(&self, id: NodeId) -> &[(NodeId, EdgeAttrs)] {
        match self.slots.get(&id) {
            Some(&slot) => &self.succ[slot],
            None => &[],
        }
    }
}

impl GraphBackend for AdjacencyGraph {
    fn add_node(&mut self, id: NodeId, attrs: NodeAttrs) {
        match self.slots.get(&id) {
            Some(&slot) => self.nodes[slot].1 = attrs,
            None => {
                self.slots.insert(id, self.nodes.len());
                self.nodes.push((id, attrs));
                self.succ.push(Vec::new());
            }
        }
    }

    fn add_edge(
        &mut self,
        source: NodeId,
        target: NodeId,
        attrs: EdgeAttrs,
    ) -> Result<(), GraphError> {
        let missing = |node| GraphError::MissingEndpoint {
            source,
            target,
            missing: node,
        };
        let slot = *self.slots.get(&source).ok_or_else(|| missing(source))?;
        if !self.slots.contains_key(&target) {
            return Err(missing(target));
        }

        let out = &mut self.succ[slot];
        match out.iter_mut().find(|(t, _)| *t == target) {
            Some(existing) => existing.1 = attrs,
            None => {
                out.push((target, attrs));
                self.edge_count += 1;
            }
        }
        Ok(())
    }

    fn node(&self, id: NodeId) -> Option<&NodeAttrs> {
        self.slots.get(&id).map(|&slot| &self.nodes[slot].1)
    }

    fn edge(&self, source: NodeId, target: NodeId) -> Option<&EdgeAttrs> {
        self.successors(source)
            .iter()
            .find(|(t, _)| *t == target)
            .map(|(_, attrs)| attrs)
    }

    fn nodes(&self) -> impl Iterator<Item = (NodeId, &NodeAttrs)> + '_ {
        self.nodes.iter().map(|(id, attrs)| (*id, attrs))
    }

    fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId, &EdgeAttrs)> + '_ {
        self.nodes
            .iter()
            .zip(&self.succ)
            .flat_map(|((source, _), out)| out.iter().map(move |(t, a)| (*source, *t, a)))
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn edge_count(&self) -> usize {
        self.edge_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attrs::Component;
    use wmg_core::{Id, Point};

    fn two_nodes() -> AdjacencyGraph {
        let mut g = AdjacencyGraph::new();
        g.add_node(Id::from_index(5), NodeAttrs::grid(Point::new(0.0, 0.0)));
        g.add_node(Id::from_index(2), NodeAttrs::mesh(Point::new(1.0, 0.0), 1));
        g
    }

    #[test]
    fn insertion_order_is_kept() {
        let g = two_nodes();
        let ids: Vec<u32> = g.nodes().map(|(id, _)| id.index()).collect();
        assert_eq!(ids, vec![5, 2]);
    }

    #[test]
    fn edge_replaces_attributes() {
        let mut g = two_nodes();
        let (a, b) = (Id::from_index(5), Id::from_index(2));
        let pa = Point::new(0.0, 0.0);
        let pb = Point::new(1.0, 0.0);
        g.add_edge(a, b, EdgeAttrs::between(Component::G2m, pa, pb)).unwrap();
        g.add_edge(a, b, EdgeAttrs::between(Component::M2m, pa, pb)).unwrap();
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.edge(a, b).unwrap().component, Component::M2m);
        assert!(g.edge(b, a).is_none());
        assert_eq!(g.successors(a).len(), 1);
    }

    #[test]
    fn edge_to_unknown_node_fails() {
        let mut g = two_nodes();
        let attrs = EdgeAttrs::between(Component::G2m, Point::new(0.0, 0.0), Point::new(1.0, 0.0));
        let err = g
            .add_edge(Id::from_index(5), Id::from_index(9), attrs)
            .unwrap_err();
        assert_eq!(
            err,
            GraphError::MissingEndpoint {
                source: Id::from_index(5),
                target: Id::from_index(9),
                missing: Id::from_index(9),
            }
        );
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn node_update_keeps_slot() {
        let mut g = two_nodes();
        g.add_node(Id::from_index(5), NodeAttrs::grid(Point::new(3.0, 3.0)));
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.node(Id::from_index(5)).unwrap().pos, Point::new(3.0, 3.0));
    }
}
