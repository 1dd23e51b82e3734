//! Graph backend on top of `petgraph`.

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use wmg_core::NodeId;

use crate::attrs::{EdgeAttrs, NodeAttrs};
use crate::backend::GraphBackend;
use crate::error::GraphError;

/// Directed graph stored in a `petgraph::DiGraph`, keyed by `NodeId`.
#[derive(Debug, Clone, Default)]
pub struct PetGraph {
    inner: DiGraph<(NodeId, NodeAttrs), EdgeAttrs>,
    index: HashMap<NodeId, NodeIndex>,
}

impl PetGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the underlying petgraph structure, e.g. for its algorithms.
    pub fn inner(&self) -> &DiGraph<(NodeId, NodeAttrs), EdgeAttrs> {
        &self.inner
    }

    pub fn node_index(&self, id: NodeId) -> Option<NodeIndex> {
        self.index.get(&id).copied()
    }
}

impl GraphBackend for PetGraph {
    fn add_node(&mut self, id: NodeId, attrs: NodeAttrs) {
        match self.index.get(&id) {
            Some(&ix) => self.inner[ix].1 = attrs,
            None => {
                let ix = self.inner.add_node((id, attrs));
                self.index.insert(id, ix);
            }
        }
    }

    fn add_edge(
        &mut self,
        source: NodeId,
        target: NodeId,
        attrs: EdgeAttrs,
    ) -> Result<(), GraphError> {
        let lookup = |node: NodeId| {
            self.index
                .get(&node)
                .copied()
                .ok_or(GraphError::MissingEndpoint {
                    source,
                    target,
                    missing: node,
                })
        };
        let a = lookup(source)?;
        let b = lookup(target)?;
        self.inner.update_edge(a, b, attrs);
        Ok(())
    }

    fn node(&self, id: NodeId) -> Option<&NodeAttrs> {
        self.index.get(&id).map(|&ix| &self.inner[ix].1)
    }

    fn edge(&self, source: NodeId, target: NodeId) -> Option<&EdgeAttrs> {
        let a = self.node_index(source)?;
        let b = self.node_index(target)?;
        self.inner
            .find_edge(a, b)
            .and_then(|e| self.inner.edge_weight(e))
    }

    fn nodes(&self) -> impl Iterator<Item = (NodeId, &NodeAttrs)> + '_ {
        self.inner
            .node_indices()
            .map(move |ix| {
                let (id, attrs) = &self.inner[ix];
                (*id, attrs)
            })
    }

    fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId, &EdgeAttrs)> + '_ {
        // grouped by source to match the adjacency backend's order
        self.inner.node_indices().flat_map(move |ix| {
            let source = self.inner[ix].0;
            let mut out: Vec<_> = self.inner.edges(ix).collect();
            out.sort_by_key(|e| e.id());
            out.into_iter()
                .map(move |e| (source, self.inner[e.target()].0, e.weight()))
        })
    }

    fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }
}
