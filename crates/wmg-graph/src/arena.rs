//! Node arena: stable integer ids for grid and mesh nodes.

use core::fmt;
use std::collections::HashMap;

use wmg_core::{Id, NodeId};

use crate::attrs::{Edge, NodeAttrs};
use crate::backend::GraphBackend;
use crate::error::GraphError;
use crate::validate;

/// Lookup key of a node: its namespace plus lattice coordinates.
///
/// Grid and mesh keys can never collide, so neither can the ids the arena
/// hands out for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKey {
    Grid { i: usize, j: usize },
    Mesh { level: u32, i: usize, j: usize },
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKey::Grid { i, j } => write!(f, "grid({}, {})", i, j),
            NodeKey::Mesh { level, i, j } => write!(f, "mesh{}({}, {})", level, i, j),
        }
    }
}

/// Arena of nodes indexed by stable ids, with a key -> id lookup table.
///
/// Ids are handed out contiguously in insertion order. Use `add` while
/// placing nodes, resolve edge endpoints through `id`, then call `build()`
/// to validate and materialise a graph on any backend.
#[derive(Debug, Default, Clone)]
pub struct NodeArena {
    nodes: Vec<(NodeKey, NodeAttrs)>,
    lookup: HashMap<NodeKey, NodeId>,
}

impl NodeArena {
    /// Create a new empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node under a fresh key and return its ID.
    pub fn add(&mut self, key: NodeKey, attrs: NodeAttrs) -> Result<NodeId, GraphError> {
        if self.lookup.contains_key(&key) {
            return Err(GraphError::DuplicateKey { key });
        }
        let id = Id::from_usize(self.nodes.len()).ok_or(GraphError::IdSpaceExhausted {
            len: self.nodes.len(),
        })?;
        self.nodes.push((key, attrs));
        self.lookup.insert(key, id);
        Ok(id)
    }

    /// Id previously assigned to `key`.
    pub fn id(&self, key: NodeKey) -> Option<NodeId> {
        self.lookup.get(&key).copied()
    }

    pub fn attrs(&self, id: NodeId) -> Option<&NodeAttrs> {
        self.nodes.get(id.index() as usize).map(|(_, attrs)| attrs)
    }

    pub fn key(&self, id: NodeId) -> Option<NodeKey> {
        self.nodes.get(id.index() as usize).map(|(key, _)| *key)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, NodeKey, &NodeAttrs)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, (key, attrs))| (Id::from_index(i as u32), *key, attrs))
    }

    /// Materialise every node plus the given edges, then validate the result.
    pub fn build<G, I>(&self, edges: I) -> Result<G, GraphError>
    where
        G: GraphBackend,
        I: IntoIterator<Item = Edge>,
    {
        let mut graph = G::default();
        for (id, _, attrs) in self.iter() {
            graph.add_node(id, *attrs);
        }
        for edge in edges {
            graph.insert(edge)?;
        }
        validate::validate_graph(&graph)?;

        tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "graph materialised from arena"
        );
        Ok(graph)
    }
}
