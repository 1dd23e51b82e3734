//! Compact description of an assembled graph.

use std::collections::BTreeMap;

use serde::Serialize;
use wmg_core::Real;

use crate::attrs::NodeKind;
use crate::backend::GraphBackend;

/// Node and edge counts of a graph, broken down by kind, level and component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphSummary {
    pub num_nodes: usize,
    pub num_edges: usize,
    pub num_grid_nodes: usize,
    /// Mesh node count keyed by the nodes' `level` attribute.
    pub mesh_nodes_per_level: BTreeMap<u32, usize>,
    pub edges_per_component: BTreeMap<String, usize>,
    pub max_edge_len: Option<Real>,
}

impl GraphSummary {
    pub fn from_graph<G: GraphBackend>(graph: &G) -> Self {
        let mut num_grid_nodes = 0;
        let mut mesh_nodes_per_level = BTreeMap::new();
        for (_, attrs) in graph.nodes() {
            match attrs.kind {
                NodeKind::Grid => num_grid_nodes += 1,
                NodeKind::Mesh => *mesh_nodes_per_level.entry(attrs.level).or_insert(0) += 1,
            }
        }

        let mut edges_per_component = BTreeMap::new();
        let mut max_edge_len: Option<Real> = None;
        for (_, _, attrs) in graph.edges() {
            *edges_per_component
                .entry(attrs.component.to_string())
                .or_insert(0) += 1;
            max_edge_len = Some(max_edge_len.map_or(attrs.len, |m| m.max(attrs.len)));
        }

        Self {
            num_nodes: graph.node_count(),
            num_edges: graph.edge_count(),
            num_grid_nodes,
            mesh_nodes_per_level,
            edges_per_component,
            max_edge_len,
        }
    }

    pub fn num_mesh_nodes(&self) -> usize {
        self.mesh_nodes_per_level.values().sum()
    }

    /// Number of distinct mesh levels present.
    pub fn num_mesh_levels(&self) -> usize {
        self.mesh_nodes_per_level.len()
    }
}
