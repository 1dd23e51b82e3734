//! Assembly of grid nodes, mesh nodes and the three edge sets into one graph.

use wmg_core::{WmgError, WmgResult};
use wmg_graph::{Component, Edge, GraphBackend, NodeArena, NodeAttrs, NodeKey};

use crate::connectivity::{
    ConnectOptions, ConnectivityStrategy, NodeSet, connect_nodes_across_graphs,
};
use crate::grid::GridCoords;
use crate::kwargs::ConnectivityKwargs;
use crate::m2m::{M2mConnectivity, MeshEdgeBuilder};

/// The strategies used for each of the three graph components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphComponentsConfig {
    pub m2m: M2mConnectivity,
    pub g2m: ConnectivityStrategy,
    pub m2g: ConnectivityStrategy,
}

impl GraphComponentsConfig {
    /// Parse all three strategies from method names and keyword arguments.
    pub fn from_names(
        m2m: (&str, &ConnectivityKwargs),
        g2m: (&str, &ConnectivityKwargs),
        m2g: (&str, &ConnectivityKwargs),
    ) -> WmgResult<Self> {
        let config = Self {
            m2m: M2mConnectivity::from_name(m2m.0, m2m.1)?,
            g2m: ConnectivityStrategy::from_name(g2m.0, g2m.1)?,
            m2g: ConnectivityStrategy::from_name(m2g.0, m2g.1)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> WmgResult<()> {
        self.m2m.validate()?;
        self.g2m.validate_for(Component::G2m)?;
        self.m2g.validate_for(Component::M2g)
    }
}

/// Builds complete graphs from a [`GraphComponentsConfig`].
#[derive(Debug, Clone, Copy)]
pub struct GraphAssembler {
    config: GraphComponentsConfig,
}

impl GraphAssembler {
    /// Fails if the configuration is invalid, before anything is built.
    pub fn new(config: GraphComponentsConfig) -> WmgResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GraphComponentsConfig {
        &self.config
    }

    /// Build the graph for `xy` on backend `G`.
    ///
    /// Grid nodes take ids `0..Nx*Ny` in grid order; mesh nodes follow.
    pub fn assemble<G: GraphBackend>(&self, xy: &GridCoords) -> WmgResult<G> {
        let GraphComponentsConfig { m2m, g2m, m2g } = self.config;
        let topology = MeshEdgeBuilder::new(m2m).build(xy)?;

        let mut arena = NodeArena::new();
        let mut grid = NodeSet::with_capacity(xy.len());
        for (i, j, pos) in xy.points() {
            let id = arena.add(NodeKey::Grid { i, j }, NodeAttrs::grid(pos))?;
            grid.push(id, pos);
        }

        let mut mesh_ids = Vec::with_capacity(topology.nodes.len());
        for node in &topology.nodes {
            mesh_ids.push(arena.add(node.key, NodeAttrs::mesh(node.pos, node.level))?);
        }

        let m2m_edges: Vec<Edge> = topology
            .links
            .iter()
            .map(|link| {
                let source = &topology.nodes[link.source];
                let target = &topology.nodes[link.target];
                Edge::new(
                    mesh_ids[link.source],
                    mesh_ids[link.target],
                    link.attrs(source.pos, target.pos),
                )
            })
            .collect();

        let mut bottom = NodeSet::with_capacity(topology.bottom.len());
        for &n in &topology.bottom {
            bottom.push(mesh_ids[n], topology.nodes[n].pos);
        }

        let options = ConnectOptions::new(topology.spacing);
        let g2m_edges =
            connect_nodes_across_graphs(&grid, &bottom, &g2m, Component::G2m, &options)?;
        let m2g_edges =
            connect_nodes_across_graphs(&bottom, &grid, &m2g, Component::M2g, &options)?;

        let expected = m2m_edges.len() + g2m_edges.len() + m2g_edges.len();
        tracing::info!(
            m2m = m2m.name(),
            g2m = g2m.name(),
            m2g = m2g.name(),
            num_grid_nodes = grid.len(),
            num_mesh_nodes = mesh_ids.len(),
            num_mesh_levels = topology.num_levels,
            num_m2m_edges = m2m_edges.len(),
            num_g2m_edges = g2m_edges.len(),
            num_m2g_edges = m2g_edges.len(),
            "assembling graph"
        );

        let graph: G = arena.build(m2m_edges.into_iter().chain(g2m_edges).chain(m2g_edges))?;
        // components join disjoint node kinds, so no edge may have been merged
        if graph.edge_count() != expected {
            return Err(WmgError::Invariant {
                what: format!(
                    "assembled {} edges but generated {}",
                    graph.edge_count(),
                    expected
                ),
            });
        }
        Ok(graph)
    }
}

/// Build a graph with all three components from named connectivity methods.
///
/// `m2m_connectivity` is one of `flat`, `flat_multiscale` or `hierarchical`;
/// `g2m_connectivity` and `m2g_connectivity` are one of `nearest_neighbour`,
/// `nearest_neighbours`, `within_radius` or `containing_rectangle` (m2g only).
pub fn create_all_graph_components<G: GraphBackend>(
    xy: &GridCoords,
    m2m_connectivity: &str,
    m2m_connectivity_kwargs: &ConnectivityKwargs,
    g2m_connectivity: &str,
    g2m_connectivity_kwargs: &ConnectivityKwargs,
    m2g_connectivity: &str,
    m2g_connectivity_kwargs: &ConnectivityKwargs,
) -> WmgResult<G> {
    let config = GraphComponentsConfig::from_names(
        (m2m_connectivity, m2m_connectivity_kwargs),
        (g2m_connectivity, g2m_connectivity_kwargs),
        (m2g_connectivity, m2g_connectivity_kwargs),
    )?;
    GraphAssembler::new(config)?.assemble(xy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectivity::Radius;
    use crate::levels::RefinementParams;
    use wmg_graph::{AdjacencyGraph, NodeKind};

    fn keisler_like() -> GraphComponentsConfig {
        GraphComponentsConfig {
            m2m: M2mConnectivity::Flat {
                grid_refinement_factor: 2,
            },
            g2m: ConnectivityStrategy::WithinRadius(Radius::Relative(0.51)),
            m2g: ConnectivityStrategy::NearestNeighbours {
                max_num_neighbours: 4,
            },
        }
    }

    #[test]
    fn grid_nodes_come_first() {
        let xy = GridCoords::unit_square(8, 8).unwrap();
        let graph: AdjacencyGraph = GraphAssembler::new(keisler_like())
            .unwrap()
            .assemble(&xy)
            .unwrap();
        assert_eq!(graph.node_count(), 64 + 16);
        let kinds: Vec<NodeKind> = graph.nodes().map(|(_, a)| a.kind).collect();
        assert!(kinds[..64].iter().all(|&k| k == NodeKind::Grid));
        assert!(kinds[64..].iter().all(|&k| k == NodeKind::Mesh));
        let first = graph.nodes().next().map(|(id, _)| id.index());
        assert_eq!(first, Some(0));
    }

    #[test]
    fn m2g_gives_every_grid_node_k_edges() {
        let xy = GridCoords::unit_square(8, 8).unwrap();
        let graph: AdjacencyGraph = GraphAssembler::new(keisler_like())
            .unwrap()
            .assemble(&xy)
            .unwrap();
        let m2g_in: Vec<usize> = graph
            .nodes()
            .filter(|(_, a)| a.kind == NodeKind::Grid)
            .map(|(id, _)| {
                graph
                    .edges()
                    .filter(|(_, t, a)| *t == id && a.component == Component::M2g)
                    .count()
            })
            .collect();
        assert!(m2g_in.iter().all(|&n| n == 4));
    }

    #[test]
    fn config_errors_surface_before_building() {
        let config = GraphComponentsConfig {
            g2m: ConnectivityStrategy::ContainingRectangle,
            ..keisler_like()
        };
        assert!(matches!(
            GraphAssembler::new(config),
            Err(WmgError::ConnectivityConfig { .. })
        ));

        let config = GraphComponentsConfig {
            m2m: M2mConnectivity::Hierarchical(RefinementParams {
                level_refinement_factor: 0,
                ..RefinementParams::default()
            }),
            ..keisler_like()
        };
        assert!(GraphAssembler::new(config).is_err());
    }

    #[test]
    fn named_components() {
        let xy = GridCoords::unit_square(9, 9).unwrap();
        let graph: AdjacencyGraph = create_all_graph_components(
            &xy,
            "flat",
            &ConnectivityKwargs::new().grid_refinement_factor(3),
            "nearest_neighbour",
            &ConnectivityKwargs::new(),
            "containing_rectangle",
            &ConnectivityKwargs::new(),
        )
        .unwrap();
        // each of the 9 mesh nodes receives from exactly one grid node
        let g2m = graph
            .edges()
            .filter(|(_, _, a)| a.component == Component::G2m)
            .count();
        assert_eq!(g2m, 9);

        let err = create_all_graph_components::<AdjacencyGraph>(
            &xy,
            "flat",
            &ConnectivityKwargs::new().grid_refinement_factor(3),
            "nearest_neighbour",
            &ConnectivityKwargs::new(),
            "voronoi",
            &ConnectivityKwargs::new(),
        )
        .unwrap_err();
        assert!(matches!(err, WmgError::UnsupportedComponent { .. }));
    }
}
