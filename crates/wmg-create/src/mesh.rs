//! Regular 2D mesh primitives.

use wmg_core::{WmgError, WmgResult};
use wmg_graph::{Component, Edge, EdgeAttrs, GraphBackend, NodeArena, NodeAttrs, NodeKey};

use crate::grid::GridCoords;
use crate::levels::{LevelHierarchyBuilder, MeshLevel, RefinementParams};

/// Offsets of the 8 lattice neighbours of a node.
const NEIGHBOUR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Directed links of the 8-neighbour lattice on an `nx x ny` level.
///
/// Every link appears in both directions. Indices are row-major, and links
/// are ordered by source index.
pub fn lattice_links(nx: usize, ny: usize) -> Vec<(usize, usize)> {
    let mut links = Vec::new();
    for i in 0..nx {
        for j in 0..ny {
            for (di, dj) in NEIGHBOUR_OFFSETS {
                let (Some(ni), Some(nj)) = (i.checked_add_signed(di), j.checked_add_signed(dj))
                else {
                    continue;
                };
                if ni < nx && nj < ny {
                    links.push((i * ny + j, ni * ny + nj));
                }
            }
        }
    }
    links
}

/// Graph of a single mesh level: nodes plus 8-neighbour lattice edges.
pub fn mesh_level_graph<G: GraphBackend>(level: &MeshLevel) -> WmgResult<G> {
    let mut arena = NodeArena::new();
    let mut ids = Vec::with_capacity(level.len());
    for (index, &pos) in level.positions.iter().enumerate() {
        let (i, j) = level.coords(index);
        let key = NodeKey::Mesh {
            level: level.level,
            i,
            j,
        };
        ids.push(arena.add(key, NodeAttrs::mesh(pos, level.level))?);
    }

    let edges = lattice_links(level.nx, level.ny).into_iter().map(|(a, b)| {
        let attrs = EdgeAttrs::between(Component::M2m, level.positions[a], level.positions[b])
            .with_level(level.level);
        Edge::new(ids[a], ids[b], attrs)
    });
    Ok(arena.build(edges)?)
}

/// A single `nx x ny` mesh level spanning the bounding rectangle of `xy`.
pub fn create_single_level_2d_mesh_graph<G: GraphBackend>(
    xy: &GridCoords,
    nx: usize,
    ny: usize,
) -> WmgResult<G> {
    if nx == 0 || ny == 0 {
        return Err(WmgError::InvalidArg {
            what: "mesh level needs at least one node along each axis",
        });
    }
    mesh_level_graph(&MeshLevel::new(1, xy.bounding_rectangle(), nx, ny))
}

/// One graph per level of the hierarchy for `xy`, finest first.
pub fn create_multirange_2d_mesh_graphs<G: GraphBackend>(
    xy: &GridCoords,
    params: &RefinementParams,
) -> WmgResult<Vec<G>> {
    LevelHierarchyBuilder::new(*params)
        .build(xy)?
        .iter()
        .map(mesh_level_graph::<G>)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wmg_graph::AdjacencyGraph;

    #[test]
    fn lattice_link_count() {
        // 2 * (horizontal + vertical) + 4 * cells
        let (nx, ny) = (5, 3);
        let expected = 2 * ((nx - 1) * ny + nx * (ny - 1)) + 4 * (nx - 1) * (ny - 1);
        assert_eq!(lattice_links(nx, ny).len(), expected);
        assert!(lattice_links(1, 1).is_empty());
        assert_eq!(lattice_links(1, 2), vec![(0, 1), (1, 0)]);
    }

    #[test]
    fn lattice_is_symmetric() {
        let links = lattice_links(4, 4);
        for &(a, b) in &links {
            assert_ne!(a, b);
            assert!(links.contains(&(b, a)));
        }
    }

    #[test]
    fn single_level_graph() {
        let xy = GridCoords::unit_square(4, 4).unwrap();
        let g: AdjacencyGraph = create_single_level_2d_mesh_graph(&xy, 5, 5).unwrap();
        assert_eq!(g.node_count(), 25);
        assert_eq!(g.edge_count(), 144);
        let bounds = xy.bounding_rectangle();
        assert!(g.nodes().all(|(_, a)| bounds.contains(a.pos)));
        assert!(g.edges().all(|(_, _, a)| a.level == Some(1)));

        let err = create_single_level_2d_mesh_graph::<AdjacencyGraph>(&xy, 0, 3).unwrap_err();
        assert!(matches!(err, WmgError::InvalidArg { .. }));
    }

    #[test]
    fn multirange_levels_shrink() {
        let xy = GridCoords::unit_square(18, 18).unwrap();
        let params = RefinementParams {
            grid_refinement_factor: 2,
            level_refinement_factor: 3,
            max_num_levels: None,
        };
        let graphs: Vec<AdjacencyGraph> = create_multirange_2d_mesh_graphs(&xy, &params).unwrap();
        let counts: Vec<usize> = graphs.iter().map(|g| g.node_count()).collect();
        assert_eq!(counts, vec![81, 9]);
        assert!(graphs[1].nodes().all(|(_, a)| a.level == 2));
    }
}
