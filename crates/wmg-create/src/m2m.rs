//! Mesh-to-mesh topology: mesh nodes across levels and the links between them.

use std::collections::{BTreeSet, HashMap};

use wmg_core::{Point, WmgError, WmgResult};
use wmg_graph::{Component, Direction, EdgeAttrs, NodeKey};

use crate::connectivity::ConnectivityStrategy;
use crate::grid::{GeometryIndex, GridCoords};
use crate::kwargs::ConnectivityKwargs;
use crate::levels::{LevelHierarchyBuilder, MeshLevel, MeshSpacing, RefinementParams};
use crate::mesh::lattice_links;

/// Top-level strategy for wiring mesh nodes together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum M2mConnectivity {
    /// A single mesh level with 8-neighbour lattice edges.
    Flat { grid_refinement_factor: usize },
    /// Every level's lattice, merged onto the nodes of the finest level.
    FlatMultiscale(RefinementParams),
    /// Separate nodes per level, with up and down edges between neighbouring levels.
    Hierarchical(RefinementParams),
}

impl M2mConnectivity {
    pub const NAMES: [&'static str; 3] = ["flat", "flat_multiscale", "hierarchical"];

    pub fn name(&self) -> &'static str {
        match self {
            M2mConnectivity::Flat { .. } => "flat",
            M2mConnectivity::FlatMultiscale(_) => "flat_multiscale",
            M2mConnectivity::Hierarchical(_) => "hierarchical",
        }
    }

    /// Parse from a method name; `grid_refinement_factor` is required.
    pub fn from_name(name: &str, kwargs: &ConnectivityKwargs) -> WmgResult<Self> {
        const MULTI: [&str; 3] = [
            "grid_refinement_factor",
            "level_refinement_factor",
            "max_num_levels",
        ];
        let grid_refinement_factor = |kwargs: &ConnectivityKwargs| {
            kwargs
                .grid_refinement_factor
                .ok_or_else(|| WmgError::config(format!("{} needs grid_refinement_factor", name)))
        };
        let multi = |kwargs: &ConnectivityKwargs| -> WmgResult<RefinementParams> {
            kwargs.expect_only(name, &MULTI)?;
            let defaults = RefinementParams::default();
            Ok(RefinementParams {
                grid_refinement_factor: grid_refinement_factor(kwargs)?,
                level_refinement_factor: kwargs
                    .level_refinement_factor
                    .unwrap_or(defaults.level_refinement_factor),
                max_num_levels: kwargs.max_num_levels,
            })
        };

        let connectivity = match name {
            "flat" => {
                kwargs.expect_only(name, &MULTI[..1])?;
                M2mConnectivity::Flat {
                    grid_refinement_factor: grid_refinement_factor(kwargs)?,
                }
            }
            "flat_multiscale" => M2mConnectivity::FlatMultiscale(multi(kwargs)?),
            "hierarchical" => M2mConnectivity::Hierarchical(multi(kwargs)?),
            other => {
                return Err(WmgError::UnsupportedComponent {
                    kind: "m2m connectivity method",
                    name: other.to_string(),
                });
            }
        };
        connectivity.validate()?;
        Ok(connectivity)
    }

    /// Parameters of the level hierarchy this strategy builds on.
    pub fn refinement(&self) -> RefinementParams {
        match *self {
            M2mConnectivity::Flat {
                grid_refinement_factor,
            } => RefinementParams::single_level(grid_refinement_factor),
            M2mConnectivity::FlatMultiscale(params) | M2mConnectivity::Hierarchical(params) => {
                params
            }
        }
    }

    pub fn validate(&self) -> WmgResult<()> {
        self.refinement().validate()
    }
}

/// A mesh node before it is given a graph id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshNode {
    pub key: NodeKey,
    pub pos: Point,
    pub level: u32,
}

/// A directed link between two mesh nodes, by position in [`MeshTopology::nodes`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshLink {
    pub source: usize,
    pub target: usize,
    pub level: Option<u32>,
    pub direction: Option<Direction>,
    /// `(from, to)` levels of a cross-level link.
    pub levels: Option<(u32, u32)>,
}

impl MeshLink {
    fn within(source: usize, target: usize, level: u32) -> Self {
        Self {
            source,
            target,
            level: Some(level),
            direction: None,
            levels: None,
        }
    }

    /// Edge attributes for this link between the given positions.
    pub fn attrs(&self, source: Point, target: Point) -> EdgeAttrs {
        let mut attrs = EdgeAttrs::between(Component::M2m, source, target);
        attrs.level = self.level;
        attrs.direction = self.direction;
        if let Some((from, to)) = self.levels {
            attrs = attrs.with_levels(from, to);
        }
        attrs
    }
}

/// Mesh nodes and m2m links, ready to be placed into a graph.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshTopology {
    pub nodes: Vec<MeshNode>,
    pub links: Vec<MeshLink>,
    /// Nodes of the finest level, which connect to the grid.
    pub bottom: Vec<usize>,
    /// Spacing of the finest level.
    pub spacing: MeshSpacing,
    pub num_levels: usize,
}

/// Builds the mesh topology for an [`M2mConnectivity`].
#[derive(Debug, Clone, Copy)]
pub struct MeshEdgeBuilder {
    connectivity: M2mConnectivity,
}

impl MeshEdgeBuilder {
    pub fn new(connectivity: M2mConnectivity) -> Self {
        Self { connectivity }
    }

    /// Compute the level hierarchy for `grid` and wire it.
    pub fn build(&self, grid: &GridCoords) -> WmgResult<MeshTopology> {
        let levels = LevelHierarchyBuilder::new(self.connectivity.refinement()).build(grid)?;
        self.from_levels(&levels)
    }

    /// Wire precomputed levels, finest first.
    pub fn from_levels(&self, levels: &[MeshLevel]) -> WmgResult<MeshTopology> {
        let Some(finest) = levels.first() else {
            return Err(WmgError::Invariant {
                what: "mesh topology needs at least one level".to_string(),
            });
        };

        let topology = match self.connectivity {
            M2mConnectivity::Flat { .. } => flat(finest),
            M2mConnectivity::FlatMultiscale(_) => flat_multiscale(levels),
            M2mConnectivity::Hierarchical(_) => hierarchical(levels),
        };
        tracing::debug!(
            method = self.connectivity.name(),
            num_levels = topology.num_levels,
            num_nodes = topology.nodes.len(),
            num_links = topology.links.len(),
            "m2m topology built"
        );
        Ok(topology)
    }
}

fn level_nodes(level: &MeshLevel) -> impl Iterator<Item = MeshNode> + '_ {
    level.positions.iter().enumerate().map(|(index, &pos)| {
        let (i, j) = level.coords(index);
        MeshNode {
            key: NodeKey::Mesh {
                level: level.level,
                i,
                j,
            },
            pos,
            level: level.level,
        }
    })
}

fn flat(level: &MeshLevel) -> MeshTopology {
    let links = lattice_links(level.nx, level.ny)
        .into_iter()
        .map(|(a, b)| MeshLink::within(a, b, level.level))
        .collect();
    MeshTopology {
        nodes: level_nodes(level).collect(),
        links,
        bottom: (0..level.len()).collect(),
        spacing: level.spacing,
        num_levels: 1,
    }
}

/// Nearest candidate to `query`, ties going to the lower index.
fn nearest(index: &GeometryIndex, query: Point, spacing: &MeshSpacing) -> Option<usize> {
    ConnectivityStrategy::NearestNeighbour
        .neighbours(index, query, spacing, None)
        .first()
        .map(|n| n.index)
}

fn flat_multiscale(levels: &[MeshLevel]) -> MeshTopology {
    let mut topology = flat(&levels[0]);
    topology.num_levels = levels.len();
    let finest_index = GeometryIndex::new(levels[0].positions.clone());

    let mut slots: HashMap<(usize, usize), usize> = topology
        .links
        .iter()
        .enumerate()
        .map(|(slot, l)| ((l.source, l.target), slot))
        .collect();

    for level in &levels[1..] {
        let mut representative = Vec::with_capacity(level.len());
        for &pos in &level.positions {
            let rep = nearest(&finest_index, pos, &topology.spacing).unwrap_or_default();
            topology.nodes[rep].level = level.level;
            representative.push(rep);
        }

        for (a, b) in lattice_links(level.nx, level.ny) {
            let (source, target) = (representative[a], representative[b]);
            if source == target {
                continue;
            }
            let link = MeshLink::within(source, target, level.level);
            // a coarser level overrides the attributes of an existing link
            match slots.get(&(source, target)) {
                Some(&slot) => topology.links[slot] = link,
                None => {
                    slots.insert((source, target), topology.links.len());
                    topology.links.push(link);
                }
            }
        }
    }
    topology
}

fn hierarchical(levels: &[MeshLevel]) -> MeshTopology {
    let mut nodes = Vec::new();
    let mut links = Vec::new();
    let mut offsets = Vec::with_capacity(levels.len());

    for level in levels {
        let offset = nodes.len();
        offsets.push(offset);
        nodes.extend(level_nodes(level));
        links.extend(
            lattice_links(level.nx, level.ny)
                .into_iter()
                .map(|(a, b)| MeshLink {
                    direction: Some(Direction::Same),
                    ..MeshLink::within(offset + a, offset + b, level.level)
                }),
        );
    }

    let spacing = levels[0].spacing;
    for (k, pair) in levels.windows(2).enumerate() {
        let (fine, coarse) = (&pair[0], &pair[1]);
        let fine_index = GeometryIndex::new(fine.positions.clone());
        let coarse_index = GeometryIndex::new(coarse.positions.clone());

        // each fine node links to its nearest coarse node and vice versa
        let mut pairs = BTreeSet::new();
        for (f, &pos) in fine.positions.iter().enumerate() {
            if let Some(c) = nearest(&coarse_index, pos, &spacing) {
                pairs.insert((f, c));
            }
        }
        for (c, &pos) in coarse.positions.iter().enumerate() {
            if let Some(f) = nearest(&fine_index, pos, &spacing) {
                pairs.insert((f, c));
            }
        }

        let (fine_offset, coarse_offset) = (offsets[k], offsets[k + 1]);
        let cross = |source: usize, target: usize, direction, from: u32, to: u32| MeshLink {
            source,
            target,
            level: None,
            direction: Some(direction),
            levels: Some((from, to)),
        };
        for &(f, c) in &pairs {
            links.push(cross(
                fine_offset + f,
                coarse_offset + c,
                Direction::Up,
                fine.level,
                coarse.level,
            ));
        }
        for &(f, c) in &pairs {
            links.push(cross(
                coarse_offset + c,
                fine_offset + f,
                Direction::Down,
                coarse.level,
                fine.level,
            ));
        }
    }

    MeshTopology {
        nodes,
        links,
        bottom: (0..levels[0].len()).collect(),
        spacing,
        num_levels: levels.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn params(grf: usize, lrf: usize, max: Option<usize>) -> RefinementParams {
        RefinementParams {
            grid_refinement_factor: grf,
            level_refinement_factor: lrf,
            max_num_levels: max,
        }
    }

    fn link_pairs(topology: &MeshTopology) -> HashSet<(usize, usize)> {
        topology.links.iter().map(|l| (l.source, l.target)).collect()
    }

    #[test]
    fn parse_m2m_names() {
        let kwargs = ConnectivityKwargs::new().grid_refinement_factor(2);
        assert_eq!(
            M2mConnectivity::from_name("flat", &kwargs).unwrap(),
            M2mConnectivity::Flat {
                grid_refinement_factor: 2
            }
        );
        let hier = M2mConnectivity::from_name(
            "hierarchical",
            &kwargs.level_refinement_factor(2).max_num_levels(3),
        )
        .unwrap();
        assert_eq!(hier, M2mConnectivity::Hierarchical(params(2, 2, Some(3))));
        assert_eq!(
            M2mConnectivity::from_name("flat_multiscale", &kwargs).unwrap(),
            M2mConnectivity::FlatMultiscale(params(2, 3, None))
        );

        let err = M2mConnectivity::from_name("flat", &kwargs.max_num_levels(2));
        assert!(matches!(err, Err(WmgError::ConnectivityConfig { .. })));
        let err = M2mConnectivity::from_name("flat", &ConnectivityKwargs::new());
        assert!(matches!(err, Err(WmgError::ConnectivityConfig { .. })));
        let err = M2mConnectivity::from_name("icosahedral", &kwargs);
        assert!(matches!(err, Err(WmgError::UnsupportedComponent { .. })));
        let err = M2mConnectivity::from_name("hierarchical", &kwargs.level_refinement_factor(1));
        assert!(matches!(err, Err(WmgError::ConnectivityConfig { .. })));
    }

    #[test]
    fn flat_is_one_lattice() {
        let grid = GridCoords::unit_square(12, 12).unwrap();
        let topology = MeshEdgeBuilder::new(M2mConnectivity::Flat {
            grid_refinement_factor: 3,
        })
        .build(&grid)
        .unwrap();
        assert_eq!(topology.num_levels, 1);
        assert_eq!(topology.nodes.len(), 16);
        assert_eq!(topology.links.len(), lattice_links(4, 4).len());
        assert_eq!(topology.bottom.len(), 16);
    }

    #[test]
    fn flat_multiscale_merges_onto_finest_nodes() {
        let grid = GridCoords::unit_square(18, 18).unwrap();
        let topology = MeshEdgeBuilder::new(M2mConnectivity::FlatMultiscale(params(2, 3, None)))
            .build(&grid)
            .unwrap();
        assert_eq!(topology.num_levels, 2);
        // only finest-level nodes exist
        assert_eq!(topology.nodes.len(), 81);
        assert_eq!(topology.nodes.iter().filter(|n| n.level == 2).count(), 9);

        let pairs = link_pairs(&topology);
        assert_eq!(pairs.len(), topology.links.len(), "no duplicate links");
        assert!(topology.links.iter().all(|l| l.source != l.target));
        // coarse links are longer than any finest-level link
        let coarse = topology.links.iter().filter(|l| l.level == Some(2)).count();
        assert_eq!(coarse, lattice_links(3, 3).len());
    }

    #[test]
    fn hierarchical_links_levels_both_ways() {
        let grid = GridCoords::unit_square(18, 18).unwrap();
        let topology = MeshEdgeBuilder::new(M2mConnectivity::Hierarchical(params(2, 3, None)))
            .build(&grid)
            .unwrap();
        assert_eq!(topology.num_levels, 2);
        assert_eq!(topology.nodes.len(), 81 + 9);
        assert_eq!(topology.bottom, (0..81).collect::<Vec<_>>());

        let up: Vec<&MeshLink> = topology
            .links
            .iter()
            .filter(|l| l.direction == Some(Direction::Up))
            .collect();
        let down: Vec<&MeshLink> = topology
            .links
            .iter()
            .filter(|l| l.direction == Some(Direction::Down))
            .collect();
        // every fine node has exactly one nearest coarse node at exact refinement
        assert_eq!(up.len(), 81);
        assert_eq!(down.len(), up.len());
        assert!(up.iter().all(|l| l.source < 81 && l.target >= 81));
        assert!(up.iter().all(|l| l.levels == Some((1, 2))));
        assert!(down.iter().all(|l| l.levels == Some((2, 1))));

        let pairs = link_pairs(&topology);
        for l in &up {
            assert!(pairs.contains(&(l.target, l.source)));
        }
    }

    #[test]
    fn hierarchy_respects_max_levels() {
        let grid = GridCoords::unit_square(64, 64).unwrap();
        let capped = MeshEdgeBuilder::new(M2mConnectivity::Hierarchical(params(2, 2, Some(2))))
            .build(&grid)
            .unwrap();
        assert_eq!(capped.num_levels, 2);
        let uncapped = MeshEdgeBuilder::new(M2mConnectivity::Hierarchical(params(2, 2, None)))
            .build(&grid)
            .unwrap();
        assert_eq!(uncapped.num_levels, 5);
    }

    #[test]
    fn link_attributes() {
        let link = MeshLink {
            source: 0,
            target: 1,
            level: None,
            direction: Some(Direction::Down),
            levels: Some((2, 1)),
        };
        let attrs = link.attrs(Point::new(0.0, 0.0), Point::new(0.0, 2.0));
        assert_eq!(attrs.component, Component::M2m);
        assert_eq!(attrs.len, 2.0);
        assert_eq!(attrs.levels.map(|p| p.to_string()), Some("2>1".to_string()));
        assert_eq!(attrs.direction, Some(Direction::Down));
    }
}
