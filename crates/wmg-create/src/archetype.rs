//! Named graph layouts from the weather-forecasting literature.
//!
//! All three connect grid to mesh with `within_radius(rel_max_dist = 0.51)`
//! and mesh to grid with `nearest_neighbours(max_num_neighbours = 4)`. They
//! differ in how mesh nodes are wired:
//!
//! * Keisler (2022): a single flat mesh level.
//! * GraphCast (Lam et al., 2023): all levels flattened onto the finest nodes.
//! * Oskarsson et al. (2023): a hierarchy with up and down edges between levels.

use core::fmt;
use std::str::FromStr;

use wmg_core::{WmgError, WmgResult};
use wmg_graph::GraphBackend;

use crate::assemble::{GraphAssembler, GraphComponentsConfig};
use crate::connectivity::{ConnectivityStrategy, Radius};
use crate::grid::GridCoords;
use crate::levels::RefinementParams;
use crate::m2m::M2mConnectivity;

const G2M_REL_MAX_DIST: f64 = 0.51;
const M2G_MAX_NUM_NEIGHBOURS: usize = 4;

/// Refinement parameters for the archetype constructors.
pub type ArchetypeParams = RefinementParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Archetype {
    Keisler,
    Graphcast,
    OskarssonHierarchical,
}

impl Archetype {
    pub const ALL: [Archetype; 3] = [
        Archetype::Keisler,
        Archetype::Graphcast,
        Archetype::OskarssonHierarchical,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Archetype::Keisler => "keisler",
            Archetype::Graphcast => "graphcast",
            Archetype::OskarssonHierarchical => "oskarsson_hierarchical",
        }
    }

    /// Component strategies of this archetype.
    ///
    /// Keisler only uses `grid_refinement_factor`.
    pub fn components(self, params: &ArchetypeParams) -> GraphComponentsConfig {
        let m2m = match self {
            Archetype::Keisler => M2mConnectivity::Flat {
                grid_refinement_factor: params.grid_refinement_factor,
            },
            Archetype::Graphcast => M2mConnectivity::FlatMultiscale(*params),
            Archetype::OskarssonHierarchical => M2mConnectivity::Hierarchical(*params),
        };
        GraphComponentsConfig {
            m2m,
            g2m: ConnectivityStrategy::WithinRadius(Radius::Relative(G2M_REL_MAX_DIST)),
            m2g: ConnectivityStrategy::NearestNeighbours {
                max_num_neighbours: M2G_MAX_NUM_NEIGHBOURS,
            },
        }
    }

    pub fn build<G: GraphBackend>(self, xy_grid: &GridCoords, params: &ArchetypeParams) -> WmgResult<G> {
        tracing::debug!(archetype = self.as_str(), ?params, "building archetype graph");
        GraphAssembler::new(self.components(params))?.assemble(xy_grid)
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Archetype {
    type Err = WmgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Archetype::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| WmgError::UnsupportedComponent {
                kind: "graph archetype",
                name: s.to_string(),
            })
    }
}

/// Keisler (2022): flat single-level mesh.
pub fn create_keisler_graph<G: GraphBackend>(
    xy_grid: &GridCoords,
    params: &ArchetypeParams,
) -> WmgResult<G> {
    Archetype::Keisler.build(xy_grid, params)
}

/// GraphCast (Lam et al., 2023): multiscale mesh flattened onto one level.
pub fn create_graphcast_graph<G: GraphBackend>(
    xy_grid: &GridCoords,
    params: &ArchetypeParams,
) -> WmgResult<G> {
    Archetype::Graphcast.build(xy_grid, params)
}

/// Oskarsson et al. (2023): hierarchical mesh with inter-level edges.
pub fn create_oskarsson_hierarchical_graph<G: GraphBackend>(
    xy_grid: &GridCoords,
    params: &ArchetypeParams,
) -> WmgResult<G> {
    Archetype::OskarssonHierarchical.build(xy_grid, params)
}
