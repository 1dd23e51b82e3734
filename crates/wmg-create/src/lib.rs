//! Mesh graph construction for graph-based weather models.
//!
//! Given the coordinates of a 2D grid, this crate places mesh nodes on one
//! or more refinement levels and produces a single directed graph with
//! three edge components: mesh-to-mesh (`m2m`), grid-to-mesh (`g2m`) and
//! mesh-to-grid (`m2g`).
//!
//! ```
//! use wmg_create::{ArchetypeParams, GridCoords, create_keisler_graph};
//! use wmg_graph::{AdjacencyGraph, GraphBackend, split_by_component};
//!
//! let xy = GridCoords::unit_square(12, 12)?;
//! let graph: AdjacencyGraph = create_keisler_graph(&xy, &ArchetypeParams::default())?;
//! let parts = split_by_component(&graph)?;
//! assert_eq!(parts.len(), 3);
//! assert_eq!(graph.node_count(), 144 + 16);
//! # Ok::<(), wmg_core::WmgError>(())
//! ```

pub mod archetype;
pub mod assemble;
pub mod connectivity;
pub mod grid;
pub mod kwargs;
pub mod levels;
pub mod m2m;
pub mod mesh;

pub use archetype::{
    Archetype, ArchetypeParams, create_graphcast_graph, create_keisler_graph,
    create_oskarsson_hierarchical_graph,
};
pub use assemble::{GraphAssembler, GraphComponentsConfig, create_all_graph_components};
pub use connectivity::{
    ConnectOptions, ConnectivityStrategy, NodeSet, Radius, connect_nodes_across_graphs,
};
pub use grid::{GeometryIndex, GridCoords, Neighbour};
pub use kwargs::ConnectivityKwargs;
pub use levels::{LevelHierarchyBuilder, MeshLevel, MeshSpacing, RefinementParams};
pub use m2m::{M2mConnectivity, MeshEdgeBuilder, MeshLink, MeshNode, MeshTopology};
pub use mesh::{create_multirange_2d_mesh_graphs, create_single_level_2d_mesh_graph, lattice_links};
