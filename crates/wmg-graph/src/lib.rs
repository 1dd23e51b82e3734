//! wmg-graph: graph layer for weather-model-graphs.
//!
//! Provides:
//! - Typed node/edge attributes (position, node type, level, component tag)
//! - The `GraphBackend` capability trait and two implementations
//!   (`AdjacencyGraph`, `PetGraph`), plus runtime selection via `AnyGraph`
//! - A node arena handing out stable ids in disjoint grid/mesh namespaces
//! - Splitting, composing, relabelling and validating graphs
//!
//! # Example
//!
//! ```
//! use wmg_core::Point;
//! use wmg_graph::{AdjacencyGraph, Component, Edge, EdgeAttrs, GraphBackend, NodeArena, NodeAttrs, NodeKey};
//!
//! let mut arena = NodeArena::new();
//! let (pg, pm) = (Point::new(0.0, 0.0), Point::new(0.5, 0.5));
//! let g = arena.add(NodeKey::Grid { i: 0, j: 0 }, NodeAttrs::grid(pg)).unwrap();
//! let m = arena.add(NodeKey::Mesh { level: 1, i: 0, j: 0 }, NodeAttrs::mesh(pm, 1)).unwrap();
//! let graph: AdjacencyGraph = arena
//!     .build([Edge::new(g, m, EdgeAttrs::between(Component::G2m, pg, pm))])
//!     .unwrap();
//!
//! assert_eq!(graph.node_count(), 2);
//! assert_eq!(graph.edge_count(), 1);
//! ```

pub mod adjacency;
pub mod arena;
pub mod attrs;
pub mod backend;
pub mod error;
pub mod indexing;
pub mod petgraph_backend;
pub mod scope;
pub mod split;
pub mod summary;
pub mod validate;

// Re-exports for ergonomics
pub use adjacency::AdjacencyGraph;
pub use arena::{NodeArena, NodeKey};
pub use attrs::{AttrValue, Component, Direction, Edge, EdgeAttrs, LevelPair, NodeAttrs, NodeKind};
pub use backend::{GraphBackend, compose_all};
pub use error::GraphError;
pub use indexing::{IndexMap, replace_node_labels_with_unique_ids, sort_nodes_internally};
pub use petgraph_backend::PetGraph;
pub use scope::{AnyGraph, BackendKind, BackendScope, active_backend, use_backend, use_petgraph_backend};
pub use split::{split_by_component, split_graph_by_edge_attribute};
pub use summary::GraphSummary;
pub use validate::{validate_graph, validate_partition};
