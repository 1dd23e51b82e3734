//! Policies that connect one node set to another.
//!
//! Every policy works per *query* node: it picks a set of candidate nodes
//! and creates one edge `candidate -> query` for each. For grid-to-mesh
//! edges the candidates are grid nodes and the queries are mesh nodes; for
//! mesh-to-grid edges it is the other way around.

use std::collections::HashMap;

use wmg_core::{NodeId, Point, Real, WmgError, WmgResult};
use wmg_graph::{Component, Edge, EdgeAttrs};

use crate::grid::{GeometryIndex, Neighbour};
use crate::kwargs::ConnectivityKwargs;
use crate::levels::MeshSpacing;

/// A distance threshold, absolute or relative to the mesh spacing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Radius {
    Absolute(Real),
    /// Multiple of the reference scale, the diagonal of a finest-level mesh cell.
    Relative(Real),
}

impl Radius {
    /// Exactly one of `max_dist` and `rel_max_dist` must be given.
    pub fn from_kwargs(max_dist: Option<Real>, rel_max_dist: Option<Real>) -> WmgResult<Self> {
        match (max_dist, rel_max_dist) {
            (Some(d), None) => Ok(Radius::Absolute(d)),
            (None, Some(r)) => Ok(Radius::Relative(r)),
            (Some(_), Some(_)) => Err(WmgError::config(
                "within_radius takes either max_dist or rel_max_dist, not both",
            )),
            (None, None) => Err(WmgError::config(
                "within_radius needs one of max_dist or rel_max_dist",
            )),
        }
    }

    pub fn resolve(self, spacing: &MeshSpacing) -> Real {
        match self {
            Radius::Absolute(d) => d,
            Radius::Relative(r) => r * spacing.diagonal(),
        }
    }

    fn value(self) -> Real {
        match self {
            Radius::Absolute(v) | Radius::Relative(v) => v,
        }
    }
}

/// How query nodes pick the candidate nodes they receive edges from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConnectivityStrategy {
    /// The single closest candidate.
    NearestNeighbour,
    /// The `max_num_neighbours` closest candidates (fewer if there are fewer).
    NearestNeighbours { max_num_neighbours: usize },
    /// Every candidate within the radius, inclusive.
    WithinRadius(Radius),
    /// Every candidate strictly inside the mesh cell-sized rectangle centred
    /// on the query. Only valid for mesh-to-grid edges.
    ContainingRectangle,
}

impl ConnectivityStrategy {
    pub const NAMES: [&'static str; 4] = [
        "nearest_neighbour",
        "nearest_neighbours",
        "within_radius",
        "containing_rectangle",
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ConnectivityStrategy::NearestNeighbour => "nearest_neighbour",
            ConnectivityStrategy::NearestNeighbours { .. } => "nearest_neighbours",
            ConnectivityStrategy::WithinRadius(_) => "within_radius",
            ConnectivityStrategy::ContainingRectangle => "containing_rectangle",
        }
    }

    /// Parse a strategy from its method name and keyword arguments.
    pub fn from_name(name: &str, kwargs: &ConnectivityKwargs) -> WmgResult<Self> {
        let strategy = match name {
            "nearest_neighbour" => {
                kwargs.expect_only(name, &[])?;
                ConnectivityStrategy::NearestNeighbour
            }
            "nearest_neighbours" => {
                kwargs.expect_only(name, &["max_num_neighbours"])?;
                let max_num_neighbours = kwargs.max_num_neighbours.ok_or_else(|| {
                    WmgError::config("nearest_neighbours needs max_num_neighbours")
                })?;
                ConnectivityStrategy::NearestNeighbours { max_num_neighbours }
            }
            "within_radius" => {
                kwargs.expect_only(name, &["max_dist", "rel_max_dist"])?;
                ConnectivityStrategy::WithinRadius(Radius::from_kwargs(
                    kwargs.max_dist,
                    kwargs.rel_max_dist,
                )?)
            }
            "containing_rectangle" => {
                kwargs.expect_only(name, &[])?;
                ConnectivityStrategy::ContainingRectangle
            }
            other => {
                return Err(WmgError::UnsupportedComponent {
                    kind: "connectivity method",
                    name: other.to_string(),
                });
            }
        };
        strategy.validate()?;
        Ok(strategy)
    }

    pub fn validate(&self) -> WmgResult<()> {
        match *self {
            ConnectivityStrategy::NearestNeighbours {
                max_num_neighbours: 0,
            } => Err(WmgError::config("max_num_neighbours must be at least 1")),
            ConnectivityStrategy::WithinRadius(radius) => {
                let v = radius.value();
                if !v.is_finite() || v < 0.0 {
                    Err(WmgError::config(format!(
                        "within_radius distance must be finite and non-negative, got {}",
                        v
                    )))
                } else {
                    Ok(())
                }
            }
            _ => Ok(()),
        }
    }

    /// Validate the strategy for use on `component`.
    pub fn validate_for(&self, component: Component) -> WmgResult<()> {
        self.validate()?;
        if *self == ConnectivityStrategy::ContainingRectangle && component != Component::M2g {
            return Err(WmgError::config(format!(
                "containing_rectangle is only supported for m2g, not {}",
                component
            )));
        }
        Ok(())
    }

    /// Candidates that `query` connects to, ordered by distance then index.
    ///
    /// `exclude` removes one candidate, used to suppress self-loops.
    pub fn neighbours(
        &self,
        candidates: &GeometryIndex,
        query: Point,
        spacing: &MeshSpacing,
        exclude: Option<usize>,
    ) -> Vec<Neighbour> {
        match *self {
            ConnectivityStrategy::NearestNeighbour => {
                candidates.nearest_excluding(query, 1, exclude)
            }
            ConnectivityStrategy::NearestNeighbours { max_num_neighbours } => {
                candidates.nearest_excluding(query, max_num_neighbours, exclude)
            }
            ConnectivityStrategy::WithinRadius(radius) => {
                let mut found = candidates.within_radius(query, radius.resolve(spacing));
                found.retain(|n| Some(n.index) != exclude);
                found
            }
            ConnectivityStrategy::ContainingRectangle => {
                let points = candidates.all_points();
                let mut found = candidates.within_radius(query, spacing.diagonal());
                found.retain(|n| {
                    let d = points[n.index].vdiff(query);
                    Some(n.index) != exclude && d.dx.abs() < spacing.dx && d.dy.abs() < spacing.dy
                });
                found
            }
        }
    }
}

/// A set of graph nodes with their positions, in a fixed order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeSet {
    pub ids: Vec<NodeId>,
    pub positions: Vec<Point>,
}

impl NodeSet {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            ids: Vec::with_capacity(n),
            positions: Vec::with_capacity(n),
        }
    }

    pub fn push(&mut self, id: NodeId, pos: Point) {
        self.ids.push(id);
        self.positions.push(pos);
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, Point)> + '_ {
        self.ids.iter().copied().zip(self.positions.iter().copied())
    }
}

/// Parameters shared by every cross-set connection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectOptions {
    /// Spacing of the finest mesh level.
    pub spacing: MeshSpacing,
    /// Keep edges from a node to itself when the two sets overlap.
    pub allow_self_loops: bool,
}

impl ConnectOptions {
    pub fn new(spacing: MeshSpacing) -> Self {
        Self {
            spacing,
            allow_self_loops: false,
        }
    }
}

/// Connect every node of `target` to the nodes of `source` picked by `strategy`.
///
/// Edges point from `source` to `target` and are tagged with `component`.
/// They are ordered by target node, then by distance and source order.
pub fn connect_nodes_across_graphs(
    source: &NodeSet,
    target: &NodeSet,
    strategy: &ConnectivityStrategy,
    component: Component,
    options: &ConnectOptions,
) -> WmgResult<Vec<Edge>> {
    strategy.validate_for(component)?;

    let index = GeometryIndex::new(source.positions.clone());
    let source_slots: HashMap<NodeId, usize> = if options.allow_self_loops {
        HashMap::new()
    } else {
        source.ids.iter().enumerate().map(|(i, &id)| (id, i)).collect()
    };

    let mut edges = Vec::new();
    for (target_id, target_pos) in target.iter() {
        let exclude = source_slots.get(&target_id).copied();
        for n in strategy.neighbours(&index, target_pos, &options.spacing, exclude) {
            let source_pos = source.positions[n.index];
            edges.push(Edge::new(
                source.ids[n.index],
                target_id,
                EdgeAttrs::between(component, source_pos, target_pos),
            ));
        }
    }

    tracing::debug!(
        component = %component,
        method = strategy.name(),
        num_sources = source.len(),
        num_targets = target.len(),
        num_edges = edges.len(),
        "connected node sets"
    );
    Ok(edges)
}
