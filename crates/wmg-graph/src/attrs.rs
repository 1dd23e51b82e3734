//! Node and edge attribute types.
//!
//! Attributes are typed structs rather than free-form dictionaries. The
//! string-keyed accessors (`NodeAttrs::get`, `EdgeAttrs::get`) exist for the
//! generic utilities that split or sort a graph by a named attribute.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use wmg_core::{NodeId, Point, Real, Vector, WmgError};

/// Which of the three logical edge sets an edge belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Component {
    /// Mesh-to-mesh.
    M2m,
    /// Grid-to-mesh.
    G2m,
    /// Mesh-to-grid.
    M2g,
}

impl Component {
    pub const ALL: [Component; 3] = [Component::M2m, Component::G2m, Component::M2g];

    pub fn as_str(self) -> &'static str {
        match self {
            Component::M2m => "m2m",
            Component::G2m => "g2m",
            Component::M2g => "m2g",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Component {
    type Err = WmgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Component::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| WmgError::UnsupportedComponent {
                kind: "graph component",
                name: s.to_string(),
            })
    }
}

/// Whether a node is a raw grid point or a mesh node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Grid,
    Mesh,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Grid => "grid",
            NodeKind::Mesh => "mesh",
        }
    }
}

/// Direction of an m2m edge relative to the level hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Both endpoints on the same level.
    Same,
    /// From a finer level to a coarser one.
    Up,
    /// From a coarser level to a finer one.
    Down,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Same => "same",
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

/// Source and target level of a cross-level edge, rendered as `"from>to"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LevelPair {
    pub from: u32,
    pub to: u32,
}

impl fmt::Display for LevelPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}>{}", self.from, self.to)
    }
}

/// A dynamically typed attribute value, as seen by the name-based accessors.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Text(String),
    Int(i64),
    Float(Real),
    Point(Point),
    Vector(Vector),
}

impl AttrValue {
    pub fn as_f64(&self) -> Option<Real> {
        match self {
            AttrValue::Int(v) => Some(*v as Real),
            AttrValue::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Text(s) => f.write_str(s),
            AttrValue::Int(v) => write!(f, "{}", v),
            AttrValue::Float(v) => write!(f, "{}", v),
            AttrValue::Point(p) => write!(f, "{}", p),
            AttrValue::Vector(v) => write!(f, "[{}, {}]", v.dx, v.dy),
        }
    }
}

/// Attributes carried by every node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeAttrs {
    pub pos: Point,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// 0 for grid nodes, >= 1 for mesh nodes (1 is the finest mesh level).
    pub level: u32,
}

impl NodeAttrs {
    pub fn grid(pos: Point) -> Self {
        Self {
            pos,
            kind: NodeKind::Grid,
            level: 0,
        }
    }

    pub fn mesh(pos: Point, level: u32) -> Self {
        Self {
            pos,
            kind: NodeKind::Mesh,
            level,
        }
    }

    pub fn get(&self, name: &str) -> Option<AttrValue> {
        match name {
            "pos" => Some(AttrValue::Point(self.pos)),
            "type" => Some(AttrValue::Text(self.kind.as_str().to_string())),
            "level" => Some(AttrValue::Int(i64::from(self.level))),
            _ => None,
        }
    }
}

/// Attributes carried by every edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeAttrs {
    pub component: Component,
    /// Euclidean length.
    pub len: Real,
    /// Source position minus target position.
    pub vdiff: Vector,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub levels: Option<LevelPair>,
}

impl EdgeAttrs {
    /// Geometric attributes of the edge `source -> target`.
    pub fn between(component: Component, source: Point, target: Point) -> Self {
        Self {
            component,
            len: source.distance(target),
            vdiff: source.vdiff(target),
            level: None,
            direction: None,
            levels: None,
        }
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn with_levels(mut self, from: u32, to: u32) -> Self {
        self.levels = Some(LevelPair { from, to });
        self
    }

    pub fn get(&self, name: &str) -> Option<AttrValue> {
        match name {
            "component" => Some(AttrValue::Text(self.component.as_str().to_string())),
            "len" => Some(AttrValue::Float(self.len)),
            "vdiff" => Some(AttrValue::Vector(self.vdiff)),
            "level" => self.level.map(|l| AttrValue::Int(i64::from(l))),
            "direction" => self.direction.map(|d| AttrValue::Text(d.as_str().to_string())),
            "levels" => self.levels.map(|p| AttrValue::Text(p.to_string())),
            _ => None,
        }
    }
}

/// A directed edge with its attributes, as produced by the construction steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub attrs: EdgeAttrs,
}

impl Edge {
    pub fn new(source: NodeId, target: NodeId, attrs: EdgeAttrs) -> Self {
        Self {
            source,
            target,
            attrs,
        }
    }
}
