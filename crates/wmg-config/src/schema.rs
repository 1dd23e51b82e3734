//! Graph configuration file schema.

use serde::{Deserialize, Serialize};
use wmg_core::WmgResult;
use wmg_create::{
    Archetype, ArchetypeParams, ConnectivityKwargs, GraphComponentsConfig, GridCoords,
};

pub const LATEST_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphConfigFile {
    pub version: u32,
    pub name: String,
    pub grid: GridDef,
    #[serde(default)]
    pub graphs: Vec<GraphDef>,
}

/// A regular grid of `nx x ny` points spanning the given ranges.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GridDef {
    pub nx: usize,
    pub ny: usize,
    #[serde(default = "unit_range")]
    pub x_range: [f64; 2],
    #[serde(default = "unit_range")]
    pub y_range: [f64; 2],
}

fn unit_range() -> [f64; 2] {
    [0.0, 1.0]
}

impl GridDef {
    pub fn coords(&self) -> WmgResult<GridCoords> {
        GridCoords::uniform(
            self.nx,
            self.ny,
            (self.x_range[0], self.x_range[1]),
            (self.y_range[0], self.y_range[1]),
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphDef {
    pub id: String,
    pub kind: GraphKindDef,
}

fn default_refinement_factor() -> usize {
    3
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GraphKindDef {
    Keisler {
        #[serde(default = "default_refinement_factor")]
        grid_refinement_factor: usize,
    },
    Graphcast {
        #[serde(default = "default_refinement_factor")]
        grid_refinement_factor: usize,
        #[serde(default = "default_refinement_factor")]
        level_refinement_factor: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_num_levels: Option<usize>,
    },
    OskarssonHierarchical {
        #[serde(default = "default_refinement_factor")]
        grid_refinement_factor: usize,
        #[serde(default = "default_refinement_factor")]
        level_refinement_factor: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_num_levels: Option<usize>,
    },
    Custom {
        m2m: ConnectivityDef,
        g2m: ConnectivityDef,
        m2g: ConnectivityDef,
    },
}

impl GraphKindDef {
    /// Resolve to the component strategies, validating method names and parameters.
    pub fn components(&self) -> WmgResult<GraphComponentsConfig> {
        let archetype = |archetype: Archetype, params: ArchetypeParams| {
            let config = archetype.components(&params);
            config.validate().map(|()| config)
        };
        match *self {
            GraphKindDef::Keisler {
                grid_refinement_factor,
            } => archetype(
                Archetype::Keisler,
                ArchetypeParams {
                    grid_refinement_factor,
                    ..ArchetypeParams::default()
                },
            ),
            GraphKindDef::Graphcast {
                grid_refinement_factor,
                level_refinement_factor,
                max_num_levels,
            } => archetype(
                Archetype::Graphcast,
                ArchetypeParams {
                    grid_refinement_factor,
                    level_refinement_factor,
                    max_num_levels,
                },
            ),
            GraphKindDef::OskarssonHierarchical {
                grid_refinement_factor,
                level_refinement_factor,
                max_num_levels,
            } => archetype(
                Archetype::OskarssonHierarchical,
                ArchetypeParams {
                    grid_refinement_factor,
                    level_refinement_factor,
                    max_num_levels,
                },
            ),
            GraphKindDef::Custom {
                ref m2m,
                ref g2m,
                ref m2g,
            } => GraphComponentsConfig::from_names(
                (m2m.method.as_str(), &m2m.kwargs.to_kwargs()),
                (g2m.method.as_str(), &g2m.kwargs.to_kwargs()),
                (m2g.method.as_str(), &m2g.kwargs.to_kwargs()),
            ),
        }
    }
}

/// A connectivity method by name, with its keyword arguments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConnectivityDef {
    pub method: String,
    #[serde(default)]
    pub kwargs: KwargsDef,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct KwargsDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_num_neighbours: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_dist: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rel_max_dist: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_refinement_factor: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level_refinement_factor: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_num_levels: Option<usize>,
}

impl KwargsDef {
    pub fn to_kwargs(&self) -> ConnectivityKwargs {
        ConnectivityKwargs {
            max_num_neighbours: self.max_num_neighbours,
            max_dist: self.max_dist,
            rel_max_dist: self.rel_max_dist,
            grid_refinement_factor: self.grid_refinement_factor,
            level_refinement_factor: self.level_refinement_factor,
            max_num_levels: self.max_num_levels,
        }
    }
}
