//! Configuration validation logic.

use std::collections::HashSet;

use wmg_core::WmgError;

use crate::schema::{GraphConfigFile, GridDef, LATEST_VERSION};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },

    #[error("Graph {graph}: {source}")]
    Graph {
        graph: String,
        #[source]
        source: WmgError,
    },
}

pub fn validate_config(config: &GraphConfigFile) -> Result<(), ValidationError> {
    if config.version == 0 || config.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: config.version,
        });
    }

    validate_grid(&config.grid)?;

    let mut graph_ids = HashSet::new();
    for graph in &config.graphs {
        if graph.id.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "graphs.id".to_string(),
                value: format!("{:?}", graph.id),
                reason: "graph id must not be empty".to_string(),
            });
        }
        if !graph_ids.insert(&graph.id) {
            return Err(ValidationError::DuplicateId {
                id: graph.id.clone(),
                context: "graphs".to_string(),
            });
        }
        graph
            .kind
            .components()
            .map_err(|source| ValidationError::Graph {
                graph: graph.id.clone(),
                source,
            })?;
    }

    Ok(())
}

fn validate_grid(grid: &GridDef) -> Result<(), ValidationError> {
    for (field, n) in [("grid.nx", grid.nx), ("grid.ny", grid.ny)] {
        if n < 2 {
            return Err(ValidationError::InvalidValue {
                field: field.to_string(),
                value: n.to_string(),
                reason: "grid needs at least 2 points along each axis".to_string(),
            });
        }
    }

    for (field, [lo, hi]) in [("grid.x_range", grid.x_range), ("grid.y_range", grid.y_range)] {
        if !lo.is_finite() || !hi.is_finite() || lo >= hi {
            return Err(ValidationError::InvalidValue {
                field: field.to_string(),
                value: format!("[{}, {}]", lo, hi),
                reason: "range must be finite and increasing".to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ConnectivityDef, GraphDef, GraphKindDef, KwargsDef};

    fn config() -> GraphConfigFile {
        GraphConfigFile {
            version: LATEST_VERSION,
            name: "test".to_string(),
            grid: GridDef {
                nx: 12,
                ny: 12,
                x_range: [0.0, 1.0],
                y_range: [0.0, 1.0],
            },
            graphs: vec![GraphDef {
                id: "keisler".to_string(),
                kind: GraphKindDef::Keisler {
                    grid_refinement_factor: 3,
                },
            }],
        }
    }

    #[test]
    fn valid_config_passes() {
        validate_config(&config()).unwrap();
    }

    #[test]
    fn duplicate_graph_ids() {
        let mut config = config();
        config.graphs.push(config.graphs[0].clone());
        assert!(matches!(
            validate_config(&config),
            Err(ValidationError::DuplicateId { .. })
        ));
    }

    #[test]
    fn bad_grid() {
        let mut config = config();
        config.grid.x_range = [1.0, 0.0];
        assert!(matches!(
            validate_config(&config),
            Err(ValidationError::InvalidValue { .. })
        ));

        let mut config = self::config();
        config.grid.ny = 1;
        assert!(matches!(
            validate_config(&config),
            Err(ValidationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn future_version_rejected() {
        let mut config = config();
        config.version = LATEST_VERSION + 1;
        assert!(matches!(
            validate_config(&config),
            Err(ValidationError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn bad_connectivity_names_the_graph() {
        let mut config = config();
        config.graphs.push(GraphDef {
            id: "custom".to_string(),
            kind: GraphKindDef::Custom {
                m2m: ConnectivityDef {
                    method: "flat".to_string(),
                    kwargs: KwargsDef {
                        grid_refinement_factor: Some(3),
                        ..KwargsDef::default()
                    },
                },
                g2m: ConnectivityDef {
                    method: "within_radius".to_string(),
                    kwargs: KwargsDef {
                        max_dist: Some(0.1),
                        rel_max_dist: Some(0.5),
                        ..KwargsDef::default()
                    },
                },
                m2g: ConnectivityDef {
                    method: "nearest_neighbour".to_string(),
                    kwargs: KwargsDef::default(),
                },
            },
        });
        match validate_config(&config) {
            Err(ValidationError::Graph { graph, source }) => {
                assert_eq!(graph, "custom");
                assert!(matches!(source, WmgError::ConnectivityConfig { .. }));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
