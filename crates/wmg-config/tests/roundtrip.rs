use wmg_config::schema::*;
use wmg_config::{load_json, load_yaml, save_json, save_yaml, validate_config};

fn sample_config() -> GraphConfigFile {
    GraphConfigFile {
        version: LATEST_VERSION,
        name: "Roundtrip".to_string(),
        grid: GridDef {
            nx: 20,
            ny: 30,
            x_range: [0.0, 2.0],
            y_range: [-1.0, 1.0],
        },
        graphs: vec![
            GraphDef {
                id: "hier".to_string(),
                kind: GraphKindDef::OskarssonHierarchical {
                    grid_refinement_factor: 2,
                    level_refinement_factor: 3,
                    max_num_levels: Some(2),
                },
            },
            GraphDef {
                id: "custom".to_string(),
                kind: GraphKindDef::Custom {
                    m2m: ConnectivityDef {
                        method: "flat".to_string(),
                        kwargs: KwargsDef {
                            grid_refinement_factor: Some(2),
                            ..KwargsDef::default()
                        },
                    },
                    g2m: ConnectivityDef {
                        method: "within_radius".to_string(),
                        kwargs: KwargsDef {
                            max_dist: Some(0.25),
                            ..KwargsDef::default()
                        },
                    },
                    m2g: ConnectivityDef {
                        method: "nearest_neighbours".to_string(),
                        kwargs: KwargsDef {
                            max_num_neighbours: Some(3),
                            ..KwargsDef::default()
                        },
                    },
                },
            },
        ],
    }
}

#[test]
fn roundtrip_yaml() {
    let config = sample_config();
    validate_config(&config).unwrap();

    let path = std::env::temp_dir().join("wmg_config_roundtrip.yaml");
    save_yaml(&path, &config).unwrap();
    let loaded = load_yaml(&path).unwrap();

    assert_eq!(config, loaded);
}

#[test]
fn roundtrip_json() {
    let config = sample_config();

    let path = std::env::temp_dir().join("wmg_config_roundtrip.json");
    save_json(&path, &config).unwrap();
    let loaded = load_json(&path).unwrap();

    assert_eq!(config, loaded);
}

#[test]
fn defaults_fill_in() {
    let yaml = r#"
version: 1
name: defaults
grid:
  nx: 9
  ny: 9
graphs:
  - id: g
    kind:
      type: graphcast
"#;
    let config = wmg_config::from_yaml_str(yaml).unwrap();
    assert_eq!(config.grid.x_range, [0.0, 1.0]);
    assert_eq!(
        config.graphs[0].kind,
        GraphKindDef::Graphcast {
            grid_refinement_factor: 3,
            level_refinement_factor: 3,
            max_num_levels: None,
        }
    );
}

#[test]
fn unknown_kwargs_are_rejected() {
    let yaml = r#"
version: 1
name: typo
grid: { nx: 9, ny: 9 }
graphs:
  - id: g
    kind:
      type: custom
      m2m: { method: flat, kwargs: { grid_refinement_factor: 3 } }
      g2m: { method: nearest_neighbours, kwargs: { max_neighbours: 3 } }
      m2g: { method: nearest_neighbour }
"#;
    let err = wmg_config::from_yaml_str(yaml).unwrap_err();
    assert!(matches!(err, wmg_config::ConfigError::Yaml(_)));
}
