use std::collections::BTreeSet;
use std::path::PathBuf;

use wmg_config::{ConfigError, build_graphs, load};
use wmg_graph::{AdjacencyGraph, GraphBackend, GraphSummary, NodeKind};

fn configs_dir() -> PathBuf {
    let crate_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    crate_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root")
        .join("configs")
}

#[test]
fn shipped_configs_load_and_build() {
    for name in ["archetypes.yaml", "custom_limited_area.yaml"] {
        let path = configs_dir().join(name);
        let config = load(&path).unwrap_or_else(|e| panic!("Failed to load {}: {}", name, e));
        let graphs: Vec<(String, AdjacencyGraph)> = build_graphs(&config)
            .unwrap_or_else(|e| panic!("Failed to build {}: {}", name, e));
        assert_eq!(graphs.len(), config.graphs.len());

        let grid_points = config.grid.nx * config.grid.ny;
        for (id, graph) in &graphs {
            let summary = GraphSummary::from_graph(graph);
            assert_eq!(summary.num_grid_nodes, grid_points, "{name}/{id}");
            let components: BTreeSet<&str> =
                summary.edges_per_component.keys().map(String::as_str).collect();
            assert_eq!(components, BTreeSet::from(["g2m", "m2g", "m2m"]), "{name}/{id}");
        }
    }
}

#[test]
fn hierarchical_config_is_capped() {
    let config = load(&configs_dir().join("archetypes.yaml")).unwrap();
    let graphs: Vec<(String, AdjacencyGraph)> = build_graphs(&config).unwrap();
    let (_, hierarchical) = graphs
        .iter()
        .find(|(id, _)| id == "hierarchical")
        .unwrap();
    let levels: BTreeSet<u32> = hierarchical
        .nodes()
        .filter(|(_, a)| a.kind == NodeKind::Mesh)
        .map(|(_, a)| a.level)
        .collect();
    assert_eq!(levels, BTreeSet::from([1, 2, 3]));
}

#[test]
fn grid_too_coarse_for_mesh_fails_to_build() {
    let yaml = r#"
version: 1
name: too coarse
grid: { nx: 4, ny: 4 }
graphs:
  - id: g
    kind: { type: keisler, grid_refinement_factor: 4 }
"#;
    let config = wmg_config::from_yaml_str(yaml).unwrap();
    let err = build_graphs::<AdjacencyGraph>(&config).unwrap_err();
    assert!(matches!(err, ConfigError::Build(_)));
}
