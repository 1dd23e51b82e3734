//! wmg-config: graph configuration files and validation.

pub mod schema;
pub mod validate;

use std::path::Path;

use wmg_core::WmgError;
use wmg_create::GraphAssembler;
use wmg_graph::GraphBackend;

pub use schema::*;
pub use validate::{ValidationError, validate_config};

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Build error: {0}")]
    Build(#[from] WmgError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn from_yaml_str(content: &str) -> ConfigResult<GraphConfigFile> {
    let config: GraphConfigFile = serde_yaml::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn load_yaml(path: &Path) -> ConfigResult<GraphConfigFile> {
    let content = std::fs::read_to_string(path)?;
    from_yaml_str(&content)
}

pub fn save_yaml(path: &Path, config: &GraphConfigFile) -> ConfigResult<()> {
    validate_config(config)?;
    let content = serde_yaml::to_string(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ConfigResult<GraphConfigFile> {
    let content = std::fs::read_to_string(path)?;
    let config: GraphConfigFile = serde_json::from_str(&content)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn save_json(path: &Path, config: &GraphConfigFile) -> ConfigResult<()> {
    validate_config(config)?;
    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load a `.json` file as JSON and anything else as YAML.
pub fn load(path: &Path) -> ConfigResult<GraphConfigFile> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => load_json(path),
        _ => load_yaml(path),
    }
}

/// Build every graph in the configuration, in declaration order.
pub fn build_graphs<G: GraphBackend>(config: &GraphConfigFile) -> ConfigResult<Vec<(String, G)>> {
    validate_config(config)?;
    let xy = config.grid.coords()?;

    let mut graphs = Vec::with_capacity(config.graphs.len());
    for def in &config.graphs {
        tracing::info!(config = %config.name, graph = %def.id, "building graph");
        let graph = GraphAssembler::new(def.kind.components()?)?.assemble(&xy)?;
        graphs.push((def.id.clone(), graph));
    }
    Ok(graphs)
}
