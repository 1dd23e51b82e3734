use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use wmg_config::{ConfigResult, GraphConfigFile};
use wmg_create::{Archetype, ArchetypeParams, GridCoords};
use wmg_graph::{AnyGraph, BackendKind, GraphSummary, use_backend};

#[derive(Parser)]
#[command(name = "wmg")]
#[command(about = "Weather model graphs - mesh graph generation for GNN weather models", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a graph configuration file
    Validate {
        /// Path to the YAML or JSON configuration file
        config_path: PathBuf,
    },
    /// Build every graph declared in a configuration file
    Build {
        /// Path to the YAML or JSON configuration file
        config_path: PathBuf,
        /// Graph engine to build on (adjacency or petgraph)
        #[arg(long, default_value = "adjacency")]
        backend: BackendKind,
        /// Print summaries as JSON
        #[arg(long)]
        json: bool,
    },
    /// Build one archetype graph over a uniform grid
    Archetype {
        /// keisler, graphcast or oskarsson_hierarchical
        kind: Archetype,
        /// Grid points along x
        #[arg(long)]
        nx: usize,
        /// Grid points along y
        #[arg(long)]
        ny: usize,
        #[arg(long, default_value_t = 3)]
        grid_refinement_factor: usize,
        #[arg(long, default_value_t = 3)]
        level_refinement_factor: usize,
        /// Cap on the number of mesh levels (unbounded if omitted)
        #[arg(long)]
        max_num_levels: Option<usize>,
        /// Graph engine to build on (adjacency or petgraph)
        #[arg(long, default_value = "adjacency")]
        backend: BackendKind,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct NamedSummary {
    id: String,
    #[serde(flatten)]
    summary: GraphSummary,
}

fn main() -> ConfigResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { config_path } => cmd_validate(&config_path),
        Commands::Build {
            config_path,
            backend,
            json,
        } => cmd_build(&config_path, backend, json),
        Commands::Archetype {
            kind,
            nx,
            ny,
            grid_refinement_factor,
            level_refinement_factor,
            max_num_levels,
            backend,
            json,
        } => {
            let params = ArchetypeParams {
                grid_refinement_factor,
                level_refinement_factor,
                max_num_levels,
            };
            cmd_archetype(kind, nx, ny, &params, backend, json)
        }
    }
}

fn cmd_validate(config_path: &Path) -> ConfigResult<()> {
    println!("Validating configuration: {}", config_path.display());
    let config = wmg_config::load(config_path)?;
    println!("✓ Configuration is valid");
    print_config_overview(&config);
    Ok(())
}

fn print_config_overview(config: &GraphConfigFile) {
    println!("  Name: {}", config.name);
    println!("  Grid: {} x {}", config.grid.nx, config.grid.ny);
    if config.graphs.is_empty() {
        println!("  No graphs declared");
    } else {
        println!("  Graphs:");
        for graph in &config.graphs {
            let components = graph.kind.components();
            match components {
                Ok(c) => println!(
                    "    {} - m2m: {}, g2m: {}, m2g: {}",
                    graph.id,
                    c.m2m.name(),
                    c.g2m.name(),
                    c.m2g.name()
                ),
                Err(e) => println!("    {} - {}", graph.id, e),
            }
        }
    }
}

fn cmd_build(config_path: &Path, backend: BackendKind, json: bool) -> ConfigResult<()> {
    tracing::debug!(path = %config_path.display(), %backend, "loading configuration");
    let config = wmg_config::load(config_path)?;
    let graphs: Vec<(String, AnyGraph)> = {
        let _scope = use_backend(backend);
        wmg_config::build_graphs(&config)?
    };

    let summaries: Vec<NamedSummary> = graphs
        .iter()
        .map(|(id, graph)| NamedSummary {
            id: id.clone(),
            summary: GraphSummary::from_graph(graph),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    } else {
        println!(
            "Built {} graph(s) from {} on {}",
            summaries.len(),
            config.name,
            backend
        );
        for named in &summaries {
            print_summary(&named.id, &named.summary);
        }
    }
    Ok(())
}

fn cmd_archetype(
    kind: Archetype,
    nx: usize,
    ny: usize,
    params: &ArchetypeParams,
    backend: BackendKind,
    json: bool,
) -> ConfigResult<()> {
    let xy = GridCoords::unit_square(nx, ny)?;
    let graph: AnyGraph = {
        let _scope = use_backend(backend);
        kind.build(&xy, params)?
    };
    let summary = GraphSummary::from_graph(&graph);

    if json {
        let named = NamedSummary {
            id: kind.to_string(),
            summary,
        };
        println!("{}", serde_json::to_string_pretty(&named)?);
    } else {
        print_summary(kind.as_str(), &summary);
    }
    Ok(())
}

fn print_summary(id: &str, summary: &GraphSummary) {
    println!("✓ {}", id);
    println!(
        "  Nodes: {} ({} grid, {} mesh)",
        summary.num_nodes,
        summary.num_grid_nodes,
        summary.num_mesh_nodes()
    );
    for (level, count) in &summary.mesh_nodes_per_level {
        println!("    level {}: {} mesh nodes", level, count);
    }
    println!("  Edges: {}", summary.num_edges);
    for (component, count) in &summary.edges_per_component {
        println!("    {}: {}", component, count);
    }
    if let Some(max_len) = summary.max_edge_len {
        println!("  Longest edge: {:.4}", max_len);
    }
}
