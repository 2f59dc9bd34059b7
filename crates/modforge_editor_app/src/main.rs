// SPDX-License-Identifier: MIT OR Apache-2.0
//! `ModForge` - node-based program module editor
//!
//! Command line front end over the editor session:
//! - Create and inspect projects
//! - Browse the module catalog
//! - Place modules and connect them on the canvas
//!
//! Logging goes through `tracing`; `RUST_LOG` overrides the filter from the
//! settings file.

use clap::{Parser, Subcommand};
use modforge_editor_app::settings::SETTINGS_FILE_NAME;
use modforge_editor_app::{EditorSession, EditorSettings, ProjectFile, SessionError};
use modforge_editor_graph::{config, ConnectionType, ModuleCatalog};
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settings file (RON)
    #[arg(long, global = true, default_value = SETTINGS_FILE_NAME)]
    settings: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new project with a start node
    New {
        /// Project directory
        dir: PathBuf,

        /// Project name
        #[arg(long, default_value = "My Program")]
        name: String,
    },

    /// Print the canvas of a project
    Inspect {
        /// Project directory
        dir: PathBuf,
    },

    /// List module templates
    Catalog {
        /// Only templates whose name or description contains this
        #[arg(long, default_value = "")]
        search: String,

        /// Only templates in this category
        #[arg(long)]
        category: Option<String>,
    },

    /// Place a catalog module on the canvas
    Add {
        /// Project directory
        dir: PathBuf,

        /// Template ID
        template: String,

        /// Canvas X position
        #[arg(long, default_value_t = 0.0)]
        x: f32,

        /// Canvas Y position
        #[arg(long, default_value_t = 0.0)]
        y: f32,

        /// Node name (defaults to the template name)
        #[arg(long)]
        name: Option<String>,
    },

    /// Connect two nodes
    Connect {
        /// Project directory
        dir: PathBuf,

        /// Source node name or ID
        source: String,

        /// Target node name or ID
        target: String,

        /// Connection type (data, instruction, token, account, nft, flow)
        connection_type: ConnectionType,
    },
}

fn main() {
    let cli = Cli::parse();
    let (settings, settings_error) = EditorSettings::load_or_default(&cli.settings);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Some(err) = settings_error {
        tracing::warn!("Using default settings: {err}");
    }
    tracing::debug!("ModForge v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(cli.command, settings) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

fn run(command: Commands, settings: EditorSettings) -> Result<(), SessionError> {
    match command {
        Commands::New { dir, name } => {
            EditorSession::create(&dir, &name, settings)?;
            println!("Created {name} in {}", dir.display());
        }
        Commands::Inspect { dir } => inspect(&dir, settings)?,
        Commands::Catalog { search, category } => {
            let catalog = ModuleCatalog::new(Vec::new());
            for template in catalog.search(&search, category.as_deref()) {
                println!(
                    "{:<16} {:<18} [{}] {}",
                    template.id, template.name, template.category, template.description
                );
            }
        }
        Commands::Add {
            dir,
            template,
            x,
            y,
            name,
        } => {
            let mut session = EditorSession::open(&dir, settings)?;
            let id = session.add_module(&template, [x, y])?;
            if let Some(name) = name {
                session.rename_node(id, &name);
            }
            session.save()?;
            println!("Added {template} as {id}");
        }
        Commands::Connect {
            dir,
            source,
            target,
            connection_type,
        } => {
            let mut session = EditorSession::open(&dir, settings)?;
            let source = session.resolve_node(&source)?;
            let target = session.resolve_node(&target)?;
            let id = session.connect(source, target, connection_type)?;
            session.save()?;
            println!("Connected {source} -> {target} ({connection_type}) as {id}");
        }
    }
    Ok(())
}

fn inspect(dir: &Path, settings: EditorSettings) -> Result<(), SessionError> {
    let session = EditorSession::open(dir, settings)?;
    let graph = session.graph();
    println!(
        "{} v{}: {} nodes, {} connections",
        session.metadata().name,
        session.metadata().version,
        graph.node_count(),
        graph.connection_count()
    );

    for node in graph.nodes() {
        let config = config::decode(&node.config_blob);
        println!(
            "  {} [{}] at ({}, {}) - {} parameters, {} accounts, {} constraints, {} links",
            node.name,
            node.kind(),
            node.position[0],
            node.position[1],
            config.parameters.len(),
            config.accounts.len(),
            config.constraints.len(),
            graph.connections_for_node(node.id).count()
        );
    }

    for connection in graph.connections() {
        let name = |id| graph.node(id).map_or("?", |n| n.name.as_str());
        println!(
            "  {} -> {} ({})",
            name(connection.source),
            name(connection.target),
            connection.connection_type
        );
    }
    Ok(())
}
