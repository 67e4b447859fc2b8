use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dag_bisect::{
    config::{Config, OutputFormat},
    dag::{load_declarations, Dag},
    reports::{order_nodes, QueryReport, ReportGenerator},
};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dag-bisect")]
#[command(about = "Leaf, ancestor and bisection queries over a topologically declared DAG")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (overrides the configuration file)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format (text, json, yaml)
    #[arg(short, long)]
    format: Option<String>,

    /// List nodes in declaration order instead of by name
    #[arg(long)]
    declaration_order: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List nodes nothing depends on
    Leaves {
        /// Declaration file (JSON or YAML)
        #[arg(short, long)]
        input: PathBuf,
    },

    /// List nodes declared without parents
    Roots {
        /// Declaration file (JSON or YAML)
        #[arg(short, long)]
        input: PathBuf,
    },

    /// List the ancestors of a node, the node included
    Ancestors {
        /// Declaration file (JSON or YAML)
        #[arg(short, long)]
        input: PathBuf,

        /// Node to resolve
        #[arg(short, long)]
        node: String,
    },

    /// Find the node(s) splitting the graph most evenly
    Bisect {
        /// Declaration file (JSON or YAML)
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Print node, edge and degree statistics
    Stats {
        /// Declaration file (JSON or YAML)
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Check that a declaration file is topologically ordered
    Validate {
        /// Declaration file (JSON or YAML)
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Initialize configuration file
    Init {
        /// Configuration file path
        #[arg(short, long, default_value = "dag-bisect.yml")]
        config_file: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(&cli)?;

    // Initialize tracing
    init_tracing(&config.logging.level)?;

    info!("Starting dag-bisect");
    if let Some(path) = &cli.config {
        if path.exists() {
            info!("Loaded configuration from: {:?}", path);
        } else {
            warn!("Configuration file not found: {:?}. Using defaults.", path);
        }
    }

    let sorted = config.output.sorted;

    let report = match cli.command {
        Commands::Leaves { input } => {
            let dag = build_dag(&input)?;
            QueryReport::Leaves {
                nodes: order_nodes(&dag, &dag.get_leaves(), sorted),
            }
        }

        Commands::Roots { input } => {
            let dag = build_dag(&input)?;
            QueryReport::Roots {
                nodes: order_nodes(&dag, &dag.get_roots(), sorted),
            }
        }

        Commands::Ancestors { input, node } => {
            let dag = build_dag(&input)?;
            let ancestors = dag
                .get_ancestors(&node)
                .with_context(|| format!("Failed to resolve ancestors of '{}'", node))?;
            QueryReport::Ancestors {
                nodes: order_nodes(&dag, &ancestors, sorted),
                node,
            }
        }

        Commands::Bisect { input } => {
            let dag = build_dag(&input)?;
            let mut bisect = dag.bisect_report();
            if !sorted {
                let winners: HashSet<String> = bisect.nodes.drain(..).collect();
                bisect.nodes = order_nodes(&dag, &winners, false);
            }
            info!(
                "Best bisection score {} over {} nodes",
                bisect.best_score, bisect.total_nodes
            );
            QueryReport::Bisect(bisect)
        }

        Commands::Stats { input } => {
            let dag = build_dag(&input)?;
            QueryReport::Statistics(dag.statistics())
        }

        Commands::Validate { input } => {
            let dag = build_dag(&input)?;
            QueryReport::Validation {
                nodes: dag.node_count(),
                edges: dag.edge_count(),
            }
        }

        Commands::Init { config_file, force } => {
            return init_config(&config_file, force);
        }
    };

    let content = ReportGenerator::new().generate(&report, config.output.format)?;
    println!("{}", content);

    Ok(())
}

/// Initialize tracing with the specified log level
fn init_tracing(log_level: &str) -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(log_level))
        .context("Failed to create env filter")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true),
        )
        .with(env_filter)
        .init();

    Ok(())
}

/// Resolve configuration: defaults, then file, then environment, then flags
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::default();

    if let Some(path) = cli.config.as_ref().filter(|path| path.exists()) {
        let from_file = Config::load_from_file(path)
            .with_context(|| format!("Failed to load configuration file: {:?}", path))?;
        config.merge_with(from_file);
    }

    config
        .apply_env()
        .context("Invalid DAG_BISECT_* environment variable")?;

    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(format) = &cli.format {
        config.output.format = format.parse::<OutputFormat>()?;
    }
    if cli.declaration_order {
        config.output.sorted = false;
    }

    config.validate()?;
    Ok(config)
}

/// Load a declaration file and build the DAG from it
fn build_dag(input: &Path) -> Result<Dag> {
    let declarations = load_declarations(input)?;
    let dag = Dag::new(declarations)
        .with_context(|| format!("Declarations in {:?} do not form a valid DAG", input))?;

    info!(
        "Built DAG with {} nodes and {} edges from {:?}",
        dag.node_count(),
        dag.edge_count(),
        input
    );
    Ok(dag)
}

/// Initialize configuration file
fn init_config(config_file: &Path, force: bool) -> Result<()> {
    info!("Initializing configuration file: {:?}", config_file);

    if config_file.exists() && !force {
        warn!(
            "Configuration file already exists: {:?}. Pass --force to overwrite.",
            config_file
        );
        return Ok(());
    }

    Config::default()
        .save_to_file(config_file)
        .with_context(|| format!("Failed to write configuration file: {:?}", config_file))?;

    info!("Configuration file created successfully: {:?}", config_file);
    println!("Configuration file created: {:?}", config_file);

    Ok(())
}
