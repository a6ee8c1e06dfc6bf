use anyhow::Context;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use depscope::analysis::{analyze, AnalysisRequest, CancelToken};
use depscope::export::{export_to_string, ExportFormat};
use depscope::graph::{BuilderOptions, Granularity};
use depscope::workspace::{AnalysisScope, Workspace};

#[derive(Parser)]
#[command(name = "depscope")]
#[command(version = "0.1.0")]
#[command(about = "Dependency graph analysis over a code symbol model", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a workspace description and print the dependency graph
    Analyze {
        /// Path to a workspace JSON file
        #[arg(short, long)]
        workspace: PathBuf,

        /// Scope: solution, project:NAME, namespace:NS, or type:PATH
        #[arg(short, long, default_value = "solution")]
        scope: String,

        /// Granularity: type, namespace, or project
        #[arg(short, long, default_value = "type")]
        granularity: String,

        /// Include external namespaces and assemblies
        #[arg(long)]
        include_external: bool,

        /// Maximum number of nodes to return
        #[arg(long, default_value_t = depscope::graph::DEFAULT_MAX_NODES)]
        max_nodes: usize,

        /// Output format: json, markdown, or csv
        #[arg(short, long, default_value = "json")]
        format: String,

        /// Write output to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Analyze {
            workspace,
            scope,
            granularity,
            include_external,
            max_nodes,
            format,
            output,
        }) => {
            let content = fs::read_to_string(&workspace)
                .with_context(|| format!("failed to read workspace file {}", workspace.display()))?;
            let workspace: Workspace =
                serde_json::from_str(&content).context("failed to parse workspace JSON")?;

            let scope: AnalysisScope = scope.parse().map_err(anyhow::Error::msg)?;
            let granularity: Granularity = granularity.parse().map_err(anyhow::Error::msg)?;
            let format: ExportFormat = format.parse().map_err(anyhow::Error::msg)?;

            let request = AnalysisRequest {
                scope,
                granularity,
                options: BuilderOptions {
                    include_external,
                    ..BuilderOptions::default()
                },
                window: depscope::graph::WindowOptions {
                    max_nodes,
                    ..Default::default()
                },
            };

            let result = analyze(&workspace, &request, &CancelToken::new())?;
            let rendered = export_to_string(format, &result)?;

            match output {
                Some(path) => fs::write(&path, rendered)
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => print!("{}", rendered),
            }
        }
        Some(Commands::Version) => {
            println!("depscope v{}", env!("CARGO_PKG_VERSION"));
        }
        None => {
            println!("Depscope - dependency graph analysis");
            println!("Run 'depscope analyze --workspace ws.json' to analyze a workspace");
            println!("Run 'depscope --help' for more information");
        }
    }

    Ok(())
}
