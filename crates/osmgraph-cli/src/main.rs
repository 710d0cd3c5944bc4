use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use osmgraph_cli::output::OutputFormat;

mod commands;

/// Environment variable consulted when `--map` is not given.
const MAP_ENV_VAR: &str = "OSMGRAPH_MAP";

#[derive(Parser, Debug)]
#[command(author, version, about = "OpenStreetMap road graph utilities")]
struct Cli {
    /// OSM XML file to load. Falls back to the OSMGRAPH_MAP environment variable.
    #[arg(long, global = true)]
    map: Option<PathBuf>,

    /// Output format for command results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the map and report vertex, edge and ingestion counts.
    Summary,
    /// Compute the shortest route between two OSM node ids.
    Route {
        /// Starting node id.
        #[arg(long = "from", allow_negative_numbers = true)]
        from: i64,
        /// Destination node id.
        #[arg(long = "to", allow_negative_numbers = true)]
        to: i64,
    },
    /// Find the first vertex inside a square around a projected position.
    Nearest {
        /// Projected x coordinate in meters.
        #[arg(long, allow_negative_numbers = true)]
        x: f64,
        /// Projected y coordinate in meters.
        #[arg(long, allow_negative_numbers = true)]
        y: f64,
        /// Half-width of the search square in meters.
        #[arg(long, default_value_t = 10.0, allow_negative_numbers = true)]
        radius: f64,
    },
    /// Show the first edge carrying a street name.
    Street {
        /// Exact street name.
        #[arg(long)]
        name: String,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let map = commands::resolve_map_path(cli.map, std::env::var_os(MAP_ENV_VAR))?;

    match cli.command {
        Command::Summary => commands::summary::handle_summary(&map, cli.format),
        Command::Route { from, to } => commands::route::handle_route(&map, cli.format, from, to),
        Command::Nearest { x, y, radius } => {
            commands::nearest::handle_nearest(&map, cli.format, x, y, radius)
        }
        Command::Street { name } => commands::street::handle_street(&map, cli.format, &name),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
