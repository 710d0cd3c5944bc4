//! Route command handler for computing paths between OSM nodes.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use osmgraph_cli::output::{render_route, to_json, OutputFormat};
use osmgraph_cli::terminal::ColorPalette;
use osmgraph_lib::{plan_route, RouteRequest};

use super::load_map;

/// Handle the route subcommand.
///
/// Unknown ids and unreachable goals surface as errors so the process exits
/// non-zero with the library's message.
pub fn handle_route(map: &Path, format: OutputFormat, from: i64, to: i64) -> Result<()> {
    let (graph, _) = load_map(map)?;
    let request = RouteRequest::new(from, to);
    let plan = plan_route(&graph, &request)
        .with_context(|| format!("failed to plan route from {from} to {to}"))?;
    info!(
        hops = plan.hop_count(),
        distance = plan.distance,
        "route planned"
    );

    match format {
        OutputFormat::Text => print!("{}", render_route(&plan, &ColorPalette::detect())),
        OutputFormat::Json => println!("{}", to_json(&plan)?),
    }
    Ok(())
}
