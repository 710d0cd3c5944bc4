//! Street command handler: look up an edge by name.

use std::path::Path;

use anyhow::{anyhow, Result};

use osmgraph_cli::output::{render_street, to_json, OutputFormat, StreetMatch};
use osmgraph_cli::terminal::ColorPalette;

use super::load_map;

/// Handle the street subcommand.
pub fn handle_street(map: &Path, format: OutputFormat, name: &str) -> Result<()> {
    let (graph, _) = load_map(map)?;
    let edge = graph
        .find_edge_by_name(name)
        .ok_or_else(|| anyhow!("no street named {name:?} in {}", map.display()))?;

    let properties = graph.edge(edge)?;
    let (from, to) = graph.edge_endpoints(edge)?;
    let result = StreetMatch {
        name: properties.name.clone(),
        from: graph.vertex(from)?.clone(),
        to: graph.vertex(to)?.clone(),
        weight: properties.weight,
        oneway: properties.oneway,
    };

    match format {
        OutputFormat::Text => print!("{}", render_street(&result, &ColorPalette::detect())),
        OutputFormat::Json => println!("{}", to_json(&result)?),
    }
    Ok(())
}
