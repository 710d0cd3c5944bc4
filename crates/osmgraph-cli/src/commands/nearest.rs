//! Nearest command handler: box-based vertex picking.

use std::path::Path;

use anyhow::{ensure, Result};

use osmgraph_cli::output::{render_nearest, to_json, NearestMatch, OutputFormat};
use osmgraph_cli::terminal::ColorPalette;

use super::load_map;

/// Handle the nearest subcommand. A miss is reported, not treated as an error.
pub fn handle_nearest(map: &Path, format: OutputFormat, x: f64, y: f64, radius: f64) -> Result<()> {
    ensure!(
        radius.is_finite() && radius >= 0.0,
        "radius must be a non-negative number, got {radius}"
    );
    let (graph, _) = load_map(map)?;

    let vertex = match graph.find_vertex_near(x, y, radius) {
        Some(handle) => Some(graph.vertex(handle)?.clone()),
        None => None,
    };
    let result = NearestMatch {
        x,
        y,
        radius,
        vertex,
    };

    match format {
        OutputFormat::Text => print!("{}", render_nearest(&result, &ColorPalette::detect())),
        OutputFormat::Json => println!("{}", to_json(&result)?),
    }
    Ok(())
}
