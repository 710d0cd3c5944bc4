//! Summary command handler.

use std::path::Path;

use anyhow::Result;

use osmgraph_cli::output::{render_summary, to_json, MapSummary, OutputFormat};
use osmgraph_cli::terminal::ColorPalette;

use super::load_map;

/// Handle the summary subcommand.
pub fn handle_summary(map: &Path, format: OutputFormat) -> Result<()> {
    let (_, report) = load_map(map)?;
    let summary = MapSummary {
        map: map.display().to_string(),
        report,
    };

    match format {
        OutputFormat::Text => print!("{}", render_summary(&summary, &ColorPalette::detect())),
        OutputFormat::Json => println!("{}", to_json(&summary)?),
    }
    Ok(())
}
