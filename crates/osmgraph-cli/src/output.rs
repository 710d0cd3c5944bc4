//! Output formatting for command results.
//!
//! Every command produces a serialisable value. Text rendering turns it into
//! a short human-readable report; JSON rendering hands it to `serde_json`
//! unchanged so scripts see the same field names as the library types.

use std::fmt::Write as _;

use clap::ValueEnum;
use osmgraph_lib::{Coord, IngestReport, RoutePlan, VertexProperties};
use serde::Serialize;

use crate::terminal::{format_meters, format_with_separators, ColorPalette};

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Result of the `summary` command.
#[derive(Debug, Clone, Serialize)]
pub struct MapSummary {
    pub map: String,
    pub report: IngestReport,
}

/// Result of the `nearest` command.
#[derive(Debug, Clone, Serialize)]
pub struct NearestMatch {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    /// First vertex inside the search square, if any.
    pub vertex: Option<VertexProperties>,
}

/// Result of the `street` command.
#[derive(Debug, Clone, Serialize)]
pub struct StreetMatch {
    pub name: String,
    pub from: VertexProperties,
    pub to: VertexProperties,
    pub weight: f64,
    pub oneway: bool,
}

/// Serialise a command result as pretty-printed JSON.
pub fn to_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

pub fn render_summary(summary: &MapSummary, palette: &ColorPalette) -> String {
    let report = &summary.report;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}Map {}{}",
        palette.heading, summary.map, palette.reset
    );
    let _ = writeln!(
        out,
        "Vertices: {}",
        format_with_separators(report.vertices as u64)
    );
    let _ = writeln!(out, "Edges: {}", format_with_separators(report.edges as u64));
    let _ = writeln!(
        out,
        "Nodes: {} staged, {} hidden",
        report.nodes_staged, report.nodes_hidden
    );
    let _ = writeln!(
        out,
        "Ways: {} of {} materialized ({} hidden, {} without highway tag)",
        report.ways_materialized, report.ways_seen, report.ways_hidden, report.ways_without_highway
    );
    if report.segments_skipped > 0 {
        let _ = writeln!(
            out,
            "{}Segments skipped: {} (unknown node references){}",
            palette.warning, report.segments_skipped, palette.reset
        );
    }
    out
}

pub fn render_route(plan: &RoutePlan, palette: &ColorPalette) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}Route from {} to {} ({} hops):{}",
        palette.heading,
        plan.start,
        plan.goal,
        plan.hop_count(),
        palette.reset
    );
    for step in &plan.steps {
        let _ = write!(
            out,
            "  {:>3}. {}{}{} {}{}{}",
            step.index,
            palette.id,
            step.id,
            palette.reset,
            palette.muted,
            format_coord(&step.coord),
            palette.reset
        );
        if step.index > 0 {
            let _ = write!(
                out,
                " {}+{}{}",
                palette.distance,
                format_meters(step.leg),
                palette.reset
            );
        }
        out.push('\n');
    }
    let _ = writeln!(
        out,
        "Total distance: {}{}{}",
        palette.distance,
        format_meters(plan.distance),
        palette.reset
    );
    out
}

pub fn render_nearest(result: &NearestMatch, palette: &ColorPalette) -> String {
    let query = format_coord(&Coord::new(result.x, result.y));
    match &result.vertex {
        Some(vertex) => format!(
            "Nearest vertex to {query}: {}{}{} {}{}{}\n",
            palette.id,
            vertex.id,
            palette.reset,
            palette.muted,
            format_coord(&vertex.coord),
            palette.reset
        ),
        None => format!(
            "No vertex within {} of {query}\n",
            format_meters(result.radius)
        ),
    }
}

pub fn render_street(result: &StreetMatch, palette: &ColorPalette) -> String {
    let direction = if result.oneway { "one-way" } else { "two-way" };
    format!(
        "{}{}{}: {}{}{} -> {}{}{} ({}, {}{}{})\n",
        palette.heading,
        result.name,
        palette.reset,
        palette.id,
        result.from.id,
        palette.reset,
        palette.id,
        result.to.id,
        palette.reset,
        direction,
        palette.distance,
        format_meters(result.weight),
        palette.reset
    )
}

fn format_coord(coord: &Coord) -> String {
    format!("({:.2}, {:.2})", coord.x, coord.y)
}
