//! osmgraph CLI library.
//!
//! Rendering helpers shared by the `osmgraph-cli` binary: output formats,
//! text/JSON renderers and terminal styling.

pub mod output;
pub mod terminal;
