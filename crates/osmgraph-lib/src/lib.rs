//! osmgraph library entry points.
//!
//! This crate ingests OpenStreetMap XML road data into an in-memory directed
//! graph projected onto a local plane, exposes the graph for lookups and
//! interactive editing, and answers shortest-path queries between vertices.
//! Higher-level consumers (the CLI, map viewers) should only depend on the
//! items exported here instead of reimplementing behavior.
//!
//! Everything runs synchronously on the calling thread. A [`Graph`] has no
//! internal locking; wrap it in a lock if several threads need to mutate or
//! query the same instance.

mod arena;
pub mod error;
pub mod graph;
pub mod osm;
pub mod path;
pub mod projection;
pub mod routing;

pub use error::{Error, ParseError, Result};
pub use graph::{
    Connection, Coord, EdgeHandle, EdgeProperties, EdgeRef, Graph, VertexHandle, VertexId,
    VertexProperties,
};
pub use osm::{
    build_graph, ingest, ingest_with_report, load_osm_file, load_osm_file_with_report,
    parse_document, IngestReport, OsmDocument,
};
pub use path::{shortest_path, ShortestPath};
pub use projection::{Bounds, Projector, METERS_PER_DEGREE_LAT};
pub use routing::{plan_route, RoutePlan, RouteRequest, RouteStep};
