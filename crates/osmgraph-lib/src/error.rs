use std::path::PathBuf;

use thiserror::Error;

use crate::graph::{EdgeHandle, VertexHandle, VertexId};

/// Convenient result alias for the osmgraph library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Ingestion failed; no graph was produced.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Raised when a vertex handle no longer refers to a live vertex.
    #[error("vertex handle {handle} is stale or was never issued by this graph")]
    StaleVertex { handle: VertexHandle },

    /// Raised when an edge handle no longer refers to a live edge.
    #[error("edge handle {handle} is stale or was never issued by this graph")]
    StaleEdge { handle: EdgeHandle },

    /// Raised when an edge could not be created between the given vertices.
    #[error("edge from {from} to {to} was rejected: both endpoints must be live vertices")]
    EdgeRejected { from: VertexHandle, to: VertexHandle },

    /// Raised when a vertex identifier could not be found in the graph.
    #[error("unknown vertex id: {id}")]
    UnknownVertexId { id: VertexId },

    /// Raised when no path exists between two vertices.
    #[error("no path found between {start} and {goal}")]
    PathNotFound { start: VertexId, goal: VertexId },
}

impl Error {
    /// Whether this error came out of the ingestion pipeline.
    pub fn is_parse(&self) -> bool {
        matches!(self, Error::Parse(_))
    }
}

/// Failure while reading or interpreting an OSM XML document.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The document is not well-formed XML.
    #[error("malformed XML near byte {position}: {source}")]
    Xml {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    /// A required element is absent from the document.
    #[error("document is missing required <{element}> element")]
    MissingElement { element: &'static str },

    /// A required attribute is absent from an element.
    #[error("<{element}> element is missing required attribute '{attribute}'")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    /// An attribute is present but its value cannot be interpreted.
    #[error("<{element}> element has invalid {attribute}=\"{value}\"")]
    InvalidAttribute {
        element: &'static str,
        attribute: &'static str,
        value: String,
    },

    /// The document ended while elements were still open.
    #[error("document ended before all elements were closed")]
    UnexpectedEof,

    /// Character data or a second element outside the `<osm>` root.
    #[error("unexpected content outside the <osm> element near byte {position}")]
    UnexpectedContent { position: u64 },

    /// The input file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
