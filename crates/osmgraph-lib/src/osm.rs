//! OpenStreetMap XML ingestion.
//!
//! Ingestion runs in two phases:
//!
//! 1. [`parse_document`] streams the XML into an [`OsmDocument`]: the bounds,
//!    a node table keyed by OSM id, and every way with its complete list of
//!    node references and tags.
//! 2. [`build_graph`] projects the staged nodes and turns each visible
//!    `highway` way into directed edges.
//!
//! Because a way is fully buffered before it is interpreted, `oneway=-1`
//! reversal sees the whole reference list no matter where the tag appears
//! inside the element. Any failure in either phase aborts ingestion; no
//! partially built graph is ever returned.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{ParseError, Result};
use crate::graph::{Coord, EdgeProperties, Graph, VertexHandle, VertexId, VertexProperties};
use crate::projection::{Bounds, Projector};

/// Node position as read from the document, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawNode {
    pub lat: f64,
    pub lon: f64,
}

/// Way as read from the document, before any interpretation of its tags.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawWay {
    pub id: Option<i64>,
    pub visible: bool,
    /// Referenced node ids, in document order.
    pub refs: Vec<VertexId>,
    /// Tags in document order.
    pub tags: Vec<(String, String)>,
}

impl RawWay {
    /// Value of tag `key`; the last occurrence wins.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn road(&self) -> Option<Road<'_>> {
        self.tag("highway")?;
        let direction = match self.tag("oneway") {
            Some("yes") => Direction::Forward,
            Some("-1") => Direction::Backward,
            _ => Direction::Both,
        };
        Some(Road {
            name: self.tag("name").unwrap_or_default(),
            direction,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Both,
    Forward,
    Backward,
}

#[derive(Debug, Clone, Copy)]
struct Road<'a> {
    name: &'a str,
    direction: Direction,
}

/// Staged contents of an OSM XML document.
#[derive(Debug, Clone, Default)]
pub struct OsmDocument {
    pub bounds: Option<Bounds>,
    /// Visible nodes keyed by id; a repeated id keeps the last position.
    pub nodes: HashMap<VertexId, RawNode>,
    /// Nodes dropped because they carried `visible="false"`.
    pub hidden_nodes: usize,
    pub ways: Vec<RawWay>,
}

/// Counters collected while building a graph from a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct IngestReport {
    pub nodes_staged: usize,
    pub nodes_hidden: usize,
    pub ways_seen: usize,
    pub ways_hidden: usize,
    pub ways_without_highway: usize,
    pub ways_materialized: usize,
    /// Segments dropped because an endpoint was not in the node table or
    /// the edge was rejected.
    pub segments_skipped: usize,
    pub vertices: usize,
    pub edges: usize,
}

/// Ingest an OSM XML document into a road graph.
pub fn ingest(xml: &str) -> Result<Graph> {
    ingest_with_report(xml).map(|(graph, _)| graph)
}

/// Ingest an OSM XML document, also returning ingestion counters.
pub fn ingest_with_report(xml: &str) -> Result<(Graph, IngestReport)> {
    let document = parse_document(xml)?;
    build_graph(&document)
}

/// Read and ingest an OSM XML file.
pub fn load_osm_file(path: &Path) -> Result<Graph> {
    load_osm_file_with_report(path).map(|(graph, _)| graph)
}

/// Read and ingest an OSM XML file, also returning ingestion counters.
pub fn load_osm_file_with_report(path: &Path) -> Result<(Graph, IngestReport)> {
    debug!(path = %path.display(), "loading OSM file");
    let xml = fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    ingest_with_report(&xml)
}

/// Parse an OSM XML document into its staged form.
pub fn parse_document(xml: &str) -> std::result::Result<OsmDocument, ParseError> {
    let mut reader = Reader::from_str(xml);
    let mut state = DocumentReader::default();

    loop {
        state.position = reader.buffer_position();
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(source) => {
                return Err(ParseError::Xml {
                    position: reader.error_position(),
                    source,
                })
            }
        };

        match event {
            Event::Start(element) => state.open(&element)?,
            Event::Empty(element) => {
                state.open(&element)?;
                state.close();
            }
            Event::End(_) => state.close(),
            Event::Text(text) if state.stack.is_empty() => {
                if !text.iter().all(u8::is_ascii_whitespace) {
                    return Err(ParseError::UnexpectedContent {
                        position: state.position,
                    });
                }
            }
            Event::CData(_) if state.stack.is_empty() => {
                return Err(ParseError::UnexpectedContent {
                    position: state.position,
                });
            }
            Event::Eof => break,
            _ => {}
        }
    }

    state.finish()
}

/// Project the staged nodes and materialize every visible `highway` way.
///
/// Vertices are created lazily, the first time a valid segment references a
/// node, so nodes that only appear in non-road ways never enter the graph.
pub fn build_graph(document: &OsmDocument) -> Result<(Graph, IngestReport)> {
    let bounds = document.bounds.ok_or(ParseError::MissingElement {
        element: "bounds",
    })?;
    if bounds.is_degenerate() {
        warn!(?bounds, "bounds have zero extent");
    }
    let projector = Projector::from_bounds(&bounds);

    let positions: HashMap<VertexId, Coord> = document
        .nodes
        .iter()
        .map(|(&id, node)| (id, projector.project(node.lat, node.lon)))
        .collect();

    let mut graph = Graph::new();
    let mut handles: HashMap<VertexId, VertexHandle> = HashMap::new();
    let mut report = IngestReport {
        nodes_staged: positions.len(),
        nodes_hidden: document.hidden_nodes,
        ways_seen: document.ways.len(),
        ..IngestReport::default()
    };

    for way in &document.ways {
        if !way.visible {
            report.ways_hidden += 1;
            continue;
        }
        let Some(road) = way.road() else {
            report.ways_without_highway += 1;
            continue;
        };
        report.ways_materialized += 1;

        let refs: Vec<VertexId> = match road.direction {
            Direction::Backward => way.refs.iter().rev().copied().collect(),
            Direction::Forward | Direction::Both => way.refs.clone(),
        };
        let oneway = road.direction != Direction::Both;

        for pair in refs.windows(2) {
            let (from_id, to_id) = (pair[0], pair[1]);
            let (Some(&from), Some(&to)) = (positions.get(&from_id), positions.get(&to_id)) else {
                debug!(way = ?way.id, from_id, to_id, "skipping segment with unknown node");
                report.segments_skipped += 1;
                continue;
            };

            let source = *handles.entry(from_id).or_insert_with(|| {
                graph.add_vertex(VertexProperties {
                    id: from_id,
                    coord: from,
                })
            });
            let target = *handles.entry(to_id).or_insert_with(|| {
                graph.add_vertex(VertexProperties {
                    id: to_id,
                    coord: to,
                })
            });

            let properties = EdgeProperties {
                name: road.name.to_string(),
                weight: from.distance_to(&to),
                oneway,
            };
            let mirror = (!oneway).then(|| properties.clone());

            if graph.add_edge(source, target, properties).is_none() {
                report.segments_skipped += 1;
                continue;
            }
            if let Some(properties) = mirror {
                graph.add_edge(target, source, properties);
            }
        }
    }

    report.vertices = graph.num_vertices();
    report.edges = graph.num_edges();

    if report.ways_materialized == 0 && report.ways_seen > 0 {
        warn!(
            ways = report.ways_seen,
            "document contains ways but none are highways"
        );
    }
    info!(
        vertices = report.vertices,
        edges = report.edges,
        ways = report.ways_materialized,
        skipped_segments = report.segments_skipped,
        "built road graph"
    );

    Ok((graph, report))
}

const MAX_LATITUDE: f64 = 90.0;
const MAX_LONGITUDE: f64 = 180.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Osm,
    Node,
    Way,
    Other,
}

#[derive(Debug, Default)]
struct DocumentReader {
    document: OsmDocument,
    stack: Vec<Frame>,
    way: Option<RawWay>,
    saw_root: bool,
    position: u64,
}

impl DocumentReader {
    fn open(&mut self, element: &BytesStart<'_>) -> std::result::Result<(), ParseError> {
        self.check_attributes(element)?;
        let parent = self.stack.last().copied();
        let frame = match (parent, element.local_name().as_ref()) {
            (None, b"osm") if !self.saw_root => {
                self.saw_root = true;
                Frame::Osm
            }
            (None, _) if self.saw_root => {
                return Err(ParseError::UnexpectedContent {
                    position: self.position,
                })
            }
            (None, _) => return Err(ParseError::MissingElement { element: "osm" }),
            (Some(Frame::Osm), b"bounds") => {
                self.document.bounds = Some(self.bounds(element)?);
                Frame::Other
            }
            (Some(Frame::Osm), b"node") => {
                self.node(element)?;
                Frame::Node
            }
            (Some(Frame::Osm), b"way") => {
                self.way = Some(RawWay {
                    id: self.optional(element, "way", "id")?,
                    visible: self.visible(element)?,
                    ..RawWay::default()
                });
                Frame::Way
            }
            (Some(Frame::Way), b"nd") => {
                let node_ref = self.required(element, "nd", "ref")?;
                if let Some(way) = self.way.as_mut() {
                    way.refs.push(node_ref);
                }
                Frame::Other
            }
            (Some(Frame::Way), b"tag") => {
                let key = self.text(element, "tag", "k")?;
                let value = self.text(element, "tag", "v")?;
                if let Some(way) = self.way.as_mut() {
                    way.tags.push((key, value));
                }
                Frame::Other
            }
            _ => Frame::Other,
        };

        self.stack.push(frame);
        Ok(())
    }

    fn close(&mut self) {
        if let Some(Frame::Way) = self.stack.pop() {
            if let Some(way) = self.way.take() {
                self.document.ways.push(way);
            }
        }
    }

    fn finish(self) -> std::result::Result<OsmDocument, ParseError> {
        if !self.saw_root {
            return Err(ParseError::MissingElement { element: "osm" });
        }
        if !self.stack.is_empty() {
            return Err(ParseError::UnexpectedEof);
        }
        if self.document.bounds.is_none() {
            return Err(ParseError::MissingElement { element: "bounds" });
        }

        debug!(
            nodes = self.document.nodes.len(),
            hidden_nodes = self.document.hidden_nodes,
            ways = self.document.ways.len(),
            "parsed OSM document"
        );
        Ok(self.document)
    }

    fn bounds(&self, element: &BytesStart<'_>) -> std::result::Result<Bounds, ParseError> {
        Ok(Bounds {
            min_lat: self.degrees(element, "bounds", "minlat", MAX_LATITUDE)?,
            max_lat: self.degrees(element, "bounds", "maxlat", MAX_LATITUDE)?,
            min_lon: self.degrees(element, "bounds", "minlon", MAX_LONGITUDE)?,
            max_lon: self.degrees(element, "bounds", "maxlon", MAX_LONGITUDE)?,
        })
    }

    fn node(&mut self, element: &BytesStart<'_>) -> std::result::Result<(), ParseError> {
        let id: VertexId = self.required(element, "node", "id")?;
        let node = RawNode {
            lat: self.degrees(element, "node", "lat", MAX_LATITUDE)?,
            lon: self.degrees(element, "node", "lon", MAX_LONGITUDE)?,
        };

        if self.visible(element)? {
            self.document.nodes.insert(id, node);
        } else {
            self.document.hidden_nodes += 1;
        }
        Ok(())
    }

    fn visible(&self, element: &BytesStart<'_>) -> std::result::Result<bool, ParseError> {
        Ok(self
            .attribute(element, "visible")?
            .map_or(true, |value| value != "false"))
    }

    fn degrees(
        &self,
        element: &BytesStart<'_>,
        name: &'static str,
        key: &'static str,
        limit: f64,
    ) -> std::result::Result<f64, ParseError> {
        let value: f64 = self.required(element, name, key)?;
        if !value.is_finite() || value.abs() > limit {
            return Err(ParseError::InvalidAttribute {
                element: name,
                attribute: key,
                value: value.to_string(),
            });
        }
        Ok(value)
    }

    fn required<T: FromStr>(
        &self,
        element: &BytesStart<'_>,
        name: &'static str,
        key: &'static str,
    ) -> std::result::Result<T, ParseError> {
        self.optional(element, name, key)?
            .ok_or(ParseError::MissingAttribute {
                element: name,
                attribute: key,
            })
    }

    fn optional<T: FromStr>(
        &self,
        element: &BytesStart<'_>,
        name: &'static str,
        key: &'static str,
    ) -> std::result::Result<Option<T>, ParseError> {
        let Some(raw) = self.attribute(element, key)? else {
            return Ok(None);
        };
        raw.trim()
            .parse()
            .map(Some)
            .map_err(|_| ParseError::InvalidAttribute {
                element: name,
                attribute: key,
                value: raw.into_owned(),
            })
    }

    fn text(
        &self,
        element: &BytesStart<'_>,
        name: &'static str,
        key: &'static str,
    ) -> std::result::Result<String, ParseError> {
        self.attribute(element, key)?
            .map(Cow::into_owned)
            .ok_or(ParseError::MissingAttribute {
                element: name,
                attribute: key,
            })
    }

    /// Walk every attribute once so malformed or duplicated ones are errors.
    fn check_attributes(&self, element: &BytesStart<'_>) -> std::result::Result<(), ParseError> {
        for attribute in element.attributes() {
            attribute.map_err(|source| self.xml_error(source.into()))?;
        }
        Ok(())
    }

    fn attribute<'e>(
        &self,
        element: &'e BytesStart<'_>,
        key: &str,
    ) -> std::result::Result<Option<Cow<'e, str>>, ParseError> {
        let attribute = element
            .try_get_attribute(key)
            .map_err(|source| self.xml_error(source.into()))?;
        let Some(attribute) = attribute else {
            return Ok(None);
        };
        attribute
            .unescape_value()
            .map(Some)
            .map_err(|source| self.xml_error(source.into()))
    }

    fn xml_error(&self, source: quick_xml::Error) -> ParseError {
        ParseError::Xml {
            position: self.position,
            source,
        }
    }
}
