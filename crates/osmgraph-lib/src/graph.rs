use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::arena::{Arena, SlotKey};
use crate::error::{Error, Result};

/// External identifier of a vertex, usually the OSM node id.
///
/// Not unique by construction: vertices added interactively may share an id.
pub type VertexId = i64;

/// Planar position in projected meters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
}

impl Coord {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Calculate the Euclidean distance to another position.
    pub fn distance_to(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Attributes stored on every vertex.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VertexProperties {
    pub id: VertexId,
    pub coord: Coord,
}

/// Attributes stored on every directed edge.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct EdgeProperties {
    /// Street name; empty when the road is unnamed.
    pub name: String,
    /// Length in meters. Never negative.
    pub weight: f64,
    pub oneway: bool,
}

/// Opaque reference to a vertex, valid until that vertex is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexHandle(SlotKey);

/// Opaque reference to an edge, valid until that edge (or one of its
/// endpoints) is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeHandle(SlotKey);

impl VertexHandle {
    /// Storage slot behind this handle. Slots are recycled after removal, so
    /// the index alone does not identify a vertex.
    pub fn index(self) -> usize {
        self.0.index
    }
}

impl EdgeHandle {
    pub fn index(self) -> usize {
        self.0.index
    }
}

impl fmt::Display for VertexHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}#{}", self.0.index, self.0.generation)
    }
}

impl fmt::Display for EdgeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}#{}", self.0.index, self.0.generation)
    }
}

/// Borrowed view of one edge together with its endpoints.
#[derive(Debug, Clone, Copy)]
pub struct EdgeRef<'a> {
    pub handle: EdgeHandle,
    pub source: VertexHandle,
    pub target: VertexHandle,
    pub properties: &'a EdgeProperties,
}

/// Edges created by [`Graph::connect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection {
    pub forward: EdgeHandle,
    /// Mirror edge, absent for one-way connections.
    pub backward: Option<EdgeHandle>,
}

#[derive(Debug, Clone)]
struct VertexEntry {
    properties: VertexProperties,
    outgoing: Vec<EdgeHandle>,
    incoming: Vec<EdgeHandle>,
}

#[derive(Debug, Clone)]
struct EdgeEntry {
    source: VertexHandle,
    target: VertexHandle,
    properties: EdgeProperties,
}

/// Directed, attributed road graph.
///
/// Vertices and edges live in generational arenas: removing a vertex never
/// shifts or re-targets the handles of other vertices, and dereferencing a
/// handle whose entity was removed yields [`Error::StaleVertex`] or
/// [`Error::StaleEdge`] instead of another entity's data.
///
/// The graph performs no internal synchronisation. Mutations and queries on
/// one instance must be serialised by the caller.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    vertices: Arena<VertexEntry>,
    edges: Arena<EdgeEntry>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize, edges: usize) -> Self {
        Self {
            vertices: Arena::with_capacity(vertices),
            edges: Arena::with_capacity(edges),
        }
    }

    /// Insert a vertex. Identical properties still produce distinct vertices.
    pub fn add_vertex(&mut self, properties: VertexProperties) -> VertexHandle {
        VertexHandle(self.vertices.insert(VertexEntry {
            properties,
            outgoing: Vec::new(),
            incoming: Vec::new(),
        }))
    }

    /// Remove a vertex together with every edge entering or leaving it.
    pub fn remove_vertex(&mut self, handle: VertexHandle) -> Result<VertexProperties> {
        let entry = self
            .vertices
            .get(handle.0)
            .ok_or(Error::StaleVertex { handle })?;
        let incident: Vec<EdgeHandle> = entry
            .outgoing
            .iter()
            .chain(entry.incoming.iter())
            .copied()
            .collect();

        for edge in incident {
            // Self-loops are listed twice; the second pass finds nothing.
            if self.contains_edge(edge) {
                self.remove_edge(edge)?;
            }
        }

        let entry = self
            .vertices
            .remove(handle.0)
            .ok_or(Error::StaleVertex { handle })?;
        debug!(%handle, id = entry.properties.id, "removed vertex");
        Ok(entry.properties)
    }

    /// Insert a directed edge from `source` to `target`.
    ///
    /// Returns `None` without touching the graph when either endpoint is not
    /// a live vertex or when the weight is negative or not finite.
    pub fn add_edge(
        &mut self,
        source: VertexHandle,
        target: VertexHandle,
        properties: EdgeProperties,
    ) -> Option<EdgeHandle> {
        if !self.contains_vertex(source) || !self.contains_vertex(target) {
            debug!(%source, %target, "rejected edge with missing endpoint");
            return None;
        }
        if !properties.weight.is_finite() || properties.weight < 0.0 {
            debug!(%source, %target, weight = properties.weight, "rejected edge with invalid weight");
            return None;
        }

        let handle = EdgeHandle(self.edges.insert(EdgeEntry {
            source,
            target,
            properties,
        }));
        if let Some(entry) = self.vertices.get_mut(source.0) {
            entry.outgoing.push(handle);
        }
        if let Some(entry) = self.vertices.get_mut(target.0) {
            entry.incoming.push(handle);
        }
        Some(handle)
    }

    pub fn remove_edge(&mut self, handle: EdgeHandle) -> Result<EdgeProperties> {
        let entry = self
            .edges
            .remove(handle.0)
            .ok_or(Error::StaleEdge { handle })?;
        if let Some(source) = self.vertices.get_mut(entry.source.0) {
            source.outgoing.retain(|edge| *edge != handle);
        }
        if let Some(target) = self.vertices.get_mut(entry.target.0) {
            target.incoming.retain(|edge| *edge != handle);
        }
        Ok(entry.properties)
    }

    /// Link two vertices with edges weighted by their straight-line distance.
    ///
    /// Adds `source -> target` and, unless `oneway` is set, the mirror edge
    /// `target -> source` with the same name and weight.
    pub fn connect(
        &mut self,
        source: VertexHandle,
        target: VertexHandle,
        name: impl Into<String>,
        oneway: bool,
    ) -> Result<Connection> {
        let rejected = Error::EdgeRejected {
            from: source,
            to: target,
        };
        let (Some(from), Some(to)) = (self.vertices.get(source.0), self.vertices.get(target.0))
        else {
            return Err(rejected);
        };

        let properties = EdgeProperties {
            name: name.into(),
            weight: from.properties.coord.distance_to(&to.properties.coord),
            oneway,
        };
        let backward_properties = (!oneway).then(|| properties.clone());

        let forward = self.add_edge(source, target, properties).ok_or(rejected)?;
        let backward =
            backward_properties.and_then(|properties| self.add_edge(target, source, properties));

        Ok(Connection { forward, backward })
    }

    pub fn contains_vertex(&self, handle: VertexHandle) -> bool {
        self.vertices.contains(handle.0)
    }

    pub fn contains_edge(&self, handle: EdgeHandle) -> bool {
        self.edges.contains(handle.0)
    }

    /// Properties of a live vertex.
    pub fn vertex(&self, handle: VertexHandle) -> Result<&VertexProperties> {
        self.vertices
            .get(handle.0)
            .map(|entry| &entry.properties)
            .ok_or(Error::StaleVertex { handle })
    }

    /// Properties of a live edge.
    pub fn edge(&self, handle: EdgeHandle) -> Result<&EdgeProperties> {
        self.edges
            .get(handle.0)
            .map(|entry| &entry.properties)
            .ok_or(Error::StaleEdge { handle })
    }

    /// `(source, target)` of a live edge.
    pub fn edge_endpoints(&self, handle: EdgeHandle) -> Result<(VertexHandle, VertexHandle)> {
        self.edges
            .get(handle.0)
            .map(|entry| (entry.source, entry.target))
            .ok_or(Error::StaleEdge { handle })
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.len() == 0
    }

    /// External ids of all vertices, in iteration order.
    pub fn vertex_ids(&self) -> Vec<VertexId> {
        self.vertices
            .iter()
            .map(|(_, entry)| entry.properties.id)
            .collect()
    }

    /// All vertices in a stable, implementation-defined order.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexHandle, &VertexProperties)> + '_ {
        self.vertices
            .iter()
            .map(|(key, entry)| (VertexHandle(key), &entry.properties))
    }

    /// All edges in a stable, implementation-defined order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeRef<'_>> + '_ {
        self.edges.iter().map(|(key, entry)| EdgeRef {
            handle: EdgeHandle(key),
            source: entry.source,
            target: entry.target,
            properties: &entry.properties,
        })
    }

    /// Edges leaving `handle`. Yields nothing for a stale handle.
    pub fn outgoing_edges(&self, handle: VertexHandle) -> impl Iterator<Item = EdgeRef<'_>> + '_ {
        self.vertices
            .get(handle.0)
            .into_iter()
            .flat_map(|entry| entry.outgoing.iter())
            .filter_map(move |&edge| self.edge_ref(edge))
    }

    /// First vertex carrying `id`.
    pub fn find_vertex_by_id(&self, id: VertexId) -> Option<VertexHandle> {
        self.vertices()
            .find(|(_, properties)| properties.id == id)
            .map(|(handle, _)| handle)
    }

    /// First edge named `name`.
    pub fn find_edge_by_name(&self, name: &str) -> Option<EdgeHandle> {
        self.edges()
            .find(|edge| edge.properties.name == name)
            .map(|edge| edge.handle)
    }

    /// First vertex inside the axis-aligned square of half-width `radius`
    /// centred on `(x, y)`, borders included.
    ///
    /// The hit test is a square, not a circle: pointer picking in map views
    /// depends on this exact region.
    pub fn find_vertex_near(&self, x: f64, y: f64, radius: f64) -> Option<VertexHandle> {
        self.vertices()
            .find(|(_, properties)| {
                let point = properties.coord;
                x <= point.x + radius
                    && x >= point.x - radius
                    && y <= point.y + radius
                    && y >= point.y - radius
            })
            .map(|(handle, _)| handle)
    }

    fn edge_ref(&self, handle: EdgeHandle) -> Option<EdgeRef<'_>> {
        self.edges.get(handle.0).map(|entry| EdgeRef {
            handle,
            source: entry.source,
            target: entry.target,
            properties: &entry.properties,
        })
    }
}
