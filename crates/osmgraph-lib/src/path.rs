use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use tracing::trace;

use crate::error::{Error, Result};
use crate::graph::{Graph, VertexHandle};

/// Result of a successful shortest-path query.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPath {
    /// Sum of edge weights along the path, in meters.
    pub distance: f64,
    /// Vertices from the target back to the source, both included.
    pub vertices: Vec<VertexHandle>,
}

impl ShortestPath {
    /// Number of edges traversed.
    pub fn hop_count(&self) -> usize {
        self.vertices.len().saturating_sub(1)
    }

    pub fn source(&self) -> Option<VertexHandle> {
        self.vertices.last().copied()
    }

    pub fn target(&self) -> Option<VertexHandle> {
        self.vertices.first().copied()
    }

    /// Vertices in travel order, source first.
    pub fn forward(&self) -> impl Iterator<Item = VertexHandle> + '_ {
        self.vertices.iter().rev().copied()
    }
}

/// Run Dijkstra's algorithm from `source` and return the cheapest path to
/// `target`.
///
/// Returns `Ok(None)` when `target` cannot be reached and an error when either
/// handle does not refer to a live vertex. Edge direction is taken from the
/// graph's edge set as-is.
pub fn shortest_path(
    graph: &Graph,
    source: VertexHandle,
    target: VertexHandle,
) -> Result<Option<ShortestPath>> {
    if !graph.contains_vertex(source) {
        return Err(Error::StaleVertex { handle: source });
    }
    if !graph.contains_vertex(target) {
        return Err(Error::StaleVertex { handle: target });
    }

    if source == target {
        return Ok(Some(ShortestPath {
            distance: 0.0,
            vertices: vec![source],
        }));
    }

    let mut distances: HashMap<VertexHandle, f64> = HashMap::new();
    let mut parents: HashMap<VertexHandle, VertexHandle> = HashMap::new();
    let mut queue = BinaryHeap::new();

    distances.insert(source, 0.0);
    queue.push(QueueEntry::new(source, 0.0));

    while let Some(entry) = queue.pop() {
        let current_distance = match distances.get(&entry.node) {
            Some(distance) if *distance < entry.cost.0 => continue,
            Some(distance) => *distance,
            None => continue,
        };

        if entry.node == target {
            trace!(settled = distances.len(), "target settled");
            return Ok(Some(ShortestPath {
                distance: current_distance,
                vertices: reconstruct_path(&parents, source, target),
            }));
        }

        for edge in graph.outgoing_edges(entry.node) {
            let next = edge.target;
            let next_cost = current_distance + edge.properties.weight;
            if next_cost < *distances.get(&next).unwrap_or(&f64::INFINITY) {
                distances.insert(next, next_cost);
                parents.insert(next, entry.node);
                queue.push(QueueEntry::new(next, next_cost));
            }
        }
    }

    Ok(None)
}

/// Walk parent links from `target` back to `source`.
fn reconstruct_path(
    parents: &HashMap<VertexHandle, VertexHandle>,
    source: VertexHandle,
    target: VertexHandle,
) -> Vec<VertexHandle> {
    let mut path = vec![target];
    let mut current = target;
    while current != source {
        match parents.get(&current) {
            Some(&parent) => {
                path.push(parent);
                current = parent;
            }
            None => break,
        }
    }
    path
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct QueueEntry {
    node: VertexHandle,
    cost: FloatOrd,
}

impl QueueEntry {
    fn new(node: VertexHandle, cost: f64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
        }
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by cost.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
