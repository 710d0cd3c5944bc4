//! Common test utilities and fixture helpers.
//!
//! Shared by the integration tests: fixture paths, small graph builders and
//! an assertion that a returned path really follows the graph's edges.

use std::path::PathBuf;

use osmgraph_lib::{
    load_osm_file, Coord, EdgeProperties, Graph, ShortestPath, VertexHandle, VertexId,
    VertexProperties,
};

/// Street grid spacing of `small_town.osm` (0.001 degrees) in projected meters.
#[allow(dead_code)]
pub const METERS_PER_BLOCK: f64 = 0.001 * osmgraph_lib::METERS_PER_DEGREE_LAT;

/// Path to fixtures directory used by tests.
#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

/// Path to the small hand-written town map.
#[allow(dead_code)]
pub fn small_town_path() -> PathBuf {
    fixtures_dir().join("small_town.osm")
}

#[allow(dead_code)]
pub fn small_town() -> Graph {
    load_osm_file(&small_town_path()).expect("small_town.osm loads")
}

#[allow(dead_code)]
pub fn add_vertex(graph: &mut Graph, id: VertexId, x: f64, y: f64) -> VertexHandle {
    graph.add_vertex(VertexProperties {
        id,
        coord: Coord::new(x, y),
    })
}

#[allow(dead_code)]
pub fn road(name: &str, weight: f64) -> EdgeProperties {
    EdgeProperties {
        name: name.to_string(),
        weight,
        oneway: true,
    }
}

/// Handle of the first vertex with `id`, panicking when absent.
#[allow(dead_code)]
pub fn handle_for(graph: &Graph, id: VertexId) -> VertexHandle {
    graph
        .find_vertex_by_id(id)
        .unwrap_or_else(|| panic!("vertex {id} present"))
}

/// External ids along a path in the order the engine returns them
/// (target first).
#[allow(dead_code)]
pub fn path_ids(graph: &Graph, path: &ShortestPath) -> Vec<VertexId> {
    path.vertices
        .iter()
        .map(|&handle| graph.vertex(handle).expect("live vertex").id)
        .collect()
}

/// Assert that consecutive path vertices are joined by a directed edge in the
/// direction of travel and that the cheapest such edges add up to the
/// reported distance.
#[allow(dead_code)]
pub fn assert_path_follows_edges(graph: &Graph, path: &ShortestPath) {
    let forward: Vec<VertexHandle> = path.forward().collect();
    let mut total = 0.0;
    for leg in forward.windows(2) {
        let cheapest = graph
            .outgoing_edges(leg[0])
            .filter(|edge| edge.target == leg[1])
            .map(|edge| edge.properties.weight)
            .fold(f64::INFINITY, f64::min);
        assert!(
            cheapest.is_finite(),
            "no edge from {} to {} along returned path",
            leg[0],
            leg[1]
        );
        total += cheapest;
    }
    assert!(
        (total - path.distance).abs() < 1e-6,
        "edge weights sum to {total}, path reports {}",
        path.distance
    );
}
