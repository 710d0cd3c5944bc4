use criterion::{criterion_group, criterion_main, Criterion};
use once_cell::sync::Lazy;
use osmgraph_lib::{
    load_osm_file, plan_route, shortest_path, Coord, EdgeProperties, Graph, RouteRequest,
    VertexHandle, VertexProperties,
};
use std::hint::black_box;
use std::path::PathBuf;

const GRID_SIDE: usize = 100;
const GRID_SPACING: f64 = 50.0;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures/small_town.osm")
}

/// Two-way street grid with `GRID_SIDE * GRID_SIDE` intersections.
fn street_grid() -> (Graph, VertexHandle, VertexHandle) {
    let mut graph = Graph::with_capacity(GRID_SIDE * GRID_SIDE, 4 * GRID_SIDE * GRID_SIDE);
    let mut handles = Vec::with_capacity(GRID_SIDE * GRID_SIDE);
    for row in 0..GRID_SIDE {
        for col in 0..GRID_SIDE {
            handles.push(graph.add_vertex(VertexProperties {
                id: (row * GRID_SIDE + col) as i64,
                coord: Coord::new(col as f64 * GRID_SPACING, row as f64 * GRID_SPACING),
            }));
        }
    }

    for row in 0..GRID_SIDE {
        for col in 0..GRID_SIDE {
            let here = handles[row * GRID_SIDE + col];
            if col + 1 < GRID_SIDE {
                let east = handles[row * GRID_SIDE + col + 1];
                graph.connect(here, east, "Avenue", false).expect("live vertices");
            }
            if row + 1 < GRID_SIDE {
                let north = handles[(row + 1) * GRID_SIDE + col];
                graph.connect(here, north, "Street", false).expect("live vertices");
            }
        }
    }

    // A handful of cheap diagonal shortcuts so the cheapest route is not
    // simply the Manhattan staircase.
    for step in (0..GRID_SIDE - 1).step_by(7) {
        let from = handles[step * GRID_SIDE + step];
        let to = handles[(step + 1) * GRID_SIDE + step + 1];
        graph.add_edge(
            from,
            to,
            EdgeProperties {
                name: "Diagonal".to_string(),
                weight: GRID_SPACING,
                oneway: true,
            },
        );
    }

    let start = handles[0];
    let goal = handles[GRID_SIDE * GRID_SIDE - 1];
    (graph, start, goal)
}

static SMALL_TOWN: Lazy<Graph> =
    Lazy::new(|| load_osm_file(&fixture_path()).expect("fixture loads"));
static GRID: Lazy<(Graph, VertexHandle, VertexHandle)> = Lazy::new(street_grid);
static TOWN_REQUEST: Lazy<RouteRequest> = Lazy::new(|| RouteRequest::new(1, 6));

fn benchmark_pathfinding(c: &mut Criterion) {
    c.bench_function("dijkstra_grid_corner_to_corner", |b| {
        let (graph, start, goal) = &*GRID;
        b.iter(|| {
            let path = shortest_path(graph, *start, *goal)
                .expect("live handles")
                .expect("route exists");
            black_box(path.distance)
        });
    });

    c.bench_function("plan_route_small_town", |b| {
        let graph = &*SMALL_TOWN;
        let request = &*TOWN_REQUEST;
        b.iter(|| {
            let plan = plan_route(graph, request).expect("route exists");
            black_box(plan.hop_count())
        });
    });

    c.bench_function("find_vertex_near_grid", |b| {
        let (graph, _, _) = &*GRID;
        let far = (GRID_SIDE - 1) as f64 * GRID_SPACING;
        b.iter(|| black_box(graph.find_vertex_near(far, far, 1.0)));
    });

    c.bench_function("ingest_small_town", |b| {
        let xml = std::fs::read_to_string(fixture_path()).expect("fixture readable");
        b.iter(|| {
            let graph = osmgraph_lib::ingest(&xml).expect("fixture ingests");
            black_box(graph.num_edges())
        });
    });
}

criterion_group!(benches, benchmark_pathfinding);
criterion_main!(benches);
