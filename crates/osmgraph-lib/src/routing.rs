//! Id-level route planning on top of [`shortest_path`].
//!
//! Collaborators usually know vertices by their external id (an OSM node id
//! typed into a search box, say) rather than by handle. [`plan_route`]
//! resolves both ids, runs the shortest-path engine and returns a
//! serialisable [`RoutePlan`] listing the route from start to goal.

use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::graph::{Coord, Graph, VertexHandle, VertexId};
use crate::path::shortest_path;

/// Route planning request between two external vertex ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteRequest {
    pub from: VertexId,
    pub to: VertexId,
}

impl RouteRequest {
    pub fn new(from: VertexId, to: VertexId) -> Self {
        Self { from, to }
    }
}

/// One vertex visited by a planned route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteStep {
    pub index: usize,
    pub id: VertexId,
    pub coord: Coord,
    /// Length of the leg arriving at this step; zero for the first step.
    pub leg: f64,
    /// Distance travelled from the start up to this step.
    pub cumulative: f64,
}

/// Planned route returned by the library.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePlan {
    pub start: VertexId,
    pub goal: VertexId,
    pub distance: f64,
    pub steps: Vec<RouteStep>,
}

impl RoutePlan {
    /// Number of hops in the route.
    pub fn hop_count(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }
}

/// Compute the shortest route between the first vertices carrying the
/// requested ids.
pub fn plan_route(graph: &Graph, request: &RouteRequest) -> Result<RoutePlan> {
    let start = resolve_vertex(graph, request.from)?;
    let goal = resolve_vertex(graph, request.to)?;

    let Some(path) = shortest_path(graph, start, goal)? else {
        return Err(Error::PathNotFound {
            start: request.from,
            goal: request.to,
        });
    };
    debug!(
        from = request.from,
        to = request.to,
        distance = path.distance,
        hops = path.hop_count(),
        "planned route"
    );

    let steps = build_steps(graph, path.forward())?;
    Ok(RoutePlan {
        start: request.from,
        goal: request.to,
        distance: path.distance,
        steps,
    })
}

fn resolve_vertex(graph: &Graph, id: VertexId) -> Result<VertexHandle> {
    graph
        .find_vertex_by_id(id)
        .ok_or(Error::UnknownVertexId { id })
}

/// Leg lengths come from the cheapest edge between consecutive vertices, so
/// the cumulative total matches the distance the engine reported.
fn build_steps(graph: &Graph, route: impl Iterator<Item = VertexHandle>) -> Result<Vec<RouteStep>> {
    let mut steps: Vec<RouteStep> = Vec::new();
    let mut previous: Option<VertexHandle> = None;
    let mut cumulative = 0.0;

    for (index, handle) in route.enumerate() {
        let vertex = graph.vertex(handle)?;
        let leg = match previous {
            Some(from) => cheapest_leg(graph, from, handle),
            None => 0.0,
        };
        cumulative += leg;
        steps.push(RouteStep {
            index,
            id: vertex.id,
            coord: vertex.coord,
            leg,
            cumulative,
        });
        previous = Some(handle);
    }

    Ok(steps)
}

fn cheapest_leg(graph: &Graph, from: VertexHandle, to: VertexHandle) -> f64 {
    graph
        .outgoing_edges(from)
        .filter(|edge| edge.target == to)
        .map(|edge| edge.properties.weight)
        .fold(f64::INFINITY, f64::min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{EdgeProperties, VertexProperties};

    fn triangle() -> Graph {
        let mut graph = Graph::new();
        let a = graph.add_vertex(VertexProperties {
            id: 10,
            coord: Coord::new(0.0, 0.0),
        });
        let b = graph.add_vertex(VertexProperties {
            id: 20,
            coord: Coord::new(3.0, 0.0),
        });
        let c = graph.add_vertex(VertexProperties {
            id: 30,
            coord: Coord::new(3.0, 4.0),
        });
        for (from, to, weight) in [(a, b, 3.0), (b, c, 4.0), (a, c, 9.0), (a, b, 7.0)] {
            graph.add_edge(
                from,
                to,
                EdgeProperties {
                    name: String::new(),
                    weight,
                    oneway: true,
                },
            );
        }
        graph
    }

    #[test]
    fn plan_lists_steps_from_start_to_goal() {
        let graph = triangle();
        let plan = plan_route(&graph, &RouteRequest::new(10, 30)).expect("route exists");

        assert_eq!(plan.distance, 7.0);
        assert_eq!(plan.hop_count(), 2);
        let ids: Vec<VertexId> = plan.steps.iter().map(|step| step.id).collect();
        assert_eq!(ids, vec![10, 20, 30]);
        assert_eq!(plan.steps[1].leg, 3.0, "parallel edge picks the cheaper one");
        assert_eq!(plan.steps[2].cumulative, plan.distance);
    }

    #[test]
    fn unknown_id_is_reported() {
        let graph = triangle();
        let error = plan_route(&graph, &RouteRequest::new(10, 99)).expect_err("unknown id");
        assert!(matches!(error, Error::UnknownVertexId { id: 99 }));
    }

    #[test]
    fn unreachable_goal_is_reported() {
        let graph = triangle();
        let error = plan_route(&graph, &RouteRequest::new(30, 10)).expect_err("one-way edges");
        assert!(matches!(error, Error::PathNotFound { start: 30, goal: 10 }));
    }

    #[test]
    fn same_start_and_goal_is_a_single_step() {
        let graph = triangle();
        let plan = plan_route(&graph, &RouteRequest::new(20, 20)).expect("trivial route");
        assert_eq!(plan.distance, 0.0);
        assert_eq!(plan.steps.len(), 1);
        assert_eq!(plan.hop_count(), 0);
    }
}
