//! One-shot all-pairs shortest-path precomputation.
//!
//! [`ShortestPaths::new`] runs one Dijkstra pass per source vertex and keeps
//! the resulting table; [`ShortestPaths::build_route`] is then a plain table
//! walk. After construction the table is never mutated, and it round-trips
//! through the persisted base so a reload skips the computation entirely.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::debug;

use crate::graph::{DirectedWeightedGraph, EdgeId, VertexId};

/// One cell of the table: cost of the best known path from the row's source
/// and the last edge on it. `prev_edge` is `None` only for the source itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteInternalData {
    pub weight: f64,
    pub prev_edge: Option<EdgeId>,
}

/// A reconstructed shortest path: total weight and edge ids in travel order.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePath {
    pub weight: f64,
    pub edges: Vec<EdgeId>,
}

/// Dense vertex×vertex table of optional [`RouteInternalData`].
#[derive(Debug, Clone)]
pub struct ShortestPaths {
    rows: Vec<Vec<Option<RouteInternalData>>>,
}

struct QueueEntry {
    weight: f64,
    vertex: VertexId,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    // reversed so the max-heap pops the lightest entry first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .weight
            .total_cmp(&self.weight)
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

impl ShortestPaths {
    pub fn new(graph: &DirectedWeightedGraph) -> Self {
        let n = graph.vertex_count();
        let mut rows = Vec::with_capacity(n);
        for source in 0..n {
            rows.push(Self::single_source(graph, source));
        }
        debug!(
            vertices = n,
            edges = graph.edge_count(),
            "shortest-path table computed"
        );
        Self { rows }
    }

    fn single_source(
        graph: &DirectedWeightedGraph,
        source: VertexId,
    ) -> Vec<Option<RouteInternalData>> {
        let mut row: Vec<Option<RouteInternalData>> = vec![None; graph.vertex_count()];
        row[source] = Some(RouteInternalData {
            weight: 0.0,
            prev_edge: None,
        });
        let mut queue = BinaryHeap::new();
        queue.push(QueueEntry {
            weight: 0.0,
            vertex: source,
        });
        while let Some(QueueEntry { weight, vertex }) = queue.pop() {
            if matches!(row[vertex], Some(best) if best.weight < weight) {
                continue; // stale queue entry
            }
            for edge_id in graph.edges_from(vertex) {
                let edge = graph.edge(edge_id);
                let candidate = weight + edge.weight;
                let better = match row[edge.to] {
                    None => true,
                    Some(current) => candidate < current.weight,
                };
                if better {
                    row[edge.to] = Some(RouteInternalData {
                        weight: candidate,
                        prev_edge: Some(edge_id),
                    });
                    queue.push(QueueEntry {
                        weight: candidate,
                        vertex: edge.to,
                    });
                }
            }
        }
        row
    }

    pub fn vertex_count(&self) -> usize {
        self.rows.len()
    }

    /// The shortest path `from → to`, or `None` when `to` is unreachable.
    /// `from == to` yields a path with weight 0 and no edges.
    pub fn build_route(
        &self,
        graph: &DirectedWeightedGraph,
        from: VertexId,
        to: VertexId,
    ) -> Option<RoutePath> {
        let total = self.rows[from][to]?;
        let mut edges = Vec::new();
        let mut vertex = to;
        while vertex != from {
            // every vertex on a reachable path has a cell with a predecessor
            let data = self.rows[from][vertex].unwrap();
            let edge_id = data.prev_edge.unwrap();
            edges.push(edge_id);
            vertex = graph.edge(edge_id).from;
        }
        edges.reverse();
        Some(RoutePath {
            weight: total.weight,
            edges,
        })
    }

    pub(crate) fn rows(&self) -> &[Vec<Option<RouteInternalData>>] {
        &self.rows
    }

    pub(crate) fn from_rows(rows: Vec<Vec<Option<RouteInternalData>>>) -> Self {
        debug_assert!(rows.iter().all(|row| row.len() == rows.len()));
        Self { rows }
    }
}
