//! Travel graph construction and itinerary queries.
//!
//! The travel model is "wait at the stop, then ride": every edge of the
//! graph is one boarding wait plus one uninterrupted ride along a single
//! bus. For every bus, an edge is added for every ordered pair of positions
//! along its effective traversal, so a query never needs to concatenate
//! rides of the same bus: the precomputation already saw the combined edge.
//! Parallel edges between the same pair of vertices are expected; the edge
//! id picks out the bus and span during path reconstruction.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::info;

use crate::catalogue::{Bus, CatalogueError, RouteKind, Stop, TransportCatalogue};
use crate::engine::ShortestPaths;
use crate::graph::{DirectedWeightedGraph, VertexId};
use crate::response::{Activity, Itinerary};

/// Parameters of the travel model.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RoutingSettings {
    /// Constant boarding wait, minutes.
    pub bus_wait_time: u32,
    /// Bus speed, km/h.
    pub bus_velocity: f64,
}

impl Default for RoutingSettings {
    fn default() -> Self {
        Self {
            bus_wait_time: 6,
            bus_velocity: 60.0,
        }
    }
}

/// Decoded attributes of one travel-graph edge, kept in edge-id order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct EdgeData {
    pub wait: f64,
    pub from: Stop,
    pub to: Stop,
    pub span: u32,
    pub bus: Bus,
}

#[derive(Debug)]
pub struct TransitRouter {
    settings: RoutingSettings,
    graph: DirectedWeightedGraph,
    shortest_paths: ShortestPaths,
    stop_to_vertex: HashMap<Stop, VertexId>,
    edges: Vec<EdgeData>,
}

impl TransitRouter {
    /// Builds the travel graph over the catalogue's stops and runs the
    /// shortest-path precomputation. Fails when a bus traverses a stop pair
    /// with no recorded road distance in either direction.
    pub fn new(
        catalogue: &TransportCatalogue,
        settings: RoutingSettings,
    ) -> Result<Self, CatalogueError> {
        let speed = settings.bus_velocity * 1000.0 / 60.0; // metres per minute
        let wait = f64::from(settings.bus_wait_time); // minutes

        // vertex ids follow the catalogue insertion order of stops
        let stop_to_vertex: HashMap<Stop, VertexId> = catalogue
            .stops()
            .enumerate()
            .map(|(vertex, stop)| (stop, vertex))
            .collect();

        let mut graph = DirectedWeightedGraph::new(stop_to_vertex.len());
        let mut edges = Vec::new();
        for bus in catalogue.buses() {
            Self::add_bus_edges(
                catalogue,
                bus,
                wait,
                speed,
                &stop_to_vertex,
                &mut graph,
                &mut edges,
            )?;
        }
        info!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "travel graph built"
        );

        let shortest_paths = ShortestPaths::new(&graph);
        Ok(Self {
            settings,
            graph,
            shortest_paths,
            stop_to_vertex,
            edges,
        })
    }

    fn add_bus_edges(
        catalogue: &TransportCatalogue,
        bus: Bus,
        wait: f64,
        speed: f64,
        stop_to_vertex: &HashMap<Stop, VertexId>,
        graph: &mut DirectedWeightedGraph,
        edges: &mut Vec<EdgeData>,
    ) -> Result<(), CatalogueError> {
        let data = catalogue.bus(bus);
        debug_assert!(data.kind == RouteKind::Linear || data.stops.first() == data.stops.last());

        let positions = data.stop_count();
        for i in 0..positions.saturating_sub(1) {
            let from = data.stop_at(i);
            let from_vertex = stop_to_vertex[&from];
            let mut metres: u32 = 0;
            for j in i + 1..positions {
                metres += catalogue.distance(data.stop_at(j - 1), data.stop_at(j))?;
                let to = data.stop_at(j);
                let edge_id = graph.add_edge(
                    from_vertex,
                    stop_to_vertex[&to],
                    f64::from(metres) / speed + wait,
                );
                debug_assert_eq!(edge_id, edges.len());
                edges.push(EdgeData {
                    wait,
                    from,
                    to,
                    span: (j - i) as u32,
                    bus,
                });
            }
        }
        Ok(())
    }

    pub fn settings(&self) -> RoutingSettings {
        self.settings
    }

    /// Fastest itinerary between two stops, or `None` when no connection
    /// exists. `from == to` yields an empty itinerary with total time 0.
    pub fn route(&self, from: Stop, to: Stop) -> Option<Itinerary> {
        let from_vertex = *self.stop_to_vertex.get(&from)?;
        let to_vertex = *self.stop_to_vertex.get(&to)?;
        let path = self
            .shortest_paths
            .build_route(&self.graph, from_vertex, to_vertex)?;

        let mut activities = Vec::with_capacity(2 * path.edges.len());
        for &edge_id in &path.edges {
            let meta = self.edges[edge_id];
            let edge = self.graph.edge(edge_id);
            activities.push(Activity::Wait {
                stop: meta.from,
                minutes: meta.wait,
            });
            activities.push(Activity::Ride {
                bus: meta.bus,
                from: meta.from,
                span: meta.span,
                minutes: edge.weight - meta.wait,
            });
        }
        Some(Itinerary {
            total_time: path.weight,
            activities,
        })
    }

    pub(crate) fn from_parts(
        settings: RoutingSettings,
        graph: DirectedWeightedGraph,
        shortest_paths: ShortestPaths,
        stop_to_vertex: HashMap<Stop, VertexId>,
        edges: Vec<EdgeData>,
    ) -> Self {
        Self {
            settings,
            graph,
            shortest_paths,
            stop_to_vertex,
            edges,
        }
    }

    pub(crate) fn graph(&self) -> &DirectedWeightedGraph {
        &self.graph
    }

    pub(crate) fn shortest_paths(&self) -> &ShortestPaths {
        &self.shortest_paths
    }

    pub(crate) fn stop_to_vertex(&self) -> &HashMap<Stop, VertexId> {
        &self.stop_to_vertex
    }

    pub(crate) fn edge_data(&self) -> &[EdgeData] {
        &self.edges
    }
}
