//! Facade bundling the catalogue, the render settings and the transit
//! router behind the operations the request layer drives.

use std::io::{Read, Write};

use crate::catalogue::{Bus, CatalogueError, RouteKind, Stop, TransportCatalogue};
use crate::geo::Coordinates;
use crate::render::{self, RenderSettings};
use crate::response::Itinerary;
use crate::serialization;
use crate::transit_router::{RoutingSettings, TransitRouter};

/// Route statistics reported for a single bus.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BusReport {
    pub stop_count: usize,
    pub unique_stop_count: usize,
    pub route_length: u32,
    pub curvature: f64,
}

#[derive(Debug, Default)]
pub struct Base {
    pub catalogue: TransportCatalogue,
    pub render_settings: RenderSettings,
    pub router: Option<TransitRouter>,
}

impl Base {
    pub fn new(render_settings: RenderSettings) -> Self {
        Self {
            catalogue: TransportCatalogue::new(),
            render_settings,
            router: None,
        }
    }

    pub fn add_stop(&mut self, name: &str, coordinates: Coordinates) -> Result<Stop, CatalogueError> {
        self.catalogue.add_stop(name, coordinates)
    }

    pub fn add_distance(&mut self, from: Stop, to: Stop, metres: u32) {
        self.catalogue.add_distance(from, to, metres)
    }

    pub fn add_bus(
        &mut self,
        name: &str,
        stops: Vec<Stop>,
        kind: RouteKind,
    ) -> Result<Bus, CatalogueError> {
        self.catalogue.add_bus(name, stops, kind)
    }

    /// Declares the build phase over: constructs the travel graph and runs
    /// the shortest-path precomputation.
    pub fn build_router(&mut self, settings: RoutingSettings) -> Result<(), CatalogueError> {
        self.router = Some(TransitRouter::new(&self.catalogue, settings)?);
        Ok(())
    }

    /// Lexicographically ordered names of the buses serving `name`, or
    /// `None` for an unknown stop.
    pub fn stop_report(&self, name: &str) -> Option<Vec<&str>> {
        let stop = self.catalogue.find_stop(name)?;
        Some(
            self.catalogue
                .buses_through(stop)
                .iter()
                .map(|bus| self.catalogue.bus(*bus).name.as_str())
                .collect(),
        )
    }

    /// Route statistics of the named bus; `Ok(None)` for an unknown name.
    /// A route over a stop pair with no recorded distance is an error.
    pub fn bus_report(&self, name: &str) -> Result<Option<BusReport>, CatalogueError> {
        let bus = match self.catalogue.find_bus(name) {
            Some(bus) => bus,
            None => return Ok(None),
        };
        let data = self.catalogue.bus(bus);
        Ok(Some(BusReport {
            stop_count: data.stop_count(),
            unique_stop_count: data.unique_stop_count(),
            route_length: self.catalogue.route_length(bus)?,
            curvature: self.catalogue.curvature(bus)?,
        }))
    }

    /// Fastest itinerary between two stop names; `None` when either name is
    /// unknown, the router has not been built, or no connection exists.
    pub fn route(&self, from: &str, to: &str) -> Option<Itinerary> {
        let router = self.router.as_ref()?;
        let from = self.catalogue.find_stop(from)?;
        let to = self.catalogue.find_stop(to)?;
        router.route(from, to)
    }

    /// The network map as SVG text.
    pub fn render_map(&self) -> String {
        render::render(&self.catalogue, &self.render_settings).to_string()
    }

    pub fn save_to<W: Write>(&self, output: &mut W) -> Result<(), serialization::Error> {
        serialization::serialize(self, output)
    }

    pub fn load_from<R: Read>(input: &mut R) -> Result<Self, serialization::Error> {
        serialization::deserialize(input)
    }
}
