//! Canonical in-memory store of stops, buses and directed road distances.
//!
//! Stops and buses live in append-only arenas; the [`Stop`] and [`Bus`]
//! handles are arena positions and stay valid for the catalogue's whole
//! lifetime. All data is appended during the build phase; nothing is ever
//! removed.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::geo::Coordinates;

/// Opaque handle of a stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Stop {
    pub(crate) idx: usize,
}

/// Opaque handle of a bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Bus {
    pub(crate) idx: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    /// The stop list already ends at its starting stop; traversed once.
    Circular,
    /// Traversed forward then backward; effective stop count `2·len − 1`.
    Linear,
}

#[derive(Debug, Clone)]
pub struct StopData {
    pub name: String,
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone)]
pub struct BusData {
    pub name: String,
    pub stops: Vec<Stop>,
    pub kind: RouteKind,
}

impl BusData {
    /// Number of stops along the effective traversal.
    pub fn stop_count(&self) -> usize {
        match self.kind {
            RouteKind::Circular => self.stops.len(),
            RouteKind::Linear => 2 * self.stops.len() - 1,
        }
    }

    /// Stop at position `p` of the effective traversal, `p < stop_count()`.
    /// For a linear bus the positions past the end of the declared list walk
    /// it backwards, skipping the turnaround duplicate.
    pub fn stop_at(&self, p: usize) -> Stop {
        let len = self.stops.len();
        if p < len {
            self.stops[p]
        } else {
            self.stops[2 * len - 2 - p]
        }
    }

    pub fn unique_stop_count(&self) -> usize {
        self.stops.iter().collect::<HashSet<_>>().len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogueError {
    #[error("stop name is empty")]
    EmptyStopName,
    #[error("duplicate stop `{0}`")]
    DuplicateStop(String),
    #[error("bus name is empty")]
    EmptyBusName,
    #[error("duplicate bus `{0}`")]
    DuplicateBus(String),
    #[error("bus `{0}` has no stops")]
    NoStops(String),
    #[error("unknown distance between `{from}` and `{to}`")]
    UnknownDistance { from: String, to: String },
}

#[derive(Debug, Default)]
pub struct TransportCatalogue {
    // arenas
    stops: Vec<StopData>,
    buses: Vec<BusData>,
    // indexes
    stop_by_name: HashMap<String, Stop>,
    bus_by_name: HashMap<String, Bus>,
    buses_at_stop: HashMap<Stop, Vec<Bus>>,
    // directed distances; the reverse direction is a read-time fallback
    distances: HashMap<(Stop, Stop), u32>,
}

impl TransportCatalogue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_stop(
        &mut self,
        name: &str,
        coordinates: Coordinates,
    ) -> Result<Stop, CatalogueError> {
        if name.is_empty() {
            return Err(CatalogueError::EmptyStopName);
        }
        if self.stop_by_name.contains_key(name) {
            return Err(CatalogueError::DuplicateStop(name.to_string()));
        }
        let handle = Stop {
            idx: self.stops.len(),
        };
        self.stops.push(StopData {
            name: name.to_string(),
            coordinates,
        });
        self.stop_by_name.insert(name.to_string(), handle);
        Ok(handle)
    }

    pub fn find_stop(&self, name: &str) -> Option<Stop> {
        self.stop_by_name.get(name).copied()
    }

    pub fn stop(&self, stop: Stop) -> &StopData {
        &self.stops[stop.idx]
    }

    pub fn stops(&self) -> impl Iterator<Item = Stop> + '_ {
        (0..self.stops.len()).map(|idx| Stop { idx })
    }

    pub fn nb_of_stops(&self) -> usize {
        self.stops.len()
    }

    pub fn add_bus(
        &mut self,
        name: &str,
        stops: Vec<Stop>,
        kind: RouteKind,
    ) -> Result<Bus, CatalogueError> {
        if name.is_empty() {
            return Err(CatalogueError::EmptyBusName);
        }
        if self.bus_by_name.contains_key(name) {
            return Err(CatalogueError::DuplicateBus(name.to_string()));
        }
        if stops.is_empty() {
            return Err(CatalogueError::NoStops(name.to_string()));
        }
        debug_assert!(stops.iter().all(|stop| stop.idx < self.stops.len()));

        let handle = Bus {
            idx: self.buses.len(),
        };
        self.buses.push(BusData {
            name: name.to_string(),
            stops,
            kind,
        });
        self.bus_by_name.insert(name.to_string(), handle);

        let buses = &self.buses;
        for &stop in &buses[handle.idx].stops {
            let at_stop = self.buses_at_stop.entry(stop).or_default();
            // the view stays sorted lexicographically by bus name
            if let Err(pos) =
                at_stop.binary_search_by(|bus| buses[bus.idx].name.as_str().cmp(name))
            {
                at_stop.insert(pos, handle);
            }
        }
        Ok(handle)
    }

    pub fn find_bus(&self, name: &str) -> Option<Bus> {
        self.bus_by_name.get(name).copied()
    }

    pub fn bus(&self, bus: Bus) -> &BusData {
        &self.buses[bus.idx]
    }

    pub fn buses(&self) -> impl Iterator<Item = Bus> + '_ {
        (0..self.buses.len()).map(|idx| Bus { idx })
    }

    pub fn nb_of_buses(&self) -> usize {
        self.buses.len()
    }

    /// Buses serving `stop`, ordered lexicographically by name. Empty for
    /// stops no bus passes through.
    pub fn buses_through(&self, stop: Stop) -> &[Bus] {
        self.buses_at_stop
            .get(&stop)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Records the directed distance `from → to`; a later call for the same
    /// pair overwrites.
    pub fn add_distance(&mut self, from: Stop, to: Stop, metres: u32) {
        self.distances.insert((from, to), metres);
    }

    /// Directed distance `from → to`, falling back to the reverse direction
    /// when only that one was recorded.
    pub fn distance(&self, from: Stop, to: Stop) -> Result<u32, CatalogueError> {
        self.distances
            .get(&(from, to))
            .or_else(|| self.distances.get(&(to, from)))
            .copied()
            .ok_or_else(|| CatalogueError::UnknownDistance {
                from: self.stops[from.idx].name.clone(),
                to: self.stops[to.idx].name.clone(),
            })
    }

    pub fn distances(&self) -> impl Iterator<Item = ((Stop, Stop), u32)> + '_ {
        self.distances.iter().map(|(pair, metres)| (*pair, *metres))
    }

    /// Sum of great-circle distances between consecutive declared stops,
    /// doubled for a linear bus.
    pub fn geo_length(&self, bus: Bus) -> f64 {
        let data = &self.buses[bus.idx];
        let mut total = 0.0;
        for pair in data.stops.windows(2) {
            total += self.stops[pair[0].idx]
                .coordinates
                .distance_to(self.stops[pair[1].idx].coordinates);
        }
        match data.kind {
            RouteKind::Circular => total,
            RouteKind::Linear => 2.0 * total,
        }
    }

    /// Sum of directed road distances along the effective traversal. The
    /// backward leg of a linear bus reads the opposite directed pairs, so
    /// asymmetric distances show up in the total.
    pub fn route_length(&self, bus: Bus) -> Result<u32, CatalogueError> {
        let data = &self.buses[bus.idx];
        let mut total = 0;
        for pair in data.stops.windows(2) {
            total += self.distance(pair[0], pair[1])?;
        }
        if data.kind == RouteKind::Linear {
            for i in (1..data.stops.len()).rev() {
                total += self.distance(data.stops[i], data.stops[i - 1])?;
            }
        }
        Ok(total)
    }

    /// `route_length / geo_length`; 1.0 for a degenerate route with zero
    /// geographic length.
    pub fn curvature(&self, bus: Bus) -> Result<f64, CatalogueError> {
        let geo = self.geo_length(bus);
        if geo == 0.0 {
            return Ok(1.0);
        }
        Ok(f64::from(self.route_length(bus)?) / geo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn catalogue_with_stops(names: &[&str]) -> (TransportCatalogue, Vec<Stop>) {
        let mut catalogue = TransportCatalogue::new();
        let stops = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let lat = 10.0 * (i + 1) as f64;
                catalogue
                    .add_stop(name, Coordinates::new(lat.min(89.0), lat + 1.0))
                    .unwrap()
            })
            .collect();
        (catalogue, stops)
    }

    #[test]
    fn linear_route_length_reads_both_directions() {
        let (mut catalogue, s) = catalogue_with_stops(&["s1", "s2", "s3", "s4"]);
        catalogue.add_distance(s[0], s[1], 1);
        catalogue.add_distance(s[1], s[2], 2);
        catalogue.add_distance(s[2], s[1], 2);
        catalogue.add_distance(s[2], s[3], 3);
        catalogue.add_distance(s[3], s[2], 30);
        let bus = catalogue
            .add_bus("751", s.clone(), RouteKind::Linear)
            .unwrap();

        assert_eq!(catalogue.route_length(bus).unwrap(), 39);
        assert_eq!(catalogue.bus(bus).stop_count(), 7);
    }

    #[test]
    fn missing_closing_distance_is_an_error() {
        let (mut catalogue, s) = catalogue_with_stops(&["s1", "s2", "s3"]);
        catalogue.add_distance(s[0], s[1], 1);
        catalogue.add_distance(s[1], s[1], 2);
        catalogue.add_distance(s[1], s[2], 3);
        catalogue.add_distance(s[2], s[1], 5);
        let bus = catalogue
            .add_bus("14", vec![s[0], s[1], s[1], s[2], s[0]], RouteKind::Circular)
            .unwrap();

        assert!(matches!(
            catalogue.route_length(bus),
            Err(CatalogueError::UnknownDistance { .. })
        ));
    }

    #[test]
    fn reverse_direction_fallback_and_overwrite() {
        let (mut catalogue, s) = catalogue_with_stops(&["s1", "s2"]);
        catalogue.add_distance(s[0], s[1], 7);
        assert_eq!(catalogue.distance(s[1], s[0]).unwrap(), 7);

        catalogue.add_distance(s[1], s[0], 9);
        assert_eq!(catalogue.distance(s[1], s[0]).unwrap(), 9);
        assert_eq!(catalogue.distance(s[0], s[1]).unwrap(), 7);
    }

    #[rstest]
    #[case(RouteKind::Circular, 4, 3)]
    #[case(RouteKind::Linear, 7, 4)]
    fn stop_counts(
        #[case] kind: RouteKind,
        #[case] expected_total: usize,
        #[case] expected_unique: usize,
    ) {
        let (mut catalogue, s) = catalogue_with_stops(&["a", "b", "c", "d"]);
        let stops = match kind {
            RouteKind::Circular => vec![s[0], s[1], s[2], s[0]],
            RouteKind::Linear => vec![s[0], s[1], s[2], s[3]],
        };
        let bus = catalogue.add_bus("x", stops, kind).unwrap();
        assert_eq!(catalogue.bus(bus).stop_count(), expected_total);
        assert_eq!(catalogue.bus(bus).unique_stop_count(), expected_unique);
    }

    #[test]
    fn effective_traversal_of_a_linear_bus() {
        let (mut catalogue, s) = catalogue_with_stops(&["a", "b", "c"]);
        let bus = catalogue
            .add_bus("x", vec![s[0], s[1], s[2]], RouteKind::Linear)
            .unwrap();
        let data = catalogue.bus(bus);
        let traversal: Vec<Stop> = (0..data.stop_count()).map(|p| data.stop_at(p)).collect();
        assert_eq!(traversal, vec![s[0], s[1], s[2], s[1], s[0]]);
    }

    #[test]
    fn buses_through_is_sorted_by_name() {
        let (mut catalogue, s) = catalogue_with_stops(&["hub", "end"]);
        for name in ["22", "1", "9"] {
            catalogue
                .add_bus(name, vec![s[0], s[1]], RouteKind::Linear)
                .unwrap();
        }
        let names: Vec<&str> = catalogue
            .buses_through(s[0])
            .iter()
            .map(|bus| catalogue.bus(*bus).name.as_str())
            .collect();
        assert_eq!(names, vec!["1", "22", "9"]);
        assert!(catalogue.buses_through(s[1]).len() == 3);
    }

    #[test]
    fn a_bus_visiting_a_stop_twice_is_listed_once() {
        let (mut catalogue, s) = catalogue_with_stops(&["a", "b"]);
        catalogue
            .add_bus("5", vec![s[0], s[1], s[0]], RouteKind::Circular)
            .unwrap();
        assert_eq!(catalogue.buses_through(s[0]).len(), 1);
    }

    #[test]
    fn duplicates_and_empty_names_are_rejected() {
        let mut catalogue = TransportCatalogue::new();
        let a = catalogue
            .add_stop("a", Coordinates::new(1.0, 2.0))
            .unwrap();
        assert_eq!(
            catalogue.add_stop("a", Coordinates::new(3.0, 4.0)),
            Err(CatalogueError::DuplicateStop("a".to_string()))
        );
        assert_eq!(
            catalogue.add_stop("", Coordinates::new(3.0, 4.0)),
            Err(CatalogueError::EmptyStopName)
        );

        catalogue
            .add_bus("b", vec![a], RouteKind::Circular)
            .unwrap();
        assert_eq!(
            catalogue.add_bus("b", vec![a], RouteKind::Circular),
            Err(CatalogueError::DuplicateBus("b".to_string()))
        );
        assert_eq!(
            catalogue.add_bus("", vec![a], RouteKind::Circular),
            Err(CatalogueError::EmptyBusName)
        );
        assert_eq!(
            catalogue.add_bus("c", vec![], RouteKind::Linear),
            Err(CatalogueError::NoStops("c".to_string()))
        );
    }

    #[test]
    fn curvature_is_at_least_one_for_road_worthy_data() {
        let mut catalogue = TransportCatalogue::new();
        let a = catalogue
            .add_stop("a", Coordinates::new(54.690740, 25.241002))
            .unwrap();
        let b = catalogue
            .add_stop("b", Coordinates::new(54.701723, 25.264866))
            .unwrap();
        // the road is longer than the crow flies (~1960 m)
        catalogue.add_distance(a, b, 2400);
        let bus = catalogue.add_bus("7", vec![a, b], RouteKind::Linear).unwrap();
        let curvature = catalogue.curvature(bus).unwrap();
        assert!(curvature >= 1.0 - 1e-9);
        assert!((curvature - 4800.0 / catalogue.geo_length(bus)).abs() < 1e-9);
    }

    #[test]
    fn single_stop_linear_bus_is_degenerate_but_valid() {
        let (mut catalogue, s) = catalogue_with_stops(&["only"]);
        let bus = catalogue
            .add_bus("solo", vec![s[0]], RouteKind::Linear)
            .unwrap();
        assert_eq!(catalogue.bus(bus).stop_count(), 1);
        assert_eq!(catalogue.route_length(bus).unwrap(), 0);
        assert_eq!(catalogue.geo_length(bus), 0.0);
        assert_eq!(catalogue.curvature(bus).unwrap(), 1.0);
    }
}
