//! Itinerary results returned by the transit router.

use crate::catalogue::{Bus, Stop};

/// One leg of an itinerary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Activity {
    /// Stand at `stop` until the bus departs.
    Wait { stop: Stop, minutes: f64 },
    /// Ride `bus` from `from` over `span` consecutive hops without alighting.
    Ride {
        bus: Bus,
        from: Stop,
        span: u32,
        minutes: f64,
    },
}

/// A complete journey. An empty activity list means the source and the
/// destination coincide.
#[derive(Debug, Clone, PartialEq)]
pub struct Itinerary {
    /// Total travel time in minutes; the sum of all activity times.
    pub total_time: f64,
    pub activities: Vec<Activity>,
}
