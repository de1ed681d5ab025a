pub mod base;
pub mod catalogue;
pub mod engine;
pub mod geo;
pub mod graph;
pub mod render;
pub mod response;
pub mod serialization;
pub mod svg;
pub mod transit_router;

mod base_proto;

pub use base::{Base, BusReport};
pub use catalogue::{Bus, BusData, CatalogueError, RouteKind, Stop, StopData, TransportCatalogue};
pub use geo::Coordinates;
pub use render::RenderSettings;
pub use response::{Activity, Itinerary};
pub use transit_router::{RoutingSettings, TransitRouter};
