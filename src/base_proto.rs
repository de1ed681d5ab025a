//! Wire messages of the persisted base, maintained by hand in the style of
//! prost-generated code. Field numbers are part of the on-disk format and
//! must never be reassigned. Optional table cells are encoded as 0-or-1
//! element repeated fields so that "unreachable" and "start vertex, no
//! predecessor" stay distinguishable.

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Coordinates {
    #[prost(double, tag = "1")]
    pub lat: f64,
    #[prost(double, tag = "2")]
    pub lng: f64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Stop {
    #[prost(uint64, tag = "1")]
    pub id: u64,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(message, optional, tag = "3")]
    pub coordinates: Option<Coordinates>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct StopsDistance {
    #[prost(uint64, tag = "1")]
    pub from_stop_id: u64,
    #[prost(uint64, tag = "2")]
    pub to_stop_id: u64,
    #[prost(uint32, tag = "3")]
    pub distance: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum RouteType {
    Circular = 0,
    Linear = 1,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Bus {
    #[prost(uint64, tag = "1")]
    pub id: u64,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(uint64, repeated, tag = "3")]
    pub stop_id: Vec<u64>,
    #[prost(enumeration = "RouteType", tag = "4")]
    pub route_type: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TransportCatalogue {
    #[prost(message, repeated, tag = "1")]
    pub stop: Vec<Stop>,
    #[prost(message, repeated, tag = "2")]
    pub stops_distance: Vec<StopsDistance>,
    #[prost(message, repeated, tag = "3")]
    pub bus: Vec<Bus>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Offset {
    #[prost(double, tag = "1")]
    pub dx: f64,
    #[prost(double, tag = "2")]
    pub dy: f64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Rgb {
    #[prost(uint32, tag = "1")]
    pub red: u32,
    #[prost(uint32, tag = "2")]
    pub green: u32,
    #[prost(uint32, tag = "3")]
    pub blue: u32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Rgba {
    #[prost(uint32, tag = "1")]
    pub red: u32,
    #[prost(uint32, tag = "2")]
    pub green: u32,
    #[prost(uint32, tag = "3")]
    pub blue: u32,
    #[prost(double, tag = "4")]
    pub opacity: f64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Color {
    #[prost(oneof = "color::Variant", tags = "1, 2, 3")]
    pub variant: Option<color::Variant>,
}

pub mod color {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Variant {
        #[prost(string, tag = "1")]
        Str(String),
        #[prost(message, tag = "2")]
        Rgb(super::Rgb),
        #[prost(message, tag = "3")]
        Rgba(super::Rgba),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RenderSettings {
    #[prost(double, tag = "1")]
    pub width: f64,
    #[prost(double, tag = "2")]
    pub height: f64,
    #[prost(double, tag = "3")]
    pub padding: f64,
    #[prost(double, tag = "4")]
    pub line_width: f64,
    #[prost(double, tag = "5")]
    pub stop_radius: f64,
    #[prost(uint32, tag = "6")]
    pub bus_label_font_size: u32,
    #[prost(message, optional, tag = "7")]
    pub bus_label_offset: Option<Offset>,
    #[prost(uint32, tag = "8")]
    pub stop_label_font_size: u32,
    #[prost(message, optional, tag = "9")]
    pub stop_label_offset: Option<Offset>,
    #[prost(message, optional, tag = "10")]
    pub underlayer_color: Option<Color>,
    #[prost(double, tag = "11")]
    pub underlayer_width: f64,
    #[prost(message, repeated, tag = "12")]
    pub color_palette: Vec<Color>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RoutingSettings {
    #[prost(uint32, tag = "1")]
    pub bus_wait_time: u32,
    #[prost(double, tag = "2")]
    pub bus_velocity: f64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Edge {
    #[prost(uint64, tag = "1")]
    pub from: u64,
    #[prost(uint64, tag = "2")]
    pub to: u64,
    #[prost(double, tag = "3")]
    pub weight: f64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Graph {
    #[prost(uint64, tag = "1")]
    pub vertex_count: u64,
    #[prost(message, repeated, tag = "2")]
    pub edge: Vec<Edge>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RouteInternalData {
    #[prost(double, tag = "1")]
    pub weight: f64,
    /// 0 or 1 elements; empty means "start vertex, no predecessor".
    #[prost(uint64, repeated, tag = "2")]
    pub prev_edge: Vec<u64>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct OptRouteInternalData {
    /// 0 or 1 elements; empty means "unreachable".
    #[prost(message, repeated, tag = "1")]
    pub data: Vec<RouteInternalData>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RouterDataRow {
    #[prost(message, repeated, tag = "1")]
    pub opt_data: Vec<OptRouteInternalData>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Router {
    #[prost(message, repeated, tag = "1")]
    pub data_row: Vec<RouterDataRow>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EdgeData {
    #[prost(double, tag = "1")]
    pub wait: f64,
    #[prost(uint64, tag = "2")]
    pub from_stop: u64,
    #[prost(uint64, tag = "3")]
    pub to_stop: u64,
    #[prost(uint32, tag = "4")]
    pub span: u32,
    #[prost(uint64, tag = "5")]
    pub bus: u64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TransportRouter {
    #[prost(message, optional, tag = "1")]
    pub graph: Option<Graph>,
    #[prost(message, optional, tag = "2")]
    pub router: Option<Router>,
    /// Dense array indexed by vertex id.
    #[prost(uint64, repeated, tag = "3")]
    pub vertex_to_stop_id: Vec<u64>,
    /// One entry per graph edge, in edge-id order.
    #[prost(message, repeated, tag = "4")]
    pub edge: Vec<EdgeData>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Base {
    #[prost(message, optional, tag = "1")]
    pub transport_catalogue: Option<TransportCatalogue>,
    #[prost(message, optional, tag = "2")]
    pub render_settings: Option<RenderSettings>,
    #[prost(message, optional, tag = "3")]
    pub routing_settings: Option<RoutingSettings>,
    #[prost(message, optional, tag = "4")]
    pub transport_router: Option<TransportRouter>,
}
