//! Binary persistence of the fully-populated base.
//!
//! The stream holds four sections in a fixed field order: catalogue, render
//! settings, routing settings, transit router. Stops and buses are written
//! with their handle values as document-local ids; reload resolves the ids
//! back to fresh handles, replays the travel graph edge by edge and restores
//! the shortest-path table cell by cell, so no precomputation reruns.

use std::collections::HashMap;
use std::io::{Read, Write};

use prost::Message;
use thiserror::Error;
use tracing::debug;

use crate::base::Base;
use crate::base_proto as proto;
use crate::catalogue::{Bus, CatalogueError, RouteKind, Stop, TransportCatalogue};
use crate::engine::{RouteInternalData, ShortestPaths};
use crate::geo::Coordinates;
use crate::graph::DirectedWeightedGraph;
use crate::render::RenderSettings;
use crate::svg::Color;
use crate::transit_router::{EdgeData, RoutingSettings, TransitRouter};

#[derive(Debug, Error)]
pub enum Error {
    #[error("base i/o failed")]
    Io(#[from] std::io::Error),
    #[error("base stream could not be encoded")]
    Encode(#[from] prost::EncodeError),
    #[error("base stream is malformed")]
    Decode(#[from] prost::DecodeError),
    #[error("catalogue rebuild failed")]
    Catalogue(#[from] CatalogueError),
    #[error("base stream is inconsistent: {0}")]
    Inconsistent(String),
    #[error("the router has not been built, nothing to serialize")]
    MissingRouter,
}

/// Writes the base (catalogue, settings and the precomputed router) to
/// `output`. Fails with [`Error::MissingRouter`] before `build_router`.
pub fn serialize<W: Write>(base: &Base, output: &mut W) -> Result<(), Error> {
    let router = base.router.as_ref().ok_or(Error::MissingRouter)?;
    let message = proto::Base {
        transport_catalogue: Some(catalogue_message(&base.catalogue)),
        render_settings: Some(render_settings_message(&base.render_settings)),
        routing_settings: Some(routing_settings_message(router.settings())),
        transport_router: Some(router_message(router)),
    };
    let mut buf = Vec::with_capacity(message.encoded_len());
    message.encode(&mut buf)?;
    output.write_all(&buf)?;
    debug!(bytes = buf.len(), "base serialized");
    Ok(())
}

/// Reads a base previously written by [`serialize`].
pub fn deserialize<R: Read>(input: &mut R) -> Result<Base, Error> {
    let mut buf = Vec::new();
    input.read_to_end(&mut buf)?;
    let message = proto::Base::decode(buf.as_slice())?;

    let catalogue_message = message
        .transport_catalogue
        .ok_or_else(|| Error::Inconsistent("missing catalogue section".to_string()))?;
    let mut catalogue = TransportCatalogue::new();
    let (stop_ids, bus_ids) = parse_catalogue(&catalogue_message, &mut catalogue)?;

    let render_settings = parse_render_settings(
        message
            .render_settings
            .ok_or_else(|| Error::Inconsistent("missing render settings".to_string()))?,
    )?;
    let routing_settings = parse_routing_settings(
        message
            .routing_settings
            .ok_or_else(|| Error::Inconsistent("missing routing settings".to_string()))?,
    );
    let router = parse_router(
        message
            .transport_router
            .ok_or_else(|| Error::Inconsistent("missing router section".to_string()))?,
        routing_settings,
        &stop_ids,
        &bus_ids,
    )?;

    debug!(
        stops = catalogue.nb_of_stops(),
        buses = catalogue.nb_of_buses(),
        "base deserialized"
    );
    Ok(Base {
        catalogue,
        render_settings,
        router: Some(router),
    })
}

fn catalogue_message(catalogue: &TransportCatalogue) -> proto::TransportCatalogue {
    let mut message = proto::TransportCatalogue::default();
    for stop in catalogue.stops() {
        let data = catalogue.stop(stop);
        message.stop.push(proto::Stop {
            id: stop.idx as u64,
            name: data.name.clone(),
            coordinates: Some(proto::Coordinates {
                lat: data.coordinates.lat,
                lng: data.coordinates.lng,
            }),
        });
    }

    // the map iterates in arbitrary order; sort so the stream is stable
    let mut distances: Vec<((Stop, Stop), u32)> = catalogue.distances().collect();
    distances.sort_by_key(|(pair, _)| *pair);
    for ((from, to), metres) in distances {
        message.stops_distance.push(proto::StopsDistance {
            from_stop_id: from.idx as u64,
            to_stop_id: to.idx as u64,
            distance: metres,
        });
    }

    for bus in catalogue.buses() {
        let data = catalogue.bus(bus);
        message.bus.push(proto::Bus {
            id: bus.idx as u64,
            name: data.name.clone(),
            stop_id: data.stops.iter().map(|stop| stop.idx as u64).collect(),
            route_type: match data.kind {
                RouteKind::Circular => proto::RouteType::Circular,
                RouteKind::Linear => proto::RouteType::Linear,
            } as i32,
        });
    }
    message
}

fn color_message(color: &Color) -> proto::Color {
    let variant = match color {
        Color::Named(name) => proto::color::Variant::Str(name.clone()),
        Color::Rgb(r, g, b) => proto::color::Variant::Rgb(proto::Rgb {
            red: u32::from(*r),
            green: u32::from(*g),
            blue: u32::from(*b),
        }),
        Color::Rgba(r, g, b, opacity) => proto::color::Variant::Rgba(proto::Rgba {
            red: u32::from(*r),
            green: u32::from(*g),
            blue: u32::from(*b),
            opacity: *opacity,
        }),
    };
    proto::Color {
        variant: Some(variant),
    }
}

fn render_settings_message(settings: &RenderSettings) -> proto::RenderSettings {
    proto::RenderSettings {
        width: settings.width,
        height: settings.height,
        padding: settings.padding,
        line_width: settings.line_width,
        stop_radius: settings.stop_radius,
        bus_label_font_size: settings.bus_label_font_size,
        bus_label_offset: Some(proto::Offset {
            dx: settings.bus_label_offset[0],
            dy: settings.bus_label_offset[1],
        }),
        stop_label_font_size: settings.stop_label_font_size,
        stop_label_offset: Some(proto::Offset {
            dx: settings.stop_label_offset[0],
            dy: settings.stop_label_offset[1],
        }),
        underlayer_color: Some(color_message(&settings.underlayer_color)),
        underlayer_width: settings.underlayer_width,
        color_palette: settings.color_palette.iter().map(color_message).collect(),
    }
}

fn routing_settings_message(settings: RoutingSettings) -> proto::RoutingSettings {
    proto::RoutingSettings {
        bus_wait_time: settings.bus_wait_time,
        bus_velocity: settings.bus_velocity,
    }
}

fn router_message(router: &TransitRouter) -> proto::TransportRouter {
    let graph = router.graph();
    let graph_message = proto::Graph {
        vertex_count: graph.vertex_count() as u64,
        edge: graph
            .edges()
            .map(|edge| proto::Edge {
                from: edge.from as u64,
                to: edge.to as u64,
                weight: edge.weight,
            })
            .collect(),
    };

    let mut router_message = proto::Router::default();
    for row in router.shortest_paths().rows() {
        let mut row_message = proto::RouterDataRow::default();
        for cell in row {
            let mut opt = proto::OptRouteInternalData::default();
            if let Some(data) = cell {
                let mut data_message = proto::RouteInternalData {
                    weight: data.weight,
                    prev_edge: Vec::new(),
                };
                if let Some(prev_edge) = data.prev_edge {
                    data_message.prev_edge.push(prev_edge as u64);
                }
                opt.data.push(data_message);
            }
            row_message.opt_data.push(opt);
        }
        router_message.data_row.push(row_message);
    }

    let mut vertex_to_stop_id = vec![0u64; graph.vertex_count()];
    for (stop, vertex) in router.stop_to_vertex() {
        vertex_to_stop_id[*vertex] = stop.idx as u64;
    }

    let edge = router
        .edge_data()
        .iter()
        .map(|meta| proto::EdgeData {
            wait: meta.wait,
            from_stop: meta.from.idx as u64,
            to_stop: meta.to.idx as u64,
            span: meta.span,
            bus: meta.bus.idx as u64,
        })
        .collect();

    proto::TransportRouter {
        graph: Some(graph_message),
        router: Some(router_message),
        vertex_to_stop_id,
        edge,
    }
}

fn resolve<T: Copy>(ids: &HashMap<u64, T>, id: u64, what: &str) -> Result<T, Error> {
    ids.get(&id)
        .copied()
        .ok_or_else(|| Error::Inconsistent(format!("dangling {} id {}", what, id)))
}

type StopIdMap = HashMap<u64, Stop>;
type BusIdMap = HashMap<u64, Bus>;

fn parse_catalogue(
    message: &proto::TransportCatalogue,
    catalogue: &mut TransportCatalogue,
) -> Result<(StopIdMap, BusIdMap), Error> {
    let mut stop_ids = StopIdMap::new();
    for stop in &message.stop {
        let coordinates = stop.coordinates.as_ref().ok_or_else(|| {
            Error::Inconsistent(format!("stop `{}` has no coordinates", stop.name))
        })?;
        let handle = catalogue.add_stop(
            &stop.name,
            Coordinates::new(coordinates.lat, coordinates.lng),
        )?;
        if stop_ids.insert(stop.id, handle).is_some() {
            return Err(Error::Inconsistent(format!("duplicate stop id {}", stop.id)));
        }
    }

    for distance in &message.stops_distance {
        let from = resolve(&stop_ids, distance.from_stop_id, "stop")?;
        let to = resolve(&stop_ids, distance.to_stop_id, "stop")?;
        catalogue.add_distance(from, to, distance.distance);
    }

    let mut bus_ids = BusIdMap::new();
    for bus in &message.bus {
        let stops = bus
            .stop_id
            .iter()
            .map(|id| resolve(&stop_ids, *id, "stop"))
            .collect::<Result<Vec<_>, _>>()?;
        let kind = match proto::RouteType::from_i32(bus.route_type) {
            Some(proto::RouteType::Circular) => RouteKind::Circular,
            Some(proto::RouteType::Linear) => RouteKind::Linear,
            None => {
                return Err(Error::Inconsistent(format!(
                    "bus `{}` has unknown route type {}",
                    bus.name, bus.route_type
                )))
            }
        };
        let handle = catalogue.add_bus(&bus.name, stops, kind)?;
        if bus_ids.insert(bus.id, handle).is_some() {
            return Err(Error::Inconsistent(format!("duplicate bus id {}", bus.id)));
        }
    }

    Ok((stop_ids, bus_ids))
}

fn parse_color(message: proto::Color) -> Result<Color, Error> {
    match message.variant {
        Some(proto::color::Variant::Str(name)) => Ok(Color::Named(name)),
        Some(proto::color::Variant::Rgb(rgb)) => {
            Ok(Color::Rgb(rgb.red as u8, rgb.green as u8, rgb.blue as u8))
        }
        Some(proto::color::Variant::Rgba(rgba)) => Ok(Color::Rgba(
            rgba.red as u8,
            rgba.green as u8,
            rgba.blue as u8,
            rgba.opacity,
        )),
        None => Err(Error::Inconsistent("colour without a variant".to_string())),
    }
}

fn parse_render_settings(message: proto::RenderSettings) -> Result<RenderSettings, Error> {
    let bus_label_offset = message
        .bus_label_offset
        .ok_or_else(|| Error::Inconsistent("missing bus label offset".to_string()))?;
    let stop_label_offset = message
        .stop_label_offset
        .ok_or_else(|| Error::Inconsistent("missing stop label offset".to_string()))?;
    let underlayer_color = parse_color(
        message
            .underlayer_color
            .ok_or_else(|| Error::Inconsistent("missing underlayer colour".to_string()))?,
    )?;
    Ok(RenderSettings {
        width: message.width,
        height: message.height,
        padding: message.padding,
        line_width: message.line_width,
        stop_radius: message.stop_radius,
        bus_label_font_size: message.bus_label_font_size,
        bus_label_offset: [bus_label_offset.dx, bus_label_offset.dy],
        stop_label_font_size: message.stop_label_font_size,
        stop_label_offset: [stop_label_offset.dx, stop_label_offset.dy],
        underlayer_color,
        underlayer_width: message.underlayer_width,
        color_palette: message
            .color_palette
            .into_iter()
            .map(parse_color)
            .collect::<Result<Vec<_>, _>>()?,
    })
}

fn parse_routing_settings(message: proto::RoutingSettings) -> RoutingSettings {
    RoutingSettings {
        bus_wait_time: message.bus_wait_time,
        bus_velocity: message.bus_velocity,
    }
}

fn parse_router(
    message: proto::TransportRouter,
    settings: RoutingSettings,
    stop_ids: &StopIdMap,
    bus_ids: &BusIdMap,
) -> Result<TransitRouter, Error> {
    let graph_message = message
        .graph
        .ok_or_else(|| Error::Inconsistent("missing travel graph".to_string()))?;
    let vertex_count = graph_message.vertex_count as usize;
    let mut graph = DirectedWeightedGraph::new(vertex_count);
    for edge in &graph_message.edge {
        let (from, to) = (edge.from as usize, edge.to as usize);
        if from >= vertex_count || to >= vertex_count {
            return Err(Error::Inconsistent(format!(
                "edge endpoint {} → {} outside of {} vertices",
                from, to, vertex_count
            )));
        }
        graph.add_edge(from, to, edge.weight);
    }

    let router_message = message
        .router
        .ok_or_else(|| Error::Inconsistent("missing shortest-path table".to_string()))?;
    if router_message.data_row.len() != vertex_count {
        return Err(Error::Inconsistent(format!(
            "table has {} rows for {} vertices",
            router_message.data_row.len(),
            vertex_count
        )));
    }
    let mut rows = Vec::with_capacity(vertex_count);
    for row_message in &router_message.data_row {
        if row_message.opt_data.len() != vertex_count {
            return Err(Error::Inconsistent(format!(
                "table row has {} cells for {} vertices",
                row_message.opt_data.len(),
                vertex_count
            )));
        }
        let mut row = Vec::with_capacity(vertex_count);
        for opt in &row_message.opt_data {
            row.push(match opt.data.len() {
                0 => None,
                1 => {
                    let data = &opt.data[0];
                    let prev_edge = match data.prev_edge.len() {
                        0 => None,
                        1 => {
                            let id = data.prev_edge[0] as usize;
                            if id >= graph.edge_count() {
                                return Err(Error::Inconsistent(format!(
                                    "table references edge {} of {}",
                                    id,
                                    graph.edge_count()
                                )));
                            }
                            Some(id)
                        }
                        n => {
                            return Err(Error::Inconsistent(format!(
                                "table cell carries {} predecessors",
                                n
                            )))
                        }
                    };
                    Some(RouteInternalData {
                        weight: data.weight,
                        prev_edge,
                    })
                }
                n => {
                    return Err(Error::Inconsistent(format!(
                        "table cell carries {} entries",
                        n
                    )))
                }
            });
        }
        rows.push(row);
    }
    let shortest_paths = ShortestPaths::from_rows(rows);

    if message.vertex_to_stop_id.len() != vertex_count {
        return Err(Error::Inconsistent(format!(
            "vertex map has {} entries for {} vertices",
            message.vertex_to_stop_id.len(),
            vertex_count
        )));
    }
    let mut stop_to_vertex = HashMap::with_capacity(vertex_count);
    for (vertex, stop_id) in message.vertex_to_stop_id.iter().enumerate() {
        stop_to_vertex.insert(resolve(stop_ids, *stop_id, "stop")?, vertex);
    }

    if message.edge.len() != graph.edge_count() {
        return Err(Error::Inconsistent(format!(
            "{} edge metadata entries for {} edges",
            message.edge.len(),
            graph.edge_count()
        )));
    }
    let mut edges = Vec::with_capacity(message.edge.len());
    for meta in &message.edge {
        edges.push(EdgeData {
            wait: meta.wait,
            from: resolve(stop_ids, meta.from_stop, "stop")?,
            to: resolve(stop_ids, meta.to_stop, "stop")?,
            span: meta.span,
            bus: resolve(bus_ids, meta.bus, "bus")?,
        });
    }

    Ok(TransitRouter::from_parts(
        settings,
        graph,
        shortest_paths,
        stop_to_vertex,
        edges,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_round_trip_through_the_wire_form() {
        for color in [
            Color::Named("green".to_string()),
            Color::Rgb(255, 160, 0),
            Color::Rgba(255, 200, 23, 0.85),
        ] {
            assert_eq!(parse_color(color_message(&color)).unwrap(), color);
        }
    }

    #[test]
    fn garbage_is_rejected_as_malformed() {
        let mut garbage: &[u8] = &[0xff, 0xff, 0xff, 0xff];
        assert!(matches!(deserialize(&mut garbage), Err(Error::Decode(_))));
    }

    #[test]
    fn serializing_without_a_router_is_an_error() {
        let base = Base::default();
        let mut sink = Vec::new();
        assert!(matches!(
            serialize(&base, &mut sink),
            Err(Error::MissingRouter)
        ));
    }
}
