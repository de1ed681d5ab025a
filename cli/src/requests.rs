//! JSON document reader: maps the textual request document onto facade
//! calls and builds the response array.
//!
//! `base_requests` is consumed in two passes. Stops are inserted first and
//! their road distances queued, because a distance may name a stop that
//! appears later in the array; buses follow once every stop handle exists.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Context;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use transit_catalogue::{Activity, Base, Coordinates, RenderSettings, RouteKind, RoutingSettings};

#[derive(Debug, Deserialize)]
pub struct SerializationSettings {
    pub file: PathBuf,
}

/// Document consumed by `make_base`.
#[derive(Debug, Deserialize)]
pub struct BaseDocument {
    pub base_requests: Vec<BaseRequest>,
    #[serde(default)]
    pub render_settings: RenderSettings,
    #[serde(default)]
    pub routing_settings: RoutingSettings,
    pub serialization_settings: SerializationSettings,
}

/// Document consumed by `process_requests`.
#[derive(Debug, Deserialize)]
pub struct StatDocument {
    pub serialization_settings: SerializationSettings,
    pub stat_requests: Vec<StatRequest>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum BaseRequest {
    Stop {
        name: String,
        latitude: f64,
        longitude: f64,
        #[serde(default)]
        road_distances: BTreeMap<String, u32>,
    },
    Bus {
        name: String,
        stops: Vec<String>,
        is_roundtrip: bool,
    },
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum StatRequest {
    Bus { id: i64, name: String },
    Stop { id: i64, name: String },
    Map { id: i64 },
    Route { id: i64, from: String, to: String },
}

/// Fills a [`Base`] from the document and runs the router precomputation.
pub fn build_base(document: &BaseDocument) -> anyhow::Result<Base> {
    let mut base = Base::new(document.render_settings.clone());

    let mut pending_distances = Vec::new();
    for request in &document.base_requests {
        if let BaseRequest::Stop {
            name,
            latitude,
            longitude,
            road_distances,
        } = request
        {
            let stop = base.add_stop(name, Coordinates::new(*latitude, *longitude))?;
            for (other, metres) in road_distances {
                pending_distances.push((stop, other.as_str(), *metres));
            }
        }
    }
    for (from, other, metres) in pending_distances {
        let to = base
            .catalogue
            .find_stop(other)
            .with_context(|| format!("road distance to unknown stop `{}`", other))?;
        base.add_distance(from, to, metres);
    }
    for request in &document.base_requests {
        if let BaseRequest::Bus {
            name,
            stops,
            is_roundtrip,
        } = request
        {
            let handles = stops
                .iter()
                .map(|stop_name| {
                    base.catalogue.find_stop(stop_name).with_context(|| {
                        format!("bus `{}` visits unknown stop `{}`", name, stop_name)
                    })
                })
                .collect::<anyhow::Result<Vec<_>>>()?;
            let kind = if *is_roundtrip {
                RouteKind::Circular
            } else {
                RouteKind::Linear
            };
            base.add_bus(name, handles, kind)?;
        }
    }
    info!(
        stops = base.catalogue.nb_of_stops(),
        buses = base.catalogue.nb_of_buses(),
        "catalogue filled"
    );

    base.build_router(document.routing_settings)?;
    Ok(base)
}

/// Answers every stat request, in request order.
pub fn process_requests(base: &Base, requests: &[StatRequest]) -> anyhow::Result<Value> {
    let mut responses = Vec::with_capacity(requests.len());
    for request in requests {
        responses.push(match request {
            StatRequest::Bus { id, name } => bus_stat(base, *id, name)?,
            StatRequest::Stop { id, name } => stop_stat(base, *id, name),
            StatRequest::Map { id } => json!({ "request_id": id, "map": base.render_map() }),
            StatRequest::Route { id, from, to } => route_stat(base, *id, from, to),
        });
    }
    Ok(Value::Array(responses))
}

fn not_found(id: i64) -> Value {
    json!({ "request_id": id, "error_message": "not found" })
}

fn bus_stat(base: &Base, id: i64, name: &str) -> anyhow::Result<Value> {
    Ok(match base.bus_report(name)? {
        Some(report) => json!({
            "request_id": id,
            "route_length": report.route_length,
            "stop_count": report.stop_count,
            "unique_stop_count": report.unique_stop_count,
            "curvature": report.curvature,
        }),
        None => not_found(id),
    })
}

fn stop_stat(base: &Base, id: i64, name: &str) -> Value {
    match base.stop_report(name) {
        Some(buses) => json!({ "request_id": id, "buses": buses }),
        None => not_found(id),
    }
}

fn route_stat(base: &Base, id: i64, from: &str, to: &str) -> Value {
    let itinerary = match base.route(from, to) {
        Some(itinerary) => itinerary,
        None => return not_found(id),
    };
    let items: Vec<Value> = itinerary
        .activities
        .iter()
        .map(|activity| match activity {
            Activity::Wait { stop, minutes } => json!({
                "type": "Wait",
                "stop_name": base.catalogue.stop(*stop).name,
                "time": minutes,
            }),
            Activity::Ride {
                bus, span, minutes, ..
            } => json!({
                "type": "Bus",
                "bus": base.catalogue.bus(*bus).name,
                "span_count": span,
                "time": minutes,
            }),
        })
        .collect();
    json!({
        "request_id": id,
        "total_time": itinerary.total_time,
        "items": items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_document() -> BaseDocument {
        serde_json::from_value(json!({
            "base_requests": [
                {
                    "type": "Bus",
                    "name": "114",
                    "stops": ["Sea terminal", "Riverside bridge"],
                    "is_roundtrip": false
                },
                {
                    "type": "Stop",
                    "name": "Riverside bridge",
                    "latitude": 43.587795,
                    "longitude": 39.716901,
                    "road_distances": { "Sea terminal": 850 }
                },
                {
                    "type": "Stop",
                    "name": "Sea terminal",
                    "latitude": 43.581969,
                    "longitude": 39.719848,
                    "road_distances": { "Riverside bridge": 850 }
                }
            ],
            "routing_settings": { "bus_wait_time": 6, "bus_velocity": 40 },
            "render_settings": {
                "width": 200,
                "height": 200,
                "padding": 30,
                "stop_radius": 5,
                "line_width": 14,
                "bus_label_font_size": 20,
                "bus_label_offset": [7, 15],
                "stop_label_font_size": 20,
                "stop_label_offset": [7, -3],
                "underlayer_color": [255, 255, 255, 0.85],
                "underlayer_width": 3,
                "color_palette": ["green", [255, 160, 0], "red"]
            },
            "serialization_settings": { "file": "base.bin" }
        }))
        .expect("document is well formed")
    }

    fn requests(value: Value) -> Vec<StatRequest> {
        serde_json::from_value(value).expect("requests are well formed")
    }

    #[test]
    fn buses_may_precede_their_stops_in_the_document() {
        let base = build_base(&sample_document()).unwrap();
        assert_eq!(base.catalogue.nb_of_stops(), 2);
        assert_eq!(base.catalogue.nb_of_buses(), 1);
    }

    #[test]
    fn bus_and_stop_stats() {
        let base = build_base(&sample_document()).unwrap();
        let responses = process_requests(
            &base,
            &requests(json!([
                { "id": 1, "type": "Stop", "name": "Riverside bridge" },
                { "id": 2, "type": "Bus", "name": "114" },
                { "id": 3, "type": "Bus", "name": "999" },
                { "id": 4, "type": "Stop", "name": "nowhere" }
            ])),
        )
        .unwrap();

        let responses = responses.as_array().unwrap();
        assert_eq!(responses[0]["request_id"], 1);
        assert_eq!(responses[0]["buses"], json!(["114"]));

        assert_eq!(responses[1]["route_length"], 1700);
        assert_eq!(responses[1]["stop_count"], 3);
        assert_eq!(responses[1]["unique_stop_count"], 2);
        assert!(responses[1]["curvature"].as_f64().unwrap() > 1.0);

        assert_eq!(responses[2]["error_message"], "not found");
        assert_eq!(responses[3]["error_message"], "not found");
    }

    #[test]
    fn route_stat_decodes_waits_and_rides() {
        let base = build_base(&sample_document()).unwrap();
        let responses = process_requests(
            &base,
            &requests(json!([
                { "id": 5, "type": "Route",
                  "from": "Sea terminal", "to": "Riverside bridge" },
                { "id": 6, "type": "Route",
                  "from": "Sea terminal", "to": "Sea terminal" },
                { "id": 7, "type": "Route", "from": "Sea terminal", "to": "nowhere" }
            ])),
        )
        .unwrap();

        let responses = responses.as_array().unwrap();
        // 6 min wait + 850 m at 40 km/h = 6 + 1.275
        let total = responses[0]["total_time"].as_f64().unwrap();
        assert!((total - 7.275).abs() < 1e-9);
        let items = responses[0]["items"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["type"], "Wait");
        assert_eq!(items[0]["stop_name"], "Sea terminal");
        assert_eq!(items[1]["type"], "Bus");
        assert_eq!(items[1]["bus"], "114");
        assert_eq!(items[1]["span_count"], 1);

        assert_eq!(responses[1]["total_time"].as_f64().unwrap(), 0.0);
        assert_eq!(responses[1]["items"].as_array().unwrap().len(), 0);

        assert_eq!(responses[2]["error_message"], "not found");
    }

    #[test]
    fn map_stat_embeds_the_svg_text() {
        let base = build_base(&sample_document()).unwrap();
        let responses = process_requests(
            &base,
            &requests(json!([{ "id": 8, "type": "Map" }])),
        )
        .unwrap();

        let map = responses[0]["map"].as_str().unwrap();
        assert!(map.starts_with("<?xml"));
        assert!(map.contains("<polyline"));
        assert!(map.contains(">114</text>"));
    }

    #[test]
    fn unknown_stop_in_road_distances_is_an_input_error() {
        let document: BaseDocument = serde_json::from_value(json!({
            "base_requests": [
                {
                    "type": "Stop",
                    "name": "Lonely",
                    "latitude": 43.0,
                    "longitude": 39.0,
                    "road_distances": { "Ghost": 100 }
                }
            ],
            "serialization_settings": { "file": "base.bin" }
        }))
        .unwrap();
        let error = build_base(&document).unwrap_err();
        assert!(error.to_string().contains("Ghost"));
    }
}
