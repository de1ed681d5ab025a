//! Stylised map rendering: projection of stop coordinates onto the image
//! plane and the layered SVG drawing of routes, stops and labels.

use serde::Deserialize;

use crate::catalogue::{Bus, RouteKind, Stop, TransportCatalogue};
use crate::geo::Coordinates;
use crate::svg::{self, Color, Point, StrokeLineCap, StrokeLineJoin};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Image size in pixels.
    pub width: f64,
    pub height: f64,
    /// Margin between the map and the document border.
    pub padding: f64,
    pub line_width: f64,
    pub stop_radius: f64,
    pub bus_label_font_size: u32,
    /// `dx`/`dy` of a route label relative to its terminal stop.
    pub bus_label_offset: [f64; 2],
    pub stop_label_font_size: u32,
    pub stop_label_offset: [f64; 2],
    /// Colour of the underlay behind route and stop labels.
    pub underlayer_color: Color,
    pub underlayer_width: f64,
    /// Route colours, assigned round-robin in drawing order.
    pub color_palette: Vec<Color>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 1200.0,
            padding: 50.0,
            line_width: 14.0,
            stop_radius: 5.0,
            bus_label_font_size: 20,
            bus_label_offset: [7.0, 15.0],
            stop_label_font_size: 20,
            stop_label_offset: [7.0, -3.0],
            underlayer_color: Color::Rgba(255, 255, 255, 0.85),
            underlayer_width: 3.0,
            color_palette: vec![
                Color::Named("green".to_string()),
                Color::Rgb(255, 160, 0),
                Color::Named("red".to_string()),
            ],
        }
    }
}

const EPSILON: f64 = 1e-6;

/// Projects (lat, lng) onto image coordinates, uniformly zoomed so that all
/// given points fit inside the padded frame.
#[derive(Debug, Clone, Copy)]
pub struct SphereProjector {
    padding: f64,
    min_lng: f64,
    max_lat: f64,
    zoom: f64,
}

impl SphereProjector {
    pub fn new<I>(points: I, max_width: f64, max_height: f64, padding: f64) -> Self
    where
        I: IntoIterator<Item = Coordinates>,
    {
        let mut iter = points.into_iter();
        let first = match iter.next() {
            Some(point) => point,
            None => {
                return Self {
                    padding,
                    min_lng: 0.0,
                    max_lat: 0.0,
                    zoom: 0.0,
                }
            }
        };
        let (mut min_lng, mut max_lng) = (first.lng, first.lng);
        let (mut min_lat, mut max_lat) = (first.lat, first.lat);
        for point in iter {
            min_lng = min_lng.min(point.lng);
            max_lng = max_lng.max(point.lng);
            min_lat = min_lat.min(point.lat);
            max_lat = max_lat.max(point.lat);
        }

        let width_zoom = if (max_lng - min_lng).abs() < EPSILON {
            None
        } else {
            Some((max_width - 2.0 * padding) / (max_lng - min_lng))
        };
        let height_zoom = if (max_lat - min_lat).abs() < EPSILON {
            None
        } else {
            Some((max_height - 2.0 * padding) / (max_lat - min_lat))
        };
        let zoom = match (width_zoom, height_zoom) {
            (Some(w), Some(h)) => w.min(h),
            (Some(w), None) => w,
            (None, Some(h)) => h,
            (None, None) => 0.0,
        };

        Self {
            padding,
            min_lng,
            max_lat,
            zoom,
        }
    }

    pub fn project(&self, coords: Coordinates) -> Point {
        Point {
            x: (coords.lng - self.min_lng) * self.zoom + self.padding,
            y: (self.max_lat - coords.lat) * self.zoom + self.padding,
        }
    }
}

/// Draws the network. Layer order: route lines, route name labels, stop
/// circles, stop name labels. Only stops served by at least one bus appear;
/// stops and buses are drawn in lexicographic name order.
pub fn render(catalogue: &TransportCatalogue, settings: &RenderSettings) -> svg::Document {
    let mut served_stops: Vec<Stop> = catalogue
        .stops()
        .filter(|stop| !catalogue.buses_through(*stop).is_empty())
        .collect();
    served_stops.sort_by(|a, b| catalogue.stop(*a).name.cmp(&catalogue.stop(*b).name));

    let projector = SphereProjector::new(
        served_stops
            .iter()
            .map(|stop| catalogue.stop(*stop).coordinates),
        settings.width,
        settings.height,
        settings.padding,
    );

    let mut buses: Vec<Bus> = catalogue.buses().collect();
    buses.sort_by(|a, b| catalogue.bus(*a).name.cmp(&catalogue.bus(*b).name));

    let palette_color = |index: usize| -> Color {
        if settings.color_palette.is_empty() {
            Color::Named("black".to_string())
        } else {
            settings.color_palette[index % settings.color_palette.len()].clone()
        }
    };

    let mut doc = svg::Document::new();

    for (index, &bus) in buses.iter().enumerate() {
        doc.add(route_line(catalogue, bus, &projector, settings, palette_color(index)));
    }
    for (index, &bus) in buses.iter().enumerate() {
        route_labels(
            &mut doc,
            catalogue,
            bus,
            &projector,
            settings,
            palette_color(index),
        );
    }
    for &stop in &served_stops {
        doc.add(
            svg::Circle::new(
                projector.project(catalogue.stop(stop).coordinates),
                settings.stop_radius,
            )
            .fill(Color::Named("white".to_string())),
        );
    }
    for &stop in &served_stops {
        stop_label(&mut doc, catalogue, stop, &projector, settings);
    }

    doc
}

fn route_line(
    catalogue: &TransportCatalogue,
    bus: Bus,
    projector: &SphereProjector,
    settings: &RenderSettings,
    color: Color,
) -> svg::Polyline {
    let data = catalogue.bus(bus);
    let mut polyline = svg::Polyline::new()
        .stroke(color)
        .fill(Color::none())
        .stroke_width(settings.line_width)
        .stroke_line_cap(StrokeLineCap::Round)
        .stroke_line_join(StrokeLineJoin::Round);
    for position in 0..data.stop_count() {
        let stop = data.stop_at(position);
        polyline = polyline.point(projector.project(catalogue.stop(stop).coordinates));
    }
    polyline
}

/// A route name is drawn at each terminal: the first stop, and for a linear
/// route with distinct ends also the last one.
fn route_labels(
    doc: &mut svg::Document,
    catalogue: &TransportCatalogue,
    bus: Bus,
    projector: &SphereProjector,
    settings: &RenderSettings,
    color: Color,
) {
    let data = catalogue.bus(bus);
    let first = data.stops[0];
    name_label(
        doc,
        &data.name,
        projector.project(catalogue.stop(first).coordinates),
        settings.bus_label_offset,
        settings.bus_label_font_size,
        true,
        settings,
        color.clone(),
    );
    let last = data.stops[data.stops.len() - 1];
    if data.kind == RouteKind::Linear && data.stops.len() > 1 && first != last {
        name_label(
            doc,
            &data.name,
            projector.project(catalogue.stop(last).coordinates),
            settings.bus_label_offset,
            settings.bus_label_font_size,
            true,
            settings,
            color,
        );
    }
}

fn stop_label(
    doc: &mut svg::Document,
    catalogue: &TransportCatalogue,
    stop: Stop,
    projector: &SphereProjector,
    settings: &RenderSettings,
) {
    let data = catalogue.stop(stop);
    name_label(
        doc,
        &data.name,
        projector.project(data.coordinates),
        settings.stop_label_offset,
        settings.stop_label_font_size,
        false,
        settings,
        Color::Named("black".to_string()),
    );
}

#[allow(clippy::too_many_arguments)]
fn name_label(
    doc: &mut svg::Document,
    name: &str,
    position: Point,
    offset: [f64; 2],
    font_size: u32,
    bold: bool,
    settings: &RenderSettings,
    color: Color,
) {
    let mut base = svg::Text::new()
        .position(position)
        .offset(Point {
            x: offset[0],
            y: offset[1],
        })
        .font_size(font_size)
        .font_family("Verdana")
        .data(name);
    if bold {
        base = base.font_weight("bold");
    }

    doc.add(
        base.clone()
            .fill(settings.underlayer_color.clone())
            .stroke(settings.underlayer_color.clone())
            .stroke_width(settings.underlayer_width)
            .stroke_line_cap(StrokeLineCap::Round)
            .stroke_line_join(StrokeLineJoin::Round),
    );
    doc.add(base.fill(color));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::RouteKind;

    #[test]
    fn projector_maps_extremes_to_the_padded_frame() {
        let points = vec![Coordinates::new(10.0, 20.0), Coordinates::new(20.0, 40.0)];
        let projector = SphereProjector::new(points, 600.0, 400.0, 50.0);
        // zoom = min((600-100)/20, (400-100)/10) = 25
        let top_right = projector.project(Coordinates::new(20.0, 40.0));
        assert!((top_right.x - 550.0).abs() < 1e-9);
        assert!((top_right.y - 50.0).abs() < 1e-9);
        let bottom_left = projector.project(Coordinates::new(10.0, 20.0));
        assert!((bottom_left.x - 50.0).abs() < 1e-9);
        assert!((bottom_left.y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn projector_survives_degenerate_extents() {
        let single = SphereProjector::new(
            vec![Coordinates::new(10.0, 20.0)],
            600.0,
            400.0,
            50.0,
        );
        let point = single.project(Coordinates::new(10.0, 20.0));
        assert_eq!((point.x, point.y), (50.0, 50.0));

        let empty = SphereProjector::new(std::iter::empty(), 600.0, 400.0, 50.0);
        let origin = empty.project(Coordinates::new(0.0, 0.0));
        assert_eq!((origin.x, origin.y), (50.0, 50.0));
    }

    #[test]
    fn rendered_map_layers_routes_and_stops() {
        let mut catalogue = TransportCatalogue::new();
        let a = catalogue
            .add_stop("Alpha", Coordinates::new(43.587795, 39.716901))
            .unwrap();
        let b = catalogue
            .add_stop("Beta", Coordinates::new(43.598701, 39.730623))
            .unwrap();
        catalogue
            .add_stop("Unserved", Coordinates::new(43.6, 39.74))
            .unwrap();
        catalogue.add_bus("114", vec![a, b], RouteKind::Linear).unwrap();

        let rendered = render(&catalogue, &RenderSettings::default()).to_string();
        assert!(rendered.contains("<polyline"));
        assert!(rendered.contains(">114</text>"));
        assert!(rendered.contains(">Alpha</text>"));
        assert!(!rendered.contains("Unserved"));
        // lines come before circles, circles before stop labels
        let polyline_at = rendered.find("<polyline").unwrap();
        let circle_at = rendered.find("<circle").unwrap();
        assert!(polyline_at < circle_at);
    }
}
