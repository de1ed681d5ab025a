//! Minimal SVG document model used by the map renderer.
//!
//! Shapes are plain builder-style structs; the whole document renders
//! through [`std::fmt::Display`].

use std::fmt::{self, Display, Formatter};

use serde::Deserialize;

/// Colour of a stroke or fill. The serde representation matches the JSON
/// spellings `"red"`, `[255, 160, 0]` and `[255, 200, 23, 0.85]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Color {
    Named(String),
    Rgb(u8, u8, u8),
    Rgba(u8, u8, u8, f64),
}

impl Color {
    pub fn none() -> Self {
        Color::Named("none".to_string())
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Color::Named(name) => f.write_str(name),
            Color::Rgb(r, g, b) => write!(f, "rgb({},{},{})", r, g, b),
            Color::Rgba(r, g, b, opacity) => write!(f, "rgba({},{},{},{})", r, g, b, opacity),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrokeLineCap {
    Butt,
    Round,
    Square,
}

impl Display for StrokeLineCap {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StrokeLineCap::Butt => "butt",
            StrokeLineCap::Round => "round",
            StrokeLineCap::Square => "square",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrokeLineJoin {
    Arcs,
    Bevel,
    Miter,
    MiterClip,
    Round,
}

impl Display for StrokeLineJoin {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StrokeLineJoin::Arcs => "arcs",
            StrokeLineJoin::Bevel => "bevel",
            StrokeLineJoin::Miter => "miter",
            StrokeLineJoin::MiterClip => "miter-clip",
            StrokeLineJoin::Round => "round",
        })
    }
}

/// Stroke and fill attributes shared by all shapes; absent attributes are
/// omitted from the output.
#[derive(Debug, Clone, Default)]
struct PathProps {
    fill: Option<Color>,
    stroke: Option<Color>,
    stroke_width: Option<f64>,
    stroke_line_cap: Option<StrokeLineCap>,
    stroke_line_join: Option<StrokeLineJoin>,
}

impl Display for PathProps {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(fill) = &self.fill {
            write!(f, r#" fill="{}""#, fill)?;
        }
        if let Some(stroke) = &self.stroke {
            write!(f, r#" stroke="{}""#, stroke)?;
        }
        if let Some(width) = self.stroke_width {
            write!(f, r#" stroke-width="{}""#, width)?;
        }
        if let Some(cap) = self.stroke_line_cap {
            write!(f, r#" stroke-linecap="{}""#, cap)?;
        }
        if let Some(join) = self.stroke_line_join {
            write!(f, r#" stroke-linejoin="{}""#, join)?;
        }
        Ok(())
    }
}

macro_rules! impl_path_props {
    ($shape:ident) => {
        impl $shape {
            pub fn fill(mut self, color: Color) -> Self {
                self.props.fill = Some(color);
                self
            }

            pub fn stroke(mut self, color: Color) -> Self {
                self.props.stroke = Some(color);
                self
            }

            pub fn stroke_width(mut self, width: f64) -> Self {
                self.props.stroke_width = Some(width);
                self
            }

            pub fn stroke_line_cap(mut self, cap: StrokeLineCap) -> Self {
                self.props.stroke_line_cap = Some(cap);
                self
            }

            pub fn stroke_line_join(mut self, join: StrokeLineJoin) -> Self {
                self.props.stroke_line_join = Some(join);
                self
            }
        }
    };
}

#[derive(Debug, Clone, Default)]
pub struct Circle {
    center: Point,
    radius: f64,
    props: PathProps,
}

impl Circle {
    pub fn new(center: Point, radius: f64) -> Self {
        Self {
            center,
            radius,
            props: PathProps::default(),
        }
    }
}

impl_path_props!(Circle);

impl Display for Circle {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            r#"<circle cx="{}" cy="{}" r="{}"{}/>"#,
            self.center.x, self.center.y, self.radius, self.props
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct Polyline {
    points: Vec<Point>,
    props: PathProps,
}

impl Polyline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn point(mut self, point: Point) -> Self {
        self.points.push(point);
        self
    }
}

impl_path_props!(Polyline);

impl Display for Polyline {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("<polyline points=\"")?;
        for (i, point) in self.points.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{},{}", point.x, point.y)?;
        }
        write!(f, "\"{}/>", self.props)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Text {
    position: Point,
    offset: Point,
    font_size: u32,
    font_family: Option<String>,
    font_weight: Option<String>,
    data: String,
    props: PathProps,
}

impl Text {
    pub fn new() -> Self {
        Self {
            font_size: 1,
            ..Self::default()
        }
    }

    pub fn position(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    pub fn offset(mut self, offset: Point) -> Self {
        self.offset = offset;
        self
    }

    pub fn font_size(mut self, size: u32) -> Self {
        self.font_size = size;
        self
    }

    pub fn font_family(mut self, family: &str) -> Self {
        self.font_family = Some(family.to_string());
        self
    }

    pub fn font_weight(mut self, weight: &str) -> Self {
        self.font_weight = Some(weight.to_string());
        self
    }

    pub fn data(mut self, data: &str) -> Self {
        self.data = data.to_string();
        self
    }
}

impl_path_props!(Text);

impl Display for Text {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            r#"<text{} x="{}" y="{}" dx="{}" dy="{}" font-size="{}""#,
            self.props, self.position.x, self.position.y, self.offset.x, self.offset.y,
            self.font_size
        )?;
        if let Some(family) = &self.font_family {
            write!(f, r#" font-family="{}""#, family)?;
        }
        if let Some(weight) = &self.font_weight {
            write!(f, r#" font-weight="{}""#, weight)?;
        }
        f.write_str(">")?;
        escape(&self.data, f)?;
        f.write_str("</text>")
    }
}

fn escape(data: &str, f: &mut Formatter<'_>) -> fmt::Result {
    for c in data.chars() {
        match c {
            '&' => f.write_str("&amp;")?,
            '<' => f.write_str("&lt;")?,
            '>' => f.write_str("&gt;")?,
            '"' => f.write_str("&quot;")?,
            '\'' => f.write_str("&apos;")?,
            _ => write!(f, "{}", c)?,
        }
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub enum Object {
    Circle(Circle),
    Polyline(Polyline),
    Text(Text),
}

impl Display for Object {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Object::Circle(circle) => circle.fmt(f),
            Object::Polyline(polyline) => polyline.fmt(f),
            Object::Text(text) => text.fmt(f),
        }
    }
}

impl From<Circle> for Object {
    fn from(circle: Circle) -> Self {
        Object::Circle(circle)
    }
}

impl From<Polyline> for Object {
    fn from(polyline: Polyline) -> Self {
        Object::Polyline(polyline)
    }
}

impl From<Text> for Object {
    fn from(text: Text) -> Self {
        Object::Text(text)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Document {
    objects: Vec<Object>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, object: impl Into<Object>) {
        self.objects.push(object.into());
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, r#"<?xml version="1.0" encoding="UTF-8" ?>"#)?;
        writeln!(f, r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1">"#)?;
        for object in &self.objects {
            writeln!(f, "  {}", object)?;
        }
        writeln!(f, "</svg>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_render_in_svg_notation() {
        assert_eq!(Color::Named("red".to_string()).to_string(), "red");
        assert_eq!(Color::Rgb(255, 16, 12).to_string(), "rgb(255,16,12)");
        assert_eq!(
            Color::Rgba(255, 200, 23, 0.85).to_string(),
            "rgba(255,200,23,0.85)"
        );
    }

    #[test]
    fn color_accepts_all_json_spellings() {
        let named: Color = serde_json::from_str(r#""green""#).unwrap();
        assert_eq!(named, Color::Named("green".to_string()));
        let rgb: Color = serde_json::from_str("[255, 160, 0]").unwrap();
        assert_eq!(rgb, Color::Rgb(255, 160, 0));
        let rgba: Color = serde_json::from_str("[255, 200, 23, 0.85]").unwrap();
        assert_eq!(rgba, Color::Rgba(255, 200, 23, 0.85));
    }

    #[test]
    fn text_data_is_escaped() {
        let text = Text::new().font_size(10).data("M&M's <deli>");
        assert!(text
            .to_string()
            .contains("M&amp;M&apos;s &lt;deli&gt;"));
    }

    #[test]
    fn document_layout() {
        let mut doc = Document::new();
        doc.add(Circle::new(Point { x: 20.0, y: 20.0 }, 10.0).fill(Color::Named(
            "white".to_string(),
        )));
        let rendered = doc.to_string();
        assert!(rendered.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n"));
        assert!(rendered.contains(r#"  <circle cx="20" cy="20" r="10" fill="white"/>"#));
        assert!(rendered.ends_with("</svg>\n"));
    }
}
