//! SVG import into a [`Shape`] tree.
//!
//! Only geometry and the basic presentation attributes are read; there is
//! no CSS, no `transform` and no gradients. Elliptical arcs in path data are
//! replaced by a straight segment to their end point.
//!
//! Every drawable element carries its own style: a missing `fill` or
//! `stroke` means none and a missing `stroke-width` means 1. Group
//! attributes are not inherited. `circle` and `ellipse` use `r`, `rx` and
//! `ry` as the full width and height around the center.

use crate::builder::{EndMode, ShapeBuilder};
use crate::color::Color;
use crate::errors::EaselError;
use crate::mode::AngleMode;
use crate::painter::{LineCap, LineJoin, ShapeType};
use crate::shape::{Shape, ShapeKind, ShapeStyle};
use regex::Regex;
use roxmltree::{Document, Node};
use std::path::Path;

pub fn load(path: &Path, angle_mode: AngleMode) -> Result<Shape, EaselError> {
    let text = std::fs::read_to_string(path)
        .map_err(|err| EaselError::Svg(format!("Error loading {:?}: {}", path, err)))?;
    let shape = parse(&text, angle_mode)?;
    log::debug!("loaded svg {:?} ({} top-level shapes)", path, shape.get_child_count());
    Ok(shape)
}

pub fn parse(text: &str, angle_mode: AngleMode) -> Result<Shape, EaselError> {
    let doc = Document::parse(text).map_err(|err| EaselError::Svg(err.to_string()))?;
    let loader = Loader::new(angle_mode)?;
    loader.group(doc.root_element())
}

struct Loader {
    angle_mode: AngleMode,
    number: Regex,
    separator: Regex,
}

impl Loader {
    fn new(angle_mode: AngleMode) -> Result<Loader, EaselError> {
        Ok(Loader {
            angle_mode,
            number: Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?")?,
            separator: Regex::new(r"^\s*,?\s*")?,
        })
    }

    fn group(&self, node: Node) -> Result<Shape, EaselError> {
        let mut group = Shape::primitive(ShapeKind::Group, self.angle_mode);
        for child in node.children().filter(Node::is_element) {
            let shape = match child.tag_name().name() {
                "g" | "a" => Some(self.group(child)?),
                "line" => Some(Shape::primitive(
                    ShapeKind::Line(
                        float(child, "x1"),
                        float(child, "y1"),
                        float(child, "x2"),
                        float(child, "y2"),
                    ),
                    self.angle_mode,
                )),
                "rect" => Some(Shape::primitive(
                    ShapeKind::Rect(
                        float(child, "x"),
                        float(child, "y"),
                        float(child, "width"),
                        float(child, "height"),
                    ),
                    self.angle_mode,
                )),
                "circle" => {
                    let r = float(child, "r");
                    Some(self.ellipse(float(child, "cx"), float(child, "cy"), r, r))
                }
                "ellipse" => Some(self.ellipse(
                    float(child, "cx"),
                    float(child, "cy"),
                    float(child, "rx"),
                    float(child, "ry"),
                )),
                "polyline" => Some(self.polyline(child, false)?),
                "polygon" => Some(self.polyline(child, true)?),
                "path" => {
                    for shape in self.path(child)? {
                        group.add_child(self.styled(shape, child)?, None);
                    }
                    None
                }
                _ => None,
            };
            if let Some(shape) = shape {
                group.add_child(self.styled(shape, child)?, None);
            }
        }
        Ok(group)
    }

    fn ellipse(&self, cx: f32, cy: f32, w: f32, h: f32) -> Shape {
        Shape::primitive(
            ShapeKind::Ellipse(cx - w / 2.0, cy - h / 2.0, w, h),
            self.angle_mode,
        )
    }

    fn styled(&self, mut shape: Shape, node: Node) -> Result<Shape, EaselError> {
        let mut style = ShapeStyle {
            fill: Some(None),
            stroke: Some(None),
            stroke_width: Some(1.0),
            ..shape.style().clone()
        };
        if let Some(fill) = node.attribute("fill") {
            style.fill = Some(parse_color(fill)?);
        }
        if let Some(stroke) = node.attribute("stroke") {
            style.stroke = Some(parse_color(stroke)?);
        }
        if let Some(width) = node.attribute("stroke-width") {
            style.stroke_width = Some(self.numbers(width)?.first().copied().unwrap_or(1.0));
        }
        if let Some(cap) = node.attribute("stroke-linecap") {
            style.line_cap = Some(match cap.trim() {
                "butt" => LineCap::Butt,
                "round" => LineCap::Round,
                "square" => LineCap::Square,
                other => return Err(EaselError::Svg(format!("invalid stroke-linecap '{}'", other))),
            });
        }
        if let Some(join) = node.attribute("stroke-linejoin") {
            style.line_join = Some(match join.trim() {
                "miter" => LineJoin::Miter,
                "round" => LineJoin::Round,
                "bevel" => LineJoin::Bevel,
                other => return Err(EaselError::Svg(format!("invalid stroke-linejoin '{}'", other))),
            });
        }
        shape.set_style(style);
        Ok(shape)
    }

    fn builder(&self) -> ShapeBuilder {
        ShapeBuilder::new(ShapeType::Polygon).angle_mode(self.angle_mode)
    }

    fn polyline(&self, node: Node, close: bool) -> Result<Shape, EaselError> {
        let points = node
            .attribute("points")
            .ok_or_else(|| EaselError::Svg(String::from("missing 'points'")))?;
        let numbers = self.numbers(points)?;
        if numbers.len() % 2 != 0 {
            return Err(EaselError::Svg(String::from("odd number of coordinates in 'points'")));
        }
        let mut builder = self.builder();
        for pair in numbers.chunks(2) {
            builder.vertex(pair[0], pair[1]);
        }
        Ok(builder.end(if close { EndMode::Close } else { EndMode::Open }))
    }

    fn numbers(&self, text: &str) -> Result<Vec<f32>, EaselError> {
        let mut scanner = Scanner::new(self, text);
        let mut numbers = Vec::new();
        while !scanner.is_empty() {
            numbers.push(scanner.number()?);
        }
        Ok(numbers)
    }

    /// One shape per subpath.
    fn path(&self, node: Node) -> Result<Vec<Shape>, EaselError> {
        let data = node
            .attribute("d")
            .ok_or_else(|| EaselError::Svg(String::from("missing 'd'")))?;
        let mut scanner = Scanner::new(self, data);
        let mut shapes = Vec::new();
        let mut current: Option<(ShapeBuilder, bool)> = None;
        let mut last_command: Option<char> = None;
        let (mut x, mut y) = (0.0f32, 0.0f32);
        let (mut cx, mut cy) = (0.0f32, 0.0f32);
        let mut first = (0.0f32, 0.0f32);

        while !scanner.is_empty() {
            let explicit = scanner.command();
            let command = match explicit.or(last_command) {
                Some(command) => command,
                None => return Err(EaselError::Svg(String::from("invalid path"))),
            };
            if explicit.is_some() && matches!(command, 'M' | 'm') {
                if let Some((builder, closed)) = current.take() {
                    shapes.push(finish(builder, closed));
                }
                current = Some((self.builder(), false));
            }
            let (builder, closed) = current
                .as_mut()
                .ok_or_else(|| EaselError::Svg(String::from("no leading 'M' or 'm'")))?;
            let relative = command.is_ascii_lowercase();
            let (bx, by) = if relative { (x, y) } else { (0.0, 0.0) };
            match command {
                'M' | 'm' => {
                    let (px, py) = scanner.pair()?;
                    x = bx + px;
                    y = by + py;
                    if explicit.is_some() {
                        first = (x, y);
                    }
                    builder.vertex(x, y);
                }
                'L' | 'l' => {
                    let (px, py) = scanner.pair()?;
                    x = bx + px;
                    y = by + py;
                    builder.vertex(x, y);
                }
                'H' | 'h' => {
                    x = bx + scanner.number()?;
                    builder.vertex(x, y);
                }
                'V' | 'v' => {
                    y = by + scanner.number()?;
                    builder.vertex(x, y);
                }
                'Q' | 'q' => {
                    let (qx, qy) = scanner.pair()?;
                    let (px, py) = scanner.pair()?;
                    cx = bx + qx;
                    cy = by + qy;
                    x = bx + px;
                    y = by + py;
                    builder.quadratic_vertex(cx, cy, x, y)?;
                }
                'T' | 't' => {
                    if matches!(last_command, Some('Q' | 'q' | 'T' | 't')) {
                        cx = x + (x - cx);
                        cy = y + (y - cy);
                    } else {
                        cx = x;
                        cy = y;
                    }
                    let (px, py) = scanner.pair()?;
                    x = bx + px;
                    y = by + py;
                    builder.quadratic_vertex(cx, cy, x, y)?;
                }
                'C' | 'c' => {
                    let (ax, ay) = scanner.pair()?;
                    let (qx, qy) = scanner.pair()?;
                    let (px, py) = scanner.pair()?;
                    cx = bx + qx;
                    cy = by + qy;
                    x = bx + px;
                    y = by + py;
                    builder.bezier_vertex(bx + ax, by + ay, cx, cy, x, y)?;
                }
                'S' | 's' => {
                    let (ax, ay) = if matches!(last_command, Some('C' | 'c' | 'S' | 's')) {
                        (x + (x - cx), y + (y - cy))
                    } else {
                        (x, y)
                    };
                    let (qx, qy) = scanner.pair()?;
                    let (px, py) = scanner.pair()?;
                    cx = bx + qx;
                    cy = by + qy;
                    x = bx + px;
                    y = by + py;
                    builder.bezier_vertex(ax, ay, cx, cy, x, y)?;
                }
                'A' | 'a' => {
                    // radii, rotation and both flags are read but not used
                    scanner.pair()?;
                    scanner.number()?;
                    scanner.number()?;
                    scanner.number()?;
                    let (px, py) = scanner.pair()?;
                    x = bx + px;
                    y = by + py;
                    builder.vertex(x, y);
                }
                'Z' | 'z' => {
                    x = first.0;
                    y = first.1;
                    *closed = true;
                }
                other => return Err(EaselError::Svg(format!("unknown path command '{}'", other))),
            }
            // after a moveto, bare coordinates continue as lineto
            last_command = Some(match command {
                'M' => 'L',
                'm' => 'l',
                other => other,
            });
            if matches!(command, 'Z' | 'z') && !scanner.is_empty() && !scanner.peek_command() {
                return Err(EaselError::Svg(String::from("invalid path")));
            }
        }
        if let Some((builder, closed)) = current {
            shapes.push(finish(builder, closed));
        }
        Ok(shapes)
    }
}

fn finish(builder: ShapeBuilder, closed: bool) -> Shape {
    builder.end(if closed { EndMode::Close } else { EndMode::Open })
}

fn float(node: Node, name: &str) -> f32 {
    node.attribute(name)
        .and_then(|value| value.trim().trim_end_matches("px").parse().ok())
        .unwrap_or(0.0)
}

struct Scanner<'a> {
    loader: &'a Loader,
    text: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(loader: &'a Loader, text: &'a str) -> Scanner<'a> {
        let mut scanner = Scanner {
            loader,
            text,
            pos: 0,
        };
        scanner.skip_separator();
        scanner
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn is_empty(&self) -> bool {
        self.rest().is_empty()
    }

    fn skip_separator(&mut self) {
        if let Some(m) = self.loader.separator.find(self.rest()) {
            self.pos += m.end();
        }
    }

    fn peek_command(&self) -> bool {
        self.rest().starts_with(|c: char| c.is_ascii_alphabetic())
    }

    fn command(&mut self) -> Option<char> {
        let c = self.rest().chars().next().filter(char::is_ascii_alphabetic)?;
        self.pos += c.len_utf8();
        self.skip_separator();
        Some(c)
    }

    fn number(&mut self) -> Result<f32, EaselError> {
        let m = self
            .loader
            .number
            .find(self.rest())
            .ok_or_else(|| EaselError::Svg(format!("invalid number at '{}'", self.rest())))?;
        let value = m
            .as_str()
            .parse::<f32>()
            .map_err(|err| EaselError::Svg(err.to_string()))?;
        self.pos += m.end();
        self.skip_separator();
        Ok(value)
    }

    fn pair(&mut self) -> Result<(f32, f32), EaselError> {
        Ok((self.number()?, self.number()?))
    }
}

const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("black", [0, 0, 0]),
    ("white", [255, 255, 255]),
    ("red", [255, 0, 0]),
    ("lime", [0, 255, 0]),
    ("green", [0, 128, 0]),
    ("blue", [0, 0, 255]),
    ("yellow", [255, 255, 0]),
    ("cyan", [0, 255, 255]),
    ("aqua", [0, 255, 255]),
    ("magenta", [255, 0, 255]),
    ("fuchsia", [255, 0, 255]),
    ("gray", [128, 128, 128]),
    ("grey", [128, 128, 128]),
    ("silver", [192, 192, 192]),
    ("maroon", [128, 0, 0]),
    ("olive", [128, 128, 0]),
    ("navy", [0, 0, 128]),
    ("purple", [128, 0, 128]),
    ("teal", [0, 128, 128]),
    ("orange", [255, 165, 0]),
];

/// `None` for `none`/`transparent`, otherwise a hex or named color.
pub fn parse_color(value: &str) -> Result<Option<Color>, EaselError> {
    let value = value.trim().to_ascii_lowercase();
    if value == "none" || value == "transparent" {
        return Ok(None);
    }
    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex).map(Some);
    }
    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == value)
        .map(|(_, [r, g, b])| Some(Color::rgba_i(*r, *g, *b, 255)))
        .ok_or_else(|| EaselError::Svg(format!("unknown color '{}'", value)))
}

fn parse_hex(hex: &str) -> Result<Color, EaselError> {
    let invalid = || EaselError::Svg(format!("invalid color '#{}'", hex));
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let digits: Vec<u8> = match hex.len() {
        3 | 4 => hex
            .chars()
            .map(|c| c.to_digit(16).map(|d| (d * 17) as u8))
            .collect::<Option<_>>()
            .ok_or_else(invalid)?,
        6 | 8 => (0..hex.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).ok())
            .collect::<Option<_>>()
            .ok_or_else(invalid)?,
        _ => return Err(invalid()),
    };
    let alpha = digits.get(3).copied().unwrap_or(255);
    Ok(Color::rgba_i(digits[0], digits[1], digits[2], alpha))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn svg(body: &str) -> String {
        format!(r#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100">{}</svg>"#, body)
    }

    fn first_child(doc: &str) -> Shape {
        let shape = parse(&svg(doc), AngleMode::Radians).unwrap();
        shape.get_child(0).cloned().expect("no child")
    }

    fn vertices(shape: &Shape) -> Vec<(f32, f32)> {
        (0..shape.get_vertex_count())
            .filter_map(|i| shape.get_vertex(i))
            .map(|v| (v.x, v.y))
            .collect()
    }

    #[test]
    fn basic_elements() {
        let shape = parse(
            &svg(r#"<line x1="0" y1="0" x2="10" y2="5"/><rect x="1" y="2" width="3" height="4"/>
                   <circle cx="10" cy="10" r="5"/><g><ellipse cx="0" cy="0" rx="4" ry="2"/></g>"#),
            AngleMode::Radians,
        )
        .unwrap();
        assert_eq!(shape.get_child_count(), 4);
        assert_eq!(shape.get_child(1).unwrap().width(), 3.0);
        let group = shape.get_child(3).unwrap();
        assert!(group.is_group());
        assert!((group.width() - 4.0).abs() < 1e-3);
    }

    #[test]
    fn circle_radius_is_its_width() {
        let circle = first_child(r#"<circle cx="10" cy="20" r="6"/>"#);
        let bounds = circle.bounds().unwrap();
        assert!((bounds.min.x - 7.0).abs() < 1e-3 && (bounds.min.y - 17.0).abs() < 1e-3);
        assert!((circle.width() - 6.0).abs() < 1e-3);
        assert!((circle.height() - 6.0).abs() < 1e-3);
    }

    #[test]
    fn unset_paint_is_none_and_not_inherited() {
        let shape = parse(
            &svg(r#"<g fill="red" stroke="blue" stroke-width="4"><rect width="1" height="1"/></g>
                   <rect width="1" height="1" fill="red"/>"#),
            AngleMode::Radians,
        )
        .unwrap();
        assert_eq!(shape.style().fill, None);
        assert_eq!(shape.style().stroke, None);

        let inner = shape.get_child(0).and_then(|g| g.get_child(0)).unwrap();
        assert_eq!(inner.style().fill, Some(None));
        assert_eq!(inner.style().stroke, Some(None));
        assert_eq!(inner.style().stroke_width, Some(1.0));

        let rect = shape.get_child(1).unwrap();
        assert_eq!(rect.style().fill, Some(Some(Color::rgba_i(255, 0, 0, 255))));
        assert_eq!(rect.style().stroke, Some(None));
    }

    #[test]
    fn presentation_attributes() {
        let rect = first_child(
            r##"<rect width="1" height="1" fill="none" stroke="#0f08" stroke-width="3"
                 stroke-linecap="square" stroke-linejoin="bevel"/>"##,
        );
        let style = rect.style();
        assert_eq!(style.fill, Some(None));
        assert_eq!(style.stroke, Some(Some(Color::rgba_i(0, 255, 0, 136))));
        assert_eq!(style.stroke_width, Some(3.0));
        assert_eq!(style.line_cap, Some(LineCap::Square));
        assert_eq!(style.line_join, Some(LineJoin::Bevel));
        assert!(parse(&svg(r##"<rect fill="#12"/>"##), AngleMode::Radians).is_err());
        assert!(parse(&svg(r#"<rect fill="chartreuse-ish"/>"#), AngleMode::Radians).is_err());
    }

    #[test]
    fn polyline_and_polygon() {
        let line = first_child(r#"<polyline points="0,0 10,0 10,10"/>"#);
        assert_eq!(vertices(&line), vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        assert!(!line.polygon().unwrap().contours[0].closed);
        let gon = first_child(r#"<polygon points="0 0 10 0 10 10"/>"#);
        assert!(gon.polygon().unwrap().contours[0].closed);
        assert!(parse(&svg(r#"<polygon points="0 0 10"/>"#), AngleMode::Radians).is_err());
        assert!(parse(&svg(r#"<polygon/>"#), AngleMode::Radians).is_err());
    }

    #[test]
    fn path_lines_relative_and_implicit() {
        let path = first_child(r#"<path d="M10 10 h 5 v5 l-5,0 20 0 Z"/>"#);
        assert_eq!(
            vertices(&path),
            vec![(10.0, 10.0), (15.0, 10.0), (15.0, 15.0), (10.0, 15.0), (30.0, 15.0)]
        );
        assert!(path.polygon().unwrap().contours[0].closed);
    }

    #[test]
    fn implicit_lineto_after_moveto() {
        let path = first_child(r#"<path d="m1 1 2 0 0 2"/>"#);
        assert_eq!(vertices(&path), vec![(1.0, 1.0), (3.0, 1.0), (3.0, 3.0)]);
    }

    #[test]
    fn subpaths_become_separate_shapes() {
        let shape = parse(&svg(r#"<path d="M0 0 L1 0 M5 5 L6 5"/>"#), AngleMode::Radians).unwrap();
        assert_eq!(shape.get_child_count(), 2);
    }

    #[test]
    fn curves_end_at_their_end_points() {
        let path = first_child(r#"<path d="M0 0 C0 10 10 10 10 0 S20 -10 20 0 Q25 5 30 0 T40 0"/>"#);
        let points = vertices(&path);
        assert_eq!(points.first(), Some(&(0.0, 0.0)));
        let last = points.last().unwrap();
        assert!((last.0 - 40.0).abs() < 1e-3 && last.1.abs() < 1e-3);
        assert!(points.iter().any(|p| (p.0 - 20.0).abs() < 1e-3 && p.1.abs() < 1e-3));
    }

    #[test]
    fn arcs_flatten_to_end_point() {
        let path = first_child(r#"<path d="M0 0 A5 5 0 0 1 10 0 a5,5,0,0,1,10,0"/>"#);
        assert_eq!(vertices(&path), vec![(0.0, 0.0), (10.0, 0.0), (20.0, 0.0)]);
    }

    #[test]
    fn malformed_paths() {
        for d in ["L0 0", "M0 0 L1", "M0 0 X1 1", "M0 0 Lfoo"] {
            let doc = svg(&format!(r#"<path d="{}"/>"#, d));
            assert!(
                matches!(parse(&doc, AngleMode::Radians), Err(EaselError::Svg(_))),
                "accepted {}",
                d
            );
        }
        assert!(parse("<svg", AngleMode::Radians).is_err());
    }

    #[test]
    fn hex_forms() {
        assert_eq!(parse_color("#fff").unwrap(), Some(Color::WHITE));
        assert_eq!(parse_color("#000000").unwrap(), Some(Color::BLACK));
        assert_eq!(parse_color("#ff000080").unwrap(), Some(Color::rgba_i(255, 0, 0, 128)));
        assert_eq!(parse_color("none").unwrap(), None);
        assert!(parse_color("#ggg").is_err());
    }
}
