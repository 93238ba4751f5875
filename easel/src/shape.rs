use crate::calc::{arc_points, ellipse_segments};
use crate::color::Color;
use crate::errors::EaselError;
use crate::math::{Bounds, Point, Rect, Transform};
use crate::mode::AngleMode;
use crate::painter::{Contour, LineCap, LineJoin, Paint, Painter, Polygon, ShapeType, Vertex};
use crate::vector::Vector;
use std::cell::OnceCell;

/// Arguments of `create_shape`, one variant per primitive kind.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ShapeKind {
    Line(f32, f32, f32, f32),
    /// Placed through `rect_mode`.
    Rect(f32, f32, f32, f32),
    /// Placed through `ellipse_mode`.
    Ellipse(f32, f32, f32, f32),
    /// Placed through `ellipse_mode`; start and stop in the angle mode.
    Arc(f32, f32, f32, f32, f32, f32),
    Triangle(f32, f32, f32, f32, f32, f32),
    Quad(f32, f32, f32, f32, f32, f32, f32, f32),
    Group,
}

/// Style a shape carries itself, overriding the context's when drawn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeStyle {
    pub fill: Option<Option<Color>>,
    pub stroke: Option<Option<Color>>,
    pub stroke_width: Option<f32>,
    pub line_cap: Option<LineCap>,
    pub line_join: Option<LineJoin>,
}

impl ShapeStyle {
    pub fn is_empty(&self) -> bool {
        *self == ShapeStyle::default()
    }

    fn apply(&self, paint: &mut Paint) {
        if let Some(fill) = self.fill {
            paint.fill = fill;
        }
        if let Some(stroke) = self.stroke {
            paint.stroke = stroke;
        }
        if let Some(width) = self.stroke_width {
            paint.stroke_width = width;
        }
        if let Some(cap) = self.line_cap {
            paint.line_cap = cap;
        }
        if let Some(join) = self.line_join {
            paint.line_join = join;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Geometry {
    Empty,
    Polygon(Polygon),
    Group(Vec<Shape>),
}

/// A built polygon or a group of shapes.
///
/// Geometry is fixed once built except through `set_vertex`/`set_fill`;
/// visibility, the local matrix and the style override stay mutable.
#[derive(Debug, Clone)]
pub struct Shape {
    geometry: Geometry,
    visible: bool,
    matrix: Option<Transform>,
    style: ShapeStyle,
    angle_mode: AngleMode,
    bounds: OnceCell<Option<Bounds>>,
}

impl PartialEq for Shape {
    fn eq(&self, other: &Self) -> bool {
        self.geometry == other.geometry
            && self.visible == other.visible
            && self.matrix == other.matrix
            && self.style == other.style
    }
}

impl Shape {
    fn with_geometry(geometry: Geometry, angle_mode: AngleMode) -> Shape {
        Shape {
            geometry,
            visible: true,
            matrix: None,
            style: ShapeStyle::default(),
            angle_mode,
            bounds: OnceCell::new(),
        }
    }

    pub fn empty(angle_mode: AngleMode) -> Shape {
        Shape::with_geometry(Geometry::Empty, angle_mode)
    }

    pub fn from_polygon(polygon: Polygon, angle_mode: AngleMode) -> Shape {
        Shape::with_geometry(Geometry::Polygon(polygon), angle_mode)
    }

    pub fn group(children: Vec<Shape>, angle_mode: AngleMode) -> Shape {
        Shape::with_geometry(Geometry::Group(children), angle_mode)
    }

    /// Builds a primitive shape. Coordinates are already resolved through
    /// the placement modes; arc angles are degrees, counter-clockwise on
    /// screen.
    pub(crate) fn primitive(kind: ShapeKind, angle_mode: AngleMode) -> Shape {
        let v = |x: f32, y: f32| Vertex::new(x, y, x, y, None);
        let ring = |pts: Vec<Point>, closed: bool| Contour {
            vertices: pts.into_iter().map(|p| v(p.x, p.y)).collect(),
            closed,
            hole: false,
        };
        let polygon = |kind: ShapeType, contour: Contour| Polygon {
            kind,
            contours: vec![contour],
        };
        match kind {
            ShapeKind::Line(x1, y1, x2, y2) => Shape::from_polygon(
                polygon(
                    ShapeType::Lines,
                    ring(vec![Point::new(x1, y1), Point::new(x2, y2)], false),
                ),
                angle_mode,
            ),
            ShapeKind::Rect(x, y, w, h) => Shape::from_polygon(
                polygon(
                    ShapeType::Polygon,
                    ring(Rect::from((x, y, w, h)).corners().to_vec(), true),
                ),
                angle_mode,
            ),
            ShapeKind::Ellipse(x, y, w, h) => {
                let mut pts = arc_points(x, y, w, h, 0.0, 360.0, ellipse_segments(w / 2.0, h / 2.0));
                pts.pop();
                Shape::from_polygon(polygon(ShapeType::Polygon, ring(pts, true)), angle_mode)
            }
            ShapeKind::Arc(x, y, w, h, from, to) => {
                let mut pts = vec![Point::new(x + w / 2.0, y + h / 2.0)];
                pts.extend(arc_points(x, y, w, h, from, to, ellipse_segments(w / 2.0, h / 2.0)));
                Shape::from_polygon(polygon(ShapeType::Polygon, ring(pts, true)), angle_mode)
            }
            ShapeKind::Triangle(x1, y1, x2, y2, x3, y3) => Shape::from_polygon(
                polygon(
                    ShapeType::Polygon,
                    ring(
                        vec![Point::new(x1, y1), Point::new(x2, y2), Point::new(x3, y3)],
                        true,
                    ),
                ),
                angle_mode,
            ),
            ShapeKind::Quad(x1, y1, x2, y2, x3, y3, x4, y4) => Shape::from_polygon(
                polygon(
                    ShapeType::Quads,
                    ring(
                        vec![
                            Point::new(x1, y1),
                            Point::new(x2, y2),
                            Point::new(x3, y3),
                            Point::new(x4, y4),
                        ],
                        true,
                    ),
                ),
                angle_mode,
            ),
            ShapeKind::Group => Shape::group(Vec::new(), angle_mode),
        }
    }

    pub fn polygon(&self) -> Option<&Polygon> {
        match &self.geometry {
            Geometry::Polygon(polygon) => Some(polygon),
            _ => None,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self.geometry, Geometry::Group(_))
    }

    /// Local bounds, ignoring the shape's own matrix.
    pub fn bounds(&self) -> Option<Bounds> {
        *self.bounds.get_or_init(|| match &self.geometry {
            Geometry::Empty => None,
            Geometry::Polygon(polygon) => Bounds::from_points(polygon.points()),
            Geometry::Group(children) => children
                .iter()
                .filter_map(Shape::bounds)
                .fold(None, |acc: Option<Bounds>, b| {
                    Some(acc.map_or(b, |acc| acc.union(b)))
                }),
        })
    }

    pub fn width(&self) -> f32 {
        self.bounds().map_or(0.0, |b| b.width())
    }

    pub fn height(&self) -> f32 {
        self.bounds().map_or(0.0, |b| b.height())
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn style(&self) -> &ShapeStyle {
        &self.style
    }

    pub fn set_style(&mut self, style: ShapeStyle) {
        self.style = style;
    }

    fn outline(&self) -> Option<&Contour> {
        self.polygon().and_then(|p| p.contours.iter().find(|c| !c.hole))
    }

    pub fn get_vertex_count(&self) -> usize {
        self.outline().map_or(0, |c| c.vertices.len())
    }

    pub fn get_vertex(&self, index: usize) -> Option<Vector> {
        let vertex = self.outline()?.vertices.get(index)?;
        Some(Vector::xy(vertex.x, vertex.y).with_angle_mode(self.angle_mode))
    }

    /// Moves an outline vertex. Out-of-range indices are ignored.
    pub fn set_vertex<V: Into<Vector>>(&mut self, index: usize, point: V) {
        let point = point.into();
        let contour = match &mut self.geometry {
            Geometry::Polygon(polygon) => polygon.contours.iter_mut().find(|c| !c.hole),
            _ => None,
        };
        if let Some(vertex) = contour.and_then(|c| c.vertices.get_mut(index)) {
            vertex.x = point.x;
            vertex.y = point.y;
            self.bounds = OnceCell::new();
        }
    }

    /// Recolors every vertex, children included.
    pub fn set_fill(&mut self, color: Color) {
        match &mut self.geometry {
            Geometry::Polygon(polygon) => {
                for vertex in polygon.contours.iter_mut().flat_map(|c| c.vertices.iter_mut()) {
                    vertex.color = Some(color);
                }
            }
            Geometry::Group(children) => {
                for child in children.iter_mut() {
                    child.set_fill(color);
                }
            }
            Geometry::Empty => {}
        }
    }

    /// Inserts at `index`, or appends when `None`. Only groups take children.
    pub fn add_child(&mut self, child: Shape, index: Option<usize>) {
        if let Geometry::Group(children) = &mut self.geometry {
            match index {
                Some(index) if index <= children.len() => children.insert(index, child),
                _ => children.push(child),
            }
            self.bounds = OnceCell::new();
        }
    }

    pub fn get_child(&self, index: usize) -> Option<&Shape> {
        match &self.geometry {
            Geometry::Group(children) => children.get(index),
            _ => None,
        }
    }

    pub fn get_child_mut(&mut self, index: usize) -> Option<&mut Shape> {
        match &mut self.geometry {
            Geometry::Group(children) => children.get_mut(index),
            _ => None,
        }
    }

    pub fn get_child_count(&self) -> usize {
        match &self.geometry {
            Geometry::Group(children) => children.len(),
            _ => 0,
        }
    }

    fn transform(&mut self, xform: Transform) {
        let matrix = self.matrix.unwrap_or_default();
        self.matrix = Some(xform * matrix);
    }

    pub fn translate(&mut self, x: f32, y: f32) {
        self.transform(Transform::translate(x, y));
    }

    /// `angle` is read in the angle mode the shape was created under.
    pub fn rotate(&mut self, angle: f32) {
        self.transform(Transform::rotate(self.angle_mode.to_radians(angle)));
    }

    pub fn scale(&mut self, x: f32, y: Option<f32>) {
        self.transform(Transform::scale(x, y.unwrap_or(x)));
    }

    pub fn reset_matrix(&mut self) {
        self.matrix = None;
    }

    pub fn matrix(&self) -> Transform {
        self.matrix.unwrap_or_default()
    }

    /// Draws with `placement` applied innermost, under each shape's matrix
    /// and then `paint.xform`.
    pub(crate) fn draw<P: Painter>(
        &self,
        painter: &mut P,
        paint: &Paint,
        placement: Transform,
    ) -> Result<(), EaselError> {
        let mut paint = paint.clone();
        if let Some(matrix) = self.matrix {
            paint.xform = matrix * paint.xform;
        }
        self.style.apply(&mut paint);
        match &self.geometry {
            Geometry::Empty => Ok(()),
            Geometry::Polygon(polygon) => {
                let outer = paint.xform;
                paint.xform = placement * outer;
                painter.polygon(&paint, polygon)
            }
            Geometry::Group(children) => children
                .iter()
                .filter(|child| child.visible)
                .try_for_each(|child| child.draw(painter, &paint, placement)),
        }
    }
}
