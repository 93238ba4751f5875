use crate::calc::{bezier_vertices, curve_vertices};
use crate::color::Color;
use crate::config::{BEZIER_DETAIL_DEFAULT, CURVE_DETAIL_DEFAULT};
use crate::errors::EaselError;
use crate::math::Point;
use crate::mode::AngleMode;
use crate::painter::{Contour, Polygon, ShapeType, Vertex};
use crate::shape::Shape;

/// Whether `end_shape` joins the last vertex back to the first.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum EndMode {
    Open,
    Close,
}

/// Accumulates vertices and holes between `begin_shape` and `end_shape`.
#[derive(Debug, Clone)]
pub struct ShapeBuilder {
    kind: ShapeType,
    fill: Option<Color>,
    vertices: Vec<Vertex>,
    curve_points: Vec<Point>,
    contours: Vec<Contour>,
    contour: Option<Vec<Vertex>>,
    curve_detail: usize,
    curve_tightness: f32,
    bezier_detail: usize,
    angle_mode: AngleMode,
}

impl ShapeBuilder {
    pub fn new(kind: ShapeType) -> ShapeBuilder {
        ShapeBuilder {
            kind,
            fill: None,
            vertices: Vec::new(),
            curve_points: Vec::new(),
            contours: Vec::new(),
            contour: None,
            curve_detail: CURVE_DETAIL_DEFAULT,
            curve_tightness: 0.0,
            bezier_detail: BEZIER_DETAIL_DEFAULT,
            angle_mode: AngleMode::default(),
        }
    }

    pub fn curve_detail(mut self, detail: usize, tightness: f32) -> Self {
        self.curve_detail = detail;
        self.curve_tightness = tightness;
        self
    }

    pub fn bezier_detail(mut self, detail: usize) -> Self {
        self.bezier_detail = detail;
        self
    }

    pub fn angle_mode(mut self, mode: AngleMode) -> Self {
        self.angle_mode = mode;
        self
    }

    pub fn kind(&self) -> ShapeType {
        self.kind
    }

    /// Color recorded with the vertices added from now on.
    pub fn fill(&mut self, color: Option<Color>) {
        self.fill = color;
    }

    pub fn vertex(&mut self, x: f32, y: f32) {
        self.vertex_uv(x, y, x, y);
    }

    pub fn vertex_uv(&mut self, x: f32, y: f32, u: f32, v: f32) {
        let vertex = Vertex::new(x, y, u, v, self.fill);
        match self.contour.as_mut() {
            Some(contour) => contour.push(vertex),
            None => self.vertices.push(vertex),
        }
    }

    /// Adds a Catmull-Rom control point. Once four are known, the segment
    /// between the middle two is emitted.
    pub fn curve_vertex(&mut self, x: f32, y: f32) {
        self.curve_points.push(Point::new(x, y));
        let n = self.curve_points.len();
        if n < 4 {
            return;
        }
        let p = [
            self.curve_points[n - 4],
            self.curve_points[n - 3],
            self.curve_points[n - 2],
            self.curve_points[n - 1],
        ];
        let mut points = curve_vertices(self.curve_tightness, p, self.curve_detail);
        if n > 4 {
            points.remove(0);
        }
        for pt in points {
            self.vertex(pt.x, pt.y);
        }
    }

    fn last_point(&self) -> Option<Point> {
        let vertices = self.contour.as_ref().unwrap_or(&self.vertices);
        vertices.last().map(Vertex::point)
    }

    pub fn bezier_vertex(
        &mut self,
        x2: f32,
        y2: f32,
        x3: f32,
        y3: f32,
        x4: f32,
        y4: f32,
    ) -> Result<(), EaselError> {
        let start = self.last_point().ok_or_else(|| {
            EaselError::state("vertex() is required before calling bezier_vertex()")
        })?;
        let p = [start, Point::new(x2, y2), Point::new(x3, y3), Point::new(x4, y4)];
        for pt in bezier_vertices(p, self.bezier_detail).into_iter().skip(1) {
            self.vertex(pt.x, pt.y);
        }
        Ok(())
    }

    /// Raised to a cubic: each control point sits 2/3 of the way from an end
    /// point towards `(cx, cy)`.
    pub fn quadratic_vertex(&mut self, cx: f32, cy: f32, x3: f32, y3: f32) -> Result<(), EaselError> {
        let start = self.last_point().ok_or_else(|| {
            EaselError::state("vertex() is required before calling quadratic_vertex()")
        })?;
        let (x1, y1) = (start.x, start.y);
        self.bezier_vertex(
            x1 + (cx - x1) * 2.0 / 3.0,
            y1 + (cy - y1) * 2.0 / 3.0,
            x3 + (cx - x3) * 2.0 / 3.0,
            y3 + (cy - y3) * 2.0 / 3.0,
            x3,
            y3,
        )
    }

    pub fn begin_contour(&mut self) -> Result<(), EaselError> {
        if self.contour.is_some() {
            return Err(EaselError::state("begin_contour() cannot be called twice"));
        }
        self.contour = Some(Vec::new());
        Ok(())
    }

    pub fn end_contour(&mut self) -> Result<(), EaselError> {
        let vertices = self.contour.take().ok_or_else(|| {
            EaselError::state("end_contour() must be called after begin_contour()")
        })?;
        self.contours.push(Contour {
            vertices,
            closed: true,
            hole: true,
        });
        Ok(())
    }

    /// Finishes the shape. Any contour still open is dropped; holes force
    /// the outline closed.
    pub fn end(mut self, mode: EndMode) -> Shape {
        let closed = mode == EndMode::Close || !self.contours.is_empty();
        if closed && self.curve_points.len() >= 4 {
            let first = self.curve_points[0];
            self.curve_vertex(first.x, first.y);
            self.curve_vertex(first.x, first.y);
        }
        let outline_closed = match self.kind {
            ShapeType::Polygon | ShapeType::Tess => closed,
            _ => false,
        };
        let mut contours = vec![Contour {
            vertices: self.vertices,
            closed: outline_closed,
            hole: false,
        }];
        contours.extend(self.contours);
        Shape::from_polygon(
            Polygon {
                kind: self.kind,
                contours,
            },
            self.angle_mode,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outline(shape: &Shape) -> &Contour {
        &shape.polygon().unwrap().contours[0]
    }

    #[test]
    fn plain_vertices_with_default_uv() {
        let mut builder = ShapeBuilder::new(ShapeType::Polygon);
        builder.fill(Some(Color::BLACK));
        builder.vertex(1.0, 2.0);
        builder.vertex_uv(3.0, 4.0, 0.5, 0.25);
        let shape = builder.end(EndMode::Open);
        let contour = outline(&shape);
        assert!(!contour.closed);
        assert_eq!(contour.vertices[0], Vertex::new(1.0, 2.0, 1.0, 2.0, Some(Color::BLACK)));
        assert_eq!(contour.vertices[1].u, 0.5);
    }

    #[test]
    fn curve_vertices_emit_after_four_points() {
        let mut builder = ShapeBuilder::new(ShapeType::Polygon).curve_detail(4, 0.0);
        builder.curve_vertex(0.0, 0.0);
        builder.curve_vertex(10.0, 0.0);
        builder.curve_vertex(20.0, 10.0);
        let shape = builder.clone().end(EndMode::Open);
        assert_eq!(shape.get_vertex_count(), 0);
        builder.curve_vertex(30.0, 10.0);
        assert_eq!(builder.clone().end(EndMode::Open).get_vertex_count(), 5);
        // later segments drop their first point, which repeats the last one
        builder.curve_vertex(40.0, 0.0);
        let shape = builder.end(EndMode::Open);
        assert_eq!(shape.get_vertex_count(), 9);
        assert_eq!(shape.get_vertex(0).map(|v| v.x), Some(10.0));
    }

    #[test]
    fn closing_curve_wraps_to_first_point() {
        let mut builder = ShapeBuilder::new(ShapeType::Polygon).curve_detail(4, 0.0);
        for &(x, y) in [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)].iter() {
            builder.curve_vertex(x, y);
        }
        let shape = builder.end(EndMode::Close);
        assert_eq!(shape.get_vertex_count(), 5 + 4 + 4);
        assert!(outline(&shape).closed);
    }

    #[test]
    fn bezier_needs_a_start_vertex() {
        let mut builder = ShapeBuilder::new(ShapeType::Polygon).bezier_detail(4);
        assert!(builder.bezier_vertex(0.0, 0.0, 1.0, 1.0, 2.0, 2.0).is_err());
        assert!(builder.quadratic_vertex(0.0, 0.0, 1.0, 1.0).is_err());
        builder.vertex(0.0, 0.0);
        builder.bezier_vertex(0.0, 10.0, 10.0, 10.0, 10.0, 0.0).unwrap();
        let shape = builder.end(EndMode::Open);
        assert_eq!(shape.get_vertex_count(), 5);
        assert_eq!(shape.get_vertex(4).map(|v| (v.x, v.y)), Some((10.0, 0.0)));
    }

    #[test]
    fn quadratic_matches_equivalent_cubic() {
        let mut quad = ShapeBuilder::new(ShapeType::Polygon).bezier_detail(8);
        quad.vertex(0.0, 0.0);
        quad.quadratic_vertex(30.0, 30.0, 60.0, 0.0).unwrap();
        let mut cubic = ShapeBuilder::new(ShapeType::Polygon).bezier_detail(8);
        cubic.vertex(0.0, 0.0);
        cubic
            .bezier_vertex(20.0, 20.0, 40.0, 20.0, 60.0, 0.0)
            .unwrap();
        let (a, b) = (quad.end(EndMode::Open), cubic.end(EndMode::Open));
        for i in 0..a.get_vertex_count() {
            let (p, q) = (a.get_vertex(i).unwrap(), b.get_vertex(i).unwrap());
            assert!((p.x - q.x).abs() < 1e-3 && (p.y - q.y).abs() < 1e-3);
        }
    }

    #[test]
    fn contours_become_closed_holes() {
        let mut builder = ShapeBuilder::new(ShapeType::Polygon);
        builder.vertex(0.0, 0.0);
        builder.vertex(10.0, 0.0);
        builder.vertex(10.0, 10.0);
        assert!(builder.end_contour().is_err());
        builder.begin_contour().unwrap();
        assert!(builder.begin_contour().is_err());
        builder.vertex(2.0, 2.0);
        builder.vertex(4.0, 2.0);
        builder.vertex(4.0, 4.0);
        builder.end_contour().unwrap();
        let shape = builder.end(EndMode::Open);
        let polygon = shape.polygon().unwrap();
        assert!(polygon.contours[0].closed);
        assert!(polygon.contours[1].hole && polygon.contours[1].closed);
        assert_eq!(shape.get_vertex_count(), 3);
    }

    #[test]
    fn topologies_stay_open() {
        let mut builder = ShapeBuilder::new(ShapeType::Triangles);
        builder.vertex(0.0, 0.0);
        builder.vertex(1.0, 0.0);
        builder.vertex(0.0, 1.0);
        let shape = builder.end(EndMode::Close);
        assert_eq!(shape.polygon().unwrap().kind, ShapeType::Triangles);
        assert!(!outline(&shape).closed);
    }
}
