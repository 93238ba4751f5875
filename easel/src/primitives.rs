use crate::builder::{EndMode, ShapeBuilder};
use crate::calc::{bezier_vertices, curve_vertices};
use crate::color::{BlendMode, ColorSpec};
use crate::context::DrawingContext;
use crate::errors::EaselError;
use crate::image::ImageSource;
use crate::math::{Point, Rect, Transform};
use crate::mode::CoordMode;
use crate::painter::{Align, Contour, Paint, Painter, Polygon, ShapeType, Vertex};
use crate::shape::Shape;

fn outline(points: &[Point], closed: bool) -> Polygon {
    Polygon {
        kind: ShapeType::Polygon,
        contours: vec![Contour {
            vertices: points
                .iter()
                .map(|p| Vertex::new(p.x, p.y, p.x, p.y, None))
                .collect(),
            closed,
            hole: false,
        }],
    }
}

impl<P: Painter> DrawingContext<P> {
    pub(crate) fn paint(&self) -> Paint {
        self.style.paint(self.matrix)
    }

    /// Opaque colors replace every pixel; translucent ones are painted over
    /// the whole canvas.
    pub fn background<C: Into<ColorSpec>>(&mut self, spec: C) -> Result<(), EaselError> {
        self.assert_drawing()?;
        let color = self.to_color(spec)?;
        if color.is_opaque() {
            return self.painter.background(color);
        }
        let paint = Paint {
            fill: Some(color),
            stroke: None,
            xform: Transform::identity(),
            clip: None,
            blend: BlendMode::Blend,
            texture: None,
            shader: None,
            ..self.paint()
        };
        let rect = Rect::from((0.0, 0.0, self.width(), self.height()));
        self.painter.rect(&paint, rect, [0.0; 4])
    }

    /// Resets every pixel to transparent black.
    pub fn clear(&mut self) -> Result<(), EaselError> {
        self.assert_drawing()?;
        self.painter.background(crate::color::Color::TRANSPARENT)
    }

    pub fn point(&mut self, x: f32, y: f32) -> Result<(), EaselError> {
        self.assert_drawing()?;
        let paint = self.paint();
        self.painter.points(&paint, &[Point::new(x, y)])
    }

    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Result<(), EaselError> {
        self.assert_drawing()?;
        let paint = self.paint();
        self.painter
            .lines(&paint, &[Point::new(x1, y1), Point::new(x2, y2)], false)
    }

    pub fn rect(&mut self, a: f32, b: f32, c: f32, d: f32) -> Result<(), EaselError> {
        self.rect_with_radii(a, b, c, d, [0.0; 4])
    }

    pub fn rounded_rect(&mut self, a: f32, b: f32, c: f32, d: f32, r: f32) -> Result<(), EaselError> {
        self.rect_with_radii(a, b, c, d, [r; 4])
    }

    /// Radii run top-left, top-right, bottom-right, bottom-left.
    pub fn rect_with_radii(
        &mut self,
        a: f32,
        b: f32,
        c: f32,
        d: f32,
        radii: [f32; 4],
    ) -> Result<(), EaselError> {
        self.assert_drawing()?;
        let rect = Rect::from(self.style.rect_mode.to_xywh(a, b, c, d));
        let paint = self.paint();
        self.painter.rect(&paint, rect, radii)
    }

    pub fn square(&mut self, x: f32, y: f32, extent: f32) -> Result<(), EaselError> {
        self.rect(x, y, extent, extent)
    }

    pub fn ellipse(&mut self, a: f32, b: f32, c: f32, d: f32) -> Result<(), EaselError> {
        self.assert_drawing()?;
        let rect = Rect::from(self.style.ellipse_mode.to_xywh(a, b, c, d));
        let paint = self.paint();
        self.painter.ellipse(&paint, rect, 0.0, 360.0)
    }

    pub fn circle(&mut self, x: f32, y: f32, extent: f32) -> Result<(), EaselError> {
        self.ellipse(x, y, extent, extent)
    }

    /// `start` and `stop` are read in the angle mode and run clockwise on
    /// screen.
    pub fn arc(
        &mut self,
        a: f32,
        b: f32,
        c: f32,
        d: f32,
        start: f32,
        stop: f32,
    ) -> Result<(), EaselError> {
        self.assert_drawing()?;
        let rect = Rect::from(self.style.ellipse_mode.to_xywh(a, b, c, d));
        let mode = self.style.angle_mode;
        let (from, to) = (mode.to_degrees(-start), mode.to_degrees(-stop));
        let paint = self.paint();
        self.painter.ellipse(&paint, rect, from, to)
    }

    pub fn triangle(
        &mut self,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        x3: f32,
        y3: f32,
    ) -> Result<(), EaselError> {
        self.assert_drawing()?;
        let polygon = outline(
            &[Point::new(x1, y1), Point::new(x2, y2), Point::new(x3, y3)],
            true,
        );
        let paint = self.paint();
        self.painter.polygon(&paint, &polygon)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn quad(
        &mut self,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        x3: f32,
        y3: f32,
        x4: f32,
        y4: f32,
    ) -> Result<(), EaselError> {
        self.assert_drawing()?;
        let polygon = outline(
            &[
                Point::new(x1, y1),
                Point::new(x2, y2),
                Point::new(x3, y3),
                Point::new(x4, y4),
            ],
            true,
        );
        let paint = self.paint();
        self.painter.polygon(&paint, &polygon)
    }

    /// Catmull-Rom segment from `(x1, y1)` to `(x2, y2)`.
    #[allow(clippy::too_many_arguments)]
    pub fn curve(
        &mut self,
        cx1: f32,
        cy1: f32,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        cx2: f32,
        cy2: f32,
    ) -> Result<(), EaselError> {
        self.assert_drawing()?;
        let points = curve_vertices(
            self.style.curve_tightness,
            [
                Point::new(cx1, cy1),
                Point::new(x1, y1),
                Point::new(x2, y2),
                Point::new(cx2, cy2),
            ],
            self.style.curve_detail,
        );
        let paint = self.paint();
        self.painter.polygon(&paint, &outline(&points, false))
    }

    #[allow(clippy::too_many_arguments)]
    pub fn bezier(
        &mut self,
        x1: f32,
        y1: f32,
        cx1: f32,
        cy1: f32,
        cx2: f32,
        cy2: f32,
        x2: f32,
        y2: f32,
    ) -> Result<(), EaselError> {
        self.assert_drawing()?;
        let points = bezier_vertices(
            [
                Point::new(x1, y1),
                Point::new(cx1, cy1),
                Point::new(cx2, cy2),
                Point::new(x2, y2),
            ],
            self.style.bezier_detail,
        );
        let paint = self.paint();
        self.painter.polygon(&paint, &outline(&points, false))
    }

    /// Draws `text` with its baseline at `y`.
    pub fn text(&mut self, text: &str, x: f32, y: f32) -> Result<(), EaselError> {
        self.assert_drawing()?;
        let top = y - self.style.font.ascent();
        let paint = self.paint();
        self.painter
            .text(&paint, &self.style.font, text, Point::new(x, top))
    }

    /// Draws `text` inside a box placed through `rect_mode`, honoring the
    /// text alignment.
    pub fn text_in_box(&mut self, text: &str, a: f32, b: f32, c: f32, d: f32) -> Result<(), EaselError> {
        self.assert_drawing()?;
        let (mut x, mut y, w, h) = self.style.rect_mode.to_xywh(a, b, c, d);
        let font = &self.style.font;
        let align = self.style.text_align;
        if align.contains(Align::RIGHT) {
            x += w - font.width(text);
        } else if align.contains(Align::CENTER) {
            x += (w - font.width(text)) / 2.0;
        }
        if align.contains(Align::BOTTOM) {
            y += h - font.height();
        } else if align.contains(Align::MIDDLE) {
            y += (h - font.height()) / 2.0;
        }
        let paint = self.paint();
        self.painter.text(&paint, font, text, Point::new(x, y))
    }

    /// Draws an image or another context at its own size, placed through
    /// `image_mode`.
    pub fn image<S: ImageSource>(&mut self, src: &S, a: f32, b: f32) -> Result<(), EaselError> {
        let (w, h) = src.source_size();
        self.image_rect(src, a, b, w, h)
    }

    pub fn image_rect<S: ImageSource>(
        &mut self,
        src: &S,
        a: f32,
        b: f32,
        c: f32,
        d: f32,
    ) -> Result<(), EaselError> {
        self.assert_drawing()?;
        if !src.is_ready() {
            return Ok(());
        }
        let dst = Rect::from(self.style.image_mode.to_xywh(a, b, c, d));
        let (w, h) = src.source_size();
        self.draw_source(src, Rect::from((0.0, 0.0, w, h)), dst, None)
    }

    fn draw_source<S: ImageSource>(
        &mut self,
        src: &S,
        from: Rect,
        to: Rect,
        blend: Option<BlendMode>,
    ) -> Result<(), EaselError> {
        let raster = src.source_raster()?;
        let density = src.source_density();
        let from = Rect::from((
            from.xy.x * density,
            from.xy.y * density,
            from.size.width * density,
            from.size.height * density,
        ));
        let mut paint = self.style.tinted_paint(self.matrix);
        paint.stroke = None;
        paint.texture = None;
        paint.shader = self.style.shader_or(src.source_filter());
        if let Some(blend) = blend {
            paint.blend = blend;
        }
        self.painter.image(&paint, &raster, from, to)
    }

    /// Draws a shape at `(a, b)`, or fitted into a box when `shape_mode`
    /// is not `Corner`.
    pub fn shape(&mut self, shape: &Shape, a: f32, b: f32) -> Result<(), EaselError> {
        self.place_shape(shape, a, b, None)
    }

    /// Draws a shape scaled into a box placed through `shape_mode`.
    pub fn shape_rect(&mut self, shape: &Shape, a: f32, b: f32, c: f32, d: f32) -> Result<(), EaselError> {
        self.place_shape(shape, a, b, Some((c, d)))
    }

    fn place_shape(
        &mut self,
        shape: &Shape,
        a: f32,
        b: f32,
        size: Option<(f32, f32)>,
    ) -> Result<(), EaselError> {
        self.assert_drawing()?;
        if !shape.is_visible() {
            return Ok(());
        }
        let placement = match (size, self.style.shape_mode) {
            (None, CoordMode::Corner) => Transform::translate(a, b),
            (size, mode) => {
                let (c, d) = size.unwrap_or((shape.width(), shape.height()));
                let dst = Rect::from(mode.to_xywh(a, b, c, d));
                match shape.bounds() {
                    Some(bounds) => Transform::rect_to_rect(bounds.to_rect(), dst),
                    None => Transform::translate(dst.xy.x, dst.xy.y),
                }
            }
        };
        let paint = match self.style.texture {
            Some(_) => self.style.tinted_paint(self.matrix),
            None => self.paint(),
        };
        shape.draw(&mut self.painter, &paint, placement)
    }

    // Shape building

    pub fn begin_shape(&mut self, kind: ShapeType) -> Result<(), EaselError> {
        if self.shape.is_some() {
            return Err(EaselError::state("begin_shape() cannot be called twice"));
        }
        self.shape = Some(
            ShapeBuilder::new(kind)
                .curve_detail(self.style.curve_detail, self.style.curve_tightness)
                .bezier_detail(self.style.bezier_detail)
                .angle_mode(self.style.angle_mode),
        );
        Ok(())
    }

    fn builder(&mut self, call: &str) -> Result<&mut ShapeBuilder, EaselError> {
        let fill = self.style.fill;
        let builder = self
            .shape
            .as_mut()
            .ok_or_else(|| EaselError::state(format!("{}() must be called after begin_shape()", call)))?;
        builder.fill(fill);
        Ok(builder)
    }

    pub fn vertex(&mut self, x: f32, y: f32) -> Result<(), EaselError> {
        self.builder("vertex")?.vertex(x, y);
        Ok(())
    }

    /// `u` and `v` are read in the texture mode.
    pub fn vertex_uv(&mut self, x: f32, y: f32, u: f32, v: f32) -> Result<(), EaselError> {
        self.builder("vertex")?.vertex_uv(x, y, u, v);
        Ok(())
    }

    pub fn curve_vertex(&mut self, x: f32, y: f32) -> Result<(), EaselError> {
        self.builder("curve_vertex")?.curve_vertex(x, y);
        Ok(())
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
        self.builder("bezier_vertex")?
            .bezier_vertex(x2, y2, x3, y3, x4, y4)
    }

    pub fn quadratic_vertex(&mut self, cx: f32, cy: f32, x3: f32, y3: f32) -> Result<(), EaselError> {
        self.builder("quadratic_vertex")?
            .quadratic_vertex(cx, cy, x3, y3)
    }

    pub fn begin_contour(&mut self) -> Result<(), EaselError> {
        self.builder("begin_contour")?.begin_contour()
    }

    pub fn end_contour(&mut self) -> Result<(), EaselError> {
        self.builder("end_contour")?.end_contour()
    }

    /// Finishes the shape started by `begin_shape` and draws it.
    pub fn end_shape(&mut self, mode: EndMode) -> Result<(), EaselError> {
        self.assert_drawing()?;
        let builder = self
            .shape
            .take()
            .ok_or_else(|| EaselError::state("end_shape() must be called after begin_shape()"))?;
        let shape = builder.end(mode);
        self.shape(&shape, 0.0, 0.0)
    }

    // Pixel regions

    /// Copies a region of `src` (this context when `None`) into a region of
    /// this context.
    pub fn copy<S: ImageSource>(
        &mut self,
        src: Option<&S>,
        from: [f32; 4],
        to: [f32; 4],
    ) -> Result<(), EaselError> {
        self.blend(src, from, to, BlendMode::Blend)
    }

    pub fn blend<S: ImageSource>(
        &mut self,
        src: Option<&S>,
        from: [f32; 4],
        to: [f32; 4],
        mode: BlendMode,
    ) -> Result<(), EaselError> {
        self.assert_drawing()?;
        let [sx, sy, sw, sh] = from;
        let [dx, dy, dw, dh] = to;
        let (from, to) = (Rect::from((sx, sy, sw, sh)), Rect::from((dx, dy, dw, dh)));
        match src {
            Some(src) if !src.is_ready() => Ok(()),
            Some(src) => self.draw_source(src, from, to, Some(mode)),
            None => {
                let raster = self.painter.snapshot()?;
                let density = self.pixel_density();
                let scaled = Rect::from((sx * density, sy * density, sw * density, sh * density));
                let mut paint = self.style.tinted_paint(self.matrix);
                paint.stroke = None;
                paint.texture = None;
                paint.shader = self.style.shader_or(self.filter.clone());
                paint.blend = mode;
                self.painter.image(&paint, &raster, scaled, to)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::EndMode;
    use crate::color::{BlendMode, Color};
    use crate::context::DrawingContext;
    use crate::errors::EaselError;
    use crate::image::{Image, ImageFormat};
    use crate::math::{Point, Rect, Transform};
    use crate::mode::{AngleMode, CoordMode};
    use crate::painter::{Align, ShapeType};
    use crate::shader::FilterKind;
    use crate::shape::{Shape, ShapeKind};
    use crate::testing::{Call, RecordingPainter};

    fn drawing() -> DrawingContext<RecordingPainter> {
        let mut ctx = DrawingContext::new(RecordingPainter::new(100, 80));
        ctx.begin_draw().unwrap();
        ctx
    }

    fn last(ctx: &DrawingContext<RecordingPainter>) -> &Call {
        ctx.painter().calls.last().expect("no painter call")
    }

    #[test]
    fn primitives_need_begin_draw() {
        let mut ctx = DrawingContext::new(RecordingPainter::new(10, 10));
        assert!(ctx.rect(0.0, 0.0, 1.0, 1.0).is_err());
        assert!(ctx.background(0).is_err());
        // style setters work outside of drawing
        ctx.fill(0).unwrap();
        ctx.stroke_weight(3.0);
        assert!(ctx.painter().calls.is_empty());
    }

    #[test]
    fn background_opaque_and_translucent() {
        let mut ctx = drawing();
        ctx.translate(10.0, 10.0).unwrap();
        ctx.background(255).unwrap();
        assert_eq!(last(&ctx), &Call::Background(Color::WHITE));
        ctx.background((255, 0, 0, 128)).unwrap();
        match last(&ctx) {
            Call::Rect(paint, rect, _) => {
                assert_eq!(paint.stroke, None);
                assert!(paint.xform.is_identity());
                assert_eq!(*rect, Rect::from((0.0, 0.0, 100.0, 80.0)));
            }
            other => panic!("unexpected {:?}", other),
        }
        ctx.clear().unwrap();
        assert_eq!(last(&ctx), &Call::Background(Color::TRANSPARENT));
    }

    #[test]
    fn rect_mode_resolves_box() {
        let mut ctx = drawing();
        ctx.rect_mode(CoordMode::Center);
        ctx.rect(50.0, 40.0, 20.0, 10.0).unwrap();
        assert!(matches!(last(&ctx), Call::Rect(_, r, _) if *r == Rect::from((40.0, 35.0, 20.0, 10.0))));
        ctx.rect_mode(CoordMode::Corners);
        ctx.rounded_rect(10.0, 10.0, 30.0, 20.0, 4.0).unwrap();
        assert!(matches!(last(&ctx), Call::Rect(_, r, radii) if *r == Rect::from((10.0, 10.0, 20.0, 10.0)) && *radii == [4.0; 4]));
    }

    #[test]
    fn ellipse_defaults_to_center_mode() {
        let mut ctx = drawing();
        ctx.circle(50.0, 50.0, 20.0).unwrap();
        assert!(matches!(last(&ctx), Call::Ellipse(_, r, from, to)
            if *r == Rect::from((40.0, 40.0, 20.0, 20.0)) && *from == 0.0 && *to == 360.0));
    }

    #[test]
    fn arc_angles_are_negated_degrees() {
        let mut ctx = drawing();
        ctx.angle_mode(AngleMode::Degrees);
        ctx.arc(0.0, 0.0, 10.0, 10.0, 0.0, 90.0).unwrap();
        assert!(matches!(last(&ctx), Call::Ellipse(_, _, from, to) if *from == 0.0 && *to == -90.0));
    }

    #[test]
    fn transforms_reach_paint() {
        let mut ctx = drawing();
        ctx.translate(10.0, 20.0).unwrap();
        ctx.scale(2.0, None).unwrap();
        ctx.point(1.0, 1.0).unwrap();
        match last(&ctx) {
            Call::Points(paint, points) => {
                let p = paint.xform.transform_point(points[0]);
                assert_eq!(p, Point::new(12.0, 22.0));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn triangle_is_a_closed_outline() {
        let mut ctx = drawing();
        ctx.triangle(0.0, 0.0, 10.0, 0.0, 0.0, 10.0).unwrap();
        match last(&ctx) {
            Call::Polygon(_, polygon) => {
                assert!(polygon.contours[0].closed);
                assert_eq!(polygon.points().count(), 3);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn bezier_follows_detail() {
        let mut ctx = drawing();
        ctx.bezier_detail(5);
        ctx.bezier(0.0, 0.0, 0.0, 10.0, 10.0, 10.0, 10.0, 0.0).unwrap();
        assert!(matches!(last(&ctx), Call::Polygon(_, p) if p.points().count() == 6 && !p.contours[0].closed));
    }

    #[test]
    fn text_moves_baseline_to_top() {
        let mut ctx = drawing();
        let ascent = ctx.text_ascent();
        ctx.text("hi", 5.0, 30.0).unwrap();
        assert!(matches!(last(&ctx), Call::Text(_, s, pos) if s == "hi" && *pos == Point::new(5.0, 30.0 - ascent)));
    }

    #[test]
    fn text_box_alignment() {
        let mut ctx = drawing();
        ctx.text_align(Align::RIGHT, Some(Align::BOTTOM));
        let (w, h) = (ctx.text_width("abc"), ctx.get_text_font().height());
        ctx.text_in_box("abc", 0.0, 0.0, 50.0, 40.0).unwrap();
        assert!(matches!(last(&ctx), Call::Text(_, _, pos) if *pos == Point::new(50.0 - w, 40.0 - h)));
    }

    #[test]
    fn image_uses_tint_and_no_stroke() {
        let mut ctx = drawing();
        let img = Image::blank(8, 4, ImageFormat::Rgba);
        ctx.fill((255, 0, 0)).unwrap();
        ctx.image(&img, 10.0, 10.0).unwrap();
        match last(&ctx) {
            Call::Image(paint, size, src, dst) => {
                assert_eq!(paint.fill, Some(Color::WHITE));
                assert_eq!(paint.stroke, None);
                assert_eq!(*size, (8, 4));
                assert_eq!(*src, Rect::from((0.0, 0.0, 8.0, 4.0)));
                assert_eq!(*dst, Rect::from((10.0, 10.0, 8.0, 4.0)));
            }
            other => panic!("unexpected {:?}", other),
        }
        ctx.tint((0, 0, 255)).unwrap();
        ctx.image_rect(&img, 0.0, 0.0, 16.0, 8.0).unwrap();
        assert!(matches!(last(&ctx), Call::Image(p, _, _, _) if p.fill == Some(Color::rgb(0.0, 0.0, 1.0))));
    }

    #[test]
    fn image_filter_unless_shader_set() {
        let mut ctx = drawing();
        let img = Image::blank(2, 2, ImageFormat::Rgba);
        img.filter(FilterKind::Gray, None);
        ctx.image(&img, 0.0, 0.0).unwrap();
        assert!(matches!(last(&ctx), Call::Image(p, ..) if p.shader == img.current_filter()));
    }

    #[test]
    fn pending_image_draws_nothing() {
        let mut ctx = drawing();
        let img = Image::pending();
        ctx.image(&img, 0.0, 0.0).unwrap();
        assert!(ctx.painter().calls.is_empty());
    }

    #[test]
    fn invisible_shape_is_skipped() {
        let mut ctx = drawing();
        let mut shape = Shape::primitive(ShapeKind::Rect(0.0, 0.0, 10.0, 10.0), AngleMode::Radians);
        shape.set_visible(false);
        ctx.shape(&shape, 0.0, 0.0).unwrap();
        assert!(ctx.painter().calls.is_empty());
    }

    #[test]
    fn shape_placement() {
        let mut ctx = drawing();
        let shape = Shape::primitive(ShapeKind::Rect(0.0, 0.0, 10.0, 10.0), AngleMode::Radians);
        ctx.shape(&shape, 5.0, 5.0).unwrap();
        assert!(matches!(last(&ctx), Call::Polygon(p, _) if p.xform == Transform::translate(5.0, 5.0)));
        ctx.shape_rect(&shape, 0.0, 0.0, 20.0, 40.0).unwrap();
        match last(&ctx) {
            Call::Polygon(paint, _) => {
                let corner = paint.xform.transform_point(Point::new(10.0, 10.0));
                assert_eq!(corner, Point::new(20.0, 40.0));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn shape_building_errors() {
        let mut ctx = drawing();
        assert!(ctx.vertex(0.0, 0.0).is_err());
        assert!(ctx.end_shape(EndMode::Close).is_err());
        ctx.begin_shape(ShapeType::Polygon).unwrap();
        assert!(ctx.begin_shape(ShapeType::Polygon).is_err());
    }

    #[test]
    fn end_shape_outside_drawing_keeps_the_shape() {
        let mut ctx = drawing();
        ctx.begin_shape(ShapeType::Polygon).unwrap();
        ctx.vertex(0.0, 0.0).unwrap();
        ctx.vertex(10.0, 0.0).unwrap();
        ctx.vertex(10.0, 10.0).unwrap();
        ctx.end_draw().unwrap();
        assert!(matches!(ctx.end_shape(EndMode::Close), Err(EaselError::State(_))));

        ctx.begin_draw().unwrap();
        ctx.end_shape(EndMode::Close).unwrap();
        assert!(matches!(last(&ctx), Call::Polygon(_, polygon) if polygon.contours[0].vertices.len() == 3));
    }

    #[test]
    fn end_shape_draws_with_vertex_fill() {
        let mut ctx = drawing();
        ctx.begin_shape(ShapeType::Polygon).unwrap();
        ctx.fill((255, 0, 0)).unwrap();
        ctx.vertex(0.0, 0.0).unwrap();
        ctx.fill((0, 0, 255)).unwrap();
        ctx.vertex(10.0, 0.0).unwrap();
        ctx.vertex(10.0, 10.0).unwrap();
        ctx.end_shape(EndMode::Close).unwrap();
        match last(&ctx) {
            Call::Polygon(_, polygon) => {
                let colors: Vec<_> = polygon.contours[0].vertices.iter().map(|v| v.color).collect();
                assert_eq!(colors[0], Some(Color::rgb(1.0, 0.0, 0.0)));
                assert_eq!(colors[2], Some(Color::rgb(0.0, 0.0, 1.0)));
                assert!(polygon.contours[0].closed);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn blend_region_from_self() {
        let mut ctx = drawing();
        ctx.copy::<Image>(None, [0.0, 0.0, 10.0, 10.0], [20.0, 20.0, 10.0, 10.0]).unwrap();
        assert!(matches!(last(&ctx), Call::Image(p, size, _, dst)
            if p.blend == BlendMode::Blend && *size == (100, 80) && *dst == Rect::from((20.0, 20.0, 10.0, 10.0))));
        let img = Image::blank(4, 4, ImageFormat::Rgb);
        ctx.blend(Some(&img), [0.0, 0.0, 4.0, 4.0], [0.0, 0.0, 8.0, 8.0], BlendMode::Add).unwrap();
        assert!(matches!(last(&ctx), Call::Image(p, ..) if p.blend == BlendMode::Add));
    }
}
