//! CPU painter rendering into an `RgbaImage`.
//!
//! Fills are scanline-converted with vertical supersampling and exact
//! horizontal span coverage. Strokes are expanded into polygons (segment
//! quads plus joins and caps) and filled with the non-zero rule, so
//! overlapping pieces of one stroke never double-blend.

use easel::calc::{arc_points, ellipse_segments};
use easel::{
    color_to_pixel, pixel_to_color, BlendMode, Bounds, Color, EaselError, Font, LineCap, LineJoin,
    Paint, Painter, Point, Polygon, Rect, ShapeType, TextureMode, TextureWrap, Transform, Vertex,
};
use glam::{Affine2, Vec2};
use image::RgbaImage;
use rusttype::{point, Scale};
use std::borrow::Cow;
use std::cmp::Ordering;

const SUBSAMPLES: usize = 4;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum FillRule {
    NonZero,
    EvenOdd,
}

type Shade<'a> = Box<dyn Fn(f32, f32) -> Option<Color> + 'a>;

pub struct SoftPainter {
    width: u32,
    height: u32,
    density: f32,
    target: RgbaImage,
    painting: bool,
}

impl SoftPainter {
    pub fn create(width: u32, height: u32, density: f32) -> Result<SoftPainter, EaselError> {
        if !(density.is_finite() && density > 0.0) {
            return Err(EaselError::Painter(format!("invalid pixel density {}", density)));
        }
        let target = RgbaImage::new(
            (width as f32 * density).round() as u32,
            (height as f32 * density).round() as u32,
        );
        log::debug!(
            "soft painter {}x{} @{} ({}x{} px)",
            width,
            height,
            density,
            target.width(),
            target.height()
        );
        Ok(SoftPainter {
            width,
            height,
            density,
            target,
            painting: false,
        })
    }

    pub fn target(&self) -> &RgbaImage {
        &self.target
    }

    pub fn into_target(self) -> RgbaImage {
        self.target
    }

    pub fn is_painting(&self) -> bool {
        self.painting
    }

    fn device(&self, xform: Transform) -> Transform {
        xform * Transform::scale(self.density, self.density)
    }

    /// Pixel box writes are limited to: the target, narrowed by the clip.
    fn clip_box(&self, paint: &Paint) -> (i32, i32, i32, i32) {
        let (mut x0, mut y0) = (0, 0);
        let (mut x1, mut y1) = (self.target.width() as i32, self.target.height() as i32);
        if let Some(clip) = paint.clip {
            let d = self.density;
            x0 = x0.max((clip.xy.x * d).floor() as i32);
            y0 = y0.max((clip.xy.y * d).floor() as i32);
            x1 = x1.min(((clip.xy.x + clip.size.width) * d).ceil() as i32);
            y1 = y1.min(((clip.xy.y + clip.size.height) * d).ceil() as i32);
        }
        (x0, y0, x1, y1)
    }

    fn blend_pixel(&mut self, x: u32, y: u32, color: Color, coverage: f32, mode: BlendMode) {
        let src = Color::rgba(color.r, color.g, color.b, color.a * coverage);
        let px = self.target.get_pixel_mut(x, y);
        *px = color_to_pixel(mode.apply(src, pixel_to_color(px)));
    }

    fn fill_paths(&mut self, paint: &Paint, paths: &[Vec<Point>], rule: FillRule, shade: &Shade) {
        let edges: Vec<(Point, Point)> = paths
            .iter()
            .filter(|path| path.len() >= 2)
            .flat_map(|path| {
                path.iter()
                    .zip(path.iter().cycle().skip(1))
                    .map(|(a, b)| (*a, *b))
            })
            .filter(|(a, b)| a.y != b.y)
            .collect();
        let bounds = match Bounds::from_points(edges.iter().flat_map(|(a, b)| [*a, *b])) {
            Some(bounds) => bounds,
            None => return,
        };
        let (cx0, cy0, cx1, cy1) = self.clip_box(paint);
        let x0 = (bounds.min.x.floor() as i32).max(cx0);
        let y0 = (bounds.min.y.floor() as i32).max(cy0);
        let x1 = (bounds.max.x.ceil() as i32).min(cx1);
        let y1 = (bounds.max.y.ceil() as i32).min(cy1);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let mut coverage = vec![0f32; (x1 - x0) as usize];
        let mut crossings: Vec<(f32, i32)> = Vec::new();
        let weight = 1.0 / SUBSAMPLES as f32;
        for py in y0..y1 {
            coverage.iter_mut().for_each(|c| *c = 0.0);
            for s in 0..SUBSAMPLES {
                let sy = py as f32 + (s as f32 + 0.5) * weight;
                crossings.clear();
                for (a, b) in &edges {
                    let (top, bottom, dir) = if a.y < b.y { (a, b, 1) } else { (b, a, -1) };
                    if sy < top.y || sy >= bottom.y {
                        continue;
                    }
                    let t = (sy - top.y) / (bottom.y - top.y);
                    crossings.push((top.x + (bottom.x - top.x) * t, dir));
                }
                crossings.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
                let mut winding = 0;
                for pair in crossings.windows(2) {
                    winding += pair[0].1;
                    let inside = match rule {
                        FillRule::NonZero => winding != 0,
                        FillRule::EvenOdd => winding % 2 != 0,
                    };
                    if inside {
                        accumulate(&mut coverage, x0, pair[0].0, pair[1].0, weight);
                    }
                }
            }
            for (i, cov) in coverage.iter().enumerate() {
                if *cov <= 0.0 {
                    continue;
                }
                let px = x0 + i as i32;
                if let Some(color) = shade(px as f32 + 0.5, py as f32 + 0.5) {
                    self.blend_pixel(px as u32, py as u32, color, cov.min(1.0), paint.blend);
                }
            }
        }
    }

    /// Maps every device pixel covered by `src` under `to_device` back into
    /// source space and composites whatever `sample` returns there.
    fn sample_region<F>(&mut self, paint: &Paint, to_device: Transform, src: Rect, sample: F)
    where
        F: Fn(f32, f32) -> Option<Color>,
    {
        let corners = src.corners().map(|c| to_device.transform_point(c));
        let bounds = match Bounds::from_points(corners) {
            Some(bounds) => bounds,
            None => return,
        };
        let affine = to_affine(to_device);
        if affine.matrix2.determinant().abs() < 1e-9 {
            return;
        }
        let inverse = affine.inverse();
        let (sx0, sx1) = ordered(src.xy.x, src.xy.x + src.size.width);
        let (sy0, sy1) = ordered(src.xy.y, src.xy.y + src.size.height);
        let (cx0, cy0, cx1, cy1) = self.clip_box(paint);
        let x0 = (bounds.min.x.floor() as i32).max(cx0);
        let y0 = (bounds.min.y.floor() as i32).max(cy0);
        let x1 = (bounds.max.x.ceil() as i32).min(cx1);
        let y1 = (bounds.max.y.ceil() as i32).min(cy1);
        for py in y0..y1 {
            for px in x0..x1 {
                let at = inverse.transform_point2(Vec2::new(px as f32 + 0.5, py as f32 + 0.5));
                if at.x < sx0 || at.x >= sx1 || at.y < sy0 || at.y >= sy1 {
                    continue;
                }
                if let Some(color) = sample(at.x, at.y) {
                    self.blend_pixel(px as u32, py as u32, color, 1.0, paint.blend);
                }
            }
        }
    }

    fn solid<'a>(color: Color) -> Shade<'a> {
        Box::new(move |_, _| Some(color))
    }

    /// Fill shading for a face: the bound texture tinted by the fill, or
    /// the first vertex color, or the plain fill.
    fn face_shade<'a>(&self, paint: &Paint, vertices: &[Vertex], device: Transform) -> Option<Shade<'a>> {
        let fill = paint.fill?;
        let texture = match &paint.texture {
            Some(texture) => texture,
            None => {
                let color = vertices.iter().find_map(|v| v.color).unwrap_or(fill);
                return Some(SoftPainter::solid(color));
            }
        };
        let raster = match texture.image.snapshot() {
            Ok(raster) if raster.width() > 0 && raster.height() > 0 => raster,
            _ => return None,
        };
        let (tw, th) = (raster.width() as f32, raster.height() as f32);
        let texel = |v: &Vertex| match texture.mode {
            TextureMode::Image => Vec2::new(v.u, v.v),
            TextureMode::Normal => Vec2::new(v.u * tw, v.v * th),
        };
        let to_uv = uv_mapping(vertices, device, texel)?;
        let wrap = texture.wrap;
        Some(Box::new(move |x, y| {
            let uv = to_uv.transform_point2(Vec2::new(x, y));
            let (ix, iy) = match wrap {
                TextureWrap::Clamp => (
                    (uv.x.floor() as i64).clamp(0, tw as i64 - 1),
                    (uv.y.floor() as i64).clamp(0, th as i64 - 1),
                ),
                TextureWrap::Repeat => (
                    (uv.x.floor() as i64).rem_euclid(tw as i64),
                    (uv.y.floor() as i64).rem_euclid(th as i64),
                ),
            };
            let texel = pixel_to_color(raster.get_pixel(ix as u32, iy as u32));
            Some(modulate(texel, fill))
        }))
    }

    fn stroke_paths(&mut self, paint: &Paint, device: Transform, paths: &[(Vec<Point>, bool)]) {
        let color = match paint.stroke {
            Some(color) => color,
            None => return,
        };
        let width = paint.stroke_width * device.average_scale();
        if width <= 0.0 {
            return;
        }
        let mut pieces = Vec::new();
        for (points, closed) in paths {
            let points: Vec<Point> = points.iter().map(|p| device.transform_point(*p)).collect();
            pieces.extend(stroke_outline(&points, *closed, width, paint));
        }
        self.fill_paths(paint, &pieces, FillRule::NonZero, &SoftPainter::solid(color));
    }

    /// Fills and strokes one logical outline.
    fn draw_path(&mut self, paint: &Paint, points: Vec<Point>, closed: bool) {
        let device = self.device(paint.xform);
        // textures map onto the outline in its own coordinates
        let vertices: Vec<Vertex> = points
            .iter()
            .map(|p| Vertex::new(p.x, p.y, p.x, p.y, None))
            .collect();
        if let Some(shade) = self.face_shade(paint, &vertices, device) {
            let filled: Vec<Point> = points.iter().map(|p| device.transform_point(*p)).collect();
            self.fill_paths(paint, &[filled], FillRule::NonZero, &shade);
        }
        self.stroke_paths(paint, device, &[(points, closed)]);
    }

    fn draw_faces(&mut self, paint: &Paint, faces: Vec<Vec<Vertex>>) {
        let device = self.device(paint.xform);
        for face in &faces {
            if let Some(shade) = self.face_shade(paint, face, device) {
                let points: Vec<Point> = face
                    .iter()
                    .map(|v| device.transform_point(v.point()))
                    .collect();
                self.fill_paths(paint, &[points], FillRule::NonZero, &shade);
            }
        }
        let outlines: Vec<(Vec<Point>, bool)> = faces
            .iter()
            .map(|face| (face.iter().map(Vertex::point).collect(), true))
            .collect();
        self.stroke_paths(paint, device, &outlines);
    }
}

impl Painter for SoftPainter {
    fn begin_paint(&mut self) -> Result<(), EaselError> {
        self.painting = true;
        Ok(())
    }

    fn end_paint(&mut self) -> Result<(), EaselError> {
        self.painting = false;
        Ok(())
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn pixel_density(&self) -> f32 {
        self.density
    }

    fn background(&mut self, color: Color) -> Result<(), EaselError> {
        let px = color_to_pixel(color);
        self.target.pixels_mut().for_each(|p| *p = px);
        Ok(())
    }

    fn points(&mut self, paint: &Paint, points: &[Point]) -> Result<(), EaselError> {
        let device = self.device(paint.xform);
        let color = match paint.stroke {
            Some(color) => color,
            None => return Ok(()),
        };
        let half = paint.stroke_width * device.average_scale() / 2.0;
        let dots: Vec<Vec<Point>> = points
            .iter()
            .map(|p| dot(device.transform_point(*p), half, paint.line_cap))
            .collect();
        self.fill_paths(paint, &dots, FillRule::NonZero, &SoftPainter::solid(color));
        Ok(())
    }

    fn lines(&mut self, paint: &Paint, points: &[Point], closed: bool) -> Result<(), EaselError> {
        let device = self.device(paint.xform);
        self.stroke_paths(paint, device, &[(points.to_vec(), closed)]);
        Ok(())
    }

    fn rect(&mut self, paint: &Paint, rect: Rect, radii: [f32; 4]) -> Result<(), EaselError> {
        let (x0, x1) = ordered(rect.xy.x, rect.xy.x + rect.size.width);
        let (y0, y1) = ordered(rect.xy.y, rect.xy.y + rect.size.height);
        let (w, h) = (x1 - x0, y1 - y0);
        let limit = w.min(h) / 2.0;
        let scale = self.device(paint.xform).average_scale();
        let [tl, tr, br, bl] = radii.map(|r| r.max(0.0).min(limit));
        let mut outline = Vec::new();
        let mut corner = |r: f32, cx: f32, cy: f32, from: f32, corner: Point| {
            if r <= 0.0 {
                outline.push(corner);
            } else {
                let segments = ellipse_segments(r * scale, r * scale);
                outline.extend(arc_points(cx - r, cy - r, r * 2.0, r * 2.0, from, from + 90.0, segments));
            }
        };
        corner(tr, x1 - tr, y0 + tr, 0.0, Point::new(x1, y0));
        corner(tl, x0 + tl, y0 + tl, 90.0, Point::new(x0, y0));
        corner(bl, x0 + bl, y1 - bl, 180.0, Point::new(x0, y1));
        corner(br, x1 - br, y1 - br, 270.0, Point::new(x1, y1));
        self.draw_path(paint, outline, true);
        Ok(())
    }

    fn ellipse(&mut self, paint: &Paint, rect: Rect, from: f32, to: f32) -> Result<(), EaselError> {
        let (x, y, w, h) = (rect.xy.x, rect.xy.y, rect.size.width, rect.size.height);
        let scale = self.device(paint.xform).average_scale();
        let segments = ellipse_segments(w / 2.0 * scale, h / 2.0 * scale);
        if (to - from).abs() >= 360.0 {
            let mut outline = arc_points(x, y, w, h, 0.0, 360.0, segments);
            outline.pop();
            self.draw_path(paint, outline, true);
        } else {
            let mut outline = vec![Point::new(x + w / 2.0, y + h / 2.0)];
            outline.extend(arc_points(x, y, w, h, from, to, segments));
            self.draw_path(paint, outline, true);
        }
        Ok(())
    }

    fn polygon(&mut self, paint: &Paint, polygon: &Polygon) -> Result<(), EaselError> {
        let outline: &[Vertex] = match polygon.contours.first() {
            Some(contour) => &contour.vertices,
            None => return Ok(()),
        };
        let faces = |size: usize, step: usize| -> Vec<Vec<Vertex>> {
            outline
                .windows(size)
                .step_by(step)
                .map(|w| w.to_vec())
                .collect()
        };
        match polygon.kind {
            ShapeType::Points => {
                let points: Vec<Point> = outline.iter().map(Vertex::point).collect();
                self.points(paint, &points)?;
            }
            ShapeType::Lines => {
                let device = self.device(paint.xform);
                let segments: Vec<(Vec<Point>, bool)> = outline
                    .chunks_exact(2)
                    .map(|pair| (vec![pair[0].point(), pair[1].point()], false))
                    .collect();
                self.stroke_paths(paint, device, &segments);
            }
            ShapeType::Triangles => self.draw_faces(paint, faces(3, 3)),
            ShapeType::TriangleStrip => self.draw_faces(paint, faces(3, 1)),
            ShapeType::TriangleFan => {
                let fan = outline
                    .windows(2)
                    .skip(1)
                    .map(|pair| vec![outline[0], pair[0], pair[1]])
                    .collect();
                self.draw_faces(paint, fan);
            }
            ShapeType::Quads => self.draw_faces(paint, faces(4, 4)),
            ShapeType::QuadStrip => {
                let strip = outline
                    .windows(4)
                    .step_by(2)
                    .map(|q| vec![q[0], q[1], q[3], q[2]])
                    .collect();
                self.draw_faces(paint, strip);
            }
            ShapeType::Polygon | ShapeType::Tess => {
                let device = self.device(paint.xform);
                if let Some(shade) = self.face_shade(paint, outline, device) {
                    let rings: Vec<Vec<Point>> = polygon
                        .contours
                        .iter()
                        .map(|c| c.vertices.iter().map(|v| device.transform_point(v.point())).collect())
                        .collect();
                    self.fill_paths(paint, &rings, FillRule::EvenOdd, &shade);
                }
                let rings: Vec<(Vec<Point>, bool)> = polygon
                    .contours
                    .iter()
                    .map(|c| (c.vertices.iter().map(Vertex::point).collect(), c.closed))
                    .collect();
                self.stroke_paths(paint, device, &rings);
            }
        }
        Ok(())
    }

    fn text(&mut self, paint: &Paint, font: &Font, text: &str, pos: Point) -> Result<(), EaselError> {
        let color = match paint.fill {
            Some(color) => color,
            None => return Ok(()),
        };
        let face = match font.face() {
            Some(face) => face,
            None => {
                log::warn!("font {:?} has no face, skipping text {:?}", font.name(), text);
                return Ok(());
            }
        };
        let device = self.device(paint.xform);
        let k = device.average_scale().max(1e-3);
        let scale = Scale::uniform(font.size() * k);
        let ascent = face.v_metrics(scale).ascent;
        let w = (font.width(text) * k).ceil() as i32 + 2;
        let h = (font.height() * k).ceil() as i32 + 2;
        let mut mask = vec![0f32; (w * h) as usize];
        for glyph in face.layout(text, scale, point(0.0, ascent)) {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, v| {
                    let (x, y) = (gx as i32 + bb.min.x, gy as i32 + bb.min.y);
                    if x >= 0 && y >= 0 && x < w && y < h {
                        let cell = &mut mask[(y * w + x) as usize];
                        *cell = cell.max(v);
                    }
                });
            }
        }
        let to_device = Transform::scale(1.0 / k, 1.0 / k) * Transform::translate(pos.x, pos.y) * device;
        let region = Rect::from((0.0, 0.0, w as f32, h as f32));
        self.sample_region(paint, to_device, region, |x, y| {
            let alpha = mask[(y as i32 * w + x as i32) as usize];
            (alpha > 0.0).then(|| Color::rgba(color.r, color.g, color.b, color.a * alpha))
        });
        Ok(())
    }

    fn image(&mut self, paint: &Paint, image: &RgbaImage, src: Rect, dst: Rect) -> Result<(), EaselError> {
        if image.width() == 0 || image.height() == 0 {
            return Ok(());
        }
        let raster = match paint.shader.as_ref().and_then(|shader| shader.filter()) {
            Some(filter) => Cow::Owned(filter.apply(image)),
            None => Cow::Borrowed(image),
        };
        let tint = paint.fill.unwrap_or(Color::WHITE);
        let to_device = Transform::rect_to_rect(src, dst) * self.device(paint.xform);
        let (w, h) = (raster.width() as f32, raster.height() as f32);
        self.sample_region(paint, to_device, src, |x, y| {
            if x < 0.0 || y < 0.0 || x >= w || y >= h {
                return None;
            }
            Some(modulate(pixel_to_color(raster.get_pixel(x as u32, y as u32)), tint))
        });
        Ok(())
    }

    fn snapshot(&self) -> Result<RgbaImage, EaselError> {
        Ok(self.target.clone())
    }

    fn write_pixels(&mut self, pixels: &RgbaImage) -> Result<(), EaselError> {
        if pixels.dimensions() != self.target.dimensions() {
            return Err(EaselError::Painter(format!(
                "pixel buffer is {:?}, canvas is {:?}",
                pixels.dimensions(),
                self.target.dimensions()
            )));
        }
        self.target.copy_from_slice(pixels.as_raw());
        Ok(())
    }

    fn offscreen(&self, width: u32, height: u32, density: f32) -> Result<Self, EaselError> {
        SoftPainter::create(width, height, density)
    }
}

fn to_affine(t: Transform) -> Affine2 {
    Affine2::from_cols_array(&t.0)
}

fn ordered(a: f32, b: f32) -> (f32, f32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn modulate(texel: Color, tint: Color) -> Color {
    Color::rgba(texel.r * tint.r, texel.g * tint.g, texel.b * tint.b, texel.a * tint.a)
}

fn accumulate(coverage: &mut [f32], x0: i32, from: f32, to: f32, weight: f32) {
    let lo = x0 as f32;
    let hi = lo + coverage.len() as f32;
    let (from, to) = (from.max(lo), to.min(hi));
    if from >= to {
        return;
    }
    for px in (from.floor() as i32)..(to.ceil() as i32) {
        let overlap = to.min(px as f32 + 1.0) - from.max(px as f32);
        if let Some(cell) = coverage.get_mut((px - x0) as usize) {
            *cell += overlap * weight;
        }
    }
}

/// Device-space affine taking pixel positions to texel positions, solved
/// from the first three non-collinear vertices.
fn uv_mapping<F: Fn(&Vertex) -> Vec2>(vertices: &[Vertex], device: Transform, texel: F) -> Option<Affine2> {
    let first = vertices.first()?;
    let p0 = device.transform_point(first.point());
    let p0 = Vec2::new(p0.x, p0.y);
    for (i, b) in vertices.iter().enumerate().skip(1) {
        for c in vertices.iter().skip(i + 1) {
            let pb = device.transform_point(b.point());
            let pc = device.transform_point(c.point());
            let (pb, pc) = (Vec2::new(pb.x, pb.y), Vec2::new(pc.x, pc.y));
            let positions = Affine2::from_cols(pb - p0, pc - p0, p0);
            if positions.matrix2.determinant().abs() < 1e-6 {
                continue;
            }
            let t0 = texel(first);
            let texels = Affine2::from_cols(texel(b) - t0, texel(c) - t0, t0);
            return Some(texels * positions.inverse());
        }
    }
    None
}

fn circle(center: Point, radius: f32) -> Vec<Point> {
    let mut points = arc_points(
        center.x - radius,
        center.y - radius,
        radius * 2.0,
        radius * 2.0,
        0.0,
        360.0,
        ellipse_segments(radius, radius),
    );
    points.pop();
    points
}

fn dot(center: Point, half: f32, cap: LineCap) -> Vec<Point> {
    match cap {
        LineCap::Round => circle(center, half),
        LineCap::Butt | LineCap::Square => vec![
            Point::new(center.x - half, center.y - half),
            Point::new(center.x + half, center.y - half),
            Point::new(center.x + half, center.y + half),
            Point::new(center.x - half, center.y + half),
        ],
    }
}

fn signed_area(points: &[Point]) -> f32 {
    points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.x * b.y - b.x * a.y)
        .sum::<f32>()
        / 2.0
}

/// Polygons whose union is the stroke of `points`, all wound the same way.
fn stroke_outline(points: &[Point], closed: bool, width: f32, paint: &Paint) -> Vec<Vec<Point>> {
    let mut pts: Vec<Point> = Vec::with_capacity(points.len());
    for p in points {
        if pts.last().map_or(true, |last: &Point| last.distance(*p) > 1e-4) {
            pts.push(*p);
        }
    }
    if closed && pts.len() > 2 && pts[0].distance(pts[pts.len() - 1]) <= 1e-4 {
        pts.pop();
    }
    let hw = width / 2.0;
    let mut pieces = Vec::new();
    match pts.len() {
        0 => return pieces,
        1 => {
            if paint.line_cap != LineCap::Butt {
                pieces.push(dot(pts[0], hw, paint.line_cap));
            }
            return pieces;
        }
        _ => {}
    }

    let closed = closed && pts.len() > 2;
    let count = if closed { pts.len() } else { pts.len() - 1 };
    let segment = |i: usize| (pts[i], pts[(i + 1) % pts.len()]);
    let normal = |a: Point, b: Point| {
        let len = a.distance(b);
        Vec2::new(-(b.y - a.y) / len, (b.x - a.x) / len)
    };
    let at = |p: Point, v: Vec2| Point::new(p.x + v.x, p.y + v.y);

    for i in 0..count {
        let (mut a, mut b) = segment(i);
        let n = normal(a, b);
        let dir = Vec2::new(n.y, -n.x);
        if !closed && paint.line_cap == LineCap::Square {
            if i == 0 {
                a = at(a, -dir * hw);
            }
            if i == count - 1 {
                b = at(b, dir * hw);
            }
        }
        pieces.push(vec![at(a, n * hw), at(b, n * hw), at(b, -n * hw), at(a, -n * hw)]);
    }

    let joints: Vec<usize> = if closed {
        (0..pts.len()).collect()
    } else {
        (1..pts.len() - 1).collect()
    };
    for j in joints {
        let prev = pts[(j + pts.len() - 1) % pts.len()];
        let p = pts[j];
        let next = pts[(j + 1) % pts.len()];
        let (n0, n1) = (normal(prev, p), normal(p, next));
        match paint.line_join {
            LineJoin::Round => pieces.push(circle(p, hw)),
            LineJoin::Bevel => {
                for side in [1.0, -1.0] {
                    pieces.push(vec![p, at(p, n0 * hw * side), at(p, n1 * hw * side)]);
                }
            }
            LineJoin::Miter => {
                let mid = n0 + n1;
                let cos = mid.length() / 2.0;
                for side in [1.0, -1.0] {
                    let outer0 = at(p, n0 * hw * side);
                    let outer1 = at(p, n1 * hw * side);
                    if cos > 1e-4 && 1.0 / cos <= paint.miter_limit {
                        let tip = at(p, mid.normalize() * (hw / cos) * side);
                        pieces.push(vec![p, outer0, tip, outer1]);
                    } else {
                        pieces.push(vec![p, outer0, outer1]);
                    }
                }
            }
        }
    }

    if !closed && paint.line_cap == LineCap::Round {
        pieces.push(circle(pts[0], hw));
        pieces.push(circle(pts[pts.len() - 1], hw));
    }

    for piece in pieces.iter_mut() {
        if signed_area(piece) < 0.0 {
            piece.reverse();
        }
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    fn painter() -> SoftPainter {
        let mut painter = SoftPainter::create(20, 20, 1.0).unwrap();
        painter.background(Color::WHITE).unwrap();
        painter
    }

    fn fill_only(color: Color) -> Paint {
        Paint {
            fill: Some(color),
            stroke: None,
            ..Paint::default()
        }
    }

    fn rgba(painter: &SoftPainter, x: u32, y: u32) -> [u8; 4] {
        painter.target().get_pixel(x, y).0
    }

    #[test]
    fn rect_fill_covers_whole_pixels() {
        let mut p = painter();
        p.rect(&fill_only(Color::BLACK), Rect::from((2.0, 2.0, 4.0, 4.0)), [0.0; 4])
            .unwrap();
        assert_eq!(rgba(&p, 3, 3), [0, 0, 0, 255]);
        assert_eq!(rgba(&p, 6, 6), [255, 255, 255, 255]);
        assert_eq!(rgba(&p, 1, 3), [255, 255, 255, 255]);
    }

    #[test]
    fn half_covered_pixels_are_mixed() {
        let mut p = painter();
        p.rect(&fill_only(Color::BLACK), Rect::from((2.5, 2.0, 4.0, 4.0)), [0.0; 4])
            .unwrap();
        let edge = rgba(&p, 2, 3)[0];
        assert!(edge > 100 && edge < 160, "edge {}", edge);
    }

    #[test]
    fn density_scales_geometry() {
        let mut p = SoftPainter::create(10, 10, 2.0).unwrap();
        assert_eq!(p.target().dimensions(), (20, 20));
        p.rect(&fill_only(Color::BLACK), Rect::from((0.0, 0.0, 5.0, 5.0)), [0.0; 4])
            .unwrap();
        assert_eq!(rgba(&p, 9, 9)[3], 255);
        assert_eq!(rgba(&p, 10, 10)[3], 0);
    }

    #[test]
    fn clip_limits_writes() {
        let mut p = painter();
        let paint = Paint {
            clip: Some(Rect::from((0.0, 0.0, 5.0, 20.0))),
            ..fill_only(Color::BLACK)
        };
        p.rect(&paint, Rect::from((0.0, 0.0, 20.0, 20.0)), [0.0; 4]).unwrap();
        assert_eq!(rgba(&p, 4, 10), [0, 0, 0, 255]);
        assert_eq!(rgba(&p, 5, 10), [255, 255, 255, 255]);
    }

    #[test]
    fn stroke_only_leaves_inside_untouched() {
        let mut p = painter();
        let paint = Paint {
            fill: None,
            stroke: Some(Color::BLACK),
            stroke_width: 2.0,
            ..Paint::default()
        };
        p.rect(&paint, Rect::from((4.0, 4.0, 12.0, 12.0)), [0.0; 4]).unwrap();
        assert_eq!(rgba(&p, 4, 10), [0, 0, 0, 255]);
        assert_eq!(rgba(&p, 10, 10), [255, 255, 255, 255]);
    }

    #[test]
    fn overlapping_stroke_pieces_blend_once() {
        let mut p = painter();
        let paint = Paint {
            fill: None,
            stroke: Some(Color::rgba(0.0, 0.0, 0.0, 0.5)),
            stroke_width: 4.0,
            line_join: LineJoin::Round,
            ..Paint::default()
        };
        let pts = [Point::new(2.0, 10.0), Point::new(10.0, 10.0), Point::new(10.0, 18.0)];
        p.lines(&paint, &pts, false).unwrap();
        let joint = rgba(&p, 10, 10)[0];
        let run = rgba(&p, 5, 10)[0];
        assert_eq!(joint, run);
    }

    #[test]
    fn translucent_fill_blends() {
        let mut p = painter();
        p.rect(&fill_only(Color::rgba(0.0, 0.0, 0.0, 0.5)), Rect::from((0.0, 0.0, 20.0, 20.0)), [0.0; 4])
            .unwrap();
        let v = rgba(&p, 10, 10)[0];
        assert!((126..=129).contains(&v), "got {}", v);
    }

    #[test]
    fn full_ellipse_and_pie() {
        let mut p = painter();
        p.ellipse(&fill_only(Color::BLACK), Rect::from((0.0, 0.0, 20.0, 20.0)), 0.0, 360.0)
            .unwrap();
        assert_eq!(rgba(&p, 10, 10)[0], 0);
        assert_eq!(rgba(&p, 0, 0)[0], 255);

        let mut p = painter();
        p.ellipse(&fill_only(Color::BLACK), Rect::from((0.0, 0.0, 20.0, 20.0)), 0.0, 90.0)
            .unwrap();
        assert_eq!(rgba(&p, 14, 5)[0], 0);
        assert_eq!(rgba(&p, 5, 14)[0], 255);
    }

    #[test]
    fn image_is_tinted_and_scaled() {
        let mut p = painter();
        let src = RgbaImage::from_pixel(2, 2, image::Rgba([255, 255, 255, 255]));
        let paint = fill_only(Color::rgb(1.0, 0.0, 0.0));
        p.image(&paint, &src, Rect::from((0.0, 0.0, 2.0, 2.0)), Rect::from((0.0, 0.0, 10.0, 10.0)))
            .unwrap();
        assert_eq!(rgba(&p, 9, 9), [255, 0, 0, 255]);
        assert_eq!(rgba(&p, 10, 10), [255, 255, 255, 255]);
    }

    #[test]
    fn image_runs_filter() {
        let mut p = painter();
        let src = RgbaImage::from_pixel(2, 2, image::Rgba([0, 0, 0, 255]));
        let paint = Paint {
            shader: Some(easel::Shader::create_filter(easel::FilterKind::Invert, None)),
            ..fill_only(Color::WHITE)
        };
        p.background(Color::BLACK).unwrap();
        p.image(&paint, &src, Rect::from((0.0, 0.0, 2.0, 2.0)), Rect::from((0.0, 0.0, 4.0, 4.0)))
            .unwrap();
        assert_eq!(rgba(&p, 1, 1), [255, 255, 255, 255]);
    }

    #[test]
    fn polygon_holes_use_even_odd() {
        let mut p = painter();
        let ring = |x: f32, y: f32, s: f32, hole: bool| easel::Contour {
            vertices: [(x, y), (x + s, y), (x + s, y + s), (x, y + s)]
                .iter()
                .map(|&(x, y)| Vertex::new(x, y, x, y, None))
                .collect(),
            closed: true,
            hole,
        };
        let polygon = Polygon {
            kind: ShapeType::Polygon,
            contours: vec![ring(0.0, 0.0, 20.0, false), ring(5.0, 5.0, 10.0, true)],
        };
        p.polygon(&fill_only(Color::BLACK), &polygon).unwrap();
        assert_eq!(rgba(&p, 2, 2)[0], 0);
        assert_eq!(rgba(&p, 10, 10)[0], 255);
    }

    #[test]
    fn write_pixels_checks_size() {
        let mut p = painter();
        assert!(p.write_pixels(&RgbaImage::new(3, 3)).is_err());
        let black = RgbaImage::from_pixel(20, 20, image::Rgba([0, 0, 0, 255]));
        p.write_pixels(&black).unwrap();
        assert_eq!(p.snapshot().unwrap(), black);
        assert!(SoftPainter::create(4, 4, 0.0).is_err());
    }
}
