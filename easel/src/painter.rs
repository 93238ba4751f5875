use crate::color::{BlendMode, Color};
use crate::config::MITER_LIMIT;
use crate::errors::EaselError;
use crate::font::Font;
use crate::image::Image;
use crate::math::{Point, Rect, Transform};
use crate::mode::{TextureMode, TextureWrap};
use crate::shader::Shader;
use image::RgbaImage;
use std::str::FromStr;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LineJoin {
    Miter,
    Round,
    Bevel,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LineCap {
    Butt,
    Round,
    Square,
}

impl FromStr for LineCap {
    type Err = EaselError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Processing spells a flat cap SQUARE and an extended one PROJECT
        match s.to_ascii_lowercase().as_str() {
            "butt" | "square" => Ok(LineCap::Butt),
            "round" => Ok(LineCap::Round),
            "project" => Ok(LineCap::Square),
            _ => Err(EaselError::argument(format!("invalid stroke cap: {}", s))),
        }
    }
}

impl FromStr for LineJoin {
    type Err = EaselError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "miter" => Ok(LineJoin::Miter),
            "round" => Ok(LineJoin::Round),
            "bevel" => Ok(LineJoin::Bevel),
            _ => Err(EaselError::argument(format!("invalid stroke join: {}", s))),
        }
    }
}

bitflags! {
    pub struct Align: u32 {
        const LEFT = 0x1;
        const CENTER = 0x2;
        const RIGHT = 0x4;
        const TOP = 0x8;
        const MIDDLE = 0x10;
        const BOTTOM = 0x20;
        const BASELINE = 0x40;
    }
}

/// Primitive topology of a built shape.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShapeType {
    Points,
    Lines,
    Triangles,
    TriangleFan,
    TriangleStrip,
    Quads,
    QuadStrip,
    Tess,
    Polygon,
}

impl Default for ShapeType {
    fn default() -> Self {
        ShapeType::Polygon
    }
}

impl FromStr for ShapeType {
    type Err = EaselError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "points" => ShapeType::Points,
            "lines" => ShapeType::Lines,
            "triangles" => ShapeType::Triangles,
            "triangle_fan" => ShapeType::TriangleFan,
            "triangle_strip" => ShapeType::TriangleStrip,
            "quads" => ShapeType::Quads,
            "quad_strip" => ShapeType::QuadStrip,
            "tess" => ShapeType::Tess,
            "polygon" => ShapeType::Polygon,
            _ => return Err(EaselError::argument(format!("invalid polygon type '{}'", s))),
        })
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vertex {
    pub x: f32,
    pub y: f32,
    pub u: f32,
    pub v: f32,
    /// Fill in effect when the vertex was added.
    pub color: Option<Color>,
}

impl Vertex {
    pub fn new(x: f32, y: f32, u: f32, v: f32, color: Option<Color>) -> Vertex {
        Vertex { x, y, u, v, color }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// One ring of a polygon. Holes are always closed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contour {
    pub vertices: Vec<Vertex>,
    pub closed: bool,
    pub hole: bool,
}

/// Vertex data handed to a painter; `kind` decides how `contours[0]` is
/// split into primitives. Holes only apply to `Polygon` and `Tess`.
///
/// Per-vertex colors are used for the fill unless a texture is bound, in
/// which case the paint's fill color tints the texels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polygon {
    pub kind: ShapeType,
    pub contours: Vec<Contour>,
}

impl Polygon {
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.contours
            .iter()
            .flat_map(|c| c.vertices.iter().map(Vertex::point))
    }

    pub fn is_empty(&self) -> bool {
        self.contours.iter().all(|c| c.vertices.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    pub image: Image,
    pub mode: TextureMode,
    pub wrap: TextureWrap,
}

/// Everything a painter needs to know about how to draw one primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct Paint {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f32,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub miter_limit: f32,
    pub xform: Transform,
    /// Device-space clip, already transformed.
    pub clip: Option<Rect>,
    pub blend: BlendMode,
    pub texture: Option<Texture>,
    pub shader: Option<Shader>,
}

impl Default for Paint {
    fn default() -> Self {
        Paint {
            fill: Some(Color::WHITE),
            stroke: Some(Color::BLACK),
            stroke_width: 1.0,
            line_cap: LineCap::Round,
            line_join: LineJoin::Miter,
            miter_limit: MITER_LIMIT,
            xform: Transform::identity(),
            clip: None,
            blend: BlendMode::Blend,
            texture: None,
            shader: None,
        }
    }
}

impl Paint {
    pub fn is_visible(&self) -> bool {
        self.fill.is_some() || self.stroke.is_some()
    }
}

/// Rasterizing backend a drawing context issues primitives against.
///
/// Coordinates are logical; the painter scales by its pixel density.
/// Angles given to `ellipse` are degrees, counter-clockwise on screen.
pub trait Painter {
    fn begin_paint(&mut self) -> Result<(), EaselError>;

    fn end_paint(&mut self) -> Result<(), EaselError>;

    fn width(&self) -> u32;

    fn height(&self) -> u32;

    fn pixel_density(&self) -> f32;

    /// Replaces every pixel, ignoring clip and blend mode.
    fn background(&mut self, color: Color) -> Result<(), EaselError>;

    fn points(&mut self, paint: &Paint, points: &[Point]) -> Result<(), EaselError>;

    fn lines(&mut self, paint: &Paint, points: &[Point], closed: bool) -> Result<(), EaselError>;

    /// Corner radii run top-left, top-right, bottom-right, bottom-left.
    fn rect(&mut self, paint: &Paint, rect: Rect, radii: [f32; 4]) -> Result<(), EaselError>;

    fn ellipse(&mut self, paint: &Paint, rect: Rect, from: f32, to: f32) -> Result<(), EaselError>;

    fn polygon(&mut self, paint: &Paint, polygon: &Polygon) -> Result<(), EaselError>;

    /// `pos` is the top-left corner of the line box.
    fn text(&mut self, paint: &Paint, font: &Font, text: &str, pos: Point) -> Result<(), EaselError>;

    fn image(
        &mut self,
        paint: &Paint,
        image: &RgbaImage,
        src: Rect,
        dst: Rect,
    ) -> Result<(), EaselError>;

    /// Device pixels of the render target.
    fn snapshot(&self) -> Result<RgbaImage, EaselError>;

    fn write_pixels(&mut self, pixels: &RgbaImage) -> Result<(), EaselError>;

    /// A new painter of the same kind with its own render target.
    fn offscreen(&self, width: u32, height: u32, density: f32) -> Result<Self, EaselError>
    where
        Self: Sized;
}
