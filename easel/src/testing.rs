//! Painter double that records every call, for unit tests.

use crate::color::Color;
use crate::errors::EaselError;
use crate::font::Font;
use crate::image::color_to_pixel;
use crate::math::{Point, Rect};
use crate::painter::{Paint, Painter, Polygon};
use image::RgbaImage;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    BeginPaint,
    EndPaint,
    Background(Color),
    Points(Paint, Vec<Point>),
    Lines(Paint, Vec<Point>, bool),
    Rect(Paint, Rect, [f32; 4]),
    Ellipse(Paint, Rect, f32, f32),
    Polygon(Paint, Polygon),
    Text(Paint, String, Point),
    Image(Paint, (u32, u32), Rect, Rect),
    WritePixels,
}

pub struct RecordingPainter {
    pub width: u32,
    pub height: u32,
    pub density: f32,
    pub calls: Vec<Call>,
    pub target: RgbaImage,
}

impl RecordingPainter {
    pub fn new(width: u32, height: u32) -> RecordingPainter {
        RecordingPainter::with_density(width, height, 1.0)
    }

    pub fn with_density(width: u32, height: u32, density: f32) -> RecordingPainter {
        RecordingPainter {
            width,
            height,
            density,
            calls: Vec::new(),
            target: RgbaImage::new(
                (width as f32 * density) as u32,
                (height as f32 * density) as u32,
            ),
        }
    }
}

impl Painter for RecordingPainter {
    fn begin_paint(&mut self) -> Result<(), EaselError> {
        self.calls.push(Call::BeginPaint);
        Ok(())
    }

    fn end_paint(&mut self) -> Result<(), EaselError> {
        self.calls.push(Call::EndPaint);
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
        for px in self.target.pixels_mut() {
            *px = color_to_pixel(color);
        }
        self.calls.push(Call::Background(color));
        Ok(())
    }

    fn points(&mut self, paint: &Paint, points: &[Point]) -> Result<(), EaselError> {
        self.calls.push(Call::Points(paint.clone(), points.to_vec()));
        Ok(())
    }

    fn lines(&mut self, paint: &Paint, points: &[Point], closed: bool) -> Result<(), EaselError> {
        self.calls
            .push(Call::Lines(paint.clone(), points.to_vec(), closed));
        Ok(())
    }

    fn rect(&mut self, paint: &Paint, rect: Rect, radii: [f32; 4]) -> Result<(), EaselError> {
        self.calls.push(Call::Rect(paint.clone(), rect, radii));
        Ok(())
    }

    fn ellipse(&mut self, paint: &Paint, rect: Rect, from: f32, to: f32) -> Result<(), EaselError> {
        self.calls.push(Call::Ellipse(paint.clone(), rect, from, to));
        Ok(())
    }

    fn polygon(&mut self, paint: &Paint, polygon: &Polygon) -> Result<(), EaselError> {
        self.calls.push(Call::Polygon(paint.clone(), polygon.clone()));
        Ok(())
    }

    fn text(&mut self, paint: &Paint, _font: &Font, text: &str, pos: Point) -> Result<(), EaselError> {
        self.calls
            .push(Call::Text(paint.clone(), text.to_string(), pos));
        Ok(())
    }

    fn image(
        &mut self,
        paint: &Paint,
        image: &RgbaImage,
        src: Rect,
        dst: Rect,
    ) -> Result<(), EaselError> {
        self.calls.push(Call::Image(
            paint.clone(),
            (image.width(), image.height()),
            src,
            dst,
        ));
        Ok(())
    }

    fn snapshot(&self) -> Result<RgbaImage, EaselError> {
        Ok(self.target.clone())
    }

    fn write_pixels(&mut self, pixels: &RgbaImage) -> Result<(), EaselError> {
        self.target = pixels.clone();
        self.calls.push(Call::WritePixels);
        Ok(())
    }

    fn offscreen(&self, width: u32, height: u32, density: f32) -> Result<Self, EaselError> {
        Ok(RecordingPainter::with_density(width, height, density))
    }
}
