#[macro_use]
extern crate bitflags;

mod builder;
pub mod calc;
mod color;
pub mod config;
mod context;
mod errors;
mod font;
mod graphics;
mod image;
mod math;
mod mode;
mod noise;
mod painter;
mod primitives;
mod random;
mod resources;
mod shader;
mod shape;
pub mod sketch;
mod style;
pub mod svg;
mod vector;

#[cfg(test)]
mod testing;

pub use crate::builder::{EndMode, ShapeBuilder};
pub use crate::color::*;
pub use crate::config::SketchConfig;
pub use crate::context::DrawingContext;
pub use crate::errors::*;
pub use crate::font::{Font, TextBounds};
pub use crate::graphics::Graphics;
pub use crate::image::{
    argb_to_pixel, color_to_pixel, pixel_to_argb, pixel_to_color, Image, ImageFormat, ImageSource,
};
pub use crate::math::*;
pub use crate::mode::*;
pub use crate::noise::Noise;
pub use crate::painter::{
    Align, Contour, LineCap, LineJoin, Paint, Painter, Polygon, ShapeType, Texture, Vertex,
};
pub use crate::random::Random;
pub use crate::shader::{Filter, FilterKind, Shader, Uniform};
pub use crate::shape::{Shape, ShapeKind, ShapeStyle};
pub use crate::sketch::{Context, Event, MouseButton, Sketch, Touch, Window};
pub use crate::vector::Vector;
