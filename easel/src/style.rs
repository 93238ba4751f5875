use crate::color::{BlendMode, Color, ColorModel};
use crate::config::*;
use crate::font::Font;
use crate::image::Image;
use crate::math::{Rect, Transform};
use crate::mode::{AngleMode, CoordMode, TextureMode, TextureWrap};
use crate::painter::{Align, LineCap, LineJoin, Paint, Texture};
use crate::shader::Shader;

/// Every style field a drawing context saves with `push_style`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Style {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f32,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub miter_limit: f32,
    pub clip: Option<Rect>,
    pub blend: BlendMode,
    pub font: Font,
    pub text_align: Align,
    pub texture: Option<Image>,
    pub texture_mode: TextureMode,
    pub texture_wrap: TextureWrap,
    pub shader: Option<Shader>,
    pub tint: Option<Color>,
    pub color: ColorModel,
    pub angle_mode: AngleMode,
    pub rect_mode: CoordMode,
    pub ellipse_mode: CoordMode,
    pub image_mode: CoordMode,
    pub shape_mode: CoordMode,
    pub curve_detail: usize,
    pub curve_tightness: f32,
    pub bezier_detail: usize,
}

impl Style {
    pub fn new(font: Font) -> Style {
        Style {
            fill: Some(Color::WHITE),
            stroke: Some(Color::BLACK),
            stroke_width: 1.0,
            line_cap: LineCap::Round,
            line_join: LineJoin::Miter,
            miter_limit: MITER_LIMIT,
            clip: None,
            blend: BlendMode::Blend,
            font,
            text_align: Align::LEFT | Align::BASELINE,
            texture: None,
            texture_mode: TextureMode::Image,
            texture_wrap: TextureWrap::Clamp,
            shader: None,
            tint: None,
            color: ColorModel::default(),
            angle_mode: AngleMode::Radians,
            rect_mode: CoordMode::Corner,
            ellipse_mode: CoordMode::Center,
            image_mode: CoordMode::Corner,
            shape_mode: CoordMode::Corner,
            curve_detail: CURVE_DETAIL_DEFAULT,
            curve_tightness: 0.0,
            bezier_detail: BEZIER_DETAIL_DEFAULT,
        }
    }

    pub fn paint(&self, xform: Transform) -> Paint {
        Paint {
            fill: self.fill,
            stroke: self.stroke,
            stroke_width: self.stroke_width,
            line_cap: self.line_cap,
            line_join: self.line_join,
            miter_limit: self.miter_limit,
            xform,
            clip: self.clip,
            blend: self.blend,
            texture: self.texture.as_ref().map(|image| Texture {
                image: image.clone(),
                mode: self.texture_mode,
                wrap: self.texture_wrap,
            }),
            shader: self.shader.clone(),
        }
    }

    /// Paint for images and textured shapes: the tint replaces the fill.
    pub fn tinted_paint(&self, xform: Transform) -> Paint {
        Paint {
            fill: Some(self.tint.unwrap_or(Color::WHITE)),
            ..self.paint(xform)
        }
    }

    /// Explicit shaders win over the filter of the image being drawn.
    pub fn shader_or(&self, filter: Option<Shader>) -> Option<Shader> {
        self.shader.clone().or(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let style = Style::new(Font::fallback(FONT_SIZE_DEFAULT));
        assert_eq!(style.fill, Some(Color::WHITE));
        assert_eq!(style.stroke, Some(Color::BLACK));
        assert_eq!(style.ellipse_mode, CoordMode::Center);
        assert_eq!(style.rect_mode, CoordMode::Corner);
        assert_eq!(style.font.size(), FONT_SIZE_DEFAULT);
        assert_eq!(style.text_align, Align::LEFT | Align::BASELINE);
    }

    #[test]
    fn tint_replaces_fill() {
        let mut style = Style::new(Font::fallback(FONT_SIZE_DEFAULT));
        style.fill = Some(Color::BLACK);
        assert_eq!(style.tinted_paint(Transform::identity()).fill, Some(Color::WHITE));
        style.tint = Some(Color::rgb(1.0, 0.0, 0.0));
        assert_eq!(
            style.tinted_paint(Transform::identity()).fill,
            Some(Color::rgb(1.0, 0.0, 0.0))
        );
    }

    #[test]
    fn shader_takes_priority_over_filter() {
        use crate::shader::FilterKind;
        let mut style = Style::new(Font::fallback(FONT_SIZE_DEFAULT));
        let filter = Shader::create_filter(FilterKind::Gray, None);
        assert_eq!(style.shader_or(Some(filter.clone())), Some(filter.clone()));
        let explicit = Shader::create_filter(FilterKind::Invert, None);
        style.shader = Some(explicit.clone());
        assert_eq!(style.shader_or(Some(filter)), Some(explicit));
    }
}
