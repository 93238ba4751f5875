use crate::context::DrawingContext;
use crate::errors::EaselError;
use crate::font::Font;
use crate::image::ImageSource;
use crate::painter::Painter;
use crate::shader::Shader;
use image::RgbaImage;
use std::ops::{Deref, DerefMut};

/// An offscreen canvas.
///
/// `begin_draw` also opens the painter and pushes the matrix and style, so
/// everything set between `begin_draw` and `end_draw` is undone afterwards.
pub struct Graphics<P: Painter> {
    context: DrawingContext<P>,
}

impl<P: Painter> Graphics<P> {
    pub fn new(painter: P) -> Graphics<P> {
        Graphics {
            context: DrawingContext::new(painter),
        }
    }

    pub fn with_font(painter: P, font: Font) -> Graphics<P> {
        Graphics {
            context: DrawingContext::with_font(painter, font),
        }
    }

    pub fn begin_draw(&mut self) -> Result<(), EaselError> {
        self.context.painter.begin_paint()?;
        self.context.begin_draw()?;
        self.context.push()
    }

    /// Closes the draw even when the stacks were unbalanced by the caller;
    /// the underflow is still reported.
    pub fn end_draw(&mut self) -> Result<(), EaselError> {
        let popped = self.context.pop();
        self.context.end_draw()?;
        self.context.painter.end_paint()?;
        popped
    }

    /// Runs `f` inside `begin_draw`/`end_draw`. The draw is ended even when
    /// `f` fails.
    pub fn draw<R, F>(&mut self, f: F) -> Result<R, EaselError>
    where
        F: FnOnce(&mut DrawingContext<P>) -> Result<R, EaselError>,
    {
        self.begin_draw()?;
        let result = f(&mut self.context);
        let ended = self.end_draw();
        let value = result?;
        ended?;
        Ok(value)
    }

    pub fn into_inner(self) -> DrawingContext<P> {
        self.context
    }
}

impl<P: Painter> Deref for Graphics<P> {
    type Target = DrawingContext<P>;

    fn deref(&self) -> &Self::Target {
        &self.context
    }
}

impl<P: Painter> DerefMut for Graphics<P> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.context
    }
}

impl<P: Painter> ImageSource for Graphics<P> {
    fn source_size(&self) -> (f32, f32) {
        self.context.source_size()
    }

    fn source_density(&self) -> f32 {
        self.context.source_density()
    }

    fn source_raster(&self) -> Result<RgbaImage, EaselError> {
        self.context.source_raster()
    }

    fn source_filter(&self) -> Option<Shader> {
        self.context.source_filter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::context::DrawingContext;
    use crate::shader::{FilterKind, Shader};
    use crate::testing::{Call, RecordingPainter};

    #[test]
    fn draw_brackets_painter_and_restores_state() {
        let mut g = Graphics::new(RecordingPainter::new(10, 10));
        g.draw(|ctx| {
            ctx.translate(3.0, 3.0)?;
            ctx.fill(0)?;
            ctx.rect(0.0, 0.0, 1.0, 1.0)
        })
        .unwrap();
        assert!(!g.is_drawing());
        assert_eq!(g.get_fill(), Some(Color::WHITE));
        assert_eq!(g.painter().calls.first(), Some(&Call::BeginPaint));
        assert_eq!(g.painter().calls.last(), Some(&Call::EndPaint));
    }

    #[test]
    fn draw_ends_even_on_error() {
        let mut g = Graphics::new(RecordingPainter::new(10, 10));
        let result: Result<(), _> = g.draw(|ctx| ctx.pop_style().and_then(|_| ctx.pop_style()));
        assert!(matches!(result, Err(crate::errors::EaselError::StackUnderflow("style"))));
        assert!(!g.is_drawing());
        g.begin_draw().unwrap();
    }

    #[test]
    fn drawn_into_context_with_filter() {
        let mut g = Graphics::new(RecordingPainter::new(4, 4));
        g.filter(FilterKind::Invert, None);
        let mut ctx = DrawingContext::new(RecordingPainter::new(10, 10));
        ctx.begin_draw().unwrap();
        ctx.image(&g, 1.0, 1.0).unwrap();
        match ctx.painter().calls.last() {
            Some(Call::Image(paint, size, _, _)) => {
                assert_eq!(*size, (4, 4));
                assert_eq!(paint.shader.as_ref(), g.get_filter());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn custom_filter_shader_reaches_painter() {
        let shader = Shader::new(None, "void main() { gl_FragColor = vec4(1.0); }").unwrap();
        let mut g = Graphics::new(RecordingPainter::new(4, 4));
        g.set_filter(Some(shader.clone()));
        let mut ctx = DrawingContext::new(RecordingPainter::new(10, 10));
        ctx.begin_draw().unwrap();
        ctx.image(&g, 0.0, 0.0).unwrap();
        assert!(matches!(ctx.painter().calls.last(), Some(Call::Image(paint, ..)) if paint.shader.as_ref() == Some(&shader)));

        g.set_filter(None);
        ctx.image(&g, 0.0, 0.0).unwrap();
        assert!(matches!(ctx.painter().calls.last(), Some(Call::Image(paint, ..)) if paint.shader.is_none()));
    }
}
