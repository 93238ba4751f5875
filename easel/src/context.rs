use crate::builder::ShapeBuilder;
use crate::calc;
use crate::color::{BlendMode, Color, ColorMode, ColorModel, ColorSpec};
use crate::config::*;
use crate::errors::EaselError;
use crate::font::Font;
use crate::image::{argb_to_pixel, pixel_to_argb, Image, ImageSource};
use crate::math::{Bounds, Rect, Transform};
use crate::mode::{AngleMode, CoordMode, TextureMode, TextureWrap};
use crate::noise::Noise;
use crate::painter::{Align, LineCap, LineJoin, Painter};
use crate::random::{clock_seed, Random};
use crate::shader::{FilterKind, Shader};
use crate::style::Style;
use image::RgbaImage;
use std::path::Path;

/// Immediate-mode drawing state on top of a [`Painter`].
///
/// Primitives and stack operations are only accepted between
/// [`begin_draw`](DrawingContext::begin_draw) and
/// [`end_draw`](DrawingContext::end_draw). Style persists across frames; the
/// matrix and both stacks are reset by `begin_draw`.
pub struct DrawingContext<P: Painter> {
    pub(crate) painter: P,
    pub(crate) drawing: bool,
    pub(crate) matrix: Transform,
    pub(crate) matrix_stack: Vec<Transform>,
    pub(crate) style: Style,
    pub(crate) style_stack: Vec<Style>,
    pub(crate) filter: Option<Shader>,
    pub(crate) shape: Option<ShapeBuilder>,
    pub(crate) pixels: Option<Vec<u32>>,
    pub(crate) noise: Noise,
    pub(crate) random: Random,
}

impl<P: Painter> DrawingContext<P> {
    pub fn new(painter: P) -> DrawingContext<P> {
        DrawingContext::with_font(painter, Font::builtin(FONT_SIZE_DEFAULT))
    }

    pub fn with_font(painter: P, font: Font) -> DrawingContext<P> {
        let seed = clock_seed();
        DrawingContext {
            painter,
            drawing: false,
            matrix: Transform::identity(),
            matrix_stack: Vec::new(),
            style: Style::new(font),
            style_stack: Vec::new(),
            filter: None,
            shape: None,
            pixels: None,
            noise: Noise::new(seed),
            random: Random::new(seed),
        }
    }

    pub fn painter(&self) -> &P {
        &self.painter
    }

    pub fn painter_mut(&mut self) -> &mut P {
        &mut self.painter
    }

    /// Swaps the render target, keeping every style setting.
    pub fn replace_painter(&mut self, painter: P) -> P {
        self.pixels = None;
        std::mem::replace(&mut self.painter, painter)
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    pub fn begin_draw(&mut self) -> Result<(), EaselError> {
        if self.drawing {
            return Err(EaselError::state("begin_draw() cannot be called twice"));
        }
        self.matrix_stack.clear();
        self.style_stack.clear();
        self.matrix = Transform::identity();
        self.drawing = true;
        Ok(())
    }

    pub fn end_draw(&mut self) -> Result<(), EaselError> {
        if !self.drawing {
            return Err(EaselError::state("end_draw() called without begin_draw()"));
        }
        self.drawing = false;
        Ok(())
    }

    pub(crate) fn assert_drawing(&self) -> Result<(), EaselError> {
        if !self.drawing {
            return Err(EaselError::state("call begin_draw() before drawing"));
        }
        Ok(())
    }

    pub fn width(&self) -> f32 {
        self.painter.width() as f32
    }

    pub fn height(&self) -> f32 {
        self.painter.height() as f32
    }

    pub fn pixel_width(&self) -> u32 {
        (self.width() * self.pixel_density()).round() as u32
    }

    pub fn pixel_height(&self) -> u32 {
        (self.height() * self.pixel_density()).round() as u32
    }

    pub fn pixel_density(&self) -> f32 {
        self.painter.pixel_density()
    }

    // Color

    /// `maxes` takes 0, 1, 3 or 4 values.
    pub fn color_mode(&mut self, mode: ColorMode, maxes: &[f32]) -> Result<(), EaselError> {
        self.style.color.set(mode, maxes)
    }

    pub fn get_color_mode(&self) -> ColorMode {
        self.style.color.mode()
    }

    pub fn color_model(&self) -> &ColorModel {
        &self.style.color
    }

    /// Packed `0xAARRGGBB` under the current color mode.
    pub fn color<C: Into<ColorSpec>>(&self, spec: C) -> Result<u32, EaselError> {
        self.style.color.pack(spec)
    }

    pub(crate) fn to_color<C: Into<ColorSpec>>(&self, spec: C) -> Result<Color, EaselError> {
        self.style.color.to_color(spec)
    }

    pub fn red(&self, color: u32) -> f32 {
        self.style.color.red(color)
    }

    pub fn green(&self, color: u32) -> f32 {
        self.style.color.green(color)
    }

    pub fn blue(&self, color: u32) -> f32 {
        self.style.color.blue(color)
    }

    pub fn alpha(&self, color: u32) -> f32 {
        self.style.color.alpha(color)
    }

    pub fn lerp_color(&self, c1: u32, c2: u32, amount: f32) -> Result<u32, EaselError> {
        self.style.color.lerp_color(c1, c2, amount)
    }

    // Modes

    pub fn angle_mode(&mut self, mode: AngleMode) {
        self.style.angle_mode = mode;
    }

    pub fn get_angle_mode(&self) -> AngleMode {
        self.style.angle_mode
    }

    pub fn rect_mode(&mut self, mode: CoordMode) {
        self.style.rect_mode = mode;
    }

    pub fn ellipse_mode(&mut self, mode: CoordMode) {
        self.style.ellipse_mode = mode;
    }

    pub fn image_mode(&mut self, mode: CoordMode) -> Result<(), EaselError> {
        self.style.image_mode = mode.check_placement("image")?;
        Ok(())
    }

    pub fn shape_mode(&mut self, mode: CoordMode) -> Result<(), EaselError> {
        self.style.shape_mode = mode.check_placement("shape")?;
        Ok(())
    }

    pub fn blend_mode(&mut self, mode: BlendMode) {
        self.style.blend = mode;
    }

    pub fn get_blend_mode(&self) -> BlendMode {
        self.style.blend
    }

    // Style

    pub fn fill<C: Into<ColorSpec>>(&mut self, spec: C) -> Result<(), EaselError> {
        self.style.fill = Some(self.to_color(spec)?);
        Ok(())
    }

    pub fn no_fill(&mut self) {
        self.style.fill = None;
    }

    pub fn get_fill(&self) -> Option<Color> {
        self.style.fill
    }

    pub fn stroke<C: Into<ColorSpec>>(&mut self, spec: C) -> Result<(), EaselError> {
        self.style.stroke = Some(self.to_color(spec)?);
        Ok(())
    }

    pub fn no_stroke(&mut self) {
        self.style.stroke = None;
    }

    pub fn get_stroke(&self) -> Option<Color> {
        self.style.stroke
    }

    pub fn stroke_weight(&mut self, weight: f32) {
        self.style.stroke_width = weight;
    }

    pub fn stroke_cap(&mut self, cap: LineCap) {
        self.style.line_cap = cap;
    }

    pub fn stroke_join(&mut self, join: LineJoin) {
        self.style.line_join = join;
    }

    pub fn curve_detail(&mut self, detail: usize) {
        self.style.curve_detail = detail.max(CURVE_DETAIL_MIN);
    }

    pub fn curve_tightness(&mut self, tightness: f32) {
        self.style.curve_tightness = tightness;
    }

    pub fn bezier_detail(&mut self, detail: usize) {
        self.style.bezier_detail = detail.max(BEZIER_DETAIL_MIN);
    }

    pub fn tint<C: Into<ColorSpec>>(&mut self, spec: C) -> Result<(), EaselError> {
        self.style.tint = Some(self.to_color(spec)?);
        Ok(())
    }

    pub fn no_tint(&mut self) {
        self.style.tint = None;
    }

    /// Limits drawing to a box placed through `image_mode` under the
    /// current matrix.
    pub fn clip(&mut self, a: f32, b: f32, c: f32, d: f32) {
        let (x, y, w, h) = self.style.image_mode.to_xywh(a, b, c, d);
        let corners = Rect::from((x, y, w, h)).corners();
        let xform = self.matrix;
        self.style.clip =
            Bounds::from_points(corners.iter().map(|&pt| xform.transform_point(pt))).map(|b| b.to_rect());
    }

    pub fn no_clip(&mut self) {
        self.style.clip = None;
    }

    // Text

    /// Sizes above the maximum font size are clamped.
    pub fn text_font(&mut self, font: &Font, size: Option<f32>) {
        self.style.font = match size {
            Some(size) => font.with_size(size),
            None => font.clone(),
        };
    }

    pub fn text_size(&mut self, size: f32) {
        self.style.font = self.style.font.with_size(size);
    }

    pub fn get_text_font(&self) -> &Font {
        &self.style.font
    }

    pub fn text_width(&self, text: &str) -> f32 {
        self.style.font.width(text)
    }

    pub fn text_ascent(&self) -> f32 {
        self.style.font.ascent()
    }

    pub fn text_descent(&self) -> f32 {
        self.style.font.descent()
    }

    /// Vertical alignment defaults to the baseline; `CENTER` is accepted
    /// for either axis.
    pub fn text_align(&mut self, horizontal: Align, vertical: Option<Align>) {
        let horizontal = horizontal & (Align::LEFT | Align::CENTER | Align::RIGHT);
        let vertical = match vertical.unwrap_or(Align::BASELINE) {
            v if v.contains(Align::CENTER) => Align::MIDDLE,
            v => v & (Align::TOP | Align::MIDDLE | Align::BOTTOM | Align::BASELINE),
        };
        self.style.text_align = horizontal | vertical;
    }

    // Textures and shaders

    pub fn texture(&mut self, image: Option<&Image>) {
        self.style.texture = image.cloned();
    }

    pub fn texture_mode(&mut self, mode: TextureMode) {
        self.style.texture_mode = mode;
    }

    pub fn texture_wrap(&mut self, wrap: TextureWrap) {
        self.style.texture_wrap = wrap;
    }

    pub fn shader(&mut self, shader: Option<&Shader>) {
        self.style.shader = shader.cloned();
    }

    pub fn reset_shader(&mut self) {
        self.style.shader = None;
    }

    /// Filter applied when this context is drawn as an image, or presented
    /// when it is a window canvas.
    pub fn filter(&mut self, kind: FilterKind, param: Option<f32>) {
        self.filter = Some(Shader::create_filter(kind, param));
    }

    /// Any shader, or `None` to stop filtering.
    pub fn set_filter(&mut self, shader: Option<Shader>) {
        self.filter = shader;
    }

    pub fn get_filter(&self) -> Option<&Shader> {
        self.filter.as_ref()
    }

    // Transforms

    fn transform(&mut self, xform: Transform) -> Result<(), EaselError> {
        self.assert_drawing()?;
        self.matrix = xform * self.matrix;
        Ok(())
    }

    pub fn translate(&mut self, x: f32, y: f32) -> Result<(), EaselError> {
        self.transform(Transform::translate(x, y))
    }

    pub fn scale(&mut self, x: f32, y: Option<f32>) -> Result<(), EaselError> {
        self.transform(Transform::scale(x, y.unwrap_or(x)))
    }

    pub fn rotate(&mut self, angle: f32) -> Result<(), EaselError> {
        let radians = self.style.angle_mode.to_radians(angle);
        self.transform(Transform::rotate(radians))
    }

    pub fn shear_x(&mut self, angle: f32) -> Result<(), EaselError> {
        let radians = self.style.angle_mode.to_radians(angle);
        self.transform(Transform::skew_x(radians))
    }

    pub fn shear_y(&mut self, angle: f32) -> Result<(), EaselError> {
        let radians = self.style.angle_mode.to_radians(angle);
        self.transform(Transform::skew_y(radians))
    }

    pub fn apply_matrix(&mut self, xform: Transform) -> Result<(), EaselError> {
        self.transform(xform)
    }

    pub fn reset_matrix(&mut self) -> Result<(), EaselError> {
        self.assert_drawing()?;
        self.matrix = Transform::identity();
        Ok(())
    }

    pub fn get_matrix(&self) -> Transform {
        self.matrix
    }

    // Stacks

    pub fn push_matrix(&mut self) -> Result<(), EaselError> {
        self.assert_drawing()?;
        self.matrix_stack.push(self.matrix);
        Ok(())
    }

    pub fn pop_matrix(&mut self) -> Result<(), EaselError> {
        self.assert_drawing()?;
        self.matrix = self
            .matrix_stack
            .pop()
            .ok_or(EaselError::StackUnderflow("matrix"))?;
        Ok(())
    }

    pub fn push_style(&mut self) -> Result<(), EaselError> {
        self.assert_drawing()?;
        self.style_stack.push(self.style.clone());
        Ok(())
    }

    pub fn pop_style(&mut self) -> Result<(), EaselError> {
        self.assert_drawing()?;
        self.style = self
            .style_stack
            .pop()
            .ok_or(EaselError::StackUnderflow("style"))?;
        Ok(())
    }

    pub fn push(&mut self) -> Result<(), EaselError> {
        self.push_matrix()?;
        self.push_style()
    }

    /// Unwinds the matrix first, then the style.
    pub fn pop(&mut self) -> Result<(), EaselError> {
        self.pop_matrix()?;
        self.pop_style()
    }

    pub fn push_matrix_with<R, F>(&mut self, f: F) -> Result<R, EaselError>
    where
        F: FnOnce(&mut Self) -> Result<R, EaselError>,
    {
        self.push_matrix()?;
        let result = f(self);
        let popped = self.pop_matrix();
        let value = result?;
        popped?;
        Ok(value)
    }

    pub fn push_style_with<R, F>(&mut self, f: F) -> Result<R, EaselError>
    where
        F: FnOnce(&mut Self) -> Result<R, EaselError>,
    {
        self.push_style()?;
        let result = f(self);
        let popped = self.pop_style();
        let value = result?;
        popped?;
        Ok(value)
    }

    /// Runs `f` between `push` and `pop`; the pop happens even when `f`
    /// fails, and `f`'s error is the one returned.
    pub fn push_with<R, F>(&mut self, f: F) -> Result<R, EaselError>
    where
        F: FnOnce(&mut Self) -> Result<R, EaselError>,
    {
        self.push()?;
        let result = f(self);
        let popped = self.pop();
        let value = result?;
        popped?;
        Ok(value)
    }

    // Pixels

    pub fn load_pixels(&mut self) -> Result<(), EaselError> {
        let snapshot = self.painter.snapshot()?;
        self.pixels = Some(snapshot.pixels().map(pixel_to_argb).collect());
        Ok(())
    }

    /// Packed ARGB in device pixels; `None` until `load_pixels`.
    pub fn pixels(&self) -> Option<&[u32]> {
        self.pixels.as_deref()
    }

    pub fn pixels_mut(&mut self) -> Option<&mut [u32]> {
        self.pixels.as_deref_mut()
    }

    /// Writes the snapshot back to the target and drops it.
    pub fn update_pixels(&mut self) -> Result<(), EaselError> {
        let pixels = match self.pixels.take() {
            Some(pixels) => pixels,
            None => return Ok(()),
        };
        let mut target = self.painter.snapshot()?;
        for (px, argb) in target.pixels_mut().zip(pixels) {
            *px = argb_to_pixel(argb);
        }
        self.painter.write_pixels(&target)
    }

    pub fn update_pixels_with<F: FnOnce(&mut [u32])>(&mut self, f: F) -> Result<(), EaselError> {
        self.load_pixels()?;
        if let Some(pixels) = self.pixels.as_mut() {
            f(pixels);
        }
        self.update_pixels()
    }

    pub fn save<Q: AsRef<Path>>(&self, path: Q) -> Result<(), EaselError> {
        let path = path.as_ref();
        self.painter.snapshot()?.save(path)?;
        log::debug!("saved canvas to {:?}", path);
        Ok(())
    }

    // Noise and randomness

    pub fn noise(&self, x: f32, y: f32, z: f32) -> f32 {
        self.noise.sample(x, y, z)
    }

    pub fn noise_seed(&mut self, seed: u64) {
        self.noise.seed(seed);
    }

    pub fn noise_detail(&mut self, octaves: i32, falloff: Option<f32>) {
        self.noise.detail(octaves, falloff);
    }

    /// Uniform in `[0, 1)`.
    pub fn random(&mut self) -> f32 {
        self.random.next_f32()
    }

    pub fn random_to(&mut self, high: f32) -> f32 {
        self.random.range(0.0, high)
    }

    pub fn random_range(&mut self, low: f32, high: f32) -> f32 {
        self.random.range(low, high)
    }

    /// `None` for an empty slice.
    pub fn random_choice<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        self.random.choose(items)
    }

    pub fn random_seed(&mut self, seed: u64) {
        self.random.seed(seed);
    }

    // Curves

    pub fn curve_point(&self, a: f32, b: f32, c: f32, d: f32, t: f32) -> f32 {
        calc::curve_point(self.style.curve_tightness, a, b, c, d, t)
    }

    pub fn curve_tangent(&self, a: f32, b: f32, c: f32, d: f32, t: f32) -> f32 {
        calc::curve_tangent(self.style.curve_tightness, a, b, c, d, t)
    }

    pub fn bezier_point(&self, a: f32, b: f32, c: f32, d: f32, t: f32) -> f32 {
        calc::bezier_point(a, b, c, d, t)
    }

    pub fn bezier_tangent(&self, a: f32, b: f32, c: f32, d: f32, t: f32) -> f32 {
        calc::bezier_tangent(a, b, c, d, t)
    }
}

impl<P: Painter> ImageSource for DrawingContext<P> {
    fn source_size(&self) -> (f32, f32) {
        (self.width(), self.height())
    }

    fn source_density(&self) -> f32 {
        self.pixel_density()
    }

    fn source_raster(&self) -> Result<RgbaImage, EaselError> {
        self.painter.snapshot()
    }

    fn source_filter(&self) -> Option<Shader> {
        self.filter.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, RecordingPainter};

    fn context() -> DrawingContext<RecordingPainter> {
        DrawingContext::new(RecordingPainter::new(100, 100))
    }

    #[test]
    fn draw_guard() {
        let mut ctx = context();
        assert!(ctx.push_matrix().is_err());
        assert!(ctx.translate(1.0, 1.0).is_err());
        ctx.begin_draw().unwrap();
        assert!(ctx.begin_draw().is_err());
        ctx.end_draw().unwrap();
        assert!(ctx.end_draw().is_err());
    }

    #[test]
    fn stack_balance() {
        let mut ctx = context();
        ctx.begin_draw().unwrap();
        for _ in 0..3 {
            ctx.push_matrix().unwrap();
        }
        ctx.translate(5.0, 0.0).unwrap();
        ctx.pop_matrix().unwrap();
        ctx.pop_matrix().unwrap();
        assert!(ctx.get_matrix().is_identity());
        ctx.pop_matrix().unwrap();
        match ctx.pop_matrix() {
            Err(EaselError::StackUnderflow(which)) => assert_eq!(which, "matrix"),
            other => panic!("expected underflow, got {:?}", other),
        }
        assert!(matches!(ctx.pop_style(), Err(EaselError::StackUnderflow("style"))));
    }

    #[test]
    fn scoped_push_restores_on_error() {
        let mut ctx = context();
        ctx.begin_draw().unwrap();
        ctx.fill(10).unwrap();
        let result: Result<(), EaselError> = ctx.push_with(|ctx| {
            ctx.translate(10.0, 20.0)?;
            ctx.fill((200, 0, 0))?;
            ctx.angle_mode(AngleMode::Degrees);
            Err(EaselError::argument("boom"))
        });
        assert!(matches!(result, Err(EaselError::Argument(_))));
        assert!(ctx.get_matrix().is_identity());
        assert_eq!(ctx.get_fill(), Some(Color::gray(10.0 / 255.0, 1.0)));
        assert_eq!(ctx.get_angle_mode(), AngleMode::Radians);
        assert!(ctx.matrix_stack.is_empty() && ctx.style_stack.is_empty());
    }

    #[test]
    fn begin_draw_resets_matrix_but_keeps_style() {
        let mut ctx = context();
        ctx.begin_draw().unwrap();
        ctx.translate(3.0, 4.0).unwrap();
        ctx.stroke_weight(4.0);
        ctx.push_style().unwrap();
        ctx.end_draw().unwrap();
        ctx.begin_draw().unwrap();
        assert!(ctx.get_matrix().is_identity());
        assert!(ctx.pop_style().is_err());
        assert_eq!(ctx.style.stroke_width, 4.0);
    }

    #[test]
    fn color_pack_and_extract() {
        let mut ctx = context();
        let c = ctx.color((10, 20, 30, 40)).unwrap();
        assert_eq!(c, 0x280a141e);
        assert_eq!(
            (ctx.red(c), ctx.green(c), ctx.blue(c), ctx.alpha(c)),
            (10.0, 20.0, 30.0, 40.0)
        );
        ctx.color_mode(ColorMode::Rgb, &[1.0]).unwrap();
        assert!((ctx.red(c) - 10.0 / 255.0).abs() < 1e-6);
        assert!(ctx.color_mode(ColorMode::Hsb, &[1.0, 2.0]).is_err());
    }

    #[test]
    fn lerp_color_extrapolates() {
        let ctx = context();
        let c1 = ctx.color((0, 0, 0)).unwrap();
        let c2 = ctx.color((100, 100, 100)).unwrap();
        assert_eq!(ctx.lerp_color(c1, c2, 0.0).unwrap(), c1);
        assert_eq!(ctx.lerp_color(c1, c2, 1.0).unwrap(), c2);
        let beyond = ctx.lerp_color(c1, c2, 1.5).unwrap();
        assert_eq!(ctx.red(beyond), 150.0);
        let below = ctx.lerp_color(c1, c2, -1.0).unwrap();
        assert_eq!(ctx.red(below), 0.0);
    }

    #[test]
    fn placement_modes_reject_radius() {
        let mut ctx = context();
        assert!(ctx.image_mode(CoordMode::Radius).is_err());
        assert!(ctx.shape_mode(CoordMode::Radius).is_err());
        ctx.image_mode(CoordMode::Center).unwrap();
        assert_eq!(ctx.style.image_mode, CoordMode::Center);
    }

    #[test]
    fn details_have_minimums() {
        let mut ctx = context();
        ctx.curve_detail(1);
        ctx.bezier_detail(0);
        assert_eq!(ctx.style.curve_detail, CURVE_DETAIL_MIN);
        assert_eq!(ctx.style.bezier_detail, BEZIER_DETAIL_MIN);
    }

    #[test]
    fn text_size_is_a_new_font_and_pops_back() {
        let mut ctx = context();
        ctx.begin_draw().unwrap();
        let original = ctx.get_text_font().clone();
        ctx.push_style().unwrap();
        ctx.text_size(40.0);
        assert_eq!(ctx.get_text_font().size(), 40.0);
        ctx.text_size(1000.0);
        assert_eq!(ctx.get_text_font().size(), FONT_SIZE_MAX);
        ctx.pop_style().unwrap();
        assert_eq!(ctx.get_text_font(), &original);
        assert_eq!(original.size(), FONT_SIZE_DEFAULT);
    }

    #[test]
    fn text_align_normalizes_center() {
        let mut ctx = context();
        ctx.text_align(Align::CENTER, Some(Align::CENTER));
        assert_eq!(ctx.style.text_align, Align::CENTER | Align::MIDDLE);
        ctx.text_align(Align::RIGHT, None);
        assert_eq!(ctx.style.text_align, Align::RIGHT | Align::BASELINE);
    }

    #[test]
    fn clip_follows_matrix() {
        let mut ctx = context();
        ctx.begin_draw().unwrap();
        ctx.translate(10.0, 5.0).unwrap();
        ctx.clip(0.0, 0.0, 20.0, 30.0);
        assert_eq!(ctx.style.clip, Some(Rect::from((10.0, 5.0, 20.0, 30.0))));
        ctx.no_clip();
        assert_eq!(ctx.style.clip, None);
    }

    #[test]
    fn pixels_round_trip() {
        let mut ctx = context();
        assert!(ctx.pixels().is_none());
        ctx.update_pixels().unwrap();
        assert!(ctx.painter().calls.is_empty());
        ctx.update_pixels_with(|px| px[0] = 0xff112233).unwrap();
        assert!(ctx.pixels().is_none());
        assert_eq!(ctx.painter().target.get_pixel(0, 0).0, [0x11, 0x22, 0x33, 0xff]);
        assert!(matches!(ctx.painter().calls.last(), Some(Call::WritePixels)));
    }

    #[test]
    fn seeded_random_replays() {
        let mut ctx = context();
        ctx.random_seed(7);
        let first: Vec<f32> = (0..4).map(|_| ctx.random_range(-1.0, 1.0)).collect();
        ctx.random_seed(7);
        let second: Vec<f32> = (0..4).map(|_| ctx.random_range(-1.0, 1.0)).collect();
        assert_eq!(first, second);
        assert!(first.iter().all(|&v| (-1.0..1.0).contains(&v)));
        let empty: [i32; 0] = [];
        assert_eq!(ctx.random_choice(&empty), None);
        assert_eq!(ctx.random_choice(&[3]), Some(&3));
        assert!(ctx.random_to(5.0) < 5.0);
    }

    #[test]
    fn curve_math_uses_tightness() {
        let mut ctx = context();
        let loose = ctx.curve_point(0.0, 10.0, 20.0, 40.0, 0.5);
        ctx.curve_tightness(1.0);
        let tight = ctx.curve_point(0.0, 10.0, 20.0, 40.0, 0.5);
        assert!((tight - 15.0).abs() < 1e-5);
        assert!((loose - tight).abs() > 1e-3);
        assert_eq!(ctx.bezier_point(0.0, 0.0, 1.0, 1.0, 0.5), 0.5);
    }
}
