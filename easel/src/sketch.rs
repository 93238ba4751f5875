//! The window canvas: a drawing context bound to a window, plus input state
//! and callback dispatch.

use crate::color::Color;
use crate::config::{CANVAS_BACKGROUND, CLICK_DISTANCE};
use crate::context::DrawingContext;
use crate::errors::EaselError;
use crate::math::{Point, Rect};
use crate::painter::{Paint, Painter};
use crate::shader::Shader;
use crate::vector::Vector;
use image::RgbaImage;
use std::collections::BTreeSet;
use std::ops::{Deref, DerefMut};

/// Windowing toolkit a sketch runs in.
pub trait Window {
    type Painter: Painter;

    /// A render target for the canvas at the given logical size.
    fn create_canvas(&mut self, width: u32, height: u32, density: f32) -> Result<Self::Painter, EaselError>;

    fn title(&self) -> &str;

    fn set_title(&mut self, title: &str);

    fn position(&self) -> (i32, i32);

    fn set_position(&mut self, x: i32, y: i32);

    fn size(&self) -> (u32, u32);

    fn set_size(&mut self, width: u32, height: u32);

    fn set_resizable(&mut self, resizable: bool);

    fn screen_size(&self) -> (u32, u32);

    fn display_density(&self) -> f32;

    /// Frames per second measured over recent frames.
    fn frame_rate(&self) -> f32;

    fn is_focused(&self) -> bool;

    /// Input gathered since the last call.
    fn poll_events(&mut self) -> Vec<Event>;

    fn is_closed(&self) -> bool;

    /// Shows a finished frame, running it through `filter` when set.
    fn present(&mut self, canvas: &RgbaImage, filter: Option<&Shader>) -> Result<(), EaselError>;
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub enum MouseButton {
    Left,
    Right,
    Center,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Touch {
    pub id: u64,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    KeyDown { code: String, chars: String },
    KeyUp { code: String, chars: String },
    PointerDown { id: u64, x: f32, y: f32, button: MouseButton },
    PointerUp { id: u64, x: f32, y: f32, button: MouseButton },
    PointerMove { id: u64, x: f32, y: f32 },
    WindowMoved { x: i32, y: i32 },
    WindowResized { width: u32, height: u32 },
    Motion { gravity: [f32; 3] },
}

/// User code driven by a [`Context`]. Every callback defaults to doing
/// nothing; an error from any of them stops all further dispatch.
#[allow(unused_variables)]
pub trait Sketch<W: Window> {
    fn setup(&mut self, ctx: &mut Context<W>) -> Result<(), EaselError> {
        Ok(())
    }

    fn draw(&mut self, ctx: &mut Context<W>) -> Result<(), EaselError> {
        Ok(())
    }

    fn key_pressed(&mut self, ctx: &mut Context<W>) -> Result<(), EaselError> {
        Ok(())
    }

    fn key_released(&mut self, ctx: &mut Context<W>) -> Result<(), EaselError> {
        Ok(())
    }

    fn key_typed(&mut self, ctx: &mut Context<W>) -> Result<(), EaselError> {
        Ok(())
    }

    fn mouse_pressed(&mut self, ctx: &mut Context<W>) -> Result<(), EaselError> {
        Ok(())
    }

    fn mouse_released(&mut self, ctx: &mut Context<W>) -> Result<(), EaselError> {
        Ok(())
    }

    fn mouse_moved(&mut self, ctx: &mut Context<W>) -> Result<(), EaselError> {
        Ok(())
    }

    fn mouse_dragged(&mut self, ctx: &mut Context<W>) -> Result<(), EaselError> {
        Ok(())
    }

    fn mouse_clicked(&mut self, ctx: &mut Context<W>) -> Result<(), EaselError> {
        Ok(())
    }

    fn touch_started(&mut self, ctx: &mut Context<W>) -> Result<(), EaselError> {
        Ok(())
    }

    fn touch_ended(&mut self, ctx: &mut Context<W>) -> Result<(), EaselError> {
        Ok(())
    }

    fn touch_moved(&mut self, ctx: &mut Context<W>) -> Result<(), EaselError> {
        Ok(())
    }

    fn window_moved(&mut self, ctx: &mut Context<W>) -> Result<(), EaselError> {
        Ok(())
    }

    fn window_resized(&mut self, ctx: &mut Context<W>) -> Result<(), EaselError> {
        Ok(())
    }

    fn motion(&mut self, ctx: &mut Context<W>) -> Result<(), EaselError> {
        Ok(())
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct Pointer {
    id: u64,
    pos: Point,
    down: Point,
}

/// The window canvas a sketch draws on.
///
/// Derefs to the canvas [`DrawingContext`], so drawing calls go straight
/// through. The canvas starts out light gray.
pub struct Context<W: Window> {
    window: W,
    canvas: DrawingContext<W::Painter>,
    started: bool,
    auto_resize: bool,
    looping: bool,
    redraw: bool,
    frame_count: u64,
    key: Option<String>,
    key_code: Option<String>,
    keys_pressed: BTreeSet<String>,
    pointer: Option<Pointer>,
    pointer_prev: Option<Pointer>,
    buttons: Vec<MouseButton>,
    mouse_button: Option<MouseButton>,
    touches: Vec<Touch>,
    gravity: Vector,
    error: Option<EaselError>,
}

impl<W: Window> Context<W> {
    pub fn new(mut window: W) -> Result<Context<W>, EaselError> {
        let (width, height) = window.size();
        let density = window.display_density();
        let mut painter = window.create_canvas(width.max(1), height.max(1), density)?;
        painter.begin_paint()?;
        painter.background(Color::gray(CANVAS_BACKGROUND, 1.0))?;
        painter.end_paint()?;
        Ok(Context {
            window,
            canvas: DrawingContext::new(painter),
            started: false,
            auto_resize: true,
            looping: true,
            redraw: false,
            frame_count: 0,
            key: None,
            key_code: None,
            keys_pressed: BTreeSet::new(),
            pointer: None,
            pointer_prev: None,
            buttons: Vec::new(),
            mouse_button: None,
            touches: Vec::new(),
            gravity: Vector::new(0.0, 0.0, 0.0),
            error: None,
        })
    }

    pub fn window(&self) -> &W {
        &self.window
    }

    pub fn window_mut(&mut self) -> &mut W {
        &mut self.window
    }

    /// The first callback error, after which nothing else is dispatched.
    pub fn error(&self) -> Option<&EaselError> {
        self.error.as_ref()
    }

    // Drives one callback inside a begin/end draw on the canvas.
    fn call<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Self) -> Result<(), EaselError>,
    {
        if self.error.is_some() {
            return;
        }
        let result = self.draw_canvas(f);
        if let Err(err) = result {
            log::error!("sketch callback failed: {}", err);
            self.error = Some(err);
        }
    }

    fn draw_canvas<F>(&mut self, f: F) -> Result<(), EaselError>
    where
        F: FnOnce(&mut Self) -> Result<(), EaselError>,
    {
        self.canvas.painter.begin_paint()?;
        self.canvas.begin_draw()?;
        let result = f(self);
        let ended = self.canvas.end_draw();
        let painted = self.canvas.painter.end_paint();
        result.and(ended).and(painted)
    }

    /// Runs `setup`. Canvas size changes are only accepted until this
    /// returns.
    pub fn start<S: Sketch<W>>(&mut self, sketch: &mut S) {
        self.call(|ctx| sketch.setup(ctx));
        self.started = true;
        log::debug!("sketch started at {}x{}", self.canvas.width(), self.canvas.height());
    }

    /// Draws one frame when looping or after `redraw`, then presents the
    /// canvas.
    pub fn frame<S: Sketch<W>>(&mut self, sketch: &mut S) -> Result<(), EaselError> {
        if self.looping || self.redraw {
            self.redraw = false;
            self.call(|ctx| {
                ctx.canvas.push()?;
                let drawn = sketch.draw(ctx);
                let popped = ctx.canvas.pop();
                ctx.frame_count += 1;
                drawn.and(popped)
            });
        }
        self.present()
    }

    pub fn present(&mut self) -> Result<(), EaselError> {
        let raster = self.canvas.painter.snapshot()?;
        self.window.present(&raster, self.canvas.get_filter())
    }

    /// Runs setup, then frames until the window closes or `frames` frames
    /// have been drawn.
    pub fn run<S: Sketch<W>>(&mut self, sketch: &mut S, frames: Option<u64>) -> Result<(), EaselError> {
        self.start(sketch);
        let mut ticks = 0;
        while !self.window.is_closed() && frames.map_or(true, |limit| ticks < limit) {
            for event in self.window.poll_events() {
                self.dispatch(sketch, event);
            }
            self.frame(sketch)?;
            ticks += 1;
        }
        Ok(())
    }

    pub fn dispatch<S: Sketch<W>>(&mut self, sketch: &mut S, event: Event) {
        match event {
            Event::KeyDown { code, chars } => {
                self.keys_pressed.insert(code.clone());
                let typed = !chars.is_empty();
                self.key = Some(chars);
                self.key_code = Some(code);
                self.call(|ctx| sketch.key_pressed(ctx));
                if typed {
                    self.call(|ctx| sketch.key_typed(ctx));
                }
            }
            Event::KeyUp { code, chars } => {
                self.keys_pressed.remove(&code);
                self.key = Some(chars);
                self.key_code = Some(code);
                self.call(|ctx| sketch.key_released(ctx));
            }
            Event::PointerDown { id, x, y, button } => {
                let primary = self.track_pointer(id, Point::new(x, y), true);
                self.touches.retain(|t| t.id != id);
                self.touches.push(Touch { id, x, y });
                if !self.buttons.contains(&button) {
                    self.buttons.push(button);
                }
                self.mouse_button = Some(button);
                if primary {
                    self.call(|ctx| sketch.mouse_pressed(ctx));
                }
                self.call(|ctx| sketch.touch_started(ctx));
            }
            Event::PointerUp { id, x, y, button } => {
                let primary = self.track_pointer(id, Point::new(x, y), false);
                self.touches.retain(|t| t.id != id);
                self.buttons.retain(|b| *b != button);
                if primary {
                    self.call(|ctx| sketch.mouse_released(ctx));
                }
                self.call(|ctx| sketch.touch_ended(ctx));
                let clicked = self
                    .pointer
                    .map_or(false, |p| p.pos.distance(p.down) < CLICK_DISTANCE);
                if primary && clicked {
                    self.call(|ctx| sketch.mouse_clicked(ctx));
                }
            }
            Event::PointerMove { id, x, y } => {
                let primary = self.track_pointer(id, Point::new(x, y), false);
                for touch in self.touches.iter_mut().filter(|t| t.id == id) {
                    touch.x = x;
                    touch.y = y;
                }
                if primary {
                    if self.buttons.is_empty() {
                        self.call(|ctx| sketch.mouse_moved(ctx));
                    } else {
                        self.call(|ctx| sketch.mouse_dragged(ctx));
                    }
                }
                self.call(|ctx| sketch.touch_moved(ctx));
            }
            Event::WindowMoved { .. } => self.call(|ctx| sketch.window_moved(ctx)),
            Event::WindowResized { width, height } => {
                if self.auto_resize {
                    let density = self.canvas.pixel_density();
                    if let Err(err) = self.resize_canvas(width, height, density) {
                        log::warn!("canvas resize to {}x{} failed: {}", width, height, err);
                    }
                }
                self.call(|ctx| sketch.window_resized(ctx));
            }
            Event::Motion { gravity } => {
                let [x, y, z] = gravity;
                self.gravity = self.canvas.create_vector(x, y, z);
                self.call(|ctx| sketch.motion(ctx));
            }
        }
    }

    // Follows one pointer while any button is held; returns whether `id`
    // is that pointer.
    fn track_pointer(&mut self, id: u64, pos: Point, pressed: bool) -> bool {
        let held = !self.buttons.is_empty();
        let same = self.pointer.map_or(false, |p| p.id == id);
        if held && !same {
            return false;
        }
        let down = match self.pointer {
            Some(p) if same && !pressed => p.down,
            _ => pos,
        };
        self.pointer_prev = self.pointer;
        self.pointer = Some(Pointer { id, pos, down });
        true
    }

    // Canvas

    fn check_not_started(&self, name: &str) -> Result<(), EaselError> {
        if self.started {
            return Err(EaselError::state(format!(
                "{}() must be called on startup or setup block",
                name
            )));
        }
        Ok(())
    }

    pub fn size(&mut self, width: u32, height: u32, density: Option<f32>) -> Result<(), EaselError> {
        self.check_not_started("size")?;
        let density = density.unwrap_or_else(|| self.canvas.pixel_density());
        self.resize_canvas(width, height, density)?;
        self.window.set_size(width, height);
        self.auto_resize = false;
        Ok(())
    }

    pub fn create_canvas(&mut self, width: u32, height: u32, density: Option<f32>) -> Result<(), EaselError> {
        self.check_not_started("create_canvas")?;
        self.size(width, height, density)
    }

    /// Changes the canvas density, keeping its logical size.
    pub fn set_pixel_density(&mut self, density: f32) -> Result<(), EaselError> {
        self.check_not_started("pixel_density")?;
        let (width, height) = (self.canvas.width() as u32, self.canvas.height() as u32);
        self.resize_canvas(width, height, density)?;
        self.auto_resize = false;
        Ok(())
    }

    /// Swaps in a new render target and paints the old one into it.
    fn resize_canvas(&mut self, width: u32, height: u32, density: f32) -> Result<(), EaselError> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        let unchanged = self.canvas.painter.width() == width
            && self.canvas.painter.height() == height
            && self.canvas.pixel_density() == density;
        if unchanged {
            return Ok(());
        }
        let drawing = self.canvas.is_drawing();
        let old = self.canvas.painter.snapshot()?;
        let (old_w, old_h) = (self.canvas.width(), self.canvas.height());
        let mut painter = self.window.create_canvas(width, height, density)?;
        painter.begin_paint()?;
        let paint = Paint {
            stroke: None,
            ..Paint::default()
        };
        painter.image(
            &paint,
            &old,
            Rect::from((0.0, 0.0, old.width() as f32, old.height() as f32)),
            Rect::from((0.0, 0.0, old_w, old_h)),
        )?;
        if !drawing {
            painter.end_paint()?;
        }
        let mut previous = self.canvas.replace_painter(painter);
        if drawing {
            previous.end_paint()?;
        }
        log::debug!("canvas resized to {}x{} @{}", width, height, density);
        Ok(())
    }

    pub fn set_title(&mut self, title: &str) {
        self.window.set_title(title);
    }

    pub fn display_width(&self) -> u32 {
        self.window.screen_size().0
    }

    pub fn display_height(&self) -> u32 {
        self.window.screen_size().1
    }

    pub fn display_density(&self) -> f32 {
        self.window.display_density()
    }

    pub fn window_move(&mut self, x: i32, y: i32) {
        self.window.set_position(x, y);
    }

    pub fn window_resize(&mut self, width: u32, height: u32) {
        self.window.set_size(width, height);
    }

    pub fn window_resizable(&mut self, resizable: bool) {
        self.window.set_resizable(resizable);
    }

    pub fn window_x(&self) -> i32 {
        self.window.position().0
    }

    pub fn window_y(&self) -> i32 {
        self.window.position().1
    }

    pub fn window_width(&self) -> u32 {
        self.window.size().0
    }

    pub fn window_height(&self) -> u32 {
        self.window.size().1
    }

    pub fn focused(&self) -> bool {
        self.window.is_focused()
    }

    // Frames

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn frame_rate(&self) -> f32 {
        self.window.frame_rate()
    }

    pub fn looping(&mut self) {
        self.looping = true;
    }

    pub fn no_loop(&mut self) {
        self.looping = false;
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Draws one more frame while not looping.
    pub fn redraw(&mut self) {
        self.redraw = true;
    }

    // Input

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn key_code(&self) -> Option<&str> {
        self.key_code.as_deref()
    }

    pub fn is_key_pressed(&self) -> bool {
        !self.keys_pressed.is_empty()
    }

    pub fn is_mouse_pressed(&self) -> bool {
        !self.buttons.is_empty()
    }

    pub fn mouse_x(&self) -> f32 {
        self.pointer.map_or(0.0, |p| p.pos.x)
    }

    pub fn mouse_y(&self) -> f32 {
        self.pointer.map_or(0.0, |p| p.pos.y)
    }

    pub fn pmouse_x(&self) -> f32 {
        self.pointer_prev.map_or(0.0, |p| p.pos.x)
    }

    pub fn pmouse_y(&self) -> f32 {
        self.pointer_prev.map_or(0.0, |p| p.pos.y)
    }

    pub fn mouse_button(&self) -> Option<MouseButton> {
        self.mouse_button
    }

    pub fn touches(&self) -> &[Touch] {
        &self.touches
    }

    pub fn motion_gravity(&self) -> &Vector {
        &self.gravity
    }
}

impl<W: Window> Deref for Context<W> {
    type Target = DrawingContext<W::Painter>;

    fn deref(&self) -> &Self::Target {
        &self.canvas
    }
}

impl<W: Window> DerefMut for Context<W> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.canvas
    }
}
