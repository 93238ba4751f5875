//! Defaults applied to every drawing context and sketch window.

pub const FONT_SIZE_DEFAULT: f32 = 12.0;
pub const FONT_SIZE_MAX: f32 = 256.0;

pub const CURVE_DETAIL_DEFAULT: usize = 20;
pub const CURVE_DETAIL_MIN: usize = 3;
pub const BEZIER_DETAIL_DEFAULT: usize = 20;
pub const BEZIER_DETAIL_MIN: usize = 1;

pub const NOISE_OCTAVES_DEFAULT: u32 = 4;
pub const NOISE_FALLOFF_DEFAULT: f32 = 0.5;

pub const MITER_LIMIT: f32 = 10.0;

/// Pointer travel below which a press/release pair counts as a click.
pub const CLICK_DISTANCE: f32 = 3.0;

pub const WINDOW_WIDTH_DEFAULT: u32 = 500;
pub const WINDOW_HEIGHT_DEFAULT: u32 = 500;

/// Gray level the window canvas is cleared to before `setup` runs.
pub const CANVAS_BACKGROUND: f32 = 0.8;

#[derive(Debug, Clone)]
pub struct SketchConfig {
    pub width: u32,
    pub height: u32,
    pub pixel_density: f32,
    pub title: String,
    /// Stop after this many frames; `None` runs until the window closes.
    pub frame_limit: Option<u64>,
}

impl Default for SketchConfig {
    fn default() -> Self {
        SketchConfig {
            width: WINDOW_WIDTH_DEFAULT,
            height: WINDOW_HEIGHT_DEFAULT,
            pixel_density: 1.0,
            title: String::from("easel"),
            frame_limit: None,
        }
    }
}

impl SketchConfig {
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn pixel_density(mut self, density: f32) -> Self {
        self.pixel_density = density;
        self
    }

    pub fn title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = title.into();
        self
    }

    pub fn frame_limit(mut self, frames: u64) -> Self {
        self.frame_limit = Some(frames);
        self
    }
}
