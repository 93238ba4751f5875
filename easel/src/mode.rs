//! Mode switches for placement, angles and texture sampling.

use crate::errors::EaselError;
use std::f32::consts::PI;
use std::str::FromStr;

const RAD2DEG: f32 = 180.0 / PI;
const DEG2RAD: f32 = PI / 180.0;

/// How the four numbers given to `rect`, `ellipse`, `image` and `shape`
/// describe a box.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CoordMode {
    Corner,
    Corners,
    Center,
    Radius,
}

impl CoordMode {
    pub fn to_xywh(self, a: f32, b: f32, c: f32, d: f32) -> (f32, f32, f32, f32) {
        match self {
            CoordMode::Corner => (a, b, c, d),
            CoordMode::Corners => (a, b, c - a, d - b),
            CoordMode::Center => (a - c / 2.0, b - d / 2.0, c, d),
            CoordMode::Radius => (a - c, b - d, c * 2.0, d * 2.0),
        }
    }

    pub fn from_xywh(self, x: f32, y: f32, w: f32, h: f32) -> (f32, f32, f32, f32) {
        match self {
            CoordMode::Corner => (x, y, w, h),
            CoordMode::Corners => (x, y, x + w, y + h),
            CoordMode::Center => (x + w / 2.0, y + h / 2.0, w, h),
            CoordMode::Radius => (x + w / 2.0, y + h / 2.0, w / 2.0, h / 2.0),
        }
    }

    /// `image_mode` and `shape_mode` have no RADIUS form.
    pub(crate) fn check_placement(self, what: &str) -> Result<CoordMode, EaselError> {
        if self == CoordMode::Radius {
            return Err(EaselError::argument(format!(
                "invalid {} mode: radius",
                what
            )));
        }
        Ok(self)
    }
}

impl FromStr for CoordMode {
    type Err = EaselError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "corner" => CoordMode::Corner,
            "corners" => CoordMode::Corners,
            "center" => CoordMode::Center,
            "radius" => CoordMode::Radius,
            _ => return Err(EaselError::argument(format!("invalid mode: {}", s))),
        })
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AngleMode {
    Radians,
    Degrees,
}

impl Default for AngleMode {
    fn default() -> Self {
        AngleMode::Radians
    }
}

impl AngleMode {
    /// Factor turning an angle in this mode into degrees.
    pub fn scale(self) -> f32 {
        match self {
            AngleMode::Radians => RAD2DEG,
            AngleMode::Degrees => 1.0,
        }
    }

    pub fn to_degrees(self, angle: f32) -> f32 {
        angle * self.scale()
    }

    pub fn to_radians(self, angle: f32) -> f32 {
        match self {
            AngleMode::Radians => angle,
            AngleMode::Degrees => angle * DEG2RAD,
        }
    }

    pub fn from_radians(self, radians: f32) -> f32 {
        match self {
            AngleMode::Radians => radians,
            AngleMode::Degrees => radians * RAD2DEG,
        }
    }

    pub fn from_degrees(self, degrees: f32) -> f32 {
        match self {
            AngleMode::Radians => degrees * DEG2RAD,
            AngleMode::Degrees => degrees,
        }
    }
}

impl FromStr for AngleMode {
    type Err = EaselError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "radians" => Ok(AngleMode::Radians),
            "degrees" => Ok(AngleMode::Degrees),
            _ => Err(EaselError::argument(format!("invalid angle mode: {}", s))),
        }
    }
}

/// Units of the `u`/`v` passed to `vertex_uv`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TextureMode {
    /// Texel coordinates of the bound texture.
    Image,
    /// `0.0..=1.0` across the texture.
    Normal,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TextureWrap {
    Clamp,
    Repeat,
}

impl FromStr for TextureMode {
    type Err = EaselError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "image" => Ok(TextureMode::Image),
            "normal" => Ok(TextureMode::Normal),
            _ => Err(EaselError::argument(format!("invalid texture mode: {}", s))),
        }
    }
}

impl FromStr for TextureWrap {
    type Err = EaselError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "clamp" => Ok(TextureWrap::Clamp),
            "repeat" => Ok(TextureWrap::Repeat),
            _ => Err(EaselError::argument(format!("invalid texture wrap: {}", s))),
        }
    }
}
