use crate::errors::EaselError;
use clamped::Clamp;
use regex::Regex;
use std::str::FromStr;
use std::sync::OnceLock;

/// Normalized straight-alpha color, every channel in `0.0..=1.0`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };

    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };

    pub const TRANSPARENT: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    pub fn rgba(r: f32, g: f32, b: f32, a: f32) -> Color {
        Color { r, g, b, a }
    }

    pub fn rgb(r: f32, g: f32, b: f32) -> Color {
        Color { r, g, b, a: 1.0 }
    }

    pub fn gray(v: f32, a: f32) -> Color {
        Color { r: v, g: v, b: v, a }
    }

    pub fn rgba_i(r: u8, g: u8, b: u8, a: u8) -> Color {
        Color {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    pub fn rgb_i(r: u8, g: u8, b: u8) -> Color {
        Self::rgba_i(r, g, b, 255)
    }

    /// Hue, saturation and value all normalized; hue wraps around.
    pub fn hsva(h: f32, s: f32, v: f32, a: f32) -> Color {
        let s = s.clamped(0.0, 1.0);
        let v = v.clamped(0.0, 1.0);
        if s <= 0.0 {
            return Color::gray(v, a);
        }
        let mut h = h.rem_euclid(1.0) * 6.0;
        if h >= 6.0 {
            h = 0.0;
        }
        let sector = h.floor();
        let f = h - sector;
        let p = v * (1.0 - s);
        let q = v * (1.0 - s * f);
        let t = v * (1.0 - s * (1.0 - f));
        let (r, g, b) = match sector as i32 {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };
        Color { r, g, b, a }
    }

    pub fn from_argb(argb: u32) -> Color {
        Self::rgba_i(
            (argb >> 16 & 0xff) as u8,
            (argb >> 8 & 0xff) as u8,
            (argb & 0xff) as u8,
            (argb >> 24 & 0xff) as u8,
        )
    }

    /// Packs into `0xAARRGGBB`, truncating each channel to 8 bits.
    pub fn to_argb(self) -> u32 {
        let [r, g, b, a] = self.to_bytes();
        (a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32
    }

    pub fn to_bytes(self) -> [u8; 4] {
        [
            channel_byte(self.r),
            channel_byte(self.g),
            channel_byte(self.b),
            channel_byte(self.a),
        ]
    }

    pub fn lerp(self, c: Color, u: f32) -> Color {
        let u = u.clamped(0.0, 1.0);
        let om = 1.0 - u;
        Color {
            r: self.r * om + c.r * u,
            g: self.g * om + c.g * u,
            b: self.b * om + c.b * u,
            a: self.a * om + c.a * u,
        }
    }

    /// Component-wise product, used for tinting.
    pub fn modulate(self, c: Color) -> Color {
        Color {
            r: self.r * c.r,
            g: self.g * c.g,
            b: self.b * c.b,
            a: self.a * c.a,
        }
    }

    pub fn with_alpha(self, a: f32) -> Color {
        Color { a, ..self }
    }

    pub fn is_opaque(&self) -> bool {
        self.a >= 1.0
    }
}

fn channel_byte(n: f32) -> u8 {
    // the epsilon absorbs f32 division error so that 10/255*255 stays 10
    ((n as f64) * 255.0 + 1e-4).floor().clamped(0.0, 255.0) as u8
}

impl From<(f32, f32, f32)> for Color {
    fn from((r, g, b): (f32, f32, f32)) -> Self {
        Color::rgb(r, g, b)
    }
}

impl From<(f32, f32, f32, f32)> for Color {
    fn from((r, g, b, a): (f32, f32, f32, f32)) -> Self {
        Color::rgba(r, g, b, a)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ColorMode {
    Rgb,
    Hsb,
}

/// Every shape a color argument can take, interpreted against the current
/// color mode and channel maxima.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorSpec {
    Gray(f32),
    GrayAlpha(f32, f32),
    Channels(f32, f32, f32),
    ChannelsAlpha(f32, f32, f32, f32),
    Hex(String),
    HexAlpha(String, f32),
    Packed(u32),
}

impl From<f32> for ColorSpec {
    fn from(v: f32) -> Self {
        ColorSpec::Gray(v)
    }
}

impl From<i32> for ColorSpec {
    fn from(v: i32) -> Self {
        ColorSpec::Gray(v as f32)
    }
}

impl From<u32> for ColorSpec {
    fn from(argb: u32) -> Self {
        ColorSpec::Packed(argb)
    }
}

impl From<(f32, f32)> for ColorSpec {
    fn from((v, a): (f32, f32)) -> Self {
        ColorSpec::GrayAlpha(v, a)
    }
}

impl From<(i32, i32)> for ColorSpec {
    fn from((v, a): (i32, i32)) -> Self {
        ColorSpec::GrayAlpha(v as f32, a as f32)
    }
}

impl From<(f32, f32, f32)> for ColorSpec {
    fn from((a, b, c): (f32, f32, f32)) -> Self {
        ColorSpec::Channels(a, b, c)
    }
}

impl From<(i32, i32, i32)> for ColorSpec {
    fn from((a, b, c): (i32, i32, i32)) -> Self {
        ColorSpec::Channels(a as f32, b as f32, c as f32)
    }
}

impl From<(f32, f32, f32, f32)> for ColorSpec {
    fn from((a, b, c, d): (f32, f32, f32, f32)) -> Self {
        ColorSpec::ChannelsAlpha(a, b, c, d)
    }
}

impl From<(i32, i32, i32, i32)> for ColorSpec {
    fn from((a, b, c, d): (i32, i32, i32, i32)) -> Self {
        ColorSpec::ChannelsAlpha(a as f32, b as f32, c as f32, d as f32)
    }
}

impl From<&str> for ColorSpec {
    fn from(hex: &str) -> Self {
        ColorSpec::Hex(hex.to_string())
    }
}

impl From<(&str, f32)> for ColorSpec {
    fn from((hex, alpha): (&str, f32)) -> Self {
        ColorSpec::HexAlpha(hex.to_string(), alpha)
    }
}

impl From<(&str, i32)> for ColorSpec {
    fn from((hex, alpha): (&str, i32)) -> Self {
        ColorSpec::HexAlpha(hex.to_string(), alpha as f32)
    }
}

impl From<Color> for ColorSpec {
    fn from(c: Color) -> Self {
        ColorSpec::Packed(c.to_argb())
    }
}

/// Channel interpretation: RGB or HSB plus a maximum per channel.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ColorModel {
    mode: ColorMode,
    maxes: [f32; 4],
}

impl Default for ColorModel {
    fn default() -> Self {
        ColorModel {
            mode: ColorMode::Rgb,
            maxes: [255.0; 4],
        }
    }
}

impl ColorModel {
    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    pub fn maxes(&self) -> [f32; 4] {
        self.maxes
    }

    /// One maximum applies to all four channels, three replace the color
    /// channels and keep alpha, four replace everything.
    pub fn set(&mut self, mode: ColorMode, maxes: &[f32]) -> Result<(), EaselError> {
        match maxes.len() {
            0 => {}
            1 => self.maxes = [maxes[0]; 4],
            3 | 4 => self.maxes[..maxes.len()].copy_from_slice(maxes),
            n => {
                return Err(EaselError::argument(format!(
                    "color mode takes 0, 1, 3 or 4 maxima, got {}",
                    n
                )))
            }
        }
        self.mode = mode;
        Ok(())
    }

    pub fn to_color<C: Into<ColorSpec>>(&self, spec: C) -> Result<Color, EaselError> {
        let alpha_max = self.maxes[3];
        let channels = match spec.into() {
            ColorSpec::Gray(v) => [v, v, v, alpha_max],
            ColorSpec::GrayAlpha(v, a) => [v, v, v, a],
            ColorSpec::Channels(a, b, c) => [a, b, c, alpha_max],
            ColorSpec::ChannelsAlpha(a, b, c, d) => [a, b, c, d],
            ColorSpec::Hex(hex) => return parse_hex(&hex, 1.0),
            ColorSpec::HexAlpha(hex, a) => return parse_hex(&hex, a / alpha_max),
            ColorSpec::Packed(argb) => return Ok(Color::from_argb(argb)),
        };
        let [a, b, c, d] = [
            channels[0] / self.maxes[0],
            channels[1] / self.maxes[1],
            channels[2] / self.maxes[2],
            channels[3] / self.maxes[3],
        ];
        Ok(match self.mode {
            ColorMode::Rgb => Color::rgba(a, b, c, d),
            ColorMode::Hsb => Color::hsva(a, b, c, d),
        })
    }

    pub fn pack<C: Into<ColorSpec>>(&self, spec: C) -> Result<u32, EaselError> {
        Ok(self.to_color(spec)?.to_argb())
    }

    // Extraction rescales by the maxima in effect now, not the ones the
    // color was created under.
    pub fn red(&self, argb: u32) -> f32 {
        extract(argb >> 16, self.maxes[0])
    }

    pub fn green(&self, argb: u32) -> f32 {
        extract(argb >> 8, self.maxes[1])
    }

    pub fn blue(&self, argb: u32) -> f32 {
        extract(argb, self.maxes[2])
    }

    pub fn alpha(&self, argb: u32) -> f32 {
        extract(argb >> 24, self.maxes[3])
    }

    /// Interpolates the extracted channels; `amount` is not clamped.
    pub fn lerp_color(&self, c1: u32, c2: u32, amount: f32) -> Result<u32, EaselError> {
        let lerp = |a: f32, b: f32| a + (b - a) * amount;
        self.pack(ColorSpec::ChannelsAlpha(
            lerp(self.red(c1), self.red(c2)),
            lerp(self.green(c1), self.green(c2)),
            lerp(self.blue(c1), self.blue(c2)),
            lerp(self.alpha(c1), self.alpha(c2)),
        ))
    }
}

fn extract(bits: u32, max: f32) -> f32 {
    ((bits & 0xff) as f64 / 255.0 * max as f64) as f32
}

fn hex_pattern() -> Result<&'static Regex, EaselError> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    if let Some(re) = PATTERN.get() {
        return Ok(re);
    }
    let re = Regex::new(r"(?i)^\s*#([0-9a-f]{2})([0-9a-f]{2})([0-9a-f]{2})\s*$")?;
    Ok(PATTERN.get_or_init(|| re))
}

fn parse_hex(hex: &str, alpha: f32) -> Result<Color, EaselError> {
    let caps = hex_pattern()?
        .captures(hex)
        .ok_or_else(|| EaselError::argument(format!("invalid color code: '{}'", hex)))?;
    let mut rgb = [0.0f32; 3];
    for (i, channel) in rgb.iter_mut().enumerate() {
        let digits = &caps[i + 1];
        let value = u8::from_str_radix(digits, 16)
            .map_err(|_| EaselError::argument(format!("invalid color code: '{}'", hex)))?;
        *channel = value as f32 / 255.0;
    }
    Ok(Color::rgba(rgb[0], rgb[1], rgb[2], alpha))
}

/// How a source pixel combines with what is already on the target.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BlendMode {
    Blend,
    Add,
    Subtract,
    Lightest,
    Darkest,
    Exclusion,
    Multiply,
    Screen,
    Replace,
}

impl Default for BlendMode {
    fn default() -> Self {
        BlendMode::Blend
    }
}

impl BlendMode {
    /// Composites straight-alpha `src` over `dst`.
    pub fn apply(self, src: Color, dst: Color) -> Color {
        let sa = src.a.clamped(0.0, 1.0);
        if self == BlendMode::Replace {
            return src;
        }
        let mix = |s: f32, d: f32| -> f32 {
            let blended = match self {
                BlendMode::Blend | BlendMode::Replace => s,
                BlendMode::Add => (d + s).min(1.0),
                BlendMode::Subtract => (d - s).max(0.0),
                BlendMode::Lightest => d.max(s),
                BlendMode::Darkest => d.min(s),
                BlendMode::Exclusion => d + s - 2.0 * d * s,
                BlendMode::Multiply => d * s,
                BlendMode::Screen => 1.0 - (1.0 - d) * (1.0 - s),
            };
            d * (1.0 - sa) + blended * sa
        };
        let out_a = sa + dst.a * (1.0 - sa);
        if self == BlendMode::Blend && out_a > 0.0 {
            // straight alpha "over"
            let over = |s: f32, d: f32| (s * sa + d * dst.a * (1.0 - sa)) / out_a;
            return Color::rgba(over(src.r, dst.r), over(src.g, dst.g), over(src.b, dst.b), out_a);
        }
        Color::rgba(
            mix(src.r, dst.r),
            mix(src.g, dst.g),
            mix(src.b, dst.b),
            out_a,
        )
    }
}

impl FromStr for ColorMode {
    type Err = EaselError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rgb" => Ok(ColorMode::Rgb),
            "hsb" => Ok(ColorMode::Hsb),
            _ => Err(EaselError::argument(format!("invalid color mode: {}", s))),
        }
    }
}

impl FromStr for BlendMode {
    type Err = EaselError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "blend" | "normal" => BlendMode::Blend,
            "add" => BlendMode::Add,
            "subtract" => BlendMode::Subtract,
            "lightest" => BlendMode::Lightest,
            "darkest" => BlendMode::Darkest,
            "exclusion" => BlendMode::Exclusion,
            "multiply" => BlendMode::Multiply,
            "screen" => BlendMode::Screen,
            "replace" => BlendMode::Replace,
            _ => return Err(EaselError::argument(format!("invalid blend mode: {}", s))),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn packs_rgba_255() {
        let model = ColorModel::default();
        let c = model.pack((10, 20, 30, 40)).unwrap();
        assert_eq!(c, 0x280a141e);
        assert!(close(model.red(c), 10.0));
        assert!(close(model.green(c), 20.0));
        assert!(close(model.blue(c), 30.0));
        assert!(close(model.alpha(c), 40.0));
    }

    #[test]
    fn packs_unit_maxima() {
        let mut model = ColorModel::default();
        model.set(ColorMode::Rgb, &[1.0]).unwrap();
        assert_eq!(model.pack((0.1, 0.2, 0.3, 0.4)).unwrap(), 0x6619334c);
    }

    #[test]
    fn gray_and_alpha_defaults() {
        let model = ColorModel::default();
        assert_eq!(model.pack(255).unwrap(), 0xffffffff);
        assert_eq!(model.pack((0, 0)).unwrap(), 0x00000000);
        assert_eq!(model.pack((255, 0, 0)).unwrap(), 0xffff0000);
    }

    #[test]
    fn rejects_bad_arity() {
        let mut model = ColorModel::default();
        assert!(model.set(ColorMode::Rgb, &[1.0, 2.0]).is_err());
        assert!(model.set(ColorMode::Rgb, &[1.0, 2.0, 3.0, 4.0, 5.0]).is_err());
        assert_eq!(model.maxes(), [255.0; 4]);
    }

    #[test]
    fn three_maxima_keep_alpha() {
        let mut model = ColorModel::default();
        model.set(ColorMode::Hsb, &[360.0, 100.0, 100.0]).unwrap();
        assert_eq!(model.maxes(), [360.0, 100.0, 100.0, 255.0]);
        assert_eq!(model.mode(), ColorMode::Hsb);
        assert_eq!(model.pack((0, 100, 100)).unwrap(), 0xffff0000);
        assert_eq!(model.pack((120, 100, 100)).unwrap(), 0xff00ff00);
    }

    #[test]
    fn hex_colors() {
        let model = ColorModel::default();
        assert_eq!(model.pack("#00AAFF").unwrap(), 0xff00aaff);
        assert_eq!(model.pack((" #ff0000 ", 0)).unwrap(), 0x00ff0000);
        assert!(model.pack("#0af").is_err());
        assert!(model.pack("00aaff").is_err());
    }

    #[test]
    fn extraction_uses_current_maxima() {
        let mut model = ColorModel::default();
        let c = model.pack((255, 0, 0)).unwrap();
        model.set(ColorMode::Rgb, &[1.0]).unwrap();
        assert!((model.red(c) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn lerp_color_extrapolates() {
        let model = ColorModel::default();
        let c1 = model.pack((0, 0, 0)).unwrap();
        let c2 = model.pack((100, 100, 100)).unwrap();
        assert_eq!(model.lerp_color(c1, c2, 0.0).unwrap(), c1);
        assert_eq!(model.lerp_color(c1, c2, 1.0).unwrap(), c2);
        let beyond = model.lerp_color(c1, c2, 2.0).unwrap();
        assert_eq!(beyond & 0xffffff, 0xc8c8c8);
        let before = model.lerp_color(c2, c1, -0.5).unwrap();
        assert_eq!(before & 0xff, 150);
    }

    #[test]
    fn blend_over_opaque() {
        let out = BlendMode::Blend.apply(Color::rgba(1.0, 0.0, 0.0, 0.5), Color::BLACK);
        assert!((out.r - 0.5).abs() < 1e-6);
        assert!((out.a - 1.0).abs() < 1e-6);
        let add = BlendMode::Add.apply(Color::rgb(0.5, 0.5, 0.5), Color::rgb(0.75, 0.0, 0.0));
        assert!((add.r - 1.0).abs() < 1e-6 && (add.g - 0.5).abs() < 1e-6);
    }

    #[test]
    fn mode_names() {
        assert_eq!("HSB".parse::<ColorMode>().unwrap(), ColorMode::Hsb);
        assert_eq!("normal".parse::<BlendMode>().unwrap(), BlendMode::Blend);
        assert!("cmyk".parse::<ColorMode>().is_err());
    }
}
