use crate::errors::EaselError;
use crate::image::Image;
use crate::vector::Vector;
use image::{Rgba, RgbaImage};
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, RwLock};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FilterKind {
    Threshold,
    Gray,
    Invert,
    Blur,
}

impl FromStr for FilterKind {
    type Err = EaselError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "threshold" => Ok(FilterKind::Threshold),
            "gray" => Ok(FilterKind::Gray),
            "invert" => Ok(FilterKind::Invert),
            "blur" => Ok(FilterKind::Blur),
            _ => Err(EaselError::argument(format!("invalid filter: {}", s))),
        }
    }
}

/// A built-in filter with its parameter resolved.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Filter {
    Threshold(f32),
    Gray,
    Invert,
    Blur(f32),
}

impl Filter {
    pub fn new(kind: FilterKind, param: Option<f32>) -> Filter {
        match kind {
            FilterKind::Threshold => Filter::Threshold(param.unwrap_or(0.5)),
            FilterKind::Gray => Filter::Gray,
            FilterKind::Invert => Filter::Invert,
            FilterKind::Blur => Filter::Blur(param.unwrap_or(1.0)),
        }
    }

    /// Reference implementation of the filter on the CPU, matching what the
    /// fragment sources compute per texel.
    pub fn apply(&self, src: &RgbaImage) -> RgbaImage {
        match *self {
            Filter::Threshold(threshold) => map_pixels(src, |[r, g, b, _]| {
                let v = if gray(r, g, b) > threshold { 1.0 } else { 0.0 };
                [v, v, v, 1.0]
            }),
            Filter::Gray => map_pixels(src, |[r, g, b, _]| {
                let v = gray(r, g, b);
                [v, v, v, 1.0]
            }),
            Filter::Invert => map_pixels(src, |[r, g, b, _]| [1.0 - r, 1.0 - g, 1.0 - b, 1.0]),
            Filter::Blur(radius) => blur(src, radius),
        }
    }

    fn source(&self) -> &'static str {
        match self {
            Filter::Threshold(_) => THRESHOLD_SOURCE,
            Filter::Gray => GRAY_SOURCE,
            Filter::Invert => INVERT_SOURCE,
            Filter::Blur(_) => BLUR_SOURCE,
        }
    }
}

fn gray(r: f32, g: f32, b: f32) -> f32 {
    r * 0.3 + g * 0.59 + b * 0.11
}

fn map_pixels<F: Fn([f32; 4]) -> [f32; 4]>(src: &RgbaImage, f: F) -> RgbaImage {
    let mut out = src.clone();
    for px in out.pixels_mut() {
        let c = [
            px[0] as f32 / 255.0,
            px[1] as f32 / 255.0,
            px[2] as f32 / 255.0,
            px[3] as f32 / 255.0,
        ];
        *px = to_rgba8(f(c));
    }
    out
}

fn to_rgba8(c: [f32; 4]) -> Rgba<u8> {
    let byte = |v: f32| (v.max(0.0).min(1.0) * 255.0).round() as u8;
    Rgba([byte(c[0]), byte(c[1]), byte(c[2]), byte(c[3])])
}

fn blur(src: &RgbaImage, radius: f32) -> RgbaImage {
    let (w, h) = src.dimensions();
    let sigma = radius * 0.5;
    let s2 = sigma * sigma;
    let r = radius.ceil() as i32;
    let mut out = RgbaImage::new(w, h);
    for y in 0..h as i32 {
        for x in 0..w as i32 {
            let mut acc = [0.0f32; 3];
            let mut total = 0.0;
            for dy in -r..r {
                for dx in -r..r {
                    let (sx, sy) = (x + dx, y + dy);
                    if sx < 0 || sy < 0 || sx >= w as i32 || sy >= h as i32 {
                        continue;
                    }
                    let dist2 = (dx * dx + dy * dy) as f32;
                    let weight = if s2 > 0.0 {
                        (-dist2 / (2.0 * s2)).exp()
                    } else if dx == 0 && dy == 0 {
                        1.0
                    } else {
                        0.0
                    };
                    let px = src.get_pixel(sx as u32, sy as u32);
                    for (i, a) in acc.iter_mut().enumerate() {
                        *a += px[i] as f32 / 255.0 * weight;
                    }
                    total += weight;
                }
            }
            let c = if total > 0.0 {
                [acc[0] / total, acc[1] / total, acc[2] / total, 1.0]
            } else {
                let px = src.get_pixel(x as u32, y as u32);
                [
                    px[0] as f32 / 255.0,
                    px[1] as f32 / 255.0,
                    px[2] as f32 / 255.0,
                    1.0,
                ]
            };
            out.put_pixel(x as u32, y as u32, to_rgba8(c));
        }
    }
    out
}

#[derive(Clone)]
pub enum Uniform {
    Float(Vec<f32>),
    Int(Vec<i32>),
    Texture(Image),
}

impl fmt::Debug for Uniform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Uniform::Float(v) => write!(f, "Float({:?})", v),
            Uniform::Int(v) => write!(f, "Int({:?})", v),
            Uniform::Texture(img) => write!(f, "Texture({}x{})", img.width(), img.height()),
        }
    }
}

impl From<f32> for Uniform {
    fn from(v: f32) -> Self {
        Uniform::Float(vec![v])
    }
}

impl From<i32> for Uniform {
    fn from(v: i32) -> Self {
        Uniform::Int(vec![v])
    }
}

impl From<&[f32]> for Uniform {
    fn from(v: &[f32]) -> Self {
        Uniform::Float(v.to_vec())
    }
}

impl From<Vec<f32>> for Uniform {
    fn from(v: Vec<f32>) -> Self {
        Uniform::Float(v)
    }
}

impl From<(f32, f32)> for Uniform {
    fn from((a, b): (f32, f32)) -> Self {
        Uniform::Float(vec![a, b])
    }
}

impl From<(f32, f32, f32)> for Uniform {
    fn from((a, b, c): (f32, f32, f32)) -> Self {
        Uniform::Float(vec![a, b, c])
    }
}

impl From<(f32, f32, f32, f32)> for Uniform {
    fn from((a, b, c, d): (f32, f32, f32, f32)) -> Self {
        Uniform::Float(vec![a, b, c, d])
    }
}

impl From<Vector> for Uniform {
    fn from(v: Vector) -> Self {
        Uniform::Float(v.array().to_vec())
    }
}

impl From<&Image> for Uniform {
    fn from(img: &Image) -> Self {
        Uniform::Texture(img.clone())
    }
}

/// Vertex/fragment source pair plus the uniforms set on it.
///
/// Clones share uniforms, so a shader bound to a context observes later
/// `set_uniform` calls.
#[derive(Clone)]
pub struct Shader {
    vertex: Option<String>,
    fragment: String,
    filter: Option<Filter>,
    uniforms: Arc<RwLock<BTreeMap<String, Uniform>>>,
}

impl fmt::Debug for Shader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shader")
            .field("filter", &self.filter)
            .field("uniforms", &self.uniforms().len())
            .finish()
    }
}

impl PartialEq for Shader {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.uniforms, &other.uniforms)
    }
}

impl Shader {
    /// A fragment source written against the Shadertoy `mainImage` entry
    /// point gets a `main` wrapper; `iTime`, `iResolution` and `iMouse` are
    /// declared when used but not declared.
    pub fn new(vertex: Option<&str>, fragment: &str) -> Result<Shader, EaselError> {
        if fragment.trim().is_empty() {
            return Err(EaselError::Shader(String::from("empty fragment source")));
        }
        Ok(Shader {
            vertex: vertex.map(str::to_string),
            fragment: adapt_fragment_source(fragment)?,
            filter: None,
            uniforms: Default::default(),
        })
    }

    pub fn create_filter(kind: FilterKind, param: Option<f32>) -> Shader {
        let filter = Filter::new(kind, param);
        let shader = Shader {
            vertex: None,
            fragment: filter.source().to_string(),
            filter: Some(filter),
            uniforms: Default::default(),
        };
        match filter {
            Filter::Threshold(threshold) => shader.set_uniform("threshold", threshold),
            Filter::Blur(radius) => shader.set_uniform("radius", radius),
            Filter::Gray | Filter::Invert => {}
        }
        shader
    }

    /// Name-based lookup; unknown names give no shader rather than an error.
    pub fn create_filter_named(name: &str, param: Option<f32>) -> Option<Shader> {
        name.parse::<FilterKind>()
            .ok()
            .map(|kind| Shader::create_filter(kind, param))
    }

    pub fn vertex_source(&self) -> Option<&str> {
        self.vertex.as_deref()
    }

    pub fn fragment_source(&self) -> &str {
        &self.fragment
    }

    /// The built-in filter this shader was created from, if any.
    pub fn filter(&self) -> Option<Filter> {
        self.filter
    }

    pub fn set_uniform<N: Into<String>, U: Into<Uniform>>(&self, name: N, value: U) {
        let mut uniforms = self
            .uniforms
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        uniforms.insert(name.into(), value.into());
    }

    pub fn uniform(&self, name: &str) -> Option<Uniform> {
        self.uniforms().get(name).cloned()
    }

    pub fn uniforms(&self) -> BTreeMap<String, Uniform> {
        self.uniforms
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

fn adapt_fragment_source(source: &str) -> Result<String, EaselError> {
    let main_image = Regex::new(r"void\s+mainImage\s*\(\s*out\s+vec4\s+\w+\s*,\s*in\s+vec2\s+\w+\s*\)")?;
    let main = Regex::new(r"void\s+main\s*\(")?;
    let mut source = source.to_string();
    if main_image.is_match(&source) && !main.is_match(&source) {
        source.push_str(
            "varying vec4 vertTexCoord;\n\
             void main() {\n\
             \x20 mainImage(gl_FragColor, vertTexCoord.xy);\n\
             }\n",
        );
    }
    for (name, ty) in [("iTime", "float"), ("iResolution", "vec2"), ("iMouse", "vec2")].iter() {
        let declared = Regex::new(&format!(r"uniform\s+{}\s+{}", ty, name))?;
        if source.contains(name) && !declared.is_match(&source) {
            source = format!("uniform {} {};\n{}", ty, name, source);
        }
    }
    Ok(source)
}

const THRESHOLD_SOURCE: &str = "\
uniform float threshold;
uniform sampler2D texMap;
varying vec4 vertTexCoord;
varying vec4 vertColor;
void main() {
  vec4 col     = texture2D(texMap, vertTexCoord.xy) * vertColor;
  float gray   = col.r * 0.3 + col.g * 0.59 + col.b * 0.11;
  gl_FragColor = vec4(vec3(gray > threshold ? 1.0 : 0.0), 1.0);
}
";

const GRAY_SOURCE: &str = "\
uniform sampler2D texMap;
varying vec4 vertTexCoord;
varying vec4 vertColor;
void main() {
  vec4 col     = texture2D(texMap, vertTexCoord.xy);
  float gray   = col.r * 0.3 + col.g * 0.59 + col.b * 0.11;
  gl_FragColor = vec4(vec3(gray), 1.0) * vertColor;
}
";

const INVERT_SOURCE: &str = "\
uniform sampler2D texMap;
varying vec4 vertTexCoord;
varying vec4 vertColor;
void main() {
  vec4 col     = texture2D(texMap, vertTexCoord.xy);
  gl_FragColor = vec4(vec3(1.0 - col.rgb), 1.0) * vertColor;
}
";

const BLUR_SOURCE: &str = "\
#define PI 3.1415926538
uniform float radius;
uniform sampler2D texMap;
uniform vec3 texMin;
uniform vec3 texMax;
uniform vec3 texOffset;
varying vec4 vertTexCoord;
varying vec4 vertColor;
float gaussian(vec2 pos, float sigma) {
  float s2 = sigma * sigma;
  return 1.0 / (2.0 * PI * s2) * exp(-(dot(pos, pos) / (2.0 * s2)));
}
void main() {
  float sigma        = radius * 0.5;
  vec3 color         = vec3(0.0);
  float total_weight = 0.0;
  for (float y = -radius; y < radius; y += 1.0)
  for (float x = -radius; x < radius; x += 1.0) {
    vec2 offset   = vec2(x, y);
    float weight  = gaussian(offset, sigma);
    vec2 texcoord = vertTexCoord.xy + offset * texOffset.xy;
    if (
      texcoord.x < texMin.x || texMax.x < texcoord.x ||
      texcoord.y < texMin.y || texMax.y < texcoord.y
    ) continue;
    color += texture2D(texMap, texcoord).rgb * weight;
    total_weight += weight;
  }
  gl_FragColor = vec4(color / total_weight, 1.0) * vertColor;
}
";
