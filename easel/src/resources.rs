use crate::builder::ShapeBuilder;
use crate::config::FONT_SIZE_DEFAULT;
use crate::context::DrawingContext;
use crate::errors::EaselError;
use crate::font::Font;
use crate::graphics::Graphics;
use crate::image::{Image, ImageFormat};
use crate::painter::{Painter, ShapeType};
use crate::shader::Shader;
use crate::shape::{Shape, ShapeKind};
use crate::svg;
use crate::vector::Vector;
use std::path::{Path, PathBuf};
use std::thread;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];
const FONT_EXTENSIONS: &[&str] = &["ttf", "otf"];

fn extension_of(path: &Path, explicit: Option<&str>) -> String {
    explicit
        .map(|ext| ext.trim_start_matches('.').to_string())
        .or_else(|| path.extension().map(|ext| ext.to_string_lossy().into_owned()))
        .unwrap_or_default()
        .to_ascii_lowercase()
}

fn check_image_path(path: &Path, extension: Option<&str>) -> Result<(), EaselError> {
    let name = path.to_string_lossy();
    if name.starts_with("http://") || name.starts_with("https://") {
        return Err(EaselError::Image(format!("remote images are not supported: {}", name)));
    }
    let ext = extension_of(path, extension);
    if !IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        return Err(EaselError::Image(format!("unsupported image type -- '{}'", ext)));
    }
    Ok(())
}

fn read_source(source: &str) -> Result<String, EaselError> {
    let path = Path::new(source);
    if !source.contains('\n') && path.is_file() {
        return Ok(std::fs::read_to_string(path)?);
    }
    Ok(source.to_string())
}

impl<P: Painter> DrawingContext<P> {
    /// A vector that rotates in the current angle mode.
    pub fn create_vector(&self, x: f32, y: f32, z: f32) -> Vector {
        Vector::new(x, y, z).with_angle_mode(self.style.angle_mode)
    }

    /// Loads a font file, or the built-in face when `path` is `None`.
    pub fn create_font<Q: AsRef<Path>>(&self, path: Option<Q>, size: Option<f32>) -> Result<Font, EaselError> {
        let size = size.unwrap_or(FONT_SIZE_DEFAULT);
        match path {
            Some(path) => Font::load(path, size),
            None => Ok(self.style.font.with_size(size)),
        }
    }

    pub fn create_image(&self, width: u32, height: u32, format: ImageFormat) -> Image {
        Image::blank(width, height, format)
    }

    /// Builds a primitive or empty group, resolving rect, ellipse and arc
    /// arguments through the current modes.
    pub fn create_shape(&self, kind: ShapeKind) -> Shape {
        let mode = self.style.angle_mode;
        let kind = match kind {
            ShapeKind::Rect(a, b, c, d) => {
                let (x, y, w, h) = self.style.rect_mode.to_xywh(a, b, c, d);
                ShapeKind::Rect(x, y, w, h)
            }
            ShapeKind::Ellipse(a, b, c, d) => {
                let (x, y, w, h) = self.style.ellipse_mode.to_xywh(a, b, c, d);
                ShapeKind::Ellipse(x, y, w, h)
            }
            ShapeKind::Arc(a, b, c, d, start, stop) => {
                let (x, y, w, h) = self.style.ellipse_mode.to_xywh(a, b, c, d);
                ShapeKind::Arc(x, y, w, h, mode.to_degrees(-start), mode.to_degrees(-stop))
            }
            other => other,
        };
        Shape::primitive(kind, mode)
    }

    /// An empty builder carrying the current tessellation settings.
    pub fn create_shape_builder(&self, kind: ShapeType) -> ShapeBuilder {
        ShapeBuilder::new(kind)
            .curve_detail(self.style.curve_detail, self.style.curve_tightness)
            .bezier_detail(self.style.bezier_detail)
            .angle_mode(self.style.angle_mode)
    }

    /// Offscreen canvas on the same kind of painter.
    pub fn create_graphics(&self, width: u32, height: u32, density: Option<f32>) -> Result<Graphics<P>, EaselError> {
        let painter = self.painter.offscreen(width, height, density.unwrap_or(1.0))?;
        Ok(Graphics::with_font(painter, self.style.font.clone()))
    }

    /// Each argument is GLSL source or a path to a file holding it.
    pub fn create_shader(&self, vertex: Option<&str>, fragment: &str) -> Result<Shader, EaselError> {
        let vertex = vertex.map(read_source).transpose()?;
        let fragment = read_source(fragment)?;
        Shader::new(vertex.as_deref(), &fragment)
    }

    pub fn load_shader(&self, fragment: &str, vertex: Option<&str>) -> Result<Shader, EaselError> {
        self.create_shader(vertex, fragment)
    }

    pub fn load_font<Q: AsRef<Path>>(&self, path: Q) -> Result<Font, EaselError> {
        let path = path.as_ref();
        let ext = extension_of(path, None);
        if !FONT_EXTENSIONS.contains(&ext.as_str()) {
            return Err(EaselError::Font(format!("unsupported font type -- '{}'", ext)));
        }
        Font::load(path, self.style.font.size())
    }

    /// `extension` overrides the one in the file name when checking the type.
    pub fn load_image<Q: AsRef<Path>>(&self, path: Q, extension: Option<&str>) -> Result<Image, EaselError> {
        let path = path.as_ref();
        check_image_path(path, extension)?;
        Image::load(path)
    }

    /// Loads on a worker thread. The returned image reports a size of 0 until
    /// the load finishes and -1 if it fails.
    pub fn request_image<Q: AsRef<Path>>(&self, path: Q, extension: Option<&str>) -> Image {
        let image = Image::pending();
        let path: PathBuf = path.as_ref().to_path_buf();
        let extension = extension.map(str::to_string);
        let slot = image.clone();
        thread::spawn(move || {
            let loaded = check_image_path(&path, extension.as_deref())
                .and_then(|_| Image::load(&path))
                .and_then(|img| img.snapshot());
            match loaded {
                Ok(raster) => slot.publish(Some(raster)),
                Err(err) => {
                    log::warn!("request_image {:?} failed: {}", path, err);
                    slot.publish(None);
                }
            }
        });
        image
    }

    pub fn load_shape<Q: AsRef<Path>>(&self, path: Q) -> Result<Shape, EaselError> {
        svg::load(path.as_ref(), self.style.angle_mode)
    }
}
