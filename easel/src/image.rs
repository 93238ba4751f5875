use crate::color::{BlendMode, Color};
use crate::errors::EaselError;
use crate::shader::{FilterKind, Shader};
use image::{imageops, Rgba, RgbaImage};
use std::path::Path;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Pixel layout requested from `create_image`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ImageFormat {
    Rgb,
    Rgba,
}

enum ImageState {
    Loading,
    Ready(RgbaImage),
    Failed,
}

struct ImageSlot {
    state: ImageState,
    pixels: Option<Vec<u32>>,
    filter: Option<Shader>,
}

/// A raster image handle.
///
/// Clones share the same pixels. An image requested in the background
/// reports a size of 0 while loading and -1 once the load has failed.
#[derive(Clone)]
pub struct Image {
    slot: Arc<RwLock<ImageSlot>>,
}

impl std::fmt::Debug for Image {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Image({}x{})", self.width(), self.height())
    }
}

impl PartialEq for Image {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.slot, &other.slot)
    }
}

impl Image {
    pub fn new(raster: RgbaImage) -> Image {
        Image::with_state(ImageState::Ready(raster))
    }

    /// Transparent image of the given size.
    pub fn blank(width: u32, height: u32, format: ImageFormat) -> Image {
        let fill = match format {
            ImageFormat::Rgba => Rgba([0, 0, 0, 0]),
            ImageFormat::Rgb => Rgba([0, 0, 0, 255]),
        };
        Image::new(RgbaImage::from_pixel(width, height, fill))
    }

    pub(crate) fn pending() -> Image {
        Image::with_state(ImageState::Loading)
    }

    fn with_state(state: ImageState) -> Image {
        Image {
            slot: Arc::new(RwLock::new(ImageSlot {
                state,
                pixels: None,
                filter: None,
            })),
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Image, EaselError> {
        let path = path.as_ref();
        let raster = image::open(path)
            .map_err(|err| EaselError::Image(format!("Error loading image {:?}: {}", path, err)))?
            .to_rgba8();
        log::debug!("loaded image {:?} ({}x{})", path, raster.width(), raster.height());
        Ok(Image::new(raster))
    }

    /// Replaces a pending image with the result of a background load.
    pub(crate) fn publish(&self, raster: Option<RgbaImage>) {
        self.write().state = match raster {
            Some(raster) => ImageState::Ready(raster),
            None => ImageState::Failed,
        };
    }

    fn read(&self) -> RwLockReadGuard<'_, ImageSlot> {
        self.slot
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, ImageSlot> {
        self.slot
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn width(&self) -> i32 {
        match &self.read().state {
            ImageState::Loading => 0,
            ImageState::Ready(raster) => raster.width() as i32,
            ImageState::Failed => -1,
        }
    }

    pub fn height(&self) -> i32 {
        match &self.read().state {
            ImageState::Loading => 0,
            ImageState::Ready(raster) => raster.height() as i32,
            ImageState::Failed => -1,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.read().state, ImageState::Ready(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.read().state, ImageState::Failed)
    }

    /// Runs `f` against the pixels, failing while the image is not ready.
    pub fn with_raster<R, F: FnOnce(&RgbaImage) -> R>(&self, f: F) -> Result<R, EaselError> {
        match &self.read().state {
            ImageState::Ready(raster) => Ok(f(raster)),
            _ => Err(EaselError::Image(String::from("image is not loaded"))),
        }
    }

    fn with_raster_mut<R, F: FnOnce(&mut RgbaImage) -> R>(&self, f: F) -> Result<R, EaselError> {
        match &mut self.write().state {
            ImageState::Ready(raster) => Ok(f(raster)),
            _ => Err(EaselError::Image(String::from("image is not loaded"))),
        }
    }

    pub fn snapshot(&self) -> Result<RgbaImage, EaselError> {
        self.with_raster(RgbaImage::clone)
    }

    /// Packed ARGB at `(x, y)`, 0 outside the image.
    pub fn get(&self, x: i32, y: i32) -> Result<u32, EaselError> {
        self.with_raster(|raster| {
            if x < 0 || y < 0 || x >= raster.width() as i32 || y >= raster.height() as i32 {
                return 0;
            }
            pixel_to_argb(raster.get_pixel(x as u32, y as u32))
        })
    }

    pub fn set(&self, x: i32, y: i32, argb: u32) -> Result<(), EaselError> {
        self.with_raster_mut(|raster| {
            if x >= 0 && y >= 0 && x < raster.width() as i32 && y < raster.height() as i32 {
                raster.put_pixel(x as u32, y as u32, argb_to_pixel(argb));
            }
        })
    }

    pub fn load_pixels(&self) -> Result<(), EaselError> {
        let pixels = self.with_raster(|raster| raster.pixels().map(pixel_to_argb).collect())?;
        self.write().pixels = Some(pixels);
        Ok(())
    }

    /// The snapshot taken by `load_pixels`, row-major packed ARGB.
    pub fn pixels(&self) -> Option<Vec<u32>> {
        self.read().pixels.clone()
    }

    pub fn set_pixels(&self, pixels: Vec<u32>) {
        self.write().pixels = Some(pixels);
    }

    /// Writes the snapshot back and drops it. Does nothing without one.
    pub fn update_pixels(&self) -> Result<(), EaselError> {
        let pixels = match self.write().pixels.take() {
            Some(pixels) => pixels,
            None => return Ok(()),
        };
        self.with_raster_mut(|raster| {
            for (px, argb) in raster.pixels_mut().zip(pixels) {
                *px = argb_to_pixel(argb);
            }
        })
    }

    pub fn update_pixels_with<F: FnOnce(&mut [u32])>(&self, f: F) -> Result<(), EaselError> {
        self.load_pixels()?;
        {
            let mut slot = self.write();
            if let Some(pixels) = slot.pixels.as_mut() {
                f(pixels);
            }
        }
        self.update_pixels()
    }

    /// Filter applied whenever this image is drawn.
    pub fn filter(&self, kind: FilterKind, param: Option<f32>) {
        self.set_filter(Some(Shader::create_filter(kind, param)));
    }

    /// Any shader, or `None` to stop filtering.
    pub fn set_filter(&self, shader: Option<Shader>) {
        self.write().filter = shader;
    }

    pub fn current_filter(&self) -> Option<Shader> {
        self.read().filter.clone()
    }

    pub fn resize(&self, width: u32, height: u32) -> Result<(), EaselError> {
        if width == 0 || height == 0 {
            return Err(EaselError::argument(format!(
                "invalid image size: {}x{}",
                width, height
            )));
        }
        self.with_raster_mut(|raster| {
            *raster = imageops::resize(raster, width, height, imageops::FilterType::Triangle);
        })
    }

    /// Copies a region of `src` (or of this image when `None`) into a region
    /// of this image, scaling with nearest sampling.
    pub fn copy(&self, src: Option<&Image>, from: [i32; 4], to: [i32; 4]) -> Result<(), EaselError> {
        self.blend(src, from, to, BlendMode::Blend)
    }

    pub fn blend(
        &self,
        src: Option<&Image>,
        from: [i32; 4],
        to: [i32; 4],
        mode: BlendMode,
    ) -> Result<(), EaselError> {
        let source = match src {
            Some(src) => src.snapshot()?,
            None => self.snapshot()?,
        };
        self.with_raster_mut(|raster| blend_region(&source, raster, from, to, mode))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), EaselError> {
        let path = path.as_ref();
        self.with_raster(|raster| raster.save(path))??;
        log::debug!("saved image {:?}", path);
        Ok(())
    }
}

/// Anything that can be drawn with `image()`: loaded images and other
/// drawing contexts.
pub trait ImageSource {
    /// Size in logical units.
    fn source_size(&self) -> (f32, f32);

    /// Pixels per logical unit of the raster.
    fn source_density(&self) -> f32 {
        1.0
    }

    /// Device pixels.
    fn source_raster(&self) -> Result<RgbaImage, EaselError>;

    fn source_filter(&self) -> Option<Shader>;

    /// Sources that are not ready yet are skipped without error.
    fn is_ready(&self) -> bool {
        true
    }
}

impl ImageSource for Image {
    fn source_size(&self) -> (f32, f32) {
        (self.width().max(0) as f32, self.height().max(0) as f32)
    }

    fn source_raster(&self) -> Result<RgbaImage, EaselError> {
        self.snapshot()
    }

    fn source_filter(&self) -> Option<Shader> {
        self.current_filter()
    }

    fn is_ready(&self) -> bool {
        self.is_loaded()
    }
}

pub(crate) fn blend_region(
    src: &RgbaImage,
    dst: &mut RgbaImage,
    from: [i32; 4],
    to: [i32; 4],
    mode: BlendMode,
) {
    let [sx, sy, sw, sh] = from;
    let [dx, dy, dw, dh] = to;
    if sw <= 0 || sh <= 0 || dw <= 0 || dh <= 0 {
        return;
    }
    for y in 0..dh {
        let ty = dy + y;
        if ty < 0 || ty >= dst.height() as i32 {
            continue;
        }
        let fy = sy + y * sh / dh;
        if fy < 0 || fy >= src.height() as i32 {
            continue;
        }
        for x in 0..dw {
            let tx = dx + x;
            let fx = sx + x * sw / dw;
            if tx < 0 || tx >= dst.width() as i32 || fx < 0 || fx >= src.width() as i32 {
                continue;
            }
            let s = pixel_to_color(src.get_pixel(fx as u32, fy as u32));
            let d = pixel_to_color(dst.get_pixel(tx as u32, ty as u32));
            dst.put_pixel(tx as u32, ty as u32, color_to_pixel(mode.apply(s, d)));
        }
    }
}

pub fn pixel_to_color(px: &Rgba<u8>) -> Color {
    Color::rgba_i(px[0], px[1], px[2], px[3])
}

pub fn color_to_pixel(c: Color) -> Rgba<u8> {
    Rgba(c.to_bytes())
}

pub fn pixel_to_argb(px: &Rgba<u8>) -> u32 {
    (px[3] as u32) << 24 | (px[0] as u32) << 16 | (px[1] as u32) << 8 | px[2] as u32
}

pub fn argb_to_pixel(argb: u32) -> Rgba<u8> {
    Rgba([
        (argb >> 16) as u8,
        (argb >> 8) as u8,
        argb as u8,
        (argb >> 24) as u8,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_then_failed_sizes() {
        let img = Image::pending();
        assert_eq!((img.width(), img.height()), (0, 0));
        assert!(img.get(0, 0).is_err());
        img.publish(None);
        assert_eq!((img.width(), img.height()), (-1, -1));
        assert!(img.is_failed());
    }

    #[test]
    fn publish_is_seen_by_clones() {
        let img = Image::pending();
        let shared = img.clone();
        img.publish(Some(RgbaImage::new(3, 2)));
        assert_eq!((shared.width(), shared.height()), (3, 2));
    }

    #[test]
    fn pixel_snapshot_round_trip() {
        let img = Image::blank(2, 2, ImageFormat::Rgba);
        assert_eq!(img.pixels(), None);
        img.update_pixels_with(|px| px[3] = 0xff102030).unwrap();
        assert_eq!(img.get(1, 1).unwrap(), 0xff102030);
        assert_eq!(img.pixels(), None);
        assert_eq!(img.get(5, 5).unwrap(), 0);
    }

    #[test]
    fn set_and_get() {
        let img = Image::blank(4, 4, ImageFormat::Rgb);
        assert_eq!(img.get(0, 0).unwrap(), 0xff000000);
        img.set(2, 1, 0x80ff0000).unwrap();
        assert_eq!(img.get(2, 1).unwrap(), 0x80ff0000);
    }

    #[test]
    fn copy_scales_region() {
        let src = Image::blank(2, 2, ImageFormat::Rgba);
        src.set(0, 0, 0xffff0000).unwrap();
        let dst = Image::blank(4, 4, ImageFormat::Rgba);
        dst.copy(Some(&src), [0, 0, 1, 1], [0, 0, 2, 2]).unwrap();
        assert_eq!(dst.get(1, 1).unwrap(), 0xffff0000);
        assert_eq!(dst.get(2, 2).unwrap(), 0);
    }

    #[test]
    fn resize_changes_size() {
        let img = Image::blank(4, 4, ImageFormat::Rgba);
        img.resize(8, 2).unwrap();
        assert_eq!((img.width(), img.height()), (8, 2));
        assert!(img.resize(0, 2).is_err());
    }
}
