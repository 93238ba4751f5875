use crate::config::FONT_SIZE_MAX;
use crate::errors::EaselError;
use rusttype::{point, Scale};
use std::fmt;
use std::path::Path;
use std::sync::{Arc, OnceLock};

const BUILTIN_NAME: &str = "DejaVu Sans";
const BUILTIN_DATA: &[u8] = include_bytes!("../fonts/DejaVuSans.ttf");

static BUILTIN_FACE: OnceLock<Option<Arc<rusttype::Font<'static>>>> = OnceLock::new();

/// A font face at one point size.
///
/// Fonts are values: changing the size produces a new `Font` sharing the
/// same face, so anything holding the old one keeps its size.
#[derive(Clone)]
pub struct Font {
    name: String,
    face: Option<Arc<rusttype::Font<'static>>>,
    size: f32,
}

impl fmt::Debug for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Font({:?}, {})", self.name, self.size)
    }
}

impl PartialEq for Font {
    fn eq(&self, other: &Self) -> bool {
        let same_face = match (&self.face, &other.face) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        same_face && self.name == other.name && self.size == other.size
    }
}

/// Box occupied by a run of text.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TextBounds {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Font {
    pub fn from_bytes<N: Into<String>, D: Into<Vec<u8>>>(
        name: N,
        data: D,
        size: f32,
    ) -> Result<Font, EaselError> {
        let face = rusttype::Font::try_from_vec(data.into())
            .ok_or_else(|| EaselError::Font(String::from("Incorrect font data format")))?;
        Ok(Font {
            name: name.into(),
            face: Some(Arc::new(face)),
            size: clamp_size(size),
        })
    }

    pub fn load<P: AsRef<Path>>(path: P, size: f32) -> Result<Font, EaselError> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .map_err(|err| EaselError::Font(format!("Error loading font {:?}: {}", path, err)))?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Font::from_bytes(name, data, size)
    }

    /// The face bundled with the crate, used until a sketch picks its own.
    /// All builtin fonts share one parsed face.
    pub fn builtin(size: f32) -> Font {
        let face = BUILTIN_FACE
            .get_or_init(|| rusttype::Font::try_from_bytes(BUILTIN_DATA).map(Arc::new))
            .clone();
        if face.is_none() {
            log::warn!("builtin font face failed to parse, text will not be drawn");
        }
        Font {
            name: String::from(BUILTIN_NAME),
            face,
            size: clamp_size(size),
        }
    }

    /// A font without glyph outlines. Metrics are estimated from the size
    /// and painters draw nothing for it.
    pub fn fallback(size: f32) -> Font {
        Font {
            name: String::new(),
            face: None,
            size: clamp_size(size),
        }
    }

    pub fn with_size(&self, size: f32) -> Font {
        Font {
            size: clamp_size(size),
            ..self.clone()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn face(&self) -> Option<&rusttype::Font<'static>> {
        self.face.as_deref()
    }

    pub fn scale(&self) -> Scale {
        Scale::uniform(self.size)
    }

    pub fn ascent(&self) -> f32 {
        match self.face() {
            Some(face) => face.v_metrics(self.scale()).ascent,
            None => self.size * 0.8,
        }
    }

    /// Positive distance below the baseline.
    pub fn descent(&self) -> f32 {
        match self.face() {
            Some(face) => -face.v_metrics(self.scale()).descent,
            None => self.size * 0.2,
        }
    }

    pub fn line_gap(&self) -> f32 {
        match self.face() {
            Some(face) => face.v_metrics(self.scale()).line_gap,
            None => 0.0,
        }
    }

    pub fn height(&self) -> f32 {
        self.ascent() + self.descent() + self.line_gap()
    }

    pub fn width(&self, text: &str) -> f32 {
        match self.face() {
            Some(face) => face
                .layout(text, self.scale(), point(0.0, 0.0))
                .last()
                .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
                .unwrap_or(0.0),
            None => self.size * 0.5 * text.chars().count() as f32,
        }
    }

    pub fn text_bounds(&self, text: &str, x: f32, y: f32, size: Option<f32>) -> TextBounds {
        let font = match size {
            Some(size) => self.with_size(size),
            None => self.clone(),
        };
        TextBounds {
            x,
            y,
            w: font.width(text),
            h: font.height(),
        }
    }
}

fn clamp_size(size: f32) -> f32 {
    size.min(FONT_SIZE_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resizing_is_a_new_value() {
        let small = Font::fallback(12.0);
        let big = small.with_size(24.0);
        assert_eq!(small.size(), 12.0);
        assert_eq!(big.size(), 24.0);
        assert_ne!(small, big);
        assert_eq!(small.with_size(1000.0).size(), FONT_SIZE_MAX);
    }

    #[test]
    fn fallback_metrics() {
        let font = Font::fallback(10.0);
        assert_eq!(font.width("abcd"), 20.0);
        assert_eq!(font.ascent(), 8.0);
        assert_eq!(font.descent(), 2.0);
        let bounds = font.text_bounds("ab", 5.0, 6.0, Some(20.0));
        assert_eq!(bounds, TextBounds { x: 5.0, y: 6.0, w: 20.0, h: 20.0 });
    }

    #[test]
    fn builtin_has_a_shared_face() {
        let font = Font::builtin(20.0);
        assert!(font.face().is_some());
        assert_eq!(font.name(), "DejaVu Sans");
        assert_eq!(Font::builtin(20.0), font);
        assert!(font.width("HELLO") > 0.0);
        assert!(font.ascent() > font.descent());
    }

    #[test]
    fn rejects_garbage_font_data() {
        assert!(Font::from_bytes("bad", vec![0u8; 16], 12.0).is_err());
    }
}
