//! A window without a screen: frames are kept in memory and input is
//! queued by the caller. Useful for rendering sketches to files and for
//! driving them from tests.

use crate::softimpl::SoftPainter;
use anyhow::{ensure, Context as _};
use easel::sketch::{Event, Window};
use easel::{EaselError, Shader, SketchConfig};
use image::RgbaImage;
use std::path::Path;
use std::time::Instant;

pub struct HeadlessWindow {
    config: SketchConfig,
    position: (i32, i32),
    size: (u32, u32),
    resizable: bool,
    queued: Vec<Event>,
    frame: Option<RgbaImage>,
    presented: u64,
    opened: Instant,
    closed: bool,
}

impl HeadlessWindow {
    pub fn open(config: SketchConfig) -> anyhow::Result<HeadlessWindow> {
        ensure!(
            config.width > 0 && config.height > 0,
            "window size must not be empty: {}x{}",
            config.width,
            config.height
        );
        ensure!(
            config.pixel_density.is_finite() && config.pixel_density > 0.0,
            "invalid pixel density {}",
            config.pixel_density
        );
        log::info!("headless window '{}' {}x{}", config.title, config.width, config.height);
        Ok(HeadlessWindow {
            size: (config.width, config.height),
            config,
            position: (0, 0),
            resizable: false,
            queued: Vec::new(),
            frame: None,
            presented: 0,
            opened: Instant::now(),
            closed: false,
        })
    }

    /// Queues input for the next `poll_events`. Moves and resizes also
    /// update the window's own geometry, as a real window manager would.
    pub fn push_event(&mut self, event: Event) {
        match event {
            Event::WindowMoved { x, y } => self.position = (x, y),
            Event::WindowResized { width, height } => self.size = (width, height),
            _ => {}
        }
        self.queued.push(event);
    }

    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn is_resizable(&self) -> bool {
        self.resizable
    }

    pub fn frames_presented(&self) -> u64 {
        self.presented
    }

    /// The last presented frame, filter already applied.
    pub fn last_frame(&self) -> Option<&RgbaImage> {
        self.frame.as_ref()
    }

    pub fn save_frame<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        let frame = self
            .frame
            .as_ref()
            .context("no frame has been presented yet")?;
        frame
            .save(path)
            .with_context(|| format!("failed to save frame to {:?}", path))?;
        Ok(())
    }
}

impl Window for HeadlessWindow {
    type Painter = SoftPainter;

    fn create_canvas(&mut self, width: u32, height: u32, density: f32) -> Result<SoftPainter, EaselError> {
        SoftPainter::create(width, height, density)
    }

    fn title(&self) -> &str {
        &self.config.title
    }

    fn set_title(&mut self, title: &str) {
        self.config.title = title.to_string();
    }

    fn position(&self) -> (i32, i32) {
        self.position
    }

    fn set_position(&mut self, x: i32, y: i32) {
        self.position = (x, y);
    }

    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    fn set_resizable(&mut self, resizable: bool) {
        self.resizable = resizable;
    }

    fn screen_size(&self) -> (u32, u32) {
        self.size
    }

    fn display_density(&self) -> f32 {
        self.config.pixel_density
    }

    fn frame_rate(&self) -> f32 {
        let elapsed = self.opened.elapsed().as_secs_f32();
        if elapsed > 0.0 {
            self.presented as f32 / elapsed
        } else {
            0.0
        }
    }

    fn is_focused(&self) -> bool {
        !self.closed
    }

    fn poll_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.queued)
    }

    fn is_closed(&self) -> bool {
        self.closed || self.config.frame_limit.map_or(false, |limit| self.presented >= limit)
    }

    fn present(&mut self, canvas: &RgbaImage, filter: Option<&Shader>) -> Result<(), EaselError> {
        let frame = match filter.and_then(Shader::filter) {
            Some(filter) => filter.apply(canvas),
            None => {
                if filter.is_some() {
                    log::trace!("custom shaders are not run by the headless window");
                }
                canvas.clone()
            }
        };
        self.frame = Some(frame);
        self.presented += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_size() {
        assert!(HeadlessWindow::open(SketchConfig::default().size(0, 10)).is_err());
        assert!(HeadlessWindow::open(SketchConfig::default().pixel_density(-1.0)).is_err());
    }

    #[test]
    fn closes_after_frame_limit() {
        let mut window = HeadlessWindow::open(SketchConfig::default().size(4, 4).frame_limit(2)).unwrap();
        let canvas = RgbaImage::new(4, 4);
        assert!(!window.is_closed());
        window.present(&canvas, None).unwrap();
        window.present(&canvas, None).unwrap();
        assert!(window.is_closed());
        assert!(window.save_frame(std::env::temp_dir().join("easel-headless.png")).is_ok());
    }

    #[test]
    fn queued_events_update_geometry() {
        let mut window = HeadlessWindow::open(SketchConfig::default().size(4, 4)).unwrap();
        window.push_event(Event::WindowMoved { x: 3, y: 4 });
        window.push_event(Event::WindowResized { width: 8, height: 6 });
        assert_eq!(window.position(), (3, 4));
        assert_eq!(window.size(), (8, 6));
        assert_eq!(window.poll_events().len(), 2);
        assert!(window.poll_events().is_empty());
        assert!(window.save_frame("unused.png").is_err());
    }
}
