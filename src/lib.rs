pub mod headless;
pub mod softimpl;

pub use headless::HeadlessWindow;
pub use softimpl::SoftPainter;

/// Canvas context of a sketch running in a [`HeadlessWindow`].
pub type Context = easel::Context<HeadlessWindow>;

/// Opens a headless window for `config` and runs `sketch` in it until the
/// window closes or the configured frame limit is reached.
pub fn run<S: easel::Sketch<HeadlessWindow>>(config: easel::SketchConfig, sketch: &mut S) -> anyhow::Result<Context> {
    let window = HeadlessWindow::open(config)?;
    let mut ctx = easel::Context::new(window)?;
    ctx.run(sketch, None)?;
    if let Some(err) = ctx.error() {
        log::warn!("sketch stopped: {}", err);
    }
    Ok(ctx)
}
