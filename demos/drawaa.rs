use easel::sketch::Sketch;
use easel::{Align, CoordMode, EaselError, LineCap, LineJoin, SketchConfig};
use easel_raster::{Context, HeadlessWindow};

struct Stage;

impl Sketch<HeadlessWindow> for Stage {
    fn setup(&mut self, ctx: &mut Context) -> Result<(), EaselError> {
        ctx.size(640, 480, None)
    }

    fn draw(&mut self, ctx: &mut Context) -> Result<(), EaselError> {
        ctx.background((0x30, 0x30, 0x38))?;

        ctx.no_stroke();
        ctx.fill((0xAA, 0x6C, 0x39))?;
        ctx.rounded_rect(100.0, 100.0, 400.0, 300.0, 24.0)?;

        let origin = (150.0, 140.0);
        ctx.fill((0x88, 0x2D, 0x60, 200))?;
        ctx.stroke(255)?;
        ctx.stroke_weight(6.0);
        ctx.circle(origin.0, origin.1, 128.0)?;

        ctx.stroke_cap(LineCap::Round);
        ctx.line(origin.0, origin.1, origin.0 + 300.0, origin.1 - 50.0)?;

        ctx.no_fill();
        ctx.stroke((0x3a, 0xc0, 0x8e))?;
        ctx.stroke_join(LineJoin::Miter);
        ctx.stroke_weight(10.0);
        ctx.triangle(300.0, 180.0, 460.0, 360.0, 200.0, 330.0)?;

        ctx.push_with(|ctx| {
            ctx.translate(500.0, 380.0)?;
            ctx.rotate(0.4)?;
            ctx.rect_mode(CoordMode::Center);
            ctx.fill((255, 255, 255, 120))?;
            ctx.no_stroke();
            ctx.rect(0.0, 0.0, 120.0, 60.0)
        })?;

        ctx.text_size(32.0);
        ctx.text_align(Align::CENTER, None);
        ctx.fill(255)?;
        ctx.text("easel", 320.0, 450.0)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = SketchConfig::default().title("drawaa").frame_limit(1);
    let ctx = easel_raster::run(config, &mut Stage)?;
    if let Some(err) = ctx.error() {
        anyhow::bail!("sketch failed: {}", err);
    }
    ctx.window().save_frame("drawaa.png")?;
    log::info!("wrote drawaa.png");
    Ok(())
}
