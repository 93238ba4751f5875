use easel::sketch::Sketch;
use easel::{AngleMode, CoordMode, EaselError, EndMode, FilterKind, Shape, ShapeType, SketchConfig};
use easel_raster::{Context, HeadlessWindow};

const LOGO: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100">
  <g>
    <circle cx="50" cy="50" r="90" fill="#f4c542" stroke="#222" stroke-width="4"/>
    <path d="M30 65 Q50 85 70 65" fill="none" stroke="#222" stroke-width="4" stroke-linecap="round"/>
    <ellipse cx="35" cy="40" rx="12" ry="18" fill="#222"/>
    <ellipse cx="65" cy="40" rx="12" ry="18" fill="#222"/>
  </g>
</svg>"##;

struct Shapes {
    logo: Option<Shape>,
    star: Option<Shape>,
}

impl Sketch<HeadlessWindow> for Shapes {
    fn setup(&mut self, ctx: &mut Context) -> Result<(), EaselError> {
        ctx.size(400, 300, None)?;
        ctx.angle_mode(AngleMode::Degrees);
        self.logo = Some(easel::svg::parse(LOGO, AngleMode::Degrees)?);

        let mut star = ctx.create_shape_builder(ShapeType::Polygon);
        for i in 0..10 {
            let r = if i % 2 == 0 { 40.0 } else { 16.0 };
            let a = (i as f32 * 36.0 - 90.0).to_radians();
            star.vertex(r * a.cos(), r * a.sin());
        }
        self.star = Some(star.end(EndMode::Close));
        ctx.random_seed(7);
        Ok(())
    }

    fn draw(&mut self, ctx: &mut Context) -> Result<(), EaselError> {
        ctx.background(240)?;

        ctx.begin_shape(ShapeType::Polygon)?;
        ctx.fill((80, 120, 200))?;
        ctx.vertex(20.0, 280.0)?;
        ctx.bezier_vertex(80.0, 180.0, 160.0, 320.0, 220.0, 240.0)?;
        ctx.vertex(220.0, 290.0)?;
        ctx.end_shape(EndMode::Close)?;

        if let Some(logo) = &self.logo {
            ctx.shape_mode(CoordMode::Center)?;
            ctx.shape_rect(logo, 300.0, 90.0, 120.0, 120.0)?;
        }

        if let Some(star) = &self.star {
            for _ in 0..5 {
                let (x, y) = (ctx.random_range(40.0, 360.0), ctx.random_range(40.0, 200.0));
                let spin = ctx.random_to(72.0);
                let red = ctx.random_to(255.0);
                let color = ctx.color((red, 80.0, 120.0))?;
                ctx.push_with(|ctx| {
                    ctx.translate(x, y)?;
                    ctx.rotate(spin)?;
                    ctx.fill(color)?;
                    ctx.shape_mode(CoordMode::Corner)?;
                    ctx.shape(star, 0.0, 0.0)
                })?;
            }
        }

        ctx.stroke(30)?;
        ctx.stroke_weight(3.0);
        ctx.no_fill();
        ctx.arc(100.0, 90.0, 120.0, 120.0, 0.0, 270.0)?;
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = SketchConfig::default().title("shapes").frame_limit(1);
    let mut sketch = Shapes { logo: None, star: None };
    let mut ctx = easel_raster::run(config, &mut sketch)?;
    if let Some(err) = ctx.error() {
        anyhow::bail!("sketch failed: {}", err);
    }
    ctx.window().save_frame("shapes.png")?;

    ctx.filter(FilterKind::Gray, None);
    ctx.present()?;
    ctx.window().save_frame("shapes-gray.png")?;
    log::info!("wrote shapes.png and shapes-gray.png");
    Ok(())
}
