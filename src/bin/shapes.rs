//! Animated stress demo: a spinning pentagram, translucent overlays and a
//! stroked wave, with average frame-time reports every ~3 s.

use std::time::{Duration, Instant};

use clap::Parser;
use glam::Vec2;
use minifb::{Key, Window, WindowOptions};

use cellrast::{BlendMode, Color, Context, Image, LineJoin, PixelFormat, Raster, Source};

#[derive(Parser, Debug)]
#[command(version, about = "Animated rasterizer demo")]
struct Opts {
    /// Window width in pixels
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Window height in pixels
    #[arg(long, default_value_t = 600)]
    height: u32,
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();
    let (w, h) = (opts.width.max(64), opts.height.max(64));

    let mut image = Image::new(w, h, PixelFormat::Bgrx8)?;
    let mut raster = Raster::new(w, h)?;

    let mut window = Window::new(
        "cellrast – shapes",
        w as usize,
        h as usize,
        WindowOptions::default(),
    )?;
    window.set_target_fps(60);

    let center = Vec2::new(w as f32 * 0.5, h as f32 * 0.45);
    let radius = (w.min(h) as f32) * 0.32;

    // ────────────────── benchmarking state ──────────────────
    let mut acc_time = Duration::ZERO;
    let mut acc_frames = 0usize;
    let mut last_print = Instant::now();

    let mut angle = 0.0f32;

    while window.is_open() && !window.is_key_down(Key::Escape) {
        let t0 = Instant::now();
        angle += 0.01;

        {
            let mut ctx = Context::new(&mut image, &mut raster);
            ctx.clear_render_target(Color::from_u8(18, 18, 26, 255));

            // pentagram: five points joined with step 2, the self
            // intersections fill solid under non-zero winding
            let star: Vec<Vec2> = (0..5)
                .map(|i| {
                    let a = angle + i as f32 * (4.0 * std::f32::consts::PI / 5.0);
                    center + Vec2::new(a.cos(), a.sin()) * radius
                })
                .collect();
            ctx.set_source(Source::solid(Color::from_u8(250, 200, 60, 255)));
            ctx.draw_polygon(&star);

            // translucent triangles counter-rotating over the star
            ctx.set_source(Source::solid(Color::from_u8(90, 140, 255, 110)));
            for k in 0..3 {
                let base = -angle * 1.4 + k as f32 * 2.1;
                let tri: Vec<Vec2> = (0..3)
                    .map(|i| {
                        let a = base + i as f32 * (2.0 * std::f32::consts::PI / 3.0);
                        center + Vec2::new(a.cos(), a.sin()) * radius * 0.8
                    })
                    .collect();
                ctx.draw_polygon(&tri);
            }

            // stroked wave along the bottom, miter joins
            ctx.set_line_join(LineJoin::Miter);
            ctx.set_line_thickness(3.0);
            ctx.set_source(Source::solid(Color::from_u8(255, 90, 90, 255)));
            let wave: Vec<Vec2> = (0..=32)
                .map(|i| {
                    let t = i as f32 / 32.0;
                    Vec2::new(
                        t * (w as f32 - 40.0) + 20.0,
                        h as f32 * 0.85 + ((t * 6.0 + angle * 3.0).sin()) * h as f32 * 0.06,
                    )
                })
                .collect();
            ctx.draw_polyline(&wave, false);

            // punch a breathing hole through everything
            ctx.set_blend_mode(BlendMode::Clear);
            let hole = radius * (0.18 + 0.06 * (angle * 2.0).sin());
            ctx.draw_rect_filled(center.x - hole, center.y - hole, hole * 2.0, hole * 2.0);
            ctx.set_blend_mode(BlendMode::SrcOver);
        }

        acc_time += t0.elapsed();
        acc_frames += 1;
        window.update_with_buffer(image.data(), w as usize, h as usize)?;

        if last_print.elapsed() >= Duration::from_secs(3) {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames as f64;
            println!("avg raster: {:.2} ms  ({:.1} FPS possible)", avg_ms, 1000.0 / avg_ms);
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }
    }
    Ok(())
}
