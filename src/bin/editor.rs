//! Interactive anti-aliasing inspector.
//!
//! A polygon is rasterised into a small canvas, and every canvas pixel is
//! shown magnified so the coverage ramps along the edges are visible.  The
//! polygon's outline is stroked on top at the magnified scale.
//!
//! * left-drag — move the nearest vertex
//! * right-click — append a vertex
//! * backspace — remove the last vertex
//! * escape — quit

use clap::Parser;
use glam::Vec2;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use cellrast::{Color, Context, Image, PixelFormat, Raster, Source};

/// CLI options handled via `clap` derive.
#[derive(Parser, Debug)]
#[command(version, about = "Magnified view of the rasterizer's pixel coverage")]
struct Opts {
    /// Window width in pixels
    #[arg(long, default_value_t = 960)]
    width: u32,

    /// Window height in pixels
    #[arg(long, default_value_t = 640)]
    height: u32,

    /// Magnification factor (one canvas pixel = zoom² window pixels)
    #[arg(long, default_value_t = 16)]
    zoom: u32,
}

/// RGBA8 → the 0x00RRGGBB word minifb wants (our Bgrx8).
fn rgba8_to_bgrx8(p: u32) -> u32 {
    let r = p & 0xFF;
    let g = (p >> 8) & 0xFF;
    let b = (p >> 16) & 0xFF;
    0xFF00_0000 | (r << 16) | (g << 8) | b
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();
    let zoom = opts.zoom.clamp(2, 64);
    // window snapped to whole magnified canvas pixels
    let canvas_w = (opts.width.max(64) / zoom).max(1);
    let canvas_h = (opts.height.max(64) / zoom).max(1);
    let (win_w, win_h) = (canvas_w * zoom, canvas_h * zoom);
    let zoom_f = zoom as f32;

    // small canvas the polygon is rasterised into
    let mut canvas = Image::new(canvas_w, canvas_h, PixelFormat::Rgba8)?;
    let mut canvas_raster = Raster::new(canvas_w, canvas_h)?;
    // magnified view, blitted to the window as-is
    let mut view = Image::new(win_w, win_h, PixelFormat::Bgrx8)?;
    let mut view_raster = Raster::new(win_w, win_h)?;

    let mut points = vec![
        Vec2::new(canvas_w as f32 * 0.2, canvas_h as f32 * 0.7),
        Vec2::new(canvas_w as f32 * 0.5, canvas_h as f32 * 0.15),
        Vec2::new(canvas_w as f32 * 0.8, canvas_h as f32 * 0.75),
    ];
    let mut dragged: Option<usize> = None;
    let mut right_was_down = false;

    let mut window = Window::new(
        "cellrast – coverage inspector",
        win_w as usize,
        win_h as usize,
        WindowOptions::default(),
    )?;
    window.set_target_fps(60);

    while window.is_open() && !window.is_key_down(Key::Escape) {
        /* ---------------- input ---------------- */
        let mouse = window
            .get_mouse_pos(MouseMode::Clamp)
            .map(|(x, y)| Vec2::new(x / zoom_f, y / zoom_f));

        if let Some(pos) = mouse {
            if window.get_mouse_down(MouseButton::Left) {
                if dragged.is_none() {
                    dragged = nearest_point(&points, pos, 12.0 / zoom_f);
                }
                if let Some(i) = dragged {
                    points[i] = pos;
                }
            } else {
                dragged = None;
            }

            let right_down = window.get_mouse_down(MouseButton::Right);
            if right_down && !right_was_down {
                points.push(pos);
            }
            right_was_down = right_down;
        }

        if window.is_key_pressed(Key::Backspace, KeyRepeat::No) && points.len() > 3 {
            points.pop();
        }

        /* ------------- rasterise the canvas ------------- */
        {
            let mut ctx = Context::new(&mut canvas, &mut canvas_raster);
            ctx.clear_render_target(Color::from_u8(12, 12, 20, 255));
            ctx.set_source(Source::solid(Color::from_u8(235, 235, 235, 255)));
            ctx.draw_polygon(&points);
        }

        /* ------------- magnify into the view ------------- */
        {
            let view_w = view.width() as usize;
            let data = view.data_mut();
            for cy in 0..canvas_h {
                for cx in 0..canvas_w {
                    let color = rgba8_to_bgrx8(canvas.pixel(cx, cy));
                    let base_y = (cy * zoom) as usize;
                    let base_x = (cx * zoom) as usize;
                    for dy in 0..zoom as usize {
                        let row = (base_y + dy) * view_w + base_x;
                        data[row..row + zoom as usize].fill(color);
                    }
                }
            }
        }

        /* ------------- overlay outline and handles ------------- */
        {
            let mut ctx = Context::new(&mut view, &mut view_raster);
            ctx.set_line_thickness(1.5);
            ctx.set_source(Source::solid(Color::from_u8(255, 140, 40, 255)));
            let magnified: Vec<Vec2> = points.iter().map(|&p| p * zoom_f).collect();
            ctx.draw_polyline(&magnified, true);

            ctx.set_source(Source::solid(Color::from_u8(80, 170, 255, 255)));
            for &p in &magnified {
                ctx.draw_rect_filled(p.x - 2.5, p.y - 2.5, 5.0, 5.0);
            }
        }

        window.update_with_buffer(view.data(), win_w as usize, win_h as usize)?;
    }
    Ok(())
}

/// Index of the point within `radius` of `pos`, if any.
fn nearest_point(points: &[Vec2], pos: Vec2, radius: f32) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &p) in points.iter().enumerate() {
        let d = (p - pos).length_squared();
        if d < radius * radius && best.is_none_or(|(_, bd)| d < bd) {
            best = Some((i, d));
        }
    }
    best.map(|(i, _)| i)
}
