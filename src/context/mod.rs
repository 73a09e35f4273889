//! Drawing context – binds a render target, a cell raster and the scalar
//! draw state, and exposes the drawing operations.
//!
//! A context *borrows* its buffers; it owns only scalar state.  Every
//! `draw_*` operation is plot → render → discard: geometry is clipped and
//! walked into the raster's current generation, composited onto the render
//! target, then the generation is advanced so the next draw starts from a
//! logically clean grid.

mod clip;
mod composite;
mod stroke;

pub use stroke::LineJoin;

use glam::Vec2;
use smallvec::SmallVec;

use crate::blend::BlendMode;
use crate::color::{Color, Source};
use crate::geom::{ClipBox, ClipFlags, Rect};
use crate::image::Image;
use crate::raster::{Raster, to_fixed};

pub struct Context<'a> {
    rt: &'a mut Image,
    raster: &'a mut Raster,
    source: Source,
    blend_mode: BlendMode,
    line_join: LineJoin,
    half_thickness: f32,
    miter_limit: f32,
    clip_box: ClipBox,

    /* clip plotter pen */
    pen: Vec2,
    pen_clip: ClipFlags,
    bridges: SmallVec<[Vec2; 3]>,

    /* scratch reused by closed strokes */
    ring_scratch: Vec<Vec2>,
}

impl<'a> Context<'a> {
    /// Bind a render target and a raster.  The clip box starts at the full
    /// raster extent; the source defaults to opaque black over SrcOver.
    pub fn new(rt: &'a mut Image, raster: &'a mut Raster) -> Self {
        let clip_box = raster_extent(raster);
        Self {
            rt,
            raster,
            source: Source::solid(Color::new(0.0, 0.0, 0.0, 1.0)),
            blend_mode: BlendMode::SrcOver,
            line_join: LineJoin::Miter,
            half_thickness: 0.5,
            miter_limit: 4.0,
            clip_box,
            pen: Vec2::ZERO,
            pen_clip: ClipFlags::empty(),
            bridges: SmallVec::new(),
            ring_scratch: Vec::new(),
        }
    }

    /* ----------------------------- state ----------------------------- */

    pub fn set_render_target(&mut self, rt: &'a mut Image) {
        self.rt = rt;
    }

    /// Re-point at another raster.  The clip box is re-clamped so it never
    /// exceeds the new grid.
    pub fn set_raster(&mut self, raster: &'a mut Raster) {
        self.clip_box = self.clip_box.intersect(raster_extent(raster));
        self.raster = raster;
    }

    /// Clip subsequent plotting to `rect` (intersected with the raster
    /// extent), or reset to the full raster extent with `None`.
    pub fn set_clip_rect(&mut self, rect: Option<&Rect>) {
        let extent = raster_extent(self.raster);
        self.clip_box = match rect {
            Some(rect) => ClipBox::from_rect(rect).intersect(extent),
            None => extent,
        };
    }

    pub fn set_source(&mut self, source: Source) {
        self.source = source;
    }

    pub fn set_blend_mode(&mut self, mode: BlendMode) {
        self.blend_mode = mode;
    }

    /// Full stroke thickness in pixels (stored halved).
    pub fn set_line_thickness(&mut self, thickness: f32) {
        self.half_thickness = thickness * 0.5;
    }

    pub fn set_line_join(&mut self, join: LineJoin) {
        self.line_join = join;
    }

    /// Ratio of miter length to half-thickness beyond which a joint
    /// degenerates to a bevel.
    pub fn set_miter_limit(&mut self, limit: f32) {
        self.miter_limit = limit;
    }

    pub fn clip_box(&self) -> ClipBox {
        self.clip_box
    }

    /// Fill the render target with `color` encoded in its own format.
    pub fn clear_render_target(&mut self, color: Color) {
        self.rt.clear(color);
    }

    /* ------------------------- geometry input ------------------------ */

    /// Walk one edge into the raster, in pixel-space floats.
    ///
    /// This bypasses clipping; callers must stay inside the raster extent.
    pub fn add_edge(&mut self, p0: Vec2, p1: Vec2) {
        self.raster
            .add_edge(to_fixed(p0.x), to_fixed(p0.y), to_fixed(p1.x), to_fixed(p1.y));
    }

    /// Plot a closed polygon through the clip plotter.
    pub fn add_polygon(&mut self, verts: &[Vec2]) {
        if verts.len() < 3 {
            return;
        }
        self.plot_move_to(verts[0]);
        for &v in &verts[1..] {
            self.plot_line_to(v);
        }
        self.plot_line_to(verts[0]);
        self.plot_close();
    }

    /// Plot a closed polygon given by indices into a vertex pool.
    pub fn add_polygon_indexed(&mut self, verts: &[Vec2], indices: &[u32]) {
        if indices.len() < 3 {
            return;
        }
        let first = verts[indices[0] as usize];
        self.plot_move_to(first);
        for &i in &indices[1..] {
            self.plot_line_to(verts[i as usize]);
        }
        self.plot_line_to(first);
        self.plot_close();
    }

    /* ------------------------ draw operations ------------------------ */

    pub fn draw_rect_filled(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let (x1, y1) = (x + w, y + h);
        self.plot_move_to(Vec2::new(x, y));
        self.plot_line_to(Vec2::new(x1, y));
        self.plot_line_to(Vec2::new(x1, y1));
        self.plot_line_to(Vec2::new(x, y1));
        self.plot_line_to(Vec2::new(x, y));
        self.plot_close();
        self.render();
        self.discard();
    }

    pub fn draw_triangle_filled(&mut self, v0: Vec2, v1: Vec2, v2: Vec2) {
        self.plot_move_to(v0);
        self.plot_line_to(v1);
        self.plot_line_to(v2);
        self.plot_line_to(v0);
        self.plot_close();
        self.render();
        self.discard();
    }

    pub fn draw_polygon(&mut self, verts: &[Vec2]) {
        self.add_polygon(verts);
        self.render();
        self.discard();
    }

    pub fn draw_polygon_indexed(&mut self, verts: &[Vec2], indices: &[u32]) {
        self.add_polygon_indexed(verts, indices);
        self.render();
        self.discard();
    }

    pub fn draw_polyline(&mut self, verts: &[Vec2], close: bool) {
        self.add_polyline(verts, close);
        self.render();
        self.discard();
    }

    pub fn draw_line(&mut self, v0: Vec2, v1: Vec2) {
        self.add_line(v0, v1);
        self.render();
        self.discard();
    }

    /// Drop the raster's current coverage (counter bump, no writes).
    pub fn discard(&mut self) {
        self.raster.discard();
    }
}

fn raster_extent(raster: &Raster) -> ClipBox {
    ClipBox::new(0.0, 0.0, raster.width() as f32, raster.height() as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{PackedColor, PixelFormat};

    const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);
    const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);

    fn buffers(w: u32, h: u32) -> (Image, Raster) {
        (
            Image::new(w, h, PixelFormat::Rgba8).unwrap(),
            Raster::new(w, h).unwrap(),
        )
    }

    /*------------------------------------------------------------------*/
    /* Clip box bookkeeping                                             */
    /*------------------------------------------------------------------*/

    #[test]
    fn clip_rect_is_clamped_to_the_raster() {
        let (mut img, mut raster) = buffers(10, 10);
        let mut ctx = Context::new(&mut img, &mut raster);
        ctx.set_clip_rect(Some(&Rect::new(-5.0, 2.0, 100.0, 4.0)));
        assert_eq!(ctx.clip_box(), ClipBox::new(0.0, 2.0, 10.0, 6.0));
        ctx.set_clip_rect(None);
        assert_eq!(ctx.clip_box(), ClipBox::new(0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn repointing_the_raster_reclamps_the_clip() {
        let (mut img, mut raster) = buffers(10, 10);
        let mut small = Raster::new(4, 4).unwrap();
        let mut ctx = Context::new(&mut img, &mut raster);
        ctx.set_raster(&mut small);
        assert_eq!(ctx.clip_box(), ClipBox::new(0.0, 0.0, 4.0, 4.0));
    }

    /*------------------------------------------------------------------*/
    /* Scenario: clip idempotence                                       */
    /*------------------------------------------------------------------*/

    fn render_pentagon(clip: Option<Rect>) -> Vec<PackedColor> {
        let verts = [
            Vec2::new(4.0, 1.0),
            Vec2::new(12.5, 3.5),
            Vec2::new(11.0, 12.0),
            Vec2::new(6.5, 14.5),
            Vec2::new(1.5, 8.0),
        ];
        let (mut img, mut raster) = buffers(16, 16);
        let mut ctx = Context::new(&mut img, &mut raster);
        ctx.clear_render_target(BLACK);
        ctx.set_source(Source::solid(WHITE));
        ctx.set_clip_rect(clip.as_ref());
        ctx.draw_polygon(&verts);
        drop(ctx);
        img.data().to_vec()
    }

    /// A clip rect containing the whole shape changes nothing.
    #[test]
    fn clip_containing_the_shape_is_identity() {
        let unclipped = render_pentagon(None);
        let clipped = render_pentagon(Some(Rect::new(1.0, 0.5, 14.0, 15.0)));
        assert_eq!(unclipped, clipped);
    }

    /*------------------------------------------------------------------*/
    /* Scenario: clip bridge along the border                           */
    /*------------------------------------------------------------------*/

    #[test]
    fn clipped_band_fills_exactly_to_the_border() {
        let (mut img, mut raster) = buffers(100, 100);
        let mut ctx = Context::new(&mut img, &mut raster);
        ctx.clear_render_target(BLACK);
        ctx.set_source(Source::solid(WHITE));
        ctx.set_clip_rect(Some(&Rect::new(20.0, 0.0, 80.0, 100.0)));
        ctx.draw_polygon(&[
            Vec2::new(0.0, 10.0),
            Vec2::new(100.0, 10.0),
            Vec2::new(100.0, 90.0),
            Vec2::new(0.0, 90.0),
        ]);
        drop(ctx);

        let white = WHITE.to_rgba8();
        let black = BLACK.to_rgba8();
        for y in 0..100 {
            for x in 0..100 {
                let expected = if (20..100).contains(&x) && (10..90).contains(&y) {
                    white
                } else {
                    black
                };
                assert_eq!(img.pixel(x, y), expected, "pixel ({x},{y})");
            }
        }
    }

    /// The same band, pre-clipped analytically, produces the identical
    /// cell grid: bridge edges land exactly on the border.
    #[test]
    fn bridged_cells_match_an_analytic_clip() {
        let straddling = [
            Vec2::new(0.0, 10.0),
            Vec2::new(100.0, 10.0),
            Vec2::new(100.0, 90.0),
            Vec2::new(0.0, 90.0),
        ];
        let analytic = [
            Vec2::new(20.0, 10.0),
            Vec2::new(100.0, 10.0),
            Vec2::new(100.0, 90.0),
            Vec2::new(20.0, 90.0),
        ];

        let (mut img, mut raster_a) = buffers(100, 100);
        {
            let mut ctx = Context::new(&mut img, &mut raster_a);
            ctx.set_clip_rect(Some(&Rect::new(20.0, 0.0, 80.0, 100.0)));
            ctx.add_polygon(&straddling);
        }
        let mut raster_b = Raster::new(100, 100).unwrap();
        {
            let mut ctx = Context::new(&mut img, &mut raster_b);
            ctx.add_polygon(&analytic);
        }
        assert_eq!(raster_a.cells(), raster_b.cells());
    }

    /*------------------------------------------------------------------*/
    /* Scenario: discard between frames                                 */
    /*------------------------------------------------------------------*/

    #[test]
    fn second_frame_sees_no_residue() {
        let red = Color::new(1.0, 0.0, 0.0, 1.0);

        // frame 1 white, frame 2 red, both opaque: result must equal a
        // fresh single red draw
        let (mut img, mut raster) = buffers(4, 4);
        {
            let mut ctx = Context::new(&mut img, &mut raster);
            ctx.clear_render_target(BLACK);
            ctx.set_source(Source::solid(WHITE));
            ctx.draw_rect_filled(1.0, 1.0, 1.0, 1.0);
            ctx.set_source(Source::solid(red));
            ctx.draw_rect_filled(1.0, 1.0, 1.0, 1.0);
        }
        assert_eq!(img.pixel(1, 1), red.to_rgba8());
        assert_eq!(img.pixel(0, 0), BLACK.to_rgba8());
    }

    /*------------------------------------------------------------------*/
    /* Re-pointing buffers between draws                                */
    /*------------------------------------------------------------------*/

    #[test]
    fn render_target_can_be_swapped_between_draws() {
        let mut first = Image::new(4, 4, PixelFormat::Rgba8).unwrap();
        let mut second = Image::new(4, 4, PixelFormat::Rgba8).unwrap();
        let mut raster = Raster::new(4, 4).unwrap();
        {
            let mut ctx = Context::new(&mut first, &mut raster);
            ctx.set_source(Source::solid(WHITE));
            ctx.draw_rect_filled(0.0, 0.0, 4.0, 4.0);
            ctx.set_render_target(&mut second);
            ctx.draw_rect_filled(0.0, 0.0, 2.0, 2.0);
        }
        assert_eq!(first.pixel(3, 3), WHITE.to_rgba8());
        assert_eq!(second.pixel(1, 1), WHITE.to_rgba8());
        assert_eq!(second.pixel(3, 3), 0);
    }

    #[test]
    fn indexed_polygon_matches_direct_order() {
        let verts = [
            Vec2::new(9.0, 2.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(9.0, 9.0),
            Vec2::new(2.0, 9.0),
        ];
        let (mut img, mut raster_a) = buffers(12, 12);
        {
            let mut ctx = Context::new(&mut img, &mut raster_a);
            ctx.add_polygon(&[verts[1], verts[0], verts[2], verts[3]]);
        }
        let mut raster_b = Raster::new(12, 12).unwrap();
        {
            let mut ctx = Context::new(&mut img, &mut raster_b);
            ctx.add_polygon_indexed(&verts, &[1, 0, 2, 3]);
        }
        assert_eq!(raster_a.cells(), raster_b.cells());
    }
}
