//! Pen-based line plotter with box clipping.
//!
//! Segments are classified with outcodes, then non-trivial crossings are
//! clipped Liang–Barsky style against all four sides.  When the path leaves
//! the box the exit point is pushed on a small stack; when it re-enters, the
//! pending exit is popped and a *bridge* edge is emitted along the border
//! from exit to entry.  Bridges are what keep the winding of a clipped
//! outline correct for pixels lying against the clip border — without them
//! the coverage left of the border would leak.  [`Context::plot_close`]
//! drains any pending pair the same way.
//!
//! An intersection point is computed once and shared by every edge that
//! references it, so its fixed-point rounding is identical on both sides and
//! cover/area cancel exactly along the border.

use glam::Vec2;

use super::Context;
use crate::geom::clip_flags;

impl Context<'_> {
    /// Lift the pen and put it down at `p`, forgetting any pending bridges.
    pub fn plot_move_to(&mut self, p: Vec2) {
        self.pen = p;
        self.pen_clip = clip_flags(p, &self.clip_box);
        self.bridges.clear();
    }

    /// Draw from the pen to `p`, clipping against the clip box.
    pub fn plot_line_to(&mut self, p: Vec2) {
        let p_clip = clip_flags(p, &self.clip_box);
        let pen = self.pen;
        let pen_clip = self.pen_clip;
        self.pen = p;
        self.pen_clip = p_clip;

        // Trivial accept: both endpoints inside.
        if (pen_clip | p_clip).is_empty() {
            self.add_edge(pen, p);
            return;
        }
        // Trivial reject: both endpoints beyond the same side.  Any
        // vertical excursion is accounted for by the eventual bridge.
        if !(pen_clip & p_clip).is_empty() {
            return;
        }

        // Liang–Barsky: parametric span of the segment inside the box.
        let d = p - pen;
        let b = self.clip_box;
        let mut t0 = 0.0f32;
        let mut t1 = 1.0f32;
        for (pk, qk) in [
            (-d.x, pen.x - b.x0),
            (d.x, b.x1 - pen.x),
            (-d.y, pen.y - b.y0),
            (d.y, b.y1 - pen.y),
        ] {
            if pk == 0.0 {
                // parallel to this side; outcodes already decided it
                continue;
            }
            let t = qk / pk;
            if pk < 0.0 {
                if t > t0 {
                    t0 = t;
                }
            } else if t < t1 {
                t1 = t;
            }
        }
        let entering = !pen_clip.is_empty();
        let leaving = !p_clip.is_empty();

        if t0 < t1 {
            let start = if entering { self.snap(pen + d * t0) } else { pen };
            let end = if leaving { self.snap(pen + d * t1) } else { p };
            if entering {
                self.bridge_entry(start);
            }
            self.add_edge(start, end);
            if leaving {
                self.bridges.push(end);
            }
        } else if entering != leaving {
            // Grazing transition: the visible span is a single point on the
            // border, but the exit/entry pairing must still record it.
            let touch = self.snap(if entering { p } else { pen });
            if entering {
                self.bridge_entry(touch);
            } else {
                self.bridges.push(touch);
            }
        }
        // both outside with t0 >= t1: passes a corner without entering
    }

    /// Close the current subpath along the clip border, emitting bridges for
    /// any still-pending exit/entry pair.
    pub fn plot_close(&mut self) {
        while let Some(exit) = self.bridges.pop() {
            let Some(entry) = self.bridges.pop() else { break };
            self.add_edge(exit, entry);
        }
        self.bridges.clear();
    }

    /// Pair a re-entry with the pending exit, or remember it for
    /// [`plot_close`](Context::plot_close) when the path began outside.
    fn bridge_entry(&mut self, entry: Vec2) {
        if let Some(exit) = self.bridges.pop() {
            self.add_edge(exit, entry);
        } else {
            self.bridges.push(entry);
        }
    }

    /// Pin an intersection point onto the clip border.
    fn snap(&self, p: Vec2) -> Vec2 {
        let b = &self.clip_box;
        Vec2::new(p.x.clamp(b.x0, b.x1), p.y.clamp(b.y0, b.y1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::PixelFormat;
    use crate::geom::Rect;
    use crate::image::Image;
    use crate::raster::Raster;

    fn buffers(w: u32, h: u32) -> (Image, Raster) {
        (
            Image::new(w, h, PixelFormat::Rgba8).unwrap(),
            Raster::new(w, h).unwrap(),
        )
    }

    fn plot_closed(ctx: &mut Context<'_>, verts: &[Vec2]) {
        ctx.plot_move_to(verts[0]);
        for &v in &verts[1..] {
            ctx.plot_line_to(v);
        }
        ctx.plot_line_to(verts[0]);
        ctx.plot_close();
    }

    fn row_cover_sum(raster: &Raster, y: u32) -> i64 {
        (0..raster.stride())
            .map(|x| raster.coverage(x, y).0 as i64)
            .sum()
    }

    /*------------------------------------------------------------------*/
    /* 1. Unclipped paths match direct edge walking                     */
    /*------------------------------------------------------------------*/

    #[test]
    fn interior_path_equals_direct_edges() {
        let verts = [
            Vec2::new(1.5, 1.0),
            Vec2::new(6.0, 2.5),
            Vec2::new(4.5, 6.5),
        ];
        let (mut img, mut plotted) = buffers(8, 8);
        {
            let mut ctx = Context::new(&mut img, &mut plotted);
            plot_closed(&mut ctx, &verts);
        }
        let mut direct = Raster::new(8, 8).unwrap();
        {
            let mut ctx = Context::new(&mut img, &mut direct);
            for i in 0..verts.len() {
                ctx.add_edge(verts[i], verts[(i + 1) % verts.len()]);
            }
        }
        assert_eq!(plotted.cells(), direct.cells());
    }

    /*------------------------------------------------------------------*/
    /* 2. Clipped closed paths still cancel per row                     */
    /*------------------------------------------------------------------*/

    /// Whatever the clip does, a closed input must stay closed: covers on
    /// every row sum to zero.
    #[test]
    fn clipped_outlines_remain_closed() {
        let shapes: &[&[Vec2]] = &[
            // straddles the left border
            &[
                Vec2::new(-3.0, 2.0),
                Vec2::new(6.0, 3.0),
                Vec2::new(5.0, 7.0),
                Vec2::new(-2.5, 6.0),
            ],
            // straddles top and bottom
            &[
                Vec2::new(2.0, -4.0),
                Vec2::new(7.5, -1.0),
                Vec2::new(6.0, 12.0),
                Vec2::new(1.0, 11.0),
            ],
            // crosses a corner
            &[
                Vec2::new(-2.0, 1.0),
                Vec2::new(4.0, -2.0),
                Vec2::new(6.0, 5.0),
            ],
            // completely surrounds the clip box
            &[
                Vec2::new(-10.0, -10.0),
                Vec2::new(18.0, -10.0),
                Vec2::new(18.0, 18.0),
                Vec2::new(-10.0, 18.0),
            ],
        ];
        for verts in shapes {
            let (mut img, mut raster) = buffers(8, 8);
            {
                let mut ctx = Context::new(&mut img, &mut raster);
                plot_closed(&mut ctx, verts);
            }
            for y in 0..8 {
                assert_eq!(row_cover_sum(&raster, y), 0, "shape {verts:?} row {y}");
            }
        }
    }

    /*------------------------------------------------------------------*/
    /* 3. Bridge geometry                                               */
    /*------------------------------------------------------------------*/

    /// A band crossing both x borders: the interior segment is emitted and
    /// both border runs come from bridges (stack reaches depth 2).
    #[test]
    fn double_crossing_band_matches_the_clipped_rectangle() {
        let band = [
            Vec2::new(-4.0, 2.0),
            Vec2::new(12.0, 2.0),
            Vec2::new(12.0, 6.0),
            Vec2::new(-4.0, 6.0),
        ];
        let clipped_band = [
            Vec2::new(0.0, 2.0),
            Vec2::new(8.0, 2.0),
            Vec2::new(8.0, 6.0),
            Vec2::new(0.0, 6.0),
        ];
        let (mut img, mut clipped) = buffers(8, 8);
        {
            let mut ctx = Context::new(&mut img, &mut clipped);
            plot_closed(&mut ctx, &band);
        }
        let mut direct = Raster::new(8, 8).unwrap();
        {
            let mut ctx = Context::new(&mut img, &mut direct);
            plot_closed(&mut ctx, &clipped_band);
        }
        for y in 0..8 {
            for x in 0..9 {
                assert_eq!(
                    clipped.coverage(x, y),
                    direct.coverage(x, y),
                    "cell ({x},{y})"
                );
            }
        }
    }

    /// Exit and later entry on the same side are bridged along the border.
    #[test]
    fn left_excursion_projects_onto_the_border() {
        let excursion = [
            Vec2::new(4.0, 1.0),
            Vec2::new(4.0, 7.0),
            Vec2::new(-6.0, 7.0),
            Vec2::new(-6.0, 1.0),
        ];
        let projected = [
            Vec2::new(4.0, 1.0),
            Vec2::new(4.0, 7.0),
            Vec2::new(0.0, 7.0),
            Vec2::new(0.0, 1.0),
        ];
        let (mut img, mut clipped) = buffers(8, 8);
        {
            let mut ctx = Context::new(&mut img, &mut clipped);
            plot_closed(&mut ctx, &excursion);
        }
        let mut direct = Raster::new(8, 8).unwrap();
        {
            let mut ctx = Context::new(&mut img, &mut direct);
            plot_closed(&mut ctx, &projected);
        }
        for y in 0..8 {
            for x in 0..9 {
                assert_eq!(
                    clipped.coverage(x, y),
                    direct.coverage(x, y),
                    "cell ({x},{y})"
                );
            }
        }
    }

    /// A path that leaves through a vertex sitting exactly on the border
    /// still records the exit, so the later re-entry bridges from it.
    #[test]
    fn grazing_exit_still_bridges() {
        let grazing = [
            Vec2::new(3.0, 1.0),
            Vec2::new(0.0, 3.0), // on the border, next vertex outside
            Vec2::new(-4.0, 3.0),
            Vec2::new(-4.0, 6.0),
            Vec2::new(3.0, 6.0),
        ];
        let projected = [
            Vec2::new(3.0, 1.0),
            Vec2::new(0.0, 3.0),
            Vec2::new(0.0, 6.0),
            Vec2::new(3.0, 6.0),
        ];
        let (mut img, mut clipped) = buffers(8, 8);
        {
            let mut ctx = Context::new(&mut img, &mut clipped);
            plot_closed(&mut ctx, &grazing);
        }
        let mut direct = Raster::new(8, 8).unwrap();
        {
            let mut ctx = Context::new(&mut img, &mut direct);
            plot_closed(&mut ctx, &projected);
        }
        for y in 0..8 {
            for x in 0..9 {
                assert_eq!(
                    clipped.coverage(x, y),
                    direct.coverage(x, y),
                    "cell ({x},{y})"
                );
            }
        }
    }

    /// A move_to resets the pending bridge stack: a stale exit from an
    /// abandoned path must not pair with the next path's entry.
    #[test]
    fn move_to_forgets_pending_bridges() {
        // second path begins outside the left border
        let second = [
            Vec2::new(-2.0, 3.0),
            Vec2::new(4.0, 3.0),
            Vec2::new(4.0, 5.0),
            Vec2::new(-2.0, 5.0),
        ];
        let (mut img, mut raster) = buffers(8, 8);
        {
            let mut ctx = Context::new(&mut img, &mut raster);
            // abandoned fragment that leaves a pending exit at (8, 2)
            ctx.plot_move_to(Vec2::new(4.0, 1.0));
            ctx.plot_line_to(Vec2::new(12.0, 3.0));
            plot_closed(&mut ctx, &second);
        }
        let mut reference = Raster::new(8, 8).unwrap();
        {
            let mut ctx = Context::new(&mut img, &mut reference);
            // the fragment's clipped edge, then the second path pre-clipped
            ctx.add_edge(Vec2::new(4.0, 1.0), Vec2::new(8.0, 2.0));
            plot_closed(
                &mut ctx,
                &[
                    Vec2::new(0.0, 3.0),
                    Vec2::new(4.0, 3.0),
                    Vec2::new(4.0, 5.0),
                    Vec2::new(0.0, 5.0),
                ],
            );
        }
        assert_eq!(raster.cells(), reference.cells());
    }
}
