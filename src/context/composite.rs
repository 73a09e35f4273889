//! Scanline compositor.
//!
//! Walks every row of the raster/render-target intersection carrying a
//! running cover sum; each pixel's mask is `|running − area|` clamped to
//! 255 (non-zero winding).  The mask scales the source alpha, the
//! destination pixel is unswizzled to a canonical word, blended, and
//! reswizzled into the target's channel order.  Cells whose generation
//! stamp is stale read as empty without being touched.

use super::Context;
use crate::blend::{self, BlendMode};
use crate::color::{PackedColor, Source};

impl Context<'_> {
    /// Composite the raster's current coverage onto the render target with
    /// the selected blend mode and solid source.
    ///
    /// Each arm monomorphises the scanline loop for its operator.
    pub fn render(&mut self) {
        match self.blend_mode {
            BlendMode::SrcOver => self.render_solid(blend::src_over),
            BlendMode::SrcAtop => self.render_solid(blend::src_atop),
            BlendMode::SrcIn => self.render_solid(blend::src_in),
            BlendMode::SrcOut => self.render_solid(blend::src_out),
            BlendMode::SrcCopy => self.render_solid(blend::src_copy),
            BlendMode::DstOver => self.render_solid(blend::dst_over),
            BlendMode::DstAtop => self.render_solid(blend::dst_atop),
            BlendMode::DstIn => self.render_solid(blend::dst_in),
            BlendMode::DstOut => self.render_solid(blend::dst_out),
            BlendMode::DstCopy => self.render_solid(blend::dst_copy),
            BlendMode::Clear => self.render_solid(blend::clear),
            BlendMode::Xor => self.render_solid(blend::xor),
        }
    }

    fn render_solid<F>(&mut self, blend_fn: F)
    where
        F: Fn(PackedColor, u32, PackedColor, u32) -> (PackedColor, u32),
    {
        let Source::Solid(src) = self.source;
        let src_color = src & 0x00FF_FFFF;
        let src_alpha = src >> 24;

        let shifts = self.rt.format().shifts();
        let rt_width = self.rt.width() as usize;
        let stride = self.raster.stride() as usize;
        let generation = self.raster.generation();
        let render_w = (self.raster.width() as usize).min(rt_width);
        let render_h = (self.raster.height() as usize).min(self.rt.height() as usize);

        let cells = self.raster.cells();
        let data = self.rt.data_mut();

        for y in 0..render_h {
            let image_row = &mut data[y * rt_width..][..render_w];
            let raster_row = &cells[y * stride..][..render_w];
            let mut effective_cover = 0i32;

            for x in 0..render_w {
                let cell = raster_row[x];
                let (cover, area) = if cell.generation == generation {
                    (cell.cover, cell.area)
                } else {
                    (0, 0)
                };

                effective_cover = effective_cover.wrapping_add(cover);
                let mask = effective_cover.wrapping_sub(area).unsigned_abs().min(255);
                let mask_alpha = blend::fpmul(mask, src_alpha);

                let dst = image_row[x];
                let dst_r = (dst >> shifts.r) & 0xFF;
                let dst_g = (dst >> shifts.g) & 0xFF;
                let dst_b = (dst >> shifts.b) & 0xFF;
                let dst_a = (dst >> shifts.a) & 0xFF;
                let dst_color = dst_r | (dst_g << 8) | (dst_b << 16);

                let (out, out_alpha) = blend_fn(src_color, mask_alpha, dst_color, dst_a);

                let out_r = out & 0xFF;
                let out_g = (out >> 8) & 0xFF;
                let out_b = (out >> 16) & 0xFF;
                image_row[x] = (out_r << shifts.r)
                    | (out_g << shifts.g)
                    | (out_b << shifts.b)
                    | (out_alpha << shifts.a);
            }
        }
    }
}
