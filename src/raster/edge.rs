//! Fixed-point edge walker.
//!
//! [`Raster::add_edge`] distributes the signed coverage of one line segment
//! into the cell grid, AGG/FreeType style: every pixel an edge crosses
//! receives a signed `cover` (vertical sub-pixel extent in that column) and a
//! signed `area` (`(fx_in + fx_out) · cover / 2`, the part of the cover that
//! belongs to the pixel itself rather than the remainder of its row).
//! Summed over all edges of a closed outline the grid then encodes exact
//! sub-pixel coverage under the non-zero winding rule.
//!
//! The walk canonicalises the segment so x and y both ascend (each swap
//! flips the contribution sign), then splits it per scanline with a
//! Bresenham-style lift/remainder stepper so no per-step division or
//! floating point is needed.

use super::{Cell, Fixed32, PIXEL_MASK, PIXEL_SCALE, PIXEL_SHIFT, Raster};

const AREA_SHIFT: i32 = PIXEL_SHIFT + 1;

/// Accumulate into a live cell, or claim a stale one.
#[inline]
fn bump(cells: &mut [Cell], idx: usize, generation: u32, cover: i32, area: i32) {
    let cell = &mut cells[idx];
    if cell.generation == generation {
        cell.cover = cell.cover.wrapping_add(cover);
        cell.area = cell.area.wrapping_add(area);
    } else {
        cell.generation = generation;
        cell.cover = cover;
        cell.area = area;
    }
}

impl Raster {
    /// Walk one edge in 24.8 fixed point into the current generation.
    ///
    /// Endpoints are expected inside `[0, 256·width] × [0, 256·height]`; the
    /// clip plotter guarantees this for every plotted path.  Horizontal
    /// edges contribute nothing and are skipped.
    pub fn add_edge(&mut self, x0: Fixed32, y0: Fixed32, x1: Fixed32, y1: Fixed32) {
        let max_x = (self.width as i32) << PIXEL_SHIFT;
        let max_y = (self.height as i32) << PIXEL_SHIFT;
        debug_assert!(
            (0..=max_x).contains(&x0)
                && (0..=max_x).contains(&x1)
                && (0..=max_y).contains(&y0)
                && (0..=max_y).contains(&y1),
            "edge endpoints outside the raster extent"
        );

        let stride = self.stride as usize;
        let height = self.height as i32;
        let generation = self.current_generation;
        let cells = &mut self.cells[..];

        let (mut x0, mut y0, mut x1, mut y1) = (x0, y0, x1, y1);
        let mut dx = x1 - x0;
        let mut dy = y1 - y0;

        if dy == 0 {
            return;
        }
        dx = dx.abs();
        dy = dy.abs();

        let mut inc_y = 1i32;
        let mut sign = 1i32;

        if x0 > x1 {
            std::mem::swap(&mut x0, &mut x1);
            std::mem::swap(&mut y0, &mut y1);
            sign = -sign;
        }

        // Reflect a descending edge so the walk ascends in y; cell rows are
        // still visited in the real direction via `inc_y`.
        if y0 > y1 {
            y0 ^= PIXEL_MASK;
            y0 += if (y0 & PIXEL_MASK) == PIXEL_MASK {
                1 - PIXEL_SCALE * 2
            } else {
                1
            };
            y1 = y0 + dy;
            inc_y = -1;
            sign = -sign;
        }

        let mut ix0 = x0 >> PIXEL_SHIFT;
        let ix1 = x1 >> PIXEL_SHIFT;
        let mut iy0 = y0 >> PIXEL_SHIFT;
        let iy1 = y1 >> PIXEL_SHIFT;

        let fx0 = x0 & PIXEL_MASK;
        let fx1 = x1 & PIXEL_MASK;
        let mut fy0 = y0 & PIXEL_MASK;
        let mut fy1 = y1 & PIXEL_MASK;

        let mut scanline_count = iy1 - iy0;

        // Edge confined to a single cell.
        if scanline_count == 0 && ix0 == ix1 {
            let cover = dy * sign;
            let area = ((fx0 + fx1) * cover) >> AREA_SHIFT;
            bump(cells, iy0 as usize * stride + ix0 as usize, generation, cover, area);
            return;
        }

        // Vertical edge: one column, constant horizontal factor.
        if dx == 0 {
            let two_fx = fx0 + fx0;

            let mut cover = (PIXEL_SCALE - fy0) * sign;
            let mut area = (two_fx * cover) >> AREA_SHIFT;
            bump(cells, iy0 as usize * stride + ix0 as usize, generation, cover, area);
            iy0 += inc_y;

            cover = PIXEL_SCALE * sign;
            area = (two_fx * cover) >> AREA_SHIFT;
            loop {
                scanline_count -= 1;
                if scanline_count == 0 {
                    break;
                }
                bump(cells, iy0 as usize * stride + ix0 as usize, generation, cover, area);
                iy0 += inc_y;
            }

            if fy1 != 0 {
                cover = fy1 * sign;
                area = (two_fx * cover) >> AREA_SHIFT;
                bump(cells, iy0 as usize * stride + ix0 as usize, generation, cover, area);
            }
            return;
        }

        // General edge: exact rational stepping along both axes.
        let base_x = PIXEL_SCALE * dx;
        let lift_x = base_x / dy;
        let rem_x = base_x % dy;
        let mut err_x = -dy / 2;

        let base_y = PIXEL_SCALE * dy;
        let lift_y = base_y / dx;
        let rem_y = base_y % dx;
        let mut err_y = -dx / 2;

        let offset_x = (PIXEL_SCALE - fy0) * dx;
        let mut delta_x = offset_x / dy;
        err_x += offset_x % dy;

        let offset_y = (PIXEL_SCALE - fx0) * dy;
        let mut delta_y = offset_y / dx;
        err_y += offset_y % dx;

        let mut acc_fx = fx0;
        let mut acc_y = y0 + delta_y;

        fy1 = PIXEL_SCALE;

        if dx > dy {
            // Shallow edge: each scanline may span several columns.
            loop {
                // A final scanline with zero height carries no cover; it can
                // land one row past the grid, so stop instead of touching it.
                if iy0 < 0 || iy0 >= height {
                    break;
                }
                let row = iy0 as usize * stride;

                let last = scanline_count == 0;
                if last {
                    delta_x = x1 - ((ix0 << PIXEL_SHIFT) + acc_fx);
                    fy1 = y1 & PIXEL_MASK;
                }

                if !(last && delta_x == 0) {
                    let acc_fy = acc_y & PIXEL_MASK;
                    let next_x = acc_fx + delta_x;
                    let next_ix = ix0 + (next_x >> PIXEL_SHIFT);

                    if next_x <= PIXEL_SCALE {
                        // Whole scanline step inside one column.
                        let cover = (fy1 - fy0) * sign;
                        let area = ((acc_fx + next_x) * cover) >> AREA_SHIFT;
                        bump(cells, row + ix0 as usize, generation, cover, area);

                        if next_x == PIXEL_SCALE {
                            acc_y += lift_y;
                            err_y += rem_y;
                            if err_y >= 0 {
                                err_y -= dx;
                                acc_y += 1;
                            }
                        }
                        delta_x = lift_x;
                        err_x += rem_x;
                        if err_x >= 0 {
                            err_x -= dy;
                            delta_x += 1;
                        }

                        fy0 = 0;
                        acc_fx = next_x & PIXEL_MASK;
                        ix0 = next_ix;
                        iy0 += inc_y;
                    } else {
                        // Head cell up to the column border.
                        let mut cover = (acc_fy - fy0) * sign;
                        let mut area = ((acc_fx + PIXEL_SCALE) * cover) >> AREA_SHIFT;
                        bump(cells, row + ix0 as usize, generation, cover, area);

                        // Full columns in between.
                        ix0 += 1;
                        while ix0 != next_ix {
                            delta_y = lift_y;
                            err_y += rem_y;
                            if err_y >= 0 {
                                err_y -= dx;
                                delta_y += 1;
                            }
                            acc_y += delta_y;

                            cover = delta_y * sign;
                            area = (PIXEL_SCALE * cover) >> AREA_SHIFT;
                            bump(cells, row + ix0 as usize, generation, cover, area);
                            ix0 += 1;
                        }

                        acc_fx = next_x & PIXEL_MASK;
                        let acc_fy = acc_y & PIXEL_MASK;

                        // Tail cell, if the edge keeps climbing past the last
                        // column border (or this is the final scanline).
                        if acc_fy != 0 || last {
                            cover = (fy1 - acc_fy) * sign;
                            area = (acc_fx * cover) >> AREA_SHIFT;
                            bump(cells, row + ix0 as usize, generation, cover, area);
                        }

                        err_y += rem_y;
                        if err_y >= 0 {
                            err_y -= dx;
                            acc_y += 1;
                        }
                        acc_y += lift_y;

                        delta_x = lift_x;
                        err_x += rem_x;
                        if err_x >= 0 {
                            err_x -= dy;
                            delta_x += 1;
                        }

                        fy0 = 0;
                        iy0 += inc_y;
                    }
                }

                if scanline_count == 0 {
                    break;
                }
                scanline_count -= 1;
            }
        } else {
            // Steep edge: at most one column border crossed per scanline.
            loop {
                if iy0 < 0 || iy0 >= height {
                    break;
                }
                let row = iy0 as usize * stride;

                let last = scanline_count == 0;
                if last {
                    delta_x = x1 - ((ix0 << PIXEL_SHIFT) + acc_fx);
                    fy1 = y1 & PIXEL_MASK;
                }

                let next_fx = acc_fx + delta_x;

                if next_fx <= PIXEL_SCALE {
                    let cover = (fy1 - fy0) * sign;
                    let area = ((acc_fx + next_fx) * cover) >> AREA_SHIFT;
                    bump(cells, row + ix0 as usize, generation, cover, area);

                    if next_fx == PIXEL_SCALE {
                        acc_y += lift_y;
                        err_y += rem_y;
                        if err_y >= 0 {
                            err_y -= dx;
                            acc_y += 1;
                        }
                    }
                    delta_x = lift_x;
                    err_x += rem_x;
                    if err_x >= 0 {
                        err_x -= dy;
                        delta_x += 1;
                    }

                    fy0 = 0;
                    fy1 = PIXEL_SCALE;
                    acc_fx = next_fx & PIXEL_MASK;
                    ix0 += next_fx >> PIXEL_SHIFT;
                    iy0 += inc_y;
                } else {
                    // The edge crosses into the next column mid-scanline.
                    acc_y &= PIXEL_MASK;

                    let mut cover = (acc_y - fy0) * sign;
                    let mut area = ((acc_fx + PIXEL_SCALE) * cover) >> AREA_SHIFT;
                    bump(cells, row + ix0 as usize, generation, cover, area);

                    ix0 += 1;
                    acc_fx = next_fx & PIXEL_MASK;

                    cover = (fy1 - acc_y) * sign;
                    area = (acc_fx * cover) >> AREA_SHIFT;
                    bump(cells, row + ix0 as usize, generation, cover, area);

                    acc_y += lift_y;
                    err_y += rem_y;
                    if err_y >= 0 {
                        err_y -= dx;
                        acc_y += 1;
                    }

                    delta_x = lift_x;
                    err_x += rem_x;
                    if err_x >= 0 {
                        err_x -= dy;
                        delta_x += 1;
                    }

                    fy0 = 0;
                    iy0 += inc_y;
                }

                if scanline_count == 0 {
                    break;
                }
                scanline_count -= 1;
            }
        }
    }
}
