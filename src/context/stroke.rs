//! Stroke outline generation.
//!
//! A stroked polyline is expanded into a closed outline fed through the
//! clip plotter: one pass along the left offsets, one pass back along the
//! right offsets.  Interior vertices take the miter offset – the
//! displacement along the angle bisector that keeps both outline edges
//! parallel to their segments.  Joints sharper than the miter limit
//! degenerate to a bevel (the two segment-end offsets) so spikes stay
//! bounded.

use glam::Vec2;

use super::Context;

/// Joint style between consecutive polyline segments.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineJoin {
    /// Independent capless quads per segment, no joint geometry.
    None,
    #[default]
    Miter,
    Bevel,
    Rounded,
}

/// Offset(s) the outline takes at one vertex.
enum Joint {
    Miter(Vec2),
    Bevel(Vec2, Vec2),
}

impl Context<'_> {
    /// Stroke a single segment as a capless rectangle.
    pub fn add_line(&mut self, v0: Vec2, v1: Vec2) {
        let d = v1 - v0;
        let len = d.length();
        if len == 0.0 {
            return;
        }
        let n = Vec2::new(-d.y, d.x) * (self.half_thickness / len);
        self.plot_move_to(v0 - n);
        self.plot_line_to(v1 - n);
        self.plot_line_to(v1 + n);
        self.plot_line_to(v0 + n);
        self.plot_line_to(v0 - n);
        self.plot_close();
    }

    /// Stroke a polyline with the current join mode and half-thickness.
    ///
    /// `close` joins the last vertex back to the first.  Bevel and Rounded
    /// joint geometry is not generated; both fall back to per-segment quads.
    pub fn add_polyline(&mut self, verts: &[Vec2], close: bool) {
        if verts.len() < 2 {
            return;
        }
        if verts.len() < 3 {
            self.add_line(verts[0], verts[1]);
            return;
        }
        match self.line_join {
            LineJoin::Miter if close => self.polyline_miter_closed(verts),
            LineJoin::Miter => self.polyline_miter_open(verts),
            _ => self.polyline_segments(verts, close),
        }
    }

    fn polyline_segments(&mut self, verts: &[Vec2], close: bool) {
        for pair in verts.windows(2) {
            self.add_line(pair[0], pair[1]);
        }
        if close {
            self.add_line(verts[verts.len() - 1], verts[0]);
        }
    }

    /// Single closed outline: left offsets out, right offsets back.
    fn polyline_miter_open(&mut self, verts: &[Vec2]) {
        let n = verts.len();
        let first_n = self.seg_normal(verts[0], verts[1]);
        let last_n = self.seg_normal(verts[n - 2], verts[n - 1]);

        self.plot_move_to(verts[0] + first_n);
        for i in 1..n - 1 {
            match self.joint(verts[i - 1], verts[i], verts[i + 1]) {
                Joint::Miter(o) => self.plot_line_to(verts[i] + o),
                Joint::Bevel(a, b) => {
                    self.plot_line_to(verts[i] + a);
                    self.plot_line_to(verts[i] + b);
                }
            }
        }
        self.plot_line_to(verts[n - 1] + last_n);
        self.plot_line_to(verts[n - 1] - last_n);
        for i in (1..n - 1).rev() {
            // walking backwards the offset is the same, mirrored
            match self.joint(verts[i - 1], verts[i], verts[i + 1]) {
                Joint::Miter(o) => self.plot_line_to(verts[i] - o),
                Joint::Bevel(a, b) => {
                    self.plot_line_to(verts[i] - b);
                    self.plot_line_to(verts[i] - a);
                }
            }
        }
        self.plot_line_to(verts[0] - first_n);
        self.plot_line_to(verts[0] + first_n);
        self.plot_close();
    }

    /// Two closed rings, one per outline side, joined at every vertex
    /// including the wrap-around.
    fn polyline_miter_closed(&mut self, verts: &[Vec2]) {
        let n = verts.len();
        let mut ring = std::mem::take(&mut self.ring_scratch);

        ring.clear();
        for i in 0..n {
            let prev = verts[(i + n - 1) % n];
            let next = verts[(i + 1) % n];
            match self.joint(prev, verts[i], next) {
                Joint::Miter(o) => ring.push(verts[i] + o),
                Joint::Bevel(a, b) => {
                    ring.push(verts[i] + a);
                    ring.push(verts[i] + b);
                }
            }
        }
        self.plot_ring(&ring);

        ring.clear();
        for i in (0..n).rev() {
            let prev = verts[(i + n - 1) % n];
            let next = verts[(i + 1) % n];
            match self.joint(prev, verts[i], next) {
                Joint::Miter(o) => ring.push(verts[i] - o),
                Joint::Bevel(a, b) => {
                    ring.push(verts[i] - b);
                    ring.push(verts[i] - a);
                }
            }
        }
        self.plot_ring(&ring);

        self.ring_scratch = ring;
    }

    fn plot_ring(&mut self, ring: &[Vec2]) {
        let Some((&first, rest)) = ring.split_first() else {
            return;
        };
        self.plot_move_to(first);
        for &p in rest {
            self.plot_line_to(p);
        }
        self.plot_line_to(first);
        self.plot_close();
    }

    /// Left normal of the segment `p → q`, scaled to half-thickness.
    fn seg_normal(&self, p: Vec2, q: Vec2) -> Vec2 {
        let d = q - p;
        let len = d.length();
        if len == 0.0 {
            return Vec2::ZERO;
        }
        Vec2::new(d.y, -d.x) * (self.half_thickness / len)
    }

    /// Offset geometry at the corner `prev → v → next`.
    fn joint(&self, prev: Vec2, v: Vec2, next: Vec2) -> Joint {
        let n0 = self.seg_normal(prev, v);
        let n1 = self.seg_normal(v, next);
        let m = n0 + n1;
        let m_len = m.length();
        if m_len <= 1e-6 {
            // hairpin: the bisector vanishes and the miter would be infinite
            return Joint::Bevel(n0, n1);
        }
        let m_hat = m / m_len;
        // cos of the half-angle, scaled by half-thickness
        let cos_half = m_hat.dot(n1);
        if cos_half * self.miter_limit < self.half_thickness {
            return Joint::Bevel(n0, n1);
        }
        let mut k = self.half_thickness * self.half_thickness / cos_half;
        if n0.perp_dot(n1) < 0.0 {
            k = -k;
        }
        Joint::Miter(m_hat * k)
    }
}
