//! Anti-aliased 2D vector rasterizer.
//!
//! Geometry in floating-point pixel coordinates is clipped, walked into a
//! sparse cell-coverage grid at 1/256-pixel precision, then composited onto
//! a packed-pixel buffer through a Porter–Duff blend:
//!
//! ```text
//! geometry → clip plotter → edge walker → cell grid → compositor → pixels
//! ```
//!
//! The [`Context`] ties the pieces together:
//!
//! ```no_run
//! use cellrast::{Color, Context, Image, PixelFormat, Raster, Source};
//! use glam::Vec2;
//!
//! let mut image = Image::new(256, 256, PixelFormat::Rgba8)?;
//! let mut raster = Raster::new(256, 256)?;
//! let mut ctx = Context::new(&mut image, &mut raster);
//! ctx.clear_render_target(Color::from_u8(24, 24, 32, 255));
//! ctx.set_source(Source::solid(Color::from_u8(255, 200, 40, 255)));
//! ctx.draw_triangle_filled(
//!     Vec2::new(30.0, 220.0),
//!     Vec2::new(128.0, 30.0),
//!     Vec2::new(226.0, 220.0),
//! );
//! # Ok::<(), cellrast::RasterError>(())
//! ```
//!
//! The grid is never wiped between draws: cells carry a generation stamp and
//! a draw ends with [`Raster::discard`], which bumps the counter so stale
//! cells read as empty.  Coordinates are in output pixels, origin top-left,
//! y growing downward.

pub mod blend;
pub mod color;
pub mod context;
pub mod geom;
pub mod image;
pub mod raster;

pub use blend::BlendMode;
pub use color::{Color, PackedColor, PixelFormat, Source};
pub use context::{Context, LineJoin};
pub use geom::{ClipBox, Rect};
pub use image::Image;
pub use raster::{Cell, Fixed32, Raster};

use thiserror::Error;

/// Errors surfaced by buffer construction.  Everything past a successful
/// allocation is infallible.
#[derive(Error, Debug)]
pub enum RasterError {
    /// The allocator refused the backing storage; the target keeps its
    /// previous contents.
    #[error("failed to allocate {bytes} bytes of buffer storage")]
    AllocFailed { bytes: usize },
}
