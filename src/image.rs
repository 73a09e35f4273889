//! Render-target pixel buffer.
//!
//! An [`Image`] owns a contiguous row-major grid of packed 32-bit pixels in a
//! declared [`PixelFormat`].  Storage failures surface as
//! [`RasterError::AllocFailed`]; on failure the previous contents are kept.

use crate::RasterError;
use crate::color::{Color, PackedColor, PixelFormat};
use crate::geom::Rect;

pub struct Image {
    data: Vec<PackedColor>,
    width: u32,
    height: u32,
    format: PixelFormat,
}

impl Image {
    /// Allocate a zeroed `width × height` buffer.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Result<Self, RasterError> {
        debug_assert!(width > 0 && height > 0, "zero-size image");
        let len = width as usize * height as usize;
        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|_| RasterError::AllocFailed {
            bytes: len * size_of::<PackedColor>(),
        })?;
        data.resize(len, 0);
        Ok(Self {
            data,
            width,
            height,
            format,
        })
    }

    /// Replace the backing storage.  The new buffer is allocated first, so a
    /// failed resize leaves the image untouched.
    pub fn resize(&mut self, width: u32, height: u32, format: PixelFormat) -> Result<(), RasterError> {
        *self = Image::new(width, height, format)?;
        Ok(())
    }

    /// Fill every pixel with `color` encoded in this image's format.
    pub fn clear(&mut self, color: Color) {
        self.clear_raw(color.to_bytes(self.format));
    }

    /// Fill every pixel with a caller-packed word.
    pub fn clear_raw(&mut self, packed: PackedColor) {
        self.data.fill(packed);
    }

    /// Independent copy of this image.
    pub fn try_clone(&self) -> Result<Self, RasterError> {
        let mut copy = Image::new(self.width, self.height, self.format)?;
        copy.data.copy_from_slice(&self.data);
        Ok(copy)
    }

    /// Full extent as a rect anchored at the origin.
    pub fn rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width as f32, self.height as f32)
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[PackedColor] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [PackedColor] {
        &mut self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> PackedColor {
        debug_assert!(x < self.width && y < self.height);
        self.data[(y * self.width + x) as usize]
    }
}
