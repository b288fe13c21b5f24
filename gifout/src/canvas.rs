// canvas.rs
//
// Copyright (c) 2026  Douglas Lau
//
//! In-memory frame canvas
use crate::convert::{convert_scanline, CANVAS_CHANNELS};
use crate::desc::SampleFormat;
use crate::error::{Error, Result};
use pix::rgb::SRgba8;
use pix::Raster;

/// RGBA8 buffer accumulating one frame before encoding.
///
/// Every byte starts at 255: opaque white, so 3-channel sources which never
/// write alpha stay fully opaque.
pub struct Canvas {
    raster: Raster<SRgba8>,
}

impl Canvas {
    /// Create a new opaque white canvas
    pub fn new(width: u32, height: u32) -> Self {
        let raster =
            Raster::with_color(width, height, SRgba8::new(255, 255, 255, 255));
        Canvas { raster }
    }

    /// Get the width
    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    /// Get the height
    pub fn height(&self) -> u32 {
        self.raster.height()
    }

    /// Get the underlying raster
    pub fn raster(&self) -> &Raster<SRgba8> {
        &self.raster
    }

    /// Get the canvas as interleaved RGBA bytes
    pub fn as_u8_slice(&self) -> &[u8] {
        self.raster.as_u8_slice()
    }

    /// Convert one scanline of caller data into row `y`
    pub(crate) fn write_row(
        &mut self,
        y: u32,
        channels: u8,
        format: SampleFormat,
        data: &[u8],
        xstride: Option<usize>,
    ) -> Result<()> {
        if y >= self.height() {
            return Err(Error::InvalidScanline(y));
        }
        let width = self.width() as usize;
        let row_sz = width * CANVAS_CHANNELS;
        let start = y as usize * row_sz;
        let row = &mut self.raster.as_u8_slice_mut()[start..start + row_sz];
        convert_scanline(channels, width, format, data, xstride, row)
    }
}
