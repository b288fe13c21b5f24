// encoder.rs
//
// Copyright (c) 2026  Douglas Lau
//
//! Frame encoder interface
use pix::rgb::SRgba8;
use pix::Raster;
use std::io::{self, Write};

/// Output sink: sequential, write-only
pub type Sink = Box<dyn Write>;

/// Encoder for a sequence of RGBA frames.
///
/// A session calls `begin` once, on its first frame, then `write_frame` for
/// each finished frame, and finally `end`.  Encoders own all palette and
/// compression state between those calls; after `end` they may be begun
/// again for a new output.
pub trait FrameEncoder {
    /// Write the file header, taking ownership of the sink.
    fn begin(
        &mut self,
        sink: Sink,
        width: u32,
        height: u32,
        delay_cs: u16,
        bit_depth: u8,
        dither: bool,
    ) -> io::Result<()>;

    /// Encode one frame.
    fn write_frame(
        &mut self,
        raster: &Raster<SRgba8>,
        delay_cs: u16,
        bit_depth: u8,
        dither: bool,
    ) -> io::Result<()>;

    /// Write the trailer and release the sink.
    fn end(&mut self) -> io::Result<()>;
}
