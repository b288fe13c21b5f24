// encode.rs
//
// Copyright (c) 2019-2026  Douglas Lau
//
//! Block-level GIF encoding
use crate::block::*;
use std::io::{self, Write};

/// Extension introducer
const EXTENSION: u8 = b'!';
/// Image separator
const IMAGE_DESC: u8 = b',';
/// GIF trailer
const TRAILER: u8 = b';';
/// Graphic control extension label
const GRAPHIC_CONTROL: u8 = 0xF9;
/// Application extension label
const APPLICATION: u8 = 0xFF;
/// Maximum sub-block length
const SUB_BLOCK_MAX: usize = 0xFF;

/// Encoder for writing [Block]s into a GIF file.
///
/// [Block]: block/enum.Block.html
pub struct BlockEnc<W: Write> {
    /// Writer for output data
    writer: W,
}

impl<W: Write> BlockEnc<W> {
    /// Create a new block encoder
    pub fn new(writer: W) -> Self {
        BlockEnc { writer }
    }

    /// Encode one block
    pub fn encode<B: Into<Block>>(&mut self, block: B) -> io::Result<()> {
        use crate::block::Block::*;
        let w = &mut self.writer;
        match block.into() {
            Header(b) => b.format(w),
            LogicalScreenDesc(b) => b.format(w),
            GlobalColorTable(b) | LocalColorTable(b) => {
                w.write_all(b.colors())
            }
            GraphicControl(b) => b.format(w),
            Application(b) => b.format(w),
            ImageDesc(b) => b.format(w),
            ImageData(b) => b.format(w),
            Trailer => w.write_all(&[TRAILER]),
        }
    }

    /// Flush the writer
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Get the writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Write a sequence of length-prefixed sub-blocks, plus terminator
fn format_sub_blocks<W: Write>(w: &mut W, data: &[u8]) -> io::Result<()> {
    for chunk in data.chunks(SUB_BLOCK_MAX) {
        w.write_all(&[chunk.len() as u8])?;
        w.write_all(chunk)?;
    }
    w.write_all(&[0])
}

impl Header {
    fn format<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(b"GIF")?;
        w.write_all(&self.version())
    }
}

impl LogicalScreenDesc {
    fn format<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let mut buf = Vec::with_capacity(7);
        buf.extend_from_slice(&self.screen_width().to_le_bytes());
        buf.extend_from_slice(&self.screen_height().to_le_bytes());
        buf.push(self.flags());
        buf.push(self.background_color_idx());
        buf.push(self.pixel_aspect_ratio());
        w.write_all(&buf)
    }
}

impl GraphicControl {
    fn format<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let mut buf = Vec::with_capacity(8);
        buf.push(EXTENSION);
        buf.push(GRAPHIC_CONTROL);
        buf.push(4); // block size
        buf.push(self.flags());
        buf.extend_from_slice(&self.delay_time_cs().to_le_bytes());
        buf.push(self.transparent_color_idx());
        buf.push(0); // block size
        w.write_all(&buf)
    }
}

impl Application {
    fn format<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&[EXTENSION, APPLICATION])?;
        for b in self.app_data() {
            debug_assert!(b.len() <= SUB_BLOCK_MAX);
            w.write_all(&[b.len() as u8])?;
            w.write_all(b)?;
        }
        w.write_all(&[0])
    }
}

impl ImageDesc {
    fn format<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let mut buf = Vec::with_capacity(10);
        buf.push(IMAGE_DESC);
        buf.extend_from_slice(&self.left().to_le_bytes());
        buf.extend_from_slice(&self.top().to_le_bytes());
        buf.extend_from_slice(&self.width().to_le_bytes());
        buf.extend_from_slice(&self.height().to_le_bytes());
        buf.push(self.flags());
        w.write_all(&buf)
    }
}

impl ImageData {
    fn format<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&[self.min_code_size()])?;
        format_sub_blocks(w, &self.compressed())
    }
}
