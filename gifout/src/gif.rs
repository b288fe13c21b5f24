// gif.rs
//
// Copyright (c) 2026  Douglas Lau
//
//! GIF89a frame encoder
use crate::block::*;
use crate::encode::BlockEnc;
use crate::encoder::{FrameEncoder, Sink};
use crate::quantize::quantize;
use pix::rgb::SRgba8;
use pix::Raster;
use std::io::{self, ErrorKind};

/// State of a begun encoder
struct GifState {
    /// Block encoder owning the sink
    enc: BlockEnc<Sink>,
    /// Logical screen width
    width: u16,
    /// Logical screen height
    height: u16,
}

/// Animated GIF encoder
///
/// Writes a 2-color global table and a looping extension in `begin`, then
/// one local color table per frame.
///
/// ## Example
/// ```
/// use gifout::{FrameEncoder, GifEncoder};
/// use pix::{rgb::SRgba8, Raster};
///
/// # fn main() -> std::io::Result<()> {
/// let mut enc = GifEncoder::default();
/// enc.begin(Box::new(std::io::sink()), 8, 8, 10, 8, true)?;
/// let raster = Raster::with_color(8, 8, SRgba8::new(0, 128, 255, 255));
/// enc.write_frame(&raster, 10, 8, true)?;
/// enc.end()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct GifEncoder {
    /// Number of animation loops (0 means forever)
    loop_count: u16,
    /// State between begin and end
    state: Option<GifState>,
}

fn invalid(msg: &str) -> io::Error {
    io::Error::new(ErrorKind::InvalidInput, msg)
}

impl GifEncoder {
    /// Adjust the loop count (0 means forever).
    pub fn with_loop_count(mut self, loop_count: u16) -> Self {
        self.loop_count = loop_count;
        self
    }

    /// Check if the encoder has been begun and not ended
    pub fn is_begun(&self) -> bool {
        self.state.is_some()
    }
}

impl FrameEncoder for GifEncoder {
    fn begin(
        &mut self,
        sink: Sink,
        width: u32,
        height: u32,
        _delay_cs: u16,
        bit_depth: u8,
        _dither: bool,
    ) -> io::Result<()> {
        if self.state.is_some() {
            return Err(io::Error::new(ErrorKind::Other, "encoder already begun"));
        }
        if !(3..=8).contains(&bit_depth) {
            return Err(invalid("bit depth must be between 3 and 8"));
        }
        let width =
            u16::try_from(width).map_err(|_| invalid("width too large for GIF"))?;
        let height = u16::try_from(height)
            .map_err(|_| invalid("height too large for GIF"))?;
        let mut enc = BlockEnc::new(sink);
        let tbl = ColorTableConfig::with_len(2);
        enc.encode(Header::default())?;
        enc.encode(
            LogicalScreenDesc::default()
                .with_screen_width(width)
                .with_screen_height(height)
                .with_color_table_config(&tbl),
        )?;
        enc.encode(Block::GlobalColorTable(ColorTable::with_colors(&[], &tbl)))?;
        enc.encode(Application::with_loop_count(self.loop_count))?;
        debug!("gif begun: {width}x{height}");
        self.state = Some(GifState { enc, width, height });
        Ok(())
    }

    fn write_frame(
        &mut self,
        raster: &Raster<SRgba8>,
        delay_cs: u16,
        bit_depth: u8,
        dither: bool,
    ) -> io::Result<()> {
        let state = self
            .state
            .as_mut()
            .ok_or_else(|| io::Error::new(ErrorKind::Other, "encoder not begun"))?;
        if raster.width() > u32::from(state.width)
            || raster.height() > u32::from(state.height)
        {
            return Err(invalid("frame larger than screen"));
        }
        let indexed = quantize(raster, bit_depth, dither)
            .ok_or_else(|| invalid("bit depth too small for palette"))?;
        let mut control = GraphicControl::default();
        control.set_delay_time_cs(delay_cs);
        if indexed.transparent.is_some() {
            control.set_disposal_method(DisposalMethod::Background);
            control.set_transparent_color(indexed.transparent);
        } else {
            control.set_disposal_method(DisposalMethod::Keep);
        }
        let tbl = ColorTableConfig::with_len(indexed.palette_len());
        let desc = ImageDesc::default()
            .with_width(raster.width() as u16)
            .with_height(raster.height() as u16)
            .with_color_table_config(&tbl);
        state.enc.encode(control)?;
        state.enc.encode(desc)?;
        state
            .enc
            .encode(Block::LocalColorTable(ColorTable::with_colors(
                &indexed.colors,
                &tbl,
            )))?;
        state
            .enc
            .encode(ImageData::with_indices(indexed.indices, tbl.len()))
    }

    fn end(&mut self) -> io::Result<()> {
        match self.state.take() {
            Some(mut state) => {
                state.enc.encode(Block::Trailer)?;
                state.enc.flush()
            }
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::cell::RefCell;
    use std::io::Write;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct SharedBuf(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn contains(hay: &[u8], needle: &[u8]) -> usize {
        hay.windows(needle.len()).filter(|w| *w == needle).count()
    }

    #[test]
    fn two_frames() {
        let buf = SharedBuf::default();
        let mut enc = GifEncoder::default();
        enc.begin(Box::new(buf.clone()), 4, 4, 50, 8, true).unwrap();
        assert!(enc.is_begun());
        let red = Raster::with_color(4, 4, SRgba8::new(255, 0, 0, 255));
        let blue = Raster::with_color(4, 4, SRgba8::new(0, 0, 255, 255));
        enc.write_frame(&red, 50, 8, true).unwrap();
        enc.write_frame(&blue, 50, 8, true).unwrap();
        enc.end().unwrap();
        assert!(!enc.is_begun());
        let out = buf.0.borrow();
        assert_eq!(&out[..6], b"GIF89a");
        assert_eq!(&out[6..10], &[4, 0, 4, 0]);
        assert_eq!(out[out.len() - 1], b';');
        assert_eq!(contains(&out, b"NETSCAPE2.0"), 1);
        // graphic control: keep, delay 50
        assert_eq!(contains(&out, &[0x21, 0xF9, 4, 0b100, 50, 0, 0, 0]), 2);
        // local color tables (2 entries)
        assert_eq!(contains(&out, &[255, 0, 0, 0, 0, 0]), 1);
        assert_eq!(contains(&out, &[0, 0, 255, 0, 0, 0]), 1);
    }

    #[test]
    fn transparent_frame() {
        let buf = SharedBuf::default();
        let mut enc = GifEncoder::default();
        enc.begin(Box::new(buf.clone()), 2, 2, 0, 8, false).unwrap();
        let clear = Raster::with_color(2, 2, SRgba8::new(0, 0, 0, 0));
        enc.write_frame(&clear, 0, 8, false).unwrap();
        enc.end().unwrap();
        let out = buf.0.borrow();
        // graphic control: background, transparent index 0
        assert_eq!(contains(&out, &[0x21, 0xF9, 4, 0b1001, 0, 0, 0, 0]), 1);
    }

    #[test]
    fn too_large() {
        let mut enc = GifEncoder::default();
        let err = enc
            .begin(Box::new(io::sink()), 70_000, 4, 0, 8, true)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(!enc.is_begun());
    }

    #[test]
    fn frame_larger_than_screen() {
        let mut enc = GifEncoder::default();
        enc.begin(Box::new(io::sink()), 2, 2, 0, 8, true).unwrap();
        let big = Raster::with_color(3, 2, SRgba8::new(0, 0, 0, 255));
        assert!(enc.write_frame(&big, 0, 8, true).is_err());
    }

    #[test]
    fn not_begun() {
        let mut enc = GifEncoder::default();
        let r = Raster::with_color(1, 1, SRgba8::new(0, 0, 0, 255));
        assert!(enc.write_frame(&r, 0, 8, true).is_err());
        assert!(enc.end().is_ok());
    }

    #[test]
    fn begun_twice() {
        let mut enc = GifEncoder::default();
        enc.begin(Box::new(io::sink()), 1, 1, 0, 8, true).unwrap();
        assert!(enc.begin(Box::new(io::sink()), 1, 1, 0, 8, true).is_err());
    }
}
