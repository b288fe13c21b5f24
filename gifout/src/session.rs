// session.rs
//
// Copyright (c) 2026  Douglas Lau
//
//! Incremental multi-frame writer session
use crate::canvas::Canvas;
use crate::desc::{ImageDescriptor, SampleFormat, FRAMES_PER_SECOND};
use crate::encoder::{FrameEncoder, Sink};
use crate::error::{Error, Result};
use crate::gif::GifEncoder;
use std::fs::File;
use std::io::{BufWriter, Write};

/// GIF is only 8 bit
const BIT_DEPTH: u8 = 8;

/// Features reported by [supports](struct.Session.html#method.supports)
const FEATURES: &[&str] = &[
    "alpha",
    "random_access",
    "multiimage",
    "appendsubimage",
    "ioproxy",
];

/// How to open a session with a single descriptor
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpenMode {
    /// Start a new output
    Create,
    /// Add a frame to an open output
    AppendSubimage,
    /// Add a MIP level (not supported by GIF)
    AppendMipLevel,
}

impl TryFrom<i32> for OpenMode {
    type Error = Error;

    fn try_from(mode: i32) -> Result<Self> {
        match mode {
            0 => Ok(OpenMode::Create),
            1 => Ok(OpenMode::AppendSubimage),
            2 => Ok(OpenMode::AppendMipLevel),
            _ => Err(Error::UnknownOpenMode(mode)),
        }
    }
}

/// Calculate frame delay (centiseconds) from a frame rate
pub(crate) fn delay_cs(fps: f32) -> u16 {
    if fps.is_finite() && fps > 0.0 {
        (100.0 / fps).round().min(f32::from(u16::MAX)) as u16
    } else {
        0
    }
}

/// Writer session for a (possibly animated) GIF.
///
/// Each frame is buffered into a [Canvas] one scanline at a time, then
/// handed to the [FrameEncoder] when the next frame is appended or the
/// session is closed.
///
/// ## Example
/// ```
/// use gifout::{ImageDescriptor, OpenMode, SampleFormat, Session};
///
/// # fn main() -> gifout::Result<()> {
/// let desc = ImageDescriptor::new(2, 2, 3).with_frames_per_second(4.0);
/// let mut session = Session::new().with_writer(std::io::sink());
/// session.open("dots.gif", &[desc.clone(), desc.clone()])?;
/// for y in 0..2 {
///     session.write_scanline(y, 0, SampleFormat::U8, &[255, 0, 0, 0, 0, 255], None)?;
/// }
/// session.open_with_mode("dots.gif", &desc, OpenMode::AppendSubimage)?;
/// session.write_image(SampleFormat::U8, &[0; 12], None, None)?;
/// session.close()?;
/// # Ok(())
/// # }
/// ```
///
/// [Canvas]: struct.Canvas.html
/// [FrameEncoder]: trait.FrameEncoder.html
pub struct Session<E: FrameEncoder = GifEncoder> {
    /// Target name
    target: String,
    /// Declared descriptors, one per frame
    descriptors: Vec<ImageDescriptor>,
    /// Descriptor of the current frame
    descriptor: Option<ImageDescriptor>,
    /// Current subimage index
    subimage: usize,
    /// Frame delay shared by every frame (centiseconds)
    delay_cs: u16,
    /// Canvas of the pending frame
    canvas: Option<Canvas>,
    /// Sink waiting to be handed to the encoder
    sink: Option<Sink>,
    /// Has the encoder been begun?
    begun: bool,
    /// Is the session open?
    open: bool,
    /// Dither frames while quantizing
    dither: bool,
    /// Frame encoder
    encoder: E,
}

impl Default for Session<GifEncoder> {
    fn default() -> Self {
        Self::new()
    }
}

impl Session<GifEncoder> {
    /// Create a new GIF session.
    pub fn new() -> Self {
        Self::with_encoder(GifEncoder::default())
    }
}

impl<E: FrameEncoder> Session<E> {
    /// Create a new session with a frame encoder.
    pub fn with_encoder(encoder: E) -> Self {
        Session {
            target: String::new(),
            descriptors: Vec::new(),
            descriptor: None,
            subimage: 0,
            delay_cs: 0,
            canvas: None,
            sink: None,
            begun: false,
            open: false,
            dither: true,
            encoder,
        }
    }

    /// Write the next opened output to a caller-supplied sink instead of
    /// creating the target file.
    pub fn with_writer<W: Write + 'static>(mut self, writer: W) -> Self {
        self.set_writer(writer);
        self
    }

    /// Set a caller-supplied sink for the next opened output.
    pub fn set_writer<W: Write + 'static>(&mut self, writer: W) {
        self.sink = Some(Box::new(writer));
    }

    /// Adjust dithering (enabled by default).
    pub fn with_dither(mut self, dither: bool) -> Self {
        self.dither = dither;
        self
    }

    /// Get the format name
    pub fn format_name(&self) -> &'static str {
        "gif"
    }

    /// Get file extensions for the format
    pub fn extensions(&self) -> &'static [&'static str] {
        &["gif"]
    }

    /// Check if a feature is supported
    pub fn supports(&self, feature: &str) -> bool {
        FEATURES.contains(&feature)
    }

    /// Check if the session is open
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Check if a frame is pending (canvas allocated, not yet encoded)
    pub fn is_pending(&self) -> bool {
        self.canvas.is_some()
    }

    /// Get the current subimage index
    pub fn subimage(&self) -> usize {
        self.subimage
    }

    /// Get the declared number of subimages
    pub fn subimages(&self) -> usize {
        self.descriptors.len()
    }

    /// Get the frame delay (centiseconds)
    pub fn delay_cs(&self) -> u16 {
        self.delay_cs
    }

    /// Get the target name
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Get the descriptor of the current frame
    pub fn descriptor(&self) -> Option<&ImageDescriptor> {
        self.descriptor.as_ref()
    }

    /// Get the declared descriptors
    pub fn descriptors(&self) -> &[ImageDescriptor] {
        &self.descriptors
    }

    /// Get the canvas of the pending frame
    pub fn canvas(&self) -> Option<&Canvas> {
        self.canvas.as_ref()
    }

    /// Get the frame encoder
    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    /// Open an output with one descriptor per frame.
    ///
    /// The frame delay for the whole session comes from the first
    /// descriptor's `FramesPerSecond` attribute.
    pub fn open(
        &mut self,
        target: &str,
        descriptors: &[ImageDescriptor],
    ) -> Result<()> {
        let first = descriptors.first().ok_or(Error::NoSubimages)?;
        if self.open {
            warn!("reopening \"{}\" without close", self.target);
            let sink = self.sink.take();
            let closed = self.close();
            self.sink = sink;
            closed?;
        }
        // Check before touching the sink
        let mut descriptor = first.clone();
        descriptor.validate()?;
        let fps = first.float_attribute(FRAMES_PER_SECOND, 1.0);
        let sink = match self.sink.take() {
            Some(sink) => sink,
            None => match File::create(target) {
                Ok(f) => Box::new(BufWriter::new(f)) as Sink,
                Err(source) => {
                    return Err(Error::Open {
                        target: target.to_string(),
                        source,
                    })
                }
            },
        };
        self.target = target.to_string();
        self.descriptors = descriptors.to_vec();
        self.descriptor = Some(descriptor);
        self.subimage = 0;
        self.delay_cs = delay_cs(fps);
        self.sink = Some(sink);
        self.open = true;
        info!(
            "open \"{}\": {} subimage(s), delay {} cs",
            target,
            descriptors.len(),
            self.delay_cs
        );
        if let Err(e) = self.start_subimage() {
            self.reset();
            return Err(e);
        }
        Ok(())
    }

    /// Open with a single descriptor.
    ///
    /// * `Create` starts a new output, like [open] with one descriptor.
    /// * `AppendSubimage` flushes the pending frame and starts the next.
    /// * `AppendMipLevel` always fails.
    ///
    /// [open]: struct.Session.html#method.open
    pub fn open_with_mode(
        &mut self,
        target: &str,
        descriptor: &ImageDescriptor,
        mode: OpenMode,
    ) -> Result<()> {
        match mode {
            OpenMode::Create => self.open(target, std::slice::from_ref(descriptor)),
            OpenMode::AppendSubimage => self.append(descriptor),
            OpenMode::AppendMipLevel => Err(Error::MipLevelsUnsupported),
        }
    }

    /// Append the next frame
    fn append(&mut self, descriptor: &ImageDescriptor) -> Result<()> {
        if !self.open {
            return Err(Error::NotOpen);
        }
        self.finish_subimage()?;
        self.subimage += 1;
        if self.subimage >= self.descriptors.len() {
            warn!(
                "subimage {} beyond declared count {}",
                self.subimage,
                self.descriptors.len()
            );
        }
        self.descriptor = Some(descriptor.clone());
        self.start_subimage()
    }

    /// Validate the current descriptor and allocate its canvas
    fn start_subimage(&mut self) -> Result<()> {
        let descriptor = self.descriptor.as_mut().ok_or(Error::NotOpen)?;
        descriptor.validate()?;
        let width = descriptor.width();
        let height = descriptor.height();
        if !self.begun {
            let sink = self.sink.take().ok_or(Error::NotOpen)?;
            self.encoder
                .begin(sink, width, height, self.delay_cs, BIT_DEPTH, self.dither)
                .map_err(|source| Error::Open {
                    target: self.target.clone(),
                    source,
                })?;
            self.begun = true;
        }
        if self.canvas.is_some() {
            warn!("discarding unflushed canvas");
        }
        debug!("start subimage {}: {width}x{height}", self.subimage);
        self.canvas = Some(Canvas::new(width, height));
        Ok(())
    }

    /// Hand the pending frame to the encoder
    fn finish_subimage(&mut self) -> Result<()> {
        let canvas = match self.canvas.take() {
            Some(canvas) => canvas,
            None => return Ok(()),
        };
        debug!("finish subimage {}", self.subimage);
        self.encoder
            .write_frame(canvas.raster(), self.delay_cs, BIT_DEPTH, self.dither)
            .map_err(Error::Encoder)
    }

    /// Write one scanline of the pending frame.
    ///
    /// * `y` Row within the frame.
    /// * `z` Depth slice (must be 0).
    /// * `format` Sample format of `data` (native endian).
    /// * `data` Pixel samples, interleaved by channel.
    /// * `xstride` Bytes between pixels (`None` for packed).
    pub fn write_scanline(
        &mut self,
        y: u32,
        z: u32,
        format: SampleFormat,
        data: &[u8],
        xstride: Option<usize>,
    ) -> Result<()> {
        let canvas = self.canvas.as_mut().ok_or(Error::NoPendingFrame)?;
        let channels = self
            .descriptor
            .as_ref()
            .map(|d| d.channels())
            .ok_or(Error::NoPendingFrame)?;
        if z != 0 {
            return Err(Error::InvalidDepthSlice(z));
        }
        canvas.write_row(y, channels, format, data, xstride)
    }

    /// Write every scanline of the pending frame.
    ///
    /// * `ystride` Bytes between rows (`None` for packed).
    pub fn write_image(
        &mut self,
        format: SampleFormat,
        data: &[u8],
        xstride: Option<usize>,
        ystride: Option<usize>,
    ) -> Result<()> {
        let (width, height, channels) = match (&self.canvas, &self.descriptor)
        {
            (Some(c), Some(d)) => (c.width(), c.height(), d.channels()),
            _ => return Err(Error::NoPendingFrame),
        };
        let pixel_sz = usize::from(channels) * format.size();
        let xstride_sz = xstride.unwrap_or(pixel_sz);
        let ystride = ystride
            .or_else(|| xstride_sz.checked_mul(width as usize))
            .unwrap_or(usize::MAX);
        for y in 0..height {
            // rows past the end of data are empty, and fail as short
            let row = (y as usize)
                .checked_mul(ystride)
                .and_then(|start| data.get(start..))
                .unwrap_or(&[]);
            self.write_scanline(y, 0, format, row, xstride)?;
        }
        Ok(())
    }

    /// Close the session.
    ///
    /// Flushes the pending frame and finalizes the encoder if it was begun.
    /// The session is reset even if that fails.
    pub fn close(&mut self) -> Result<()> {
        if !self.open {
            self.reset();
            return Ok(());
        }
        let flushed = self.finish_subimage();
        let ended = if self.begun {
            self.encoder.end().map_err(Error::Encoder)
        } else {
            Ok(())
        };
        info!("close \"{}\"", self.target);
        self.reset();
        flushed.and(ended)
    }

    /// Reset to the closed state
    fn reset(&mut self) {
        self.target.clear();
        self.descriptors.clear();
        self.descriptor = None;
        self.subimage = 0;
        self.delay_cs = 0;
        self.canvas = None;
        self.sink = None;
        self.begun = false;
        self.open = false;
    }
}

impl<E: FrameEncoder> Drop for Session<E> {
    fn drop(&mut self) {
        if self.open {
            if let Err(e) = self.close() {
                warn!("close on drop: {e}");
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn delay() {
        assert_eq!(delay_cs(0.0), 0);
        assert_eq!(delay_cs(1.0), 100);
        assert_eq!(delay_cs(2.0), 50);
        assert_eq!(delay_cs(3.0), 33);
        assert_eq!(delay_cs(5.0), 20);
        assert_eq!(delay_cs(0.0001), u16::MAX);
        assert_eq!(delay_cs(-2.0), 0);
        assert_eq!(delay_cs(f32::NAN), 0);
    }

    #[test]
    fn open_modes() {
        assert_eq!(OpenMode::try_from(0).unwrap(), OpenMode::Create);
        assert_eq!(OpenMode::try_from(1).unwrap(), OpenMode::AppendSubimage);
        assert_eq!(OpenMode::try_from(2).unwrap(), OpenMode::AppendMipLevel);
        let e = OpenMode::try_from(42).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::State);
        assert!(e.to_string().contains("42"));
    }

    #[test]
    fn features() {
        let s = Session::new();
        assert_eq!(s.format_name(), "gif");
        assert_eq!(s.extensions(), ["gif"]);
        for f in ["alpha", "multiimage", "appendsubimage", "ioproxy"] {
            assert!(s.supports(f));
        }
        assert!(!s.supports("tiles"));
        assert!(!s.supports("mipmap"));
    }

    #[test]
    fn open_failure_stays_closed() {
        let mut s = Session::new().with_writer(std::io::sink());
        let bad = ImageDescriptor::new(4, 4, 2);
        assert!(s.open("bad.gif", &[bad]).is_err());
        assert!(!s.is_open());
        assert!(!s.is_pending());
        assert!(!s.begun);
        // caller sink is kept for another try
        assert!(s.sink.is_some());
        s.open("good.gif", &[ImageDescriptor::new(4, 4, 3)]).unwrap();
        assert!(s.is_pending());
        s.close().unwrap();
    }

    #[test]
    fn reset_on_close() {
        let mut s = Session::new().with_writer(std::io::sink());
        let d = ImageDescriptor::new(2, 2, 4).with_frames_per_second(5.0);
        s.open("x.gif", &[d.clone(), d]).unwrap();
        assert!(s.begun);
        assert_eq!(s.delay_cs(), 20);
        assert_eq!(s.subimages(), 2);
        s.close().unwrap();
        assert!(!s.is_open());
        assert!(!s.begun);
        assert_eq!(s.target(), "");
        assert_eq!(s.subimages(), 0);
        assert_eq!(s.delay_cs(), 0);
        assert!(!s.encoder().is_begun());
    }

    #[test]
    fn write_image_strided() {
        let mut s = Session::new().with_writer(std::io::sink());
        let d = ImageDescriptor::new(2, 2, 3);
        s.open("x.gif", &[d]).unwrap();
        // rows padded to 8 bytes
        let data = [1, 2, 3, 4, 5, 6, 0, 0, 7, 8, 9, 10, 11, 12];
        s.write_image(SampleFormat::U8, &data, None, Some(8)).unwrap();
        let c = s.canvas().unwrap().as_u8_slice();
        assert_eq!(
            c,
            [1, 2, 3, 255, 4, 5, 6, 255, 7, 8, 9, 255, 10, 11, 12, 255]
        );
        s.close().unwrap();
    }
}
