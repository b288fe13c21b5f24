// desc.rs
//
// Copyright (c) 2026  Douglas Lau
//
//! Image descriptors and sample formats
use crate::error::{Error, Result};
use std::collections::BTreeMap;

/// Attribute key for animation frame rate
pub const FRAMES_PER_SECOND: &str = "FramesPerSecond";

/// Numeric format of one channel sample
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SampleFormat {
    /// Unsigned 8-bit
    #[default]
    U8,
    /// Signed 8-bit
    I8,
    /// Unsigned 16-bit
    U16,
    /// Signed 16-bit
    I16,
    /// Unsigned 32-bit
    U32,
    /// 32-bit float, nominal range 0.0 to 1.0
    F32,
    /// 64-bit float, nominal range 0.0 to 1.0
    F64,
}

impl SampleFormat {
    /// Size of one sample in bytes
    pub fn size(self) -> usize {
        use self::SampleFormat::*;
        match self {
            U8 | I8 => 1,
            U16 | I16 => 2,
            U32 | F32 => 4,
            F64 => 8,
        }
    }
}

/// Descriptor attribute value
#[derive(Clone, Debug, PartialEq)]
pub enum Attribute {
    /// Integer value
    Int(i64),
    /// Float value
    Float(f32),
    /// String value
    Str(String),
}

impl From<i64> for Attribute {
    fn from(v: i64) -> Self {
        Attribute::Int(v)
    }
}

impl From<f32> for Attribute {
    fn from(v: f32) -> Self {
        Attribute::Float(v)
    }
}

impl From<&str> for Attribute {
    fn from(v: &str) -> Self {
        Attribute::Str(v.to_string())
    }
}

/// Metadata for one image (subimage / frame)
///
/// ## Example
/// ```
/// use gifout::ImageDescriptor;
///
/// let desc = ImageDescriptor::new(64, 48, 4).with_frames_per_second(10.0);
/// assert_eq!(desc.float_attribute("FramesPerSecond", 1.0), 10.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ImageDescriptor {
    width: u32,
    height: u32,
    depth: u32,
    channels: u8,
    format: SampleFormat,
    attributes: BTreeMap<String, Attribute>,
}

impl ImageDescriptor {
    /// Create a new descriptor.
    pub fn new(width: u32, height: u32, channels: u8) -> Self {
        ImageDescriptor {
            width,
            height,
            depth: 1,
            channels,
            format: SampleFormat::U8,
            attributes: BTreeMap::new(),
        }
    }

    /// Adjust the depth (number of slices).
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    /// Adjust the sample format.
    pub fn with_format(mut self, format: SampleFormat) -> Self {
        self.format = format;
        self
    }

    /// Adjust an attribute.
    pub fn with_attribute<A: Into<Attribute>>(
        mut self,
        name: &str,
        value: A,
    ) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Adjust the animation frame rate.
    pub fn with_frames_per_second(self, fps: f32) -> Self {
        self.with_attribute(FRAMES_PER_SECOND, fps)
    }

    /// Set an attribute.
    pub fn set_attribute<A: Into<Attribute>>(&mut self, name: &str, value: A) {
        self.attributes.insert(name.to_string(), value.into());
    }

    /// Get an attribute.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Get a float attribute, or a default if missing or not numeric.
    pub fn float_attribute(&self, name: &str, default: f32) -> f32 {
        match self.attributes.get(name) {
            Some(Attribute::Float(v)) => *v,
            Some(Attribute::Int(v)) => *v as f32,
            _ => default,
        }
    }

    /// Get the width
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the height
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the depth
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Get the channel count
    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Get the sample format
    pub fn format(&self) -> SampleFormat {
        self.format
    }

    /// Check for things GIF can't store, normalizing depth and format.
    pub(crate) fn validate(&mut self) -> Result<()> {
        let w = i32::try_from(self.width).ok().filter(|w| *w > 0);
        let h = i32::try_from(self.height).ok().filter(|h| *h > 0);
        // canvas pixel count must fit in an i32
        if w.zip(h).and_then(|(w, h)| w.checked_mul(h)).is_none() {
            return Err(Error::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.depth < 1 {
            self.depth = 1;
        }
        if self.depth > 1 {
            return Err(Error::VolumeImage(self.depth));
        }
        if self.channels != 3 && self.channels != 4 {
            return Err(Error::UnsupportedChannels(self.channels));
        }
        // GIF is only 8 bit
        self.format = SampleFormat::U8;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn depth_normalized() {
        let mut d = ImageDescriptor::new(2, 2, 3).with_depth(0);
        d.validate().unwrap();
        assert_eq!(d.depth(), 1);
    }

    #[test]
    fn volume_rejected() {
        let mut d = ImageDescriptor::new(16, 16, 4).with_depth(2);
        let e = d.validate().unwrap_err();
        assert_eq!(e.kind(), ErrorKind::Validation);
        assert!(matches!(e, Error::VolumeImage(2)));
    }

    #[test]
    fn channels() {
        for n in [1, 2, 5] {
            let mut d = ImageDescriptor::new(4, 4, n);
            assert!(matches!(d.validate(), Err(Error::UnsupportedChannels(c)) if c == n));
        }
        for n in [3, 4] {
            assert!(ImageDescriptor::new(4, 4, n).validate().is_ok());
        }
    }

    #[test]
    fn dimensions() {
        let mut d = ImageDescriptor::new(0, 4, 4);
        assert!(matches!(
            d.validate(),
            Err(Error::InvalidDimensions {
                width: 0,
                height: 4
            })
        ));
        let mut d = ImageDescriptor::new(4, 0, 4);
        assert!(d.validate().is_err());
    }

    #[test]
    fn too_large() {
        for (w, h) in [(50_000, 50_000), (u32::MAX, 1), (1, 1 << 31)] {
            let mut d = ImageDescriptor::new(w, h, 3);
            let e = d.validate().unwrap_err();
            assert_eq!(e.kind(), ErrorKind::Validation);
            assert!(matches!(
                e,
                Error::InvalidDimensions { width, height }
                    if width == w && height == h
            ));
        }
        let mut d = ImageDescriptor::new(46_340, 46_340, 4);
        assert!(d.validate().is_ok());
    }

    #[test]
    fn format_forced() {
        let mut d = ImageDescriptor::new(1, 1, 4).with_format(SampleFormat::F32);
        d.validate().unwrap();
        assert_eq!(d.format(), SampleFormat::U8);
    }

    #[test]
    fn attributes() {
        let d = ImageDescriptor::new(1, 1, 3);
        assert_eq!(d.float_attribute(FRAMES_PER_SECOND, 1.0), 1.0);
        let d = d.with_attribute(FRAMES_PER_SECOND, 5i64);
        assert_eq!(d.float_attribute(FRAMES_PER_SECOND, 1.0), 5.0);
        let d = d.with_attribute(FRAMES_PER_SECOND, "fast");
        assert_eq!(d.float_attribute(FRAMES_PER_SECOND, 1.0), 1.0);
        assert_eq!(
            d.attribute(FRAMES_PER_SECOND),
            Some(&Attribute::Str("fast".into()))
        );
    }
}
