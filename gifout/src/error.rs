// error.rs
//
// Copyright (c) 2026  Douglas Lau
//
use std::fmt;
use std::io;

/// Broad category of an [Error](enum.Error.html)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad image descriptor or arguments, found before any allocation or I/O
    Validation,
    /// Output sink could not be acquired or rejected the header
    Io,
    /// Frame encoder failed mid-session
    Encoder,
    /// Operation called in an illegal sequence
    State,
}

/// Errors encountered while writing
#[derive(Debug)]
pub enum Error {
    /// Sink could not be acquired, or the encoder rejected it.
    Open {
        /// Target name
        target: String,
        /// Underlying cause
        source: io::Error,
    },
    /// Frame encoder failed writing a frame or the trailer.
    Encoder(io::Error),
    /// Width or height less than 1, or too many pixels for a canvas.
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },
    /// Volume images (depth > 1) are not supported.
    VolumeImage(u32),
    /// Only 3 or 4 channel images are supported.
    UnsupportedChannels(u8),
    /// At least one subimage is required.
    NoSubimages,
    /// MIP levels are not supported.
    MipLevelsUnsupported,
    /// Scanline row outside the canvas.
    InvalidScanline(u32),
    /// Depth slice other than zero.
    InvalidDepthSlice(u32),
    /// Scanline data too short for one row.
    ShortScanline {
        /// Bytes needed
        needed: usize,
        /// Bytes supplied
        len: usize,
    },
    /// Session is not open.
    NotOpen,
    /// No frame is pending (scanline written outside a frame).
    NoPendingFrame,
    /// Open mode value not recognized.
    UnknownOpenMode(i32),
}

/// Gifout result type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Get the error category
    pub fn kind(&self) -> ErrorKind {
        use self::Error::*;
        match self {
            Open { .. } => ErrorKind::Io,
            Encoder(_) => ErrorKind::Encoder,
            InvalidDimensions { .. }
            | VolumeImage(_)
            | UnsupportedChannels(_)
            | NoSubimages
            | MipLevelsUnsupported
            | InvalidScanline(_)
            | InvalidDepthSlice(_)
            | ShortScanline { .. } => ErrorKind::Validation,
            NotOpen | NoPendingFrame | UnknownOpenMode(_) => ErrorKind::State,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        use self::Error::*;
        match self {
            Encoder(err) => fmt::Display::fmt(err, fmt),
            Open { target, .. } => write!(fmt, "Could not open \"{target}\""),
            InvalidDimensions { width, height } if *width < 1 || *height < 1 => {
                write!(
                    fmt,
                    "Image resolution must be at least 1x1, you asked for {width} x {height}"
                )
            }
            InvalidDimensions { width, height } => write!(
                fmt,
                "Image resolution {width} x {height} is too large"
            ),
            VolumeImage(_) => {
                write!(fmt, "gif does not support volume images (depth > 1)")
            }
            UnsupportedChannels(n) => {
                write!(fmt, "gif does not support {n}-channel images")
            }
            NoSubimages => write!(fmt, "gif does not support 0 subimages"),
            MipLevelsUnsupported => {
                write!(fmt, "gif does not support MIP levels")
            }
            InvalidScanline(y) => write!(fmt, "scanline {y} out of range"),
            InvalidDepthSlice(z) => write!(fmt, "depth slice {z} out of range"),
            ShortScanline { needed, len } => write!(
                fmt,
                "scanline needs {needed} bytes, only {len} supplied"
            ),
            NotOpen => write!(fmt, "gif output is not open"),
            NoPendingFrame => write!(fmt, "no frame pending for scanline"),
            UnknownOpenMode(m) => write!(fmt, "Unknown open mode {m}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Encoder(ref err) => Some(err),
            Error::Open { ref source, .. } => Some(source),
            _ => None,
        }
    }
}
