// lib.rs      gifout crate.
//
// Copyright (c) 2026  Douglas Lau
//
//! Incremental writer for animated GIF images.
//!
//! A [Session] accepts image descriptors and scanlines for one or more
//! frames, buffers each frame on an RGBA canvas, and hands finished frames
//! to a [FrameEncoder] ([GifEncoder] by default).
//!
//! [FrameEncoder]: trait.FrameEncoder.html
//! [GifEncoder]: struct.GifEncoder.html
//! [Session]: struct.Session.html
#![forbid(unsafe_code)]

#[macro_use]
extern crate log;

pub mod block;
mod canvas;
mod convert;
mod desc;
mod encode;
mod encoder;
mod error;
mod gif;
mod lzw;
mod quantize;
mod session;

pub use crate::canvas::Canvas;
pub use crate::desc::{Attribute, ImageDescriptor, SampleFormat, FRAMES_PER_SECOND};
pub use crate::encode::BlockEnc;
pub use crate::encoder::{FrameEncoder, Sink};
pub use crate::error::{Error, ErrorKind, Result};
pub use crate::gif::GifEncoder;
pub use crate::session::{OpenMode, Session};
