// convert.rs
//
// Copyright (c) 2026  Douglas Lau
//
//! Scanline conversion into 8-bit RGBA
use crate::desc::SampleFormat;
use crate::error::{Error, Result};
use pix::chan::{Ch16, Ch32, Ch8};

/// Bytes per canvas pixel
pub(crate) const CANVAS_CHANNELS: usize = 4;

/// Convert one native-endian sample into an 8-bit channel value
fn sample_u8(format: SampleFormat, b: &[u8]) -> u8 {
    use self::SampleFormat::*;
    let ch = match format {
        U8 => Ch8::new(b[0]),
        I8 => signed(i8::from_ne_bytes([b[0]]) as f32 / i8::MAX as f32),
        U16 => Ch8::from(Ch16::new(u16::from_ne_bytes([b[0], b[1]]))),
        I16 => {
            let v = i16::from_ne_bytes([b[0], b[1]]);
            signed(v as f32 / i16::MAX as f32)
        }
        U32 => {
            let v = u32::from_ne_bytes([b[0], b[1], b[2], b[3]]);
            Ch8::from(Ch16::new((v >> 16) as u16))
        }
        F32 => float(f32::from_ne_bytes([b[0], b[1], b[2], b[3]])),
        F64 => {
            let v = f64::from_ne_bytes([
                b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
            ]);
            float(v as f32)
        }
    };
    u8::from(ch)
}

/// Signed values below zero clamp to black
fn signed(v: f32) -> Ch8 {
    float(v.max(0.0))
}

fn float(v: f32) -> Ch8 {
    let v = if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
    Ch8::from(Ch32::new(v))
}

/// Convert one row of pixels into interleaved 8-bit RGBA.
///
/// * `channels` Source channels per pixel (only the first four are kept).
/// * `xstride` Bytes between source pixels (`None` for packed).
/// * `dst` Destination row, `width * 4` bytes.
///
/// Destination channels beyond `channels` are left untouched, so a
/// 3-channel source keeps whatever alpha the row already had.
pub(crate) fn convert_scanline(
    channels: u8,
    width: usize,
    format: SampleFormat,
    src: &[u8],
    xstride: Option<usize>,
    dst: &mut [u8],
) -> Result<()> {
    let sz = format.size();
    let pixel_sz = usize::from(channels) * sz;
    let stride = xstride.unwrap_or(pixel_sz);
    let needed = match width {
        0 => Some(0),
        _ => (width - 1)
            .checked_mul(stride)
            .and_then(|n| n.checked_add(pixel_sz)),
    };
    // a row spanning more than the address space can never be supplied
    let needed = needed.unwrap_or(usize::MAX);
    if src.len() < needed {
        return Err(Error::ShortScanline {
            needed,
            len: src.len(),
        });
    }
    let keep = usize::from(channels).min(CANVAS_CHANNELS);
    for (x, px) in dst.chunks_exact_mut(CANVAS_CHANNELS).take(width).enumerate()
    {
        let base = x * stride;
        for (c, out) in px.iter_mut().take(keep).enumerate() {
            let off = base + c * sz;
            *out = sample_u8(format, &src[off..off + sz]);
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn rgb_keeps_alpha() {
        let src = [10, 20, 30, 40, 50, 60];
        let mut dst = [255; 8];
        convert_scanline(3, 2, SampleFormat::U8, &src, None, &mut dst).unwrap();
        assert_eq!(dst, [10, 20, 30, 255, 40, 50, 60, 255]);
    }

    #[test]
    fn rgba_copied() {
        let src = [1, 2, 3, 4, 5, 6, 7, 8];
        let mut dst = [255; 8];
        convert_scanline(4, 2, SampleFormat::U8, &src, None, &mut dst).unwrap();
        assert_eq!(dst, src);
    }

    #[test]
    fn strided() {
        // 3 channels with a padding byte between pixels
        let src = [9, 8, 7, 0, 6, 5, 4];
        let mut dst = [255; 8];
        convert_scanline(3, 2, SampleFormat::U8, &src, Some(4), &mut dst)
            .unwrap();
        assert_eq!(dst, [9, 8, 7, 255, 6, 5, 4, 255]);
    }

    #[test]
    fn wide_formats() {
        let mut src = vec![];
        for v in [u16::MAX, 0, u16::MAX] {
            src.extend_from_slice(&v.to_ne_bytes());
        }
        let mut dst = [255; 4];
        convert_scanline(3, 1, SampleFormat::U16, &src, None, &mut dst)
            .unwrap();
        assert_eq!(dst, [255, 0, 255, 255]);
        let mut src = vec![];
        for v in [0.0f32, 1.0, 2.0, -1.0] {
            src.extend_from_slice(&v.to_ne_bytes());
        }
        let mut dst = [7; 4];
        convert_scanline(4, 1, SampleFormat::F32, &src, None, &mut dst)
            .unwrap();
        assert_eq!(dst, [0, 255, 255, 0]);
        let mut src = vec![];
        for v in [1.0f64, 0.0, 1.0] {
            src.extend_from_slice(&v.to_ne_bytes());
        }
        let mut dst = [0; 4];
        convert_scanline(3, 1, SampleFormat::F64, &src, None, &mut dst)
            .unwrap();
        assert_eq!(dst, [255, 0, 255, 0]);
    }

    #[test]
    fn signed_clamps() {
        let src = [i8::MIN as u8, 0, i8::MAX as u8];
        let mut dst = [1; 4];
        convert_scanline(3, 1, SampleFormat::I8, &src, None, &mut dst).unwrap();
        assert_eq!(dst, [0, 0, 255, 1]);
    }

    #[test]
    fn huge_stride() {
        let mut dst = [255; 8];
        let res = convert_scanline(
            3,
            2,
            SampleFormat::U8,
            &[0; 6],
            Some(usize::MAX),
            &mut dst,
        );
        assert!(matches!(
            res,
            Err(Error::ShortScanline {
                needed: usize::MAX,
                len: 6
            })
        ));
        assert_eq!(dst, [255; 8]);
        // a single pixel never steps by the stride
        let mut dst = [255; 4];
        convert_scanline(3, 1, SampleFormat::U8, &[1, 2, 3], Some(usize::MAX), &mut dst)
            .unwrap();
        assert_eq!(dst, [1, 2, 3, 255]);
    }

    #[test]
    fn short_data() {
        let mut dst = [255; 8];
        let res = convert_scanline(4, 2, SampleFormat::U8, &[0; 7], None, &mut dst);
        assert!(matches!(res, Err(Error::ShortScanline { needed: 8, len: 7 })));
    }
}
