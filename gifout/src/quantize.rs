// quantize.rs
//
// Copyright (c) 2026  Douglas Lau
//
//! Color quantization of RGBA frames into indexed color
use pix::el::Pixel;
use pix::rgb::{SRgb8, SRgba8};
use pix::{Palette, Raster};
use std::collections::HashMap;

/// Alpha values below this are transparent
const ALPHA_THRESHOLD: u8 = 128;

/// Indexed color frame
#[derive(Debug)]
pub struct Indexed {
    /// Palette RGB triples
    pub colors: Vec<u8>,
    /// One palette index per pixel
    pub indices: Vec<u8>,
    /// Index reserved for transparent pixels
    pub transparent: Option<u8>,
}

impl Indexed {
    /// Number of palette entries
    pub fn palette_len(&self) -> usize {
        self.colors.len() / 3
    }
}

/// Quantize a raster into at most `1 << bit_depth` colors.
///
/// Frames with few enough colors get an exact palette; others are mapped
/// onto a uniform color cube, optionally with Floyd-Steinberg dithering.
/// Returns `None` if the bit depth leaves too few colors for a cube.
pub fn quantize(
    raster: &Raster<SRgba8>,
    bit_depth: u8,
    dither: bool,
) -> Option<Indexed> {
    let buf = raster.as_u8_slice();
    let transparent = buf
        .chunks_exact(4)
        .any(|px| px[3] < ALPHA_THRESHOLD)
        .then_some(0u8);
    let reserved = usize::from(transparent.is_some());
    let capacity = (1usize << bit_depth).checked_sub(reserved)?;
    if let Some(indexed) = exact(buf, capacity, transparent) {
        return Some(indexed);
    }
    debug!("frame has over {capacity} colors, using color cube");
    let levels = cube_levels(capacity)?;
    Some(cube(raster, levels, transparent, dither))
}

/// Build an exact palette, if the colors fit
fn exact(buf: &[u8], capacity: usize, transparent: Option<u8>) -> Option<Indexed> {
    let offset = usize::from(transparent.is_some());
    let mut palette = Palette::new(capacity);
    let mut lookup = HashMap::<[u8; 3], u8>::new();
    let mut indices = Vec::with_capacity(buf.len() / 4);
    for px in buf.chunks_exact(4) {
        if px[3] < ALPHA_THRESHOLD {
            indices.push(0);
            continue;
        }
        let rgb = [px[0], px[1], px[2]];
        let idx = match lookup.get(&rgb) {
            Some(idx) => *idx,
            None => {
                let i = palette.set_entry(SRgb8::new(rgb[0], rgb[1], rgb[2]))?;
                let idx = u8::try_from(i + offset).ok()?;
                lookup.insert(rgb, idx);
                idx
            }
        };
        indices.push(idx);
    }
    let mut colors = vec![0; offset * 3];
    for clr in palette.colors() {
        let ch = clr.channels();
        colors.extend_from_slice(&[
            u8::from(ch[0]),
            u8::from(ch[1]),
            u8::from(ch[2]),
        ]);
    }
    if colors.is_empty() {
        // fully transparent frames still need one color
        colors.extend_from_slice(&[0, 0, 0]);
    }
    Some(Indexed {
        colors,
        indices,
        transparent,
    })
}

/// Get the largest number of levels per channel for a color cube
fn cube_levels(capacity: usize) -> Option<usize> {
    let levels = (2..=6).rev().find(|n| n * n * n <= capacity)?;
    Some(levels)
}

/// Map a channel value onto the nearest cube level
fn level(v: i32, levels: usize) -> usize {
    let top = levels as i32 - 1;
    ((v.clamp(0, 255) * top + 127) / 255) as usize
}

/// Channel value of a cube level
fn level_value(l: usize, levels: usize) -> i32 {
    (l * 255 / (levels - 1)) as i32
}

/// Map a raster onto a uniform color cube
fn cube(
    raster: &Raster<SRgba8>,
    levels: usize,
    transparent: Option<u8>,
    dither: bool,
) -> Indexed {
    let offset = usize::from(transparent.is_some());
    let mut colors = vec![0; offset * 3];
    for r in 0..levels {
        for g in 0..levels {
            for b in 0..levels {
                colors.push(level_value(r, levels) as u8);
                colors.push(level_value(g, levels) as u8);
                colors.push(level_value(b, levels) as u8);
            }
        }
    }
    let width = raster.width() as usize;
    let buf = raster.as_u8_slice();
    let mut indices = Vec::with_capacity(buf.len() / 4);
    // error for current and next rows, with one pixel padding each side
    let mut err = vec![[0i32; 3]; (width + 2) * 2];
    for row in buf.chunks_exact(width * 4) {
        let (cur, next) = err.split_at_mut(width + 2);
        for (x, px) in row.chunks_exact(4).enumerate() {
            if px[3] < ALPHA_THRESHOLD {
                indices.push(0);
                continue;
            }
            let mut want = [0i32; 3];
            let mut lvl = [0usize; 3];
            for c in 0..3 {
                want[c] = i32::from(px[c]);
                if dither {
                    want[c] += cur[x + 1][c] / 16;
                }
                lvl[c] = level(want[c], levels);
            }
            let idx = offset + (lvl[0] * levels + lvl[1]) * levels + lvl[2];
            indices.push(idx as u8);
            if dither {
                for c in 0..3 {
                    let e = want[c].clamp(0, 255) - level_value(lvl[c], levels);
                    cur[x + 2][c] += e * 7;
                    next[x][c] += e * 3;
                    next[x + 1][c] += e * 5;
                    next[x + 2][c] += e;
                }
            }
        }
        cur.copy_from_slice(next);
        next.fill([0; 3]);
    }
    Indexed {
        colors,
        indices,
        transparent,
    }
}
