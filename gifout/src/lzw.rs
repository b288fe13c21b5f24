// lzw.rs
//
// Copyright (c) 2020-2026  Douglas Lau
//
//! Lempel-Ziv-Welch compression for GIF image data
use std::cmp::Ordering;

/// Maximum code bits allowed for GIF
const MAX_CODE_BITS: u8 = 12;

/// Code type
type Code = u16;

/// Dictionary node: a byte plus links to the next (longer) string and to
/// siblings which sort before / after this byte.
#[derive(Clone, Copy, Debug)]
struct Node {
    next: Option<Code>,
    left: Option<Code>,
    right: Option<Code>,
    byte: u8,
}

impl Node {
    fn new(byte: u8) -> Self {
        Node {
            next: None,
            left: None,
            right: None,
            byte,
        }
    }

    fn link(&self, ordering: Ordering) -> Option<Code> {
        match ordering {
            Ordering::Less => self.left,
            Ordering::Equal => self.next,
            Ordering::Greater => self.right,
        }
    }

    fn set_link(&mut self, ordering: Ordering, code: Code) {
        match ordering {
            Ordering::Less => self.left = Some(code),
            Ordering::Equal => self.next = Some(code),
            Ordering::Greater => self.right = Some(code),
        }
    }
}

/// LZW data compressor
pub struct Compressor {
    /// Code dictionary
    table: Vec<Node>,
    /// Minimum code bits
    min_code_bits: u8,
    /// Current code bits
    code_bits: u8,
    /// Pending output bits
    bits: u32,
    /// Number of pending output bits
    n_bits: u8,
}

impl Compressor {
    /// Create a new compressor
    pub fn new(min_code_bits: u8) -> Self {
        let mut comp = Compressor {
            table: Vec::with_capacity(1 << MAX_CODE_BITS),
            min_code_bits,
            code_bits: min_code_bits + 1,
            bits: 0,
            n_bits: 0,
        };
        comp.reset();
        comp
    }

    fn clear_code(&self) -> Code {
        1 << self.min_code_bits
    }

    fn end_code(&self) -> Code {
        self.clear_code() + 1
    }

    fn next_code(&self) -> Code {
        self.table.len() as Code
    }

    /// Reset the dictionary to single-byte strings
    fn reset(&mut self) {
        self.table.clear();
        for byte in 0..self.clear_code() {
            self.table.push(Node::new(byte as u8));
        }
        self.table.push(Node::new(0)); // clear code
        self.table.push(Node::new(0)); // end code
        self.code_bits = self.min_code_bits + 1;
    }

    /// Find the string `code` + `byte`, inserting it if missing
    fn search_insert(&mut self, code: Code, byte: u8) -> Option<Code> {
        let next_code = self.next_code();
        let mut idx = code;
        let mut ordering = Ordering::Equal;
        while let Some(child) = self.table[usize::from(idx)].link(ordering) {
            idx = child;
            ordering = byte.cmp(&self.table[usize::from(idx)].byte);
            if ordering == Ordering::Equal {
                return Some(idx);
            }
        }
        self.table[usize::from(idx)].set_link(ordering, next_code);
        self.table.push(Node::new(byte));
        None
    }

    /// Pack one code into the output, least significant bit first
    fn pack(&mut self, code: Code, out: &mut Vec<u8>) {
        self.bits |= u32::from(code) << self.n_bits;
        self.n_bits += self.code_bits;
        while self.n_bits >= 8 {
            out.push(self.bits as u8);
            self.bits >>= 8;
            self.n_bits -= 8;
        }
    }

    /// Compress a buffer of color indices, appending codes to `out`
    pub fn compress(&mut self, bytes: &[u8], out: &mut Vec<u8>) {
        self.pack(self.clear_code(), out);
        let mut code: Option<Code> = None;
        for &byte in bytes {
            code = match code {
                None => Some(Code::from(byte)),
                Some(c) => match self.search_insert(c, byte) {
                    Some(found) => Some(found),
                    None => {
                        self.pack(c, out);
                        Some(Code::from(byte))
                    }
                },
            };
            let next_code = self.next_code();
            if next_code > 1 << self.code_bits {
                if self.code_bits < MAX_CODE_BITS {
                    self.code_bits += 1;
                } else {
                    self.pack(self.clear_code(), out);
                    self.reset();
                }
            }
        }
        if let Some(c) = code {
            self.pack(c, out);
        }
        self.pack(self.end_code(), out);
        if self.n_bits > 0 {
            out.push(self.bits as u8);
            self.bits = 0;
            self.n_bits = 0;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    /// Minimal GIF-style LZW decoder
    fn decompress(min_code_bits: u8, data: &[u8]) -> Vec<u8> {
        let clear = 1u16 << min_code_bits;
        let end = clear + 1;
        let reset = || -> Vec<Vec<u8>> {
            let mut t: Vec<Vec<u8>> = (0..clear).map(|b| vec![b as u8]).collect();
            t.push(vec![]);
            t.push(vec![]);
            t
        };
        let mut table = reset();
        let mut code_bits = min_code_bits + 1;
        let mut prev: Option<Vec<u8>> = None;
        let mut out = vec![];
        let (mut acc, mut n) = (0u32, 0u8);
        let mut bytes = data.iter();
        loop {
            while n < code_bits {
                match bytes.next() {
                    Some(b) => {
                        acc |= u32::from(*b) << n;
                        n += 8;
                    }
                    None => return out,
                }
            }
            let code = (acc & ((1 << code_bits) - 1)) as u16;
            acc >>= code_bits;
            n -= code_bits;
            if code == clear {
                table = reset();
                code_bits = min_code_bits + 1;
                prev = None;
                continue;
            }
            if code == end {
                return out;
            }
            let entry = match (&prev, table.get(usize::from(code))) {
                (_, Some(e)) => e.clone(),
                (Some(p), None) => {
                    let mut e = p.clone();
                    e.push(p[0]);
                    e
                }
                (None, None) => panic!("invalid first code"),
            };
            if let Some(p) = prev.take() {
                if table.len() < 1 << MAX_CODE_BITS {
                    let mut e = p;
                    e.push(entry[0]);
                    table.push(e);
                    if table.len() == 1 << code_bits && code_bits < MAX_CODE_BITS
                    {
                        code_bits += 1;
                    }
                }
            }
            out.extend_from_slice(&entry);
            prev = Some(entry);
        }
    }

    #[test]
    fn repeated() {
        let mut out = vec![];
        Compressor::new(2).compress(&[0, 0, 0, 0], &mut out);
        // codes (3 bits each): clear 4, 0, 6, 0, end 5
        assert_eq!(out, [0b1000_0100, 0b0101_0001]);
        assert_eq!(decompress(2, &out), [0, 0, 0, 0]);
    }

    #[test]
    fn code_bits_grow() {
        let data: Vec<u8> = (0..2000u32).map(|i| ((i * 7 + i / 13) % 5) as u8)
            .collect();
        let mut out = vec![];
        Compressor::new(3).compress(&data, &mut out);
        assert_eq!(decompress(3, &out), data);
    }

    #[test]
    fn dictionary_full() {
        // xorshift noise fills the 12-bit table many times over
        let mut x = 0x2545_F491u32;
        let data: Vec<u8> = (0..65_536)
            .map(|_| {
                x ^= x << 13;
                x ^= x >> 17;
                x ^= x << 5;
                x as u8
            })
            .collect();
        let mut out = vec![];
        Compressor::new(8).compress(&data, &mut out);
        assert_eq!(decompress(8, &out), data);
    }

    #[test]
    fn full_byte_range() {
        let data: Vec<u8> = (0..=255).chain((0..=255).rev()).collect();
        let mut out = vec![];
        Compressor::new(8).compress(&data, &mut out);
        assert_eq!(decompress(8, &out), data);
    }
}
