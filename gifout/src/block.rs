// block.rs
//
// Copyright (c) 2019-2026  Douglas Lau
//
//! GIF file block types written by the encoder
use crate::lzw::Compressor;

/// Bytes per color table entry
const CHANNELS: usize = 3;

/// Color table configuration for screen or image descriptors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColorTableConfig {
    /// Number of entries (0 means absent)
    len: usize,
}

impl ColorTableConfig {
    /// Create a table config with room for `len` colors.
    ///
    /// The length is rounded up to a power of two between 2 and 256.
    pub fn with_len(len: usize) -> Self {
        let len = len.clamp(2, 256).next_power_of_two();
        ColorTableConfig { len }
    }

    /// Get the number of entries
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the table is absent
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Size field for packed flags (table has `2 << bits` entries)
    fn len_bits(&self) -> u8 {
        match self.len {
            0..=2 => 0,
            n => (n.trailing_zeros() - 1) as u8,
        }
    }

    /// Size of the table in bytes
    pub fn size_bytes(&self) -> usize {
        self.len * CHANNELS
    }
}

/// Frame disposal method
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum DisposalMethod {
    /// No disposal specified
    #[default]
    NoAction,
    /// Leave the frame in place
    Keep,
    /// Restore to background before the next frame
    Background,
    /// Restore to the previous frame
    Previous,
}

impl From<DisposalMethod> for u8 {
    fn from(d: DisposalMethod) -> Self {
        use self::DisposalMethod::*;
        match d {
            NoAction => 0,
            Keep => 1,
            Background => 2,
            Previous => 3,
        }
    }
}

/// GIF header (signature + version)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    version: [u8; 3],
}

impl Default for Header {
    fn default() -> Self {
        Header::with_version(*b"89a")
    }
}

impl Header {
    /// Create a header with a version
    pub fn with_version(version: [u8; 3]) -> Self {
        Header { version }
    }

    /// Get the version
    pub fn version(&self) -> [u8; 3] {
        self.version
    }
}

/// Logical screen descriptor
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LogicalScreenDesc {
    screen_width: u16,
    screen_height: u16,
    flags: u8,
    background_color_idx: u8,
    pixel_aspect_ratio: u8,
}

impl LogicalScreenDesc {
    const COLOR_TABLE_PRESENT: u8 = 0b1000_0000;
    const COLOR_RESOLUTION: u8 = 0b0111_0000;
    const COLOR_TABLE_SIZE: u8 = 0b0000_0111;

    /// Adjust the screen width
    pub fn with_screen_width(mut self, screen_width: u16) -> Self {
        self.screen_width = screen_width;
        self
    }

    /// Get the screen width
    pub fn screen_width(&self) -> u16 {
        self.screen_width
    }

    /// Adjust the screen height
    pub fn with_screen_height(mut self, screen_height: u16) -> Self {
        self.screen_height = screen_height;
        self
    }

    /// Get the screen height
    pub fn screen_height(&self) -> u16 {
        self.screen_height
    }

    /// Adjust the global color table config
    pub fn with_color_table_config(mut self, tbl: &ColorTableConfig) -> Self {
        let bits = tbl.len_bits() & Self::COLOR_TABLE_SIZE;
        let mut flags = bits | ((bits << 4) & Self::COLOR_RESOLUTION);
        if !tbl.is_empty() {
            flags |= Self::COLOR_TABLE_PRESENT;
        }
        self.flags = flags;
        self
    }

    /// Get the packed flags
    pub fn flags(&self) -> u8 {
        self.flags
    }

    /// Get the background color index
    pub fn background_color_idx(&self) -> u8 {
        self.background_color_idx
    }

    /// Get the pixel aspect ratio
    pub fn pixel_aspect_ratio(&self) -> u8 {
        self.pixel_aspect_ratio
    }
}

/// Global or local color table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorTable {
    colors: Vec<u8>,
}

impl ColorTable {
    /// Create a color table, padding with black to fill `config`
    pub fn with_colors(colors: &[u8], config: &ColorTableConfig) -> Self {
        debug_assert_eq!(colors.len() % CHANNELS, 0);
        let mut colors = colors.to_vec();
        colors.resize(config.size_bytes(), 0);
        ColorTable { colors }
    }

    /// Get the color bytes (RGB triples)
    pub fn colors(&self) -> &[u8] {
        &self.colors
    }
}

/// Graphic control extension
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GraphicControl {
    flags: u8,
    delay_time_cs: u16,
    transparent_color_idx: u8,
}

impl GraphicControl {
    const DISPOSAL_METHOD: u8 = 0b0001_1100;
    const TRANSPARENT_COLOR: u8 = 0b0000_0001;

    /// Get the packed flags
    pub fn flags(&self) -> u8 {
        self.flags
    }

    /// Set the disposal method
    pub fn set_disposal_method(&mut self, method: DisposalMethod) {
        let d: u8 = method.into();
        self.flags = (self.flags & !Self::DISPOSAL_METHOD) | (d << 2);
    }

    /// Get the delay time in centiseconds
    pub fn delay_time_cs(&self) -> u16 {
        self.delay_time_cs
    }

    /// Set the delay time in centiseconds
    pub fn set_delay_time_cs(&mut self, delay_time_cs: u16) {
        self.delay_time_cs = delay_time_cs;
    }

    /// Get the transparent color index
    pub fn transparent_color(&self) -> Option<u8> {
        if self.flags & Self::TRANSPARENT_COLOR != 0 {
            Some(self.transparent_color_idx)
        } else {
            None
        }
    }

    /// Set the transparent color index
    pub fn set_transparent_color(&mut self, clr: Option<u8>) {
        match clr {
            Some(idx) => {
                self.flags |= Self::TRANSPARENT_COLOR;
                self.transparent_color_idx = idx;
            }
            None => {
                self.flags &= !Self::TRANSPARENT_COLOR;
                self.transparent_color_idx = 0;
            }
        }
    }

    /// Get the raw transparent color index
    pub fn transparent_color_idx(&self) -> u8 {
        self.transparent_color_idx
    }
}

/// Application extension
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Application {
    app_data: Vec<Vec<u8>>,
}

impl Application {
    /// Create a NETSCAPE2.0 looping extension (0 means loop forever)
    pub fn with_loop_count(loop_count: u16) -> Self {
        let [lo, hi] = loop_count.to_le_bytes();
        let app_data = vec![b"NETSCAPE2.0".to_vec(), vec![1, lo, hi]];
        Application { app_data }
    }

    /// Get the sub-blocks
    pub fn app_data(&self) -> &[Vec<u8>] {
        &self.app_data
    }
}

/// Image descriptor
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImageDesc {
    left: u16,
    top: u16,
    width: u16,
    height: u16,
    flags: u8,
}

impl ImageDesc {
    const COLOR_TABLE_PRESENT: u8 = 0b1000_0000;
    const COLOR_TABLE_SIZE: u8 = 0b0000_0111;

    /// Adjust the width
    pub fn with_width(mut self, width: u16) -> Self {
        self.width = width;
        self
    }

    /// Adjust the height
    pub fn with_height(mut self, height: u16) -> Self {
        self.height = height;
        self
    }

    /// Adjust the local color table config
    pub fn with_color_table_config(mut self, tbl: &ColorTableConfig) -> Self {
        let mut flags = tbl.len_bits() & Self::COLOR_TABLE_SIZE;
        if !tbl.is_empty() {
            flags |= Self::COLOR_TABLE_PRESENT;
        }
        self.flags = flags;
        self
    }

    /// Get the left position
    pub fn left(&self) -> u16 {
        self.left
    }

    /// Get the top position
    pub fn top(&self) -> u16 {
        self.top
    }

    /// Get the width
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Get the height
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Get the packed flags
    pub fn flags(&self) -> u8 {
        self.flags
    }
}

/// Image data: color indices, compressed when formatted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    min_code_size: u8,
    data: Vec<u8>,
}

impl ImageData {
    /// Create image data from color indices
    pub fn with_indices(indices: Vec<u8>, palette_len: usize) -> Self {
        let min_code_size = ColorTableConfig::with_len(palette_len)
            .len_bits()
            .saturating_add(1)
            .max(2);
        ImageData {
            min_code_size,
            data: indices,
        }
    }

    /// Get the LZW minimum code size
    pub fn min_code_size(&self) -> u8 {
        self.min_code_size
    }

    /// Get the color indices
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Compress the indices
    pub fn compressed(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.data.len() / 2 + 16);
        Compressor::new(self.min_code_size).compress(&self.data, &mut buf);
        buf
    }
}

/// GIF blocks produced by the encoder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Header(Header),
    LogicalScreenDesc(LogicalScreenDesc),
    GlobalColorTable(ColorTable),
    GraphicControl(GraphicControl),
    Application(Application),
    ImageDesc(ImageDesc),
    LocalColorTable(ColorTable),
    ImageData(ImageData),
    Trailer,
}

impl From<Header> for Block {
    fn from(b: Header) -> Self {
        Block::Header(b)
    }
}

impl From<LogicalScreenDesc> for Block {
    fn from(b: LogicalScreenDesc) -> Self {
        Block::LogicalScreenDesc(b)
    }
}

impl From<GraphicControl> for Block {
    fn from(b: GraphicControl) -> Self {
        Block::GraphicControl(b)
    }
}

impl From<Application> for Block {
    fn from(b: Application) -> Self {
        Block::Application(b)
    }
}

impl From<ImageDesc> for Block {
    fn from(b: ImageDesc) -> Self {
        Block::ImageDesc(b)
    }
}

impl From<ImageData> for Block {
    fn from(b: ImageData) -> Self {
        Block::ImageData(b)
    }
}
