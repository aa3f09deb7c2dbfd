// Test pattern - Animated colour bars in any pixel format
//
// Stands in for an emulation core: every call to `next_frame` produces one
// frame in the configured encoding, with the bars scrolled one pixel.

use crate::video::PixelFormat;

/// Colour bars, left to right
pub const BARS: [[u8; 4]; 8] = [
    [0xFF, 0xFF, 0xFF, 0xFF], // white
    [0xFF, 0xFF, 0x00, 0xFF], // yellow
    [0x00, 0xFF, 0xFF, 0xFF], // cyan
    [0x00, 0xFF, 0x00, 0xFF], // green
    [0xFF, 0x00, 0xFF, 0xFF], // magenta
    [0xFF, 0x00, 0x00, 0xFF], // red
    [0x00, 0x00, 0xFF, 0xFF], // blue
    [0x00, 0x00, 0x00, 0xFF], // black
];

/// Frame generator for a fixed size and encoding
#[derive(Debug, Clone)]
pub struct TestPattern {
    width: u32,
    height: u32,
    format: PixelFormat,
    frame: u64,
    buffer: Vec<u8>,
}

impl TestPattern {
    /// Create a generator for `width` x `height` frames
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            width,
            height,
            format,
            frame: 0,
            buffer: vec![0; format.descriptor().frame_len(width, height)],
        }
    }

    /// Frame width
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Encoding of produced frames
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Number of frames produced so far
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Colour of a pixel in frame `frame`
    ///
    /// The top three quarters hold the scrolling bars, the bottom quarter a
    /// static grey ramp.
    pub fn color_at(&self, x: u32, y: u32, frame: u64) -> [u8; 4] {
        let width = u64::from(self.width.max(1));
        if u64::from(y) * 4 < u64::from(self.height) * 3 {
            let shifted = (u64::from(x) + frame) % width;
            BARS[(shifted * BARS.len() as u64 / width) as usize]
        } else {
            let level = if width > 1 {
                (u64::from(x) * 255 / (width - 1)) as u8
            } else {
                0xFF
            };
            [level, level, level, 0xFF]
        }
    }

    /// Last rendered frame, blank before the first
    pub fn current_frame(&self) -> &[u8] {
        &self.buffer
    }

    /// Render the next frame
    ///
    /// # Returns
    /// The frame, exactly `bytes_per_pixel * width * height` bytes
    pub fn next_frame(&mut self) -> &[u8] {
        let bpp = self.format.bytes_per_pixel();
        let frame = self.frame;
        let width = self.width as usize;

        let mut buffer = std::mem::take(&mut self.buffer);
        for (i, pixel) in buffer.chunks_exact_mut(bpp).enumerate() {
            let x = (i % width) as u32;
            let y = (i / width) as u32;
            self.format.encode(self.color_at(x, y, frame), pixel);
        }
        self.buffer = buffer;

        self.frame += 1;
        &self.buffer
    }
}
