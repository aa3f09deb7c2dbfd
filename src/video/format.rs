// Pixel formats - Raw framebuffer encodings accepted by the presenter
//
// The encoding is chosen once when the backend is constructed and resolved
// into a FormatDescriptor. Texture allocation and every upload use that same
// descriptor.

use serde::{Deserialize, Serialize};

/// Raw encoding of the framebuffer produced by the emulation core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelFormat {
    /// 16-bit, red in bits 11-15, green in bits 5-10, blue in bits 0-4
    Rgb565,
    /// 16-bit, red in bits 0-4, green in bits 5-9, blue in bits 10-14, alpha in bit 15
    Abgr1555,
    /// 32-bit, one byte per channel in R, G, B, A memory order
    #[default]
    Rgba8888,
}

/// Channel layout of uploaded pixel data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadLayout {
    /// Three channels, no alpha
    Rgb,
    /// Four channels
    Rgba,
}

/// Component packing of uploaded pixel data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadType {
    /// One byte per component
    UnsignedByte,
    /// 5-6-5 packed into a native-endian u16, first component in the high bits
    UnsignedShort565,
    /// 1-5-5-5 packed into a native-endian u16, first component in the low bits
    UnsignedShort1555Rev,
}

/// Storage format of the texture on the GPU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InternalFormat {
    /// Four 8-bit normalized channels
    Rgba8,
}

/// Resolved triplet used for allocation and upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormatDescriptor {
    /// Encoding this descriptor was resolved from
    pub pixel_format: PixelFormat,
    /// Texture storage format
    pub internal: InternalFormat,
    /// Upload channel layout
    pub layout: UploadLayout,
    /// Upload component packing
    pub ty: UploadType,
    /// Size of one pixel in the posted buffer
    pub bytes_per_pixel: usize,
}

impl FormatDescriptor {
    /// Byte length of a `width` x `height` frame in this encoding
    pub fn frame_len(&self, width: u32, height: u32) -> usize {
        self.bytes_per_pixel * width as usize * height as usize
    }

    /// Decode one pixel into RGBA8
    ///
    /// # Panics
    /// Panics if `bytes` is shorter than `bytes_per_pixel`
    #[inline]
    pub fn decode(&self, bytes: &[u8]) -> [u8; 4] {
        self.pixel_format.decode(bytes)
    }
}

impl PixelFormat {
    /// All supported encodings
    pub const ALL: [PixelFormat; 3] = [
        PixelFormat::Rgb565,
        PixelFormat::Abgr1555,
        PixelFormat::Rgba8888,
    ];

    /// Resolve the encoding into its allocation/upload triplet
    pub const fn descriptor(self) -> FormatDescriptor {
        match self {
            PixelFormat::Rgb565 => FormatDescriptor {
                pixel_format: self,
                internal: InternalFormat::Rgba8,
                layout: UploadLayout::Rgb,
                ty: UploadType::UnsignedShort565,
                bytes_per_pixel: 2,
            },
            PixelFormat::Abgr1555 => FormatDescriptor {
                pixel_format: self,
                internal: InternalFormat::Rgba8,
                layout: UploadLayout::Rgba,
                ty: UploadType::UnsignedShort1555Rev,
                bytes_per_pixel: 2,
            },
            PixelFormat::Rgba8888 => FormatDescriptor {
                pixel_format: self,
                internal: InternalFormat::Rgba8,
                layout: UploadLayout::Rgba,
                ty: UploadType::UnsignedByte,
                bytes_per_pixel: 4,
            },
        }
    }

    /// Size of one pixel in bytes
    pub const fn bytes_per_pixel(self) -> usize {
        self.descriptor().bytes_per_pixel
    }

    /// Decode one pixel into RGBA8
    ///
    /// 5- and 6-bit channels are widened by replicating their high bits, so
    /// all-ones maps to 0xFF. Formats without alpha decode as opaque.
    ///
    /// # Panics
    /// Panics if `bytes` is shorter than one pixel
    #[inline]
    pub fn decode(self, bytes: &[u8]) -> [u8; 4] {
        match self {
            PixelFormat::Rgb565 => {
                let v = u16::from_ne_bytes([bytes[0], bytes[1]]);
                [
                    expand5((v >> 11) & 0x1F),
                    expand6((v >> 5) & 0x3F),
                    expand5(v & 0x1F),
                    0xFF,
                ]
            }
            PixelFormat::Abgr1555 => {
                let v = u16::from_ne_bytes([bytes[0], bytes[1]]);
                [
                    expand5(v & 0x1F),
                    expand5((v >> 5) & 0x1F),
                    expand5((v >> 10) & 0x1F),
                    if v & 0x8000 != 0 { 0xFF } else { 0x00 },
                ]
            }
            PixelFormat::Rgba8888 => [bytes[0], bytes[1], bytes[2], bytes[3]],
        }
    }

    /// Encode an RGBA8 color, truncating to the channel depth
    pub fn encode(self, rgba: [u8; 4], out: &mut [u8]) {
        let [r, g, b, a] = rgba.map(u16::from);
        match self {
            PixelFormat::Rgb565 => {
                let v = ((r >> 3) << 11) | ((g >> 2) << 5) | (b >> 3);
                out[..2].copy_from_slice(&v.to_ne_bytes());
            }
            PixelFormat::Abgr1555 => {
                let v = (r >> 3) | ((g >> 3) << 5) | ((b >> 3) << 10) | ((a >> 7) << 15);
                out[..2].copy_from_slice(&v.to_ne_bytes());
            }
            PixelFormat::Rgba8888 => out[..4].copy_from_slice(&rgba),
        }
    }
}

#[inline]
fn expand5(v: u16) -> u8 {
    ((v << 3) | (v >> 2)) as u8
}

#[inline]
fn expand6(v: u16) -> u8 {
    ((v << 2) | (v >> 4)) as u8
}

/// Decode a whole buffer into tightly packed RGBA8
///
/// # Arguments
/// * `format` - Encoding of `src`
/// * `src` - Source pixels
/// * `dst` - Output, cleared and refilled
pub fn decode_into(format: PixelFormat, src: &[u8], dst: &mut Vec<u8>) {
    let bpp = format.bytes_per_pixel();
    dst.clear();
    dst.reserve(src.len() / bpp * 4);
    for pixel in src.chunks_exact(bpp) {
        dst.extend_from_slice(&format.decode(pixel));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_triplets() {
        let d = PixelFormat::Rgb565.descriptor();
        assert_eq!(d.layout, UploadLayout::Rgb);
        assert_eq!(d.ty, UploadType::UnsignedShort565);
        assert_eq!(d.bytes_per_pixel, 2);

        let d = PixelFormat::Abgr1555.descriptor();
        assert_eq!(d.layout, UploadLayout::Rgba);
        assert_eq!(d.ty, UploadType::UnsignedShort1555Rev);
        assert_eq!(d.bytes_per_pixel, 2);

        let d = PixelFormat::Rgba8888.descriptor();
        assert_eq!(d.layout, UploadLayout::Rgba);
        assert_eq!(d.ty, UploadType::UnsignedByte);
        assert_eq!(d.bytes_per_pixel, 4);

        for format in PixelFormat::ALL {
            assert_eq!(format.descriptor().internal, InternalFormat::Rgba8);
            assert_eq!(format.descriptor().pixel_format, format);
        }
    }

    #[test]
    fn test_frame_len() {
        assert_eq!(PixelFormat::Rgb565.descriptor().frame_len(240, 160), 76800);
        assert_eq!(
            PixelFormat::Rgba8888.descriptor().frame_len(256, 224),
            229376
        );
    }

    #[test]
    fn test_decode_565() {
        let red = 0xF800u16.to_ne_bytes();
        assert_eq!(PixelFormat::Rgb565.decode(&red), [0xFF, 0, 0, 0xFF]);
        let green = 0x07E0u16.to_ne_bytes();
        assert_eq!(PixelFormat::Rgb565.decode(&green), [0, 0xFF, 0, 0xFF]);
        let blue = 0x001Fu16.to_ne_bytes();
        assert_eq!(PixelFormat::Rgb565.decode(&blue), [0, 0, 0xFF, 0xFF]);
    }

    #[test]
    fn test_decode_1555_rev() {
        let red = 0x001Fu16.to_ne_bytes();
        assert_eq!(PixelFormat::Abgr1555.decode(&red), [0xFF, 0, 0, 0]);
        let blue_opaque = 0xFC00u16.to_ne_bytes();
        assert_eq!(PixelFormat::Abgr1555.decode(&blue_opaque), [0, 0, 0xFF, 0xFF]);
    }

    #[test]
    fn test_all_ones_decode_to_max() {
        for format in PixelFormat::ALL {
            let bytes = vec![0xFF; format.bytes_per_pixel()];
            assert_eq!(format.decode(&bytes), [0xFF; 4], "{:?}", format);
        }
    }

    #[test]
    fn test_encode_decode_primaries() {
        let colors = [
            [0xFF, 0x00, 0x00, 0xFF],
            [0x00, 0xFF, 0x00, 0xFF],
            [0x00, 0x00, 0xFF, 0xFF],
            [0x00, 0x00, 0x00, 0xFF],
        ];
        for format in PixelFormat::ALL {
            let mut buf = [0u8; 4];
            for color in colors {
                format.encode(color, &mut buf);
                assert_eq!(format.decode(&buf), color, "{:?}", format);
            }
        }
    }

    #[test]
    fn test_decode_into() {
        let src: Vec<u8> = [0xF800u16, 0x001F]
            .iter()
            .flat_map(|v| v.to_ne_bytes())
            .collect();
        let mut dst = vec![1, 2, 3];
        decode_into(PixelFormat::Rgb565, &src, &mut dst);
        assert_eq!(dst, vec![0xFF, 0, 0, 0xFF, 0, 0, 0xFF, 0xFF]);
    }

    #[test]
    fn test_serde_names() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            format: PixelFormat,
        }
        let text = toml::to_string(&Wrapper {
            format: PixelFormat::Abgr1555,
        })
        .expect("serialize");
        assert_eq!(text.trim(), "format = \"abgr1555\"");
        let back: Wrapper = toml::from_str("format = \"rgb565\"").expect("deserialize");
        assert_eq!(back.format, PixelFormat::Rgb565);
    }
}
