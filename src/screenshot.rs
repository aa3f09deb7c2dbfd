// Screenshot functionality
//
// Decodes a posted frame and saves it as a PNG file.

use crate::video::{format::decode_into, PixelFormat};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during screenshot operations
#[derive(Debug, Error)]
pub enum ScreenshotError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// PNG encoding error
    #[error("PNG encoding error: {0}")]
    PngEncoding(#[from] png::EncodingError),

    /// The frame does not match its stated size
    #[error("frame holds {actual} bytes, expected {expected}")]
    FrameSize {
        /// bytes-per-pixel x width x height
        expected: usize,
        /// Length of the frame passed in
        actual: usize,
    },
}

/// Save a screenshot of a frame
///
/// The frame is decoded from `format` to RGBA8 and written as
/// `screenshot_<timestamp>.png` inside `directory`, which is created if needed.
///
/// # Arguments
///
/// * `frame` - Pixels in the backend's encoding, row-major
/// * `width` - Logical frame width
/// * `height` - Logical frame height
/// * `format` - Encoding of `frame`
/// * `directory` - Target directory
///
/// # Returns
///
/// Result containing the path to the saved screenshot or an error
///
/// # Example
///
/// ```no_run
/// use fb_present::screenshot::save_screenshot;
/// use fb_present::video::PixelFormat;
/// use std::path::Path;
///
/// let frame = vec![0u8; 256 * 224 * 2];
/// let path = save_screenshot(&frame, 256, 224, PixelFormat::Rgb565, Path::new("screenshots"))
///     .expect("Failed to save screenshot");
/// println!("Screenshot saved to: {}", path.display());
/// ```
pub fn save_screenshot(
    frame: &[u8],
    width: u32,
    height: u32,
    format: PixelFormat,
    directory: &Path,
) -> Result<PathBuf, ScreenshotError> {
    fs::create_dir_all(directory)?;

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S_%3f");
    let file_path = directory.join(format!("screenshot_{}.png", timestamp));

    let file = fs::File::create(&file_path)?;
    encode_png(io::BufWriter::new(file), frame, width, height, format)?;

    Ok(file_path)
}

/// Encode a frame as an RGBA PNG into `writer`
pub fn encode_png<W: Write>(
    writer: W,
    frame: &[u8],
    width: u32,
    height: u32,
    format: PixelFormat,
) -> Result<(), ScreenshotError> {
    let expected = format.descriptor().frame_len(width, height);
    if frame.len() != expected {
        return Err(ScreenshotError::FrameSize {
            expected,
            actual: frame.len(),
        });
    }

    let mut rgba = Vec::new();
    decode_into(format, frame, &mut rgba);

    let mut encoder = png::Encoder::new(writer, width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder.write_header()?;
    writer.write_image_data(&rgba)?;
    writer.finish()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_png_signature() {
        let frame = vec![0xFF; 4 * 4 * 2];
        let mut out = Vec::new();
        encode_png(&mut out, &frame, 4, 4, PixelFormat::Rgb565).expect("encode");
        assert_eq!(&out[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn test_encode_png_rejects_wrong_size() {
        let mut out = Vec::new();
        let err = encode_png(&mut out, &[0; 10], 4, 4, PixelFormat::Rgba8888)
            .expect_err("wrong size");
        assert!(matches!(
            err,
            ScreenshotError::FrameSize {
                expected: 64,
                actual: 10
            }
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn test_save_screenshot_creates_directory() {
        let dir = std::env::temp_dir().join(format!("fb_present_shots_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);

        let frame = vec![0x80; 8 * 8 * 4];
        let path = save_screenshot(&frame, 8, 8, PixelFormat::Rgba8888, &dir).expect("save");
        assert!(path.starts_with(&dir));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("png"));
        assert!(fs::metadata(&path).expect("metadata").len() > 8);

        let _ = fs::remove_dir_all(&dir);
    }
}
