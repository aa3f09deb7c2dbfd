// Configuration management
//
// Handles video presentation settings and their persistence as TOML.

use crate::video::{PixelFormat, ScalingPolicy};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Default configuration file path
pub const CONFIG_FILE: &str = "fb_present.toml";

/// Video presentation configuration
///
/// Stores every user-configurable presentation setting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Encoding of posted frames, fixed for the backend's lifetime
    pub pixel_format: PixelFormat,

    /// Linear filtering instead of nearest
    pub filter: bool,

    /// Keep the logical aspect ratio when the window is resized
    pub lock_aspect_ratio: bool,

    /// Only scale by whole multiples of the logical size
    pub lock_integer_scaling: bool,

    /// Initial window scale (1-8)
    pub scale: u32,

    /// Wait for vertical blank when presenting
    pub vsync: bool,

    /// Directory screenshots are written to
    pub screenshot_directory: PathBuf,
}

impl Default for VideoConfig {
    fn default() -> Self {
        VideoConfig {
            pixel_format: PixelFormat::default(),
            filter: false,
            lock_aspect_ratio: true,
            lock_integer_scaling: false,
            scale: 3,
            vsync: true,
            screenshot_directory: PathBuf::from("screenshots"),
        }
    }
}

impl VideoConfig {
    /// Load configuration from `path` or create the default
    ///
    /// If the file doesn't exist or can't be parsed, the default configuration
    /// is returned and written to `path`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use fb_present::config::{VideoConfig, CONFIG_FILE};
    ///
    /// let config = VideoConfig::load_or_default(CONFIG_FILE);
    /// ```
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::load(path).unwrap_or_else(|_| {
            let config = Self::default();
            // Try to save the default config, but don't fail if we can't
            let _ = config.save(path);
            config
        })
    }

    /// Load configuration from a file
    ///
    /// Missing fields take their default values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, io::Error> {
        let contents = fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&contents).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(config.clamped())
    }

    /// Save configuration to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), io::Error> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, contents)
    }

    /// Scaling policy described by the lock flags
    pub fn scaling_policy(&self) -> ScalingPolicy {
        ScalingPolicy {
            lock_aspect_ratio: self.lock_aspect_ratio,
            lock_integer_scaling: self.lock_integer_scaling,
        }
    }

    /// Window size for a logical framebuffer at the configured scale
    pub fn window_size(&self, logical_width: u32, logical_height: u32) -> (u32, u32) {
        (
            logical_width.saturating_mul(self.scale),
            logical_height.saturating_mul(self.scale),
        )
    }

    fn clamped(mut self) -> Self {
        self.scale = self.scale.clamp(1, 8);
        self
    }
}
