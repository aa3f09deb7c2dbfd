// Video backend interface - Capability set exposed to the host
//
// The host drives a backend through these hooks:
// - init once per presentation session
// - set_dimensions whenever the logical framebuffer size is established
// - resized whenever the output window changes size
// - post_frame / draw_frame once per emulated frame
// - deinit to release GPU resources
//
// Buffer swapping and message overlays are optional. A backend without them
// returns None from the matching accessor.

use super::error::VideoError;

/// Buffer swap capability
pub trait Swap {
    /// Present the composited frame
    fn swap(&mut self) -> Result<(), VideoError>;
}

/// On-screen text overlay capability
pub trait MessageOverlay {
    /// Show `message` over the frame until cleared
    fn set_message(&mut self, message: &str);

    /// Remove the current message
    fn clear_message(&mut self);
}

/// Presentation backend driven by the host
pub trait VideoBackend {
    /// Handle to the presentation surface passed to [`VideoBackend::init`]
    type Surface;

    /// Bind to a presentation surface and allocate the texture
    fn init(&mut self, surface: Self::Surface) -> Result<(), VideoError>;

    /// Release every GPU resource owned by the backend
    fn deinit(&mut self) -> Result<(), VideoError>;

    /// Establish or change the logical framebuffer size
    fn set_dimensions(&mut self, width: u32, height: u32) -> Result<(), VideoError>;

    /// Recompute the viewport for a new output surface size
    fn resized(&mut self, width: u32, height: u32) -> Result<(), VideoError>;

    /// Blank the output surface
    fn clear(&mut self) -> Result<(), VideoError>;

    /// Upload one frame of pixels in the configured encoding
    fn post_frame(&mut self, pixels: &[u8]) -> Result<(), VideoError>;

    /// Composite the current texture onto the output surface
    fn draw_frame(&mut self) -> Result<(), VideoError>;

    /// Buffer swap capability, if supported
    fn swapper(&mut self) -> Option<&mut dyn Swap> {
        None
    }

    /// Message overlay capability, if supported
    fn overlay(&mut self) -> Option<&mut dyn MessageOverlay> {
        None
    }
}
