// Framebuffer presentation library
// Presents an emulated display's framebuffer through a single textured quad

// Public modules
pub mod config;
pub mod pattern;
pub mod screenshot;
pub mod video;
#[cfg(feature = "gpu")]
pub mod window;

// Re-export main types for convenience
pub use config::VideoConfig;
pub use pattern::TestPattern;
pub use screenshot::{save_screenshot, ScreenshotError};
pub use video::{
    compute_viewport, ContractViolation, GraphicsContext, Lifecycle, PixelFormat, QuadBackend,
    ResourceError, ScalingPolicy, SoftwareContext, VideoBackend, VideoError, Viewport,
};
#[cfg(feature = "gpu")]
pub use video::WgpuContext;
#[cfg(feature = "gpu")]
pub use window::{run_window, PresentWindow};
