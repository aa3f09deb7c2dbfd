// Video module - Presents an emulated framebuffer through one textured quad
//
// This module provides:
// - VideoBackend, the capability set the host drives
// - QuadBackend, the lifecycle controller implementing it
// - GraphicsContext, the host graphics API seam
// - SoftwareContext, a headless CPU reference context
// - WgpuContext, a wgpu/winit context (feature "gpu")
// - Pixel format descriptors, viewport math and quad geometry

pub mod backend;
pub mod context;
pub mod error;
pub mod format;
pub mod geometry;
pub mod presenter;
pub mod quad;
pub mod software;
pub mod texture;
pub mod viewport;
#[cfg(feature = "gpu")]
pub mod wgpu_context;

pub use backend::{MessageOverlay, Swap, VideoBackend};
pub use context::{
    BoundTexture, ClearColor, CombineMode, FilterMode, GraphicsContext, TextureHandle, WrapMode,
};
pub use error::{ContractViolation, ResourceError, VideoError};
pub use format::{FormatDescriptor, InternalFormat, PixelFormat, UploadLayout, UploadType};
pub use geometry::{next_power_of_two, Ortho, Quad};
pub use quad::{Lifecycle, QuadBackend};
pub use software::{Call, HeadlessSurface, SoftwareContext};
pub use texture::TextureManager;
pub use viewport::{compute_viewport, ScalingPolicy, Viewport};
#[cfg(feature = "gpu")]
pub use wgpu_context::WgpuContext;

#[cfg(test)]
mod tests;
