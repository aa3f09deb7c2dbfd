//! Video backend tests
//!
//! End-to-end checks of QuadBackend driven through the software context,
//! organized by concern.

use super::*;

// ========================================
// Test Helper Functions
// ========================================

/// Backend over a fresh software context, not yet initialized
pub(crate) fn backend(format: PixelFormat) -> QuadBackend<SoftwareContext> {
    QuadBackend::new(SoftwareContext::new(), format)
}

/// Backend initialized on a `window_w` x `window_h` headless surface
pub(crate) fn initialized(
    format: PixelFormat,
    window_w: u32,
    window_h: u32,
) -> QuadBackend<SoftwareContext> {
    let mut backend = backend(format);
    backend
        .init(HeadlessSurface::new(window_w, window_h))
        .expect("init");
    backend
}

/// Backend initialized, sized to `lw` x `lh` and resized to the window
pub(crate) fn sized(
    format: PixelFormat,
    window: (u32, u32),
    logical: (u32, u32),
) -> QuadBackend<SoftwareContext> {
    let mut backend = initialized(format, window.0, window.1);
    backend
        .set_dimensions(logical.0, logical.1)
        .expect("set_dimensions");
    backend.resized(window.0, window.1).expect("resized");
    backend
}

/// One frame of `format` pixels where every byte is `value`
pub(crate) fn solid_frame(format: PixelFormat, lw: u32, lh: u32, value: u8) -> Vec<u8> {
    vec![value; format.descriptor().frame_len(lw, lh)]
}

// ========================================
// Test Modules
// ========================================

mod presentation;
