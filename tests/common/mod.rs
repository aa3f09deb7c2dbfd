// Common test utilities for backend integration tests
//
// Shared helpers for driving a QuadBackend over the software context the
// way a host would.

#![allow(dead_code)]

use fb_present::video::{HeadlessSurface, SoftwareContext, VideoBackend};
use fb_present::{PixelFormat, QuadBackend, ScalingPolicy, TestPattern};

/// Window size used by most scenarios
pub const WINDOW: (u32, u32) = (640, 480);

/// Backend over a software context, initialized, sized and resized
pub fn ready_backend(
    format: PixelFormat,
    policy: ScalingPolicy,
    window: (u32, u32),
    logical: (u32, u32),
) -> QuadBackend<SoftwareContext> {
    let mut backend = QuadBackend::new(SoftwareContext::new(), format).with_policy(policy);
    backend
        .init(HeadlessSurface::new(window.0, window.1))
        .expect("init");
    backend
        .set_dimensions(logical.0, logical.1)
        .expect("set_dimensions");
    backend.resized(window.0, window.1).expect("resized");
    backend
}

/// Post and draw `count` pattern frames
pub fn run_frames<B: VideoBackend>(backend: &mut B, pattern: &mut TestPattern, count: usize) {
    for _ in 0..count {
        backend.post_frame(pattern.next_frame()).expect("post_frame");
        backend.draw_frame().expect("draw_frame");
    }
}

/// Colour a pixel has after a round trip through `format`
pub fn through_format(format: PixelFormat, rgba: [u8; 4]) -> [u8; 4] {
    let mut encoded = [0u8; 4];
    format.encode(rgba, &mut encoded);
    format.decode(&encoded[..format.bytes_per_pixel()])
}

/// Count pixels outside the viewport that are not transparent black
pub fn dirty_letterbox_pixels(backend: &QuadBackend<SoftwareContext>) -> usize {
    let viewport = backend.viewport();
    let ctx = backend.context();
    let Some(surface) = ctx.surface() else {
        return 0;
    };

    let mut dirty = 0;
    for y in 0..surface.height {
        for x in 0..surface.width {
            if !viewport.contains(x, y) && ctx.pixel(x, y) != Some([0; 4]) {
                dirty += 1;
            }
        }
    }
    dirty
}
