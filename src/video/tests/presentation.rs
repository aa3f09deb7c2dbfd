//! Presentation Tests
//!
//! Tests for what reaches the output surface:
//! - uniform frames sample uniformly inside the viewport
//! - letterbox area stays transparent black
//! - filter and scaling policy changes
//! - optional capabilities

use super::*;

/// Assert every surface pixel is `inside` within the viewport and
/// transparent black outside it
fn assert_viewport_fill(backend: &QuadBackend<SoftwareContext>, inside: [u8; 4]) {
    let viewport = backend.viewport();
    let surface = backend.context().surface().expect("attached");
    for y in 0..surface.height {
        for x in 0..surface.width {
            let expected = if viewport.contains(x, y) {
                inside
            } else {
                [0; 4]
            };
            assert_eq!(
                backend.context().pixel(x, y),
                Some(expected),
                "pixel ({}, {}) with viewport {:?}",
                x,
                y,
                viewport
            );
        }
    }
}

#[test]
fn test_max_value_frame_renders_uniformly() {
    for format in PixelFormat::ALL {
        let policy = ScalingPolicy::default().with_aspect_ratio(true);
        let mut backend = initialized(format, 200, 150);
        backend = backend.with_policy(policy);
        backend.set_dimensions(60, 40).expect("set_dimensions");
        backend.resized(200, 150).expect("resized");

        backend
            .post_frame(&solid_frame(format, 60, 40, 0xFF))
            .expect("post_frame");
        backend.draw_frame().expect("draw_frame");

        assert_eq!(backend.padded_size(), Some((64, 64)));
        assert_viewport_fill(&backend, [0xFF; 4]);
    }
}

#[test]
fn test_max_value_frame_with_linear_filter() {
    let mut backend = sized(PixelFormat::Rgba8888, (128, 128), (64, 64)).with_filter(true);
    backend
        .post_frame(&solid_frame(PixelFormat::Rgba8888, 64, 64, 0xFF))
        .expect("post_frame");
    backend.draw_frame().expect("draw_frame");
    assert_viewport_fill(&backend, [0xFF; 4]);
}

#[test]
fn test_letterbox_case_from_800x600() {
    let mut backend = initialized(PixelFormat::Rgb565, 800, 600)
        .with_policy(ScalingPolicy::default().with_aspect_ratio(true));
    backend.set_dimensions(256, 224).expect("set_dimensions");
    backend.resized(800, 600).expect("resized");
    assert_eq!(
        backend.viewport(),
        Viewport {
            x: 57,
            y: 0,
            width: 685,
            height: 600
        }
    );

    backend
        .post_frame(&solid_frame(PixelFormat::Rgb565, 256, 224, 0xFF))
        .expect("post_frame");
    backend.draw_frame().expect("draw_frame");

    let ctx = backend.context();
    assert_eq!(ctx.pixel(56, 300), Some([0; 4]));
    assert_eq!(ctx.pixel(57, 300), Some([0xFF; 4]));
    assert_eq!(ctx.pixel(741, 300), Some([0xFF; 4]));
    assert_eq!(ctx.pixel(742, 300), Some([0; 4]));
}

#[test]
fn test_stretch_fills_window() {
    let backend = sized(PixelFormat::Rgb565, (512, 448), (256, 224));
    assert_eq!(
        backend.viewport(),
        Viewport {
            x: 0,
            y: 0,
            width: 512,
            height: 448
        }
    );
}

#[test]
fn test_integer_scaling_centers_multiple() {
    let mut backend = initialized(PixelFormat::Rgb565, 800, 600).with_policy(ScalingPolicy {
        lock_aspect_ratio: true,
        lock_integer_scaling: true,
    });
    backend.set_dimensions(256, 224).expect("set_dimensions");
    backend.resized(800, 600).expect("resized");
    assert_eq!(
        backend.viewport(),
        Viewport {
            x: 144,
            y: 76,
            width: 512,
            height: 448
        }
    );
}

#[test]
fn test_resize_clears_before_viewport() {
    let mut backend = sized(PixelFormat::Rgb565, (320, 240), (160, 120));
    backend.context_mut().clear_calls();
    backend.resized(640, 480).expect("resized");

    let viewport = backend.viewport();
    assert_eq!(
        backend.context().calls(),
        &[
            Call::ResizeSurface(640, 480),
            Call::Clear(ClearColor::TRANSPARENT),
            Call::SetViewport(viewport),
        ]
    );
}

#[test]
fn test_resize_leaves_texture_alone() {
    let mut backend = sized(PixelFormat::Rgb565, (320, 240), (160, 120));
    backend.context_mut().clear_calls();
    backend.resized(1024, 768).expect("resized");
    assert_eq!(backend.padded_size(), Some((256, 128)));
    assert!(!backend
        .context()
        .calls()
        .iter()
        .any(|call| matches!(call, Call::DefineTexture { .. } | Call::CreateTexture(_))));
}

#[test]
fn test_policy_applies_on_next_resize() {
    let mut backend = sized(PixelFormat::Rgb565, (800, 600), (256, 224));
    let before = backend.viewport();

    backend.set_lock_aspect_ratio(true);
    assert_eq!(backend.viewport(), before);

    backend.resized(800, 600).expect("resized");
    assert_eq!(backend.viewport().width, 685);

    backend.set_lock_integer_scaling(true);
    backend.resized(800, 600).expect("resized");
    assert_eq!(backend.viewport().width, 512);
    assert!(backend.policy().lock_integer_scaling);
}

#[test]
fn test_filter_read_at_draw_time() {
    let mut backend = sized(PixelFormat::Rgb565, (320, 240), (160, 120));
    let frame = solid_frame(PixelFormat::Rgb565, 160, 120, 0);
    backend.post_frame(&frame).expect("post_frame");

    backend.set_filter(true);
    backend.context_mut().clear_calls();
    backend.draw_frame().expect("draw_frame");
    let call = backend.context().calls()[1].clone();
    let Call::BindTexture(handle) = call else {
        panic!("expected a bind, got {:?}", call);
    };
    assert!(backend
        .context()
        .calls()
        .contains(&Call::SetFilter(handle, FilterMode::Linear)));

    backend.set_filter(false);
    backend.context_mut().clear_calls();
    backend.draw_frame().expect("draw_frame");
    assert!(backend
        .context()
        .calls()
        .contains(&Call::SetFilter(handle, FilterMode::Nearest)));
}

#[test]
fn test_post_frame_overwrites_in_place() {
    let mut backend = sized(PixelFormat::Rgb565, (64, 64), (32, 32));
    backend
        .post_frame(&solid_frame(PixelFormat::Rgb565, 32, 32, 0xFF))
        .expect("first frame");
    backend
        .post_frame(&solid_frame(PixelFormat::Rgb565, 32, 32, 0x00))
        .expect("second frame");
    backend.draw_frame().expect("draw_frame");
    assert_viewport_fill(&backend, [0, 0, 0, 0xFF]);
}

#[test]
fn test_post_frame_wrong_length() {
    let mut backend = sized(PixelFormat::Abgr1555, (64, 64), (32, 32));
    let err = backend.post_frame(&[0; 32 * 32]).expect_err("short buffer");
    assert_eq!(
        err,
        VideoError::Contract(ContractViolation::FrameSizeMismatch {
            expected: 2048,
            actual: 1024
        })
    );
}

#[test]
fn test_draw_uses_logical_projection() {
    let mut backend = sized(PixelFormat::Rgba8888, (480, 320), (240, 160));
    backend.context_mut().clear_calls();
    backend.draw_frame().expect("draw_frame");
    assert_eq!(
        backend.context().calls()[0],
        Call::SetProjection(Ortho::new(240, 160))
    );
    assert!(backend
        .context()
        .calls()
        .contains(&Call::DrawQuad(Quad::covering(256, 256))));
    assert_eq!(backend.context().bound_texture(), None);
}

#[test]
fn test_optional_capabilities_absent() {
    let mut backend = sized(PixelFormat::Rgb565, (64, 64), (32, 32));
    assert!(backend.swapper().is_none());
    assert!(backend.overlay().is_none());
}
