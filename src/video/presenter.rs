// Frame presenter - Per-frame clear, upload and draw
//
// None of these change the texture allocation; they only touch texture
// contents and transient GPU state.

use super::context::{BoundTexture, ClearColor, FilterMode, GraphicsContext};
use super::error::{ContractViolation, VideoError};
use super::format::FormatDescriptor;
use super::geometry::Ortho;
use super::texture::TextureManager;
use super::viewport::Viewport;
use tracing::trace;

/// Clear the output surface to transparent black
pub fn clear<G: GraphicsContext + ?Sized>(context: &mut G) {
    context.clear(ClearColor::TRANSPARENT);
}

/// Clear the surface and restrict drawing to `viewport`
///
/// Clearing first keeps stale letterbox content from surviving a resize.
pub fn apply_viewport<G: GraphicsContext + ?Sized>(context: &mut G, viewport: Viewport) {
    context.clear(ClearColor::TRANSPARENT);
    context.set_viewport(viewport);
}

/// Upload one frame into the top-left of the texture
///
/// # Arguments
/// * `context` - Host graphics context
/// * `texture` - Frame texture, already sized
/// * `format` - Resolved pixel format
/// * `pixels` - Exactly `bytes_per_pixel * width * height` bytes, row-major
pub fn post_frame<G: GraphicsContext + ?Sized>(
    context: &mut G,
    texture: &TextureManager,
    format: &FormatDescriptor,
    pixels: &[u8],
) -> Result<(), VideoError> {
    let (width, height) = texture.logical_size();
    let expected = format.frame_len(width, height);
    if pixels.len() != expected {
        return Err(ContractViolation::FrameSizeMismatch {
            expected,
            actual: pixels.len(),
        }
        .into());
    }

    let mut bound = BoundTexture::bind(context, texture.handle())?;
    bound.upload_texture(width, height, format, pixels)?;
    trace!(width, height, bytes = pixels.len(), "frame posted");
    Ok(())
}

/// Composite the texture onto the current viewport
///
/// The projection spans the logical size with a top-left origin, so the
/// padded part of the quad falls outside the viewport.
pub fn draw_frame<G: GraphicsContext + ?Sized>(
    context: &mut G,
    texture: &TextureManager,
    filter: bool,
) -> Result<(), VideoError> {
    let (width, height) = texture.logical_size();
    context.set_projection(Ortho::new(width, height));

    let mut bound = BoundTexture::bind(context, texture.handle())?;
    bound.set_filter(FilterMode::from_enabled(filter))?;
    bound.draw_quad(texture.quad())?;
    trace!(width, height, filter, "frame drawn");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::format::PixelFormat;
    use crate::video::software::{Call, HeadlessSurface, SoftwareContext};

    fn sized(format: &FormatDescriptor) -> (SoftwareContext, TextureManager) {
        let mut ctx = SoftwareContext::new();
        ctx.attach(HeadlessSurface::new(240, 160)).expect("attach");
        let mut texture = TextureManager::create(&mut ctx).expect("create");
        texture.resize(&mut ctx, 240, 160, format).expect("resize");
        (ctx, texture)
    }

    #[test]
    fn test_post_frame_rejects_wrong_size() {
        let format = PixelFormat::Rgb565.descriptor();
        let (mut ctx, texture) = sized(&format);

        let err = post_frame(&mut ctx, &texture, &format, &[0; 100]).expect_err("mismatch");
        assert_eq!(
            err,
            VideoError::Contract(ContractViolation::FrameSizeMismatch {
                expected: 76800,
                actual: 100
            })
        );
        assert!(!ctx
            .calls()
            .iter()
            .any(|call| matches!(call, Call::UploadTexture { .. })));
    }

    #[test]
    fn test_post_frame_uploads_logical_region() {
        let format = PixelFormat::Rgb565.descriptor();
        let (mut ctx, texture) = sized(&format);

        post_frame(&mut ctx, &texture, &format, &vec![0xFF; 76800]).expect("post");
        assert!(ctx.calls().contains(&Call::UploadTexture {
            texture: texture.handle(),
            width: 240,
            height: 160,
            bytes: 76800,
        }));
        assert_eq!(ctx.bound_texture(), None);
    }

    #[test]
    fn test_post_frame_leaves_filter_alone() {
        let format = PixelFormat::Rgba8888.descriptor();
        let (mut ctx, texture) = sized(&format);
        let before = ctx.calls().len();

        post_frame(&mut ctx, &texture, &format, &vec![0; 240 * 160 * 4]).expect("post");
        assert!(!ctx.calls()[before..]
            .iter()
            .any(|call| matches!(call, Call::SetFilter(..))));
    }

    #[test]
    fn test_draw_frame_sequence() {
        let format = PixelFormat::Rgba8888.descriptor();
        let (mut ctx, texture) = sized(&format);
        let before = ctx.calls().len();

        draw_frame(&mut ctx, &texture, true).expect("draw");
        let handle = texture.handle();
        assert_eq!(
            &ctx.calls()[before..],
            &[
                Call::SetProjection(Ortho::new(240, 160)),
                Call::BindTexture(handle),
                Call::SetFilter(handle, FilterMode::Linear),
                Call::DrawQuad(*texture.quad()),
                Call::UnbindTexture,
            ]
        );
    }

    #[test]
    fn test_apply_viewport_clears_first() {
        let mut ctx = SoftwareContext::new();
        ctx.attach(HeadlessSurface::new(100, 100)).expect("attach");
        let viewport = Viewport {
            x: 10,
            y: 0,
            width: 80,
            height: 100,
        };
        apply_viewport(&mut ctx, viewport);
        assert_eq!(
            ctx.calls(),
            &[
                Call::Attach(100, 100),
                Call::Clear(ClearColor::TRANSPARENT),
                Call::SetViewport(viewport),
            ]
        );
    }
}
