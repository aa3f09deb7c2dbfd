// Texture manager - Owns the single frame texture and its quad geometry
//
// The texture is created once and its storage is redefined in place whenever
// the logical size changes, so exactly one texture name is alive between
// creation and release.

use super::context::{BoundTexture, CombineMode, GraphicsContext, TextureHandle, WrapMode};
use super::error::{ResourceError, VideoError};
use super::format::FormatDescriptor;
use super::geometry::{next_power_of_two, Quad};
use tracing::debug;

/// Largest padded dimension representable in a u32
const MAX_PADDED_DIMENSION: u32 = 1 << 31;

/// Frame texture plus the quad that displays it
#[derive(Debug)]
pub struct TextureManager {
    handle: TextureHandle,
    logical: (u32, u32),
    padded: (u32, u32),
    quad: Quad,
}

impl TextureManager {
    /// Create the texture and set its static sampling state
    ///
    /// The texture has no storage until [`TextureManager::resize`] is called.
    /// Wrap mode becomes clamp-to-edge when the context supports it, and the
    /// combine mode is straight replace.
    pub fn create<G: GraphicsContext + ?Sized>(context: &mut G) -> Result<Self, VideoError> {
        let handle = context.create_texture()?;

        if let Err(err) = Self::apply_static_state(context, handle) {
            // Do not leak the name when the initial state is rejected
            let _ = context.delete_texture(handle);
            return Err(err);
        }

        debug!(texture = %handle, "frame texture created");
        Ok(Self {
            handle,
            logical: (0, 0),
            padded: (0, 0),
            quad: Quad::default(),
        })
    }

    fn apply_static_state<G: GraphicsContext + ?Sized>(
        context: &mut G,
        handle: TextureHandle,
    ) -> Result<(), VideoError> {
        let clamp = context.supports_clamp_to_edge();
        let mut bound = BoundTexture::bind(context, handle)?;
        bound.set_combine_mode(CombineMode::Replace)?;
        if clamp {
            bound.set_wrap_mode(WrapMode::ClampToEdge)?;
        }
        Ok(())
    }

    /// Reallocate storage for a new logical size
    ///
    /// Storage is padded to powers of two and starts blank. The quad is
    /// recomputed to cover the padded extent. On failure the previous
    /// dimensions and quad are kept.
    pub fn resize<G: GraphicsContext + ?Sized>(
        &mut self,
        context: &mut G,
        width: u32,
        height: u32,
        format: &FormatDescriptor,
    ) -> Result<(), VideoError> {
        let (padded_w, padded_h) = match (next_power_of_two(width), next_power_of_two(height)) {
            (Some(w), Some(h)) => (w, h),
            _ => {
                return Err(ResourceError::TextureTooLarge {
                    width,
                    height,
                    limit: MAX_PADDED_DIMENSION,
                }
                .into())
            }
        };

        {
            let mut bound = BoundTexture::bind(context, self.handle)?;
            bound.define_texture(padded_w, padded_h, format)?;
        }

        self.logical = (width, height);
        self.padded = (padded_w, padded_h);
        self.quad = Quad::covering(padded_w, padded_h);

        debug!(
            texture = %self.handle,
            width,
            height,
            padded_width = padded_w,
            padded_height = padded_h,
            "frame texture storage redefined"
        );
        Ok(())
    }

    /// Delete the texture
    pub fn release<G: GraphicsContext + ?Sized>(self, context: &mut G) -> Result<(), VideoError> {
        context.delete_texture(self.handle)?;
        debug!(texture = %self.handle, "frame texture released");
        Ok(())
    }

    /// Texture name
    pub fn handle(&self) -> TextureHandle {
        self.handle
    }

    /// Logical size of the last successful resize, (0, 0) before any
    pub fn logical_size(&self) -> (u32, u32) {
        self.logical
    }

    /// Power-of-two storage size, (0, 0) before any resize
    pub fn padded_size(&self) -> (u32, u32) {
        self.padded
    }

    /// Quad covering the padded extent
    pub fn quad(&self) -> &Quad {
        &self.quad
    }
}
