// Graphics context - The host graphics API as seen by the presenter
//
// One implementation exists per underlying graphics API. Texture state calls
// act on the currently bound texture, and binding is only reachable through
// the BoundTexture guard so nothing stays bound between operations.

use super::backend::Swap;
use super::error::VideoError;
use super::format::FormatDescriptor;
use super::geometry::{Ortho, Quad};
use super::viewport::Viewport;
use std::fmt;
use std::ops::{Deref, DerefMut};

/// Opaque name of a texture owned by a graphics context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureHandle(pub(crate) u32);

impl TextureHandle {
    /// Raw numeric name
    pub fn id(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TextureHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Addressing outside the [0, 1] texture coordinate range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WrapMode {
    /// Tile the texture
    #[default]
    Repeat,
    /// Reuse the edge texels
    ClampToEdge,
}

/// Texel sampling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    /// Closest texel
    #[default]
    Nearest,
    /// Bilinear blend of the four closest texels
    Linear,
}

impl FilterMode {
    /// Linear when `filter` is set, nearest otherwise
    pub fn from_enabled(filter: bool) -> Self {
        if filter {
            FilterMode::Linear
        } else {
            FilterMode::Nearest
        }
    }
}

/// How sampled texels combine with what is already in the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CombineMode {
    /// Texel replaces the destination
    #[default]
    Replace,
    /// Texel is multiplied with the destination color
    Modulate,
}

/// RGBA clear color, components in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClearColor(pub [f32; 4]);

impl ClearColor {
    /// Transparent black
    pub const TRANSPARENT: Self = ClearColor([0.0, 0.0, 0.0, 0.0]);
}

/// Host graphics API used by the quad presenter
pub trait GraphicsContext {
    /// Whatever the context needs to reach its presentation surface
    type Surface;

    /// Bind the context to its presentation surface
    fn attach(&mut self, surface: Self::Surface) -> Result<(), VideoError>;

    /// Inform the context that its surface changed size
    fn resize_surface(&mut self, width: u32, height: u32) -> Result<(), VideoError>;

    /// Generate a texture name with no storage
    fn create_texture(&mut self) -> Result<TextureHandle, VideoError>;

    /// Release a texture and its storage
    fn delete_texture(&mut self, texture: TextureHandle) -> Result<(), VideoError>;

    /// Make `texture` the target of texture state calls
    ///
    /// Prefer [`BoundTexture::bind`], which unbinds when dropped.
    fn bind_texture(&mut self, texture: TextureHandle) -> Result<(), VideoError>;

    /// Clear the texture binding
    fn unbind_texture(&mut self);

    /// Set the wrap mode of the bound texture on both axes
    fn set_wrap_mode(&mut self, wrap: WrapMode) -> Result<(), VideoError>;

    /// Set the texture combine mode of the bound texture
    fn set_combine_mode(&mut self, mode: CombineMode) -> Result<(), VideoError>;

    /// Set the min/mag filter of the bound texture
    fn set_filter(&mut self, filter: FilterMode) -> Result<(), VideoError>;

    /// Give the bound texture blank storage, replacing any previous storage
    fn define_texture(
        &mut self,
        width: u32,
        height: u32,
        format: &FormatDescriptor,
    ) -> Result<(), VideoError>;

    /// Write `width` x `height` pixels into the top-left of the bound texture
    fn upload_texture(
        &mut self,
        width: u32,
        height: u32,
        format: &FormatDescriptor,
        pixels: &[u8],
    ) -> Result<(), VideoError>;

    /// Clear the whole surface
    fn clear(&mut self, color: ClearColor);

    /// Restrict drawing to a rectangle of the surface
    fn set_viewport(&mut self, viewport: Viewport);

    /// Set the projection used by subsequent draws
    fn set_projection(&mut self, projection: Ortho);

    /// Draw the quad as a triangle fan with the bound texture
    fn draw_quad(&mut self, quad: &Quad) -> Result<(), VideoError>;

    /// Whether clamp-to-edge wrapping is available
    fn supports_clamp_to_edge(&self) -> bool {
        true
    }

    /// Buffer swap capability, if this context presents on its own
    fn swapper(&mut self) -> Option<&mut dyn Swap> {
        None
    }
}

/// Scoped texture binding
///
/// Dereferences to the context. The texture is unbound when the guard is
/// dropped, including on early return through `?`.
pub struct BoundTexture<'a, G: GraphicsContext + ?Sized> {
    context: &'a mut G,
    texture: TextureHandle,
}

impl<'a, G: GraphicsContext + ?Sized> BoundTexture<'a, G> {
    /// Bind `texture` for the lifetime of the guard
    pub fn bind(context: &'a mut G, texture: TextureHandle) -> Result<Self, VideoError> {
        context.bind_texture(texture)?;
        Ok(Self { context, texture })
    }

    /// The bound texture
    pub fn texture(&self) -> TextureHandle {
        self.texture
    }
}

impl<G: GraphicsContext + ?Sized> Deref for BoundTexture<'_, G> {
    type Target = G;

    fn deref(&self) -> &G {
        self.context
    }
}

impl<G: GraphicsContext + ?Sized> DerefMut for BoundTexture<'_, G> {
    fn deref_mut(&mut self) -> &mut G {
        self.context
    }
}

impl<G: GraphicsContext + ?Sized> Drop for BoundTexture<'_, G> {
    fn drop(&mut self) {
        self.context.unbind_texture();
    }
}
