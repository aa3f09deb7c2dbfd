// Quad backend - Lifecycle controller for textured-quad presentation
//
// State machine:
//   Uninitialized --init--> Initialized --set_dimensions--> DimensionsSet
//   DimensionsSet --set_dimensions--> DimensionsSet
//   Initialized | DimensionsSet --deinit--> Destroyed
//   Destroyed --init--> Initialized (new session)
//
// resized, post_frame and draw_frame need DimensionsSet. clear needs a
// live context (Initialized or DimensionsSet).

use super::backend::{Swap, VideoBackend};
use super::context::GraphicsContext;
use super::error::{ContractViolation, VideoError};
use super::format::{FormatDescriptor, PixelFormat};
use super::geometry::Quad;
use super::presenter;
use super::texture::TextureManager;
use super::viewport::{compute_viewport, ScalingPolicy, Viewport};
use std::fmt;
use tracing::{debug, info};

/// Lifecycle state of a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Constructed, not bound to a surface
    Uninitialized,
    /// Texture allocated, no logical size yet
    Initialized,
    /// Ready to present frames
    DimensionsSet,
    /// Resources released
    Destroyed,
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Lifecycle::Uninitialized => "uninitialized",
            Lifecycle::Initialized => "initialized",
            Lifecycle::DimensionsSet => "sized",
            Lifecycle::Destroyed => "destroyed",
        };
        f.write_str(name)
    }
}

/// Presents a fixed-format framebuffer through one texture and one quad
///
/// Generic over the host graphics API. The pixel format is fixed at
/// construction and resolved once.
#[derive(Debug)]
pub struct QuadBackend<G: GraphicsContext> {
    context: G,
    format: FormatDescriptor,
    texture: Option<TextureManager>,
    state: Lifecycle,
    filter: bool,
    policy: ScalingPolicy,
    viewport: Viewport,
}

impl<G: GraphicsContext> QuadBackend<G> {
    /// Create a backend that presents `pixel_format` frames through `context`
    pub fn new(context: G, pixel_format: PixelFormat) -> Self {
        Self {
            context,
            format: pixel_format.descriptor(),
            texture: None,
            state: Lifecycle::Uninitialized,
            filter: false,
            policy: ScalingPolicy::default(),
            viewport: Viewport::default(),
        }
    }

    /// Set linear filtering, used by the next draw
    pub fn with_filter(mut self, filter: bool) -> Self {
        self.filter = filter;
        self
    }

    /// Set the scaling policy, used by the next resize
    pub fn with_policy(mut self, policy: ScalingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Enable or disable linear filtering
    pub fn set_filter(&mut self, filter: bool) {
        self.filter = filter;
    }

    /// Lock or unlock the aspect ratio; takes effect on the next resize
    pub fn set_lock_aspect_ratio(&mut self, lock: bool) {
        self.policy.lock_aspect_ratio = lock;
    }

    /// Lock or unlock integer scaling; takes effect on the next resize
    pub fn set_lock_integer_scaling(&mut self, lock: bool) {
        self.policy.lock_integer_scaling = lock;
    }

    /// Whether linear filtering is enabled
    pub fn filter(&self) -> bool {
        self.filter
    }

    /// Current scaling policy
    pub fn policy(&self) -> ScalingPolicy {
        self.policy
    }

    /// Configured pixel format
    pub fn pixel_format(&self) -> PixelFormat {
        self.format.pixel_format
    }

    /// Resolved format triplet
    pub fn format(&self) -> &FormatDescriptor {
        &self.format
    }

    /// Current lifecycle state
    pub fn lifecycle(&self) -> Lifecycle {
        self.state
    }

    /// Logical framebuffer size, once set
    pub fn logical_size(&self) -> Option<(u32, u32)> {
        self.sized_texture().map(TextureManager::logical_size)
    }

    /// Power-of-two texture size, once set
    pub fn padded_size(&self) -> Option<(u32, u32)> {
        self.sized_texture().map(TextureManager::padded_size)
    }

    /// Quad geometry for the current padded size, once set
    pub fn quad(&self) -> Option<&Quad> {
        self.sized_texture().map(TextureManager::quad)
    }

    /// Viewport applied by the last resize
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The host graphics context
    pub fn context(&self) -> &G {
        &self.context
    }

    /// Mutable access to the host graphics context
    pub fn context_mut(&mut self) -> &mut G {
        &mut self.context
    }

    /// Consume the backend and return its context
    pub fn into_context(self) -> G {
        self.context
    }

    fn sized_texture(&self) -> Option<&TextureManager> {
        match self.state {
            Lifecycle::DimensionsSet => self.texture.as_ref(),
            _ => None,
        }
    }

    fn require(&self, operation: &'static str, allowed: &[Lifecycle]) -> Result<(), VideoError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(out_of_order(operation, self.state))
        }
    }
}

fn out_of_order(operation: &'static str, state: Lifecycle) -> VideoError {
    ContractViolation::OutOfOrder { operation, state }.into()
}

impl<G: GraphicsContext> VideoBackend for QuadBackend<G> {
    type Surface = G::Surface;

    fn init(&mut self, surface: G::Surface) -> Result<(), VideoError> {
        self.require("init", &[Lifecycle::Uninitialized, Lifecycle::Destroyed])?;

        self.context.attach(surface)?;
        let texture = TextureManager::create(&mut self.context)?;

        self.texture = Some(texture);
        self.viewport = Viewport::default();
        self.state = Lifecycle::Initialized;
        info!(format = ?self.format.pixel_format, "video backend initialized");
        Ok(())
    }

    fn deinit(&mut self) -> Result<(), VideoError> {
        self.require("deinit", &[Lifecycle::Initialized, Lifecycle::DimensionsSet])?;

        // The session ends even if the host rejects the delete
        self.state = Lifecycle::Destroyed;
        if let Some(texture) = self.texture.take() {
            texture.release(&mut self.context)?;
        }
        info!("video backend released");
        Ok(())
    }

    fn set_dimensions(&mut self, width: u32, height: u32) -> Result<(), VideoError> {
        self.require(
            "set_dimensions",
            &[Lifecycle::Initialized, Lifecycle::DimensionsSet],
        )?;
        if width == 0 || height == 0 {
            return Err(ContractViolation::ZeroDimensions { width, height }.into());
        }

        let state = self.state;
        let texture = self
            .texture
            .as_mut()
            .ok_or_else(|| out_of_order("set_dimensions", state))?;
        texture.resize(&mut self.context, width, height, &self.format)?;
        self.state = Lifecycle::DimensionsSet;
        Ok(())
    }

    fn resized(&mut self, width: u32, height: u32) -> Result<(), VideoError> {
        self.require("resized", &[Lifecycle::DimensionsSet])?;
        let (logical_w, logical_h) = self
            .logical_size()
            .ok_or_else(|| out_of_order("resized", self.state))?;

        self.context.resize_surface(width, height)?;
        let viewport = compute_viewport(width, height, logical_w, logical_h, self.policy);
        presenter::apply_viewport(&mut self.context, viewport);
        self.viewport = viewport;

        debug!(
            window_width = width,
            window_height = height,
            x = viewport.x,
            y = viewport.y,
            width = viewport.width,
            height = viewport.height,
            "viewport updated"
        );
        Ok(())
    }

    fn clear(&mut self) -> Result<(), VideoError> {
        self.require("clear", &[Lifecycle::Initialized, Lifecycle::DimensionsSet])?;
        presenter::clear(&mut self.context);
        Ok(())
    }

    fn post_frame(&mut self, pixels: &[u8]) -> Result<(), VideoError> {
        self.require("post_frame", &[Lifecycle::DimensionsSet])?;
        let state = self.state;
        let texture = self
            .texture
            .as_ref()
            .ok_or_else(|| out_of_order("post_frame", state))?;
        presenter::post_frame(&mut self.context, texture, &self.format, pixels)
    }

    fn draw_frame(&mut self) -> Result<(), VideoError> {
        self.require("draw_frame", &[Lifecycle::DimensionsSet])?;
        let state = self.state;
        let texture = self
            .texture
            .as_ref()
            .ok_or_else(|| out_of_order("draw_frame", state))?;
        presenter::draw_frame(&mut self.context, texture, self.filter)
    }

    fn swapper(&mut self) -> Option<&mut dyn Swap> {
        self.context.swapper()
    }
}
