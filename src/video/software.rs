// Software context - Headless reference renderer
//
// Implements GraphicsContext on the CPU:
// - texture storage kept in the upload encoding, like a GL texture
// - every call recorded in order for inspection
// - live/peak texture counts for leak checks
// - one-shot failure injection for create, bind and allocation
// - triangle-fan rasterizer with barycentric texture coordinates and
//   nearest/linear sampling into an RGBA8 framebuffer (top-left origin)

use super::context::{
    ClearColor, CombineMode, FilterMode, GraphicsContext, TextureHandle, WrapMode,
};
use super::error::{ResourceError, VideoError};
use super::format::{FormatDescriptor, PixelFormat};
use super::geometry::{Ortho, Quad, FAN_TRIANGLES};
use super::viewport::Viewport;
use std::collections::BTreeMap;

/// Default largest texture dimension, matching common GL drivers
pub const DEFAULT_MAX_TEXTURE_SIZE: u32 = 8192;

/// Size of the headless output surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadlessSurface {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl HeadlessSurface {
    /// Surface of `width` x `height` pixels
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// One recorded context call
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    /// Surface attached with the given size
    Attach(u32, u32),
    /// Surface resized
    ResizeSurface(u32, u32),
    /// Texture name generated
    CreateTexture(TextureHandle),
    /// Texture deleted
    DeleteTexture(TextureHandle),
    /// Texture bound
    BindTexture(TextureHandle),
    /// Binding cleared
    UnbindTexture,
    /// Wrap mode set on a texture
    SetWrapMode(TextureHandle, WrapMode),
    /// Combine mode set on a texture
    SetCombineMode(TextureHandle, CombineMode),
    /// Filter set on a texture
    SetFilter(TextureHandle, FilterMode),
    /// Storage defined
    DefineTexture {
        /// Target texture
        texture: TextureHandle,
        /// Storage width
        width: u32,
        /// Storage height
        height: u32,
        /// Encoding of the storage
        format: PixelFormat,
    },
    /// Pixels uploaded
    UploadTexture {
        /// Target texture
        texture: TextureHandle,
        /// Region width
        width: u32,
        /// Region height
        height: u32,
        /// Bytes uploaded
        bytes: usize,
    },
    /// Surface cleared
    Clear(ClearColor),
    /// Viewport set
    SetViewport(Viewport),
    /// Projection set
    SetProjection(Ortho),
    /// Quad drawn
    DrawQuad(Quad),
}

#[derive(Debug, Clone, Default)]
struct SoftTexture {
    width: u32,
    height: u32,
    format: Option<FormatDescriptor>,
    data: Vec<u8>,
    wrap: WrapMode,
    filter: FilterMode,
    combine: CombineMode,
}

impl SoftTexture {
    fn texel(&self, x: u32, y: u32) -> [u8; 4] {
        match &self.format {
            Some(format) => {
                let bpp = format.bytes_per_pixel;
                let offset = (y as usize * self.width as usize + x as usize) * bpp;
                format.decode(&self.data[offset..offset + bpp])
            }
            // Incomplete textures sample as opaque black
            None => [0, 0, 0, 0xFF],
        }
    }

    fn wrap_coord(&self, coord: i64, size: u32) -> u32 {
        let size = i64::from(size);
        let wrapped = match self.wrap {
            WrapMode::ClampToEdge => coord.clamp(0, size - 1),
            WrapMode::Repeat => coord.rem_euclid(size),
        };
        wrapped as u32
    }

    fn sample(&self, s: f64, t: f64) -> [u8; 4] {
        if self.width == 0 || self.height == 0 {
            return [0, 0, 0, 0xFF];
        }
        let u = s * f64::from(self.width);
        let v = t * f64::from(self.height);

        match self.filter {
            FilterMode::Nearest => {
                let x = self.wrap_coord(u.floor() as i64, self.width);
                let y = self.wrap_coord(v.floor() as i64, self.height);
                self.texel(x, y)
            }
            FilterMode::Linear => {
                let u = u - 0.5;
                let v = v - 0.5;
                let x0 = u.floor();
                let y0 = v.floor();
                let fx = u - x0;
                let fy = v - y0;

                let xa = self.wrap_coord(x0 as i64, self.width);
                let xb = self.wrap_coord(x0 as i64 + 1, self.width);
                let ya = self.wrap_coord(y0 as i64, self.height);
                let yb = self.wrap_coord(y0 as i64 + 1, self.height);

                let c00 = self.texel(xa, ya);
                let c10 = self.texel(xb, ya);
                let c01 = self.texel(xa, yb);
                let c11 = self.texel(xb, yb);

                let mut out = [0u8; 4];
                for (i, channel) in out.iter_mut().enumerate() {
                    let top = f64::from(c00[i]) * (1.0 - fx) + f64::from(c10[i]) * fx;
                    let bottom = f64::from(c01[i]) * (1.0 - fx) + f64::from(c11[i]) * fx;
                    *channel = (top * (1.0 - fy) + bottom * fy).round() as u8;
                }
                out
            }
        }
    }
}

/// Headless GraphicsContext that records calls and rasterizes on the CPU
#[derive(Debug)]
pub struct SoftwareContext {
    surface: Option<HeadlessSurface>,
    framebuffer: Vec<u8>,
    textures: BTreeMap<TextureHandle, SoftTexture>,
    next_name: u32,
    bound: Option<TextureHandle>,
    viewport: Viewport,
    projection: Ortho,
    calls: Vec<Call>,
    peak_textures: usize,
    draws: usize,
    clamp_supported: bool,
    max_texture_size: u32,
    fail_create: bool,
    fail_bind: bool,
    fail_allocation: bool,
    fail_delete: bool,
}

impl SoftwareContext {
    /// Create an unattached context
    pub fn new() -> Self {
        Self {
            surface: None,
            framebuffer: Vec::new(),
            textures: BTreeMap::new(),
            next_name: 1,
            bound: None,
            viewport: Viewport::default(),
            projection: Ortho::default(),
            calls: Vec::new(),
            peak_textures: 0,
            draws: 0,
            clamp_supported: true,
            max_texture_size: DEFAULT_MAX_TEXTURE_SIZE,
            fail_create: false,
            fail_bind: false,
            fail_allocation: false,
            fail_delete: false,
        }
    }

    /// Report clamp-to-edge as unsupported
    pub fn without_clamp_to_edge(mut self) -> Self {
        self.clamp_supported = false;
        self
    }

    /// Override the largest texture dimension
    pub fn with_max_texture_size(mut self, size: u32) -> Self {
        self.max_texture_size = size;
        self
    }

    /// Reject the next texture creation
    pub fn fail_next_create(&mut self) {
        self.fail_create = true;
    }

    /// Reject the next bind
    pub fn fail_next_bind(&mut self) {
        self.fail_bind = true;
    }

    /// Reject the next storage allocation
    pub fn fail_next_allocation(&mut self) {
        self.fail_allocation = true;
    }

    /// Reject the next delete, leaving the texture alive
    pub fn fail_next_delete(&mut self) {
        self.fail_delete = true;
    }

    /// Recorded calls, oldest first
    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    /// Forget recorded calls
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Number of textures currently alive
    pub fn live_textures(&self) -> usize {
        self.textures.len()
    }

    /// Highest number of textures alive at once
    pub fn peak_textures(&self) -> usize {
        self.peak_textures
    }

    /// Number of quads drawn
    pub fn draw_count(&self) -> usize {
        self.draws
    }

    /// Currently bound texture
    pub fn bound_texture(&self) -> Option<TextureHandle> {
        self.bound
    }

    /// Attached surface
    pub fn surface(&self) -> Option<HeadlessSurface> {
        self.surface
    }

    /// Current viewport
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Storage size of a texture
    pub fn texture_size(&self, texture: TextureHandle) -> Option<(u32, u32)> {
        self.textures.get(&texture).map(|t| (t.width, t.height))
    }

    /// Wrap mode of a texture
    pub fn texture_wrap(&self, texture: TextureHandle) -> Option<WrapMode> {
        self.textures.get(&texture).map(|t| t.wrap)
    }

    /// Filter of a texture
    pub fn texture_filter(&self, texture: TextureHandle) -> Option<FilterMode> {
        self.textures.get(&texture).map(|t| t.filter)
    }

    /// Decoded texel of a texture
    pub fn texel(&self, texture: TextureHandle, x: u32, y: u32) -> Option<[u8; 4]> {
        let t = self.textures.get(&texture)?;
        if x < t.width && y < t.height {
            Some(t.texel(x, y))
        } else {
            None
        }
    }

    /// RGBA8 framebuffer, row-major from the top-left corner
    pub fn framebuffer(&self) -> &[u8] {
        &self.framebuffer
    }

    /// Framebuffer pixel
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let surface = self.surface?;
        if x >= surface.width || y >= surface.height {
            return None;
        }
        let offset = (y as usize * surface.width as usize + x as usize) * 4;
        let p = &self.framebuffer[offset..offset + 4];
        Some([p[0], p[1], p[2], p[3]])
    }

    fn require_surface(&self) -> Result<HeadlessSurface, VideoError> {
        self.surface.ok_or_else(|| {
            ResourceError::SurfaceUnavailable("software context is not attached".to_string())
                .into()
        })
    }

    fn bound_mut(&mut self) -> Result<(TextureHandle, &mut SoftTexture), VideoError> {
        let handle = self.bound.ok_or(ResourceError::NoTextureBound)?;
        let texture = self
            .textures
            .get_mut(&handle)
            .ok_or(ResourceError::UnknownTexture(handle.0))?;
        Ok((handle, texture))
    }

    fn rasterize(&mut self, texture: &SoftTexture, quad: &Quad) {
        let Some(surface) = self.surface else {
            return;
        };
        let vp = self.viewport;
        if vp.is_empty() || self.projection.width == 0 || self.projection.height == 0 {
            return;
        }

        let positions = quad
            .vertices
            .map(|[x, y]| [f64::from(x), f64::from(y)]);
        let tex_coords = quad
            .tex_coords
            .map(|[s, t]| [f64::from(s), f64::from(t)]);

        let scale_x = f64::from(self.projection.width) / f64::from(vp.width);
        let scale_y = f64::from(self.projection.height) / f64::from(vp.height);
        let x_end = vp.x.saturating_add(vp.width).min(surface.width);
        let y_end = vp.y.saturating_add(vp.height).min(surface.height);

        for py in vp.y..y_end {
            let ly = (f64::from(py - vp.y) + 0.5) * scale_y;
            for px in vp.x..x_end {
                let lx = (f64::from(px - vp.x) + 0.5) * scale_x;

                let Some([s, t]) = FAN_TRIANGLES.iter().find_map(|&[a, b, c]| {
                    let weights =
                        barycentric([lx, ly], positions[a], positions[b], positions[c])?;
                    Some([
                        weights[0] * tex_coords[a][0]
                            + weights[1] * tex_coords[b][0]
                            + weights[2] * tex_coords[c][0],
                        weights[0] * tex_coords[a][1]
                            + weights[1] * tex_coords[b][1]
                            + weights[2] * tex_coords[c][1],
                    ])
                }) else {
                    continue;
                };

                let texel = texture.sample(s, t);
                let offset = (py as usize * surface.width as usize + px as usize) * 4;
                let dst = &mut self.framebuffer[offset..offset + 4];
                match texture.combine {
                    CombineMode::Replace => dst.copy_from_slice(&texel),
                    CombineMode::Modulate => {
                        for (d, s) in dst.iter_mut().zip(texel) {
                            *d = ((u16::from(*d) * u16::from(s) + 127) / 255) as u8;
                        }
                    }
                }
            }
        }
    }
}

/// Barycentric weights of `p` in triangle (a, b, c), if inside
fn barycentric(p: [f64; 2], a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> Option<[f64; 3]> {
    const EPSILON: f64 = 1e-9;

    let den = (b[1] - c[1]) * (a[0] - c[0]) + (c[0] - b[0]) * (a[1] - c[1]);
    if den.abs() < EPSILON {
        return None;
    }
    let wa = ((b[1] - c[1]) * (p[0] - c[0]) + (c[0] - b[0]) * (p[1] - c[1])) / den;
    let wb = ((c[1] - a[1]) * (p[0] - c[0]) + (a[0] - c[0]) * (p[1] - c[1])) / den;
    let wc = 1.0 - wa - wb;

    if wa >= -EPSILON && wb >= -EPSILON && wc >= -EPSILON {
        Some([wa, wb, wc])
    } else {
        None
    }
}

impl Default for SoftwareContext {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsContext for SoftwareContext {
    type Surface = HeadlessSurface;

    fn attach(&mut self, surface: HeadlessSurface) -> Result<(), VideoError> {
        self.calls.push(Call::Attach(surface.width, surface.height));
        self.surface = Some(surface);
        self.framebuffer = vec![0; surface.width as usize * surface.height as usize * 4];
        self.viewport = Viewport {
            x: 0,
            y: 0,
            width: surface.width,
            height: surface.height,
        };
        Ok(())
    }

    fn resize_surface(&mut self, width: u32, height: u32) -> Result<(), VideoError> {
        self.require_surface()?;
        self.calls.push(Call::ResizeSurface(width, height));
        self.surface = Some(HeadlessSurface::new(width, height));
        self.framebuffer = vec![0; width as usize * height as usize * 4];
        Ok(())
    }

    fn create_texture(&mut self) -> Result<TextureHandle, VideoError> {
        self.require_surface()?;
        if std::mem::take(&mut self.fail_create) {
            return Err(ResourceError::TextureCreation("injected failure".to_string()).into());
        }
        let handle = TextureHandle(self.next_name);
        self.next_name += 1;
        self.textures.insert(handle, SoftTexture::default());
        self.peak_textures = self.peak_textures.max(self.textures.len());
        self.calls.push(Call::CreateTexture(handle));
        Ok(handle)
    }

    fn delete_texture(&mut self, texture: TextureHandle) -> Result<(), VideoError> {
        if std::mem::take(&mut self.fail_delete) {
            return Err(ResourceError::UnknownTexture(texture.0).into());
        }
        if self.textures.remove(&texture).is_none() {
            return Err(ResourceError::UnknownTexture(texture.0).into());
        }
        if self.bound == Some(texture) {
            self.bound = None;
        }
        self.calls.push(Call::DeleteTexture(texture));
        Ok(())
    }

    fn bind_texture(&mut self, texture: TextureHandle) -> Result<(), VideoError> {
        if std::mem::take(&mut self.fail_bind) {
            return Err(ResourceError::UnknownTexture(texture.0).into());
        }
        if !self.textures.contains_key(&texture) {
            return Err(ResourceError::UnknownTexture(texture.0).into());
        }
        self.bound = Some(texture);
        self.calls.push(Call::BindTexture(texture));
        Ok(())
    }

    fn unbind_texture(&mut self) {
        self.bound = None;
        self.calls.push(Call::UnbindTexture);
    }

    fn set_wrap_mode(&mut self, wrap: WrapMode) -> Result<(), VideoError> {
        let (handle, texture) = self.bound_mut()?;
        texture.wrap = wrap;
        self.calls.push(Call::SetWrapMode(handle, wrap));
        Ok(())
    }

    fn set_combine_mode(&mut self, mode: CombineMode) -> Result<(), VideoError> {
        let (handle, texture) = self.bound_mut()?;
        texture.combine = mode;
        self.calls.push(Call::SetCombineMode(handle, mode));
        Ok(())
    }

    fn set_filter(&mut self, filter: FilterMode) -> Result<(), VideoError> {
        let (handle, texture) = self.bound_mut()?;
        texture.filter = filter;
        self.calls.push(Call::SetFilter(handle, filter));
        Ok(())
    }

    fn define_texture(
        &mut self,
        width: u32,
        height: u32,
        format: &FormatDescriptor,
    ) -> Result<(), VideoError> {
        let limit = self.max_texture_size;
        let fail = std::mem::take(&mut self.fail_allocation);
        let (handle, texture) = self.bound_mut()?;

        if width > limit || height > limit {
            return Err(ResourceError::TextureTooLarge {
                width,
                height,
                limit,
            }
            .into());
        }
        if fail {
            return Err(ResourceError::TextureAllocation { width, height }.into());
        }

        texture.width = width;
        texture.height = height;
        texture.format = Some(*format);
        texture.data = vec![0; format.frame_len(width, height)];
        self.calls.push(Call::DefineTexture {
            texture: handle,
            width,
            height,
            format: format.pixel_format,
        });
        Ok(())
    }

    fn upload_texture(
        &mut self,
        width: u32,
        height: u32,
        format: &FormatDescriptor,
        pixels: &[u8],
    ) -> Result<(), VideoError> {
        let (handle, texture) = self.bound_mut()?;

        match &texture.format {
            None => {
                return Err(ResourceError::Upload("texture has no storage".to_string()).into())
            }
            Some(storage) if storage != format => {
                return Err(ResourceError::Upload(format!(
                    "{:?} data does not match {:?} storage",
                    format.pixel_format, storage.pixel_format
                ))
                .into())
            }
            Some(_) => {}
        }
        if width > texture.width || height > texture.height {
            return Err(ResourceError::Upload(format!(
                "{}x{} region exceeds {}x{} storage",
                width, height, texture.width, texture.height
            ))
            .into());
        }
        if pixels.len() < format.frame_len(width, height) {
            return Err(ResourceError::Upload("pixel data too short".to_string()).into());
        }

        let bpp = format.bytes_per_pixel;
        let src_stride = width as usize * bpp;
        let dst_stride = texture.width as usize * bpp;
        if src_stride > 0 {
            for (row, src) in pixels
                .chunks_exact(src_stride)
                .take(height as usize)
                .enumerate()
            {
                let start = row * dst_stride;
                texture.data[start..start + src_stride].copy_from_slice(src);
            }
        }

        self.calls.push(Call::UploadTexture {
            texture: handle,
            width,
            height,
            bytes: pixels.len(),
        });
        Ok(())
    }

    fn clear(&mut self, color: ClearColor) {
        let rgba = color.0.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
        for pixel in self.framebuffer.chunks_exact_mut(4) {
            pixel.copy_from_slice(&rgba);
        }
        self.calls.push(Call::Clear(color));
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.calls.push(Call::SetViewport(viewport));
    }

    fn set_projection(&mut self, projection: Ortho) {
        self.projection = projection;
        self.calls.push(Call::SetProjection(projection));
    }

    fn draw_quad(&mut self, quad: &Quad) -> Result<(), VideoError> {
        let (_, texture) = self.bound_mut()?;
        // Sampling reads the texture while the framebuffer is written
        let texture = texture.clone();
        self.rasterize(&texture, quad);
        self.draws += 1;
        self.calls.push(Call::DrawQuad(*quad));
        Ok(())
    }

    fn supports_clamp_to_edge(&self) -> bool {
        self.clamp_supported
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context_with_texture(
        surface: (u32, u32),
        size: (u32, u32),
        format: PixelFormat,
    ) -> (SoftwareContext, TextureHandle) {
        let mut ctx = SoftwareContext::new();
        ctx.attach(HeadlessSurface::new(surface.0, surface.1))
            .expect("attach");
        let tex = ctx.create_texture().expect("create");
        ctx.bind_texture(tex).expect("bind");
        ctx.define_texture(size.0, size.1, &format.descriptor())
            .expect("define");
        (ctx, tex)
    }

    #[test]
    fn test_requires_attach() {
        let mut ctx = SoftwareContext::new();
        let err = ctx.create_texture().expect_err("not attached");
        assert!(matches!(
            err,
            VideoError::Resource(ResourceError::SurfaceUnavailable(_))
        ));
    }

    #[test]
    fn test_texture_counts() {
        let mut ctx = SoftwareContext::new();
        ctx.attach(HeadlessSurface::new(8, 8)).expect("attach");
        let a = ctx.create_texture().expect("create");
        let b = ctx.create_texture().expect("create");
        assert_ne!(a, b);
        assert_eq!(ctx.live_textures(), 2);
        ctx.delete_texture(a).expect("delete");
        assert_eq!(ctx.live_textures(), 1);
        assert_eq!(ctx.peak_textures(), 2);
        assert!(ctx.delete_texture(a).is_err(), "double delete is rejected");
    }

    #[test]
    fn test_state_calls_need_binding() {
        let mut ctx = SoftwareContext::new();
        ctx.attach(HeadlessSurface::new(8, 8)).expect("attach");
        let err = ctx.set_filter(FilterMode::Linear).expect_err("nothing bound");
        assert_eq!(err, VideoError::Resource(ResourceError::NoTextureBound));
    }

    #[test]
    fn test_define_respects_limit() {
        let mut ctx = SoftwareContext::new().with_max_texture_size(512);
        ctx.attach(HeadlessSurface::new(8, 8)).expect("attach");
        let tex = ctx.create_texture().expect("create");
        ctx.bind_texture(tex).expect("bind");
        let err = ctx
            .define_texture(1024, 256, &PixelFormat::Rgba8888.descriptor())
            .expect_err("too large");
        assert!(matches!(
            err,
            VideoError::Resource(ResourceError::TextureTooLarge { limit: 512, .. })
        ));
    }

    #[test]
    fn test_define_starts_blank() {
        let (ctx, tex) = context_with_texture((8, 8), (4, 4), PixelFormat::Rgba8888);
        assert_eq!(ctx.texture_size(tex), Some((4, 4)));
        assert_eq!(ctx.texel(tex, 3, 3), Some([0, 0, 0, 0]));
        assert_eq!(ctx.texel(tex, 4, 0), None);
    }

    #[test]
    fn test_upload_writes_top_left_rows() {
        let (mut ctx, tex) = context_with_texture((8, 8), (4, 4), PixelFormat::Rgba8888);
        let format = PixelFormat::Rgba8888.descriptor();
        let pixels: Vec<u8> = (0..2 * 2)
            .flat_map(|i| [i as u8 * 10, 0, 0, 0xFF])
            .collect();
        ctx.upload_texture(2, 2, &format, &pixels).expect("upload");

        assert_eq!(ctx.texel(tex, 0, 0), Some([0, 0, 0, 0xFF]));
        assert_eq!(ctx.texel(tex, 1, 0), Some([10, 0, 0, 0xFF]));
        assert_eq!(ctx.texel(tex, 0, 1), Some([20, 0, 0, 0xFF]));
        assert_eq!(ctx.texel(tex, 1, 1), Some([30, 0, 0, 0xFF]));
        assert_eq!(ctx.texel(tex, 2, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_upload_format_mismatch() {
        let (mut ctx, _) = context_with_texture((8, 8), (4, 4), PixelFormat::Rgb565);
        let err = ctx
            .upload_texture(4, 4, &PixelFormat::Rgba8888.descriptor(), &[0; 64])
            .expect_err("mismatch");
        assert!(matches!(err, VideoError::Resource(ResourceError::Upload(_))));
    }

    #[test]
    fn test_clear_fills_framebuffer() {
        let mut ctx = SoftwareContext::new();
        ctx.attach(HeadlessSurface::new(4, 4)).expect("attach");
        ctx.clear(ClearColor([1.0, 0.0, 0.0, 1.0]));
        assert_eq!(ctx.pixel(3, 3), Some([0xFF, 0, 0, 0xFF]));
        ctx.clear(ClearColor::TRANSPARENT);
        assert!(ctx.framebuffer().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_rasterize_one_to_one() {
        let (mut ctx, _) = context_with_texture((4, 4), (4, 4), PixelFormat::Rgba8888);
        let format = PixelFormat::Rgba8888.descriptor();
        let pixels: Vec<u8> = (0..16).flat_map(|i| [i as u8, 0, 0, 0xFF]).collect();
        ctx.upload_texture(4, 4, &format, &pixels).expect("upload");
        ctx.set_projection(Ortho::new(4, 4));
        ctx.draw_quad(&Quad::covering(4, 4)).expect("draw");

        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(ctx.pixel(x, y), Some([(y * 4 + x) as u8, 0, 0, 0xFF]));
            }
        }
        assert_eq!(ctx.draw_count(), 1);
    }

    #[test]
    fn test_rasterize_padded_quad_samples_logical_region() {
        // 3x2 logical frame in a 4x2 texture, shown in a 6x4 viewport
        let (mut ctx, _) = context_with_texture((6, 4), (4, 2), PixelFormat::Rgba8888);
        let format = PixelFormat::Rgba8888.descriptor();
        ctx.upload_texture(3, 2, &format, &[0xFF; 3 * 2 * 4])
            .expect("upload");
        ctx.set_projection(Ortho::new(3, 2));
        ctx.draw_quad(&Quad::covering(4, 2)).expect("draw");

        for y in 0..4 {
            for x in 0..6 {
                assert_eq!(ctx.pixel(x, y), Some([0xFF; 4]), "pixel {},{}", x, y);
            }
        }
    }

    #[test]
    fn test_rasterize_clips_to_viewport() {
        let (mut ctx, _) = context_with_texture((8, 8), (2, 2), PixelFormat::Rgba8888);
        let format = PixelFormat::Rgba8888.descriptor();
        ctx.upload_texture(2, 2, &format, &[0xFF; 16]).expect("upload");
        ctx.clear(ClearColor::TRANSPARENT);
        ctx.set_viewport(Viewport {
            x: 2,
            y: 2,
            width: 4,
            height: 4,
        });
        ctx.set_projection(Ortho::new(2, 2));
        ctx.draw_quad(&Quad::covering(2, 2)).expect("draw");

        assert_eq!(ctx.pixel(1, 1), Some([0; 4]));
        assert_eq!(ctx.pixel(2, 2), Some([0xFF; 4]));
        assert_eq!(ctx.pixel(5, 5), Some([0xFF; 4]));
        assert_eq!(ctx.pixel(6, 6), Some([0; 4]));
    }

    #[test]
    fn test_linear_filter_blends_neighbours() {
        let (mut ctx, _) = context_with_texture((2, 1), (2, 1), PixelFormat::Rgba8888);
        let format = PixelFormat::Rgba8888.descriptor();
        ctx.upload_texture(2, 1, &format, &[0, 0, 0, 0xFF, 200, 0, 0, 0xFF])
            .expect("upload");
        ctx.set_wrap_mode(WrapMode::ClampToEdge).expect("wrap");
        ctx.set_filter(FilterMode::Linear).expect("filter");
        ctx.set_viewport(Viewport {
            x: 0,
            y: 0,
            width: 2,
            height: 1,
        });
        ctx.set_projection(Ortho::new(2, 1));
        ctx.draw_quad(&Quad::covering(2, 1)).expect("draw");

        // Pixel centers hit texel centers exactly, so no blending occurs
        assert_eq!(ctx.pixel(0, 0), Some([0, 0, 0, 0xFF]));
        assert_eq!(ctx.pixel(1, 0), Some([200, 0, 0, 0xFF]));

        // Doubling the viewport puts samples between texels
        ctx.resize_surface(4, 1).expect("resize");
        ctx.set_viewport(Viewport {
            x: 0,
            y: 0,
            width: 4,
            height: 1,
        });
        ctx.draw_quad(&Quad::covering(2, 1)).expect("draw");
        assert_eq!(ctx.pixel(0, 0), Some([0, 0, 0, 0xFF]));
        assert_eq!(ctx.pixel(1, 0), Some([50, 0, 0, 0xFF]));
        assert_eq!(ctx.pixel(2, 0), Some([150, 0, 0, 0xFF]));
        assert_eq!(ctx.pixel(3, 0), Some([200, 0, 0, 0xFF]));
    }

    #[test]
    fn test_modulate_multiplies_destination() {
        let (mut ctx, _) = context_with_texture((1, 1), (1, 1), PixelFormat::Rgba8888);
        let format = PixelFormat::Rgba8888.descriptor();
        ctx.upload_texture(1, 1, &format, &[0xFF, 0x80, 0x00, 0xFF])
            .expect("upload");
        ctx.set_combine_mode(CombineMode::Modulate).expect("combine");
        ctx.clear(ClearColor([1.0, 1.0, 1.0, 1.0]));
        ctx.set_projection(Ortho::new(1, 1));
        ctx.draw_quad(&Quad::covering(1, 1)).expect("draw");
        assert_eq!(ctx.pixel(0, 0), Some([0xFF, 0x80, 0x00, 0xFF]));
    }

    #[test]
    fn test_barycentric() {
        let a = [0.0, 0.0];
        let b = [4.0, 0.0];
        let c = [4.0, 4.0];
        let w = barycentric([3.0, 1.0], a, b, c).expect("inside");
        assert!((w.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!(barycentric([1.0, 3.0], a, b, c).is_none());
        assert!(barycentric([1.0, 1.0], a, a, a).is_none());
    }
}
