// wgpu context - GraphicsContext on top of wgpu and a winit window
//
// Immediate-mode calls are mapped onto wgpu as follows:
// - the surface frame is acquired lazily by the first clear or draw
// - clear and draw each record and submit their own render pass
// - swap presents the acquired frame
// - 16-bit encodings are expanded to RGBA8 on upload, every texture is
//   stored as Rgba8Unorm
// - one sampler per (wrap, filter) pair, chosen at draw time

use super::backend::Swap;
use super::context::{
    ClearColor, CombineMode, FilterMode, GraphicsContext, TextureHandle, WrapMode,
};
use super::error::{ResourceError, VideoError};
use super::format::{decode_into, FormatDescriptor, PixelFormat};
use super::geometry::{Ortho, Quad, FAN_TRIANGLES};
use super::viewport::Viewport;
use bytemuck::{Pod, Zeroable};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};
use wgpu::util::DeviceExt;
use winit::window::Window;

const SHADER: &str = include_str!("quad.wgsl");

/// Quad vertex as seen by the shader
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct Vertex {
    position: [f32; 2],
    tex_coord: [f32; 2],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }

    fn from_quad(quad: &Quad) -> [Vertex; 4] {
        std::array::from_fn(|i| Vertex {
            position: quad.vertices[i].map(|v| v as f32),
            tex_coord: quad.tex_coords[i].map(|v| v as f32),
        })
    }
}

/// Fan triangles flattened into an index list
const INDICES: [u16; 6] = [
    FAN_TRIANGLES[0][0] as u16,
    FAN_TRIANGLES[0][1] as u16,
    FAN_TRIANGLES[0][2] as u16,
    FAN_TRIANGLES[1][0] as u16,
    FAN_TRIANGLES[1][1] as u16,
    FAN_TRIANGLES[1][2] as u16,
];

#[derive(Default)]
struct GpuTexture {
    storage: Option<Storage>,
    wrap: WrapMode,
    filter: FilterMode,
}

struct Storage {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    width: u32,
    height: u32,
    format: FormatDescriptor,
}

struct Frame {
    surface_texture: wgpu::SurfaceTexture,
    view: wgpu::TextureView,
}

/// Device state created by `attach`
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    bind_group_layout: wgpu::BindGroupLayout,
    pipeline: wgpu::RenderPipeline,
    samplers: [wgpu::Sampler; 4],
    projection_buffer: wgpu::Buffer,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    frame: Option<Frame>,
}

impl Gpu {
    fn new(window: Arc<Window>, vsync: bool) -> Result<Self, VideoError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance
            .create_surface(window.clone())
            .map_err(|e| ResourceError::SurfaceUnavailable(e.to_string()))?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .map_err(|e| ResourceError::AdapterUnavailable(e.to_string()))?;
        let adapter_info = adapter.get_info();
        info!(
            adapter = %adapter_info.name,
            backend = ?adapter_info.backend,
            "graphics adapter selected"
        );

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("fb-present device"),
            ..Default::default()
        }))
        .map_err(|e| ResourceError::DeviceRequest(e.to_string()))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| {
                ResourceError::SurfaceUnavailable("surface reports no formats".to_string())
            })?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let size = window.inner_size();
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: if vsync {
                wgpu::PresentMode::AutoVsync
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            desired_maximum_frame_latency: 2,
            alpha_mode,
            view_formats: vec![],
        };
        if size.width > 0 && size.height > 0 {
            surface.configure(&device, &config);
        }

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("quad bind group layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("quad shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER.into()),
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("quad pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = create_pipeline(&device, &pipeline_layout, &shader, format);

        let samplers = [
            (WrapMode::Repeat, FilterMode::Nearest),
            (WrapMode::Repeat, FilterMode::Linear),
            (WrapMode::ClampToEdge, FilterMode::Nearest),
            (WrapMode::ClampToEdge, FilterMode::Linear),
        ]
        .map(|(wrap, filter)| create_sampler(&device, wrap, filter));

        let projection_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("projection uniform"),
            contents: bytemuck::cast_slice(&Ortho::new(1, 1).to_matrix()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad vertices"),
            contents: bytemuck::cast_slice(&Vertex::from_quad(&Quad::default())),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad indices"),
            contents: bytemuck::cast_slice(&INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            bind_group_layout,
            pipeline,
            samplers,
            projection_buffer,
            vertex_buffer,
            index_buffer,
            frame: None,
        })
    }

    fn sampler(&self, wrap: WrapMode, filter: FilterMode) -> &wgpu::Sampler {
        let index = match (wrap, filter) {
            (WrapMode::Repeat, FilterMode::Nearest) => 0,
            (WrapMode::Repeat, FilterMode::Linear) => 1,
            (WrapMode::ClampToEdge, FilterMode::Nearest) => 2,
            (WrapMode::ClampToEdge, FilterMode::Linear) => 3,
        };
        &self.samplers[index]
    }

    /// Acquire the surface frame if not already held
    ///
    /// Returns false when there is nothing to draw into this time.
    fn acquire(&mut self) -> Result<bool, VideoError> {
        if self.frame.is_some() {
            return Ok(true);
        }
        if self.config.width == 0 || self.config.height == 0 {
            return Ok(false);
        }

        match self.surface.get_current_texture() {
            Ok(surface_texture) => {
                let view = surface_texture
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());
                self.frame = Some(Frame {
                    surface_texture,
                    view,
                });
                Ok(true)
            }
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("surface lost, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                Ok(false)
            }
            Err(wgpu::SurfaceError::Timeout) => Ok(false),
            Err(err) => Err(ResourceError::Present(err.to_string()).into()),
        }
    }

    /// Run `work` inside out-of-memory and validation error scopes
    fn check_scope<F>(&self, work: F) -> Result<(), wgpu::Error>
    where
        F: FnOnce(&Self),
    {
        self.device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        work(self);
        let validation = pollster::block_on(self.device.pop_error_scope());
        let oom = pollster::block_on(self.device.pop_error_scope());
        match oom.or(validation) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// A new session on the window already attached keeps the existing device
fn keeps_device<T>(attached: Option<&Arc<T>>, next: &Arc<T>) -> bool {
    attached.is_some_and(|current| Arc::ptr_eq(current, next))
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("quad pipeline"),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            buffers: &[Vertex::layout()],
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                // Replace: no blending with the target
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

fn create_sampler(device: &wgpu::Device, wrap: WrapMode, filter: FilterMode) -> wgpu::Sampler {
    let address_mode = match wrap {
        WrapMode::Repeat => wgpu::AddressMode::Repeat,
        WrapMode::ClampToEdge => wgpu::AddressMode::ClampToEdge,
    };
    let filter_mode = match filter {
        FilterMode::Nearest => wgpu::FilterMode::Nearest,
        FilterMode::Linear => wgpu::FilterMode::Linear,
    };
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("quad sampler"),
        address_mode_u: address_mode,
        address_mode_v: address_mode,
        address_mode_w: address_mode,
        mag_filter: filter_mode,
        min_filter: filter_mode,
        ..Default::default()
    })
}

/// GraphicsContext backed by wgpu, presenting into a winit window
pub struct WgpuContext {
    vsync: bool,
    gpu: Option<Gpu>,
    textures: BTreeMap<TextureHandle, GpuTexture>,
    next_name: u32,
    bound: Option<TextureHandle>,
    viewport: Viewport,
    scratch: Vec<u8>,
}

impl WgpuContext {
    /// Create an unattached context
    pub fn new() -> Self {
        Self {
            vsync: true,
            gpu: None,
            textures: BTreeMap::new(),
            next_name: 1,
            bound: None,
            viewport: Viewport::default(),
            scratch: Vec::new(),
        }
    }

    /// Set whether presentation waits for vertical blank
    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    /// Attached window, if any
    pub fn window(&self) -> Option<&Arc<Window>> {
        self.gpu.as_ref().map(|gpu| &gpu.window)
    }

    fn gpu(&self) -> Result<&Gpu, VideoError> {
        self.gpu.as_ref().ok_or_else(|| {
            ResourceError::SurfaceUnavailable("wgpu context is not attached".to_string()).into()
        })
    }

    fn gpu_mut(&mut self) -> Result<&mut Gpu, VideoError> {
        self.gpu.as_mut().ok_or_else(|| {
            ResourceError::SurfaceUnavailable("wgpu context is not attached".to_string()).into()
        })
    }

    fn bound_handle(&self) -> Result<TextureHandle, VideoError> {
        let handle = self.bound.ok_or(ResourceError::NoTextureBound)?;
        if self.textures.contains_key(&handle) {
            Ok(handle)
        } else {
            Err(ResourceError::UnknownTexture(handle.id()).into())
        }
    }

    fn bound_mut(&mut self) -> Result<&mut GpuTexture, VideoError> {
        let handle = self.bound_handle()?;
        self.textures
            .get_mut(&handle)
            .ok_or_else(|| ResourceError::UnknownTexture(handle.id()).into())
    }

    /// Viewport clipped to the configured surface
    fn surface_viewport(&self, gpu: &Gpu) -> Option<Viewport> {
        let x = self.viewport.x.min(gpu.config.width);
        let y = self.viewport.y.min(gpu.config.height);
        let width = self.viewport.width.min(gpu.config.width - x);
        let height = self.viewport.height.min(gpu.config.height - y);
        let clipped = Viewport {
            x,
            y,
            width,
            height,
        };
        (!clipped.is_empty()).then_some(clipped)
    }
}

impl Default for WgpuContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for WgpuContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WgpuContext")
            .field("vsync", &self.vsync)
            .field("attached", &self.gpu.is_some())
            .field("textures", &self.textures.len())
            .field("bound", &self.bound)
            .field("viewport", &self.viewport)
            .finish_non_exhaustive()
    }
}

impl GraphicsContext for WgpuContext {
    type Surface = Arc<Window>;

    fn attach(&mut self, window: Arc<Window>) -> Result<(), VideoError> {
        if keeps_device(self.window(), &window) {
            return Ok(());
        }
        if self.gpu.take().is_some() {
            debug!("surface window changed, rebuilding device");
            // Storage belonged to the old device
            for texture in self.textures.values_mut() {
                texture.storage = None;
            }
        }
        let gpu = Gpu::new(window, self.vsync)?;
        self.viewport = Viewport {
            x: 0,
            y: 0,
            width: gpu.config.width,
            height: gpu.config.height,
        };
        self.gpu = Some(gpu);
        Ok(())
    }

    fn resize_surface(&mut self, width: u32, height: u32) -> Result<(), VideoError> {
        let gpu = self.gpu_mut()?;
        // The held frame belongs to the old configuration
        gpu.frame = None;
        gpu.config.width = width;
        gpu.config.height = height;
        if width > 0 && height > 0 {
            gpu.surface.configure(&gpu.device, &gpu.config);
        }
        Ok(())
    }

    fn create_texture(&mut self) -> Result<TextureHandle, VideoError> {
        self.gpu()?;
        let handle = TextureHandle(self.next_name);
        self.next_name += 1;
        self.textures.insert(handle, GpuTexture::default());
        Ok(handle)
    }

    fn delete_texture(&mut self, texture: TextureHandle) -> Result<(), VideoError> {
        let removed = self
            .textures
            .remove(&texture)
            .ok_or(ResourceError::UnknownTexture(texture.id()))?;
        if let Some(storage) = removed.storage {
            storage.texture.destroy();
        }
        if self.bound == Some(texture) {
            self.bound = None;
        }
        Ok(())
    }

    fn bind_texture(&mut self, texture: TextureHandle) -> Result<(), VideoError> {
        if !self.textures.contains_key(&texture) {
            return Err(ResourceError::UnknownTexture(texture.id()).into());
        }
        self.bound = Some(texture);
        Ok(())
    }

    fn unbind_texture(&mut self) {
        self.bound = None;
    }

    fn set_wrap_mode(&mut self, wrap: WrapMode) -> Result<(), VideoError> {
        self.bound_mut()?.wrap = wrap;
        Ok(())
    }

    fn set_combine_mode(&mut self, mode: CombineMode) -> Result<(), VideoError> {
        match mode {
            CombineMode::Replace => self.bound_mut().map(|_| ()),
            CombineMode::Modulate => {
                Err(ResourceError::Unsupported("modulate combine mode").into())
            }
        }
    }

    fn set_filter(&mut self, filter: FilterMode) -> Result<(), VideoError> {
        self.bound_mut()?.filter = filter;
        Ok(())
    }

    fn define_texture(
        &mut self,
        width: u32,
        height: u32,
        format: &FormatDescriptor,
    ) -> Result<(), VideoError> {
        let handle = self.bound_handle()?;
        let gpu = self.gpu()?;

        let limit = gpu.device.limits().max_texture_dimension_2d;
        if width > limit || height > limit {
            return Err(ResourceError::TextureTooLarge {
                width,
                height,
                limit,
            }
            .into());
        }

        let mut created = None;
        gpu.check_scope(|gpu| {
            created = Some(gpu.device.create_texture(&wgpu::TextureDescriptor {
                label: Some("frame texture"),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8Unorm,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            }));
        })
        .map_err(|err| {
            warn!(width, height, error = %err, "texture allocation failed");
            ResourceError::TextureAllocation { width, height }
        })?;
        let texture = created.ok_or(ResourceError::TextureAllocation { width, height })?;
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let entry = self
            .textures
            .get_mut(&handle)
            .ok_or(ResourceError::UnknownTexture(handle.id()))?;
        if let Some(old) = entry.storage.take() {
            old.texture.destroy();
        }
        entry.storage = Some(Storage {
            texture,
            view,
            width,
            height,
            format: *format,
        });
        debug!(texture = %handle, width, height, "wgpu texture storage defined");
        Ok(())
    }

    fn upload_texture(
        &mut self,
        width: u32,
        height: u32,
        format: &FormatDescriptor,
        pixels: &[u8],
    ) -> Result<(), VideoError> {
        let handle = self.bound_handle()?;
        let gpu = self.gpu.as_ref().ok_or_else(|| {
            ResourceError::SurfaceUnavailable("wgpu context is not attached".to_string())
        })?;
        let storage = self
            .textures
            .get(&handle)
            .and_then(|t| t.storage.as_ref())
            .ok_or_else(|| ResourceError::Upload("texture has no storage".to_string()))?;

        if storage.format != *format {
            return Err(ResourceError::Upload(format!(
                "{:?} data does not match {:?} storage",
                format.pixel_format, storage.format.pixel_format
            ))
            .into());
        }
        if width > storage.width || height > storage.height {
            return Err(ResourceError::Upload(format!(
                "{}x{} region exceeds {}x{} storage",
                width, height, storage.width, storage.height
            ))
            .into());
        }
        let len = format.frame_len(width, height);
        if pixels.len() < len {
            return Err(ResourceError::Upload("pixel data too short".to_string()).into());
        }

        let rgba: &[u8] = match format.pixel_format {
            PixelFormat::Rgba8888 => &pixels[..len],
            other => {
                decode_into(other, &pixels[..len], &mut self.scratch);
                &self.scratch
            }
        };

        gpu.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &storage.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        Ok(())
    }

    fn clear(&mut self, color: ClearColor) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };
        match gpu.acquire() {
            Ok(true) => {}
            Ok(false) => return,
            Err(err) => {
                warn!(error = %err, "clear skipped");
                return;
            }
        }
        let Some(frame) = gpu.frame.as_ref() else {
            return;
        };

        let [r, g, b, a] = color.0.map(f64::from);
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("clear encoder"),
            });
        {
            let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("clear pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
        }
        gpu.queue.submit(Some(encoder.finish()));
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn set_projection(&mut self, projection: Ortho) {
        if let Some(gpu) = self.gpu.as_ref() {
            gpu.queue.write_buffer(
                &gpu.projection_buffer,
                0,
                bytemuck::cast_slice(&projection.to_matrix()),
            );
        }
    }

    fn draw_quad(&mut self, quad: &Quad) -> Result<(), VideoError> {
        let handle = self.bound_handle()?;
        let gpu = self.gpu_mut()?;
        if !gpu.acquire()? {
            return Ok(());
        }

        let gpu = self.gpu()?;
        let Some(viewport) = self.surface_viewport(gpu) else {
            return Ok(());
        };
        let Some(texture) = self.textures.get(&handle) else {
            return Err(ResourceError::UnknownTexture(handle.id()).into());
        };
        let (Some(storage), Some(frame)) = (texture.storage.as_ref(), gpu.frame.as_ref()) else {
            return Ok(());
        };

        gpu.queue.write_buffer(
            &gpu.vertex_buffer,
            0,
            bytemuck::cast_slice(&Vertex::from_quad(quad)),
        );
        let bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("quad bind group"),
            layout: &gpu.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&storage.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(
                        gpu.sampler(texture.wrap, texture.filter),
                    ),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: gpu.projection_buffer.as_entire_binding(),
                },
            ],
        });

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("quad encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("quad pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_viewport(
                viewport.x as f32,
                viewport.y as f32,
                viewport.width as f32,
                viewport.height as f32,
                0.0,
                1.0,
            );
            pass.set_scissor_rect(viewport.x, viewport.y, viewport.width, viewport.height);
            pass.set_pipeline(&gpu.pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
            pass.set_index_buffer(gpu.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
            pass.draw_indexed(0..INDICES.len() as u32, 0, 0..1);
        }
        gpu.queue.submit(Some(encoder.finish()));
        Ok(())
    }

    fn swapper(&mut self) -> Option<&mut dyn Swap> {
        Some(self)
    }
}

impl Swap for WgpuContext {
    fn swap(&mut self) -> Result<(), VideoError> {
        let gpu = self.gpu_mut()?;
        if let Some(frame) = gpu.frame.take() {
            gpu.window.pre_present_notify();
            frame.surface_texture.present();
        }
        Ok(())
    }
}
