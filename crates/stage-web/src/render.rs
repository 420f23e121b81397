mod helpers;

use crate::constants::{CLEAR_RGBA, CONTENT_TINT, PENDING_TINT, PLACEHOLDER_RGBA8};
use crate::images::SharedTextures;
use fnv::FnvHashMap;
use glam::{Mat4, Vec2, Vec3};
use helpers::{create_depth_view, create_texture, make_panel_pipeline};
use stage_core::{Camera, ContentHandle, ObjectId, Renderer, Transform, Viewport};
use web_sys as web;
use wgpu::util::DeviceExt;

static PANEL_WGSL: &str = include_str!("../shaders/panel.wgsl");

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct QuadVertex {
    pos: [f32; 3],
    uv: [f32; 2],
}

// Unit quad centred on the origin, uv (0,0) top-left.
const QUAD: [QuadVertex; 6] = [
    QuadVertex { pos: [-0.5, -0.5, 0.0], uv: [0.0, 1.0] },
    QuadVertex { pos: [0.5, -0.5, 0.0], uv: [1.0, 1.0] },
    QuadVertex { pos: [0.5, 0.5, 0.0], uv: [1.0, 0.0] },
    QuadVertex { pos: [-0.5, -0.5, 0.0], uv: [0.0, 1.0] },
    QuadVertex { pos: [0.5, 0.5, 0.0], uv: [1.0, 0.0] },
    QuadVertex { pos: [-0.5, 0.5, 0.0], uv: [0.0, 0.0] },
];

const QUAD_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct PanelUniforms {
    mvp: [[f32; 4]; 4],
    tint: [f32; 4],
}

struct PanelTexture {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

struct GpuPanel {
    native_size: Vec2,
    content: Option<ContentHandle>,
    model: Mat4,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
}

/// Device objects. Dropped as a whole on `release`.
struct GpuContext {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    quad_buffer: wgpu::Buffer,
    uniform_bgl: wgpu::BindGroupLayout,
    texture_bgl: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    depth_view: wgpu::TextureView,
    placeholder: PanelTexture,
    textures: FnvHashMap<ContentHandle, PanelTexture>,
    panels: Vec<GpuPanel>,
    clear_color: wgpu::Color,
}

/// WebGPU implementation of the stage's `Renderer` seam.
pub struct GpuRenderer {
    gpu: Option<GpuContext>,
    canvas: web::HtmlCanvasElement,
    store: SharedTextures,
}

impl GpuRenderer {
    pub async fn new(canvas: web::HtmlCanvasElement, store: SharedTextures) -> anyhow::Result<Self> {
        let gpu = GpuContext::new(&canvas).await?;
        log::info!(
            "[gpu] ready: {}x{} format={:?}",
            gpu.config.width,
            gpu.config.height,
            gpu.config.format
        );
        Ok(Self {
            gpu: Some(gpu),
            canvas,
            store,
        })
    }
}

impl Renderer for GpuRenderer {
    fn spawn_panel(&mut self, index: usize, native_size: Vec2) -> ObjectId {
        if let Some(gpu) = self.gpu.as_mut() {
            gpu.spawn_panel(native_size);
        }
        ObjectId(index as u64)
    }

    fn set_content(&mut self, object: ObjectId, content: Option<ContentHandle>) {
        if let Some(panel) = self.gpu.as_mut().and_then(|g| g.panels.get_mut(object.0 as usize)) {
            panel.content = content;
        }
    }

    fn set_transform(&mut self, object: ObjectId, transform: &Transform) {
        if let Some(panel) = self.gpu.as_mut().and_then(|g| g.panels.get_mut(object.0 as usize)) {
            let size = Vec3::new(panel.native_size.x, panel.native_size.y, 1.0);
            panel.model = transform.matrix() * Mat4::from_scale(size);
        }
    }

    fn resize(&mut self, _viewport: &Viewport) {
        let (w, h) = (self.canvas.width(), self.canvas.height());
        if let Some(gpu) = self.gpu.as_mut() {
            gpu.resize_if_needed(w, h);
        }
    }

    fn render(&mut self, camera: &Camera) {
        let (w, h) = (self.canvas.width(), self.canvas.height());
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };
        gpu.resize_if_needed(w, h);
        gpu.sync_textures(&self.store);
        match gpu.draw(camera) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("[gpu] out of memory; dropping renderer");
                self.gpu = None;
            }
            Err(e) => log::warn!("[gpu] frame skipped: {:?}", e),
        }
    }

    fn release(&mut self) {
        if let Some(gpu) = self.gpu.take() {
            for tex in gpu.textures.values() {
                tex.texture.destroy();
            }
            log::info!("[gpu] released {} panels", gpu.panels.len());
        }
        self.store.borrow_mut().clear();
    }
}

impl GpuContext {
    async fn new(canvas: &web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("panel_shader"),
            source: wgpu::ShaderSource::Wgsl(PANEL_WGSL.into()),
        });
        let uniform_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("panel_uniform_bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let texture_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("panel_texture_bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("panel_pl"),
            bind_group_layouts: &[&uniform_bgl, &texture_bgl],
            push_constant_ranges: &[],
        });
        let pipeline = make_panel_pipeline(
            &device,
            &layout,
            &shader,
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<QuadVertex>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &QUAD_ATTRIBUTES,
            },
            format,
        );
        let quad_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("panel_quad"),
            contents: bytemuck::cast_slice(&QUAD),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("panel_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let depth_view = create_depth_view(&device, width, height);

        let (placeholder_tex, placeholder_view) = create_texture(
            &device,
            "placeholder",
            1,
            1,
            wgpu::TextureFormat::Rgba8UnormSrgb,
            wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        );
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &placeholder_tex,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &PLACEHOLDER_RGBA8,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4),
                rows_per_image: Some(1),
            },
            wgpu::Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
        );
        let placeholder_bg =
            texture_bind_group(&device, &texture_bgl, &placeholder_view, &sampler, "placeholder_bg");

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            quad_buffer,
            uniform_bgl,
            texture_bgl,
            sampler,
            depth_view,
            placeholder: PanelTexture {
                texture: placeholder_tex,
                bind_group: placeholder_bg,
            },
            textures: FnvHashMap::default(),
            panels: Vec::new(),
            clear_color: wgpu::Color {
                r: CLEAR_RGBA[0],
                g: CLEAR_RGBA[1],
                b: CLEAR_RGBA[2],
                a: CLEAR_RGBA[3],
            },
        })
    }

    fn spawn_panel(&mut self, native_size: Vec2) {
        let uniform_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("panel_uniforms"),
            size: std::mem::size_of::<PanelUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniform_bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("panel_uniform_bg"),
            layout: &self.uniform_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        self.panels.push(GpuPanel {
            native_size,
            content: None,
            model: Mat4::from_scale(Vec3::new(native_size.x, native_size.y, 1.0)),
            uniform_buffer,
            uniform_bind_group,
        });
    }

    fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width == self.config.width && height == self.config.height {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_view = create_depth_view(&self.device, width, height);
        log::debug!("[gpu] surface {}x{}", width, height);
    }

    /// Uploads decoded images and frees textures whose content was replaced.
    fn sync_textures(&mut self, store: &SharedTextures) {
        let (ready, released) = {
            let mut store = store.borrow_mut();
            (store.take_ready(), store.take_released())
        };
        for handle in released {
            if let Some(tex) = self.textures.remove(&handle) {
                tex.texture.destroy();
            }
        }
        for img in ready {
            let size = wgpu::Extent3d {
                width: img.element.natural_width(),
                height: img.element.natural_height(),
                depth_or_array_layers: 1,
            };
            let (texture, view) = create_texture(
                &self.device,
                "panel_content",
                size.width,
                size.height,
                wgpu::TextureFormat::Rgba8UnormSrgb,
                wgpu::TextureUsages::TEXTURE_BINDING
                    | wgpu::TextureUsages::COPY_DST
                    | wgpu::TextureUsages::RENDER_ATTACHMENT,
            );
            self.queue.copy_external_image_to_texture(
                &wgpu::CopyExternalImageSourceInfo {
                    source: wgpu::ExternalImageSource::HTMLImageElement(img.element.clone()),
                    origin: wgpu::Origin2d::ZERO,
                    flip_y: false,
                },
                wgpu::CopyExternalImageDestInfo {
                    texture: &texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                    color_space: wgpu::PredefinedColorSpace::Srgb,
                    premultiplied_alpha: false,
                },
                size,
            );
            let bind_group =
                texture_bind_group(&self.device, &self.texture_bgl, &view, &self.sampler, "panel_content_bg");
            log::debug!(
                "[content] uploaded {} ({}x{})",
                img.element.src(),
                size.width,
                size.height
            );
            self.textures.insert(img.handle, PanelTexture { texture, bind_group });
        }
    }

    fn draw(&mut self, camera: &Camera) -> Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let view_proj = camera.view_projection();
        for panel in &self.panels {
            let loaded = panel
                .content
                .is_some_and(|h| self.textures.contains_key(&h));
            let uniforms = PanelUniforms {
                mvp: (view_proj * panel.model).to_cols_array_2d(),
                tint: if loaded || panel.content.is_none() {
                    CONTENT_TINT
                } else {
                    PENDING_TINT
                },
            };
            self.queue
                .write_buffer(&panel.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("panel_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_pipeline(&self.pipeline);
            rpass.set_vertex_buffer(0, self.quad_buffer.slice(..));
            for panel in &self.panels {
                let texture = panel
                    .content
                    .and_then(|h| self.textures.get(&h))
                    .unwrap_or(&self.placeholder);
                rpass.set_bind_group(0, &panel.uniform_bind_group, &[]);
                rpass.set_bind_group(1, &texture.bind_group, &[]);
                rpass.draw(0..QUAD.len() as u32, 0..1);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

fn texture_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    view: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
    label: &str,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}
