//! GPU State management - WebGPU device, queue, surface initialization

use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use super::shapes::Vertex;
use crate::physics::CanvasSize;

/// Vertex buffer capacity. A full particle pool plus a busy paint canvas
/// stays well under this.
pub const MAX_VERTICES: usize = 1 << 17;

/// Errors that can occur during GPU initialization
#[derive(Debug, thiserror::Error)]
pub enum GpuStateError {
    #[error("No window found")]
    NoWindow,
    #[error("No document found")]
    NoDocument,
    #[error("No canvas with id '{0}' found")]
    NoCanvas(String),
    #[error("Surface creation failed: {0}")]
    SurfaceCreationFailed(String),
    #[error("Failed to find a suitable GPU adapter")]
    NoAdapter,
    #[error("Device creation failed: {0}")]
    DeviceCreationFailed(String),
}

impl From<GpuStateError> for JsValue {
    fn from(err: GpuStateError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Holds all WebGPU state for rendering
pub(crate) struct GpuState {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub surface: wgpu::Surface<'static>,
    pub config: wgpu::SurfaceConfiguration,
    pub canvas: web_sys::HtmlCanvasElement,
    pub render_pipeline: wgpu::RenderPipeline,
    pub vertex_buffer: wgpu::Buffer,
}

impl GpuState {
    /// Match the canvas backing store and surface to the engine's canvas.
    /// No-op when the size is unchanged.
    pub fn resize(&mut self, size: CanvasSize) {
        let (width, height) = size.surface_extent();
        if (width, height) == (self.config.width, self.config.height) {
            return;
        }
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        log::info!("surface resized to {}x{}", width, height);
    }
}

// Thread-local storage for GPU state (WASM is single-threaded)
thread_local! {
    pub(crate) static GPU_STATE: RefCell<Option<GpuState>> = const { RefCell::new(None) };
}

/// Initialize WebGPU on the given canvas: adapter, device, surface, pipeline
pub async fn initialize_gpu(canvas_id: &str, size: CanvasSize) -> Result<(), GpuStateError> {
    let window = web_sys::window().ok_or(GpuStateError::NoWindow)?;
    let document = window.document().ok_or(GpuStateError::NoDocument)?;
    let canvas = document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| GpuStateError::NoCanvas(canvas_id.to_string()))?
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .map_err(|_| GpuStateError::NoCanvas(canvas_id.to_string()))?;

    let (width, height) = size.surface_extent();
    canvas.set_width(width);
    canvas.set_height(height);

    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::BROWSER_WEBGPU,
        ..Default::default()
    });

    let surface = instance
        .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
        .map_err(|e| GpuStateError::SurfaceCreationFailed(format!("{:?}", e)))?;

    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        })
        .await
        .ok_or(GpuStateError::NoAdapter)?;

    let (device, queue) = adapter
        .request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Arcade Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: wgpu::MemoryHints::default(),
            },
            None,
        )
        .await
        .map_err(|e| GpuStateError::DeviceCreationFailed(format!("{:?}", e)))?;

    let surface_caps = surface.get_capabilities(&adapter);
    let surface_format = surface_caps
        .formats
        .iter()
        .find(|f| f.is_srgb())
        .or_else(|| surface_caps.formats.first())
        .copied()
        .ok_or_else(|| GpuStateError::SurfaceCreationFailed("no surface formats".into()))?;
    // Prefer a blending alpha mode so the video shows through
    let alpha_mode = [wgpu::CompositeAlphaMode::PreMultiplied, wgpu::CompositeAlphaMode::PostMultiplied]
        .into_iter()
        .find(|m| surface_caps.alpha_modes.contains(m))
        .or_else(|| surface_caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto);

    let config = wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format: surface_format,
        width,
        height,
        present_mode: wgpu::PresentMode::AutoVsync,
        alpha_mode,
        view_formats: vec![],
        desired_maximum_frame_latency: 2,
    };
    surface.configure(&device, &config);

    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Scene Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("../shader.wgsl").into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Pipeline Layout"),
        bind_group_layouts: &[],
        push_constant_ranges: &[],
    });

    let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Scene Pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::desc()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    });

    let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Scene Vertex Buffer"),
        size: (MAX_VERTICES * std::mem::size_of::<Vertex>()) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    log::info!("WebGPU ready: {}x{} {:?}", width, height, surface_format);

    GPU_STATE.with(|state| {
        *state.borrow_mut() = Some(GpuState {
            device,
            queue,
            surface,
            config,
            canvas,
            render_pipeline,
            vertex_buffer,
        });
    });

    Ok(())
}
