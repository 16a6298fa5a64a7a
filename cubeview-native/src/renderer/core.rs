use std::sync::Arc;

use anyhow::{anyhow, Context};
use cubeview_core::{MatrixSlot, MatrixUniforms, Model};
use glam::Mat4;
use winit::window::Window;

use super::depth::{DepthResources, DEPTH_FORMAT};
use super::mesh::ModelMesh;

/// Pipeline and buffers that exist only once a model is loaded.
struct ModelPass
{
  pipeline: wgpu::RenderPipeline,
  mesh: ModelMesh,
}

pub struct Renderer
{
  surface: wgpu::Surface<'static>,
  device: wgpu::Device,
  queue: wgpu::Queue,
  config: wgpu::SurfaceConfiguration,

  depth: DepthResources,
  matrix_buffer: wgpu::Buffer,
  matrix_bind_group: wgpu::BindGroup,
  matrix_bgl: wgpu::BindGroupLayout,

  clear_color: wgpu::Color,
  model_pass: Option<ModelPass>,
}

//
// ──────────────────────────────────────────────────────────────
//   Public API
// ──────────────────────────────────────────────────────────────
//

impl Renderer
{
  /// Realizes the rendering surface for `window`.
  pub async fn new(window: Arc<Window>, clear_color: [f64; 4]) -> anyhow::Result<Self>
  {
    let instance = wgpu::Instance::default();
    let surface =
      instance.create_surface(window.clone()).context("Failed to create rendering surface")?;

    let adapter = request_adapter(&instance, &surface).await?;
    let (device, queue) = request_device(&adapter).await?;

    let config = configure_surface(&window, &surface, &adapter, &device)?;
    let depth = DepthResources::create(&device, &config);

    let (matrix_buffer, matrix_bind_group, matrix_bgl) = create_matrix_resources(&device);

    log::info!(
      "Surface realized: {}x{} {:?} on {}",
      config.width,
      config.height,
      config.format,
      adapter.get_info().name
    );

    let [r, g, b, a] = clear_color;

    Ok(Self {
      surface,
      device,
      queue,
      config,
      depth,
      matrix_buffer,
      matrix_bind_group,
      matrix_bgl,
      clear_color: wgpu::Color { r, g, b, a },
      model_pass: None,
    })
  }

  /// One-time setup once both surface and model exist: buffers, shader
  /// program and attribute layout. Matrices are uploaded separately.
  pub fn prepare_model(&mut self, model: &Model)
  {
    let mesh = ModelMesh::create(&self.device, model);
    let pipeline = create_pipeline(&self.device, &self.config, &self.matrix_bgl, &mesh);

    self.model_pass = Some(ModelPass { pipeline, mesh });
  }

  pub fn upload_matrix(&self, slot: MatrixSlot, matrix: &Mat4)
  {
    let cols = matrix.to_cols_array();
    self.queue.write_buffer(&self.matrix_buffer, slot.offset(), bytemuck::cast_slice(&cols));
  }

  pub fn resize(&mut self, width: u32, height: u32)
  {
    if width == 0 || height == 0
    {
      return;
    }

    self.config.width = width;
    self.config.height = height;
    self.surface.configure(&self.device, &self.config);
    self.depth = DepthResources::create(&self.device, &self.config);
  }

  /// Clears the frame and draws the model if one is prepared.
  /// Returns whether the frame was presented.
  pub fn render(&mut self) -> bool
  {
    let frame = match self.surface.get_current_texture()
    {
      Ok(frame) => frame,
      Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) =>
      {
        log::debug!("Surface lost or outdated, reconfiguring");
        self.surface.configure(&self.device, &self.config);
        return false;
      }
      Err(e) =>
      {
        log::warn!("Failed to acquire frame: {e}");
        return false;
      }
    };

    let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());

    let mut encoder = self
      .device
      .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("Viewport Encoder") });

    record_render_pass(
      &mut encoder,
      &view,
      &self.depth.view,
      self.clear_color,
      &self.matrix_bind_group,
      self.model_pass.as_ref(),
    );

    self.queue.submit(Some(encoder.finish()));
    frame.present();
    true
  }
}

//
// ──────────────────────────────────────────────────────────────
//   Initialization Helpers
// ──────────────────────────────────────────────────────────────
//

async fn request_adapter(
  instance: &wgpu::Instance,
  surface: &wgpu::Surface<'_>,
) -> anyhow::Result<wgpu::Adapter>
{
  instance
    .request_adapter(&wgpu::RequestAdapterOptions {
      power_preference: wgpu::PowerPreference::HighPerformance,
      compatible_surface: Some(surface),
      force_fallback_adapter: false,
    })
    .await
    .context("No suitable GPU adapters found")
}

async fn request_device(adapter: &wgpu::Adapter) -> anyhow::Result<(wgpu::Device, wgpu::Queue)>
{
  adapter
    .request_device(&wgpu::DeviceDescriptor {
      label: Some("Cubeview Device"),
      required_features: wgpu::Features::empty(),
      required_limits: wgpu::Limits::default(),
      ..Default::default()
    })
    .await
    .context("Failed to create device")
}

fn configure_surface(
  window: &Window,
  surface: &wgpu::Surface<'_>,
  adapter: &wgpu::Adapter,
  device: &wgpu::Device,
) -> anyhow::Result<wgpu::SurfaceConfiguration>
{
  let size = window.inner_size();
  let caps = surface.get_capabilities(adapter);
  let format = caps
    .formats
    .iter()
    .copied()
    .find(wgpu::TextureFormat::is_srgb)
    .or_else(|| caps.formats.first().copied())
    .ok_or_else(|| anyhow!("Surface reports no supported formats"))?;

  let config = wgpu::SurfaceConfiguration {
    usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
    format,
    width: size.width.max(1),
    height: size.height.max(1),
    present_mode: wgpu::PresentMode::Fifo,
    alpha_mode: wgpu::CompositeAlphaMode::Auto,
    view_formats: vec![],
    desired_maximum_frame_latency: 2,
  };

  surface.configure(device, &config);
  Ok(config)
}

fn create_matrix_resources(
  device: &wgpu::Device,
) -> (wgpu::Buffer, wgpu::BindGroup, wgpu::BindGroupLayout)
{
  let matrix_buffer = device.create_buffer(&wgpu::BufferDescriptor {
    label: Some("Matrix Uniform Buffer"),
    size: std::mem::size_of::<MatrixUniforms>() as u64,
    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    mapped_at_creation: false,
  });

  let matrix_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
    label: Some("Matrix BGL"),
    entries: &[wgpu::BindGroupLayoutEntry {
      binding: 0,
      visibility: wgpu::ShaderStages::VERTEX,
      ty: wgpu::BindingType::Buffer {
        ty: wgpu::BufferBindingType::Uniform,
        has_dynamic_offset: false,
        min_binding_size: None,
      },
      count: None,
    }],
  });

  let matrix_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
    label: Some("Matrix BG"),
    layout: &matrix_bgl,
    entries: &[wgpu::BindGroupEntry { binding: 0, resource: matrix_buffer.as_entire_binding() }],
  });

  (matrix_buffer, matrix_bind_group, matrix_bgl)
}

//
// ──────────────────────────────────────────────────────────────
//   Shader program
//
//   Compile and link problems are reported, not fatal: the
//   pipeline is still used and the frame simply comes out wrong.
// ──────────────────────────────────────────────────────────────
//

fn create_pipeline(
  device: &wgpu::Device,
  config: &wgpu::SurfaceConfiguration,
  matrix_bgl: &wgpu::BindGroupLayout,
  mesh: &ModelMesh,
) -> wgpu::RenderPipeline
{
  device.push_error_scope(wgpu::ErrorFilter::Validation);

  let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
    label: Some("Model Shader"),
    source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/model.wgsl").into()),
  });

  report_compilation(&shader);

  let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
    label: Some("Model Pipeline Layout"),
    bind_group_layouts: &[matrix_bgl],
    push_constant_ranges: &[],
  });

  let attributes = [wgpu::VertexAttribute {
    format: wgpu::VertexFormat::Float32x3,
    offset: mesh.layout.offset,
    shader_location: 0,
  }];

  let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
    label: Some("Model Pipeline"),
    layout: Some(&layout),
    vertex: wgpu::VertexState {
      module: &shader,
      entry_point: Some("vs_main"),
      buffers: &[wgpu::VertexBufferLayout {
        array_stride: mesh.layout.stride,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &attributes,
      }],
      compilation_options: wgpu::PipelineCompilationOptions::default(),
    },
    fragment: Some(wgpu::FragmentState {
      module: &shader,
      entry_point: Some("fs_main"),
      targets: &[Some(wgpu::ColorTargetState {
        format: config.format,
        blend: Some(wgpu::BlendState::REPLACE),
        write_mask: wgpu::ColorWrites::ALL,
      })],
      compilation_options: wgpu::PipelineCompilationOptions::default(),
    }),
    primitive: wgpu::PrimitiveState {
      topology: wgpu::PrimitiveTopology::TriangleList,
      strip_index_format: None,
      front_face: wgpu::FrontFace::Ccw,
      cull_mode: None, // cube winding is mixed
      unclipped_depth: false,
      polygon_mode: wgpu::PolygonMode::Fill,
      conservative: false,
    },
    depth_stencil: Some(wgpu::DepthStencilState {
      format: DEPTH_FORMAT,
      depth_write_enabled: true,
      depth_compare: wgpu::CompareFunction::Less,
      stencil: wgpu::StencilState::default(),
      bias: wgpu::DepthBiasState::default(),
    }),
    multisample: wgpu::MultisampleState::default(),
    multiview: None,
    cache: None,
  });

  if let Some(error) = pollster::block_on(device.pop_error_scope())
  {
    log::warn!("Failed to link shader program: {error}");
  }

  pipeline
}

fn report_compilation(shader: &wgpu::ShaderModule)
{
  let info = pollster::block_on(shader.get_compilation_info());

  for message in &info.messages
  {
    let (line, column) =
      message.location.as_ref().map_or((0, 0), |loc| (loc.line_number, loc.line_position));

    match message.message_type
    {
      wgpu::CompilationMessageType::Error =>
      {
        log::warn!("Failed to compile shader ({line}:{column}): {}", message.message)
      }
      wgpu::CompilationMessageType::Warning =>
      {
        log::warn!("Shader warning ({line}:{column}): {}", message.message)
      }
      _ =>
      {
        log::debug!("Shader info ({line}:{column}): {}", message.message)
      }
    }
  }
}

//
// ──────────────────────────────────────────────────────────────
//   Render Pass
// ──────────────────────────────────────────────────────────────
//

fn record_render_pass(
  encoder: &mut wgpu::CommandEncoder,
  color_view: &wgpu::TextureView,
  depth_view: &wgpu::TextureView,
  clear_color: wgpu::Color,
  matrix_bg: &wgpu::BindGroup,
  model_pass: Option<&ModelPass>,
)
{
  let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
    label: Some("Viewport Render Pass"),
    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
      view: color_view,
      resolve_target: None,
      ops: wgpu::Operations { load: wgpu::LoadOp::Clear(clear_color), store: wgpu::StoreOp::Store },
      depth_slice: None,
    })],
    depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
      view: depth_view,
      depth_ops: Some(wgpu::Operations {
        load: wgpu::LoadOp::Clear(1.0),
        store: wgpu::StoreOp::Store,
      }),
      stencil_ops: None,
    }),
    occlusion_query_set: None,
    timestamp_writes: None,
  });

  // Nothing to draw until the model has arrived
  let Some(model_pass) = model_pass
  else
  {
    return;
  };

  let mesh = &model_pass.mesh;

  pass.set_pipeline(&model_pass.pipeline);
  pass.set_bind_group(0, matrix_bg, &[]);
  pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
  pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
  pass.draw_indexed(0..mesh.index_count, 0, 0..1);
}
