use cubeview_core::{Model, VertexLayout};
use wgpu::util::DeviceExt;

/// GPU copy of a model's vertex and index buffers.
pub struct ModelMesh
{
  pub vertex_buffer: wgpu::Buffer,
  pub index_buffer: wgpu::Buffer,
  pub index_count: u32,
  pub layout: VertexLayout,
}

impl ModelMesh
{
  pub fn create(device: &wgpu::Device, model: &Model) -> Self
  {
    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
      label: Some("Model Vertex Buffer"),
      contents: bytemuck::cast_slice(model.vertex_buffer()),
      usage: wgpu::BufferUsages::VERTEX,
    });

    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
      label: Some("Model Index Buffer"),
      contents: bytemuck::cast_slice(model.index_buffer()),
      usage: wgpu::BufferUsages::INDEX,
    });

    log::debug!(
      "Uploaded {:?} mesh: {} vertices, {} indices",
      model.kind(),
      model.vertex_count(),
      model.index_count()
    );

    Self {
      vertex_buffer,
      index_buffer,
      index_count: model.index_count(),
      layout: model.vertex_layout(),
    }
  }
}
