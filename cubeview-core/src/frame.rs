use glam::Mat4;

//
// ──────────────────────────────────────────────────────────────
//   Matrix uniform block (GPU side)
//
//   WGSL layout (model.wgsl):
//     model      : mat4x4<f32>   → 64 bytes, offset   0
//     view       : mat4x4<f32>   → 64 bytes, offset  64
//     projection : mat4x4<f32>   → 64 bytes, offset 128
//   Total: 192 bytes, column-major
// ──────────────────────────────────────────────────────────────
//

#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MatrixUniforms
{
  pub model: [[f32; 4]; 4],
  pub view: [[f32; 4]; 4],
  pub projection: [[f32; 4]; 4],
}

// Catch CPU/GPU layout mismatches at compile time
const _: () = assert!(std::mem::size_of::<MatrixUniforms>() == 192);

impl MatrixUniforms
{
  pub fn from_transforms(transforms: &Transforms) -> Self
  {
    Self {
      model: transforms.model.to_cols_array_2d(),
      view: transforms.view.to_cols_array_2d(),
      projection: transforms.projection.to_cols_array_2d(),
    }
  }
}

/// Named uniform slots inside [`MatrixUniforms`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixSlot
{
  Model,
  View,
  Projection,
}

impl MatrixSlot
{
  pub const ALL: [MatrixSlot; 3] = [MatrixSlot::Model, MatrixSlot::View, MatrixSlot::Projection];

  pub fn name(self) -> &'static str
  {
    match self
    {
      MatrixSlot::Model => "model",
      MatrixSlot::View => "view",
      MatrixSlot::Projection => "projection",
    }
  }

  /// Byte offset of the slot within the uniform block.
  pub fn offset(self) -> u64
  {
    let matrix = std::mem::size_of::<[[f32; 4]; 4]>() as u64;

    match self
    {
      MatrixSlot::Model => 0,
      MatrixSlot::View => matrix,
      MatrixSlot::Projection => 2 * matrix,
    }
  }
}

//
// ──────────────────────────────────────────────────────────────
//   CPU-side transforms
// ──────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transforms
{
  pub model: Mat4,
  pub view: Mat4,
  pub projection: Mat4,
}

impl Transforms
{
  pub fn get(&self, slot: MatrixSlot) -> &Mat4
  {
    match slot
    {
      MatrixSlot::Model => &self.model,
      MatrixSlot::View => &self.view,
      MatrixSlot::Projection => &self.projection,
    }
  }

  /// `projection * view * model`
  pub fn full(&self) -> Mat4
  {
    self.projection * self.view * self.model
  }
}

impl Default for Transforms
{
  fn default() -> Self
  {
    Self { model: Mat4::IDENTITY, view: Mat4::IDENTITY, projection: Mat4::IDENTITY }
  }
}

//
// ──────────────────────────────────────────────────────────────
//   Upload seam
// ──────────────────────────────────────────────────────────────
//

/// Where matrix updates and redraw requests go.
pub trait FrameSink
{
  fn upload_matrix(&mut self, slot: MatrixSlot, matrix: &Mat4);

  /// Schedules a render pass; must not render synchronously.
  fn request_redraw(&mut self);
}
