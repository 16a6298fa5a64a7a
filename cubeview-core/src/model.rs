use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

//
// ──────────────────────────────────────────────────────────────
//   Static geometry
// ──────────────────────────────────────────────────────────────
//

const FLOATS_PER_VERTEX: usize = 3;

#[rustfmt::skip]
const TRIANGLE_VERTICES: [f32; 9] = [
   0.0,  0.5, 0.0,
   0.5, -0.5, 0.0,
  -0.5, -0.5, 0.0,
];

const TRIANGLE_INDICES: [u32; 3] = [0, 1, 2];

// 8 unique corners of the unit cube centred on the origin
#[rustfmt::skip]
const CUBE_VERTICES: [f32; 24] = [
  -0.5, -0.5, -0.5, // 0 back
   0.5, -0.5, -0.5, // 1
   0.5,  0.5, -0.5, // 2
  -0.5,  0.5, -0.5, // 3
  -0.5, -0.5,  0.5, // 4 front
   0.5, -0.5,  0.5, // 5
   0.5,  0.5,  0.5, // 6
  -0.5,  0.5,  0.5, // 7
];

#[rustfmt::skip]
const CUBE_INDICES: [u32; 36] = [
  0, 1, 2,  0, 2, 3,  // back    (Z-)
  4, 5, 6,  4, 6, 7,  // front   (Z+)
  0, 1, 5,  0, 5, 4,  // bottom  (Y-)
  2, 3, 7,  2, 7, 6,  // top     (Y+)
  1, 2, 6,  1, 6, 5,  // right   (X+)
  3, 0, 4,  3, 4, 7,  // left    (X-)
];

//
// ──────────────────────────────────────────────────────────────
//   Model
// ──────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind
{
  Triangle,
  #[default]
  Cube,
}

/// How positions are read out of the vertex buffer, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexLayout
{
  pub stride: u64,
  pub offset: u64,
}

/// A fixed solid: flat xyz positions plus a triangle-list index buffer.
#[derive(Debug, Clone)]
pub struct Model
{
  kind: ModelKind,
  vertices: Vec<f32>,
  indices: Vec<u32>,
}

impl Model
{
  pub fn build(kind: ModelKind) -> Result<Self, ModelError>
  {
    let (vertex_data, index_data): (&[f32], &[u32]) = match kind
    {
      ModelKind::Triangle => (&TRIANGLE_VERTICES[..], &TRIANGLE_INDICES[..]),
      ModelKind::Cube => (&CUBE_VERTICES[..], &CUBE_INDICES[..]),
    };

    let vertices = copy_into_new(vertex_data, "vertex buffer")?;
    let indices = copy_into_new(index_data, "index buffer")?;

    Ok(Self { kind, vertices, indices })
  }

  pub fn kind(&self) -> ModelKind
  {
    self.kind
  }

  pub fn vertex_buffer(&self) -> &[f32]
  {
    &self.vertices
  }

  pub fn vertex_count(&self) -> u32
  {
    (self.vertices.len() / FLOATS_PER_VERTEX) as u32
  }

  pub fn index_buffer(&self) -> &[u32]
  {
    &self.indices
  }

  pub fn index_count(&self) -> u32
  {
    self.indices.len() as u32
  }

  /// Positions only for now, tightly packed.
  pub fn vertex_layout(&self) -> VertexLayout
  {
    VertexLayout { stride: std::mem::size_of::<[f32; FLOATS_PER_VERTEX]>() as u64, offset: 0 }
  }
}

fn copy_into_new<T: Copy>(data: &[T], what: &'static str) -> Result<Vec<T>, ModelError>
{
  let mut buffer = Vec::new();
  buffer.try_reserve_exact(data.len()).map_err(|source| ModelError::Allocation { what, source })?;
  buffer.extend_from_slice(data);
  Ok(buffer)
}

//
// ──────────────────────────────────────────────────────────────
//   Deferred construction with cancellation
//
//   The request is handed to the event loop and completed on a
//   later turn. Whoever started it keeps only a `Cancellable`;
//   cancelling guarantees the completion callback never runs.
// ──────────────────────────────────────────────────────────────
//

#[derive(Debug)]
pub struct Cancellable
{
  flag: Arc<AtomicBool>,
}

impl Cancellable
{
  /// Consumes the token: it must not be reused once cancelled.
  pub fn cancel(self)
  {
    self.flag.store(true, Ordering::Release);
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion
{
  Delivered,
  Cancelled,
}

#[derive(Debug)]
pub struct ModelRequest
{
  kind: ModelKind,
  cancelled: Arc<AtomicBool>,
}

impl ModelRequest
{
  pub fn new(kind: ModelKind) -> Self
  {
    Self { kind, cancelled: Arc::new(AtomicBool::new(false)) }
  }

  pub fn kind(&self) -> ModelKind
  {
    self.kind
  }

  pub fn cancellable(&self) -> Cancellable
  {
    Cancellable { flag: Arc::clone(&self.cancelled) }
  }

  pub fn is_cancelled(&self) -> bool
  {
    self.cancelled.load(Ordering::Acquire)
  }

  /// Builds the model and hands the outcome to `on_done`, unless the
  /// request was cancelled first.
  pub fn complete<F>(self, on_done: F) -> Completion
  where
    F: FnOnce(Result<Model, ModelError>),
  {
    if self.is_cancelled()
    {
      return Completion::Cancelled;
    }

    let result = Model::build(self.kind);

    if self.is_cancelled()
    {
      return Completion::Cancelled;
    }

    on_done(result);
    Completion::Delivered
  }
}

#[cfg(test)]
mod tests
{
  use super::*;

  fn assert_valid_triangle_list(model: &Model)
  {
    assert_eq!(model.index_count() % 3, 0);
    assert!(model.index_buffer().iter().all(|&i| i < model.vertex_count()));
  }

  #[test]
  fn cube_has_eight_corners_and_twelve_triangles()
  {
    let cube = Model::build(ModelKind::Cube).unwrap();

    assert_eq!(cube.vertex_count(), 8);
    assert_eq!(cube.vertex_buffer().len(), 24);
    assert_eq!(cube.index_count(), 36);
    assert_valid_triangle_list(&cube);
  }

  #[test]
  fn cube_corners_are_distinct()
  {
    let cube = Model::build(ModelKind::Cube).unwrap();
    let corners: Vec<&[f32]> = cube.vertex_buffer().chunks(3).collect();

    for (i, a) in corners.iter().enumerate()
    {
      for b in &corners[i + 1..]
      {
        assert_ne!(a, b);
      }
    }
  }

  #[test]
  fn triangle_is_a_single_face()
  {
    let triangle = Model::build(ModelKind::Triangle).unwrap();

    assert_eq!(triangle.vertex_count(), 3);
    assert_eq!(triangle.index_buffer(), &[0, 1, 2]);
    assert_valid_triangle_list(&triangle);
  }

  #[test]
  fn layout_is_tightly_packed_positions()
  {
    let cube = Model::build(ModelKind::Cube).unwrap();
    assert_eq!(cube.vertex_layout(), VertexLayout { stride: 12, offset: 0 });
  }

  #[test]
  fn completed_request_delivers_model()
  {
    let request = ModelRequest::new(ModelKind::Cube);
    let mut delivered = None;

    let outcome = request.complete(|result| delivered = Some(result));

    assert_eq!(outcome, Completion::Delivered);
    let model = delivered.unwrap().unwrap();
    assert_eq!(model.kind(), ModelKind::Cube);
  }

  #[test]
  fn cancelled_request_never_calls_back()
  {
    let request = ModelRequest::new(ModelKind::Triangle);
    request.cancellable().cancel();

    let mut called = false;
    let outcome = request.complete(|_| called = true);

    assert_eq!(outcome, Completion::Cancelled);
    assert!(!called);
  }

  #[test]
  fn kind_parses_from_lowercase_name()
  {
    let kind: ModelKind = serde_json::from_str("\"triangle\"").unwrap();
    assert_eq!(kind, ModelKind::Triangle);
  }
}
