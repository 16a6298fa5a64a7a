use glam::Mat4;

use crate::camera::CameraState;
use crate::config::ViewerConfig;
use crate::error::ProjectionError;
use crate::frame::{FrameSink, MatrixSlot, Transforms};
use crate::gesture::{drag_rotation, zoom_view};
use crate::projection::ProjectionParams;
use crate::readiness::Readiness;

//
// ──────────────────────────────────────────────────────────────
//   Viewport controller
//
//   Owns the camera and the three matrices. Windowing code feeds
//   it lifecycle and gesture events; matrix changes leave through
//   a `FrameSink`.
// ──────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone)]
pub struct Viewport
{
  camera: CameraState,
  fov_degrees: f32,
  near: f32,
  far: f32,
  recompute_projection_on_resize: bool,

  projection_params: Option<ProjectionParams>,
  transforms: Transforms,
  readiness: Readiness,
}

impl Viewport
{
  pub fn new(config: &ViewerConfig) -> Self
  {
    Self {
      camera: config.camera.state(),
      fov_degrees: config.camera.fov_degrees,
      near: config.camera.near,
      far: config.camera.far,
      recompute_projection_on_resize: config.recompute_projection_on_resize,

      projection_params: None,
      transforms: Transforms::default(),
      readiness: Readiness::default(),
    }
  }

  pub fn readiness(&self) -> Readiness
  {
    self.readiness
  }

  pub fn camera(&self) -> &CameraState
  {
    &self.camera
  }

  pub fn transforms(&self) -> &Transforms
  {
    &self.transforms
  }

  pub fn projection_params(&self) -> Option<&ProjectionParams>
  {
    self.projection_params.as_ref()
  }

  //
  // ── Lifecycle ───────────────────────────────────────────────
  //

  /// The rendering surface is valid at `width` x `height` pixels.
  /// Returns `true` when this completes readiness and setup must run.
  pub fn surface_realized(&mut self, width: u32, height: u32) -> Result<bool, ProjectionError>
  {
    let params = ProjectionParams::from_extent(self.fov_degrees, width, height, self.near, self.far)?;
    self.transforms.projection = params.build()?;
    self.projection_params = Some(params);

    let transition = self.readiness.surface_realized();
    self.readiness = transition.state;

    if transition.entered_ready
    {
      self.prepare_transforms();
    }

    Ok(transition.entered_ready)
  }

  pub fn surface_unrealized(&mut self)
  {
    self.readiness = self.readiness.surface_unrealized().state;
  }

  /// Returns `true` when this completes readiness and setup must run.
  pub fn model_loaded(&mut self) -> bool
  {
    let transition = self.readiness.model_loaded();
    self.readiness = transition.state;

    if transition.entered_ready
    {
      self.prepare_transforms();
    }

    transition.entered_ready
  }

  fn prepare_transforms(&mut self)
  {
    self.transforms.model = Mat4::IDENTITY;
    self.transforms.view = self.camera.view_matrix();

    log::debug!("Transforms prepared for camera at {}", self.camera.position);
  }

  pub fn upload_all(&self, sink: &mut impl FrameSink)
  {
    for slot in MatrixSlot::ALL
    {
      sink.upload_matrix(slot, self.transforms.get(slot));
    }
  }

  /// The projection keeps its realize-time aspect ratio unless resize
  /// recomputation is enabled.
  pub fn resized(
    &mut self,
    width: u32,
    height: u32,
    sink: &mut impl FrameSink,
  ) -> Result<bool, ProjectionError>
  {
    if !self.recompute_projection_on_resize || !self.readiness.is_ready()
    {
      return Ok(false);
    }

    let params = ProjectionParams::from_extent(self.fov_degrees, width, height, self.near, self.far)?;
    self.transforms.projection = params.build()?;
    self.projection_params = Some(params);

    sink.upload_matrix(MatrixSlot::Projection, &self.transforms.projection);
    sink.request_redraw();
    Ok(true)
  }

  //
  // ── Gestures ────────────────────────────────────────────────
  //

  /// Zoom gesture with a cumulative scale (1.0 at gesture start).
  pub fn zoom(&mut self, scale_delta: f32, sink: &mut impl FrameSink) -> bool
  {
    if !self.readiness.is_ready()
    {
      return false;
    }

    self.transforms.view = zoom_view(&self.camera, scale_delta);

    sink.upload_matrix(MatrixSlot::View, &self.transforms.view);
    sink.request_redraw();
    true
  }

  /// Drag by an offset in normalized device units. A singular transform
  /// leaves everything untouched.
  pub fn drag(&mut self, offset_x: f32, offset_y: f32, sink: &mut impl FrameSink) -> bool
  {
    if !self.readiness.is_ready()
    {
      return false;
    }

    let t = &self.transforms;
    let Some(model) = drag_rotation(t.model, t.view, t.projection, offset_x, offset_y)
    else
    {
      log::trace!("Drag ({offset_x}, {offset_y}) skipped: transform not invertible or offset empty");
      return false;
    };

    self.transforms.model = model;

    sink.upload_matrix(MatrixSlot::Model, &self.transforms.model);
    sink.request_redraw();
    true
  }
}

#[cfg(test)]
mod tests
{
  use glam::Vec3;

  use super::*;

  #[derive(Default)]
  struct RecordingSink
  {
    uploads: Vec<(MatrixSlot, Mat4)>,
    redraws: usize,
  }

  impl FrameSink for RecordingSink
  {
    fn upload_matrix(&mut self, slot: MatrixSlot, matrix: &Mat4)
    {
      self.uploads.push((slot, *matrix));
    }

    fn request_redraw(&mut self)
    {
      self.redraws += 1;
    }
  }

  fn ready_viewport(config: &ViewerConfig) -> Viewport
  {
    let mut viewport = Viewport::new(config);
    assert!(!viewport.model_loaded());
    assert!(viewport.surface_realized(800, 600).unwrap());
    viewport
  }

  #[test]
  fn setup_builds_identity_model_and_camera_view()
  {
    let viewport = ready_viewport(&ViewerConfig::default());
    let t = viewport.transforms();

    assert_eq!(t.model, Mat4::IDENTITY);
    assert_eq!(t.view, CameraState::default().view_matrix());
    assert!((viewport.projection_params().unwrap().aspect_ratio - 800.0 / 600.0).abs() < 1e-6);
  }

  #[test]
  fn upload_all_fills_every_slot()
  {
    let viewport = ready_viewport(&ViewerConfig::default());
    let mut sink = RecordingSink::default();

    viewport.upload_all(&mut sink);

    let slots: Vec<MatrixSlot> = sink.uploads.iter().map(|(slot, _)| *slot).collect();
    assert_eq!(slots, MatrixSlot::ALL.to_vec());
    assert_eq!(sink.redraws, 0);
  }

  #[test]
  fn gestures_are_ignored_before_ready()
  {
    let mut viewport = Viewport::new(&ViewerConfig::default());
    let mut sink = RecordingSink::default();

    assert!(!viewport.zoom(1.5, &mut sink));
    assert!(!viewport.drag(0.1, 0.1, &mut sink));
    assert!(sink.uploads.is_empty());
    assert_eq!(sink.redraws, 0);
  }

  #[test]
  fn zoom_uploads_view_and_requests_redraw()
  {
    let mut viewport = ready_viewport(&ViewerConfig::default());
    let mut sink = RecordingSink::default();

    assert!(viewport.zoom(1.0, &mut sink));

    assert_eq!(sink.uploads.len(), 1);
    assert_eq!(sink.uploads[0].0, MatrixSlot::View);
    assert_eq!(sink.redraws, 1);

    // Baseline camera is untouched
    assert_eq!(viewport.camera().position, Vec3::new(1.5, 1.0, 5.0));
  }

  #[test]
  fn drag_uploads_model_and_requests_redraw()
  {
    let mut viewport = ready_viewport(&ViewerConfig::default());
    let mut sink = RecordingSink::default();

    assert!(viewport.drag(0.05, -0.02, &mut sink));

    assert_eq!(sink.uploads.len(), 1);
    assert_eq!(sink.uploads[0].0, MatrixSlot::Model);
    assert_ne!(viewport.transforms().model, Mat4::IDENTITY);
    assert_eq!(sink.redraws, 1);
  }

  #[test]
  fn degenerate_drag_changes_nothing()
  {
    let mut viewport = ready_viewport(&ViewerConfig::default());
    let before = *viewport.transforms();
    let mut sink = RecordingSink::default();

    assert!(!viewport.drag(0.0, 0.0, &mut sink));

    assert_eq!(*viewport.transforms(), before);
    assert!(sink.uploads.is_empty());
    assert_eq!(sink.redraws, 0);
  }

  #[test]
  fn resize_keeps_projection_by_default()
  {
    let mut viewport = ready_viewport(&ViewerConfig::default());
    let before = viewport.transforms().projection;
    let mut sink = RecordingSink::default();

    assert!(!viewport.resized(400, 600, &mut sink).unwrap());
    assert_eq!(viewport.transforms().projection, before);
    assert!(sink.uploads.is_empty());
  }

  #[test]
  fn resize_recomputes_projection_when_enabled()
  {
    let config = ViewerConfig { recompute_projection_on_resize: true, ..Default::default() };
    let mut viewport = ready_viewport(&config);
    let before = viewport.transforms().projection;
    let mut sink = RecordingSink::default();

    assert!(viewport.resized(400, 600, &mut sink).unwrap());
    assert_ne!(viewport.transforms().projection, before);
    assert_eq!(sink.uploads[0].0, MatrixSlot::Projection);
    assert_eq!(sink.redraws, 1);
  }

  #[test]
  fn empty_surface_is_rejected()
  {
    let mut viewport = Viewport::new(&ViewerConfig::default());

    assert!(viewport.surface_realized(0, 600).is_err());
    assert_eq!(viewport.readiness(), Readiness::AwaitingBoth);
  }

  #[test]
  fn rerealize_resets_rotation()
  {
    let mut viewport = ready_viewport(&ViewerConfig::default());
    let mut sink = RecordingSink::default();
    assert!(viewport.drag(0.1, 0.1, &mut sink));

    viewport.surface_unrealized();
    assert_eq!(viewport.readiness(), Readiness::AwaitingSurface);

    assert!(viewport.surface_realized(1024, 768).unwrap());
    assert_eq!(viewport.transforms().model, Mat4::IDENTITY);
  }
}
