use cubeview_core::{FrameSink, Viewport};

use crate::input::InputState;

//
// ──────────────────────────────────────────────────────────────
//   Public API
// ──────────────────────────────────────────────────────────────
//

/// Feeds the gestures gathered this frame into the viewport.
/// `width`/`height` are the viewport size in physical pixels.
pub fn apply_input_to_viewport(
  input: &mut InputState,
  viewport: &mut Viewport,
  sink: &mut impl FrameSink,
  width: u32,
  height: u32,
  scroll_zoom_step: f32,
)
{
  apply_zoom(input, viewport, sink, scroll_zoom_step);
  apply_drag(input, viewport, sink, width, height);
}

//
// ──────────────────────────────────────────────────────────────
//   Input handlers
// ──────────────────────────────────────────────────────────────
//

fn apply_zoom(
  input: &mut InputState,
  viewport: &mut Viewport,
  sink: &mut impl FrameSink,
  scroll_zoom_step: f32,
)
{
  if input.pinch_started
  {
    input.zoom_scale = 1.0;
  }

  if input.pinch == 0.0 && input.scroll == 0.0
  {
    return;
  }

  // Positive pinch and scroll-up both mean "zoom in", i.e. scale > 1
  input.zoom_scale += input.pinch + input.scroll * scroll_zoom_step;

  log::trace!("Zoom scale {}", input.zoom_scale);
  viewport.zoom(input.zoom_scale, sink);
}

fn apply_drag(
  input: &InputState,
  viewport: &mut Viewport,
  sink: &mut impl FrameSink,
  width: u32,
  height: u32,
)
{
  if input.drag_dx == 0.0 && input.drag_dy == 0.0
  {
    return;
  }

  if width == 0 || height == 0
  {
    return;
  }

  // Pixels → normalized device units (y up)
  let offset_x = input.drag_dx * 2.0 / width as f32;
  let offset_y = -input.drag_dy * 2.0 / height as f32;

  viewport.drag(offset_x, offset_y, sink);
}

#[cfg(test)]
mod tests
{
  use cubeview_core::{MatrixSlot, ViewerConfig};
  use glam::Mat4;

  use super::*;

  #[derive(Default)]
  struct Uploads
  {
    slots: Vec<MatrixSlot>,
  }

  impl FrameSink for Uploads
  {
    fn upload_matrix(&mut self, slot: MatrixSlot, _matrix: &Mat4)
    {
      self.slots.push(slot);
    }

    fn request_redraw(&mut self) {}
  }

  fn ready_viewport() -> Viewport
  {
    let mut viewport = Viewport::new(&ViewerConfig::default());
    viewport.model_loaded();
    viewport.surface_realized(800, 600).unwrap();
    viewport
  }

  #[test]
  fn idle_input_touches_nothing()
  {
    let mut input = InputState::new();
    let mut viewport = ready_viewport();
    let mut sink = Uploads::default();

    apply_input_to_viewport(&mut input, &mut viewport, &mut sink, 800, 600, 0.1);

    assert!(sink.slots.is_empty());
  }

  #[test]
  fn scroll_accumulates_into_zoom_scale()
  {
    let mut input = InputState::new();
    let mut viewport = ready_viewport();
    let mut sink = Uploads::default();

    input.scroll = 2.0;
    apply_input_to_viewport(&mut input, &mut viewport, &mut sink, 800, 600, 0.1);

    assert!((input.zoom_scale - 1.2).abs() < 1e-6);
    assert_eq!(sink.slots, vec![MatrixSlot::View]);
  }

  #[test]
  fn pinch_start_resets_scale()
  {
    let mut input = InputState::new();
    let mut viewport = ready_viewport();
    let mut sink = Uploads::default();

    input.zoom_scale = 3.0;
    input.pinch_started = true;
    input.pinch = 0.25;
    apply_input_to_viewport(&mut input, &mut viewport, &mut sink, 800, 600, 0.1);

    assert!((input.zoom_scale - 1.25).abs() < 1e-6);
  }

  #[test]
  fn drag_rotates_model()
  {
    let mut input = InputState::new();
    let mut viewport = ready_viewport();
    let mut sink = Uploads::default();

    input.drag_dx = 12.0;
    input.drag_dy = -4.0;
    apply_input_to_viewport(&mut input, &mut viewport, &mut sink, 800, 600, 0.1);

    assert_eq!(sink.slots, vec![MatrixSlot::Model]);
    assert_ne!(viewport.transforms().model, Mat4::IDENTITY);
  }

  #[test]
  fn end_frame_clears_deltas_but_keeps_scale()
  {
    let mut input = InputState::new();
    input.drag_dx = 3.0;
    input.scroll = 1.0;
    input.zoom_scale = 1.4;

    input.end_frame();

    assert_eq!((input.drag_dx, input.scroll), (0.0, 0.0));
    assert_eq!(input.zoom_scale, 1.4);
  }
}
