pub mod gesture_control;

use winit::event::{ElementState, MouseButton, MouseScrollDelta, TouchPhase, WindowEvent};

// Touchpads report pixels; treat this many as one wheel notch
const PIXELS_PER_LINE: f32 = 20.0;

/// Pointer and gesture input gathered between two `about_to_wait` calls.
pub struct InputState
{
  pub mouse_x: f32,
  pub mouse_y: f32,
  pub drag_dx: f32,
  pub drag_dy: f32,

  pub left_held: bool,

  pub scroll: f32,
  pub pinch: f32,
  pub pinch_started: bool,

  /// Cumulative zoom scale; 1.0 at the start of a pinch.
  pub zoom_scale: f32,
}

impl InputState
{
  pub fn new() -> Self
  {
    Self {
      mouse_x: 0.0,
      mouse_y: 0.0,
      drag_dx: 0.0,
      drag_dy: 0.0,

      left_held: false,

      scroll: 0.0,
      pinch: 0.0,
      pinch_started: false,

      zoom_scale: 1.0,
    }
  }

  pub fn handle_event(&mut self, event: &WindowEvent)
  {
    match event
    {
      WindowEvent::CursorMoved { position, .. } =>
      {
        let x = position.x as f32;
        let y = position.y as f32;

        if self.left_held
        {
          self.drag_dx += x - self.mouse_x;
          self.drag_dy += y - self.mouse_y;
        }

        self.mouse_x = x;
        self.mouse_y = y;
      }

      WindowEvent::MouseInput { state, button: MouseButton::Left, .. } =>
      {
        self.left_held = *state == ElementState::Pressed;
      }

      WindowEvent::MouseWheel { delta, .. } => match delta
      {
        MouseScrollDelta::LineDelta(_, y) => self.scroll += *y,
        MouseScrollDelta::PixelDelta(p) => self.scroll += p.y as f32 / PIXELS_PER_LINE,
      },

      WindowEvent::PinchGesture { delta, phase, .. } =>
      {
        if *phase == TouchPhase::Started
        {
          self.pinch_started = true;
          self.pinch = 0.0;
        }

        self.pinch += *delta as f32;
      }

      _ =>
      {}
    }
  }

  pub fn end_frame(&mut self)
  {
    self.drag_dx = 0.0;
    self.drag_dy = 0.0;
    self.scroll = 0.0;
    self.pinch = 0.0;
    self.pinch_started = false;
  }
}
