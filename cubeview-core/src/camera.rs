use glam::{Mat4, Vec3};

//
// ──────────────────────────────────────────────────────────────
//   Camera state (right-handed, Y-up)
//
//   The camera never turns: it always looks down -Z from
//   `position`. `focal_point` is carried as state but does not
//   steer the view; zoom dollies relative to `position`.
// ──────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState
{
  pub position: Vec3,
  pub focal_point: Vec3,
  pub up: Vec3,
}

impl CameraState
{
  pub fn new(position: Vec3, focal_point: Vec3, up: Vec3) -> Self
  {
    Self { position, focal_point, up }
  }

  pub fn view_matrix(&self) -> Mat4
  {
    place_camera(self.position, self.up)
  }
}

impl Default for CameraState
{
  fn default() -> Self
  {
    Self::new(default_position(), Vec3::ZERO, Vec3::Y)
  }
}

//
// ──────────────────────────────────────────────────────────────
//   View builder
// ──────────────────────────────────────────────────────────────
//

/// Look-at view for a camera at `position` facing the negated forward
/// axis. The target is derived from the eye, so the camera faces -Z
/// wherever it is placed.
pub fn place_camera(position: Vec3, up_hint: Vec3) -> Mat4
{
  let direction = look_direction();
  let target = position + direction;

  Mat4::look_at_rh(position, target, up_hint)
}

fn look_direction() -> Vec3
{
  (-Vec3::Z).normalize()
}

fn default_position() -> Vec3
{
  Vec3::new(1.5, 1.0, 5.0)
}

#[cfg(test)]
mod tests
{
  use super::*;

  #[test]
  fn place_camera_is_pure()
  {
    let a = place_camera(Vec3::new(1.5, 1.0, 5.0), Vec3::Y);
    let b = place_camera(Vec3::new(1.5, 1.0, 5.0), Vec3::Y);

    assert_eq!(a.to_cols_array(), b.to_cols_array());
  }

  #[test]
  fn eye_maps_to_view_origin()
  {
    let eye = Vec3::new(1.5, 1.0, 5.0);
    let view = place_camera(eye, Vec3::Y);

    assert!(view.transform_point3(eye).abs_diff_eq(Vec3::ZERO, 1e-6));
  }

  #[test]
  fn camera_always_faces_negative_z()
  {
    // Points straight down -Z from the eye land on the view axis,
    // no matter where the eye sits.
    for eye in [Vec3::new(1.5, 1.0, 5.0), Vec3::new(-3.0, 2.0, -7.0), Vec3::ZERO]
    {
      let view = place_camera(eye, Vec3::Y);
      let ahead = view.transform_point3(eye - Vec3::Z * 4.0);

      assert!(ahead.abs_diff_eq(Vec3::new(0.0, 0.0, -4.0), 1e-5), "eye {eye}: {ahead}");
    }
  }

  #[test]
  fn default_state_sits_in_front_of_origin()
  {
    let camera = CameraState::default();

    assert_eq!(camera.position, Vec3::new(1.5, 1.0, 5.0));
    assert_eq!(camera.focal_point, Vec3::ZERO);
    assert_eq!(camera.up, Vec3::Y);
  }
}
