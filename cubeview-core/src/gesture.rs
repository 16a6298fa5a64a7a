use glam::{Mat4, Vec3, Vec4};

use crate::camera::{place_camera, CameraState};

//
// ──────────────────────────────────────────────────────────────
//   Constants
// ──────────────────────────────────────────────────────────────
//

// Below this the composed transform is treated as singular
const SINGULAR_DETERMINANT: f32 = 1e-12;

//
// ──────────────────────────────────────────────────────────────
//   Zoom: dolly along +Z from the baseline position
// ──────────────────────────────────────────────────────────────
//

/// View matrix for a zoom gesture at `scale_delta` (1.0 = gesture start).
///
/// The offset is added to the baseline position as is, so 1.0 still
/// dollies the camera one unit along +Z. The baseline is not moved,
/// which makes repeated events with the same scale idempotent.
pub fn zoom_view(camera: &CameraState, scale_delta: f32) -> Mat4
{
  let offset = Vec3::new(0.0, 0.0, scale_delta);
  place_camera(camera.position + offset, camera.up)
}

//
// ──────────────────────────────────────────────────────────────
//   Drag: screen-space offset → object-space rotation
// ──────────────────────────────────────────────────────────────
//

/// Incremental rotation of `model` for a drag of (`offset_x`, `offset_y`).
///
/// The offset is pulled back through the inverse of the full transform so
/// the rotation follows the current camera orientation. Returns `None` when
/// the composed matrix is singular or the offset maps to nothing.
pub fn drag_rotation(
  model: Mat4,
  view: Mat4,
  projection: Mat4,
  offset_x: f32,
  offset_y: f32,
) -> Option<Mat4>
{
  let full = projection * view * model;

  if !is_invertible(&full)
  {
    return None;
  }

  let pulled_back = full.inverse() * Vec4::new(offset_x, offset_y, 0.0, 0.0);
  let direction = pulled_back.try_normalize()?;

  Some(rotate_y_then_x(model, direction.x, direction.y))
}

/// Applies a rotation about Y, then one about X, on top of `model`.
pub fn rotate_y_then_x(model: Mat4, angle_y: f32, angle_x: f32) -> Mat4
{
  let rotated = Mat4::from_rotation_y(angle_y) * model;
  Mat4::from_rotation_x(angle_x) * rotated
}

fn is_invertible(m: &Mat4) -> bool
{
  let det = m.determinant();
  det.is_finite() && det.abs() > SINGULAR_DETERMINANT
}
