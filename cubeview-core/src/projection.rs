use glam::Mat4;

use crate::error::ProjectionError;

//
// ──────────────────────────────────────────────────────────────
//   Projection parameters
// ──────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionParams
{
  pub fov_degrees: f32,
  pub aspect_ratio: f32,
  pub near: f32,
  pub far: f32,
}

impl ProjectionParams
{
  /// Captures the aspect ratio of a `width` x `height` pixel viewport.
  pub fn from_extent(
    fov_degrees: f32,
    width: u32,
    height: u32,
    near: f32,
    far: f32,
  ) -> Result<Self, ProjectionError>
  {
    if width == 0 || height == 0
    {
      return Err(ProjectionError::EmptyViewport { width, height });
    }

    Ok(Self { fov_degrees, aspect_ratio: width as f32 / height as f32, near, far })
  }

  pub fn build(&self) -> Result<Mat4, ProjectionError>
  {
    build_perspective(self.fov_degrees, self.aspect_ratio, self.near, self.far)
  }
}

//
// ──────────────────────────────────────────────────────────────
//   Perspective builder
// ──────────────────────────────────────────────────────────────
//

/// Right-handed perspective projection with a [0, 1] depth range.
pub fn build_perspective(
  fov_degrees: f32,
  aspect_ratio: f32,
  near: f32,
  far: f32,
) -> Result<Mat4, ProjectionError>
{
  if !(fov_degrees > 0.0 && fov_degrees < 180.0)
  {
    return Err(ProjectionError::InvalidFov(fov_degrees));
  }

  if !(aspect_ratio.is_finite() && aspect_ratio > 0.0)
  {
    return Err(ProjectionError::InvalidAspect(aspect_ratio));
  }

  if !(near > 0.0 && near < far && far.is_finite())
  {
    return Err(ProjectionError::InvalidPlanes { near, far });
  }

  Ok(Mat4::perspective_rh(fov_degrees.to_radians(), aspect_ratio, near, far))
}
