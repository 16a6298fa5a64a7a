use std::collections::TryReserveError;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError
{
  #[error("failed to allocate {what} for model")]
  Allocation
  {
    what: &'static str,
    #[source]
    source: TryReserveError,
  },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError
{
  #[error("viewport has no extent ({width}x{height})")]
  EmptyViewport
  {
    width: u32,
    height: u32,
  },

  #[error("aspect ratio must be positive and finite, got {0}")]
  InvalidAspect(f32),

  #[error("field of view must lie in (0, 180) degrees, got {0}")]
  InvalidFov(f32),

  #[error("clip planes must satisfy 0 < near < far, got near={near} far={far}")]
  InvalidPlanes
  {
    near: f32,
    far: f32,
  },
}

#[derive(Debug, Error)]
pub enum ConfigError
{
  #[error("failed to read config file {}", path.display())]
  Io
  {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse config")]
  Parse(#[from] serde_json::Error),
}
