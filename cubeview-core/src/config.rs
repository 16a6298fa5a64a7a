use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::camera::CameraState;
use crate::error::ConfigError;
use crate::model::ModelKind;

pub const CONFIG_ENV_VAR: &str = "CUBEVIEW_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "cubeview.json";

//
// ──────────────────────────────────────────────────────────────
//   Viewer configuration (JSON, every field optional)
// ──────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig
{
  pub window: WindowConfig,
  pub camera: CameraConfig,
  pub model: ModelKind,
  pub clear_color: [f64; 4],
  /// Rebuild the projection when the viewport changes size. Off by
  /// default: the projection keeps the aspect ratio seen at realize time.
  pub recompute_projection_on_resize: bool,
  /// Scale change per scroll line, for devices without pinch gestures.
  pub scroll_zoom_step: f32,
}

impl Default for ViewerConfig
{
  fn default() -> Self
  {
    Self {
      window: WindowConfig::default(),
      camera: CameraConfig::default(),
      model: ModelKind::default(),
      clear_color: [0.5, 0.5, 0.5, 1.0],
      recompute_projection_on_resize: false,
      scroll_zoom_step: 0.1,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig
{
  pub title: String,
  pub width: u32,
  pub height: u32,
}

impl Default for WindowConfig
{
  fn default() -> Self
  {
    Self { title: "Cubeview".to_owned(), width: 800, height: 600 }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig
{
  pub position: [f32; 3],
  pub focal_point: [f32; 3],
  pub up: [f32; 3],
  pub fov_degrees: f32,
  pub near: f32,
  pub far: f32,
}

impl Default for CameraConfig
{
  fn default() -> Self
  {
    Self {
      position: [1.5, 1.0, 5.0],
      focal_point: [0.0, 0.0, 0.0],
      up: [0.0, 1.0, 0.0],
      fov_degrees: 45.0,
      near: 1.0,
      far: 10.0,
    }
  }
}

impl CameraConfig
{
  pub fn state(&self) -> CameraState
  {
    CameraState::new(
      Vec3::from_array(self.position),
      Vec3::from_array(self.focal_point),
      Vec3::from_array(self.up),
    )
  }
}

//
// ──────────────────────────────────────────────────────────────
//   Loading
// ──────────────────────────────────────────────────────────────
//

impl ViewerConfig
{
  pub fn from_json_str(text: &str) -> Result<Self, ConfigError>
  {
    Ok(serde_json::from_str(text)?)
  }

  pub fn load(path: &Path) -> Result<Self, ConfigError>
  {
    let text = std::fs::read_to_string(path)
      .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;

    Self::from_json_str(&text)
  }

  /// An explicitly named file must load; the fallback file is optional.
  pub fn resolve(explicit: Option<PathBuf>, fallback: &Path) -> Result<Self, ConfigError>
  {
    if let Some(path) = explicit
    {
      log::info!("Loading config from {}", path.display());
      return Self::load(&path);
    }

    if fallback.is_file()
    {
      log::info!("Loading config from {}", fallback.display());
      return Self::load(fallback);
    }

    log::debug!("No config file found, using defaults");
    Ok(Self::default())
  }

  /// `$CUBEVIEW_CONFIG`, then `./cubeview.json`, then defaults.
  pub fn from_environment() -> Result<Self, ConfigError>
  {
    let explicit = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
    Self::resolve(explicit, Path::new(DEFAULT_CONFIG_FILE))
  }
}
