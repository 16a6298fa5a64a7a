//! Camera and transform pipeline for a single-model 3D viewport.
//!
//! Gestures come in through [`Viewport`], which derives model, view and
//! projection matrices and pushes them out through a [`FrameSink`].

pub mod camera;
pub mod config;
pub mod error;
pub mod frame;
pub mod gesture;
pub mod model;
pub mod projection;
pub mod readiness;
pub mod viewport;

pub use camera::{place_camera, CameraState};
pub use config::ViewerConfig;
pub use error::{ConfigError, ModelError, ProjectionError};
pub use frame::{FrameSink, MatrixSlot, MatrixUniforms, Transforms};
pub use model::{Cancellable, Completion, Model, ModelKind, ModelRequest, VertexLayout};
pub use projection::{build_perspective, ProjectionParams};
pub use readiness::Readiness;
pub use viewport::Viewport;
