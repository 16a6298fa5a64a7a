mod core;
mod depth;
mod mesh;

pub use self::core::Renderer;
