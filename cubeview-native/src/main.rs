mod app;
mod input;
mod renderer;

use anyhow::Context;
use cubeview_core::ViewerConfig;

fn main() -> anyhow::Result<()>
{
  // wgpu validation errors and warnings go through `log`.
  // Override with RUST_LOG, e.g. RUST_LOG=debug or RUST_LOG=wgpu=debug.
  let env = env_logger::Env::default().default_filter_or("info,wgpu_hal=off,naga=warn");
  env_logger::Builder::from_env(env).init();

  let config = ViewerConfig::from_environment().context("Failed to load viewer configuration")?;

  app::run(config)
}
