use std::sync::Arc;

use anyhow::Context;
use cubeview_core::{
  Cancellable, Completion, FrameSink, MatrixSlot, Model, ModelError, ModelRequest, ViewerConfig,
  Viewport,
};
use glam::Mat4;
use winit::{
  application::ApplicationHandler,
  dpi::LogicalSize,
  event::WindowEvent,
  event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy},
  window::{Window, WindowId},
};

use crate::input::gesture_control::apply_input_to_viewport;
use crate::input::InputState;
use crate::renderer::Renderer;

pub fn run(config: ViewerConfig) -> anyhow::Result<()>
{
  let event_loop =
    EventLoop::<AppEvent>::with_user_event().build().context("Failed to create event loop")?;
  let mut app = CubeviewApp::new(config, event_loop.create_proxy());

  event_loop.run_app(&mut app).context("Event loop failed")?;

  match app.fatal.take()
  {
    Some(error) => Err(error),
    None => Ok(()),
  }
}

/// Work posted back onto the event loop.
pub enum AppEvent
{
  ModelRequested(ModelRequest),
}

//
// ──────────────────────────────────────────────────────────────
//   Frame sink: renderer uniforms + window redraw
// ──────────────────────────────────────────────────────────────
//

struct FrameTarget<'a>
{
  renderer: Option<&'a Renderer>,
  window: &'a Window,
}

impl FrameSink for FrameTarget<'_>
{
  fn upload_matrix(&mut self, slot: MatrixSlot, matrix: &Mat4)
  {
    if let Some(renderer) = self.renderer
    {
      renderer.upload_matrix(slot, matrix);
    }
  }

  fn request_redraw(&mut self)
  {
    self.window.request_redraw();
  }
}

//
// ──────────────────────────────────────────────────────────────
//   Application
// ──────────────────────────────────────────────────────────────
//

struct CubeviewApp
{
  config: ViewerConfig,
  proxy: EventLoopProxy<AppEvent>,

  window: Option<Arc<Window>>,
  renderer: Option<Renderer>,
  viewport: Viewport,
  model: Option<Model>,
  pending_load: Option<Cancellable>,
  input: InputState,

  fatal: Option<anyhow::Error>,
}

impl CubeviewApp
{
  fn new(config: ViewerConfig, proxy: EventLoopProxy<AppEvent>) -> Self
  {
    let viewport = Viewport::new(&config);

    Self {
      config,
      proxy,
      window: None,
      renderer: None,
      viewport,
      model: None,
      pending_load: None,
      input: InputState::new(),
      fatal: None,
    }
  }

  fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error)
  {
    log::error!("{error:#}");
    self.fatal = Some(error);
    self.teardown();
    event_loop.exit();
  }

  //
  // ── Window and surface lifecycle ────────────────────────────
  //

  fn init_window(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<Arc<Window>>
  {
    if let Some(window) = &self.window
    {
      return Ok(window.clone());
    }

    let attrs = Window::default_attributes()
      .with_title(self.config.window.title.clone())
      .with_inner_size(LogicalSize::new(self.config.window.width, self.config.window.height));
    let window = Arc::new(event_loop.create_window(attrs).context("Failed to create window")?);

    self.window = Some(window.clone());
    self.request_model();

    Ok(window)
  }

  fn realize_surface(&mut self, window: Arc<Window>) -> anyhow::Result<()>
  {
    let renderer = pollster::block_on(Renderer::new(window.clone(), self.config.clear_color))?;
    self.renderer = Some(renderer);

    let size = window.inner_size();
    let entered_ready = self
      .viewport
      .surface_realized(size.width, size.height)
      .context("Cannot build projection for the surface")?;

    if entered_ready
    {
      self.setup_frame();
    }

    Ok(())
  }

  fn unrealize_surface(&mut self)
  {
    if self.renderer.take().is_none()
    {
      log::warn!("Surface unrealized before it was realized");
    }

    self.viewport.surface_unrealized();
    log::info!("Surface unrealized");
  }

  /// Cancel outstanding work first, then release GPU state, then the window.
  fn teardown(&mut self)
  {
    if let Some(pending) = self.pending_load.take()
    {
      pending.cancel();
    }

    if self.renderer.is_some()
    {
      self.unrealize_surface();
    }

    self.window = None;
  }

  //
  // ── Model loading ───────────────────────────────────────────
  //

  fn request_model(&mut self)
  {
    if self.model.is_some() || self.pending_load.is_some()
    {
      return;
    }

    let request = ModelRequest::new(self.config.model);
    let cancellable = request.cancellable();

    match self.proxy.send_event(AppEvent::ModelRequested(request))
    {
      Ok(()) =>
      {
        log::debug!("Requested {:?} model", self.config.model);
        self.pending_load = Some(cancellable);
      }
      Err(_) => log::warn!("Event loop closed, model request dropped"),
    }
  }

  fn complete_model(&mut self, request: ModelRequest)
  {
    // The token is spent once the request comes back
    self.pending_load = None;

    let mut outcome = None;
    if request.complete(|result| outcome = Some(result)) == Completion::Cancelled
    {
      log::info!("Model load cancelled");
      return;
    }

    if let Some(result) = outcome
    {
      self.on_model_built(result);
    }
  }

  fn on_model_built(&mut self, result: Result<Model, ModelError>)
  {
    let model = match result
    {
      Ok(model) => model,
      Err(e) =>
      {
        log::warn!("Failed to build model, continuing without one: {e}");
        return;
      }
    };

    log::info!(
      "{:?} model ready: {} vertices, {} indices",
      model.kind(),
      model.vertex_count(),
      model.index_count()
    );
    self.model = Some(model);

    if self.viewport.model_loaded()
    {
      self.setup_frame();
    }
  }

  //
  // ── Rendering ───────────────────────────────────────────────
  //

  /// Runs once per entry into readiness: surface and model both exist.
  fn setup_frame(&mut self)
  {
    let (Some(window), Some(renderer), Some(model)) =
      (&self.window, &mut self.renderer, &self.model)
    else
    {
      return;
    };

    renderer.prepare_model(model);

    let mut target = FrameTarget { renderer: Some(&*renderer), window };
    self.viewport.upload_all(&mut target);
    target.request_redraw();

    log::info!("Viewport ready");
  }

  fn redraw(&mut self)
  {
    if let Some(renderer) = &mut self.renderer
    {
      let handled = renderer.render();
      log::trace!("Render pass handled: {handled}");
    }
  }

  fn handle_window_event(&mut self, elwt: &ActiveEventLoop, window_id: WindowId, event: WindowEvent)
  {
    let window = match &self.window
    {
      Some(w) if w.id() == window_id => w.clone(),
      _ => return,
    };

    self.input.handle_event(&event);

    match event
    {
      WindowEvent::CloseRequested =>
      {
        self.teardown();
        elwt.exit();
      }

      WindowEvent::Resized(size) =>
      {
        if size.width == 0 || size.height == 0
        {
          return;
        }

        if let Some(renderer) = &mut self.renderer
        {
          renderer.resize(size.width, size.height);
        }

        let mut target = FrameTarget { renderer: self.renderer.as_ref(), window: &window };
        if let Err(e) = self.viewport.resized(size.width, size.height, &mut target)
        {
          log::warn!("Keeping previous projection: {e}");
        }

        window.request_redraw();
      }

      WindowEvent::RedrawRequested => self.redraw(),

      _ =>
      {}
    }
  }

  fn frame(&mut self)
  {
    if let Some(window) = &self.window
    {
      let size = window.inner_size();
      let mut target = FrameTarget { renderer: self.renderer.as_ref(), window };

      apply_input_to_viewport(
        &mut self.input,
        &mut self.viewport,
        &mut target,
        size.width,
        size.height,
        self.config.scroll_zoom_step,
      );
    }

    self.input.end_frame();
  }
}

impl ApplicationHandler<AppEvent> for CubeviewApp
{
  fn resumed(&mut self, event_loop: &ActiveEventLoop)
  {
    event_loop.set_control_flow(ControlFlow::Wait);

    let realized = self.init_window(event_loop).and_then(|window| self.realize_surface(window));

    if let Err(e) = realized
    {
      self.fail(event_loop, e.context("Failed to initialize rendering surface"));
    }
  }

  fn suspended(&mut self, _event_loop: &ActiveEventLoop)
  {
    if self.renderer.is_some()
    {
      self.unrealize_surface();
    }
  }

  fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: AppEvent)
  {
    match event
    {
      AppEvent::ModelRequested(request) => self.complete_model(request),
    }
  }

  fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent)
  {
    self.handle_window_event(event_loop, window_id, event);
  }

  fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop)
  {
    self.frame();
  }
}
