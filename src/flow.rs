//! Application event loop.
//!
//! [`App`] is the winit [`ApplicationHandler`]. It owns the GPU context, the
//! scene state and the animation loop, and drives one frame per
//! `RedrawRequested`.
//!
//! # Lifecycle
//!
//! 1. `resumed` creates the window and the GPU context (blocking on native,
//!    through a spawned future and [`AppEvent::Initialized`] on the web)
//! 2. the baked texture and the model start loading in the background
//! 3. every redraw ticks the animation loop, runs the debug panel, renders
//!    and schedules the next redraw
//! 4. loaded assets arrive as [`AppEvent`]s and are uploaded on this thread

use std::{iter, sync::Arc};

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy},
    window::{Window, WindowId},
};

use crate::{
    animation::AnimationLoop,
    clock::SystemClock,
    config::SceneConfig,
    context::Context,
    data_structures::{fireflies::FireflyField, scene_graph::SceneGraph, texture::Texture},
    debug::DebugPanel,
    gui::Gui,
    materials::assign_materials,
    render::Renderer,
    resources::{self, GltfData},
    scene::SceneState,
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Id of the canvas element the scene renders into on the web.
pub const CANVAS_ID: &str = "canvas";

/// Results of background work, delivered through the event loop.
#[derive(Debug)]
pub enum AppEvent {
    /// The GPU context finished initialising (web only, native blocks instead).
    #[cfg(target_arch = "wasm32")]
    Initialized(Context),
    TextureLoaded(image::DynamicImage),
    ModelLoaded(GltfData),
}

/// Everything that exists once the GPU context is up.
struct AppState {
    ctx: Context,
    renderer: Renderer,
    gui: Gui,
    scene: SceneState,
    model: Option<SceneGraph>,
}

impl AppState {
    fn new(ctx: Context, config: &SceneConfig) -> Self {
        let scale_factor = ctx.window.scale_factor();
        let scene = SceneState::new(config, ctx.config.width, ctx.config.height, scale_factor);
        let field = FireflyField::new(config.fireflies_count);
        log::info!("generated {} fireflies", field.len());
        let renderer = Renderer::new(
            &ctx.device,
            &ctx.queue,
            ctx.target,
            config,
            &scene,
            &field,
        );
        let gui = Gui::new(&ctx.window, &ctx.device, ctx.config.format);
        Self {
            ctx,
            renderer,
            gui,
            scene,
            model: None,
        }
    }

    fn resize(&mut self, width: u32, height: u32, scale_factor: f64) {
        if !self.scene.resize(width, height, scale_factor) {
            log::debug!("ignoring resize to {}x{}", width, height);
            return;
        }
        let (render_width, render_height) = self.scene.render_size;
        self.ctx.resize([width, height], [render_width, render_height]);
        if [render_width, render_height] != [width, height] {
            log::info!(
                "rendering at {}x{} for a {}x{} window",
                render_width,
                render_height,
                width,
                height
            );
        }
    }

    fn on_texture_loaded(&mut self, img: image::DynamicImage) {
        let texture = Texture::from_image(&self.ctx.device, &self.ctx.queue, &img, Some("baked"));
        self.renderer
            .materials
            .set_baked_texture(&self.ctx.device, &self.renderer.layouts, texture);
        log::info!("baked texture uploaded");
    }

    fn on_model_loaded(&mut self, data: GltfData) {
        let mut graph = match SceneGraph::from_gltf(&data, &self.ctx.device) {
            Ok(graph) => graph,
            Err(e) => {
                log::error!("could not build the scene from {}: {:#}", data.name, e);
                return;
            }
        };
        assign_materials(&mut graph);
        graph.write_to_buffers(&self.ctx.device, &self.renderer.layouts.uniform);
        log::info!("model {} added to the scene", data.name);
        self.model = Some(graph);
    }

    fn render(&mut self, panel: &mut DebugPanel) -> Result<(), wgpu::SurfaceError> {
        if !self.ctx.is_surface_configured() {
            return Ok(());
        }
        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let size = [self.ctx.config.width, self.ctx.config.height];
        let scene = &mut self.scene;
        let frame = self
            .gui
            .run(&self.ctx.window, size, |ctx| panel.show(ctx, scene));

        self.renderer.prepare(&self.ctx.queue, &self.scene);
        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        let attachments = &self.ctx.attachments;
        self.renderer.render(
            &mut encoder,
            &attachments.target(&view),
            &self.scene,
            self.model.as_ref(),
        );
        if let Some(scaled) = &attachments.scaled {
            self.renderer
                .upscaler
                .draw(&self.ctx.device, &mut encoder, &scaled.view, &view);
        }
        let gui_buffers =
            self.gui
                .paint(&self.ctx.device, &self.ctx.queue, &mut encoder, &view, frame);

        self.ctx
            .queue
            .submit(gui_buffers.into_iter().chain(iter::once(encoder.finish())));
        output.present();
        Ok(())
    }
}

pub struct App {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    proxy: EventLoopProxy<AppEvent>,
    config: SceneConfig,
    state: Option<AppState>,
    panel: DebugPanel,
    animation: AnimationLoop<SystemClock>,
    initializing: bool,
    startup_error: Option<anyhow::Error>,
}

impl App {
    fn new(event_loop: &EventLoop<AppEvent>, config: SceneConfig) -> anyhow::Result<Self> {
        let proxy = event_loop.create_proxy();
        #[cfg(not(target_arch = "wasm32"))]
        let async_runtime = tokio::runtime::Runtime::new()?;
        let panel = DebugPanel::new(&config);
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime,
            proxy,
            config,
            state: None,
            panel,
            animation: AnimationLoop::new(SystemClock::new()),
            initializing: false,
            startup_error: None,
        })
    }

    fn init(&mut self, ctx: Context) {
        let mut state = AppState::new(ctx, &self.config);
        let size = state.ctx.window.inner_size();
        let scale_factor = state.ctx.window.scale_factor();
        state.resize(size.width, size.height, scale_factor);
        state.ctx.window.request_redraw();
        self.state = Some(state);
        self.initializing = false;
        self.spawn_loads();
        log::info!("scene initialised");
    }

    /// Start the texture and model loads. Each reports back on its own.
    fn spawn_loads(&self) {
        let texture_file = self.config.baked_texture_file.clone();
        let proxy = self.proxy.clone();
        self.spawn(async move {
            match resources::load_image(&texture_file).await {
                Ok(img) => send(&proxy, AppEvent::TextureLoaded(img)),
                Err(e) => log::error!("could not load texture {}: {:#}", texture_file, e),
            }
        });

        let model_file = self.config.model_file.clone();
        let proxy = self.proxy.clone();
        self.spawn(async move {
            match resources::load_gltf(&model_file).await {
                Ok(data) => send(&proxy, AppEvent::ModelLoaded(data)),
                Err(e) => log::error!("could not load model {}: {:#}", model_file, e),
            }
        });
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn spawn<F: Future<Output = ()> + Send + 'static>(&self, fut: F) {
        self.async_runtime.spawn(fut);
    }

    #[cfg(target_arch = "wasm32")]
    fn spawn<F: Future<Output = ()> + 'static>(&self, fut: F) {
        wasm_bindgen_futures::spawn_local(fut);
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("startup failed: {:#}", error);
        self.startup_error = Some(error);
        event_loop.exit();
    }
}

fn send(proxy: &EventLoopProxy<AppEvent>, event: AppEvent) {
    if proxy.send_event(event).is_err() {
        log::warn!("event loop closed before a loaded asset could be delivered");
    }
}

impl ApplicationHandler<AppEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() || self.initializing {
            return;
        }

        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title("Portal");

        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            let canvas = web_sys::window()
                .and_then(|window| window.document())
                .and_then(|document| document.get_element_by_id(CANVAS_ID));
            match canvas {
                Some(canvas) => {
                    window_attributes =
                        window_attributes.with_canvas(Some(canvas.unchecked_into()));
                }
                None => log::warn!("no #{} element, a new canvas is appended", CANVAS_ID),
            }
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.into()),
        };
        self.initializing = true;

        #[cfg(not(target_arch = "wasm32"))]
        {
            match self.async_runtime.block_on(Context::new(window)) {
                Ok(ctx) => self.init(ctx),
                Err(e) => self.fail(event_loop, e),
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match Context::new(window).await {
                    Ok(ctx) => send(&proxy, AppEvent::Initialized(ctx)),
                    Err(e) => log::error!("startup failed: {:#}", e),
                }
            });
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: AppEvent) {
        match event {
            #[cfg(target_arch = "wasm32")]
            AppEvent::Initialized(ctx) => self.init(ctx),
            AppEvent::TextureLoaded(img) => match &mut self.state {
                Some(state) => state.on_texture_loaded(img),
                None => log::warn!("texture arrived before the GPU context"),
            },
            AppEvent::ModelLoaded(data) => match &mut self.state {
                Some(state) => state.on_model_loaded(data),
                None => log::warn!("model arrived before the GPU context"),
            },
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        // The panel gets first pick; the orbit controls only see what it leaves.
        let consumed = state.gui.handle_event(&state.ctx.window, &event);
        if !consumed {
            state.scene.controller.handle_window_events(&event);
        }

        match event {
            WindowEvent::CloseRequested => {
                self.animation.stop();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                let scale_factor = state.ctx.window.scale_factor();
                state.resize(size.width, size.height, scale_factor);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                let size = state.ctx.window.inner_size();
                state.resize(size.width, size.height, scale_factor);
            }
            WindowEvent::RedrawRequested => {
                if self.animation.tick(&mut state.scene).is_none() {
                    return;
                }
                match state.render(&mut self.panel) {
                    Ok(()) => {}
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        state.ctx.reconfigure();
                    }
                    Err(e) => {
                        log::error!("Unable to render {}", e);
                    }
                }
                state.ctx.window.request_redraw();
            }
            _ => {}
        }
    }
}

/// Run the portal scene with the default configuration.
pub fn run() -> anyhow::Result<()> {
    run_with(SceneConfig::default())
}

pub fn run_with(config: SceneConfig) -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            eprintln!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        console_log::init_with_level(log::Level::Info)?;
    }

    let event_loop: EventLoop<AppEvent> = EventLoop::with_user_event().build()?;
    let mut app = App::new(&event_loop, config)?;

    event_loop.run_app(&mut app)?;

    match app.startup_error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn run_web() -> Result<(), JsValue> {
    run().map_err(|e| JsValue::from_str(&format!("{e:#}")))
}
