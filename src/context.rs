use std::sync::Arc;

use anyhow::Context as _;
use winit::window::Window;

use crate::{data_structures::texture::Texture, pipelines::TargetFormat, render::RenderTarget};

/// GPU device, queue and the surface bound to the window (or canvas).
#[derive(Debug)]
pub struct Context {
    pub window: Arc<Window>,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    /// Format and sample count the scene pipelines are built for.
    pub target: TargetFormat,
    pub attachments: Attachments,
    is_surface_configured: bool,
}

impl Context {
    pub async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let size = window.inner_size();

        log::info!("WGPU setup");
        let instance = mk_instance();
        let surface = instance
            .create_surface(window.clone())
            .context("could not create a surface for the window")?;
        let (adapter, device, queue) = request_device(&instance, Some(&surface)).await?;

        let surface_caps = surface.get_capabilities(&adapter);
        // The shaders output linear colour and rely on an sRGB surface to encode it.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("the surface supports no formats on this adapter")?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        let target = TargetFormat::for_adapter(&adapter, surface_format);
        log::info!(
            "surface {:?} at {}x{}, {}x multisampling",
            config.format,
            config.width,
            config.height,
            target.sample_count
        );

        let window_size = [config.width, config.height];
        let attachments = Attachments::new(&device, target, window_size, window_size);

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            target,
            attachments,
            is_surface_configured: false,
        })
    }

    /// Reconfigure the surface at the window's size and rebuild the scene
    /// attachments at `render_size`. A zero-sized window is ignored and
    /// reported with `false`.
    pub fn resize(&mut self, window_size: [u32; 2], render_size: [u32; 2]) -> bool {
        if window_size.contains(&0) || render_size.contains(&0) {
            return false;
        }
        self.config.width = window_size[0];
        self.config.height = window_size[1];
        self.surface.configure(&self.device, &self.config);
        self.attachments = Attachments::new(&self.device, self.target, render_size, window_size);
        self.is_surface_configured = true;
        true
    }

    /// Configure the surface again at its current size, after `Lost`/`Outdated`.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    pub fn is_surface_configured(&self) -> bool {
        self.is_surface_configured
    }
}

/// The scene pass's own textures, sized to the render resolution.
#[derive(Debug)]
pub struct Attachments {
    pub depth: Texture,
    pub msaa: Option<Texture>,
    /// Present when the scene renders below the window resolution; the scene
    /// resolves into it and it is then stretched onto the surface.
    pub scaled: Option<Texture>,
}

impl Attachments {
    pub fn new(
        device: &wgpu::Device,
        target: TargetFormat,
        render_size: [u32; 2],
        window_size: [u32; 2],
    ) -> Self {
        let msaa = (target.sample_count > 1)
            .then(|| Texture::create_msaa_target(device, render_size, target, "msaa_target"));
        let scaled = (render_size != window_size).then(|| {
            Texture::create_scaled_target(device, render_size, target.color, "scaled_target")
        });
        Self {
            depth: Texture::create_depth_texture(
                device,
                render_size,
                target.sample_count,
                "depth_texture",
            ),
            msaa,
            scaled,
        }
    }

    /// Where the scene pass of a frame that is presented on `output` draws.
    pub fn target<'a>(&'a self, output: &'a wgpu::TextureView) -> RenderTarget<'a> {
        let output = self.scaled.as_ref().map_or(output, |scaled| &scaled.view);
        RenderTarget::new(output, self.msaa.as_ref(), &self.depth)
    }
}

pub fn mk_instance() -> wgpu::Instance {
    wgpu::Instance::new(&wgpu::InstanceDescriptor {
        #[cfg(not(target_arch = "wasm32"))]
        backends: wgpu::Backends::PRIMARY,
        #[cfg(target_arch = "wasm32")]
        backends: wgpu::Backends::GL,
        ..Default::default()
    })
}

/// Pick an adapter (compatible with `surface` if given) and open a device on it.
pub async fn request_device(
    instance: &wgpu::Instance,
    surface: Option<&wgpu::Surface<'_>>,
) -> anyhow::Result<(wgpu::Adapter, wgpu::Device, wgpu::Queue)> {
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: surface,
            force_fallback_adapter: false,
        })
        .await
        .context("no suitable graphics adapter found")?;
    log::info!("adapter: {:?}", adapter.get_info());

    let (device, queue) = adapter
        .request_device(
            &wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                // WebGL doesn't support all of wgpu's features, so if
                // we're building for the web we'll have to disable some.
                required_limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults().using_resolution(adapter.limits())
                } else {
                    wgpu::Limits::default()
                },
                memory_hints: Default::default(),
            },
            None,
        )
        .await
        .context("could not open the graphics device")?;

    Ok((adapter, device, queue))
}
