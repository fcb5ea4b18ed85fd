//! CPU-side state of the scene.
//!
//! Everything the animation loop, the resize handler and the debug panel
//! mutate lives in [`SceneState`]. The renderer only reads it and uploads the
//! uniforms once per frame, so the whole state is testable without a GPU.

use cgmath::Deg;

use crate::{
    camera::{Camera, CameraController, Projection},
    color::Color,
    config::SceneConfig,
};

/// Uniforms of the portal shader material.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PortalUniform {
    pub color_start: [f32; 3],
    pub time: f32,
    pub color_end: [f32; 3],
    // Due to uniforms requiring 16 byte (4 float) spacing, we need to use a padding field here
    _padding: u32,
}

impl PortalUniform {
    pub fn new(color_start: Color, color_end: Color) -> Self {
        Self {
            color_start: color_start.to_linear(),
            time: 0.0,
            color_end: color_end.to_linear(),
            _padding: 0,
        }
    }
}

/// Uniforms of the firefly point sprites.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FirefliesUniform {
    pub time: f32,
    pub pixel_ratio: f32,
    pub size: f32,
    _padding: u32,
    /// Surface size in pixels; turns sprite sizes into clip-space offsets.
    pub resolution: [f32; 2],
    _padding2: [u32; 2],
}

impl FirefliesUniform {
    pub fn new(size: f32, pixel_ratio: f32, width: u32, height: u32) -> Self {
        Self {
            time: 0.0,
            pixel_ratio,
            size,
            _padding: 0,
            resolution: [width.max(1) as f32, height.max(1) as f32],
            _padding2: [0; 2],
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneState {
    pub camera: Camera,
    pub controller: CameraController,
    pub projection: Projection,
    pub portal: PortalUniform,
    pub fireflies: FirefliesUniform,
    pub clear_color: Color,
    /// Size the scene renders at, in pixels. Equals the window size unless the
    /// display's scale factor exceeds the pixel-ratio cap.
    pub render_size: (u32, u32),
    max_pixel_ratio: f32,
}

impl SceneState {
    /// `width` and `height` are the window's physical size.
    pub fn new(config: &SceneConfig, width: u32, height: u32, scale_factor: f64) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let pixel_ratio = clamp_pixel_ratio(scale_factor, config.max_pixel_ratio);
        let (render_width, render_height) =
            render_size(width, height, scale_factor, config.max_pixel_ratio);
        let mut controller = CameraController::new(config.enable_damping, config.damping_factor);
        controller.set_viewport_height(height);
        Self {
            camera: Camera::new(config.camera_position, config.camera_target),
            controller,
            projection: Projection::new(
                render_width,
                render_height,
                Deg(config.fovy),
                config.znear,
                config.zfar,
            ),
            portal: PortalUniform::new(config.portal_color_start, config.portal_color_end),
            fireflies: FirefliesUniform::new(
                config.fireflies_size,
                pixel_ratio,
                render_width,
                render_height,
            ),
            clear_color: config.clear_color,
            render_size: (render_width, render_height),
            max_pixel_ratio: config.max_pixel_ratio,
        }
    }

    /// Both time uniforms advance together from one clock read.
    pub fn set_time(&mut self, elapsed: f32) {
        self.portal.time = elapsed;
        self.fireflies.time = elapsed;
    }

    /// Apply damping and pending input to the camera.
    pub fn update_controls(&mut self) {
        self.controller.update(&mut self.camera, &self.projection);
    }

    /// The window changed size or moved to a display with another scale factor.
    /// Returns false for a zero-sized window, which is ignored.
    pub fn resize(&mut self, width: u32, height: u32, scale_factor: f64) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        let (render_width, render_height) =
            render_size(width, height, scale_factor, self.max_pixel_ratio);
        self.projection.resize(render_width, render_height);
        // Pointer positions stay in window pixels.
        self.controller.set_viewport_height(height);
        self.render_size = (render_width, render_height);
        self.fireflies.resolution = [render_width as f32, render_height as f32];
        self.fireflies.pixel_ratio = clamp_pixel_ratio(scale_factor, self.max_pixel_ratio);
        true
    }
}

pub fn clamp_pixel_ratio(scale_factor: f64, max: f32) -> f32 {
    (scale_factor as f32).min(max)
}

/// Size of the drawing surface for a window of `width`×`height` physical pixels.
///
/// Up to `max_pixel_ratio` the surface matches the window. Above it the scene
/// renders at the capped ratio and is scaled up on presentation, so the
/// surface resolution always agrees with the pixel-ratio uniform.
pub fn render_size(width: u32, height: u32, scale_factor: f64, max_pixel_ratio: f32) -> (u32, u32) {
    let ratio = clamp_pixel_ratio(scale_factor, max_pixel_ratio) as f64;
    if scale_factor <= 0.0 || ratio >= scale_factor {
        return (width, height);
    }
    let shrink = ratio / scale_factor;
    let scaled = |v: u32| ((v as f64 * shrink).round() as u32).max(1);
    (scaled(width), scaled(height))
}
