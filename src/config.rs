//! Scene configuration.
//!
//! Every tunable constant of the scene lives in [`SceneConfig`]. The defaults
//! reproduce the portal scene; `flow::run_with` accepts a modified copy.

use std::ops::RangeInclusive;

use crate::color::Color;

/// Start values and limits for the whole scene.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneConfig {
    /// Number of fireflies in the particle field.
    pub fireflies_count: usize,
    /// Initial value of the firefly size uniform.
    pub fireflies_size: f32,
    /// Range the debug panel clamps the firefly size to.
    pub fireflies_size_range: RangeInclusive<f32>,
    pub fireflies_size_step: f32,
    /// Upper bound for the device pixel ratio fed into the shaders.
    pub max_pixel_ratio: f32,
    pub portal_color_start: Color,
    pub portal_color_end: Color,
    pub pole_light_color: Color,
    pub clear_color: Color,
    pub camera_position: [f32; 3],
    pub camera_target: [f32; 3],
    /// Vertical field of view in degrees.
    pub fovy: f32,
    pub znear: f32,
    pub zfar: f32,
    pub enable_damping: bool,
    pub damping_factor: f32,
    /// Model file, resolved relative to the assets directory.
    pub model_file: String,
    /// Baked lighting texture, resolved relative to the assets directory.
    pub baked_texture_file: String,
    /// Whether the debug panel starts expanded.
    pub debug_panel_open: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            fireflies_count: 30,
            fireflies_size: 100.0,
            fireflies_size_range: 0.0..=500.0,
            fireflies_size_step: 1.0,
            max_pixel_ratio: 2.0,
            portal_color_start: Color::from_srgb(0x80, 0x06, 0xff),
            portal_color_end: Color::from_srgb(0x99, 0xff, 0xff),
            pole_light_color: Color::from_srgb(0xff, 0xbc, 0x1d),
            clear_color: Color::from_srgb(0x33, 0x00, 0x66),
            camera_position: [4.0, 2.0, 4.0],
            camera_target: [0.0, 0.0, 0.0],
            fovy: 45.0,
            znear: 0.1,
            zfar: 100.0,
            enable_damping: true,
            damping_factor: 0.05,
            model_file: "portal.glb".to_string(),
            baked_texture_file: "baked.jpg".to_string(),
            debug_panel_open: false,
        }
    }
}
