//! portal-scene
//!
//! An interactive 3D scene: a baked-lighting model of a portal in a clearing,
//! an animated noise shader on the portal surface, glowing pole lights and a
//! field of fireflies, viewed through an orbit camera. A collapsible debug
//! panel edits the portal colours, the background and the firefly size live.
//! Runs as a native window or in a browser canvas (WebGL2).
//!
//! High-level modules
//! - `flow`: the winit event loop, asset loading and the entry points
//! - `context`: GPU device, queue and the window surface
//! - `scene`: CPU-side scene state (camera, uniforms, clear colour)
//! - `animation` / `clock`: the per-frame loop and its time source
//! - `camera`: orbit camera, projection and the damped orbit controls
//! - `materials`: the three shared materials and their assignment by node name
//! - `data_structures`: meshes, textures, instances, the scene graph, fireflies
//! - `pipelines`: render pipelines and their WGSL shaders
//! - `render`: batching of scene nodes into pipelines and the frame renderer
//! - `resources`: loading of the model and the texture from disk or over HTTP
//! - `debug` / `gui`: the debug panel and its egui integration
//! - `config` / `color`: scene configuration and hex colour handling

pub mod animation;
pub mod camera;
pub mod clock;
pub mod color;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod debug;
pub mod flow;
pub mod gui;
pub mod materials;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod scene;

pub use config::SceneConfig;
pub use flow::{run, run_with};
