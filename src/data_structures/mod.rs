//! Scene data structures: meshes, textures, instances, the loaded scene graph
//! and the firefly field.
//!
//! - `model` holds vertex layouts and GPU meshes
//! - `texture` wraps GPU textures (colour maps, depth)
//! - `instance` holds per-node transformation data
//! - `scene_graph` is the loaded model: named nodes with material slots
//! - `fireflies` generates the particle field's attribute buffers

pub mod fireflies;
pub mod instance;
pub mod model;
pub mod scene_graph;
pub mod texture;
