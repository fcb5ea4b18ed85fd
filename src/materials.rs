//! The three shared materials and their assignment to model nodes by name.
//!
//! Exactly one material of each kind exists. Nodes that match a rule point at
//! it through [`SceneNode::material`](crate::data_structures::scene_graph::SceneNode);
//! everything else keeps the colour it was loaded with.

use crate::{
    config::SceneConfig,
    data_structures::{scene_graph::SceneGraph, texture::Texture},
    pipelines::{
        MaterialLayouts, baked::BakedMaterial, flat::FlatMaterial, portal::PortalMaterial,
    },
    scene::SceneState,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MaterialKind {
    /// Unlit, textured with the baked lighting image.
    Baked,
    /// Unlit flat warm yellow.
    PoleLight,
    /// The animated noise shader.
    PortalLight,
}

/// The material a node named `name` receives, if any.
///
/// Rules are checked in order and a later match overrides an earlier one:
/// exact `baked`, then any name containing `poleLight`, then exact
/// `portalLight`. Matching is case-sensitive.
pub fn classify(name: &str) -> Option<MaterialKind> {
    let mut kind = None;
    if name == "baked" {
        kind = Some(MaterialKind::Baked);
    }
    if name.contains("poleLight") {
        kind = Some(MaterialKind::PoleLight);
    }
    if name == "portalLight" {
        kind = Some(MaterialKind::PortalLight);
    }
    kind
}

/// Assign the shared materials to the model's top-level children.
///
/// Only the direct children of the root are inspected. Returns how many
/// children received a material. Running it again changes nothing.
pub fn assign_materials(graph: &mut SceneGraph) -> usize {
    let mut assigned = 0;
    for child in graph.children.iter_mut() {
        if let Some(kind) = classify(&child.name) {
            log::debug!("node {} gets the {:?} material", child.name, kind);
            child.material = Some(kind);
            assigned += 1;
        }
    }
    log::info!(
        "assigned materials to {} of {} top-level nodes",
        assigned,
        graph.children.len()
    );
    assigned
}

/// GPU side of the shared materials.
#[derive(Debug)]
pub struct Materials {
    pub baked: BakedMaterial,
    pub pole_light: FlatMaterial,
    pub portal: PortalMaterial,
}

impl Materials {
    /// The baked material starts with a white placeholder until the real
    /// texture arrives through [`Materials::set_baked_texture`].
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layouts: &MaterialLayouts,
        config: &SceneConfig,
        scene: &SceneState,
    ) -> Self {
        let placeholder = Texture::create_placeholder([255, 255, 255, 255], device, queue);
        let [r, g, b] = config.pole_light_color.to_linear();
        Self {
            baked: BakedMaterial::new(device, &layouts.texture, placeholder),
            pole_light: FlatMaterial::new(device, &layouts.uniform, [r, g, b, 1.0]),
            portal: PortalMaterial::new(device, &layouts.uniform, scene.portal),
        }
    }

    pub fn set_baked_texture(
        &mut self,
        device: &wgpu::Device,
        layouts: &MaterialLayouts,
        texture: Texture,
    ) {
        self.baked = BakedMaterial::new(device, &layouts.texture, texture);
    }

    /// Upload the per-frame portal uniform.
    pub fn write(&self, queue: &wgpu::Queue, scene: &SceneState) {
        self.portal.write(queue, &scene.portal);
    }

    pub fn bind_group(&self, kind: MaterialKind) -> &wgpu::BindGroup {
        match kind {
            MaterialKind::Baked => &self.baked.bind_group,
            MaterialKind::PoleLight => &self.pole_light.bind_group,
            MaterialKind::PortalLight => &self.portal.bind_group,
        }
    }
}
