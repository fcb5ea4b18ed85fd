//! The loaded model as a tree of named nodes.
//!
//! A [`SceneGraph`] is the root's list of top-level children. Every
//! [`SceneNode`] carries its local transform, its meshes, the base colour the
//! file gave it and an optional shared material assigned by name. GPU buffers
//! are attached once with [`SceneGraph::write_to_buffers`].

use wgpu::util::DeviceExt;

use crate::{
    data_structures::{
        instance::Instance,
        model::{Mesh, ModelVertex},
    },
    materials::MaterialKind,
    pipelines::flat::FlatMaterial,
    resources::GltfData,
};

/// GPU resources of a single node.
#[derive(Debug)]
pub(crate) struct NodeResources {
    pub(crate) instance_buffer: wgpu::Buffer,
    pub(crate) original: FlatMaterial,
}

#[derive(Debug)]
pub struct SceneNode {
    pub name: String,
    pub local: Instance,
    pub meshes: Vec<Mesh>,
    /// Linear base colour from the file. Used when no shared material is assigned.
    pub original_color: [f32; 4],
    pub material: Option<MaterialKind>,
    pub children: Vec<SceneNode>,
    world: Instance,
    pub(crate) gpu: Option<NodeResources>,
}

impl SceneNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            local: Instance::default(),
            meshes: Vec::new(),
            original_color: [1.0; 4],
            material: None,
            children: Vec::new(),
            world: Instance::default(),
            gpu: None,
        }
    }

    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_local_transform(mut self, local: Instance) -> Self {
        self.local = local;
        self
    }

    pub fn world_transform(&self) -> &Instance {
        &self.world
    }

    fn update_world_transforms(&mut self, parent: &Instance) {
        self.world = parent * &self.local;
        let world = self.world;
        self.children
            .iter_mut()
            .for_each(|child| child.update_world_transforms(&world));
    }

    fn write_to_buffers(&mut self, device: &wgpu::Device, flat_layout: &wgpu::BindGroupLayout) {
        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Instance Buffer", self.name)),
            contents: bytemuck::cast_slice(&[self.world.to_raw()]),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let original = FlatMaterial::new(device, flat_layout, self.original_color);
        self.gpu = Some(NodeResources {
            instance_buffer,
            original,
        });
        self.children
            .iter_mut()
            .for_each(|child| child.write_to_buffers(device, flat_layout));
    }

    fn visit<'a>(&'a self, out: &mut Vec<&'a SceneNode>) {
        out.push(self);
        self.children.iter().for_each(|child| child.visit(out));
    }
}

#[derive(Debug, Default)]
pub struct SceneGraph {
    pub children: Vec<SceneNode>,
}

impl SceneGraph {
    pub fn new(children: Vec<SceneNode>) -> Self {
        Self { children }
    }

    /// Build the graph from the file's default scene (or its first one).
    pub fn from_gltf(data: &GltfData, device: &wgpu::Device) -> anyhow::Result<Self> {
        let scene = data
            .document
            .default_scene()
            .or_else(|| data.document.scenes().next())
            .ok_or_else(|| anyhow::anyhow!("{} contains no scene", data.name))?;
        let children = scene
            .nodes()
            .map(|node| to_scene_node(node, &data.buffers, device))
            .collect();
        let mut graph = Self { children };
        graph.update_world_transforms();
        Ok(graph)
    }

    /// Top-level child by exact name.
    pub fn child(&self, name: &str) -> Option<&SceneNode> {
        self.children.iter().find(|child| child.name == name)
    }

    pub fn update_world_transforms(&mut self) {
        let root = Instance::default();
        self.children
            .iter_mut()
            .for_each(|child| child.update_world_transforms(&root));
    }

    pub fn write_to_buffers(&mut self, device: &wgpu::Device, flat_layout: &wgpu::BindGroupLayout) {
        self.update_world_transforms();
        self.children
            .iter_mut()
            .for_each(|child| child.write_to_buffers(device, flat_layout));
    }

    /// All nodes, depth-first, parents before children.
    pub fn nodes(&self) -> Vec<&SceneNode> {
        let mut out = Vec::new();
        self.children.iter().for_each(|child| child.visit(&mut out));
        out
    }
}

fn to_scene_node(node: gltf::scene::Node, buf: &[Vec<u8>], device: &wgpu::Device) -> SceneNode {
    let name = node
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("node{}", node.index()));
    let mut scene_node = SceneNode::new(name);

    if let Some(mesh) = node.mesh() {
        let mesh_name = mesh.name().unwrap_or("unknown_mesh");
        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                log::warn!(
                    "primitive {} of mesh {} is not a triangle list and is skipped",
                    primitive.index(),
                    mesh_name
                );
                continue;
            }
            let reader = primitive.reader(|buffer| buf.get(buffer.index()).map(Vec::as_slice));

            let mut vertices: Vec<ModelVertex> = match reader.read_positions() {
                Some(positions) => positions
                    .map(|position| ModelVertex {
                        position,
                        tex_coords: Default::default(),
                    })
                    .collect(),
                None => {
                    log::warn!(
                        "primitive {} of mesh {} has no readable positions (compressed geometry?)",
                        primitive.index(),
                        mesh_name
                    );
                    continue;
                }
            };
            if let Some(tex_coords) = reader.read_tex_coords(0).map(|v| v.into_f32()) {
                vertices
                    .iter_mut()
                    .zip(tex_coords)
                    .for_each(|(vertex, tex_coord)| vertex.tex_coords = tex_coord);
            }
            let indices: Vec<u32> = match reader.read_indices() {
                Some(indices) => indices.into_u32().collect(),
                None => (0..vertices.len() as u32).collect(),
            };

            scene_node
                .meshes
                .push(Mesh::new(device, mesh_name, &vertices, &indices));
        }
        if let Some(primitive) = mesh.primitives().next() {
            scene_node.original_color = primitive
                .material()
                .pbr_metallic_roughness()
                .base_color_factor();
        }
    }

    let (translation, rotation, scale) = node.transform().decomposed();
    scene_node.local = Instance {
        position: translation.into(),
        rotation: cgmath::Quaternion::new(rotation[3], rotation[0], rotation[1], rotation[2]),
        scale: scale.into(),
    };
    for child in node.children() {
        scene_node.children.push(to_scene_node(child, buf, device));
    }

    scene_node
}
