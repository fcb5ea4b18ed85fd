//! Render composition and pipeline batching.
//!
//! Scene nodes describe themselves as a [`Render`]. The renderer walks the
//! tree once per frame, sorts every mesh into the batch of its pipeline and
//! then draws pipeline by pipeline, fireflies last.
//!
//! # Key types
//!
//! - [`Render<'a>`] describes what a node wants drawn and with which material
//! - [`Instanced<'a>`] is a node's meshes plus its instance buffer
//! - [`Renderer`] owns the pipelines, the shared materials and the firefly buffers

use crate::{
    camera::CameraResources,
    config::SceneConfig,
    data_structures::{
        fireflies::FireflyField,
        model::DrawModel,
        scene_graph::{SceneGraph, SceneNode},
        texture::Texture,
    },
    materials::{MaterialKind, Materials},
    pipelines::{
        MaterialLayouts, Pipelines, TargetFormat, fireflies::FirefliesResources, upscale::Upscaler,
    },
    scene::SceneState,
};

/// A node's meshes drawn once with the node's world matrix.
pub struct Instanced<'a> {
    pub instance: &'a wgpu::Buffer,
    pub meshes: &'a [crate::data_structures::model::Mesh],
}

pub enum Render<'a> {
    None,
    Baked(Instanced<'a>),
    PoleLight(Instanced<'a>),
    Portal(Instanced<'a>),
    /// Drawn with the node's own colour.
    Flat(Instanced<'a>, &'a wgpu::BindGroup),
    Composed(Vec<Render<'a>>),
}

#[derive(Default)]
pub(crate) struct Batches<'a> {
    baked: Vec<Instanced<'a>>,
    pole_lights: Vec<Instanced<'a>>,
    portals: Vec<Instanced<'a>>,
    flats: Vec<(Instanced<'a>, &'a wgpu::BindGroup)>,
}

impl<'a> Batches<'a> {
    pub(crate) fn is_empty(&self) -> bool {
        self.baked.is_empty()
            && self.pole_lights.is_empty()
            && self.portals.is_empty()
            && self.flats.is_empty()
    }
}

impl<'a> Render<'a> {
    pub(crate) fn set_pipelines(self, batches: &mut Batches<'a>) {
        match self {
            Render::Baked(instanced) => batches.baked.push(instanced),
            Render::PoleLight(instanced) => batches.pole_lights.push(instanced),
            Render::Portal(instanced) => batches.portals.push(instanced),
            Render::Flat(instanced, group) => batches.flats.push((instanced, group)),
            Render::Composed(renders) => renders
                .into_iter()
                .for_each(|render| render.set_pipelines(batches)),
            Render::None => (),
        }
    }
}

impl<'a> From<&'a SceneNode> for Render<'a> {
    fn from(node: &'a SceneNode) -> Self {
        let own = match &node.gpu {
            Some(gpu) if !node.meshes.is_empty() => {
                let instanced = Instanced {
                    instance: &gpu.instance_buffer,
                    meshes: &node.meshes,
                };
                match node.material {
                    Some(MaterialKind::Baked) => Render::Baked(instanced),
                    Some(MaterialKind::PoleLight) => Render::PoleLight(instanced),
                    Some(MaterialKind::PortalLight) => Render::Portal(instanced),
                    None => Render::Flat(instanced, &gpu.original.bind_group),
                }
            }
            _ => Render::None,
        };
        if node.children.is_empty() {
            return own;
        }
        let mut renders = Vec::with_capacity(node.children.len() + 1);
        renders.push(own);
        renders.extend(node.children.iter().map(Render::from));
        Render::Composed(renders)
    }
}

impl<'a> From<&'a SceneGraph> for Render<'a> {
    fn from(graph: &'a SceneGraph) -> Self {
        Render::Composed(graph.children.iter().map(Render::from).collect())
    }
}

/// The attachments of one scene pass.
///
/// With multisampling `color` is the multisampled texture and `resolve` the
/// single-sampled texture that ends up on screen; without it `color` is drawn
/// to directly.
pub struct RenderTarget<'a> {
    pub color: &'a wgpu::TextureView,
    pub resolve: Option<&'a wgpu::TextureView>,
    pub depth: &'a wgpu::TextureView,
}

impl<'a> RenderTarget<'a> {
    pub fn new(
        output: &'a wgpu::TextureView,
        msaa: Option<&'a Texture>,
        depth: &'a Texture,
    ) -> Self {
        match msaa {
            Some(msaa) => Self {
                color: &msaa.view,
                resolve: Some(output),
                depth: &depth.view,
            },
            None => Self {
                color: output,
                resolve: None,
                depth: &depth.view,
            },
        }
    }
}

/// Everything needed to draw the scene into a colour and a depth target.
#[derive(Debug)]
pub struct Renderer {
    pub target: TargetFormat,
    pub camera: CameraResources,
    pub layouts: MaterialLayouts,
    pub pipelines: Pipelines,
    pub materials: Materials,
    pub fireflies: FirefliesResources,
    pub upscaler: Upscaler,
}

impl Renderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target: TargetFormat,
        config: &SceneConfig,
        scene: &SceneState,
        field: &FireflyField,
    ) -> Self {
        let camera = CameraResources::new(device);
        let layouts = MaterialLayouts::new(device);
        let pipelines = Pipelines::new(device, target, &camera.bind_group_layout, &layouts);
        let materials = Materials::new(device, queue, &layouts, config, scene);
        let fireflies = FirefliesResources::new(device, &layouts.uniform, field, scene.fireflies);
        let upscaler = Upscaler::new(device, target.color);
        Self {
            target,
            camera,
            layouts,
            pipelines,
            materials,
            fireflies,
            upscaler,
        }
    }

    /// Upload this frame's camera, portal and firefly uniforms.
    pub fn prepare(&mut self, queue: &wgpu::Queue, scene: &SceneState) {
        self.camera.write(queue, &scene.camera, &scene.projection);
        self.materials.write(queue, scene);
        self.fireflies.write(queue, &scene.fireflies);
    }

    /// Clear to the scene's clear colour, draw the model (if loaded) and the fireflies.
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &RenderTarget,
        scene: &SceneState,
        model: Option<&SceneGraph>,
    ) {
        // Multisampled contents are dead once resolved.
        let store = match target.resolve {
            Some(_) => wgpu::StoreOp::Discard,
            None => wgpu::StoreOp::Store,
        };
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color,
                resolve_target: target.resolve,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(scene.clear_color.to_wgpu()),
                    store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: target.depth,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });
        render_pass.set_bind_group(0, &self.camera.bind_group, &[]);

        let mut batches = Batches::default();
        if let Some(model) = model {
            Render::from(model).set_pipelines(&mut batches);
        }
        if !batches.is_empty() {
            let Batches {
                baked,
                pole_lights,
                portals,
                flats,
            } = batches;

            render_pass.set_pipeline(&self.pipelines.baked);
            render_pass.set_bind_group(1, self.materials.bind_group(MaterialKind::Baked), &[]);
            draw_instanced(&mut render_pass, &baked);

            render_pass.set_pipeline(&self.pipelines.flat);
            render_pass.set_bind_group(1, self.materials.bind_group(MaterialKind::PoleLight), &[]);
            draw_instanced(&mut render_pass, &pole_lights);
            for (instanced, group) in flats {
                render_pass.set_bind_group(1, group, &[]);
                draw_instanced(&mut render_pass, std::slice::from_ref(&instanced));
            }

            render_pass.set_pipeline(&self.pipelines.portal);
            render_pass.set_bind_group(1, self.materials.bind_group(MaterialKind::PortalLight), &[]);
            draw_instanced(&mut render_pass, &portals);
        }

        render_pass.set_pipeline(&self.pipelines.fireflies);
        self.fireflies.draw(&mut render_pass);
    }
}

fn draw_instanced<'a>(render_pass: &mut wgpu::RenderPass<'a>, batch: &[Instanced<'a>]) {
    for instanced in batch {
        render_pass.set_vertex_buffer(1, instanced.instance.slice(..));
        for mesh in instanced.meshes {
            render_pass.draw_mesh_instanced(mesh, 0..1);
        }
    }
}

/// Render one frame into an offscreen texture and read it back.
///
/// Used to check the output without a window. The readback target has the
/// renderer's colour format, which must have four bytes per pixel.
#[cfg(feature = "integration-tests")]
pub async fn render_offscreen(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    renderer: &mut Renderer,
    scene: &SceneState,
    model: Option<&SceneGraph>,
) -> anyhow::Result<image::RgbaImage> {
    let format = renderer.target.color;
    let (width, height) = scene.render_size;
    // Buffer copies need rows aligned to 256 bytes.
    let u32_size = std::mem::size_of::<u32>() as u32;
    let padded_width = width.div_ceil(64) * 64;
    let extent = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };
    let target = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Offscreen Target"),
        size: extent,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::COPY_SRC | wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let view = target.create_view(&wgpu::TextureViewDescriptor::default());
    let sample_count = renderer.target.sample_count;
    let msaa = (sample_count > 1).then(|| {
        Texture::create_msaa_target(device, [width, height], renderer.target, "offscreen_msaa")
    });
    let depth =
        Texture::create_depth_texture(device, [width, height], sample_count, "offscreen_depth");

    let output_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        size: (u32_size * padded_width * height) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        label: Some("Offscreen Readback"),
        mapped_at_creation: false,
    });

    renderer.prepare(queue, scene);
    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("Offscreen Encoder"),
    });
    renderer.render(
        &mut encoder,
        &RenderTarget::new(&view, msaa.as_ref(), &depth),
        scene,
        model,
    );
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            aspect: wgpu::TextureAspect::All,
            texture: &target,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &output_buffer,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(u32_size * padded_width),
                rows_per_image: Some(height),
            },
        },
        extent,
    );
    queue.submit(std::iter::once(encoder.finish()));

    let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();
    let buffer_slice = output_buffer.slice(..);
    buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
        tx.send(result).ok();
    });
    let _ = device.poll(wgpu::Maintain::Wait);
    rx.receive()
        .await
        .ok_or_else(|| anyhow::anyhow!("readback channel closed"))??;

    let data = buffer_slice.get_mapped_range();
    let row_bytes = (u32_size * width) as usize;
    let padded_row_bytes = (u32_size * padded_width) as usize;
    let pixels: Vec<u8> = data
        .chunks(padded_row_bytes)
        .flat_map(|row| &row[..row_bytes])
        .copied()
        .collect();
    drop(data);
    output_buffer.unmap();

    image::RgbaImage::from_raw(width, height, pixels)
        .ok_or_else(|| anyhow::anyhow!("readback has the wrong size"))
}
