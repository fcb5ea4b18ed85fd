//! Render pipelines of the scene.
//!
//! Every pipeline binds the camera at group 0 and its material at group 1.
//! Model pipelines take [`ModelVertex`] at slot 0 and the node's
//! [`InstanceRaw`] at slot 1; the firefly pipeline takes per-instance
//! positions and scales instead.

use crate::data_structures::{
    instance::InstanceRaw,
    model::{ModelVertex, Vertex},
    texture::Texture,
};

pub mod baked;
pub mod fireflies;
pub mod flat;
pub mod portal;
pub mod upscale;

/// Preferred multisample count for the scene pass.
pub const MSAA_SAMPLES: u32 = 4;

/// Format and sample count of the colour target the scene pipelines draw into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TargetFormat {
    pub color: wgpu::TextureFormat,
    pub sample_count: u32,
}

impl TargetFormat {
    /// `MSAA_SAMPLES` when the adapter can multisample `color`, otherwise 1.
    pub fn for_adapter(adapter: &wgpu::Adapter, color: wgpu::TextureFormat) -> Self {
        let flags = adapter.get_texture_format_features(color).flags;
        let sample_count = if flags.sample_count_supported(MSAA_SAMPLES) {
            MSAA_SAMPLES
        } else {
            log::warn!("{:?} cannot be multisampled {}x, antialiasing is off", color, MSAA_SAMPLES);
            1
        };
        Self { color, sample_count }
    }
}

/// Bind group layouts shared by the materials.
#[derive(Debug)]
pub struct MaterialLayouts {
    /// Texture at binding 0, sampler at binding 1.
    pub texture: wgpu::BindGroupLayout,
    /// One uniform buffer at binding 0.
    pub uniform: wgpu::BindGroupLayout,
}

impl MaterialLayouts {
    pub fn new(device: &wgpu::Device) -> Self {
        Self {
            texture: baked::mk_bind_group_layout(device),
            uniform: mk_uniform_layout(device, "material_uniform_layout"),
        }
    }
}

#[derive(Debug)]
pub struct Pipelines {
    pub baked: wgpu::RenderPipeline,
    pub flat: wgpu::RenderPipeline,
    pub portal: wgpu::RenderPipeline,
    pub fireflies: wgpu::RenderPipeline,
}

impl Pipelines {
    pub fn new(
        device: &wgpu::Device,
        target: TargetFormat,
        camera_layout: &wgpu::BindGroupLayout,
        layouts: &MaterialLayouts,
    ) -> Self {
        Self {
            baked: baked::mk_baked_pipeline(device, target, camera_layout, &layouts.texture),
            flat: flat::mk_flat_pipeline(device, target, camera_layout, &layouts.uniform),
            portal: portal::mk_portal_pipeline(device, target, camera_layout, &layouts.uniform),
            fireflies: fireflies::mk_fireflies_pipeline(
                device,
                target,
                camera_layout,
                &layouts.uniform,
            ),
        }
    }
}

pub fn mk_uniform_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some(label),
    })
}

pub fn mk_uniform_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
    label: &str,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
        label: Some(label),
    })
}

/// Pipeline for the meshes of the model: camera at group 0, material at group 1.
pub(crate) fn mk_model_pipeline(
    device: &wgpu::Device,
    label: &str,
    target: TargetFormat,
    camera_layout: &wgpu::BindGroupLayout,
    material_layout: &wgpu::BindGroupLayout,
    cull_mode: Option<wgpu::Face>,
    shader: wgpu::ShaderModuleDescriptor,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts: &[camera_layout, material_layout],
        push_constant_ranges: &[],
    });
    mk_render_pipeline(
        device,
        &layout,
        PipelineOptions {
            label,
            target,
            blend: Some(wgpu::BlendState::REPLACE),
            depth_write: true,
            cull_mode,
        },
        &[ModelVertex::desc(), InstanceRaw::desc()],
        shader,
    )
}

/// The knobs the scene's pipelines differ in.
pub struct PipelineOptions<'a> {
    pub label: &'a str,
    pub target: TargetFormat,
    pub blend: Option<wgpu::BlendState>,
    pub depth_write: bool,
    pub cull_mode: Option<wgpu::Face>,
}

pub fn mk_render_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    options: PipelineOptions,
    vertex_layouts: &[wgpu::VertexBufferLayout],
    shader: wgpu::ShaderModuleDescriptor,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(shader);

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        cache: None,
        label: Some(options.label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: vertex_layouts,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: options.target.color,
                blend: options.blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: options.cull_mode,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: Texture::DEPTH_FORMAT,
            depth_write_enabled: options.depth_write,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: options.target.sample_count,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
    })
}
