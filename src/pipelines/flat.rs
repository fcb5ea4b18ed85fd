use wgpu::util::DeviceExt;

/// Uniform of the flat-colour material.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FlatUniform {
    /// Linear RGBA.
    pub color: [f32; 4],
}

/// A single unlit colour. Used for the pole lights and for every node that
/// keeps the colour it came with.
#[derive(Debug)]
pub struct FlatMaterial {
    pub uniform: FlatUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl FlatMaterial {
    pub fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, color: [f32; 4]) -> Self {
        let uniform = FlatUniform { color };
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Flat Material Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = super::mk_uniform_bind_group(device, layout, &buffer, "flat_bind_group");
        Self {
            uniform,
            buffer,
            bind_group,
        }
    }
}

pub fn mk_flat_pipeline(
    device: &wgpu::Device,
    target: super::TargetFormat,
    camera_layout: &wgpu::BindGroupLayout,
    uniform_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Flat Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("flat.wgsl").into()),
    };
    super::mk_model_pipeline(
        device,
        "Flat Pipeline",
        target,
        camera_layout,
        uniform_layout,
        Some(wgpu::Face::Back),
        shader,
    )
}
