use wgpu::util::DeviceExt;

use crate::scene::PortalUniform;

/// The animated portal surface. Its uniform is rewritten every frame.
#[derive(Debug)]
pub struct PortalMaterial {
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl PortalMaterial {
    pub fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, uniform: PortalUniform) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Portal Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = super::mk_uniform_bind_group(device, layout, &buffer, "portal_bind_group");
        Self { buffer, bind_group }
    }

    pub fn write(&self, queue: &wgpu::Queue, uniform: &PortalUniform) {
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[*uniform]));
    }
}

/// Double sided: the portal plane is visible from behind the frame as well.
pub fn mk_portal_pipeline(
    device: &wgpu::Device,
    target: super::TargetFormat,
    camera_layout: &wgpu::BindGroupLayout,
    uniform_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Portal Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("portal.wgsl").into()),
    };
    super::mk_model_pipeline(
        device,
        "Portal Pipeline",
        target,
        camera_layout,
        uniform_layout,
        None,
        shader,
    )
}
