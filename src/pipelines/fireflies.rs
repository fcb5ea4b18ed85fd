//! Firefly point sprites.
//!
//! wgpu has no point size, so every firefly is drawn as a camera-facing quad
//! of six vertices expanded in the vertex shader. Positions and scales are
//! per-instance vertex buffers, uploaded once.

use wgpu::util::DeviceExt;

use crate::{data_structures::fireflies::FireflyField, scene::FirefliesUniform};

use super::{PipelineOptions, TargetFormat, mk_render_pipeline, mk_uniform_bind_group};

/// Vertices per sprite quad.
pub const QUAD_VERTICES: u32 = 6;

const POSITION_LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
    step_mode: wgpu::VertexStepMode::Instance,
    attributes: &[wgpu::VertexAttribute {
        offset: 0,
        shader_location: 0,
        format: wgpu::VertexFormat::Float32x3,
    }],
};

const SCALE_LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: std::mem::size_of::<f32>() as wgpu::BufferAddress,
    step_mode: wgpu::VertexStepMode::Instance,
    attributes: &[wgpu::VertexAttribute {
        offset: 0,
        shader_location: 1,
        format: wgpu::VertexFormat::Float32,
    }],
};

#[derive(Debug)]
pub struct FirefliesResources {
    pub position_buffer: wgpu::Buffer,
    pub scale_buffer: wgpu::Buffer,
    pub uniform_buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub count: u32,
}

impl FirefliesResources {
    pub fn new(
        device: &wgpu::Device,
        uniform_layout: &wgpu::BindGroupLayout,
        field: &FireflyField,
        uniform: FirefliesUniform,
    ) -> Self {
        // Zero-sized vertex buffers are invalid, an empty field still gets one slot.
        let positions: &[f32] = if field.is_empty() { &[0.0; 3] } else { &field.positions };
        let scales: &[f32] = if field.is_empty() { &[0.0] } else { &field.scales };
        let position_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Firefly Position Buffer"),
            contents: bytemuck::cast_slice(positions),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let scale_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Firefly Scale Buffer"),
            contents: bytemuck::cast_slice(scales),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Firefly Uniform Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group =
            mk_uniform_bind_group(device, uniform_layout, &uniform_buffer, "fireflies_bind_group");
        Self {
            position_buffer,
            scale_buffer,
            uniform_buffer,
            bind_group,
            count: field.len() as u32,
        }
    }

    pub fn write(&self, queue: &wgpu::Queue, uniform: &FirefliesUniform) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[*uniform]));
    }

    /// Expects the fireflies pipeline and the camera at group 0 to be set.
    pub fn draw<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        if self.count == 0 {
            return;
        }
        render_pass.set_bind_group(1, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.position_buffer.slice(..));
        render_pass.set_vertex_buffer(1, self.scale_buffer.slice(..));
        render_pass.draw(0..QUAD_VERTICES, 0..self.count);
    }
}

/// Additive blending without depth writes so overlapping glows add up.
pub fn mk_fireflies_pipeline(
    device: &wgpu::Device,
    target: TargetFormat,
    camera_layout: &wgpu::BindGroupLayout,
    uniform_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Fireflies Pipeline Layout"),
        bind_group_layouts: &[camera_layout, uniform_layout],
        push_constant_ranges: &[],
    });
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Fireflies Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("fireflies.wgsl").into()),
    };
    let additive = wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::SrcAlpha,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    };
    mk_render_pipeline(
        device,
        &layout,
        PipelineOptions {
            label: "Fireflies Pipeline",
            target,
            blend: Some(wgpu::BlendState {
                color: additive,
                alpha: additive,
            }),
            depth_write: false,
            cull_mode: None,
        },
        &[POSITION_LAYOUT, SCALE_LAYOUT],
        shader,
    )
}
