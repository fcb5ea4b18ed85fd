use crate::data_structures::texture::Texture;

/// The shared baked-lighting material: one texture, sampled unlit.
#[derive(Debug)]
pub struct BakedMaterial {
    pub texture: Texture,
    pub bind_group: wgpu::BindGroup,
}

impl BakedMaterial {
    pub fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, texture: Texture) -> Self {
        let sampler = texture
            .sampler
            .clone()
            .unwrap_or_else(|| crate::data_structures::texture::create_default_sampler(device));
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
            label: Some("baked_bind_group"),
        });
        Self {
            texture,
            bind_group,
        }
    }
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
        label: Some("baked_texture_layout"),
    })
}

pub fn mk_baked_pipeline(
    device: &wgpu::Device,
    target: super::TargetFormat,
    camera_layout: &wgpu::BindGroupLayout,
    texture_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Baked Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("baked.wgsl").into()),
    };
    super::mk_model_pipeline(
        device,
        "Baked Pipeline",
        target,
        camera_layout,
        texture_layout,
        Some(wgpu::Face::Back),
        shader,
    )
}
