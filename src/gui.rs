//! egui on top of the scene.
//!
//! [`Gui`] bridges winit input into egui and paints egui's output in its own
//! pass after the scene, loading (not clearing) the colour target.

use winit::{event::WindowEvent, window::Window};

/// Tessellated egui output of one frame, ready to paint.
pub struct GuiFrame {
    paint_jobs: Vec<egui::ClippedPrimitive>,
    textures_delta: egui::TexturesDelta,
    screen: egui_wgpu::ScreenDescriptor,
}

pub struct Gui {
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

impl Gui {
    pub fn new(window: &Window, device: &wgpu::Device, color_format: wgpu::TextureFormat) -> Self {
        let context = egui::Context::default();
        let viewport_id = context.viewport_id();
        let state = egui_winit::State::new(
            context,
            viewport_id,
            window,
            Some(window.scale_factor() as f32),
            None,
            Some(device.limits().max_texture_dimension_2d as usize),
        );
        let renderer = egui_wgpu::Renderer::new(device, color_format, None, 1, false);
        Self { state, renderer }
    }

    /// Feed a window event to egui. Returns true when egui consumed it and
    /// nothing underneath (the orbit controls) should see it.
    pub fn handle_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.state.on_window_event(window, event).consumed
    }

    /// Run the UI for this frame.
    pub fn run(
        &mut self,
        window: &Window,
        size_in_pixels: [u32; 2],
        run_ui: impl FnMut(&egui::Context),
    ) -> GuiFrame {
        let raw_input = self.state.take_egui_input(window);
        let egui::FullOutput {
            textures_delta,
            shapes,
            pixels_per_point,
            platform_output,
            ..
        } = self.state.egui_ctx().run(raw_input, run_ui);
        self.state.handle_platform_output(window, platform_output);
        let paint_jobs = self.state.egui_ctx().tessellate(shapes, pixels_per_point);
        GuiFrame {
            paint_jobs,
            textures_delta,
            screen: egui_wgpu::ScreenDescriptor {
                size_in_pixels,
                pixels_per_point,
            },
        }
    }

    /// Paint a frame over whatever `view` already holds.
    pub fn paint(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        frame: GuiFrame,
    ) -> Vec<wgpu::CommandBuffer> {
        let GuiFrame {
            paint_jobs,
            textures_delta,
            screen,
        } = frame;
        for (id, image_delta) in &textures_delta.set {
            self.renderer.update_texture(device, queue, *id, image_delta);
        }
        let command_buffers =
            self.renderer
                .update_buffers(device, queue, encoder, &paint_jobs, &screen);
        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("GUI Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            self.renderer
                .render(&mut render_pass.forget_lifetime(), &paint_jobs, &screen);
        }
        for id in &textures_delta.free {
            self.renderer.free_texture(id);
        }
        command_buffers
    }
}
