//! Orbit camera, projection and the camera uniform.
//!
//! The camera circles a target point. [`CameraController`] collects mouse input
//! as pending rotation/pan/zoom deltas and applies them on [`CameraController::update`],
//! easing them out over several frames when damping is enabled.

use std::f32::consts::PI;

use cgmath::{InnerSpace, Matrix4, Point3, Rad, Vector3, perspective};
use wgpu::util::DeviceExt;
use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

// Keeps the polar angle off the poles so `look_at` never degenerates.
const POLAR_EPSILON: f32 = 0.000_001;

#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
}

impl Camera {
    pub fn new<P: Into<Point3<f32>>, T: Into<Point3<f32>>>(position: P, target: T) -> Self {
        Self {
            position: position.into(),
            target: target.into(),
        }
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.target, Vector3::unit_y())
    }

    fn forward(&self) -> Vector3<f32> {
        (self.target - self.position).normalize()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Projection {
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Drag {
    Rotate,
    Pan,
}

/// Orbit controls: left drag rotates, right drag pans, the wheel zooms.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraController {
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    // pending spherical rotation (azimuth, polar)
    theta_delta: f32,
    phi_delta: f32,
    pan_offset: Vector3<f32>,
    // pan in pixels, turned into world units on the next update
    pending_pan: (f32, f32),
    scale: f32,
    drag: Option<Drag>,
    cursor: Option<PhysicalPosition<f64>>,
    viewport_height: f32,
}

impl CameraController {
    pub fn new(enable_damping: bool, damping_factor: f32) -> Self {
        Self {
            enable_damping,
            damping_factor,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            theta_delta: 0.0,
            phi_delta: 0.0,
            pan_offset: Vector3::new(0.0, 0.0, 0.0),
            pending_pan: (0.0, 0.0),
            scale: 1.0,
            drag: None,
            cursor: None,
            viewport_height: 1.0,
        }
    }

    /// Height of the drawing surface in pixels. Mouse deltas are relative to it.
    pub fn set_viewport_height(&mut self, height: u32) {
        self.viewport_height = height.max(1) as f32;
    }

    /// Rotate around the target's vertical axis.
    pub fn rotate_left(&mut self, angle: f32) {
        self.theta_delta -= angle;
    }

    /// Tilt towards or away from the vertical axis.
    pub fn rotate_up(&mut self, angle: f32) {
        self.phi_delta -= angle;
    }

    /// `factor < 1` moves closer, `factor > 1` moves away.
    pub fn dolly(&mut self, factor: f32) {
        self.scale *= factor;
    }

    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.pending_pan.0 += dx;
        self.pending_pan.1 += dy;
    }

    /// True while deltas are still being applied.
    pub fn is_moving(&self) -> bool {
        const EPS: f32 = 1e-6;
        self.theta_delta.abs() > EPS
            || self.phi_delta.abs() > EPS
            || self.pan_offset.magnitude2() > EPS * EPS
            || self.pending_pan != (0.0, 0.0)
            || (self.scale - 1.0).abs() > EPS
    }

    fn zoom_scale(&self) -> f32 {
        0.95_f32.powf(self.zoom_speed)
    }

    /// Feed window input. Returns true when the event was used.
    pub fn handle_window_events(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::MouseInput { state, button, .. } => {
                match (button, state) {
                    (MouseButton::Left, ElementState::Pressed) => self.drag = Some(Drag::Rotate),
                    (MouseButton::Right, ElementState::Pressed) => self.drag = Some(Drag::Pan),
                    (_, ElementState::Released) => self.drag = None,
                    _ => return false,
                }
                true
            }
            WindowEvent::CursorMoved { position, .. } => {
                let previous = self.cursor.replace(*position);
                let (Some(drag), Some(previous)) = (self.drag, previous) else {
                    return false;
                };
                let dx = (position.x - previous.x) as f32;
                let dy = (position.y - previous.y) as f32;
                match drag {
                    Drag::Rotate => {
                        let full_turn = 2.0 * PI * self.rotate_speed / self.viewport_height;
                        self.rotate_left(dx * full_turn);
                        self.rotate_up(dy * full_turn);
                    }
                    Drag::Pan => self.pan(dx * self.pan_speed, dy * self.pan_speed),
                }
                true
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32,
                };
                if scroll > 0.0 {
                    self.dolly(self.zoom_scale());
                } else if scroll < 0.0 {
                    self.dolly(1.0 / self.zoom_scale());
                }
                true
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
                self.drag = None;
                false
            }
            _ => false,
        }
    }

    /// Move the camera by the pending deltas and decay them.
    pub fn update(&mut self, camera: &mut Camera, projection: &Projection) {
        let offset = camera.position - camera.target;
        let radius = offset.magnitude();
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = if radius > 0.0 {
            (offset.y / radius).clamp(-1.0, 1.0).acos()
        } else {
            PI / 2.0
        };

        if self.pending_pan != (0.0, 0.0) {
            let (dx, dy) = std::mem::take(&mut self.pending_pan);
            let target_distance = radius * (projection.fovy.0 / 2.0).tan();
            let forward = camera.forward();
            let right = forward.cross(Vector3::unit_y()).normalize();
            let up = right.cross(forward).normalize();
            let pixels = 2.0 * target_distance / self.viewport_height;
            self.pan_offset += -right * (dx * pixels) + up * (dy * pixels);
        }

        let step = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };
        theta += self.theta_delta * step;
        phi += self.phi_delta * step;
        phi = phi.clamp(POLAR_EPSILON, PI - POLAR_EPSILON);

        let radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);
        camera.target += self.pan_offset * step;

        let offset = Vector3::new(
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
            radius * phi.sin() * theta.cos(),
        );
        camera.position = camera.target + offset;

        if self.enable_damping {
            self.theta_delta *= 1.0 - self.damping_factor;
            self.phi_delta *= 1.0 - self.damping_factor;
            self.pan_offset *= 1.0 - self.damping_factor;
        } else {
            self.theta_delta = 0.0;
            self.phi_delta = 0.0;
            self.pan_offset = Vector3::new(0.0, 0.0, 0.0);
        }
        self.scale = 1.0;
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        use cgmath::SquareMatrix;
        Self {
            view_proj: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        self.view_proj = (projection.calc_matrix() * camera.calc_matrix()).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// GPU side of the camera: uniform buffer plus its bind group (group 0 in every pipeline).
#[derive(Debug)]
pub struct CameraResources {
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl CameraResources {
    pub fn new(device: &wgpu::Device) -> Self {
        let uniform = CameraUniform::new();
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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
            label: Some("camera_bind_group_layout"),
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });
        Self {
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    pub fn write(&mut self, queue: &wgpu::Queue, camera: &Camera, projection: &Projection) {
        self.uniform.update_view_proj(camera, projection);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}
