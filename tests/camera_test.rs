use cgmath::{InnerSpace, Point3};
use portal_scene::camera::{Camera, CameraController, Projection};
use winit::{
    dpi::PhysicalPosition,
    event::{DeviceId, ElementState, MouseButton, MouseScrollDelta, TouchPhase, WindowEvent},
};

use crate::common::test_utils::{assert_close, scene};

mod common;

fn distance(camera: &Camera) -> f32 {
    (camera.position - camera.target).magnitude()
}

fn device_id() -> DeviceId {
    // SAFETY: only used to build synthetic events for the controller.
    unsafe { DeviceId::dummy() }
}

fn mouse(button: MouseButton, state: ElementState) -> WindowEvent {
    WindowEvent::MouseInput {
        device_id: device_id(),
        state,
        button,
    }
}

fn cursor_at(x: f64, y: f64) -> WindowEvent {
    WindowEvent::CursorMoved {
        device_id: device_id(),
        position: PhysicalPosition::new(x, y),
    }
}

fn wheel(lines: f32) -> WindowEvent {
    WindowEvent::MouseWheel {
        device_id: device_id(),
        delta: MouseScrollDelta::LineDelta(0.0, lines),
        phase: TouchPhase::Moved,
    }
}

fn start_camera() -> (Camera, Projection) {
    (
        Camera::new(Point3::new(4.0, 2.0, 4.0), Point3::new(0.0, 0.0, 0.0)),
        Projection::new(800, 600, cgmath::Deg(45.0), 0.1, 100.0),
    )
}

#[test]
fn should_start_looking_at_the_origin_from_the_configured_position() {
    let scene = scene(800, 600, 1.0);

    assert_eq!(scene.camera.position, Point3::new(4.0, 2.0, 4.0));
    assert_eq!(scene.camera.target, Point3::new(0.0, 0.0, 0.0));
    assert_close(scene.projection.fovy.0, 45f32.to_radians());
    assert_close(scene.projection.znear, 0.1);
    assert_close(scene.projection.zfar, 100.0);
}

#[test]
fn should_stay_put_without_input() {
    let mut camera = Camera::new(Point3::new(4.0, 2.0, 4.0), Point3::new(0.0, 0.0, 0.0));
    let projection = Projection::new(800, 600, cgmath::Deg(45.0), 0.1, 100.0);
    let mut controller = CameraController::new(true, 0.05);

    controller.update(&mut camera, &projection);

    assert_close(camera.position.x, 4.0);
    assert_close(camera.position.y, 2.0);
    assert_close(camera.position.z, 4.0);
    assert!(!controller.is_moving());
}

#[test]
fn should_ease_out_with_damping_and_stop_without() {
    let projection = Projection::new(800, 600, cgmath::Deg(45.0), 0.1, 100.0);

    let mut damped_camera = Camera::new(Point3::new(4.0, 2.0, 4.0), Point3::new(0.0, 0.0, 0.0));
    let mut damped = CameraController::new(true, 0.05);
    damped.rotate_left(0.5);
    damped.update(&mut damped_camera, &projection);
    assert!(damped.is_moving());

    let mut direct_camera = Camera::new(Point3::new(4.0, 2.0, 4.0), Point3::new(0.0, 0.0, 0.0));
    let mut direct = CameraController::new(false, 0.05);
    direct.rotate_left(0.5);
    direct.update(&mut direct_camera, &projection);
    assert!(!direct.is_moving());

    // The damped camera only covers a fraction of the turn in one frame.
    let start = Point3::new(4.0, 2.0, 4.0);
    let damped_step = (damped_camera.position - start).magnitude();
    let direct_step = (direct_camera.position - start).magnitude();
    assert!(damped_step < direct_step);
}

#[test]
fn should_keep_the_distance_while_orbiting() {
    let mut camera = Camera::new(Point3::new(4.0, 2.0, 4.0), Point3::new(0.0, 0.0, 0.0));
    let projection = Projection::new(800, 600, cgmath::Deg(45.0), 0.1, 100.0);
    let mut controller = CameraController::new(true, 0.05);
    controller.rotate_left(1.0);
    controller.rotate_up(0.2);

    for _ in 0..20 {
        controller.update(&mut camera, &projection);
    }

    assert_close(distance(&camera), 24f32.sqrt());
}

#[test]
fn should_dolly_towards_the_target() {
    let mut camera = Camera::new(Point3::new(4.0, 2.0, 4.0), Point3::new(0.0, 0.0, 0.0));
    let projection = Projection::new(800, 600, cgmath::Deg(45.0), 0.1, 100.0);
    let mut controller = CameraController::new(true, 0.05);

    controller.dolly(0.95);
    controller.update(&mut camera, &projection);

    assert_close(distance(&camera), 0.95 * 24f32.sqrt());
}

#[test]
fn should_move_the_target_when_panning() {
    let mut camera = Camera::new(Point3::new(4.0, 2.0, 4.0), Point3::new(0.0, 0.0, 0.0));
    let projection = Projection::new(800, 600, cgmath::Deg(45.0), 0.1, 100.0);
    let mut controller = CameraController::new(false, 0.05);
    controller.set_viewport_height(600);

    controller.pan(100.0, 0.0);
    controller.update(&mut camera, &projection);

    assert_ne!(camera.target, Point3::new(0.0, 0.0, 0.0));
    assert_close(distance(&camera), 24f32.sqrt());
    assert!(!controller.is_moving());
}

#[test]
fn should_orbit_while_dragging_with_the_left_button() {
    let (mut camera, projection) = start_camera();
    let mut controller = CameraController::new(false, 0.05);
    controller.set_viewport_height(600);

    assert!(controller.handle_window_events(&mouse(MouseButton::Left, ElementState::Pressed)));
    controller.handle_window_events(&cursor_at(100.0, 100.0));
    assert!(controller.handle_window_events(&cursor_at(160.0, 100.0)));
    assert!(controller.is_moving());

    controller.update(&mut camera, &projection);

    assert_ne!(camera.position, Point3::new(4.0, 2.0, 4.0));
    assert_close(camera.position.y, 2.0);
    assert_close(distance(&camera), 24f32.sqrt());
}

#[test]
fn should_ignore_cursor_moves_without_a_pressed_button() {
    let mut controller = CameraController::new(false, 0.05);

    assert!(!controller.handle_window_events(&cursor_at(100.0, 100.0)));
    assert!(!controller.handle_window_events(&cursor_at(200.0, 150.0)));

    assert!(!controller.is_moving());
}

#[test]
fn should_zoom_in_or_out_by_wheel_direction() {
    let (mut camera, projection) = start_camera();
    let mut controller = CameraController::new(false, 0.05);

    assert!(controller.handle_window_events(&wheel(1.0)));
    controller.update(&mut camera, &projection);
    let closer = distance(&camera);
    assert!(closer < 24f32.sqrt());

    assert!(controller.handle_window_events(&wheel(-1.0)));
    controller.update(&mut camera, &projection);
    assert!(distance(&camera) > closer);
    assert_close(distance(&camera), 24f32.sqrt());
}

#[test]
fn should_cancel_the_drag_when_the_cursor_leaves() {
    let mut controller = CameraController::new(false, 0.05);
    controller.handle_window_events(&mouse(MouseButton::Left, ElementState::Pressed));
    controller.handle_window_events(&cursor_at(100.0, 100.0));

    controller.handle_window_events(&WindowEvent::CursorLeft {
        device_id: device_id(),
    });
    controller.handle_window_events(&cursor_at(120.0, 100.0));
    controller.handle_window_events(&cursor_at(180.0, 140.0));

    assert!(!controller.is_moving());
}

#[test]
fn should_pan_while_dragging_with_the_right_button() {
    let (mut camera, projection) = start_camera();
    let mut controller = CameraController::new(false, 0.05);
    controller.set_viewport_height(600);

    controller.handle_window_events(&mouse(MouseButton::Right, ElementState::Pressed));
    controller.handle_window_events(&cursor_at(100.0, 100.0));
    controller.handle_window_events(&cursor_at(150.0, 100.0));
    controller.handle_window_events(&mouse(MouseButton::Right, ElementState::Released));
    controller.update(&mut camera, &projection);

    assert_ne!(camera.target, Point3::new(0.0, 0.0, 0.0));
    assert_close(distance(&camera), 24f32.sqrt());
}
