use std::time::Duration;

use portal_scene::{
    animation::{AnimationLoop, LoopState},
    clock::ManualClock,
};

use crate::common::test_utils::{assert_close, scene};

mod common;

#[test]
fn should_write_the_same_elapsed_time_into_both_materials() {
    let clock = ManualClock::new();
    let mut animation = AnimationLoop::new(&clock);
    let mut scene = scene(800, 600, 1.0);

    clock.advance(Duration::from_millis(1500));
    let elapsed = animation.tick(&mut scene);

    assert_eq!(elapsed, Some(1.5));
    assert_close(scene.portal.time, 1.5);
    assert_eq!(scene.portal.time, scene.fireflies.time);
}

#[test]
fn should_advance_time_from_frame_to_frame() {
    let clock = ManualClock::new();
    let mut animation = AnimationLoop::new(&clock);
    let mut scene = scene(800, 600, 1.0);

    let mut last = -1.0;
    for _ in 0..3 {
        clock.advance(Duration::from_millis(16));
        let elapsed = animation.tick(&mut scene).unwrap();
        assert!(elapsed > last);
        last = elapsed;
    }

    assert!(scene.portal.time > 0.0);
    assert_eq!(animation.frames(), 3);
    assert!(animation.is_running());
}

#[test]
fn should_leave_the_scene_alone_once_stopped() {
    let clock = ManualClock::new();
    let mut animation = AnimationLoop::new(&clock);
    let mut scene = scene(800, 600, 1.0);
    clock.advance(Duration::from_secs(1));
    animation.tick(&mut scene);

    animation.stop();
    clock.advance(Duration::from_secs(1));
    let before = scene.clone();

    assert_eq!(animation.tick(&mut scene), None);
    assert_eq!(animation.state(), LoopState::Stopped);
    assert_eq!(scene, before);
    assert_eq!(animation.frames(), 1);
}

#[test]
fn should_keep_easing_the_camera_after_input_stops() {
    let clock = ManualClock::new();
    let mut animation = AnimationLoop::new(&clock);
    let mut scene = scene(800, 600, 1.0);
    scene.controller.rotate_left(1.0);

    let mut positions = Vec::new();
    for _ in 0..3 {
        clock.advance(Duration::from_millis(16));
        animation.tick(&mut scene);
        positions.push(scene.camera.position);
    }

    assert_ne!(positions[0], positions[1]);
    assert_ne!(positions[1], positions[2]);
    assert!(scene.controller.is_moving());
}

#[test]
fn should_not_move_the_camera_without_input() {
    let clock = ManualClock::new();
    let mut animation = AnimationLoop::new(&clock);
    let mut scene = scene(800, 600, 1.0);

    for _ in 0..10 {
        clock.advance(Duration::from_millis(16));
        animation.tick(&mut scene);
    }

    let p = scene.camera.position;
    assert_close(p.x, 4.0);
    assert_close(p.y, 2.0);
    assert_close(p.z, 4.0);
}
