use portal_scene::scene::render_size;

use crate::common::test_utils::{assert_close, scene};

mod common;

#[test]
fn should_follow_the_new_viewport() {
    let mut scene = scene(800, 600, 1.0);
    assert_close(scene.projection.aspect, 800.0 / 600.0);

    assert!(scene.resize(1920, 1080, 1.0));

    assert_close(scene.projection.aspect, 1920.0 / 1080.0);
    assert_eq!(scene.render_size, (1920, 1080));
    assert_eq!(scene.fireflies.resolution, [1920.0, 1080.0]);
}

#[test]
fn should_cap_the_pixel_ratio_at_two() {
    let mut scene = scene(800, 600, 3.0);
    assert_eq!(scene.fireflies.pixel_ratio, 2.0);

    scene.resize(800, 600, 1.5);
    assert_eq!(scene.fireflies.pixel_ratio, 1.5);

    scene.resize(800, 600, 2.5);
    assert_eq!(scene.fireflies.pixel_ratio, 2.0);
}

#[test]
fn should_render_at_the_capped_ratio_on_dense_displays() {
    // 300x200 logical pixels at 3x.
    let mut scene = scene(900, 600, 3.0);

    assert_eq!(scene.render_size, (600, 400));
    assert_eq!(scene.fireflies.resolution, [600.0, 400.0]);
    assert_eq!(scene.fireflies.pixel_ratio, 2.0);
    assert_close(scene.projection.aspect, 1.5);

    // Same window moved to a 1.5x display.
    scene.resize(450, 300, 1.5);
    assert_eq!(scene.render_size, (450, 300));
    assert_eq!(scene.fireflies.pixel_ratio, 1.5);

    // And back.
    scene.resize(900, 600, 3.0);
    assert_eq!(scene.render_size, (600, 400));
    assert_eq!(scene.fireflies.resolution, [600.0, 400.0]);
}

#[test]
fn should_keep_the_window_size_up_to_the_cap() {
    assert_eq!(render_size(1920, 1080, 1.0, 2.0), (1920, 1080));
    assert_eq!(render_size(1920, 1080, 2.0, 2.0), (1920, 1080));
    assert_eq!(render_size(1920, 1080, 4.0, 2.0), (960, 540));
    assert_eq!(render_size(1, 1, 4.0, 2.0), (1, 1));
}

#[test]
fn should_ignore_a_zero_sized_viewport() {
    let mut scene = scene(800, 600, 1.0);
    let before = scene.clone();

    assert!(!scene.resize(0, 600, 1.0));
    assert!(!scene.resize(800, 0, 1.0));

    assert_eq!(scene, before);
}

#[test]
fn should_not_touch_the_animation_time() {
    let mut scene = scene(800, 600, 1.0);
    scene.set_time(2.0);

    scene.resize(1024, 768, 2.0);

    assert_eq!(scene.portal.time, 2.0);
    assert_eq!(scene.fireflies.time, 2.0);
}
