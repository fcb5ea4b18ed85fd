use portal_scene::{
    color::Color,
    config::SceneConfig,
    debug::{DebugEdit, DebugPanel, SizeControl},
};

use crate::common::test_utils::{assert_point_close, scene};

mod common;

#[test]
fn should_start_collapsed_with_the_configured_values() {
    let config = SceneConfig::default();
    let panel = DebugPanel::new(&config);

    assert!(!panel.open);
    assert_eq!(panel.object.portal_color_start.to_hex(), "#8006ff");
    assert_eq!(panel.object.portal_color_end.to_hex(), "#99ffff");
    assert_eq!(panel.object.clear_color.to_hex(), "#330066");
    assert_eq!(panel.size_control.range, 0.0..=500.0);
    assert_eq!(panel.size_control.step, 1.0);
}

#[test]
fn should_change_only_the_clear_colour() {
    let mut panel = DebugPanel::new(&SceneConfig::default());
    let mut scene = scene(800, 600, 1.0);
    let before = scene.clone();
    let black = Color::from_hex("#000000").unwrap();

    panel.apply(DebugEdit::ClearColor(black), &mut scene);

    assert_eq!(scene.clear_color, black);
    assert_eq!(panel.object.clear_color, black);
    assert_eq!(scene.portal, before.portal);
    assert_eq!(scene.fireflies, before.fireflies);
    assert_eq!(scene.camera, before.camera);
}

#[test]
fn should_write_portal_colours_as_linear_uniforms() {
    let mut panel = DebugPanel::new(&SceneConfig::default());
    let mut scene = scene(800, 600, 1.0);
    let end_before = scene.portal.color_end;

    panel.apply(
        DebugEdit::PortalColorStart(Color::from_hex("#ff0000").unwrap()),
        &mut scene,
    );

    assert_point_close(scene.portal.color_start, [1.0, 0.0, 0.0]);
    assert_eq!(scene.portal.color_end, end_before);

    panel.apply(
        DebugEdit::PortalColorEnd(Color::from_hex("#ffffff").unwrap()),
        &mut scene,
    );
    assert_point_close(scene.portal.color_end, [1.0, 1.0, 1.0]);
    assert_eq!(panel.object.portal_color_end.to_hex(), "#ffffff");
}

#[test]
fn should_accept_the_range_limits_for_the_firefly_size() {
    let mut panel = DebugPanel::new(&SceneConfig::default());
    let mut scene = scene(800, 600, 1.0);

    panel.apply(DebugEdit::FirefliesSize(0.0), &mut scene);
    assert_eq!(scene.fireflies.size, 0.0);

    panel.apply(DebugEdit::FirefliesSize(500.0), &mut scene);
    assert_eq!(scene.fireflies.size, 500.0);
}

#[test]
fn should_clamp_and_snap_the_firefly_size() {
    let mut panel = DebugPanel::new(&SceneConfig::default());
    let mut scene = scene(800, 600, 1.0);

    panel.apply(DebugEdit::FirefliesSize(600.0), &mut scene);
    assert_eq!(scene.fireflies.size, 500.0);

    panel.apply(DebugEdit::FirefliesSize(-3.0), &mut scene);
    assert_eq!(scene.fireflies.size, 0.0);

    panel.apply(DebugEdit::FirefliesSize(123.4), &mut scene);
    assert_eq!(scene.fireflies.size, 123.0);
}

#[test]
fn should_leave_the_colours_alone_when_resizing_fireflies() {
    let mut panel = DebugPanel::new(&SceneConfig::default());
    let mut scene = scene(800, 600, 1.0);
    let before = scene.clone();

    panel.apply(DebugEdit::FirefliesSize(250.0), &mut scene);

    assert_eq!(scene.fireflies.size, 250.0);
    assert_eq!(scene.portal, before.portal);
    assert_eq!(scene.clear_color, before.clear_color);
}

#[test]
fn should_reject_non_finite_firefly_size() {
    let mut panel = DebugPanel::new(&SceneConfig::default());
    let mut scene = scene(800, 600, 1.0);
    panel.apply(DebugEdit::FirefliesSize(250.0), &mut scene);

    for size in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
        panel.apply(DebugEdit::FirefliesSize(size), &mut scene);
        assert_eq!(scene.fireflies.size, 250.0);
    }
}

#[test]
fn should_order_an_inverted_size_range() {
    let config = SceneConfig {
        fireflies_size_range: 500.0..=0.0,
        ..SceneConfig::default()
    };
    let mut panel = DebugPanel::new(&config);
    let mut scene = scene(800, 600, 1.0);

    assert_eq!(panel.size_control.range, 0.0..=500.0);

    panel.apply(DebugEdit::FirefliesSize(700.0), &mut scene);
    assert_eq!(scene.fireflies.size, 500.0);
}

#[test]
fn should_replace_a_non_finite_size_range() {
    let control = SizeControl::new(0.0..=f32::NAN, f32::NAN);

    assert_eq!(control.range, SceneConfig::default().fireflies_size_range);
    assert_eq!(control.step, 0.0);
    assert_eq!(control.accept(12.5), Some(12.5));
}
