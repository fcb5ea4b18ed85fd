use portal_scene::{
    config::SceneConfig,
    data_structures::scene_graph::{SceneGraph, SceneNode},
    scene::SceneState,
};

/// Scene state with the default configuration.
pub fn scene(width: u32, height: u32, scale_factor: f64) -> SceneState {
    SceneState::new(&SceneConfig::default(), width, height, scale_factor)
}

/// The top level of the portal model as exported: three shared-material
/// targets plus a node that keeps its own colour.
pub fn portal_model() -> SceneGraph {
    SceneGraph::new(vec![
        SceneNode::new("baked"),
        SceneNode::new("poleLightA"),
        SceneNode::new("poleLightB"),
        SceneNode::new("portalLight"),
        SceneNode::new("rock"),
    ])
}

pub fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-4,
        "expected {expected}, got {actual}"
    );
}

pub fn assert_point_close(actual: [f32; 3], expected: [f32; 3]) {
    for (a, e) in actual.iter().zip(expected) {
        assert_close(*a, e);
    }
}

#[cfg(feature = "integration-tests")]
pub fn headless_device() -> (wgpu::Device, wgpu::Queue) {
    use portal_scene::context::{mk_instance, request_device};

    let instance = mk_instance();
    let (_, device, queue) = futures::executor::block_on(request_device(&instance, None))
        .expect("integration tests need a graphics adapter");
    (device, queue)
}
