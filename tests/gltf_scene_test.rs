#[cfg(feature = "integration-tests")]
mod common;

#[cfg(feature = "integration-tests")]
mod tests {
    use portal_scene::{
        data_structures::scene_graph::SceneGraph,
        materials::{MaterialKind, assign_materials},
        resources::GltfData,
    };

    use crate::common::test_utils::headless_device;

    // One triangle mesh shared by every node; "poleLightA" only carries it
    // through a child and "rock" has no mesh at all.
    const DOCUMENT: &str = r#"{
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "nodes": [0, 1, 2, 4] }],
        "nodes": [
            { "name": "baked", "mesh": 0 },
            { "name": "portalLight", "mesh": 0, "translation": [0.0, 1.0, 0.0] },
            { "name": "poleLightA", "children": [3] },
            { "name": "poleLightA_bulb", "mesh": 0 },
            { "name": "rock" }
        ],
        "meshes": [{ "name": "triangle", "primitives": [{ "attributes": { "POSITION": 0 } }] }],
        "accessors": [{
            "bufferView": 0,
            "componentType": 5126,
            "count": 3,
            "type": "VEC3",
            "min": [0.0, 0.0, 0.0],
            "max": [1.0, 1.0, 0.0]
        }],
        "bufferViews": [{ "buffer": 0, "byteLength": 36 }],
        "buffers": [{ "byteLength": 36 }]
    }"#;

    fn triangle() -> Vec<u8> {
        [[0.0f32, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]
            .iter()
            .flatten()
            .flat_map(|f| f.to_le_bytes())
            .collect()
    }

    #[test]
    fn should_build_the_scene_graph_from_a_gltf_document() {
        let (device, _queue) = headless_device();
        let gltf = gltf::Gltf::from_slice(DOCUMENT.as_bytes()).unwrap();
        let data = GltfData {
            name: "triangle.gltf".to_string(),
            document: gltf.document,
            buffers: vec![triangle()],
        };

        let mut graph = SceneGraph::from_gltf(&data, &device).unwrap();
        let names: Vec<&str> = graph.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["baked", "portalLight", "poleLightA", "rock"]);

        assert_eq!(graph.child("baked").unwrap().meshes.len(), 1);
        assert_eq!(graph.child("baked").unwrap().meshes[0].num_elements, 3);
        assert!(graph.child("poleLightA").unwrap().meshes.is_empty());
        assert_eq!(graph.child("poleLightA").unwrap().children[0].meshes.len(), 1);
        assert!(graph.child("rock").unwrap().meshes.is_empty());
        assert_eq!(
            graph.child("portalLight").unwrap().world_transform().position.y,
            1.0
        );

        assert_eq!(assign_materials(&mut graph), 3);
        assert_eq!(
            graph.child("poleLightA").unwrap().material,
            Some(MaterialKind::PoleLight)
        );
        assert!(graph.child("poleLightA").unwrap().children[0].material.is_none());
        assert!(graph.child("rock").unwrap().material.is_none());
    }
}
