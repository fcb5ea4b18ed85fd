use portal_scene::resources;

#[tokio::test]
async fn should_fail_on_a_missing_model() {
    let result = resources::load_gltf("does-not-exist.glb").await;

    assert!(result.is_err());
}

#[tokio::test]
async fn should_fail_on_a_missing_texture() {
    let result = resources::load_image("does-not-exist.jpg").await;

    assert!(result.is_err());
}

const DRACO_DOCUMENT: &str = r#"{
    "asset": { "version": "2.0" },
    "extensionsUsed": ["KHR_draco_mesh_compression"],
    "extensionsRequired": ["KHR_draco_mesh_compression"]
}"#;

/// Wrap a JSON document into a binary glTF container without a BIN chunk.
fn glb(json: &str) -> Vec<u8> {
    let mut chunk = json.as_bytes().to_vec();
    while chunk.len() % 4 != 0 {
        chunk.push(b' ');
    }
    let total = 12 + 8 + chunk.len() as u32;
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"glTF");
    bytes.extend_from_slice(&2u32.to_le_bytes());
    bytes.extend_from_slice(&total.to_le_bytes());
    bytes.extend_from_slice(&(chunk.len() as u32).to_le_bytes());
    bytes.extend_from_slice(b"JSON");
    bytes.extend_from_slice(&chunk);
    bytes
}

#[test]
fn should_name_the_compression_extension_of_a_draco_model() {
    for bytes in [DRACO_DOCUMENT.as_bytes().to_vec(), glb(DRACO_DOCUMENT)] {
        let error = resources::parse_gltf("portal.glb", &bytes).unwrap_err();
        let message = format!("{error:#}");

        assert!(message.contains("KHR_draco_mesh_compression"), "{message}");
        assert!(message.contains("portal.glb"), "{message}");
    }
}

#[test]
fn should_parse_an_uncompressed_model() {
    let document = r#"{ "asset": { "version": "2.0" }, "scenes": [{ "nodes": [] }] }"#;

    let gltf = resources::parse_gltf("portal.gltf", document.as_bytes()).unwrap();

    assert_eq!(gltf.document.scenes().len(), 1);
}

#[test]
fn should_report_garbage_as_a_parse_error() {
    let error = resources::parse_gltf("portal.glb", b"not a model").unwrap_err();

    assert!(format!("{error:#}").contains("could not parse portal.glb"));
}
