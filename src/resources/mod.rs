/**
 * This module contains all logic for loading models and textures from external files.
 *
 * Native builds read from `./assets/`, web builds fetch from `<origin>/assets/`.
 * Loading stays free of GPU handles so it can run off the event-loop thread;
 * the results are uploaded where the device lives.
 */
pub mod texture;

pub use texture::load_image;

use std::borrow::Cow;

use anyhow::{Context as _, bail};

/// A parsed glTF document together with its binary buffers.
#[derive(Debug)]
pub struct GltfData {
    pub name: String,
    pub document: gltf::Document,
    pub buffers: Vec<Vec<u8>>,
}

#[cfg(target_arch = "wasm32")]
fn format_url(file_name: &str) -> anyhow::Result<reqwest::Url> {
    let window = web_sys::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let origin = window
        .location()
        .origin()
        .map_err(|e| anyhow::anyhow!("no origin: {e:?}"))?;
    let base = reqwest::Url::parse(&format!("{}/assets/", origin))?;
    Ok(base.join(file_name)?)
}

#[cfg(not(target_arch = "wasm32"))]
fn asset_path(file_name: &str) -> std::path::PathBuf {
    std::path::Path::new("./").join("assets").join(file_name)
}

pub async fn load_binary(file_name: &str) -> anyhow::Result<Vec<u8>> {
    #[cfg(target_arch = "wasm32")]
    let data = {
        let url = format_url(file_name)?;
        reqwest::get(url)
            .await?
            .error_for_status()?
            .bytes()
            .await?
            .to_vec()
    };
    #[cfg(not(target_arch = "wasm32"))]
    let data = {
        let path = asset_path(file_name);
        tokio::fs::read(&path)
            .await
            .with_context(|| format!("could not read {}", path.display()))?
    };

    Ok(data)
}

/// Geometry compression extensions the mesh reader cannot decode.
pub const UNSUPPORTED_EXTENSIONS: &[&str] =
    &["KHR_draco_mesh_compression", "EXT_meshopt_compression"];

/// Parse `.glb` or `.gltf` bytes.
///
/// A file that requires compressed geometry is rejected with an error naming
/// the extension, before the generic validation would reject it.
pub fn parse_gltf(file_name: &str, bytes: &[u8]) -> anyhow::Result<gltf::Gltf> {
    let json = if bytes.starts_with(b"glTF") {
        gltf::Glb::from_slice(bytes)
            .with_context(|| format!("{file_name} is not a valid binary glTF"))?
            .json
    } else {
        Cow::Borrowed(bytes)
    };
    // A document that does not even deserialize is reported by the full parse below.
    if let Ok(root) = gltf::json::Root::from_slice(&json) {
        if let Some(extension) = root
            .extensions_required
            .iter()
            .find(|extension| UNSUPPORTED_EXTENSIONS.contains(&extension.as_str()))
        {
            bail!(
                "{file_name} requires {extension}, compressed geometry is not supported; \
                 export the model without mesh compression"
            );
        }
    }
    gltf::Gltf::from_slice(bytes).with_context(|| format!("could not parse {file_name}"))
}

/// Load a `.glb`/`.gltf` file and every buffer it references.
pub async fn load_gltf(file_name: &str) -> anyhow::Result<GltfData> {
    let bytes = load_binary(file_name).await?;
    let gltf::Gltf { document, blob } = parse_gltf(file_name, &bytes)?;

    let mut buffers = Vec::new();
    for buffer in document.buffers() {
        match buffer.source() {
            gltf::buffer::Source::Bin => {
                let blob = blob
                    .as_deref()
                    .with_context(|| format!("{file_name} references a missing binary chunk"))?;
                buffers.push(blob.to_vec());
            }
            gltf::buffer::Source::Uri(uri) => {
                buffers.push(load_binary(uri).await?);
            }
        }
    }
    log::info!(
        "loaded {} ({} nodes, {} buffers)",
        file_name,
        document.nodes().len(),
        buffers.len()
    );

    Ok(GltfData {
        name: file_name.to_string(),
        document,
        buffers,
    })
}
