use anyhow::Context as _;

use crate::resources::load_binary;

/// Fetch and decode an image file. Decoding happens here, upload happens on
/// the thread that owns the device.
pub async fn load_image(file_name: &str) -> anyhow::Result<image::DynamicImage> {
    let data = load_binary(file_name).await?;
    let img = image::load_from_memory(&data)
        .with_context(|| format!("could not decode {file_name}"))?;
    log::info!("loaded {} ({}x{})", file_name, img.width(), img.height());
    Ok(img)
}
