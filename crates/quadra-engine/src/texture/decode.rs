use anyhow::{Context, Result};

/// Decoded image: tightly packed RGBA8, rows top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Decodes PNG/JPEG/BMP bytes into RGBA8, format sniffed from the data.
pub fn decode_rgba8(bytes: &[u8]) -> Result<DecodedImage> {
    let image = image::load_from_memory(bytes)
        .context("failed to decode image")?
        .to_rgba8();
    let (width, height) = image.dimensions();
    Ok(DecodedImage { width, height, pixels: image.into_raw() })
}
