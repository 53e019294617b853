use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;
use thiserror::Error;

/// Longest edge sent to the model. Larger uploads are scaled down to fit.
pub const MAX_DIMENSION: u32 = 800;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Uploaded file is empty")]
    Empty,
    #[error("Uploaded file is not a valid image: {0}")]
    Decode(#[source] image::ImageError),
    #[error("Failed to re-encode image: {0}")]
    Encode(#[source] image::ImageError),
}

/// Downscaled, re-encoded image ready to be inlined in a model request.
#[derive(Debug, Clone)]
pub struct PreparedImage {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
    pub width: u32,
    pub height: u32,
}

/// Decode an upload, shrink it to fit `MAX_DIMENSION` and re-encode it as JPEG.
///
/// Images already inside the bound keep their size; nothing is upscaled.
pub fn prepare_image(data: &[u8]) -> Result<PreparedImage, ImageError> {
    if data.is_empty() {
        return Err(ImageError::Empty);
    }

    let img = image::load_from_memory(data).map_err(ImageError::Decode)?;
    let (orig_w, orig_h) = img.dimensions();

    let img = if orig_w > MAX_DIMENSION || orig_h > MAX_DIMENSION {
        img.thumbnail(MAX_DIMENSION, MAX_DIMENSION)
    } else {
        img
    };
    let (width, height) = img.dimensions();
    log::debug!("🖼️ Image {}x{} -> {}x{}", orig_w, orig_h, width, height);

    // JPEG has no alpha channel
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let mut bytes = Vec::new();
    rgb.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)
        .map_err(ImageError::Encode)?;

    Ok(PreparedImage {
        bytes,
        mime_type: "image/jpeg",
        width,
        height,
    })
}

#[cfg(test)]
pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgba8(image::RgbaImage::new(width, height));
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}
