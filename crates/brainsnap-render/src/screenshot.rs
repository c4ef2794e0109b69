//! Writing frames to image files.

use std::path::Path;

use brainsnap_core::{Frame, SnapError};
use image::{ImageBuffer, Rgba};

/// Saves a frame to an image file.
///
/// The format follows the extension: `.png`, `.jpg` or `.jpeg`.
pub fn save_image(path: impl AsRef<Path>, frame: &Frame) -> Result<(), ScreenshotError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let img = to_image(frame)?;

    match extension.as_str() {
        "png" => {
            img.save_with_format(path, image::ImageFormat::Png)?;
        }
        "jpg" | "jpeg" => {
            // Convert to RGB for JPEG (no alpha)
            let rgb_img = image::DynamicImage::ImageRgba8(img).to_rgb8();
            rgb_img.save_with_format(path, image::ImageFormat::Jpeg)?;
        }
        _ => {
            return Err(ScreenshotError::UnsupportedFormat(extension));
        }
    }

    log::debug!(
        "wrote {}x{} frame to {}",
        frame.width(),
        frame.height(),
        path.display()
    );
    Ok(())
}

/// Encodes a frame as PNG in memory.
pub fn encode_png(frame: &Frame) -> Result<Vec<u8>, ScreenshotError> {
    let img = to_image(frame)?;
    let mut buffer = std::io::Cursor::new(Vec::new());
    img.write_to(&mut buffer, image::ImageFormat::Png)?;
    Ok(buffer.into_inner())
}

fn to_image(frame: &Frame) -> Result<ImageBuffer<Rgba<u8>, Vec<u8>>, ScreenshotError> {
    // Frames are top-left origin RGBA, same as the image crate
    ImageBuffer::from_raw(frame.width(), frame.height(), frame.pixels().to_vec())
        .ok_or(ScreenshotError::InvalidImageData)
}

/// Error type for screenshot operations.
#[derive(Debug, thiserror::Error)]
pub enum ScreenshotError {
    #[error("Failed to save image: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid image data")]
    InvalidImageData,
}

impl From<ScreenshotError> for SnapError {
    fn from(err: ScreenshotError) -> Self {
        match err {
            ScreenshotError::IoError(e) => SnapError::IoError(e),
            other => SnapError::Sink(other.to_string()),
        }
    }
}
