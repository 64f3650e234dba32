//! Photo validation, resizing, and data URL handling.
//!
//! Session photos arrive as data URLs from the capture surface. Before
//! upload they are resized to max 1024px on the longest edge to keep
//! payloads small, and re-encoded as JPEG.

use base64::{engine::general_purpose::STANDARD, Engine};
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use tracing::info;

/// Maximum dimension (width or height) for photos sent to the model.
pub const MAX_IMAGE_DIMENSION: u32 = 1024;

/// Minimum dimension for a usable face photo (too small = poor identity
/// preservation).
pub const MIN_IMAGE_DIMENSION: u32 = 200;

/// Split a `data:<mime>;base64,<payload>` URL into its media type and
/// decoded bytes.
pub fn parse_data_url(data_url: &str) -> Result<(String, Vec<u8>), String> {
    let rest = data_url
        .strip_prefix("data:")
        .ok_or("Not a data URL: missing 'data:' prefix")?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or("Not a data URL: missing ',' separator")?;
    let mime = meta
        .strip_suffix(";base64")
        .ok_or("Unsupported data URL: only base64 encoding is handled")?;
    if mime.is_empty() {
        return Err("Data URL has an empty media type".to_string());
    }

    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| format!("Failed to decode data URL payload: {}", e))?;
    Ok((mime.to_string(), bytes))
}

/// Prepare a session photo for upload: decode, validate, resize, and
/// re-encode as a JPEG data URL.
///
/// # Errors
/// - Input is not a base64 data URL
/// - Image cannot be decoded
/// - Image too small (< 200px on shortest side)
pub fn prepare_photo(photo_data_url: &str) -> Result<String, String> {
    let (_, bytes) = parse_data_url(photo_data_url)?;

    let img = image::load_from_memory(&bytes)
        .map_err(|e| format!("Failed to load photo: {}. Ensure it's a valid JPEG/PNG/WebP.", e))?;

    let (width, height) = (img.width(), img.height());
    info!("Loaded photo: {}x{}", width, height);

    let min_side = width.min(height);
    if min_side < MIN_IMAGE_DIMENSION {
        return Err(format!(
            "Photo too small for reliable generation: {}x{}. Minimum dimension is {}px.",
            width, height, MIN_IMAGE_DIMENSION
        ));
    }

    let resized = resize_if_needed(img, MAX_IMAGE_DIMENSION);
    let jpeg_bytes = encode_to_jpeg(&resized)?;
    info!(
        "Prepared photo: {}x{}, {} JPEG bytes",
        resized.width(),
        resized.height(),
        jpeg_bytes.len()
    );

    Ok(format!(
        "data:image/jpeg;base64,{}",
        STANDARD.encode(&jpeg_bytes)
    ))
}

/// Resize if either dimension exceeds max, maintaining aspect ratio.
fn resize_if_needed(img: DynamicImage, max_dimension: u32) -> DynamicImage {
    let (width, height) = (img.width(), img.height());

    if width <= max_dimension && height <= max_dimension {
        return img;
    }

    let scale = max_dimension as f32 / width.max(height) as f32;
    let new_width = (width as f32 * scale) as u32;
    let new_height = (height as f32 * scale) as u32;

    img.resize(new_width, new_height, image::imageops::FilterType::Lanczos3)
}

fn encode_to_jpeg(img: &DynamicImage) -> Result<Vec<u8>, String> {
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, ImageFormat::Jpeg)
        .map_err(|e| format!("Failed to encode photo to JPEG: {}", e))?;
    Ok(buffer.into_inner())
}
