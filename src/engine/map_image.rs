use std::fs;
use std::io;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use thiserror::Error;

pub const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "webp", "bmp"];

#[derive(Debug, Error)]
pub enum MapImageError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("map image is not a data URL")]
    NotDataUrl,

    #[error("data URL is not base64 encoded")]
    NotBase64,

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("image decode error: {0}")]
    Image(#[from] image::ImageError),
}

pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}

pub fn encode_data_url(bytes: &[u8], mime: &str) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Reads an image file into the opaque map reference kept by the store.
pub fn load_file_as_data_url(path: &Path) -> Result<String, MapImageError> {
    let bytes = fs::read(path)?;
    Ok(encode_data_url(&bytes, mime_for_path(path)))
}

pub fn decode_data_url(url: &str) -> Result<Vec<u8>, MapImageError> {
    let rest = url.strip_prefix("data:").ok_or(MapImageError::NotDataUrl)?;
    let (meta, payload) = rest.split_once(',').ok_or(MapImageError::NotDataUrl)?;

    if !meta.ends_with(";base64") {
        return Err(MapImageError::NotBase64);
    }

    Ok(STANDARD.decode(payload.trim())?)
}

/// Decodes a map data URL into RGBA pixels for display.
pub fn decode_rgba(url: &str) -> Result<image::RgbaImage, MapImageError> {
    let bytes = decode_data_url(url)?;
    Ok(image::load_from_memory(&bytes)?.to_rgba8())
}

/// Like [`load_file_as_data_url`], but fails unless the pixels decode.
pub fn load_map_file(path: &Path) -> Result<String, MapImageError> {
    let url = load_file_as_data_url(path)?;
    decode_rgba(&url)?;
    Ok(url)
}
