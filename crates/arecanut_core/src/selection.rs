//! The user's chosen image and its on-screen preview.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Extensions the picker offers and the drop zone accepts.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp", "tif", "tiff"];

/// Longest side of the decoded preview, in pixels.
pub const PREVIEW_MAX_SIDE: u32 = 512;

/// An image file picked by the user, held in memory until reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    /// Reads `path` into memory. Fails for non-image extensions.
    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());
        let media_type = media_type_for(&name)
            .with_context(|| format!("not an image file: {}", path.display()))?;
        let bytes =
            fs::read(path).with_context(|| format!("cannot read image: {}", path.display()))?;
        Ok(Self {
            name,
            media_type: media_type.to_string(),
            bytes,
        })
    }

    /// Wraps content that arrived without a path (e.g. a drag-and-drop payload).
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
        let name = name.into();
        let media_type =
            media_type_for(&name).with_context(|| format!("not an image file: {name}"))?;
        Ok(Self {
            name,
            media_type: media_type.to_string(),
            bytes,
        })
    }
}

/// Whether the picker should accept a file with this name.
pub fn is_supported_image(name: &str) -> bool {
    media_type_for(name).is_some()
}

fn media_type_for(name: &str) -> Option<&'static str> {
    let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        "tif" | "tiff" => "image/tiff",
        _ => return None,
    };
    Some(mime)
}

/// Locally decoded thumbnail of a [`SelectedFile`], ready to upload as a texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub width: u32,
    pub height: u32,
    /// Unmultiplied RGBA8, row-major.
    pub rgba: Vec<u8>,
}

impl Preview {
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(bytes).context("cannot decode image for preview")?;
        // `thumbnail` also scales up; only shrink.
        let thumb = if img.width() > PREVIEW_MAX_SIDE || img.height() > PREVIEW_MAX_SIDE {
            img.thumbnail(PREVIEW_MAX_SIDE, PREVIEW_MAX_SIDE).to_rgba8()
        } else {
            img.to_rgba8()
        };
        let (width, height) = thumb.dimensions();
        Ok(Self {
            width,
            height,
            rgba: thumb.into_raw(),
        })
    }
}
