//! PNG export of a rendered QR image.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use image::RgbaImage;
use tracing::info;

/// Save `img` as PNG under `directory` with `file_name`, creating the
/// directory when needed. Returns the written path.
pub fn save_png(img: &RgbaImage, directory: &Path, file_name: &str) -> anyhow::Result<PathBuf> {
    if !directory.exists() {
        fs::create_dir_all(directory)
            .with_context(|| format!("creating output directory {}", directory.display()))?;
    }
    let path = directory.join(file_name);
    img.save_with_format(&path, image::ImageFormat::Png)
        .with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), width = img.width(), "Saved PNG");
    Ok(path)
}
