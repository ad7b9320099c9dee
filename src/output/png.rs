use std::fs;
use std::io::Cursor;
use std::path::Path;

use anyhow::Result;
use image::ImageFormat;

use crate::atlas::Atlas;
use crate::cli::CompressionLevel;
use crate::error::TexpackError;

/// Save a container image as RGBA PNG, optionally with compression
pub fn save_atlas_image(
    atlas: &Atlas,
    path: &Path,
    compress: Option<CompressionLevel>,
) -> Result<()> {
    let mut png_data = Cursor::new(Vec::new());
    atlas
        .image
        .write_to(&mut png_data, ImageFormat::Png)
        .map_err(|e| TexpackError::ImageSave {
            path: path.to_path_buf(),
            source: e,
        })?;

    let output_data = if let Some(level) = compress {
        let opts = match level {
            CompressionLevel::Level(n) => oxipng::Options::from_preset(n),
            CompressionLevel::Max => oxipng::Options::max_compression(),
        };
        oxipng::optimize_from_memory(&png_data.into_inner(), &opts).map_err(|e| {
            TexpackError::PngCompress {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        })?
    } else {
        png_data.into_inner()
    };

    fs::write(path, output_data).map_err(|e| TexpackError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_saved_image_keeps_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("atlas_0.png");

        let mut atlas = Atlas::new(0, 16);
        atlas.image.put_pixel(2, 3, Rgba([1, 2, 3, 128]));

        save_atlas_image(&atlas, &path, Some(CompressionLevel::Level(1))).unwrap();

        let reloaded = image::open(&path).unwrap().into_rgba8();
        assert_eq!(reloaded.dimensions(), (16, 16));
        assert_eq!(*reloaded.get_pixel(2, 3), Rgba([1, 2, 3, 128]));
        assert_eq!(*reloaded.get_pixel(0, 0), Rgba([0, 0, 0, 0]));
    }
}
