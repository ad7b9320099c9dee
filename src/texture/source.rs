use std::path::Path;

use image::{ImageReader, RgbaImage};

use crate::error::TexpackError;

/// Image decoding as seen by the packer.
///
/// Packing only needs dimensions; pixels are fetched later, one texture at a
/// time, when container images are composited.
pub trait ImageSource: Sync {
    fn measure(&self, path: &Path) -> Result<(u32, u32), TexpackError>;

    /// Decode to RGBA8 (`width * height * 4` bytes)
    fn fetch(&self, path: &Path) -> Result<RgbaImage, TexpackError>;
}

/// Decodes images from the local filesystem with the `image` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct FsImageSource;

impl ImageSource for FsImageSource {
    fn measure(&self, path: &Path) -> Result<(u32, u32), TexpackError> {
        image::image_dimensions(path).map_err(|e| TexpackError::DecodeFailure {
            path: path.to_path_buf(),
            source: e,
        })
    }

    fn fetch(&self, path: &Path) -> Result<RgbaImage, TexpackError> {
        let img = ImageReader::open(path)
            .map_err(|e| TexpackError::DecodeFailure {
                path: path.to_path_buf(),
                source: e.into(),
            })?
            .with_guessed_format()
            .map_err(|e| TexpackError::DecodeFailure {
                path: path.to_path_buf(),
                source: e.into(),
            })?
            .decode()
            .map_err(|e| TexpackError::DecodeFailure {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(img.into_rgba8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_measure_and_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("brick.png");
        let mut img = RgbaImage::new(12, 7);
        img.put_pixel(3, 4, Rgba([10, 20, 30, 255]));
        img.save(&path).unwrap();

        assert_eq!(FsImageSource.measure(&path).unwrap(), (12, 7));

        let fetched = FsImageSource.fetch(&path).unwrap();
        assert_eq!(fetched.dimensions(), (12, 7));
        assert_eq!(fetched.as_raw().len(), 12 * 7 * 4);
        assert_eq!(*fetched.get_pixel(3, 4), Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn test_corrupt_file_is_decode_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not a png").unwrap();

        assert!(matches!(
            FsImageSource.measure(&path),
            Err(TexpackError::DecodeFailure { .. })
        ));
        assert!(matches!(
            FsImageSource.fetch(&path),
            Err(TexpackError::DecodeFailure { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_decode_failure() {
        let dir = tempfile::tempdir().unwrap();
        let result = FsImageSource.measure(&dir.path().join("nope.png"));
        assert!(matches!(result, Err(TexpackError::DecodeFailure { .. })));
    }
}
