use image::RgbaImage;

use crate::error::TexpackError;
use crate::texture::PackedTexture;

/// One completed container image
#[derive(Debug)]
pub struct Atlas {
    /// Container index (layer in the texture array)
    pub index: usize,
    /// Side length of the square container
    pub side_length: u32,
    /// Composited image; unplaced pixels stay transparent black
    pub image: RgbaImage,
    /// All textures packed into this container
    pub textures: Vec<PackedTexture>,
    /// Claimed area ratio (0.0 to 1.0)
    pub occupancy: f64,
}

impl Atlas {
    pub fn new(index: usize, side_length: u32) -> Self {
        Self {
            index,
            side_length,
            image: RgbaImage::new(side_length, side_length),
            textures: Vec::new(),
            occupancy: 0.0,
        }
    }
}

/// Output of one [`AtlasBuilder::build`](super::AtlasBuilder::build) run
#[derive(Debug, Default)]
pub struct AtlasBuild {
    pub atlases: Vec<Atlas>,
    /// Textures left out of every container, with the reason
    pub skipped: Vec<TexpackError>,
}

impl AtlasBuild {
    pub fn packed_count(&self) -> usize {
        self.atlases.iter().map(|a| a.textures.len()).sum()
    }
}
