use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::packing::Rect;

/// A measured source image, before packing
#[derive(Debug, Clone)]
pub struct SourceTexture {
    /// Original file path
    pub path: PathBuf,
    /// Lookup identity (path relative to the scanned directory)
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Named regions when the source image is itself an atlas, relative to
    /// the image's top-left corner
    pub sub_textures: BTreeMap<String, Rect>,
}

impl SourceTexture {
    pub fn is_sub_atlas(&self) -> bool {
        !self.sub_textures.is_empty()
    }
}

/// Result of placing a texture in a container
#[derive(Debug, Clone)]
pub struct PackedTexture {
    /// Reference to source texture name
    pub name: String,
    /// Container-relative placement
    pub rect: Rect,
    /// Named regions, container-relative
    pub sub_textures: BTreeMap<String, Rect>,
    /// Index of the container this texture belongs to
    pub container_index: usize,
}
