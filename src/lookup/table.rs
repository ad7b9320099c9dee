use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use glam::{Vec2, Vec4};

use super::{NormalizedBounds, normalize};
use crate::error::TexpackError;
use crate::metadata::{AtlasMetadata, read_metadata};
use crate::packing::Rect;

/// A packed texture (or one of its sub-textures) resolved to container space
#[derive(Debug, Clone, PartialEq)]
pub struct AtlasRegion {
    pub container_index: usize,
    /// Pixel placement, container-relative
    pub rect: Rect,
    pub bounds: NormalizedBounds,
    /// Empty for sub-textures
    pub sub_regions: BTreeMap<String, AtlasRegion>,
}

impl AtlasRegion {
    pub fn remap(&self, local: Vec2) -> Vec2 {
        self.bounds.remap(local)
    }
}

/// Normalized min/max corners plus container index, one per texture, for
/// upload as a flat GPU buffer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vec2,
    pub max: Vec2,
    pub container_index: usize,
}

impl BoundingBox {
    /// `(u_min, v_min, u_max, v_max)`
    pub fn as_vec4(&self) -> Vec4 {
        Vec4::new(self.min.x, self.min.y, self.max.x, self.max.y)
    }
}

/// Runtime lookup from source texture name to its place in the containers
#[derive(Debug, Clone)]
pub struct PackedTextureTable {
    atlas_width: u32,
    atlas_height: u32,
    container_images: Vec<PathBuf>,
    regions: BTreeMap<String, AtlasRegion>,
    bounding_boxes: Vec<BoundingBox>,
    bounding_box_indices: BTreeMap<String, usize>,
}

impl PackedTextureTable {
    /// Load a metadata file; container image paths resolve next to it
    pub fn load(path: &Path) -> Result<Self, TexpackError> {
        let metadata = read_metadata(path)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let side = metadata.meta.container_side_length;
        Self::from_metadata(&metadata, base_dir, side, side)
    }

    /// Build a table for `atlas_width` x `atlas_height` containers. Entries
    /// outside the containers are rejected.
    pub fn from_metadata(
        metadata: &AtlasMetadata,
        base_dir: &Path,
        atlas_width: u32,
        atlas_height: u32,
    ) -> Result<Self, TexpackError> {
        if atlas_width == 0 || atlas_height == 0 {
            return Err(TexpackError::InvalidSideLength);
        }
        metadata
            .check_bounds(atlas_width, atlas_height)
            .map_err(TexpackError::InvalidMetadata)?;

        let resolve = |rect: Rect, container_index: usize| AtlasRegion {
            container_index,
            rect,
            bounds: normalize(
                rect.x,
                rect.y,
                rect.width,
                rect.height,
                atlas_width,
                atlas_height,
            ),
            sub_regions: BTreeMap::new(),
        };

        let mut regions = BTreeMap::new();
        let mut bounding_boxes = Vec::with_capacity(metadata.sub_textures.len());
        let mut bounding_box_indices = BTreeMap::new();

        for (name, entry) in &metadata.sub_textures {
            let mut region = resolve(entry.rect(), entry.container_index);
            region.sub_regions = entry
                .sub_textures
                .iter()
                .map(|(sub_name, sub)| {
                    (
                        sub_name.clone(),
                        resolve(Rect::from(*sub), entry.container_index),
                    )
                })
                .collect();

            bounding_box_indices.insert(name.clone(), bounding_boxes.len());
            bounding_boxes.push(BoundingBox {
                min: region.bounds.min(),
                max: region.bounds.max(),
                container_index: entry.container_index,
            });
            regions.insert(name.clone(), region);
        }

        let container_images = metadata
            .meta
            .containers
            .iter()
            .map(|file| base_dir.join(file))
            .collect();

        Ok(Self {
            atlas_width,
            atlas_height,
            container_images,
            regions,
            bounding_boxes,
            bounding_box_indices,
        })
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn atlas_size(&self) -> (u32, u32) {
        (self.atlas_width, self.atlas_height)
    }

    /// Container image paths in container index order (texture array layers)
    pub fn container_images(&self) -> &[PathBuf] {
        &self.container_images
    }

    pub fn contains(&self, path: &str) -> bool {
        self.regions.contains_key(path)
    }

    pub fn get(&self, path: &str) -> Result<&AtlasRegion, TexpackError> {
        self.regions
            .get(path)
            .ok_or_else(|| TexpackError::NotFound(path.to_string()))
    }

    pub fn get_sub(&self, path: &str, name: &str) -> Result<&AtlasRegion, TexpackError> {
        self.get(path)?
            .sub_regions
            .get(name)
            .ok_or_else(|| TexpackError::SubNotFound {
                path: path.to_string(),
                name: name.to_string(),
            })
    }

    pub fn container_index(&self, path: &str) -> Result<usize, TexpackError> {
        self.get(path).map(|region| region.container_index)
    }

    /// Number of named sub-textures; zero for a plain texture
    pub fn sub_texture_count(&self, path: &str) -> Result<usize, TexpackError> {
        self.get(path).map(|region| region.sub_regions.len())
    }

    pub fn remap(&self, path: &str, local: Vec2) -> Result<Vec2, TexpackError> {
        self.get(path).map(|region| region.remap(local))
    }

    pub fn remap_all(&self, path: &str, local: &[Vec2]) -> Result<Vec<Vec2>, TexpackError> {
        let region = self.get(path)?;
        Ok(local.iter().map(|&uv| region.remap(uv)).collect())
    }

    /// Ordered by texture name
    pub fn bounding_boxes(&self) -> &[BoundingBox] {
        &self.bounding_boxes
    }

    pub fn bounding_box_index(&self, path: &str) -> Result<usize, TexpackError> {
        self.bounding_box_indices
            .get(path)
            .copied()
            .ok_or_else(|| TexpackError::NotFound(path.to_string()))
    }
}
