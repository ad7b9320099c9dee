use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::atlas::Atlas;
use crate::output::container_image_filename;
use crate::packing::Rect;

/// Pixel-space region inside a container (origin top-left)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl From<Rect> for Region {
    fn from(rect: Rect) -> Self {
        Self {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
        }
    }
}

impl From<Region> for Rect {
    fn from(region: Region) -> Self {
        Rect::new(region.x, region.y, region.width, region.height)
    }
}

/// Where one source texture landed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureEntry {
    pub container_index: usize,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Named regions of a sub-atlas, already in container space
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub sub_textures: BTreeMap<String, Region>,
}

impl TextureEntry {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    pub app: String,
    pub version: String,
    pub container_side_length: u32,
    /// Container image file names, in container index order
    pub containers: Vec<String>,
}

/// Contents of the metadata file written next to the container images
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtlasMetadata {
    pub meta: Meta,
    /// Keyed by source texture name
    pub sub_textures: BTreeMap<String, TextureEntry>,
}

impl AtlasMetadata {
    pub fn from_atlases(atlases: &[Atlas], side_length: u32, base_name: &str) -> Self {
        let containers = atlases
            .iter()
            .map(|atlas| container_image_filename(base_name, atlas.index))
            .collect();

        let sub_textures = atlases
            .iter()
            .flat_map(|atlas| atlas.textures.iter())
            .map(|texture| {
                let entry = TextureEntry {
                    container_index: texture.container_index,
                    x: texture.rect.x,
                    y: texture.rect.y,
                    width: texture.rect.width,
                    height: texture.rect.height,
                    sub_textures: texture
                        .sub_textures
                        .iter()
                        .map(|(name, rect)| (name.clone(), Region::from(*rect)))
                        .collect(),
                };
                (texture.name.clone(), entry)
            })
            .collect();

        Self {
            meta: Meta {
                app: "texpack".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                container_side_length: side_length,
                containers,
            },
            sub_textures,
        }
    }

    /// Check that the side length is usable and every entry lies inside its
    /// container
    pub fn validate(&self) -> Result<(), String> {
        let side = self.meta.container_side_length;
        if side == 0 {
            return Err("container_side_length must be greater than zero".to_string());
        }
        self.check_bounds(side, side)
    }

    /// Check every entry against a `width` x `height` container and the listed
    /// container images
    pub fn check_bounds(&self, width: u32, height: u32) -> Result<(), String> {
        let container = Rect::new(0, 0, width, height);
        let container_count = self.meta.containers.len();

        for (name, entry) in &self.sub_textures {
            if entry.container_index >= container_count {
                return Err(format!(
                    "'{}' refers to container {} but only {} are listed",
                    name, entry.container_index, container_count
                ));
            }

            let rect = entry.rect();
            if !container.contains(&rect) {
                return Err(format!(
                    "'{}' at {:?} lies outside the {}x{} container",
                    name, rect, width, height
                ));
            }

            for (sub_name, region) in &entry.sub_textures {
                let sub = Rect::from(*region);
                if !rect.contains(&sub) {
                    return Err(format!(
                        "sub-texture '{}' of '{}' at {:?} lies outside its parent",
                        sub_name, name, sub
                    ));
                }
            }
        }

        Ok(())
    }
}
