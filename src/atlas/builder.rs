use anyhow::Result;
use image::{RgbaImage, imageops};
use log::{info, warn};

use super::{Atlas, AtlasBuild};
use crate::error::TexpackError;
use crate::packing::{Block, Container, pack};
use crate::texture::{ImageSource, PackedTexture, SourceTexture};

/// Packs measured textures into fixed-size square containers and composites
/// the container images
pub struct AtlasBuilder {
    pub side_length: u32,
}

impl AtlasBuilder {
    pub fn new(side_length: u32) -> Self {
        Self { side_length }
    }

    /// Build container images from the given textures.
    ///
    /// Oversized textures and textures whose pixels cannot be fetched are left
    /// out and reported in [`AtlasBuild::skipped`]; the rest of the batch is
    /// still packed.
    pub fn build<S: ImageSource + ?Sized>(
        &self,
        textures: Vec<SourceTexture>,
        source: &S,
    ) -> Result<AtlasBuild> {
        let blocks = textures
            .iter()
            .enumerate()
            .map(|(i, t)| Block::new(i, t.width, t.height).with_nested(t.sub_textures.clone()))
            .collect();

        let packing = pack(blocks, self.side_length)?;

        let mut build = AtlasBuild::default();

        for rejected in &packing.rejected {
            build.skipped.push(TexpackError::OversizedRectangle {
                name: textures[rejected.key].name.clone(),
                width: rejected.width,
                height: rejected.height,
                side_length: self.side_length,
            });
        }

        for container in packing.containers {
            let atlas = self.composite(container, &textures, source, &mut build.skipped);
            build.atlases.push(atlas);
        }

        info!(
            "Created {} container(s) with {} total textures ({} skipped)",
            build.atlases.len(),
            build.packed_count(),
            build.skipped.len()
        );

        Ok(build)
    }

    fn composite<S: ImageSource + ?Sized>(
        &self,
        container: Container<usize>,
        textures: &[SourceTexture],
        source: &S,
        skipped: &mut Vec<TexpackError>,
    ) -> Atlas {
        let mut atlas = Atlas::new(container.index, self.side_length);
        atlas.occupancy = container.occupancy();

        for placed in container.blocks {
            let texture = &textures[placed.key];

            match fetch_pixels(texture, source) {
                Ok(pixels) => {
                    imageops::replace(
                        &mut atlas.image,
                        &pixels,
                        i64::from(placed.rect.x),
                        i64::from(placed.rect.y),
                    );

                    atlas.textures.push(PackedTexture {
                        name: texture.name.clone(),
                        rect: placed.rect,
                        sub_textures: placed.nested,
                        container_index: container.index,
                    });
                }
                Err(e) => {
                    warn!("Leaving '{}' out of container {}: {}", texture.name, container.index, e);
                    skipped.push(e);
                }
            }
        }

        info!(
            "Container {}: {}x{} with {} textures ({:.1}% occupancy)",
            atlas.index,
            self.side_length,
            self.side_length,
            atlas.textures.len(),
            atlas.occupancy * 100.0
        );

        atlas
    }
}

fn fetch_pixels<S: ImageSource + ?Sized>(
    texture: &SourceTexture,
    source: &S,
) -> Result<RgbaImage, TexpackError> {
    let pixels = source.fetch(&texture.path)?;
    let (actual_width, actual_height) = pixels.dimensions();

    if (actual_width, actual_height) != (texture.width, texture.height) {
        return Err(TexpackError::DimensionMismatch {
            path: texture.path.clone(),
            width: texture.width,
            height: texture.height,
            actual_width,
            actual_height,
        });
    }

    Ok(pixels)
}
