use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use anyhow::Result;
use log::{info, warn};
use rayon::prelude::*;

use super::scan::{ImagePath, OutputFilter, collect_image_paths};
use super::{ImageSource, SourceTexture, read_sub_textures};
use crate::error::TexpackError;

/// Measured textures plus the inputs that could not be decoded
#[derive(Debug, Default)]
pub struct LoadedTextures {
    /// In discovery order
    pub textures: Vec<SourceTexture>,
    pub skipped: Vec<TexpackError>,
}

/// Scan inputs (files or directories) and measure every image found.
///
/// Measuring runs in parallel; results keep discovery order so packing stays
/// deterministic. Images that fail to decode are logged and skipped, as are
/// images whose name was already taken by an earlier input.
pub fn load_textures<S: ImageSource + ?Sized>(
    inputs: &[impl AsRef<Path>],
    filter: &OutputFilter,
    sub_atlas: bool,
    source: &S,
) -> Result<LoadedTextures> {
    let image_paths = collect_image_paths(inputs, filter)?;

    if image_paths.is_empty() {
        return Err(TexpackError::NoImages.into());
    }

    let mut loaded = LoadedTextures::default();
    let image_paths = drop_duplicate_names(image_paths, &mut loaded.skipped);

    info!("Measuring {} images...", image_paths.len());

    let measured: Vec<_> = image_paths
        .par_iter()
        .map(|img_path| measure_texture(img_path, sub_atlas, source))
        .collect();

    for result in measured {
        match result {
            Ok(texture) => loaded.textures.push(texture),
            Err(e) => {
                warn!("Skipping texture: {}", e);
                loaded.skipped.push(e);
            }
        }
    }

    Ok(loaded)
}

/// Keep the first image for each name; later ones would overwrite its entry
fn drop_duplicate_names(
    image_paths: Vec<ImagePath>,
    skipped: &mut Vec<TexpackError>,
) -> Vec<ImagePath> {
    let mut first_by_name: HashMap<String, PathBuf> = HashMap::new();
    let mut unique = Vec::with_capacity(image_paths.len());

    for img_path in image_paths {
        let name = img_path.name();
        if let Some(first) = first_by_name.get(&name) {
            let err = TexpackError::DuplicateName {
                name,
                path: img_path.path,
                first: first.clone(),
            };
            warn!("Skipping texture: {}", err);
            skipped.push(err);
        } else {
            first_by_name.insert(name, img_path.path.clone());
            unique.push(img_path);
        }
    }

    unique
}

fn measure_texture<S: ImageSource + ?Sized>(
    img_path: &ImagePath,
    sub_atlas: bool,
    source: &S,
) -> Result<SourceTexture, TexpackError> {
    let (width, height) = source.measure(&img_path.path)?;

    let sub_textures = if sub_atlas {
        read_sub_textures(&img_path.path, width, height).unwrap_or_else(|e| {
            warn!("{:#}; packing {} as a plain texture", e, img_path.path.display());
            BTreeMap::new()
        })
    } else {
        BTreeMap::new()
    };

    Ok(SourceTexture {
        path: img_path.path.clone(),
        name: img_path.name(),
        width,
        height,
        sub_textures,
    })
}
