use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::warn;
use serde::Deserialize;

use crate::metadata::Region;
use crate::packing::Rect;

/// The part of an atlas description needed to treat an image as a sub-atlas.
/// A metadata file written by this crate for a single container matches it,
/// so packed output can be packed again.
#[derive(Debug, Deserialize)]
struct SidecarFile {
    #[serde(default)]
    sub_textures: BTreeMap<String, Region>,
}

/// `foo.png` -> `foo.json`
pub fn sidecar_path(image_path: &Path) -> PathBuf {
    image_path.with_extension("json")
}

/// Read the named regions of a sub-atlas image, if it has a sidecar.
///
/// Regions that fall outside the image are dropped with a warning.
pub fn read_sub_textures(
    image_path: &Path,
    width: u32,
    height: u32,
) -> Result<BTreeMap<String, Rect>> {
    let path = sidecar_path(image_path);
    if !path.is_file() {
        return Ok(BTreeMap::new());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read sub-atlas file: {}", path.display()))?;
    let sidecar: SidecarFile = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse sub-atlas file: {}", path.display()))?;

    let bounds = Rect::new(0, 0, width, height);
    let regions = sidecar
        .sub_textures
        .into_iter()
        .filter_map(|(name, region)| {
            let rect = Rect::from(region);
            if bounds.contains(&rect) {
                Some((name, rect))
            } else {
                warn!(
                    "Ignoring sub-texture '{}' in {}: {:?} lies outside {}x{}",
                    name,
                    path.display(),
                    rect,
                    width,
                    height
                );
                None
            }
        })
        .collect();

    Ok(regions)
}
