//! One full regeneration: scan, measure, pack, composite, save.
//!
//! Every run packs the complete current input set from scratch; nothing from a
//! previous run is reused except that its output files are replaced.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};

use crate::atlas::AtlasBuilder;
use crate::cli::CompressionLevel;
use crate::error::TexpackError;
use crate::metadata::{AtlasMetadata, write_metadata};
use crate::output::{container_image_filename, save_atlas_image};
use crate::texture::{ImageSource, OutputFilter, load_textures};

/// Everything a packing run needs to know
#[derive(Debug, Clone)]
pub struct PackSettings {
    /// Directories to scan plus any extra image files
    pub inputs: Vec<PathBuf>,
    pub output_dir: PathBuf,
    /// Base name for `<name>_<n>.png` and `<name>.json`
    pub name: String,
    pub container_side_length: u32,
    /// Read `<image>.json` sidecars describing sub-atlases
    pub sub_atlas: bool,
    pub compress: Option<CompressionLevel>,
}

/// What a run produced
#[derive(Debug)]
pub struct PackReport {
    pub metadata_path: PathBuf,
    pub container_images: Vec<PathBuf>,
    pub packed: usize,
    /// Textures left out, with the reason
    pub skipped: Vec<TexpackError>,
}

/// Run a full packing pass and write container images plus metadata
pub fn regenerate<S: ImageSource + ?Sized>(settings: &PackSettings, source: &S) -> Result<PackReport> {
    if !settings.output_dir.exists() {
        fs::create_dir_all(&settings.output_dir).with_context(|| {
            format!(
                "failed to create output directory: {}",
                settings.output_dir.display()
            )
        })?;
    }

    let filter = OutputFilter::new(Some(&settings.output_dir), &settings.name);
    let loaded = load_textures(&settings.inputs, &filter, settings.sub_atlas, source)?;
    info!("Measured {} textures", loaded.textures.len());

    let build = AtlasBuilder::new(settings.container_side_length).build(loaded.textures, source)?;

    remove_stale_containers(&settings.output_dir, &filter)?;

    let mut container_images = Vec::with_capacity(build.atlases.len());
    for atlas in &build.atlases {
        let path = settings
            .output_dir
            .join(container_image_filename(&settings.name, atlas.index));
        save_atlas_image(atlas, &path, settings.compress)?;
        info!("Saved {}", path.display());
        container_images.push(path);
    }

    let metadata = AtlasMetadata::from_atlases(
        &build.atlases,
        settings.container_side_length,
        &settings.name,
    );
    let metadata_path = settings.output_dir.join(format!("{}.json", settings.name));
    write_metadata(&metadata, &metadata_path)?;
    info!("Generated {}", metadata_path.display());

    let packed = build.packed_count();
    let mut skipped = loaded.skipped;
    skipped.extend(build.skipped);

    Ok(PackReport {
        metadata_path,
        container_images,
        packed,
        skipped,
    })
}

/// Delete container images left by an earlier run, which may have needed more
/// containers than this one
fn remove_stale_containers(output_dir: &Path, filter: &OutputFilter) -> Result<()> {
    for entry in fs::read_dir(output_dir)? {
        let path = entry?.path();
        if path.is_file() && filter.is_container_image(&path) {
            debug!("Removing stale {}", path.display());
            fs::remove_file(&path)
                .with_context(|| format!("failed to remove {}", path.display()))?;
        }
    }
    Ok(())
}
