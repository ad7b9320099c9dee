use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;
use regex::Regex;

use crate::error::TexpackError;

const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "tga", "webp"];

/// Image path with the directory its name is relative to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePath {
    pub path: PathBuf,
    pub base: Option<PathBuf>,
}

impl ImagePath {
    /// Texture name: path relative to the scanned directory, or the file
    /// name for individually listed files
    pub fn name(&self) -> String {
        match &self.base {
            Some(base_dir) => self
                .path
                .strip_prefix(base_dir)
                .unwrap_or(&self.path)
                .to_string_lossy()
                .replace('\\', "/"),
            None => self
                .path
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or("unknown")
                .to_string(),
        }
    }
}

/// Files and directories produced by earlier runs, which must never be
/// packed again
#[derive(Debug, Clone)]
pub struct OutputFilter {
    output_dir: Option<PathBuf>,
    container_image: Regex,
}

impl OutputFilter {
    pub fn new(output_dir: Option<&Path>, base_name: &str) -> Self {
        let pattern = format!(r"^{}_\d+\.png$", regex::escape(base_name));
        #[expect(clippy::expect_used, reason = "pattern is escaped and always valid")]
        let container_image = Regex::new(&pattern).expect("escaped pattern should compile");

        Self {
            output_dir: output_dir.map(canonical),
            container_image,
        }
    }

    /// True for `<name>_<index>.png`
    pub fn is_container_image(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|s| s.to_str())
            .is_some_and(|name| self.container_image.is_match(name))
    }

    fn is_output_dir(&self, dir: &Path) -> bool {
        self.output_dir
            .as_deref()
            .is_some_and(|out| canonical(dir) == out)
    }
}

fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Resolve inputs (files or directories) to a sorted, duplicate-free list of
/// candidate images.
///
/// Directories are walked recursively in file-name order. The output directory
/// and previously written container images are skipped.
pub fn collect_image_paths(
    inputs: &[impl AsRef<Path>],
    filter: &OutputFilter,
) -> Result<Vec<ImagePath>> {
    let mut paths = Vec::new();

    for input in inputs {
        let path = input.as_ref();
        if !path.exists() {
            return Err(TexpackError::InputNotFound(path.to_path_buf()).into());
        }

        if path.is_file() {
            if is_supported_image(path) && !filter.is_container_image(path) {
                paths.push(ImagePath {
                    path: path.to_path_buf(),
                    base: None,
                });
            }
        } else if path.is_dir() {
            collect_from_directory(path, path, filter, &mut paths)?;
        }
    }

    let mut seen = HashSet::new();
    paths.retain(|p| seen.insert(canonical(&p.path)));

    Ok(paths)
}

fn collect_from_directory(
    base: &Path,
    dir: &Path,
    filter: &OutputFilter,
    paths: &mut Vec<ImagePath>,
) -> Result<()> {
    if filter.is_output_dir(dir) {
        debug!("Skipping output directory {}", dir.display());
        return Ok(());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();

    for path in entries {
        if path.is_file() {
            if is_supported_image(&path) && !filter.is_container_image(&path) {
                paths.push(ImagePath {
                    path,
                    base: Some(base.to_path_buf()),
                });
            }
        } else if path.is_dir() {
            collect_from_directory(base, &path, filter, paths)?;
        }
    }

    Ok(())
}

fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}
