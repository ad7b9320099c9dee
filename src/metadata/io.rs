use std::fs;
use std::path::Path;

use super::AtlasMetadata;
use crate::error::TexpackError;

/// Write metadata as pretty-printed JSON
pub fn write_metadata(metadata: &AtlasMetadata, path: &Path) -> Result<(), TexpackError> {
    let content =
        serde_json::to_string_pretty(metadata).map_err(|e| TexpackError::MetadataParse {
            path: path.to_path_buf(),
            source: e,
        })?;

    fs::write(path, content).map_err(|e| TexpackError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Read and validate a metadata file
pub fn read_metadata(path: &Path) -> Result<AtlasMetadata, TexpackError> {
    let content = fs::read_to_string(path).map_err(|e| TexpackError::MetadataRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let metadata: AtlasMetadata =
        serde_json::from_str(&content).map_err(|e| TexpackError::MetadataParse {
            path: path.to_path_buf(),
            source: e,
        })?;

    metadata
        .validate()
        .map_err(|reason| TexpackError::InvalidMetadata(format!("{}: {}", path.display(), reason)))?;

    Ok(metadata)
}
