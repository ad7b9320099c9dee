use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TexpackError {
    #[error("Texture '{name}' ({width}x{height}) exceeds container size ({side_length}x{side_length})")]
    OversizedRectangle {
        name: String,
        width: u32,
        height: u32,
        side_length: u32,
    },

    #[error("Failed to decode image '{path}': {source}")]
    DecodeFailure {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Image '{path}' decoded as {actual_width}x{actual_height}, measured {width}x{height}")]
    DimensionMismatch {
        path: PathBuf,
        width: u32,
        height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    #[error("Texture path not found in atlas: {0}")]
    NotFound(String),

    #[error("Sub-texture '{name}' not found in '{path}'")]
    SubNotFound { path: String, name: String },

    #[error(
        "Rectangle {width}x{height} passed the size check but did not fit an empty {side_length}x{side_length} container"
    )]
    PlacementInvariantViolation {
        width: u32,
        height: u32,
        side_length: u32,
    },

    #[error("Container side length must be greater than zero")]
    InvalidSideLength,

    #[error("Failed to save image '{path}': {source}")]
    ImageSave {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("No valid images found in input")]
    NoImages,

    #[error("Failed to write output file '{path}': {source}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to compress PNG '{path}': {message}")]
    PngCompress { path: PathBuf, message: String },

    #[error("Failed to read metadata '{path}': {source}")]
    MetadataRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse metadata '{path}': {source}")]
    MetadataParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid atlas metadata: {0}")]
    InvalidMetadata(String),

    #[error("Texture name '{name}' of '{path}' is already used by '{first}'")]
    DuplicateName {
        name: String,
        path: PathBuf,
        first: PathBuf,
    },

    #[error("Input path does not exist: {0}")]
    InputNotFound(PathBuf),
}
