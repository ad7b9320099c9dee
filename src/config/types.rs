use serde::{Deserialize, Serialize};

/// PNG compression level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompressConfig {
    /// Optimization level 0-6
    Level(u8),
    /// Maximum compression ("max")
    Max(String),
}

/// Texpack configuration file structure.
///
/// All paths in the config are relative to the config file location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TexpackConfig {
    /// Config file version (currently 1)
    pub version: u32,
    /// Texture directories, image files or glob patterns
    pub input: Vec<String>,
    /// Output directory for container images and metadata
    pub output_dir: String,
    /// Base name for output files (packed_texture_0.png, packed_texture.json)
    pub name: String,
    /// Side length of every square container in pixels
    pub container_side_length: u32,
    /// Treat images with a `.json` sidecar as sub-atlases
    pub sub_atlas: bool,
    /// PNG compression configuration (optional)
    pub compress: Option<CompressConfig>,
}

impl Default for TexpackConfig {
    fn default() -> Self {
        Self {
            version: 1,
            input: Vec::new(),
            output_dir: ".".to_string(),
            name: "packed_texture".to_string(),
            container_side_length: 1024,
            sub_atlas: true,
            compress: None,
        }
    }
}
