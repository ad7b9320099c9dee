use std::path::Path;

use anyhow::{Context, Result};

use super::types::TexpackConfig;

/// Save a config to a JSON file with pretty formatting.
pub fn save_config(config: &TexpackConfig, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(config)
        .with_context(|| "failed to serialize config to JSON")?;

    std::fs::write(path, content)
        .with_context(|| format!("failed to write config file: {}", path.display()))?;

    Ok(())
}

/// Convert a path to one relative to the base directory.
///
/// If the path cannot be made relative (e.g., different drive on Windows),
/// returns the path unchanged as a string.
pub fn make_relative(path: &Path, base: &Path) -> String {
    if let Ok(relative) = path.strip_prefix(base) {
        let relative = relative.to_string_lossy().into_owned();
        if relative.is_empty() {
            ".".to_string()
        } else {
            relative
        }
    } else {
        path.to_string_lossy().into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoadedConfig;
    use std::path::PathBuf;

    #[test]
    fn test_make_relative_same_dir() {
        let path = PathBuf::from("/project/textures/grass.png");
        let base = PathBuf::from("/project");
        assert_eq!(make_relative(&path, &base), "textures/grass.png");
    }

    #[test]
    fn test_make_relative_base_itself() {
        let path = PathBuf::from("/project");
        assert_eq!(make_relative(&path, &path), ".");
    }

    #[test]
    fn test_make_relative_not_prefix() {
        let path = PathBuf::from("/other/textures/grass.png");
        let base = PathBuf::from("/project");
        assert_eq!(make_relative(&path, &base), "/other/textures/grass.png");
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("atlas.texpack");
        let config = TexpackConfig {
            input: vec!["textures".to_string()],
            container_side_length: 2048,
            ..TexpackConfig::default()
        };

        save_config(&config, &path).unwrap();
        let loaded = LoadedConfig::load(&path).unwrap();
        assert_eq!(loaded.config, config);
    }
}
