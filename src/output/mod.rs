mod png;

pub use png::save_atlas_image;

/// File name of a container image: `<base>_<index>.png`
pub fn container_image_filename(base_name: &str, index: usize) -> String {
    format!("{}_{}.png", base_name, index)
}
