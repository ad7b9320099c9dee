mod loader;
mod scan;
mod sidecar;
mod source;
mod texture;

pub use loader::{LoadedTextures, load_textures};
pub use scan::{ImagePath, OutputFilter, collect_image_paths};
pub use sidecar::{read_sub_textures, sidecar_path};
pub use source::{FsImageSource, ImageSource};
pub use texture::{PackedTexture, SourceTexture};
