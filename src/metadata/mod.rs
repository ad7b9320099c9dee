mod io;
mod types;

pub use io::{read_metadata, write_metadata};
pub use types::{AtlasMetadata, Meta, Region, TextureEntry};
