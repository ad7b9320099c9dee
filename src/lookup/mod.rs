mod coords;
mod table;

pub use coords::{NormalizedBounds, normalize};
pub use table::{AtlasRegion, BoundingBox, PackedTextureTable};
