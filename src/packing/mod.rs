mod allocator;
mod rect;
mod split;

pub use allocator::{Block, Container, Packing, PlacedBlock, Rejected, pack};
pub use rect::Rect;
pub use split::{Fit, SplitPacker};
