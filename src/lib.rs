pub mod atlas;
pub mod cli;
pub mod config;
pub mod error;
pub mod lookup;
pub mod metadata;
pub mod output;
pub mod packing;
pub mod pipeline;
pub mod texture;

pub use atlas::{Atlas, AtlasBuilder};
pub use cli::{CliArgs, Command, PackArgs};
pub use error::TexpackError;
pub use lookup::{NormalizedBounds, PackedTextureTable, normalize};
pub use packing::{Block, Fit, Packing, SplitPacker, pack};
pub use texture::{FsImageSource, ImageSource, PackedTexture, SourceTexture};
