mod builder;
mod types;

pub use builder::AtlasBuilder;
pub use types::{Atlas, AtlasBuild};
