mod args;

pub use args::{CliArgs, Command, CompressionLevel, LookupArgs, PackArgs, UvArg};
