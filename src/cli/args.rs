use clap::{Args, Parser, Subcommand};
use glam::Vec2;
use std::path::PathBuf;

use crate::config::CompressConfig;

#[derive(Parser, Debug)]
#[command(name = "texpack")]
#[command(version, about = "Texture atlas packer", long_about = None)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Pack source images into fixed-size atlas containers
    Pack(PackArgs),
    /// Look up where a texture landed in a packed atlas
    Lookup(LookupArgs),
}

#[derive(Args, Debug, Clone)]
pub struct PackArgs {
    /// Texture directories or individual image files
    #[arg(required_unless_present = "config")]
    pub input: Vec<PathBuf>,

    /// Load settings from a .texpack config file
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output directory for container images and metadata [default: .]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Base name for output files (packed_texture_0.png, packed_texture.json, etc.) [default: packed_texture]
    #[arg(short = 'n', long)]
    pub name: Option<String>,

    /// Side length of each square container in pixels [default: 1024]
    #[arg(short = 's', long, value_name = "PIXELS")]
    pub side_length: Option<u32>,

    /// Ignore .json sidecars and pack every image as a plain texture
    #[arg(long)]
    pub no_sub_atlas: bool,

    /// Compress PNG output (0-6 or 'max'). Default level is 2 if flag is present without value.
    #[arg(long, value_name = "LEVEL", default_missing_value = "2", num_args = 0..=1)]
    pub compress: Option<CompressionLevel>,

    /// Write the effective settings to a config file
    #[arg(long, value_name = "FILE")]
    pub save_config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Args, Debug, Clone)]
pub struct LookupArgs {
    /// Metadata file written by `texpack pack`
    pub metadata: PathBuf,

    /// Texture name as recorded in the metadata
    pub path: String,

    /// Named sub-texture inside a sub-atlas
    #[arg(long, value_name = "NAME")]
    pub sub: Option<String>,

    /// Local texture coordinate(s) to remap, as U,V
    #[arg(long, value_name = "U,V")]
    pub uv: Vec<UvArg>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// A `u,v` pair given on the command line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvArg(pub Vec2);

impl std::str::FromStr for UvArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (u, v) = s
            .split_once(',')
            .ok_or_else(|| format!("expected U,V but got '{}'", s))?;
        let parse = |part: &str| {
            part.trim()
                .parse::<f32>()
                .map_err(|_e| format!("invalid coordinate '{}' in '{}'", part.trim(), s))
        };
        Ok(UvArg(Vec2::new(parse(u)?, parse(v)?)))
    }
}

/// PNG compression level (0-6 or max)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionLevel {
    /// Optimization level 0-6
    Level(u8),
    /// Maximum compression
    Max,
}

impl std::str::FromStr for CompressionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("max") {
            Ok(CompressionLevel::Max)
        } else {
            s.parse::<u8>()
                .map_err(|_e| format!("invalid compression level: {}", s))
                .and_then(|n| {
                    if n <= 6 {
                        Ok(CompressionLevel::Level(n))
                    } else {
                        Err(format!("compression level must be 0-6 or 'max', got {}", n))
                    }
                })
        }
    }
}

/// Config values go through the same checks as `--compress`
impl TryFrom<&CompressConfig> for CompressionLevel {
    type Error = String;

    fn try_from(config: &CompressConfig) -> Result<Self, Self::Error> {
        match config {
            CompressConfig::Level(n) => n.to_string().parse(),
            CompressConfig::Max(s) => s.parse(),
        }
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        CompressionLevel::Level(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compression_level_parse() {
        assert_eq!("max".parse(), Ok(CompressionLevel::Max));
        assert_eq!("MAX".parse(), Ok(CompressionLevel::Max));
        assert_eq!("3".parse(), Ok(CompressionLevel::Level(3)));
        assert!("7".parse::<CompressionLevel>().is_err());
        assert!("fast".parse::<CompressionLevel>().is_err());
    }

    #[test]
    fn test_compression_level_from_config() {
        let level = |c: CompressConfig| CompressionLevel::try_from(&c);
        assert_eq!(level(CompressConfig::Level(4)), Ok(CompressionLevel::Level(4)));
        assert_eq!(
            level(CompressConfig::Max("max".to_string())),
            Ok(CompressionLevel::Max)
        );
        assert!(level(CompressConfig::Level(9)).is_err());
        assert!(level(CompressConfig::Max("fastest".to_string())).is_err());
    }

    #[test]
    fn test_uv_parse() {
        assert_eq!("0.5,0.25".parse(), Ok(UvArg(Vec2::new(0.5, 0.25))));
        assert_eq!(" 1 , 0 ".parse(), Ok(UvArg(Vec2::new(1.0, 0.0))));
        assert!("0.5".parse::<UvArg>().is_err());
        assert!("a,b".parse::<UvArg>().is_err());
    }

    #[test]
    fn test_pack_args() {
        let cli = CliArgs::try_parse_from([
            "texpack",
            "pack",
            "textures",
            "-s",
            "512",
            "--compress",
        ])
        .unwrap();

        match cli.command {
            Command::Pack(args) => {
                assert_eq!(args.input, vec![PathBuf::from("textures")]);
                assert_eq!(args.side_length, Some(512));
                assert_eq!(args.compress, Some(CompressionLevel::Level(2)));
                assert!(!args.no_sub_atlas);
            }
            Command::Lookup(_) => panic!("expected pack"),
        }
    }

    #[test]
    fn test_pack_requires_input_or_config() {
        assert!(CliArgs::try_parse_from(["texpack", "pack"]).is_err());
        assert!(CliArgs::try_parse_from(["texpack", "pack", "-c", "a.texpack"]).is_ok());
    }

    #[test]
    fn test_lookup_args() {
        let cli = CliArgs::try_parse_from([
            "texpack",
            "lookup",
            "out/packed_texture.json",
            "ui/font.png",
            "--sub",
            "A",
            "--uv",
            "0,0",
            "--uv",
            "1,1",
        ])
        .unwrap();

        match cli.command {
            Command::Lookup(args) => {
                assert_eq!(args.path, "ui/font.png");
                assert_eq!(args.sub.as_deref(), Some("A"));
                assert_eq!(args.uv, vec![UvArg(Vec2::ZERO), UvArg(Vec2::ONE)]);
            }
            Command::Pack(_) => panic!("expected lookup"),
        }
    }
}
