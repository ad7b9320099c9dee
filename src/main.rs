use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use texpack::cli::{CliArgs, Command, CompressionLevel, LookupArgs, PackArgs};
use texpack::config::{CompressConfig, LoadedConfig, TexpackConfig, make_relative, save_config};
use texpack::lookup::PackedTextureTable;
use texpack::pipeline::{PackSettings, regenerate};
use texpack::texture::FsImageSource;

#[allow(clippy::print_stderr)]
fn main() {
    if let Err(e) = run() {
        // Use eprintln instead of error! because logger may not be initialized
        // (e.g., config loading fails before logger init)
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = CliArgs::parse();

    match &cli.command {
        Command::Pack(args) => run_pack(args),
        Command::Lookup(args) => run_lookup(args),
    }
}

fn init_logging(verbose: bool) {
    env_logger::Builder::new()
        .filter_level(if verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn run_pack(args: &PackArgs) -> Result<()> {
    let settings = merge_config_with_args(args)?;

    init_logging(args.verbose);

    info!("Texpack texture packer v{}", env!("CARGO_PKG_VERSION"));

    if let Some(config_path) = &args.save_config {
        save_effective_config(&settings, config_path)?;
        info!("Saved config {}", config_path.display());
    }

    let report = regenerate(&settings, &FsImageSource)?;

    info!(
        "Packed {} textures into {} container(s), {} skipped",
        report.packed,
        report.container_images.len(),
        report.skipped.len()
    );
    info!("Done!");

    Ok(())
}

#[allow(clippy::print_stdout)]
fn run_lookup(args: &LookupArgs) -> Result<()> {
    init_logging(args.verbose);

    let table = PackedTextureTable::load(&args.metadata)
        .with_context(|| format!("failed to load atlas: {}", args.metadata.display()))?;

    let region = match &args.sub {
        Some(name) => table.get_sub(&args.path, name)?,
        None => table.get(&args.path)?,
    };

    println!("container_index: {}", region.container_index);
    if let Some(image) = table.container_images().get(region.container_index) {
        println!("image: {}", image.display());
    }
    println!(
        "pixels: x={} y={} width={} height={}",
        region.rect.x, region.rect.y, region.rect.width, region.rect.height
    );

    let labels = ["top_left", "bottom_left", "bottom_right", "top_right"];
    for (label, corner) in labels.iter().zip(region.bounds.corners) {
        println!("{}: ({:.6}, {:.6})", label, corner.x, corner.y);
    }

    for uv in &args.uv {
        let mapped = region.remap(uv.0);
        println!(
            "({}, {}) -> ({:.6}, {:.6})",
            uv.0.x, uv.0.y, mapped.x, mapped.y
        );
    }

    Ok(())
}

/// Merge config file values with CLI arguments.
/// CLI arguments always take precedence over config values.
fn merge_config_with_args(args: &PackArgs) -> Result<PackSettings> {
    let loaded_config = if let Some(config_path) = &args.config {
        Some(
            LoadedConfig::load(config_path)
                .with_context(|| format!("failed to load config: {}", config_path.display()))?,
        )
    } else {
        None
    };

    // Determine inputs: CLI args override config
    let inputs = if !args.input.is_empty() {
        args.input.clone()
    } else if let Some(ref lc) = loaded_config {
        lc.resolve_inputs()
            .context("failed to resolve input paths from config")?
    } else {
        // This shouldn't happen due to clap's required_unless_present
        Vec::new()
    };

    // Determine output directory: CLI > config > default
    let output_dir = args.output.clone().unwrap_or_else(|| {
        loaded_config
            .as_ref()
            .map(|lc| lc.resolve_output_dir())
            .unwrap_or_else(|| PathBuf::from("."))
    });

    let defaults = TexpackConfig::default();

    let name = args.name.clone().unwrap_or_else(|| {
        loaded_config
            .as_ref()
            .map(|lc| lc.config.name.clone())
            .unwrap_or(defaults.name)
    });

    let container_side_length = args.side_length.unwrap_or_else(|| {
        loaded_config
            .as_ref()
            .map(|lc| lc.config.container_side_length)
            .unwrap_or(defaults.container_side_length)
    });

    if container_side_length == 0 {
        anyhow::bail!("container side length must be greater than zero");
    }

    // Flag presence disables sub-atlas sidecars, otherwise use config
    let sub_atlas = if args.no_sub_atlas {
        false
    } else if let Some(ref lc) = loaded_config {
        lc.config.sub_atlas
    } else {
        defaults.sub_atlas
    };

    // Compress: CLI option overrides config
    let compress = if args.compress.is_some() {
        args.compress
    } else if let Some(ref lc) = loaded_config {
        lc.config
            .compress
            .as_ref()
            .map(CompressionLevel::try_from)
            .transpose()
            .map_err(anyhow::Error::msg)
            .context("invalid compress value in config")?
    } else {
        None
    };

    Ok(PackSettings {
        inputs,
        output_dir,
        name,
        container_side_length,
        sub_atlas,
        compress,
    })
}

/// Write merged settings as a config file, with paths relative to it
fn save_effective_config(settings: &PackSettings, path: &Path) -> Result<()> {
    let base = path.parent().unwrap_or_else(|| Path::new(""));

    let config = TexpackConfig {
        input: settings
            .inputs
            .iter()
            .map(|p| make_relative(p, base))
            .collect(),
        output_dir: make_relative(&settings.output_dir, base),
        name: settings.name.clone(),
        container_side_length: settings.container_side_length,
        sub_atlas: settings.sub_atlas,
        compress: settings.compress.map(|c| match c {
            CompressionLevel::Level(n) => CompressConfig::Level(n),
            CompressionLevel::Max => CompressConfig::Max("max".to_string()),
        }),
        ..TexpackConfig::default()
    };

    save_config(&config, path)
}
