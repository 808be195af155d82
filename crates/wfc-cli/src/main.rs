use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser, ValueEnum};
use log::info;
use wfc_core::{load_raster, save_raster, Wfc, WfcConfig};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Method {
    Overlapping,
}

/// Generate a texture whose every neighborhood appears in the input image.
#[derive(Parser)]
#[command(name = "wfc", version, about, disable_help_flag = true)]
struct Cli {
    /// Generation method.
    #[arg(short = 'm', long = "method", value_enum, default_value = "overlapping")]
    method: Method,

    /// Output image width in pixels.
    #[arg(short = 'w', long = "width", default_value_t = 128)]
    width: usize,

    /// Output image height in pixels.
    #[arg(short = 'h', long = "height", default_value_t = 128)]
    height: usize,

    /// Tile width in pixels.
    #[arg(short = 'W', long = "tile-width", default_value_t = 3)]
    tile_width: usize,

    /// Tile height in pixels.
    #[arg(short = 'H', long = "tile-height", default_value_t = 3)]
    tile_height: usize,

    /// Wrap the input like a torus when harvesting tiles.
    #[arg(short = 'e', long = "expand", default_value_t = 1, value_parser = switch())]
    expand: u8,

    /// Augment tiles with horizontal mirrors.
    #[arg(short = 'x', long = "xflip", default_value_t = 1, value_parser = switch())]
    xflip: u8,

    /// Augment tiles with vertical mirrors.
    #[arg(short = 'y', long = "yflip", default_value_t = 1, value_parser = switch())]
    yflip: u8,

    /// Augment tiles with the three non-identity rotations.
    #[arg(short = 'r', long = "rotate", default_value_t = 1, value_parser = switch())]
    rotate: u8,

    /// Solver seed; wall-clock time when omitted.
    #[arg(long = "seed")]
    seed: Option<u64>,

    /// Path of the input image.
    input: PathBuf,

    /// Path of the generated image.
    output: PathBuf,

    /// Print help.
    #[arg(long = "help", action = ArgAction::HelpLong)]
    help: Option<bool>,
}

fn switch() -> clap::builder::RangedI64ValueParser<u8> {
    clap::value_parser!(u8).range(0..=1)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Cli::parse();
    let Method::Overlapping = args.method;

    let input = load_raster(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let config = WfcConfig {
        output_width: args.width,
        output_height: args.height,
        tile_width: args.tile_width,
        tile_height: args.tile_height,
        expand: args.expand != 0,
        xflip: args.xflip != 0,
        yflip: args.yflip != 0,
        rotate: args.rotate != 0,
    };

    let mut solver = Wfc::overlapping(&input, config).context("failed to build the solver")?;
    if let Some(seed) = args.seed {
        solver.init_with_seed(seed);
    }
    info!(
        "{} patterns, {}x{} output, seed {}",
        solver.pattern_count(),
        args.width,
        args.height,
        solver.seed(),
    );

    solver.run(None).context("generation failed")?;

    save_raster(&solver.output(), &args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    Ok(())
}
