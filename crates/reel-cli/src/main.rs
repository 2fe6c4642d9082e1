mod demo;
mod sequence;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use reel_core::{CodecType, Color, CompressionQuality, EncoderConfig};
use reel_encode::{EncodeReport, FixedBitrate, Movie, MovieBuilder, PixelAreaBitrate};

#[derive(Parser)]
#[command(
    name = "reel",
    version,
    about = "Reel: export frame sequences to video with an external encoder"
)]
struct Cli {
    /// Encoder config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Encoder binary, overrides config and platform lookup
    #[arg(long, global = true)]
    encoder: Option<PathBuf>,

    /// Print the encoder command line and its output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ExportArgs {
    /// Output movie path
    #[arg(short, long)]
    output: PathBuf,

    /// Video codec: animation, flv, h263, h264, mpeg4, raw, theora, wmv
    #[arg(long, default_value = "h264")]
    codec: CodecType,

    /// Quality preset for h264: low, medium, high, best
    #[arg(long, default_value = "best")]
    quality: CompressionQuality,

    /// Fixed bitrate in kbit/s for codecs without a preset
    #[arg(long, conflicts_with = "scale_bitrate")]
    bitrate: Option<u32>,

    /// Scale the bitrate with the frame area instead of using a fixed rate
    #[arg(long)]
    scale_bitrate: bool,

    /// Ignore the encoder's exit status
    #[arg(long)]
    ignore_exit_status: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a demo animation of drifting circles and export it
    Demo {
        #[command(flatten)]
        export: ExportArgs,

        #[arg(long, default_value_t = 640)]
        width: u32,

        #[arg(long, default_value_t = 480)]
        height: u32,

        /// Number of frames
        #[arg(long, default_value_t = 20)]
        frames: u32,

        /// Seed for circle placement
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Background color (#RRGGBB)
        #[arg(long, default_value = "#FFFFFF")]
        background: Color,
    },

    /// Export still images (files or directories of PNG/JPEG) as a movie
    Encode {
        #[command(flatten)]
        export: ExportArgs,

        /// Input images or directories, in order
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Show the resolved encoder and codec tables
    Info,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&cli)?;

    match cli.command {
        Commands::Demo {
            export,
            width,
            height,
            frames,
            seed,
            background,
        } => cmd_demo(&export, config, cli.verbose, width, height, frames, seed, &background),
        Commands::Encode { export, inputs } => cmd_encode(&export, config, cli.verbose, &inputs),
        Commands::Info => cmd_info(&config),
    }
}

fn load_config(cli: &Cli) -> Result<EncoderConfig> {
    let mut config = match &cli.config {
        Some(path) => EncoderConfig::load_from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => EncoderConfig::default(),
    }
    .with_env_overrides();
    if let Some(encoder) = &cli.encoder {
        config.binary = Some(encoder.clone());
    }
    Ok(config)
}

fn movie_builder(
    export: &ExportArgs,
    mut config: EncoderConfig,
    verbose: bool,
    width: u32,
    height: u32,
) -> MovieBuilder {
    if export.ignore_exit_status {
        config.check_exit_status = false;
    }
    let builder = Movie::builder(&export.output, width, height)
        .codec(export.codec)
        .quality(export.quality)
        .verbose(verbose)
        .config(config);
    if export.scale_bitrate {
        builder.bitrate_policy(PixelAreaBitrate::default())
    } else {
        builder.bitrate_policy(export.bitrate.map(FixedBitrate).unwrap_or_default())
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_demo(
    export: &ExportArgs,
    config: EncoderConfig,
    verbose: bool,
    width: u32,
    height: u32,
    frames: u32,
    seed: u64,
    background: &Color,
) -> Result<()> {
    let start = Instant::now();
    let mut movie = movie_builder(export, config, verbose, width, height).build()?;

    for index in 0..frames {
        tracing::debug!("frame = {}", index);
        let frame = demo::render_frame(width, height, index, seed, background);
        movie
            .add_frame(&frame)
            .with_context(|| format!("failed to stage frame {}", index))?;
    }

    let report = movie.encode().context("encoding failed")?;
    print_report(&report, start);
    Ok(())
}

fn cmd_encode(
    export: &ExportArgs,
    config: EncoderConfig,
    verbose: bool,
    inputs: &[PathBuf],
) -> Result<()> {
    let start = Instant::now();
    let files = sequence::collect_inputs(inputs)?;

    // The first image fixes the movie size.
    let first = sequence::load_frame(&files[0])?;
    let (width, height) = first.dimensions();
    let mut movie = movie_builder(export, config, verbose, width, height).build()?;
    movie.add_frame(&first)?;

    for path in &files[1..] {
        let frame = sequence::load_frame(path)?;
        movie
            .add_frame(&frame)
            .with_context(|| format!("cannot add {}", path.display()))?;
    }

    let report = movie.encode().context("encoding failed")?;
    print_report(&report, start);
    Ok(())
}

fn cmd_info(config: &EncoderConfig) -> Result<()> {
    let binary = config.resolve_binary();
    println!("Reel v{}", env!("CARGO_PKG_VERSION"));
    println!(
        "  Encoder:  {}{}",
        binary.display(),
        if binary.exists() { "" } else { " (not found)" }
    );
    println!("  Staging:  {}", config.staging_dir().display());
    println!("  Presets:  {}", config.preset_template);
    println!();
    println!("  Codecs:");
    for codec in CodecType::ALL {
        println!("    {:<10} -vcodec {}", codec.to_string(), config.codec_name(codec));
    }
    println!("  H.264 quality presets:");
    for quality in CompressionQuality::ALL {
        println!("    {:<10} {}", quality.to_string(), config.preset_path(quality));
    }
    Ok(())
}

fn print_report(report: &EncodeReport, start: Instant) {
    println!(
        "✓ Exported {} frames to {} in {:.1}s",
        report.frame_count,
        report.output_path.display(),
        start.elapsed().as_secs_f64()
    );
}
