//! Example: Dehaze a single image file
//!
//! Loads any format the `image` crate reads, scales it to 512x512, runs the
//! dehazing pipeline and writes the result as an RGB PNG. The transmission map
//! and the dark channel can optionally be written as grayscale PNGs.
//!
//! # Usage
//!
//! ```bash
//! cargo run --release --example dehaze_image -- hazy.jpg clear.png [config.yaml] [transmission.png] [dark.png]
//! ```
//!
//! Logs go to the console and to `logs/dehaze.<date>.log`. Per-stage progress is
//! shown by default; `RUST_LOG` replaces the filter.

use std::env;
use std::path::Path;

use anyhow::{bail, Context, Result};
use common::log_setup::setup_logging;
use dehaze::{Buffer2, Config, Dehazer, IMAGE_HEIGHT, IMAGE_WIDTH};
use image::imageops::FilterType;
use image::{GrayImage, Luma, RgbImage};

const USAGE: &str = "Usage: dehaze_image <input> <output.png> [config.yaml] [transmission.png] [dark.png]";

fn main() -> Result<()> {
    // Stage progress is logged at debug level by the pipeline module.
    setup_logging(
        "info",
        &["dehaze::pipeline=debug"],
        Path::new("logs"),
        "dehaze",
    );

    let args: Vec<String> = env::args().skip(1).collect();
    if !(2..=5).contains(&args.len()) {
        bail!(USAGE);
    }
    let input_path = &args[0];
    let output_path = &args[1];

    let config = match args.get(2) {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    tracing::info!(?config, "Configuration");

    let input = image::open(input_path).with_context(|| format!("Failed to open {input_path}"))?;
    let (src_width, src_height) = (input.width(), input.height());
    let rgb = input
        .resize_exact(IMAGE_WIDTH as u32, IMAGE_HEIGHT as u32, FilterType::Triangle)
        .to_rgb8();
    tracing::info!(
        "Loaded {} ({}x{} scaled to {}x{})",
        input_path,
        src_width,
        src_height,
        IMAGE_WIDTH,
        IMAGE_HEIGHT
    );

    let packed: Vec<u32> = rgb
        .pixels()
        .map(|p| (u32::from(p[0]) << 16) | (u32::from(p[1]) << 8) | u32::from(p[2]))
        .collect();

    let mut dehazer = Dehazer::try_from_config(config)?;
    let result = dehazer.process(&packed)?;

    let output = RgbImage::from_raw(IMAGE_WIDTH as u32, IMAGE_HEIGHT as u32, result.pixels)
        .context("Output buffer does not match image size")?;
    output
        .save(output_path)
        .with_context(|| format!("Failed to write {output_path}"))?;
    tracing::info!(path = %output_path, "Saved dehazed image");

    if let Some(path) = args.get(3) {
        let map = dehazer
            .transmission_map()
            .context("Transmission map unavailable")?;
        save_gray(map, 255.0, path)?;
        tracing::info!(path = %path, "Saved transmission map");
    }

    if let Some(path) = args.get(4) {
        let map = dehazer
            .dark_channel_map()
            .context("Dark channel map unavailable")?;
        save_gray(map, 1.0, path)?;
        tracing::info!(path = %path, "Saved dark channel map");
    }

    let stats = result.diagnostics.transmission;
    println!(
        "A = ({:.2}, {:.2}, {:.2}), t in [{:.3}, {:.3}] mean {:.3}, {:.2}ms",
        result.diagnostics.atmospheric_light.rgb[0],
        result.diagnostics.atmospheric_light.rgb[1],
        result.diagnostics.atmospheric_light.rgb[2],
        stats.min,
        stats.max,
        stats.mean,
        result.diagnostics.elapsed.as_secs_f64() * 1000.0
    );

    Ok(())
}

/// Write `map * scale` as an 8-bit grayscale image.
fn save_gray(map: &Buffer2<f32>, scale: f32, path: &str) -> Result<()> {
    let gray = GrayImage::from_fn(map.width() as u32, map.height() as u32, |x, y| {
        let v = map[(x as usize, y as usize)] * scale;
        Luma([(v.clamp(0.0, 255.0) + 0.5) as u8])
    });
    gray.save(path)
        .with_context(|| format!("Failed to write {path}"))
}
