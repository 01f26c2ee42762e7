//! Example: gamma-correct versus naive mipmaps of a one-pixel checkerboard.
//!
//! A black/white checkerboard should look mid-grey from far away. Averaging
//! the encoded bytes gives 127, which displays noticeably darker than the
//! checkerboard does; averaging in linear light gives ~186.
//!
//! The example builds both chains in memory, prints the mean grey of every
//! level and writes the numbers to a JSON file.
//!
//! Run from the workspace root:
//!   cargo run -p gamma-mipmap --example gradient_chain -- --help
//!   cargo run -p gamma-mipmap --example gradient_chain

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use gamma_mipmap::{Gamma, Image, MipChainConfig, MipLevel, Rgba8, generate_chain};
use serde::Serialize;

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(about = "Compare gamma-correct and naive mipmaps of a checkerboard")]
struct Args {
    /// Side length of the square checkerboard
    #[arg(long, default_value_t = 256)]
    size: usize,

    /// Display gamma used for the gamma-correct chain
    #[arg(long, default_value_t = 2.2)]
    gamma: f64,

    /// Output JSON path
    #[arg(long, default_value = "gradient_chain.json")]
    out: String,
}

// ── JSON DTOs ─────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct LevelDto {
    level: usize,
    width: usize,
    height: usize,
    mean_gamma_correct: f64,
    mean_naive: f64,
}

#[derive(Serialize)]
struct Report {
    size: usize,
    gamma: f64,
    /// Wall-clock time for the gamma-correct chain, in milliseconds.
    elapsed_ms: f64,
    levels: Vec<LevelDto>,
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn checkerboard(size: usize) -> Image<Rgba8> {
    Image::from_fn(size, size, |x, y| {
        if (x + y) % 2 == 0 {
            Rgba8::BLACK
        } else {
            Rgba8::WHITE
        }
    })
}

fn mean_red(img: &Image<Rgba8>) -> f64 {
    let sum: u64 = img.data().iter().map(|px| px.r as u64).sum();
    sum as f64 / img.data().len() as f64
}

fn build(base: &Image<Rgba8>, gamma: Gamma) -> Result<Vec<MipLevel>> {
    let mut levels: Vec<MipLevel> = Vec::new();
    let config = MipChainConfig::default().with_gamma(gamma);
    generate_chain(&base.as_view(), &mut levels, &config).context("building mip chain")?;
    Ok(levels)
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();

    let gamma = Gamma::new(args.gamma).context("parsing --gamma")?;
    let naive = Gamma::new(1.0).context("building identity gamma")?;
    let base = checkerboard(args.size);

    let t0 = Instant::now();
    let corrected = build(&base, gamma)?;
    let elapsed_ms = t0.elapsed().as_secs_f64() * 1e3;
    let flat = build(&base, naive)?;

    println!(
        "checkerboard {0}x{0}: {1} levels in {elapsed_ms:.2} ms",
        args.size,
        corrected.len()
    );

    let levels: Vec<LevelDto> = corrected
        .iter()
        .zip(flat.iter())
        .map(|(c, n)| LevelDto {
            level: c.level,
            width: c.image.width(),
            height: c.image.height(),
            mean_gamma_correct: mean_red(&c.image),
            mean_naive: mean_red(&n.image),
        })
        .collect();

    for l in &levels {
        println!(
            "  level {:2} {:4}x{:<4} gamma-correct {:6.1}  naive {:6.1}",
            l.level, l.width, l.height, l.mean_gamma_correct, l.mean_naive
        );
    }

    let report = Report {
        size: args.size,
        gamma: gamma.value(),
        elapsed_ms,
        levels,
    };

    let out_file =
        std::fs::File::create(&args.out).with_context(|| format!("creating {}", args.out))?;
    serde_json::to_writer_pretty(out_file, &report)
        .with_context(|| format!("writing JSON to {}", args.out))?;

    println!("results written to {}", args.out);
    Ok(())
}
