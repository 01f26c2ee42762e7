use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use gm_mip::{Gamma, MipChainConfig};
use log::{error, info};

use crate::codec::OutputFormat;
use crate::driver::{BatchSettings, run_batch};

mod codec;
mod driver;

#[derive(Parser, Debug)]
#[command(name = "gm_mipmap")]
#[command(about = "Write gamma-correct RGBA mipmap levels for each input image")]
struct Cli {
    /// Base (level 0) images; level n is written as <stem>_<n>.<ext>
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Display gamma used to linearise colour channels before averaging
    #[arg(long, default_value_t = 2.2)]
    gamma: f64,

    /// Output directory (default: next to each input)
    #[arg(long)]
    out: Option<PathBuf>,

    /// Container format for generated levels
    #[arg(long, value_enum, default_value_t = OutputFormat::Png)]
    format: OutputFormat,

    /// Also write <stem>_mipmaps.json describing the generated chain
    #[arg(long)]
    manifest: bool,

    /// Number of inputs processed concurrently
    #[arg(long, default_value_t = 1)]
    jobs: usize,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let gamma = Gamma::new(cli.gamma).context("invalid --gamma")?;
    let settings = BatchSettings {
        config: MipChainConfig::default().with_gamma(gamma),
        out_dir: cli.out,
        format: cli.format,
        manifest: cli.manifest,
    };

    let outcome = run_batch(&cli.inputs, &settings, cli.jobs);

    for (input, err) in &outcome.failed {
        error!("{}: {err:#}", input.display());
    }
    info!(
        "{} of {} input(s) processed",
        outcome.succeeded.len(),
        cli.inputs.len()
    );

    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
