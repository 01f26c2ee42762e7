use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use anyhow::{Context, Result};
use gm_mip::{ChainSummary, MipChainConfig, generate_chain};
use log::{debug, info};
use serde::Serialize;

use crate::codec::{FileLevelSink, OutputFormat, load_rgba};

/// Settings applied to every input of one batch.
#[derive(Debug, Clone, Default)]
pub struct BatchSettings {
    pub config: MipChainConfig,
    /// Directory for generated files; `None` writes next to each input.
    pub out_dir: Option<PathBuf>,
    pub format: OutputFormat,
    pub manifest: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Manifest {
    pub input: String,
    pub gamma: f64,
    pub format: &'static str,
    #[serde(flatten)]
    pub summary: ChainSummary,
    pub files: Vec<String>,
}

#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub succeeded: Vec<Manifest>,
    pub failed: Vec<(PathBuf, anyhow::Error)>,
}

impl BatchOutcome {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Decodes one base image and writes its whole chain.
pub fn process_image(input: &Path, settings: &BatchSettings) -> Result<Manifest> {
    info!("processing {}", input.display());

    let base = load_rgba(input)?;
    let dir = output_dir(input, settings.out_dir.as_deref());
    fs::create_dir_all(&dir)
        .with_context(|| format!("creating output directory {}", dir.display()))?;

    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .with_context(|| format!("input path {} has no file name", input.display()))?;

    let mut sink = FileLevelSink::new(&dir, stem.as_str(), settings.format);
    let summary = generate_chain(&base.as_view(), &mut sink, &settings.config)
        .with_context(|| format!("generating mipmaps for {}", input.display()))?;

    let manifest = Manifest {
        input: input.display().to_string(),
        gamma: settings.config.gamma.value(),
        format: settings.format.extension(),
        summary,
        files: sink
            .written()
            .iter()
            .map(|p| p.display().to_string())
            .collect(),
    };

    if settings.manifest {
        write_json(dir.join(format!("{stem}_mipmaps.json")), &manifest)?;
    }

    Ok(manifest)
}

/// Processes every input, on up to `jobs` worker threads.
///
/// A failing input does not stop the others. Results keep input order.
pub fn run_batch(inputs: &[PathBuf], settings: &BatchSettings, jobs: usize) -> BatchOutcome {
    let workers = jobs.clamp(1, inputs.len().max(1));
    debug!("processing {} input(s) on {workers} worker(s)", inputs.len());

    let next = AtomicUsize::new(0);
    let next = &next;
    let mut results: Vec<(usize, Result<Manifest>)> = thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|_| {
                scope.spawn(move || {
                    let mut done = Vec::new();
                    loop {
                        let idx = next.fetch_add(1, Ordering::Relaxed);
                        let Some(input) = inputs.get(idx) else {
                            break;
                        };
                        done.push((idx, process_image(input, settings)));
                    }
                    done
                })
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|h| match h.join() {
                Ok(done) => done,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect()
    });
    results.sort_by_key(|(idx, _)| *idx);

    let mut outcome = BatchOutcome::default();
    for (idx, result) in results {
        match result {
            Ok(manifest) => outcome.succeeded.push(manifest),
            Err(err) => outcome.failed.push((inputs[idx].clone(), err)),
        }
    }
    outcome
}

fn output_dir(input: &Path, out_dir: Option<&Path>) -> PathBuf {
    match out_dir {
        Some(dir) => dir.to_path_buf(),
        None => match input.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        },
    }
}

fn write_json(path: PathBuf, value: &impl Serialize) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value).context("serializing json")?;
    fs::write(&path, bytes).with_context(|| format!("writing json {}", path.display()))
}
