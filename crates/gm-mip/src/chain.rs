use std::convert::Infallible;
use std::sync::atomic::{AtomicBool, Ordering};

use gm_core::{Image, ImageView, Rgba8};
use log::debug;
use serde::Serialize;

use crate::average::{Averager, Gamma};
use crate::downsample::{chain_len, downsample2x2_gamma_rgba_with};
use crate::error::ChainError;

/// Settings shared by every level of one chain.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MipChainConfig {
    pub gamma: Gamma,
}

impl MipChainConfig {
    pub fn with_gamma(mut self, gamma: Gamma) -> Self {
        self.gamma = gamma;
        self
    }
}

/// Receives each generated level exactly once, in order, starting at 1.
pub trait LevelSink {
    type Error: std::error::Error + 'static;

    fn write_level(&mut self, level: usize, image: &Image<Rgba8>) -> Result<(), Self::Error>;
}

impl<S: LevelSink + ?Sized> LevelSink for &mut S {
    type Error = S::Error;

    fn write_level(&mut self, level: usize, image: &Image<Rgba8>) -> Result<(), Self::Error> {
        (**self).write_level(level, image)
    }
}

/// One generated level kept in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct MipLevel {
    pub level: usize,
    pub image: Image<Rgba8>,
}

impl LevelSink for Vec<MipLevel> {
    type Error = Infallible;

    fn write_level(&mut self, level: usize, image: &Image<Rgba8>) -> Result<(), Self::Error> {
        self.push(MipLevel {
            level,
            image: image.clone(),
        });
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelInfo {
    pub level: usize,
    pub width: usize,
    pub height: usize,
}

/// Sizes of the base and of every level handed to the sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainSummary {
    pub base_size: [usize; 2],
    pub levels: Vec<LevelInfo>,
}

impl ChainSummary {
    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    pub fn last(&self) -> Option<&LevelInfo> {
        self.levels.last()
    }
}

/// Generates every level below `base` down to 1x1 and hands each to `sink`.
///
/// Only the current and next level are alive at any time. The first sink
/// failure aborts the chain; levels already written are left in place.
pub fn generate_chain<S: LevelSink>(
    base: &ImageView<'_, Rgba8>,
    sink: S,
    config: &MipChainConfig,
) -> Result<ChainSummary, ChainError<S::Error>> {
    generate_chain_cancellable(base, sink, config, &AtomicBool::new(false))
}

/// Like [`generate_chain`], but checks `cancel` before producing each level.
pub fn generate_chain_cancellable<S: LevelSink>(
    base: &ImageView<'_, Rgba8>,
    mut sink: S,
    config: &MipChainConfig,
    cancel: &AtomicBool,
) -> Result<ChainSummary, ChainError<S::Error>> {
    if base.width() == 0 || base.height() == 0 {
        return Err(ChainError::EmptyBase {
            width: base.width(),
            height: base.height(),
        });
    }

    debug!(
        "generating {} mip level(s) from {}x{} base, gamma {}",
        chain_len(base.width(), base.height()),
        base.width(),
        base.height(),
        config.gamma.value()
    );

    let averager = Averager::new(config.gamma);
    let mut summary = ChainSummary {
        base_size: [base.width(), base.height()],
        levels: Vec::new(),
    };

    let mut current: Option<Image<Rgba8>> = None;
    let mut level = 1usize;
    loop {
        let src = match &current {
            Some(img) => img.as_view(),
            None => *base,
        };
        if src.width() == 1 && src.height() == 1 {
            break;
        }
        if cancel.load(Ordering::Relaxed) {
            return Err(ChainError::Cancelled {
                completed: level - 1,
            });
        }

        let next = downsample2x2_gamma_rgba_with(&src, &averager);
        sink.write_level(level, &next)
            .map_err(|source| ChainError::Persistence { level, source })?;

        debug!(
            "created mip level {level} width={} height={}",
            next.width(),
            next.height()
        );
        summary.levels.push(LevelInfo {
            level,
            width: next.width(),
            height: next.height(),
        });

        current = Some(next);
        level += 1;
    }

    Ok(summary)
}
