//! Gamma-correct mipmap chain generation for 8-bit RGBA images.
//!
//! `gm-mip` downsamples with a fixed 2x2 box filter, averaging colour
//! channels in linear light and alpha directly.
//!
//! Level policy:
//! - Level `L+1` is `(max(1, w / 2), max(1, h / 2))` of level `L`.
//! - The chain ends, inclusively, at the first 1x1 level.
//! - Tap indices are clamped to the last column/row, so a side stuck at 1
//!   keeps sampling its only column/row.
//!
//! Levels are numbered from 1 and handed to a [`LevelSink`] as soon as they
//! are produced; the generator keeps only the current and next level.

mod average;
mod chain;
mod downsample;
mod error;

pub use average::{Averager, Gamma, average_channel_gamma, average_channel_linear, average_color};
pub use chain::{
    ChainSummary, LevelInfo, LevelSink, MipChainConfig, MipLevel, generate_chain,
    generate_chain_cancellable,
};
pub use downsample::{
    chain_len, clamped_taps, downsample2x2_gamma_rgba, downsample2x2_gamma_rgba_with, level_dims,
    next_level_dims,
};
pub use error::ChainError;
