//! Foundational primitives for gamma-correct mipmap generation.
//!
//! ## Images and Views
//! `Image<T>` owns a row-major buffer of `width * height` elements.
//! `ImageView` borrows one with an element stride (not byte stride) that may
//! be greater than `width`, so a sub-rectangle of a padded buffer can be fed
//! to the downsampler without copying.
//!
//! ## Pixels
//! `Rgba8` is an explicit four-field sample in R, G, B, A order. Colour
//! channels are gamma-encoded, alpha is linear.

mod error;
mod image;
mod pixel;

pub use error::Error;
pub use image::{Image, ImageView};
pub use pixel::{Rgba8, rgba8_to_bytes};
