//! Umbrella crate for the `gamma-mipmap` workspace.
//!
//! Re-exports the image primitives and the mipmap generator so callers can
//! depend on a single crate.

pub use gm_core::*;
pub use gm_mip::*;
