use gm_core::{Image, ImageView, Rgba8};

use crate::average::{Averager, Gamma};

/// Size of the level following a `src_w x src_h` level.
///
/// Each dimension halves with truncation and never drops below 1, so
/// non-square and non-power-of-two sources shrink until both reach 1.
#[inline]
pub fn next_level_dims(src_w: usize, src_h: usize) -> (usize, usize) {
    ((src_w / 2).max(1), (src_h / 2).max(1))
}

/// Sizes of every level generated from a `base_w x base_h` base, level 1
/// first and ending at `(1, 1)`. Empty for a 1x1 or empty base.
pub fn level_dims(base_w: usize, base_h: usize) -> Vec<(usize, usize)> {
    let mut dims = Vec::new();
    if base_w == 0 || base_h == 0 {
        return dims;
    }

    let (mut w, mut h) = (base_w, base_h);
    while w > 1 || h > 1 {
        (w, h) = next_level_dims(w, h);
        dims.push((w, h));
    }
    dims
}

/// Number of levels generated below the base.
pub fn chain_len(base_w: usize, base_h: usize) -> usize {
    level_dims(base_w, base_h).len()
}

/// Source indices `(2d, 2d + 1)` feeding destination index `d`, clamped to
/// `src_len - 1`.
#[inline]
pub fn clamped_taps(d: usize, src_len: usize) -> (usize, usize) {
    let last = src_len - 1;
    ((2 * d).min(last), (2 * d + 1).min(last))
}

/// Gamma-correct 2x2 box downsample with edge clamping.
///
/// Output size is `next_level_dims(src.width(), src.height())`. Each output
/// pixel averages the 2x2 block at `(2x, 2y)`; tap indices past the last
/// column/row are clamped to it, which only happens along a side of length 1.
/// An odd trailing column/row of a longer side is not sampled.
pub fn downsample2x2_gamma_rgba(src: &ImageView<'_, Rgba8>, gamma: Gamma) -> Image<Rgba8> {
    downsample2x2_gamma_rgba_with(src, &Averager::new(gamma))
}

pub fn downsample2x2_gamma_rgba_with(
    src: &ImageView<'_, Rgba8>,
    averager: &Averager,
) -> Image<Rgba8> {
    if src.width() == 0 || src.height() == 0 {
        return Image::new_fill(0, 0, Rgba8::TRANSPARENT);
    }

    let (dst_w, dst_h) = next_level_dims(src.width(), src.height());
    let mut dst = Image::new_fill(dst_w, dst_h, Rgba8::TRANSPARENT);
    downsample2x2_gamma_rgba_into(src, averager, dst.data_mut(), dst_w, dst_h);
    dst
}

fn downsample2x2_gamma_rgba_into(
    src: &ImageView<'_, Rgba8>,
    averager: &Averager,
    dst: &mut [Rgba8],
    dst_w: usize,
    dst_h: usize,
) {
    for y in 0..dst_h {
        let (j0, j1) = clamped_taps(y, src.height());
        let src_row0 = src.row(j0);
        let src_row1 = src.row(j1);
        let dst_row = &mut dst[y * dst_w..(y + 1) * dst_w];
        for (x, out) in dst_row.iter_mut().enumerate() {
            let (i0, i1) = clamped_taps(x, src.width());
            *out = averager.average_color(src_row0[i0], src_row1[i0], src_row0[i1], src_row1[i1]);
        }
    }
}
