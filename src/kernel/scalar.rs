//! Portable reference kernels.
//!
//! Lane arithmetic is two's-complement wrapping throughout, so every
//! reduction order below yields the same bits, overflow included.

use super::{Lanes, LANES, SCALE, SHIFT};

#[inline(always)]
fn mul_lanes(x: &Lanes, h: &Lanes) -> Lanes {
    let mut p = [0i32; LANES];
    for k in 0..LANES { p[k] = x[k].wrapping_mul(h[k]); }
    p
}

#[inline(always)]
fn flat_sum(p: &Lanes) -> i32 {
    p.iter().fold(0i32, |acc, &v| acc.wrapping_add(v))
}

/// Pairwise passes inside each 4-lane half, then the two halves.
#[inline(always)]
fn hadd_sum(p: &Lanes) -> i32 {
    let lo = p[0].wrapping_add(p[1]).wrapping_add(p[2].wrapping_add(p[3]));
    let hi = p[4].wrapping_add(p[5]).wrapping_add(p[6].wrapping_add(p[7]));
    lo.wrapping_add(hi)
}

/// Upper half folded onto the lower half first, then two pairwise passes.
#[inline(always)]
fn fold_sum(p: &Lanes) -> i32 {
    let mut s = [0i32; LANES / 2];
    for j in 0..LANES / 2 { s[j] = p[j].wrapping_add(p[j + LANES / 2]); }
    s[0].wrapping_add(s[1]).wrapping_add(s[2].wrapping_add(s[3]))
}

#[inline(always)]
fn shift_lanes(mut p: Lanes) -> Lanes {
    // `>>` on i32 is arithmetic: rounds toward negative infinity
    for v in &mut p { *v >>= SHIFT; }
    p
}

#[inline]
pub fn dotprod_8(r: &Lanes, i: &Lanes, h: &Lanes, out: &mut [i32; 2]) {
    out[0] = flat_sum(&mul_lanes(r, h));
    out[1] = flat_sum(&mul_lanes(i, h));
}

#[inline]
pub fn dotprod_8_float(r: &Lanes, i: &Lanes, h: &Lanes, out: &mut [f32; 2]) {
    let r_sum = fold_sum(&shift_lanes(mul_lanes(r, h)));
    let i_sum = fold_sum(&shift_lanes(mul_lanes(i, h)));
    out[0] = r_sum as f32 * SCALE;
    out[1] = i_sum as f32 * SCALE;
}

#[inline]
pub fn dotprod_8_horiz(r: &Lanes, i: &Lanes, h: &Lanes, out: &mut [i32; 2]) {
    out[0] = hadd_sum(&mul_lanes(r, h));
    out[1] = hadd_sum(&mul_lanes(i, h));
}
