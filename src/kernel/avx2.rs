//! AVX2 kernels. Callers must check for `avx2` before entering these.

use core::arch::x86_64::*;

use super::{Lanes, SCALE, SHIFT};

#[target_feature(enable = "avx2")]
pub(crate) unsafe fn dotprod_8(r: &Lanes, i: &Lanes, h: &Lanes, out: &mut [i32; 2]) {
    let vec_r = _mm256_loadu_si256(r.as_ptr() as *const __m256i);
    let vec_i = _mm256_loadu_si256(i.as_ptr() as *const __m256i);
    let vec_h = _mm256_loadu_si256(h.as_ptr() as *const __m256i);

    let vec_rh = _mm256_mullo_epi32(vec_r, vec_h);
    let vec_ih = _mm256_mullo_epi32(vec_i, vec_h);

    let mut r_lanes = [0i32; 8];
    let mut i_lanes = [0i32; 8];
    _mm256_storeu_si256(r_lanes.as_mut_ptr() as *mut __m256i, vec_rh);
    _mm256_storeu_si256(i_lanes.as_mut_ptr() as *mut __m256i, vec_ih);

    out[0] = r_lanes.iter().fold(0i32, |acc, &v| acc.wrapping_add(v));
    out[1] = i_lanes.iter().fold(0i32, |acc, &v| acc.wrapping_add(v));
}

/// Low and high 128-bit halves added, then two `hadd` passes.
#[target_feature(enable = "avx2")]
unsafe fn fold_hsum(v: __m256i) -> i32 {
    let low = _mm256_castsi256_si128(v);
    let high = _mm256_extracti128_si256::<1>(v);
    let mut sum = _mm_add_epi32(low, high);
    sum = _mm_hadd_epi32(sum, sum);
    sum = _mm_hadd_epi32(sum, sum);
    _mm_cvtsi128_si32(sum)
}

#[target_feature(enable = "avx2")]
pub(crate) unsafe fn dotprod_8_float(r: &Lanes, i: &Lanes, h: &Lanes, out: &mut [f32; 2]) {
    let vec_r = _mm256_loadu_si256(r.as_ptr() as *const __m256i);
    let vec_i = _mm256_loadu_si256(i.as_ptr() as *const __m256i);
    let vec_h = _mm256_loadu_si256(h.as_ptr() as *const __m256i);

    let vec_rh = _mm256_mullo_epi32(vec_r, vec_h);
    let vec_ih = _mm256_mullo_epi32(vec_i, vec_h);

    let vec_rh = _mm256_srai_epi32::<SHIFT>(vec_rh);
    let vec_ih = _mm256_srai_epi32::<SHIFT>(vec_ih);

    out[0] = fold_hsum(vec_rh) as f32 * SCALE;
    out[1] = fold_hsum(vec_ih) as f32 * SCALE;
}

/// Two 256-bit `hadd` passes, then lane 0 of each 128-bit half.
#[target_feature(enable = "avx2")]
unsafe fn hadd_hsum(v: __m256i) -> i32 {
    let mut sum = _mm256_hadd_epi32(v, v);
    sum = _mm256_hadd_epi32(sum, sum);
    let lo = _mm_cvtsi128_si32(_mm256_castsi256_si128(sum));
    let hi = _mm_cvtsi128_si32(_mm256_extracti128_si256::<1>(sum));
    lo.wrapping_add(hi)
}

#[target_feature(enable = "avx2")]
pub(crate) unsafe fn dotprod_8_horiz(r: &Lanes, i: &Lanes, h: &Lanes, out: &mut [i32; 2]) {
    let vec_r = _mm256_loadu_si256(r.as_ptr() as *const __m256i);
    let vec_i = _mm256_loadu_si256(i.as_ptr() as *const __m256i);
    let vec_h = _mm256_loadu_si256(h.as_ptr() as *const __m256i);

    let vec_rh = _mm256_mullo_epi32(vec_r, vec_h);
    let vec_ih = _mm256_mullo_epi32(vec_i, vec_h);

    out[0] = hadd_hsum(vec_rh);
    out[1] = hadd_hsum(vec_ih);
}
