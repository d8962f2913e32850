//! Complex x real dot product over an 8-lane window.
//!
//! Every variant multiplies `real[k] * taps[k]` and `imag[k] * taps[k]`
//! lane-wise (low 32 bits kept) and reduces the eight products per channel.
//! Overflow wraps silently in both the multiply and the reduction; nothing
//! here validates or reports it.
//!
//! The free functions dispatch to the fastest [`Backend`] the running CPU
//! supports. All backends are bit-identical.

pub mod scalar;
#[cfg(all(feature = "simd-avx2", target_arch = "x86_64"))]
mod avx2;

use log::debug;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Window width of every kernel.
pub const LANES: usize = 8;

/// Per-lane arithmetic right shift applied by [`dotprod_8_float`].
pub const SHIFT: i32 = 8;

/// Q15 to unit-range conversion used by [`dotprod_8_float`].
pub const SCALE: f32 = 1.0 / 32768.0;

/// One channel of an 8-sample window, or an 8-tap subfilter.
pub type Lanes = [i32; LANES];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Backend {
    Scalar,
    Avx2,
}

impl Backend {
    /// Best backend for this build and CPU.
    pub fn detect() -> Self {
        if Backend::Avx2.is_supported() { Backend::Avx2 } else { Backend::Scalar }
    }

    pub fn is_supported(self) -> bool {
        match self {
            Backend::Scalar => true,
            Backend::Avx2 => avx2_supported(),
        }
    }

    /// Every backend that can run here, scalar first.
    pub fn available() -> Vec<Backend> {
        [Backend::Scalar, Backend::Avx2].into_iter().filter(|b| b.is_supported()).collect()
    }

    pub fn name(self) -> &'static str {
        match self {
            Backend::Scalar => "scalar",
            Backend::Avx2 => "avx2",
        }
    }

    /// Flat sum of the lane products, unscaled.
    #[inline]
    pub fn dotprod_8(self, r: &Lanes, i: &Lanes, h: &Lanes, out: &mut [i32; 2]) {
        match self {
            #[cfg(all(feature = "simd-avx2", target_arch = "x86_64"))]
            Backend::Avx2 if avx2_supported() => {
                // SAFETY: avx2 presence checked at runtime
                unsafe { avx2::dotprod_8(r, i, h, out) }
            }
            _ => scalar::dotprod_8(r, i, h, out),
        }
    }

    /// Lane products shifted right by [`SHIFT`], tree-reduced, scaled by [`SCALE`].
    #[inline]
    pub fn dotprod_8_float(self, r: &Lanes, i: &Lanes, h: &Lanes, out: &mut [f32; 2]) {
        match self {
            #[cfg(all(feature = "simd-avx2", target_arch = "x86_64"))]
            Backend::Avx2 if avx2_supported() => {
                // SAFETY: avx2 presence checked at runtime
                unsafe { avx2::dotprod_8_float(r, i, h, out) }
            }
            _ => scalar::dotprod_8_float(r, i, h, out),
        }
    }

    /// Same result as [`Backend::dotprod_8`] through a horizontal-add tree.
    #[inline]
    pub fn dotprod_8_horiz(self, r: &Lanes, i: &Lanes, h: &Lanes, out: &mut [i32; 2]) {
        match self {
            #[cfg(all(feature = "simd-avx2", target_arch = "x86_64"))]
            Backend::Avx2 if avx2_supported() => {
                // SAFETY: avx2 presence checked at runtime
                unsafe { avx2::dotprod_8_horiz(r, i, h, out) }
            }
            _ => scalar::dotprod_8_horiz(r, i, h, out),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown kernel backend '{0}' (expected auto, scalar or avx2)")]
pub struct ParseBackendError(String);

impl FromStr for Backend {
    type Err = ParseBackendError;

    /// `"auto"` resolves to [`Backend::detect`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Backend::detect()),
            "scalar" => Ok(Backend::Scalar),
            "avx2" => Ok(Backend::Avx2),
            _ => Err(ParseBackendError(s.to_string())),
        }
    }
}

#[inline]
fn avx2_supported() -> bool {
    #[cfg(all(feature = "simd-avx2", target_arch = "x86_64"))]
    { std::arch::is_x86_feature_detected!("avx2") }
    #[cfg(not(all(feature = "simd-avx2", target_arch = "x86_64")))]
    { false }
}

static ACTIVE: OnceLock<Backend> = OnceLock::new();

/// Backend used by the free functions; detected on first use.
pub fn active_backend() -> Backend {
    *ACTIVE.get_or_init(|| {
        let b = Backend::detect();
        debug!("dot-product kernel backend: {}", b);
        b
    })
}

/// `out = [sum(r*h), sum(i*h)]`, wrapping, no scaling.
#[inline]
pub fn dotprod_8(r: &Lanes, i: &Lanes, h: &Lanes, out: &mut [i32; 2]) {
    active_backend().dotprod_8(r, i, h, out)
}

/// `out = [sum(r*h >> 8), sum(i*h >> 8)] / 32768` as `f32`.
///
/// The shift is per lane and arithmetic, so a product of `-1` contributes
/// `-1`, not `0`.
#[inline]
pub fn dotprod_8_float(r: &Lanes, i: &Lanes, h: &Lanes, out: &mut [f32; 2]) {
    active_backend().dotprod_8_float(r, i, h, out)
}

/// Horizontal-add reduction; always equal to [`dotprod_8`].
#[inline]
pub fn dotprod_8_horiz(r: &Lanes, i: &Lanes, h: &Lanes, out: &mut [i32; 2]) {
    active_backend().dotprod_8_horiz(r, i, h, out)
}
