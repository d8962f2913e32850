//! Caller-side state that feeds the kernel: the last eight samples of a
//! stream and the per-channel taps of a polyphase filter bank.

use crate::kernel::{self, Backend, Lanes, LANES};
use log::debug;
use num_complex::Complex;

/// Keeps the most recent [`LANES`] samples contiguous so the kernel can
/// read them in place. History is shifted only once every `2 * LANES` pushes.
#[derive(Debug, Clone)]
pub struct SlidingWindow {
    backend: Backend,
    pos: usize,
    re: Vec<i32>,
    im: Vec<i32>,
}

const SPAN: usize = 2 * LANES;

impl Default for SlidingWindow {
    fn default() -> Self { Self::new() }
}

impl SlidingWindow {
    pub fn new() -> Self { Self::with_backend(kernel::active_backend()) }

    pub fn with_backend(backend: Backend) -> Self {
        Self { backend, pos: 0, re: vec![0; LANES + SPAN - 1], im: vec![0; LANES + SPAN - 1] }
    }

    pub fn backend(&self) -> Backend { self.backend }

    pub fn push(&mut self, sample: Complex<i8>) {
        self.pos = (self.pos + 1) & (SPAN - 1);
        if self.pos == 0 {
            self.re.copy_within(SPAN.., 0);
            self.im.copy_within(SPAN.., 0);
        }
        let at = self.pos + LANES - 1;
        self.re[at] = sample.re as i32;
        self.im[at] = sample.im as i32;
    }

    /// Current window, oldest sample first.
    pub fn lanes(&self) -> (&Lanes, &Lanes) {
        let span = self.pos..self.pos + LANES;
        // pos < SPAN and the buffers hold SPAN + LANES - 1 samples
        let r = <&Lanes>::try_from(&self.re[span.clone()]).expect("window span is LANES wide");
        let i = <&Lanes>::try_from(&self.im[span]).expect("window span is LANES wide");
        (r, i)
    }

    /// Integer filter output, rescaled by 8 bits to the front end's sample format.
    pub fn apply_filter(&self, taps: &Lanes) -> Complex<i32> {
        let (r, i) = self.lanes();
        let mut out = [0i32; 2];
        self.backend.dotprod_8(r, i, taps, &mut out);
        Complex::new(out[0] >> 8, out[1] >> 8)
    }

    pub fn apply_filter_float(&self, taps: &Lanes) -> Complex<f32> {
        let (r, i) = self.lanes();
        let mut out = [0f32; 2];
        self.backend.dotprod_8_float(r, i, taps, &mut out);
        Complex::new(out[0], out[1])
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FilterBankError {
    #[error("filter bank needs at least one channel")]
    NoChannels,
    #[error("prototype has {got} taps; {channels} channels need {channels} x 8 taps, plus at most one trailing tap")]
    PrototypeLength { got: usize, channels: usize },
}

/// Polyphase decomposition of a prototype low-pass filter into one
/// reversed Q15 subfilter of [`LANES`] taps per channel.
#[derive(Debug, Clone)]
pub struct FilterBank {
    subfilters: Vec<Lanes>,
}

impl FilterBank {
    /// A trailing odd tap (designed filters of length `N*LANES + 1`) is dropped.
    pub fn from_prototype(prototype: &[f32], num_channels: usize) -> Result<Self, FilterBankError> {
        if num_channels == 0 { return Err(FilterBankError::NoChannels); }
        let need = num_channels * LANES;
        if prototype.len() != need && prototype.len() != need + 1 {
            return Err(FilterBankError::PrototypeLength { got: prototype.len(), channels: num_channels });
        }

        let q15: Vec<i32> = prototype[..need].iter().map(|&x| quantize_q15(x)).collect();

        let mut subfilters = vec![[0i32; LANES]; num_channels];
        for (p, row) in q15.chunks_exact(num_channels).enumerate() {
            for (ch, &tap) in row.iter().enumerate() { subfilters[ch][p] = tap; }
        }
        // oldest-first windows dot reversed taps
        for sf in &mut subfilters { sf.reverse(); }

        debug!("filter bank: {} channels x {} taps", num_channels, LANES);
        Ok(Self { subfilters })
    }

    pub fn num_channels(&self) -> usize { self.subfilters.len() }

    /// Panics if `ch >= num_channels()`.
    pub fn subfilter(&self, ch: usize) -> &Lanes { &self.subfilters[ch] }

    pub fn iter(&self) -> impl Iterator<Item = &Lanes> { self.subfilters.iter() }
}

/// Round to Q15, wrapping into `i16` range.
fn quantize_q15(x: f32) -> i32 {
    ((x * 32768.0).round() as i32) as i16 as i32
}
