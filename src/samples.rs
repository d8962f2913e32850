use crate::window::FilterBank;
use anyhow::{bail, Context, Result};
use log::info;
use num_complex::Complex;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read};
use std::path::Path;

/// Load raw interleaved signed 8-bit IQ samples (`I, Q, I, Q, ...`).
pub fn load_iq_i8<P: AsRef<Path>>(path: P) -> Result<Vec<Complex<i8>>> {
    let f = File::open(&path).with_context(|| format!("open iq file: {}", path.as_ref().display()))?;
    let mut r = BufReader::new(f);
    let mut bytes = Vec::new();
    r.read_to_end(&mut bytes).with_context(|| format!("read iq file: {}", path.as_ref().display()))?;
    if bytes.len() % 2 != 0 {
        bail!("iq file {} has odd length {}", path.as_ref().display(), bytes.len());
    }
    let samples: Vec<Complex<i8>> = bytes.chunks_exact(2).map(|c| Complex::new(c[0] as i8, c[1] as i8)).collect();
    info!("loaded {} iq samples from {}", samples.len(), path.as_ref().display());
    Ok(samples)
}

/// Buffered writer for filter output; errors name the path.
pub fn create_output<P: AsRef<Path>>(path: P) -> Result<BufWriter<File>> {
    let f = File::create(&path).with_context(|| format!("create output file: {}", path.as_ref().display()))?;
    Ok(BufWriter::new(f))
}

/// Prototype filter description, stored as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TapsFile {
    pub num_channels: usize,
    pub prototype: Vec<f32>,
}

impl TapsFile {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let f = File::open(&path).with_context(|| format!("open taps file: {}", path.as_ref().display()))?;
        let taps: TapsFile = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parse taps file: {}", path.as_ref().display()))?;
        Ok(taps)
    }

    pub fn filter_bank(&self) -> Result<FilterBank> {
        FilterBank::from_prototype(&self.prototype, self.num_channels).context("build filter bank")
    }
}
