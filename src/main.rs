use anyhow::{bail, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use iqdot::kernel::Backend;
use iqdot::samples::{create_output, load_iq_i8, TapsFile};
use iqdot::window::SlidingWindow;
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(author, version, about = "Filter an IQ capture through one polyphase branch", long_about = None)]
struct Args {
    /// Raw interleaved int8 IQ file
    #[arg(long)]
    input: PathBuf,

    /// JSON taps file: {"num_channels": N, "prototype": [...]}
    #[arg(long)]
    taps: PathBuf,

    /// Polyphase branch (subfilter index)
    #[arg(long, default_value_t = 0)]
    channel: usize,

    /// Use the shifted floating-point kernel
    #[arg(long)]
    float: bool,

    /// Kernel backend: auto, scalar or avx2
    #[arg(long, default_value = "auto")]
    backend: Backend,

    /// Write one JSON object per output sample instead of a summary
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if !args.backend.is_supported() {
        bail!("backend {} is not supported on this CPU/build", args.backend);
    }

    let bank = TapsFile::load(&args.taps)?.filter_bank()?;
    if args.channel >= bank.num_channels() {
        bail!("channel {} out of range (filter bank has {})", args.channel, bank.num_channels());
    }
    let taps = *bank.subfilter(args.channel);
    let samples = load_iq_i8(&args.input)?;
    info!("backend={} channel={} float={}", args.backend, args.channel, args.float);

    let mut out: Option<BufWriter<File>> = match &args.output {
        Some(p) => Some(create_output(p)?),
        None => None,
    };

    let pb = ProgressBar::new(samples.len() as u64);
    pb.set_style(ProgressStyle::with_template("{bar:40} {pos}/{len} samples ({per_sec})")?);

    let t0 = Instant::now();
    let mut window = SlidingWindow::with_backend(args.backend);
    let mut power = 0f64;
    for (n, &s) in samples.iter().enumerate() {
        window.push(s);
        let (re, im) = if args.float {
            let y = window.apply_filter_float(&taps);
            (y.re as f64, y.im as f64)
        } else {
            let y = window.apply_filter(&taps);
            (y.re as f64, y.im as f64)
        };
        power += re * re + im * im;
        if let Some(w) = out.as_mut() {
            writeln!(w, "{}", serde_json::json!({ "n": n, "re": re, "im": im }))?;
        }
        if n % 4096 == 0 { pb.set_position(n as u64); }
    }
    pb.finish_and_clear();
    if let Some(mut w) = out { w.flush()?; }

    let dt = t0.elapsed();
    let mean_power = if samples.is_empty() { 0.0 } else { power / samples.len() as f64 };
    println!("samples={} mean_power={:.6} elapsed={:.3}s backend={}", samples.len(), mean_power, dt.as_secs_f64(), args.backend);
    Ok(())
}
