use clap::Parser;
use iqdot::kernel::{Backend, Lanes, LANES};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use rayon::prelude::*;
use std::hint::black_box;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "iqdot-bench", version, about = "Benchmark dot-product kernel throughput per backend")]
struct Args {
    /// Threads
    #[arg(long, default_value_t = 1)]
    threads: usize,

    /// Kernel calls per thread
    #[arg(long, default_value_t = 10_000_000)]
    iters: usize,

    /// Distinct random windows cycled through
    #[arg(long, default_value_t = 1024)]
    windows: usize,

    /// Seed for the synthetic IQ stream
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

struct Window { r: Lanes, i: Lanes, h: Lanes }

fn make_windows(n: usize, seed: u64) -> Vec<Window> {
    let mut rng = SmallRng::seed_from_u64(seed);
    // int8 front end, roughly a quarter of full scale
    let noise = Normal::new(0.0f32, 32.0).unwrap();
    let lanes = |rng: &mut SmallRng| -> Lanes {
        let mut v = [0i32; LANES];
        for x in &mut v { *x = noise.sample(rng).clamp(-128.0, 127.0) as i32; }
        v
    };
    (0..n.max(1)).map(|_| {
        let r = lanes(&mut rng);
        let i = lanes(&mut rng);
        let mut h = [0i32; LANES];
        for t in &mut h { *t = rng.gen_range(-32768..32768); }
        Window { r, i, h }
    }).collect()
}

fn run(backend: Backend, windows: &[Window], iters: usize, threads: usize, variant: &str) -> f64 {
    let work = |_t: usize| -> i64 {
        let mut acc = 0i64;
        let mut oi = [0i32; 2];
        let mut of = [0f32; 2];
        for k in 0..iters {
            let w = &windows[k % windows.len()];
            match variant {
                "float" => { backend.dotprod_8_float(&w.r, &w.i, &w.h, &mut of); acc += of[0] as i64; }
                "horiz" => { backend.dotprod_8_horiz(&w.r, &w.i, &w.h, &mut oi); acc += oi[0] as i64; }
                _ => { backend.dotprod_8(&w.r, &w.i, &w.h, &mut oi); acc += oi[0] as i64; }
            }
        }
        black_box(acc)
    };
    let t0 = Instant::now();
    let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build().unwrap();
    let total: i64 = pool.install(|| (0..threads).into_par_iter().map(work).sum());
    black_box(total);
    let dt = t0.elapsed().as_secs_f64();
    if dt > 0.0 { (iters * threads) as f64 / dt } else { 0.0 }
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    let threads = args.threads.max(1);
    let windows = make_windows(args.windows, args.seed);
    for backend in Backend::available() {
        for variant in ["flat", "float", "horiz"] {
            let cps = run(backend, &windows, args.iters, threads, variant);
            println!("backend={} variant={} threads={} calls_per_sec={:.1}", backend, variant, threads, cps);
        }
    }
}
