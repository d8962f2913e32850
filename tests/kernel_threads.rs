use iqdot::kernel::{dotprod_8, dotprod_8_float, dotprod_8_horiz, Lanes};
use rayon::prelude::*;

fn window(seed: i32) -> (Lanes, Lanes, Lanes) {
    let mut r = [0i32; 8];
    let mut i = [0i32; 8];
    let mut h = [0i32; 8];
    for k in 0..8 {
        let k32 = k as i32;
        r[k] = (seed * 31 + k32 * 7) % 255 - 127;
        i[k] = (seed * 17 - k32 * 13) % 255 - 127;
        h[k] = (seed * 101 + k32 * 977) % 65535 - 32767;
    }
    (r, i, h)
}

fn eval(seed: i32) -> ([i32; 2], [i32; 2], [f32; 2]) {
    let (r, i, h) = window(seed);
    let mut a = [0i32; 2];
    let mut b = [0i32; 2];
    let mut c = [0f32; 2];
    dotprod_8(&r, &i, &h, &mut a);
    dotprod_8_horiz(&r, &i, &h, &mut b);
    dotprod_8_float(&r, &i, &h, &mut c);
    (a, b, c)
}

#[test]
fn parallel_calls_match_sequential() {
    let seq: Vec<_> = (0..4096).map(eval).collect();
    let pool = rayon::ThreadPoolBuilder::new().num_threads(4).build().unwrap();
    let par: Vec<_> = pool.install(|| (0..4096).into_par_iter().map(eval).collect());
    assert_eq!(seq.len(), par.len());
    for (n, (s, p)) in seq.iter().zip(par.iter()).enumerate() {
        assert_eq!(s.0, p.0, "flat n={}", n);
        assert_eq!(s.1, p.1, "horiz n={}", n);
        assert_eq!(s.2, p.2, "float n={}", n);
        assert_eq!(s.0, s.1, "flat vs horiz n={}", n);
    }
}
