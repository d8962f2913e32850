use iqdot::kernel::Backend;
use iqdot::window::{FilterBank, FilterBankError, SlidingWindow};
use num_complex::Complex;
use pretty_assertions::assert_eq;

fn q15_ramp(n: usize) -> Vec<f32> {
    (1..=n).map(|x| x as f32 / 32768.0).collect()
}

#[test]
fn split_and_reverse_subfilters() {
    let bank = FilterBank::from_prototype(&q15_ramp(17), 2).unwrap();
    assert_eq!(bank.num_channels(), 2);
    assert_eq!(*bank.subfilter(0), [15, 13, 11, 9, 7, 5, 3, 1]);
    assert_eq!(*bank.subfilter(1), [16, 14, 12, 10, 8, 6, 4, 2]);
}

#[test]
fn exact_length_prototype_is_accepted() {
    let bank = FilterBank::from_prototype(&q15_ramp(24), 3).unwrap();
    let all: Vec<[i32; 8]> = bank.iter().copied().collect();
    assert_eq!(all, vec![
        [22, 19, 16, 13, 10, 7, 4, 1],
        [23, 20, 17, 14, 11, 8, 5, 2],
        [24, 21, 18, 15, 12, 9, 6, 3],
    ]);
}

#[test]
fn rejects_bad_shapes() {
    assert_eq!(FilterBank::from_prototype(&q15_ramp(8), 0).unwrap_err(), FilterBankError::NoChannels);
    assert_eq!(
        FilterBank::from_prototype(&q15_ramp(15), 2).unwrap_err(),
        FilterBankError::PrototypeLength { got: 15, channels: 2 }
    );
    assert!(FilterBank::from_prototype(&q15_ramp(18), 2).is_err());
}

#[test]
fn quantizes_to_q15() {
    let proto = vec![0.5f32, -0.25, 0.0, 0.999, -1.0, 0.1, 0.00001, -0.00002];
    let bank = FilterBank::from_prototype(&proto, 1).unwrap();
    // reversed
    assert_eq!(*bank.subfilter(0), [-1, 0, 3277, -32768, 32735, 0, -8192, 16384]);
}

#[test]
fn branch_output_is_polyphase_convolution() {
    let channels = 4;
    let proto: Vec<f32> = (0..channels * 8 + 1).map(|k| ((k as f32) * 0.37).sin() * 0.25).collect();
    let bank = FilterBank::from_prototype(&proto, channels).unwrap();
    let q: Vec<i64> = proto.iter().map(|&x| (x * 32768.0).round() as i64).collect();

    let xs: Vec<Complex<i8>> = (0..40).map(|n| Complex::new(((n * 37) % 256) as u8 as i8, ((n * 91 + 5) % 256) as u8 as i8)).collect();
    let mut w = SlidingWindow::with_backend(Backend::Scalar);
    for (n, &x) in xs.iter().enumerate() {
        w.push(x);
        for ch in 0..channels {
            // y[n] = sum_p h[p*M + ch] * x[n - p]
            let mut re = 0i64;
            let mut im = 0i64;
            for p in 0..8 {
                if n < p { break; }
                re += q[p * channels + ch] * xs[n - p].re as i64;
                im += q[p * channels + ch] * xs[n - p].im as i64;
            }
            let y = w.apply_filter(bank.subfilter(ch));
            assert_eq!(y, Complex::new((re >> 8) as i32, (im >> 8) as i32), "n={} ch={}", n, ch);
        }
    }
}

#[test]
fn single_channel_drops_trailing_tap() {
    let bank = FilterBank::from_prototype(&q15_ramp(9), 1).unwrap();
    assert_eq!(bank.num_channels(), 1);
    assert_eq!(*bank.subfilter(0), [8, 7, 6, 5, 4, 3, 2, 1]);
}
