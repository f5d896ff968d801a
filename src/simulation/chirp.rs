use num_complex::Complex64;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, StandardNormal};
use std::f64::consts::PI;

/// Taps in the shaping low-pass
pub const SHAPING_TAPS: usize = 127;

/// Band-limited noise burst swept in frequency
#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct ChirpConfig {
    /// Samples per chirp
    pub length: usize,
    pub sample_rate: f64,
    /// Occupied bandwidth as a fraction of the sample rate
    pub relative_bandwidth: f64,
    /// Peak frequency excursion of the sweep in Hz
    pub sweep_range_hz: f64,
    /// Exponent of the sweep shape; 2 gives a V, odd orders a monotonic sweep
    pub chirp_order: i32,
    pub seed: Option<u64>,
}

impl Default for ChirpConfig {
    fn default() -> Self {
        Self {
            length: 4096,
            sample_rate: 48000.0,
            relative_bandwidth: 1e-2,
            sweep_range_hz: 10e3,
            chirp_order: 2,
            seed: None,
        }
    }
}

impl ChirpConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

pub fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => rand::make_rng(),
    }
}

/// Generate one chirp from the config's own seed
pub fn generate_chirp(config: &ChirpConfig) -> Vec<Complex64> {
    let mut rng = create_rng(config.seed);
    generate_chirp_with_rng(config, &mut rng)
}

/// Generate one chirp drawing from `rng`
///
/// Complex white noise is low-pass filtered forward and backward (zero
/// phase), tapered with a Hann window, then moved along a polynomial
/// frequency trajectory `linspace(-1, 1)^order * sweep_range_hz`.
pub fn generate_chirp_with_rng(config: &ChirpConfig, rng: &mut ChaCha8Rng) -> Vec<Complex64> {
    let n = config.length;
    let noise: Vec<Complex64> = (0..n)
        .map(|_| {
            let re: f64 = StandardNormal.sample(rng);
            let im: f64 = StandardNormal.sample(rng);
            Complex64::new(re, im)
        })
        .collect();

    let taps = lowpass_taps(SHAPING_TAPS, 0.5 * config.relative_bandwidth);
    let mut chirp = filtfilt(&taps, &noise);

    for (sample, w) in chirp.iter_mut().zip(hann(n)) {
        *sample *= w;
    }

    let mut phase = 0.0;
    for (i, sample) in chirp.iter_mut().enumerate() {
        let offset_hz = sweep_shape(i, n, config.chirp_order) * config.sweep_range_hz;
        phase += 2.0 * PI * offset_hz / config.sample_rate;
        *sample *= Complex64::from_polar(1.0, phase);
    }

    chirp
}

/// `linspace(-1, 1, n)[i] ^ order`
fn sweep_shape(i: usize, n: usize, order: i32) -> f64 {
    let x = if n > 1 {
        -1.0 + 2.0 * i as f64 / (n - 1) as f64
    } else {
        -1.0
    };
    x.powi(order)
}

/// Hann window, symmetric, zero at both ends
pub fn hann(n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![1.0];
    }
    (0..n)
        .map(|i| 0.5 - 0.5 * (2.0 * PI * i as f64 / (n - 1) as f64).cos())
        .collect()
}

/// Hamming-windowed sinc low-pass with unit DC gain
///
/// `cutoff` is in cycles per sample (0.5 is Nyquist).
pub fn lowpass_taps(num_taps: usize, cutoff: f64) -> Vec<f64> {
    let center = (num_taps as f64 - 1.0) / 2.0;
    let mut taps: Vec<f64> = (0..num_taps)
        .map(|i| {
            let m = i as f64 - center;
            let sinc = if m == 0.0 {
                2.0 * cutoff
            } else {
                (2.0 * PI * cutoff * m).sin() / (PI * m)
            };
            let window = if num_taps > 1 {
                0.54 - 0.46 * (2.0 * PI * i as f64 / (num_taps as f64 - 1.0)).cos()
            } else {
                1.0
            };
            sinc * window
        })
        .collect();

    let gain: f64 = taps.iter().sum();
    if gain != 0.0 {
        for t in taps.iter_mut() {
            *t /= gain;
        }
    }
    taps
}

/// Causal FIR, output the same length as the input
fn fir(taps: &[f64], input: &[Complex64]) -> Vec<Complex64> {
    (0..input.len())
        .map(|i| {
            taps.iter()
                .enumerate()
                .take(i + 1)
                .map(|(k, &t)| input[i - k] * t)
                .sum()
        })
        .collect()
}

/// Filter forward then backward; the two group delays cancel
pub fn filtfilt(taps: &[f64], input: &[Complex64]) -> Vec<Complex64> {
    let mut forward = fir(taps, input);
    forward.reverse();
    let mut output = fir(taps, &forward);
    output.reverse();
    output
}
