//! Colored-noise and one-pole filtered-noise primitives.
//!
//! Every function here is stateless and reentrant: it takes a sample count
//! plus an RNG and returns a buffer of exactly that length. Filtered
//! variants are re-normalized by their own standard deviation so the output
//! scale stays stable regardless of cutoff.

use rand_distr::{Distribution, StandardNormal};
use rand_pcg::Pcg32;

/// Generates independent standard-normal samples.
pub fn white_noise(rng: &mut Pcg32, num_samples: usize) -> Vec<f64> {
    (0..num_samples)
        .map(|_| StandardNormal.sample(rng))
        .collect()
}

/// Generates brown noise (1/f^2 spectrum) at the given gain.
///
/// Cumulative sum of white noise, de-meaned and divided by its own standard
/// deviation so the gain is the output RMS.
pub fn brown_noise(rng: &mut Pcg32, num_samples: usize, gain: f64) -> Vec<f64> {
    let white = white_noise(rng, num_samples);

    let mut sum = 0.0;
    let mut brown: Vec<f64> = white
        .iter()
        .map(|&x| {
            sum += x;
            sum
        })
        .collect();

    let mean = mean(&brown);
    for s in brown.iter_mut() {
        *s -= mean;
    }
    rescale_by_std(&mut brown);

    for s in brown.iter_mut() {
        *s *= gain;
    }
    brown
}

/// Generates pink noise (approximate 1/f spectrum).
///
/// Short moving average of white noise, divided by its own standard
/// deviation.
pub fn pink_noise(rng: &mut Pcg32, num_samples: usize) -> Vec<f64> {
    const WINDOW: usize = 10;

    let white = white_noise(rng, num_samples);
    let mut pink = vec![0.0; num_samples];

    for i in 0..num_samples {
        let start = i.saturating_sub(WINDOW - 1);
        let span = &white[start..=i];
        pink[i] = span.iter().sum::<f64>() / WINDOW as f64;
    }

    rescale_by_std(&mut pink);
    pink
}

/// Generates low-pass filtered noise using a one-pole recurrence.
///
/// `y[n] = alpha * x[n] + (1 - alpha) * y[n-1]` with
/// `alpha = cutoff / sample_rate`, re-normalized by its own standard
/// deviation and scaled by `gain`.
pub fn lowpass_noise(
    rng: &mut Pcg32,
    num_samples: usize,
    cutoff: f64,
    sample_rate: f64,
    gain: f64,
) -> Vec<f64> {
    let white = white_noise(rng, num_samples);
    let alpha = cutoff / sample_rate;

    let mut filtered = vec![0.0; num_samples];
    let mut prev = match white.first() {
        Some(&x) => x,
        None => return filtered,
    };
    filtered[0] = prev;
    for i in 1..num_samples {
        prev = alpha * white[i] + (1.0 - alpha) * prev;
        filtered[i] = prev;
    }

    rescale_by_std(&mut filtered);
    for s in filtered.iter_mut() {
        *s *= gain;
    }
    filtered
}

/// Generates high-pass filtered noise as a first difference of white noise,
/// re-normalized by its own standard deviation and scaled by `gain`.
pub fn highpass_noise(rng: &mut Pcg32, num_samples: usize, gain: f64) -> Vec<f64> {
    let white = white_noise(rng, num_samples);

    let mut filtered = vec![0.0; num_samples];
    for i in 1..num_samples {
        filtered[i] = white[i] - white[i - 1];
    }

    rescale_by_std(&mut filtered);
    for s in filtered.iter_mut() {
        *s *= gain;
    }
    filtered
}

fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Population standard deviation.
pub fn standard_deviation(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let m = mean(samples);
    let variance = samples.iter().map(|&s| (s - m) * (s - m)).sum::<f64>() / samples.len() as f64;
    variance.sqrt()
}

/// Divides samples by their own standard deviation. Silent buffers are left
/// untouched.
fn rescale_by_std(samples: &mut [f64]) {
    let std = standard_deviation(samples);
    if std > 0.0 {
        for s in samples.iter_mut() {
            *s /= std;
        }
    }
}
