//! Parametric transient shapes.
//!
//! A transient is a short carrier (a sine at a randomized or swept
//! frequency, or raw noise) multiplied by an exponential decay envelope
//! `exp(-t * k)`. Shapes are rendered into a window of any requested
//! length; a window shorter than the shape's intrinsic length simply
//! truncates the tail.

use std::f64::consts::TAU;

use rand::Rng;
use rand_pcg::Pcg32;

use crate::noise::white_noise;

/// The transient vocabulary used by category recipes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransientShape {
    /// Wood creak: sine swept downward with a slow decay.
    Creak,
    /// Twig snap: noise with a very fast decay.
    Snap,
    /// Fire crackle: noise plus a resonant sine.
    Crackle,
    /// Water droplet: high sine with a quick decay.
    Droplet,
    /// Magic sparkle: very high sine, fastest decay.
    Sparkle,
    /// Footstep: sharp noise strike followed by a softer tail.
    Impact,
    /// Metal clash: stacked sines ringing out over noise-free decay.
    Clash,
}

impl TransientShape {
    /// Intrinsic length of the shape in seconds.
    pub fn intrinsic_secs(&self) -> f64 {
        match self {
            TransientShape::Creak => 0.5,
            TransientShape::Snap => 0.2,
            TransientShape::Crackle => 0.1,
            TransientShape::Droplet => 0.3,
            TransientShape::Sparkle => 0.15,
            TransientShape::Impact => 0.35,
            TransientShape::Clash => 0.3,
        }
    }

    /// Renders the shape into a buffer of exactly `num_samples` samples.
    pub fn render(&self, num_samples: usize, sample_rate: f64, rng: &mut Pcg32) -> Vec<f64> {
        if num_samples == 0 {
            return Vec::new();
        }

        match self {
            TransientShape::Creak => render_creak(num_samples, sample_rate, rng),
            TransientShape::Snap => render_decaying_noise(num_samples, sample_rate, 20.0, rng),
            TransientShape::Crackle => render_crackle(num_samples, sample_rate, rng),
            TransientShape::Droplet => {
                let freq = rng.gen_range(1000.0..2000.0);
                render_decaying_sine(num_samples, sample_rate, freq, 8.0)
            }
            TransientShape::Sparkle => {
                let freq = rng.gen_range(1800.0..2500.0);
                render_decaying_sine(num_samples, sample_rate, freq, 20.0)
            }
            TransientShape::Impact => render_impact(num_samples, sample_rate, rng),
            TransientShape::Clash => render_clash(num_samples, sample_rate),
        }
    }
}

/// Sine swept linearly from a randomized start band down to an end band.
fn render_creak(num_samples: usize, sample_rate: f64, rng: &mut Pcg32) -> Vec<f64> {
    let start_freq = rng.gen_range(200.0..400.0);
    let end_freq = rng.gen_range(100.0..200.0);
    let last = (num_samples - 1).max(1) as f64;

    (0..num_samples)
        .map(|i| {
            let t = i as f64 / sample_rate;
            let freq = start_freq + (end_freq - start_freq) * i as f64 / last;
            (TAU * freq * t).sin() * (-t * 5.0).exp()
        })
        .collect()
}

fn render_decaying_noise(
    num_samples: usize,
    sample_rate: f64,
    k: f64,
    rng: &mut Pcg32,
) -> Vec<f64> {
    let noise = white_noise(rng, num_samples);
    noise
        .into_iter()
        .enumerate()
        .map(|(i, x)| {
            let t = i as f64 / sample_rate;
            x * (-t * k).exp()
        })
        .collect()
}

fn render_decaying_sine(num_samples: usize, sample_rate: f64, freq: f64, k: f64) -> Vec<f64> {
    (0..num_samples)
        .map(|i| {
            let t = i as f64 / sample_rate;
            (TAU * freq * t).sin() * (-t * k).exp()
        })
        .collect()
}

/// Noise with a resonant sine mixed in underneath the decay.
fn render_crackle(num_samples: usize, sample_rate: f64, rng: &mut Pcg32) -> Vec<f64> {
    let freq = rng.gen_range(800.0..1500.0);
    let noise = white_noise(rng, num_samples);

    noise
        .into_iter()
        .enumerate()
        .map(|(i, x)| {
            let t = i as f64 / sample_rate;
            (x + (TAU * freq * t).sin() * 0.5) * (-t * 10.0).exp()
        })
        .collect()
}

/// Sharp strike at the front plus a softer decay tail starting shortly after.
fn render_impact(num_samples: usize, sample_rate: f64, rng: &mut Pcg32) -> Vec<f64> {
    let mut samples = vec![0.0; num_samples];

    let strike_len = ((0.05 * sample_rate) as usize).min(num_samples);
    let strike = white_noise(rng, strike_len);
    for (i, x) in strike.into_iter().enumerate() {
        let t = i as f64 / sample_rate;
        samples[i] = x * (-t * 100.0).exp();
    }

    let tail_start = (0.1 * sample_rate) as usize;
    if tail_start < num_samples {
        let tail_len = ((0.3 * sample_rate) as usize).min(num_samples - tail_start);
        let tail = white_noise(rng, tail_len);
        for (i, x) in tail.into_iter().enumerate() {
            let t = i as f64 / sample_rate;
            samples[tail_start + i] += x * (-t * 10.0).exp() * 0.3;
        }
    }

    samples
}

/// Stacked sines at fixed partials with a shared decay.
fn render_clash(num_samples: usize, sample_rate: f64) -> Vec<f64> {
    const PARTIALS: [f64; 3] = [800.0, 1200.0, 1600.0];

    (0..num_samples)
        .map(|i| {
            let t = i as f64 / sample_rate;
            let ring: f64 = PARTIALS.iter().map(|&f| (TAU * f * t).sin() * 0.3).sum();
            ring * (-t * 8.0).exp()
        })
        .collect()
}
