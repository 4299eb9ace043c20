//! Buffer rendering: recipe composition, normalization, and edge fades.

use std::f64::consts::TAU;

use rand::Rng;
use rand_pcg::Pcg32;

use crate::category::Category;
use crate::error::{SynthError, SynthResult};
use crate::noise;
use crate::recipe::{recipe_for, BaseLayer};
use crate::rng::{create_rng, derive_component_seed};

/// Longest clip the renderer will produce.
const MAX_DURATION_SECONDS: f64 = 120.0;

/// Rendering parameters shared by every category.
#[derive(Debug, Clone, Copy)]
pub struct RenderConfig {
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Peak absolute amplitude after normalization.
    pub peak_ceiling: f64,
    /// Linear fade-in/out length in seconds, applied when the buffer is at
    /// least twice this long.
    pub fade: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            peak_ceiling: 0.8,
            fade: 0.1,
        }
    }
}

/// Renders a category's recipe into a normalized mono buffer.
///
/// The output length is exactly `round(duration * sample_rate)`. The same
/// (category, duration, seed, config) always renders the identical buffer.
pub fn render(
    category: Category,
    duration: f64,
    seed: u32,
    config: &RenderConfig,
) -> SynthResult<Vec<f64>> {
    if !duration.is_finite() || duration <= 0.0 || duration > MAX_DURATION_SECONDS {
        return Err(SynthError::InvalidDuration { duration });
    }
    if config.sample_rate == 0 {
        return Err(SynthError::InvalidSampleRate {
            rate: config.sample_rate,
        });
    }

    let sample_rate = config.sample_rate as f64;
    let num_samples = (duration * sample_rate).round() as usize;
    let recipe = recipe_for(category);

    let mut buffer = vec![0.0f64; num_samples];

    for (index, layer) in recipe.base.iter().enumerate() {
        let layer_seed = derive_component_seed(seed, &format!("base{index}"));
        let mut rng = create_rng(layer_seed);
        let rendered = render_base_layer(layer, num_samples, sample_rate, duration, &mut rng);
        for (out, x) in buffer.iter_mut().zip(rendered) {
            *out += x;
        }
    }

    let mut rng = create_rng(derive_component_seed(seed, "transients"));
    for layer in recipe.transients {
        let count = (duration * layer.density_per_sec).round() as usize;
        let intrinsic = (layer.shape.intrinsic_secs() * sample_rate) as usize;
        for _ in 0..count {
            if num_samples == 0 {
                break;
            }
            let start = rng.gen_range(0..num_samples);
            // Overlaps with other transients are additive; clustering is the
            // point.
            let window = intrinsic.min(num_samples - start);
            let rendered = layer.shape.render(window, sample_rate, &mut rng);
            for (i, x) in rendered.into_iter().enumerate() {
                buffer[start + i] += x * layer.mix;
            }
        }
    }

    normalize_peak(&mut buffer, config.peak_ceiling);
    apply_edge_fades(&mut buffer, (config.fade * sample_rate) as usize);

    Ok(buffer)
}

fn render_base_layer(
    layer: &BaseLayer,
    num_samples: usize,
    sample_rate: f64,
    duration: f64,
    rng: &mut Pcg32,
) -> Vec<f64> {
    match *layer {
        BaseLayer::Brown { gain } => noise::brown_noise(rng, num_samples, gain),
        BaseLayer::Pink { gain } => {
            let mut samples = noise::pink_noise(rng, num_samples);
            for s in samples.iter_mut() {
                *s *= gain;
            }
            samples
        }
        BaseLayer::White { gain } => {
            let mut samples = noise::white_noise(rng, num_samples);
            for s in samples.iter_mut() {
                *s *= gain;
            }
            samples
        }
        BaseLayer::Lowpass { cutoff, gain } => {
            noise::lowpass_noise(rng, num_samples, cutoff, sample_rate, gain)
        }
        BaseLayer::Highpass { gain } => noise::highpass_noise(rng, num_samples, gain),
        BaseLayer::Shimmer { voices, gain } => {
            render_shimmer(voices, num_samples, sample_rate, duration, gain, rng)
        }
    }
}

/// Decaying sine voices with sinusoidal frequency modulation.
fn render_shimmer(
    voices: usize,
    num_samples: usize,
    sample_rate: f64,
    duration: f64,
    gain: f64,
    rng: &mut Pcg32,
) -> Vec<f64> {
    let mut samples = vec![0.0f64; num_samples];
    let decay = duration * 0.5;

    for _ in 0..voices {
        let freq = rng.gen_range(800.0..2000.0);
        let phase = rng.gen_range(0.0..TAU);
        let mod_freq = rng.gen_range(5.0..15.0);

        for (i, out) in samples.iter_mut().enumerate() {
            let t = i as f64 / sample_rate;
            let modulated = freq + 50.0 * (TAU * mod_freq * t).sin();
            *out += (TAU * modulated * t + phase).sin() * (-t / decay).exp() * gain;
        }
    }

    samples
}

/// Scales the buffer so its peak absolute value equals `ceiling`. Silent
/// buffers are left untouched.
fn normalize_peak(samples: &mut [f64], ceiling: f64) {
    let peak = samples.iter().map(|s| s.abs()).fold(0.0_f64, f64::max);
    if peak > 0.0 {
        let scale = ceiling / peak;
        for s in samples.iter_mut() {
            *s *= scale;
        }
    }
}

/// Linear fade-in and fade-out at the buffer edges. Skipped for buffers
/// shorter than twice the fade length.
fn apply_edge_fades(samples: &mut [f64], fade_samples: usize) {
    if fade_samples == 0 || samples.len() < fade_samples * 2 {
        return;
    }

    let len = samples.len();
    for i in 0..fade_samples {
        let ramp = i as f64 / fade_samples as f64;
        samples[i] *= ramp;
        samples[len - 1 - i] *= ramp;
    }
}
