//! Procedural ambience and effect synthesis.
//!
//! This crate turns a coarse sound-category label and a duration into a
//! normalized mono sample buffer:
//!
//! - **Signal primitives** - colored noise (white/pink/brown) and one-pole
//!   filtered noise ([`noise`])
//! - **Transient shapes** - creaks, snaps, crackles, droplets, sparkles,
//!   impacts, clashes ([`transient`])
//! - **Category recipes** - declarative base-layer + transient-overlay
//!   tables per category ([`recipe`])
//! - **Classifier** - free text to [`Category`] ([`classify`])
//! - **WAV encoding** - deterministic 16-bit mono PCM ([`wav`])
//!
//! # Determinism
//!
//! All synthesis is deterministic. Given the same category, duration, seed,
//! and config, the output is byte-identical across runs. Randomness flows
//! through PCG32 with BLAKE3-derived component seeds.
//!
//! # Example
//!
//! ```
//! use foley_synth::{classify, render, RenderConfig};
//!
//! let category = classify("crackling campfire at night");
//! let config = RenderConfig::default();
//! let samples = render(category, 2.0, 42, &config).unwrap();
//! assert_eq!(samples.len(), 88_200);
//! ```

pub mod category;
pub mod classify;
pub mod error;
pub mod noise;
pub mod recipe;
pub mod render;
pub mod rng;
pub mod transient;
pub mod wav;

// Re-export main types at crate root
pub use category::Category;
pub use classify::classify;
pub use error::{SynthError, SynthResult};
pub use render::{render, RenderConfig};
pub use rng::seed_from_text;
pub use wav::{encode_mono, WavResult};
