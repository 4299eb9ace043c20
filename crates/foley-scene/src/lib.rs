//! Scene orchestration and content caching for procedural soundscapes.
//!
//! This crate drives a live scene - a looping background bed plus a set of
//! probabilistically triggered one-shots - against wall-clock time, using
//! the synthesis crate and an on-disk content cache as collaborators:
//!
//! - [`SoundCache`] - content-addressed WAV cache with single-flight misses
//! - [`SceneTable`] - JSON scene model (beds, one-shot rules, keywords)
//! - [`Orchestrator`] - the scene state machine and tick loop body
//! - [`PlaybackBackend`] - the playback device interface; [`NullBackend`]
//!   ships for tests and headless simulation
//!
//! # Example
//!
//! ```no_run
//! use std::time::Instant;
//! use foley_scene::{NullBackend, Orchestrator, SceneTable, SoundCache};
//!
//! let cache = SoundCache::new("./sound_cache")?;
//! let scenes = SceneTable::from_path("scenes.json")?;
//! let mut orchestrator = Orchestrator::new(NullBackend::new(), cache, scenes, 42);
//!
//! orchestrator.play_scene("tavern")?;
//! for _ in 0..200 {
//!     orchestrator.update(Instant::now());
//!     std::thread::sleep(std::time::Duration::from_millis(50));
//! }
//! orchestrator.stop_scene();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod backend;
pub mod cache;
pub mod error;
pub mod orchestrator;
pub mod scene;

// Re-export main types at crate root
pub use backend::{ChannelHandle, NullBackend, PlaybackBackend};
pub use cache::{CacheInfo, SoundCache, SoundRequest};
pub use error::{CacheError, SceneError, SceneResult};
pub use orchestrator::Orchestrator;
pub use scene::{BedSpec, OneShotRule, SceneSpec, SceneTable};
