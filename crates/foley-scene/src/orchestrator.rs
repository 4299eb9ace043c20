//! Scene orchestration.
//!
//! One state variable: the active scene, or none. `play_scene` starts a
//! bed looping, `update` advances one-shot triggering against wall-clock
//! time, `stop_scene` hard-cuts everything. All failure paths degrade to
//! "nothing happens this tick"; nothing here may take down the tick loop.

use std::path::{Path, PathBuf};
use std::time::Instant;

use rand::Rng;
use rand_pcg::Pcg32;
use tracing::{debug, info, warn};

use foley_synth::{rng::create_rng, Category};

use crate::backend::{ChannelHandle, PlaybackBackend};
use crate::cache::{SoundCache, SoundRequest};
use crate::error::{SceneError, SceneResult};
use crate::scene::{BedSpec, OneShotRule, SceneSpec, SceneTable};

/// Volume bounds and clip length for dynamically added one-shots.
const DYNAMIC_ONESHOT_VOLUME: (f64, f64) = (0.4, 0.8);
const DYNAMIC_ONESHOT_DURATION: f64 = 2.0;

/// Bed volume for scenes generated on demand.
const GENERATED_BED_VOLUME: f64 = 0.6;

#[derive(Debug)]
struct ActiveScene {
    name: String,
    spec: SceneSpec,
    /// Weak association only; the backend owns channel lifetime.
    #[allow(dead_code)]
    bed_channel: Option<ChannelHandle>,
}

/// Drives a scene against a playback backend.
///
/// One-shot triggering uses a per-tick Bernoulli approximation of a Poisson
/// process: each rule fires with probability `min(prob_per_sec * dt, 1)`.
/// This is accurate only while `prob_per_sec * dt` stays well below 1, so
/// keep ticks short relative to `1 / prob_per_sec`.
pub struct Orchestrator<B: PlaybackBackend> {
    backend: B,
    cache: SoundCache,
    scenes: SceneTable,
    active: Option<ActiveScene>,
    last_update: Option<Instant>,
    rng: Pcg32,
}

impl<B: PlaybackBackend> Orchestrator<B> {
    /// Creates an orchestrator. The seed drives one-shot triggering and
    /// volume draws.
    pub fn new(backend: B, cache: SoundCache, scenes: SceneTable, seed: u32) -> Self {
        Self {
            backend,
            cache,
            scenes,
            active: None,
            last_update: None,
            rng: create_rng(seed),
        }
    }

    /// Starts a named scene: hard-cuts current playback, resolves the bed
    /// (existing file, else prompt-driven generation through the cache),
    /// and loops it at the bed volume.
    ///
    /// An unknown name fails with state untouched. A scene whose bed cannot
    /// be resolved fails with playback stopped and no scene active.
    pub fn play_scene(&mut self, name: &str) -> SceneResult<()> {
        let spec = self
            .scenes
            .get(name)
            .cloned()
            .ok_or_else(|| SceneError::UnknownScene { name: name.into() })?;

        self.backend.stop_all();
        self.active = None;
        self.last_update = None;

        let bed = spec.bed.clone().ok_or_else(|| SceneError::BedUnresolved {
            name: name.into(),
        })?;

        let context = format!("{name} ambient background");
        let path = self
            .resolve_source(
                bed.file.as_deref(),
                bed.prompt.as_deref(),
                bed.duration,
                None,
                &context,
            )
            .ok_or_else(|| SceneError::BedUnresolved { name: name.into() })?;

        let bed_channel = self.backend.play(&path, true, bed.volume);
        if bed_channel.is_none() {
            warn!(scene = %name, "backend refused bed playback");
        }

        info!(scene = %name, bed = %path.display(), "scene started");
        self.active = Some(ActiveScene {
            name: name.to_string(),
            spec,
            bed_channel,
        });
        Ok(())
    }

    /// Advances one-shot triggering to `now`.
    ///
    /// No-op while idle. The elapsed time since the previous update is
    /// clamped at zero if the clock moves backward; the first update after
    /// a scene starts sees zero elapsed time and fires nothing.
    pub fn update(&mut self, now: Instant) {
        let Some(active) = self.active.as_ref() else {
            return;
        };

        let dt = self
            .last_update
            .map(|last| now.saturating_duration_since(last).as_secs_f64())
            .unwrap_or(0.0);
        self.last_update = Some(now);

        let scene_name = active.name.clone();
        let rules: Vec<OneShotRule> = active.spec.oneshots.clone();

        for rule in &rules {
            let probability = (rule.prob_per_sec * dt).min(1.0);
            if probability <= 0.0 {
                continue;
            }
            if self.rng.gen::<f64>() >= probability {
                continue;
            }

            let context = format!("{scene_name} oneshot");
            let Some(path) = self.resolve_source(
                rule.file.as_deref(),
                rule.prompt.as_deref(),
                rule.duration,
                rule.category,
                &context,
            ) else {
                debug!(scene = %scene_name, "oneshot source unresolved, skipping");
                continue;
            };

            let lo = rule.volume_min.min(rule.volume_max);
            let hi = rule.volume_min.max(rule.volume_max);
            let volume = if hi > lo {
                self.rng.gen_range(lo..=hi)
            } else {
                lo
            };

            if self.backend.play(&path, false, volume).is_none() {
                debug!(scene = %scene_name, "no free channel for oneshot");
            }
        }
    }

    /// Hard-cuts playback and clears the active scene.
    pub fn stop_scene(&mut self) {
        self.backend.stop_all();
        self.active = None;
        self.last_update = None;
    }

    /// Appends a prompt-driven one-shot rule to the active scene.
    pub fn add_dynamic_oneshot(
        &mut self,
        description: &str,
        prob_per_sec: f64,
    ) -> SceneResult<()> {
        let active = self.active.as_mut().ok_or(SceneError::NoActiveScene)?;

        active.spec.oneshots.push(OneShotRule {
            file: None,
            prompt: Some(description.to_string()),
            prob_per_sec,
            volume_min: DYNAMIC_ONESHOT_VOLUME.0,
            volume_max: DYNAMIC_ONESHOT_VOLUME.1,
            duration: DYNAMIC_ONESHOT_DURATION,
            category: None,
        });
        info!(scene = %active.name, %description, "dynamic oneshot added");
        Ok(())
    }

    /// Synthesizes a bed directly from free text, bypassing the scene
    /// table, and starts it as a fresh scene with no one-shots.
    pub fn generate_on_demand(&mut self, description: &str, duration: f64) -> SceneResult<()> {
        self.backend.stop_all();
        self.active = None;
        self.last_update = None;

        let request = SoundRequest::new(format!("ambient background {description}"), duration);
        let path = self.cache.get_or_create(&request)?;

        let bed_channel = self.backend.play(&path, true, GENERATED_BED_VOLUME);

        let spec = SceneSpec {
            bed: Some(BedSpec {
                file: Some(path.clone()),
                prompt: None,
                volume: GENERATED_BED_VOLUME,
                duration,
            }),
            oneshots: Vec::new(),
            keywords: Vec::new(),
        };

        info!(%description, bed = %path.display(), "generated scene started");
        self.active = Some(ActiveScene {
            name: format!("generated:{description}"),
            spec,
            bed_channel,
        });
        Ok(())
    }

    /// Name of the active scene, if any.
    pub fn active_scene_name(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.name.as_str())
    }

    /// Spec of the active scene, if any.
    pub fn active_scene(&self) -> Option<&SceneSpec> {
        self.active.as_ref().map(|a| &a.spec)
    }

    /// Names of the loaded scene table.
    pub fn scene_names(&self) -> Vec<&str> {
        self.scenes.names()
    }

    /// The content cache.
    pub fn cache(&self) -> &SoundCache {
        &self.cache
    }

    /// The playback backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Resolves a sound source: an existing file wins; otherwise the prompt
    /// (explicit, or derived from the dangling file name) is prefixed with
    /// scene context and routed through the cache. Failures log and yield
    /// `None`.
    fn resolve_source(
        &mut self,
        file: Option<&Path>,
        prompt: Option<&str>,
        duration: f64,
        category: Option<Category>,
        context: &str,
    ) -> Option<PathBuf> {
        if let Some(file) = file {
            if file.exists() {
                return Some(file.to_path_buf());
            }
        }

        let prompt = match prompt {
            Some(p) if !p.is_empty() => p.to_string(),
            _ => file
                .and_then(|f| f.file_stem())
                .and_then(|s| s.to_str())
                .map(|s| s.replace('_', " "))
                .unwrap_or_default(),
        };

        let full_prompt = match (context.is_empty(), prompt.is_empty()) {
            (false, false) => format!("{context} {prompt}"),
            (false, true) => context.to_string(),
            (true, false) => prompt,
            (true, true) => return None,
        };

        let mut request = SoundRequest::new(full_prompt, duration);
        request.category = category;

        match self.cache.get_or_create(&request) {
            Ok(path) => Some(path),
            Err(e) => {
                warn!(prompt = %request.prompt, error = %e, "generation failed");
                None
            }
        }
    }
}
