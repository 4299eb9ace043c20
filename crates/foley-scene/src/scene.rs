//! Scene table model.
//!
//! A scene bundles one looping bed with zero or more probabilistically
//! triggered one-shot rules. Tables are plain JSON: a map of scene name to
//! spec. A `file` source is authoritative when it exists on disk; otherwise
//! the orchestrator falls back to prompt-driven generation.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use foley_synth::Category;

use crate::error::SceneResult;

/// Clip length used when a bed or one-shot does not specify one.
pub const DEFAULT_CLIP_DURATION: f64 = 3.0;

fn default_clip_duration() -> f64 {
    DEFAULT_CLIP_DURATION
}

fn default_bed_volume() -> f64 {
    0.7
}

fn default_volume_min() -> f64 {
    0.5
}

fn default_volume_max() -> f64 {
    1.0
}

/// The looping background track of a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BedSpec {
    /// Pre-recorded file; authoritative when present and existing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Generation prompt fallback.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Playback volume in [0, 1].
    #[serde(default = "default_bed_volume")]
    pub volume: f64,
    /// Generated clip length in seconds.
    #[serde(default = "default_clip_duration")]
    pub duration: f64,
}

/// A probabilistically triggered one-shot sound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneShotRule {
    /// Pre-recorded file; authoritative when present and existing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Generation prompt fallback.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Trigger rate: expected fires per second, combined with elapsed time
    /// each tick. A rate, not a probability.
    #[serde(default)]
    pub prob_per_sec: f64,
    /// Lower bound of the uniformly drawn playback volume.
    #[serde(default = "default_volume_min")]
    pub volume_min: f64,
    /// Upper bound of the uniformly drawn playback volume.
    #[serde(default = "default_volume_max")]
    pub volume_max: f64,
    /// Generated clip length in seconds.
    #[serde(default = "default_clip_duration")]
    pub duration: f64,
    /// Category hint forwarded to generation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

/// One named scene: a bed plus its one-shot rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneSpec {
    /// Background bed; a scene without one cannot start.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bed: Option<BedSpec>,
    /// One-shot rules, evaluated independently every tick.
    #[serde(default)]
    pub oneshots: Vec<OneShotRule>,
    /// Keywords for external text-to-scene matching.
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Named scene collection, loaded from JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneTable {
    scenes: BTreeMap<String, SceneSpec>,
}

impl SceneTable {
    /// Loads a table from a JSON file and warns about missing referenced
    /// files (they fall back to prompt generation at play time).
    pub fn from_path(path: impl AsRef<Path>) -> SceneResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_str(&text)
    }

    /// Parses a table from a JSON string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &str) -> SceneResult<Self> {
        let table: SceneTable = serde_json::from_str(text)?;
        table.warn_missing_files();
        Ok(table)
    }

    /// Adds or replaces a scene.
    pub fn insert(&mut self, name: impl Into<String>, spec: SceneSpec) {
        self.scenes.insert(name.into(), spec);
    }

    /// Looks up a scene by name.
    pub fn get(&self, name: &str) -> Option<&SceneSpec> {
        self.scenes.get(name)
    }

    /// Scene names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.scenes.keys().map(String::as_str).collect()
    }

    /// Number of scenes.
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    /// True when no scenes are loaded.
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Iterates scenes in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SceneSpec)> {
        self.scenes.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    /// Scene-name to keyword-list mapping for an external text matcher.
    pub fn keywords(&self) -> BTreeMap<String, Vec<String>> {
        self.scenes
            .iter()
            .map(|(name, spec)| (name.clone(), spec.keywords.clone()))
            .collect()
    }

    fn warn_missing_files(&self) {
        for (name, spec) in &self.scenes {
            if let Some(bed) = &spec.bed {
                if let Some(file) = &bed.file {
                    if !file.exists() {
                        warn!(scene = %name, file = %file.display(), "bed file missing, will generate");
                    }
                }
            }
            for (index, oneshot) in spec.oneshots.iter().enumerate() {
                if let Some(file) = &oneshot.file {
                    if !file.exists() {
                        warn!(scene = %name, index, file = %file.display(), "oneshot file missing, will generate");
                    }
                }
            }
        }
    }
}
