//! Content-addressed cache for synthesized clips.
//!
//! Entries are keyed by a BLAKE3 digest of (prompt, duration, category) and
//! stored as a flat directory of `<digest>.wav` files. The digest also
//! seeds synthesis, so a given request always renders byte-identical audio.
//! A per-key mutex arena makes concurrent misses for one key synthesize at
//! most once.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::{fs, io};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use foley_synth::{classify, encode_mono, render, rng::seed_from_text, Category, RenderConfig};

use crate::error::CacheError;

/// A request for a synthesized sound.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundRequest {
    /// Free-text description; classified when no category is given.
    pub prompt: String,
    /// Clip length in seconds.
    pub duration: f64,
    /// Explicit category, bypassing classification.
    pub category: Option<Category>,
}

impl SoundRequest {
    /// Creates a request classified from its prompt.
    pub fn new(prompt: impl Into<String>, duration: f64) -> Self {
        Self {
            prompt: prompt.into(),
            duration,
            category: None,
        }
    }

    /// Pins the category instead of classifying the prompt.
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }
}

/// Summary of the cache directory contents.
#[derive(Debug, Clone)]
pub struct CacheInfo {
    /// Cache directory path.
    pub dir: PathBuf,
    /// Number of cached clips.
    pub entry_count: u64,
    /// Total size in bytes.
    pub total_size_bytes: u64,
}

/// Flat on-disk cache of synthesized WAV clips.
pub struct SoundCache {
    dir: PathBuf,
    config: RenderConfig,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl SoundCache {
    /// Opens (creating if needed) a cache at `dir` with default render
    /// settings.
    pub fn new(dir: impl Into<PathBuf>) -> io::Result<Self> {
        Self::with_config(dir, RenderConfig::default())
    }

    /// Opens a cache with explicit render settings.
    pub fn with_config(dir: impl Into<PathBuf>, config: RenderConfig) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            config,
            locks: Mutex::new(HashMap::new()),
        })
    }

    /// The backing directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Deterministic digest of a request; also the artifact's filename stem.
    ///
    /// Duration participates as integer milliseconds so the key text does
    /// not depend on float formatting.
    pub fn key(prompt: &str, duration: f64, category: Category) -> String {
        let duration_ms = (duration * 1000.0).round() as u64;
        let canonical = format!("{prompt}|{duration_ms}|{category}");
        blake3::hash(canonical.as_bytes()).to_hex().to_string()
    }

    /// Returns the path of the cached clip for `request`, synthesizing and
    /// persisting it first on a miss.
    ///
    /// The existence check runs before any synthesis work; hits never
    /// render. Misses render with a seed derived from the key, write to a
    /// temp file in the cache directory, and atomically persist it.
    pub fn get_or_create(&self, request: &SoundRequest) -> Result<PathBuf, CacheError> {
        let category = request
            .category
            .unwrap_or_else(|| classify(&request.prompt));
        let key = Self::key(&request.prompt, request.duration, category);
        let path = self.dir.join(format!("{key}.wav"));

        // Single-flight: concurrent misses for one key queue behind the
        // first caller and then take the hit path.
        let key_lock = self.lock_for(&key);
        let _guard = key_lock.lock().unwrap_or_else(|e| e.into_inner());

        if path.exists() {
            debug!(%key, "cache hit");
            return Ok(path);
        }

        info!(prompt = %request.prompt, %category, duration = request.duration, "cache miss, synthesizing");

        let seed = seed_from_text(&key);
        let samples = render(category, request.duration, seed, &self.config)?;
        let wav = encode_mono(&samples, self.config.sample_rate);

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(&wav.wav_data)?;
        tmp.persist(&path).map_err(|e| CacheError::Io(e.error))?;

        Ok(path)
    }

    /// Counts entries and total bytes with a flat scan of `*.wav` files.
    pub fn info(&self) -> Result<CacheInfo, CacheError> {
        let mut entry_count = 0u64;
        let mut total_size_bytes = 0u64;

        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("wav") {
                entry_count += 1;
                total_size_bytes += entry.metadata()?.len();
            }
        }

        Ok(CacheInfo {
            dir: self.dir.clone(),
            entry_count,
            total_size_bytes,
        })
    }

    /// Deletes every cached clip, returning how many were removed.
    pub fn clear(&self) -> Result<u64, CacheError> {
        let mut count = 0u64;

        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("wav") {
                fs::remove_file(&path)?;
                count += 1;
            }
        }

        Ok(count)
    }

    fn lock_for(&self, key: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_key_determinism() {
        let a = SoundCache::key("crackling fire", 3.0, Category::Fire);
        let b = SoundCache::key("crackling fire", 3.0, Category::Fire);
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_key_distinctness() {
        let base = SoundCache::key("crackling fire", 3.0, Category::Fire);
        assert_ne!(base, SoundCache::key("crackling fires", 3.0, Category::Fire));
        assert_ne!(base, SoundCache::key("crackling fire", 3.5, Category::Fire));
        assert_ne!(base, SoundCache::key("crackling fire", 3.0, Category::Magic));
    }

    #[test]
    fn test_get_or_create_miss_then_hit() {
        let tmp = TempDir::new().unwrap();
        let cache = SoundCache::new(tmp.path()).unwrap();

        let request = SoundRequest::new("crackling fire", 0.5);
        let first = cache.get_or_create(&request).unwrap();
        assert!(first.exists());
        assert_eq!(cache.info().unwrap().entry_count, 1);

        // Overwrite with a sentinel: a hit must not re-render the file.
        fs::write(&first, b"sentinel").unwrap();

        let second = cache.get_or_create(&request).unwrap();
        assert_eq!(first, second);
        assert_eq!(fs::read(&second).unwrap(), b"sentinel");
        assert_eq!(cache.info().unwrap().entry_count, 1);
    }

    #[test]
    fn test_identical_requests_identical_content() {
        let tmp_a = TempDir::new().unwrap();
        let tmp_b = TempDir::new().unwrap();
        let cache_a = SoundCache::new(tmp_a.path()).unwrap();
        let cache_b = SoundCache::new(tmp_b.path()).unwrap();

        let request = SoundRequest::new("drips in a cave", 0.4);
        let a = cache_a.get_or_create(&request).unwrap();
        let b = cache_b.get_or_create(&request).unwrap();

        assert_eq!(fs::read(a).unwrap(), fs::read(b).unwrap());
    }

    #[test]
    fn test_explicit_category_changes_key() {
        let tmp = TempDir::new().unwrap();
        let cache = SoundCache::new(tmp.path()).unwrap();

        let classified = cache
            .get_or_create(&SoundRequest::new("low rumble", 0.3))
            .unwrap();
        let pinned = cache
            .get_or_create(&SoundRequest::new("low rumble", 0.3).with_category(Category::Wind))
            .unwrap();
        assert_ne!(classified, pinned);
        assert_eq!(cache.info().unwrap().entry_count, 2);
    }

    #[test]
    fn test_info_and_clear() {
        let tmp = TempDir::new().unwrap();
        let cache = SoundCache::new(tmp.path()).unwrap();

        cache
            .get_or_create(&SoundRequest::new("fire one", 0.3))
            .unwrap();
        cache
            .get_or_create(&SoundRequest::new("water two", 0.3))
            .unwrap();

        let info = cache.info().unwrap();
        assert_eq!(info.entry_count, 2);
        assert!(info.total_size_bytes > 0);

        let removed = cache.clear().unwrap();
        assert_eq!(removed, 2);

        let info = cache.info().unwrap();
        assert_eq!(info.entry_count, 0);
        assert_eq!(info.total_size_bytes, 0);
    }

    #[test]
    fn test_invalid_duration_surfaces_as_error() {
        let tmp = TempDir::new().unwrap();
        let cache = SoundCache::new(tmp.path()).unwrap();

        let result = cache.get_or_create(&SoundRequest::new("fire", -1.0));
        assert!(matches!(result, Err(CacheError::Synth(_))));
        assert_eq!(cache.info().unwrap().entry_count, 0);
    }
}
