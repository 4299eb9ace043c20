//! Scene orchestrator integration tests.
//!
//! These run the real cache and synthesis pipeline against a recording
//! backend, so they cover bed resolution, cache hits, and the stochastic
//! one-shot trigger loop end to end.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tempfile::TempDir;

use foley_scene::{
    ChannelHandle, Orchestrator, PlaybackBackend, SceneTable, SoundCache,
};

/// Backend that records every call for later assertions.
#[derive(Debug, Default)]
struct RecordingBackend {
    plays: Vec<(PathBuf, bool, f64)>,
    stop_count: usize,
    next_channel: u32,
}

impl PlaybackBackend for RecordingBackend {
    fn play(&mut self, path: &Path, looped: bool, volume: f64) -> Option<ChannelHandle> {
        self.plays.push((path.to_path_buf(), looped, volume));
        let channel = ChannelHandle(self.next_channel);
        self.next_channel += 1;
        Some(channel)
    }

    fn stop_all(&mut self) {
        self.stop_count += 1;
    }
}

fn orchestrator_with(
    tmp: &TempDir,
    table_json: &str,
) -> Orchestrator<RecordingBackend> {
    let cache = SoundCache::new(tmp.path().join("cache")).unwrap();
    let scenes = SceneTable::from_str(table_json).unwrap();
    Orchestrator::new(RecordingBackend::default(), cache, scenes, 42)
}

#[test]
fn test_prompt_bed_synthesizes_once_then_cache_hit() {
    let tmp = TempDir::new().unwrap();
    let mut orch = orchestrator_with(
        &tmp,
        r#"{ "tavern": { "bed": { "prompt": "cozy tavern murmur", "duration": 0.4 } } }"#,
    );

    orch.play_scene("tavern").unwrap();
    assert_eq!(orch.active_scene_name(), Some("tavern"));
    assert_eq!(orch.cache().info().unwrap().entry_count, 1);

    let (bed_path, looped, volume) = orch.backend().plays[0].clone();
    assert!(looped);
    assert_eq!(volume, 0.7);

    // Replace the cached artifact with a sentinel: replaying the scene must
    // hit the cache rather than resynthesize.
    fs::write(&bed_path, b"sentinel").unwrap();

    orch.play_scene("tavern").unwrap();
    assert_eq!(orch.cache().info().unwrap().entry_count, 1);
    assert_eq!(fs::read(&bed_path).unwrap(), b"sentinel");
    assert_eq!(orch.backend().plays.len(), 2);
    assert_eq!(orch.backend().plays[1].0, bed_path);
}

#[test]
fn test_unknown_scene_fails_without_state_change() {
    let tmp = TempDir::new().unwrap();
    let mut orch = orchestrator_with(&tmp, "{}");

    let result = orch.play_scene("dungeon");
    assert!(result.is_err());
    assert_eq!(orch.active_scene_name(), None);
    // State untouched: no hard cut was issued for an unknown name.
    assert_eq!(orch.backend().stop_count, 0);
}

#[test]
fn test_bed_unresolved_leaves_idle() {
    // A scene with no bed at all cannot start.
    let tmp = TempDir::new().unwrap();
    let mut orch = orchestrator_with(
        &tmp,
        r#"{ "broken": { "oneshots": [ { "prompt": "creak", "prob_per_sec": 1.0 } ] } }"#,
    );

    assert!(orch.play_scene("broken").is_err());
    assert_eq!(orch.active_scene_name(), None);
    // The hard cut still happened before resolution failed.
    assert_eq!(orch.backend().stop_count, 1);
}

#[test]
fn test_zero_dt_never_fires() {
    let tmp = TempDir::new().unwrap();
    let dummy = tmp.path().join("bed.wav");
    fs::write(&dummy, b"dummy").unwrap();

    let json = format!(
        r#"{{ "loud": {{
            "bed": {{ "file": {0:?} }},
            "oneshots": [ {{ "file": {0:?}, "prob_per_sec": 1000.0 }} ]
        }} }}"#,
        dummy.to_str().unwrap()
    );
    let mut orch = orchestrator_with(&tmp, &json);

    orch.play_scene("loud").unwrap();
    let plays_after_bed = orch.backend().plays.len();

    // Same instant repeatedly: elapsed time is zero every tick.
    let now = Instant::now();
    for _ in 0..100 {
        orch.update(now);
    }
    assert_eq!(orch.backend().plays.len(), plays_after_bed);
}

#[test]
fn test_update_while_idle_is_noop() {
    let tmp = TempDir::new().unwrap();
    let mut orch = orchestrator_with(&tmp, "{}");

    orch.update(Instant::now());
    assert!(orch.backend().plays.is_empty());
    assert_eq!(orch.backend().stop_count, 0);
}

#[test]
fn test_fire_rate_matches_prob_per_sec() {
    let tmp = TempDir::new().unwrap();
    let dummy = tmp.path().join("clip.wav");
    fs::write(&dummy, b"dummy").unwrap();

    let json = format!(
        r#"{{ "steady": {{
            "bed": {{ "file": {0:?} }},
            "oneshots": [ {{ "file": {0:?}, "prob_per_sec": 0.5 }} ]
        }} }}"#,
        dummy.to_str().unwrap()
    );
    let mut orch = orchestrator_with(&tmp, &json);

    orch.play_scene("steady").unwrap();
    let plays_after_bed = orch.backend().plays.len();

    // 10,000 ticks of 20 ms: expected fires = 0.5 * 0.02 * 10,000 = 100.
    let tick = Duration::from_millis(20);
    let mut now = Instant::now();
    orch.update(now);
    for _ in 0..10_000 {
        now += tick;
        orch.update(now);
    }

    let fires = orch.backend().plays.len() - plays_after_bed;
    assert!(
        (50..=170).contains(&fires),
        "expected ~100 fires over 200 simulated seconds, got {fires}"
    );
}

#[test]
fn test_oneshot_volume_within_bounds() {
    let tmp = TempDir::new().unwrap();
    let dummy = tmp.path().join("clip.wav");
    fs::write(&dummy, b"dummy").unwrap();

    let json = format!(
        r#"{{ "steady": {{
            "bed": {{ "file": {0:?} }},
            "oneshots": [ {{ "file": {0:?}, "prob_per_sec": 5.0,
                            "volume_min": 0.3, "volume_max": 0.6 }} ]
        }} }}"#,
        dummy.to_str().unwrap()
    );
    let mut orch = orchestrator_with(&tmp, &json);

    orch.play_scene("steady").unwrap();
    let plays_after_bed = orch.backend().plays.len();

    let tick = Duration::from_millis(50);
    let mut now = Instant::now();
    orch.update(now);
    for _ in 0..1_000 {
        now += tick;
        orch.update(now);
    }

    let oneshots = &orch.backend().plays[plays_after_bed..];
    assert!(!oneshots.is_empty());
    for (_, looped, volume) in oneshots {
        assert!(!looped);
        assert!((0.3..=0.6).contains(volume), "volume {volume}");
    }
}

#[test]
fn test_failed_oneshot_generation_skips_silently() {
    let tmp = TempDir::new().unwrap();
    let dummy = tmp.path().join("bed.wav");
    fs::write(&dummy, b"dummy").unwrap();

    // Negative duration makes synthesis fail; the rule must be skipped
    // without disturbing the scene.
    let json = format!(
        r#"{{ "flaky": {{
            "bed": {{ "file": {0:?} }},
            "oneshots": [ {{ "prompt": "whoosh", "prob_per_sec": 1000.0,
                            "duration": -1.0 }} ]
        }} }}"#,
        dummy.to_str().unwrap()
    );
    let mut orch = orchestrator_with(&tmp, &json);

    orch.play_scene("flaky").unwrap();
    let plays_after_bed = orch.backend().plays.len();

    let mut now = Instant::now();
    orch.update(now);
    for _ in 0..20 {
        now += Duration::from_millis(50);
        orch.update(now);
    }

    assert_eq!(orch.backend().plays.len(), plays_after_bed);
    assert_eq!(orch.active_scene_name(), Some("flaky"));
}

#[test]
fn test_stop_scene_clears_state() {
    let tmp = TempDir::new().unwrap();
    let mut orch = orchestrator_with(
        &tmp,
        r#"{ "tavern": { "bed": { "prompt": "murmur", "duration": 0.3 } } }"#,
    );

    orch.play_scene("tavern").unwrap();
    assert!(orch.active_scene_name().is_some());

    orch.stop_scene();
    assert_eq!(orch.active_scene_name(), None);
    assert_eq!(orch.backend().stop_count, 2);

    // Ticks after stopping are no-ops.
    let plays = orch.backend().plays.len();
    orch.update(Instant::now());
    assert_eq!(orch.backend().plays.len(), plays);
}

#[test]
fn test_add_dynamic_oneshot_requires_active_scene() {
    let tmp = TempDir::new().unwrap();
    let mut orch = orchestrator_with(
        &tmp,
        r#"{ "tavern": { "bed": { "prompt": "murmur", "duration": 0.3 } } }"#,
    );

    assert!(orch.add_dynamic_oneshot("door slam", 0.1).is_err());

    orch.play_scene("tavern").unwrap();
    orch.add_dynamic_oneshot("door slam", 0.1).unwrap();

    let spec = orch.active_scene().unwrap();
    assert_eq!(spec.oneshots.len(), 1);
    let rule = &spec.oneshots[0];
    assert_eq!(rule.prompt.as_deref(), Some("door slam"));
    assert_eq!(rule.prob_per_sec, 0.1);
    assert_eq!(rule.volume_min, 0.4);
    assert_eq!(rule.volume_max, 0.8);
}

#[test]
fn test_generate_on_demand() {
    let tmp = TempDir::new().unwrap();
    let mut orch = orchestrator_with(&tmp, "{}");

    orch.generate_on_demand("windy mountain pass", 0.4).unwrap();
    assert!(orch
        .active_scene_name()
        .unwrap()
        .contains("windy mountain pass"));
    assert_eq!(orch.cache().info().unwrap().entry_count, 1);

    let (path, looped, volume) = orch.backend().plays[0].clone();
    assert!(looped);
    assert_eq!(volume, 0.6);
    assert!(path.exists());

    // Generating the same description again is a cache hit.
    orch.generate_on_demand("windy mountain pass", 0.4).unwrap();
    assert_eq!(orch.cache().info().unwrap().entry_count, 1);
}

#[test]
fn test_generated_scene_accepts_dynamic_oneshots() {
    let tmp = TempDir::new().unwrap();
    let mut orch = orchestrator_with(&tmp, "{}");

    orch.generate_on_demand("cavern depths", 0.4).unwrap();
    orch.add_dynamic_oneshot("distant drip", 200.0).unwrap();

    // The dynamic rule synthesizes on first fire and plays non-looped.
    let plays_before = orch.backend().plays.len();
    let mut now = Instant::now();
    orch.update(now);
    now += Duration::from_millis(50);
    orch.update(now);

    let oneshots = &orch.backend().plays[plays_before..];
    assert!(!oneshots.is_empty());
    assert!(oneshots.iter().all(|(_, looped, _)| !looped));
    // Bed plus the dynamic one-shot are both cached now.
    assert_eq!(orch.cache().info().unwrap().entry_count, 2);
}
