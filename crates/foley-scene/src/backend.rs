//! Playback backend interface.
//!
//! The orchestrator drives playback through this trait; channel lifetime is
//! owned by the backend. A `None` channel means "sound did not play" and
//! callers continue without it.

use std::path::Path;

use tracing::debug;

/// Opaque handle to a playback channel owned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelHandle(pub u32);

/// A playback device the orchestrator can drive.
///
/// `play` and `stop_all` are expected to be non-blocking and tolerant of
/// unreadable files (return `None` rather than panic).
pub trait PlaybackBackend {
    /// Starts playing the file at `path`, optionally looped, at a volume in
    /// [0, 1]. Returns the channel it landed on, or `None` if it could not
    /// play.
    fn play(&mut self, path: &Path, looped: bool, volume: f64) -> Option<ChannelHandle>;

    /// Stops every playing channel immediately.
    fn stop_all(&mut self);
}

/// Backend that plays nothing but tracks calls.
///
/// Used by the CLI simulator and tests to exercise the full orchestration
/// pipeline without an audio device.
#[derive(Debug, Default)]
pub struct NullBackend {
    next_channel: u32,
    /// Number of `play` calls accepted.
    pub play_count: u64,
    /// Number of `stop_all` calls.
    pub stop_count: u64,
}

impl NullBackend {
    /// Creates a new silent backend.
    pub fn new() -> Self {
        Self::default()
    }
}

impl PlaybackBackend for NullBackend {
    fn play(&mut self, path: &Path, looped: bool, volume: f64) -> Option<ChannelHandle> {
        let channel = ChannelHandle(self.next_channel);
        self.next_channel = self.next_channel.wrapping_add(1);
        self.play_count += 1;
        debug!(
            path = %path.display(),
            looped,
            volume,
            channel = channel.0,
            "null backend play"
        );
        Some(channel)
    }

    fn stop_all(&mut self) {
        self.stop_count += 1;
        debug!("null backend stop_all");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_null_backend_hands_out_channels() {
        let mut backend = NullBackend::new();
        let path = PathBuf::from("a.wav");

        let a = backend.play(&path, false, 0.5).unwrap();
        let b = backend.play(&path, true, 0.7).unwrap();
        assert_ne!(a, b);
        assert_eq!(backend.play_count, 2);

        backend.stop_all();
        assert_eq!(backend.stop_count, 1);
    }
}
