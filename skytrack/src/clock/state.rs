//! Playback states.

use std::fmt;

/// State of the record/replay state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Never connected.
    #[default]
    Idle,
    /// Connected and neither recording nor replaying.
    Connected,
    Recording,
    RecordingPaused,
    Replay,
    ReplayPaused,
    /// The connector failed; the caller decides when to retry.
    Disconnected,
}

impl PlaybackState {
    pub fn is_recording(&self) -> bool {
        matches!(self, PlaybackState::Recording | PlaybackState::RecordingPaused)
    }

    pub fn is_replaying(&self) -> bool {
        matches!(self, PlaybackState::Replay | PlaybackState::ReplayPaused)
    }

    pub fn is_paused(&self) -> bool {
        matches!(
            self,
            PlaybackState::RecordingPaused | PlaybackState::ReplayPaused
        )
    }

    /// Neither recording nor replaying, paused or not.
    pub fn is_stopped(&self) -> bool {
        !self.is_recording() && !self.is_replaying()
    }

    /// Get a human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            PlaybackState::Idle => "not connected yet",
            PlaybackState::Connected => "connected, ready",
            PlaybackState::Recording => "recording",
            PlaybackState::RecordingPaused => "recording paused",
            PlaybackState::Replay => "replaying",
            PlaybackState::ReplayPaused => "replay paused",
            PlaybackState::Disconnected => "connection lost",
        }
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackState::Idle => write!(f, "idle"),
            PlaybackState::Connected => write!(f, "connected"),
            PlaybackState::Recording => write!(f, "recording"),
            PlaybackState::RecordingPaused => write!(f, "recording_paused"),
            PlaybackState::Replay => write!(f, "replay"),
            PlaybackState::ReplayPaused => write!(f, "replay_paused"),
            PlaybackState::Disconnected => write!(f, "disconnected"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_predicates() {
        assert!(PlaybackState::RecordingPaused.is_recording());
        assert!(PlaybackState::RecordingPaused.is_paused());
        assert!(PlaybackState::Replay.is_replaying());
        assert!(!PlaybackState::Replay.is_paused());
        assert!(PlaybackState::Connected.is_stopped());
        assert!(PlaybackState::Disconnected.is_stopped());
    }

    #[test]
    fn test_display() {
        assert_eq!(PlaybackState::ReplayPaused.to_string(), "replay_paused");
        assert_eq!(PlaybackState::default(), PlaybackState::Idle);
    }
}
