//! Command and feedback types for the playback thread.

use chordline_types::ChordBlock;

/// Commands sent from the owning thread to the playback thread.
#[derive(Debug, Clone)]
pub enum PlaybackCmd {
    Play,
    Stop,
    SetRepeat(bool),
    /// Replace the song the next cycle is planned from.
    UpdateSong { blocks: Vec<ChordBlock>, bpm: f64 },
    Shutdown,
}

/// Feedback sent from the playback thread back to its owner.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackFeedback {
    Started,
    Triggered { token: String, duration_secs: f64 },
    CycleComplete { cycle: u64 },
    /// Playback ended, either by `Stop` or at the end of a non-repeating cycle.
    Stopped { cancelled: usize },
}
