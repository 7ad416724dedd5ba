//! # chordline-audio
//!
//! Playback scheduling for the Chordline sequencer. Converts a block list and
//! a tempo into timed triggers against an external [`AudioTrigger`], either
//! cooperatively on a caller-driven clock ([`PlaybackScheduler`]) or on a
//! dedicated thread ([`PlaybackHandle`]).

pub mod commands;
pub mod handle;
mod playback_thread;
pub mod schedule;
pub mod scheduler;
pub mod timer;
pub mod trigger;

pub use commands::{PlaybackCmd, PlaybackFeedback};
pub use handle::PlaybackHandle;
pub use schedule::{plan_cycle, seconds_per_beat, CyclePlan, ScheduledTrigger, TRAILING_BUFFER};
pub use scheduler::{PlaybackEvent, PlaybackScheduler, PlaybackState};
pub use timer::{TaskHandle, TimerQueue};
pub use trigger::{AudioTrigger, LogTrigger};

use chordline_types::ChordBlock;

/// Provides the blocks and tempo the scheduler plans each cycle from.
/// Read once at the start of every cycle, so edits made mid-cycle are
/// picked up on the next loop.
pub trait SongSource {
    fn blocks(&self) -> &[ChordBlock];
    fn bpm(&self) -> f64;
}

/// Borrowed view of a song, for callers that keep blocks and tempo apart.
#[derive(Debug, Clone, Copy)]
pub struct Song<'a> {
    pub blocks: &'a [ChordBlock],
    pub bpm: f64,
}

impl SongSource for Song<'_> {
    fn blocks(&self) -> &[ChordBlock] {
        self.blocks
    }
    fn bpm(&self) -> f64 {
        self.bpm
    }
}
