use serde::{Deserialize, Serialize};

use crate::token;
use crate::BlockId;

/// Shortest duration a block may have, in beats.
pub const MIN_BLOCK_DURATION: f64 = 0.25;

/// Duration given to blocks created by drop, click or shortcut.
pub const DEFAULT_BLOCK_DURATION: f64 = 1.0;

/// Furthest beat a block may start at, and longest it may last.
pub const MAX_BLOCK_BEATS: f64 = 1_000_000.0;

/// A placed musical event on the timeline.
///
/// Blocks may overlap freely in time and track. Position and duration are in
/// beats; the track is a lane index counted from the top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordBlock {
    #[serde(skip)]
    pub id: BlockId,
    #[serde(rename = "chord", alias = "token")]
    pub token: String,
    #[serde(default)]
    pub position: f64,
    #[serde(default = "default_duration")]
    pub duration: f64,
    #[serde(default)]
    pub track: u32,
}

fn default_duration() -> f64 {
    DEFAULT_BLOCK_DURATION
}

impl ChordBlock {
    /// Create an unplaced block. The store assigns the id on insertion.
    pub fn new(token: impl Into<String>, position: f64, duration: f64, track: u32) -> Self {
        Self {
            id: BlockId::default(),
            token: token.into(),
            position,
            duration,
            track,
        }
    }

    /// Beat at which the block ends.
    pub fn end(&self) -> f64 {
        self.position + self.duration
    }

    pub fn is_single_note(&self) -> bool {
        token::is_single_note(&self.token)
    }

    /// Clamp position and duration into their valid ranges.
    /// Non-finite values fall back to 0 and the minimum duration.
    pub fn sanitize(&mut self) {
        self.position = if self.position.is_finite() {
            self.position.clamp(0.0, MAX_BLOCK_BEATS)
        } else {
            0.0
        };
        self.duration = if self.duration.is_finite() {
            self.duration.clamp(MIN_BLOCK_DURATION, MAX_BLOCK_BEATS)
        } else {
            MIN_BLOCK_DURATION
        };
    }
}
