//! # chordline-types
//!
//! Shared type definitions for the Chordline sequencer.
//! This crate holds the value types used by chordline-core, chordline-audio
//! and the command-line front end: placed blocks, the token vocabulary,
//! editor actions and the persisted project shape.

pub mod action;
mod block;
pub mod music;
mod project;
pub mod token;

pub use action::EditorAction;
pub use block::{ChordBlock, DEFAULT_BLOCK_DURATION, MAX_BLOCK_BEATS, MIN_BLOCK_DURATION};
pub use music::{ChordQuality, PitchClass};
pub use project::{ProjectFile, DEFAULT_BPM, DEFAULT_KEY, PROJECT_VERSION};
pub use token::{Color, PlayableNote, Token};

/// Unique identifier for a block in the block store.
///
/// Ids are allocated by the store and are not persisted; a loaded project
/// gets fresh ids.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct BlockId(u32);

impl BlockId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
    pub fn get(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
