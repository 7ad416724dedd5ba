//! Block clipboard with positions stored relative to the copied group's
//! bounding minimum.

use chordline_types::ChordBlock;

/// One copied block, offset from the group's minimum position and track.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipboardBlock {
    pub token: String,
    pub position_offset: f64,
    pub track_offset: u32,
    pub duration: f64,
}

#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    blocks: Vec<ClipboardBlock>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents with copies of `blocks`. Copying nothing leaves
    /// the previous contents in place.
    pub fn copy<'a>(&mut self, blocks: impl IntoIterator<Item = &'a ChordBlock>) -> usize {
        let blocks: Vec<&ChordBlock> = blocks.into_iter().collect();
        if blocks.is_empty() {
            return 0;
        }
        let min_position = blocks
            .iter()
            .map(|b| b.position)
            .fold(f64::INFINITY, f64::min);
        let min_track = blocks.iter().map(|b| b.track).min().unwrap_or(0);
        self.blocks = blocks
            .iter()
            .map(|b| ClipboardBlock {
                token: b.token.clone(),
                position_offset: b.position - min_position,
                track_offset: b.track - min_track,
                duration: b.duration,
            })
            .collect();
        self.blocks.len()
    }

    /// New blocks with the group's minimum moved to (`position`, `track`).
    pub fn paste_at(&self, position: f64, track: u32) -> Vec<ChordBlock> {
        self.blocks
            .iter()
            .map(|c| {
                ChordBlock::new(
                    c.token.clone(),
                    (position + c.position_offset).max(0.0),
                    c.duration,
                    track + c.track_offset,
                )
            })
            .collect()
    }

    pub fn contents(&self) -> &[ClipboardBlock] {
        &self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
