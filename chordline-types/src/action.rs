//! Editor actions.
//!
//! Actions represent user intents that flow through the editor's dispatch.
//! Pointer gestures (drag, resize) are not actions; they go through the
//! pointer handlers directly because they span several events.

use crate::{BlockId, PitchClass};

#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
    /// Place a palette token at the default insertion point.
    PlaceToken(String),
    /// Drop a token at canvas coordinates, merging single notes.
    DropToken { token: String, x: f64, y: f64 },
    /// Note-letter shortcut: add `<letter><octave>n` at the last pointer position.
    AddNote(char),
    DeleteSelected,
    DeleteBlock(BlockId),
    SelectAll,
    ClearSelection,
    Copy,
    /// Paste with the leftmost clipboard block at the given beat and track.
    Paste { position: f64, track: u32 },
    /// Paste at the last pointer position.
    PasteAtPointer,
    Undo,
    Redo,
    /// Clear all blocks.
    NewSong,
    SetBpm(u16),
    SetKey(PitchClass),
    SetOctave(i32),
    SetRepeat(bool),
    Play,
    Stop,
    ScrollBy(f64),
    AdjustTrackHeight(f64),
    AdjustBeatWidth(f64),
}

impl EditorAction {
    /// Whether this action mutates the block set and so needs an undo snapshot.
    pub fn is_undoable(&self) -> bool {
        matches!(
            self,
            EditorAction::PlaceToken(_)
                | EditorAction::DropToken { .. }
                | EditorAction::AddNote(_)
                | EditorAction::DeleteSelected
                | EditorAction::DeleteBlock(_)
                | EditorAction::Paste { .. }
                | EditorAction::PasteAtPointer
                | EditorAction::NewSong
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_mutations_are_undoable() {
        assert!(EditorAction::PlaceToken("C".into()).is_undoable());
        assert!(EditorAction::DeleteSelected.is_undoable());
        assert!(EditorAction::NewSong.is_undoable());
        assert!(EditorAction::PasteAtPointer.is_undoable());
    }

    #[test]
    fn view_and_transport_actions_are_not_undoable() {
        assert!(!EditorAction::Undo.is_undoable());
        assert!(!EditorAction::Copy.is_undoable());
        assert!(!EditorAction::SelectAll.is_undoable());
        assert!(!EditorAction::Play.is_undoable());
        assert!(!EditorAction::ScrollBy(10.0).is_undoable());
        assert!(!EditorAction::SetBpm(90).is_undoable());
    }
}
