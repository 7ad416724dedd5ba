use chordline_types::EditorAction;

use crate::editor::Editor;

impl Editor<'_> {
    /// Apply an action. The single entry point used by key bindings and
    /// front ends; undoable actions record their own history step.
    ///
    /// Returns true if the block list changed.
    pub fn dispatch(&mut self, action: &EditorAction) -> bool {
        let revision = self.revision();
        match action {
            EditorAction::PlaceToken(token) => {
                self.place_token(token);
            }
            EditorAction::DropToken { token, x, y } => {
                self.drop_token(token, *x, *y);
            }
            EditorAction::AddNote(letter) => {
                self.add_note_shortcut(*letter);
            }
            EditorAction::DeleteSelected => {
                self.delete_selected();
            }
            EditorAction::DeleteBlock(id) => {
                self.delete_block(*id);
            }
            EditorAction::SelectAll => self.select_all(),
            EditorAction::ClearSelection => self.clear_selection(),
            EditorAction::Copy => {
                self.copy();
            }
            EditorAction::Paste { position, track } => {
                self.paste(*position, *track);
            }
            EditorAction::PasteAtPointer => {
                self.paste_at_pointer();
            }
            EditorAction::Undo => {
                self.undo();
            }
            EditorAction::Redo => {
                self.redo();
            }
            EditorAction::NewSong => self.new_song(),
            EditorAction::SetBpm(bpm) => self.set_bpm(*bpm),
            EditorAction::SetKey(key) => self.set_key(*key),
            EditorAction::SetOctave(octave) => self.set_octave(*octave),
            EditorAction::SetRepeat(repeat) => self.set_repeat(*repeat),
            EditorAction::Play => {
                self.play();
            }
            EditorAction::Stop => {
                self.stop();
            }
            EditorAction::ScrollBy(dx) => {
                self.scroll_by(*dx);
            }
            EditorAction::AdjustTrackHeight(delta) => self.adjust_track_height(*delta),
            EditorAction::AdjustBeatWidth(delta) => self.adjust_beat_width(*delta),
        }
        let changed = self.revision() != revision;
        if action.is_undoable() && !changed {
            log::debug!(target: "editor", "{:?} left the blocks unchanged", action);
        }
        changed
    }
}
