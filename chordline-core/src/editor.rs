//! The editor: one owner for the block store, selection, clipboard, history,
//! viewport, gesture state and playback scheduler.
//!
//! Every structural mutation snapshots the block list before it runs and
//! records that snapshot only if the list actually changed, so each effective
//! edit or pointer gesture is exactly one undo step. The renderer and the
//! audio trigger are borrowed; the editor calls `redraw` synchronously after
//! each visible change.

use std::path::Path;
use std::time::Duration;

use chordline_audio::{AudioTrigger, PlaybackEvent, PlaybackScheduler, Song};
use chordline_types::music::letter_index;
use chordline_types::token::{is_single_note, join_tokens, note_token};
use chordline_types::{
    BlockId, ChordBlock, PitchClass, ProjectFile, DEFAULT_BLOCK_DURATION, DEFAULT_BPM,
    PROJECT_VERSION,
};

use crate::geometry::Geometry;
use crate::interaction::{CursorHint, Interaction, PressOutcome};
use crate::state::persistence::{self, ProjectError};
use crate::state::{BlockStore, Clipboard, History, Selection, FIND_TOLERANCE};
use crate::viewport::{clamp_zoom, Viewport};

/// Presentation callback invoked after every change that affects layout.
pub trait Redraw {
    fn redraw(&self);
}

impl<F: Fn()> Redraw for F {
    fn redraw(&self) {
        self()
    }
}

/// Highest octave offered by the note shortcuts.
pub const MAX_OCTAVE: i32 = 8;

/// Fraction of the container width where click-to-add places a block.
const PLACE_FRACTION: f64 = 0.2;
/// Fraction of the container width used for shortcut notes before the
/// pointer has been seen.
const SHORTCUT_FRACTION: f64 = 0.1;

#[derive(Debug, Clone, PartialEq)]
pub struct EditorSettings {
    pub bpm: u16,
    pub key: PitchClass,
    pub octave: i32,
    pub repeat: bool,
    pub geometry: Geometry,
    pub timeline_beats: u32,
    pub max_canvas_width: f64,
    pub history_depth: usize,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            bpm: DEFAULT_BPM,
            key: PitchClass::C,
            octave: 4,
            repeat: false,
            geometry: Geometry::default(),
            timeline_beats: 200,
            max_canvas_width: 60_000.0,
            history_depth: 50,
        }
    }
}

/// Result of dropping a token on the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// Folded into an existing single-note block as a composite.
    Merged(BlockId),
    Created(BlockId),
}

/// Entries available from a context click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextMenu {
    /// Block under the pointer, now part of the selection.
    pub target: Option<BlockId>,
    pub can_delete: bool,
    pub can_copy: bool,
    pub can_paste: bool,
}

pub struct Editor<'a> {
    store: BlockStore,
    selection: Selection,
    clipboard: Clipboard,
    history: History<Vec<ChordBlock>>,
    geometry: Geometry,
    viewport: Viewport,
    interaction: Interaction,
    scheduler: PlaybackScheduler,
    bpm: u16,
    key: PitchClass,
    /// Key as written in the project file, saved back unchanged.
    key_name: String,
    octave: i32,
    /// Last time passed to `tick`; `play` starts from here.
    clock: Duration,
    /// Bumped on every change to the block list.
    revision: u64,
    dirty: bool,
    renderer: &'a dyn Redraw,
    audio: &'a dyn AudioTrigger,
}

impl<'a> Editor<'a> {
    pub fn new(settings: EditorSettings, renderer: &'a dyn Redraw, audio: &'a dyn AudioTrigger) -> Self {
        let mut scheduler = PlaybackScheduler::new();
        scheduler.set_repeat(settings.repeat);
        Self {
            store: BlockStore::new(),
            selection: Selection::new(),
            clipboard: Clipboard::new(),
            history: History::new(settings.history_depth),
            geometry: settings.geometry,
            viewport: Viewport::new(settings.timeline_beats, settings.max_canvas_width),
            interaction: Interaction::new(),
            scheduler,
            bpm: settings.bpm.max(1),
            key: settings.key,
            key_name: settings.key.name().to_string(),
            octave: settings.octave.clamp(0, MAX_OCTAVE),
            clock: Duration::ZERO,
            revision: 0,
            dirty: false,
            renderer,
            audio,
        }
    }

    // --- accessors ---

    pub fn store(&self) -> &BlockStore {
        &self.store
    }

    pub fn blocks(&self) -> &[ChordBlock] {
        self.store.blocks()
    }

    pub fn block(&self, id: BlockId) -> Option<&ChordBlock> {
        self.store.get(id)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn scheduler(&self) -> &PlaybackScheduler {
        &self.scheduler
    }

    pub fn bpm(&self) -> u16 {
        self.bpm
    }

    pub fn key(&self) -> PitchClass {
        self.key
    }

    pub fn key_name(&self) -> &str {
        &self.key_name
    }

    pub fn octave(&self) -> i32 {
        self.octave
    }

    pub fn repeat(&self) -> bool {
        self.scheduler.repeat()
    }

    pub fn is_playing(&self) -> bool {
        self.scheduler.is_playing()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_depth(&self) -> usize {
        self.history.undo_depth()
    }

    /// Counter that changes whenever the block list changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether the block list changed since the last load or save.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Selected blocks in store order.
    pub fn selected_blocks(&self) -> Vec<&ChordBlock> {
        self.store
            .blocks()
            .iter()
            .filter(|b| self.selection.contains(b.id))
            .collect()
    }

    // --- placement ---

    pub fn add_block(&mut self, block: ChordBlock) -> BlockId {
        let before = self.store.snapshot();
        let id = self.store.add(block);
        self.commit(before);
        id
    }

    /// Click-to-add from the palette: one beat long on track 0, near the
    /// left of the visible window.
    pub fn place_token(&mut self, token: &str) -> BlockId {
        let x = self.viewport.scroll_x + PLACE_FRACTION * self.viewport.container_width;
        let position = self.geometry.x_to_beat(x).round().max(0.0);
        self.add_block(ChordBlock::new(token, position, DEFAULT_BLOCK_DURATION, 0))
    }

    /// Drop a token at content coordinates. A single note dropped on a cell
    /// whose block is also a single note is merged into a composite; anything
    /// else creates a new block. Drops on the header are ignored.
    pub fn drop_token(&mut self, token: &str, x: f64, y: f64) -> Option<DropOutcome> {
        if y < self.geometry.header_height {
            return None;
        }
        let beat = self.geometry.snapped_beat_at(x);
        let track = self.geometry.track_at(y);
        let before = self.store.snapshot();

        let target = self
            .store
            .find(beat, track, FIND_TOLERANCE)
            .filter(|_| is_single_note(token));
        let merged = target.and_then(|id| {
            let block = self.store.get_mut(id)?;
            if !block.is_single_note() {
                return None;
            }
            block.token = join_tokens(&block.token, token);
            log::debug!(target: "editor", "merged {} into block {} -> {}", token, id, block.token);
            Some(id)
        });

        let outcome = match merged {
            Some(id) => DropOutcome::Merged(id),
            None => DropOutcome::Created(self.store.add(ChordBlock::new(
                token,
                beat,
                DEFAULT_BLOCK_DURATION,
                track,
            ))),
        };
        self.commit(before);
        Some(outcome)
    }

    /// Note-letter shortcut: place `<letter><octave>n` at the last pointer
    /// position and select it. Returns `None` for letters outside A-G.
    pub fn add_note_shortcut(&mut self, letter: char) -> Option<BlockId> {
        letter_index(letter)?;
        let (x, y) = self.interaction.last_pointer().unwrap_or((
            self.viewport.scroll_x + SHORTCUT_FRACTION * self.viewport.container_width,
            self.geometry.header_height + 0.5 * self.geometry.track_height,
        ));
        let beat = self.geometry.snapped_beat_at(x);
        let track = self.geometry.track_at(y);
        let token = note_token(letter, self.octave);

        let before = self.store.snapshot();
        let id = self
            .store
            .add(ChordBlock::new(token, beat, DEFAULT_BLOCK_DURATION, track));
        self.selection.select_only(id);
        self.commit(before);
        Some(id)
    }

    // --- deletion and selection ---

    /// Delete every selected block. Returns how many were removed.
    pub fn delete_selected(&mut self) -> usize {
        if self.selection.is_empty() {
            return 0;
        }
        let before = self.store.snapshot();
        let removed = self.store.remove_many(self.selection.iter());
        self.selection.clear();
        self.commit(before);
        removed
    }

    pub fn delete_block(&mut self, id: BlockId) -> bool {
        let before = self.store.snapshot();
        if self.store.remove(id).is_none() {
            return false;
        }
        self.commit(before);
        true
    }

    pub fn select_all(&mut self) {
        self.selection.set(self.store.ids());
        self.redraw();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.redraw();
    }

    // --- clipboard ---

    /// Copy the selection. An empty selection leaves the clipboard alone.
    pub fn copy(&mut self) -> usize {
        let selected: Vec<&ChordBlock> = self
            .store
            .blocks()
            .iter()
            .filter(|b| self.selection.contains(b.id))
            .collect();
        if selected.is_empty() {
            return 0;
        }
        let copied = self.clipboard.copy(selected);
        log::debug!(target: "editor", "copied {} blocks", copied);
        copied
    }

    /// Paste so the clipboard's minimum position and track land on
    /// (`position`, `track`). The pasted blocks become the selection.
    pub fn paste(&mut self, position: f64, track: u32) -> Vec<BlockId> {
        if self.clipboard.is_empty() {
            return Vec::new();
        }
        let before = self.store.snapshot();
        let ids: Vec<BlockId> = self
            .clipboard
            .paste_at(position, track)
            .into_iter()
            .map(|b| self.store.add(b))
            .collect();
        self.selection.set(ids.iter().copied());
        self.commit(before);
        ids
    }

    /// Paste at content coordinates: whole-beat position, track 0 above
    /// the lanes.
    pub fn paste_at(&mut self, x: f64, y: f64) -> Vec<BlockId> {
        let position = self.geometry.x_to_beat(x).floor().max(0.0);
        let track = self.geometry.track_at(y);
        self.paste(position, track)
    }

    pub fn paste_at_pointer(&mut self) -> Vec<BlockId> {
        let (x, y) = self.interaction.last_pointer().unwrap_or((0.0, 0.0));
        self.paste_at(x, y)
    }

    // --- history ---

    pub fn undo(&mut self) -> bool {
        let live = self.store.snapshot();
        let Some(previous) = self.history.undo(&live) else {
            return false;
        };
        self.restore(previous);
        true
    }

    pub fn redo(&mut self) -> bool {
        let live = self.store.snapshot();
        let Some(next) = self.history.redo(&live) else {
            return false;
        };
        self.restore(next);
        true
    }

    /// Remove every block as a single undoable step.
    pub fn new_song(&mut self) {
        let before = self.store.snapshot();
        self.store.clear();
        self.selection.clear();
        self.interaction.cancel();
        if !self.commit(before) {
            self.redraw();
        }
    }

    // --- musical settings ---

    pub fn set_bpm(&mut self, bpm: u16) {
        self.bpm = bpm.max(1);
    }

    pub fn set_key(&mut self, key: PitchClass) {
        self.key = key;
        self.key_name = key.name().to_string();
    }

    pub fn set_octave(&mut self, octave: i32) {
        self.octave = octave.clamp(0, MAX_OCTAVE);
    }

    pub fn set_repeat(&mut self, repeat: bool) {
        self.scheduler.set_repeat(repeat);
    }

    pub fn toggle_repeat(&mut self) -> bool {
        let repeat = !self.scheduler.repeat();
        self.scheduler.set_repeat(repeat);
        repeat
    }

    // --- transport ---

    /// Start playback at the editor clock. No-op when already playing or
    /// when there is nothing to play.
    pub fn play(&mut self) -> bool {
        self.play_at(self.clock)
    }

    pub fn play_at(&mut self, now: Duration) -> bool {
        self.clock = now;
        let song = Song {
            blocks: self.store.blocks(),
            bpm: f64::from(self.bpm),
        };
        self.scheduler.play(now, &song)
    }

    /// Stop playback. Returns the number of pending triggers cancelled.
    pub fn stop(&mut self) -> usize {
        self.scheduler.stop()
    }

    /// Advance the playback clock, firing every trigger that is due.
    pub fn tick(&mut self, now: Duration) -> Vec<PlaybackEvent> {
        self.clock = self.clock.max(now);
        let song = Song {
            blocks: self.store.blocks(),
            bpm: f64::from(self.bpm),
        };
        self.scheduler.advance(self.clock, &song, self.audio)
    }

    // --- pointer ---

    pub fn pointer_down(&mut self, x: f64, y: f64, modifier: bool) -> PressOutcome {
        let outcome = self.interaction.pointer_down(
            &self.store,
            &mut self.selection,
            &self.geometry,
            x,
            y,
            modifier,
        );
        self.redraw();
        outcome
    }

    /// Returns true if the gesture moved or resized its block.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        let changed = self
            .interaction
            .pointer_move(&mut self.store, &self.geometry, x, y);
        if !self.interaction.is_active() {
            return false;
        }
        self.viewport.autoscroll(x, &self.geometry);
        self.viewport
            .grow_if_needed(self.store.max_end(), &self.geometry);
        // Every move during a gesture redraws, even when snapping left the
        // block where it was.
        self.redraw();
        changed
    }

    /// Finish the gesture. Returns true if it produced an undo step.
    pub fn pointer_up(&mut self) -> bool {
        let Some(before) = self.interaction.pointer_up() else {
            return false;
        };
        let recorded = self.commit(before);
        if !recorded {
            self.redraw();
        }
        recorded
    }

    /// The pointer left the surface; the gesture ends as if released.
    pub fn pointer_leave(&mut self) -> bool {
        self.pointer_up()
    }

    pub fn hover_cursor(&self, x: f64, y: f64) -> CursorHint {
        self.interaction.cursor(&self.store, &self.geometry, x, y)
    }

    /// What a context click at (`x`, `y`) offers. A block under the pointer
    /// that is not yet selected becomes the only selection.
    pub fn context_menu(&mut self, x: f64, y: f64) -> ContextMenu {
        let target = self.geometry.block_at(self.store.blocks(), x, y);
        if let Some(id) = target {
            if !self.selection.contains(id) {
                self.selection.select_only(id);
                self.redraw();
            }
        }
        ContextMenu {
            target,
            can_delete: target.is_some(),
            can_copy: !self.selection.is_empty(),
            can_paste: !self.clipboard.is_empty(),
        }
    }

    // --- viewport ---

    pub fn scroll_by(&mut self, dx: f64) -> bool {
        if !self.viewport.scroll_by(dx, &self.geometry) {
            return false;
        }
        self.viewport
            .grow_if_needed(self.store.max_end(), &self.geometry);
        self.redraw();
        true
    }

    pub fn set_container_size(&mut self, width: f64, height: f64) {
        self.viewport.container_width = width.max(0.0);
        self.viewport.container_height = height.max(0.0);
        self.viewport.clamp_scroll(&self.geometry);
        self.viewport
            .grow_if_needed(self.store.max_end(), &self.geometry);
        self.redraw();
    }

    pub fn adjust_track_height(&mut self, delta: f64) {
        self.geometry.track_height = clamp_zoom(self.geometry.track_height + delta);
        self.redraw();
    }

    pub fn adjust_beat_width(&mut self, delta: f64) {
        self.geometry.beat_width = clamp_zoom(self.geometry.beat_width + delta);
        self.viewport.clamp_scroll(&self.geometry);
        self.viewport
            .grow_if_needed(self.store.max_end(), &self.geometry);
        self.redraw();
    }

    /// Rendered height for the lanes in use.
    pub fn rendered_height(&self) -> f64 {
        self.viewport
            .rendered_height(&self.geometry, self.store.max_track())
    }

    // --- persistence ---

    /// Replace the song with `project`. Selection and history are reset and
    /// playback stops.
    pub fn load_project(&mut self, project: ProjectFile) {
        self.scheduler.stop();
        self.interaction.cancel();
        self.store.load_blocks(project.blocks);
        self.selection.clear();
        self.history.clear();
        self.bpm = project.bpm.max(1);
        self.key = PitchClass::parse(&project.key).unwrap_or_else(|| {
            log::warn!(target: "project", "unknown key {:?}, using C", project.key);
            PitchClass::C
        });
        self.key_name = project.key;
        self.revision += 1;
        self.dirty = false;
        self.viewport
            .grow_if_needed(self.store.max_end(), &self.geometry);
        log::info!(
            target: "project",
            "loaded {} blocks at {} bpm in {}",
            self.store.len(),
            self.bpm,
            self.key_name
        );
        self.redraw();
    }

    pub fn to_project(&self) -> ProjectFile {
        ProjectFile {
            version: PROJECT_VERSION.to_string(),
            bpm: self.bpm,
            key: self.key_name.clone(),
            blocks: self.store.snapshot(),
        }
    }

    /// Load a project file. On error the current song is left untouched.
    pub fn load_from_path(&mut self, path: &Path) -> Result<(), ProjectError> {
        let project = persistence::load_project(path)?;
        self.load_project(project);
        Ok(())
    }

    pub fn save_to_path(&mut self, path: &Path) -> Result<(), ProjectError> {
        persistence::save_project(path, &self.to_project())?;
        self.dirty = false;
        Ok(())
    }

    // --- internals ---

    /// Record `before` as an undo step if the block list changed since it
    /// was taken. Returns true when a step was recorded.
    fn commit(&mut self, before: Vec<ChordBlock>) -> bool {
        if before.as_slice() == self.store.blocks() {
            return false;
        }
        self.history.push(before);
        self.revision += 1;
        self.dirty = true;
        self.selection.retain_existing(&self.store);
        self.viewport
            .grow_if_needed(self.store.max_end(), &self.geometry);
        self.redraw();
        true
    }

    fn restore(&mut self, blocks: Vec<ChordBlock>) {
        self.interaction.cancel();
        self.store.replace_all(blocks);
        self.selection.clear();
        self.revision += 1;
        self.dirty = true;
        self.viewport
            .grow_if_needed(self.store.max_end(), &self.geometry);
        self.redraw();
    }

    fn redraw(&self) {
        self.renderer.redraw();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chordline_audio::LogTrigger;

    fn no_redraw() {}

    static REDRAW: fn() = no_redraw;
    static AUDIO: LogTrigger = LogTrigger;

    fn editor() -> Editor<'static> {
        Editor::new(EditorSettings::default(), &REDRAW, &AUDIO)
    }

    #[test]
    fn unchanged_edit_records_nothing() {
        let mut ed = editor();
        assert_eq!(ed.delete_selected(), 0);
        assert!(!ed.delete_block(BlockId::new(7)));
        ed.new_song();
        assert!(!ed.can_undo());
    }

    #[test]
    fn place_token_uses_visible_window() {
        let mut ed = editor();
        ed.set_container_size(1000.0, 400.0);
        ed.scroll_by(400.0);
        let id = ed.place_token("Am");
        let b = ed.block(id).unwrap();
        // (400 + 200) / 80 = 7.5 -> 8
        assert_eq!(b.position, 8.0);
        assert_eq!(b.track, 0);
        assert_eq!(b.duration, 1.0);
    }

    #[test]
    fn drop_on_header_is_ignored() {
        let mut ed = editor();
        assert!(ed.drop_token("C4n", 100.0, 10.0).is_none());
        assert!(ed.blocks().is_empty());
    }

    #[test]
    fn shortcut_uses_last_pointer_and_octave() {
        let mut ed = editor();
        ed.set_octave(5);
        ed.pointer_move(320.0, 100.0);
        let id = ed.add_note_shortcut('e').unwrap();
        let b = ed.block(id).unwrap();
        assert_eq!(b.token, "E5n");
        assert_eq!(b.position, 4.0);
        assert_eq!(b.track, 1);
        assert!(ed.selection().contains(id));
        assert!(ed.add_note_shortcut('h').is_none());
    }

    #[test]
    fn shortcut_without_pointer_lands_near_view_start() {
        let mut ed = editor();
        ed.set_container_size(800.0, 300.0);
        let id = ed.add_note_shortcut('c').unwrap();
        let b = ed.block(id).unwrap();
        assert_eq!(b.position, 1.0);
        assert_eq!(b.track, 0);
    }

    #[test]
    fn settings_are_clamped() {
        let mut ed = editor();
        ed.set_bpm(0);
        assert_eq!(ed.bpm(), 1);
        ed.set_octave(12);
        assert_eq!(ed.octave(), MAX_OCTAVE);
        assert!(ed.toggle_repeat());
        assert!(ed.repeat());
    }

    #[test]
    fn project_round_trip_keeps_key_name() {
        let mut ed = editor();
        ed.set_key(PitchClass::As);
        ed.add_block(ChordBlock::new("G7", 2.0, 2.0, 1));
        let p = ed.to_project();
        assert_eq!(p.key, "A#");
        assert_eq!(p.blocks.len(), 1);

        let mut other = editor();
        other.load_project(p);
        assert_eq!(other.key(), PitchClass::As);
        assert_eq!(other.key_name(), "A#");
        assert_eq!(other.blocks()[0].token, "G7");
        assert!(!other.can_undo());
        assert!(!other.is_dirty());
    }

    #[test]
    fn context_menu_selects_clicked_block() {
        let mut ed = editor();
        let a = ed.add_block(ChordBlock::new("C", 0.0, 2.0, 0));
        let b = ed.add_block(ChordBlock::new("F", 4.0, 2.0, 0));
        ed.select_all();

        let menu = ed.context_menu(40.0, 50.0);
        assert_eq!(menu.target, Some(a));
        assert_eq!(ed.selection().len(), 2);
        assert!(menu.can_delete && menu.can_copy && !menu.can_paste);

        ed.clear_selection();
        let menu = ed.context_menu(340.0, 50.0);
        assert_eq!(menu.target, Some(b));
        assert!(ed.selection().contains(b) && !ed.selection().contains(a));

        let menu = ed.context_menu(900.0, 50.0);
        assert_eq!(menu.target, None);
        assert!(!menu.can_delete);
    }
}
