//! Pointer gesture state machine: drag to move, edge drag to resize,
//! modifier-click to toggle selection.
//!
//! Gestures mutate the block store live on every move. The store contents at
//! press time travel with the gesture so the editor can record a single undo
//! step when the gesture ends.

use chordline_types::{BlockId, ChordBlock, MIN_BLOCK_DURATION};

use crate::geometry::{snap_quarter, Geometry, HitZone};
use crate::state::{BlockStore, Selection};

#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    Idle,
    Dragging {
        id: BlockId,
        start_x: f64,
        start_y: f64,
        original_position: f64,
        original_track: u32,
        before: Vec<ChordBlock>,
    },
    Resizing {
        id: BlockId,
        from_left: bool,
        start_x: f64,
        original_position: f64,
        original_duration: f64,
        before: Vec<ChordBlock>,
    },
}

/// Result of a pointer press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    Dragging(BlockId),
    Resizing { id: BlockId, from_left: bool },
    /// Modifier-click flipped the block's selection.
    Toggled { id: BlockId, selected: bool },
    SelectionCleared,
    /// Modifier-click on empty space.
    Ignored,
}

/// Cursor hint for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorHint {
    Crosshair,
    Move,
    Resize,
}

#[derive(Debug, Clone)]
pub struct Interaction {
    gesture: Gesture,
    last_pointer: Option<(f64, f64)>,
}

impl Default for Interaction {
    fn default() -> Self {
        Self {
            gesture: Gesture::Idle,
            last_pointer: None,
        }
    }
}

impl Interaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.gesture, Gesture::Idle)
    }

    /// Last pointer position seen by press or move, in content coordinates.
    pub fn last_pointer(&self) -> Option<(f64, f64)> {
        self.last_pointer
    }

    pub fn pointer_down(
        &mut self,
        store: &BlockStore,
        selection: &mut Selection,
        geo: &Geometry,
        x: f64,
        y: f64,
        modifier: bool,
    ) -> PressOutcome {
        self.last_pointer = Some((x, y));
        let Some(hit) = geo.hit_test(store.blocks(), x, y) else {
            if modifier {
                return PressOutcome::Ignored;
            }
            selection.clear();
            return PressOutcome::SelectionCleared;
        };
        let Some(block) = store.get(hit.id) else {
            return PressOutcome::Ignored;
        };

        match hit.zone {
            HitZone::LeftEdge | HitZone::RightEdge => {
                let from_left = hit.zone == HitZone::LeftEdge;
                self.gesture = Gesture::Resizing {
                    id: hit.id,
                    from_left,
                    start_x: x,
                    original_position: block.position,
                    original_duration: block.duration,
                    before: store.snapshot(),
                };
                PressOutcome::Resizing {
                    id: hit.id,
                    from_left,
                }
            }
            HitZone::Body if modifier => {
                let selected = selection.toggle(hit.id);
                PressOutcome::Toggled {
                    id: hit.id,
                    selected,
                }
            }
            HitZone::Body => {
                selection.select_only(hit.id);
                self.gesture = Gesture::Dragging {
                    id: hit.id,
                    start_x: x,
                    start_y: y,
                    original_position: block.position,
                    original_track: block.track,
                    before: store.snapshot(),
                };
                PressOutcome::Dragging(hit.id)
            }
        }
    }

    /// Apply pointer movement to the gesture's block. Returns true if the
    /// block changed.
    pub fn pointer_move(&mut self, store: &mut BlockStore, geo: &Geometry, x: f64, y: f64) -> bool {
        self.last_pointer = Some((x, y));
        match &self.gesture {
            Gesture::Idle => false,
            Gesture::Dragging {
                id,
                start_x,
                start_y,
                original_position,
                original_track,
                ..
            } => {
                let Some(block) = store.get_mut(*id) else {
                    return false;
                };
                let delta_beat = snap_quarter((x - start_x) / geo.beat_width);
                let delta_track = ((y - start_y) / geo.track_height).round() as i64;
                let position = (original_position + delta_beat).max(0.0);
                let track = (i64::from(*original_track) + delta_track).clamp(0, i64::from(u32::MAX)) as u32;
                let changed = block.position != position || block.track != track;
                block.position = position;
                block.track = track;
                changed
            }
            Gesture::Resizing {
                id,
                from_left,
                start_x,
                original_position,
                original_duration,
                ..
            } => {
                let Some(block) = store.get_mut(*id) else {
                    return false;
                };
                let delta_beat = snap_quarter((x - start_x) / geo.beat_width);
                let (position, duration) = if *from_left {
                    let position = (original_position + delta_beat).max(0.0);
                    let moved = position - original_position;
                    (position, (original_duration - moved).max(MIN_BLOCK_DURATION))
                } else {
                    (
                        *original_position,
                        (original_duration + delta_beat).max(MIN_BLOCK_DURATION),
                    )
                };
                let changed = block.position != position || block.duration != duration;
                block.position = position;
                block.duration = duration;
                changed
            }
        }
    }

    /// End the gesture, returning the store contents captured at press time.
    pub fn pointer_up(&mut self) -> Option<Vec<ChordBlock>> {
        match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::Idle => None,
            Gesture::Dragging { before, .. } | Gesture::Resizing { before, .. } => Some(before),
        }
    }

    /// Abandon the gesture without handing back its snapshot.
    pub fn cancel(&mut self) {
        self.gesture = Gesture::Idle;
    }

    pub fn cursor(&self, store: &BlockStore, geo: &Geometry, x: f64, y: f64) -> CursorHint {
        match self.gesture {
            Gesture::Dragging { .. } => CursorHint::Move,
            Gesture::Resizing { .. } => CursorHint::Resize,
            Gesture::Idle if geo.over_resize_handle(store.blocks(), x, y) => CursorHint::Resize,
            Gesture::Idle => CursorHint::Crosshair,
        }
    }
}
