#![allow(dead_code)]
//! Test harness utilities for chordline-core integration tests.

use std::cell::{Cell, RefCell};

use chordline_audio::AudioTrigger;
use chordline_core::{Editor, EditorSettings, Redraw};
use chordline_types::{BlockId, ChordBlock};

/// Audio trigger that records every call.
#[derive(Default)]
pub struct RecordingTrigger {
    calls: RefCell<Vec<(String, f64)>>,
}

impl RecordingTrigger {
    pub fn calls(&self) -> Vec<(String, f64)> {
        self.calls.borrow().clone()
    }

    pub fn tokens(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|(t, _)| t.clone()).collect()
    }

    pub fn count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl AudioTrigger for RecordingTrigger {
    fn trigger(&self, token: &str, duration_secs: f64) {
        self.calls.borrow_mut().push((token.to_string(), duration_secs));
    }
}

/// Renderer that counts redraw requests.
#[derive(Default)]
pub struct CountingRedraw {
    count: Cell<usize>,
}

impl CountingRedraw {
    pub fn count(&self) -> usize {
        self.count.get()
    }
}

impl Redraw for CountingRedraw {
    fn redraw(&self) {
        self.count.set(self.count.get() + 1);
    }
}

pub fn editor<'a>(redraw: &'a CountingRedraw, audio: &'a RecordingTrigger) -> Editor<'a> {
    let mut ed = Editor::new(EditorSettings::default(), redraw, audio);
    ed.set_container_size(800.0, 300.0);
    ed
}

pub fn block(token: &str, position: f64, duration: f64, track: u32) -> ChordBlock {
    ChordBlock::new(token, position, duration, track)
}

/// Content coordinates of the middle of a block's body.
pub fn body_point(ed: &Editor<'_>, id: BlockId) -> (f64, f64) {
    let b = ed.block(id).expect("block exists");
    let r = ed.geometry().block_rect(b);
    (r.x + r.width / 2.0, r.y + r.height / 2.0)
}

/// Content coordinates of a block's left and right edges at mid-height.
pub fn edge_points(ed: &Editor<'_>, id: BlockId) -> ((f64, f64), (f64, f64)) {
    let b = ed.block(id).expect("block exists");
    let r = ed.geometry().block_rect(b);
    let mid = r.y + r.height / 2.0;
    ((r.x, mid), (r.right(), mid))
}

/// Blocks as comparable (token, position, duration, track) tuples.
pub fn layout(ed: &Editor<'_>) -> Vec<(String, f64, f64, u32)> {
    ed.blocks()
        .iter()
        .map(|b| (b.token.clone(), b.position, b.duration, b.track))
        .collect()
}
