//! Console rendering of schedules, palettes and live triggers.

use chordline_audio::{AudioTrigger, CyclePlan};
use chordline_types::token::{color_of, palette, resolve_to_playable_notes};
use chordline_types::ChordBlock;

fn note_names(token: &str) -> String {
    let notes = resolve_to_playable_notes(token);
    if notes.is_empty() {
        return "(silent)".to_string();
    }
    notes
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// One line per trigger, then the cycle length.
pub fn format_schedule(plan: &CyclePlan, blocks: &[ChordBlock]) -> Vec<String> {
    let mut lines: Vec<String> = plan
        .triggers
        .iter()
        .map(|t| {
            let track = blocks
                .iter()
                .find(|b| b.id == t.block)
                .map_or(0, |b| b.track);
            format!(
                "{:>9.3}s  track {:<2} {:<14} {:>7.3}s  {}",
                t.offset.as_secs_f64(),
                track,
                t.token,
                t.duration.as_secs_f64(),
                note_names(&t.token)
            )
        })
        .collect();
    lines.push(format!("cycle length {:.3}s", plan.cycle_length.as_secs_f64()));
    lines
}

pub fn format_palette(octave: i32) -> Vec<String> {
    palette(octave)
        .iter()
        .map(|token| format!("{:<8} {}  {}", token, color_of(token), note_names(token)))
        .collect()
}

/// Trigger that prints each chord as it sounds.
pub struct PrintTrigger;

impl AudioTrigger for PrintTrigger {
    fn trigger(&self, token: &str, duration_secs: f64) {
        println!("> {:<14} {:>7.3}s  {}", token, duration_secs, note_names(token));
    }
}
