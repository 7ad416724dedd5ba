//! Pure cycle planning: blocks plus tempo in, timed triggers out.

use std::time::Duration;

use chordline_types::{BlockId, ChordBlock};

/// Silence appended after the last block before a cycle ends or loops.
pub const TRAILING_BUFFER: Duration = Duration::from_millis(500);

/// One trigger in a cycle, relative to the cycle start.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledTrigger {
    pub block: BlockId,
    pub token: String,
    pub offset: Duration,
    pub duration: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CyclePlan {
    /// Sorted by offset; blocks sharing a position keep store order.
    pub triggers: Vec<ScheduledTrigger>,
    /// Time from cycle start until the cycle ends, trailing buffer included.
    pub cycle_length: Duration,
}

pub fn seconds_per_beat(bpm: f64) -> f64 {
    60.0 / bpm
}

fn beats_to_duration(beats: f64, bpm: f64) -> Option<Duration> {
    let secs = beats * seconds_per_beat(bpm);
    if secs.is_finite() && secs > 0.0 {
        Duration::try_from_secs_f64(secs).ok()
    } else if secs.is_finite() {
        Some(Duration::ZERO)
    } else {
        None
    }
}

/// Plan one playback cycle. Returns `None` for an empty song or a tempo that
/// is not a positive number.
///
/// The cycle length is measured from the end of the block that starts last,
/// not the block that ends last. Blocks whose timing does not fit in a
/// `Duration` are left out of the plan.
pub fn plan_cycle(blocks: &[ChordBlock], bpm: f64) -> Option<CyclePlan> {
    if blocks.is_empty() || !bpm.is_finite() || bpm <= 0.0 {
        return None;
    }

    let mut sorted: Vec<&ChordBlock> = blocks.iter().collect();
    sorted.sort_by(|a, b| a.position.total_cmp(&b.position));

    let mut triggers = Vec::with_capacity(sorted.len());
    let mut cycle_end = None;
    for b in sorted {
        let timing = beats_to_duration(b.position, bpm).and_then(|offset| {
            let duration = beats_to_duration(b.duration, bpm)?;
            let end = beats_to_duration(b.end(), bpm)?.checked_add(TRAILING_BUFFER)?;
            Some((offset, duration, end))
        });
        let Some((offset, duration, end)) = timing else {
            log::warn!(
                target: "playback",
                "block {} at beat {} is out of range, not scheduled",
                b.id,
                b.position
            );
            continue;
        };
        triggers.push(ScheduledTrigger {
            block: b.id,
            token: b.token.clone(),
            offset,
            duration,
        });
        cycle_end = Some(end);
    }

    Some(CyclePlan {
        triggers,
        cycle_length: cycle_end?,
    })
}
