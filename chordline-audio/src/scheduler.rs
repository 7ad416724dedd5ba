//! Cooperative playback scheduler.
//!
//! The scheduler never sleeps and never reads a wall clock. The owner feeds
//! it the current time through [`PlaybackScheduler::advance`], which fires
//! every trigger that has come due. `stop` cancels the pending timer handles,
//! so nothing scheduled before a stop can fire after it.

use std::time::Duration;

use crate::schedule::plan_cycle;
use crate::timer::{TaskHandle, TimerQueue};
use crate::trigger::AudioTrigger;
use crate::SongSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
}

/// What happened during a call to `advance`.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    Triggered {
        token: String,
        duration_secs: f64,
        at: Duration,
    },
    CycleComplete {
        cycle: u64,
    },
    Stopped,
}

#[derive(Debug, Clone)]
enum Pending {
    Trigger { token: String, duration_secs: f64 },
    CycleEnd,
}

pub struct PlaybackScheduler {
    state: PlaybackState,
    repeat: bool,
    timers: TimerQueue<Pending>,
    handles: Vec<TaskHandle>,
    cycle: u64,
}

impl PlaybackScheduler {
    pub fn new() -> Self {
        Self {
            state: PlaybackState::Stopped,
            repeat: false,
            timers: TimerQueue::new(),
            handles: Vec::new(),
            cycle: 0,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn repeat(&self) -> bool {
        self.repeat
    }

    pub fn set_repeat(&mut self, repeat: bool) {
        self.repeat = repeat;
    }

    /// Number of cycles started since the last `play`.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Triggers and cycle-end markers still waiting to fire.
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// Earliest time `advance` has work to do.
    pub fn next_deadline(&mut self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    /// Start playback at `now`. Returns false (no-op) when already playing or
    /// when the song has nothing to play.
    pub fn play(&mut self, now: Duration, song: &dyn SongSource) -> bool {
        if self.is_playing() {
            return false;
        }
        self.cycle = 0;
        if !self.schedule_cycle(now, song) {
            return false;
        }
        self.state = PlaybackState::Playing;
        log::info!(
            target: "playback",
            "play: {} blocks at {} bpm",
            song.blocks().len(),
            song.bpm()
        );
        true
    }

    /// Stop playback, cancelling every pending trigger. Returns how many
    /// scheduled tasks were cancelled.
    pub fn stop(&mut self) -> usize {
        let was_playing = self.is_playing();
        self.state = PlaybackState::Stopped;
        let mut cancelled = 0;
        for handle in self.handles.drain(..) {
            if self.timers.cancel(handle) {
                cancelled += 1;
            }
        }
        cancelled += self.timers.cancel_all();
        if was_playing {
            log::info!(target: "playback", "stop: cancelled {} pending", cancelled);
        }
        cancelled
    }

    /// Fire everything due at or before `now`, in due-time order.
    ///
    /// At a cycle end the scheduler loops (re-planning from `song`) when
    /// repeat is on, otherwise it stops.
    pub fn advance(
        &mut self,
        now: Duration,
        song: &dyn SongSource,
        trigger: &dyn AudioTrigger,
    ) -> Vec<PlaybackEvent> {
        let mut events = Vec::new();
        while self.is_playing() {
            let Some((due, task)) = self.timers.pop_due(now) else {
                break;
            };
            match task {
                Pending::Trigger {
                    token,
                    duration_secs,
                } => {
                    trigger.trigger(&token, duration_secs);
                    events.push(PlaybackEvent::Triggered {
                        token,
                        duration_secs,
                        at: due,
                    });
                }
                Pending::CycleEnd => {
                    events.push(PlaybackEvent::CycleComplete { cycle: self.cycle });
                    self.handles.clear();
                    if self.repeat && self.schedule_cycle(due, song) {
                        log::debug!(target: "playback", "looping, cycle {}", self.cycle);
                    } else {
                        self.state = PlaybackState::Stopped;
                        self.timers.cancel_all();
                        events.push(PlaybackEvent::Stopped);
                        log::info!(target: "playback", "playback finished");
                    }
                }
            }
        }
        events
    }

    fn schedule_cycle(&mut self, start: Duration, song: &dyn SongSource) -> bool {
        let Some(plan) = plan_cycle(song.blocks(), song.bpm()) else {
            return false;
        };
        // Every trigger offset is below the cycle length.
        let Some(cycle_end) = start.checked_add(plan.cycle_length) else {
            log::warn!(target: "playback", "cycle starting at {:?} overflows the clock", start);
            return false;
        };
        for t in plan.triggers {
            let handle = self.timers.schedule(
                start + t.offset,
                Pending::Trigger {
                    token: t.token,
                    duration_secs: t.duration.as_secs_f64(),
                },
            );
            self.handles.push(handle);
        }
        let end = self.timers.schedule(cycle_end, Pending::CycleEnd);
        self.handles.push(end);
        self.cycle += 1;
        true
    }
}

impl Default for PlaybackScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Song;
    use chordline_types::ChordBlock;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<(String, f64)>>,
    }

    impl AudioTrigger for Recorder {
        fn trigger(&self, token: &str, duration_secs: f64) {
            self.calls.borrow_mut().push((token.to_string(), duration_secs));
        }
    }

    fn secs(s: f64) -> Duration {
        Duration::from_secs_f64(s)
    }

    fn song_blocks() -> Vec<ChordBlock> {
        vec![
            ChordBlock::new("C", 0.0, 4.0, 0),
            ChordBlock::new("G", 4.0, 4.0, 0),
        ]
    }

    #[test]
    fn play_is_noop_when_empty_or_already_playing() {
        let mut s = PlaybackScheduler::new();
        assert!(!s.play(Duration::ZERO, &Song { blocks: &[], bpm: 120.0 }));
        assert!(!s.is_playing());

        let blocks = song_blocks();
        let song = Song { blocks: &blocks, bpm: 120.0 };
        assert!(s.play(Duration::ZERO, &song));
        let pending = s.pending();
        assert!(!s.play(Duration::ZERO, &song));
        assert_eq!(s.pending(), pending);
    }

    #[test]
    fn fires_in_order_and_stops_after_cycle() {
        let blocks = song_blocks();
        let song = Song { blocks: &blocks, bpm: 120.0 };
        let rec = Recorder::default();
        let mut s = PlaybackScheduler::new();
        s.play(Duration::ZERO, &song);

        let ev = s.advance(secs(1.0), &song, &rec);
        assert_eq!(ev.len(), 1);
        assert_eq!(rec.calls.borrow().as_slice(), &[("C".to_string(), 2.0)]);

        s.advance(secs(4.4), &song, &rec);
        assert_eq!(rec.calls.borrow().len(), 2);
        assert!(s.is_playing());

        let ev = s.advance(secs(4.5), &song, &rec);
        assert_eq!(
            ev,
            vec![PlaybackEvent::CycleComplete { cycle: 1 }, PlaybackEvent::Stopped]
        );
        assert!(!s.is_playing());
        assert_eq!(s.pending(), 0);
    }

    #[test]
    fn play_near_clock_limit_does_not_schedule() {
        let blocks = song_blocks();
        let song = Song { blocks: &blocks, bpm: 120.0 };
        let mut s = PlaybackScheduler::new();
        assert!(!s.play(Duration::MAX - secs(1.0), &song));
        assert!(!s.is_playing());
        assert_eq!(s.pending(), 0);
    }

    #[test]
    fn stop_cancels_pending_triggers() {
        let blocks = song_blocks();
        let song = Song { blocks: &blocks, bpm: 120.0 };
        let rec = Recorder::default();
        let mut s = PlaybackScheduler::new();
        s.play(Duration::ZERO, &song);
        s.advance(secs(0.5), &song, &rec);

        // G trigger and the cycle end are still pending
        assert_eq!(s.stop(), 2);
        let ev = s.advance(secs(10.0), &song, &rec);
        assert!(ev.is_empty());
        assert_eq!(rec.calls.borrow().len(), 1);
    }

    #[test]
    fn repeat_loops_from_nominal_cycle_end() {
        let blocks = song_blocks();
        let song = Song { blocks: &blocks, bpm: 120.0 };
        let rec = Recorder::default();
        let mut s = PlaybackScheduler::new();
        s.set_repeat(true);
        s.play(Duration::ZERO, &song);

        // second cycle starts at 4.5s, so C fires again at 4.5s and G at 6.5s
        let ev = s.advance(secs(6.5), &song, &rec);
        let fired: Vec<(String, Duration)> = ev
            .iter()
            .filter_map(|e| match e {
                PlaybackEvent::Triggered { token, at, .. } => Some((token.clone(), *at)),
                _ => None,
            })
            .collect();
        assert_eq!(
            fired,
            vec![
                ("C".to_string(), secs(0.0)),
                ("G".to_string(), secs(2.0)),
                ("C".to_string(), secs(4.5)),
                ("G".to_string(), secs(6.5)),
            ]
        );
        assert!(s.is_playing());
        assert_eq!(s.cycle(), 2);
    }

    #[test]
    fn repeat_picks_up_tempo_change_at_next_cycle() {
        let blocks = song_blocks();
        let rec = Recorder::default();
        let mut s = PlaybackScheduler::new();
        s.set_repeat(true);
        s.play(Duration::ZERO, &Song { blocks: &blocks, bpm: 120.0 });

        let faster = Song { blocks: &blocks, bpm: 240.0 };
        s.advance(secs(4.5), &faster, &rec);
        s.advance(secs(5.5), &faster, &rec);
        let calls = rec.calls.borrow();
        // C, G at 120 bpm; then C, G of the second cycle at 240 bpm
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[2], ("C".to_string(), 1.0));
        assert_eq!(calls[3], ("G".to_string(), 1.0));
    }
}
