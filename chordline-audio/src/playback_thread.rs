use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};

use chordline_types::ChordBlock;
use crossbeam_channel::Receiver;

use crate::commands::{PlaybackCmd, PlaybackFeedback};
use crate::scheduler::{PlaybackEvent, PlaybackScheduler};
use crate::trigger::AudioTrigger;
use crate::SongSource;

/// Longest the thread blocks on its command channel while idle.
const IDLE_WAIT: Duration = Duration::from_millis(50);

struct SongData {
    blocks: Vec<ChordBlock>,
    bpm: f64,
}

impl SongSource for SongData {
    fn blocks(&self) -> &[ChordBlock] {
        &self.blocks
    }
    fn bpm(&self) -> f64 {
        self.bpm
    }
}

pub(crate) struct PlaybackThread {
    cmd_rx: Receiver<PlaybackCmd>,
    feedback_tx: Sender<PlaybackFeedback>,
    trigger: Box<dyn AudioTrigger + Send>,
    scheduler: PlaybackScheduler,
    song: SongData,
    origin: Instant,
}

impl PlaybackThread {
    pub(crate) fn new(
        cmd_rx: Receiver<PlaybackCmd>,
        feedback_tx: Sender<PlaybackFeedback>,
        trigger: Box<dyn AudioTrigger + Send>,
    ) -> Self {
        Self {
            cmd_rx,
            feedback_tx,
            trigger,
            scheduler: PlaybackScheduler::new(),
            song: SongData {
                blocks: Vec::new(),
                bpm: 100.0,
            },
            origin: Instant::now(),
        }
    }

    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    pub(crate) fn run(mut self) {
        loop {
            let wait = match self.scheduler.next_deadline() {
                Some(deadline) => deadline.saturating_sub(self.now()).min(IDLE_WAIT),
                None => IDLE_WAIT,
            };

            crossbeam_channel::select! {
                recv(self.cmd_rx) -> result => {
                    match result {
                        Ok(cmd) => {
                            if self.handle_cmd(cmd) {
                                break;
                            }
                        }
                        Err(_) => break,
                    }
                }
                default(wait) => {}
            }

            self.tick();
        }
        self.scheduler.stop();
        log::debug!(target: "playback", "playback thread exiting");
    }

    fn tick(&mut self) {
        let now = self.now();
        let events = self.scheduler.advance(now, &self.song, self.trigger.as_ref());
        for event in events {
            let feedback = match event {
                PlaybackEvent::Triggered {
                    token,
                    duration_secs,
                    ..
                } => PlaybackFeedback::Triggered {
                    token,
                    duration_secs,
                },
                PlaybackEvent::CycleComplete { cycle } => PlaybackFeedback::CycleComplete { cycle },
                PlaybackEvent::Stopped => PlaybackFeedback::Stopped { cancelled: 0 },
            };
            self.send_feedback(feedback);
        }
    }

    /// Returns true when the thread should exit.
    fn handle_cmd(&mut self, cmd: PlaybackCmd) -> bool {
        match cmd {
            PlaybackCmd::Play => {
                let now = self.now();
                if self.scheduler.play(now, &self.song) {
                    self.send_feedback(PlaybackFeedback::Started);
                }
            }
            PlaybackCmd::Stop => {
                if self.scheduler.is_playing() {
                    let cancelled = self.scheduler.stop();
                    self.send_feedback(PlaybackFeedback::Stopped { cancelled });
                }
            }
            PlaybackCmd::SetRepeat(repeat) => self.scheduler.set_repeat(repeat),
            PlaybackCmd::UpdateSong { blocks, bpm } => {
                self.song = SongData { blocks, bpm };
            }
            PlaybackCmd::Shutdown => return true,
        }
        false
    }

    fn send_feedback(&self, feedback: PlaybackFeedback) {
        if self.feedback_tx.send(feedback).is_err() {
            log::debug!(target: "playback", "feedback receiver dropped");
        }
    }
}
