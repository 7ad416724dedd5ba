//! PlaybackHandle: owner-side interface to the playback thread.
//!
//! Owns the command and feedback channels. The scheduler and the audio
//! trigger live on the playback thread.

use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};

use chordline_types::ChordBlock;
use crossbeam_channel::Sender as CrossbeamSender;

use crate::commands::{PlaybackCmd, PlaybackFeedback};
use crate::playback_thread::PlaybackThread;
use crate::trigger::AudioTrigger;

pub struct PlaybackHandle {
    cmd_tx: CrossbeamSender<PlaybackCmd>,
    feedback_rx: Receiver<PlaybackFeedback>,
    is_playing: bool,
    join_handle: Option<JoinHandle<()>>,
}

impl PlaybackHandle {
    pub fn new(trigger: Box<dyn AudioTrigger + Send>) -> Self {
        let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded();
        let (feedback_tx, feedback_rx) = mpsc::channel();

        let join_handle = thread::spawn(move || {
            let thread = PlaybackThread::new(cmd_rx, feedback_tx, trigger);
            thread.run();
        });

        Self {
            cmd_tx,
            feedback_rx,
            is_playing: false,
            join_handle: Some(join_handle),
        }
    }

    pub fn send_cmd(&self, cmd: PlaybackCmd) -> Result<(), String> {
        self.cmd_tx
            .send(cmd)
            .map_err(|_| "Playback thread disconnected".to_string())
    }

    /// Fire-and-forget: send a command and log if the thread is gone.
    fn send(&self, cmd: PlaybackCmd) {
        if let Err(e) = self.send_cmd(cmd) {
            log::warn!(target: "playback", "command dropped: {}", e);
        }
    }

    pub fn update_song(&self, blocks: Vec<ChordBlock>, bpm: f64) {
        self.send(PlaybackCmd::UpdateSong { blocks, bpm });
    }

    pub fn play(&self) {
        self.send(PlaybackCmd::Play);
    }

    pub fn stop(&self) {
        self.send(PlaybackCmd::Stop);
    }

    pub fn set_repeat(&self, repeat: bool) {
        self.send(PlaybackCmd::SetRepeat(repeat));
    }

    /// Playing state as of the last drained feedback.
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn drain_feedback(&mut self) -> Vec<PlaybackFeedback> {
        let mut out = Vec::new();
        while let Ok(msg) = self.feedback_rx.try_recv() {
            self.apply_feedback(&msg);
            out.push(msg);
        }
        out
    }

    /// Block until the next feedback message arrives or the thread exits.
    pub fn recv_feedback(&mut self) -> Option<PlaybackFeedback> {
        let msg = self.feedback_rx.recv().ok()?;
        self.apply_feedback(&msg);
        Some(msg)
    }

    fn apply_feedback(&mut self, feedback: &PlaybackFeedback) {
        match feedback {
            PlaybackFeedback::Started => self.is_playing = true,
            PlaybackFeedback::Stopped { .. } => self.is_playing = false,
            PlaybackFeedback::Triggered { .. } | PlaybackFeedback::CycleComplete { .. } => {}
        }
    }
}

impl Drop for PlaybackHandle {
    fn drop(&mut self) {
        let _ = self.send_cmd(PlaybackCmd::Shutdown);
        if let Some(handle) = self.join_handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedRecorder(Arc<Mutex<Vec<String>>>);

    impl AudioTrigger for SharedRecorder {
        fn trigger(&self, token: &str, _duration_secs: f64) {
            if let Ok(mut calls) = self.0.lock() {
                calls.push(token.to_string());
            }
        }
    }

    fn blocks() -> Vec<ChordBlock> {
        vec![
            ChordBlock::new("C", 0.0, 1.0, 0),
            ChordBlock::new("G", 1.0, 1.0, 0),
        ]
    }

    #[test]
    fn plays_a_cycle_and_reports_feedback() {
        let rec = SharedRecorder::default();
        let mut handle = PlaybackHandle::new(Box::new(rec.clone()));
        // 6000 bpm: 10ms per beat, cycle ends at 20ms + 500ms buffer
        handle.update_song(blocks(), 6000.0);
        handle.play();

        let mut feedback = Vec::new();
        while let Some(msg) = handle.recv_feedback() {
            let done = matches!(msg, PlaybackFeedback::Stopped { .. });
            feedback.push(msg);
            if done {
                break;
            }
        }

        assert_eq!(feedback.first(), Some(&PlaybackFeedback::Started));
        assert!(feedback.contains(&PlaybackFeedback::CycleComplete { cycle: 1 }));
        assert!(!handle.is_playing());
        assert_eq!(rec.0.lock().unwrap().as_slice(), ["C", "G"]);
    }

    #[test]
    fn stop_before_triggers_prevents_them() {
        let rec = SharedRecorder::default();
        let mut handle = PlaybackHandle::new(Box::new(rec.clone()));
        // 6 bpm: second block is due 10s after play
        handle.update_song(blocks(), 6.0);
        handle.play();
        handle.stop();

        let mut stopped = None;
        while let Some(msg) = handle.recv_feedback() {
            if let PlaybackFeedback::Stopped { cancelled } = msg {
                stopped = Some(cancelled);
                break;
            }
        }
        assert!(stopped.is_some_and(|n| n >= 2));
        assert!(!rec.0.lock().unwrap().contains(&"G".to_string()));
    }
}
