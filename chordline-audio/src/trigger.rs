use chordline_types::token;

/// Sound-producing capability consumed by the scheduler.
///
/// Fire-and-forget: the scheduler never waits on a trigger and never learns
/// whether the token produced any sound.
pub trait AudioTrigger {
    fn trigger(&self, token: &str, duration_secs: f64);
}

impl<T: AudioTrigger + ?Sized> AudioTrigger for &T {
    fn trigger(&self, token: &str, duration_secs: f64) {
        (**self).trigger(token, duration_secs)
    }
}

impl<T: AudioTrigger + ?Sized> AudioTrigger for Box<T> {
    fn trigger(&self, token: &str, duration_secs: f64) {
        (**self).trigger(token, duration_secs)
    }
}

/// Trigger that resolves the token and logs the pitches it would sound.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTrigger;

impl AudioTrigger for LogTrigger {
    fn trigger(&self, token: &str, duration_secs: f64) {
        let notes = token::resolve_to_playable_notes(token);
        if notes.is_empty() {
            log::debug!(target: "playback", "unknown token {:?}, nothing to play", token);
            return;
        }
        let names: Vec<String> = notes.iter().map(|n| n.to_string()).collect();
        log::info!(
            target: "playback",
            "{} [{}] for {:.3}s",
            token,
            names.join(" "),
            duration_secs
        );
    }
}
