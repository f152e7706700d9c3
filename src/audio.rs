//! Audio cue playback. A terminal has no mixer, so cues are logged and the
//! two that matter most ring the bell.

use skyflap::game::AudioCue;
use std::io::{self, Write};

pub struct TerminalAudio {
    bell: bool,
}

impl TerminalAudio {
    pub fn new(bell: bool) -> Self {
        Self { bell }
    }

    pub fn play(&mut self, cue: AudioCue) {
        tracing::debug!(cue = cue.name(), "audio cue");
        if self.bell && rings_bell(cue) {
            let mut out = io::stdout();
            if let Err(err) = out.write_all(b"\x07").and_then(|_| out.flush()) {
                tracing::debug!(%err, "bell failed");
            }
        }
    }
}

fn rings_bell(cue: AudioCue) -> bool {
    matches!(cue, AudioCue::Point | AudioCue::Die)
}
