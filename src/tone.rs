//! Laser tone: a single-slot mailbox from the game loop to the periodic
//! timer callback, and the callback's own pulse state machine.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::hal::Note;

/// Rest pitch the generator returns to after each sound.
pub const BASE_PITCH: u32 = 1000;
/// Half-period steps in one laser sound.
pub const PULSE_STEPS: u16 = 151;

/// Intro jingle, as busy-wait half-periods.
pub const INTRO_SONG: [u32; 8] = [370, 280, 370, 230, 230, 370, 205, 230];

pub fn intro_notes() -> impl Iterator<Item = Note> {
    INTRO_SONG.iter().map(|&half_period| Note {
        half_period,
        cycles: 50_000 / half_period,
    })
}

/// Holds at most one pending tone request. Zero means empty.
#[derive(Debug, Default)]
pub struct ToneChannel {
    pending: AtomicU32,
}

impl ToneChannel {
    pub fn new() -> Self {
        ToneChannel::default()
    }

    /// Post a request, replacing any the callback has not picked up yet.
    pub fn request(&self, pitch: u32) {
        self.pending.store(pitch.max(1), Ordering::Release);
    }

    pub fn take(&self) -> Option<u32> {
        match self.pending.swap(0, Ordering::AcqRel) {
            0 => None,
            pitch => Some(pitch),
        }
    }
}

/// Pin level the callback should drive after a timer match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pin {
    High,
    Low,
    Idle,
}

/// State owned by the periodic callback. Two match events alternate:
/// the rising one drives the pin high, the falling one low while bending
/// the pitch down by 1% per cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToneGenerator {
    progress: Option<u16>,
    pitch: u32,
}

impl Default for ToneGenerator {
    fn default() -> Self {
        ToneGenerator {
            progress: None,
            pitch: BASE_PITCH,
        }
    }
}

impl ToneGenerator {
    pub fn arm(&mut self, pitch: u32) {
        self.progress = Some(0);
        self.pitch = pitch;
    }

    pub fn is_active(&self) -> bool {
        self.progress.is_some()
    }

    /// Current half-period, the distance to the next match.
    pub fn pitch(&self) -> u32 {
        self.pitch
    }

    pub fn on_rising(&mut self) -> Pin {
        match self.progress {
            Some(step) if step < PULSE_STEPS - 1 => {
                self.progress = Some(step + 1);
                Pin::High
            }
            _ => Pin::Idle,
        }
    }

    pub fn on_falling(&mut self) -> Pin {
        match self.progress {
            Some(step) if step < PULSE_STEPS => {
                self.pitch += self.pitch / 100;
                self.progress = Some(step + 1);
                Pin::Low
            }
            Some(_) => {
                self.progress = None;
                self.pitch = BASE_PITCH;
                Pin::Idle
            }
            None => Pin::Idle,
        }
    }

    /// Pick up a pending request, then run one rising and one falling match.
    pub fn service(&mut self, channel: &ToneChannel) -> (Pin, Pin) {
        if let Some(pitch) = channel.take() {
            self.arm(pitch);
        }
        (self.on_rising(), self.on_falling())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_holds_latest_request() {
        let ch = ToneChannel::new();
        assert_eq!(ch.take(), None);
        ch.request(900);
        ch.request(1000);
        assert_eq!(ch.take(), Some(1000));
        assert_eq!(ch.take(), None);
    }

    #[test]
    fn generator_plays_out_and_resets() {
        let ch = ToneChannel::new();
        let mut gen = ToneGenerator::default();
        ch.request(BASE_PITCH);

        let (rise, fall) = gen.service(&ch);
        assert_eq!((rise, fall), (Pin::High, Pin::Low));
        assert_eq!(gen.pitch(), 1010);

        let mut services = 1;
        while gen.is_active() {
            gen.service(&ch);
            services += 1;
            assert!(services < 200);
        }
        assert_eq!(gen.pitch(), BASE_PITCH);
        assert_eq!(gen.service(&ch), (Pin::Idle, Pin::Idle));
    }

    #[test]
    fn intro_has_eight_notes() {
        let notes: Vec<Note> = intro_notes().collect();
        assert_eq!(notes.len(), 8);
        assert_eq!(notes[0].cycles, 135);
    }
}
