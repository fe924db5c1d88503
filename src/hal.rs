//! Collaborator interfaces: the character display, the matrix keypad, the
//! speaker and a blocking delay. The engine only talks to hardware through
//! these traits; `main.rs` provides a terminal implementation.

use std::io;

use crate::grid::{col_of, row_of};

// ── Display ───────────────────────────────────────────────────────────────────

pub trait Display {
    /// Position the cursor at a device address (see `address_code`).
    fn move_cursor(&mut self, address: u8) -> io::Result<()>;
    /// Write one glyph at the cursor and advance it by one cell.
    fn write_glyph(&mut self, code: u8) -> io::Result<()>;
}

/// DDRAM start of each display row; rows 1 and 3 are interleaved in memory.
const ROW_OFFSETS: [u8; 4] = [0x00, 0x40, 0x14, 0x54];

/// Set-DDRAM-address command for a grid index.
pub fn address_code(index: usize) -> u8 {
    0x80 | (ROW_OFFSETS[row_of(index)] + col_of(index) as u8)
}

/// Inverse of the DDRAM layout: (row, col) for a raw DDRAM address.
pub fn ddram_position(ddram: u8) -> Option<(usize, usize)> {
    ROW_OFFSETS.iter().enumerate().find_map(|(row, &start)| {
        (ddram >= start && ddram < start + 20).then(|| (row, (ddram - start) as usize))
    })
}

// ── Keypad ────────────────────────────────────────────────────────────────────

/// Keypad output (strobe) lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScanLine {
    First,
    Second,
}

/// Keypad input lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SenseLine {
    First,
    Second,
    Third,
}

impl SenseLine {
    pub const ALL: [SenseLine; 3] = [SenseLine::First, SenseLine::Second, SenseLine::Third];
}

/// The six wired keys of the pad.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PadKey {
    Hash,
    Nine,
    Six,
    Zero,
    Eight,
    Five,
}

/// Which key closes (strobe, sense).
pub fn key_at(strobe: ScanLine, sense: SenseLine) -> PadKey {
    match (strobe, sense) {
        (ScanLine::First, SenseLine::First) => PadKey::Hash,
        (ScanLine::First, SenseLine::Second) => PadKey::Nine,
        (ScanLine::First, SenseLine::Third) => PadKey::Six,
        (ScanLine::Second, SenseLine::First) => PadKey::Zero,
        (ScanLine::Second, SenseLine::Second) => PadKey::Eight,
        (ScanLine::Second, SenseLine::Third) => PadKey::Five,
    }
}

pub trait Keypad {
    fn set_strobe(&mut self, high: ScanLine, low: ScanLine);
    fn read_bit(&mut self, line: SenseLine) -> bool;
}

// ── Speaker ───────────────────────────────────────────────────────────────────

/// A blocking square-wave note, in busy-wait loop ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Note {
    pub half_period: u32,
    pub cycles: u32,
}

impl Note {
    /// The board's busy-wait loop runs about 37 ticks per 100 µs.
    pub const TICKS_PER_100US: u32 = 37;

    pub fn duration(&self) -> std::time::Duration {
        let ticks = u64::from(self.half_period) * 2 * u64::from(self.cycles);
        std::time::Duration::from_micros(ticks * 100 / u64::from(Self::TICKS_PER_100US))
    }
}

pub trait Speaker {
    /// Start the laser tone at `pitch`; the periodic callback plays it out.
    fn arm_tone(&mut self, pitch: u32);
    /// Play a note, blocking until it ends.
    fn play_note(&mut self, note: Note);
}

// ── Delay ─────────────────────────────────────────────────────────────────────

pub trait Delay {
    fn delay_ms(&mut self, ms: u32);
}

/// Everything the engine needs from a board.
pub trait Io: Display + Keypad + Speaker + Delay {}

impl<T: Display + Keypad + Speaker + Delay> Io for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_codes_per_row() {
        assert_eq!(address_code(0), 0x80);
        assert_eq!(address_code(19), 0x93);
        assert_eq!(address_code(20), 0xC0);
        assert_eq!(address_code(40), 0x94);
        assert_eq!(address_code(60), 0xD4);
        assert_eq!(address_code(79), 0xE7);
    }

    #[test]
    fn ddram_position_inverts_address_code() {
        for index in 0..80 {
            let (row, col) = ddram_position(address_code(index) & 0x7F).unwrap();
            assert_eq!(row * 20 + col, index);
        }
        assert_eq!(ddram_position(0x28), None);
    }

    #[test]
    fn note_duration() {
        let note = Note { half_period: 370, cycles: 50000 / 370 };
        let ms = note.duration().as_millis();
        assert!((260..=275).contains(&ms), "{ms}");
    }
}
