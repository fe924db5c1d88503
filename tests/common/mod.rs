//! A recording stand-in for the board, shared by the integration tests.

#![allow(dead_code)]

use std::io;

use nebula_conqueror::entities::{WeaponKind, WorldState};
use nebula_conqueror::grid::CELLS;
use nebula_conqueror::hal::{
    ddram_position, key_at, Delay, Display, Keypad, Note, PadKey, ScanLine, SenseLine, Speaker,
};

pub struct MockBoard {
    /// What the LCD currently shows, by grid index.
    pub screen: [u8; CELLS],
    /// Every glyph written, as (grid index, glyph).
    pub writes: Vec<(usize, u8)>,
    pub held: Vec<PadKey>,
    pub notes: Vec<Note>,
    pub tones: Vec<u32>,
    pub delays: Vec<u32>,
    ddram: u8,
    strobe: ScanLine,
}

impl MockBoard {
    pub fn new() -> Self {
        MockBoard {
            screen: [0x20; CELLS],
            writes: Vec::new(),
            held: Vec::new(),
            notes: Vec::new(),
            tones: Vec::new(),
            delays: Vec::new(),
            ddram: 0,
            strobe: ScanLine::First,
        }
    }

    pub fn hold(&mut self, keys: &[PadKey]) {
        self.held = keys.to_vec();
    }

    pub fn release(&mut self) {
        self.held.clear();
    }

    /// `len` glyphs from the screen starting at `start`.
    pub fn text(&self, start: usize, len: usize) -> Vec<u8> {
        self.screen[start..start + len].to_vec()
    }
}

impl Display for MockBoard {
    fn move_cursor(&mut self, address: u8) -> io::Result<()> {
        self.ddram = address & 0x7F;
        Ok(())
    }

    fn write_glyph(&mut self, code: u8) -> io::Result<()> {
        if let Some((row, col)) = ddram_position(self.ddram) {
            let index = row * 20 + col;
            self.screen[index] = code;
            self.writes.push((index, code));
        }
        self.ddram = match self.ddram {
            0x27 => 0x40,
            0x67 => 0x00,
            other => other + 1,
        };
        Ok(())
    }
}

impl Keypad for MockBoard {
    fn set_strobe(&mut self, high: ScanLine, _low: ScanLine) {
        self.strobe = high;
    }

    fn read_bit(&mut self, line: SenseLine) -> bool {
        self.held.contains(&key_at(self.strobe, line))
    }
}

impl Speaker for MockBoard {
    fn arm_tone(&mut self, pitch: u32) {
        self.tones.push(pitch);
    }

    fn play_note(&mut self, note: Note) {
        self.notes.push(note);
    }
}

impl Delay for MockBoard {
    fn delay_ms(&mut self, ms: u32) {
        self.delays.push(ms);
    }
}

/// No two live slots in one weapon table share a cell, and the grid's
/// weapon fields show exactly the live blasts.
pub fn assert_weapons_consistent(s: &WorldState) {
    let player: Vec<usize> = s.player_weapons.iter().map(|(_, w)| w.cell).collect();
    let enemy: Vec<usize> = s.enemy_weapons.iter().map(|(_, w)| w.cell).collect();
    for (name, cells) in [("player", &player), ("enemy", &enemy)] {
        let mut unique = cells.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), cells.len(), "{name} blasts share a cell: {cells:?}");
    }

    for index in 0..CELLS {
        let expected = match (player.contains(&index), enemy.contains(&index)) {
            (false, false) => None,
            (true, false) => Some(WeaponKind::PlayerBlast),
            (false, true) => Some(WeaponKind::EnemyBlast),
            (true, true) => panic!("player and enemy blasts both at {index}"),
        };
        assert_eq!(s.grid.weapon(index), expected, "weapon field at {index}");
    }
}
