//! Differential renderer: compares the grid with the last drawn snapshot
//! and sends only the changed cells to the display.
//!
//! Cells where a ship and a weapon meet are not drawn here. They come back
//! to the caller as `Contact`s and are turned into collisions by
//! `compute::create_collision`.

use std::io;

use arrayvec::ArrayVec;

use crate::entities::{Cell, EnemyKind, Phase, ShipKind, Star, StarKind, WeaponKind, WorldState};
use crate::grid::{same_row, Grid, CELLS};
use crate::hal::{address_code, Display};

// ── Glyph tables ──────────────────────────────────────────────────────────────

pub const BLANK: u8 = 0x20;
pub const IMPACT: u8 = 0xFF;
pub const COLLISION_FRAMES: [u8; 3] = [0xA5, 0xDB, 0x2A];

/// Title text; spaces use glyph 0x10.
pub const TITLE_LINES: [(usize, [u8; 16]); 2] = [
    (22, *b"NEBULA\x10CONQUEROR"),
    (42, *b"Press\x10#\x10to\x10Start"),
];

/// Head and trailing glyphs for a ship kind. Markers have none.
pub fn ship_glyphs(ship: ShipKind) -> Option<[u8; 2]> {
    match ship {
        ShipKind::Player => Some([0x00, 0x01]),
        ShipKind::Enemy(EnemyKind::One) => Some([0x3C, 0xB4]),
        ShipKind::Enemy(EnemyKind::Two) => Some([0xCC, 0xF6]),
        ShipKind::Enemy(EnemyKind::Three) => Some([0x28, 0xD3]),
        ShipKind::Enemy(EnemyKind::Four) => Some([0xE0, 0xE5]),
        ShipKind::Trailing | ShipKind::Collision => None,
    }
}

pub fn weapon_glyph(weapon: WeaponKind) -> u8 {
    match weapon {
        WeaponKind::PlayerBlast => 0x3D,
        WeaponKind::SpecialBlast => 0x10,
        WeaponKind::EnemyBlast => 0xAA,
    }
}

pub fn star_glyph(star: Star) -> u8 {
    match (star.kind, star.phase) {
        (StarKind::One, Phase::A) => 0xA1,
        (StarKind::One, Phase::B) => 0x2C,
        (StarKind::Two, Phase::A) => 0xDF,
        (StarKind::Two, Phase::B) => 0xDE,
        (StarKind::Three, Phase::A) => 0x2C,
        (StarKind::Three, Phase::B) => 0x2E,
    }
}

// ── Contacts ──────────────────────────────────────────────────────────────────

/// A ship cell that a hostile weapon has reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Contact {
    /// An enemy blast reached one of the player's cells.
    PlayerHit { cell: usize },
    /// A player blast reached the enemy whose head is at `head`.
    EnemyHit { cell: usize, head: usize },
}

pub type Contacts = ArrayVec<Contact, CELLS>;

/// Decide whether ship + weapon at `index` is a collision. A trailing
/// marker is resolved through the head one cell to its left.
pub fn classify_contact(grid: &Grid, index: usize, ship: ShipKind, weapon: WeaponKind) -> Option<Contact> {
    let (head, kind) = match ship {
        ShipKind::Trailing if index > 0 && same_row(index - 1, index) => {
            (index - 1, grid.ship(index - 1)?)
        }
        ShipKind::Trailing => return None,
        other => (index, other),
    };
    match (kind, weapon) {
        (ShipKind::Player, WeaponKind::EnemyBlast) => Some(Contact::PlayerHit { cell: index }),
        (ShipKind::Enemy(_), WeaponKind::PlayerBlast) => Some(Contact::EnemyHit { cell: index, head }),
        _ => None,
    }
}

// ── Renderer ──────────────────────────────────────────────────────────────────

/// What one render pass did.
#[derive(Debug, Default)]
pub struct RenderReport {
    pub cells_redrawn: usize,
    pub glyphs_written: usize,
    pub contacts: Contacts,
}

#[derive(Clone, Debug)]
pub struct Renderer {
    /// Last value drawn per cell; `None` means the device state is unknown.
    last: [Option<Cell>; CELLS],
}

impl Default for Renderer {
    fn default() -> Self {
        Renderer::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Renderer { last: [None; CELLS] }
    }

    /// Forget the snapshot so the next render redraws every cell.
    pub fn invalidate(&mut self) {
        self.last = [None; CELLS];
    }

    pub fn render<D: Display>(
        &mut self,
        world: &mut WorldState,
        display: &mut D,
    ) -> io::Result<RenderReport> {
        let forced = world.grid.take_forced();
        let mut report = RenderReport::default();

        for index in 0..CELLS {
            let cell = world.grid.cell(index);
            let is_forced = forced & (1u128 << index) != 0;
            if !is_forced && self.last[index] == Some(cell) {
                continue;
            }
            self.last[index] = Some(cell);
            report.cells_redrawn += 1;

            let glyphs: ArrayVec<u8, 2> = match (cell.ship, cell.weapon) {
                (Some(ShipKind::Collision), _) => {
                    let frame = world
                        .collisions
                        .iter()
                        .find(|(_, anim)| anim.cell == index)
                        .map(|(_, anim)| anim.frame);
                    match frame {
                        Some(frame) => one(COLLISION_FRAMES[usize::from(frame.min(2))]),
                        None => one(background_glyph(cell)),
                    }
                }
                (Some(ship), Some(weapon)) => {
                    match classify_contact(&world.grid, index, ship, weapon) {
                        Some(contact) => {
                            report.contacts.push(contact);
                            ArrayVec::new()
                        }
                        None => ship_glyphs(ship).map(ArrayVec::from).unwrap_or_default(),
                    }
                }
                (Some(ship), None) => ship_glyphs(ship).map(ArrayVec::from).unwrap_or_default(),
                (None, Some(weapon)) => one(weapon_glyph(weapon)),
                (None, None) => one(background_glyph(cell)),
            };

            if glyphs.is_empty() {
                continue;
            }
            display.move_cursor(address_code(index))?;
            for glyph in glyphs {
                display.write_glyph(glyph)?;
                report.glyphs_written += 1;
            }
        }

        tracing::trace!(
            cells = report.cells_redrawn,
            glyphs = report.glyphs_written,
            contacts = report.contacts.len(),
            "render pass"
        );
        Ok(report)
    }
}

fn one(glyph: u8) -> ArrayVec<u8, 2> {
    let mut v = ArrayVec::new();
    v.push(glyph);
    v
}

fn background_glyph(cell: Cell) -> u8 {
    cell.star.map(star_glyph).unwrap_or(BLANK)
}

/// Blank the whole display, then write the two title lines.
pub fn draw_title<D: Display>(display: &mut D) -> io::Result<()> {
    for index in 0..CELLS {
        display.move_cursor(address_code(index))?;
        display.write_glyph(BLANK)?;
    }
    for (start, line) in TITLE_LINES {
        display.move_cursor(address_code(start))?;
        for glyph in line {
            display.write_glyph(glyph)?;
        }
    }
    Ok(())
}
