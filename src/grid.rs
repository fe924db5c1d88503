//! The 4×20 world grid and the packed-byte cell codec.
//!
//! Cells are stored as typed fields (`Cell`), so a write to one field can
//! never corrupt another. `Cell::pack` / `Cell::unpack` translate to the
//! one-byte layout the board stores:
//!
//! ```text
//!   bit  7 6 5   4 3      2 1 0
//!        ship    weapon   star
//! ```

use std::ops::BitOr;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::entities::{Cell, EnemyKind, Phase, ShipKind, Star, StarKind, WeaponKind};

pub const ROWS: usize = 4;
pub const COLS: usize = 20;
pub const CELLS: usize = ROWS * COLS;

// ── Topology ──────────────────────────────────────────────────────────────────

pub fn row_of(index: usize) -> usize {
    index / COLS
}

pub fn col_of(index: usize) -> usize {
    index % COLS
}

pub fn row_start(row: usize) -> usize {
    row * COLS
}

/// Leftmost column: left-moving things stop here.
pub fn is_left_edge(index: usize) -> bool {
    col_of(index) == 0
}

/// Rightmost column: right-moving things stop here.
pub fn is_right_edge(index: usize) -> bool {
    col_of(index) == COLS - 1
}

pub fn same_row(a: usize, b: usize) -> bool {
    row_of(a) == row_of(b)
}

// ── Packed codec ──────────────────────────────────────────────────────────────

pub const STAR_MASK: u8 = 0x07;
pub const WEAPON_MASK: u8 = 0x18;
pub const SHIP_MASK: u8 = 0xE0;

impl Cell {
    /// Encode into the packed one-byte layout.
    pub fn pack(&self) -> u8 {
        let star = match self.star {
            None => 0x00,
            Some(Star { kind, phase }) => {
                let base = match kind {
                    StarKind::One => 0x02,
                    StarKind::Two => 0x04,
                    StarKind::Three => 0x06,
                };
                match phase {
                    Phase::A => base,
                    Phase::B => base + 1,
                }
            }
        };
        let weapon = match self.weapon {
            None => 0x00,
            Some(WeaponKind::PlayerBlast) => 0x08,
            Some(WeaponKind::SpecialBlast) => 0x10,
            Some(WeaponKind::EnemyBlast) => 0x18,
        };
        let ship = match self.ship {
            None => 0x00,
            Some(ShipKind::Trailing) => 0x20,
            Some(ShipKind::Player) => 0x40,
            Some(ShipKind::Enemy(EnemyKind::One)) => 0x60,
            Some(ShipKind::Enemy(EnemyKind::Two)) => 0x80,
            Some(ShipKind::Enemy(EnemyKind::Three)) => 0xA0,
            Some(ShipKind::Enemy(EnemyKind::Four)) => 0xC0,
            Some(ShipKind::Collision) => 0xE0,
        };
        star | weapon | ship
    }

    /// Decode a packed byte. Star value `1` has no meaning and is rejected.
    pub fn unpack(byte: u8) -> Option<Cell> {
        let star = match byte & STAR_MASK {
            0x00 => None,
            0x01 => return None,
            bits => {
                let kind = match bits >> 1 {
                    1 => StarKind::One,
                    2 => StarKind::Two,
                    _ => StarKind::Three,
                };
                let phase = if bits & 1 == 0 { Phase::A } else { Phase::B };
                Some(Star::new(kind, phase))
            }
        };
        let weapon = match byte & WEAPON_MASK {
            0x00 => None,
            0x08 => Some(WeaponKind::PlayerBlast),
            0x10 => Some(WeaponKind::SpecialBlast),
            _ => Some(WeaponKind::EnemyBlast),
        };
        let ship = match byte & SHIP_MASK {
            0x00 => None,
            0x20 => Some(ShipKind::Trailing),
            0x40 => Some(ShipKind::Player),
            0x60 => Some(ShipKind::Enemy(EnemyKind::One)),
            0x80 => Some(ShipKind::Enemy(EnemyKind::Two)),
            0xA0 => Some(ShipKind::Enemy(EnemyKind::Three)),
            0xC0 => Some(ShipKind::Enemy(EnemyKind::Four)),
            _ => Some(ShipKind::Collision),
        };
        Some(Cell { star, weapon, ship })
    }
}

// ── Field selection ───────────────────────────────────────────────────────────

/// A set of cell fields, used as the keep-mask for `Grid::retain`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fields(u8);

impl Fields {
    pub const STAR: Fields = Fields(1);
    pub const WEAPON: Fields = Fields(2);
    pub const SHIP: Fields = Fields(4);

    pub fn contains(self, other: Fields) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Fields {
    type Output = Fields;

    fn bitor(self, rhs: Fields) -> Fields {
        Fields(self.0 | rhs.0)
    }
}

// ── Dirty flag ────────────────────────────────────────────────────────────────

/// Set by every grid mutation, consumed by the render gate.
#[derive(Debug, Default)]
pub struct DirtyFlag(AtomicBool);

impl DirtyFlag {
    pub fn mark(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Clear the flag, returning whether it was set.
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }
}

impl Clone for DirtyFlag {
    fn clone(&self) -> Self {
        DirtyFlag(AtomicBool::new(self.is_set()))
    }
}

// ── Grid ──────────────────────────────────────────────────────────────────────

/// Initial star layout: (cell, star).
pub const INITIAL_STARS: [(usize, Star); 14] = {
    use Phase::{A, B};
    use StarKind::{One, Three, Two};
    [
        (0, Star::new(One, A)),
        (6, Star::new(Two, B)),
        (14, Star::new(Three, A)),
        (24, Star::new(Two, B)),
        (30, Star::new(One, A)),
        (38, Star::new(Two, B)),
        (41, Star::new(Two, A)),
        (47, Star::new(Three, B)),
        (52, Star::new(One, A)),
        (57, Star::new(Two, B)),
        (64, Star::new(Two, A)),
        (68, Star::new(Three, B)),
        (74, Star::new(Two, A)),
        (78, Star::new(Three, B)),
    ]
};

#[derive(Clone, Debug)]
pub struct Grid {
    cells: [Cell; CELLS],
    dirty: DirtyFlag,
    /// Cells that must be redrawn even if their value is unchanged.
    forced: u128,
}

impl Default for Grid {
    fn default() -> Self {
        Grid::new()
    }
}

impl Grid {
    /// An empty grid, flagged dirty so the first render draws it.
    pub fn new() -> Self {
        let grid = Grid {
            cells: [Cell::EMPTY; CELLS],
            dirty: DirtyFlag::default(),
            forced: 0,
        };
        grid.dirty.mark();
        grid
    }

    /// The starting background: only the initial stars.
    pub fn with_background() -> Self {
        let mut grid = Grid::new();
        for (index, star) in INITIAL_STARS {
            grid.set_star(index, Some(star));
        }
        grid
    }

    pub fn cell(&self, index: usize) -> Cell {
        self.cells[index]
    }

    pub fn cells(&self) -> &[Cell; CELLS] {
        &self.cells
    }

    pub fn star(&self, index: usize) -> Option<Star> {
        self.cells[index].star
    }

    pub fn weapon(&self, index: usize) -> Option<WeaponKind> {
        self.cells[index].weapon
    }

    pub fn ship(&self, index: usize) -> Option<ShipKind> {
        self.cells[index].ship
    }

    pub fn set_star(&mut self, index: usize, star: Option<Star>) {
        self.update(index, |cell| cell.star = star);
    }

    pub fn set_weapon(&mut self, index: usize, weapon: Option<WeaponKind>) {
        self.update(index, |cell| cell.weapon = weapon);
    }

    pub fn set_ship(&mut self, index: usize, ship: Option<ShipKind>) {
        self.update(index, |cell| cell.ship = ship);
    }

    /// Clear every field not named in `keep`.
    pub fn retain(&mut self, index: usize, keep: Fields) {
        self.update(index, |cell| {
            if !keep.contains(Fields::STAR) {
                cell.star = None;
            }
            if !keep.contains(Fields::WEAPON) {
                cell.weapon = None;
            }
            if !keep.contains(Fields::SHIP) {
                cell.ship = None;
            }
        });
    }

    fn update(&mut self, index: usize, f: impl FnOnce(&mut Cell)) {
        let cell = &mut self.cells[index];
        let before = *cell;
        f(cell);
        if *cell != before {
            self.dirty.mark();
        }
    }

    // ── Render bookkeeping ────────────────────────────────────────────────────

    pub fn dirty(&self) -> &DirtyFlag {
        &self.dirty
    }

    /// Redraw `index` on the next render even if its value did not change.
    pub fn force_redraw(&mut self, index: usize) {
        self.forced |= 1u128 << index;
        self.dirty.mark();
    }

    /// Consume the forced-redraw set.
    pub fn take_forced(&mut self) -> u128 {
        std::mem::take(&mut self.forced)
    }

    /// The whole grid in packed one-byte form.
    pub fn packed(&self) -> [u8; CELLS] {
        let mut out = [0u8; CELLS];
        for (byte, cell) in out.iter_mut().zip(self.cells.iter()) {
            *byte = cell.pack();
        }
        out
    }
}
