/// Game entity types: pure data, no logic beyond small accessors.

use crate::grid::Grid;
use crate::slots::SlotTable;

// ── Cell fields ───────────────────────────────────────────────────────────────

/// The three background star shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StarKind {
    One,
    Two,
    Three,
}

/// Twinkle phase of a star; the animator flips it back and forth.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    A,
    B,
}

impl Phase {
    pub fn toggled(self) -> Phase {
        match self {
            Phase::A => Phase::B,
            Phase::B => Phase::A,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Star {
    pub kind: StarKind,
    pub phase: Phase,
}

impl Star {
    pub const fn new(kind: StarKind, phase: Phase) -> Self {
        Star { kind, phase }
    }

    pub fn twinkled(self) -> Star {
        Star {
            phase: self.phase.toggled(),
            ..self
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WeaponKind {
    /// Fired by the player, travels right.
    PlayerBlast,
    /// Reserved glyph; no subsystem emits it yet.
    SpecialBlast,
    /// Fired by enemies, travels left.
    EnemyBlast,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    One,
    Two,
    Three,
    Four,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 4] = [EnemyKind::One, EnemyKind::Two, EnemyKind::Three, EnemyKind::Four];
}

/// What occupies the ship field of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShipKind {
    /// Second cell of a two-cell ship; the kind lives one cell to the left.
    Trailing,
    Player,
    Enemy(EnemyKind),
    /// Left behind by a collision while its animation plays.
    Collision,
}

/// One of the 80 display cells. Each field is independent: writing one
/// never disturbs the other two.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Cell {
    pub star: Option<Star>,
    pub weapon: Option<WeaponKind>,
    pub ship: Option<ShipKind>,
}

impl Cell {
    pub const EMPTY: Cell = Cell {
        star: None,
        weapon: None,
        ship: None,
    };

    pub fn with_star(star: Star) -> Self {
        Cell {
            star: Some(star),
            ..Cell::EMPTY
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Cell::EMPTY
    }
}

// ── Ships ─────────────────────────────────────────────────────────────────────

/// The player's two cells; `tail` is always `head + 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Player {
    pub head: usize,
    pub tail: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Enemy {
    /// Cell carrying the kind; the trailing marker sits at `head + 1`.
    pub head: usize,
    pub kind: EnemyKind,
    /// Fires when this reaches 3, then wraps to 0.
    pub fire_countdown: u8,
}

impl Enemy {
    pub fn tail(&self) -> usize {
        self.head + 1
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

/// A live projectile. Which table holds it decides its kind and direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Weapon {
    pub cell: usize,
}

// ── Collision effects ─────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollisionAnim {
    pub cell: usize,
    /// 0, 1 or 2; torn down on the step after 2.
    pub frame: u8,
    /// Part of the player's death sequence; tearing it down ends the game.
    pub fatal: bool,
}

// ── Top-level state ───────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    TitleScreen,
    Playing,
}

// ── Master game state ─────────────────────────────────────────────────────────

pub const MAX_ENEMIES: usize = 4;
pub const MAX_PLAYER_WEAPONS: usize = 20;
pub const MAX_ENEMY_WEAPONS: usize = 10;
pub const MAX_COLLISIONS: usize = 10;

/// Where the player starts every game.
pub const PLAYER_START: Player = Player { head: 20, tail: 21 };

/// Everything the engine mutates between ticks. Single owner, single writer.
#[derive(Clone, Debug)]
pub struct WorldState {
    pub grid: Grid,
    pub player: Player,
    /// Set by a fatal hit; input is locked until the next reset.
    pub player_down: bool,
    pub enemies: SlotTable<Enemy, MAX_ENEMIES>,
    pub player_weapons: SlotTable<Weapon, MAX_PLAYER_WEAPONS>,
    pub enemy_weapons: SlotTable<Weapon, MAX_ENEMY_WEAPONS>,
    pub collisions: SlotTable<CollisionAnim, MAX_COLLISIONS>,
    pub status: GameStatus,
    /// A fresh game must be set up before the next tick runs.
    pub reset_pending: bool,
}

impl Default for WorldState {
    fn default() -> Self {
        WorldState::new()
    }
}

impl WorldState {
    /// Start-of-game state, sitting on the title screen.
    pub fn new() -> Self {
        let mut grid = Grid::with_background();
        grid.set_ship(PLAYER_START.head, Some(ShipKind::Player));
        grid.set_ship(PLAYER_START.tail, Some(ShipKind::Trailing));
        WorldState {
            grid,
            player: PLAYER_START,
            player_down: false,
            enemies: SlotTable::new(),
            player_weapons: SlotTable::new(),
            enemy_weapons: SlotTable::new(),
            collisions: SlotTable::new(),
            status: GameStatus::TitleScreen,
            reset_pending: false,
        }
    }
}
