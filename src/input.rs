//! Keypad polling and debouncing.
//!
//! The pad is scanned in two strobe phases of three sense lines each.
//! Key priority during play follows scan order: `#` (fire), `9` (right),
//! `6` (unused, masks the second phase), `0` (down), `8` (left), `5` (up).

use crate::compute::{self, Direction};
use crate::config::Config;
use crate::entities::WorldState;
use crate::hal::{key_at, Keypad, PadKey, ScanLine, SenseLine};
use crate::timer::Cooldown;

/// Keys seen closed during one scan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyScan {
    closed: [bool; 6],
}

impl KeyScan {
    fn slot(key: PadKey) -> usize {
        match key {
            PadKey::Hash => 0,
            PadKey::Nine => 1,
            PadKey::Six => 2,
            PadKey::Zero => 3,
            PadKey::Eight => 4,
            PadKey::Five => 5,
        }
    }

    pub fn press(&mut self, key: PadKey) {
        self.closed[Self::slot(key)] = true;
    }

    pub fn is_down(&self, key: PadKey) -> bool {
        self.closed[Self::slot(key)]
    }
}

/// Read all six keys across both strobe phases.
pub fn scan<K: Keypad + ?Sized>(keypad: &mut K) -> KeyScan {
    let mut keys = KeyScan::default();
    for (high, low) in [
        (ScanLine::First, ScanLine::Second),
        (ScanLine::Second, ScanLine::First),
    ] {
        keypad.set_strobe(high, low);
        for sense in SenseLine::ALL {
            if keypad.read_bit(sense) {
                keys.press(key_at(high, sense));
            }
        }
    }
    keys
}

/// Only the start key (`#`) is wired up on the title screen.
pub fn start_pressed<K: Keypad + ?Sized>(keypad: &mut K) -> bool {
    keypad.set_strobe(ScanLine::First, ScanLine::Second);
    keypad.read_bit(SenseLine::First)
}

/// A press that changed the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Start,
    Fire,
    Move(Direction),
}

#[derive(Clone, Debug)]
pub struct InputController {
    debounce: Cooldown,
    fire: Cooldown,
}

impl InputController {
    pub fn new(config: &Config) -> Self {
        InputController {
            debounce: Cooldown::new(config.debounce),
            fire: Cooldown::new(config.fire_cooldown),
        }
    }

    /// Count one idle tick; false while the debounce window is still open.
    fn armed(&mut self) -> bool {
        self.fire.tick();
        if self.debounce.is_ready() {
            true
        } else {
            self.debounce.tick();
            false
        }
    }

    /// Title-screen pass.
    pub fn poll_title<K: Keypad + ?Sized>(&mut self, keypad: &mut K) -> Option<Action> {
        if !self.armed() || !start_pressed(keypad) {
            return None;
        }
        self.debounce.restart();
        Some(Action::Start)
    }

    /// Gameplay pass: scan, pick the highest-priority key and apply it.
    /// Moves and shots update the world before returning, so no other
    /// subsystem sees a half-moved player.
    pub fn poll_playing<K: Keypad + ?Sized>(
        &mut self,
        keypad: &mut K,
        state: &mut WorldState,
    ) -> Option<Action> {
        if !self.armed() || state.player_down {
            return None;
        }
        let keys = scan(keypad);

        if keys.is_down(PadKey::Hash) && self.fire.is_ready() && compute::fire_player_weapon(state) {
            self.fire.restart();
            self.debounce.restart();
            return Some(Action::Fire);
        }

        let direction = if keys.is_down(PadKey::Nine) {
            Direction::Right
        } else if keys.is_down(PadKey::Six) {
            return None;
        } else if keys.is_down(PadKey::Zero) {
            Direction::Down
        } else if keys.is_down(PadKey::Eight) {
            Direction::Left
        } else if keys.is_down(PadKey::Five) {
            Direction::Up
        } else {
            return None;
        };

        if compute::move_player(state, direction) {
            self.debounce.restart();
            Some(Action::Move(direction))
        } else {
            None
        }
    }
}
