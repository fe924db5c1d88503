/// Game-logic steps.
///
/// Every public function advances one subsystem by exactly one step on the
/// shared `WorldState`. Cadence is the scheduler's job (`game.rs`); nothing
/// here counts ticks. Randomness only enters through the injected RNG.

use std::io;

use rand::Rng;

use crate::entities::{
    CollisionAnim, Enemy, EnemyKind, GameStatus, Player, ShipKind, Star, Weapon, WeaponKind,
    WorldState, MAX_COLLISIONS, MAX_ENEMIES, MAX_PLAYER_WEAPONS,
};
use crate::grid::{
    is_left_edge, is_right_edge, row_of, row_start, same_row, Fields, COLS, ROWS,
};
use crate::hal::{address_code, Delay, Display};
use crate::render::{Contact, BLANK, IMPACT};

// ── Game setup ───────────────────────────────────────────────────────────────

/// Throw away the current game and lay out a fresh one. The top-level
/// status is kept; only the playfield and slot tables are rebuilt.
pub fn start_game(state: &mut WorldState) {
    let status = state.status;
    *state = WorldState::new();
    state.status = status;
    tracing::debug!("game state reset");
}

// ── Background ───────────────────────────────────────────────────────────────

/// Flip every star between its A and B phase.
pub fn animate_stars(state: &mut WorldState) {
    for index in 0..state.grid.cells().len() {
        if let Some(star) = state.grid.star(index) {
            state.grid.set_star(index, Some(star.twinkled()));
        }
    }
}

/// Shift every row's stars one cell left; the star leaving column 0
/// re-enters the same row at the last column.
pub fn scroll_stars(state: &mut WorldState) {
    for row in 0..ROWS {
        let start = row_start(row);
        let mut stars: [Option<Star>; COLS] = [None; COLS];
        for (col, star) in stars.iter_mut().enumerate() {
            *star = state.grid.star(start + col);
        }
        stars.rotate_left(1);
        for (col, star) in stars.into_iter().enumerate() {
            state.grid.set_star(start + col, star);
        }
    }
}

// ── Player actions ───────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Move both player cells one step. Refused at the playfield edges and
/// when the destination holds another ship.
pub fn move_player(state: &mut WorldState, direction: Direction) -> bool {
    let Player { head, tail } = state.player;
    let new_head = match direction {
        Direction::Right if !is_right_edge(tail) => head + 1,
        Direction::Left if !is_left_edge(head) => head - 1,
        Direction::Down if row_of(head) < ROWS - 1 => head + COLS,
        Direction::Up if row_of(head) > 0 => head - COLS,
        _ => return false,
    };
    let new_tail = new_head + 1;

    let occupied = [new_head, new_tail]
        .into_iter()
        .any(|c| c != head && c != tail && state.grid.ship(c).is_some());
    if occupied {
        return false;
    }

    state.grid.set_ship(head, None);
    state.grid.set_ship(tail, None);
    state.grid.set_ship(new_head, Some(ShipKind::Player));
    state.grid.set_ship(new_tail, Some(ShipKind::Trailing));
    state.player = Player {
        head: new_head,
        tail: new_tail,
    };
    true
}

/// Emit a player blast just ahead of the ship. Refused at the right edge,
/// when the cell ahead already carries a weapon, and when every
/// player-weapon slot is taken.
pub fn fire_player_weapon(state: &mut WorldState) -> bool {
    let tail = state.player.tail;
    if is_right_edge(tail) {
        return false;
    }
    let target = tail + 1;
    if state.grid.weapon(target).is_some() {
        return false;
    }
    if state.player_weapons.insert(Weapon { cell: target }).is_none() {
        return false;
    }
    state.grid.set_weapon(target, Some(WeaponKind::PlayerBlast));
    true
}

// ── Weapons ──────────────────────────────────────────────────────────────────

/// Advance every weapon one cell: player blasts right, enemy blasts left.
/// Blasts on their row's far edge are retired instead. Player and enemy
/// blasts that meet head-on (same or adjacent cell, same row) before or
/// after the step destroy each other with a short impact flash.
pub fn move_weapons<D: Display + Delay>(
    state: &mut WorldState,
    io: &mut D,
    impact_dwell_ms: u32,
) -> io::Result<()> {
    resolve_weapon_impacts(state, io, impact_dwell_ms)?;

    for (_, weapon) in state.player_weapons.iter() {
        state.grid.set_weapon(weapon.cell, None);
    }
    for (_, weapon) in state.enemy_weapons.iter() {
        state.grid.set_weapon(weapon.cell, None);
    }

    for slot in 0..MAX_PLAYER_WEAPONS {
        let Some(weapon) = state.player_weapons.get_mut(slot) else {
            continue;
        };
        if is_right_edge(weapon.cell) {
            state.player_weapons.remove(slot);
        } else {
            weapon.cell += 1;
        }
    }
    for slot in 0..state.enemy_weapons.capacity() {
        let Some(weapon) = state.enemy_weapons.get_mut(slot) else {
            continue;
        };
        if is_left_edge(weapon.cell) {
            state.enemy_weapons.remove(slot);
        } else {
            weapon.cell -= 1;
        }
    }

    resolve_weapon_impacts(state, io, impact_dwell_ms)?;

    for (_, weapon) in state.player_weapons.iter() {
        state.grid.set_weapon(weapon.cell, Some(WeaponKind::PlayerBlast));
    }
    for (_, weapon) in state.enemy_weapons.iter() {
        state.grid.set_weapon(weapon.cell, Some(WeaponKind::EnemyBlast));
    }
    Ok(())
}

fn weapons_meet(player: usize, enemy: usize) -> bool {
    same_row(player, enemy) && (enemy == player || enemy == player + 1)
}

fn resolve_weapon_impacts<D: Display + Delay>(
    state: &mut WorldState,
    io: &mut D,
    dwell_ms: u32,
) -> io::Result<()> {
    for slot in 0..MAX_PLAYER_WEAPONS {
        let Some(player) = state.player_weapons.get(slot).copied() else {
            continue;
        };
        let Some(hit) = state.enemy_weapons.find(|e| weapons_meet(player.cell, e.cell)) else {
            continue;
        };
        let Some(enemy) = state.enemy_weapons.remove(hit) else {
            continue;
        };
        state.player_weapons.remove(slot);

        state.grid.set_weapon(player.cell, None);
        state.grid.set_weapon(enemy.cell, None);
        flash_impact(state, io, player.cell, enemy.cell, dwell_ms)?;
        tracing::debug!(player = player.cell, enemy = enemy.cell, "weapons collided");
    }
    Ok(())
}

/// Draw the impact glyph straight to the display, hold it, then blank it.
/// This bypasses the renderer, so the cells are queued for a forced redraw.
fn flash_impact<D: Display + Delay>(
    state: &mut WorldState,
    io: &mut D,
    a: usize,
    b: usize,
    dwell_ms: u32,
) -> io::Result<()> {
    let pair = [a, b];
    let cells = if a == b { &pair[..1] } else { &pair[..] };
    for &cell in cells {
        io.move_cursor(address_code(cell))?;
        io.write_glyph(IMPACT)?;
    }
    io.delay_ms(dwell_ms);
    for &cell in cells {
        io.move_cursor(address_code(cell))?;
        io.write_glyph(BLANK)?;
        state.grid.force_redraw(cell);
        // A trailing cell is drawn by its head.
        if state.grid.ship(cell) == Some(ShipKind::Trailing)
            && cell > 0
            && same_row(cell - 1, cell)
        {
            state.grid.force_redraw(cell - 1);
        }
    }
    Ok(())
}

// ── Collisions ───────────────────────────────────────────────────────────────

/// Turn a contact reported by the renderer into a wreck: strip the struck
/// ship's two cells to their stars, retire any blast on them, and start a
/// collision animation on both cells.
pub fn create_collision(state: &mut WorldState, contact: Contact) {
    match contact {
        Contact::PlayerHit { cell } => {
            if state.player_down {
                return;
            }
            state.player_down = true;
            let Player { head, tail } = state.player;
            let registered = wreck(state, head, tail, true);
            tracing::debug!(cell, head, "player down");
            if !registered {
                end_game(state);
            }
        }
        Contact::EnemyHit { cell, head } => {
            let Some(slot) = state.enemies.find(|e| e.head == head) else {
                return;
            };
            state.enemies.remove(slot);
            wreck(state, head, head + 1, false);
            tracing::debug!(cell, head, "enemy destroyed");
        }
    }
}

/// Replace a ship with collision markers. Any blast on either cell is
/// retired along with its glyph. Returns whether any animation slot was
/// available.
fn wreck(state: &mut WorldState, head: usize, tail: usize, fatal: bool) -> bool {
    let mut registered = false;
    for cell in [head, tail] {
        while let Some(slot) = state.player_weapons.find(|w| w.cell == cell) {
            state.player_weapons.remove(slot);
        }
        while let Some(slot) = state.enemy_weapons.find(|w| w.cell == cell) {
            state.enemy_weapons.remove(slot);
        }
        state.grid.retain(cell, Fields::STAR);
        let anim = CollisionAnim {
            cell,
            frame: 0,
            fatal,
        };
        if state.collisions.insert(anim).is_some() {
            state.grid.set_ship(cell, Some(ShipKind::Collision));
            registered = true;
        }
    }
    registered
}

fn end_game(state: &mut WorldState) {
    state.status = GameStatus::TitleScreen;
    state.reset_pending = true;
    tracing::debug!("game over");
}

/// Advance every collision animation one frame. Animations past their last
/// frame are torn down; tearing down part of the player's wreck ends the
/// game.
pub fn animate_collisions(state: &mut WorldState) {
    for slot in 0..MAX_COLLISIONS {
        let Some(anim) = state.collisions.get_mut(slot) else {
            continue;
        };
        if anim.frame < 2 {
            anim.frame += 1;
            let cell = anim.cell;
            state.grid.force_redraw(cell);
            continue;
        }
        let Some(anim) = state.collisions.remove(slot) else {
            continue;
        };
        if state.grid.ship(anim.cell) == Some(ShipKind::Collision) {
            state.grid.set_ship(anim.cell, None);
        }
        if anim.fatal {
            end_game(state);
        }
    }
}

// ── Enemies ──────────────────────────────────────────────────────────────────

/// Roll `uniform(0, 16)` and try to spawn. See `spawn_enemy_at`.
pub fn spawn_enemy(state: &mut WorldState, rng: &mut impl Rng) -> bool {
    let roll = rng.gen_range(0..16);
    spawn_enemy_at(state, roll)
}

/// Spawn from a roll in `0..16`: `roll / 4` picks the row, `roll % 4` the
/// kind. The ship enters at the row's two rightmost cells; refused if
/// either holds a ship or a player blast, or if no enemy slot is free.
pub fn spawn_enemy_at(state: &mut WorldState, roll: u32) -> bool {
    let row = (roll / 4) as usize % ROWS;
    let kind = EnemyKind::ALL[(roll % 4) as usize];
    let head = row_start(row) + COLS - 2;
    let tail = head + 1;

    let blocked = [head, tail].into_iter().any(|c| {
        state.grid.ship(c).is_some() || state.grid.weapon(c) == Some(WeaponKind::PlayerBlast)
    });
    if blocked {
        return false;
    }

    let enemy = Enemy {
        head,
        kind,
        fire_countdown: 0,
    };
    if state.enemies.insert(enemy).is_none() {
        return false;
    }
    state.grid.set_ship(head, Some(ShipKind::Enemy(kind)));
    state.grid.set_ship(tail, Some(ShipKind::Trailing));
    tracing::debug!(head, ?kind, "enemy spawned");
    true
}

/// Step every enemy one cell left. Enemies already at the left edge leave
/// the playfield; an enemy whose next cell holds a ship waits.
pub fn move_enemies(state: &mut WorldState) {
    for slot in 0..MAX_ENEMIES {
        let Some(enemy) = state.enemies.get(slot).copied() else {
            continue;
        };
        if is_left_edge(enemy.head) {
            state.enemies.remove(slot);
            state.grid.set_ship(enemy.head, None);
            state.grid.set_ship(enemy.tail(), None);
            tracing::debug!(head = enemy.head, "enemy left the playfield");
            continue;
        }

        let ahead = enemy.head - 1;
        if state.grid.ship(ahead).is_some() {
            continue;
        }
        state.grid.set_ship(enemy.tail(), None);
        state.grid.set_ship(enemy.head, Some(ShipKind::Trailing));
        state.grid.set_ship(ahead, Some(ShipKind::Enemy(enemy.kind)));
        if let Some(moved) = state.enemies.get_mut(slot) {
            moved.head = ahead;
        }
    }
}

/// Enemies whose countdown reads 3 fire one blast just ahead of their
/// head. The shot is silently skipped when that cell already carries a
/// weapon or every enemy-weapon slot is taken. Every enemy not at the
/// left edge then advances its countdown modulo 4.
pub fn enemy_fire(state: &mut WorldState) {
    for slot in 0..MAX_ENEMIES {
        let Some(enemy) = state.enemies.get_mut(slot) else {
            continue;
        };
        if is_left_edge(enemy.head) {
            continue;
        }
        if enemy.fire_countdown == 3 {
            let target = enemy.head - 1;
            if state.grid.weapon(target).is_none()
                && state.enemy_weapons.insert(Weapon { cell: target }).is_some()
            {
                state.grid.set_weapon(target, Some(WeaponKind::EnemyBlast));
            }
        }
        enemy.fire_countdown = (enemy.fire_countdown + 1) % 4;
    }
}
