mod common;

use common::MockBoard;
use nebula_conqueror::compute::{
    animate_collisions, create_collision, move_player, spawn_enemy_at, Direction,
};
use nebula_conqueror::entities::*;
use nebula_conqueror::grid::CELLS;
use nebula_conqueror::render::*;

fn draw(renderer: &mut Renderer, s: &mut WorldState) -> (RenderReport, MockBoard) {
    let mut board = MockBoard::new();
    let report = renderer
        .render(s, &mut board)
        .expect("mock display never fails");
    (report, board)
}

fn primed() -> (Renderer, WorldState) {
    let mut renderer = Renderer::new();
    let mut s = WorldState::new();
    draw(&mut renderer, &mut s);
    (renderer, s)
}

// ── Glyph tables ──────────────────────────────────────────────────────────────

#[test]
fn glyph_tables_match_character_rom() {
    assert_eq!(ship_glyphs(ShipKind::Player), Some([0x00, 0x01]));
    assert_eq!(ship_glyphs(ShipKind::Enemy(EnemyKind::One)), Some([0x3C, 0xB4]));
    assert_eq!(ship_glyphs(ShipKind::Enemy(EnemyKind::Four)), Some([0xE0, 0xE5]));
    assert_eq!(ship_glyphs(ShipKind::Trailing), None);
    assert_eq!(weapon_glyph(WeaponKind::PlayerBlast), 0x3D);
    assert_eq!(weapon_glyph(WeaponKind::EnemyBlast), 0xAA);
    assert_eq!(star_glyph(Star::new(StarKind::One, Phase::A)), 0xA1);
    assert_eq!(star_glyph(Star::new(StarKind::Three, Phase::B)), 0x2E);
}

// ── Full and differential redraws ─────────────────────────────────────────────

#[test]
fn first_render_draws_every_cell() {
    let mut s = WorldState::new();
    let (report, board) = draw(&mut Renderer::new(), &mut s);

    assert_eq!(report.cells_redrawn, CELLS);
    assert_eq!(report.glyphs_written, CELLS);
    assert!(report.contacts.is_empty());
    assert_eq!(board.screen[0], 0xA1);
    assert_eq!(board.screen[6], 0xDE);
    assert_eq!(board.screen[14], 0x2C);
    assert_eq!(board.screen[20], 0x00);
    assert_eq!(board.screen[21], 0x01);
    assert_eq!(board.screen[22], BLANK);
}

#[test]
fn unchanged_grid_writes_nothing() {
    let (mut renderer, mut s) = primed();
    let (report, board) = draw(&mut renderer, &mut s);
    assert_eq!(report.cells_redrawn, 0);
    assert!(board.writes.is_empty());
}

#[test]
fn single_star_change_redraws_one_cell() {
    let (mut renderer, mut s) = primed();
    s.grid.set_star(6, Some(Star::new(StarKind::Two, Phase::A)));
    let (report, board) = draw(&mut renderer, &mut s);
    assert_eq!(report.cells_redrawn, 1);
    assert_eq!(board.writes, vec![(6, 0xDF)]);
}

#[test]
fn player_move_redraws_only_touched_cells() {
    let (mut renderer, mut s) = primed();
    assert!(move_player(&mut s, Direction::Right));
    let (report, board) = draw(&mut renderer, &mut s);
    assert_eq!(report.cells_redrawn, 3);
    assert_eq!(board.writes, vec![(20, BLANK), (21, 0x00), (22, 0x01)]);
}

#[test]
fn weapon_covers_star_then_reveals_it() {
    let (mut renderer, mut s) = primed();
    s.grid.set_weapon(24, Some(WeaponKind::PlayerBlast));
    let (_, board) = draw(&mut renderer, &mut s);
    assert_eq!(board.writes, vec![(24, 0x3D)]);

    s.grid.set_weapon(24, None);
    let (_, board) = draw(&mut renderer, &mut s);
    assert_eq!(board.writes, vec![(24, 0xDE)]);
}

#[test]
fn invalidate_forces_full_redraw() {
    let (mut renderer, mut s) = primed();
    renderer.invalidate();
    let (report, _) = draw(&mut renderer, &mut s);
    assert_eq!(report.cells_redrawn, CELLS);
}

#[test]
fn forced_cell_is_redrawn_even_if_unchanged() {
    let (mut renderer, mut s) = primed();
    s.grid.force_redraw(6);
    let (report, board) = draw(&mut renderer, &mut s);
    assert_eq!(report.cells_redrawn, 1);
    assert_eq!(board.writes, vec![(6, 0xDE)]);
}

// ── Contacts ──────────────────────────────────────────────────────────────────

#[test]
fn classify_needs_a_hostile_weapon() {
    let s = WorldState::new();
    assert_eq!(
        classify_contact(&s.grid, 20, ShipKind::Player, WeaponKind::PlayerBlast),
        None
    );
    assert_eq!(
        classify_contact(&s.grid, 20, ShipKind::Player, WeaponKind::EnemyBlast),
        Some(Contact::PlayerHit { cell: 20 })
    );
    assert_eq!(
        classify_contact(&s.grid, 21, ShipKind::Trailing, WeaponKind::EnemyBlast),
        Some(Contact::PlayerHit { cell: 21 })
    );
    // A trailing marker at column 0 has no head in its row.
    assert_eq!(
        classify_contact(&s.grid, 40, ShipKind::Trailing, WeaponKind::EnemyBlast),
        None
    );
}

#[test]
fn contact_cell_is_not_drawn() {
    let (mut renderer, mut s) = primed();
    s.grid.set_weapon(21, Some(WeaponKind::EnemyBlast));
    let (report, board) = draw(&mut renderer, &mut s);
    assert_eq!(report.contacts.as_slice(), &[Contact::PlayerHit { cell: 21 }]);
    assert!(board.writes.is_empty());
}

// ── Collision animation ───────────────────────────────────────────────────────

#[test]
fn collision_cells_cycle_through_frames_then_clear() {
    let (mut renderer, mut s) = primed();
    s.status = GameStatus::Playing;
    assert!(spawn_enemy_at(&mut s, 0));
    s.player_weapons.insert(Weapon { cell: 19 });
    s.grid.set_weapon(19, Some(WeaponKind::PlayerBlast));

    let (report, _) = draw(&mut renderer, &mut s);
    for contact in report.contacts {
        create_collision(&mut s, contact);
    }

    let (_, board) = draw(&mut renderer, &mut s);
    assert_eq!(board.writes, vec![(18, 0xA5), (19, 0xA5)]);

    animate_collisions(&mut s);
    let (_, board) = draw(&mut renderer, &mut s);
    assert_eq!(board.writes, vec![(18, 0xDB), (19, 0xDB)]);

    animate_collisions(&mut s);
    let (_, board) = draw(&mut renderer, &mut s);
    assert_eq!(board.writes, vec![(18, 0x2A), (19, 0x2A)]);

    animate_collisions(&mut s);
    let (_, board) = draw(&mut renderer, &mut s);
    assert_eq!(board.writes, vec![(18, BLANK), (19, BLANK)]);
}

// ── Title ─────────────────────────────────────────────────────────────────────

#[test]
fn title_screen_text_and_blank_rest() {
    let mut board = MockBoard::new();
    board.screen = [0xAA; CELLS];
    draw_title(&mut board).expect("mock display never fails");

    assert_eq!(board.text(22, 16), b"NEBULA\x10CONQUEROR".to_vec());
    assert_eq!(board.text(42, 16), b"Press\x10#\x10to\x10Start".to_vec());
    assert_eq!(board.screen[0], BLANK);
    assert!(board.text(60, 20).iter().all(|&g| g == BLANK));
}
