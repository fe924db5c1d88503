//! Cooperative tick scheduler and the title/playing state machine.
//!
//! One call to `Game::tick` is one scheduler iteration. While playing, the
//! subsystems run in a fixed order, each gated by its own `Every` timer,
//! and the renderer runs only when the grid's dirty flag is set.

use std::io;

use rand::Rng;

use crate::compute;
use crate::config::Config;
use crate::entities::{GameStatus, WorldState};
use crate::hal::Io;
use crate::input::{Action, InputController};
use crate::render::{self, Renderer};
use crate::timer::Every;
use crate::tone;

/// One software timer per timed subsystem.
#[derive(Clone, Debug)]
pub struct Schedule {
    pub stars: Every,
    pub scroll: Every,
    pub weapons: Every,
    pub collisions: Every,
    pub spawn: Every,
    pub enemy_move: Every,
    pub enemy_fire: Every,
}

impl Schedule {
    pub fn new(config: &Config) -> Self {
        Schedule {
            stars: Every::new(config.star_twinkle),
            scroll: Every::new(config.star_scroll),
            weapons: Every::new(config.weapon_step),
            collisions: Every::new(config.collision_frame),
            spawn: Every::new(config.enemy_spawn),
            enemy_move: Every::new(config.enemy_step),
            enemy_fire: Every::new(config.enemy_fire),
        }
    }
}

#[derive(Debug)]
pub struct Game {
    pub state: WorldState,
    renderer: Renderer,
    input: InputController,
    schedule: Schedule,
    config: Config,
    title_drawn: bool,
    ticks: u64,
}

impl Game {
    pub fn new(config: Config) -> Self {
        Game {
            state: WorldState::new(),
            renderer: Renderer::new(),
            input: InputController::new(&config),
            schedule: Schedule::new(&config),
            config,
            title_drawn: false,
            ticks: 0,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn status(&self) -> GameStatus {
        self.state.status
    }

    /// Run one scheduler iteration.
    pub fn tick<I: Io, R: Rng>(&mut self, io: &mut I, rng: &mut R) -> io::Result<()> {
        self.ticks += 1;
        if self.state.reset_pending {
            self.reset();
        }
        match self.state.status {
            GameStatus::TitleScreen => self.title_tick(io),
            GameStatus::Playing => self.play_tick(io, rng),
        }
    }

    fn reset(&mut self) {
        compute::start_game(&mut self.state);
        self.schedule = Schedule::new(&self.config);
        self.renderer.invalidate();
    }

    fn title_tick<I: Io>(&mut self, io: &mut I) -> io::Result<()> {
        if !self.title_drawn {
            render::draw_title(io)?;
            self.title_drawn = true;
        }
        if self.input.poll_title(io) == Some(Action::Start) {
            for note in tone::intro_notes() {
                io.play_note(note);
            }
            self.title_drawn = false;
            self.state.status = GameStatus::Playing;
            self.renderer.invalidate();
            self.state.grid.dirty().mark();
            tracing::debug!(tick = self.ticks, "game started");
        }
        Ok(())
    }

    fn play_tick<I: Io, R: Rng>(&mut self, io: &mut I, rng: &mut R) -> io::Result<()> {
        let state = &mut self.state;
        let timers = &mut self.schedule;

        if timers.stars.tick() {
            compute::animate_stars(state);
        }
        if timers.scroll.tick() {
            compute::scroll_stars(state);
        }
        if self.input.poll_playing(io, state) == Some(Action::Fire) {
            io.arm_tone(self.config.laser_pitch);
        }
        if timers.weapons.tick() {
            compute::move_weapons(state, io, self.config.impact_dwell_ms)?;
        }
        if !state.collisions.is_empty() && timers.collisions.tick() {
            compute::animate_collisions(state);
        }
        if !state.enemies.is_full() && timers.spawn.tick() && !compute::spawn_enemy(state, rng) {
            timers.spawn.rearm();
        }
        if timers.enemy_move.tick() {
            compute::move_enemies(state);
        }
        if timers.enemy_fire.tick() {
            compute::enemy_fire(state);
        }

        if state.grid.dirty().take() {
            let report = self.renderer.render(state, io)?;
            for contact in report.contacts {
                compute::create_collision(state, contact);
            }
        }
        Ok(())
    }
}
