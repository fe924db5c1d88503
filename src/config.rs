//! Engine tunables. All periods are in scheduler ticks.

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub weapon_step: u32,
    pub collision_frame: u32,
    pub enemy_spawn: u32,
    pub enemy_step: u32,
    pub enemy_fire: u32,
    pub star_twinkle: u32,
    pub star_scroll: u32,
    /// Idle ticks required after an accepted key press.
    pub debounce: u32,
    /// Minimum ticks between two player shots.
    pub fire_cooldown: u32,
    /// How long the weapon-impact flash stays on screen, in milliseconds.
    pub impact_dwell_ms: u32,
    /// Starting pitch of the laser tone.
    pub laser_pitch: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            weapon_step: 35,
            collision_frame: 200,
            enemy_spawn: 1500,
            enemy_step: 250,
            enemy_fire: 150,
            star_twinkle: 175,
            star_scroll: 525,
            debounce: 50,
            fire_cooldown: 100,
            impact_dwell_ms: 50,
            laser_pitch: 1000,
        }
    }
}

impl Config {
    /// Divide every tick period by `speed`, keeping each at least one tick.
    /// Wall-clock values (impact dwell, pitch) are left alone.
    pub fn scaled(&self, speed: u32) -> Config {
        let speed = speed.max(1);
        let scale = |ticks: u32| (ticks / speed).max(1);
        Config {
            weapon_step: scale(self.weapon_step),
            collision_frame: scale(self.collision_frame),
            enemy_spawn: scale(self.enemy_spawn),
            enemy_step: scale(self.enemy_step),
            enemy_fire: scale(self.enemy_fire),
            star_twinkle: scale(self.star_twinkle),
            star_scroll: scale(self.star_scroll),
            debounce: scale(self.debounce),
            fire_cooldown: scale(self.fire_cooldown),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_divides_tick_periods_only() {
        let c = Config::default().scaled(10);
        assert_eq!(c.weapon_step, 3);
        assert_eq!(c.enemy_spawn, 150);
        assert_eq!(c.impact_dwell_ms, 50);
        assert_eq!(c.laser_pitch, 1000);
        assert_eq!(Config::default().scaled(0), Config::default());
        assert_eq!(Config::default().scaled(1000).weapon_step, 1);
    }
}
