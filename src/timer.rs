//! Tick-counting software timers.

/// Fires once every `period` ticks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Every {
    period: u32,
    elapsed: u32,
}

impl Every {
    /// A period of 0 is treated as 1 (fire every tick).
    pub fn new(period: u32) -> Self {
        Every {
            period: period.max(1),
            elapsed: 0,
        }
    }

    /// Count one tick; true on every `period`-th call.
    pub fn tick(&mut self) -> bool {
        self.elapsed += 1;
        if self.elapsed >= self.period {
            self.elapsed = 0;
            true
        } else {
            false
        }
    }

    /// Make the next `tick` fire again, for work that was due but refused.
    pub fn rearm(&mut self) {
        self.elapsed = self.period - 1;
    }
}

/// Counts ticks up to a ceiling; used for debounce and rate limits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cooldown {
    required: u32,
    elapsed: u32,
}

impl Cooldown {
    /// Starts ready.
    pub fn new(required: u32) -> Self {
        Cooldown {
            required,
            elapsed: required,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.elapsed >= self.required
    }

    pub fn tick(&mut self) {
        if self.elapsed < self.required {
            self.elapsed += 1;
        }
    }

    pub fn restart(&mut self) {
        self.elapsed = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_fires_on_each_period() {
        let mut t = Every::new(3);
        let fired: Vec<bool> = (0..7).map(|_| t.tick()).collect();
        assert_eq!(fired, [false, false, true, false, false, true, false]);
    }

    #[test]
    fn every_rearm_fires_next_tick() {
        let mut t = Every::new(10);
        assert!(!t.tick());
        t.rearm();
        assert!(t.tick());
        assert!(!t.tick());
    }

    #[test]
    fn zero_period_fires_every_tick() {
        let mut t = Every::new(0);
        assert!(t.tick());
        assert!(t.tick());
    }

    #[test]
    fn cooldown_counts_back_up() {
        let mut c = Cooldown::new(2);
        assert!(c.is_ready());
        c.restart();
        assert!(!c.is_ready());
        c.tick();
        assert!(!c.is_ready());
        c.tick();
        assert!(c.is_ready());
    }
}
