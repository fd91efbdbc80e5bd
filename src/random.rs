use std::time::{SystemTime, UNIX_EPOCH};

/// RandMode records where the seed came from. Predictable seeds are used for
/// regression tests, the clock for gameplay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RandMode {
    Predictable,
    Clock,
}

/// The driver's random number generator. The recurrence must match the
/// original games bit for bit, so no library RNG is used here.
#[derive(Debug, Clone)]
pub struct GameRand {
    seed: u16,
    mode: RandMode,
}

impl GameRand {
    pub fn new_predictable(seed: u16) -> GameRand {
        GameRand {
            seed,
            mode: RandMode::Predictable,
        }
    }

    /// Seed from the wall clock
    pub fn from_clock() -> GameRand {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        GameRand {
            seed: secs as u16,
            mode: RandMode::Clock,
        }
    }

    pub fn mode(&self) -> RandMode {
        self.mode
    }

    pub fn seed(&self) -> u16 {
        self.seed
    }

    /// Advance the seed and return its low byte
    pub fn next(&mut self) -> u8 {
        let s = self.seed;
        self.seed = ((s << 8).wrapping_add(10).wrapping_sub(s) << 2)
            .wrapping_add(s)
            .wrapping_add(1);
        (self.seed & 0xFF) as u8
    }
}
