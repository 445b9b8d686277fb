//! Scoring economy
//!
//! Exploded shells earn charges; spending a charge on envelopes is recorded
//! as consumption so `charges` can always be derived from the counters.

use serde::{Deserialize, Serialize};

/// Session counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    pub exploded: u32,
    pub consumed: u32,
    pub coins: u32,
}

impl GameStats {
    /// Whole charges available: `floor((exploded - consumed) / cost)`
    pub fn charges(&self, cost: u32) -> u32 {
        self.exploded.saturating_sub(self.consumed) / cost.max(1)
    }
}

/// Counters plus a dirty flag so snapshots are emitted only on change
#[derive(Debug, Clone, Default)]
pub struct Scoreboard {
    stats: GameStats,
    dirty: bool,
}

impl Scoreboard {
    pub fn stats(&self) -> GameStats {
        self.stats
    }

    pub fn charges(&self, cost: u32) -> u32 {
        self.stats.charges(cost)
    }

    pub fn record_explosion(&mut self) {
        self.stats.exploded += 1;
        self.dirty = true;
    }

    /// Spend one charge. Returns `false` (and changes nothing) when fewer
    /// than one charge is available.
    pub fn spend_charge(&mut self, cost: u32) -> bool {
        if self.charges(cost) < 1 {
            return false;
        }
        self.stats.consumed += cost.max(1);
        self.dirty = true;
        true
    }

    pub fn add_coins(&mut self, amount: u32) {
        if amount == 0 {
            return;
        }
        self.stats.coins += amount;
        self.dirty = true;
    }

    /// Zero all counters (session start). Only a real change is reported.
    pub fn reset(&mut self) {
        if self.stats != GameStats::default() {
            self.stats = GameStats::default();
            self.dirty = true;
        }
    }

    /// Snapshot if anything changed since the last call
    pub fn take_dirty(&mut self) -> Option<GameStats> {
        if std::mem::take(&mut self.dirty) {
            Some(self.stats)
        } else {
            None
        }
    }
}
