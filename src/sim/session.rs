//! Game session state machine
//!
//! Menu -> Playing -> Result -> Playing ... with a round countdown and a
//! replay cooldown, each ticking once per second only in its own phase.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the player to start
    #[default]
    Menu,
    /// Round in progress
    Playing,
    /// Round over, showing the result
    Result,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    phase: GamePhase,
    /// Seconds left in the round
    time_left: u32,
    /// Seconds before a replay is allowed
    replay_cooldown: u32,
    /// Fraction of the current second already elapsed
    second_timer: f32,
}

impl Session {
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn replay_cooldown(&self) -> u32 {
        self.replay_cooldown
    }

    /// Begin the first round. Only valid from the menu.
    pub fn start(&mut self, tuning: &Tuning) -> bool {
        if self.phase != GamePhase::Menu {
            return false;
        }
        self.enter_playing(tuning);
        true
    }

    /// Begin another round. Only valid from the result screen once the
    /// cooldown has run out.
    pub fn replay(&mut self, tuning: &Tuning) -> bool {
        if self.phase != GamePhase::Result || self.replay_cooldown > 0 {
            return false;
        }
        self.enter_playing(tuning);
        true
    }

    /// Start from the menu or replay from the result screen, whichever applies
    pub fn request_play(&mut self, tuning: &Tuning) -> bool {
        match self.phase {
            GamePhase::Menu => self.start(tuning),
            GamePhase::Result => self.replay(tuning),
            GamePhase::Playing => false,
        }
    }

    /// Advance the one-second tickers. Returns the new phase on a transition.
    pub fn tick(&mut self, dt: f32, tuning: &Tuning) -> Option<GamePhase> {
        if self.phase == GamePhase::Menu {
            return None;
        }

        self.second_timer += dt;
        while self.second_timer >= 1.0 {
            self.second_timer -= 1.0;

            match self.phase {
                GamePhase::Playing => {
                    self.time_left = self.time_left.saturating_sub(1);
                    if self.time_left == 0 {
                        self.enter_result(tuning);
                        return Some(GamePhase::Result);
                    }
                }
                GamePhase::Result => {
                    self.replay_cooldown = self.replay_cooldown.saturating_sub(1);
                }
                GamePhase::Menu => {}
            }
        }
        None
    }

    fn enter_playing(&mut self, tuning: &Tuning) {
        self.phase = GamePhase::Playing;
        self.time_left = tuning.round_seconds;
        self.replay_cooldown = 0;
        self.second_timer = 0.0;
        log::info!("Round started ({}s)", self.time_left);
    }

    fn enter_result(&mut self, tuning: &Tuning) {
        self.phase = GamePhase::Result;
        self.replay_cooldown = tuning.replay_cooldown_seconds;
        self.second_timer = 0.0;
        log::info!("Round over, replay in {}s", self.replay_cooldown);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick_seconds(session: &mut Session, seconds: u32, tuning: &Tuning) -> Vec<GamePhase> {
        (0..seconds).filter_map(|_| session.tick(1.0, tuning)).collect()
    }

    #[test]
    fn starts_in_menu_and_waits() {
        let tuning = Tuning::default();
        let mut session = Session::default();
        assert_eq!(session.phase(), GamePhase::Menu);
        assert!(tick_seconds(&mut session, 100, &tuning).is_empty());
        assert_eq!(session.phase(), GamePhase::Menu);
    }

    #[test]
    fn countdown_ends_round() {
        let tuning = Tuning::default();
        let mut session = Session::default();
        assert!(session.start(&tuning));
        assert_eq!(session.time_left(), 30);

        assert!(tick_seconds(&mut session, 29, &tuning).is_empty());
        assert_eq!(session.time_left(), 1);
        assert_eq!(session.tick(1.0, &tuning), Some(GamePhase::Result));
        assert_eq!(session.replay_cooldown(), 3);
    }

    #[test]
    fn replay_blocked_until_cooldown_elapses() {
        let tuning = Tuning::default();
        let mut session = Session::default();
        session.start(&tuning);
        tick_seconds(&mut session, 30, &tuning);
        assert_eq!(session.phase(), GamePhase::Result);

        session.tick(1.0, &tuning);
        assert_eq!(session.replay_cooldown(), 2);
        assert!(!session.replay(&tuning));
        assert_eq!(session.phase(), GamePhase::Result);

        tick_seconds(&mut session, 2, &tuning);
        assert_eq!(session.replay_cooldown(), 0);
        assert!(session.replay(&tuning));
        assert_eq!(session.phase(), GamePhase::Playing);
        assert_eq!(session.time_left(), 30);
    }

    #[test]
    fn fractional_ticks_accumulate() {
        let tuning = Tuning::default();
        let mut session = Session::default();
        session.start(&tuning);
        for _ in 0..60 {
            session.tick(1.0 / 60.0, &tuning);
        }
        // Float accumulation may land just short of a full second
        assert!(session.time_left() == 29 || session.time_left() == 30);
        session.tick(0.01, &tuning);
        assert_eq!(session.time_left(), 29);
    }

    #[test]
    fn start_only_from_menu() {
        let tuning = Tuning::default();
        let mut session = Session::default();
        assert!(session.request_play(&tuning));
        assert!(!session.start(&tuning));
        assert!(!session.request_play(&tuning));
    }
}
