//! Gesture stabilization
//!
//! Raw per-frame labels from the hand tracker flicker. The stabilizer only
//! trusts a label after it has been seen on consecutive ticks, and game
//! actions fire on changes of the trusted label, never on its level.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::MAX_HAND_SPEED;

/// Hand pose label published by the hand tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Gesture {
    #[default]
    None,
    ClosedFist,
    OpenPalm,
    Victory,
    PointingUp,
    ThumbUp,
    ThumbDown,
    Shaka,
}

impl Gesture {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gesture::None => "None",
            Gesture::ClosedFist => "Closed_Fist",
            Gesture::OpenPalm => "Open_Palm",
            Gesture::Victory => "Victory",
            Gesture::PointingUp => "Pointing_Up",
            Gesture::ThumbUp => "Thumb_Up",
            Gesture::ThumbDown => "Thumb_Down",
            Gesture::Shaka => "Shaka",
        }
    }

    /// Parse a tracker label. Unknown labels read as `None`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Closed_Fist" => Gesture::ClosedFist,
            "Open_Palm" => Gesture::OpenPalm,
            "Victory" => Gesture::Victory,
            "Pointing_Up" => Gesture::PointingUp,
            "Thumb_Up" => Gesture::ThumbUp,
            "Thumb_Down" => Gesture::ThumbDown,
            "Shaka" | "ILoveYou" => Gesture::Shaka,
            _ => Gesture::None,
        }
    }
}

/// Latest hand-tracking result
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandSnapshot {
    pub gesture: Gesture,
    /// Wrist motion speed, clamped to [0, MAX_HAND_SPEED]
    pub speed: f32,
    /// Wrist position in tracker space
    pub position: Vec3,
}

impl HandSnapshot {
    pub fn new(gesture: Gesture, speed: f32, position: Vec3) -> Self {
        let speed = if speed.is_finite() {
            speed.clamp(0.0, MAX_HAND_SPEED)
        } else {
            0.0
        };
        Self {
            gesture,
            speed,
            position,
        }
    }
}

/// Discrete action produced by a stable gesture edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureAction {
    ExplodeVisible,
    SpawnEnvelopes,
    ConvertEnvelopes,
}

/// Actions for a change of stable gesture from `previous` to `current`
pub fn edge_actions(previous: Gesture, current: Gesture) -> &'static [GestureAction] {
    use GestureAction::*;

    if previous == current {
        return &[];
    }
    match (previous, current) {
        (Gesture::Victory, Gesture::OpenPalm) => &[ExplodeVisible, ConvertEnvelopes],
        (_, Gesture::OpenPalm) => &[ExplodeVisible],
        (_, Gesture::Victory) => &[SpawnEnvelopes],
        _ => &[],
    }
}

/// A change of the stable gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureEdge {
    pub previous: Gesture,
    pub current: Gesture,
}

impl GestureEdge {
    pub fn actions(&self) -> &'static [GestureAction] {
        edge_actions(self.previous, self.current)
    }
}

/// Hysteresis filter over the raw gesture label
#[derive(Debug, Clone)]
pub struct GestureStabilizer {
    raw: Gesture,
    pending: Gesture,
    stable_frames: u32,
    stable: Gesture,
    hold_frames: u32,
}

impl GestureStabilizer {
    /// `hold_frames` repeat observations after the first are needed before
    /// `pending` becomes `stable`
    pub fn new(hold_frames: u32) -> Self {
        Self {
            raw: Gesture::None,
            pending: Gesture::None,
            stable_frames: 0,
            stable: Gesture::None,
            hold_frames,
        }
    }

    /// Feed one tick's raw label; returns the edge if `stable` changed
    pub fn update(&mut self, raw: Gesture) -> Option<GestureEdge> {
        self.raw = raw;

        if raw == self.pending {
            self.stable_frames = self.stable_frames.saturating_add(1);
        } else {
            self.pending = raw;
            self.stable_frames = 0;
        }

        if self.stable_frames >= self.hold_frames && self.stable != self.pending {
            let edge = GestureEdge {
                previous: self.stable,
                current: self.pending,
            };
            self.stable = self.pending;
            log::debug!(
                "stable gesture {} -> {}",
                edge.previous.as_str(),
                edge.current.as_str()
            );
            return Some(edge);
        }
        None
    }

    pub fn raw(&self) -> Gesture {
        self.raw
    }

    pub fn pending(&self) -> Gesture {
        self.pending
    }

    pub fn stable_frames(&self) -> u32 {
        self.stable_frames
    }

    pub fn stable(&self) -> Gesture {
        self.stable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOLD: u32 = 5;

    #[test]
    fn transitions_on_sixth_identical_tick() {
        let mut stabilizer = GestureStabilizer::new(HOLD);
        for tick in 1..=5 {
            assert_eq!(stabilizer.update(Gesture::OpenPalm), None, "tick {tick}");
            assert_eq!(stabilizer.stable(), Gesture::None);
        }
        let edge = stabilizer.update(Gesture::OpenPalm).expect("sixth tick");
        assert_eq!(
            edge,
            GestureEdge {
                previous: Gesture::None,
                current: Gesture::OpenPalm
            }
        );
        assert_eq!(stabilizer.stable(), Gesture::OpenPalm);
    }

    #[test]
    fn alternating_signal_never_transitions() {
        let mut stabilizer = GestureStabilizer::new(HOLD);
        for tick in 0..200 {
            let raw = if tick % 2 == 0 { Gesture::Victory } else { Gesture::OpenPalm };
            assert_eq!(stabilizer.update(raw), None);
        }
        assert_eq!(stabilizer.stable(), Gesture::None);
    }

    #[test]
    fn level_does_not_refire() {
        let mut stabilizer = GestureStabilizer::new(HOLD);
        let edges = (0..50)
            .filter_map(|_| stabilizer.update(Gesture::Victory))
            .count();
        assert_eq!(edges, 1);
    }

    #[test]
    fn interruption_restarts_the_count() {
        let mut stabilizer = GestureStabilizer::new(HOLD);
        for _ in 0..4 {
            stabilizer.update(Gesture::Victory);
        }
        assert_eq!(stabilizer.pending(), Gesture::Victory);
        assert_eq!(stabilizer.stable_frames(), 3);

        stabilizer.update(Gesture::None);
        assert_eq!(stabilizer.raw(), Gesture::None);
        assert_eq!(stabilizer.pending(), Gesture::None);
        assert_eq!(stabilizer.stable_frames(), 0);
        assert_eq!(stabilizer.stable(), Gesture::None);
        for _ in 0..5 {
            assert_eq!(stabilizer.update(Gesture::Victory), None);
        }
        assert!(stabilizer.update(Gesture::Victory).is_some());
    }

    #[test]
    fn edge_table() {
        use GestureAction::*;

        assert_eq!(edge_actions(Gesture::None, Gesture::OpenPalm), &[ExplodeVisible]);
        assert_eq!(edge_actions(Gesture::ClosedFist, Gesture::OpenPalm), &[ExplodeVisible]);
        assert_eq!(
            edge_actions(Gesture::Victory, Gesture::OpenPalm),
            &[ExplodeVisible, ConvertEnvelopes]
        );
        assert_eq!(edge_actions(Gesture::OpenPalm, Gesture::Victory), &[SpawnEnvelopes]);
        assert_eq!(edge_actions(Gesture::None, Gesture::Victory), &[SpawnEnvelopes]);
        assert!(edge_actions(Gesture::OpenPalm, Gesture::OpenPalm).is_empty());
        assert!(edge_actions(Gesture::Victory, Gesture::None).is_empty());
        assert!(edge_actions(Gesture::None, Gesture::ClosedFist).is_empty());
    }

    #[test]
    fn labels_parse() {
        assert_eq!(Gesture::from_label("Open_Palm"), Gesture::OpenPalm);
        assert_eq!(Gesture::from_label("ILoveYou"), Gesture::Shaka);
        assert_eq!(Gesture::from_label("bogus"), Gesture::None);
        assert_eq!(Gesture::from_label(Gesture::ThumbDown.as_str()), Gesture::ThumbDown);
    }

    #[test]
    fn snapshot_speed_is_clamped() {
        assert_eq!(HandSnapshot::new(Gesture::None, 9.0, Vec3::ZERO).speed, MAX_HAND_SPEED);
        assert_eq!(HandSnapshot::new(Gesture::None, -1.0, Vec3::ZERO).speed, 0.0);
        assert_eq!(HandSnapshot::new(Gesture::None, f32::NAN, Vec3::ZERO).speed, 0.0);
    }
}
