//! Per-frame simulation tick
//!
//! Order within a tick: session intents, gesture edges, session timers,
//! launch scheduling, entity and particle physics, then the stats snapshot.

use super::coins;
use super::envelopes;
use super::gesture::{Gesture, GestureAction, GestureEdge, HandSnapshot};
use super::projectiles;
use super::session::GamePhase;
use super::state::{GameEvent, SimState};

/// Inputs for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Latest hand-tracking result, `None` when no hand is in view
    pub hand: Option<HandSnapshot>,
    /// Start a round from the menu
    pub start: bool,
    /// Start another round from the result screen
    pub replay: bool,
}

/// Advance the simulation by one step
pub fn tick(state: &mut SimState, input: &TickInput, dt: f32) {
    state.time_ticks += 1;
    state.time_ms += f64::from(dt) * 1000.0;

    if input.start && state.session.start(&state.tuning) {
        begin_round(state);
    }
    if input.replay && state.session.replay(&state.tuning) {
        begin_round(state);
    }

    // No hand reads as no gesture and no motion
    let (raw, speed) = match input.hand {
        Some(hand) => (hand.gesture, hand.speed),
        None => (Gesture::None, 0.0),
    };
    state.hand_speed = speed;
    if let Some(edge) = state.gesture.update(raw) {
        dispatch_edge(state, edge);
    }

    if let Some(phase) = state.session.tick(dt, &state.tuning) {
        state.events.push(GameEvent::PhaseChanged(phase));
    }

    if state.session.is_active() && state.scheduler.is_due(state.time_ms) {
        projectiles::spawn(state);
        let stable = state.gesture.stable();
        state.scheduler.schedule_next(
            state.time_ms,
            &mut state.rng,
            stable,
            state.hand_speed,
            &state.tuning,
        );
    }

    projectiles::tick(state, dt);
    envelopes::tick(state, dt);
    coins::tick(state, dt);
    state.particles.tick(dt);

    if let Some(stats) = state.scoreboard.take_dirty() {
        state.events.push(GameEvent::StatsChanged(stats));
    }
}

/// Route a stable gesture edge. Game actions only run while playing; in the
/// menu and result screens a Victory edge doubles as start/replay.
fn dispatch_edge(state: &mut SimState, edge: GestureEdge) {
    match state.session.phase() {
        GamePhase::Playing => {
            for &action in edge.actions() {
                match action {
                    GestureAction::ExplodeVisible => {
                        projectiles::explode_visible(state);
                    }
                    GestureAction::SpawnEnvelopes => {
                        envelopes::try_spawn(state);
                    }
                    GestureAction::ConvertEnvelopes => {
                        envelopes::explode_all(state);
                    }
                }
            }
        }
        GamePhase::Menu | GamePhase::Result => {
            if edge.current == Gesture::Victory && state.session.request_play(&state.tuning) {
                begin_round(state);
            }
        }
    }
}

/// Fresh counters, no leftover rewards, first launch right away
fn begin_round(state: &mut SimState) {
    state.scoreboard.reset();
    state.envelopes.clear();
    state.coins.clear();
    state.scheduler.reset(state.time_ms);
    state.events.push(GameEvent::PhaseChanged(GamePhase::Playing));
}
