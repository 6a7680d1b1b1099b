//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use glam::Vec2;

use super::autoplay::AutoPlayer;
use super::state::{GameEvent, GamePhase, GameState};
use super::{drag, level, motion};

/// Pointer input, in arena coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { pos: Vec2, touch: bool },
    Move { pos: Vec2 },
    Up,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer events in arrival order
    pub pointer: Vec<PointerEvent>,
    /// Pause toggle
    pub pause: bool,
    /// Continue after a completed level
    pub next_level: bool,
    /// Idle/demo mode - AI plays the game
    pub idle_mode: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.pause {
        toggle_pause(state);
    }
    if input.next_level {
        level::advance_level(state);
    }

    // Paused, between levels, or over
    if !state.is_active() {
        return;
    }

    state.time_ticks += 1;
    state.drag.begin_tick();

    let planned;
    let pointer = if input.idle_mode {
        planned = AutoPlayer::default().plan(state);
        &planned
    } else {
        &input.pointer
    };
    for event in pointer {
        if !state.is_active() {
            break;
        }
        apply_pointer(state, *event);
    }
    if !state.is_active() {
        return;
    }

    motion::advance(&mut state.balls, &state.arena, dt);

    let model = state.pulsation();
    for ball in state.balls.iter_mut() {
        model.step(ball, dt);
    }

    // Free balls may have drifted into the dragged one
    drag::poll_collisions(state);

    let expired = state
        .timer
        .as_mut()
        .is_some_and(|timer| timer.advance(dt));
    if expired && state.is_active() {
        log::info!("Time up");
        drag::cancel(state);
        state.push_event(GameEvent::TimeUp);
        state.game_over();
    }
}

fn apply_pointer(state: &mut GameState, event: PointerEvent) {
    match event {
        PointerEvent::Down { pos, touch } => {
            drag::pointer_down(state, pos, touch);
        }
        PointerEvent::Move { pos } => {
            drag::pointer_move(state, pos);
        }
        PointerEvent::Up => {
            drag::pointer_up(state);
        }
    }
}

/// Playing <-> Paused; pausing mid-drag cancels the gesture
fn toggle_pause(state: &mut GameState) {
    match state.phase {
        GamePhase::Playing => {
            drag::cancel(state);
            state.phase = GamePhase::Paused;
            log::info!("Paused");
            state.push_event(GameEvent::Paused);
        }
        GamePhase::Paused => {
            state.phase = GamePhase::Playing;
            log::info!("Resumed");
            state.push_event(GameEvent::Resumed);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::consts::SIM_DT;
    use crate::highscores::GameMode;
    use crate::sim::ball::BallId;
    use crate::Arena;
    use proptest::prelude::*;

    fn empty_state(mode: GameMode) -> GameState {
        let mut state = GameState::new(GameConfig::default(), Arena::new(800.0, 600.0), mode, 21);
        state.balls.clear();
        state.take_events();
        state
    }

    fn still_ball(state: &mut GameState, pos: Vec2, color: usize) -> BallId {
        state.spawn_ball(pos, 20.0, color, Vec2::ZERO)
    }

    fn pointer(events: &[PointerEvent]) -> TickInput {
        TickInput {
            pointer: events.to_vec(),
            ..Default::default()
        }
    }

    fn down(x: f32, y: f32) -> PointerEvent {
        PointerEvent::Down {
            pos: Vec2::new(x, y),
            touch: false,
        }
    }

    fn to(x: f32, y: f32) -> PointerEvent {
        PointerEvent::Move { pos: Vec2::new(x, y) }
    }

    #[test]
    fn test_tick_pause() {
        let mut state = GameState::with_seed(12345);
        let before: Vec<_> = state.balls.iter().map(|b| (b.pos, b.display_radius)).collect();

        let input = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.phase, GamePhase::Paused);

        // Frozen while paused
        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        let after: Vec<_> = state.balls.iter().map(|b| (b.pos, b.display_radius)).collect();
        assert_eq!(before, after);
        assert_eq!(state.time_ticks, 0);

        // Unpause
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        let events = state.take_events();
        assert!(events.contains(&GameEvent::Paused));
        assert!(events.contains(&GameEvent::Resumed));
    }

    #[test]
    fn test_merge_chain_then_goal() {
        let mut state = empty_state(GameMode::Arcade);
        let a = still_ball(&mut state, Vec2::new(400.0, 300.0), 0);
        still_ball(&mut state, Vec2::new(400.0, 380.0), 0);
        still_ball(&mut state, Vec2::new(120.0, 80.0), 1);

        tick(&mut state, &pointer(&[down(400.0, 300.0)]), SIM_DT);
        tick(&mut state, &pointer(&[to(400.0, 360.0)]), SIM_DT);
        assert_eq!(state.balls.len(), 2);
        assert_eq!(state.combo.merges(), 1);
        let merged = state.balls.get(a).unwrap().display_radius;

        // Bottom bar is blue
        tick(&mut state, &pointer(&[to(400.0, 560.0)]), SIM_DT);
        assert!(!state.balls.contains(a));
        let expected = (merged * 2.0).round() as u64 + merged.floor() as u64;
        assert_eq!(state.round.score, expected);
        assert_eq!(state.phase, GamePhase::Playing);

        let scored = state.take_events().into_iter().find_map(|e| match e {
            GameEvent::Scored { merges, message, .. } => Some((merges, message)),
            _ => None,
        });
        let (merges, message) = scored.unwrap();
        assert_eq!(merges, 1);
        assert!(message.is_some());
    }

    #[test]
    fn test_release_discards_combo() {
        let mut state = empty_state(GameMode::Arcade);
        let a = still_ball(&mut state, Vec2::new(400.0, 300.0), 2);
        still_ball(&mut state, Vec2::new(400.0, 360.0), 2);

        tick(&mut state, &pointer(&[down(400.0, 300.0), to(400.0, 340.0)]), SIM_DT);
        assert_eq!(state.balls.len(), 1);
        tick(&mut state, &pointer(&[PointerEvent::Up]), SIM_DT);

        assert_eq!(state.round.score, 0);
        assert!(!state.combo.is_active());
        assert!(state
            .take_events()
            .iter()
            .any(|e| matches!(e, GameEvent::ComboLost { ball, merges: 1, .. } if *ball == a)));

        let ball = state.balls.get(a).unwrap();
        assert!(!ball.dragging);
        assert!(ball.pulse.running);
        assert!(ball.base_radius > 20.0);
    }

    #[test]
    fn test_pause_cancels_drag() {
        let mut state = empty_state(GameMode::Arcade);
        let a = still_ball(&mut state, Vec2::new(400.0, 300.0), 1);
        still_ball(&mut state, Vec2::new(400.0, 360.0), 1);

        tick(&mut state, &pointer(&[down(400.0, 300.0), to(400.0, 340.0)]), SIM_DT);
        assert!(state.combo.is_active());

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Paused);
        assert!(!state.drag.is_dragging());

        let ball = state.balls.get(a).unwrap();
        assert_eq!(ball.pos, Vec2::new(400.0, 300.0));
        assert_eq!(ball.base_radius, 20.0);
        assert!(!ball.dragging);
        assert_eq!(state.round.score, 0);
        assert!(state
            .take_events()
            .contains(&GameEvent::DragCancelled { ball: a }));
    }

    #[test]
    fn test_wrong_goal_costs_a_life() {
        let mut state = empty_state(GameMode::Arcade);
        // Blue ball dragged up into the green bar
        let a = still_ball(&mut state, Vec2::new(400.0, 300.0), 0);

        tick(&mut state, &pointer(&[down(400.0, 300.0), to(400.0, 40.0)]), SIM_DT);
        assert_eq!(state.round.lives, 2);
        assert!(state.balls.get(a).unwrap().dead);
        let fragments = state.balls.live_count();
        assert!((2..=5).contains(&fragments));
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(!state.drag.is_dragging());
    }

    #[test]
    fn test_last_life_ends_game() {
        let mut state = empty_state(GameMode::Arcade);
        state.round.lives = 1;
        still_ball(&mut state, Vec2::new(400.0, 300.0), 0);
        still_ball(&mut state, Vec2::new(600.0, 300.0), 1);

        tick(&mut state, &pointer(&[down(400.0, 300.0), to(400.0, 40.0)]), SIM_DT);
        assert_eq!(state.round.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);

        // Nothing moves after game over
        let ticks = state.time_ticks;
        tick(&mut state, &pointer(&[down(600.0, 300.0)]), SIM_DT);
        assert_eq!(state.time_ticks, ticks);
        assert!(!state.drag.is_dragging());
    }

    #[test]
    fn test_level_complete_waits_for_continue() {
        let mut state = empty_state(GameMode::Arcade);
        still_ball(&mut state, Vec2::new(400.0, 300.0), 0);
        state.round.score = 10;

        tick(&mut state, &pointer(&[down(400.0, 300.0), to(400.0, 560.0)]), SIM_DT);
        assert_eq!(state.phase, GamePhase::LevelComplete);

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::LevelComplete);

        let next = TickInput {
            next_level: true,
            ..Default::default()
        };
        tick(&mut state, &next, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.round.level, 2);
        assert_eq!(state.balls.len(), 12);
        assert!(state.round.score > 10);
    }

    #[test]
    fn test_time_up_ends_game() {
        let config = GameConfig {
            time_limit: 1.0,
            ..Default::default()
        };
        let mut state = GameState::new(config, Arena::default(), GameMode::TimeAttack, 6);
        state.take_events();

        for _ in 0..30 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert_eq!(state.phase, GamePhase::Playing);

        for _ in 0..40 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert_eq!(state.phase, GamePhase::GameOver);
        let events = state.take_events();
        let time_up = events.iter().position(|e| *e == GameEvent::TimeUp).unwrap();
        let over = events
            .iter()
            .position(|e| matches!(e, GameEvent::GameOver { .. }))
            .unwrap();
        assert!(time_up < over);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::with_seed(99999);
        let mut state2 = GameState::with_seed(99999);

        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..600 {
            tick(&mut state1, &input, SIM_DT);
            tick(&mut state2, &input, SIM_DT);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.round, state2.round);
        assert_eq!(state1.balls.len(), state2.balls.len());
        for (a, b) in state1.balls.iter().zip(state2.balls.iter()) {
            assert_eq!(a.pos, b.pos);
            assert_eq!(a.display_radius, b.display_radius);
        }
    }

    fn arb_pointer() -> impl Strategy<Value = PointerEvent> {
        prop_oneof![
            (0.0f32..1280.0, 0.0f32..720.0, any::<bool>())
                .prop_map(|(x, y, touch)| PointerEvent::Down { pos: Vec2::new(x, y), touch }),
            (0.0f32..1280.0, 0.0f32..720.0).prop_map(|(x, y)| PointerEvent::Move { pos: Vec2::new(x, y) }),
            Just(PointerEvent::Up),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_single_dragger_and_radius_band(
            seed in any::<u64>(),
            events in prop::collection::vec(arb_pointer(), 1..120),
        ) {
            let mut state = GameState::with_seed(seed);
            let min_r = state.config.min_radius();
            let max_r = state.config.max_radius();

            for event in events {
                tick(&mut state, &pointer(&[event]), SIM_DT);
                prop_assert!(state.balls.dragging_count() <= 1);
                for ball in state.balls.iter() {
                    prop_assert!(ball.base_radius >= min_r && ball.base_radius <= max_r);
                    if ball.dead {
                        prop_assert_eq!(ball.vel, Vec2::ZERO);
                    }
                }
                if state.phase == GamePhase::LevelComplete {
                    prop_assert_eq!(state.balls.live_count(), 0);
                }
            }
        }
    }
}
