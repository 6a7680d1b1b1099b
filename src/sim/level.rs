//! Level progression and round setup

use glam::Vec2;
use rand::Rng;

use super::drag::DragController;
use super::goal::GoalBarSet;
use super::state::{Countdown, GameEvent, GamePhase, GameState};
use crate::config::GameConfig;
use crate::consts::MIN_ROUND_BALLS;
use crate::direction;

/// Balls spawned at the start of `level` (1-based)
pub fn ball_count_for_level(config: &GameConfig, level: u32) -> usize {
    let extra = level.saturating_sub(1) as usize * config.balls_per_level;
    (config.initial_ball_count + extra).max(MIN_ROUND_BALLS.max(config.palette_len()))
}

/// Pulsation/velocity multiplier for `level`, capped
pub fn difficulty_for_level(config: &GameConfig, level: u32) -> f32 {
    let raw = 1.0 + level.saturating_sub(1) as f32 * config.difficulty_step;
    raw.min(config.max_difficulty).max(1.0)
}

/// Move on from a completed level; returns false in any other phase
pub fn advance_level(state: &mut GameState) -> bool {
    if state.phase != GamePhase::LevelComplete {
        return false;
    }
    state.round.level += 1;
    start_round(state);
    true
}

/// Reset the field for the current level
///
/// Score and lives carry over; balls, bars, drag, combo and the countdown
/// are rebuilt.
pub fn start_round(state: &mut GameState) {
    let level = state.round.level;
    state.round.difficulty = difficulty_for_level(&state.config, level);
    state.round.target_ball_count = ball_count_for_level(&state.config, level);

    state.balls.clear();
    state.goal_bars =
        GoalBarSet::generate(&state.arena, &state.config.goal_bars, &state.config.bar_positions);
    state.drag = DragController::default();
    state.combo.begin();
    state.timer = state
        .mode
        .has_timer()
        .then(|| Countdown::new(state.config.time_limit));

    populate(state);
    state.phase = GamePhase::Playing;

    log::info!(
        "Level {} started: {} balls, difficulty {:.2}",
        level,
        state.round.target_ball_count,
        state.round.difficulty
    );
    state.push_event(GameEvent::LevelStarted {
        level,
        ball_count: state.round.target_ball_count,
        difficulty: state.round.difficulty,
    });
}

/// Spawn the round's balls
///
/// One ball of every palette color comes first unless the same-color debug
/// flag is set, in which case every ball shares one random color.
pub fn populate(state: &mut GameState) {
    let count = state.round.target_ball_count;
    let palette_len = state.config.palette_len().max(1);
    let debug_color = state
        .config
        .same_colors_only
        .then(|| state.rng.random_range(0..palette_len));

    let mut placed: Vec<Vec2> = Vec::with_capacity(count);
    for i in 0..count {
        let color = match debug_color {
            Some(c) => c,
            None if i < palette_len => i,
            None => state.rng.random_range(0..palette_len),
        };
        let pos = find_spawn_position(state, &placed);
        placed.push(pos);

        let (lo, hi) = state.config.ball_size_range;
        let size = state.rng.random_range(lo.min(hi)..=hi.max(lo)) as f32;

        let difficulty = state.round.difficulty;
        let (v0, v1) = state.config.velocity_range;
        let speed = state.rng.random_range(v0 * difficulty..=v1 * difficulty);
        let angle = state.rng.random_range(0.0..std::f32::consts::TAU);

        state.spawn_ball(pos, size / 2.0, color, direction(angle) * speed);
    }
}

/// Rejection-sample a spawn point away from earlier ones
///
/// Gives up after the configured attempts and keeps the last candidate.
fn find_spawn_position(state: &mut GameState, placed: &[Vec2]) -> Vec2 {
    let spawn = state.config.spawn;
    let (w, h) = (state.arena.width, state.arena.height);
    let axis = |rng: &mut rand_pcg::Pcg32, extent: f32| {
        if extent > spawn.margin * 2.0 {
            rng.random_range(spawn.margin..=extent - spawn.margin)
        } else {
            extent / 2.0
        }
    };

    let mut candidate = state.arena.center();
    for _ in 0..spawn.max_attempts.max(1) {
        candidate = Vec2::new(axis(&mut state.rng, w), axis(&mut state.rng, h));
        if placed
            .iter()
            .all(|p| p.distance(candidate) >= spawn.min_separation)
        {
            break;
        }
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::GameMode;
    use crate::Arena;
    use proptest::prelude::*;

    #[test]
    fn test_ball_count_progression() {
        let config = GameConfig::default();
        assert_eq!(ball_count_for_level(&config, 1), 10);
        assert_eq!(ball_count_for_level(&config, 2), 12);
        assert_eq!(ball_count_for_level(&config, 5), 18);

        let sparse = GameConfig {
            initial_ball_count: 1,
            balls_per_level: 0,
            ..Default::default()
        };
        assert_eq!(ball_count_for_level(&sparse, 3), 4);
    }

    #[test]
    fn test_difficulty_progression() {
        let config = GameConfig::default();
        assert_eq!(difficulty_for_level(&config, 1), 1.0);
        assert!((difficulty_for_level(&config, 6) - 1.5).abs() < 1e-5);
        assert_eq!(difficulty_for_level(&config, 40), 2.5);
    }

    #[test]
    fn test_every_color_present() {
        let state = GameState::with_seed(5);
        for color in 0..state.config.palette_len() {
            assert!(state.balls.iter().any(|b| b.color == color));
        }
    }

    #[test]
    fn test_same_color_debug_mode() {
        let config = GameConfig {
            same_colors_only: true,
            ..Default::default()
        };
        let state = GameState::new(config, Arena::default(), GameMode::Arcade, 8);
        let first = state.balls.iter().next().unwrap().color;
        assert!(state.balls.iter().all(|b| b.color == first));
    }

    #[test]
    fn test_advance_level_keeps_score_and_lives() {
        let mut state = GameState::with_seed(3);
        state.round.score = 250;
        state.round.lives = 2;
        assert!(!advance_level(&mut state));

        state.phase = GamePhase::LevelComplete;
        assert!(advance_level(&mut state));
        assert_eq!(state.round.level, 2);
        assert_eq!(state.round.score, 250);
        assert_eq!(state.round.lives, 2);
        assert_eq!(state.balls.len(), 12);
        assert!((state.round.difficulty - 1.1).abs() < 1e-5);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_time_attack_timer_resets_each_level() {
        let mut state = GameState::new(GameConfig::default(), Arena::default(), GameMode::TimeAttack, 4);
        state.timer.as_mut().unwrap().remaining = 3.0;
        state.phase = GamePhase::LevelComplete;
        advance_level(&mut state);
        assert_eq!(state.timer.unwrap().remaining, 60.0);
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = GameState::with_seed(77);
        let b = GameState::with_seed(77);
        let pa: Vec<_> = a.balls.iter().map(|b| (b.pos, b.vel, b.base_radius, b.color)).collect();
        let pb: Vec<_> = b.balls.iter().map(|b| (b.pos, b.vel, b.base_radius, b.color)).collect();
        assert_eq!(pa, pb);
    }

    proptest! {
        #[test]
        fn prop_spawned_balls_in_band_and_margin(seed in any::<u64>(), level in 1u32..15) {
            let mut state = GameState::with_seed(seed);
            state.round.level = level;
            start_round(&mut state);
            prop_assert_eq!(state.balls.len(), ball_count_for_level(&state.config, level));
            for ball in state.balls.iter() {
                prop_assert!(ball.base_radius >= state.config.min_radius());
                prop_assert!(ball.base_radius <= state.config.max_radius());
                prop_assert!(ball.pos.x >= 100.0 && ball.pos.x <= state.arena.width - 100.0);
                prop_assert!(ball.pos.y >= 100.0 && ball.pos.y <= state.arena.height - 100.0);
                prop_assert!(!ball.dead);
            }
        }
    }
}
