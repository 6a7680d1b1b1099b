//! Idle/demo player
//!
//! Picks the live ball nearest to its own goal bar, grabs it, and walks the
//! pointer toward that bar a bounded distance per tick. Stateless: the drag
//! session in the game state is the only memory it needs.

use glam::Vec2;

use super::state::{GamePhase, GameState};
use super::tick::PointerEvent;

#[derive(Debug, Clone, Copy)]
pub struct AutoPlayer {
    /// Max pointer travel per tick (pixels)
    pub max_step: f32,
}

impl Default for AutoPlayer {
    fn default() -> Self {
        Self::new(6.0)
    }
}

impl AutoPlayer {
    pub fn new(max_step: f32) -> Self {
        Self {
            max_step: max_step.max(0.1),
        }
    }

    /// Pointer input for the next tick
    pub fn plan(&self, state: &GameState) -> Vec<PointerEvent> {
        if state.phase != GamePhase::Playing {
            return Vec::new();
        }

        match state.drag.session() {
            Some(session) => {
                let Some(ball) = state.balls.get(session.ball) else {
                    return vec![PointerEvent::Up];
                };
                let Some(bar) = state.goal_bars.bar_for_color(ball.color) else {
                    return vec![PointerEvent::Up];
                };

                let pointer = ball.pos - session.offset;
                let target = bar.rect.center() - session.offset;
                let delta = target - pointer;
                if delta.length() < 0.5 {
                    return vec![PointerEvent::Up];
                }
                let pos = pointer + delta.clamp_length_max(self.max_step);
                vec![PointerEvent::Move { pos }]
            }
            None => self
                .pick_ball(state)
                .map(|pos| vec![PointerEvent::Down { pos, touch: false }])
                .unwrap_or_default(),
        }
    }

    /// Position of the live ball closest to its own bar
    fn pick_ball(&self, state: &GameState) -> Option<Vec2> {
        state
            .balls
            .iter()
            .filter(|b| !b.dead)
            .filter_map(|b| {
                let bar = state.goal_bars.bar_for_color(b.color)?;
                Some((b.pos.distance(bar.rect.center()), b.pos))
            })
            .min_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(_, pos)| pos)
    }
}
