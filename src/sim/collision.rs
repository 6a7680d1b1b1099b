//! Intersection tests and outcome rules for the dragged ball
//!
//! Geometry helpers are pure. The `resolve_*` functions apply one outcome
//! (score, penalty, merge, hazard hit, mutual kill) to the game state and
//! report what happened so the drag controller can end or continue the
//! gesture.

use glam::Vec2;
use rand::Rng;

use super::ball::{BallId, BallRegistry, ComboProvenance};
use super::state::{GameEvent, GameState};
use crate::{direction, distance, Rect};

/// Circle vs axis-aligned rectangle (touching counts)
#[inline]
pub fn circle_intersects_rect(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let closest = rect.clamp_point(center);
    center.distance_squared(closest) <= radius * radius
}

/// Circle vs circle (strict overlap, touching does not count)
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    distance(a, b) < ra + rb
}

/// Outcome of one resolution
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Matching goal; ball destroyed and points credited
    Scored { points: u64 },
    /// Wrong goal; ball dead and split into fragments
    Penalized { fragments: Vec<BallId> },
    /// Same-color ball absorbed; gesture continues
    Merged { absorbed: BallId, radius: f32 },
    /// Dragged into a dead ball
    HitHazard { hazard: BallId },
    /// Dragged into a live ball of another color
    MutualKill { other: BallId },
}

impl Resolution {
    /// Everything except a merge ends the gesture
    pub fn ends_gesture(&self) -> bool {
        !matches!(self, Resolution::Merged { .. })
    }
}

/// Color of the first goal bar the ball touches
pub fn goal_contact(state: &GameState, id: BallId) -> Option<usize> {
    let ball = state.balls.get(id)?;
    if ball.dead {
        return None;
    }
    state
        .goal_bars
        .first_touching(ball.pos, ball.display_radius)
        .map(|bar| bar.color)
}

/// First other ball (creation order) overlapping `id`, skipping dragged ones
pub fn ball_contact(balls: &BallRegistry, id: BallId) -> Option<BallId> {
    let ball = balls.get(id)?;
    balls
        .iter()
        .filter(|other| other.id != id && !other.dragging)
        .find(|other| {
            circles_overlap(ball.pos, ball.display_radius, other.pos, other.display_radius)
        })
        .map(|other| other.id)
}

/// Goal check for `id`, resolving on contact
pub fn check_goal(state: &mut GameState, id: BallId) -> Option<Resolution> {
    let bar_color = goal_contact(state, id)?;
    resolve_goal(state, id, bar_color)
}

/// Ball-ball check for `id`, resolving the first contact
pub fn check_balls(state: &mut GameState, id: BallId) -> Option<Resolution> {
    if state.balls.get(id).is_none_or(|b| b.dead) {
        return None;
    }
    let other = ball_contact(&state.balls, id)?;
    resolve_ball_contact(state, id, other)
}

/// Ball `id` touched a bar of `bar_color`
pub fn resolve_goal(state: &mut GameState, id: BallId, bar_color: usize) -> Option<Resolution> {
    let ball = state.balls.get(id)?;
    if ball.dead {
        return None;
    }
    if ball.color == bar_color {
        score_ball(state, id)
    } else {
        penalize_ball(state, id)
    }
}

/// Dragged ball `id` touched `other`
pub fn resolve_ball_contact(state: &mut GameState, id: BallId, other: BallId) -> Option<Resolution> {
    let (dragged, hit) = (state.balls.get(id)?, state.balls.get(other)?);
    if dragged.dead || id == other {
        return None;
    }
    if hit.dead {
        hit_hazard(state, id, other)
    } else if hit.color == dragged.color {
        merge_balls(state, id, other)
    } else {
        mutual_kill(state, id, other)
    }
}

fn score_ball(state: &mut GameState, id: BallId) -> Option<Resolution> {
    let ball = state.balls.remove(id)?;
    let merges = state.combo.merges();
    let points = state.combo.cash_in(ball.display_radius);
    state.round.score += points;

    let message = if merges > 0 {
        let roll = state.rng.random::<u32>() as usize;
        state
            .config
            .combo_message(merges, roll)
            .map(str::to_owned)
    } else {
        None
    };

    log::info!(
        "Scored {} ball {} for {} points (merges {}) - total {}",
        state.config.color_name(ball.color),
        id.0,
        points,
        merges,
        state.round.score
    );
    state.push_event(GameEvent::Scored {
        ball: id,
        color: ball.color,
        pos: ball.pos,
        points,
        merges,
        message,
    });

    state.check_level_complete();
    Some(Resolution::Scored { points })
}

fn penalize_ball(state: &mut GameState, id: BallId) -> Option<Resolution> {
    state.balls.get_mut(id)?.kill();
    state.combo.begin();
    let fragments = split_ball(state, id);

    log::info!("Ball {} hit the wrong goal, split into {}", id.0, fragments.len());
    state.push_event(GameEvent::Penalized {
        ball: id,
        fragments: fragments.clone(),
    });

    state.lose_life();
    state.check_game_over();
    Some(Resolution::Penalized { fragments })
}

/// Scatter same-colored fragments around a penalized ball
///
/// Fragment diameters share `floor(diameter * score_fraction)` evenly,
/// each clamped to the ball size band.
pub fn split_ball(state: &mut GameState, id: BallId) -> Vec<BallId> {
    let Some(ball) = state.balls.get(id) else {
        return Vec::new();
    };
    let (origin, color) = (ball.pos, ball.color);
    let diameter = ball.display_radius * 2.0;

    let split = state.config.split;
    let (lo, hi) = split.count_range;
    let count = state.rng.random_range(lo.min(hi)..=hi.max(lo)).max(1);
    let total = (diameter * split.score_fraction).floor();
    let size = (total / count as f32)
        .floor()
        .clamp(state.config.min_ball_size, state.config.max_ball_size);
    let radius = size / 2.0;

    let mut fragments = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let angle = (state.rng.random_range(0..=360u32) as f32).to_radians();
        let dir = direction(angle);
        let dist = state
            .rng
            .random_range(split.scatter_range.0..=split.scatter_range.1);
        let (v0, v1) = state.config.velocity_range;
        let speed = state.rng.random_range(v0..=v1);

        let pos = state.arena.clamp_circle(origin + dir * dist, radius);
        fragments.push(state.spawn_ball(pos, radius, color, dir * speed));
    }
    fragments
}

fn merge_balls(state: &mut GameState, id: BallId, other: BallId) -> Option<Resolution> {
    let absorbed = state.balls.remove(other)?;
    let merge_id = state.balls.next_merge_id();
    let ball = state.balls.get_mut(id)?;

    let raw = state
        .config
        .merge_policy
        .combine(ball.display_radius, absorbed.display_radius);
    let radius = state.config.clamp_radius(raw);
    ball.display_radius = radius;
    ball.provenance = Some(ComboProvenance {
        merge_id,
        committed_radius: radius,
    });

    let pending = state.combo.record_merge(radius);
    let merges = state.combo.merges();
    log::debug!(
        "Ball {} absorbed {} -> radius {:.1} (combo {}, pending {})",
        id.0,
        other.0,
        radius,
        merges,
        pending
    );
    state.push_event(GameEvent::Merged {
        survivor: id,
        absorbed: other,
        radius,
        merges,
        pending,
    });
    Some(Resolution::Merged {
        absorbed: other,
        radius,
    })
}

fn hit_hazard(state: &mut GameState, id: BallId, hazard: BallId) -> Option<Resolution> {
    state.balls.get_mut(id)?.kill();
    state.combo.begin();
    log::info!("Ball {} struck dead ball {}", id.0, hazard.0);
    state.push_event(GameEvent::BallKilled { ball: id });

    state.lose_life();
    state.check_game_over();
    Some(Resolution::HitHazard { hazard })
}

fn mutual_kill(state: &mut GameState, id: BallId, other: BallId) -> Option<Resolution> {
    state.balls.get_mut(id)?.kill();
    if let Some(b) = state.balls.get_mut(other) {
        b.kill();
    }
    state.combo.begin();
    log::info!("Balls {} and {} destroyed each other", id.0, other.0);
    state.push_event(GameEvent::MutualKill { dragged: id, other });

    state.lose_life();
    state.check_game_over();
    Some(Resolution::MutualKill { other })
}
