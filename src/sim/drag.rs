//! Single-ball drag gesture
//!
//! Idle until a pointer-down hits a live ball. A ball already resting on a
//! goal bar resolves on the spot; anything else starts a drag session that
//! follows the pointer, polls for collisions, and commits on release.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ball::BallId;
use super::collision::{self, Resolution};
use super::state::{GameEvent, GameState};

/// The one active gesture
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragSession {
    pub ball: BallId,
    /// Ball center minus pointer at grab time
    pub offset: Vec2,
    /// Snap-back position for cancellation
    pub start_pos: Vec2,
    /// Visible radius at grab time
    pub grab_radius: f32,
    /// Radius committed as the base on release
    pub committed_radius: f32,
}

/// Owner of the single dragged-ball slot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DragController {
    session: Option<DragSession>,
    merged_this_tick: bool,
    resolved_this_tick: bool,
}

impl DragController {
    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn dragged_ball(&self) -> Option<BallId> {
        self.session.map(|s| s.ball)
    }

    /// Clear the per-tick resolution guards
    pub fn begin_tick(&mut self) {
        self.merged_this_tick = false;
        self.resolved_this_tick = false;
    }
}

/// Result of a pointer-down
#[derive(Debug, Clone, PartialEq)]
pub enum PointerDown {
    /// Not playing, or a drag is already running
    Ignored,
    /// No live ball under the pointer
    Missed,
    /// Ball was already on a goal bar
    ResolvedInPlace(BallId, Resolution),
    Grabbed(BallId),
}

/// How a released gesture ended
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragExit {
    Released { ball: BallId, radius: f32 },
    /// Released with merges that never reached a goal
    ComboLost { ball: BallId, radius: f32, discarded: u64 },
}

/// Hit-test and either resolve in place or start dragging
pub fn pointer_down(state: &mut GameState, pos: Vec2, touch: bool) -> PointerDown {
    if !state.is_active() || state.drag.is_dragging() {
        return PointerDown::Ignored;
    }

    let padding = if touch { state.config.touch_hitbox_padding } else { 0.0 };
    let Some(id) = state
        .balls
        .iter()
        .find(|b| !b.dead && b.contains_point(pos, padding))
        .map(|b| b.id)
    else {
        return PointerDown::Missed;
    };

    state.combo.begin();
    if !state.drag.resolved_this_tick {
        if let Some(res) = collision::check_goal(state, id) {
            state.drag.resolved_this_tick = true;
            return PointerDown::ResolvedInPlace(id, res);
        }
    }

    let model = state.pulsation();
    let Some(ball) = state.balls.get_mut(id) else {
        return PointerDown::Missed;
    };
    model.stop(ball);
    ball.dragging = true;
    ball.provenance = None;
    let session = DragSession {
        ball: id,
        offset: ball.pos - pos,
        start_pos: ball.pos,
        grab_radius: ball.display_radius,
        committed_radius: ball.base_radius,
    };
    state.balls.bring_to_top(id);
    state.drag.session = Some(session);

    log::debug!("Grabbed ball {} at radius {:.2}", id.0, session.grab_radius);
    state.push_event(GameEvent::BallGrabbed {
        ball: id,
        radius: session.grab_radius,
    });
    PointerDown::Grabbed(id)
}

/// Follow the pointer, keep the ball inside the arena, then poll collisions
pub fn pointer_move(state: &mut GameState, pos: Vec2) -> Option<Resolution> {
    let session = state.drag.session?;
    let arena = state.arena;
    let Some(ball) = state.balls.get_mut(session.ball) else {
        state.drag.session = None;
        return None;
    };
    ball.pos = arena.clamp_circle(pos + session.offset, ball.display_radius);
    poll_collisions(state)
}

/// Goal check first, then at most one ball contact
///
/// Within one tick only one merge and one goal/penalty resolution can fire.
pub fn poll_collisions(state: &mut GameState) -> Option<Resolution> {
    let session = state.drag.session?;
    if !state.is_active() {
        return None;
    }

    if !state.drag.resolved_this_tick {
        if let Some(res) = collision::check_goal(state, session.ball) {
            state.drag.resolved_this_tick = true;
            end_session(state);
            return Some(res);
        }
    }

    if state.drag.merged_this_tick || state.drag.resolved_this_tick {
        return None;
    }
    let res = collision::check_balls(state, session.ball)?;
    match res {
        Resolution::Merged { radius, .. } => {
            state.drag.merged_this_tick = true;
            if let Some(s) = state.drag.session.as_mut() {
                s.committed_radius = radius;
            }
            // The grown survivor may now poke past an arena edge
            let arena = state.arena;
            if let Some(ball) = state.balls.get_mut(session.ball) {
                ball.pos = arena.clamp_circle(ball.pos, radius);
            }
        }
        _ => {
            state.drag.resolved_this_tick = true;
            end_session(state);
        }
    }
    Some(res)
}

/// Commit the gesture on pointer-up
pub fn pointer_up(state: &mut GameState) -> Option<DragExit> {
    let session = state.drag.session.take()?;
    let model = state.pulsation();
    let min_radius = state.config.min_radius();
    let max_radius = state.config.max_radius();

    let ball = state.balls.get_mut(session.ball)?;
    ball.dragging = false;
    if ball.dead {
        return None;
    }

    let committed = session.committed_radius.clamp(min_radius, max_radius);
    ball.base_radius = committed;
    let resume_from = ball
        .provenance
        .map(|p| p.committed_radius)
        .unwrap_or(ball.display_radius);
    model.resume(ball, Some(resume_from), &mut state.rng);
    let radius = ball.display_radius;

    let exit = match state.combo.discard() {
        Some((merges, discarded)) => {
            log::info!(
                "Combo of {} lost on release, {} points discarded",
                merges,
                discarded
            );
            state.push_event(GameEvent::ComboLost {
                ball: session.ball,
                merges,
                discarded,
            });
            DragExit::ComboLost {
                ball: session.ball,
                radius,
                discarded,
            }
        }
        None => DragExit::Released {
            ball: session.ball,
            radius,
        },
    };
    state.push_event(GameEvent::Released {
        ball: session.ball,
        radius,
    });
    Some(exit)
}

/// Abort the gesture without committing anything
///
/// The ball snaps back to where it was grabbed at its grab-time radius and
/// any merge chain is dropped without credit.
pub fn cancel(state: &mut GameState) -> Option<BallId> {
    let session = state.drag.session.take()?;
    state.combo.begin();
    let model = state.pulsation();

    if let Some(ball) = state.balls.get_mut(session.ball) {
        ball.dragging = false;
        ball.pos = session.start_pos;
        ball.provenance = None;
        if !ball.dead {
            ball.display_radius = session.grab_radius;
            model.resume(ball, Some(session.grab_radius), &mut state.rng);
        }
    }

    log::debug!("Drag of ball {} cancelled", session.ball.0);
    state.push_event(GameEvent::DragCancelled { ball: session.ball });
    Some(session.ball)
}

/// Drop the session after a gesture-ending resolution
fn end_session(state: &mut GameState) {
    if let Some(session) = state.drag.session.take() {
        if let Some(ball) = state.balls.get_mut(session.ball) {
            ball.dragging = false;
        }
    }
}
