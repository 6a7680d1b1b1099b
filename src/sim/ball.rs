//! Ball entities and the live ball registry

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::pulse::Pulsation;

/// Stable ball identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BallId(pub u32);

/// Links a merged ball to the radius its last merge committed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComboProvenance {
    pub merge_id: u32,
    pub committed_radius: f32,
}

/// A draggable, mergeable, scorable ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: BallId,
    pub pos: Vec2,
    /// Pixels per second
    pub vel: Vec2,
    /// Committed radius; source of truth outside a gesture
    pub base_radius: f32,
    /// Visible radius (pulsating, or pinned while dragged)
    pub display_radius: f32,
    /// Palette index
    pub color: usize,
    /// Gray static hazard
    pub dead: bool,
    pub dragging: bool,
    pub pulse: Pulsation,
    /// Radius at the last pulsation stop
    pub last_radius: Option<f32>,
    pub provenance: Option<ComboProvenance>,
    /// Draw order key (higher draws on top)
    pub z: u32,
}

impl Ball {
    pub fn new(id: BallId, pos: Vec2, radius: f32, color: usize, vel: Vec2) -> Self {
        Self {
            id,
            pos,
            vel,
            base_radius: radius,
            display_radius: radius,
            color,
            dead: false,
            dragging: false,
            pulse: Pulsation::default(),
            last_radius: None,
            provenance: None,
            z: id.0,
        }
    }

    /// Free balls move and pulsate on their own
    #[inline]
    pub fn is_free(&self) -> bool {
        !self.dead && !self.dragging
    }

    /// Hit test against the visible radius plus extra padding
    pub fn contains_point(&self, point: Vec2, padding: f32) -> bool {
        crate::distance(self.pos, point) <= self.display_radius + padding
    }

    /// Turn into a static hazard, frozen at its current size
    pub fn kill(&mut self) {
        self.dead = true;
        self.vel = Vec2::ZERO;
        self.pulse.running = false;
        self.last_radius = Some(self.display_radius);
        self.provenance = None;
    }
}

/// Owns every ball of the round, in creation order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BallRegistry {
    balls: Vec<Ball>,
    next_id: u32,
    next_z: u32,
    next_merge_id: u32,
}

impl BallRegistry {
    pub fn new() -> Self {
        Self {
            balls: Vec::new(),
            next_id: 1,
            next_z: 1,
            next_merge_id: 1,
        }
    }

    /// Add a ball; returns its new id
    pub fn spawn(&mut self, pos: Vec2, radius: f32, color: usize, vel: Vec2) -> BallId {
        let id = BallId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        let mut ball = Ball::new(id, pos, radius, color, vel);
        ball.z = self.bump_z();
        self.balls.push(ball);
        id
    }

    /// Remove a ball; unknown ids are a no-op
    pub fn remove(&mut self, id: BallId) -> Option<Ball> {
        let index = self.balls.iter().position(|b| b.id == id)?;
        Some(self.balls.remove(index))
    }

    pub fn get(&self, id: BallId) -> Option<&Ball> {
        self.balls.iter().find(|b| b.id == id)
    }

    pub fn get_mut(&mut self, id: BallId) -> Option<&mut Ball> {
        self.balls.iter_mut().find(|b| b.id == id)
    }

    pub fn contains(&self, id: BallId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ball> {
        self.balls.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Ball> {
        self.balls.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.balls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balls.is_empty()
    }

    /// Balls that can still be scored
    pub fn live_count(&self) -> usize {
        self.balls.iter().filter(|b| !b.dead).count()
    }

    pub fn dead_count(&self) -> usize {
        self.balls.iter().filter(|b| b.dead).count()
    }

    pub fn dragging_count(&self) -> usize {
        self.balls.iter().filter(|b| b.dragging).count()
    }

    pub fn clear(&mut self) {
        self.balls.clear();
    }

    /// Move a ball to the top of the draw order
    pub fn bring_to_top(&mut self, id: BallId) {
        let z = self.bump_z();
        if let Some(ball) = self.get_mut(id) {
            ball.z = z;
        }
    }

    /// Ids sorted bottom-to-top for rendering
    pub fn draw_order(&self) -> Vec<BallId> {
        let mut order: Vec<_> = self.balls.iter().map(|b| (b.z, b.id)).collect();
        order.sort_unstable();
        order.into_iter().map(|(_, id)| id).collect()
    }

    /// Allocate an id for a merge event
    pub fn next_merge_id(&mut self) -> u32 {
        let id = self.next_merge_id.max(1);
        self.next_merge_id = id + 1;
        id
    }

    fn bump_z(&mut self) -> u32 {
        let z = self.next_z.max(1);
        self.next_z = z + 1;
        z
    }
}
