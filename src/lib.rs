//! Pulse Match - drag pulsing balls into goal bars of their color
//!
//! Core modules:
//! - `sim`: Deterministic simulation (motion, pulsation, drag, collisions, levels)
//! - `config`: Injected game configuration
//! - `highscores`: Best score per game mode over a scalar key-value store
//! - `effects`: Presentation seam for cosmetic side effects

pub mod config;
pub mod effects;
pub mod highscores;
pub mod sim;

pub use config::{ConfigError, GameConfig};
pub use highscores::{BestScores, GameMode, MemoryStore, ScoreStore};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default arena (16:9 phone aspect, landscape)
    pub const ARENA_WIDTH: f32 = 1280.0;
    pub const ARENA_HEIGHT: f32 = 720.0;

    /// Minimum balls per round (one per palette color)
    pub const MIN_ROUND_BALLS: usize = 4;
}

/// Axis-aligned rectangle in arena coordinates (origin top-left, y down)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Build from a center point and full size
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size / 2.0;
        Self::new(center - half, center + half)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Closest point inside the rectangle to `p`
    #[inline]
    pub fn clamp_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max)
    }
}

/// The bounded play field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: consts::ARENA_WIDTH,
            height: consts::ARENA_HEIGHT,
        }
    }
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Clamp a circle center so the whole circle stays inside the arena
    pub fn clamp_circle(&self, center: Vec2, radius: f32) -> Vec2 {
        // A circle wider than the arena pins to the middle of that axis
        let clamp_axis = |v: f32, extent: f32| {
            if radius * 2.0 >= extent {
                extent / 2.0
            } else {
                v.clamp(radius, extent - radius)
            }
        };
        Vec2::new(clamp_axis(center.x, self.width), clamp_axis(center.y, self.height))
    }
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Unit vector for an angle in radians
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_circle_inside_arena() {
        let arena = Arena::new(800.0, 600.0);
        let p = arena.clamp_circle(Vec2::new(-10.0, 700.0), 20.0);
        assert_eq!(p, Vec2::new(20.0, 580.0));

        // Already inside - unchanged
        let p = arena.clamp_circle(Vec2::new(400.0, 300.0), 20.0);
        assert_eq!(p, Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_rect_from_center() {
        let r = Rect::from_center_size(Vec2::new(100.0, 50.0), Vec2::new(40.0, 20.0));
        assert_eq!(r.min, Vec2::new(80.0, 40.0));
        assert_eq!(r.max, Vec2::new(120.0, 60.0));
        assert_eq!(r.center(), Vec2::new(100.0, 50.0));
    }

    #[test]
    fn test_distance() {
        assert_eq!(distance(Vec2::new(1.0, 2.0), Vec2::new(4.0, 6.0)), 5.0);
        assert_eq!(distance(Vec2::ZERO, Vec2::ZERO), 0.0);
    }
}
