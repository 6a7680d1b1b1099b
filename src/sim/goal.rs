//! Goal bars: one colored zone on each arena edge

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::circle_intersects_rect;
use crate::config::{BarPositions, BarSizing, GoalBarConfig};
use crate::{Arena, Rect};

/// Arena edge a bar sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

/// A static scoring zone bound to one palette color
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalBar {
    pub edge: Edge,
    pub color: usize,
    pub rect: Rect,
}

/// The four bars of a round
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoalBarSet {
    bars: Vec<GoalBar>,
}

impl GoalBarSet {
    /// Lay out one bar per edge, centered along it
    pub fn generate(arena: &Arena, config: &GoalBarConfig, positions: &BarPositions) -> Self {
        let (w, h) = (arena.width, arena.height);
        let (h_thick, v_thick) = match config.sizing {
            BarSizing::Pixels => (config.horizontal_thickness, config.vertical_thickness),
            BarSizing::ArenaFraction => (
                config.horizontal_thickness * h,
                config.vertical_thickness * w,
            ),
        };
        let h_len = w * config.horizontal_length;
        let v_len = h * config.vertical_length;

        let bars = vec![
            GoalBar {
                edge: Edge::Top,
                color: positions.top,
                rect: Rect::from_center_size(Vec2::new(w / 2.0, h_thick / 2.0), Vec2::new(h_len, h_thick)),
            },
            GoalBar {
                edge: Edge::Bottom,
                color: positions.bottom,
                rect: Rect::from_center_size(
                    Vec2::new(w / 2.0, h - h_thick / 2.0),
                    Vec2::new(h_len, h_thick),
                ),
            },
            GoalBar {
                edge: Edge::Left,
                color: positions.left,
                rect: Rect::from_center_size(Vec2::new(v_thick / 2.0, h / 2.0), Vec2::new(v_thick, v_len)),
            },
            GoalBar {
                edge: Edge::Right,
                color: positions.right,
                rect: Rect::from_center_size(
                    Vec2::new(w - v_thick / 2.0, h / 2.0),
                    Vec2::new(v_thick, v_len),
                ),
            },
        ];

        Self { bars }
    }

    pub fn iter(&self) -> impl Iterator<Item = &GoalBar> {
        self.bars.iter()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// First bar owned by `color`
    pub fn bar_for_color(&self, color: usize) -> Option<&GoalBar> {
        self.bars.iter().find(|b| b.color == color)
    }

    /// First bar (top, bottom, left, right) a circle touches
    pub fn first_touching(&self, center: Vec2, radius: f32) -> Option<&GoalBar> {
        self.bars
            .iter()
            .find(|b| circle_intersects_rect(center, radius, &b.rect))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_pixel_layout() {
        let arena = Arena::new(800.0, 600.0);
        let set = GoalBarSet::generate(&arena, &GoalBarConfig::default(), &BarPositions::default());
        assert_eq!(set.len(), 4);

        let top = set.iter().find(|b| b.edge == Edge::Top).unwrap();
        assert_eq!(top.rect.min, Vec2::new(200.0, 0.0));
        assert_eq!(top.rect.max, Vec2::new(600.0, 30.0));
        assert_eq!(top.color, 3);

        let right = set.iter().find(|b| b.edge == Edge::Right).unwrap();
        assert_eq!(right.rect.min, Vec2::new(770.0, 120.0));
        assert_eq!(right.rect.max, Vec2::new(800.0, 480.0));
        assert_eq!(right.color, 1);
    }

    #[test]
    fn test_fraction_layout() {
        let arena = Arena::new(1000.0, 500.0);
        let config = GoalBarConfig {
            sizing: BarSizing::ArenaFraction,
            horizontal_thickness: 0.1,
            vertical_thickness: 0.05,
            ..Default::default()
        };
        let set = GoalBarSet::generate(&arena, &config, &BarPositions::default());
        let bottom = set.iter().find(|b| b.edge == Edge::Bottom).unwrap();
        assert_eq!(bottom.rect.size(), Vec2::new(500.0, 50.0));
        let left = set.iter().find(|b| b.edge == Edge::Left).unwrap();
        assert_eq!(left.rect.size(), Vec2::new(50.0, 300.0));
    }

    #[test]
    fn test_first_touching() {
        let arena = Arena::new(800.0, 600.0);
        let set = GoalBarSet::generate(&arena, &GoalBarConfig::default(), &BarPositions::default());

        // Ball resting against the bottom bar
        let hit = set.first_touching(Vec2::new(400.0, 560.0), 20.0).unwrap();
        assert_eq!(hit.edge, Edge::Bottom);
        assert_eq!(hit.color, 0);

        // Middle of the arena touches nothing
        assert!(set.first_touching(Vec2::new(400.0, 300.0), 20.0).is_none());
        assert_eq!(set.bar_for_color(2).unwrap().edge, Edge::Left);
    }
}
