//! Free ball motion with elastic wall reflection

use super::ball::{Ball, BallRegistry};
use crate::Arena;

/// Move one ball and reflect it off the arena walls
///
/// Uses the visible radius. Each axis reflects at most once per call and only
/// when the velocity still points outward. Returns true on any reflection.
pub fn step_ball(ball: &mut Ball, arena: &Arena, dt: f32) -> bool {
    if !ball.is_free() {
        return false;
    }

    ball.pos += ball.vel * dt;
    let r = ball.display_radius;
    let mut reflected = false;

    if ball.pos.x - r <= 0.0 && ball.vel.x < 0.0 {
        ball.pos.x = r;
        ball.vel.x = -ball.vel.x;
        reflected = true;
    } else if ball.pos.x + r >= arena.width && ball.vel.x > 0.0 {
        ball.pos.x = arena.width - r;
        ball.vel.x = -ball.vel.x;
        reflected = true;
    }

    if ball.pos.y - r <= 0.0 && ball.vel.y < 0.0 {
        ball.pos.y = r;
        ball.vel.y = -ball.vel.y;
        reflected = true;
    } else if ball.pos.y + r >= arena.height && ball.vel.y > 0.0 {
        ball.pos.y = arena.height - r;
        ball.vel.y = -ball.vel.y;
        reflected = true;
    }

    reflected
}

/// Advance every free ball; returns the number of wall reflections
pub fn advance(balls: &mut BallRegistry, arena: &Arena, dt: f32) -> u32 {
    let mut reflections = 0;
    for ball in balls.iter_mut() {
        if step_ball(ball, arena, dt) {
            reflections += 1;
        }
    }
    reflections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ball::BallId;
    use glam::Vec2;

    fn ball_at(pos: Vec2, vel: Vec2, radius: f32) -> Ball {
        Ball::new(BallId(1), pos, radius, 0, vel)
    }

    #[test]
    fn test_reflects_off_left_wall() {
        let arena = Arena::new(800.0, 600.0);
        let mut ball = ball_at(Vec2::new(60.0, 100.0), Vec2::new(-50.0, 0.0), 20.0);

        assert!(step_ball(&mut ball, &arena, 1.0));
        assert_eq!(ball.pos.x, 20.0);
        assert_eq!(ball.vel.x, 50.0);
        assert_eq!(ball.pos.y, 100.0);
    }

    #[test]
    fn test_free_flight_without_contact() {
        let arena = Arena::new(800.0, 600.0);
        let mut ball = ball_at(Vec2::new(100.0, 100.0), Vec2::new(-50.0, 0.0), 20.0);

        assert!(!step_ball(&mut ball, &arena, 1.0));
        assert_eq!(ball.pos.x, 50.0);
        assert_eq!(ball.vel.x, -50.0);
    }

    #[test]
    fn test_corner_reflects_both_axes_once() {
        let arena = Arena::new(800.0, 600.0);
        let mut ball = ball_at(Vec2::new(790.0, 590.0), Vec2::new(30.0, 30.0), 10.0);

        assert!(step_ball(&mut ball, &arena, 0.5));
        assert_eq!(ball.pos, Vec2::new(790.0, 590.0));
        assert_eq!(ball.vel, Vec2::new(-30.0, -30.0));

        // Next tick moves inward, no second reflection
        assert!(!step_ball(&mut ball, &arena, 0.1));
        assert_eq!(ball.vel, Vec2::new(-30.0, -30.0));
    }

    #[test]
    fn test_uses_visible_radius() {
        let arena = Arena::new(800.0, 600.0);
        // At x=31 after the step: clear of the wall with radius 20, touching it with 35
        let mut unpulsed = ball_at(Vec2::new(32.0, 300.0), Vec2::new(-10.0, 0.0), 20.0);
        assert!(!step_ball(&mut unpulsed, &arena, 0.1));

        let mut ball = ball_at(Vec2::new(32.0, 300.0), Vec2::new(-10.0, 0.0), 20.0);
        // Pulsed up past the stored base radius
        ball.display_radius = 35.0;

        assert!(step_ball(&mut ball, &arena, 0.1));
        assert_eq!(ball.pos.x, 35.0);
        assert_eq!(ball.vel.x, 10.0);
    }

    #[test]
    fn test_dead_and_dragged_balls_hold_still() {
        let arena = Arena::new(800.0, 600.0);
        let mut reg = BallRegistry::new();
        let a = reg.spawn(Vec2::new(100.0, 100.0), 10.0, 0, Vec2::new(10.0, 0.0));
        let b = reg.spawn(Vec2::new(200.0, 100.0), 10.0, 0, Vec2::new(10.0, 0.0));
        let c = reg.spawn(Vec2::new(300.0, 100.0), 10.0, 0, Vec2::new(10.0, 0.0));
        reg.get_mut(a).unwrap().kill();
        reg.get_mut(b).unwrap().dragging = true;

        advance(&mut reg, &arena, 1.0);
        assert_eq!(reg.get(a).unwrap().pos.x, 100.0);
        assert_eq!(reg.get(b).unwrap().pos.x, 200.0);
        assert_eq!(reg.get(c).unwrap().pos.x, 310.0);
    }
}
