//! Size pulsation
//!
//! A ball's visible radius oscillates as a triangle wave between
//! `min_scale * base_radius` and `max_scale * base_radius`. The wave is an
//! explicit (scale, direction, rate) state stepped every tick, so it can be
//! frozen and resumed from any radius without a visible jump.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use crate::config::PulseConfig;

/// Which way the oscillation is heading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PulseDirection {
    Growing,
    Shrinking,
}

impl PulseDirection {
    fn flipped(self) -> Self {
        match self {
            PulseDirection::Growing => PulseDirection::Shrinking,
            PulseDirection::Shrinking => PulseDirection::Growing,
        }
    }
}

/// Per-ball oscillation phase
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pulsation {
    /// Current scale relative to the base radius
    pub scale: f32,
    pub direction: PulseDirection,
    /// Scale units per second
    pub rate: f32,
    pub running: bool,
}

impl Default for Pulsation {
    fn default() -> Self {
        Self {
            scale: 1.0,
            direction: PulseDirection::Growing,
            rate: 0.0,
            running: false,
        }
    }
}

impl Pulsation {
    /// Advance along the triangle wave, bouncing off both bounds
    pub fn advance(&mut self, dt: f32, min_scale: f32, max_scale: f32) {
        if !self.running || self.rate <= 0.0 || dt <= 0.0 {
            return;
        }
        let span = max_scale - min_scale;
        if span <= 0.0 {
            return;
        }

        // Whole periods leave the phase unchanged
        let mut travel = (self.rate * dt) % (2.0 * span);

        // At most two bounces remain after the modulo
        for _ in 0..3 {
            if travel <= 0.0 {
                break;
            }
            let room = match self.direction {
                PulseDirection::Growing => max_scale - self.scale,
                PulseDirection::Shrinking => self.scale - min_scale,
            }
            .max(0.0);

            if travel <= room {
                match self.direction {
                    PulseDirection::Growing => self.scale += travel,
                    PulseDirection::Shrinking => self.scale -= travel,
                }
                travel = 0.0;
            } else {
                self.scale = match self.direction {
                    PulseDirection::Growing => max_scale,
                    PulseDirection::Shrinking => min_scale,
                };
                travel -= room;
                self.direction = self.direction.flipped();
            }
        }
        self.scale = self.scale.clamp(min_scale, max_scale);
    }
}

/// Oscillation rules for the current round
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulsationModel {
    pub min_scale: f32,
    pub max_scale: f32,
    /// Seconds per min-to-max leg at difficulty 1.0
    pub speed_range: (f32, f32),
    pub difficulty: f32,
}

impl PulsationModel {
    pub fn new(config: &PulseConfig, difficulty: f32) -> Self {
        Self {
            min_scale: config.min_scale,
            max_scale: config.max_scale,
            speed_range: config.speed_range,
            difficulty: difficulty.max(f32::EPSILON),
        }
    }

    #[inline]
    pub fn midpoint(&self) -> f32 {
        (self.min_scale + self.max_scale) / 2.0
    }

    /// Draw a leg duration and convert it to a scale rate
    ///
    /// Higher difficulty shortens the leg.
    pub fn draw_rate<R: Rng>(&self, rng: &mut R) -> f32 {
        let (lo, hi) = self.speed_range;
        let leg_secs = rng.random_range(lo..=hi) / self.difficulty;
        (self.max_scale - self.min_scale) / leg_secs
    }

    /// Fresh oscillation for a newly created ball: bottom of the wave, growing
    pub fn start<R: Rng>(&self, ball: &mut Ball, rng: &mut R) {
        if ball.dead {
            return;
        }
        ball.pulse = Pulsation {
            scale: self.min_scale,
            direction: PulseDirection::Growing,
            rate: self.draw_rate(rng),
            running: true,
        };
        ball.last_radius = None;
        ball.display_radius = ball.base_radius * self.min_scale;
    }

    /// Continue oscillating, optionally from an exact visible radius
    ///
    /// With `start_radius` the phase is rebuilt so the visible radius is
    /// exactly that value: growing below the midpoint, shrinking otherwise.
    /// Without it the last frozen radius is used, or a fresh wave if the ball
    /// was never stopped. Radii outside the band are pulled onto it.
    pub fn resume<R: Rng>(&self, ball: &mut Ball, start_radius: Option<f32>, rng: &mut R) {
        if ball.dead {
            return;
        }
        let Some(radius) = start_radius.or(ball.last_radius) else {
            self.start(ball, rng);
            return;
        };

        let scale = if ball.base_radius > 0.0 {
            (radius / ball.base_radius).clamp(self.min_scale, self.max_scale)
        } else {
            1.0
        };
        let direction = if scale < self.midpoint() {
            PulseDirection::Growing
        } else {
            PulseDirection::Shrinking
        };

        ball.pulse = Pulsation {
            scale,
            direction,
            rate: self.draw_rate(rng),
            running: true,
        };
        ball.display_radius = ball.base_radius * scale;
        log::debug!(
            "Ball {} pulsation resumed at radius {:.2} ({:?})",
            ball.id.0,
            ball.display_radius,
            direction
        );
    }

    /// Freeze at the current visible radius and remember it
    pub fn stop(&self, ball: &mut Ball) {
        ball.pulse.running = false;
        ball.last_radius = Some(ball.display_radius);
    }

    /// Advance one tick; dragged and dead balls hold still
    pub fn step(&self, ball: &mut Ball, dt: f32) {
        if ball.dead || ball.dragging || !ball.pulse.running {
            return;
        }
        ball.pulse.advance(dt, self.min_scale, self.max_scale);
        ball.display_radius = ball.base_radius * ball.pulse.scale;
    }
}
