//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (creation order)
//! - No rendering or platform dependencies

pub mod autoplay;
pub mod ball;
pub mod collision;
pub mod combo;
pub mod drag;
pub mod goal;
pub mod level;
pub mod motion;
pub mod pulse;
pub mod state;
pub mod tick;

pub use autoplay::AutoPlayer;
pub use ball::{Ball, BallId, BallRegistry, ComboProvenance};
pub use collision::{Resolution, circle_intersects_rect, circles_overlap};
pub use combo::ComboTracker;
pub use drag::{DragController, DragExit, DragSession, PointerDown};
pub use goal::{Edge, GoalBar, GoalBarSet};
pub use level::{advance_level, ball_count_for_level, difficulty_for_level, start_round};
pub use pulse::{PulseDirection, Pulsation, PulsationModel};
pub use state::{Countdown, GameEvent, GamePhase, GameState, RoundState};
pub use tick::{PointerEvent, TickInput, tick};
