//! Game state and core simulation types
//!
//! All state that must be persisted for Continue/determinism lives here.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ball::{BallId, BallRegistry};
use super::combo::ComboTracker;
use super::drag::DragController;
use super::goal::GoalBarSet;
use super::level;
use super::pulse::PulsationModel;
use crate::config::GameConfig;
use crate::highscores::GameMode;
use crate::Arena;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Everything frozen
    Paused,
    /// Every live ball scored; waiting for the next level
    LevelComplete,
    /// Run ended
    GameOver,
}

/// Score, lives and difficulty of the running game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    pub score: u64,
    pub lives: u32,
    /// 1-based
    pub level: u32,
    pub difficulty: f32,
    pub target_ball_count: usize,
}

/// Time attack countdown
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    pub limit: f32,
    pub remaining: f32,
}

impl Countdown {
    pub fn new(limit: f32) -> Self {
        Self {
            limit,
            remaining: limit,
        }
    }

    /// Remaining fraction in [0, 1]
    pub fn fraction(&self) -> f32 {
        if self.limit <= 0.0 {
            0.0
        } else {
            (self.remaining / self.limit).clamp(0.0, 1.0)
        }
    }

    /// Tick down; returns true the moment time runs out
    pub fn advance(&mut self, dt: f32) -> bool {
        if self.remaining <= 0.0 {
            return false;
        }
        self.remaining = (self.remaining - dt).max(0.0);
        self.remaining <= 0.0
    }
}

/// Observable transitions for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    LevelStarted { level: u32, ball_count: usize, difficulty: f32 },
    BallGrabbed { ball: BallId, radius: f32 },
    Merged { survivor: BallId, absorbed: BallId, radius: f32, merges: u32, pending: u64 },
    Scored { ball: BallId, color: usize, pos: Vec2, points: u64, merges: u32, message: Option<String> },
    ComboLost { ball: BallId, merges: u32, discarded: u64 },
    Released { ball: BallId, radius: f32 },
    Penalized { ball: BallId, fragments: Vec<BallId> },
    BallKilled { ball: BallId },
    MutualKill { dragged: BallId, other: BallId },
    LifeLost { remaining: u32 },
    DragCancelled { ball: BallId },
    LevelComplete { level: u32, score: u64 },
    GameOver { score: u64, level: u32 },
    TimeUp,
    Paused,
    Resumed,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub config: GameConfig,
    pub arena: Arena,
    pub mode: GameMode,
    pub round: RoundState,
    pub phase: GamePhase,
    pub balls: BallRegistry,
    pub goal_bars: GoalBarSet,
    pub drag: DragController,
    pub combo: ComboTracker,
    /// Present only in time attack
    pub timer: Option<Countdown>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Pending presentation events (not persisted)
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Start a run at level 1
    pub fn new(config: GameConfig, arena: Arena, mode: GameMode, seed: u64) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            round: RoundState {
                score: 0,
                lives: config.lives,
                level: 1,
                difficulty: level::difficulty_for_level(&config, 1),
                target_ball_count: level::ball_count_for_level(&config, 1),
            },
            config,
            arena,
            mode,
            phase: GamePhase::Playing,
            balls: BallRegistry::new(),
            goal_bars: GoalBarSet::default(),
            drag: DragController::default(),
            combo: ComboTracker::new(),
            timer: None,
            time_ticks: 0,
            events: Vec::new(),
        };

        level::start_round(&mut state);
        state
    }

    /// Default config, default arena, arcade mode
    pub fn with_seed(seed: u64) -> Self {
        Self::new(GameConfig::default(), Arena::default(), GameMode::Arcade, seed)
    }

    /// Gameplay ticks only run while active
    pub fn is_active(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Pulsation rules at the current difficulty
    pub fn pulsation(&self) -> PulsationModel {
        PulsationModel::new(&self.config.pulse, self.round.difficulty)
    }

    /// Create a ball with a clamped radius and start it pulsating
    pub fn spawn_ball(&mut self, pos: Vec2, radius: f32, color: usize, vel: Vec2) -> BallId {
        let radius = self.config.clamp_radius(radius);
        let id = self.balls.spawn(pos, radius, color, vel);
        let model = self.pulsation();
        if let Some(ball) = self.balls.get_mut(id) {
            model.start(ball, &mut self.rng);
        }
        log::debug!(
            "Spawned ball {} at ({:.1}, {:.1}) radius {:.1} color {}",
            id.0,
            pos.x,
            pos.y,
            radius,
            self.config.color_name(color)
        );
        id
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Drain pending events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Lose a life; the last one ends the run
    pub fn lose_life(&mut self) {
        if self.round.lives == 0 {
            return;
        }
        self.round.lives -= 1;
        self.push_event(GameEvent::LifeLost {
            remaining: self.round.lives,
        });
        log::info!("Life lost, {} remaining", self.round.lives);
        if self.round.lives == 0 {
            self.game_over();
        }
    }

    /// Level clears once no live ball remains
    pub fn check_level_complete(&mut self) {
        if self.phase == GamePhase::Playing && self.balls.live_count() == 0 {
            self.phase = GamePhase::LevelComplete;
            log::info!(
                "Level {} completed - Score: {}",
                self.round.level,
                self.round.score
            );
            self.push_event(GameEvent::LevelComplete {
                level: self.round.level,
                score: self.round.score,
            });
        }
    }

    /// After a penalty: nothing left alive means nothing left to play
    pub fn check_game_over(&mut self) {
        if self.balls.live_count() == 0 {
            self.game_over();
        }
    }

    pub fn game_over(&mut self) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;
        log::info!("Game over - Final score: {}", self.round.score);
        self.push_event(GameEvent::GameOver {
            score: self.round.score,
            level: self.round.level,
        });
    }
}
