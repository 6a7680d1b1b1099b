//! Injected game configuration
//!
//! Read-only from the simulation's point of view. Loaded from JSON (any
//! missing field falls back to the shipped default) and validated once.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Configuration loading/validation failure
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// How two merged radii combine before the size cap is applied
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MergePolicy {
    /// New radius is the plain sum
    #[default]
    Plain,
    /// Sum scaled by `multiplier`, rounded up
    Bonus { multiplier: f32 },
}

impl MergePolicy {
    pub fn combine(&self, a: f32, b: f32) -> f32 {
        match self {
            MergePolicy::Plain => a + b,
            MergePolicy::Bonus { multiplier } => ((a + b) * multiplier).ceil(),
        }
    }
}

/// Unit of the goal bar thickness values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BarSizing {
    /// Thickness in pixels
    #[default]
    Pixels,
    /// Thickness as a fraction of the arena dimension it spans across
    ArenaFraction,
}

/// Goal bar geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalBarConfig {
    pub sizing: BarSizing,
    /// Height of the top/bottom bars
    pub horizontal_thickness: f32,
    /// Width of the left/right bars
    pub vertical_thickness: f32,
    /// Length of top/bottom bars as a fraction of arena width
    pub horizontal_length: f32,
    /// Length of left/right bars as a fraction of arena height
    pub vertical_length: f32,
}

impl Default for GoalBarConfig {
    fn default() -> Self {
        Self {
            sizing: BarSizing::Pixels,
            horizontal_thickness: 30.0,
            vertical_thickness: 30.0,
            horizontal_length: 0.5,
            vertical_length: 0.6,
        }
    }
}

/// Which palette color owns each arena edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarPositions {
    pub top: usize,
    pub bottom: usize,
    pub left: usize,
    pub right: usize,
}

impl Default for BarPositions {
    fn default() -> Self {
        // 0=blue, 1=yellow, 2=red, 3=green
        Self {
            top: 3,
            bottom: 0,
            left: 2,
            right: 1,
        }
    }
}

/// Size pulsation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PulseConfig {
    /// Seconds for one min-to-max leg at difficulty 1.0
    pub speed_range: (f32, f32),
    pub min_scale: f32,
    pub max_scale: f32,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            speed_range: (2.0, 2.5),
            min_scale: 0.85,
            max_scale: 1.15,
        }
    }
}

/// Fragmentation on a wrong-goal penalty
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    pub count_range: (u32, u32),
    /// Fraction of the original diameter shared among the fragments
    pub score_fraction: f32,
    /// Distance of fragments from the impact point
    pub scatter_range: (f32, f32),
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            count_range: (2, 5),
            score_fraction: 0.8,
            scatter_range: (20.0, 40.0),
        }
    }
}

/// Initial ball placement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Keep-out margin from every arena edge
    pub margin: f32,
    /// Minimum distance between initial ball centers
    pub min_separation: f32,
    /// Rejection sampling attempts before accepting a close placement
    pub max_attempts: u32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            margin: 100.0,
            min_separation: 80.0,
            max_attempts: 20,
        }
    }
}

/// A palette entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteColor {
    pub name: String,
    pub hex: String,
}

impl PaletteColor {
    fn new(name: &str, hex: &str) -> Self {
        Self {
            name: name.to_string(),
            hex: hex.to_string(),
        }
    }
}

/// Complete tuning bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Smallest ball diameter
    pub min_ball_size: f32,
    /// Largest ball diameter (merges cap at half of it as radius)
    pub max_ball_size: f32,
    /// Initial diameter range
    pub ball_size_range: (u32, u32),
    pub initial_ball_count: usize,
    pub balls_per_level: usize,
    pub lives: u32,
    pub palette: Vec<PaletteColor>,
    /// Pixels per second at difficulty 1.0
    pub velocity_range: (f32, f32),
    pub pulse: PulseConfig,
    pub bar_positions: BarPositions,
    pub goal_bars: GoalBarConfig,
    pub difficulty_step: f32,
    pub max_difficulty: f32,
    pub split: SplitConfig,
    pub spawn: SpawnConfig,
    /// Extra hit-test radius for touch input
    pub touch_hitbox_padding: f32,
    pub merge_policy: MergePolicy,
    /// Time attack countdown in seconds
    pub time_limit: f32,
    /// Debug: every ball of a round shares one color
    pub same_colors_only: bool,
    /// Goal messages keyed by combo level (2..=5)
    pub combo_messages: BTreeMap<u32, Vec<String>>,
}

impl Default for GameConfig {
    fn default() -> Self {
        let mut combo_messages = BTreeMap::new();
        combo_messages.insert(2, vec!["Nice!".to_string(), "Sweet!".to_string()]);
        combo_messages.insert(3, vec!["Great!".to_string(), "Awesome!".to_string()]);
        combo_messages.insert(4, vec!["Amazing!".to_string(), "Incredible!".to_string()]);
        combo_messages.insert(5, vec!["Unstoppable!".to_string(), "Legendary!".to_string()]);

        Self {
            min_ball_size: 15.0,
            max_ball_size: 200.0,
            ball_size_range: (20, 40),
            initial_ball_count: 10,
            balls_per_level: 2,
            lives: 3,
            palette: vec![
                PaletteColor::new("blue", "#4ea8de"),
                PaletteColor::new("yellow", "#f9d342"),
                PaletteColor::new("red", "#ff5d5d"),
                PaletteColor::new("green", "#4dd599"),
            ],
            velocity_range: (20.0, 30.0),
            pulse: PulseConfig::default(),
            bar_positions: BarPositions::default(),
            goal_bars: GoalBarConfig::default(),
            difficulty_step: 0.1,
            max_difficulty: 2.5,
            split: SplitConfig::default(),
            spawn: SpawnConfig::default(),
            touch_hitbox_padding: 12.0,
            merge_policy: MergePolicy::Plain,
            time_limit: 60.0,
            same_colors_only: false,
            combo_messages,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a config file from disk
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    #[inline]
    pub fn min_radius(&self) -> f32 {
        self.min_ball_size / 2.0
    }

    #[inline]
    pub fn max_radius(&self) -> f32 {
        self.max_ball_size / 2.0
    }

    /// Clamp a radius into the legal ball size band
    #[inline]
    pub fn clamp_radius(&self, radius: f32) -> f32 {
        radius.clamp(self.min_radius(), self.max_radius())
    }

    pub fn palette_len(&self) -> usize {
        self.palette.len()
    }

    pub fn color_name(&self, color: usize) -> &str {
        self.palette
            .get(color)
            .map(|c| c.name.as_str())
            .unwrap_or("unknown")
    }

    /// Pick a goal message for a cashed-in combo
    ///
    /// `merges` is the merge count of the gesture, not the displayed
    /// multiplier; `roll` selects within the table. Counts above 5 use the
    /// level 5 table, missing levels (including 1) fall back to level 2.
    pub fn combo_message(&self, merges: u32, roll: usize) -> Option<&str> {
        let level = merges.min(5);
        let table = self
            .combo_messages
            .get(&level)
            .or_else(|| self.combo_messages.get(&2))?;
        if table.is_empty() {
            return None;
        }
        Some(table[roll % table.len()].as_str())
    }

    /// Check ranges and cross-field consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_ball_size <= 0.0 {
            return Err(ConfigError::invalid("min_ball_size", "must be positive"));
        }
        if self.max_ball_size < self.min_ball_size {
            return Err(ConfigError::invalid(
                "max_ball_size",
                format!("{} is below min_ball_size {}", self.max_ball_size, self.min_ball_size),
            ));
        }
        if self.ball_size_range.0 > self.ball_size_range.1 {
            return Err(ConfigError::invalid("ball_size_range", "min exceeds max"));
        }
        if self.palette.is_empty() {
            return Err(ConfigError::invalid("palette", "needs at least one color"));
        }
        let bars = self.bar_positions;
        for color in [bars.top, bars.bottom, bars.left, bars.right] {
            if color >= self.palette.len() {
                return Err(ConfigError::invalid(
                    "bar_positions",
                    format!("color {} outside palette of {}", color, self.palette.len()),
                ));
            }
        }
        if self.velocity_range.0 < 0.0 || self.velocity_range.0 > self.velocity_range.1 {
            return Err(ConfigError::invalid("velocity_range", "must be 0 <= min <= max"));
        }
        let pulse = self.pulse;
        if pulse.speed_range.0 <= 0.0 || pulse.speed_range.0 > pulse.speed_range.1 {
            return Err(ConfigError::invalid("pulse.speed_range", "must be 0 < min <= max"));
        }
        if pulse.min_scale <= 0.0 || pulse.min_scale >= pulse.max_scale {
            return Err(ConfigError::invalid("pulse", "need 0 < min_scale < max_scale"));
        }
        let split = self.split;
        if split.count_range.0 == 0 || split.count_range.0 > split.count_range.1 {
            return Err(ConfigError::invalid("split.count_range", "must be 1 <= min <= max"));
        }
        if split.scatter_range.0 > split.scatter_range.1 {
            return Err(ConfigError::invalid("split.scatter_range", "min exceeds max"));
        }
        if self.difficulty_step < 0.0 || self.max_difficulty < 1.0 {
            return Err(ConfigError::invalid(
                "max_difficulty",
                "difficulty must start at 1.0 and never decrease",
            ));
        }
        if let MergePolicy::Bonus { multiplier } = self.merge_policy {
            if multiplier < 1.0 {
                return Err(ConfigError::invalid("merge_policy", "bonus multiplier below 1.0"));
            }
        }
        if self.time_limit <= 0.0 {
            return Err(ConfigError::invalid("time_limit", "must be positive"));
        }
        Ok(())
    }
}
