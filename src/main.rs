//! Pulse Match entry point
//!
//! Native: headless demo runner driven by the autoplay AI.
//! Web: logging/panic setup; the page drives the simulation.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use pulse_match::consts::{MAX_SUBSTEPS, SIM_DT};
    use pulse_match::effects::{LogPresenter, dispatch_events};
    use pulse_match::highscores::JsonFileStore;
    use pulse_match::sim::{GamePhase, GameState, TickInput, tick};
    use pulse_match::{Arena, BestScores, ConfigError, GameConfig, GameMode};
    use std::path::PathBuf;

    use clap::Parser;

    /// Headless autoplay run
    #[derive(Parser, Debug)]
    #[command(author, version, about = "Headless Pulse Match demo runner", long_about = None)]
    pub struct Options {
        /// JSON config file (defaults when omitted)
        pub config: Option<PathBuf>,
        #[arg(long, default_value_t = 12345)]
        pub seed: u64,
        /// Simulation ticks to run at most
        #[arg(long, default_value_t = 60 * 60 * 3)]
        pub ticks: u64,
        #[arg(long, default_value = "arcade", value_parser = parse_mode)]
        pub mode: GameMode,
        /// Shorthand for `--mode time-attack`
        #[arg(long)]
        pub time_attack: bool,
        #[arg(long, default_value = "pulse_match_scores.json")]
        pub scores: PathBuf,
    }

    impl Options {
        pub fn game_mode(&self) -> GameMode {
            if self.time_attack {
                GameMode::TimeAttack
            } else {
                self.mode
            }
        }
    }

    fn parse_mode(s: &str) -> Result<GameMode, String> {
        GameMode::from_str(s).ok_or_else(|| format!("unknown mode `{}` (arcade, time-attack)", s))
    }

    fn load_config(opts: &Options) -> Result<GameConfig, ConfigError> {
        let config = match &opts.config {
            Some(path) => GameConfig::load_file(path)?,
            None => GameConfig::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn run(opts: Options) -> Result<(), ConfigError> {
        let config = load_config(&opts)?;
        let mode = opts.game_mode();
        let mut state = GameState::new(config, Arena::default(), mode, opts.seed);
        let mut presenter = LogPresenter::default();
        let mut best = BestScores::new(JsonFileStore::open(&opts.scores));
        log::info!(
            "Best {} score so far: {}",
            mode.as_str(),
            best.best(mode)
        );

        // Simulated 30 Hz frames, split into fixed substeps
        let frame_dt = 1.0 / 30.0;
        let mut accumulator = 0.0f32;
        let mut ticks = 0u64;
        while ticks < opts.ticks && state.phase != GamePhase::GameOver {
            accumulator += frame_dt;
            let mut substeps = 0;
            while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = TickInput {
                    idle_mode: true,
                    next_level: state.phase == GamePhase::LevelComplete,
                    ..Default::default()
                };
                tick(&mut state, &input, SIM_DT);
                accumulator -= SIM_DT;
                substeps += 1;
                ticks += 1;
            }
            dispatch_events(&mut presenter, &state.take_events());
        }

        log::info!(
            "Run finished after {} ticks: level {}, score {}, lives {}",
            ticks,
            state.round.level,
            state.round.score,
            state.round.lives
        );
        if best.submit(mode, state.round.score) {
            log::info!("New best score saved to {}", opts.scores.display());
        }
        Ok(())
    }

}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    use pulse_match::highscores::LocalStorageStore;
    use pulse_match::{BestScores, GameMode};

    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::error_1(&format!("Failed to init logger: {}", e).into());
    }

    let best = BestScores::new(LocalStorageStore);
    log::info!(
        "Pulse Match ready - best arcade {}, best time attack {}",
        best.best(GameMode::Arcade),
        best.best(GameMode::TimeAttack)
    );
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Pulse Match (native) starting...");

    let opts = headless::Options::parse();

    if let Err(e) = headless::run(opts) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
