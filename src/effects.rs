//! Presentation seam
//!
//! The simulation only produces [`GameEvent`]s. Whatever turns them into
//! particles, floating text or sound implements [`Presenter`]; its failures
//! never reach game logic.

use crate::sim::GameEvent;

/// Cosmetic side-effect failure
#[derive(Debug, thiserror::Error)]
pub enum PresentError {
    #[error("presenter unavailable: {0}")]
    Unavailable(String),
    #[error("effect failed: {0}")]
    Failed(String),
}

/// Consumer of simulation events (particles, text popups, audio)
pub trait Presenter {
    fn present(&mut self, event: &GameEvent) -> Result<(), PresentError>;
}

/// Forward events to a presenter, logging and dropping failures
///
/// Returns the number of events that failed.
pub fn dispatch_events<P: Presenter + ?Sized>(presenter: &mut P, events: &[GameEvent]) -> usize {
    let mut failed = 0;
    for event in events {
        if let Err(e) = presenter.present(event) {
            log::warn!("Ignoring presenter failure on {:?}: {}", event, e);
            failed += 1;
        }
    }
    failed
}

/// Short player-facing line for an event, if it has one
pub fn describe(event: &GameEvent) -> Option<String> {
    match event {
        GameEvent::Scored {
            points,
            merges,
            message,
            ..
        } => Some(match message {
            Some(msg) => format!("{} x{} +{}", msg, merges + 1, points),
            None => format!("+{}", points),
        }),
        GameEvent::ComboLost { merges, .. } => Some(format!("Combo x{} lost", merges + 1)),
        GameEvent::LifeLost { remaining } => Some(format!("{} lives left", remaining)),
        GameEvent::LevelComplete { level, .. } => Some(format!("Level {} complete!", level)),
        GameEvent::LevelStarted { level, .. } => Some(format!("Level {}", level)),
        GameEvent::TimeUp => Some("Time's up!".to_string()),
        GameEvent::GameOver { score, .. } => Some(format!("Game over - {}", score)),
        _ => None,
    }
}

/// Presenter that writes the player-facing lines to the log
#[derive(Debug, Default)]
pub struct LogPresenter {
    pub shown: usize,
}

impl Presenter for LogPresenter {
    fn present(&mut self, event: &GameEvent) -> Result<(), PresentError> {
        if let Some(line) = describe(event) {
            log::info!("{}", line);
            self.shown += 1;
        }
        Ok(())
    }
}
