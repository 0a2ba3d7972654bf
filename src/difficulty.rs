//! Difficulty level policy for Letter Leap.
//!
//! Every [`PRESSES_PER_ADJUSTMENT`] accepted presses the session asks for a
//! new level. A plugged-in [`LevelSuggester`] may propose one; whatever it
//! returns is clamped to move at most one step and to stay inside
//! `[MIN_LEVEL, MAX_LEVEL]`, and any failure falls back to the local
//! heuristic so a round can never stall on a bad call.

use thiserror::Error;

pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 10;
pub const INITIAL_LEVEL: u8 = 3;

/// Accepted presses between adjustment events.
pub const PRESSES_PER_ADJUSTMENT: usize = 10;

pub const MIN_ACCURACY_FOR_LEVEL_UP: f64 = 0.85;
pub const MAX_ACCURACY_FOR_LEVEL_DOWN: f64 = 0.70;
pub const MIN_WPM_FOR_LEVEL_UP: f64 = 15.0;

/// Performance snapshot handed to a suggester.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuggestionRequest {
    /// Accuracy in `[0, 1]`.
    pub accuracy: f64,
    /// Words per minute, `>= 0`.
    pub rate: f64,
    pub current_level: u8,
    pub total_attempted: usize,
}

#[derive(Debug, Error)]
pub enum SuggestError {
    #[error("suggestion service unavailable: {0}")]
    Unavailable(String),
    #[error("suggestion was not a level: {0:?}")]
    Malformed(String),
}

/// External source of level suggestions.
///
/// Implementations may fail; the caller treats every failure as "keep the
/// heuristic decision" and logs it.
pub trait LevelSuggester {
    fn suggest(&mut self, request: &SuggestionRequest) -> Result<i64, SuggestError>;
}

/// Local threshold heuristic: up on accurate-and-quick, down on inaccurate.
pub fn heuristic_level(accuracy: f64, rate: f64, current: u8) -> u8 {
    if accuracy >= MIN_ACCURACY_FOR_LEVEL_UP && rate >= MIN_WPM_FOR_LEVEL_UP && current < MAX_LEVEL
    {
        current + 1
    } else if accuracy < MAX_ACCURACY_FOR_LEVEL_DOWN && current > MIN_LEVEL {
        current - 1
    } else {
        current
    }
}

/// Clamp a suggested level to one step from `current`, then to the bounds.
pub fn clamp_suggestion(current: u8, suggested: i64) -> u8 {
    let current = i64::from(current);
    let stepped = suggested.clamp(current - 1, current + 1);
    stepped.clamp(i64::from(MIN_LEVEL), i64::from(MAX_LEVEL)) as u8
}

/// Decide the next level from a suggester if present, the heuristic if not
/// or if the suggestion fails.
pub fn next_level(request: &SuggestionRequest, suggester: Option<&mut dyn LevelSuggester>) -> u8 {
    if let Some(suggester) = suggester {
        match suggester.suggest(request) {
            Ok(suggested) => return clamp_suggestion(request.current_level, suggested),
            Err(err) => {
                tracing::warn!(%err, "level suggestion failed, using heuristic");
            }
        }
    }
    heuristic_level(request.accuracy, request.rate, request.current_level)
}
