//! Pure helpers deriving accuracy and rate metrics from running counters.
//!
//! These are recomputed after every scoring event, never on the tick, and
//! both divide-by-zero cases are guarded: accuracy is 0 with no attempts,
//! rate is 0 until some time has elapsed.

/// Fraction of attempts that were correct, in `[0, 1]`.
pub fn accuracy(correct: usize, attempted: usize) -> f64 {
    if attempted == 0 {
        return 0.0;
    }
    correct as f64 / attempted as f64
}

/// Words per minute using the standard 5-characters-per-word convention.
pub fn words_per_minute(correct_presses: usize, elapsed_secs: f64) -> f64 {
    if elapsed_secs <= 0.0 {
        return 0.0;
    }
    (correct_presses as f64 / 5.0) / (elapsed_secs / 60.0)
}

/// Solved problems per minute.
pub fn problems_per_minute(solved: usize, elapsed_secs: f64) -> f64 {
    if elapsed_secs <= 0.0 {
        return 0.0;
    }
    solved as f64 / (elapsed_secs / 60.0)
}

/// Round to two decimal places, the precision persisted in summaries.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
